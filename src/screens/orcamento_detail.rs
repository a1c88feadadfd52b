//! Read view of an orçamento: items, totals, status transition and the
//! server-rendered PDF download.

use iced::widget::{button, column, container, horizontal_rule, pick_list, row, text};
use iced::{Alignment, Color, Element, Length, Task, Theme};

use super::{Action, Route};
use crate::api::{ApiClient, Orcamento, OrcamentoStatus};
use crate::format::{format_currency, format_date, format_datetime, sanitize_filename};
use crate::ui::badge::status_badge;

#[derive(Debug, Clone)]
pub enum Message {
    Loaded(Result<Orcamento, String>),
    StatusSelecionado(OrcamentoStatus),
    StatusAtualizado(Result<Orcamento, String>),
    BaixarPdf,
    PdfBaixado(Result<Vec<u8>, String>),
    Editar,
    Voltar,
}

pub struct OrcamentoDetail {
    id: i64,
    orcamento: Option<Orcamento>,
    loading: bool,
    downloading: bool,
    updating_status: bool,
    status: Option<String>,
    error: Option<String>,
}

impl OrcamentoDetail {
    pub fn new(id: i64, api: &ApiClient) -> (Self, Task<Message>) {
        let api = api.clone();
        (
            Self {
                id,
                orcamento: None,
                loading: true,
                downloading: false,
                updating_status: false,
                status: None,
                error: None,
            },
            Task::perform(
                async move { api.get_orcamento(id).await.map_err(|e| e.to_string()) },
                Message::Loaded,
            ),
        )
    }

    pub fn update(&mut self, message: Message, api: &ApiClient) -> Action<Message> {
        match message {
            Message::Loaded(Ok(orcamento)) => {
                self.loading = false;
                self.orcamento = Some(orcamento);
                Action::None
            }
            Message::Loaded(Err(e)) => {
                self.loading = false;
                eprintln!("⚠️  Erro ao carregar orçamento: {}", e);
                self.error = Some("Não foi possível carregar o orçamento.".to_string());
                Action::None
            }
            Message::StatusSelecionado(status) => {
                let Some(orcamento) = &self.orcamento else {
                    return Action::None;
                };
                if self.updating_status || status == orcamento.status {
                    return Action::None;
                }
                self.updating_status = true;
                self.status = None;
                let api = api.clone();
                let id = self.id;
                Action::Run(Task::perform(
                    async move {
                        api.atualizar_status(id, status)
                            .await
                            .map_err(|e| e.to_string())
                    },
                    Message::StatusAtualizado,
                ))
            }
            Message::StatusAtualizado(Ok(orcamento)) => {
                self.updating_status = false;
                println!("🔄 Status atualizado: {}", orcamento.status);
                self.status = Some(format!("Status alterado para {}.", orcamento.status));
                self.orcamento = Some(orcamento);
                Action::None
            }
            Message::StatusAtualizado(Err(e)) => {
                self.updating_status = false;
                eprintln!("⚠️  Erro ao atualizar status: {}", e);
                self.error = Some("Não foi possível atualizar o status.".to_string());
                Action::None
            }
            Message::BaixarPdf => {
                if self.downloading {
                    return Action::None;
                }
                self.downloading = true;
                self.status = None;
                self.error = None;
                let api = api.clone();
                let id = self.id;
                Action::Run(Task::perform(
                    async move { api.gerar_pdf(id).await.map_err(|e| e.to_string()) },
                    Message::PdfBaixado,
                ))
            }
            Message::PdfBaixado(Ok(bytes)) => {
                self.downloading = false;
                let suggested = self
                    .orcamento
                    .as_ref()
                    .map(|o| {
                        let cliente = sanitize_filename(o.cliente_nome.as_deref().unwrap_or(""));
                        let cliente = if cliente.is_empty() {
                            "cliente".to_string()
                        } else {
                            cliente
                        };
                        format!("{} - {}.pdf", o.numero, cliente)
                    })
                    .unwrap_or_else(|| "orcamento.pdf".to_string());

                let destino = rfd::FileDialog::new()
                    .set_title("Salvar PDF do orçamento")
                    .set_file_name(&suggested)
                    .save_file();

                match destino {
                    Some(path) => match std::fs::write(&path, &bytes) {
                        Ok(()) => {
                            println!("📄 PDF salvo em {}", path.display());
                            self.status = Some("PDF salvo.".to_string());
                        }
                        Err(e) => {
                            eprintln!("⚠️  Erro ao salvar PDF: {}", e);
                            self.error = Some("Não foi possível salvar o arquivo.".to_string());
                        }
                    },
                    None => {
                        // User dismissed the save dialog
                    }
                }
                Action::None
            }
            Message::PdfBaixado(Err(e)) => {
                self.downloading = false;
                eprintln!("⚠️  Erro ao gerar PDF: {}", e);
                self.error = Some("Não foi possível gerar o PDF.".to_string());
                Action::None
            }
            Message::Editar => Action::Navigate(Route::OrcamentoEditar(self.id)),
            Message::Voltar => Action::Navigate(Route::Orcamentos),
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let header = row![
            button(text("← Voltar").size(13))
                .style(button::text)
                .on_press(Message::Voltar),
            text("Orçamento").size(24),
        ]
        .spacing(12)
        .align_y(Alignment::Center);

        let mut content = column![header].spacing(16);

        if self.loading {
            return content.push(text("Carregando...").size(14)).into();
        }
        if let Some(error) = &self.error {
            content = content.push(text(error.clone()).size(13).style(
                |_theme: &Theme| text::Style {
                    color: Some(Color::from_rgb(0.8, 0.2, 0.2)),
                },
            ));
        }
        let Some(orcamento) = &self.orcamento else {
            return content.into();
        };

        let cliente = orcamento.cliente_nome.clone().unwrap_or_else(|| "-".into());
        let cabecalho = row![
            column![
                text(orcamento.numero.clone()).size(20),
                text(cliente).size(14),
            ]
            .spacing(4)
            .width(Length::Fill),
            container(status_badge(orcamento.status)),
            pick_list(
                OrcamentoStatus::ALL,
                Some(orcamento.status),
                Message::StatusSelecionado,
            )
            .text_size(13)
            .padding(8),
        ]
        .spacing(12)
        .align_y(Alignment::Center);
        content = content.push(cabecalho);

        if let Some(status) = &self.status {
            content = content.push(text(status.clone()).size(13).style(
                |_theme: &Theme| text::Style {
                    color: Some(Color::from_rgb(0.1, 0.45, 0.2)),
                },
            ));
        }

        let mut datas = row![].spacing(24);
        if let Some(criado) = orcamento.data_criacao.as_deref() {
            datas = datas.push(text(format!("Criado em: {}", format_datetime(criado))).size(13));
        }
        if let Some(validade) = orcamento.data_validade.as_deref() {
            datas = datas.push(text(format!("Válido até: {}", format_date(validade))).size(13));
        }
        content = content.push(datas);

        if let Some(descricao) = orcamento
            .descricao
            .as_deref()
            .filter(|d| !d.is_empty())
        {
            content = content.push(text(descricao.to_string()).size(13));
        }

        // ===== Itens =====

        let mut itens = column![row![
            text("Tipo").size(12).width(Length::FillPortion(2)),
            text("Descrição").size(12).width(Length::FillPortion(5)),
            text("Qtde").size(12).width(Length::FillPortion(1)),
            text("Valor unit.").size(12).width(Length::FillPortion(2)),
            text("Total").size(12).width(Length::FillPortion(2)),
        ]
        .spacing(10)]
        .spacing(6);

        for item in &orcamento.itens {
            let total = item
                .valor_total
                .unwrap_or(item.quantidade * item.valor_unitario);
            itens = itens.push(
                row![
                    text(if item.tipo == "produto" { "Produto" } else { "Serviço" })
                        .size(13)
                        .width(Length::FillPortion(2)),
                    text(item.descricao.clone())
                        .size(13)
                        .width(Length::FillPortion(5)),
                    text(item.quantidade.to_string())
                        .size(13)
                        .width(Length::FillPortion(1)),
                    text(format_currency(item.valor_unitario))
                        .size(13)
                        .width(Length::FillPortion(2)),
                    text(format_currency(total))
                        .size(13)
                        .width(Length::FillPortion(2)),
                ]
                .spacing(10),
            );
            itens = itens.push(horizontal_rule(1));
        }
        content = content.push(itens);

        // ===== Totais =====

        let mut totais = column![].spacing(4);
        if let Some(subtotal) = orcamento.subtotal {
            totais = totais.push(text(format!("Subtotal: {}", format_currency(subtotal))).size(13));
        }
        if let Some(ajuste) = orcamento.ajuste_valor.filter(|a| *a != 0.0) {
            let rotulo = if orcamento.ajuste_tipo.as_deref() == Some("percentual") {
                format!("Ajuste: {}%", ajuste)
            } else {
                format!("Ajuste: {}", format_currency(ajuste))
            };
            totais = totais.push(text(rotulo).size(13));
        }
        totais = totais.push(
            text(format!(
                "Valor total: {}",
                format_currency(orcamento.valor_total.unwrap_or(0.0))
            ))
            .size(18),
        );
        content = content.push(totais);

        let mut condicoes = column![].spacing(4);
        if let Some(pagamento) = orcamento
            .condicoes_pagamento
            .as_deref()
            .filter(|c| !c.is_empty())
        {
            condicoes = condicoes
                .push(text(format!("Condições de pagamento: {}", pagamento)).size(13));
        }
        if let Some(prazo) = orcamento
            .prazo_entrega
            .as_deref()
            .filter(|p| !p.is_empty())
        {
            condicoes = condicoes.push(text(format!("Prazo de entrega: {}", prazo)).size(13));
        }
        if let Some(observacoes) = orcamento
            .observacoes
            .as_deref()
            .filter(|o| !o.is_empty())
        {
            condicoes = condicoes.push(text(format!("Observações: {}", observacoes)).size(13));
        }
        content = content.push(condicoes);

        let acoes = row![
            button(
                text(if self.downloading {
                    "Gerando PDF..."
                } else {
                    "Baixar PDF"
                })
                .size(14)
            )
            .style(button::primary)
            .padding([8, 16])
            .on_press_maybe((!self.downloading).then_some(Message::BaixarPdf)),
            button(text("Editar").size(14))
                .style(button::secondary)
                .padding([8, 16])
                .on_press(Message::Editar),
        ]
        .spacing(12);

        content.push(acoes).into()
    }
}

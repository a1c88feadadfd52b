//! Paginated orçamentos listing with status filter.

use std::fmt;

use iced::widget::{button, column, container, horizontal_rule, pick_list, row, text};
use iced::{Alignment, Color, Element, Length, Task, Theme};

use super::{Action, Route, LIST_PAGE_SIZE};
use crate::api::{ApiClient, Orcamento, OrcamentoFiltro, OrcamentoStatus, Page};
use crate::format::{format_currency, format_date};
use crate::ui::badge::status_badge;

/// Status filter options ("all" plus each status)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FiltroStatus {
    Todos,
    Somente(OrcamentoStatus),
}

impl FiltroStatus {
    const ALL: [FiltroStatus; 7] = [
        FiltroStatus::Todos,
        FiltroStatus::Somente(OrcamentoStatus::Rascunho),
        FiltroStatus::Somente(OrcamentoStatus::Enviado),
        FiltroStatus::Somente(OrcamentoStatus::Aprovado),
        FiltroStatus::Somente(OrcamentoStatus::Rejeitado),
        FiltroStatus::Somente(OrcamentoStatus::Vencido),
        FiltroStatus::Somente(OrcamentoStatus::Cancelado),
    ];

    fn status(self) -> Option<OrcamentoStatus> {
        match self {
            FiltroStatus::Todos => None,
            FiltroStatus::Somente(status) => Some(status),
        }
    }
}

impl fmt::Display for FiltroStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FiltroStatus::Todos => f.write_str("Todos os status"),
            FiltroStatus::Somente(status) => f.write_str(status.label()),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    FiltroChanged(FiltroStatus),
    Loaded(Result<Page<Orcamento>, String>),
    PaginaAnterior,
    ProximaPagina,
    Novo,
    Detalhe(i64),
    Editar(i64),
    Excluir(i64),
    Excluido(Result<(), String>),
}

pub struct Orcamentos {
    filtro: FiltroStatus,
    page: u32,
    count: u64,
    has_next: bool,
    results: Vec<Orcamento>,
    loading: bool,
    error: Option<String>,
}

impl Orcamentos {
    pub fn new(api: &ApiClient) -> (Self, Task<Message>) {
        let screen = Self {
            filtro: FiltroStatus::Todos,
            page: 1,
            count: 0,
            has_next: false,
            results: Vec::new(),
            loading: true,
            error: None,
        };
        let task = screen.fetch(api);
        (screen, task)
    }

    fn fetch(&self, api: &ApiClient) -> Task<Message> {
        let api = api.clone();
        let filtro = OrcamentoFiltro {
            status: self.filtro.status(),
            page: self.page,
            page_size: LIST_PAGE_SIZE,
        };
        Task::perform(
            async move { api.list_orcamentos(&filtro).await.map_err(|e| e.to_string()) },
            Message::Loaded,
        )
    }

    fn reload(&mut self, api: &ApiClient) -> Action<Message> {
        self.loading = true;
        self.error = None;
        Action::Run(self.fetch(api))
    }

    pub fn update(&mut self, message: Message, api: &ApiClient) -> Action<Message> {
        match message {
            Message::FiltroChanged(filtro) => {
                self.filtro = filtro;
                self.page = 1;
                self.reload(api)
            }
            Message::Loaded(Ok(page)) => {
                self.loading = false;
                self.count = page.count;
                self.has_next = page.next.is_some();
                self.results = page.results;
                Action::None
            }
            Message::Loaded(Err(e)) => {
                self.loading = false;
                eprintln!("⚠️  Erro ao carregar orçamentos: {}", e);
                self.error = Some("Não foi possível carregar os orçamentos.".to_string());
                Action::None
            }
            Message::PaginaAnterior => {
                if self.page > 1 {
                    self.page -= 1;
                    self.reload(api)
                } else {
                    Action::None
                }
            }
            Message::ProximaPagina => {
                if self.has_next {
                    self.page += 1;
                    self.reload(api)
                } else {
                    Action::None
                }
            }
            Message::Novo => Action::Navigate(Route::OrcamentoNovo),
            Message::Detalhe(id) => Action::Navigate(Route::OrcamentoDetalhe(id)),
            Message::Editar(id) => Action::Navigate(Route::OrcamentoEditar(id)),
            Message::Excluir(id) => {
                let confirmed = rfd::MessageDialog::new()
                    .set_level(rfd::MessageLevel::Warning)
                    .set_title("Excluir orçamento")
                    .set_description("Tem certeza que deseja excluir este orçamento?")
                    .set_buttons(rfd::MessageButtons::OkCancel)
                    .show();
                if confirmed != rfd::MessageDialogResult::Ok {
                    return Action::None;
                }
                let api = api.clone();
                Action::Run(Task::perform(
                    async move { api.delete_orcamento(id).await.map_err(|e| e.to_string()) },
                    Message::Excluido,
                ))
            }
            Message::Excluido(Ok(())) => {
                println!("🗑️  Orçamento excluído");
                self.reload(api)
            }
            Message::Excluido(Err(e)) => {
                eprintln!("⚠️  Erro ao excluir orçamento: {}", e);
                self.error = Some("Não foi possível excluir o orçamento.".to_string());
                Action::None
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let header = row![
            text("Orçamentos").size(24).width(Length::Fill),
            pick_list(FiltroStatus::ALL, Some(self.filtro), Message::FiltroChanged)
                .text_size(13)
                .padding(8),
            button(text("Novo orçamento").size(13))
                .style(button::primary)
                .padding([6, 12])
                .on_press(Message::Novo),
        ]
        .spacing(12)
        .align_y(Alignment::Center);

        let mut content = column![header].spacing(14);

        if let Some(error) = &self.error {
            content = content.push(text(error.clone()).size(13).style(
                |_theme: &Theme| text::Style {
                    color: Some(Color::from_rgb(0.8, 0.2, 0.2)),
                },
            ));
        }

        if self.loading {
            return content.push(text("Carregando...").size(14)).into();
        }

        if self.results.is_empty() {
            return content
                .push(text("Nenhum orçamento encontrado.").size(14))
                .into();
        }

        let mut list = column![row![
            text("Número").size(12).width(Length::FillPortion(2)),
            text("Cliente").size(12).width(Length::FillPortion(4)),
            text("Status").size(12).width(Length::FillPortion(2)),
            text("Criado em").size(12).width(Length::FillPortion(2)),
            text("Valor").size(12).width(Length::FillPortion(2)),
            text("").size(12).width(Length::FillPortion(3)),
        ]
        .spacing(10)]
        .spacing(6);

        for orcamento in &self.results {
            let cliente = orcamento.cliente_nome.clone().unwrap_or_else(|| "-".into());
            let criado = orcamento
                .data_criacao
                .as_deref()
                .map(format_date)
                .unwrap_or_else(|| "-".into());

            list = list.push(
                row![
                    text(orcamento.numero.clone())
                        .size(13)
                        .width(Length::FillPortion(2)),
                    text(cliente).size(13).width(Length::FillPortion(4)),
                    container(status_badge(orcamento.status)).width(Length::FillPortion(2)),
                    text(criado).size(13).width(Length::FillPortion(2)),
                    text(format_currency(orcamento.valor_total.unwrap_or(0.0)))
                        .size(13)
                        .width(Length::FillPortion(2)),
                    row![
                        button(text("Detalhes").size(12))
                            .style(button::secondary)
                            .padding([4, 10])
                            .on_press(Message::Detalhe(orcamento.id)),
                        button(text("Editar").size(12))
                            .style(button::secondary)
                            .padding([4, 10])
                            .on_press(Message::Editar(orcamento.id)),
                        button(text("Excluir").size(12))
                            .style(button::danger)
                            .padding([4, 10])
                            .on_press(Message::Excluir(orcamento.id)),
                    ]
                    .spacing(6)
                    .width(Length::FillPortion(3)),
                ]
                .spacing(10)
                .align_y(Alignment::Center),
            );
            list = list.push(horizontal_rule(1));
        }
        content = content.push(list);

        let paginacao = row![
            button(text("Anterior").size(12))
                .style(button::secondary)
                .padding([4, 10])
                .on_press_maybe((self.page > 1).then_some(Message::PaginaAnterior)),
            text(format!("Página {} — {} orçamentos", self.page, self.count)).size(12),
            button(text("Próxima").size(12))
                .style(button::secondary)
                .padding([4, 10])
                .on_press_maybe(self.has_next.then_some(Message::ProximaPagina)),
        ]
        .spacing(12)
        .align_y(Alignment::Center);

        content.push(paginacao).into()
    }
}

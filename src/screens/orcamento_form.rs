//! Create/edit form for an orçamento.
//!
//! Hosts the debounced cliente selector and a dynamic list of item rows.
//! Totals are recomputed on every keystroke from the drafted values; the
//! ajuste can be an absolute amount (negative = desconto) or a percentage.

use std::fmt;

use iced::widget::{button, column, horizontal_rule, pick_list, row, text, text_input};
use iced::{Alignment, Color, Element, Length, Task, Theme};

use super::{Action, Route};
use crate::api::{ApiClient, ItemPayload, Orcamento, OrcamentoPayload, OrcamentoStatus};
use crate::format::format_currency;
use crate::search::{self, ClienteSearch};

/// How the ajuste is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AjusteTipo {
    Valor,
    Percentual,
}

impl AjusteTipo {
    const ALL: [AjusteTipo; 2] = [AjusteTipo::Valor, AjusteTipo::Percentual];

    fn as_str(self) -> &'static str {
        match self {
            AjusteTipo::Valor => "valor",
            AjusteTipo::Percentual => "percentual",
        }
    }

    fn from_wire(value: Option<&str>) -> Self {
        match value {
            Some("percentual") => AjusteTipo::Percentual,
            _ => AjusteTipo::Valor,
        }
    }
}

impl fmt::Display for AjusteTipo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AjusteTipo::Valor => f.write_str("R$"),
            AjusteTipo::Percentual => f.write_str("%"),
        }
    }
}

/// Kind of a line item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipoItem {
    Servico,
    Produto,
}

impl TipoItem {
    const ALL: [TipoItem; 2] = [TipoItem::Servico, TipoItem::Produto];

    fn as_str(self) -> &'static str {
        match self {
            TipoItem::Servico => "servico",
            TipoItem::Produto => "produto",
        }
    }

    fn from_wire(value: &str) -> Self {
        if value == "produto" {
            TipoItem::Produto
        } else {
            TipoItem::Servico
        }
    }
}

impl fmt::Display for TipoItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TipoItem::Servico => f.write_str("Serviço"),
            TipoItem::Produto => f.write_str("Produto"),
        }
    }
}

/// One item row as the user is typing it
#[derive(Debug, Clone)]
struct ItemDraft {
    tipo: TipoItem,
    descricao: String,
    quantidade: String,
    valor_unitario: String,
}

impl Default for ItemDraft {
    fn default() -> Self {
        Self {
            tipo: TipoItem::Servico,
            descricao: String::new(),
            quantidade: String::new(),
            valor_unitario: String::new(),
        }
    }
}

impl ItemDraft {
    fn total(&self) -> f64 {
        parse_decimal(&self.quantidade) * parse_decimal(&self.valor_unitario)
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    Loaded(Result<Orcamento, String>),
    Search(search::Event),
    DescricaoChanged(String),
    StatusChanged(OrcamentoStatus),
    DataValidadeChanged(String),
    AjusteValorChanged(String),
    AjusteTipoChanged(AjusteTipo),
    CondicoesChanged(String),
    PrazoChanged(String),
    ObservacoesChanged(String),
    AdicionarItem,
    RemoverItem(usize),
    ItemTipoChanged(usize, TipoItem),
    ItemDescricaoChanged(usize, String),
    ItemQuantidadeChanged(usize, String),
    ItemValorChanged(usize, String),
    Salvar,
    Salvo(Result<Orcamento, String>),
    Voltar,
}

pub struct OrcamentoForm {
    id: Option<i64>,
    cliente: Option<i64>,
    cliente_search: ClienteSearch,
    descricao: String,
    status: OrcamentoStatus,
    data_validade: String,
    ajuste_valor: String,
    ajuste_tipo: AjusteTipo,
    condicoes_pagamento: String,
    prazo_entrega: String,
    observacoes: String,
    itens: Vec<ItemDraft>,
    erro_cliente: Option<&'static str>,
    loading: bool,
    saving: bool,
    error: Option<String>,
}

impl OrcamentoForm {
    pub fn novo() -> (Self, Task<Message>) {
        (Self::blank(None, false), Task::none())
    }

    pub fn editar(id: i64, api: &ApiClient) -> (Self, Task<Message>) {
        let api = api.clone();
        (
            Self::blank(Some(id), true),
            Task::perform(
                async move { api.get_orcamento(id).await.map_err(|e| e.to_string()) },
                Message::Loaded,
            ),
        )
    }

    fn blank(id: Option<i64>, loading: bool) -> Self {
        Self {
            id,
            cliente: None,
            cliente_search: ClienteSearch::default(),
            descricao: String::new(),
            status: OrcamentoStatus::Rascunho,
            data_validade: String::new(),
            ajuste_valor: "0".to_string(),
            ajuste_tipo: AjusteTipo::Valor,
            condicoes_pagamento: String::new(),
            prazo_entrega: String::new(),
            observacoes: String::new(),
            itens: Vec::new(),
            erro_cliente: None,
            loading,
            saving: false,
            error: None,
        }
    }

    fn subtotal(&self) -> f64 {
        self.itens.iter().map(ItemDraft::total).sum()
    }

    fn total(&self) -> f64 {
        calcular_total(
            self.subtotal(),
            parse_decimal(&self.ajuste_valor),
            self.ajuste_tipo,
        )
    }

    fn payload(&self) -> OrcamentoPayload {
        OrcamentoPayload {
            cliente: self.cliente.unwrap_or_default(),
            descricao: self.descricao.trim().to_string(),
            status: self.status,
            data_validade: Some(self.data_validade.trim().to_string())
                .filter(|d| !d.is_empty()),
            ajuste_valor: parse_decimal(&self.ajuste_valor),
            ajuste_tipo: self.ajuste_tipo.as_str().to_string(),
            condicoes_pagamento: self.condicoes_pagamento.trim().to_string(),
            prazo_entrega: self.prazo_entrega.trim().to_string(),
            observacoes: self.observacoes.trim().to_string(),
            itens: self
                .itens
                .iter()
                .filter(|item| !item.descricao.trim().is_empty())
                .map(|item| ItemPayload {
                    tipo: item.tipo.as_str().to_string(),
                    descricao: item.descricao.trim().to_string(),
                    quantidade: parse_decimal(&item.quantidade),
                    valor_unitario: parse_decimal(&item.valor_unitario),
                })
                .collect(),
        }
    }

    /// Run the selector's side-effect commands, folding value changes into
    /// the form state
    fn run_search_commands(
        &mut self,
        commands: Vec<search::Command>,
        api: &ApiClient,
    ) -> Action<Message> {
        let mut tasks = Vec::new();
        for command in commands {
            match command {
                search::Command::EmitChange(value) => {
                    self.cliente = value;
                    self.erro_cliente = None;
                }
                command => {
                    tasks.push(
                        ClienteSearch::perform(command, api.clone()).map(Message::Search),
                    );
                }
            }
        }
        if tasks.is_empty() {
            Action::None
        } else {
            Action::Run(Task::batch(tasks))
        }
    }

    pub fn update(&mut self, message: Message, api: &ApiClient) -> Action<Message> {
        match message {
            Message::Loaded(Ok(orcamento)) => {
                self.loading = false;
                self.cliente = Some(orcamento.cliente);
                self.descricao = orcamento.descricao.unwrap_or_default();
                self.status = orcamento.status;
                self.data_validade = orcamento.data_validade.unwrap_or_default();
                self.ajuste_valor = orcamento
                    .ajuste_valor
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "0".to_string());
                self.ajuste_tipo = AjusteTipo::from_wire(orcamento.ajuste_tipo.as_deref());
                self.condicoes_pagamento = orcamento.condicoes_pagamento.unwrap_or_default();
                self.prazo_entrega = orcamento.prazo_entrega.unwrap_or_default();
                self.observacoes = orcamento.observacoes.unwrap_or_default();
                self.itens = orcamento
                    .itens
                    .iter()
                    .map(|item| ItemDraft {
                        tipo: TipoItem::from_wire(&item.tipo),
                        descricao: item.descricao.clone(),
                        quantidade: item.quantidade.to_string(),
                        valor_unitario: item.valor_unitario.to_string(),
                    })
                    .collect();

                // Resolve the cliente label independently of the search flow
                let commands = self.cliente_search.set_value(self.cliente);
                self.run_search_commands(commands, api)
            }
            Message::Loaded(Err(e)) => {
                self.loading = false;
                eprintln!("⚠️  Erro ao carregar orçamento: {}", e);
                self.error = Some("Não foi possível carregar o orçamento.".to_string());
                Action::None
            }
            Message::Search(event) => {
                let commands = self.cliente_search.update(event);
                self.run_search_commands(commands, api)
            }
            Message::DescricaoChanged(value) => {
                self.descricao = value;
                Action::None
            }
            Message::StatusChanged(status) => {
                self.status = status;
                Action::None
            }
            Message::DataValidadeChanged(value) => {
                self.data_validade = value;
                Action::None
            }
            Message::AjusteValorChanged(value) => {
                self.ajuste_valor = value;
                Action::None
            }
            Message::AjusteTipoChanged(tipo) => {
                self.ajuste_tipo = tipo;
                Action::None
            }
            Message::CondicoesChanged(value) => {
                self.condicoes_pagamento = value;
                Action::None
            }
            Message::PrazoChanged(value) => {
                self.prazo_entrega = value;
                Action::None
            }
            Message::ObservacoesChanged(value) => {
                self.observacoes = value;
                Action::None
            }
            Message::AdicionarItem => {
                self.itens.push(ItemDraft::default());
                Action::None
            }
            Message::RemoverItem(index) => {
                if index < self.itens.len() {
                    self.itens.remove(index);
                }
                Action::None
            }
            Message::ItemTipoChanged(index, tipo) => {
                if let Some(item) = self.itens.get_mut(index) {
                    item.tipo = tipo;
                }
                Action::None
            }
            Message::ItemDescricaoChanged(index, value) => {
                if let Some(item) = self.itens.get_mut(index) {
                    item.descricao = value;
                }
                Action::None
            }
            Message::ItemQuantidadeChanged(index, value) => {
                if let Some(item) = self.itens.get_mut(index) {
                    item.quantidade = value;
                }
                Action::None
            }
            Message::ItemValorChanged(index, value) => {
                if let Some(item) = self.itens.get_mut(index) {
                    item.valor_unitario = value;
                }
                Action::None
            }
            Message::Salvar => {
                if self.saving {
                    return Action::None;
                }
                if self.cliente.is_none() {
                    self.erro_cliente = Some("Selecione um cliente");
                    return Action::None;
                }
                self.saving = true;
                self.error = None;
                let api = api.clone();
                let payload = self.payload();
                let id = self.id;
                Action::Run(Task::perform(
                    async move {
                        match id {
                            Some(id) => api.update_orcamento(id, &payload).await,
                            None => api.create_orcamento(&payload).await,
                        }
                        .map_err(|e| e.to_string())
                    },
                    Message::Salvo,
                ))
            }
            Message::Salvo(Ok(orcamento)) => {
                self.saving = false;
                println!("✅ Orçamento salvo: {}", orcamento.numero);
                Action::Navigate(Route::OrcamentoDetalhe(orcamento.id))
            }
            Message::Salvo(Err(e)) => {
                self.saving = false;
                eprintln!("⚠️  Erro ao salvar orçamento: {}", e);
                self.error = Some("Não foi possível salvar o orçamento.".to_string());
                Action::None
            }
            Message::Voltar => Action::Navigate(Route::Orcamentos),
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let titulo = if self.id.is_some() {
            "Editar orçamento"
        } else {
            "Novo orçamento"
        };

        let header = row![
            button(text("← Voltar").size(13))
                .style(button::text)
                .on_press(Message::Voltar),
            text(titulo).size(24),
        ]
        .spacing(12)
        .align_y(Alignment::Center);

        if self.loading {
            return column![header, text("Carregando...").size(14)]
                .spacing(16)
                .into();
        }

        let selector = self
            .cliente_search
            .view("Cliente *", self.erro_cliente, self.saving)
            .map(Message::Search);

        let dados = column![
            selector,
            row![
                campo("Descrição", "Descrição do orçamento", &self.descricao, Message::DescricaoChanged),
                column![
                    text("Status").size(13),
                    pick_list(OrcamentoStatus::ALL, Some(self.status), Message::StatusChanged)
                        .text_size(13)
                        .padding(8)
                        .width(Length::Fill),
                ]
                .spacing(4)
                .width(Length::FillPortion(1)),
                campo(
                    "Validade (AAAA-MM-DD)",
                    "2026-12-31",
                    &self.data_validade,
                    Message::DataValidadeChanged
                ),
            ]
            .spacing(12),
            row![
                campo("Condições de pagamento", "Ex.: 50% na entrada", &self.condicoes_pagamento, Message::CondicoesChanged),
                campo("Prazo de entrega", "Ex.: 15 dias úteis", &self.prazo_entrega, Message::PrazoChanged),
            ]
            .spacing(12),
            campo("Observações", "Observações", &self.observacoes, Message::ObservacoesChanged),
        ]
        .spacing(12);

        // ===== Itens =====

        let mut itens = column![row![
            text("Itens").size(16).width(Length::Fill),
            button(text("Adicionar item").size(13))
                .style(button::secondary)
                .padding([6, 12])
                .on_press(Message::AdicionarItem),
        ]
        .align_y(Alignment::Center)]
        .spacing(8);

        if self.itens.is_empty() {
            itens = itens.push(text("Nenhum item ainda.").size(13));
        }

        for (index, item) in self.itens.iter().enumerate() {
            itens = itens.push(
                row![
                    pick_list(TipoItem::ALL, Some(item.tipo), move |tipo| {
                        Message::ItemTipoChanged(index, tipo)
                    })
                    .text_size(13)
                    .padding(8)
                    .width(Length::FillPortion(2)),
                    text_input("Descrição", &item.descricao)
                        .on_input(move |value| Message::ItemDescricaoChanged(index, value))
                        .size(13)
                        .padding(8)
                        .width(Length::FillPortion(4)),
                    text_input("Qtde", &item.quantidade)
                        .on_input(move |value| Message::ItemQuantidadeChanged(index, value))
                        .size(13)
                        .padding(8)
                        .width(Length::FillPortion(1)),
                    text_input("Valor unit.", &item.valor_unitario)
                        .on_input(move |value| Message::ItemValorChanged(index, value))
                        .size(13)
                        .padding(8)
                        .width(Length::FillPortion(2)),
                    text(format_currency(item.total()))
                        .size(13)
                        .width(Length::FillPortion(2)),
                    button(text("Remover").size(12))
                        .style(button::danger)
                        .padding([4, 10])
                        .on_press(Message::RemoverItem(index)),
                ]
                .spacing(8)
                .align_y(Alignment::Center),
            );
        }

        // ===== Totais =====

        let ajuste_label = match self.ajuste_tipo {
            AjusteTipo::Valor => "Ajuste (R$, negativo = desconto)",
            AjusteTipo::Percentual => "Ajuste (%, negativo = desconto)",
        };
        let totais = column![
            horizontal_rule(1),
            row![
                column![
                    text(ajuste_label).size(13),
                    row![
                        pick_list(AjusteTipo::ALL, Some(self.ajuste_tipo), Message::AjusteTipoChanged)
                            .text_size(13)
                            .padding(8),
                        text_input("0", &self.ajuste_valor)
                            .on_input(Message::AjusteValorChanged)
                            .size(13)
                            .padding(8),
                    ]
                    .spacing(8),
                ]
                .spacing(4)
                .width(Length::FillPortion(2)),
                column![
                    text(format!("Subtotal: {}", format_currency(self.subtotal()))).size(13),
                    text(format!("Total: {}", format_currency(self.total()))).size(16),
                ]
                .spacing(4)
                .width(Length::FillPortion(1)),
            ]
            .spacing(12)
            .align_y(Alignment::Center),
        ]
        .spacing(8);

        let mut content = column![header, dados, itens, totais].spacing(16);

        if let Some(error) = &self.error {
            content = content.push(text(error.clone()).size(13).style(
                |_theme: &Theme| text::Style {
                    color: Some(Color::from_rgb(0.8, 0.2, 0.2)),
                },
            ));
        }

        content
            .push(
                button(text(if self.saving { "Salvando..." } else { "Salvar" }).size(14))
                    .style(button::primary)
                    .padding([8, 16])
                    .on_press_maybe((!self.saving).then_some(Message::Salvar)),
            )
            .into()
    }
}

fn campo<'a>(
    label: &'a str,
    placeholder: &'a str,
    value: &'a str,
    on_input: impl Fn(String) -> Message + 'a,
) -> Element<'a, Message> {
    column![
        text(label).size(13),
        text_input(placeholder, value)
            .on_input(on_input)
            .size(13)
            .padding(8),
    ]
    .spacing(4)
    .width(Length::FillPortion(2))
    .into()
}

/// Parse a user-typed decimal, accepting both "1234.56" and "1.234,56".
/// Anything unparseable counts as zero, mirroring how the drafts behave
/// while the user is still typing.
fn parse_decimal(value: &str) -> f64 {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    let normalized = if trimmed.contains(',') {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.to_string()
    };
    normalized.parse().unwrap_or(0.0)
}

/// Apply the ajuste to the subtotal
fn calcular_total(subtotal: f64, ajuste_valor: f64, ajuste_tipo: AjusteTipo) -> f64 {
    match ajuste_tipo {
        AjusteTipo::Valor => subtotal + ajuste_valor,
        AjusteTipo::Percentual => subtotal * (1.0 + ajuste_valor / 100.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal_formats() {
        assert_eq!(parse_decimal("10"), 10.0);
        assert_eq!(parse_decimal("10.5"), 10.5);
        assert_eq!(parse_decimal("1.234,56"), 1234.56);
        assert_eq!(parse_decimal("-12,5"), -12.5);
        assert_eq!(parse_decimal(""), 0.0);
        assert_eq!(parse_decimal("abc"), 0.0);
    }

    #[test]
    fn test_total_com_ajuste_em_valor() {
        assert_eq!(calcular_total(1000.0, -100.0, AjusteTipo::Valor), 900.0);
        assert_eq!(calcular_total(1000.0, 50.0, AjusteTipo::Valor), 1050.0);
    }

    #[test]
    fn test_total_com_ajuste_percentual() {
        assert_eq!(calcular_total(1000.0, -10.0, AjusteTipo::Percentual), 900.0);
        assert_eq!(calcular_total(200.0, 5.0, AjusteTipo::Percentual), 210.0);
    }

    #[test]
    fn test_subtotal_soma_itens() {
        let mut form = OrcamentoForm::blank(None, false);
        form.itens = vec![
            ItemDraft {
                tipo: TipoItem::Servico,
                descricao: "Instalação".into(),
                quantidade: "2".into(),
                valor_unitario: "150".into(),
            },
            ItemDraft {
                tipo: TipoItem::Produto,
                descricao: "Peça".into(),
                quantidade: "1,5".into(),
                valor_unitario: "100".into(),
            },
        ];
        assert_eq!(form.subtotal(), 450.0);
    }
}

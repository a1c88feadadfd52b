//! Landing screen: summary numbers and the most recent orçamentos.

use iced::widget::{button, column, container, horizontal_rule, row, text};
use iced::{Alignment, Border, Color, Element, Length, Task, Theme};

use super::{Action, Route};
use crate::api::{ApiClient, DashboardResumo};
use crate::format::format_currency;
use crate::ui::badge::status_badge;

#[derive(Debug, Clone)]
pub enum Message {
    Loaded(Result<DashboardResumo, String>),
    Refresh,
    OpenOrcamento(i64),
}

pub struct Dashboard {
    resumo: Option<DashboardResumo>,
    loading: bool,
    error: Option<String>,
}

impl Dashboard {
    pub fn new(api: &ApiClient) -> (Self, Task<Message>) {
        (
            Self {
                resumo: None,
                loading: true,
                error: None,
            },
            fetch(api),
        )
    }

    pub fn update(&mut self, message: Message, api: &ApiClient) -> Action<Message> {
        match message {
            Message::Loaded(Ok(resumo)) => {
                self.loading = false;
                self.error = None;
                self.resumo = Some(resumo);
                Action::None
            }
            Message::Loaded(Err(e)) => {
                self.loading = false;
                eprintln!("⚠️  Erro ao carregar o dashboard: {}", e);
                self.error = Some("Não foi possível carregar o resumo.".to_string());
                Action::None
            }
            Message::Refresh => {
                self.loading = true;
                self.error = None;
                Action::Run(fetch(api))
            }
            Message::OpenOrcamento(id) => Action::Navigate(Route::OrcamentoDetalhe(id)),
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let mut content = column![row![
            text("Dashboard").size(24),
            button(text("Atualizar").size(13))
                .style(button::secondary)
                .padding([6, 12])
                .on_press(Message::Refresh),
        ]
        .spacing(16)
        .align_y(Alignment::Center)]
        .spacing(16);

        if self.loading {
            return content.push(text("Carregando...").size(14)).into();
        }
        if let Some(error) = &self.error {
            return content
                .push(text(error.clone()).size(14).style(danger_text))
                .into();
        }

        let Some(resumo) = &self.resumo else {
            return content.into();
        };

        let cards = row![
            card("Orçamentos", resumo.total_orcamentos.to_string()),
            card("Clientes", resumo.total_clientes.to_string()),
            card(
                "Valor aprovado",
                format_currency(resumo.valor_total_aprovado.unwrap_or(0.0)),
            ),
        ]
        .spacing(16);
        content = content.push(cards);

        content = content.push(text("Orçamentos recentes").size(16));
        if resumo.orcamentos_recentes.is_empty() {
            content = content.push(text("Nenhum orçamento ainda.").size(13));
        } else {
            let mut list = column![].spacing(6);
            for orcamento in &resumo.orcamentos_recentes {
                let cliente = orcamento.cliente_nome.clone().unwrap_or_else(|| "-".into());
                list = list.push(
                    row![
                        text(orcamento.numero.clone())
                            .size(13)
                            .width(Length::FillPortion(2)),
                        text(cliente).size(13).width(Length::FillPortion(4)),
                        container(status_badge(orcamento.status)).width(Length::FillPortion(2)),
                        text(format_currency(orcamento.valor_total.unwrap_or(0.0)))
                            .size(13)
                            .width(Length::FillPortion(2)),
                        button(text("Abrir").size(12))
                            .style(button::secondary)
                            .padding([4, 10])
                            .on_press(Message::OpenOrcamento(orcamento.id)),
                    ]
                    .spacing(10)
                    .align_y(Alignment::Center),
                );
                list = list.push(horizontal_rule(1));
            }
            content = content.push(list);
        }

        content.into()
    }
}

fn fetch(api: &ApiClient) -> Task<Message> {
    let api = api.clone();
    Task::perform(
        async move { api.dashboard_resumo().await.map_err(|e| e.to_string()) },
        Message::Loaded,
    )
}

fn card<'a>(title: &'a str, value: String) -> Element<'a, Message> {
    container(
        column![
            text(title).size(13).style(|_theme: &Theme| text::Style {
                color: Some(Color::from_rgb(0.45, 0.45, 0.5)),
            }),
            text(value).size(24),
        ]
        .spacing(4),
    )
    .padding(16)
    .width(Length::FillPortion(1))
    .style(|theme: &Theme| container::Style {
        background: Some(theme.palette().background.into()),
        border: Border {
            color: Color::from_rgb(0.85, 0.85, 0.87),
            width: 1.0,
            radius: 8.0.into(),
        },
        ..container::Style::default()
    })
    .into()
}

fn danger_text(_theme: &Theme) -> text::Style {
    text::Style {
        color: Some(Color::from_rgb(0.8, 0.2, 0.2)),
    }
}

//! Colored status badge for orçamentos.

use iced::widget::{container, text};
use iced::{Border, Color, Element};

use crate::api::OrcamentoStatus;

/// Background/foreground pair for a status
fn palette(status: OrcamentoStatus) -> (Color, Color) {
    match status {
        OrcamentoStatus::Rascunho => (
            Color::from_rgb(0.90, 0.90, 0.92),
            Color::from_rgb(0.25, 0.25, 0.30),
        ),
        OrcamentoStatus::Enviado => (
            Color::from_rgb(0.84, 0.91, 1.00),
            Color::from_rgb(0.10, 0.30, 0.65),
        ),
        OrcamentoStatus::Aprovado => (
            Color::from_rgb(0.84, 0.95, 0.86),
            Color::from_rgb(0.10, 0.45, 0.20),
        ),
        OrcamentoStatus::Rejeitado | OrcamentoStatus::Cancelado => (
            Color::from_rgb(0.99, 0.86, 0.86),
            Color::from_rgb(0.60, 0.12, 0.12),
        ),
        OrcamentoStatus::Vencido => (
            Color::from_rgb(1.00, 0.94, 0.80),
            Color::from_rgb(0.55, 0.38, 0.05),
        ),
    }
}

pub fn status_badge<'a, Message: 'a>(status: OrcamentoStatus) -> Element<'a, Message> {
    let (background, foreground) = palette(status);
    container(text(status.label()).size(12))
        .padding([2, 8])
        .style(move |_theme| container::Style {
            background: Some(background.into()),
            text_color: Some(foreground),
            border: Border {
                radius: 8.0.into(),
                ..Border::default()
            },
            ..container::Style::default()
        })
        .into()
}

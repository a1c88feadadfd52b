//! Modal that hosts the crop overlay and produces the final logo PNG.
//!
//! The modal distinguishes the in-progress selection (updated on every
//! mouse move) from the committed one (set when a drag is released); only
//! the committed region is rasterized, and only when the user confirms.

use std::sync::Arc;

use iced::widget::{button, canvas, column, container, image as iced_image, row, stack, text};
use iced::{Alignment, Element, Length, Task};

use super::crop_canvas::{self, CropCanvas};
use crate::crop::{render_cropped_asset, CropRegion, ExportedAsset, PrintSize, DEFAULT_PRINT_DPI};

/// Largest on-screen area the image preview may occupy
const VIEW_WIDTH: f32 = 560.0;
const VIEW_HEIGHT: f32 = 340.0;

#[derive(Debug, Clone)]
pub enum Event {
    Canvas(crop_canvas::Event),
    ConfirmPressed,
    CancelPressed,
    Finished(Result<ExportedAsset, String>),
}

/// What the host should do after an update
pub enum Action {
    None,
    Run(Task<Event>),
    /// The asset is ready; ownership moves to the host
    Confirmed(ExportedAsset),
    /// Dismissed without producing anything
    Closed,
}

pub struct CropModal {
    source: Arc<image::DynamicImage>,
    handle: iced_image::Handle,
    natural: (u32, u32),
    /// On-screen size of the preview, aspect-preserving fit
    rendered: (f32, f32),
    /// In-progress selection (drag state)
    crop: Option<CropRegion>,
    /// Last released selection; drives rasterization
    committed: Option<CropRegion>,
    print_size: PrintSize,
    dpi: f32,
    file_name: String,
    processing: bool,
}

impl CropModal {
    /// Decode `bytes` and set up a centered default selection locked to the
    /// print size's aspect ratio.
    pub fn new(bytes: Vec<u8>, print_size: PrintSize, file_name: String) -> Result<Self, String> {
        let source = image::load_from_memory(&bytes)
            .map_err(|e| format!("Não foi possível ler a imagem: {}", e))?;
        let natural = (source.width(), source.height());

        let scale = (VIEW_WIDTH / natural.0 as f32)
            .min(VIEW_HEIGHT / natural.1 as f32)
            .min(1.0);
        let rendered = (natural.0 as f32 * scale, natural.1 as f32 * scale);

        let default_crop = CropRegion::centered_default(natural.0, natural.1, print_size.aspect());

        Ok(Self {
            source: Arc::new(source),
            handle: iced_image::Handle::from_bytes(bytes),
            natural,
            rendered,
            crop: Some(default_crop),
            committed: Some(default_crop),
            print_size,
            dpi: DEFAULT_PRINT_DPI,
            file_name,
            processing: false,
        })
    }

    /// Override the rasterization density (dots per inch)
    pub fn with_dpi(mut self, dpi: f32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn update(&mut self, event: Event) -> Action {
        match event {
            Event::Canvas(crop_canvas::Event::Changed(region)) => {
                self.crop = Some(region);
                Action::None
            }
            Event::Canvas(crop_canvas::Event::Committed(region)) => {
                self.crop = Some(region);
                self.committed = Some(region);
                Action::None
            }
            Event::ConfirmPressed => {
                if self.processing {
                    return Action::None;
                }
                // Nothing committed: not an error, just nothing to do
                let Some(region) = self.committed else {
                    return Action::Closed;
                };

                self.processing = true;
                let source = Arc::clone(&self.source);
                let rendered = self.rendered;
                let budget = self.print_size.pixel_budget(self.dpi);
                let file_name = self.file_name.clone();

                Action::Run(Task::perform(
                    async move {
                        tokio::task::spawn_blocking(move || {
                            render_cropped_asset(
                                &source,
                                &region,
                                rendered,
                                Some(budget),
                                &file_name,
                            )
                        })
                        .await
                        .map_err(|e| format!("Task join error: {}", e))?
                        .map_err(|e| e.to_string())
                    },
                    Event::Finished,
                ))
            }
            Event::CancelPressed => {
                if self.processing {
                    Action::None
                } else {
                    Action::Closed
                }
            }
            Event::Finished(Ok(asset)) => {
                self.processing = false;
                println!(
                    "✂️  Logomarca recortada: {} ({} bytes)",
                    asset.file_name,
                    asset.bytes.len()
                );
                Action::Confirmed(asset)
            }
            Event::Finished(Err(e)) => {
                // Keep the selection so the user can adjust and retry
                self.processing = false;
                eprintln!("❌ Erro ao recortar imagem: {}", e);
                let _ = rfd::MessageDialog::new()
                    .set_level(rfd::MessageLevel::Error)
                    .set_title("Erro")
                    .set_description("Erro ao recortar imagem.")
                    .show();
                Action::None
            }
        }
    }

    pub fn view(&self) -> Element<'_, Event> {
        let (width_cm, height_cm) = (self.print_size.width_cm, self.print_size.height_cm);

        let preview = stack![
            iced_image(self.handle.clone())
                .width(Length::Fixed(self.rendered.0))
                .height(Length::Fixed(self.rendered.1)),
            Element::from(
                canvas(CropCanvas {
                    region: self.crop.as_ref(),
                    aspect: self.print_size.aspect(),
                })
                .width(Length::Fixed(self.rendered.0))
                .height(Length::Fixed(self.rendered.1)),
            )
            .map(Event::Canvas),
        ];

        let confirm_label = if self.processing {
            "Processando..."
        } else {
            "Confirmar"
        };
        let can_confirm = !self.processing && self.committed.is_some();

        column![
            text("Selecionar área da imagem").size(18),
            text(format!(
                "Selecione a área da imagem para a logomarca. No PDF, ela será \
                 exibida em até {} cm × {} cm no canto superior esquerdo.",
                width_cm, height_cm
            ))
            .size(13),
            text(format!(
                "Imagem original: {} × {} px",
                self.natural.0, self.natural.1
            ))
            .size(12),
            container(preview)
                .width(Length::Fill)
                .center_x(Length::Fill)
                .padding(8),
            row![
                button(text("Cancelar").size(14))
                    .style(button::secondary)
                    .padding([8, 16])
                    .on_press_maybe((!self.processing).then_some(Event::CancelPressed)),
                button(text(confirm_label).size(14))
                    .style(button::primary)
                    .padding([8, 16])
                    .on_press_maybe(can_confirm.then_some(Event::ConfirmPressed)),
            ]
            .spacing(12)
            .align_y(Alignment::Center),
        ]
        .spacing(12)
        .width(Length::Fixed(620.0))
        .into()
    }
}

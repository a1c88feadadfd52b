//! Company settings: registration fields plus the logomarca pipeline.
//!
//! The logomarca flow: pick an image file → crop it in the modal (sized by
//! the company's `logo_dimensoes_maximas`) → keep the produced PNG pending
//! → upload it with the next save as a multipart patch.

use iced::widget::{
    button, center, column, container, image as iced_image, mouse_area, opaque, row, stack, text,
    text_input,
};
use iced::{Alignment, Border, Color, Element, Length, Task, Theme};

use super::Action;
use crate::api::{ApiClient, ConfiguracaoEmpresa, ConfiguracaoPayload, LogoDimensoes};
use crate::crop::{ExportedAsset, PrintSize};
use crate::format::{
    apply_cep_mask, apply_cnpj_cpf_mask, apply_telefone_mask, digits, sanitize_filename,
};
use crate::ui::crop_modal::{self, CropModal};

/// Text fields of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    RazaoSocial,
    NomeFantasia,
    Cnpj,
    InscricaoEstadual,
    InscricaoMunicipal,
    Endereco,
    Numero,
    Complemento,
    Bairro,
    Cidade,
    Estado,
    Cep,
    Telefone,
    Celular,
    Email,
    Website,
    TextoRodape,
    ObservacoesPadrao,
}

#[derive(Debug, Clone)]
pub enum Message {
    Loaded(Result<ConfiguracaoEmpresa, String>),
    FieldChanged(Field, String),
    SelecionarImagem,
    ImagemLida(Result<(Vec<u8>, String), String>),
    Modal(crop_modal::Event),
    RemoverLogomarca,
    Salvar,
    Salvo(Result<ConfiguracaoEmpresa, String>),
}

pub struct Configuracoes {
    empresa: Option<ConfiguracaoEmpresa>,
    campos: ConfiguracaoPayload,
    dimensoes: LogoDimensoes,
    /// Cropped PNG waiting to be uploaded with the next save
    pending_logo: Option<ExportedAsset>,
    pending_preview: Option<iced_image::Handle>,
    modal: Option<CropModal>,
    loading: bool,
    saving: bool,
    status: Option<String>,
    error: Option<String>,
}

impl Configuracoes {
    pub fn new(api: &ApiClient) -> (Self, Task<Message>) {
        let api = api.clone();
        (
            Self {
                empresa: None,
                campos: ConfiguracaoPayload::default(),
                dimensoes: LogoDimensoes::default(),
                pending_logo: None,
                pending_preview: None,
                modal: None,
                loading: true,
                saving: false,
                status: None,
                error: None,
            },
            Task::perform(
                async move { api.get_configuracao().await.map_err(|e| e.to_string()) },
                Message::Loaded,
            ),
        )
    }

    fn aplicar(&mut self, empresa: ConfiguracaoEmpresa) {
        self.dimensoes = empresa.logo_dimensoes_maximas.unwrap_or_default();
        self.campos = ConfiguracaoPayload {
            razao_social: empresa.razao_social.clone(),
            nome_fantasia: empresa.nome_fantasia.clone(),
            cnpj: apply_cnpj_cpf_mask(&empresa.cnpj, "CNPJ"),
            inscricao_estadual: empresa.inscricao_estadual.clone(),
            inscricao_municipal: empresa.inscricao_municipal.clone(),
            endereco: empresa.endereco.clone(),
            numero: empresa.numero.clone(),
            complemento: empresa.complemento.clone(),
            bairro: empresa.bairro.clone(),
            cidade: empresa.cidade.clone(),
            estado: empresa.estado.clone(),
            cep: apply_cep_mask(&empresa.cep),
            telefone: apply_telefone_mask(&empresa.telefone),
            celular: apply_telefone_mask(&empresa.celular),
            email: empresa.email.clone(),
            website: empresa.website.clone(),
            texto_rodape: empresa.texto_rodape.clone(),
            observacoes_padrao: empresa.observacoes_padrao.clone(),
        };
        self.empresa = Some(empresa);
    }

    fn payload(&self) -> ConfiguracaoPayload {
        let mut payload = self.campos.clone();
        payload.cnpj = digits(&payload.cnpj);
        payload.cep = digits(&payload.cep);
        payload.telefone = digits(&payload.telefone);
        payload.celular = digits(&payload.celular);
        payload
    }

    pub fn update(&mut self, message: Message, api: &ApiClient) -> Action<Message> {
        match message {
            Message::Loaded(Ok(empresa)) => {
                self.loading = false;
                self.aplicar(empresa);
                Action::None
            }
            Message::Loaded(Err(e)) => {
                self.loading = false;
                eprintln!("⚠️  Erro ao carregar configurações: {}", e);
                self.error = Some("Não foi possível carregar as configurações.".to_string());
                Action::None
            }
            Message::FieldChanged(field, value) => {
                let campos = &mut self.campos;
                match field {
                    Field::RazaoSocial => campos.razao_social = value,
                    Field::NomeFantasia => campos.nome_fantasia = value,
                    Field::Cnpj => campos.cnpj = apply_cnpj_cpf_mask(&value, "CNPJ"),
                    Field::InscricaoEstadual => campos.inscricao_estadual = value,
                    Field::InscricaoMunicipal => campos.inscricao_municipal = value,
                    Field::Endereco => campos.endereco = value,
                    Field::Numero => campos.numero = value,
                    Field::Complemento => campos.complemento = value,
                    Field::Bairro => campos.bairro = value,
                    Field::Cidade => campos.cidade = value,
                    Field::Estado => campos.estado = value.chars().take(2).collect(),
                    Field::Cep => campos.cep = apply_cep_mask(&value),
                    Field::Telefone => campos.telefone = apply_telefone_mask(&value),
                    Field::Celular => campos.celular = apply_telefone_mask(&value),
                    Field::Email => campos.email = value,
                    Field::Website => campos.website = value,
                    Field::TextoRodape => campos.texto_rodape = value,
                    Field::ObservacoesPadrao => campos.observacoes_padrao = value,
                }
                Action::None
            }
            Message::SelecionarImagem => {
                let escolhido = rfd::FileDialog::new()
                    .set_title("Selecionar imagem da logomarca")
                    .add_filter("Imagens", &["png", "jpg", "jpeg", "webp", "bmp"])
                    .pick_file();
                let Some(path) = escolhido else {
                    return Action::None;
                };

                // Export name: original stem, always as .png
                let file_name = path
                    .file_stem()
                    .map(|stem| sanitize_filename(&stem.to_string_lossy()))
                    .filter(|stem| !stem.is_empty())
                    .map(|stem| format!("{}.png", stem))
                    .unwrap_or_else(|| "logomarca.png".to_string());

                Action::Run(Task::perform(
                    ler_imagem(path, file_name),
                    Message::ImagemLida,
                ))
            }
            Message::ImagemLida(Ok((bytes, file_name))) => {
                let print_size = PrintSize::new(self.dimensoes.largura_cm, self.dimensoes.altura_cm);
                match CropModal::new(bytes, print_size, file_name) {
                    Ok(modal) => self.modal = Some(modal),
                    Err(e) => {
                        eprintln!("⚠️  {}", e);
                        self.error = Some(e);
                    }
                }
                Action::None
            }
            Message::ImagemLida(Err(e)) => {
                eprintln!("⚠️  Erro ao ler imagem: {}", e);
                self.error = Some("Não foi possível ler o arquivo de imagem.".to_string());
                Action::None
            }
            Message::Modal(event) => {
                let Some(modal) = &mut self.modal else {
                    return Action::None;
                };
                match modal.update(event) {
                    crop_modal::Action::None => Action::None,
                    crop_modal::Action::Run(task) => Action::Run(task.map(Message::Modal)),
                    crop_modal::Action::Confirmed(asset) => {
                        self.pending_preview =
                            Some(iced_image::Handle::from_bytes(asset.bytes.clone()));
                        self.pending_logo = Some(asset);
                        self.modal = None;
                        self.status = Some(
                            "Logomarca pronta. Clique em Salvar para enviar.".to_string(),
                        );
                        Action::None
                    }
                    crop_modal::Action::Closed => {
                        self.modal = None;
                        Action::None
                    }
                }
            }
            Message::RemoverLogomarca => {
                self.pending_logo = None;
                self.pending_preview = None;
                Action::None
            }
            Message::Salvar => {
                if self.saving {
                    return Action::None;
                }
                let Some(id) = self.empresa.as_ref().and_then(|e| e.id) else {
                    self.error = Some("Configurações ainda não carregadas.".to_string());
                    return Action::None;
                };
                self.saving = true;
                self.status = None;
                self.error = None;

                let api = api.clone();
                let payload = self.payload();
                let logomarca = self.pending_logo.clone();
                Action::Run(Task::perform(
                    async move {
                        api.update_configuracao(id, &payload, logomarca.as_ref())
                            .await
                            .map_err(|e| e.to_string())
                    },
                    Message::Salvo,
                ))
            }
            Message::Salvo(Ok(empresa)) => {
                self.saving = false;
                self.pending_logo = None;
                self.pending_preview = None;
                println!("✅ Configurações salvas: {}", empresa.razao_social);
                self.status = Some("Configurações salvas.".to_string());
                self.aplicar(empresa);
                Action::None
            }
            Message::Salvo(Err(e)) => {
                self.saving = false;
                eprintln!("⚠️  Erro ao salvar configurações: {}", e);
                self.error = Some("Não foi possível salvar as configurações.".to_string());
                Action::None
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let mut content = column![text("Configurações da empresa").size(24)].spacing(16);

        if self.loading {
            return content.push(text("Carregando...").size(14)).into();
        }

        let campos = &self.campos;
        let form = column![
            row![
                campo("Razão social", &campos.razao_social, Field::RazaoSocial),
                campo("Nome fantasia", &campos.nome_fantasia, Field::NomeFantasia),
            ]
            .spacing(12),
            row![
                campo("CNPJ", &campos.cnpj, Field::Cnpj),
                campo(
                    "Inscrição estadual",
                    &campos.inscricao_estadual,
                    Field::InscricaoEstadual
                ),
                campo(
                    "Inscrição municipal",
                    &campos.inscricao_municipal,
                    Field::InscricaoMunicipal
                ),
            ]
            .spacing(12),
            row![
                campo("Endereço", &campos.endereco, Field::Endereco),
                campo("Número", &campos.numero, Field::Numero),
                campo("Complemento", &campos.complemento, Field::Complemento),
            ]
            .spacing(12),
            row![
                campo("Bairro", &campos.bairro, Field::Bairro),
                campo("Cidade", &campos.cidade, Field::Cidade),
                campo("UF", &campos.estado, Field::Estado),
                campo("CEP", &campos.cep, Field::Cep),
            ]
            .spacing(12),
            row![
                campo("Telefone", &campos.telefone, Field::Telefone),
                campo("Celular", &campos.celular, Field::Celular),
                campo("E-mail", &campos.email, Field::Email),
                campo("Website", &campos.website, Field::Website),
            ]
            .spacing(12),
            campo("Texto do rodapé", &campos.texto_rodape, Field::TextoRodape),
            campo(
                "Observações padrão",
                &campos.observacoes_padrao,
                Field::ObservacoesPadrao
            ),
        ]
        .spacing(12);
        content = content.push(form);

        // ===== Logomarca =====

        let mut logomarca = column![
            text("Logomarca").size(16),
            text(format!(
                "A logomarca será exibida no canto superior esquerdo do PDF do \
                 orçamento, em até {} cm × {} cm.",
                self.dimensoes.largura_cm, self.dimensoes.altura_cm
            ))
            .size(13),
        ]
        .spacing(8);

        if let Some(preview) = &self.pending_preview {
            logomarca = logomarca.push(
                row![
                    iced_image(preview.clone())
                        .width(Length::Fixed(96.0))
                        .height(Length::Fixed(96.0)),
                    text("Nova logomarca pronta para envio.").size(13),
                    button(text("Descartar").size(12))
                        .style(button::danger)
                        .padding([4, 10])
                        .on_press(Message::RemoverLogomarca),
                ]
                .spacing(12)
                .align_y(Alignment::Center),
            );
        } else if let Some(url) = self
            .empresa
            .as_ref()
            .and_then(|e| e.logomarca_url.as_deref())
            .filter(|url| !url.is_empty())
        {
            logomarca = logomarca.push(text(format!("Logomarca atual: {}", url)).size(12));
        } else {
            logomarca = logomarca.push(
                text("Nenhuma logomarca cadastrada. Selecione uma imagem e salve.").size(13),
            );
        }

        logomarca = logomarca.push(
            button(
                text(if self.pending_logo.is_some() {
                    "Trocar imagem"
                } else {
                    "Selecionar imagem"
                })
                .size(13),
            )
            .style(button::secondary)
            .padding([6, 12])
            .on_press(Message::SelecionarImagem),
        );
        content = content.push(logomarca);

        if let Some(status) = &self.status {
            content = content.push(text(status.clone()).size(13).style(
                |_theme: &Theme| text::Style {
                    color: Some(Color::from_rgb(0.1, 0.45, 0.2)),
                },
            ));
        }
        if let Some(error) = &self.error {
            content = content.push(text(error.clone()).size(13).style(
                |_theme: &Theme| text::Style {
                    color: Some(Color::from_rgb(0.8, 0.2, 0.2)),
                },
            ));
        }

        content = content.push(
            button(text(if self.saving { "Salvando..." } else { "Salvar" }).size(14))
                .style(button::primary)
                .padding([8, 16])
                .on_press_maybe((!self.saving).then_some(Message::Salvar)),
        );

        let base: Element<'_, Message> = content.into();

        // The crop modal overlays everything; a click on the backdrop
        // dismisses it (the host-side "outside interaction" close)
        match &self.modal {
            None => base,
            Some(modal) => {
                let card = container(modal.view().map(Message::Modal))
                    .padding(20)
                    .style(|theme: &Theme| container::Style {
                        background: Some(theme.palette().background.into()),
                        border: Border {
                            color: Color::from_rgb(0.7, 0.7, 0.72),
                            width: 1.0,
                            radius: 10.0.into(),
                        },
                        ..container::Style::default()
                    });

                let backdrop = mouse_area(
                    center(opaque(card)).style(|_theme: &Theme| container::Style {
                        background: Some(Color::from_rgba(0.0, 0.0, 0.0, 0.55).into()),
                        ..container::Style::default()
                    }),
                )
                .on_press(Message::Modal(crop_modal::Event::CancelPressed));

                stack![base, opaque(backdrop)].into()
            }
        }
    }
}

/// Read the chosen file off the UI thread
async fn ler_imagem(
    path: std::path::PathBuf,
    file_name: String,
) -> Result<(Vec<u8>, String), String> {
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| format!("{}: {}", path.display(), e))?;
    Ok((bytes, file_name))
}

fn campo<'a>(label: &'a str, value: &'a str, kind: Field) -> Element<'a, Message> {
    column![
        text(label).size(13),
        text_input(label, value)
            .on_input(move |value| Message::FieldChanged(kind, value))
            .size(13)
            .padding(8),
    ]
    .spacing(4)
    .width(Length::FillPortion(1))
    .into()
}

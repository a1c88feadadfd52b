//! Create/edit form for a cliente.
//!
//! Masked fields (documento, CEP, telefone) reformat on every keystroke so
//! the stored string is always the masked representation; digits are
//! stripped again before the payload is sent.

use std::fmt;

use iced::widget::{button, column, pick_list, row, text, text_input};
use iced::{Alignment, Color, Element, Length, Task, Theme};

use super::{Action, Route};
use crate::api::{ApiClient, Cliente, ClientePayload};
use crate::format::{
    apply_cep_mask, apply_cnpj_cpf_mask, apply_telefone_mask, digits, max_len_cnpj_cpf,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipoDocumento {
    Cnpj,
    Cpf,
}

impl TipoDocumento {
    pub const ALL: [TipoDocumento; 2] = [TipoDocumento::Cnpj, TipoDocumento::Cpf];

    fn as_str(self) -> &'static str {
        match self {
            TipoDocumento::Cnpj => "CNPJ",
            TipoDocumento::Cpf => "CPF",
        }
    }

    fn from_wire(value: Option<&str>) -> Self {
        match value {
            Some("CPF") => TipoDocumento::Cpf,
            _ => TipoDocumento::Cnpj,
        }
    }
}

impl fmt::Display for TipoDocumento {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text fields of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    RazaoSocial,
    NomeFantasia,
    CnpjCpf,
    Email,
    Telefone,
    Endereco,
    Numero,
    Bairro,
    Cidade,
    Estado,
    Cep,
    Observacoes,
}

#[derive(Debug, Clone)]
pub enum Message {
    Loaded(Result<Cliente, String>),
    FieldChanged(Field, String),
    TipoDocumentoChanged(TipoDocumento),
    Salvar,
    Salvo(Result<Cliente, String>),
    Excluir,
    Excluido(Result<(), String>),
    Voltar,
}

#[derive(Default)]
struct Campos {
    razao_social: String,
    nome_fantasia: String,
    cnpj_cpf: String,
    email: String,
    telefone: String,
    endereco: String,
    numero: String,
    bairro: String,
    cidade: String,
    estado: String,
    cep: String,
    observacoes: String,
}

pub struct ClienteForm {
    id: Option<i64>,
    tipo_documento: TipoDocumento,
    campos: Campos,
    erro_razao_social: Option<&'static str>,
    erro_cnpj_cpf: Option<&'static str>,
    loading: bool,
    saving: bool,
    error: Option<String>,
}

impl ClienteForm {
    /// Blank form for a new cliente
    pub fn novo() -> (Self, Task<Message>) {
        (Self::blank(None, false), Task::none())
    }

    /// Form pre-filled from the backend
    pub fn editar(id: i64, api: &ApiClient) -> (Self, Task<Message>) {
        let api = api.clone();
        (
            Self::blank(Some(id), true),
            Task::perform(
                async move { api.get_cliente(id).await.map_err(|e| e.to_string()) },
                Message::Loaded,
            ),
        )
    }

    fn blank(id: Option<i64>, loading: bool) -> Self {
        Self {
            id,
            tipo_documento: TipoDocumento::Cnpj,
            campos: Campos::default(),
            erro_razao_social: None,
            erro_cnpj_cpf: None,
            loading,
            saving: false,
            error: None,
        }
    }

    fn payload(&self) -> ClientePayload {
        ClientePayload {
            razao_social: self.campos.razao_social.trim().to_string(),
            nome_fantasia: self.campos.nome_fantasia.trim().to_string(),
            tipo_documento: self.tipo_documento.as_str().to_string(),
            cnpj_cpf: digits(&self.campos.cnpj_cpf),
            email: self.campos.email.trim().to_string(),
            telefone: digits(&self.campos.telefone),
            endereco: self.campos.endereco.trim().to_string(),
            numero: self.campos.numero.trim().to_string(),
            bairro: self.campos.bairro.trim().to_string(),
            cidade: self.campos.cidade.trim().to_string(),
            estado: self.campos.estado.trim().to_uppercase(),
            cep: digits(&self.campos.cep),
            observacoes: self.campos.observacoes.trim().to_string(),
        }
    }

    fn validate(&mut self) -> bool {
        self.erro_razao_social = self
            .campos
            .razao_social
            .trim()
            .is_empty()
            .then_some("Informe a razão social");
        let doc = digits(&self.campos.cnpj_cpf);
        let expected = match self.tipo_documento {
            TipoDocumento::Cnpj => 14,
            TipoDocumento::Cpf => 11,
        };
        self.erro_cnpj_cpf = (doc.len() != expected).then_some(match self.tipo_documento {
            TipoDocumento::Cnpj => "CNPJ deve ter 14 dígitos",
            TipoDocumento::Cpf => "CPF deve ter 11 dígitos",
        });
        self.erro_razao_social.is_none() && self.erro_cnpj_cpf.is_none()
    }

    pub fn update(&mut self, message: Message, api: &ApiClient) -> Action<Message> {
        match message {
            Message::Loaded(Ok(cliente)) => {
                self.loading = false;
                self.tipo_documento = TipoDocumento::from_wire(cliente.tipo_documento.as_deref());
                self.campos = Campos {
                    razao_social: cliente.razao_social,
                    nome_fantasia: cliente.nome_fantasia.unwrap_or_default(),
                    cnpj_cpf: apply_cnpj_cpf_mask(
                        cliente.cnpj_cpf.as_deref().unwrap_or(""),
                        self.tipo_documento.as_str(),
                    ),
                    email: cliente.email.unwrap_or_default(),
                    telefone: apply_telefone_mask(cliente.telefone.as_deref().unwrap_or("")),
                    endereco: cliente.endereco.unwrap_or_default(),
                    numero: cliente.numero.unwrap_or_default(),
                    bairro: cliente.bairro.unwrap_or_default(),
                    cidade: cliente.cidade.unwrap_or_default(),
                    estado: cliente.estado.unwrap_or_default(),
                    cep: apply_cep_mask(cliente.cep.as_deref().unwrap_or("")),
                    observacoes: cliente.observacoes.unwrap_or_default(),
                };
                Action::None
            }
            Message::Loaded(Err(e)) => {
                self.loading = false;
                eprintln!("⚠️  Erro ao carregar cliente: {}", e);
                self.error = Some("Não foi possível carregar o cliente.".to_string());
                Action::None
            }
            Message::FieldChanged(field, value) => {
                let campos = &mut self.campos;
                match field {
                    Field::RazaoSocial => campos.razao_social = value,
                    Field::NomeFantasia => campos.nome_fantasia = value,
                    Field::CnpjCpf => {
                        let masked = apply_cnpj_cpf_mask(&value, self.tipo_documento.as_str());
                        if masked.len() <= max_len_cnpj_cpf(self.tipo_documento.as_str()) {
                            campos.cnpj_cpf = masked;
                        }
                    }
                    Field::Email => campos.email = value,
                    Field::Telefone => campos.telefone = apply_telefone_mask(&value),
                    Field::Endereco => campos.endereco = value,
                    Field::Numero => campos.numero = value,
                    Field::Bairro => campos.bairro = value,
                    Field::Cidade => campos.cidade = value,
                    Field::Estado => campos.estado = value.chars().take(2).collect(),
                    Field::Cep => campos.cep = apply_cep_mask(&value),
                    Field::Observacoes => campos.observacoes = value,
                }
                Action::None
            }
            Message::TipoDocumentoChanged(tipo) => {
                self.tipo_documento = tipo;
                // Re-mask whatever digits were already typed
                self.campos.cnpj_cpf =
                    apply_cnpj_cpf_mask(&self.campos.cnpj_cpf, tipo.as_str());
                Action::None
            }
            Message::Salvar => {
                if self.saving || !self.validate() {
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
                            Some(id) => api.update_cliente(id, &payload).await,
                            None => api.create_cliente(&payload).await,
                        }
                        .map_err(|e| e.to_string())
                    },
                    Message::Salvo,
                ))
            }
            Message::Salvo(Ok(cliente)) => {
                self.saving = false;
                println!("✅ Cliente salvo: {}", cliente.razao_social);
                Action::Navigate(Route::Clientes)
            }
            Message::Salvo(Err(e)) => {
                self.saving = false;
                eprintln!("⚠️  Erro ao salvar cliente: {}", e);
                self.error = Some("Não foi possível salvar o cliente.".to_string());
                Action::None
            }
            Message::Excluir => {
                let Some(id) = self.id else {
                    return Action::None;
                };
                let confirmed = rfd::MessageDialog::new()
                    .set_level(rfd::MessageLevel::Warning)
                    .set_title("Excluir cliente")
                    .set_description("Tem certeza que deseja excluir este cliente?")
                    .set_buttons(rfd::MessageButtons::OkCancel)
                    .show();
                if confirmed != rfd::MessageDialogResult::Ok {
                    return Action::None;
                }
                let api = api.clone();
                Action::Run(Task::perform(
                    async move { api.delete_cliente(id).await.map_err(|e| e.to_string()) },
                    Message::Excluido,
                ))
            }
            Message::Excluido(Ok(())) => {
                println!("🗑️  Cliente excluído");
                Action::Navigate(Route::Clientes)
            }
            Message::Excluido(Err(e)) => {
                eprintln!("⚠️  Erro ao excluir cliente: {}", e);
                self.error = Some("Não foi possível excluir o cliente.".to_string());
                Action::None
            }
            Message::Voltar => Action::Navigate(Route::Clientes),
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let titulo = if self.id.is_some() {
            "Editar cliente"
        } else {
            "Novo cliente"
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

        let campos = &self.campos;
        let documento_label = self.tipo_documento.as_str();

        let mut form = column![
            row![
                field_with_error(
                    "Razão social *",
                    "Razão social",
                    &campos.razao_social,
                    Field::RazaoSocial,
                    self.erro_razao_social,
                ),
                field(
                    "Nome fantasia",
                    "Nome fantasia",
                    &campos.nome_fantasia,
                    Field::NomeFantasia
                ),
            ]
            .spacing(12),
            row![
                column![
                    text("Tipo de documento").size(13),
                    pick_list(
                        TipoDocumento::ALL,
                        Some(self.tipo_documento),
                        Message::TipoDocumentoChanged,
                    )
                    .text_size(13)
                    .padding(8)
                    .width(Length::Fill),
                ]
                .spacing(4)
                .width(Length::FillPortion(1)),
                field_with_error(
                    documento_label,
                    documento_label,
                    &campos.cnpj_cpf,
                    Field::CnpjCpf,
                    self.erro_cnpj_cpf,
                ),
            ]
            .spacing(12),
            row![
                field("E-mail", "email@exemplo.com", &campos.email, Field::Email),
                field(
                    "Telefone",
                    "(00) 00000-0000",
                    &campos.telefone,
                    Field::Telefone
                ),
            ]
            .spacing(12),
            row![
                field("Endereço", "Rua, avenida...", &campos.endereco, Field::Endereco),
                field("Número", "Nº", &campos.numero, Field::Numero),
            ]
            .spacing(12),
            row![
                field("Bairro", "Bairro", &campos.bairro, Field::Bairro),
                field("Cidade", "Cidade", &campos.cidade, Field::Cidade),
                field("UF", "UF", &campos.estado, Field::Estado),
                field("CEP", "00000-000", &campos.cep, Field::Cep),
            ]
            .spacing(12),
            field(
                "Observações",
                "Observações",
                &campos.observacoes,
                Field::Observacoes
            ),
        ]
        .spacing(12);

        if let Some(error) = &self.error {
            form = form.push(text(error.clone()).size(13).style(
                |_theme: &Theme| text::Style {
                    color: Some(Color::from_rgb(0.8, 0.2, 0.2)),
                },
            ));
        }

        let mut acoes = row![button(
            text(if self.saving { "Salvando..." } else { "Salvar" }).size(14)
        )
        .style(button::primary)
        .padding([8, 16])
        .on_press_maybe((!self.saving).then_some(Message::Salvar))]
        .spacing(12);

        if self.id.is_some() {
            acoes = acoes.push(
                button(text("Excluir").size(14))
                    .style(button::danger)
                    .padding([8, 16])
                    .on_press_maybe((!self.saving).then_some(Message::Excluir)),
            );
        }

        column![header, form, acoes].spacing(16).into()
    }
}

fn field<'a>(
    label: &'a str,
    placeholder: &'a str,
    value: &'a str,
    kind: Field,
) -> Element<'a, Message> {
    field_with_error(label, placeholder, value, kind, None)
}

fn field_with_error<'a>(
    label: &'a str,
    placeholder: &'a str,
    value: &'a str,
    kind: Field,
    error: Option<&'static str>,
) -> Element<'a, Message> {
    let mut content = column![
        text(label).size(13),
        text_input(placeholder, value)
            .on_input(move |value| Message::FieldChanged(kind, value))
            .size(13)
            .padding(8),
    ]
    .spacing(4)
    .width(Length::FillPortion(1));

    if let Some(error) = error {
        content = content.push(text(error).size(12).style(|_theme: &Theme| text::Style {
            color: Some(Color::from_rgb(0.8, 0.2, 0.2)),
        }));
    }

    content.into()
}

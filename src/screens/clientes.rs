//! Paginated clientes listing with razão-social filter.

use iced::widget::{button, column, horizontal_rule, row, text, text_input};
use iced::{Alignment, Color, Element, Length, Task, Theme};

use super::{Action, Route, LIST_PAGE_SIZE};
use crate::api::{ApiClient, Cliente, ClienteFiltro, Page};
use crate::format::{format_cnpj_cpf, format_telefone};

#[derive(Debug, Clone)]
pub enum Message {
    FiltroChanged(String),
    Buscar,
    Loaded(Result<Page<Cliente>, String>),
    PaginaAnterior,
    ProximaPagina,
    Novo,
    Editar(i64),
    Excluir(i64),
    Excluido(Result<(), String>),
}

pub struct Clientes {
    filtro: String,
    page: u32,
    count: u64,
    has_next: bool,
    results: Vec<Cliente>,
    loading: bool,
    error: Option<String>,
}

impl Clientes {
    pub fn new(api: &ApiClient) -> (Self, Task<Message>) {
        let screen = Self {
            filtro: String::new(),
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
        let filtro = ClienteFiltro {
            razao_social: Some(self.filtro.trim().to_string()).filter(|f| !f.is_empty()),
            page: self.page,
            page_size: LIST_PAGE_SIZE,
        };
        Task::perform(
            async move { api.list_clientes(&filtro).await.map_err(|e| e.to_string()) },
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
                Action::None
            }
            Message::Buscar => {
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
                eprintln!("⚠️  Erro ao carregar clientes: {}", e);
                self.error = Some("Não foi possível carregar os clientes.".to_string());
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
            Message::Novo => Action::Navigate(Route::ClienteNovo),
            Message::Editar(id) => Action::Navigate(Route::ClienteEditar(id)),
            Message::Excluir(id) => {
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
                self.reload(api)
            }
            Message::Excluido(Err(e)) => {
                eprintln!("⚠️  Erro ao excluir cliente: {}", e);
                self.error = Some("Não foi possível excluir o cliente.".to_string());
                Action::None
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let header = row![
            text("Clientes").size(24).width(Length::Fill),
            button(text("Novo cliente").size(13))
                .style(button::primary)
                .padding([6, 12])
                .on_press(Message::Novo),
        ]
        .align_y(Alignment::Center);

        let busca = row![
            text_input("Buscar por razão social...", &self.filtro)
                .on_input(Message::FiltroChanged)
                .on_submit(Message::Buscar)
                .size(13)
                .padding(8),
            button(text("Buscar").size(13))
                .style(button::secondary)
                .padding([8, 14])
                .on_press(Message::Buscar),
        ]
        .spacing(8);

        let mut content = column![header, busca].spacing(14);

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
                .push(text("Nenhum cliente encontrado.").size(14))
                .into();
        }

        let mut list = column![row![
            text("Razão social").size(12).width(Length::FillPortion(4)),
            text("CNPJ/CPF").size(12).width(Length::FillPortion(3)),
            text("Cidade/UF").size(12).width(Length::FillPortion(3)),
            text("Telefone").size(12).width(Length::FillPortion(2)),
            text("").size(12).width(Length::FillPortion(3)),
        ]
        .spacing(10)]
        .spacing(6);

        for cliente in &self.results {
            let documento = cliente
                .cnpj_cpf
                .as_deref()
                .map(format_cnpj_cpf)
                .unwrap_or_else(|| "-".into());
            let cidade = match (cliente.cidade.as_deref(), cliente.estado.as_deref()) {
                (Some(cidade), Some(uf)) if !cidade.is_empty() && !uf.is_empty() => {
                    format!("{}/{}", cidade, uf)
                }
                (Some(cidade), _) if !cidade.is_empty() => cidade.to_string(),
                _ => "-".into(),
            };
            let telefone = cliente
                .telefone
                .as_deref()
                .map(format_telefone)
                .unwrap_or_else(|| "-".into());

            list = list.push(
                row![
                    text(cliente.razao_social.clone())
                        .size(13)
                        .width(Length::FillPortion(4)),
                    text(documento).size(13).width(Length::FillPortion(3)),
                    text(cidade).size(13).width(Length::FillPortion(3)),
                    text(telefone).size(13).width(Length::FillPortion(2)),
                    row![
                        button(text("Editar").size(12))
                            .style(button::secondary)
                            .padding([4, 10])
                            .on_press(Message::Editar(cliente.id)),
                        button(text("Excluir").size(12))
                            .style(button::danger)
                            .padding([4, 10])
                            .on_press(Message::Excluir(cliente.id)),
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
            text(format!("Página {} — {} clientes", self.page, self.count)).size(12),
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

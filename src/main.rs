use iced::widget::{button, column, container, row, scrollable, text, vertical_space};
use iced::{Color, Element, Length, Task, Theme};

mod api;
mod config;
mod crop;
mod error;
mod format;
mod screens;
mod search;
mod ui;

use api::ApiClient;
use screens::{
    cliente_form, clientes, configuracoes, dashboard, orcamento_detail, orcamento_form,
    orcamentos, Action, Route,
};

/// Main application state
struct Gestor {
    /// Shared HTTP client for the backend
    api: ApiClient,
    /// The screen currently on display
    screen: Screen,
}

enum Screen {
    Dashboard(dashboard::Dashboard),
    Clientes(clientes::Clientes),
    ClienteForm(cliente_form::ClienteForm),
    Orcamentos(orcamentos::Orcamentos),
    OrcamentoForm(orcamento_form::OrcamentoForm),
    OrcamentoDetail(orcamento_detail::OrcamentoDetail),
    Configuracoes(configuracoes::Configuracoes),
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    Navigate(Route),
    Dashboard(dashboard::Message),
    Clientes(clientes::Message),
    ClienteForm(cliente_form::Message),
    Orcamentos(orcamentos::Message),
    OrcamentoForm(orcamento_form::Message),
    OrcamentoDetail(orcamento_detail::Message),
    Configuracoes(configuracoes::Message),
}

impl Gestor {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let settings = config::load();
        println!("🔗 Backend: {}", settings.api_base_url);

        // If this fails, we panic because the app cannot function without
        // its HTTP client
        let api = ApiClient::new(&settings.api_base_url)
            .expect("Failed to initialize the HTTP client. Check the configured base URL.");

        let (dashboard, task) = dashboard::Dashboard::new(&api);
        (
            Gestor {
                api,
                screen: Screen::Dashboard(dashboard),
            },
            task.map(Message::Dashboard),
        )
    }

    fn navigate(&mut self, route: Route) -> Task<Message> {
        match route {
            Route::Dashboard => {
                let (screen, task) = dashboard::Dashboard::new(&self.api);
                self.screen = Screen::Dashboard(screen);
                task.map(Message::Dashboard)
            }
            Route::Clientes => {
                let (screen, task) = clientes::Clientes::new(&self.api);
                self.screen = Screen::Clientes(screen);
                task.map(Message::Clientes)
            }
            Route::ClienteNovo => {
                let (screen, task) = cliente_form::ClienteForm::novo();
                self.screen = Screen::ClienteForm(screen);
                task.map(Message::ClienteForm)
            }
            Route::ClienteEditar(id) => {
                let (screen, task) = cliente_form::ClienteForm::editar(id, &self.api);
                self.screen = Screen::ClienteForm(screen);
                task.map(Message::ClienteForm)
            }
            Route::Orcamentos => {
                let (screen, task) = orcamentos::Orcamentos::new(&self.api);
                self.screen = Screen::Orcamentos(screen);
                task.map(Message::Orcamentos)
            }
            Route::OrcamentoNovo => {
                let (screen, task) = orcamento_form::OrcamentoForm::novo();
                self.screen = Screen::OrcamentoForm(screen);
                task.map(Message::OrcamentoForm)
            }
            Route::OrcamentoEditar(id) => {
                let (screen, task) = orcamento_form::OrcamentoForm::editar(id, &self.api);
                self.screen = Screen::OrcamentoForm(screen);
                task.map(Message::OrcamentoForm)
            }
            Route::OrcamentoDetalhe(id) => {
                let (screen, task) = orcamento_detail::OrcamentoDetail::new(id, &self.api);
                self.screen = Screen::OrcamentoDetail(screen);
                task.map(Message::OrcamentoDetail)
            }
            Route::Configuracoes => {
                let (screen, task) = configuracoes::Configuracoes::new(&self.api);
                self.screen = Screen::Configuracoes(screen);
                task.map(Message::Configuracoes)
            }
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Navigate(route) => self.navigate(route),
            Message::Dashboard(message) => {
                let Screen::Dashboard(screen) = &mut self.screen else {
                    return Task::none();
                };
                match screen.update(message, &self.api) {
                    Action::None => Task::none(),
                    Action::Run(task) => task.map(Message::Dashboard),
                    Action::Navigate(route) => self.navigate(route),
                }
            }
            Message::Clientes(message) => {
                let Screen::Clientes(screen) = &mut self.screen else {
                    return Task::none();
                };
                match screen.update(message, &self.api) {
                    Action::None => Task::none(),
                    Action::Run(task) => task.map(Message::Clientes),
                    Action::Navigate(route) => self.navigate(route),
                }
            }
            Message::ClienteForm(message) => {
                let Screen::ClienteForm(screen) = &mut self.screen else {
                    return Task::none();
                };
                match screen.update(message, &self.api) {
                    Action::None => Task::none(),
                    Action::Run(task) => task.map(Message::ClienteForm),
                    Action::Navigate(route) => self.navigate(route),
                }
            }
            Message::Orcamentos(message) => {
                let Screen::Orcamentos(screen) = &mut self.screen else {
                    return Task::none();
                };
                match screen.update(message, &self.api) {
                    Action::None => Task::none(),
                    Action::Run(task) => task.map(Message::Orcamentos),
                    Action::Navigate(route) => self.navigate(route),
                }
            }
            Message::OrcamentoForm(message) => {
                let Screen::OrcamentoForm(screen) = &mut self.screen else {
                    return Task::none();
                };
                match screen.update(message, &self.api) {
                    Action::None => Task::none(),
                    Action::Run(task) => task.map(Message::OrcamentoForm),
                    Action::Navigate(route) => self.navigate(route),
                }
            }
            Message::OrcamentoDetail(message) => {
                let Screen::OrcamentoDetail(screen) = &mut self.screen else {
                    return Task::none();
                };
                match screen.update(message, &self.api) {
                    Action::None => Task::none(),
                    Action::Run(task) => task.map(Message::OrcamentoDetail),
                    Action::Navigate(route) => self.navigate(route),
                }
            }
            Message::Configuracoes(message) => {
                let Screen::Configuracoes(screen) = &mut self.screen else {
                    return Task::none();
                };
                match screen.update(message, &self.api) {
                    Action::None => Task::none(),
                    Action::Run(task) => task.map(Message::Configuracoes),
                    Action::Navigate(route) => self.navigate(route),
                }
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let content: Element<'_, Message> = match &self.screen {
            Screen::Dashboard(screen) => screen.view().map(Message::Dashboard),
            Screen::Clientes(screen) => screen.view().map(Message::Clientes),
            Screen::ClienteForm(screen) => screen.view().map(Message::ClienteForm),
            Screen::Orcamentos(screen) => screen.view().map(Message::Orcamentos),
            Screen::OrcamentoForm(screen) => screen.view().map(Message::OrcamentoForm),
            Screen::OrcamentoDetail(screen) => screen.view().map(Message::OrcamentoDetail),
            Screen::Configuracoes(screen) => screen.view().map(Message::Configuracoes),
        };

        let section = self.section();
        let sidebar = container(
            column![
                text("Gestor").size(22),
                vertical_space().height(Length::Fixed(12.0)),
                nav_button("Dashboard", Route::Dashboard, section == Section::Dashboard),
                nav_button("Clientes", Route::Clientes, section == Section::Clientes),
                nav_button("Orçamentos", Route::Orcamentos, section == Section::Orcamentos),
                nav_button(
                    "Configurações",
                    Route::Configuracoes,
                    section == Section::Configuracoes
                ),
            ]
            .spacing(6)
            .padding(16)
            .width(Length::Fixed(200.0)),
        )
        .height(Length::Fill)
        .style(|_theme: &Theme| container::Style {
            background: Some(Color::from_rgb(0.955, 0.955, 0.965).into()),
            ..container::Style::default()
        });

        row![
            sidebar,
            scrollable(container(content).padding(24).width(Length::Fill))
                .height(Length::Fill)
                .width(Length::Fill),
        ]
        .into()
    }

    fn section(&self) -> Section {
        match &self.screen {
            Screen::Dashboard(_) => Section::Dashboard,
            Screen::Clientes(_) | Screen::ClienteForm(_) => Section::Clientes,
            Screen::Orcamentos(_) | Screen::OrcamentoForm(_) | Screen::OrcamentoDetail(_) => {
                Section::Orcamentos
            }
            Screen::Configuracoes(_) => Section::Configuracoes,
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Light
    }
}

/// Sidebar sections (several screens share one entry)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Dashboard,
    Clientes,
    Orcamentos,
    Configuracoes,
}

fn nav_button(label: &str, route: Route, active: bool) -> Element<'_, Message> {
    button(text(label).size(14))
        .style(if active { button::primary } else { button::text })
        .padding([8, 12])
        .width(Length::Fill)
        .on_press(Message::Navigate(route))
        .into()
}

fn main() -> iced::Result {
    iced::application(
        "Gestor — Clientes & Orçamentos",
        Gestor::update,
        Gestor::view,
    )
    .theme(Gestor::theme)
    .window_size((1100.0, 720.0))
    .centered()
    .run_with(Gestor::new)
}

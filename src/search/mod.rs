//! Debounced remote-search selector for clientes.
//!
//! From the host form's point of view this behaves like a single-value
//! input: it holds an `Option<i64>` and announces changes through
//! [`Command::EmitChange`]. Internally it is a small state machine
//! (closed → open/typing → loading → results) driven by [`Event`]s.
//!
//! `update` is pure: side effects are returned as [`Command`]s that the
//! host turns into iced `Task`s with [`perform`]. Every asynchronous
//! completion carries the generation token it was issued under; a
//! completion whose token no longer matches is discarded, which is what
//! makes fast typing and out-of-order responses safe.

use iced::widget::{button, column, container, row, scrollable, text, text_input};
use iced::{Border, Color, Element, Length, Task, Theme};

use crate::api::{ApiClient, Cliente};

/// Quiet period after the last keystroke before a search is issued
pub const DEBOUNCE_MS: u64 = 350;
/// Maximum number of results fetched per search
pub const PAGE_SIZE: u32 = 25;
/// Minimum trimmed term length before any network call
pub const MIN_TERM_LEN: usize = 2;

/// Everything that can happen to the selector
#[derive(Debug, Clone)]
pub enum Event {
    /// The control was clicked/focused: open the popover
    Opened,
    /// The popover should close (toggle, selection, or host-side blur)
    Closed,
    /// The user edited the search term
    TermChanged(String),
    /// The debounce timer issued under `generation` fired
    DebounceElapsed(u64),
    /// A search issued under `generation` finished
    ResultsLoaded {
        generation: u64,
        result: Result<Vec<Cliente>, String>,
    },
    /// The user picked a result row
    OptionPicked(Cliente),
    /// The user pressed the clear button
    ClearPressed,
    /// A label lookup issued under `generation` finished
    LabelResolved {
        generation: u64,
        id: i64,
        result: Result<Cliente, String>,
    },
}

/// Side effects requested by [`ClienteSearch::update`]
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// (Re)start the debounce timer; deliver `DebounceElapsed(generation)`
    StartDebounce { generation: u64 },
    /// Run the remote search for `term`
    Search { generation: u64, term: String },
    /// Fetch a single cliente to resolve its display label
    ResolveLabel { generation: u64, id: i64 },
    /// The selected value changed; the host form must store it
    EmitChange(Option<i64>),
}

/// Selector state. One instance per control.
#[derive(Debug, Default)]
pub struct ClienteSearch {
    value: Option<i64>,
    is_open: bool,
    term: String,
    options: Vec<Cliente>,
    loading: bool,
    selected_label: Option<String>,
    /// Bumped on every keystroke; stale timers and searches check against it
    search_generation: u64,
    /// Bumped on every external value change; stale label lookups check it
    label_generation: u64,
}

impl ClienteSearch {
    /// Currently selected cliente id
    pub fn value(&self) -> Option<i64> {
        self.value
    }

    /// Sync an externally supplied value (form load, reset).
    ///
    /// When the new value has no cached label, a lookup command is returned
    /// so the control can show the razão social instead of a bare id.
    pub fn set_value(&mut self, value: Option<i64>) -> Vec<Command> {
        if value == self.value {
            return Vec::new();
        }
        self.value = value;
        match value {
            None => {
                self.selected_label = None;
                Vec::new()
            }
            Some(id) => {
                self.selected_label = None;
                self.label_generation += 1;
                vec![Command::ResolveLabel {
                    generation: self.label_generation,
                    id,
                }]
            }
        }
    }

    pub fn update(&mut self, event: Event) -> Vec<Command> {
        match event {
            Event::Opened => {
                self.is_open = true;
                self.term.clear();
                self.options.clear();
                self.loading = false;
                Vec::new()
            }
            Event::Closed => {
                self.is_open = false;
                self.term.clear();
                self.options.clear();
                self.loading = false;
                Vec::new()
            }
            Event::TermChanged(term) => {
                if !self.is_open {
                    return Vec::new();
                }
                self.term = term;
                // Last keystroke wins: a new generation invalidates any
                // pending timer and any search still in flight
                self.search_generation += 1;
                vec![Command::StartDebounce {
                    generation: self.search_generation,
                }]
            }
            Event::DebounceElapsed(generation) => {
                if generation != self.search_generation || !self.is_open {
                    return Vec::new();
                }
                let term = self.term.trim();
                if term.chars().count() < MIN_TERM_LEN {
                    self.options.clear();
                    self.loading = false;
                    return Vec::new();
                }
                self.loading = true;
                vec![Command::Search {
                    generation,
                    term: term.to_string(),
                }]
            }
            Event::ResultsLoaded { generation, result } => {
                if generation != self.search_generation {
                    return Vec::new();
                }
                self.loading = false;
                match result {
                    Ok(options) => self.options = options,
                    Err(e) => {
                        eprintln!("⚠️  Erro ao buscar clientes: {}", e);
                        self.options.clear();
                    }
                }
                Vec::new()
            }
            Event::OptionPicked(cliente) => {
                self.value = Some(cliente.id);
                self.selected_label = Some(cliente.razao_social);
                self.term.clear();
                self.options.clear();
                self.loading = false;
                self.is_open = false;
                vec![Command::EmitChange(self.value)]
            }
            Event::ClearPressed => {
                self.value = None;
                self.selected_label = None;
                self.term.clear();
                self.options.clear();
                self.loading = false;
                self.is_open = false;
                vec![Command::EmitChange(None)]
            }
            Event::LabelResolved {
                generation,
                id,
                result,
            } => {
                // Both guards matter: the generation catches superseded
                // lookups, the id catches a value that changed back
                if generation != self.label_generation || self.value != Some(id) {
                    return Vec::new();
                }
                self.selected_label = Some(match result {
                    Ok(cliente) => cliente.razao_social,
                    Err(e) => {
                        eprintln!("⚠️  Erro ao resolver cliente {}: {}", id, e);
                        format!("Cliente #{}", id)
                    }
                });
                Vec::new()
            }
        }
    }

    /// Turn a [`Command`] into the iced task that performs it.
    ///
    /// `EmitChange` has no task: the host consumes it directly.
    pub fn perform(command: Command, api: ApiClient) -> Task<Event> {
        match command {
            Command::StartDebounce { generation } => Task::perform(
                async move {
                    tokio::time::sleep(std::time::Duration::from_millis(DEBOUNCE_MS)).await;
                    generation
                },
                Event::DebounceElapsed,
            ),
            Command::Search { generation, term } => Task::perform(
                async move {
                    api.search_clientes(&term, PAGE_SIZE)
                        .await
                        .map(|page| page.results)
                        .map_err(|e| e.to_string())
                },
                move |result| Event::ResultsLoaded { generation, result },
            ),
            Command::ResolveLabel { generation, id } => Task::perform(
                async move { api.get_cliente(id).await.map_err(|e| e.to_string()) },
                move |result| Event::LabelResolved {
                    generation,
                    id,
                    result,
                },
            ),
            Command::EmitChange(_) => Task::none(),
        }
    }

    pub fn view<'a>(
        &'a self,
        label: &'a str,
        error: Option<&'a str>,
        disabled: bool,
    ) -> Element<'a, Event> {
        let display = self
            .selected_label
            .as_deref()
            .map(str::to_string)
            .or_else(|| self.value.map(|id| format!("Cliente #{}", id)));

        let mut header = row![].spacing(6).align_y(iced::Alignment::Center);
        let toggle_event = if self.is_open {
            Event::Closed
        } else {
            Event::Opened
        };
        let header_label: Element<'a, Event> = match &display {
            Some(name) => text(name.clone()).size(14).into(),
            None => text("Digite para buscar cliente...")
                .size(14)
                .style(|_theme: &Theme| text::Style {
                    color: Some(Color::from_rgb(0.55, 0.55, 0.58)),
                })
                .into(),
        };
        let mut toggle = button(header_label)
            .padding([8, 12])
            .width(Length::Fill)
            .style(button::secondary);
        if !disabled {
            toggle = toggle.on_press(toggle_event);
        }
        header = header.push(toggle);
        if self.value.is_some() && !disabled {
            header = header.push(
                button(text("×").size(14))
                    .padding([8, 10])
                    .style(button::secondary)
                    .on_press(Event::ClearPressed),
            );
        }

        let mut content = column![text(label).size(13), header].spacing(4);

        if self.is_open {
            let body: Element<'a, Event> = if self.loading {
                text("Buscando...").size(13).into()
            } else if self.term.trim().chars().count() < MIN_TERM_LEN {
                text("Digite ao menos 2 caracteres para buscar")
                    .size(13)
                    .into()
            } else if self.options.is_empty() {
                text("Nenhum cliente encontrado").size(13).into()
            } else {
                let rows = self.options.iter().fold(column![].spacing(2), |col, c| {
                    let mut line = column![text(c.razao_social.clone()).size(13)];
                    if let Some(fantasia) = c
                        .nome_fantasia
                        .as_deref()
                        .filter(|name| !name.is_empty())
                    {
                        line = line.push(text(fantasia.to_string()).size(11).style(
                            |_theme: &Theme| text::Style {
                                color: Some(Color::from_rgb(0.45, 0.45, 0.5)),
                            },
                        ));
                    }
                    col.push(
                        button(line)
                            .width(Length::Fill)
                            .padding([6, 10])
                            .style(button::text)
                            .on_press(Event::OptionPicked(c.clone())),
                    )
                });
                scrollable(rows).height(Length::Fixed(180.0)).into()
            };

            let popover = column![
                text_input("Buscar por razão social...", &self.term)
                    .on_input(Event::TermChanged)
                    .size(13)
                    .padding(8),
                body,
            ]
            .spacing(8);

            content = content.push(
                container(popover)
                    .padding(8)
                    .width(Length::Fill)
                    .style(|theme: &Theme| container::Style {
                        background: Some(theme.palette().background.into()),
                        border: Border {
                            color: Color::from_rgb(0.78, 0.78, 0.8),
                            width: 1.0,
                            radius: 6.0.into(),
                        },
                        ..container::Style::default()
                    }),
            );
        }

        if let Some(message) = error {
            content = content.push(text(message).size(12).style(|_theme: &Theme| text::Style {
                color: Some(Color::from_rgb(0.8, 0.2, 0.2)),
            }));
        }

        content.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cliente(id: i64, razao_social: &str) -> Cliente {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "razao_social": razao_social,
        }))
        .unwrap()
    }

    fn debounce_generation(commands: &[Command]) -> u64 {
        match commands {
            [Command::StartDebounce { generation }] => *generation,
            other => panic!("expected StartDebounce, got {:?}", other),
        }
    }

    #[test]
    fn test_last_keystroke_wins() {
        let mut search = ClienteSearch::default();
        search.update(Event::Opened);

        let g1 = debounce_generation(&search.update(Event::TermChanged("ab".into())));
        let g2 = debounce_generation(&search.update(Event::TermChanged("abc".into())));
        assert_ne!(g1, g2);

        // The first timer fires late and must do nothing
        assert!(search.update(Event::DebounceElapsed(g1)).is_empty());

        // The second timer issues exactly one search, for the final term
        let commands = search.update(Event::DebounceElapsed(g2));
        assert_eq!(
            commands,
            vec![Command::Search {
                generation: g2,
                term: "abc".into()
            }]
        );
    }

    #[test]
    fn test_short_term_never_searches() {
        let mut search = ClienteSearch::default();
        search.update(Event::Opened);
        search.options = vec![cliente(1, "ACME")];

        let g = debounce_generation(&search.update(Event::TermChanged(" a ".into())));
        let commands = search.update(Event::DebounceElapsed(g));
        assert!(commands.is_empty());
        assert!(search.options.is_empty());
    }

    #[test]
    fn test_stale_results_are_discarded() {
        let mut search = ClienteSearch::default();
        search.update(Event::Opened);

        let g_old = debounce_generation(&search.update(Event::TermChanged("ac".into())));
        search.update(Event::DebounceElapsed(g_old));
        let g_new = debounce_generation(&search.update(Event::TermChanged("acme".into())));

        // The old response arrives after the term changed again
        search.update(Event::ResultsLoaded {
            generation: g_old,
            result: Ok(vec![cliente(1, "Stale")]),
        });
        assert!(search.options.is_empty());

        search.update(Event::DebounceElapsed(g_new));
        search.update(Event::ResultsLoaded {
            generation: g_new,
            result: Ok(vec![cliente(2, "ACME Ltda")]),
        });
        assert_eq!(search.options.len(), 1);
        assert_eq!(search.options[0].razao_social, "ACME Ltda");
    }

    #[test]
    fn test_fetch_failure_degrades_to_empty() {
        let mut search = ClienteSearch::default();
        search.update(Event::Opened);
        let g = debounce_generation(&search.update(Event::TermChanged("acme".into())));
        search.update(Event::DebounceElapsed(g));

        search.update(Event::ResultsLoaded {
            generation: g,
            result: Err("HTTP 500".into()),
        });
        assert!(search.options.is_empty());
        assert!(!search.loading);
    }

    #[test]
    fn test_select_emits_once_and_closes() {
        let mut search = ClienteSearch::default();
        search.update(Event::Opened);
        search.update(Event::TermChanged("acme".into()));

        let commands = search.update(Event::OptionPicked(cliente(7, "ACME Ltda")));
        assert_eq!(commands, vec![Command::EmitChange(Some(7))]);
        assert_eq!(search.value(), Some(7));
        assert_eq!(search.selected_label.as_deref(), Some("ACME Ltda"));
        assert!(!search.is_open);
        assert!(search.term.is_empty());
        assert!(search.options.is_empty());
    }

    #[test]
    fn test_clear_emits_empty_and_drops_label() {
        let mut search = ClienteSearch::default();
        search.update(Event::OptionPicked(cliente(7, "ACME Ltda")));

        let commands = search.update(Event::ClearPressed);
        assert_eq!(commands, vec![Command::EmitChange(None)]);
        assert!(search.value().is_none());
        assert!(search.selected_label.is_none());

        // Re-selecting the same id later must resolve the label again
        let commands = search.set_value(Some(7));
        assert!(matches!(commands[..], [Command::ResolveLabel { id: 7, .. }]));
    }

    #[test]
    fn test_label_fallback_on_error() {
        let mut search = ClienteSearch::default();
        let commands = search.set_value(Some(9));
        let generation = match commands[..] {
            [Command::ResolveLabel { generation, id: 9 }] => generation,
            ref other => panic!("unexpected commands: {:?}", other),
        };

        search.update(Event::LabelResolved {
            generation,
            id: 9,
            result: Err("HTTP 404".into()),
        });
        assert_eq!(search.selected_label.as_deref(), Some("Cliente #9"));
    }

    #[test]
    fn test_stale_label_resolution_is_rejected() {
        let mut search = ClienteSearch::default();
        let first = search.set_value(Some(1));
        let g1 = match first[..] {
            [Command::ResolveLabel { generation, .. }] => generation,
            ref other => panic!("unexpected commands: {:?}", other),
        };
        let second = search.set_value(Some(2));
        let g2 = match second[..] {
            [Command::ResolveLabel { generation, .. }] => generation,
            ref other => panic!("unexpected commands: {:?}", other),
        };

        // The lookup for the old value resolves last: it must not win
        search.update(Event::LabelResolved {
            generation: g2,
            id: 2,
            result: Ok(cliente(2, "Cliente Atual")),
        });
        search.update(Event::LabelResolved {
            generation: g1,
            id: 1,
            result: Ok(cliente(1, "Cliente Antigo")),
        });
        assert_eq!(search.selected_label.as_deref(), Some("Cliente Atual"));
    }

    #[test]
    fn test_set_same_value_is_a_no_op() {
        let mut search = ClienteSearch::default();
        search.update(Event::OptionPicked(cliente(7, "ACME Ltda")));
        assert!(search.set_value(Some(7)).is_empty());
        assert_eq!(search.selected_label.as_deref(), Some("ACME Ltda"));
    }

    #[test]
    fn test_reopen_starts_from_a_clean_popover() {
        let mut search = ClienteSearch::default();
        search.update(Event::Opened);
        search.update(Event::TermChanged("acme".into()));
        search.options = vec![cliente(1, "ACME")];

        search.update(Event::Closed);
        search.update(Event::Opened);
        assert!(search.term.is_empty());
        assert!(search.options.is_empty());
    }
}

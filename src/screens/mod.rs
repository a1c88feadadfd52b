//! Application screens.
//!
//! Each screen owns its state and messages, exposes `update`/`view` in the
//! usual iced shape, and reports side effects back to the shell through
//! [`Action`]: run a task, navigate somewhere, or nothing.

pub mod cliente_form;
pub mod clientes;
pub mod configuracoes;
pub mod dashboard;
pub mod orcamento_detail;
pub mod orcamento_form;
pub mod orcamentos;

/// Navigation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Clientes,
    ClienteNovo,
    ClienteEditar(i64),
    Orcamentos,
    OrcamentoNovo,
    OrcamentoEditar(i64),
    OrcamentoDetalhe(i64),
    Configuracoes,
}

/// What a screen asks the shell to do after handling a message
pub enum Action<Message> {
    None,
    Run(iced::Task<Message>),
    Navigate(Route),
}

/// Rows per page in list screens
pub const LIST_PAGE_SIZE: u32 = 10;

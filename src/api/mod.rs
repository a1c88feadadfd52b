//! Remote backend boundary.
//!
//! This module handles:
//! - Typed DTOs for clientes, orçamentos, configurações and the dashboard
//! - The `ApiClient` wrapper over reqwest (JSON, binary and multipart)

pub mod client;
pub mod types;

pub use client::{ApiClient, ClienteFiltro, OrcamentoFiltro};
pub use types::{
    Cliente, ClientePayload, ConfiguracaoEmpresa, ConfiguracaoPayload, DashboardResumo,
    ItemOrcamento, ItemPayload, LogoDimensoes, Orcamento, OrcamentoPayload, OrcamentoStatus, Page,
};

//! Data shapes exchanged with the backend.
//!
//! The backend serializes decimal fields as JSON strings ("1234.56"), so
//! every monetary/quantity field goes through [`decimal_flexible`], which
//! accepts both strings and raw numbers.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One page of a paginated listing (count + optional prev/next cursors)
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// A registered client (pessoa física or jurídica)
#[derive(Debug, Clone, Deserialize)]
pub struct Cliente {
    pub id: i64,
    pub razao_social: String,
    #[serde(default)]
    pub nome_fantasia: Option<String>,
    /// "CNPJ" or "CPF"
    #[serde(default)]
    pub tipo_documento: Option<String>,
    #[serde(default)]
    pub cnpj_cpf: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telefone: Option<String>,
    #[serde(default)]
    pub endereco: Option<String>,
    #[serde(default)]
    pub numero: Option<String>,
    #[serde(default)]
    pub bairro: Option<String>,
    #[serde(default)]
    pub cidade: Option<String>,
    #[serde(default)]
    pub estado: Option<String>,
    #[serde(default)]
    pub cep: Option<String>,
    #[serde(default)]
    pub observacoes: Option<String>,
}

/// Fields sent when creating or updating a cliente
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClientePayload {
    pub razao_social: String,
    pub nome_fantasia: String,
    pub tipo_documento: String,
    pub cnpj_cpf: String,
    pub email: String,
    pub telefone: String,
    pub endereco: String,
    pub numero: String,
    pub bairro: String,
    pub cidade: String,
    pub estado: String,
    pub cep: String,
    pub observacoes: String,
}

/// Lifecycle status of an orçamento
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrcamentoStatus {
    Rascunho,
    Enviado,
    Aprovado,
    Rejeitado,
    Vencido,
    Cancelado,
}

impl OrcamentoStatus {
    pub const ALL: [OrcamentoStatus; 6] = [
        OrcamentoStatus::Rascunho,
        OrcamentoStatus::Enviado,
        OrcamentoStatus::Aprovado,
        OrcamentoStatus::Rejeitado,
        OrcamentoStatus::Vencido,
        OrcamentoStatus::Cancelado,
    ];

    /// Wire value expected by the backend
    pub fn as_str(self) -> &'static str {
        match self {
            OrcamentoStatus::Rascunho => "rascunho",
            OrcamentoStatus::Enviado => "enviado",
            OrcamentoStatus::Aprovado => "aprovado",
            OrcamentoStatus::Rejeitado => "rejeitado",
            OrcamentoStatus::Vencido => "vencido",
            OrcamentoStatus::Cancelado => "cancelado",
        }
    }

    /// Human label shown in the UI
    pub fn label(self) -> &'static str {
        match self {
            OrcamentoStatus::Rascunho => "Rascunho",
            OrcamentoStatus::Enviado => "Enviado",
            OrcamentoStatus::Aprovado => "Aprovado",
            OrcamentoStatus::Rejeitado => "Rejeitado",
            OrcamentoStatus::Vencido => "Vencido",
            OrcamentoStatus::Cancelado => "Cancelado",
        }
    }
}

impl fmt::Display for OrcamentoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One line item of an orçamento
#[derive(Debug, Clone, Deserialize)]
pub struct ItemOrcamento {
    #[serde(default)]
    pub id: Option<i64>,
    /// "servico" or "produto"
    pub tipo: String,
    pub descricao: String,
    #[serde(deserialize_with = "decimal_flexible")]
    pub quantidade: f64,
    #[serde(deserialize_with = "decimal_flexible")]
    pub valor_unitario: f64,
    #[serde(default, deserialize_with = "decimal_flexible_opt")]
    pub valor_total: Option<f64>,
}

/// A price quotation
#[derive(Debug, Clone, Deserialize)]
pub struct Orcamento {
    pub id: i64,
    pub numero: String,
    pub cliente: i64,
    #[serde(default)]
    pub cliente_nome: Option<String>,
    #[serde(default)]
    pub descricao: Option<String>,
    pub status: OrcamentoStatus,
    #[serde(default)]
    pub data_criacao: Option<String>,
    #[serde(default)]
    pub data_validade: Option<String>,
    #[serde(default, deserialize_with = "decimal_flexible_opt")]
    pub subtotal: Option<f64>,
    #[serde(default, deserialize_with = "decimal_flexible_opt")]
    pub ajuste_valor: Option<f64>,
    /// "valor" (R$) or "percentual" (%)
    #[serde(default)]
    pub ajuste_tipo: Option<String>,
    #[serde(default, deserialize_with = "decimal_flexible_opt")]
    pub valor_total: Option<f64>,
    #[serde(default)]
    pub condicoes_pagamento: Option<String>,
    #[serde(default)]
    pub prazo_entrega: Option<String>,
    #[serde(default)]
    pub observacoes: Option<String>,
    #[serde(default = "Vec::new")]
    pub itens: Vec<ItemOrcamento>,
}

/// Line item fields sent on create/update
#[derive(Debug, Clone, Serialize)]
pub struct ItemPayload {
    pub tipo: String,
    pub descricao: String,
    pub quantidade: f64,
    pub valor_unitario: f64,
}

/// Fields sent when creating or updating an orçamento
#[derive(Debug, Clone, Serialize)]
pub struct OrcamentoPayload {
    pub cliente: i64,
    pub descricao: String,
    pub status: OrcamentoStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_validade: Option<String>,
    pub ajuste_valor: f64,
    pub ajuste_tipo: String,
    pub condicoes_pagamento: String,
    pub prazo_entrega: String,
    pub observacoes: String,
    pub itens: Vec<ItemPayload>,
}

/// Maximum physical size of the logo inside the generated PDF
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LogoDimensoes {
    pub largura_cm: f32,
    pub altura_cm: f32,
}

impl Default for LogoDimensoes {
    fn default() -> Self {
        Self {
            largura_cm: 2.5,
            altura_cm: 2.5,
        }
    }
}

/// Company registration data (header/footer of generated documents)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfiguracaoEmpresa {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub razao_social: String,
    #[serde(default)]
    pub nome_fantasia: String,
    #[serde(default)]
    pub cnpj: String,
    #[serde(default)]
    pub inscricao_estadual: String,
    #[serde(default)]
    pub inscricao_municipal: String,
    #[serde(default)]
    pub endereco: String,
    #[serde(default)]
    pub numero: String,
    #[serde(default)]
    pub complemento: String,
    #[serde(default)]
    pub bairro: String,
    #[serde(default)]
    pub cidade: String,
    #[serde(default)]
    pub estado: String,
    #[serde(default)]
    pub cep: String,
    #[serde(default)]
    pub telefone: String,
    #[serde(default)]
    pub celular: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub texto_rodape: String,
    #[serde(default)]
    pub observacoes_padrao: String,
    #[serde(default)]
    pub logomarca_url: Option<String>,
    #[serde(default)]
    pub logo_dimensoes_maximas: Option<LogoDimensoes>,
}

/// Company fields sent back on save (the logo travels separately as a
/// multipart file part)
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfiguracaoPayload {
    pub razao_social: String,
    pub nome_fantasia: String,
    pub cnpj: String,
    pub inscricao_estadual: String,
    pub inscricao_municipal: String,
    pub endereco: String,
    pub numero: String,
    pub complemento: String,
    pub bairro: String,
    pub cidade: String,
    pub estado: String,
    pub cep: String,
    pub telefone: String,
    pub celular: String,
    pub email: String,
    pub website: String,
    pub texto_rodape: String,
    pub observacoes_padrao: String,
}

/// Dashboard summary numbers
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardResumo {
    #[serde(default)]
    pub total_orcamentos: u64,
    #[serde(default)]
    pub total_clientes: u64,
    #[serde(default, deserialize_with = "decimal_flexible_opt")]
    pub valor_total_aprovado: Option<f64>,
    #[serde(default = "Vec::new")]
    pub orcamentos_recentes: Vec<Orcamento>,
}

/// Accept a decimal encoded either as a JSON number or as a string
fn decimal_flexible<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("decimal inválido: {:?}", s))),
    }
}

/// Optional variant of [`decimal_flexible`] (null and absent become `None`)
fn decimal_flexible_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        None,
        Number(f64),
        String(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::None => Ok(None),
        Raw::Number(n) => Ok(Some(n)),
        Raw::String(s) if s.trim().is_empty() => Ok(None),
        Raw::String(s) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("decimal inválido: {:?}", s))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_deserializes_with_missing_cursors() {
        let page: Page<Cliente> = serde_json::from_str(
            r#"{"count": 1, "results": [{"id": 7, "razao_social": "ACME Ltda"}]}"#,
        )
        .unwrap();
        assert_eq!(page.count, 1);
        assert!(page.next.is_none());
        assert_eq!(page.results[0].razao_social, "ACME Ltda");
    }

    #[test]
    fn test_decimal_accepts_string_and_number() {
        let item: ItemOrcamento = serde_json::from_str(
            r#"{"tipo": "servico", "descricao": "Instalação", "quantidade": "2.5", "valor_unitario": 100, "valor_total": "250.00"}"#,
        )
        .unwrap();
        assert_eq!(item.quantidade, 2.5);
        assert_eq!(item.valor_unitario, 100.0);
        assert_eq!(item.valor_total, Some(250.0));
    }

    #[test]
    fn test_status_wire_format() {
        let status: OrcamentoStatus = serde_json::from_str(r#""aprovado""#).unwrap();
        assert_eq!(status, OrcamentoStatus::Aprovado);
        assert_eq!(serde_json::to_string(&status).unwrap(), r#""aprovado""#);
        assert_eq!(status.label(), "Aprovado");
    }

    #[test]
    fn test_orcamento_tolerates_nulls() {
        let orcamento: Orcamento = serde_json::from_str(
            r#"{
                "id": 3,
                "numero": "ORC-0003",
                "cliente": 7,
                "status": "rascunho",
                "valor_total": null,
                "itens": []
            }"#,
        )
        .unwrap();
        assert_eq!(orcamento.numero, "ORC-0003");
        assert!(orcamento.valor_total.is_none());
    }
}

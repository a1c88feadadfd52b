//! Typed HTTP client for the backend REST API.
//!
//! One `reqwest::Client` is built at startup and cloned into background
//! tasks (clones share the connection pool). Every helper returns
//! `Result<T, ApiError>`; screens convert errors to strings at the iced
//! `Task` boundary.

use std::time::Duration;

use reqwest::multipart;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::types::{
    Cliente, ClientePayload, ConfiguracaoEmpresa, ConfiguracaoPayload, DashboardResumo, Orcamento,
    OrcamentoPayload, OrcamentoStatus, Page,
};
use crate::crop::ExportedAsset;
use crate::error::ApiError;

/// How long to wait for the backend before giving up
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Listing filters for clientes
#[derive(Debug, Clone, Default)]
pub struct ClienteFiltro {
    pub razao_social: Option<String>,
    pub page: u32,
    pub page_size: u32,
}

/// Listing filters for orçamentos
#[derive(Debug, Clone, Default)]
pub struct OrcamentoFiltro {
    pub status: Option<OrcamentoStatus>,
    pub page: u32,
    pub page_size: u32,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Turn a reqwest response into `T`, mapping non-2xx statuses to
    /// `ApiError::Status` with the (truncated) body as detail.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            body.truncate(512);
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let response = self.http.get(self.url(path)).query(query).send().await?;
        Self::decode(response).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        Self::decode(response).await
    }

    async fn patch_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.http.patch(self.url(path)).json(body).send().await?;
        Self::decode(response).await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let response = self.http.delete(self.url(path)).send().await?;
        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            body.truncate(512);
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    // ===== Dashboard =====

    pub async fn dashboard_resumo(&self) -> Result<DashboardResumo, ApiError> {
        self.get_json("dashboard/resumo/", &[]).await
    }

    // ===== Clientes =====

    pub async fn list_clientes(&self, filtro: &ClienteFiltro) -> Result<Page<Cliente>, ApiError> {
        let mut query = vec![
            ("page", filtro.page.max(1).to_string()),
            ("page_size", filtro.page_size.to_string()),
        ];
        if let Some(razao_social) = &filtro.razao_social {
            query.push(("razao_social", razao_social.clone()));
        }
        self.get_json("clientes/", &query).await
    }

    /// Free-text search used by the cliente selector
    pub async fn search_clientes(
        &self,
        razao_social: &str,
        page_size: u32,
    ) -> Result<Page<Cliente>, ApiError> {
        let query = [
            ("razao_social", razao_social.to_string()),
            ("page_size", page_size.to_string()),
        ];
        self.get_json("clientes/", &query).await
    }

    pub async fn get_cliente(&self, id: i64) -> Result<Cliente, ApiError> {
        self.get_json(&format!("clientes/{}/", id), &[]).await
    }

    pub async fn create_cliente(&self, payload: &ClientePayload) -> Result<Cliente, ApiError> {
        self.post_json("clientes/", payload).await
    }

    pub async fn update_cliente(
        &self,
        id: i64,
        payload: &ClientePayload,
    ) -> Result<Cliente, ApiError> {
        self.patch_json(&format!("clientes/{}/", id), payload).await
    }

    pub async fn delete_cliente(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("clientes/{}/", id)).await
    }

    // ===== Orçamentos =====

    pub async fn list_orcamentos(
        &self,
        filtro: &OrcamentoFiltro,
    ) -> Result<Page<Orcamento>, ApiError> {
        let mut query = vec![
            ("page", filtro.page.max(1).to_string()),
            ("page_size", filtro.page_size.to_string()),
        ];
        if let Some(status) = filtro.status {
            query.push(("status", status.as_str().to_string()));
        }
        self.get_json("orcamentos/", &query).await
    }

    pub async fn get_orcamento(&self, id: i64) -> Result<Orcamento, ApiError> {
        self.get_json(&format!("orcamentos/{}/", id), &[]).await
    }

    pub async fn create_orcamento(
        &self,
        payload: &OrcamentoPayload,
    ) -> Result<Orcamento, ApiError> {
        self.post_json("orcamentos/", payload).await
    }

    pub async fn update_orcamento(
        &self,
        id: i64,
        payload: &OrcamentoPayload,
    ) -> Result<Orcamento, ApiError> {
        self.patch_json(&format!("orcamentos/{}/", id), payload)
            .await
    }

    pub async fn delete_orcamento(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("orcamentos/{}/", id)).await
    }

    pub async fn atualizar_status(
        &self,
        id: i64,
        status: OrcamentoStatus,
    ) -> Result<Orcamento, ApiError> {
        let body = serde_json::json!({ "status": status });
        self.patch_json(&format!("orcamentos/{}/atualizar_status/", id), &body)
            .await
    }

    /// Download the server-rendered PDF for an orçamento
    pub async fn gerar_pdf(&self, id: i64) -> Result<Vec<u8>, ApiError> {
        let response = self
            .http
            .get(self.url(&format!("orcamentos/{}/gerar_pdf/", id)))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            body.truncate(512);
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.bytes().await?.to_vec())
    }

    // ===== Configurações =====

    /// Company configuration of the current user
    pub async fn get_configuracao(&self) -> Result<ConfiguracaoEmpresa, ApiError> {
        self.get_json("configuracoes-empresa/atual/", &[]).await
    }

    /// Save the company configuration.
    ///
    /// Field data goes as JSON when there is no new logomarca; with one, the
    /// whole update becomes a multipart form so the PNG can ride along.
    pub async fn update_configuracao(
        &self,
        id: i64,
        payload: &ConfiguracaoPayload,
        logomarca: Option<&ExportedAsset>,
    ) -> Result<ConfiguracaoEmpresa, ApiError> {
        let path = format!("configuracoes-empresa/{}/", id);

        let Some(asset) = logomarca else {
            return self.patch_json(&path, payload).await;
        };

        let mut form = multipart::Form::new();
        let fields = serde_json::to_value(payload)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        if let serde_json::Value::Object(map) = fields {
            for (name, value) in map {
                let text = match value {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                form = form.text(name, text);
            }
        }

        let part = multipart::Part::bytes(asset.bytes.clone())
            .file_name(asset.file_name.clone())
            .mime_str("image/png")?;
        form = form.part("logomarca", part);

        let response = self
            .http
            .patch(self.url(&path))
            .multipart(form)
            .send()
            .await?;
        Self::decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let api = ApiClient::new("http://localhost:8000/api/").unwrap();
        assert_eq!(api.url("/clientes/"), "http://localhost:8000/api/clientes/");
        assert_eq!(api.url("clientes/"), "http://localhost:8000/api/clientes/");
    }
}

//! Error types shared across the application.

use thiserror::Error;

/// Errors raised while talking to the remote backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connection refused, timeout, TLS)
    #[error("falha de conexão com o backend: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success HTTP status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be decoded into the expected shape
    #[error("resposta inválida do backend: {0}")]
    Decode(String),
}

/// Errors raised by the crop/rasterization pipeline.
#[derive(Debug, Error)]
pub enum CropError {
    /// The crop region is empty or falls entirely outside the image
    #[error("área de recorte vazia ou fora da imagem")]
    EmptyRegion,

    /// Encoding the output PNG failed
    #[error("falha ao gerar PNG: {0}")]
    Image(#[from] image::ImageError),
}

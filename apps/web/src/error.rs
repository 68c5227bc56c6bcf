//! Error types for the web app.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use barber_core::{CoreError, ValidationError};
use barber_db::DbError;
use tracing::{error, warn};

use crate::render;

/// Web errors.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::Validation(_) => StatusCode::BAD_REQUEST,
            WebError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            WebError::Forbidden(_) => StatusCode::FORBIDDEN,
            WebError::NotFound(_) => StatusCode::NOT_FOUND,
            WebError::Database(_) | WebError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text safe to show in the page.
    fn public_message(&self) -> String {
        match self {
            WebError::Validation(err) => err.to_string(),
            WebError::Unauthorized(_) => "Sessão inválida".to_string(),
            WebError::Forbidden(_) => "Acesso restrito ao administrador".to_string(),
            WebError::NotFound(_) => "Registro não encontrado".to_string(),
            WebError::Database(_) | WebError::Internal(_) => "Erro interno".to_string(),
        }
    }
}

impl From<DbError> for WebError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => WebError::NotFound(format!("{} {}", entity, id)),
            other => WebError::Database(other.to_string()),
        }
    }
}

impl From<CoreError> for WebError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(v) => WebError::Validation(v),
            CoreError::InvalidCredentials => WebError::Unauthorized(err.to_string()),
            CoreError::Forbidden { .. } => WebError::Forbidden(err.to_string()),
            CoreError::Csv(msg) => WebError::Internal(msg),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            warn!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let page = render::error_page(status, &self.public_message());
        (status, Html(page.into_string())).into_response()
    }
}

pub type WebResult<T> = Result<T, WebError>;

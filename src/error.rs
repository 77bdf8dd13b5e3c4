use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    /// Ownership failures look exactly like missing rows.
    #[error("{0}")]
    NotFoundOrUnauthorized(&'static str),

    #[error("unauthorized")]
    Unauthorized,

    #[error("{0}")]
    Conflict(String),

    #[error("identity provider responded with {status}")]
    Upstream {
        status: StatusCode,
        body: Option<Value>,
    },

    #[error("invariant violated: {0}")]
    Invariant(String),

    #[error(transparent)]
    Store(#[from] sqlx::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::NotFoundOrUnauthorized(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Upstream { status, .. } => *status,
            AppError::Invariant(_) | AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::Upstream { body, .. } => {
                body.unwrap_or_else(|| json!({ "error": "bad_gateway" }))
            }
            AppError::Store(e) => {
                warn!("store failure: {}", e);
                json!({ "error": "internal_error" })
            }
            AppError::Invariant(msg) => {
                warn!("invariant violation: {}", msg);
                json!({ "error": "internal_error" })
            }
            other => json!({ "error": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_taxonomy_to_status_codes() {
        assert_eq!(
            AppError::validation("bad radius").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFoundOrUnauthorized("Hospital not found or unauthorized").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(AppError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::Store(sqlx::Error::RowNotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Upstream {
                status: StatusCode::BAD_GATEWAY,
                body: None
            }
            .status(),
            StatusCode::BAD_GATEWAY
        );
    }
}

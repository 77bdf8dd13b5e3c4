use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::error::AppError;
use crate::services::identity_service;

pub const SESSION_COOKIE_NAME: &str = "bloodbank_session_token";

#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub id: String,
    pub email: Option<String>,
}

/// Session token from the session cookie, falling back to a bearer header.
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    let prefix = format!("{}=", SESSION_COOKIE_NAME);
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|hv| hv.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .map(str::trim)
        .find_map(|c| c.strip_prefix(prefix.as_str()))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string());

    from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|hv| hv.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| t.to_string())
    })
}

pub async fn require_auth(mut request: Request, next: Next) -> Response {
    let Some(token) = extract_session_token(request.headers()) else {
        return AppError::Unauthorized.into_response();
    };

    match identity_service::current_user(&token).await {
        Ok(user) => {
            request.extensions_mut().insert(AuthenticatedUser {
                id: user.id,
                email: user.email,
            });
            next.run(request).await
        }
        Err(AppError::Unauthorized) => AppError::Unauthorized.into_response(),
        Err(e) => {
            warn!("🔐 Session lookup failed: {}", e);
            e.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn reads_session_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; bloodbank_session_token=abc123; lang=en"),
        );
        assert_eq!(extract_session_token(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn falls_back_to_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer tok"));
        assert_eq!(extract_session_token(&headers).as_deref(), Some("tok"));
    }

    #[test]
    fn empty_cookie_is_no_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("bloodbank_session_token="),
        );
        assert_eq!(extract_session_token(&headers), None);
    }
}

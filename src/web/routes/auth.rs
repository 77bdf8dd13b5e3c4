use axum::{
    extract::rejection::JsonRejection,
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    Extension, Json,
};
use cookie::{time::Duration, Cookie, SameSite};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::error::{AppError, AppResult};
use crate::services::identity_service;
use crate::web::middleware::auth::{extract_session_token, AuthenticatedUser, SESSION_COOKIE_NAME};

const SESSION_MAX_AGE_DAYS: i64 = 60;

#[derive(Debug, Deserialize)]
pub struct SessionBody {
    code: String,
}

fn session_cookie(value: String, max_age: Duration) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE_NAME, value);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(true);
    cookie.set_same_site(SameSite::None);
    cookie.set_max_age(max_age);
    cookie
}

fn with_cookie(mut response: Response, cookie: Cookie<'static>) -> AppResult<Response> {
    let value = cookie
        .to_string()
        .parse::<HeaderValue>()
        .map_err(|_| AppError::Invariant("session cookie is not a valid header".to_string()))?;
    response.headers_mut().append(header::SET_COOKIE, value);
    Ok(response)
}

pub async fn oauth_redirect_url_handler() -> AppResult<Json<serde_json::Value>> {
    let redirect_url = identity_service::oauth_redirect_url("google").await?;
    Ok(Json(json!({ "redirectUrl": redirect_url })))
}

pub async fn create_session_handler(
    body: Result<Json<SessionBody>, JsonRejection>,
) -> AppResult<Response> {
    let Json(body) = body.map_err(|e| AppError::validation(e.body_text()))?;
    if body.code.trim().is_empty() {
        return Err(AppError::validation("code is required"));
    }

    let token = identity_service::exchange_code_for_session_token(body.code.trim()).await?;
    let cookie = session_cookie(token, Duration::days(SESSION_MAX_AGE_DAYS));
    with_cookie(Json(json!({ "success": true })).into_response(), cookie)
}

pub async fn me_handler(Extension(auth_user): Extension<AuthenticatedUser>) -> Json<serde_json::Value> {
    Json(json!({ "id": auth_user.id, "email": auth_user.email }))
}

pub async fn logout_handler(headers: HeaderMap) -> AppResult<Response> {
    if let Some(token) = extract_session_token(&headers) {
        // The cookie is cleared either way.
        if let Err(e) = identity_service::delete_session(&token).await {
            warn!("🔐 Upstream session delete failed: {}", e);
        }
    }

    let cookie = session_cookie(String::new(), Duration::ZERO);
    with_cookie(Json(json!({ "success": true })).into_response(), cookie)
}

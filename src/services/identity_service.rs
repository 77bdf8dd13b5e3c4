use axum::http::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IdentityUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RedirectUrlResponse {
    #[serde(alias = "redirectUrl")]
    redirect_url: String,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    #[serde(alias = "sessionToken")]
    session_token: String,
}

fn identity_base_url() -> String {
    std::env::var("IDENTITY_API_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string())
}

fn api_key_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Some(value) = std::env::var("IDENTITY_API_KEY")
        .ok()
        .and_then(|key| HeaderValue::from_str(&key).ok())
    {
        headers.insert("x-api-key", value);
    }
    headers
}

fn bearer_headers(token: &str) -> Result<HeaderMap, AppError> {
    let mut headers = api_key_headers();
    let auth_value =
        HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| AppError::Unauthorized)?;
    headers.insert(AUTHORIZATION, auth_value);
    Ok(headers)
}

fn connect_failed(url: &str, err: impl ToString) -> AppError {
    warn!("🔐 Identity provider unreachable at {}: {}", url, err.to_string());
    AppError::Upstream {
        status: StatusCode::BAD_GATEWAY,
        body: Some(serde_json::json!({
            "error": "connect_failed",
            "detail": err.to_string(),
        })),
    }
}

fn endpoint(path: &str) -> String {
    format!("{}{}", identity_base_url().trim_end_matches('/'), path)
}

async fn read_json(url: &str, resp: reqwest::Response) -> Result<Value, AppError> {
    let status = StatusCode::from_u16(resp.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let body: Option<Value> = resp.json().await.ok();
    if !status.is_success() {
        warn!("🔐 Identity provider {} returned {}", url, status);
        return Err(AppError::Upstream { status, body });
    }
    body.ok_or_else(|| connect_failed(url, "empty or non-JSON body"))
}

pub async fn oauth_redirect_url(provider: &str) -> Result<String, AppError> {
    let url = endpoint(&format!("/oauth/{}/redirect_url", provider));
    let resp = reqwest::Client::new()
        .get(&url)
        .headers(api_key_headers())
        .send()
        .await
        .map_err(|e| connect_failed(&url, e))?;

    let body = read_json(&url, resp).await?;
    let parsed: RedirectUrlResponse =
        serde_json::from_value(body).map_err(|e| connect_failed(&url, e))?;
    Ok(parsed.redirect_url)
}

pub async fn exchange_code_for_session_token(code: &str) -> Result<String, AppError> {
    let url = endpoint("/sessions");
    let resp = reqwest::Client::new()
        .post(&url)
        .headers(api_key_headers())
        .json(&serde_json::json!({ "code": code }))
        .send()
        .await
        .map_err(|e| connect_failed(&url, e))?;

    let body = read_json(&url, resp).await?;
    let parsed: SessionResponse =
        serde_json::from_value(body).map_err(|e| connect_failed(&url, e))?;
    Ok(parsed.session_token)
}

/// Resolves a session token. Any non-success answer means "not logged in".
pub async fn current_user(session_token: &str) -> Result<IdentityUser, AppError> {
    let url = endpoint("/users/me");
    let resp = reqwest::Client::new()
        .get(&url)
        .headers(bearer_headers(session_token)?)
        .send()
        .await
        .map_err(|e| connect_failed(&url, e))?;

    if resp.status() == reqwest::StatusCode::UNAUTHORIZED
        || resp.status() == reqwest::StatusCode::FORBIDDEN
        || resp.status() == reqwest::StatusCode::NOT_FOUND
    {
        return Err(AppError::Unauthorized);
    }

    let body = read_json(&url, resp).await?;
    serde_json::from_value(body).map_err(|e| connect_failed(&url, e))
}

pub async fn delete_session(session_token: &str) -> Result<(), AppError> {
    let url = endpoint("/sessions");
    let resp = reqwest::Client::new()
        .delete(&url)
        .headers(bearer_headers(session_token)?)
        .send()
        .await
        .map_err(|e| connect_failed(&url, e))?;

    if !resp.status().is_success() {
        let status =
            StatusCode::from_u16(resp.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
        return Err(AppError::Upstream { status, body: None });
    }
    Ok(())
}

use dotenvy::dotenv;
use std::env;
use std::net::SocketAddr;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use bloodbank::database;
use bloodbank::web;

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let Ok(db_url) = env::var("DATABASE_URL") else {
        error!("DATABASE_URL must be set (e.g. sqlite://bloodbank.db)");
        std::process::exit(1);
    };
    info!("Connecting to database: {}", db_url);

    let pool = match database::connect(&db_url).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Cannot open database {}: {}", db_url, e);
            std::process::exit(1);
        }
    };

    let allow_origin = env::var("CORS_ALLOW_ORIGIN").ok();
    let app = web::build_app(pool, allow_origin.as_deref());

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);

    let addr: SocketAddr = match format!("{}:{}", host, port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Invalid HOST/PORT {}:{}: {}", host, port, e);
            std::process::exit(1);
        }
    };

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            let fallback = SocketAddr::new(addr.ip(), port.saturating_add(1));
            warn!(
                "Could not bind {}: {}. Trying fallback {}",
                addr, e, fallback
            );
            match tokio::net::TcpListener::bind(fallback).await {
                Ok(l) => l,
                Err(e) => {
                    error!("Could not bind fallback {}: {}", fallback, e);
                    std::process::exit(1);
                }
            }
        }
    };

    match listener.local_addr() {
        Ok(bound) => info!("🚀 Blood bank API listening on http://{}", bound),
        Err(e) => warn!("Listening, but local address unavailable: {}", e),
    }

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

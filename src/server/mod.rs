//! Record store server: a REST API over SQLite.
//!
//! # Configuration
//!
//! Environment variables:
//! - `ESTOQUE_PORT`: Port to listen on (default: 8080)
//! - `ESTOQUE_DATABASE_PATH`: SQLite database file
//!   (default: ~/.local/share/estoque-server/estoque.db)
//!
//! # Endpoints
//!
//! - `GET /health`
//! - `GET|POST /api/produtos`, `PUT|DELETE /api/produtos/{id}`
//! - `GET|POST /api/clientes`, `PUT|DELETE /api/clientes/{id}`
//! - `GET|POST /api/usuarios`, `PUT|DELETE /api/usuarios/{id}`

mod error;
mod handlers;

pub use error::{ApiError, ServerError};

use axum::{
    routing::{get, put},
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::db::{ClientRepository, ProductRepository, UserRepository};

/// Server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,
    /// SQLite database file
    pub database_path: PathBuf,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    pub fn from_env_with<F>(env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = env("ESTOQUE_PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let database_path = env("ESTOQUE_DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::data_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("estoque-server")
                    .join("estoque.db")
            });

        Self {
            port,
            database_path,
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    products: Arc<ProductRepository>,
    clients: Arc<ClientRepository>,
    users: Arc<UserRepository>,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            products: Arc::new(ProductRepository::new(pool.clone())),
            clients: Arc::new(ClientRepository::new(pool.clone())),
            users: Arc::new(UserRepository::new(pool)),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Builds the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/produtos",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/api/produtos/{id}",
            put(handlers::update_product).delete(handlers::delete_product),
        )
        .route(
            "/api/clientes",
            get(handlers::list_clients).post(handlers::create_client),
        )
        .route(
            "/api/clientes/{id}",
            put(handlers::update_client).delete(handlers::delete_client),
        )
        .route(
            "/api/usuarios",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route(
            "/api/usuarios/{id}",
            put(handlers::update_user).delete(handlers::delete_user),
        )
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

/// Serves the API on `listener` until the task is dropped.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Listening on {}", addr);
    }
    axum::serve(listener, router(state)).await
}

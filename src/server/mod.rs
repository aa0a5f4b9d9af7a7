// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// HTTP SERVER
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `POST /analyze` - Análise multidisciplinar de um relatório médico
//!
//! CORS liberado para qualquer origem.
//!
//! ## Uso
//!
//! ```bash
//! cargo run -- --port=5000
//! cargo run -- --port=5000 --secret=minha-chave
//! ```

#[allow(missing_docs)]
pub mod types;
#[allow(missing_docs)]
pub mod handlers;
mod auth;

use axum::Router;
use std::sync::Arc;

use crate::agents::MedicalTeam;

pub use types::*;

/// Estado compartilhado entre todos os handlers
pub struct AppState {
    /// Equipe de agentes (cliente LLM + configuração do pipeline)
    pub team: MedicalTeam,
    /// Token de autenticação opcional (Bearer)
    pub secret: Option<String>,
}

/// Monta o router com CORS permissivo e auth opcional.
pub fn build_router(state: Arc<AppState>) -> Router {
    use axum::{
        middleware,
        routing::{get, post},
    };
    use tower_http::cors::CorsLayer;

    let routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/analyze", post(handlers::analyze));

    let routes = if state.secret.is_some() {
        routes.layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ))
    } else {
        routes
    };

    routes.layer(CorsLayer::permissive()).with_state(state)
}

/// Inicia o servidor HTTP no endereço especificado (`host:port`).
pub async fn start_server(bind: &str, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    log::info!("MedAgentX server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ENDPOINT HANDLERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

use super::types::*;
use super::AppState;
use crate::agents::PipelineError;
use crate::types::Report;

// ── GET /health ─────────────────────────────────

/// Health check endpoint
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

// ── POST /analyze ───────────────────────────────

/// Executa os três especialistas e a síntese sobre `report`.
///
/// - relatório ausente/vazio → 400 `{"error": "Empty report text"}`
/// - JSON inválido → 400, sem Content-Type JSON → 415
/// - JSON válido com formato errado (`{"report": 123}`, array) → 500
/// - falha do LLM em um agente → 200 com `"Error"` no campo
/// - qualquer outra falha → 500 com a mensagem
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            let status = rejection_status(&rejection);
            log::warn!("[analyze] Body inválido ({}): {}", status, rejection.body_text());
            return error_response(status, &rejection.body_text());
        }
    };

    let report = match body.report.and_then(Report::parse) {
        Some(report) => report,
        None => {
            return error_response(
                StatusCode::BAD_REQUEST,
                &PipelineError::EmptyReport.to_string(),
            )
        }
    };

    let request_id = uuid::Uuid::new_v4();
    log::info!(
        "[analyze] {} iniciando análise ({} chars)",
        request_id,
        report.as_str().len()
    );

    let team = state.team.clone();
    match tokio::spawn(async move { team.analyze(&report).await }).await {
        Ok(Ok(analysis)) => {
            log::info!("[analyze] {} concluída", request_id);
            Json(AnalysisResponse::from(&analysis)).into_response()
        }
        Ok(Err(e)) => {
            log::error!("[analyze] {} falhou: {}", request_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
        Err(e) => {
            let message = join_error_message(e);
            log::error!("[analyze] {} task panicked: {}", request_id, message);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &message)
        }
    }
}

// ── Helpers ─────────────────────────────────────

/// Um body que é JSON mas não tem o formato do request é falha do handler (500),
/// não erro de validação.
fn rejection_status(rejection: &JsonRejection) -> StatusCode {
    match rejection {
        JsonRejection::JsonDataError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        JsonRejection::JsonSyntaxError(_) => StatusCode::BAD_REQUEST,
        other => other.status(),
    }
}

/// Mensagem do panic quando disponível, senão o `Display` do `JoinError`.
fn join_error_message(error: tokio::task::JoinError) -> String {
    if !error.is_panic() {
        return error.to_string();
    }
    let payload = error.into_panic();
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic payload".to_string()
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ApiError::new(message))).into_response()
}

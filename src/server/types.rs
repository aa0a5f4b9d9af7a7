// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SCHEMAS API
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#![allow(missing_docs)]

use serde::{Deserialize, Serialize};

pub use crate::types::AnalysisResponse;

// ─────────────────────────────────────────────────
// Analyze Request
// ─────────────────────────────────────────────────

/// Request para POST /analyze
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeRequest {
    /// Ausente ou null são tratados como relatório vazio
    #[serde(default)]
    pub report: Option<String>,
}

// ─────────────────────────────────────────────────
// Error Response
// ─────────────────────────────────────────────────

/// Resposta de erro da API: `{"error": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_request_missing_and_null() {
        let req: AnalyzeRequest = serde_json::from_str("{}").unwrap();
        assert!(req.report.is_none());

        let req: AnalyzeRequest = serde_json::from_str(r#"{"report": null}"#).unwrap();
        assert!(req.report.is_none());

        let req: AnalyzeRequest =
            serde_json::from_str(r#"{"report": "BP 150/95", "extra": 1}"#).unwrap();
        assert_eq!(req.report.as_deref(), Some("BP 150/95"));
    }

    #[test]
    fn test_api_error_shape() {
        let json = serde_json::to_string(&ApiError::new("Empty report text")).unwrap();
        assert_eq!(json, r#"{"error":"Empty report text"}"#);
    }
}

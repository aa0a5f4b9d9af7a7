//! # MedAgentX - Análise médica multidisciplinar
//!
//! Recebe um relatório médico em texto livre e produz quatro textos:
//! três opiniões de especialistas (cardiologia, psicologia, pneumologia)
//! e um resumo multidisciplinar construído a partir dessas três opiniões.
//!
//! ## Fluxo
//!
//! ```text
//! relatório ─┬─▶ Cardiologist ──┐
//!            ├─▶ Psychologist ──┼─▶ MultidisciplinaryTeam ─▶ resposta
//!            └─▶ Pulmonologist ─┘
//! ```
//!
//! Cada agente faz uma única chamada de completion. Uma falha do LLM não
//! interrompe a análise: a opinião vira o texto `"Error"` e a síntese roda
//! mesmo assim.
//!
//! ## Exemplo de Uso
//!
//! ```rust,ignore
//! use medagentx::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let llm = Arc::new(GroqClient::from_config(&load_llm_config()?));
//!     let team = MedicalTeam::new(llm, PipelineConfig::default());
//!     let analysis = team.analyze_text("Chest pain and shortness of breath").await?;
//!     println!("{}", analysis.summary.text());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Tipos fundamentais: papéis, relatório, opiniões e resposta.
pub mod types;

/// Templates de prompt por papel e o construtor que os preenche.
///
/// Campos ausentes falham com [`prompts::TemplateError`] por padrão;
/// `PROMPT_MISSING_FIELDS=empty` reativa a substituição por vazio.
pub mod prompts;

/// Clientes para Large Language Models (LLMs).
///
/// Define a trait `LlmClient` e implementações para:
/// - Groq (API compatível com OpenAI)
/// - Mock para testes
pub mod llm;

/// Agente parametrizado por papel e a equipe que orquestra os quatro agentes.
pub mod agents;

/// Utilitários diversos (medição de tempo).
pub mod utils;

/// Configuração do LLM, servidor e pipeline.
///
/// **LLM:**
/// - `GROQ_API_KEY`: Chave da API (obrigatória)
/// - `LLM_MODEL`: Modelo (padrão: "llama-3.1-8b-instant")
/// - `LLM_API_BASE_URL`: URL base (padrão: "https://api.groq.com/openai/v1")
///
/// **Servidor:**
/// - `SERVER_HOST`: Host (padrão: "127.0.0.1")
/// - `SERVER_PORT` ou `PORT`: Porta (padrão: 5000)
/// - `SERVER_SECRET`: Token Bearer opcional
///
/// **Pipeline:**
/// - `PIPELINE_MODE`: "sequential" (padrão) ou "parallel"
/// - `PROMPT_MISSING_FIELDS`: "fail" (padrão) ou "empty"
pub mod config;

/// Servidor HTTP (axum).
#[cfg(feature = "server")]
pub mod server;

// Re-exports principais
pub use agents::{Agent, MedicalTeam, PipelineError};
pub use config::{
    install_panic_hook, load_llm_config, load_pipeline_config, load_server_config, ConfigError,
    ExecutionMode, LlmConfig, PipelineConfig, ServerConfig,
};
pub use llm::{GroqClient, LlmClient, LlmError, MockLlmClient};
pub use prompts::{MissingFieldPolicy, PromptBuilder, PromptValues, TemplateError};
pub use types::*;

/// Versão da biblioteca.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude com imports comuns para uso rápido.
pub mod prelude {
    pub use crate::agents::{Agent, MedicalTeam, PipelineError};
    pub use crate::config::{load_llm_config, ExecutionMode, PipelineConfig};
    pub use crate::llm::{GroqClient, LlmClient, LlmError};
    pub use crate::prompts::{MissingFieldPolicy, PromptBuilder, PromptValues};
    pub use crate::types::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}

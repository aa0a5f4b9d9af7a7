// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// AGENTES MÉDICOS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Um único tipo de agente, parametrizado por Role. O papel escolhe o
// template; os valores vêm do relatório ou das três opiniões.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

mod team;

pub use team::*;

use crate::llm::LlmClient;
use crate::prompts::{PromptBuilder, PromptValues, TemplateError};
use crate::types::{AgentOutcome, Opinion, Role};
use crate::utils::ActionTimer;

/// Agente que faz exatamente uma chamada de completion.
#[derive(Debug, Clone)]
pub struct Agent {
    role: Role,
    values: PromptValues,
}

impl Agent {
    /// Agente especialista sobre o relatório
    pub fn specialist(role: Role, report: impl Into<String>) -> Self {
        Self {
            role,
            values: PromptValues::for_report(report),
        }
    }

    /// Agente de síntese sobre as três opiniões (texto exato, incluindo "Error")
    pub fn synthesis(
        cardiologist: impl Into<String>,
        psychologist: impl Into<String>,
        pulmonologist: impl Into<String>,
    ) -> Self {
        Self {
            role: Role::MultidisciplinaryTeam,
            values: PromptValues::for_team(cardiologist, psychologist, pulmonologist),
        }
    }

    /// Agente com valores arbitrários
    pub fn with_values(role: Role, values: PromptValues) -> Self {
        Self { role, values }
    }

    /// Papel do agente
    pub fn role(&self) -> Role {
        self.role
    }

    /// Prompt que será enviado
    pub fn prompt(&self, builder: &PromptBuilder) -> Result<String, TemplateError> {
        builder.build(self.role, &self.values)
    }

    /// Executa o agente.
    ///
    /// Erro de template é propagado. Erro do LLM não: vira
    /// [`AgentOutcome::Failed`] e a análise continua.
    pub async fn run(
        &self,
        llm: &dyn LlmClient,
        builder: &PromptBuilder,
    ) -> Result<Opinion, TemplateError> {
        let prompt = self.prompt(builder)?;
        let timer = ActionTimer::start(format!("[agent] {}", self.role));

        let outcome = match llm.complete(&prompt).await {
            Ok(text) => AgentOutcome::Completed(text),
            Err(e) => {
                log::error!("[agent] Error running agent ({}): {}", self.role, e);
                AgentOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };

        timer.stop_and_log();
        Ok(Opinion::new(self.role, outcome))
    }
}

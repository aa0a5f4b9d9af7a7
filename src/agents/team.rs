// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// EQUIPE MULTIDISCIPLINAR
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::sync::Arc;

use super::Agent;
use crate::config::{ExecutionMode, PipelineConfig};
use crate::llm::LlmClient;
use crate::prompts::{PromptBuilder, TemplateError};
use crate::types::{Opinion, Report, Role, TeamAnalysis};
use crate::utils::ActionTimer;

/// Falhas que interrompem a análise (não incluem falhas do LLM)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("Empty report text")]
    EmptyReport,

    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Orquestra os três especialistas e a síntese.
///
/// A síntese só começa depois que os três especialistas retornaram,
/// com sucesso ou com o placeholder `"Error"`.
///
/// # Exemplo
///
/// ```rust,ignore
/// let team = MedicalTeam::new(llm, PipelineConfig::default());
/// let report = Report::parse("Shortness of breath, palpitations").unwrap();
/// let analysis = team.analyze(&report).await?;
/// println!("{}", analysis.summary.text());
/// ```
#[derive(Clone)]
pub struct MedicalTeam {
    llm: Arc<dyn LlmClient>,
    config: PipelineConfig,
}

impl MedicalTeam {
    /// Cria a equipe sobre o cliente LLM dado
    pub fn new(llm: Arc<dyn LlmClient>, config: PipelineConfig) -> Self {
        Self { llm, config }
    }

    /// Configuração em uso
    pub fn config(&self) -> PipelineConfig {
        self.config
    }

    /// Valida o texto e executa a análise completa
    pub async fn analyze_text(&self, text: &str) -> Result<TeamAnalysis, PipelineError> {
        let report = Report::parse(text).ok_or(PipelineError::EmptyReport)?;
        self.analyze(&report).await
    }

    /// Executa os especialistas e, em seguida, a síntese
    pub async fn analyze(&self, report: &Report) -> Result<TeamAnalysis, PipelineError> {
        let builder = PromptBuilder::new(self.config.missing_fields);
        let timer = ActionTimer::start(format!("[team] análise ({})", self.config.mode));

        let (cardiologist, psychologist, pulmonologist) =
            self.run_specialists(report, &builder).await?;

        let synthesis = Agent::synthesis(
            cardiologist.text(),
            psychologist.text(),
            pulmonologist.text(),
        );
        let summary = synthesis.run(self.llm.as_ref(), &builder).await?;

        let analysis = TeamAnalysis {
            cardiologist,
            psychologist,
            pulmonologist,
            summary,
        };

        let failed = analysis.failed_count();
        if failed > 0 {
            log::warn!("[team] {} de 4 agentes retornaram \"Error\"", failed);
        }
        timer.stop_and_log();

        Ok(analysis)
    }

    async fn run_specialists(
        &self,
        report: &Report,
        builder: &PromptBuilder,
    ) -> Result<(Opinion, Opinion, Opinion), TemplateError> {
        let llm = self.llm.as_ref();
        let [cardio, psycho, pulmo] =
            Role::SPECIALISTS.map(|role| Agent::specialist(role, report.as_str()));

        match self.config.mode {
            ExecutionMode::Sequential => {
                let c = cardio.run(llm, builder).await?;
                let p = psycho.run(llm, builder).await?;
                let pu = pulmo.run(llm, builder).await?;
                Ok((c, p, pu))
            }
            ExecutionMode::Parallel => {
                let (c, p, pu) = futures::join!(
                    cardio.run(llm, builder),
                    psycho.run(llm, builder),
                    pulmo.run(llm, builder),
                );
                Ok((c?, p?, pu?))
            }
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TIPOS FUNDAMENTAIS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Papéis médicos, resultados de agentes e a resposta agregada da equipe.
// Todos os valores vivem apenas durante uma requisição.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use serde::{Deserialize, Serialize};
use std::fmt;

/// Texto colocado no lugar de uma opinião cuja chamada ao LLM falhou.
pub const ERROR_PLACEHOLDER: &str = "Error";

/// Relatório médico de entrada.
///
/// Texto opaco. A única validação é "não vazio após trim"; o texto
/// original (sem trim) é o que vai para os prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report(String);

impl Report {
    /// Retorna None se o texto for vazio ou só espaços
    pub fn parse(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            None
        } else {
            Some(Self(text))
        }
    }

    /// Texto do relatório
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Papel de um agente na análise.
///
/// Três papéis especialistas fixos e um papel de síntese que consome
/// as três opiniões.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Especialista em causas cardíacas
    Cardiologist,
    /// Especialista em fatores de saúde mental
    Psychologist,
    /// Especialista em causas respiratórias
    Pulmonologist,
    /// Equipe multidisciplinar que sintetiza as três opiniões
    MultidisciplinaryTeam,
}

impl Role {
    /// Os três especialistas, na ordem em que são executados.
    pub const SPECIALISTS: [Role; 3] = [Role::Cardiologist, Role::Psychologist, Role::Pulmonologist];

    /// Retorna true para os três papéis especialistas.
    pub fn is_specialist(&self) -> bool {
        !matches!(self, Role::MultidisciplinaryTeam)
    }

    /// Chave usada no JSON de resposta.
    pub fn response_key(&self) -> &'static str {
        match self {
            Role::Cardiologist => "cardiologist",
            Role::Psychologist => "psychologist",
            Role::Pulmonologist => "pulmonologist",
            Role::MultidisciplinaryTeam => "summary",
        }
    }

    /// Nome legível para logs.
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Cardiologist => "Cardiologist",
            Role::Psychologist => "Psychologist",
            Role::Pulmonologist => "Pulmonologist",
            Role::MultidisciplinaryTeam => "MultidisciplinaryTeam",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Resultado de uma única execução de agente.
///
/// A falha é explícita aqui, mas na resposta HTTP e no prompt de síntese
/// ela continua aparecendo como o texto [`ERROR_PLACEHOLDER`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentOutcome {
    /// Texto da completion, sem nenhum processamento
    Completed(String),
    /// A chamada ao LLM falhou
    Failed {
        /// Mensagem do erro original
        error: String,
    },
}

impl AgentOutcome {
    /// Texto a ser exposto: a completion ou o placeholder de erro.
    pub fn text(&self) -> &str {
        match self {
            AgentOutcome::Completed(text) => text,
            AgentOutcome::Failed { .. } => ERROR_PLACEHOLDER,
        }
    }

    /// Retorna true se a chamada ao LLM falhou
    pub fn is_failed(&self) -> bool {
        matches!(self, AgentOutcome::Failed { .. })
    }
}

/// Opinião produzida por um agente (especialista ou síntese).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opinion {
    /// Papel que produziu a opinião
    pub role: Role,
    /// Resultado da chamada
    pub outcome: AgentOutcome,
}

impl Opinion {
    /// Cria uma nova opinião
    pub fn new(role: Role, outcome: AgentOutcome) -> Self {
        Self { role, outcome }
    }

    /// Texto da opinião (ou `"Error"`)
    pub fn text(&self) -> &str {
        self.outcome.text()
    }
}

/// As quatro opiniões de uma análise completa.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamAnalysis {
    /// Opinião cardiológica
    pub cardiologist: Opinion,
    /// Opinião psicológica
    pub psychologist: Opinion,
    /// Opinião pneumológica
    pub pulmonologist: Opinion,
    /// Síntese multidisciplinar
    pub summary: Opinion,
}

impl TeamAnalysis {
    /// Quantos agentes (incluindo a síntese) falharam
    pub fn failed_count(&self) -> usize {
        [&self.cardiologist, &self.psychologist, &self.pulmonologist, &self.summary]
            .iter()
            .filter(|o| o.outcome.is_failed())
            .count()
    }
}

/// Resposta plana de `POST /analyze`.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub cardiologist: String,
    pub psychologist: String,
    pub pulmonologist: String,
    pub summary: String,
}

impl From<&TeamAnalysis> for AnalysisResponse {
    fn from(analysis: &TeamAnalysis) -> Self {
        Self {
            cardiologist: analysis.cardiologist.text().to_string(),
            psychologist: analysis.psychologist.text().to_string(),
            pulmonologist: analysis.pulmonologist.text().to_string(),
            summary: analysis.summary.text().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_parse() {
        assert!(Report::parse("").is_none());
        assert!(Report::parse("   \n\t ").is_none());
        let report = Report::parse("  Palpitations at night. ").unwrap();
        assert_eq!(report.as_str(), "  Palpitations at night. ");
    }

    #[test]
    fn test_specialists_are_fixed() {
        assert_eq!(Role::SPECIALISTS.len(), 3);
        assert!(Role::SPECIALISTS.iter().all(|r| r.is_specialist()));
        assert!(!Role::MultidisciplinaryTeam.is_specialist());
    }

    #[test]
    fn test_response_keys() {
        assert_eq!(Role::Cardiologist.response_key(), "cardiologist");
        assert_eq!(Role::Psychologist.response_key(), "psychologist");
        assert_eq!(Role::Pulmonologist.response_key(), "pulmonologist");
        assert_eq!(Role::MultidisciplinaryTeam.response_key(), "summary");
    }

    #[test]
    fn test_failed_outcome_renders_placeholder() {
        let outcome = AgentOutcome::Failed {
            error: "Network error: connection refused".into(),
        };
        assert!(outcome.is_failed());
        assert_eq!(outcome.text(), "Error");

        let ok = AgentOutcome::Completed("• Possible arrhythmia".into());
        assert!(!ok.is_failed());
        assert_eq!(ok.text(), "• Possible arrhythmia");
    }

    #[test]
    fn test_analysis_response_serializes_flat() {
        let analysis = TeamAnalysis {
            cardiologist: Opinion::new(Role::Cardiologist, AgentOutcome::Completed("c".into())),
            psychologist: Opinion::new(
                Role::Psychologist,
                AgentOutcome::Failed { error: "boom".into() },
            ),
            pulmonologist: Opinion::new(Role::Pulmonologist, AgentOutcome::Completed("p".into())),
            summary: Opinion::new(Role::MultidisciplinaryTeam, AgentOutcome::Completed("s".into())),
        };
        assert_eq!(analysis.failed_count(), 1);

        let json = serde_json::to_value(AnalysisResponse::from(&analysis)).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 4);
        assert_eq!(obj["cardiologist"], "c");
        assert_eq!(obj["psychologist"], "Error");
        assert_eq!(obj["pulmonologist"], "p");
        assert_eq!(obj["summary"], "s");
    }
}

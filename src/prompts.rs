// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PROMPTS DOS AGENTES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//!
//! Templates estáticos (um por papel) e o construtor que substitui os
//! placeholders `{nome}` pelos valores da requisição.
//!
//! Os limites de tamanho e formato ("bullet points", "under 100 words")
//! são instruções ao modelo. Nada aqui trunca ou valida a saída do LLM.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::fmt;

use crate::types::Role;

/// Campo usado pelos três especialistas
pub const MEDICAL_REPORT: &str = "medical_report";
/// Opinião do cardiologista embutida na síntese
pub const CARDIOLOGIST_REPORT: &str = "cardiologist_report";
/// Opinião do psicólogo embutida na síntese
pub const PSYCHOLOGIST_REPORT: &str = "psychologist_report";
/// Opinião do pneumologista embutida na síntese
pub const PULMONOLOGIST_REPORT: &str = "pulmonologist_report";

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([a-z_]+)\}").expect("placeholder regex is valid"));

// ============================================================================
// TEMPLATES
// ============================================================================

const CARDIOLOGIST_TEMPLATE: &str = "\
Act as a cardiologist. Review the patient's medical report and identify possible cardiac causes of symptoms. Respond briefly using bullet points with:
• 2–3 possible causes
• 2–3 recommended next steps
Avoid long explanations or extra context.
Medical Report: {medical_report}
";

const PSYCHOLOGIST_TEMPLATE: &str = "\
Act as a psychologist. Review the patient's report and identify likely mental health factors affecting well-being. Respond concisely with bullet points for:
• 2–3 possible psychological issues
• 2–3 recommended next steps
Keep it short and factual.
Patient's Report: {medical_report}
";

const PULMONOLOGIST_TEMPLATE: &str = "\
Act as a pulmonologist. Review the patient's report and summarize likely respiratory concerns. Respond in bullet points with:
• 2–3 possible respiratory issues
• 2–3 next steps
Keep total length under 100 words.
Patient's Report: {medical_report}
";

const TEAM_TEMPLATE: &str = "\
Act as a multidisciplinary medical team (Cardiologist, Psychologist, Pulmonologist). Review the three reports below and summarize in under 120 words. Return only three bullet points, each describing:
• A possible health issue
• One brief reason based on the reports

Cardiologist Report: {cardiologist_report}
Psychologist Report: {psychologist_report}
Pulmonologist Report: {pulmonologist_report}
";

/// Template e campos obrigatórios de um papel
#[derive(Debug, Clone, Copy)]
pub struct TemplateSpec {
    /// Texto do template com placeholders `{campo}`
    pub template: &'static str,
    /// Campos que precisam estar presentes em [`PromptValues`]
    pub required: &'static [&'static str],
}

/// Tabela papel → template. Fixa em tempo de compilação.
pub fn template_for(role: Role) -> TemplateSpec {
    match role {
        Role::Cardiologist => TemplateSpec {
            template: CARDIOLOGIST_TEMPLATE,
            required: &[MEDICAL_REPORT],
        },
        Role::Psychologist => TemplateSpec {
            template: PSYCHOLOGIST_TEMPLATE,
            required: &[MEDICAL_REPORT],
        },
        Role::Pulmonologist => TemplateSpec {
            template: PULMONOLOGIST_TEMPLATE,
            required: &[MEDICAL_REPORT],
        },
        Role::MultidisciplinaryTeam => TemplateSpec {
            template: TEAM_TEMPLATE,
            required: &[CARDIOLOGIST_REPORT, PSYCHOLOGIST_REPORT, PULMONOLOGIST_REPORT],
        },
    }
}

// ============================================================================
// VALORES E ERROS
// ============================================================================

/// Erros de construção de prompt
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("Missing template field '{field}' for role {role}")]
    MissingField { role: Role, field: &'static str },
}

/// O que fazer quando um campo obrigatório não foi fornecido.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingFieldPolicy {
    /// Retorna [`TemplateError::MissingField`]
    #[default]
    Fail,
    /// Substitui por string vazia (compatibilidade com o comportamento antigo)
    Empty,
}

impl MissingFieldPolicy {
    /// Converte o valor do .env. "empty" (case-insensitive) → Empty, o resto → Fail.
    pub fn from_env(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "empty" => Self::Empty,
            _ => Self::Fail,
        }
    }
}

impl fmt::Display for MissingFieldPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fail => write!(f, "fail"),
            Self::Empty => write!(f, "empty"),
        }
    }
}

/// Valores nomeados para substituição
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptValues {
    values: BTreeMap<&'static str, String>,
}

impl PromptValues {
    /// Conjunto vazio
    pub fn new() -> Self {
        Self::default()
    }

    /// Adiciona (ou substitui) um valor
    pub fn with(mut self, field: &'static str, value: impl Into<String>) -> Self {
        self.values.insert(field, value.into());
        self
    }

    /// Valores de um especialista
    pub fn for_report(report: impl Into<String>) -> Self {
        Self::new().with(MEDICAL_REPORT, report)
    }

    /// Valores da síntese
    pub fn for_team(
        cardiologist: impl Into<String>,
        psychologist: impl Into<String>,
        pulmonologist: impl Into<String>,
    ) -> Self {
        Self::new()
            .with(CARDIOLOGIST_REPORT, cardiologist)
            .with(PSYCHOLOGIST_REPORT, psychologist)
            .with(PULMONOLOGIST_REPORT, pulmonologist)
    }

    /// Busca um valor
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }
}

// ============================================================================
// CONSTRUTOR
// ============================================================================

/// Monta o texto final enviado ao modelo.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder {
    policy: MissingFieldPolicy,
}

impl PromptBuilder {
    /// Construtor com a política informada
    pub fn new(policy: MissingFieldPolicy) -> Self {
        Self { policy }
    }

    /// Política em uso
    pub fn policy(&self) -> MissingFieldPolicy {
        self.policy
    }

    /// Substitui os placeholders do template de `role`.
    ///
    /// Valores inseridos não são reprocessados: um relatório contendo
    /// `{medical_report}` aparece literalmente no prompt.
    pub fn build(&self, role: Role, values: &PromptValues) -> Result<String, TemplateError> {
        let spec = template_for(role);

        for &field in spec.required {
            if values.get(field).is_none() {
                match self.policy {
                    MissingFieldPolicy::Fail => {
                        return Err(TemplateError::MissingField { role, field });
                    }
                    MissingFieldPolicy::Empty => {
                        log::warn!("[prompt] {} sem campo '{}', usando vazio", role, field);
                    }
                }
            }
        }

        let prompt = PLACEHOLDER.replace_all(spec.template, |caps: &Captures<'_>| {
            values.get(&caps[1]).unwrap_or_default().to_string()
        });

        Ok(prompt.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    const ALL_ROLES: [Role; 4] = [
        Role::Cardiologist,
        Role::Psychologist,
        Role::Pulmonologist,
        Role::MultidisciplinaryTeam,
    ];

    #[test]
    fn test_placeholders_match_required_fields() {
        for role in ALL_ROLES {
            let spec = template_for(role);
            let found: BTreeSet<&str> = PLACEHOLDER
                .captures_iter(spec.template)
                .map(|c| c.get(1).unwrap().as_str())
                .collect();
            let required: BTreeSet<&str> = spec.required.iter().copied().collect();
            assert_eq!(found, required, "template mismatch for {}", role);
        }
    }

    #[test]
    fn test_specialist_prompt_contains_report() {
        let builder = PromptBuilder::default();
        let report = "58-year-old with chest tightness and shortness of breath on exertion.";
        for role in Role::SPECIALISTS {
            let prompt = builder.build(role, &PromptValues::for_report(report)).unwrap();
            assert!(prompt.contains(report));
            assert!(!prompt.contains("{medical_report}"));
        }
    }

    #[test]
    fn test_team_prompt_embeds_all_three() {
        let builder = PromptBuilder::default();
        let values = PromptValues::for_team("CARDIO-OUT", "PSYCHO-OUT", "PULMO-OUT");
        let prompt = builder.build(Role::MultidisciplinaryTeam, &values).unwrap();
        assert!(prompt.contains("Cardiologist Report: CARDIO-OUT"));
        assert!(prompt.contains("Psychologist Report: PSYCHO-OUT"));
        assert!(prompt.contains("Pulmonologist Report: PULMO-OUT"));
    }

    #[test]
    fn test_missing_field_fails_by_default() {
        let builder = PromptBuilder::default();
        let err = builder.build(Role::Cardiologist, &PromptValues::new()).unwrap_err();
        assert_eq!(
            err,
            TemplateError::MissingField {
                role: Role::Cardiologist,
                field: MEDICAL_REPORT,
            }
        );

        let partial = PromptValues::new()
            .with(CARDIOLOGIST_REPORT, "a")
            .with(PULMONOLOGIST_REPORT, "c");
        let err = builder.build(Role::MultidisciplinaryTeam, &partial).unwrap_err();
        assert_eq!(
            err,
            TemplateError::MissingField {
                role: Role::MultidisciplinaryTeam,
                field: PSYCHOLOGIST_REPORT,
            }
        );
    }

    #[test]
    fn test_missing_field_empty_policy() {
        let builder = PromptBuilder::new(MissingFieldPolicy::Empty);
        let partial = PromptValues::new().with(CARDIOLOGIST_REPORT, "a");
        let prompt = builder.build(Role::MultidisciplinaryTeam, &partial).unwrap();
        assert!(prompt.contains("Cardiologist Report: a\n"));
        assert!(prompt.contains("Psychologist Report: \n"));
        assert!(prompt.contains("Pulmonologist Report: \n"));
    }

    #[test]
    fn test_inserted_values_are_not_rescanned() {
        let builder = PromptBuilder::default();
        let report = "literal {medical_report} and {cardiologist_report}";
        let prompt = builder
            .build(Role::Pulmonologist, &PromptValues::for_report(report))
            .unwrap();
        assert!(prompt.contains(report));
    }

    #[test]
    fn test_policy_from_env() {
        assert_eq!(MissingFieldPolicy::from_env("empty"), MissingFieldPolicy::Empty);
        assert_eq!(MissingFieldPolicy::from_env(" EMPTY "), MissingFieldPolicy::Empty);
        assert_eq!(MissingFieldPolicy::from_env("fail"), MissingFieldPolicy::Fail);
        assert_eq!(MissingFieldPolicy::from_env("whatever"), MissingFieldPolicy::Fail);
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CONFIGURAÇÃO DO LLM, SERVIDOR E PIPELINE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Todas as configurações podem ser definidas via .env
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::fmt;

use crate::prompts::MissingFieldPolicy;

/// Modelo padrão de completion
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
/// Endpoint padrão (Groq, compatível com OpenAI)
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
/// Host padrão do servidor
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Porta padrão do servidor
pub const DEFAULT_PORT: u16 = 5000;

/// Erros de configuração
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} não encontrada. Defina no .env ou no ambiente")]
    MissingVar(&'static str),

    #[error("Valor inválido para {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Como os três especialistas são executados.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Um após o outro (comportamento padrão)
    #[default]
    Sequential,
    /// Os três ao mesmo tempo; a síntese espera todos
    Parallel,
}

impl ExecutionMode {
    /// "parallel" (case-insensitive) → Parallel, qualquer outro valor → Sequential
    pub fn from_env(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "parallel" => Self::Parallel,
            _ => Self::Sequential,
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequential => write!(f, "sequential"),
            Self::Parallel => write!(f, "parallel"),
        }
    }
}

/// Configuração do provedor LLM
#[derive(Clone)]
pub struct LlmConfig {
    /// Chave da API (GROQ_API_KEY)
    pub api_key: String,
    /// Modelo de completion
    pub model: String,
    /// URL base da API
    pub base_url: String,
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &"***")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Configuração do servidor HTTP
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host de bind
    pub host: String,
    /// Porta de bind
    pub port: u16,
    /// Token Bearer opcional
    pub secret: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            secret: None,
        }
    }
}

impl ServerConfig {
    /// Endereço `host:port`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuração da equipe de agentes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Sequencial ou paralelo
    pub mode: ExecutionMode,
    /// Política para campos ausentes nos templates
    pub missing_fields: MissingFieldPolicy,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Carrega [`LlmConfig`] a partir de uma função de lookup.
///
/// Variáveis:
/// - `GROQ_API_KEY`: obrigatória
/// - `LLM_MODEL`: padrão `llama-3.1-8b-instant`
/// - `LLM_API_BASE_URL`: padrão `https://api.groq.com/openai/v1`
pub fn llm_config_from<F>(var: F) -> Result<LlmConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let api_key = non_empty(var("GROQ_API_KEY")).ok_or(ConfigError::MissingVar("GROQ_API_KEY"))?;

    let model = match non_empty(var("LLM_MODEL")) {
        Some(model) => {
            log::info!("📦 LLM_MODEL={}", model);
            model
        }
        None => DEFAULT_MODEL.to_string(),
    };

    let base_url = match non_empty(var("LLM_API_BASE_URL")) {
        Some(raw) => {
            let parsed = url::Url::parse(&raw).map_err(|_| ConfigError::InvalidValue {
                name: "LLM_API_BASE_URL",
                value: raw.clone(),
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigError::InvalidValue {
                    name: "LLM_API_BASE_URL",
                    value: raw,
                });
            }
            log::info!("📦 LLM_API_BASE_URL={}", raw);
            raw
        }
        None => DEFAULT_BASE_URL.to_string(),
    };

    Ok(LlmConfig {
        api_key,
        model,
        base_url,
    })
}

/// Carrega [`ServerConfig`] a partir de uma função de lookup.
///
/// Variáveis: `SERVER_HOST`, `SERVER_PORT` (ou `PORT`), `SERVER_SECRET`.
pub fn server_config_from<F>(var: F) -> Result<ServerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = ServerConfig::default();

    if let Some(host) = non_empty(var("SERVER_HOST")) {
        log::info!("📦 SERVER_HOST={}", host);
        config.host = host;
    }

    if let Some(port_str) = non_empty(var("SERVER_PORT")).or_else(|| non_empty(var("PORT"))) {
        config.port = parse_port(&port_str)?;
        log::info!("📦 SERVER_PORT={}", config.port);
    }

    if let Some(secret) = non_empty(var("SERVER_SECRET")) {
        log::info!("📦 SERVER_SECRET definido (auth Bearer ativo)");
        config.secret = Some(secret);
    }

    Ok(config)
}

/// Carrega [`PipelineConfig`]: `PIPELINE_MODE` e `PROMPT_MISSING_FIELDS`.
pub fn pipeline_config_from<F>(var: F) -> PipelineConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = PipelineConfig::default();

    if let Some(mode) = non_empty(var("PIPELINE_MODE")) {
        config.mode = ExecutionMode::from_env(&mode);
        log::info!("📦 PIPELINE_MODE={}", config.mode);
    }

    if let Some(policy) = non_empty(var("PROMPT_MISSING_FIELDS")) {
        config.missing_fields = MissingFieldPolicy::from_env(&policy);
        log::info!("📦 PROMPT_MISSING_FIELDS={}", config.missing_fields);
    }

    config
}

/// Converte a porta, rejeitando 0 e valores fora de u16
pub fn parse_port(value: &str) -> Result<u16, ConfigError> {
    match value.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(ConfigError::InvalidValue {
            name: "SERVER_PORT",
            value: value.to_string(),
        }),
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// [`llm_config_from`] lendo do ambiente do processo
pub fn load_llm_config() -> Result<LlmConfig, ConfigError> {
    llm_config_from(env_var)
}

/// [`server_config_from`] lendo do ambiente do processo
pub fn load_server_config() -> Result<ServerConfig, ConfigError> {
    server_config_from(env_var)
}

/// [`pipeline_config_from`] lendo do ambiente do processo
pub fn load_pipeline_config() -> PipelineConfig {
    pipeline_config_from(env_var)
}

/// Instala panic hook que registra o panic via `log` e depois chama o hook
/// original (que continua escrevendo no stderr).
///
/// A task que entrou em panic termina com `JoinError`, que o handler
/// transforma em 500.
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let thread = std::thread::current();
        let thread_name = thread.name().unwrap_or("unnamed");

        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_else(|| "unknown location".to_string());

        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic payload".to_string()
        };

        log::error!("[PANIC] Thread {} at {}: {}", thread_name, location, message);

        original_hook(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_llm_config_requires_key() {
        let err = llm_config_from(vars(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("GROQ_API_KEY")));

        let err = llm_config_from(vars(&[("GROQ_API_KEY", "   ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("GROQ_API_KEY")));
    }

    #[test]
    fn test_llm_config_defaults() {
        let config = llm_config_from(vars(&[("GROQ_API_KEY", "gsk_test")])).unwrap();
        assert_eq!(config.api_key, "gsk_test");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(!format!("{:?}", config).contains("gsk_test"));
    }

    #[test]
    fn test_llm_config_overrides() {
        let config = llm_config_from(vars(&[
            ("GROQ_API_KEY", "k"),
            ("LLM_MODEL", "llama-3.3-70b-versatile"),
            ("LLM_API_BASE_URL", "http://localhost:8080/v1"),
        ]))
        .unwrap();
        assert_eq!(config.model, "llama-3.3-70b-versatile");
        assert_eq!(config.base_url, "http://localhost:8080/v1");
    }

    #[test]
    fn test_llm_config_rejects_bad_url() {
        let err = llm_config_from(vars(&[("GROQ_API_KEY", "k"), ("LLM_API_BASE_URL", "not a url")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: "LLM_API_BASE_URL", .. }));

        let err = llm_config_from(vars(&[("GROQ_API_KEY", "k"), ("LLM_API_BASE_URL", "ftp://x/y")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_server_config() {
        let config = server_config_from(vars(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_address(), "127.0.0.1:5000");

        let config = server_config_from(vars(&[
            ("SERVER_HOST", "0.0.0.0"),
            ("PORT", "8080"),
            ("SERVER_SECRET", "s3cret"),
        ]))
        .unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.secret.as_deref(), Some("s3cret"));

        let config =
            server_config_from(vars(&[("SERVER_PORT", "9000"), ("PORT", "8080")])).unwrap();
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn test_parse_port() {
        assert_eq!(parse_port("5000").unwrap(), 5000);
        assert!(parse_port("0").is_err());
        assert!(parse_port("70000").is_err());
        assert!(parse_port("abc").is_err());
    }

    #[test]
    fn test_pipeline_config() {
        assert_eq!(pipeline_config_from(vars(&[])), PipelineConfig::default());

        let config = pipeline_config_from(vars(&[
            ("PIPELINE_MODE", "Parallel"),
            ("PROMPT_MISSING_FIELDS", "empty"),
        ]));
        assert_eq!(config.mode, ExecutionMode::Parallel);
        assert_eq!(config.missing_fields, MissingFieldPolicy::Empty);
    }

    #[test]
    fn test_panic_hook_chains_previous_hook() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;

        let called = Arc::new(AtomicBool::new(false));
        let flag = called.clone();
        std::panic::set_hook(Box::new(move |_| flag.store(true, Ordering::SeqCst)));

        install_panic_hook();
        let result = std::panic::catch_unwind(|| panic!("hook chain"));

        // volta ao hook padrão
        let _ = std::panic::take_hook();

        assert!(result.is_err());
        assert!(called.load(Ordering::SeqCst));
    }

    #[test]
    fn test_execution_mode_from_env() {
        assert_eq!(ExecutionMode::from_env("parallel"), ExecutionMode::Parallel);
        assert_eq!(ExecutionMode::from_env("sequential"), ExecutionMode::Sequential);
        assert_eq!(ExecutionMode::from_env("anything"), ExecutionMode::Sequential);
    }
}

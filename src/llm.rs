// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CLIENTE LLM
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Trait e implementações para chamadas de completion.
// Provedor real: Groq (API compatível com OpenAI Chat Completions).
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::config::LlmConfig;

/// Temperatura usada em todas as chamadas. Não é configurável.
pub const COMPLETION_TEMPERATURE: f32 = 1.0;

/// Erros do cliente LLM
#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limit exceeded")]
    RateLimitError,

    #[error("Invalid response format: {0}")]
    ParseError(String),

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Trait principal para clientes LLM
///
/// Uma chamada = um prompt de usuário → um texto de completion.
/// Modelo e temperatura são fixados na construção do cliente.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Envia o prompt e retorna o texto gerado
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;

    /// Identificador do modelo usado
    fn model(&self) -> &str;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IMPLEMENTAÇÃO MOCK PARA TESTES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Comportamento do [`MockLlmClient`]
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Responde com o próprio prompt
    Echo,
    /// Responde sempre o mesmo texto
    Fixed(String),
    /// Falha sempre com o erro dado
    Fail(LlmError),
    /// Consome respostas em ordem; quando acabam, falha
    Script(Vec<Result<String, LlmError>>),
}

/// Cliente mock que registra todos os prompts recebidos
#[derive(Debug)]
pub struct MockLlmClient {
    behavior: MockBehavior,
    script: Mutex<VecDeque<Result<String, LlmError>>>,
    prompts: Mutex<Vec<String>>,
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new(MockBehavior::Fixed("Mock completion".into()))
    }
}

impl MockLlmClient {
    /// Cria um mock com o comportamento dado
    pub fn new(behavior: MockBehavior) -> Self {
        let script = match &behavior {
            MockBehavior::Script(items) => items.iter().cloned().collect(),
            _ => VecDeque::new(),
        };
        Self {
            behavior,
            script: Mutex::new(script),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Mock que devolve o prompt
    pub fn echo() -> Self {
        Self::new(MockBehavior::Echo)
    }

    /// Mock que devolve sempre `text`
    pub fn fixed(text: impl Into<String>) -> Self {
        Self::new(MockBehavior::Fixed(text.into()))
    }

    /// Mock que sempre falha
    pub fn failing() -> Self {
        Self::new(MockBehavior::Fail(LlmError::NetworkError(
            "mock upstream unavailable".into(),
        )))
    }

    /// Prompts recebidos, em ordem de chegada
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    /// Número de chamadas recebidas
    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        match &self.behavior {
            MockBehavior::Echo => Ok(prompt.to_string()),
            MockBehavior::Fixed(text) => Ok(text.clone()),
            MockBehavior::Fail(err) => Err(err.clone()),
            MockBehavior::Script(_) => self
                .script
                .lock()
                .ok()
                .and_then(|mut s| s.pop_front())
                .unwrap_or_else(|| Err(LlmError::ApiError("Mock script exhausted".into()))),
        }
    }

    fn model(&self) -> &str {
        "mock"
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IMPLEMENTAÇÃO GROQ (OpenAI-compatible)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Cliente para a API de chat completions da Groq
pub struct GroqClient {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GroqClient {
    /// Cria o cliente a partir da configuração carregada do ambiente
    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl LlmClient for GroqClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: COMPLETION_TEMPERATURE,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimitError);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError(format!("{}: {}", status, body)));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::ParseError(e.to_string()))?;

        completion_text(chat)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Texto de `choices[0].message.content`
fn completion_text(chat: ChatResponse) -> Result<String, LlmError> {
    let choice = chat
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::ParseError("response has no choices".into()))?;
    choice
        .message
        .content
        .ok_or_else(|| LlmError::ParseError("first choice has no message content".into()))
}

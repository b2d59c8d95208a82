//! Azure OpenAI chat-completions client.
//!
//! Issues one synchronous request per call and returns the plain-text
//! completion. The transport shells out to `curl` with a JSON body; there is
//! no streaming, retrying, or rate limiting — the analyzer calls this once
//! per failure and absorbs any error into a placeholder analysis.
//!
//! # Configuration
//!
//! Settings come from environment variables (see [`crate::config`]):
//! - `AZURE_OPENAI_ENDPOINT`: resource endpoint URL
//! - `AZURE_OPENAI_API_KEY`: API key
//! - `AZURE_OPENAI_DEPLOYMENT_NAME`: deployment (model) name
//! - `AZURE_OPENAI_API_VERSION`: REST API version

use std::process::Command;

use crate::config;

/// Result type for LLM operations
pub type LlmResult<T> = Result<T, LlmError>;

/// Errors that can occur during LLM operations
#[derive(Debug)]
pub enum LlmError {
    /// Failed to reach the endpoint
    ConnectionFailed(String),
    /// The service returned an error body
    Api(String),
    /// Response was not in the expected shape
    InvalidResponse(String),
    /// IO error spawning the transport
    Io(std::io::Error),
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            LlmError::Api(msg) => write!(f, "API error: {}", msg),
            LlmError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
            LlmError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for LlmError {}

impl From<std::io::Error> for LlmError {
    fn from(e: std::io::Error) -> Self {
        LlmError::Io(e)
    }
}

/// Configuration for the Azure OpenAI client
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Resource endpoint URL (e.g. `https://my-resource.openai.azure.com`)
    pub endpoint: String,
    /// API key
    pub api_key: String,
    /// Deployment (model) name
    pub deployment: String,
    /// REST API version
    pub api_version: String,
    /// Connection timeout (seconds)
    pub connect_timeout: u64,
    /// Max completion tokens (0 = omitted from the request)
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        let cfg = config::get();
        Self {
            endpoint: cfg.azure.endpoint.clone(),
            api_key: cfg.azure.api_key.clone(),
            deployment: cfg.azure.deployment.clone(),
            api_version: cfg.azure.api_version.clone(),
            connect_timeout: cfg.azure.connect_timeout,
            max_tokens: cfg.azure.max_tokens,
        }
    }
}

impl LlmConfig {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// An explicitly unconfigured backend (no credentials, no network calls)
    pub fn unconfigured() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            deployment: config::DEFAULT_DEPLOYMENT.to_string(),
            api_version: config::DEFAULT_API_VERSION.to_string(),
            connect_timeout: config::DEFAULT_CONNECT_TIMEOUT,
            max_tokens: config::DEFAULT_MAX_TOKENS,
        }
    }

    pub fn deployment(mut self, deployment: impl Into<String>) -> Self {
        self.deployment = deployment.into();
        self
    }

    pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn connect_timeout(mut self, seconds: u64) -> Self {
        self.connect_timeout = seconds;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Whether credentials are present. When false, the analyzer short-circuits
    /// every analysis with a fixed "not configured" result.
    pub fn is_configured(&self) -> bool {
        !self.endpoint.is_empty() && !self.api_key.is_empty()
    }

    /// Full request URL for the chat-completions route of this deployment
    pub fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.deployment,
            self.api_version
        )
    }
}

/// Send one chat-completion request and return the completion text.
///
/// The request carries a system instruction and a user prompt. Any transport
/// or service error surfaces as an [`LlmError`]; the caller decides how to
/// degrade.
pub fn chat_completion(
    config: &LlmConfig,
    system_prompt: &str,
    user_prompt: &str,
) -> LlmResult<String> {
    let mut request = serde_json::json!({
        "messages": [
            {"role": "system", "content": system_prompt},
            {"role": "user", "content": user_prompt}
        ]
    });
    if config.max_tokens > 0 {
        request["max_completion_tokens"] = serde_json::json!(config.max_tokens);
    }

    let request_json = serde_json::to_string(&request)
        .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

    let output = Command::new("curl")
        .args([
            "-s",
            "-X", "POST",
            &config.completions_url(),
            "-H", "Content-Type: application/json",
            "-H", &format!("api-key: {}", config.api_key),
            "-d", &request_json,
            "--connect-timeout", &config.connect_timeout.to_string(),
        ])
        .output()?;

    if !output.status.success() {
        return Err(LlmError::ConnectionFailed(
            String::from_utf8_lossy(&output.stderr).to_string(),
        ));
    }

    parse_completion(&output.stdout)
}

/// Extract the completion text from a chat-completions response body
fn parse_completion(body: &[u8]) -> LlmResult<String> {
    let response: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

    // Azure reports auth/quota problems in an error envelope with 200-shaped
    // bodies from curl's point of view, so check for it explicitly.
    if let Some(message) = response["error"]["message"].as_str() {
        return Err(LlmError::Api(message.to_string()));
    }

    match response["choices"][0]["message"]["content"].as_str() {
        Some(content) if !content.is_empty() => Ok(content.to_string()),
        _ => Err(LlmError::InvalidResponse(
            "response contained no completion content".to_string(),
        )),
    }
}

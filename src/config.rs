//! Configuration management with environment variable support.
//!
//! This module provides centralized configuration for fail-lens, supporting:
//! - Environment variables for all configurable values
//! - Sensible defaults matching the Azure OpenAI service conventions
//! - Builder pattern for programmatic configuration (see [`crate::llm::LlmConfig`])
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `AZURE_OPENAI_ENDPOINT` | Azure OpenAI resource endpoint URL | (unset) |
//! | `AZURE_OPENAI_API_KEY` | API key for the resource | (unset) |
//! | `AZURE_OPENAI_DEPLOYMENT_NAME` | Deployment (model) name | `o3-mini` |
//! | `AZURE_OPENAI_API_VERSION` | REST API version | `2024-12-01-preview` |
//! | `FAIL_LENS_CONNECT_TIMEOUT` | Connection timeout in seconds | `10` |
//! | `FAIL_LENS_MAX_TOKENS` | Max completion tokens (0 = omit) | `0` |
//!
//! The endpoint and API key have no defaults: when either is absent the
//! analyzer runs in "not configured" mode and produces placeholder analyses
//! instead of calling the backend.
//!
//! # Example
//!
//! ```bash
//! export AZURE_OPENAI_ENDPOINT="https://my-resource.openai.azure.com"
//! export AZURE_OPENAI_API_KEY="..."
//! export AZURE_OPENAI_DEPLOYMENT_NAME="gpt-4o"
//! ```

use std::env;
use std::sync::OnceLock;

// ============================================================================
// Default Values
// ============================================================================

/// Default Azure OpenAI deployment name
pub const DEFAULT_DEPLOYMENT: &str = "o3-mini";

/// Default Azure OpenAI API version
pub const DEFAULT_API_VERSION: &str = "2024-12-01-preview";

/// Default connection timeout (seconds)
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 10;

/// Default max completion tokens (0 = let the service decide)
pub const DEFAULT_MAX_TOKENS: u32 = 0;

/// Default output directory for generated reports
pub const DEFAULT_OUTPUT_DIR: &str = "test-failure-explanations";

/// Default Playwright HTML report directory (screenshot fallback lookup)
pub const DEFAULT_PLAYWRIGHT_REPORT_DIR: &str = "playwright-report";

// ============================================================================
// Environment Variable Names
// ============================================================================

/// Environment variable for the Azure OpenAI endpoint
pub const ENV_ENDPOINT: &str = "AZURE_OPENAI_ENDPOINT";

/// Environment variable for the Azure OpenAI API key
pub const ENV_API_KEY: &str = "AZURE_OPENAI_API_KEY";

/// Environment variable for the deployment name
pub const ENV_DEPLOYMENT: &str = "AZURE_OPENAI_DEPLOYMENT_NAME";

/// Environment variable for the API version
pub const ENV_API_VERSION: &str = "AZURE_OPENAI_API_VERSION";

/// Environment variable for the connection timeout
pub const ENV_CONNECT_TIMEOUT: &str = "FAIL_LENS_CONNECT_TIMEOUT";

/// Environment variable for max completion tokens
pub const ENV_MAX_TOKENS: &str = "FAIL_LENS_MAX_TOKENS";

// ============================================================================
// Configuration Getters (with caching)
// ============================================================================

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Get the global configuration (initialized from environment on first access)
pub fn get() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}

/// Centralized configuration for fail-lens
#[derive(Debug, Clone)]
pub struct Config {
    /// Azure OpenAI settings
    pub azure: AzureSettings,
}

/// Azure OpenAI related settings
#[derive(Debug, Clone)]
pub struct AzureSettings {
    /// Resource endpoint URL (empty = not configured)
    pub endpoint: String,
    /// API key (empty = not configured)
    pub api_key: String,
    /// Deployment name
    pub deployment: String,
    /// REST API version
    pub api_version: String,
    /// Connection timeout (seconds)
    pub connect_timeout: u64,
    /// Max completion tokens (0 = omitted from the request)
    pub max_tokens: u32,
}

impl Config {
    /// Create configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            azure: AzureSettings::from_env(),
        }
    }

    /// Create configuration with all defaults (ignoring environment)
    pub fn defaults() -> Self {
        Self {
            azure: AzureSettings::defaults(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

impl AzureSettings {
    /// Create Azure settings from environment variables
    pub fn from_env() -> Self {
        Self {
            endpoint: env::var(ENV_ENDPOINT).unwrap_or_default(),
            api_key: env::var(ENV_API_KEY).unwrap_or_default(),
            deployment: env::var(ENV_DEPLOYMENT)
                .unwrap_or_else(|_| DEFAULT_DEPLOYMENT.to_string()),
            api_version: env::var(ENV_API_VERSION)
                .unwrap_or_else(|_| DEFAULT_API_VERSION.to_string()),
            connect_timeout: env::var(ENV_CONNECT_TIMEOUT)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT),
            max_tokens: env::var(ENV_MAX_TOKENS)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_TOKENS),
        }
    }

    /// Create Azure settings with defaults (no credentials)
    pub fn defaults() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            deployment: DEFAULT_DEPLOYMENT.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

use clap::Parser;
use std::time::Duration;

use crate::error::ConfigError;
use crate::rate_limit::Policy;

// CLI argument structure; every flag can also come from the environment
#[derive(Parser, Debug, Clone)]
#[command(name = "summarize-gateway")]
#[command(about = "Rate limited text summarization API in front of Ollama")]
pub struct Args {
    // Address to bind
    #[arg(long, env = "GATEWAY_HOST", default_value = "0.0.0.0")]
    pub host: String,

    // Port to run the server on
    #[arg(short, long, env = "GATEWAY_PORT", default_value_t = 8000)]
    pub port: u16,

    // Rate limit max requests per window, per client
    #[arg(long, env = "RATE_LIMIT_MAX_REQUESTS", default_value_t = 10)]
    pub rate_limit: usize,

    // Rate limit sliding window in seconds
    #[arg(long, env = "RATE_LIMIT_WINDOW_SECS", default_value_t = 120)]
    pub rate_window: u64,

    // Idle client sweep interval in seconds (0 disables)
    #[arg(long, env = "RATE_LIMIT_SWEEP_SECS", default_value_t = 60)]
    pub sweep_interval: u64,

    // Ollama server url
    #[arg(short, long, env = "OLLAMA_HOST", default_value = "http://localhost:11434")]
    pub ollama_url: String,

    // Bearer token for hosted Ollama
    #[arg(long, env = "OLLAMA_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    // Model used for summaries
    #[arg(short, long, env = "OLLAMA_MODEL", default_value = "llama3.2")]
    pub model: String,

    // Inference request timeout in seconds
    #[arg(long, env = "OLLAMA_TIMEOUT_SECS", default_value_t = 60)]
    pub inference_timeout: u64,

    // Log level, overridden by RUST_LOG
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    // Emit JSON log lines
    #[arg(long, env = "LOG_JSON")]
    pub log_json: bool,
}

impl Args {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rate_window == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        if self.inference_timeout == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        reqwest::Url::parse(&self.ollama_url).map_err(|e| ConfigError::BackendUrl {
            url: self.ollama_url.clone(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    pub fn policy(&self) -> Policy {
        Policy {
            max_requests: self.rate_limit,
            window: Duration::from_secs(self.rate_window),
        }
    }

    pub fn inference_timeout(&self) -> Duration {
        Duration::from_secs(self.inference_timeout)
    }

    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval > 0).then(|| Duration::from_secs(self.sweep_interval))
    }
}

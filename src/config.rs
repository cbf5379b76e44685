use std::net::IpAddr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub max_body_size: usize,
    pub log_level: String,
    pub generation: GenerationConfig,
    pub sync: SyncConfig,
}

#[derive(Clone)]
pub struct GenerationConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub endpoint_model: String,
    pub code_model: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub timeout: Duration,
    pub pull_latency: Duration,
    pub push_latency: Duration,
}

impl std::fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("endpoint_model", &self.endpoint_model)
            .field("code_model", &self.code_model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let host: IpAddr = env_or("STUDIO_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid STUDIO_HOST: {e}"))?;

        let port: u16 = env_or("STUDIO_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid STUDIO_PORT: {e}"))?;

        let max_body_size: usize = env_or("STUDIO_MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid STUDIO_MAX_BODY_SIZE: {e}"))?;

        let log_level = env_or("STUDIO_LOG_LEVEL", "info");

        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .ok()
            .filter(|k| !k.trim().is_empty());

        let generation = GenerationConfig {
            api_key,
            base_url: env_or(
                "STUDIO_GENERATION_BASE_URL",
                "https://generativelanguage.googleapis.com",
            ),
            endpoint_model: env_or("STUDIO_ENDPOINT_MODEL", "gemini-3-pro-preview"),
            code_model: env_or("STUDIO_CODE_MODEL", "gemini-3-flash-preview"),
            timeout: Duration::from_secs(env_parse("STUDIO_GENERATION_TIMEOUT_SECS", 60)?),
        };

        let sync = SyncConfig {
            timeout: Duration::from_secs(env_parse("STUDIO_SYNC_TIMEOUT_SECS", 30)?),
            pull_latency: Duration::from_millis(env_parse("STUDIO_SYNC_PULL_LATENCY_MS", 2000)?),
            push_latency: Duration::from_millis(env_parse("STUDIO_SYNC_PUSH_LATENCY_MS", 1500)?),
        };

        Ok(Config {
            host,
            port,
            max_body_size,
            log_level,
            generation,
            sync,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse(key: &str, default: u64) -> Result<u64, String> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| format!("Invalid {key}: {e}")),
        Err(_) => Ok(default),
    }
}

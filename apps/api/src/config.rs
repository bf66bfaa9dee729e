use anyhow::{bail, Context, Result};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_PORT: u16 = 8787;

/// What the generate endpoint does when the model call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Substitute locally synthesized copy and flag it in the response.
    #[default]
    Server,
    /// Surface the failure as a 500 and leave the fallback to the client.
    Off,
}

impl FallbackPolicy {
    fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "server" | "on" | "true" => Ok(FallbackPolicy::Server),
            "off" | "client" | "false" => Ok(FallbackPolicy::Off),
            other => bail!("GENERATION_FALLBACK must be 'server' or 'off', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// The API key is optional at startup: without it every generate call answers 500.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub port: u16,
    pub rust_log: String,
    pub fallback: FallbackPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            None => DEFAULT_PORT,
        };

        let fallback = match non_empty("GENERATION_FALLBACK") {
            Some(raw) => FallbackPolicy::parse(&raw)?,
            None => FallbackPolicy::default(),
        };

        Ok(Config {
            openai_api_key: non_empty("OPENAI_API_KEY"),
            openai_base_url: non_empty("OPENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            port,
            rust_log: non_empty("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            fallback,
        })
    }
}

use std::env;

use anyhow::{anyhow, Result};

pub const OPENAI_DEFAULT_HOST: &str = "https://api.openai.com";
pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4o";

#[derive(Debug, Clone)]
pub struct OpenAiProviderConfig {
    pub host: String,
    pub api_key: String,
    pub model: String,
}

impl OpenAiProviderConfig {
    pub fn new(host: String, api_key: String, model: String) -> Self {
        Self {
            host,
            api_key,
            model,
        }
    }

    /// Loads the config from the environment. The credential is required;
    /// without it no request is ever attempted.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow!("OPENAI_API_KEY not set. Configure an API key to use codechat."))?;

        let host = env::var("OPENAI_HOST").unwrap_or_else(|_| OPENAI_DEFAULT_HOST.to_string());
        let model = env::var("OPENAI_MODEL").unwrap_or_else(|_| OPENAI_DEFAULT_MODEL.to_string());

        Ok(Self::new(host, api_key, model))
    }
}

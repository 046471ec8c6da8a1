use std::env;

use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub mp_access_token: String,
    pub mp_api_url: String,
    pub base44_api_key: Option<String>,
    pub base44_api_url: String,
    pub webhook_base_url: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("MP_ACCESS_TOKEN não definido! Configure nas variáveis de ambiente.")]
    MissingAccessToken,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Sem o token do provedor nenhuma operação funciona
        let mp_access_token = env::var("MP_ACCESS_TOKEN")
            .ok()
            .filter(|token| !token.is_empty())
            .ok_or(ConfigError::MissingAccessToken)?;

        Ok(Self {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            mp_access_token,
            mp_api_url: env::var("MP_API_URL")
                .unwrap_or_else(|_| "https://api.mercadopago.com".to_string()),
            base44_api_key: env::var("BASE44_API_KEY").ok().filter(|key| !key.is_empty()),
            base44_api_url: env::var("BASE44_API_URL")
                .unwrap_or_else(|_| "https://app.base44.com/api".to_string()),
            webhook_base_url: env::var("WEBHOOK_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        })
    }
}

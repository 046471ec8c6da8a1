use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use thiserror::Error;
use tracing::info;

use crate::app::config::Config;
use crate::models::webhook::{EntityFilter, EntityPatch};

#[derive(Debug, Error)]
pub enum EntityStoreError {
    #[error("BASE44_API_KEY não definido, atualização de entidade ignorada")]
    MissingCredentials,
    #[error("Entity store rejeitou a atualização: HTTP {status}")]
    Rejected { status: u16, body: String },
    #[error("Falha ao comunicar com o entity store: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Seam over the external system of record for payments. Updates are
/// filter-by-identifier, never create, so replays converge.
#[async_trait]
pub trait EntityStoreUpdater: Send + Sync {
    async fn update(&self, filter: &EntityFilter, patch: &EntityPatch)
        -> Result<(), EntityStoreError>;
}

pub struct Base44Client {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl Base44Client {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.base44_api_url.trim_end_matches('/').to_string(),
            api_key: config.base44_api_key.clone(),
        }
    }
}

#[async_trait]
impl EntityStoreUpdater for Base44Client {
    async fn update(
        &self,
        filter: &EntityFilter,
        patch: &EntityPatch,
    ) -> Result<(), EntityStoreError> {
        let api_key = match &self.api_key {
            Some(key) => key,
            None => return Err(EntityStoreError::MissingCredentials),
        };

        let response = self
            .client
            .put(format!("{}/entities/Payment", self.base_url))
            .bearer_auth(api_key)
            .json(&json!({ "filter": filter, "data": patch }))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            info!(
                "Entity store updated: transaction_id={} status={}",
                filter.transaction_id, patch.status
            );
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(EntityStoreError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

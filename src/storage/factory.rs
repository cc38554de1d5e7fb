//! Factory for creating storage clients from configuration.

use super::client::{StorageBrainClient, StorageClient};
use super::error::StorageError;
use crate::config::StorageConfig;
use std::sync::Arc;
use url::Url;

/// Factory for creating storage clients based on configuration.
#[derive(Debug)]
pub struct StorageClientFactory;

impl StorageClientFactory {
    /// Create a storage client.
    ///
    /// Fails with [`StorageError::Configuration`] when the API key is absent
    /// or blank, or when the base URL is not a valid absolute URL. No network
    /// call is made.
    pub fn create(config: &StorageConfig) -> Result<Arc<dyn StorageClient>, StorageError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                StorageError::Configuration(
                    "STORAGE_BRAIN_API_KEY is not set".to_string(),
                )
            })?;

        let base_url = Url::parse(config.base_url.trim()).map_err(|e| {
            StorageError::Configuration(format!(
                "Invalid storage base URL '{}': {e}",
                config.base_url
            ))
        })?;

        tracing::info!(
            name: "storage.client.created",
            base_url = %base_url,
            "Using Storage Brain for uploads and OCR"
        );

        Ok(Arc::new(StorageBrainClient::new(base_url, api_key)))
    }
}

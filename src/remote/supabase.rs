//! Supabase Storage client for the model artifact
//!
//! Objects are keyed by file basename inside a single bucket. The client
//! is an explicitly constructed handle passed in at startup; there is no
//! global instance.

use anyhow::{bail, Context, Result};
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SupabaseConfig;

/// Handle to one Supabase Storage bucket.
#[derive(Debug, Clone)]
pub struct SupabaseStorage {
    client: Client,
    base_url: String,
    api_key: String,
    bucket: String,
}

impl SupabaseStorage {
    /// Build a client from configuration. Returns `None` when the URL or
    /// key is missing, which disables remote sync entirely.
    pub fn from_config(config: &SupabaseConfig) -> Result<Option<Self>> {
        let (Some(url), Some(key)) = (&config.url, &config.key) else {
            return Ok(None);
        };
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Some(Self {
            client,
            base_url: url.trim_end_matches('/').to_string(),
            api_key: key.clone(),
            bucket: config.bucket.clone(),
        }))
    }

    fn object_url(&self, name: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, name)
    }

    /// Upload a local file, keyed by its basename, upserting any
    /// existing object.
    pub async fn upload(&self, path: &Path) -> Result<()> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .context("Artifact path has no file name")?
            .to_string();
        let bytes = tokio::fs::read(path)
            .await
            .context("Failed to read artifact for upload")?;

        let response = self
            .client
            .post(self.object_url(&name))
            .bearer_auth(&self.api_key)
            .header("apikey", &self.api_key)
            .header("x-upsert", "true")
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()
            .await
            .context("Upload request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("Upload of '{}' failed with {}: {}", name, status, body);
        }
        info!("Uploaded model artifact '{}' to bucket '{}'", name, self.bucket);
        Ok(())
    }

    /// Download an object by name, returning its raw bytes.
    pub async fn download(&self, name: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(self.object_url(name))
            .bearer_auth(&self.api_key)
            .header("apikey", &self.api_key)
            .send()
            .await
            .context("Download request failed")?;

        if !response.status().is_success() {
            bail!("Download of '{}' failed with {}", name, response.status());
        }
        let bytes = response
            .bytes()
            .await
            .context("Failed to read download body")?;
        info!("Downloaded model artifact '{}' from bucket '{}'", name, self.bucket);
        Ok(bytes.to_vec())
    }
}

//! Object storage - bucket "uploads" e "avatars"
//!
//! Il corpo binario dei file vive in uno storage S3-compatible; nel database
//! resta solo l'URL pubblico. Senza credenziali si ripiega su URL placeholder
//! così il resto del portale continua a funzionare.

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_credential_types::Credentials;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::config::{Builder as S3ConfigBuilder, Region};
use aws_sdk_s3::primitives::ByteStream;
use lazy_static::lazy_static;
use regex::Regex;

use crate::core::Config;

lazy_static! {
    // Anything that does not survive as an URL path segment collapses to '-'.
    static ref UNSAFE_KEY_CHARS: Regex = Regex::new(r"[^A-Za-z0-9._-]+").unwrap();
}

/// Chiave oggetto: "<folder>/<millis>-<filename>", ripulita.
pub fn object_key(folder: &str, filename: &str, now_millis: i64) -> String {
    let folder = UNSAFE_KEY_CHARS.replace_all(folder.trim(), "-");
    let filename = UNSAFE_KEY_CHARS.replace_all(filename.trim(), "-");
    format!("{}/{}-{}", folder, now_millis, filename)
}

/// URL segnaposto quando lo storage non è configurato o il PUT fallisce,
/// stesso formato della vecchia UI demo.
pub fn placeholder_url(filename: &str) -> String {
    format!(
        "/placeholder.svg?text={}",
        UNSAFE_KEY_CHARS.replace_all(filename.trim(), "-")
    )
}

#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Upload the raw bytes and hand back the public URL.
    /// One best-effort PUT: no retry, no resumable transfer.
    async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<String>;
}

pub struct S3Storage {
    client: S3Client,
    bucket: String,
    public_base: String,
}

impl S3Storage {
    pub fn new(client: S3Client, bucket: impl Into<String>, public_base: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            public_base: public_base.into(),
        }
    }
}

#[async_trait]
impl FileStorage for S3Storage {
    async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<String> {
        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes));

        if let Some(content_type) = content_type {
            request = request.content_type(content_type);
        }

        request
            .send()
            .await
            .context("failed to upload object to storage")?;

        Ok(format!(
            "{}/{}/{}",
            self.public_base.trim_end_matches('/'),
            self.bucket,
            key
        ))
    }
}

/// Backend nullo per la modalità senza storage: nessun byte viene salvato,
/// l'URL restituito è il placeholder.
pub struct PlaceholderStorage;

#[async_trait]
impl FileStorage for PlaceholderStorage {
    async fn upload(
        &self,
        key: &str,
        _bytes: Vec<u8>,
        _content_type: Option<String>,
    ) -> Result<String> {
        // the key still carries the original filename at the end
        let filename = key.rsplit('/').next().unwrap_or(key);
        Ok(placeholder_url(filename))
    }
}

/// Costruisce il client S3 dalle variabili d'ambiente (endpoint custom per
/// provider compatibili, path style forzato).
pub async fn build_client(config: &Config) -> Result<S3Client> {
    let region = Region::new(config.s3_region.clone());
    let region_provider = RegionProviderChain::first_try(Some(region))
        .or_default_provider()
        .or_else("eu-central-1");

    #[allow(deprecated)]
    let mut loader = aws_config::from_env().region(region_provider);

    if let Some(endpoint) = &config.s3_endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }

    if let (Some(access_key), Some(secret_key)) = (
        config.s3_access_key_id.clone(),
        config.s3_secret_access_key.clone(),
    ) {
        let credentials = Credentials::new(access_key, secret_key, None, None, "static");
        loader = loader.credentials_provider(credentials);
    }

    let base_config = loader.load().await;
    let s3_config = S3ConfigBuilder::from(&base_config)
        .force_path_style(true)
        .build();

    Ok(S3Client::from_conf(s3_config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_key_is_url_safe() {
        let key = object_key("Price Lists", "prijslijst 2024 (v2).xlsx", 1700000000000);
        assert_eq!(key, "Price-Lists/1700000000000-prijslijst-2024-v2-.xlsx");
    }

    #[test]
    fn placeholder_url_carries_the_filename() {
        assert_eq!(
            placeholder_url("catalogus.pdf"),
            "/placeholder.svg?text=catalogus.pdf"
        );
    }

    #[tokio::test]
    async fn placeholder_storage_never_touches_the_bytes() {
        let url = PlaceholderStorage
            .upload("Legal/123-contract.pdf", vec![1, 2, 3], None)
            .await
            .unwrap();
        assert_eq!(url, "/placeholder.svg?text=123-contract.pdf");
    }
}

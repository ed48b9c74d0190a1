//! Configuration module
//!
//! Environment-based configuration for the upload core. Storage credentials
//! themselves are assumed pre-configured (picked up by the backend SDK from
//! its own environment); this module only selects the backend and the
//! validation/bucket settings.

use std::env;
use std::str::FromStr;

use anyhow::Context;

use crate::constants::{
    DEFAULT_ALLOWED_CONTENT_TYPES, DEFAULT_MAX_FILE_SIZE_BYTES, UPLOAD_PREFIX,
};
use crate::storage_types::StorageBackend;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub storage_backend: StorageBackend,
    pub bucket: String,
    pub max_file_size_bytes: u64,
    pub allowed_content_types: Vec<String>,
    // Local backend
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // S3 / S3-compatible backend
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => StorageBackend::from_str(&value)?,
            Err(_) => StorageBackend::Local,
        };

        let bucket = env::var("UPLOAD_BUCKET").unwrap_or_else(|_| UPLOAD_PREFIX.to_string());

        let max_file_size_bytes = match env::var("MAX_FILE_SIZE_BYTES") {
            Ok(value) => value
                .parse::<u64>()
                .context("MAX_FILE_SIZE_BYTES must be a non-negative integer")?,
            Err(_) => DEFAULT_MAX_FILE_SIZE_BYTES,
        };

        let allowed_content_types = match env::var("ALLOWED_CONTENT_TYPES") {
            Ok(value) => parse_content_types(&value),
            Err(_) => DEFAULT_ALLOWED_CONTENT_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        };

        let config = Config {
            storage_backend,
            bucket,
            max_file_size_bytes,
            allowed_content_types,
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").ok().or_else(|| env::var("AWS_REGION").ok()),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Cross-field checks: the selected backend must have its settings.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.allowed_content_types.is_empty() {
            anyhow::bail!("ALLOWED_CONTENT_TYPES must not be empty");
        }
        match self.storage_backend {
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    anyhow::bail!("LOCAL_STORAGE_PATH not configured");
                }
                if self.local_storage_base_url.is_none() {
                    anyhow::bail!("LOCAL_STORAGE_BASE_URL not configured");
                }
            }
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    anyhow::bail!("S3_BUCKET not configured");
                }
                if self.s3_region.is_none() {
                    anyhow::bail!("S3_REGION or AWS_REGION not configured");
                }
            }
        }
        Ok(())
    }

    // Convenience getters for common fields
    pub fn storage_backend(&self) -> StorageBackend {
        self.storage_backend
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_bytes
    }

    pub fn allowed_content_types(&self) -> &[String] {
        &self.allowed_content_types
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.local_storage_base_url.as_deref()
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.s3_endpoint.as_deref()
    }
}

impl Default for Config {
    /// Local backend with in-repo defaults; mainly useful for tests and demos.
    fn default() -> Self {
        Config {
            storage_backend: StorageBackend::Local,
            bucket: UPLOAD_PREFIX.to_string(),
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_BYTES,
            allowed_content_types: DEFAULT_ALLOWED_CONTENT_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            local_storage_path: Some("./data/uploads".to_string()),
            local_storage_base_url: Some("http://localhost:3000/uploads".to_string()),
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
        }
    }
}

/// Parse a comma-separated content-type list, dropping empty entries.
fn parse_content_types(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_content_types_splits_and_trims() {
        let types = parse_content_types("image/png, image/jpeg ,application/pdf,");
        assert_eq!(types, vec!["image/png", "image/jpeg", "application/pdf"]);
    }

    #[test]
    fn default_config_validates() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn s3_backend_requires_bucket_and_region() {
        let config = Config {
            storage_backend: StorageBackend::S3,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            storage_backend: StorageBackend::S3,
            s3_bucket: Some("uploads".to_string()),
            s3_region: Some("us-east-1".to_string()),
            ..Config::default()
        };
        config.validate().unwrap();
    }
}

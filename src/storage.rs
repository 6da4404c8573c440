//! Storage locations (S3, R2, GCS, Azure, local filesystem)
//!
//! Both the raw inputs and the output destination are addressed by a location
//! string. A location resolves to an [`ObjectStore`] plus a key prefix inside it.

use crate::config::StorageConfig;
use crate::error::{Error, Result};
use object_store::aws::AmazonS3Builder;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use std::sync::Arc;

/// A resolved storage location
#[derive(Debug, Clone)]
pub struct StorageLocation {
    /// The object store implementation
    store: Arc<dyn ObjectStore>,
    /// Base path prefix within the bucket/container
    prefix: ObjectPath,
    /// Location string as given, for logging
    url: String,
    /// Scheme (s3, r2, gs, az, file, memory)
    scheme: String,
}

impl StorageLocation {
    /// Wrap an existing object store, e.g. an in-memory store in tests
    pub fn new(store: Arc<dyn ObjectStore>, prefix: impl Into<String>, scheme: &str) -> Self {
        let prefix = prefix.into();
        let trimmed = prefix.trim_matches('/');
        Self {
            store,
            prefix: ObjectPath::from(trimmed),
            url: format!("{scheme}://{trimmed}"),
            scheme: scheme.to_string(),
        }
    }

    /// Parse a location string and create the matching object store
    ///
    /// Supported formats:
    /// - `s3://bucket/path/` (also `s3a://`, `s3n://`) - AWS S3
    /// - `r2://bucket/path/` - Cloudflare R2 (S3-compatible)
    /// - `gs://bucket/path/` - Google Cloud Storage
    /// - `az://container/path/` - Azure Blob Storage
    /// - `/local/path/`, `./path/` or `file:///path` - Local filesystem
    ///
    /// With `create_local` set, a missing local directory is created; otherwise
    /// it is reported as a config error.
    pub fn parse(url: &str, storage: &StorageConfig, create_local: bool) -> Result<Self> {
        let (scheme, rest) = match url.split_once("://") {
            Some((scheme, rest)) if scheme != "file" => (scheme, rest),
            _ => return Self::parse_local(url, create_local),
        };

        let (bucket, prefix) = split_bucket(rest);
        if bucket.is_empty() {
            return Err(Error::config(format!("Missing bucket in location: {url}")));
        }

        let store: Arc<dyn ObjectStore> = match scheme {
            "s3" | "s3a" | "s3n" => Arc::new(Self::build_s3(bucket, storage, false)?),
            "r2" => Arc::new(Self::build_s3(bucket, storage, true)?),
            "gs" => Arc::new(
                GoogleCloudStorageBuilder::from_env()
                    .with_bucket_name(bucket)
                    .build()
                    .map_err(|e| Error::config(format!("Failed to create GCS client: {e}")))?,
            ),
            "az" => Arc::new(
                MicrosoftAzureBuilder::from_env()
                    .with_container_name(bucket)
                    .build()
                    .map_err(|e| Error::config(format!("Failed to create Azure client: {e}")))?,
            ),
            other => {
                return Err(Error::config(format!(
                    "Unsupported location scheme '{other}' in {url}"
                )))
            }
        };

        Ok(Self {
            store,
            prefix: ObjectPath::from(prefix),
            url: url.to_string(),
            scheme: scheme.to_string(),
        })
    }

    /// Build an S3 (or R2) client from explicit credentials, falling back to env
    fn build_s3(
        bucket: &str,
        storage: &StorageConfig,
        is_r2: bool,
    ) -> Result<object_store::aws::AmazonS3> {
        let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);

        if let Some(key) = &storage.access_key_id {
            builder = builder.with_access_key_id(key);
        }
        if let Some(secret) = &storage.secret_access_key {
            builder = builder.with_secret_access_key(secret);
        }
        if let Some(token) = &storage.session_token {
            builder = builder.with_token(token);
        }
        if let Some(region) = &storage.region {
            builder = builder.with_region(region);
        }
        if let Some(endpoint) = &storage.endpoint {
            builder = builder.with_endpoint(endpoint);
        } else if is_r2 {
            // R2 endpoint: https://<account_id>.r2.cloudflarestorage.com
            if let Ok(endpoint) = std::env::var("R2_ENDPOINT_URL") {
                builder = builder.with_endpoint(endpoint);
            }
        }
        if storage.allow_http {
            builder = builder.with_allow_http(true);
        }

        builder
            .build()
            .map_err(|e| Error::config(format!("Failed to create S3 client for {bucket}: {e}")))
    }

    /// Parse local filesystem path
    fn parse_local(path: &str, create: bool) -> Result<Self> {
        let path = path.strip_prefix("file://").unwrap_or(path);

        if create {
            std::fs::create_dir_all(path)
                .map_err(|e| Error::config(format!("Failed to create directory {path}: {e}")))?;
        } else if !std::path::Path::new(path).is_dir() {
            return Err(Error::config(format!("Directory does not exist: {path}")));
        }

        let store = LocalFileSystem::new_with_prefix(path)
            .map_err(|e| Error::config(format!("Failed to create local store: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix: ObjectPath::default(),
            url: path.to_string(),
            scheme: "file".to_string(),
        })
    }

    /// The underlying object store
    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// Key prefix inside the store
    pub fn prefix(&self) -> &ObjectPath {
        &self.prefix
    }

    /// The location as given, for logging
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get the scheme (s3, r2, gs, az, file, memory)
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Resolve a path relative to the location prefix
    pub fn child(&self, relative: &str) -> ObjectPath {
        let relative = relative.trim_matches('/');
        if self.prefix.as_ref().is_empty() {
            ObjectPath::from(relative)
        } else if relative.is_empty() {
            self.prefix.clone()
        } else {
            ObjectPath::from(format!("{}/{relative}", self.prefix.as_ref()))
        }
    }

    /// Prefix for listing, `None` when the location is the store root
    pub fn list_prefix(&self) -> Option<&ObjectPath> {
        if self.prefix.as_ref().is_empty() {
            None
        } else {
            Some(&self.prefix)
        }
    }
}

/// Split `bucket/some/prefix/` into `("bucket", "some/prefix")`
fn split_bucket(rest: &str) -> (&str, &str) {
    match rest.find('/') {
        Some(idx) => (&rest[..idx], rest[idx + 1..].trim_matches('/')),
        None => (rest, ""),
    }
}

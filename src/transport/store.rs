//! Object-store access for both pipeline stages.
//!
//! Buckets are resolved through a [`BucketProvider`] so the same client code
//! runs against an S3-compatible service, a local directory, or process memory.
//! [`ObjectStoreClient`] owns a current-thread `tokio` runtime and exposes the
//! blocking `get_object` / `put_object` / `put_file` calls the jobs need.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use bytes::Bytes;
use object_store::ObjectStore;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use tokio::runtime::{Builder as RuntimeBuilder, Runtime};
use tracing::debug;

use crate::config::{StoreBackend, StoreConfig};
use crate::errors::PipelineError;
use crate::types::BucketName;

/// Resolves a bucket name to a store rooted at that bucket.
pub trait BucketProvider: Send + Sync {
    /// Store for bucket `name`; fails with `StoreAccess` when the bucket cannot be reached.
    fn bucket(&self, name: &str) -> Result<Arc<dyn ObjectStore>, PipelineError>;
}

/// S3-compatible buckets; credentials come from the standard AWS environment variables.
pub struct S3BucketProvider {
    config: StoreConfig,
}

impl S3BucketProvider {
    /// Create a provider from connection settings.
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }
}

impl BucketProvider for S3BucketProvider {
    fn bucket(&self, name: &str) -> Result<Arc<dyn ObjectStore>, PipelineError> {
        let mut builder = AmazonS3Builder::from_env()
            .with_bucket_name(name)
            .with_region(&self.config.region);
        if let Some(endpoint) = &self.config.endpoint {
            // Path-style requests for emulators and MinIO-like services.
            builder = builder
                .with_endpoint(endpoint)
                .with_virtual_hosted_style_request(false);
        }
        if self.config.allow_http {
            builder = builder.with_allow_http(true);
        }
        let store = builder
            .build()
            .map_err(|err| PipelineError::store_access(name, "", format!("S3: {err}")))?;
        Ok(Arc::new(store))
    }
}

/// Buckets backed by subdirectories of a local root.
pub struct LocalBucketProvider {
    root: PathBuf,
}

impl LocalBucketProvider {
    /// Create a provider serving `root/<bucket>` directories.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl BucketProvider for LocalBucketProvider {
    fn bucket(&self, name: &str) -> Result<Arc<dyn ObjectStore>, PipelineError> {
        let dir = self.root.join(name);
        if !dir.is_dir() {
            return Err(PipelineError::store_access(
                name,
                "",
                format!("bucket directory {} does not exist", dir.display()),
            ));
        }
        let store = LocalFileSystem::new_with_prefix(&dir).map_err(|err| {
            PipelineError::store_access(name, "", format!("LocalFileSystem: {err}"))
        })?;
        Ok(Arc::new(store))
    }
}

/// Process-local buckets; only explicitly created buckets exist.
#[derive(Default)]
pub struct InMemoryBucketProvider {
    buckets: RwLock<HashMap<BucketName, Arc<InMemory>>>,
}

impl InMemoryBucketProvider {
    /// Create a provider with no buckets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider with the given buckets already present.
    pub fn with_buckets<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<BucketName>,
    {
        let provider = Self::new();
        for name in names {
            provider.create_bucket(name);
        }
        provider
    }

    /// Create an empty bucket; existing buckets are left untouched.
    pub fn create_bucket(&self, name: impl Into<BucketName>) {
        let mut buckets = self
            .buckets
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        buckets
            .entry(name.into())
            .or_insert_with(|| Arc::new(InMemory::new()));
    }
}

impl BucketProvider for InMemoryBucketProvider {
    fn bucket(&self, name: &str) -> Result<Arc<dyn ObjectStore>, PipelineError> {
        let buckets = self
            .buckets
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        buckets
            .get(name)
            .map(|store| store.clone() as Arc<dyn ObjectStore>)
            .ok_or_else(|| PipelineError::store_access(name, "", "no such bucket"))
    }
}

/// Blocking object-store client shared by the unpacker and the curator.
pub struct ObjectStoreClient {
    provider: Arc<dyn BucketProvider>,
    runtime: Runtime,
}

impl ObjectStoreClient {
    /// Create a client over an explicit bucket provider.
    pub fn new(provider: Arc<dyn BucketProvider>) -> Result<Self, PipelineError> {
        let runtime = RuntimeBuilder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| {
                PipelineError::Configuration(format!("failed to create runtime: {err}"))
            })?;
        Ok(Self { provider, runtime })
    }

    /// Create a client for the backend described by `config`.
    pub fn from_config(config: &StoreConfig) -> Result<Self, PipelineError> {
        let provider: Arc<dyn BucketProvider> = match &config.backend {
            StoreBackend::S3 => Arc::new(S3BucketProvider::new(config.clone())),
            StoreBackend::Local { root } => Arc::new(LocalBucketProvider::new(root.clone())),
        };
        Self::new(provider)
    }

    /// Download the full object at `bucket/key`.
    pub fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes, PipelineError> {
        let store = self.provider.bucket(bucket)?;
        let location = object_path(bucket, key)?;
        debug!("[protein_pipeline:store] GET {bucket}/{key}");
        self.runtime.block_on(async {
            let result = store
                .get(&location)
                .await
                .map_err(|err| PipelineError::store_access(bucket, key, err))?;
            result
                .bytes()
                .await
                .map_err(|err| PipelineError::store_access(bucket, key, err))
        })
    }

    /// Write `data` to `bucket/key`, replacing any existing object.
    pub fn put_object(&self, bucket: &str, key: &str, data: Bytes) -> Result<(), PipelineError> {
        let store = self.provider.bucket(bucket)?;
        let location = object_path(bucket, key)?;
        debug!(
            "[protein_pipeline:store] PUT {bucket}/{key} ({} bytes)",
            data.len()
        );
        self.runtime.block_on(async {
            store
                .put(&location, data.into())
                .await
                .map_err(|err| PipelineError::store_access(bucket, key, err))
        })?;
        Ok(())
    }

    /// Upload the local file at `path` to `bucket/key`.
    pub fn put_file(&self, bucket: &str, key: &str, path: &Path) -> Result<(), PipelineError> {
        let data = std::fs::read(path).map_err(|err| PipelineError::filesystem(path, err))?;
        self.put_object(bucket, key, Bytes::from(data))
    }
}

fn object_path(bucket: &str, key: &str) -> Result<ObjectPath, PipelineError> {
    if key.is_empty() {
        return Err(PipelineError::store_access(bucket, key, "object key is empty"));
    }
    ObjectPath::parse(key).map_err(|err| PipelineError::store_access(bucket, key, err))
}

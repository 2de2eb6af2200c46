use std::path::PathBuf;

use crate::constants::curate::{DEFAULT_TOKENIZER_MODEL, MAX_TOKEN_LENGTH};
use crate::constants::store::{DEFAULT_ENDPOINT, DEFAULT_REGION, ENDPOINT_ENV};
use crate::types::{BucketName, ModelId, ObjectKey};

/// Where buckets live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    /// S3-compatible service reached over HTTP(S).
    S3,
    /// Local directory; each bucket is a subdirectory of `root`.
    Local {
        /// Directory holding one subdirectory per bucket.
        root: PathBuf,
    },
}

/// Object-store connection settings shared by both jobs.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Backend kind.
    pub backend: StoreBackend,
    /// Endpoint override for S3-compatible services; `None` uses the provider default.
    pub endpoint: Option<String>,
    /// Region handed to the S3 client.
    pub region: String,
    /// Whether plain-HTTP endpoints are accepted.
    pub allow_http: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::S3,
            endpoint: Some(DEFAULT_ENDPOINT.to_string()),
            region: DEFAULT_REGION.to_string(),
            allow_http: true,
        }
    }
}

impl StoreConfig {
    /// Defaults, with the endpoint taken from `AWS_ENDPOINT_URL` when set.
    pub fn from_env() -> Self {
        let config = Self::default();
        match std::env::var(ENDPOINT_ENV) {
            Ok(endpoint) if !endpoint.trim().is_empty() => config.with_endpoint(endpoint),
            _ => config,
        }
    }

    /// Override the endpoint; plain-HTTP is allowed only for `http://` endpoints.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        self.allow_http = endpoint.starts_with("http://");
        self.endpoint = Some(endpoint);
        self
    }

    /// Drop the endpoint override so the S3 client uses its provider default.
    pub fn without_endpoint(mut self) -> Self {
        self.endpoint = None;
        self.allow_http = false;
        self
    }

    /// Override the region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Serve buckets from subdirectories of `root` instead of S3.
    pub fn with_local_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.backend = StoreBackend::Local { root: root.into() };
        self
    }
}

/// Parameters of one unpacker run.
#[derive(Clone, Debug)]
pub struct UnpackConfig {
    /// Directory containing `train/`, `test/`, and `dev/`.
    pub input_dir: PathBuf,
    /// Destination bucket.
    pub bucket: BucketName,
    /// Destination key for the combined table.
    pub output_key: ObjectKey,
}

impl UnpackConfig {
    /// Create an unpack configuration.
    pub fn new(
        input_dir: impl Into<PathBuf>,
        bucket: impl Into<BucketName>,
        output_key: impl Into<ObjectKey>,
    ) -> Self {
        Self {
            input_dir: input_dir.into(),
            bucket: bucket.into(),
            output_key: output_key.into(),
        }
    }
}

/// Parameters of one curator run.
#[derive(Clone, Debug)]
pub struct CurateConfig {
    /// Staging bucket holding the combined table.
    pub bucket_in: BucketName,
    /// Curated bucket receiving the tokenized table.
    pub bucket_out: BucketName,
    /// Key of the combined table in `bucket_in`.
    pub input_key: ObjectKey,
    /// Key of the curated table in `bucket_out`.
    pub output_key: ObjectKey,
    /// Pretrained tokenizer identifier.
    pub tokenizer_model: ModelId,
    /// Local tokenizer file used instead of the hub when set.
    pub tokenizer_file: Option<PathBuf>,
    /// Number of token columns per row.
    pub max_length: usize,
}

impl CurateConfig {
    /// Create a curate configuration with the default tokenizer and length.
    pub fn new(
        bucket_in: impl Into<BucketName>,
        bucket_out: impl Into<BucketName>,
        input_key: impl Into<ObjectKey>,
        output_key: impl Into<ObjectKey>,
    ) -> Self {
        Self {
            bucket_in: bucket_in.into(),
            bucket_out: bucket_out.into(),
            input_key: input_key.into(),
            output_key: output_key.into(),
            tokenizer_model: DEFAULT_TOKENIZER_MODEL.to_string(),
            tokenizer_file: None,
            max_length: MAX_TOKEN_LENGTH,
        }
    }

    /// Override the tokenizer model.
    pub fn with_tokenizer_model(mut self, model: impl Into<ModelId>) -> Self {
        self.tokenizer_model = model.into();
        self
    }

    /// Load the tokenizer from a local file instead of the hub.
    pub fn with_tokenizer_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.tokenizer_file = Some(path.into());
        self
    }

    /// Override the fixed output length.
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }
}

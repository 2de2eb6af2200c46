use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::{BucketName, ModelId, ObjectKey};

/// Error type for filesystem, parsing, tokenizer, and object-store failures.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A local path could not be read, listed, or written.
    #[error("filesystem error at {}: {source}", path.display())]
    Filesystem {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// No data files, or only empty ones, were found to combine.
    #[error("no input rows to concatenate: {0}")]
    EmptyInput(String),
    /// A table is missing required columns or has mismatched headers.
    #[error("schema error: {0}")]
    Schema(String),
    /// A CSV file or object could not be parsed.
    #[error("failed to parse {}: {reason}", path.display())]
    Parse {
        /// File or object key being parsed.
        path: PathBuf,
        /// Parser message, including the offending line when known.
        reason: String,
    },
    /// A tokenizer could not be fetched or constructed.
    #[error("failed loading tokenizer '{model}': {reason}")]
    TokenizerLoad {
        /// Model identifier or tokenizer file path.
        model: ModelId,
        /// Why loading failed.
        reason: String,
    },
    /// A sequence could not be encoded.
    #[error("tokenization failed: {0}")]
    Tokenization(String),
    /// An object-store bucket or object could not be reached.
    #[error("object store access failed for '{bucket}/{key}': {reason}")]
    StoreAccess {
        /// Bucket name.
        bucket: BucketName,
        /// Object key; empty when the bucket itself failed.
        key: ObjectKey,
        /// Store client message.
        reason: String,
    },
    /// Invalid job or store settings.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Any other I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl PipelineError {
    pub(crate) fn filesystem(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn store_access(bucket: &str, key: &str, reason: impl ToString) -> Self {
        Self::StoreAccess {
            bucket: bucket.to_string(),
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }
}

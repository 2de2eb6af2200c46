#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Command-line apps launched by the binaries.
pub mod apps;
/// Run configuration types.
pub mod config;
/// Centralized constants for schemas, scanning, tokenization, and storage.
pub mod constants;
/// Curator stage: staging table to tokenized table.
pub mod curate;
/// Table and record types.
pub mod data;
/// Split subfolder labels.
pub mod splits;
/// CSV encoding and temporary staging files.
pub mod staging;
/// Tokenizer loading and fixed-length encoding.
pub mod tokenizer;
/// Input transports: local split folders and object stores.
pub mod transport;
/// Shared type aliases.
pub mod types;
/// Unpacker stage: raw split files to staging table.
pub mod unpack;

mod errors;

pub use config::{CurateConfig, StoreBackend, StoreConfig, UnpackConfig};
pub use curate::{CurateSummary, curate, curate_table, curate_with_tokenizer};
pub use data::{RawRecord, Table};
pub use errors::PipelineError;
pub use splits::SplitFolder;
pub use tokenizer::{HubTokenizer, SequenceTokenizer, VocabTokenizer, encode_fixed};
pub use transport::store::{
    BucketProvider, InMemoryBucketProvider, LocalBucketProvider, ObjectStoreClient,
    S3BucketProvider,
};
pub use types::{BucketName, CellValue, ColumnName, ModelId, ObjectKey, TokenId};
pub use unpack::{UnpackSummary, combine_split_files, unpack};

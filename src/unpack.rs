//! Unpacker: combine raw split files into one staging table and upload it.

use std::path::Path;

use tracing::{debug, info};

use crate::config::UnpackConfig;
use crate::data::Table;
use crate::errors::PipelineError;
use crate::staging::{read_raw_file, write_table_to_tempfile};
use crate::transport::fs::SplitDirScanner;
use crate::transport::store::ObjectStoreClient;

/// Outcome of an unpacker run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnpackSummary {
    /// Number of raw files read.
    pub files: usize,
    /// Number of rows in the combined table.
    pub rows: usize,
}

/// Read every admitted file under `input_dir` into one raw-schema table.
///
/// Files are concatenated in split order (`train`, `test`, `dev`) and by file name
/// within a split; rows keep their file order and are never deduplicated.
pub fn combine_split_files(input_dir: &Path) -> Result<(Table, usize), PipelineError> {
    let files = SplitDirScanner::new(input_dir).scan()?;
    if files.is_empty() {
        return Err(PipelineError::EmptyInput(format!(
            "no data files found under {} (train/, test/, dev/)",
            input_dir.display()
        )));
    }

    let mut combined = Table::raw();
    for file in &files {
        let records = read_raw_file(&file.path)?;
        debug!(
            "[protein_pipeline:unpack] {} rows from {} ({})",
            records.len(),
            file.path.display(),
            file.split
        );
        combined.append(Table::from_raw_records(records))?;
    }
    if combined.is_empty() {
        return Err(PipelineError::EmptyInput(format!(
            "{} data files under {} contained no rows",
            files.len(),
            input_dir.display()
        )));
    }
    Ok((combined, files.len()))
}

/// Combine the raw split files and upload the result to `bucket/output_key`.
pub fn unpack(
    client: &ObjectStoreClient,
    config: &UnpackConfig,
) -> Result<UnpackSummary, PipelineError> {
    info!(
        "[protein_pipeline:unpack] scanning {}",
        config.input_dir.display()
    );
    let (combined, files) = combine_split_files(&config.input_dir)?;
    info!(
        "[protein_pipeline:unpack] combined {} rows from {} files",
        combined.len(),
        files
    );

    let tmp = write_table_to_tempfile(&combined)?;
    info!(
        "[protein_pipeline:unpack] staged combined table at {}",
        tmp.path().display()
    );
    client.put_file(&config.bucket, &config.output_key, tmp.path())?;
    info!(
        "[protein_pipeline:unpack] uploaded to bucket '{}' as '{}'",
        config.bucket, config.output_key
    );

    Ok(UnpackSummary {
        files,
        rows: combined.len(),
    })
}

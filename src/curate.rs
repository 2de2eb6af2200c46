//! Curator: tokenize the staging table into fixed-length id columns and upload it.

use std::path::PathBuf;

use tracing::info;

use crate::config::CurateConfig;
use crate::data::{ColumnName, Table, token_column_names};
use crate::errors::PipelineError;
use crate::staging::{parse_table, write_table_to_tempfile};
use crate::tokenizer::{SequenceTokenizer, encode_fixed, load_from_file, load_pretrained};
use crate::transport::store::ObjectStoreClient;

/// Outcome of a curator run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurateSummary {
    /// Number of curated rows (equal to the input row count).
    pub rows: usize,
    /// Number of curated columns: metadata columns plus token columns.
    pub columns: usize,
}

/// Replace the `sequence` column with `token_0 .. token_{L-1}` columns.
///
/// Metadata columns keep their original order and precede the token columns; row order
/// is preserved. Empty sequences produce special tokens (if any) followed by padding.
pub fn curate_table(
    table: Table,
    tokenizer: &dyn SequenceTokenizer,
) -> Result<Table, PipelineError> {
    let sequence_idx = table.require_sequence_column()?;
    let (headers, rows) = table.into_parts();

    let mut curated_headers: Vec<ColumnName> = headers
        .into_iter()
        .enumerate()
        .filter(|(idx, _)| *idx != sequence_idx)
        .map(|(_, name)| name)
        .collect();
    curated_headers.extend(token_column_names(tokenizer.max_length()));

    let mut curated = Table::new(curated_headers);
    for (row_idx, mut row) in rows.into_iter().enumerate() {
        let sequence = row.remove(sequence_idx);
        let ids = encode_fixed(tokenizer, &sequence).map_err(|err| match err {
            PipelineError::Tokenization(reason) => {
                PipelineError::Tokenization(format!("row {row_idx}: {reason}"))
            }
            other => other,
        })?;
        row.extend(ids.iter().map(|id| id.to_string()));
        curated.push_row(row)?;
    }
    Ok(curated)
}

/// Tokenizer named by `config`: the local file when given, otherwise the hub model.
pub fn load_configured_tokenizer(
    config: &CurateConfig,
) -> Result<Box<dyn SequenceTokenizer>, PipelineError> {
    match &config.tokenizer_file {
        Some(path) => load_from_file(path, config.max_length),
        None => load_pretrained(&config.tokenizer_model, config.max_length),
    }
}

/// Download, tokenize, and upload using the tokenizer named by `config`.
pub fn curate(
    client: &ObjectStoreClient,
    config: &CurateConfig,
) -> Result<CurateSummary, PipelineError> {
    curate_with_tokenizer(client, config, load_configured_tokenizer)
}

/// Download, tokenize, and upload, obtaining the tokenizer from `load_tokenizer`.
///
/// The `sequence` column is checked before `load_tokenizer` runs, so a malformed input
/// never triggers a tokenizer download.
pub fn curate_with_tokenizer<L>(
    client: &ObjectStoreClient,
    config: &CurateConfig,
    load_tokenizer: L,
) -> Result<CurateSummary, PipelineError>
where
    L: FnOnce(&CurateConfig) -> Result<Box<dyn SequenceTokenizer>, PipelineError>,
{
    if config.max_length == 0 {
        return Err(PipelineError::Configuration(
            "max_length must be greater than zero".to_string(),
        ));
    }

    info!(
        "[protein_pipeline:curate] downloading {} from bucket {}",
        config.input_key, config.bucket_in
    );
    let data = client.get_object(&config.bucket_in, &config.input_key)?;
    let origin = PathBuf::from(format!("{}/{}", config.bucket_in, config.input_key));
    let table = parse_table(&data, &origin)?;
    table.require_sequence_column()?;

    info!(
        "[protein_pipeline:curate] loading tokenizer for model: {}",
        config.tokenizer_model
    );
    let tokenizer = load_tokenizer(config)?;
    if tokenizer.max_length() != config.max_length {
        return Err(PipelineError::Configuration(format!(
            "tokenizer is bound to length {} but {} token columns were requested",
            tokenizer.max_length(),
            config.max_length
        )));
    }

    info!(
        "[protein_pipeline:curate] tokenizing {} sequences",
        table.len()
    );
    let curated = curate_table(table, tokenizer.as_ref())?;
    let summary = CurateSummary {
        rows: curated.len(),
        columns: curated.headers().len(),
    };

    let tmp = write_table_to_tempfile(&curated)?;
    info!(
        "[protein_pipeline:curate] saved curated table locally at {}",
        tmp.path().display()
    );
    client.put_file(&config.bucket_out, &config.output_key, tmp.path())?;
    info!(
        "[protein_pipeline:curate] uploaded to bucket {} as {}",
        config.bucket_out, config.output_key
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::VocabTokenizer;

    fn tokenizer(max_length: usize) -> VocabTokenizer {
        VocabTokenizer::new(
            ["<pad>", "<unk>", "A", "C", "D", "M", "S", "E", "Q"],
            max_length,
        )
        .unwrap()
    }

    fn table(rows: &[[&str; 3]]) -> Table {
        let mut table = Table::new(["family_id", "sequence", "sequence_name"]);
        for row in rows {
            table
                .push_row(row.iter().map(|cell| cell.to_string()).collect())
                .unwrap();
        }
        table
    }

    #[test]
    fn sequence_column_is_replaced_by_tokens() {
        let curated = curate_table(
            table(&[["FAM1", "MSEQ", "s1"], ["FAM2", "", "s2"]]),
            &tokenizer(6),
        )
        .unwrap();
        assert_eq!(
            curated.headers(),
            [
                "family_id",
                "sequence_name",
                "token_0",
                "token_1",
                "token_2",
                "token_3",
                "token_4",
                "token_5"
            ]
        );
        assert_eq!(
            curated.rows()[0],
            vec!["FAM1", "s1", "5", "6", "7", "8", "0", "0"]
        );
        assert_eq!(
            curated.rows()[1],
            vec!["FAM2", "s2", "0", "0", "0", "0", "0", "0"]
        );
    }

    #[test]
    fn long_sequences_are_truncated() {
        let curated = curate_table(table(&[["F", "MSEQMSEQ", "s"]]), &tokenizer(3)).unwrap();
        assert_eq!(curated.rows()[0], vec!["F", "s", "5", "6", "7"]);
    }

    #[test]
    fn tokenization_errors_name_the_row() {
        let strict = VocabTokenizer::new(["<pad>", "M"], 4).unwrap();
        let err =
            curate_table(table(&[["F", "M", "a"], ["F", "MX", "b"]]), &strict).unwrap_err();
        assert!(matches!(err, PipelineError::Tokenization(ref msg) if msg.starts_with("row 1")));
    }

    #[test]
    fn table_without_sequence_is_schema_error() {
        let mut input = Table::new(["sequence_name", "family_id"]);
        input
            .push_row(vec!["s".to_string(), "F".to_string()])
            .unwrap();
        assert!(matches!(
            curate_table(input, &tokenizer(4)).unwrap_err(),
            PipelineError::Schema(_)
        ));
    }
}

//! CSV encoding of pipeline tables and scoped temporary files for uploads.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use tempfile::NamedTempFile;

use crate::constants::schema::RAW_COLUMNS;
use crate::constants::store::TEMPFILE_SUFFIX;
use crate::data::{RawRecord, Table};
use crate::errors::PipelineError;

/// Parse a headerless, comma-delimited raw file with exactly five fields per line.
///
/// Any malformed line (wrong field count, invalid UTF-8, bad quoting) fails the whole file.
pub fn read_raw_file(path: &Path) -> Result<Vec<RawRecord>, PipelineError> {
    let file = File::open(path).map_err(|err| PipelineError::filesystem(path, err))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut records = Vec::new();
    let mut record = StringRecord::new();
    loop {
        let more = reader
            .read_record(&mut record)
            .map_err(|err| parse_error(path, err))?;
        if !more {
            break;
        }
        if record.len() != RAW_COLUMNS.len() {
            let line = record.position().map(|pos| pos.line()).unwrap_or(0);
            return Err(PipelineError::Parse {
                path: path.to_path_buf(),
                reason: format!(
                    "line {line}: expected {} fields, found {}",
                    RAW_COLUMNS.len(),
                    record.len()
                ),
            });
        }
        let raw: RawRecord = record
            .deserialize(None)
            .map_err(|err| parse_error(path, err))?;
        records.push(raw);
    }
    Ok(records)
}

/// Parse a comma-delimited table whose first line is the header.
///
/// `origin` only labels errors (for example `staging/combined.csv`).
pub fn parse_table(data: &[u8], origin: &Path) -> Result<Table, PipelineError> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(data);
    let headers = reader
        .headers()
        .map_err(|err| parse_error(origin, err))?
        .clone();
    let mut table = Table::new(headers.iter());
    for result in reader.records() {
        let record = result.map_err(|err| parse_error(origin, err))?;
        table.push_row(record.iter().map(str::to_string).collect())?;
    }
    Ok(table)
}

/// Write `table` as comma-delimited text with a header line.
pub fn write_table<W: Write>(table: &Table, writer: W) -> Result<(), PipelineError> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);
    writer.write_record(table.headers()).map_err(csv_io_error)?;
    for row in table.rows() {
        writer.write_record(row).map_err(csv_io_error)?;
    }
    writer.flush()?;
    Ok(())
}

/// Encode `table` into an in-memory CSV buffer.
pub fn table_to_bytes(table: &Table) -> Result<Vec<u8>, PipelineError> {
    let mut buffer = Vec::new();
    write_table(table, &mut buffer)?;
    Ok(buffer)
}

/// Write `table` to a fresh `.csv` temporary file.
///
/// The file is deleted when the returned handle is dropped, including on error paths.
pub fn write_table_to_tempfile(table: &Table) -> Result<NamedTempFile, PipelineError> {
    let tmp = tempfile::Builder::new()
        .prefix("protein_pipeline_")
        .suffix(TEMPFILE_SUFFIX)
        .tempfile()?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        write_table(table, &mut writer)?;
        writer.flush()?;
    }
    Ok(tmp)
}

fn parse_error(path: &Path, err: csv::Error) -> PipelineError {
    PipelineError::Parse {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

fn csv_io_error(err: csv::Error) -> PipelineError {
    match err.into_kind() {
        csv::ErrorKind::Io(err) => PipelineError::Io(err),
        other => PipelineError::Io(io::Error::other(format!("{other:?}"))),
    }
}

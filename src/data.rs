use serde::{Deserialize, Serialize};

use crate::constants::schema::{RAW_COLUMNS, SEQUENCE_COLUMN, TOKEN_COLUMN_PREFIX};
use crate::errors::PipelineError;

pub use crate::types::{CellValue, ColumnName};

/// One line of a headerless raw split file, with the fixed positional schema applied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Raw biological sequence.
    pub sequence: String,
    /// Family accession (for example `PF00001.21`).
    pub family_accession: String,
    /// Sequence name within its source database.
    pub sequence_name: String,
    /// Sequence as it appears in the family alignment.
    pub aligned_sequence: String,
    /// Human-readable family id.
    pub family_id: String,
}

impl RawRecord {
    /// Cell values in `RAW_COLUMNS` order.
    pub fn into_row(self) -> Vec<CellValue> {
        vec![
            self.sequence,
            self.family_accession,
            self.sequence_name,
            self.aligned_sequence,
            self.family_id,
        ]
    }
}

/// Ordered header plus string rows; the in-memory form of every CSV stage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<ColumnName>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Create an empty table with the given column order.
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ColumnName>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Empty table carrying the five raw columns.
    pub fn raw() -> Self {
        Self::new(RAW_COLUMNS)
    }

    /// Build a raw-schema table from records, preserving their order.
    pub fn from_raw_records(records: impl IntoIterator<Item = RawRecord>) -> Self {
        let mut table = Self::raw();
        table
            .rows
            .extend(records.into_iter().map(RawRecord::into_row));
        table
    }

    /// Append a row; its width must match the header.
    pub fn push_row(&mut self, row: Vec<CellValue>) -> Result<(), PipelineError> {
        if row.len() != self.headers.len() {
            return Err(PipelineError::Schema(format!(
                "row has {} cells but table has {} columns",
                row.len(),
                self.headers.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Append all rows of `other`, which must share this table's header.
    pub fn append(&mut self, other: Table) -> Result<(), PipelineError> {
        if other.headers != self.headers {
            return Err(PipelineError::Schema(format!(
                "cannot concatenate tables with headers {:?} and {:?}",
                self.headers, other.headers
            )));
        }
        self.rows.extend(other.rows);
        Ok(())
    }

    /// Column names in order.
    pub fn headers(&self) -> &[ColumnName] {
        &self.headers
    }

    /// Data rows in order.
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Consume the table, yielding its header and rows.
    pub fn into_parts(self) -> (Vec<ColumnName>, Vec<Vec<CellValue>>) {
        (self.headers, self.rows)
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first column named `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Position of the `sequence` column, or a schema error naming the columns present.
    pub fn require_sequence_column(&self) -> Result<usize, PipelineError> {
        self.column_index(SEQUENCE_COLUMN).ok_or_else(|| {
            PipelineError::Schema(format!(
                "input table must contain a '{SEQUENCE_COLUMN}' column (found: {})",
                self.headers.join(",")
            ))
        })
    }
}

/// Names of the `count` token columns: `token_0 .. token_{count-1}`.
pub fn token_column_names(count: usize) -> Vec<ColumnName> {
    (0..count)
        .map(|idx| format!("{TOKEN_COLUMN_PREFIX}{idx}"))
        .collect()
}

use crate::preprocessing::DataIntegrityError;
use crate::utils::file_parsing::{is_comment_or_blank, split_delimited};
use std::fs;
use std::path::Path;

/// Delimited text as read from disk: a header and untyped cells.
///
/// Comment lines (`#`) and blank lines are skipped; the first remaining line
/// is the header. Rows shorter than the header read as missing cells.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<RawRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 1-based line number in the source text.
    pub line: usize,
    pub cells: Vec<String>,
}

impl RawTable {
    pub fn read_path<P: AsRef<Path>>(path: P) -> Result<Self, DataIntegrityError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| DataIntegrityError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, ',')
    }

    pub fn parse(text: &str, delimiter: char) -> Result<Self, DataIntegrityError> {
        let mut lines = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !is_comment_or_blank(line));

        let (_, header) = lines.next().ok_or(DataIntegrityError::NoHeader)?;
        let columns = split_delimited(header, delimiter);

        let rows = lines
            .map(|(i, line)| RawRow {
                line: i + 1,
                cells: split_delimited(line, delimiter),
            })
            .collect();

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Like [`column_index`](Self::column_index) but fails for an absent column.
    pub fn require_column(&self, name: &str) -> Result<usize, DataIntegrityError> {
        self.column_index(name)
            .ok_or_else(|| DataIntegrityError::MissingColumn(name.to_string()))
    }
}

impl RawRow {
    /// Cell at `index`, empty when the row is short.
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }
}

//! Error types for file table operations.

use std::path::PathBuf;

/// Errors that can occur while reading, building or writing a file table.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// I/O error reading or writing a table file.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// The file being accessed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The table has no header line.
    #[error("table is empty: missing [column|...] header")]
    MissingHeader,

    /// The header line is not of the form `[a|b|...]`.
    #[error("malformed table header '{header}': expected [column|...]")]
    MalformedHeader {
        /// The offending line.
        header: String,
    },

    /// A table was built with no columns.
    #[error("a table needs at least one column")]
    NoColumns,

    /// A column name is empty.
    #[error("empty column name at position {index}")]
    EmptyColumn {
        /// Zero-based column position.
        index: usize,
    },

    /// The same column name appears twice.
    #[error("duplicate column name '{name}'")]
    DuplicateColumn {
        /// The repeated name.
        name: String,
    },

    /// A row does not have one cell per column.
    #[error("line {line}: expected {expected} cells, found {found}")]
    ArityMismatch {
        /// One-based line number in the source (0 for rows built in memory).
        line: usize,
        /// Column count.
        expected: usize,
        /// Cells in the row.
        found: usize,
    },

    /// A cell value cannot be represented in the text format.
    #[error("cell '{value}' in column '{column}' cannot be encoded: {reason}")]
    UnencodableCell {
        /// Column the cell belongs to.
        column: String,
        /// The cell contents.
        value: String,
        /// What makes it unencodable.
        reason: &'static str,
    },
}

/// Result type for table operations.
pub type Result<T> = std::result::Result<T, TableError>;

//! In-memory file table with text decoding and encoding.

use std::collections::HashSet;
use std::io::{self, Write};
use std::path::Path;

use crate::error::{Result, TableError};

/// A single table row. Cells are stored in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    cells: Vec<String>,
}

impl Row {
    /// Cell values in column order.
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// Cell at a column position.
    pub fn get(&self, column_id: usize) -> Option<&str> {
        self.cells.get(column_id).map(String::as_str)
    }
}

/// A file table: ordered unique column names plus ordered rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Create an empty table with the given columns.
    ///
    /// There must be at least one column. Column names must be non-empty,
    /// unique, and representable in the header line.
    pub fn new<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if columns.is_empty() {
            return Err(TableError::NoColumns);
        }
        let mut seen = HashSet::with_capacity(columns.len());
        for (index, name) in columns.iter().enumerate() {
            if name.is_empty() {
                return Err(TableError::EmptyColumn { index });
            }
            check_encodable(name, name)?;
            if !seen.insert(name.as_str()) {
                return Err(TableError::DuplicateColumn { name: name.clone() });
            }
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    /// Create an empty table sharing `other`'s column list.
    pub fn with_columns_of(other: &Table) -> Self {
        Self {
            columns: other.columns.clone(),
            rows: Vec::new(),
        }
    }

    /// Read and decode a table file.
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Decode a table from its text form.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines().enumerate();
        let header = lines
            .by_ref()
            .map(|(_, line)| line.trim_end_matches('\r'))
            .next()
            .ok_or(TableError::MissingHeader)?;

        let inner = header
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .ok_or_else(|| TableError::MalformedHeader {
                header: header.to_string(),
            })?;
        let mut table = Self::new(inner.split('|'))?;

        for (index, line) in lines {
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            let cells: Vec<&str> = line.split('|').collect();
            if cells.len() != table.columns.len() {
                return Err(TableError::ArityMismatch {
                    line: index + 1,
                    expected: table.columns.len(),
                    found: cells.len(),
                });
            }
            table.rows.push(Row {
                cells: cells.into_iter().map(str::to_string).collect(),
            });
        }
        Ok(table)
    }

    /// Append a row built in memory.
    pub fn add_row<I, S>(&mut self, cells: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cells: Vec<String> = cells.into_iter().map(Into::into).collect();
        if cells.len() != self.columns.len() {
            return Err(TableError::ArityMismatch {
                line: 0,
                expected: self.columns.len(),
                found: cells.len(),
            });
        }
        for (column, value) in self.columns.iter().zip(&cells) {
            check_encodable(column, value)?;
        }
        // A lone empty cell would encode as a blank line, which readers skip.
        if cells.len() == 1 && cells[0].is_empty() {
            return Err(TableError::UnencodableCell {
                column: self.columns[0].clone(),
                value: String::new(),
                reason: "empty single-column row encodes as a blank line",
            });
        }
        self.rows.push(Row { cells });
        Ok(())
    }

    /// Append an existing row. The row must come from a table with the same
    /// column list.
    pub fn push_row(&mut self, row: Row) -> Result<()> {
        if row.cells.len() != self.columns.len() {
            return Err(TableError::ArityMismatch {
                line: 0,
                expected: self.columns.len(),
                found: row.cells.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Column names in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position of a column, if present.
    pub fn column_id(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Whether the table has a column with this name.
    pub fn has_column(&self, name: &str) -> bool {
        self.column_id(name).is_some()
    }

    /// Rows in order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Row at an index.
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Number of rows (header excluded).
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Look up a row's cell by column name.
    pub fn cell<'a>(&self, row: &'a Row, column: &str) -> Option<&'a str> {
        self.column_id(column).and_then(|id| row.get(id))
    }

    /// Encode the table, optionally with its header line.
    pub fn write(&self, include_header: bool) -> Vec<u8> {
        let mut out = String::new();
        if include_header {
            out.push('[');
            out.push_str(&self.columns.join("|"));
            out.push_str("]\n");
        }
        for row in &self.rows {
            out.push_str(&row.cells.join("|"));
            out.push('\n');
        }
        out.into_bytes()
    }

    /// Encode the table into a writer.
    pub fn write_to<W: Write>(&self, writer: &mut W, include_header: bool) -> io::Result<()> {
        writer.write_all(&self.write(include_header))
    }
}

fn check_encodable(column: &str, value: &str) -> Result<()> {
    let reason = if value.contains('|') {
        "contains the '|' separator"
    } else if value.contains('\n') || value.contains('\r') {
        "contains a line break"
    } else {
        return Ok(());
    };
    Err(TableError::UnencodableCell {
        column: column.to_string(),
        value: value.to_string(),
        reason,
    })
}

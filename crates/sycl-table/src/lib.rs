//! File table format for the device code toolchain.
//!
//! A file table is a small text manifest: a bracketed header naming the
//! columns, then one `|`-separated line per row.
//!
//! ```text
//! [Code|Properties|Symbols]
//! a_0.bc|a_0.prop|a_0.sym
//! a_1.bc|a_1.prop|a_1.sym
//! ```

pub mod error;
pub mod table;

pub use error::{Result, TableError};
pub use table::{Row, Table};

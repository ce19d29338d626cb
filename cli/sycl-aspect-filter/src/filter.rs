//! The filtering pipeline: table in, property files per row, table out.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use sycl_devices::{explain, DeviceCapabilities};
use sycl_props::parse_device_requirements;
use sycl_table::Table;

use crate::config::FilterConfig;

/// Column holding each row's property file path.
pub const PROPERTIES_COLUMN: &str = "Properties";

/// Outcome of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSummary {
    /// Rows in the input table.
    pub rows_in: usize,
    /// Rows written to the output table.
    pub rows_kept: usize,
    /// The input had no properties column and was copied unchanged.
    pub passthrough: bool,
}

impl FilterSummary {
    /// Rows removed by the filter.
    pub fn rows_dropped(&self) -> usize {
        self.rows_in - self.rows_kept
    }
}

/// Keep the rows whose device requirements `caps` satisfies.
///
/// A table without a `Properties` column is returned unchanged. Rows keep
/// their relative order and the column list is never altered.
pub fn filter_table(table: &Table, caps: &DeviceCapabilities) -> Result<Table> {
    let Some(props_id) = table.column_id(PROPERTIES_COLUMN) else {
        debug!("no {PROPERTIES_COLUMN} column, copying table unchanged");
        return Ok(table.clone());
    };

    let mut filtered = Table::with_columns_of(table);
    for row in table.rows() {
        let props_path = row.get(props_id).unwrap_or_default();
        let buffer = std::fs::read(props_path)
            .with_context(|| format!("can't read the property file {props_path}"))?;
        let reqs = parse_device_requirements(&buffer)
            .with_context(|| format!("invalid device requirements in {props_path}"))?;

        let Some(reqs) = reqs else {
            debug!(file = props_path, "no device requirements, keeping row");
            filtered.push_row(row.clone())?;
            continue;
        };

        let failed = explain(&reqs, caps);
        if failed.is_empty() {
            debug!(file = props_path, "requirements satisfied, keeping row");
            filtered.push_row(row.clone())?;
        } else {
            let reasons: Vec<String> = failed.iter().map(ToString::to_string).collect();
            debug!(
                file = props_path,
                unsupported = %reasons.join(", "),
                "dropping row"
            );
        }
    }
    Ok(filtered)
}

/// Run the whole pipeline for one configuration.
///
/// The output file is only written once every input has been read and every
/// row evaluated; it is replaced atomically.
pub fn run(config: &FilterConfig) -> Result<FilterSummary> {
    let table = Table::read(&config.input).context("can't read the input table")?;
    let caps = DeviceCapabilities::load(&config.device_config_file, &config.target)
        .with_context(|| {
            format!(
                "can't load capabilities of target '{}' from {}",
                config.target,
                config.device_config_file.display()
            )
        })?;

    let filtered = filter_table(&table, &caps)?;
    write_table(&filtered, &config.output)?;

    let summary = FilterSummary {
        rows_in: table.num_rows(),
        rows_kept: filtered.num_rows(),
        passthrough: !table.has_column(PROPERTIES_COLUMN),
    };
    info!(
        target_name = %config.target,
        rows_in = summary.rows_in,
        rows_kept = summary.rows_kept,
        rows_dropped = summary.rows_dropped(),
        passthrough = summary.passthrough,
        output = %config.output.display(),
        "filtered file table"
    );
    Ok(summary)
}

/// Write through a temporary file in the destination directory, then rename.
fn write_table(table: &Table, path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let open_err = || format!("can't open the output file {}", path.display());

    let mut tmp = tempfile::NamedTempFile::new_in(dir).with_context(open_err)?;
    table.write_to(&mut tmp, true).with_context(open_err)?;
    tmp.flush().with_context(open_err)?;
    tmp.persist(path).with_context(open_err)?;
    Ok(())
}

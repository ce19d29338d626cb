//! Run configuration assembled once from the command line.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

/// Everything one filtering run needs. Built once, then read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    /// File table to filter.
    pub input: PathBuf,
    /// Where the filtered table is written.
    pub output: PathBuf,
    /// Target whose capabilities decide which rows survive.
    pub target: String,
    /// Device configuration file describing the targets.
    pub device_config_file: PathBuf,
}

impl FilterConfig {
    /// Validate raw command-line values and fill in the default output path.
    pub fn from_args(
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        target: Option<String>,
        device_config_file: Option<PathBuf>,
    ) -> Result<Self> {
        let Some(input) = input else {
            bail!("input file not provided");
        };
        if !input.exists() {
            bail!("input file '{}' not found", input.display());
        }

        let Some(target) = target.filter(|t| !t.is_empty()) else {
            bail!("target not provided");
        };

        let Some(device_config_file) = device_config_file else {
            bail!("path to the device configuration file not provided");
        };
        if !device_config_file.exists() {
            bail!(
                "device configuration file '{}' not found",
                device_config_file.display()
            );
        }

        let output = match output {
            Some(output) => output,
            None => default_output_path(&input),
        };

        Ok(Self {
            input,
            output,
            target,
            device_config_file,
        })
    }
}

/// `dir/name.ext` becomes `dir/name_filtered.ext`.
pub fn default_output_path(input: &Path) -> PathBuf {
    let mut name: OsString = input.file_stem().unwrap_or_default().to_os_string();
    name.push("_filtered");
    if let Some(ext) = input.extension() {
        name.push(".");
        name.push(ext);
    }
    input.with_file_name(name)
}

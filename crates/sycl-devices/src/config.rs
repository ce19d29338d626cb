//! TOML device configuration: loading and validation.
//!
//! ```toml
//! [targets.intel_gpu_pvc]
//! aspects = ["gpu", "fp16", "fp64", 28]
//! sub-group-sizes = [16, 32]
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::aspect::aspect_id;
use crate::capabilities::DeviceCapabilities;
use crate::error::{DeviceError, Result};

/// An aspect given by numeric id or by name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AspectRef {
    Id(u32),
    Name(String),
}

impl fmt::Display for AspectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

impl AspectRef {
    /// Numeric id, if the name is known.
    pub fn resolve(&self) -> Option<u32> {
        match self {
            Self::Id(id) => Some(*id),
            Self::Name(name) => aspect_id(name),
        }
    }
}

/// Capabilities of one target as written in the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct TargetInfo {
    /// Supported aspects.
    #[serde(default)]
    pub aspects: Vec<AspectRef>,
    /// Supported sub-group sizes.
    #[serde(default)]
    pub sub_group_sizes: Vec<u32>,
    /// Treat aspects not listed as supported.
    #[serde(default)]
    pub may_support_other_aspects: bool,
    /// Identity matched against `fixed_target`; defaults to the target name.
    #[serde(default)]
    pub identity: Option<String>,
}

/// A device configuration file: target name to capabilities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceConfig {
    /// Configured targets.
    #[serde(default)]
    pub targets: BTreeMap<String, TargetInfo>,
}

impl DeviceConfig {
    /// Load a device configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DeviceError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a device configuration from a TOML string.
    pub fn parse(toml_str: &str) -> Result<Self> {
        let config: DeviceConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every target for unknown aspect names and zero sub-group sizes.
    pub fn validate(&self) -> Result<()> {
        for (name, info) in &self.targets {
            for aspect in &info.aspects {
                if aspect.resolve().is_none() {
                    return Err(DeviceError::Validation {
                        target: name.clone(),
                        detail: format!("unknown aspect '{aspect}'"),
                    });
                }
            }
            if info.sub_group_sizes.contains(&0) {
                return Err(DeviceError::Validation {
                    target: name.clone(),
                    detail: "sub-group size 0 is not a valid width".into(),
                });
            }
            if info.identity.as_deref() == Some("") {
                return Err(DeviceError::Validation {
                    target: name.clone(),
                    detail: "identity must not be empty".into(),
                });
            }
        }
        Ok(())
    }

    /// Configured target names in sorted order.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }

    /// Entry for one target.
    pub fn target(&self, name: &str) -> Option<&TargetInfo> {
        self.targets.get(name)
    }

    /// Resolved capabilities of one target.
    pub fn capabilities(&self, target: &str) -> Result<DeviceCapabilities> {
        let info = self
            .target(target)
            .ok_or_else(|| DeviceError::UnknownTarget {
                target: target.to_string(),
                known: self.targets().collect::<Vec<_>>().join(", "),
            })?;
        DeviceCapabilities::from_target_info(target, info)
    }
}

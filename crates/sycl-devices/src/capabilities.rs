//! Resolved capabilities of a single target.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::debug;

use crate::config::{DeviceConfig, TargetInfo};
use crate::error::{DeviceError, Result};

/// What one target supports, with aspect names resolved to ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceCapabilities {
    target: String,
    identity: String,
    aspects: BTreeSet<u32>,
    sub_group_sizes: BTreeSet<u32>,
    may_support_other_aspects: bool,
}

impl DeviceCapabilities {
    /// Load the configuration file at `path` and select `target`.
    pub fn load(path: &Path, target: &str) -> Result<Self> {
        let config = DeviceConfig::load(path)?;
        let caps = config.capabilities(target)?;
        debug!(
            target_name = %caps.target,
            aspects = caps.aspects.len(),
            sub_group_sizes = ?caps.sub_group_sizes,
            "loaded device capabilities"
        );
        Ok(caps)
    }

    /// Resolve a configuration entry.
    pub fn from_target_info(target: &str, info: &TargetInfo) -> Result<Self> {
        let aspects = info
            .aspects
            .iter()
            .map(|a| {
                a.resolve().ok_or_else(|| DeviceError::Validation {
                    target: target.to_string(),
                    detail: format!("unknown aspect '{a}'"),
                })
            })
            .collect::<Result<BTreeSet<u32>>>()?;
        Ok(Self {
            target: target.to_string(),
            identity: info.identity.clone().unwrap_or_else(|| target.to_string()),
            aspects,
            sub_group_sizes: info.sub_group_sizes.iter().copied().collect(),
            may_support_other_aspects: info.may_support_other_aspects,
        })
    }

    /// Target name these capabilities were loaded for.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Identity a `fixed_target` requirement must equal.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Whether the target supports an aspect.
    pub fn supports_aspect(&self, id: u32) -> bool {
        self.may_support_other_aspects || self.aspects.contains(&id)
    }

    /// Whether the target provides a sub-group size.
    pub fn supports_sub_group_size(&self, size: u32) -> bool {
        self.sub_group_sizes.contains(&size)
    }

    /// Whether a fixed-target identifier names this target.
    pub fn matches_fixed_target(&self, id: &[u8]) -> bool {
        id == self.identity.as_bytes()
    }
}

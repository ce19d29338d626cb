//! Requirement evaluation against a target's capabilities.

use std::fmt;

use sycl_props::DeviceRequirements;

use crate::aspect::aspect_name;
use crate::capabilities::DeviceCapabilities;

/// A requirement clause the target does not satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unsatisfied {
    /// An aspect the target lacks.
    Aspect(u32),
    /// A sub-group size the target does not provide.
    SubGroupSize(u32),
    /// A fixed target naming some other device.
    FixedTarget(Vec<u8>),
}

impl fmt::Display for Unsatisfied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aspect(id) => match aspect_name(*id) {
                Some(name) => write!(f, "aspect {name} ({id})"),
                None => write!(f, "aspect {id}"),
            },
            Self::SubGroupSize(size) => write!(f, "sub-group size {size}"),
            Self::FixedTarget(id) => write!(f, "fixed target '{}'", String::from_utf8_lossy(id)),
        }
    }
}

/// Every clause of `reqs` that `caps` fails, in declaration order:
/// aspects (ascending), then sub-group size, then fixed target.
pub fn explain(reqs: &DeviceRequirements, caps: &DeviceCapabilities) -> Vec<Unsatisfied> {
    let mut failed = Vec::new();
    if let Some(aspects) = &reqs.aspects {
        failed.extend(
            aspects
                .iter()
                .filter(|id| !caps.supports_aspect(**id))
                .map(|id| Unsatisfied::Aspect(*id)),
        );
    }
    if let Some(size) = reqs.reqd_sub_group_size {
        if !caps.supports_sub_group_size(size) {
            failed.push(Unsatisfied::SubGroupSize(size));
        }
    }
    if let Some(target) = &reqs.fixed_target {
        if !caps.matches_fixed_target(target) {
            failed.push(Unsatisfied::FixedTarget(target.clone()));
        }
    }
    failed
}

/// Whether every declared clause of `reqs` is supported by `caps`.
pub fn evaluate(reqs: &DeviceRequirements, caps: &DeviceCapabilities) -> bool {
    explain(reqs, caps).is_empty()
}

//! Device capability model for the device code toolchain.
//!
//! Capabilities are read from a TOML device configuration file keyed by
//! target name. Each target states:
//! - **Aspects:** device features it supports, by SYCL id or name
//! - **Sub-group sizes:** sub-group widths its hardware provides
//! - **Identity:** the name a `fixed_target` requirement must match
//!
//! [`evaluate`] decides whether a [`sycl_props::DeviceRequirements`] set can
//! run on a loaded [`DeviceCapabilities`].

pub mod aspect;
pub mod capabilities;
pub mod config;
pub mod error;
pub mod evaluate;

pub use capabilities::DeviceCapabilities;
pub use config::{AspectRef, DeviceConfig, TargetInfo};
pub use error::{DeviceError, Result};
pub use evaluate::{evaluate, explain, Unsatisfied};

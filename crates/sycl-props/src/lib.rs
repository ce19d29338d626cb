//! Property files attached to device code objects.
//!
//! A property file is a sequence of `[Category]` sections, each holding
//! `name=type|value` entries. The `[SYCL/device requirements]` section
//! declares what a compiled object needs from the device it runs on:
//!
//! ```text
//! [SYCL/device requirements]
//! aspects=2|QAAAAAAAAAADAAAABQAAAA==
//! reqd_sub_group_size=1|16
//! ```
//!
//! See [`value`] for the payload encodings.

pub mod error;
pub mod requirements;
pub mod set;
pub mod value;

pub use error::{PropertyError, Result};
pub use requirements::{parse_device_requirements, DeviceRequirements, DEVICE_REQUIREMENTS};
pub use set::{PropertyFile, PropertySet};
pub use value::PropertyValue;

//! The `[SYCL/device requirements]` section.

use std::collections::BTreeSet;

use tracing::warn;

use crate::error::{PropertyError, Result};
use crate::set::{lines, parse_entry, section_header, PropertySet};
use crate::value::{decode_u32_array, encode_u32_array, parse_decimal, PropertyValue};

/// Name of the device requirements section.
pub const DEVICE_REQUIREMENTS: &str = "SYCL/device requirements";

/// Aspect ids, packed as little-endian `u32`s.
pub const ASPECTS: &str = "aspects";

/// Required sub-group size.
pub const REQD_SUB_GROUP_SIZE: &str = "reqd_sub_group_size";

/// The one target an object was compiled for.
pub const FIXED_TARGET: &str = "fixed_target";

const RECOGNIZED_KEYS: [&str; 3] = [ASPECTS, REQD_SUB_GROUP_SIZE, FIXED_TARGET];

/// What a device code object needs from the device that runs it.
///
/// `None` fields place no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceRequirements {
    /// Aspect ids the device must support.
    pub aspects: Option<BTreeSet<u32>>,
    /// Sub-group size the device must support.
    pub reqd_sub_group_size: Option<u32>,
    /// Identity of the only target the object may run on.
    pub fixed_target: Option<Vec<u8>>,
}

impl DeviceRequirements {
    /// Whether no field constrains the device.
    pub fn is_empty(&self) -> bool {
        self.aspects.is_none() && self.reqd_sub_group_size.is_none() && self.fixed_target.is_none()
    }

    /// Interpret a device requirements property set. Unrecognized entries are
    /// ignored.
    pub fn from_property_set(set: &PropertySet) -> Result<Self> {
        let mut reqs = Self::default();
        for (key, value) in set.entries() {
            reqs.apply(key, value)?;
        }
        Ok(reqs)
    }

    /// Build the property set that encodes these requirements.
    pub fn to_property_set(&self) -> PropertySet {
        let mut entries = Vec::new();
        if let Some(aspects) = &self.aspects {
            let ids: Vec<u32> = aspects.iter().copied().collect();
            entries.push((ASPECTS, PropertyValue::ByteArray(encode_u32_array(&ids))));
        }
        if let Some(size) = self.reqd_sub_group_size {
            entries.push((REQD_SUB_GROUP_SIZE, PropertyValue::UInt32(size)));
        }
        if let Some(target) = &self.fixed_target {
            entries.push((FIXED_TARGET, PropertyValue::ByteArray(target.clone())));
        }

        let mut set = PropertySet::new(DEVICE_REQUIREMENTS);
        for (key, value) in entries {
            set.push(key, value);
        }
        set
    }

    fn apply(&mut self, key: &str, value: &PropertyValue) -> Result<()> {
        match key {
            ASPECTS => {
                let bytes = byte_payload(key, value)?;
                let ids = decode_u32_array(key, bytes)?;
                if ids.is_empty() {
                    warn!("device requirements declare an empty aspects list");
                }
                set_once(&mut self.aspects, key, ids.into_iter().collect())
            }
            REQD_SUB_GROUP_SIZE => {
                let size = match value {
                    PropertyValue::UInt32(v) => *v,
                    PropertyValue::Raw(text) => parse_decimal(key, text)?,
                    PropertyValue::ByteArray(bytes) => match decode_u32_array(key, bytes)?[..] {
                        [v] => v,
                        _ => {
                            return Err(PropertyError::WrongType {
                                name: key.to_string(),
                                expected: "exactly one packed 32-bit integer",
                            })
                        }
                    },
                };
                if size == 0 {
                    return Err(PropertyError::ZeroSubGroupSize);
                }
                set_once(&mut self.reqd_sub_group_size, key, size)
            }
            FIXED_TARGET => {
                let bytes = byte_payload(key, value)?;
                set_once(&mut self.fixed_target, key, bytes.to_vec())
            }
            _ => Ok(()),
        }
    }
}

/// Decode the device requirements of a property file.
///
/// Returns `Ok(None)` when the file has no `[SYCL/device requirements]`
/// line. Otherwise entries are read from the following lines for as long as
/// each starts with a recognized key; the first other line, a new section
/// header, or the end of the buffer ends the section.
pub fn parse_device_requirements(buffer: &[u8]) -> Result<Option<DeviceRequirements>> {
    let mut lines = lines(buffer);
    if !lines
        .by_ref()
        .any(|(_, line)| section_header(line) == Some(DEVICE_REQUIREMENTS))
    {
        return Ok(None);
    }

    let mut set = PropertySet::new(DEVICE_REQUIREMENTS);
    for (line_no, line) in lines {
        if !starts_with_recognized_key(line) {
            break;
        }
        let (key, value) = parse_entry(line_no, line)?;
        set.insert(key, value)?;
    }
    DeviceRequirements::from_property_set(&set).map(Some)
}

fn starts_with_recognized_key(line: &[u8]) -> bool {
    RECOGNIZED_KEYS.iter().any(|key| {
        line.strip_prefix(key.as_bytes())
            .and_then(|rest| rest.first())
            .is_some_and(|b| matches!(b, b'=' | b'|'))
    })
}

fn byte_payload<'a>(key: &str, value: &'a PropertyValue) -> Result<&'a [u8]> {
    match value {
        PropertyValue::ByteArray(bytes) | PropertyValue::Raw(bytes) => Ok(bytes),
        PropertyValue::UInt32(_) => Err(PropertyError::WrongType {
            name: key.to_string(),
            expected: "a byte array",
        }),
    }
}

fn set_once<T>(slot: &mut Option<T>, key: &str, value: T) -> Result<()> {
    if slot.is_some() {
        return Err(PropertyError::DuplicateEntry {
            section: DEVICE_REQUIREMENTS.to_string(),
            name: key.to_string(),
        });
    }
    *slot = Some(value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Option<DeviceRequirements>> {
        parse_device_requirements(text.as_bytes())
    }

    #[test]
    fn missing_section_means_no_requirements() {
        assert_eq!(parse("").unwrap(), None);
        assert_eq!(parse("[SYCL/misc properties]\noptLevel=1|2\n").unwrap(), None);
    }

    #[test]
    fn typed_entries() {
        let reqs = parse(
            "[SYCL/device requirements]\n\
             aspects=2|QAAAAAAAAAADAAAABQAAAA==\n\
             reqd_sub_group_size=1|16\n\
             fixed_target=2|aAAAAAAAAABpbnRlbF9ncHVfcHZj\n",
        )
        .unwrap()
        .unwrap();
        assert_eq!(reqs.aspects, Some(BTreeSet::from([3, 5])));
        assert_eq!(reqs.reqd_sub_group_size, Some(16));
        assert_eq!(reqs.fixed_target.as_deref(), Some(&b"intel_gpu_pvc"[..]));
    }

    #[test]
    fn untyped_entries() {
        let mut buffer = b"[SYCL/device requirements]\naspects|".to_vec();
        buffer.extend_from_slice(&encode_u32_array(&[3, 9]));
        buffer.extend_from_slice(b"\nreqd_sub_group_size|32\nfixed_target|nvidia_gpu_sm_80\n");
        let reqs = parse_device_requirements(&buffer).unwrap().unwrap();
        assert_eq!(reqs.aspects, Some(BTreeSet::from([3, 9])));
        assert_eq!(reqs.reqd_sub_group_size, Some(32));
        assert_eq!(reqs.fixed_target.as_deref(), Some(&b"nvidia_gpu_sm_80"[..]));
    }

    #[test]
    fn untyped_entries_with_crlf() {
        let mut buffer = b"[SYCL/device requirements]\r\naspects|".to_vec();
        buffer.extend_from_slice(&encode_u32_array(&[3]));
        buffer.extend_from_slice(b"\r\nreqd_sub_group_size|16\r\nfixed_target|intel_gpu_pvc\r\n");
        let reqs = parse_device_requirements(&buffer).unwrap().unwrap();
        assert_eq!(reqs.aspects, Some(BTreeSet::from([3])));
        assert_eq!(reqs.reqd_sub_group_size, Some(16));
        assert_eq!(reqs.fixed_target.as_deref(), Some(&b"intel_gpu_pvc"[..]));
    }

    #[test]
    fn crlf_fixed_target_alone() {
        let reqs = parse("[SYCL/device requirements]\r\nfixed_target|intel_gpu_pvc\r\n")
            .unwrap()
            .unwrap();
        assert_eq!(reqs.fixed_target.as_deref(), Some(&b"intel_gpu_pvc"[..]));
    }

    #[test]
    fn empty_section_has_no_constraints() {
        let reqs = parse("[SYCL/device requirements]\n").unwrap().unwrap();
        assert!(reqs.is_empty());
    }

    #[test]
    fn stops_at_next_section() {
        let reqs = parse(
            "[SYCL/device requirements]\n\
             reqd_sub_group_size=1|8\n\
             [SYCL/misc properties]\n\
             aspects=2|not base64 at all\n",
        )
        .unwrap()
        .unwrap();
        assert_eq!(reqs.reqd_sub_group_size, Some(8));
        assert_eq!(reqs.aspects, None);
    }

    #[test]
    fn stops_at_unrecognized_line() {
        let reqs = parse(
            "[SYCL/device requirements]\n\
             reqd_sub_group_size=1|8\n\
             joint_matrix=2|AAAAAAAAAAA=\n\
             aspects=2|not base64 at all\n",
        )
        .unwrap()
        .unwrap();
        assert_eq!(reqs.reqd_sub_group_size, Some(8));
        assert_eq!(reqs.aspects, None);
    }

    #[test]
    fn key_prefix_alone_is_not_recognized() {
        let reqs = parse("[SYCL/device requirements]\naspects_extra=1|3\n")
            .unwrap()
            .unwrap();
        assert!(reqs.is_empty());
    }

    #[test]
    fn header_must_be_a_whole_line() {
        assert_eq!(
            parse("[A]\nnote|[SYCL/device requirements]\naspects|xxxx\n").unwrap(),
            None
        );
    }

    #[test]
    fn misaligned_aspects_are_reported() {
        let err = parse("[SYCL/device requirements]\naspects|abcde\n").unwrap_err();
        assert!(matches!(err, PropertyError::Misaligned { len: 5, .. }));
    }

    #[test]
    fn aspects_as_integer_is_wrong_type() {
        let err = parse("[SYCL/device requirements]\naspects=1|3\n").unwrap_err();
        assert!(matches!(err, PropertyError::WrongType { .. }));
    }

    #[test]
    fn zero_sub_group_size_is_rejected() {
        let err = parse("[SYCL/device requirements]\nreqd_sub_group_size=1|0\n").unwrap_err();
        assert!(matches!(err, PropertyError::ZeroSubGroupSize));
    }

    #[test]
    fn packed_sub_group_size() {
        let reqs = parse("[SYCL/device requirements]\nreqd_sub_group_size=2|IAAAAAAAAAAQAAAA\n")
            .unwrap()
            .unwrap();
        assert_eq!(reqs.reqd_sub_group_size, Some(16));

        // Two packed integers where one is expected.
        let err = parse("[SYCL/device requirements]\nreqd_sub_group_size=2|QAAAAAAAAAADAAAABQAAAA==\n")
            .unwrap_err();
        assert!(matches!(err, PropertyError::WrongType { .. }));
    }

    #[test]
    fn malformed_sub_group_size() {
        let err = parse("[SYCL/device requirements]\nreqd_sub_group_size|x16\n").unwrap_err();
        assert!(matches!(err, PropertyError::InvalidInteger { .. }));
    }

    #[test]
    fn duplicate_key_is_rejected() {
        let err = parse(
            "[SYCL/device requirements]\n\
             reqd_sub_group_size=1|8\n\
             reqd_sub_group_size=1|16\n",
        )
        .unwrap_err();
        assert!(matches!(err, PropertyError::DuplicateEntry { .. }));
    }

    #[test]
    fn property_set_round_trip() {
        let reqs = DeviceRequirements {
            aspects: Some(BTreeSet::from([1, 5, 28])),
            reqd_sub_group_size: Some(32),
            fixed_target: Some(b"intel_gpu_pvc".to_vec()),
        };
        let mut buffer = b"[SYCL/misc properties]\noptLevel=1|2\n".to_vec();
        reqs.to_property_set().write_to(&mut buffer);
        assert_eq!(parse_device_requirements(&buffer).unwrap(), Some(reqs));
    }
}

//! Property sets and whole property files.

use crate::error::{PropertyError, Result};
use crate::value::PropertyValue;

/// A named `[Category]` section and its entries in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySet {
    name: String,
    entries: Vec<(String, PropertyValue)>,
}

impl PropertySet {
    /// Create an empty set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Section name without brackets.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[(String, PropertyValue)] {
        &self.entries
    }

    /// Whether the set has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by name.
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Add an entry. Names are unique within a set.
    pub fn insert(&mut self, key: impl Into<String>, value: PropertyValue) -> Result<()> {
        let key = key.into();
        if self.get(&key).is_some() {
            return Err(PropertyError::DuplicateEntry {
                section: self.name.clone(),
                name: key,
            });
        }
        self.entries.push((key, value));
        Ok(())
    }

    /// Add an entry whose name is known to be new.
    pub(crate) fn push(&mut self, key: &str, value: PropertyValue) {
        debug_assert!(self.get(key).is_none());
        self.entries.push((key.to_string(), value));
    }

    /// Append the section header and entries to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.push(b'[');
        out.extend_from_slice(self.name.as_bytes());
        out.extend_from_slice(b"]\n");
        for (key, value) in &self.entries {
            value.encode_entry(key, out);
            out.push(b'\n');
        }
    }
}

/// A parsed property file: every section in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyFile {
    sets: Vec<PropertySet>,
}

impl PropertyFile {
    /// Parse every section of a property file.
    ///
    /// Blank lines are skipped. Any other line must be a section header or
    /// an entry inside a section.
    pub fn parse(buffer: &[u8]) -> Result<Self> {
        let mut file = Self::default();
        for (line_no, line) in lines(buffer) {
            if trim_cr(line).is_empty() {
                continue;
            }
            if let Some(name) = section_header(line) {
                file.sets.push(PropertySet::new(name));
                continue;
            }
            let set = file
                .sets
                .last_mut()
                .ok_or(PropertyError::EntryOutsideSection { line: line_no })?;
            let (key, value) = parse_entry(line_no, line)?;
            set.insert(key, value)?;
        }
        Ok(file)
    }

    /// Add a section.
    pub fn push(&mut self, set: PropertySet) {
        self.sets.push(set);
    }

    /// Sections in file order.
    pub fn sets(&self) -> &[PropertySet] {
        &self.sets
    }

    /// First section with the given name.
    pub fn get(&self, name: &str) -> Option<&PropertySet> {
        self.sets.iter().find(|s| s.name == name)
    }

    /// Encode the whole file.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for set in &self.sets {
            set.write_to(&mut out);
        }
        out
    }
}

/// Split a buffer into `(line number, line)` pairs, line numbers one-based.
pub(crate) fn lines(buffer: &[u8]) -> impl Iterator<Item = (usize, &[u8])> {
    buffer
        .split(|b| *b == b'\n')
        .enumerate()
        .map(|(i, line)| (i + 1, line))
}

pub(crate) fn trim_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// The section name if `line` is a `[Name]` header.
pub(crate) fn section_header(line: &[u8]) -> Option<&str> {
    let inner = trim_cr(line).strip_prefix(b"[")?.strip_suffix(b"]")?;
    std::str::from_utf8(inner).ok()
}

/// Split an entry line into its name and decoded value.
pub(crate) fn parse_entry(line_no: usize, line: &[u8]) -> Result<(String, PropertyValue)> {
    let malformed = || PropertyError::MalformedEntry {
        line: line_no,
        text: String::from_utf8_lossy(trim_cr(line)).into_owned(),
    };
    let sep = line.iter().position(|b| *b == b'|').ok_or_else(malformed)?;
    let head = std::str::from_utf8(&line[..sep]).map_err(|_| malformed())?;
    let payload = trim_cr(&line[sep + 1..]);

    let (name, tag) = match head.split_once('=') {
        Some((name, tag)) => (name, Some(tag)),
        None => (head, None),
    };
    if name.is_empty() {
        return Err(malformed());
    }
    let value = PropertyValue::decode(name, tag, payload)?;
    Ok((name.to_string(), value))
}

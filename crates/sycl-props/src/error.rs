//! Error types for property file decoding.

/// Errors that can occur while decoding a property file.
#[derive(Debug, thiserror::Error)]
pub enum PropertyError {
    /// An entry line has no `|` separating name from value.
    #[error("line {line}: malformed property entry '{text}'")]
    MalformedEntry {
        /// One-based line number.
        line: usize,
        /// The offending line, lossily decoded.
        text: String,
    },

    /// The `=type` tag is not a known value type.
    #[error("property '{name}': unknown value type '{tag}'")]
    UnknownType {
        /// Property name.
        name: String,
        /// The tag as written.
        tag: String,
    },

    /// A textual integer failed to parse.
    #[error("property '{name}': invalid 32-bit integer '{value}'")]
    InvalidInteger {
        /// Property name.
        name: String,
        /// The text that failed to parse.
        value: String,
    },

    /// A byte array value is not valid base64.
    #[error("property '{name}': invalid base64 payload: {source}")]
    Base64 {
        /// Property name.
        name: String,
        /// Underlying decode error.
        source: base64::DecodeError,
    },

    /// A byte array is too short to hold its 64-bit size prefix.
    #[error("property '{name}': byte array of {len} bytes is missing its 8-byte size prefix")]
    TruncatedByteArray {
        /// Property name.
        name: String,
        /// Decoded length.
        len: usize,
    },

    /// A byte array's declared bit size does not match its contents.
    #[error("property '{name}': declared size of {bits} bits does not match {available} payload bytes")]
    SizeMismatch {
        /// Property name.
        name: String,
        /// Size prefix in bits.
        bits: u64,
        /// Payload bytes actually present.
        available: usize,
    },

    /// A packed integer array has a length that is not a multiple of the
    /// element width.
    #[error("property '{name}': payload of {len} bytes is not a multiple of {width}")]
    Misaligned {
        /// Property name.
        name: String,
        /// Payload length in bytes.
        len: usize,
        /// Element width in bytes.
        width: usize,
    },

    /// A property holds a value type it cannot be decoded from.
    #[error("property '{name}': expected {expected}")]
    WrongType {
        /// Property name.
        name: String,
        /// Description of what was expected.
        expected: &'static str,
    },

    /// A required sub-group size of zero.
    #[error("property 'reqd_sub_group_size': sub-group size must be positive")]
    ZeroSubGroupSize,

    /// The same property appears twice in one section.
    #[error("section [{section}]: duplicate property '{name}'")]
    DuplicateEntry {
        /// Section name.
        section: String,
        /// Property name.
        name: String,
    },

    /// An entry appears before any section header.
    #[error("line {line}: property entry outside of any [section]")]
    EntryOutsideSection {
        /// One-based line number.
        line: usize,
    },
}

/// Result type for property operations.
pub type Result<T> = std::result::Result<T, PropertyError>;

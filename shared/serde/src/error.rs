use thiserror::Error;

/// Errors produced while reading a bit stream
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerdeErr {
    /// The stream ended before the value was fully read
    #[error("Unexpected end of stream after {bits_read} bits")]
    UnexpectedEndOfStream { bits_read: u64 },

    /// A discriminant did not map to any known variant
    #[error("Invalid {type_name} tag {tag}")]
    InvalidTag { type_name: &'static str, tag: u64 },

    /// A string payload was not valid UTF-8
    #[error("String payload is not valid UTF-8")]
    InvalidUtf8,

    /// A length prefix claimed more data than the stream can hold
    #[error("Length {length} exceeds the {remaining_bits} bits remaining in the stream")]
    LengthOverflow { length: u64, remaining_bits: u64 },

    /// A variable-length integer did not fit into 64 bits
    #[error("Variable-length integer exceeds 64 bits")]
    IntegerOverflow,

    /// A variable-length integer was not in its shortest form
    #[error("Variable-length integer is not minimally encoded")]
    NonCanonicalInteger,
}

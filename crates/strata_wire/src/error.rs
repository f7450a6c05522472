use alloc::boxed::Box;

use thiserror::Error;

use crate::WireType;

/// An error raised while decoding wire bytes.
///
/// Offsets count bytes from the start of the buffer being read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum WireError {
    #[error("unexpected end of buffer at offset {0}")]
    UnexpectedEof(usize),
    #[error("varint at offset {0} does not fit in 64 bits")]
    VarintOverflow(usize),
    #[error("unsupported wire type {bits} at offset {offset}")]
    InvalidWireType { bits: u8, offset: usize },
    #[error("invalid field number {number} at offset {offset}")]
    InvalidFieldNumber { number: u64, offset: usize },
    #[error("field {number} expects {expected} encoding, found {found}")]
    UnexpectedWireType {
        number: u32,
        expected: WireType,
        found: WireType,
    },
    #[error("length-delimited field of {len} bytes at offset {offset} overruns the buffer")]
    LengthOverflow { len: u64, offset: usize },
    #[error("field number {0} is not declared by the message schema")]
    UndeclaredField(u32),
}

impl WireError {
    /// Shifts a buffer-relative offset by `base`.
    pub(crate) fn offset_by(self, base: usize) -> Self {
        match self {
            Self::UnexpectedEof(at) => Self::UnexpectedEof(base + at),
            Self::VarintOverflow(at) => Self::VarintOverflow(base + at),
            Self::InvalidWireType { bits, offset } => Self::InvalidWireType {
                bits,
                offset: base + offset,
            },
            Self::InvalidFieldNumber { number, offset } => Self::InvalidFieldNumber {
                number,
                offset: base + offset,
            },
            Self::LengthOverflow { len, offset } => Self::LengthOverflow {
                len,
                offset: base + offset,
            },
            other => other,
        }
    }
}

/// An error raised while adding a message schema to a [`SchemaPool`].
///
/// [`SchemaPool`]: crate::SchemaPool
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SchemaError {
    #[error("message `{0}` is already defined in the pool")]
    DuplicateMessage(Box<str>),
    #[error("`{0}` is not a valid schema identifier")]
    InvalidName(Box<str>),
    #[error("message `{message}` declares field number {number} more than once")]
    DuplicateFieldNumber { message: Box<str>, number: u32 },
    #[error("message `{message}` declares field `{field}` more than once")]
    DuplicateFieldName { message: Box<str>, field: Box<str> },
    #[error("field `{field}` of message `{message}` has number 0")]
    ZeroFieldNumber { message: Box<str>, field: Box<str> },
    #[error("field `{field}` of message `{message}` has number {number}, above the maximum")]
    FieldNumberOutOfRange {
        message: Box<str>,
        field: Box<str>,
        number: u32,
    },
    #[error("message `{0}` is not defined in the pool")]
    UnknownMessage(Box<str>),
}

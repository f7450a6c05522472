use alloc::vec::Vec;

use crate::varint::{encode_varint, varint_len};
use crate::{Message, WireType};

/// Appends encoded fields to a byte buffer.
///
/// The writer never checks presence: messages decide which fields they emit.
#[derive(Debug, Default, Clone)]
pub struct WireWriter {
    buf: Vec<u8>,
}

impl WireWriter {
    #[inline]
    pub const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Bytes written so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    #[inline]
    pub fn write_key(&mut self, number: u32, wire_type: WireType) {
        encode_varint(wire_type.key(number), &mut self.buf);
    }

    /// Writes an `int64` field (two's complement varint).
    #[inline]
    pub fn write_int64(&mut self, number: u32, value: i64) {
        self.write_key(number, WireType::Varint);
        encode_varint(value as u64, &mut self.buf);
    }

    #[inline]
    pub fn write_uint64(&mut self, number: u32, value: u64) {
        self.write_key(number, WireType::Varint);
        encode_varint(value, &mut self.buf);
    }

    /// Writes a `double` field as eight little-endian bytes.
    #[inline]
    pub fn write_double(&mut self, number: u32, value: f64) {
        self.write_key(number, WireType::Fixed64);
        self.buf.extend_from_slice(&value.to_bits().to_le_bytes());
    }

    #[inline]
    pub fn write_bytes(&mut self, number: u32, bytes: &[u8]) {
        self.write_key(number, WireType::LengthDelimited);
        encode_varint(bytes.len() as u64, &mut self.buf);
        self.buf.extend_from_slice(bytes);
    }

    /// Writes a nested message as a length-delimited field.
    pub fn write_message<M: Message + ?Sized>(&mut self, number: u32, message: &M) {
        let mut nested = WireWriter::new();
        message.encode_fields(&mut nested);
        let nested = nested.into_bytes();

        self.buf.reserve(varint_len(nested.len() as u64) + nested.len() + 1);
        self.write_bytes(number, &nested);
    }
}

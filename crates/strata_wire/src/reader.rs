use crate::varint::decode_varint;
use crate::{MAX_FIELD_NUMBER, Message, WireError, WireType};

/// The payload of one decoded field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireValue<'a> {
    Varint(u64),
    Fixed64(u64),
    Fixed32(u32),
    LengthDelimited(&'a [u8]),
}

impl<'a> WireValue<'a> {
    #[inline]
    pub const fn wire_type(&self) -> WireType {
        match self {
            Self::Varint(_) => WireType::Varint,
            Self::Fixed64(_) => WireType::Fixed64,
            Self::Fixed32(_) => WireType::Fixed32,
            Self::LengthDelimited(_) => WireType::LengthDelimited,
        }
    }

    /// Reads an `int64` payload.
    #[inline]
    pub fn as_int64(&self, number: u32) -> Result<i64, WireError> {
        match *self {
            Self::Varint(v) => Ok(v as i64),
            _ => Err(self.mismatch(number, WireType::Varint)),
        }
    }

    #[inline]
    pub fn as_uint64(&self, number: u32) -> Result<u64, WireError> {
        match *self {
            Self::Varint(v) => Ok(v),
            _ => Err(self.mismatch(number, WireType::Varint)),
        }
    }

    /// Reads a `double` payload.
    #[inline]
    pub fn as_double(&self, number: u32) -> Result<f64, WireError> {
        match *self {
            Self::Fixed64(bits) => Ok(f64::from_bits(bits)),
            _ => Err(self.mismatch(number, WireType::Fixed64)),
        }
    }

    /// Reads a length-delimited payload.
    #[inline]
    pub fn as_bytes(&self, number: u32) -> Result<&'a [u8], WireError> {
        match *self {
            Self::LengthDelimited(bytes) => Ok(bytes),
            _ => Err(self.mismatch(number, WireType::LengthDelimited)),
        }
    }

    /// Merges a length-delimited payload into `message`.
    pub fn merge_into<M: Message + ?Sized>(
        &self,
        number: u32,
        message: &mut M,
    ) -> Result<(), WireError> {
        message.merge(self.as_bytes(number)?)
    }

    fn mismatch(&self, number: u32, expected: WireType) -> WireError {
        WireError::UnexpectedWireType {
            number,
            expected,
            found: self.wire_type(),
        }
    }
}

/// Iterates the fields of an encoded message.
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    #[inline]
    pub const fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current offset into the buffer.
    #[inline]
    pub const fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub const fn is_at_end(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// Reads the next field, or `None` once the buffer is exhausted.
    pub fn next_field(&mut self) -> Result<Option<(u32, WireValue<'a>)>, WireError> {
        if self.is_at_end() {
            return Ok(None);
        }

        let key_offset = self.pos;
        let key = self.read_varint()?;

        let bits = (key & 0x7) as u8;
        let Some(wire_type) = WireType::from_bits(bits) else {
            return Err(WireError::InvalidWireType {
                bits,
                offset: key_offset,
            });
        };

        let number = key >> 3;
        if number == 0 || number > u64::from(MAX_FIELD_NUMBER) {
            return Err(WireError::InvalidFieldNumber {
                number,
                offset: key_offset,
            });
        }

        let value = match wire_type {
            WireType::Varint => WireValue::Varint(self.read_varint()?),
            WireType::Fixed64 => WireValue::Fixed64(u64::from_le_bytes(self.read_array()?)),
            WireType::Fixed32 => WireValue::Fixed32(u32::from_le_bytes(self.read_array()?)),
            WireType::LengthDelimited => {
                let len_offset = self.pos;
                let len = self.read_varint()?;
                let remaining = self.buf.len() - self.pos;
                if len > remaining as u64 {
                    return Err(WireError::LengthOverflow {
                        len,
                        offset: len_offset,
                    });
                }
                let start = self.pos;
                self.pos += len as usize;
                WireValue::LengthDelimited(&self.buf[start..self.pos])
            }
        };

        Ok(Some((number as u32, value)))
    }

    fn read_varint(&mut self) -> Result<u64, WireError> {
        let (value, used) =
            decode_varint(&self.buf[self.pos..]).map_err(|e| e.offset_by(self.pos))?;
        self.pos += used;
        Ok(value)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], WireError> {
        let end = self.pos + N;
        let Some(chunk) = self.buf.get(self.pos..end) else {
            return Err(WireError::UnexpectedEof(self.buf.len()));
        };
        let mut out = [0u8; N];
        out.copy_from_slice(chunk);
        self.pos = end;
        Ok(out)
    }
}

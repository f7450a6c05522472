use alloc::string::String;
use alloc::vec::Vec;
use core::ops::{Deref, DerefMut};

use strata_wire::{FloatValue, IntegerValue, Message, StringValue};

use super::{Codec, Context, Shape};
use crate::CodecError;

// -----------------------------------------------------------------------------
// Integer

macro_rules! impl_integer_codec {
    ($($ty:ty),* $(,)?) => {$(
        impl Codec for $ty {
            const SHAPE: Shape = Shape::Integer;

            #[inline]
            fn encode(&self, _: &Context<'_>) -> Result<Vec<u8>, CodecError> {
                Ok(Message::encode(&IntegerValue { value: *self as i64 }))
            }

            #[inline]
            fn decode(&mut self, bytes: &[u8], _: &Context<'_>) -> Result<(), CodecError> {
                *self = <IntegerValue as Message>::decode(bytes)?.value as $ty;
                Ok(())
            }
        }
    )*};
}

impl_integer_codec!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Codec for bool {
    const SHAPE: Shape = Shape::Integer;

    #[inline]
    fn encode(&self, _: &Context<'_>) -> Result<Vec<u8>, CodecError> {
        Ok(Message::encode(&IntegerValue {
            value: i64::from(*self),
        }))
    }

    #[inline]
    fn decode(&mut self, bytes: &[u8], _: &Context<'_>) -> Result<(), CodecError> {
        *self = <IntegerValue as Message>::decode(bytes)?.value != 0;
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Float

impl Codec for f64 {
    const SHAPE: Shape = Shape::Float;

    #[inline]
    fn encode(&self, _: &Context<'_>) -> Result<Vec<u8>, CodecError> {
        Ok(Message::encode(&FloatValue { value: *self }))
    }

    #[inline]
    fn decode(&mut self, bytes: &[u8], _: &Context<'_>) -> Result<(), CodecError> {
        *self = <FloatValue as Message>::decode(bytes)?.value;
        Ok(())
    }
}

impl Codec for f32 {
    const SHAPE: Shape = Shape::Float;

    #[inline]
    fn encode(&self, _: &Context<'_>) -> Result<Vec<u8>, CodecError> {
        Ok(Message::encode(&FloatValue {
            value: f64::from(*self),
        }))
    }

    #[inline]
    fn decode(&mut self, bytes: &[u8], _: &Context<'_>) -> Result<(), CodecError> {
        *self = <FloatValue as Message>::decode(bytes)?.value as f32;
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// String

impl Codec for String {
    const SHAPE: Shape = Shape::String;

    #[inline]
    fn encode(&self, _: &Context<'_>) -> Result<Vec<u8>, CodecError> {
        Ok(Message::encode(&StringValue {
            value: self.as_bytes().to_vec(),
        }))
    }

    fn decode(&mut self, bytes: &[u8], _: &Context<'_>) -> Result<(), CodecError> {
        let raw = <StringValue as Message>::decode(bytes)?.value;
        *self = String::from_utf8(raw).map_err(|_| CodecError::InvalidUtf8)?;
        Ok(())
    }
}

/// A byte string with [`Shape::String`] encoding.
///
/// `Vec<u8>` is a sequence of integers; wrap it in `Bytes` to store raw
/// bytes compactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    #[inline]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    #[inline]
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl Deref for Bytes {
    type Target = Vec<u8>;

    #[inline]
    fn deref(&self) -> &Vec<u8> {
        &self.0
    }
}

impl DerefMut for Bytes {
    #[inline]
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.0
    }
}

impl From<Vec<u8>> for Bytes {
    #[inline]
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

impl From<&[u8]> for Bytes {
    #[inline]
    fn from(value: &[u8]) -> Self {
        Self(value.to_vec())
    }
}

impl Codec for Bytes {
    const SHAPE: Shape = Shape::String;

    #[inline]
    fn encode(&self, _: &Context<'_>) -> Result<Vec<u8>, CodecError> {
        Ok(Message::encode(&StringValue {
            value: self.0.clone(),
        }))
    }

    #[inline]
    fn decode(&mut self, bytes: &[u8], _: &Context<'_>) -> Result<(), CodecError> {
        self.0 = <StringValue as Message>::decode(bytes)?.value;
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests

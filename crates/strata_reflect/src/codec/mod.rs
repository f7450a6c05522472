//! The type-directed codec.
//!
//! Every serializable type implements [`Codec`] and belongs to exactly one
//! [`Shape`], fixed at compile time. Each shape maps onto one envelope
//! message from [`strata_wire::envelope`]; containers encode every element
//! independently and nest the results, so any composition of supported
//! types is itself supported.
//!
//! | Shape | Types |
//! |---|---|
//! | [`Integer`](Shape::Integer) | `i8`..`i64`, `u8`..`u64`, `isize`, `usize`, `bool` |
//! | [`Float`](Shape::Float) | `f32`, `f64` |
//! | [`String`](Shape::String) | `String`, [`Bytes`] |
//! | [`Message`](Shape::Message) | envelope messages, [`Archiver`](crate::Archiver), [`impl_message_codec!`] types |
//! | [`Sequence`](Shape::Sequence) | `Vec`, `VecDeque`, `LinkedList` |
//! | [`Set`](Shape::Set) | `BTreeSet`, `HashSet` |
//! | [`Map`](Shape::Map) | `BTreeMap`, `HashMap` |
//! | [`UserDefined`](Shape::UserDefined) | hand-written impls, [`impl_dynamic_codec!`] types |
//!
//! Integer width and signedness are not part of the encoding: a value
//! written as `i64` can be read back as `u8`, truncating like `as`.
//!
//! Sets and sequences share one encoding, so a `BTreeSet` can be read into a
//! `HashSet` or a `Vec`. Unordered containers encode in iteration order.
//!
//! [`impl_message_codec!`]: crate::impl_message_codec
//! [`impl_dynamic_codec!`]: crate::impl_dynamic_codec

// -----------------------------------------------------------------------------
// Modules

mod container;
mod context;
mod dynamic;
mod message;
mod scalar;

// -----------------------------------------------------------------------------
// Exports

pub use context::{CodecConfig, Context, ElementPolicy};
pub use dynamic::{decode_dynamic, encode_dynamic};
pub use scalar::Bytes;

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::CodecError;

// -----------------------------------------------------------------------------
// Codec

/// The compile-time category of a [`Codec`] type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Integer,
    Float,
    String,
    Message,
    Sequence,
    Set,
    Map,
    UserDefined,
}

/// A type that can be encoded to and decoded from envelope bytes.
///
/// `decode` replaces the value. Scalars and messages are all-or-nothing: on
/// error the value is unchanged. Containers are rebuilt from scratch and
/// apply the context's [`ElementPolicy`] to elements that fail.
///
/// # Implementing
///
/// Hand-written impls use [`Shape::UserDefined`] and usually delegate to
/// other codecs:
///
/// ```
/// use strata_reflect::codec::{Codec, Context, Shape};
/// use strata_reflect::{Archiver, CodecError};
///
/// #[derive(Default)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl Codec for Point {
///     const SHAPE: Shape = Shape::UserDefined;
///
///     fn encode(&self, cx: &Context<'_>) -> Result<Vec<u8>, CodecError> {
///         let mut ar = Archiver::with_context(*cx);
///         ar.push(&self.x)?;
///         ar.push(&self.y)?;
///         ar.encode(cx)
///     }
///
///     fn decode(&mut self, bytes: &[u8], cx: &Context<'_>) -> Result<(), CodecError> {
///         let mut ar = Archiver::with_context(*cx);
///         ar.decode(bytes, cx)?;
///         ar.pop(&mut self.x)?;
///         ar.pop(&mut self.y)?;
///         Ok(())
///     }
/// }
///
/// let bytes = strata_reflect::serialize(&Point { x: 3, y: -4 }).unwrap();
/// let mut p = Point::default();
/// strata_reflect::deserialize(&mut p, &bytes).unwrap();
/// assert_eq!((p.x, p.y), (3, -4));
/// ```
pub trait Codec {
    const SHAPE: Shape;

    fn encode(&self, cx: &Context<'_>) -> Result<Vec<u8>, CodecError>;

    fn decode(&mut self, bytes: &[u8], cx: &Context<'_>) -> Result<(), CodecError>;
}

impl<T: Codec + ?Sized> Codec for Box<T> {
    const SHAPE: Shape = T::SHAPE;

    #[inline]
    fn encode(&self, cx: &Context<'_>) -> Result<Vec<u8>, CodecError> {
        (**self).encode(cx)
    }

    #[inline]
    fn decode(&mut self, bytes: &[u8], cx: &Context<'_>) -> Result<(), CodecError> {
        (**self).decode(bytes, cx)
    }
}

// -----------------------------------------------------------------------------
// Entry points

/// Encodes `value` with a default [`Context`].
///
/// Types using a dynamic schema need [`serialize_with`] and a context that
/// carries the [`SchemaRegistry`](crate::schema::SchemaRegistry).
#[inline]
pub fn serialize<T: Codec + ?Sized>(value: &T) -> Result<Vec<u8>, CodecError> {
    value.encode(&Context::new())
}

#[inline]
pub fn serialize_with<T: Codec + ?Sized>(
    value: &T,
    cx: &Context<'_>,
) -> Result<Vec<u8>, CodecError> {
    value.encode(cx)
}

/// Decodes `bytes` into `value` with a default [`Context`].
#[inline]
pub fn deserialize<T: Codec + ?Sized>(value: &mut T, bytes: &[u8]) -> Result<(), CodecError> {
    value.decode(bytes, &Context::new())
}

#[inline]
pub fn deserialize_with<T: Codec + ?Sized>(
    value: &mut T,
    bytes: &[u8],
    cx: &Context<'_>,
) -> Result<(), CodecError> {
    value.decode(bytes, cx)
}

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::type_name;

use strata_wire::{DynamicMessage, Message, MessageDescriptor};

use super::Context;
use crate::CodecError;
use crate::registry::Struct;
use crate::schema::MappingInfo;

/// Looks up the built mapping of `T` in the context's schema registry.
fn built_mapping<'a, T: 'static>(
    cx: &Context<'a>,
) -> Result<(&'a Struct<T>, &'a Arc<MessageDescriptor>), CodecError> {
    cx.schemas()
        .and_then(|schemas| schemas.mapping::<T>())
        .and_then(|mapping| Some((mapping.struct_desc(), mapping.message()?)))
        .ok_or(CodecError::SchemaNotFound(type_name::<T>()))
}

/// Encodes `value` through its built dynamic schema.
///
/// Every property is encoded with its own codec and stored in the field
/// numbered by its tag.
///
/// # Errors
///
/// [`CodecError::SchemaNotFound`] if the context has no built mapping for
/// `T`; [`CodecError::Property`] if a property fails to encode.
pub fn encode_dynamic<T: 'static>(value: &T, cx: &Context<'_>) -> Result<Vec<u8>, CodecError> {
    let (desc, message) = built_mapping::<T>(cx)?;

    let mut dynamic = DynamicMessage::new(Arc::clone(message));
    for prop in desc.properties() {
        let data = prop
            .encode(value, cx)
            .map_err(|source| CodecError::property(prop.name(), source))?;
        dynamic.set(u32::from(prop.tag()), data)?;
    }
    Ok(Message::encode(&dynamic))
}

/// Decodes `bytes` into `value` through its built dynamic schema.
///
/// Properties whose field is absent keep their value. Properties are
/// decoded in declaration order and decoding stops at the first failure, so
/// earlier properties may already be updated.
///
/// # Errors
///
/// [`CodecError::SchemaNotFound`], [`CodecError::Wire`] if the envelope does
/// not parse (`value` untouched), or [`CodecError::Property`].
pub fn decode_dynamic<T: 'static>(
    value: &mut T,
    bytes: &[u8],
    cx: &Context<'_>,
) -> Result<(), CodecError> {
    let (desc, message) = built_mapping::<T>(cx)?;

    let mut dynamic = DynamicMessage::new(Arc::clone(message));
    dynamic.parse(bytes)?;

    for prop in desc.properties() {
        if let Some(data) = dynamic.get(u32::from(prop.tag())) {
            prop.decode(value, data, cx)
                .map_err(|source| CodecError::property(prop.name(), source))?;
        }
    }
    Ok(())
}

/// Implements [`Codec`](crate::codec::Codec) with
/// [`Shape::UserDefined`](crate::codec::Shape::UserDefined) through the
/// type's dynamic schema.
///
/// The type needs a built mapping in the
/// [`SchemaRegistry`](crate::schema::SchemaRegistry) of the context it is
/// encoded with; see [`encode_dynamic`] and [`decode_dynamic`].
#[macro_export]
macro_rules! impl_dynamic_codec {
    ($($ty:ty),* $(,)?) => {$(
        impl $crate::codec::Codec for $ty {
            const SHAPE: $crate::codec::Shape = $crate::codec::Shape::UserDefined;

            #[inline]
            fn encode(
                &self,
                cx: &$crate::codec::Context<'_>,
            ) -> ::core::result::Result<
                $crate::__macro_exports::alloc_utils::Vec<u8>,
                $crate::CodecError,
            > {
                $crate::codec::encode_dynamic(self, cx)
            }

            #[inline]
            fn decode(
                &mut self,
                bytes: &[u8],
                cx: &$crate::codec::Context<'_>,
            ) -> ::core::result::Result<(), $crate::CodecError> {
                $crate::codec::decode_dynamic(self, bytes, cx)
            }
        }
    )*};
}

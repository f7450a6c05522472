use strata_wire::{Archive, ArchiveMember, AssociateEntry, AssociateValue};
use strata_wire::{DynamicMessage, FloatValue, IntegerValue, SequenceValue, StringValue};

/// Implements [`Codec`](crate::codec::Codec) with [`Shape::Message`] for
/// types implementing [`Message`](crate::wire::Message) and `Clone`.
///
/// The message is written as-is. Decoding parses into a copy and only
/// replaces the value on success.
///
/// [`Shape::Message`]: crate::codec::Shape::Message
///
/// ```
/// use strata_reflect::impl_message_codec;
/// use strata_reflect::wire::{Message, WireError, WireValue, WireWriter};
///
/// #[derive(Clone, Default, PartialEq, Debug)]
/// struct Ping {
///     seq: i64,
/// }
///
/// impl Message for Ping {
///     fn encode_fields(&self, w: &mut WireWriter) {
///         if self.seq != 0 {
///             w.write_int64(1, self.seq);
///         }
///     }
///     fn merge_field(&mut self, number: u32, value: WireValue<'_>) -> Result<(), WireError> {
///         if number == 1 {
///             self.seq = value.as_int64(number)?;
///         }
///         Ok(())
///     }
///     fn clear(&mut self) {
///         self.seq = 0;
///     }
/// }
///
/// impl_message_codec!(Ping);
///
/// let pings = vec![Ping { seq: 1 }, Ping { seq: 2 }];
/// let bytes = strata_reflect::serialize(&pings).unwrap();
/// let mut back = Vec::<Ping>::new();
/// strata_reflect::deserialize(&mut back, &bytes).unwrap();
/// assert_eq!(back, pings);
/// ```
#[macro_export]
macro_rules! impl_message_codec {
    ($($ty:ty),* $(,)?) => {$(
        impl $crate::codec::Codec for $ty {
            const SHAPE: $crate::codec::Shape = $crate::codec::Shape::Message;

            #[inline]
            fn encode(
                &self,
                _: &$crate::codec::Context<'_>,
            ) -> ::core::result::Result<
                $crate::__macro_exports::alloc_utils::Vec<u8>,
                $crate::CodecError,
            > {
                ::core::result::Result::Ok($crate::wire::Message::encode(self))
            }

            fn decode(
                &mut self,
                bytes: &[u8],
                _: &$crate::codec::Context<'_>,
            ) -> ::core::result::Result<(), $crate::CodecError> {
                let mut next = ::core::clone::Clone::clone(self);
                $crate::wire::Message::parse(&mut next, bytes)?;
                *self = next;
                ::core::result::Result::Ok(())
            }
        }
    )*};
}

impl_message_codec!(
    IntegerValue,
    FloatValue,
    StringValue,
    ArchiveMember,
    SequenceValue,
    AssociateEntry,
    AssociateValue,
    Archive,
    DynamicMessage,
);

#[cfg(test)]
mod tests {
    use crate::codec::{Codec, Shape};
    use crate::{CodecError, deserialize, serialize};
    use alloc::vec;
    use strata_wire::{Archive, ArchiveMember, IntegerValue, Message};

    #[test]
    fn message_is_written_verbatim() {
        let archive = Archive {
            members: vec![ArchiveMember::new(vec![1, 2, 3])],
        };
        assert_eq!(serialize(&archive).unwrap(), Message::encode(&archive));
        assert_eq!(<Archive as Codec>::SHAPE, Shape::Message);
    }

    #[test]
    fn failed_parse_keeps_message() {
        let mut value = IntegerValue { value: 12 };
        assert!(matches!(
            deserialize(&mut value, &[0x08]),
            Err(CodecError::Wire(_))
        ));
        assert_eq!(value.value, 12);
    }
}

use alloc::collections::{BTreeMap, BTreeSet, LinkedList, VecDeque};
use alloc::vec::Vec;
use core::hash::{BuildHasher, Hash};

use strata_utils::hash::hashbrown;
use strata_wire::{ArchiveMember, AssociateEntry, AssociateValue, Message, SequenceValue};

use super::{Codec, Context, Shape};
use crate::CodecError;

// -----------------------------------------------------------------------------
// Element helpers

fn encode_elements<'a, E: Codec + 'a>(
    elements: impl IntoIterator<Item = &'a E>,
    cx: &Context<'_>,
) -> Result<Vec<u8>, CodecError> {
    let mut seq = SequenceValue::default();
    for (index, element) in elements.into_iter().enumerate() {
        let data = element
            .encode(cx)
            .map_err(|source| CodecError::element(index, source))?;
        seq.values.push(ArchiveMember::new(data));
    }
    Ok(Message::encode(&seq))
}

/// Decodes every element of a `SequenceValue` and hands the survivors to
/// `sink` in wire order.
fn decode_elements<E: Codec + Default>(
    bytes: &[u8],
    cx: &Context<'_>,
    mut sink: impl FnMut(E),
) -> Result<(), CodecError> {
    let seq = <SequenceValue as Message>::decode(bytes)?;
    for (index, member) in seq.values.iter().enumerate() {
        let mut element = E::default();
        match element.decode(&member.data, cx) {
            Ok(()) => sink(element),
            Err(source) => cx.element_failed(index, source)?,
        }
    }
    Ok(())
}

fn encode_entries<'a, K: Codec + 'a, V: Codec + 'a>(
    entries: impl IntoIterator<Item = (&'a K, &'a V)>,
    cx: &Context<'_>,
) -> Result<Vec<u8>, CodecError> {
    let mut assoc = AssociateValue::default();
    for (index, (key, value)) in entries.into_iter().enumerate() {
        let wrap = |source: CodecError| CodecError::element(index, source);
        assoc.values.push(AssociateEntry {
            key: ArchiveMember::new(key.encode(cx).map_err(wrap)?),
            value: ArchiveMember::new(value.encode(cx).map_err(wrap)?),
        });
    }
    Ok(Message::encode(&assoc))
}

/// A pair is kept only if both its key and its value decode.
fn decode_entries<K: Codec + Default, V: Codec + Default>(
    bytes: &[u8],
    cx: &Context<'_>,
    mut sink: impl FnMut(K, V),
) -> Result<(), CodecError> {
    let assoc = <AssociateValue as Message>::decode(bytes)?;
    for (index, entry) in assoc.values.iter().enumerate() {
        let mut key = K::default();
        let mut value = V::default();
        let decoded = key
            .decode(&entry.key.data, cx)
            .and_then(|()| value.decode(&entry.value.data, cx));
        match decoded {
            Ok(()) => sink(key, value),
            Err(source) => cx.element_failed(index, source)?,
        }
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// Sequences
//
// Decoding collects the elements first and then extends the target, so
// existing contents are kept and a failed decode leaves the target as it
// was. Sets and maps extend through their own `insert`.

macro_rules! impl_sequence_codec {
    ($($ty:ident :: $push:ident),* $(,)?) => {$(
        impl<E: Codec + Default> Codec for $ty<E> {
            const SHAPE: Shape = Shape::Sequence;

            fn encode(&self, cx: &Context<'_>) -> Result<Vec<u8>, CodecError> {
                encode_elements(self, cx)
            }

            fn decode(&mut self, bytes: &[u8], cx: &Context<'_>) -> Result<(), CodecError> {
                let mut out = $ty::new();
                decode_elements(bytes, cx, |e| out.$push(e))?;
                self.extend(out);
                Ok(())
            }
        }
    )*};
}

impl_sequence_codec!(Vec::push, VecDeque::push_back, LinkedList::push_back);

// -----------------------------------------------------------------------------
// Sets

impl<E: Codec + Default + Ord> Codec for BTreeSet<E> {
    const SHAPE: Shape = Shape::Set;

    fn encode(&self, cx: &Context<'_>) -> Result<Vec<u8>, CodecError> {
        encode_elements(self, cx)
    }

    fn decode(&mut self, bytes: &[u8], cx: &Context<'_>) -> Result<(), CodecError> {
        let mut out = BTreeSet::new();
        decode_elements(bytes, cx, |e| {
            out.insert(e);
        })?;
        self.extend(out);
        Ok(())
    }
}

impl<E, S> Codec for hashbrown::HashSet<E, S>
where
    E: Codec + Default + Eq + Hash,
    S: BuildHasher + Default,
{
    const SHAPE: Shape = Shape::Set;

    fn encode(&self, cx: &Context<'_>) -> Result<Vec<u8>, CodecError> {
        encode_elements(self, cx)
    }

    fn decode(&mut self, bytes: &[u8], cx: &Context<'_>) -> Result<(), CodecError> {
        let mut out = Self::default();
        decode_elements(bytes, cx, |e| {
            out.insert(e);
        })?;
        self.extend(out);
        Ok(())
    }
}

#[cfg(feature = "std")]
impl<E, S> Codec for std::collections::HashSet<E, S>
where
    E: Codec + Default + Eq + Hash,
    S: BuildHasher + Default,
{
    const SHAPE: Shape = Shape::Set;

    fn encode(&self, cx: &Context<'_>) -> Result<Vec<u8>, CodecError> {
        encode_elements(self, cx)
    }

    fn decode(&mut self, bytes: &[u8], cx: &Context<'_>) -> Result<(), CodecError> {
        let mut out = Self::default();
        decode_elements(bytes, cx, |e| {
            out.insert(e);
        })?;
        self.extend(out);
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Maps

impl<K, V> Codec for BTreeMap<K, V>
where
    K: Codec + Default + Ord,
    V: Codec + Default,
{
    const SHAPE: Shape = Shape::Map;

    fn encode(&self, cx: &Context<'_>) -> Result<Vec<u8>, CodecError> {
        encode_entries(self, cx)
    }

    fn decode(&mut self, bytes: &[u8], cx: &Context<'_>) -> Result<(), CodecError> {
        let mut out = BTreeMap::new();
        decode_entries(bytes, cx, |k, v| {
            out.insert(k, v);
        })?;
        self.extend(out);
        Ok(())
    }
}

impl<K, V, S> Codec for hashbrown::HashMap<K, V, S>
where
    K: Codec + Default + Eq + Hash,
    V: Codec + Default,
    S: BuildHasher + Default,
{
    const SHAPE: Shape = Shape::Map;

    fn encode(&self, cx: &Context<'_>) -> Result<Vec<u8>, CodecError> {
        encode_entries(self, cx)
    }

    fn decode(&mut self, bytes: &[u8], cx: &Context<'_>) -> Result<(), CodecError> {
        let mut out = Self::default();
        decode_entries(bytes, cx, |k, v| {
            out.insert(k, v);
        })?;
        self.extend(out);
        Ok(())
    }
}

#[cfg(feature = "std")]
impl<K, V, S> Codec for std::collections::HashMap<K, V, S>
where
    K: Codec + Default + Eq + Hash,
    V: Codec + Default,
    S: BuildHasher + Default,
{
    const SHAPE: Shape = Shape::Map;

    fn encode(&self, cx: &Context<'_>) -> Result<Vec<u8>, CodecError> {
        encode_entries(self, cx)
    }

    fn decode(&mut self, bytes: &[u8], cx: &Context<'_>) -> Result<(), CodecError> {
        let mut out = Self::default();
        decode_entries(bytes, cx, |k, v| {
            out.insert(k, v);
        })?;
        self.extend(out);
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::collections::{BTreeMap, BTreeSet, LinkedList, VecDeque};
    use alloc::string::{String, ToString};
    use alloc::vec;
    use alloc::vec::Vec;

    use strata_utils::hash::{HashMap, HashSet};
    use strata_wire::{ArchiveMember, Message, SequenceValue};

    use crate::codec::{CodecConfig, Context, ElementPolicy};
    use crate::{CodecError, deserialize, deserialize_with, serialize};

    #[test]
    fn nested_sequences() {
        let value: Vec<Vec<u32>> = vec![vec![1, 2], vec![], vec![3]];
        let mut back = Vec::<Vec<u32>>::new();
        deserialize(&mut back, &serialize(&value).unwrap()).unwrap();
        assert_eq!(back, value);

        let deque: VecDeque<i16> = [5, -6].into_iter().collect();
        let mut list = LinkedList::<i64>::new();
        deserialize(&mut list, &serialize(&deque).unwrap()).unwrap();
        assert_eq!(list.into_iter().collect::<Vec<_>>(), [5, -6]);
    }

    #[test]
    fn decode_appends_to_existing_contents() {
        let mut out = vec![9_u32];
        deserialize(&mut out, &serialize(&vec![1_u32, 2]).unwrap()).unwrap();
        assert_eq!(out, [9, 1, 2]);

        let mut set = BTreeSet::from([2_u8, 5]);
        deserialize(&mut set, &serialize(&vec![1_u8, 2]).unwrap()).unwrap();
        assert_eq!(set, BTreeSet::from([1, 2, 5]));

        let mut map = BTreeMap::from([(1_u8, 10_u8), (2, 20)]);
        deserialize(&mut map, &serialize(&BTreeMap::from([(2_u8, 22_u8), (3, 33)])).unwrap())
            .unwrap();
        assert_eq!(map, BTreeMap::from([(1, 10), (2, 22), (3, 33)]));

        deserialize(&mut map, &[]).unwrap();
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn set_into_other_set() {
        let ordered: BTreeSet<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let mut hashed: HashSet<String> = HashSet::default();
        deserialize(&mut hashed, &serialize(&ordered).unwrap()).unwrap();
        assert_eq!(hashed.len(), 3);
        assert!(ordered.iter().all(|s| hashed.contains(s)));
    }

    #[test]
    fn map_of_lists() {
        let mut map: HashMap<u32, Vec<String>> = HashMap::default();
        map.insert(7, vec!["x".to_string()]);
        map.insert(8, Vec::new());

        let mut back: HashMap<u32, Vec<String>> = HashMap::default();
        deserialize(&mut back, &serialize(&map).unwrap()).unwrap();
        assert_eq!(back, map);
    }

    fn sequence_with_bad_middle() -> Vec<u8> {
        let seq = SequenceValue {
            values: vec![
                ArchiveMember::new(serialize(&String::from("ok")).unwrap()),
                ArchiveMember::new(serialize(&crate::codec::Bytes(vec![0xFF])).unwrap()),
                ArchiveMember::new(serialize(&String::from("fine")).unwrap()),
            ],
        };
        Message::encode(&seq)
    }

    #[test]
    fn skip_policy_drops_bad_elements() {
        let mut out = Vec::<String>::new();
        deserialize(&mut out, &sequence_with_bad_middle()).unwrap();
        assert_eq!(out, ["ok", "fine"]);
    }

    #[test]
    fn fail_policy_reports_index() {
        let config = CodecConfig::new().with_element_policy(ElementPolicy::Fail);
        let cx = Context::new().with_config(config);

        let mut out = vec![String::from("before")];
        let err = deserialize_with(&mut out, &sequence_with_bad_middle(), &cx).unwrap_err();
        assert!(matches!(err, CodecError::Element { index: 1, .. }));
        assert_eq!(out, ["before"]);
    }

    #[test]
    fn bad_envelope_fails_whole_container() {
        let mut out = vec![1_u8];
        assert!(matches!(
            deserialize(&mut out, &[0x0A, 0x09]),
            Err(CodecError::Wire(_))
        ));
        assert_eq!(out, [1]);
    }
}

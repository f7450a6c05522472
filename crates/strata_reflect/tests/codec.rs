use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList, VecDeque};

use strata_reflect::codec::{Bytes, Codec, CodecConfig, Context, ElementPolicy, Shape};
use strata_reflect::{CodecError, deserialize, deserialize_with, serialize};

fn round_trip<T: Codec + Default>(value: &T) -> T {
    let bytes = serialize(value).unwrap();
    let mut back = T::default();
    deserialize(&mut back, &bytes).unwrap();
    back
}

fn convert<S: Codec, D: Codec + Default>(value: &S) -> D {
    let bytes = serialize(value).unwrap();
    let mut back = D::default();
    deserialize(&mut back, &bytes).unwrap();
    back
}

#[test]
fn scalars_round_trip() {
    assert_eq!(round_trip(&i8::MIN), i8::MIN);
    assert_eq!(round_trip(&i64::MAX), i64::MAX);
    assert_eq!(round_trip(&u64::MAX), u64::MAX);
    assert_eq!(round_trip(&-12345_isize), -12345);
    assert_eq!(round_trip(&usize::MAX), usize::MAX);
    assert!(round_trip(&true));
    assert_eq!(round_trip(&-0.5_f64), -0.5);
    assert_eq!(round_trip(&f32::MAX), f32::MAX);
    assert_eq!(round_trip(&String::from("héllo")), "héllo");
    assert_eq!(round_trip(&Bytes(vec![0, 0xff, 7])).0, [0, 0xff, 7]);
}

#[test]
fn defaults_are_not_written() {
    assert!(serialize(&0_i32).unwrap().is_empty());
    assert!(serialize(&0.0_f64).unwrap().is_empty());
    assert!(serialize(&String::new()).unwrap().is_empty());
    assert!(serialize(&false).unwrap().is_empty());

    let mut value = 17_u16;
    deserialize(&mut value, &[]).unwrap();
    assert_eq!(value, 0);

    let mut text = String::from("stale");
    deserialize(&mut text, &[]).unwrap();
    assert!(text.is_empty());
}

#[test]
fn cross_width_truncates() {
    assert_eq!(convert::<i32, u8>(&300), 44);
    assert_eq!(convert::<i64, u64>(&-1), u64::MAX);
    assert_eq!(convert::<i64, u32>(&-1), u32::MAX);
    assert_eq!(convert::<u8, i64>(&200), 200);
    assert_eq!(convert::<bool, i32>(&true), 1);
    assert!(convert::<u8, bool>(&7));
}

#[test]
fn float_narrowing() {
    let narrowed: f32 = convert(&1.1_f64);
    assert_eq!(narrowed, 1.1_f64 as f32);

    let widened: f64 = convert(&0.25_f32);
    assert_eq!(widened, 0.25);
}

#[test]
fn invalid_utf8_leaves_string_untouched() {
    let bytes = serialize(&Bytes(vec![0xff, 0xfe])).unwrap();
    let mut text = String::from("keep");
    assert_eq!(deserialize(&mut text, &bytes), Err(CodecError::InvalidUtf8));
    assert_eq!(text, "keep");
}

#[test]
fn shapes() {
    assert_eq!(<u32 as Codec>::SHAPE, Shape::Integer);
    assert_eq!(<f32 as Codec>::SHAPE, Shape::Float);
    assert_eq!(<Bytes as Codec>::SHAPE, Shape::String);
    assert_eq!(<VecDeque<u8> as Codec>::SHAPE, Shape::Sequence);
    assert_eq!(<HashSet<u8> as Codec>::SHAPE, Shape::Set);
    assert_eq!(<BTreeMap<u8, u8> as Codec>::SHAPE, Shape::Map);
    assert_eq!(<Box<String> as Codec>::SHAPE, Shape::String);
}

#[test]
fn nested_sequences() {
    let value: Vec<Vec<String>> = vec![
        vec!["a".into(), "b".into()],
        vec![],
        vec!["c".into()],
    ];
    assert_eq!(round_trip(&value), value);

    let deque: VecDeque<LinkedList<i16>> =
        VecDeque::from([LinkedList::from([1, -2]), LinkedList::from([3])]);
    assert_eq!(round_trip(&deque), deque);
}

#[test]
fn containers_decode_by_insertion() {
    let mut target = vec![9_u32];
    deserialize(&mut target, &serialize(&vec![1_u32, 2]).unwrap()).unwrap();
    assert_eq!(target, [9, 1, 2]);

    let mut deque = VecDeque::from([String::from("head")]);
    deserialize(&mut deque, &serialize(&vec![String::from("tail")]).unwrap()).unwrap();
    assert_eq!(deque, ["head", "tail"]);

    let mut unique: HashSet<u8> = HashSet::from([1, 2]);
    deserialize(&mut unique, &serialize(&vec![2_u8, 3, 3]).unwrap()).unwrap();
    assert_eq!(unique, HashSet::from([1, 2, 3]));

    let mut map = HashMap::from([(String::from("a"), 1_i32), (String::from("b"), 2)]);
    let update = BTreeMap::from([(String::from("b"), 20_i32), (String::from("c"), 30)]);
    deserialize(&mut map, &serialize(&update).unwrap()).unwrap();
    assert_eq!(
        map,
        HashMap::from([
            (String::from("a"), 1),
            (String::from("b"), 20),
            (String::from("c"), 30),
        ])
    );
}

#[test]
fn sequence_and_set_share_the_wire() {
    let set: BTreeSet<u32> = convert(&vec![3_u32, 1, 3, 2]);
    assert_eq!(set, BTreeSet::from([1, 2, 3]));

    let list: Vec<u32> = convert(&BTreeSet::from([9_u32, 4]));
    assert_eq!(list, [4, 9]);

    let hashed: HashSet<String> = convert(&vec![String::from("x"), String::from("x")]);
    assert_eq!(hashed.len(), 1);
}

#[test]
fn maps_round_trip() {
    let mut map: HashMap<String, Vec<i32>> = HashMap::new();
    map.insert("odd".into(), vec![1, 3]);
    map.insert("even".into(), vec![2, 4]);
    map.insert("none".into(), vec![]);
    assert_eq!(round_trip(&map), map);

    let nested: BTreeMap<i8, BTreeMap<String, f64>> =
        BTreeMap::from([(1, BTreeMap::from([("pi".into(), 3.5)])), (-1, BTreeMap::new())]);
    assert_eq!(round_trip(&nested), nested);
}

#[test]
fn element_policy_skip_and_fail() {
    let raw = vec![
        Bytes(b"ok".to_vec()),
        Bytes(vec![0xff]),
        Bytes(b"fine".to_vec()),
    ];
    let bytes = serialize(&raw).unwrap();

    let mut skipped: Vec<String> = Vec::new();
    deserialize(&mut skipped, &bytes).unwrap();
    assert_eq!(skipped, ["ok", "fine"]);

    let strict = Context::new()
        .with_config(CodecConfig::new().with_element_policy(ElementPolicy::Fail));
    let mut failed = vec![String::from("untouched")];
    let err = deserialize_with(&mut failed, &bytes, &strict).unwrap_err();
    match err {
        CodecError::Element { index, source } => {
            assert_eq!(index, 1);
            assert_eq!(*source, CodecError::InvalidUtf8);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(failed, ["untouched"]);
}

#[test]
fn map_entries_need_both_halves() {
    let raw = BTreeMap::from([(Bytes(b"good".to_vec()), 1_u8), (Bytes(vec![0xc0]), 2)]);
    let bytes = serialize(&raw).unwrap();

    let mut back: BTreeMap<String, u8> = BTreeMap::new();
    deserialize(&mut back, &bytes).unwrap();
    assert_eq!(back, BTreeMap::from([(String::from("good"), 1)]));
}

#[test]
fn malformed_envelope_is_a_wire_error() {
    let mut target = vec![1_i32];
    let err = deserialize(&mut target, &[0x0a, 0x05, 0x01]).unwrap_err();
    assert!(matches!(err, CodecError::Wire(_)));
    assert_eq!(target, [1]);
}

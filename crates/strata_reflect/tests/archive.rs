use std::collections::BTreeMap;

use strata_reflect::codec::{Bytes, Codec, Context, Shape};
use strata_reflect::wire::{Archive, Message};
use strata_reflect::{Archiver, CodecError, deserialize, serialize};

/// Encodes its fields as the members of an inner archiver.
#[derive(Default, Debug, Clone, PartialEq)]
struct Record {
    id: u32,
    label: String,
}

impl Codec for Record {
    const SHAPE: Shape = Shape::UserDefined;

    fn encode(&self, cx: &Context<'_>) -> Result<Vec<u8>, CodecError> {
        let mut fields = Archiver::new();
        fields.push_with(&self.id, cx)?;
        fields.push_with(&self.label, cx)?;
        Codec::encode(&fields, cx)
    }

    fn decode(&mut self, bytes: &[u8], cx: &Context<'_>) -> Result<(), CodecError> {
        let mut fields = Archiver::new();
        Codec::decode(&mut fields, bytes, cx)?;
        fields.pop_with(&mut self.id, cx)?;
        fields.pop_with(&mut self.label, cx)?;
        Ok(())
    }
}

fn record(id: u32) -> Record {
    Record {
        id,
        label: format!("record-{id}"),
    }
}

#[test]
fn members_pop_in_push_order() {
    let mut archiver = Archiver::new();
    archiver.push(&42_i32).unwrap();
    archiver.push(&String::from("two")).unwrap();
    archiver.push(&vec![1.5_f64, -2.0]).unwrap();
    assert_eq!(archiver.len(), 3);

    let mut number = 0_i64;
    let mut text = String::new();
    let mut floats: Vec<f32> = Vec::new();
    assert!(archiver.pop(&mut number).unwrap());
    assert!(archiver.pop(&mut text).unwrap());
    assert_eq!(archiver.remaining(), 1);
    assert!(archiver.pop(&mut floats).unwrap());

    assert_eq!(number, 42);
    assert_eq!(text, "two");
    assert_eq!(floats, [1.5, -2.0]);
}

#[test]
fn pop_past_the_end() {
    let mut archiver = Archiver::new();
    archiver.push(&7_u8).unwrap();

    let mut value = 0_u8;
    assert!(archiver.pop(&mut value).unwrap());
    assert!(!archiver.pop(&mut value).unwrap());
    assert!(!archiver.pop(&mut value).unwrap());
    assert_eq!(value, 7);

    let mut empty = Archiver::new();
    let mut untouched = String::from("same");
    assert!(!empty.pop(&mut untouched).unwrap());
    assert_eq!(untouched, "same");
}

#[test]
fn failed_pop_still_advances() {
    let mut archiver = Archiver::new();
    archiver.push(&Bytes(vec![0xff])).unwrap();
    archiver.push(&2_u32).unwrap();

    let mut text = String::new();
    assert!(archiver.pop(&mut text).is_err());

    let mut number = 0_u32;
    assert!(archiver.pop(&mut number).unwrap());
    assert_eq!(number, 2);
}

#[test]
fn nested_archiver_survives_the_wire() {
    let mut inner = Archiver::new();
    inner.push(&String::from("inner")).unwrap();
    inner.push(&BTreeMap::from([(1_u8, true)])).unwrap();

    let mut outer = Archiver::new();
    outer.push(&-5_i16).unwrap();
    outer.push(&inner).unwrap();
    outer.push(&String::from("tail")).unwrap();

    let bytes = serialize(&outer).unwrap();
    let mut received = Archiver::new();
    deserialize(&mut received, &bytes).unwrap();
    assert_eq!(received.len(), 3);

    let mut head = 0_i16;
    let mut nested = Archiver::new();
    let mut tail = String::new();
    assert!(received.pop(&mut head).unwrap());
    assert!(received.pop(&mut nested).unwrap());
    assert!(received.pop(&mut tail).unwrap());
    assert_eq!((head, tail.as_str()), (-5, "tail"));

    let mut word = String::new();
    let mut flags: BTreeMap<u8, bool> = BTreeMap::new();
    assert!(nested.pop(&mut word).unwrap());
    assert!(nested.pop(&mut flags).unwrap());
    assert!(!nested.pop(&mut word).unwrap());
    assert_eq!(word, "inner");
    assert_eq!(flags, BTreeMap::from([(1, true)]));
}

#[test]
fn archiver_is_an_archive_message() {
    assert_eq!(<Archiver<'_> as Codec>::SHAPE, Shape::Message);

    let mut archiver = Archiver::new();
    archiver.push(&1_i32).unwrap();
    archiver.push(&2_i32).unwrap();

    let bytes = serialize(&archiver).unwrap();
    let archive = <Archive as Message>::decode(&bytes).unwrap();
    assert_eq!(archive.members.len(), 2);
    assert_eq!(archive, archiver.clone().into_archive());

    let mut rebuilt = Archiver::from(archive);
    let mut value = 0_i32;
    rebuilt.pop(&mut value).unwrap();
    assert_eq!(value, 1);
    rebuilt.rewind();
    rebuilt.pop(&mut value).unwrap();
    assert_eq!(value, 1);
}

#[test]
fn archivers_nest_in_containers() {
    let mut by_name: BTreeMap<String, Archiver<'static>> = BTreeMap::new();
    for (name, score) in [("ann", 3_u64), ("bob", 9)] {
        let mut entry = Archiver::new();
        entry.push(&score).unwrap();
        by_name.insert(name.into(), entry);
    }

    let bytes = serialize(&by_name).unwrap();
    let mut back: BTreeMap<String, Archiver<'static>> = BTreeMap::new();
    deserialize(&mut back, &bytes).unwrap();

    let mut score = 0_u64;
    assert!(back.get_mut("bob").unwrap().pop(&mut score).unwrap());
    assert_eq!(score, 9);
}

#[test]
fn mixed_members_then_past_the_end() {
    let p = record(1);
    let mut inner = Archiver::new();
    inner.push(&record(9)).unwrap();

    let mut archiver = Archiver::new();
    archiver.push(&p).unwrap();
    archiver.push(&p).unwrap();
    archiver.push(&p).unwrap();
    archiver.push(&vec![p.clone(), record(2)]).unwrap();
    archiver
        .push(&BTreeMap::from([(1_u32, p.clone()), (2, p.clone()), (3, p.clone())]))
        .unwrap();
    archiver.push(&inner).unwrap();
    assert_eq!(archiver.len(), 6);

    let bytes = serialize(&archiver).unwrap();
    let mut received = Archiver::new();
    deserialize(&mut received, &bytes).unwrap();

    for _ in 0..3 {
        let mut single = Record::default();
        assert!(received.pop(&mut single).unwrap());
        assert_eq!(single, p);
    }

    let mut list: Vec<Record> = Vec::new();
    assert!(received.pop(&mut list).unwrap());
    assert_eq!(list, [p.clone(), record(2)]);

    let mut map: BTreeMap<u32, Record> = BTreeMap::new();
    assert!(received.pop(&mut map).unwrap());
    assert_eq!(map.len(), 3);
    assert!(map.values().all(|r| *r == p));

    let mut nested = Archiver::new();
    assert!(received.pop(&mut nested).unwrap());
    let mut deep = Record::default();
    assert!(nested.pop(&mut deep).unwrap());
    assert_eq!(deep, record(9));

    let mut extra = Record::default();
    assert!(!received.pop(&mut extra).unwrap());
    assert!(!received.pop(&mut extra).unwrap());
    assert_eq!(extra, Record::default());
    assert_eq!(received.remaining(), 0);
}

#[test]
fn map_of_hand_written_records() {
    assert_eq!(<Record as Codec>::SHAPE, Shape::UserDefined);

    let records: BTreeMap<u32, Record> = (1..=3).map(|id| (id, record(id))).collect();
    let bytes = serialize(&records).unwrap();

    let mut back: BTreeMap<u32, Record> = BTreeMap::new();
    deserialize(&mut back, &bytes).unwrap();
    assert_eq!(back, records);
    assert_eq!(back[&2].label, "record-2");
}

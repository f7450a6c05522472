use std::collections::BTreeMap;

use strata_reflect::codec::{Codec, Context, Shape};
use strata_reflect::derive::Reflect;
use strata_reflect::registry::StructRegistry;
use strata_reflect::schema::SchemaRegistry;
use strata_reflect::{AccessError, Archiver, CodecError, deserialize_with, serialize_with};

#[derive(Reflect, Default, Debug, Clone, PartialEq)]
#[reflect(name = "Weapon", version = 2, dynamic)]
struct Weapon {
    #[reflect(tag = 1, rename = "type")]
    kind: u32,
    #[reflect(tag = 2)]
    name: String,
    #[reflect(tag = 3)]
    damage: f32,
    #[reflect(skip)]
    cached: u64,
}

#[derive(Reflect, Default, Debug, Clone, PartialEq)]
#[reflect(dynamic)]
struct Player {
    #[reflect(tag = 1)]
    name: String,
    #[reflect(tag = 2)]
    level: i32,
    #[reflect(tag = 3)]
    arsenal: BTreeMap<String, Weapon>,
    #[reflect(tag = 4)]
    backpack: Vec<Weapon>,
}

#[derive(Reflect, Default)]
struct Pair<A, B> {
    first: A,
    second: B,
}

fn sword() -> Weapon {
    Weapon {
        kind: 3,
        name: "sword".into(),
        damage: 12.5,
        cached: 99,
    }
}

#[test]
fn derived_declaration() {
    let mut structs = StructRegistry::new();
    assert!(structs.register::<Weapon>());
    assert!(!structs.register::<Weapon>());

    let desc = structs.struct_by_type::<Weapon>().unwrap();
    assert_eq!(desc.name(), "Weapon");
    assert_eq!(desc.version(), 2);
    assert_eq!(desc.property_count(), 3);
    assert!(!desc.has_property("cached"));
    assert!(!desc.has_property("kind"));

    let names: Vec<_> = desc.properties().map(|p| p.name()).collect();
    assert_eq!(names, ["type", "name", "damage"]);
    let tags: Vec<_> = desc.properties().map(|p| p.tag()).collect();
    assert_eq!(tags, [1, 2, 3]);

    let info = structs.info_by_name("Weapon").unwrap();
    let damage = info.property_info_by_name("damage").unwrap();
    assert_eq!(damage.shape, Shape::Float);
    assert_eq!(damage.type_name, core::any::type_name::<f32>());

    assert_eq!(<Weapon as Codec>::SHAPE, Shape::UserDefined);
}

#[test]
fn default_names_and_tags() {
    let mut structs = StructRegistry::new();
    structs.register::<Player>();
    structs.register::<Pair<u8, String>>();

    let player = structs.struct_by_name::<Player>("Player").unwrap();
    assert_eq!(player.version(), 0);
    assert_eq!(player.property_by_tag(3).unwrap().name(), "arsenal");

    let pair = structs.struct_by_type::<Pair<u8, String>>().unwrap();
    assert_eq!(pair.name(), "Pair");
    assert!(pair.properties().all(|p| p.tag() == 0));
    assert!(pair.property_by_tag(0).is_none());
}

#[test]
fn get_and_set_through_descriptor() {
    let mut structs = StructRegistry::new();
    structs.register::<Weapon>();
    let desc = structs.struct_by_type::<Weapon>().unwrap();

    let mut weapon = sword();
    assert_eq!(desc.get::<u32>(&weapon, "type"), Ok(3));
    assert_eq!(desc.get::<String>(&weapon, "name").unwrap(), "sword");
    assert_eq!(desc.get::<String>(&weapon, "missing").unwrap(), "");

    desc.set(&mut weapon, "damage", 40.0_f32).unwrap();
    assert_eq!(weapon.damage, 40.0);
    desc.set(&mut weapon, "missing", 1_u8).unwrap();
    assert_eq!(weapon, Weapon { damage: 40.0, ..sword() });

    let err = desc.get::<i64>(&weapon, "type").unwrap_err();
    assert!(matches!(err, AccessError::TypeMismatch { .. }));
    assert!(desc.set(&mut weapon, "name", 5_i32).is_err());
    assert_eq!(weapon.name, "sword");

    let fresh = desc.new_instance();
    assert_eq!(fresh, Weapon::default());
}

#[test]
fn dynamic_nested_round_trip() {
    let mut structs = StructRegistry::new();
    structs.register::<Weapon>();
    structs.register::<Player>();

    let mut schemas = SchemaRegistry::new();
    schemas.map::<Weapon>(&structs, None).unwrap();
    schemas.map::<Player>(&structs, Some("game.PlayerRecord")).unwrap();
    schemas.build_all().unwrap();

    let bow = Weapon {
        kind: 7,
        name: "bow".into(),
        damage: 4.0,
        cached: 0,
    };
    let player = Player {
        name: "ada".into(),
        level: 12,
        arsenal: BTreeMap::from([("main".into(), sword()), ("spare".into(), bow.clone())]),
        backpack: vec![bow.clone(), Weapon::default()],
    };

    let cx = Context::with_schemas(&schemas);
    let bytes = serialize_with(&player, &cx).unwrap();

    let mut back = Player::default();
    deserialize_with(&mut back, &bytes, &cx).unwrap();

    // Skipped fields are not transported.
    let mut expected = player.clone();
    expected.arsenal.get_mut("main").unwrap().cached = 0;
    assert_eq!(back, expected);

    let text = schemas.schema_text::<Player>().unwrap();
    assert!(text.starts_with("package game;\n\nmessage PlayerRecord {"));
    assert!(text.contains("optional bytes backpack = 4;"));
}

#[test]
fn dynamic_without_schema() {
    let err = serialize_with(&sword(), &Context::new()).unwrap_err();
    assert!(matches!(err, CodecError::SchemaNotFound(_)));
}

#[test]
fn archived_dynamic_member_read_back_from_container() {
    let mut structs = StructRegistry::new();
    structs.register::<Weapon>();
    let mut schemas = SchemaRegistry::new();
    schemas.map::<Weapon>(&structs, None).unwrap();
    schemas.build_all().unwrap();
    let cx = Context::with_schemas(&schemas);

    let blade = Weapon {
        kind: 22,
        name: "Blade".into(),
        damage: 0.0,
        cached: 0,
    };
    let mut packed = Archiver::with_context(cx);
    packed.push(&blade).unwrap();

    let bytes = serialize_with(&BTreeMap::from([(1_u32, packed)]), &cx).unwrap();
    let mut back: BTreeMap<u32, Archiver<'_>> = BTreeMap::new();
    deserialize_with(&mut back, &bytes, &cx).unwrap();
    let inner = back.get_mut(&1).unwrap();

    let mut weapon = Weapon::default();
    assert!(matches!(
        inner.pop(&mut weapon),
        Err(CodecError::SchemaNotFound(_))
    ));

    inner.rewind();
    assert!(inner.pop_with(&mut weapon, &cx).unwrap());
    assert_eq!(weapon, blade);

    inner.rewind();
    inner.set_context(cx);
    let mut again = Weapon::default();
    assert!(inner.pop(&mut again).unwrap());
    assert_eq!(again, blade);

    let mut fresh = Archiver::new();
    fresh.push_with(&blade, &cx).unwrap();
    let mut direct = Weapon::default();
    assert!(fresh.pop_with(&mut direct, &cx).unwrap());
    assert_eq!(direct, blade);
}

#[cfg(feature = "auto_register")]
mod auto {
    use strata_reflect::derive::Reflect;
    use strata_reflect::registry::StructRegistry;

    #[derive(Reflect, Default)]
    #[reflect(name = "AutoMarker", auto_register)]
    struct AutoMarker {
        #[reflect(tag = 1)]
        id: i32,
    }

    #[test]
    fn auto_register_collects_marked_types() {
        let mut structs = StructRegistry::new();
        assert!(structs.auto_register() >= 1);
        assert!(structs.contains::<AutoMarker>());
        assert_eq!(structs.info_by_name("AutoMarker").unwrap().property_count(), 1);

        assert_eq!(structs.auto_register(), 0);
    }
}

// test-only module included via protocol/mod.rs
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use crate::core::primitive::{Primitive, PrimitiveKind};
use crate::core::value::WireValue;
use crate::core::writer::WireWriter;
use crate::error::{ProtocolError, Result};
use crate::protocol::encoder::{ObjectEncoder, PacketEncoder};
use crate::protocol::object::{FieldSet, Visibility, WireObject};
use crate::protocol::packet::Packet;
use crate::protocol::registry::PacketRegistry;
use crate::protocol::rules::RuleSet;
use std::cell::Cell;
use std::collections::BTreeMap;

fn encoder_with<P: Packet>(id: i16) -> PacketEncoder {
    let registry = PacketRegistry::new();
    registry.register::<P>(id).expect("register");
    PacketEncoder::new(registry)
}

struct Hooked {
    name: String,
    age: i32,
}

impl WireObject for Hooked {
    fn describe<'a>(&'a self, fields: &mut FieldSet<'a>) {
        fields
            .field("name", &self.name)
            .before(|w| w.write_bool(true))
            .after(|w| w.write_bool(false));
        fields.field("age", &self.age);
    }
}

impl Packet for Hooked {}

#[test]
fn test_inline_before_and_after_wrap_default_encoding() {
    let encoder = encoder_with::<Hooked>(1);
    let packet = Hooked {
        name: "Ann".into(),
        age: 30,
    };

    let bytes = encoder.serialize(&packet).unwrap();
    assert_eq!(
        &bytes[..],
        &[0x01, 0x00, 0x01, 0x03, b'A', b'n', b'n', 0x00, 0x1E, 0x00, 0x00, 0x00]
    );
}

struct Configured {
    name: String,
    age: i32,
    configure_calls: Cell<u32>,
}

impl WireObject for Configured {
    fn describe<'a>(&'a self, fields: &mut FieldSet<'a>) {
        fields.field("name", &self.name).before(|w| w.write_i16(1));
        fields.field("age", &self.age);
    }
}

impl Packet for Configured {
    fn configure<'a>(&'a self, rules: &mut RuleSet<'a>) {
        self.configure_calls.set(self.configure_calls.get() + 1);
        // overrides the inline before hook on `name`
        rules.before("name", |w| w.write_i16(2));
        rules.after("age", move |w| w.write_i32(self.age * 2));
    }
}

#[test]
fn test_configure_runs_once_per_call_and_overrides_inline() {
    let encoder = encoder_with::<Configured>(2);
    let packet = Configured {
        name: "A".into(),
        age: 3,
        configure_calls: Cell::new(0),
    };

    let first = encoder.serialize(&packet).unwrap();
    let second = encoder.serialize(&packet).unwrap();

    assert_eq!(first, second);
    assert_eq!(packet.configure_calls.get(), 2);
    assert_eq!(
        &first[..],
        &[0x02, 0x00, 0x02, 0x00, 0x01, b'A', 0x03, 0x00, 0x00, 0x00, 0x06, 0x00, 0x00, 0x00]
    );
}

struct Bypass {
    flag: bool,
    ignored: String,
    configure_calls: Cell<u32>,
}

impl WireObject for Bypass {
    fn describe<'a>(&'a self, fields: &mut FieldSet<'a>) {
        fields.field("flag", &self.flag);
        fields.field("ignored", &self.ignored);
    }
}

impl Packet for Bypass {
    fn configure<'a>(&'a self, _rules: &mut RuleSet<'a>) {
        self.configure_calls.set(self.configure_calls.get() + 1);
    }

    fn encode_custom(&self, writer: &mut WireWriter) -> Result<()> {
        writer.write_bool(self.flag);
        Ok(())
    }
}

#[test]
fn test_custom_encoding_skips_configure_and_fields() {
    let registry = PacketRegistry::new();
    registry.register_custom::<Bypass>(9).unwrap();
    let encoder = PacketEncoder::new(registry);
    let packet = Bypass {
        flag: true,
        ignored: "not written".into(),
        configure_calls: Cell::new(0),
    };

    let bytes = encoder.serialize(&packet).unwrap();
    assert_eq!(&bytes[..], &[0x09, 0x00, 0x01]);
    assert_eq!(packet.configure_calls.get(), 0);
}

struct Optional {
    note: Option<String>,
    tail: bool,
}

impl WireObject for Optional {
    fn describe<'a>(&'a self, fields: &mut FieldSet<'a>) {
        fields
            .field("note", &self.note)
            .before(|w| w.write_i16(-1))
            .after(|w| w.write_i16(-1));
        fields.field("tail", &self.tail);
    }
}

impl Packet for Optional {}

#[test]
fn test_absent_field_skips_its_hooks() {
    let encoder = encoder_with::<Optional>(3);
    let bytes = encoder
        .serialize(&Optional {
            note: None,
            tail: true,
        })
        .unwrap();
    assert_eq!(&bytes[..], &[0x03, 0x00, 0x01]);
}

struct Converted {
    age: i32,
}

impl WireObject for Converted {
    fn describe<'a>(&'a self, fields: &mut FieldSet<'a>) {
        fields
            .field("age", &self.age)
            .before(|w| w.write_bool(true))
            .after(|w| w.write_bool(true));
    }

    fn rules<'a>(&'a self, rules: &mut RuleSet<'a>) {
        rules.convert("age", PrimitiveKind::Str, |value| match value {
            WireValue::Primitive(p) => Primitive::from(p.to_string()),
            _ => Primitive::EMPTY_STRING,
        });
    }
}

impl Packet for Converted {}

#[test]
fn test_conversion_takes_priority_over_hooks() {
    let encoder = encoder_with::<Converted>(4);
    let bytes = encoder.serialize(&Converted { age: 30 }).unwrap();
    assert_eq!(&bytes[..], &[0x04, 0x00, 0x02, b'3', b'0']);
}

struct Badly {
    count: i32,
}

impl WireObject for Badly {
    fn describe<'a>(&'a self, fields: &mut FieldSet<'a>) {
        fields.field("count", &self.count);
    }

    fn rules<'a>(&'a self, rules: &mut RuleSet<'a>) {
        rules.convert("count", PrimitiveKind::Bool, |_| Primitive::from("yes"));
    }
}

impl Packet for Badly {}

#[test]
fn test_conversion_with_wrong_kind_is_malformed() {
    let encoder = encoder_with::<Badly>(5);
    let result = encoder.serialize(&Badly { count: 1 });
    assert!(matches!(result, Err(ProtocolError::MalformedRuleMap(ref m)) if m.contains("count")));
}

struct Keyed {
    first: i16,
    table: BTreeMap<String, Vec<Option<i32>>>,
}

impl WireObject for Keyed {
    fn describe<'a>(&'a self, fields: &mut FieldSet<'a>) {
        fields.data("first", &self.first);
        fields
            .data("table", &self.table)
            .before(|w| w.write_bool(true));
    }
}

#[test]
fn test_failed_field_is_rolled_back_to_its_start() {
    let mut table = BTreeMap::new();
    table.insert("k".to_string(), vec![Some(1), None]);
    let keyed = Keyed { first: 7, table };

    // depth: object(1) -> map(2) -> sequence(3) fails
    let mut writer = WireWriter::new();
    let result =
        ObjectEncoder::new(&mut writer, 2).encode_object(&keyed, Visibility::TopLevel, &RuleSet::new());

    assert!(matches!(
        result,
        Err(ProtocolError::UnboundedRecursion { limit: 2 })
    ));
    assert_eq!(writer.as_bytes(), &[0x07, 0x00]);
}

#[test]
fn test_nested_collections_and_placeholders() {
    let mut table = BTreeMap::new();
    table.insert("k".to_string(), vec![Some(1), None]);
    let keyed = Keyed { first: 7, table };

    let mut writer = WireWriter::new();
    ObjectEncoder::new(&mut writer, 8)
        .encode_object(&keyed, Visibility::TopLevel, &RuleSet::new())
        .unwrap();

    assert_eq!(
        writer.as_bytes(),
        &[
            0x07, 0x00, // first
            0x01, // before hook
            0x01, 0x00, 0x00, 0x00, // map count
            0x01, b'k', // key
            0x02, 0x00, 0x00, 0x00, // sequence count
            0x01, 0x00, 0x00, 0x00, // Some(1)
            0x00, // None -> empty string
        ]
    );
}

struct Item {
    a: i32,
    hidden: i32,
}

impl WireObject for Item {
    fn describe<'a>(&'a self, fields: &mut FieldSet<'a>) {
        fields.data("a", &self.a).before(|w| w.write_bool(true));
        fields.field("hidden", &self.hidden);
    }

    fn rules<'a>(&'a self, rules: &mut RuleSet<'a>) {
        rules.after("a", |w| w.write_i16(9));
    }
}

struct Shelf {
    items: BTreeMap<String, Option<Item>>,
}

impl WireObject for Shelf {
    fn describe<'a>(&'a self, fields: &mut FieldSet<'a>) {
        fields.field("items", &self.items);
    }
}

impl Packet for Shelf {}

#[test]
fn test_nested_object_applies_its_own_rules() {
    let encoder = encoder_with::<Shelf>(1);
    let mut items = BTreeMap::new();
    items.insert("k".to_string(), Some(Item { a: 5, hidden: 77 }));
    items.insert("z".to_string(), None);

    let bytes = encoder.serialize(&Shelf { items }).unwrap();
    assert_eq!(
        &bytes[..],
        &[
            0x01, 0x00, // id
            0x02, 0x00, 0x00, 0x00, // entry count
            0x01, b'k', // key
            0x01, // inline before
            0x05, 0x00, 0x00, 0x00, // a
            0x09, 0x00, // rule-map after
            0x01, b'z', 0x00, // absent value
        ]
    );
}

struct Replaced {
    value: i32,
    tail: bool,
}

impl WireObject for Replaced {
    fn describe<'a>(&'a self, fields: &mut FieldSet<'a>) {
        fields
            .field("value", &self.value)
            .instead(|w| w.write_i16(-2))
            .after(|w| w.write_i64(i64::MAX));
        fields.field("tail", &self.tail);
    }
}

impl Packet for Replaced {}

#[test]
fn test_instead_suppresses_after_hook() {
    let encoder = encoder_with::<Replaced>(6);
    let bytes = encoder
        .serialize(&Replaced {
            value: 1,
            tail: false,
        })
        .unwrap();
    assert_eq!(&bytes[..], &[0x06, 0x00, 0xFE, 0xFF, 0x00]);
}

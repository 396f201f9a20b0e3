//! End-to-end encoding scenarios through the public API

#![allow(clippy::expect_used, clippy::unwrap_used)]

use packet_encoder::core::primitive::{Primitive, PrimitiveKind};
use packet_encoder::core::value::WireValue;
use packet_encoder::core::writer::WireWriter;
use packet_encoder::error::{ProtocolError, Result};
use packet_encoder::prelude::*;
use std::cell::Cell;
use std::collections::HashMap;

fn encoder_for<P: Packet>(id: i16) -> PacketEncoder {
    let registry = PacketRegistry::new();
    registry.register::<P>(id).expect("registration should succeed");
    PacketEncoder::new(registry)
}

struct Person {
    name: String,
    age: i32,
}

impl WireObject for Person {
    fn describe<'a>(&'a self, fields: &mut FieldSet<'a>) {
        fields.field("Name", &self.name);
        fields.field("Age", &self.age);
    }
}

impl Packet for Person {}

#[test]
fn test_identifier_then_fields_in_order() {
    let encoder = encoder_for::<Person>(7);
    let bytes = encoder
        .serialize(&Person {
            name: "Ann".to_string(),
            age: 30,
        })
        .unwrap();

    assert_eq!(
        &bytes[..],
        &[0x07, 0x00, 0x03, 0x41, 0x6E, 0x6E, 0x1E, 0x00, 0x00, 0x00]
    );
}

struct StringlyAge {
    name: String,
    age: i32,
}

impl WireObject for StringlyAge {
    fn describe<'a>(&'a self, fields: &mut FieldSet<'a>) {
        fields.field("Name", &self.name);
        fields
            .field("Age", &self.age)
            .convert(PrimitiveKind::Str, |value| match value {
                WireValue::Primitive(Primitive::I32(v)) => Primitive::from(v.to_string()),
                _ => Primitive::EMPTY_STRING,
            });
    }
}

impl Packet for StringlyAge {}

#[test]
fn test_conversion_to_string() {
    let encoder = encoder_for::<StringlyAge>(7);
    let bytes = encoder
        .serialize(&StringlyAge {
            name: "Ann".to_string(),
            age: 30,
        })
        .unwrap();

    assert_eq!(
        &bytes[..],
        &[0x07, 0x00, 0x03, 0x41, 0x6E, 0x6E, 0x02, 0x33, 0x30]
    );
}

struct Heartbeat {
    alive: bool,
    configured: Cell<bool>,
}

impl WireObject for Heartbeat {
    fn describe<'a>(&'a self, fields: &mut FieldSet<'a>) {
        fields.field("alive", &self.alive);
    }
}

impl Packet for Heartbeat {
    fn configure<'a>(&'a self, _rules: &mut RuleSet<'a>) {
        self.configured.set(true);
    }

    fn encode_custom(&self, writer: &mut WireWriter) -> Result<()> {
        writer.write_bool(self.alive);
        Ok(())
    }
}

#[test]
fn test_full_bypass_writes_identifier_and_hook_output() {
    let registry = PacketRegistry::new();
    registry.register_custom::<Heartbeat>(0x10).unwrap();
    let encoder = PacketEncoder::new(registry);

    let packet = Heartbeat {
        alive: true,
        configured: Cell::new(false),
    };
    let bytes = encoder.serialize(&packet).unwrap();

    assert_eq!(&bytes[..], &[0x10, 0x00, 0x01]);
    assert!(!packet.configured.get());
}

struct Wrapped {
    code: i16,
    label: String,
}

impl WireObject for Wrapped {
    fn describe<'a>(&'a self, fields: &mut FieldSet<'a>) {
        fields.field("code", &self.code).before(|w| w.write_bool(true));
        fields.field("label", &self.label).instead(|w| w.write_i32(-1));
    }
}

impl Packet for Wrapped {}

#[test]
fn test_before_and_instead_rules() {
    let encoder = encoder_for::<Wrapped>(1);
    let bytes = encoder
        .serialize(&Wrapped {
            code: 0x0203,
            label: "never read".to_string(),
        })
        .unwrap();

    assert_eq!(
        &bytes[..],
        &[0x01, 0x00, 0x01, 0x03, 0x02, 0xFF, 0xFF, 0xFF, 0xFF]
    );
}

struct Batch {
    ids: Vec<i64>,
}

impl WireObject for Batch {
    fn describe<'a>(&'a self, fields: &mut FieldSet<'a>) {
        fields.field("ids", &self.ids);
    }
}

impl Packet for Batch {}

#[test]
fn test_sequence_writes_count_then_elements() {
    let encoder = encoder_for::<Batch>(2);
    let bytes = encoder.serialize(&Batch { ids: vec![1, 2, 3] }).unwrap();

    assert_eq!(&bytes[..6], &[0x02, 0x00, 0x03, 0x00, 0x00, 0x00]);
    assert_eq!(bytes.len(), 2 + 4 + 3 * 8);
    assert_eq!(&bytes[6..14], &1i64.to_le_bytes());
    assert_eq!(&bytes[22..30], &3i64.to_le_bytes());
}

struct Coordinate {
    x: i32,
    y: i32,
}

impl WireObject for Coordinate {
    fn describe<'a>(&'a self, fields: &mut FieldSet<'a>) {
        fields.field("x", &self.x);
        fields.field("y", &self.y);
    }
}

struct Lookup {
    by_point: HashMap<Box<Coordinate>, i32>,
}

impl WireObject for Lookup {
    fn describe<'a>(&'a self, fields: &mut FieldSet<'a>) {
        fields.field("by_point", &self.by_point);
    }
}

impl Packet for Lookup {}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl Eq for Coordinate {}

impl std::hash::Hash for Coordinate {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.x.hash(state);
        self.y.hash(state);
    }
}

#[test]
fn test_object_map_key_is_unsupported() {
    let encoder = encoder_for::<Lookup>(3);
    let mut by_point = HashMap::new();
    by_point.insert(Box::new(Coordinate { x: 1, y: 2 }), 5);

    let result = encoder.serialize(&Lookup { by_point });
    assert!(matches!(result, Err(ProtocolError::UnsupportedKeyType(ref k)) if k.contains("Coordinate")));
}

struct Unregistered;

impl WireObject for Unregistered {
    fn describe<'a>(&'a self, _fields: &mut FieldSet<'a>) {}
}

impl Packet for Unregistered {}

#[test]
fn test_unregistered_packet_has_no_identifier() {
    let encoder = PacketEncoder::new(PacketRegistry::new());
    let result = encoder.serialize(&Unregistered);
    assert!(
        matches!(result, Err(ProtocolError::MissingIdentifier(ref name)) if name.contains("Unregistered"))
    );
}

struct Misconfigured {
    value: i32,
}

impl WireObject for Misconfigured {
    fn describe<'a>(&'a self, fields: &mut FieldSet<'a>) {
        fields.field("value", &self.value);
    }
}

impl Packet for Misconfigured {
    fn configure<'a>(&'a self, rules: &mut RuleSet<'a>) {
        rules.instead("vaule", |w| w.write_bool(false));
    }
}

#[test]
fn test_rule_for_undeclared_field_is_malformed() {
    let encoder = encoder_for::<Misconfigured>(4);
    let result = encoder.serialize(&Misconfigured { value: 1 });
    assert!(matches!(result, Err(ProtocolError::MalformedRuleMap(ref m)) if m.contains("vaule")));
}

struct Envelope {
    header: i16,
    inner: Inner,
}

struct Inner {
    public_only: String,
    wire: i32,
}

impl WireObject for Inner {
    fn describe<'a>(&'a self, fields: &mut FieldSet<'a>) {
        fields.field("public_only", &self.public_only);
        fields.data("wire", &self.wire);
    }
}

impl WireObject for Envelope {
    fn describe<'a>(&'a self, fields: &mut FieldSet<'a>) {
        fields.field("header", &self.header);
        fields.field("inner", &self.inner);
    }
}

impl Packet for Envelope {}

#[test]
fn test_nested_object_encodes_only_wire_data_fields() {
    let encoder = encoder_for::<Envelope>(5);
    let bytes = encoder
        .serialize(&Envelope {
            header: 1,
            inner: Inner {
                public_only: "skipped".to_string(),
                wire: 4,
            },
        })
        .unwrap();

    assert_eq!(
        &bytes[..],
        &[0x05, 0x00, 0x01, 0x00, 0x04, 0x00, 0x00, 0x00]
    );
}

#[test]
fn test_missing_identifier_is_recorded_in_metrics() {
    let before = packet_encoder::utils::global_metrics().snapshot();
    let encoder = PacketEncoder::new(PacketRegistry::new());
    let _ = encoder.serialize(&Unregistered);
    let after = packet_encoder::utils::global_metrics().snapshot();

    assert!(after.missing_identifier > before.missing_identifier);
    assert!(after.failures_total > before.failures_total);
}

//! # Packet Encoder
//!
//! Turns a registered packet into its outbound wire bytes.
//!
//! ## Control Flow
//! ```text
//! serialize(packet)
//!   -> write identifier (i16)
//!   -> custom_encoding?  encode_custom(writer), done
//!   -> rules() + configure()  -> RuleSet for this call
//!   -> encode_object(packet, TopLevel)
//!        for each visible field, in declaration order:
//!          absent      -> skip
//!          conversion  -> write converted primitive
//!          instead     -> run hook
//!          otherwise   -> before, default encoding, after
//!        default encoding:
//!          primitive   -> dispatch table
//!          sequence    -> i32 count, elements
//!          map         -> i32 count, key/value pairs
//!          object      -> encode_object(value, Nested)
//! ```
//!
//! Objects and collections share one depth counter; passing `max_depth` fails with
//! `UnboundedRecursion`. A field that fails leaves no bytes behind in the writer.

use crate::config::EncodingConfig;
use crate::core::primitive::Primitive;
use crate::core::value::{WireMap, WireSequence, WireValue};
use crate::core::writer::WireWriter;
use crate::error::{ProtocolError, Result};
use crate::protocol::object::{Field, FieldSet, Visibility, WireObject};
use crate::protocol::packet::Packet;
use crate::protocol::registry::PacketRegistry;
use crate::protocol::rules::RuleSet;
use crate::utils::metrics::{global_metrics, Timer};
use bytes::Bytes;
use std::any::type_name;
use tracing::{debug, trace, warn};

/// Entry point for outbound encoding
#[derive(Clone)]
pub struct PacketEncoder {
    registry: PacketRegistry,
    config: EncodingConfig,
}

impl PacketEncoder {
    pub fn new(registry: PacketRegistry) -> Self {
        Self::with_config(registry, EncodingConfig::default())
    }

    pub fn with_config(registry: PacketRegistry, config: EncodingConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &PacketRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EncodingConfig {
        &self.config
    }

    /// Encode `packet` as `[identifier: i16][body]`.
    ///
    /// # Errors
    /// - `MissingIdentifier` if `P` was never registered
    /// - `MalformedRuleMap` if a rule targets an undeclared field or a conversion
    ///   yields the wrong kind
    /// - `UnsupportedKeyType` if a map key is not a primitive
    /// - `UnboundedRecursion` if nesting passes the configured depth
    pub fn serialize<P: Packet>(&self, packet: &P) -> Result<Bytes> {
        let _timer = Timer::start("serialize");
        let result = self.encode_packet(packet);
        if let Err(e) = &result {
            debug!(packet = type_name::<P>(), kind = e.kind(), error = %e, "Packet encoding failed");
        }

        if self.config.record_metrics {
            match &result {
                Ok(bytes) => global_metrics().packet_encoded(bytes.len() as u64),
                Err(e) => global_metrics().encode_failed(e),
            }
        }
        result
    }

    fn encode_packet<P: Packet>(&self, packet: &P) -> Result<Bytes> {
        let registration = self
            .registry
            .lookup::<P>()?
            .ok_or_else(|| ProtocolError::MissingIdentifier(type_name::<P>().to_string()))?;

        let mut writer = WireWriter::with_capacity(self.config.initial_capacity);
        writer.write_i16(registration.id);

        if registration.custom_encoding {
            packet.encode_custom(&mut writer)?;
            if writer.len() == 2 {
                warn!(
                    packet = registration.type_name,
                    id = registration.id,
                    "Custom encoding wrote no body"
                );
            }
            if self.config.record_metrics {
                global_metrics().custom_encoding();
            }
            debug!(
                packet = registration.type_name,
                id = registration.id,
                bytes = writer.len(),
                "Serialized packet via custom encoding"
            );
            return Ok(writer.into_bytes());
        }

        let mut rules = RuleSet::new();
        packet.rules(&mut rules);
        packet.configure(&mut rules);

        ObjectEncoder::new(&mut writer, self.config.max_depth).encode_object(
            packet,
            Visibility::TopLevel,
            &rules,
        )?;

        debug!(
            packet = registration.type_name,
            id = registration.id,
            bytes = writer.len(),
            "Serialized packet"
        );
        Ok(writer.into_bytes())
    }
}

/// Recursive field walker for one encoding pass
pub(crate) struct ObjectEncoder<'w> {
    writer: &'w mut WireWriter,
    depth: usize,
    max_depth: usize,
}

impl<'w> ObjectEncoder<'w> {
    pub(crate) fn new(writer: &'w mut WireWriter, max_depth: usize) -> Self {
        Self {
            writer,
            depth: 0,
            max_depth,
        }
    }

    /// Run `f` one level deeper, failing once the depth limit is passed
    fn descend<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        if self.depth >= self.max_depth {
            return Err(ProtocolError::UnboundedRecursion {
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Encode every field of `object` admitted by `visibility`
    pub(crate) fn encode_object(
        &mut self,
        object: &dyn WireObject,
        visibility: Visibility,
        rules: &RuleSet<'_>,
    ) -> Result<()> {
        self.descend(|this| {
            let type_name = object.type_name();
            let mut fields = FieldSet::new();
            object.describe(&mut fields);
            rules.validate(type_name, &fields)?;

            for field in fields.iter().filter(|f| visibility.admits(f)) {
                this.encode_field(type_name, field, rules)?;
            }
            Ok(())
        })
    }

    fn encode_nested(&mut self, object: &dyn WireObject) -> Result<()> {
        let mut rules = RuleSet::new();
        object.rules(&mut rules);
        self.encode_object(object, Visibility::Nested, &rules)
    }

    fn encode_field(&mut self, owner: &str, field: &Field<'_>, rules: &RuleSet<'_>) -> Result<()> {
        let value = field.value();
        if value.is_absent() {
            trace!(owner, field = field.name(), "Skipping absent field");
            return Ok(());
        }

        let start = self.writer.len();
        let result = self.dispatch_field(owner, field, value, rules);
        if result.is_err() {
            self.writer.truncate(start);
        }
        result
    }

    fn dispatch_field(
        &mut self,
        owner: &str,
        field: &Field<'_>,
        value: WireValue<'_>,
        rules: &RuleSet<'_>,
    ) -> Result<()> {
        let resolved = rules.resolve(field);

        if let Some(conversion) = resolved.conversion {
            let converted = conversion.apply(field.name(), &value)?;
            trace!(owner, field = field.name(), kind = %converted.kind(), "Applying conversion");
            converted.encode(self.writer);
            return Ok(());
        }

        if let Some(instead) = resolved.instead {
            trace!(owner, field = field.name(), "Replacing field encoding");
            instead(&mut *self.writer);
            return Ok(());
        }

        if let Some(before) = resolved.before {
            before(&mut *self.writer);
        }
        self.encode_value(value)?;
        if let Some(after) = resolved.after {
            after(&mut *self.writer);
        }
        Ok(())
    }

    /// Default encoding by shape
    fn encode_value(&mut self, value: WireValue<'_>) -> Result<()> {
        match value {
            WireValue::Absent => Ok(()),
            WireValue::Primitive(p) => {
                p.encode(self.writer);
                Ok(())
            }
            WireValue::Sequence(seq) => self.encode_sequence(seq),
            WireValue::Map(map) => self.encode_map(map),
            WireValue::Nested(object) => self.encode_nested(object),
        }
    }

    /// Sequence elements and map values: absent writes an empty-string placeholder
    fn encode_element(&mut self, value: WireValue<'_>) -> Result<()> {
        match value {
            WireValue::Absent => {
                Primitive::EMPTY_STRING.encode(self.writer);
                Ok(())
            }
            other => self.encode_value(other),
        }
    }

    fn encode_sequence(&mut self, seq: &dyn WireSequence) -> Result<()> {
        let count = collection_count(seq.len())?;
        self.descend(|this| {
            this.writer.write_i32(count);
            for element in seq.elements() {
                this.encode_element(element)?;
            }
            Ok(())
        })
    }

    fn encode_map(&mut self, map: &dyn WireMap) -> Result<()> {
        if let Some((key, _)) = map.entries().find(|(key, _)| key.as_primitive().is_none()) {
            return Err(ProtocolError::UnsupportedKeyType(key.describe()));
        }

        let count = collection_count(map.len())?;
        self.descend(|this| {
            this.writer.write_i32(count);
            for (key, value) in map.entries() {
                match key {
                    WireValue::Primitive(key) => key.encode(this.writer),
                    other => return Err(ProtocolError::UnsupportedKeyType(other.describe())),
                }
                this.encode_element(value)?;
            }
            Ok(())
        })
    }
}

fn collection_count(len: usize) -> Result<i32> {
    i32::try_from(len).map_err(|_| ProtocolError::OversizedCollection(len))
}

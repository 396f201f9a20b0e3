//! # Packet Types
//!
//! A packet is a top-level [`WireObject`] that can be registered with an identifier.
//! Two optional hooks let a packet type step outside the declarative model:
//!
//! - [`Packet::configure`] runs once per `serialize` call, before any field is
//!   visited, and may add rules to the packet's [`RuleSet`] for that call.
//! - [`Packet::encode_custom`] replaces the whole field pass. It only runs for types
//!   registered with [`PacketRegistry::register_custom`](crate::protocol::registry::PacketRegistry::register_custom);
//!   the configuration hook is not called for those types.

use crate::core::writer::WireWriter;
use crate::error::Result;
use crate::protocol::object::WireObject;
use crate::protocol::rules::RuleSet;

/// A top-level message type
pub trait Packet: WireObject + 'static {
    /// Configuration hook: populate this call's rule maps
    fn configure<'a>(&'a self, rules: &mut RuleSet<'a>) {
        let _ = rules;
    }

    /// Full-bypass hook: write the entire body after the identifier
    fn encode_custom(&self, writer: &mut WireWriter) -> Result<()> {
        let _ = writer;
        Ok(())
    }
}

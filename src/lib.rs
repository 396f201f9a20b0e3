//! # Packet Encoder
//!
//! Declarative outbound wire-format encoder. A packet is written as a 2-byte
//! identifier followed by a type-driven encoding of its registered fields, with
//! per-field hooks that can wrap, replace or convert the default encoding.
//!
//! ## Quick Start
//! ```rust
//! use packet_encoder::prelude::*;
//!
//! struct Greeting {
//!     name: String,
//!     age: i32,
//! }
//!
//! impl WireObject for Greeting {
//!     fn describe<'a>(&'a self, fields: &mut FieldSet<'a>) {
//!         fields.field("name", &self.name);
//!         fields.field("age", &self.age);
//!     }
//! }
//!
//! impl Packet for Greeting {}
//!
//! # fn main() -> packet_encoder::error::Result<()> {
//! let registry = PacketRegistry::new();
//! registry.register::<Greeting>(7)?;
//! let encoder = PacketEncoder::new(registry);
//!
//! let bytes = encoder.serialize(&Greeting { name: "Ann".into(), age: 30 })?;
//! assert_eq!(&bytes[..], &[0x07, 0x00, 0x03, b'A', b'n', b'n', 0x1E, 0x00, 0x00, 0x00]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//! - [`core`]: primitive writer/reader, value shapes, transport codec
//! - [`protocol`]: packet declarations, rules, registry, encoder
//! - [`config`]: TOML / environment configuration
//! - [`utils`]: logging and metrics
//! - [`error`]: error types

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod utils;

pub use crate::core::codec::PacketCodec;
pub use crate::error::{ProtocolError, Result};
pub use crate::protocol::encoder::PacketEncoder;
pub use crate::protocol::packet::Packet;
pub use crate::protocol::registry::PacketRegistry;

/// Commonly used types for declaring and encoding packets
pub mod prelude {
    pub use crate::core::primitive::{Primitive, PrimitiveKind};
    pub use crate::core::value::{ToWire, WireValue};
    pub use crate::core::writer::WireWriter;
    pub use crate::protocol::encoder::PacketEncoder;
    pub use crate::protocol::object::{FieldSet, WireObject};
    pub use crate::protocol::packet::Packet;
    pub use crate::protocol::registry::PacketRegistry;
    pub use crate::protocol::rules::RuleSet;
}

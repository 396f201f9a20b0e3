//! # Packet Registry
//!
//! Identifier metadata for packet types. Each type is registered once with its wire
//! identifier and whether it encodes its own body. Lookups are keyed by `TypeId`, so
//! the registry is shared freely between encoders and threads.

use crate::error::{constants, ProtocolError, Result};
use crate::protocol::packet::Packet;
use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Metadata attached to a registered packet type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    /// Identifier written as the first two bytes of every encoded packet
    pub id: i16,
    /// Whether the type encodes its own body through `Packet::encode_custom`
    pub custom_encoding: bool,
    pub type_name: &'static str,
}

/// Packet identifier registry.
/// Cloning is cheap and shares the same underlying table.
#[derive(Clone)]
pub struct PacketRegistry {
    entries: Arc<RwLock<HashMap<TypeId, Registration>>>,
}

impl Default for PacketRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PacketRegistry {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register `P` under `id`, encoded declaratively
    pub fn register<P: Packet>(&self, id: i16) -> Result<()> {
        self.insert::<P>(id, false)
    }

    /// Register `P` under `id`, encoded by its full-bypass hook
    pub fn register_custom<P: Packet>(&self, id: i16) -> Result<()> {
        self.insert::<P>(id, true)
    }

    fn insert<P: Packet>(&self, id: i16, custom_encoding: bool) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| {
            ProtocolError::LockPoisoned(constants::ERR_REGISTRY_WRITE_LOCK.to_string())
        })?;

        let name = type_name::<P>();
        if let Some(existing) = entries.get(&TypeId::of::<P>()) {
            return Err(ProtocolError::DuplicateRegistration(format!(
                "{name} already registered with id {}",
                existing.id
            )));
        }
        if let Some(other) = entries.values().find(|r| r.id == id) {
            return Err(ProtocolError::DuplicateRegistration(format!(
                "id {id} already used by {}",
                other.type_name
            )));
        }

        entries.insert(
            TypeId::of::<P>(),
            Registration {
                id,
                custom_encoding,
                type_name: name,
            },
        );
        debug!(packet = name, id, custom_encoding, "Registered packet type");
        Ok(())
    }

    /// Registration for `P`, or `None` if it was never registered
    pub fn lookup<P: Packet>(&self) -> Result<Option<Registration>> {
        let entries = self.entries.read().map_err(|_| {
            ProtocolError::LockPoisoned(constants::ERR_REGISTRY_READ_LOCK.to_string())
        })?;
        Ok(entries.get(&TypeId::of::<P>()).copied())
    }

    pub fn contains<P: Packet>(&self) -> bool {
        matches!(self.lookup::<P>(), Ok(Some(_)))
    }

    /// Number of registered packet types
    pub fn len(&self) -> Result<usize> {
        let entries = self.entries.read().map_err(|_| {
            ProtocolError::LockPoisoned(constants::ERR_REGISTRY_READ_LOCK.to_string())
        })?;
        Ok(entries.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

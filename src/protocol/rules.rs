//! # Field Rules
//!
//! Overrides a type can apply to individual fields, and the resolver that decides
//! which of them applies during an encoding pass.
//!
//! Rules come from two places:
//! - inline, declared on a [`Field`] during [`WireObject::describe`](crate::protocol::object::WireObject::describe)
//! - a [`RuleSet`] holding four maps keyed by field name (before, instead, after,
//!   conversion), filled by [`WireObject::rules`](crate::protocol::object::WireObject::rules)
//!   and, for packets, by the configuration hook
//!
//! For every slot a `RuleSet` entry takes precedence over the inline declaration.
//! A `RuleSet` is built for one encoding pass and dropped with it.

use crate::core::primitive::{Primitive, PrimitiveKind};
use crate::core::value::WireValue;
use crate::core::writer::WireWriter;
use crate::error::{constants, ProtocolError, Result};
use crate::protocol::object::{Field, FieldSet};
use std::collections::HashMap;
use std::fmt;

/// Action run against the writer
pub type Hook<'a> = Box<dyn Fn(&mut WireWriter) + 'a>;

type ConvertFn<'a> = Box<dyn Fn(&WireValue<'_>) -> Primitive<'static> + 'a>;

/// Maps a field's value onto a primitive of a declared kind
pub struct Conversion<'a> {
    target: PrimitiveKind,
    convert: ConvertFn<'a>,
}

impl<'a> Conversion<'a> {
    pub fn new<F>(target: PrimitiveKind, convert: F) -> Self
    where
        F: Fn(&WireValue<'_>) -> Primitive<'static> + 'a,
    {
        Self {
            target,
            convert: Box::new(convert),
        }
    }

    pub fn target(&self) -> PrimitiveKind {
        self.target
    }

    /// Run the conversion and check the result against the declared kind
    pub fn apply(&self, field: &str, value: &WireValue<'_>) -> Result<Primitive<'static>> {
        let converted = (self.convert)(value);
        if converted.kind() != self.target {
            return Err(ProtocolError::MalformedRuleMap(format!(
                "field `{field}`: {} (declared {}, produced {})",
                constants::ERR_CONVERSION_KIND,
                self.target,
                converted.kind()
            )));
        }
        Ok(converted)
    }
}

impl fmt::Debug for Conversion<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conversion")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

/// Inline strategy declared with a field
#[derive(Default)]
pub enum FieldRule<'a> {
    /// Encode by declared type
    #[default]
    Default,
    /// Run a hook, then encode by declared type
    Before(Hook<'a>),
    /// Run a hook and skip the value entirely
    Instead(Hook<'a>),
    /// Write a converted primitive instead of the value
    Conversion(Conversion<'a>),
}

impl fmt::Debug for FieldRule<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldRule::Default => f.write_str("Default"),
            FieldRule::Before(_) => f.write_str("Before(..)"),
            FieldRule::Instead(_) => f.write_str("Instead(..)"),
            FieldRule::Conversion(c) => f.debug_tuple("Conversion").field(&c.target).finish(),
        }
    }
}

/// The four per-type rule maps, keyed by field name
#[derive(Default)]
pub struct RuleSet<'a> {
    before: HashMap<&'static str, Hook<'a>>,
    instead: HashMap<&'static str, Hook<'a>>,
    after: HashMap<&'static str, Hook<'a>>,
    conversion: HashMap<&'static str, Conversion<'a>>,
}

/// Rules that apply to one field after merging inline and map declarations
#[derive(Default)]
pub struct ResolvedRules<'s> {
    pub conversion: Option<&'s Conversion<'s>>,
    pub instead: Option<&'s Hook<'s>>,
    pub before: Option<&'s Hook<'s>>,
    pub after: Option<&'s Hook<'s>>,
}

impl<'a> RuleSet<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn before<F>(&mut self, field: &'static str, hook: F) -> &mut Self
    where
        F: Fn(&mut WireWriter) + 'a,
    {
        self.before.insert(field, Box::new(hook));
        self
    }

    pub fn instead<F>(&mut self, field: &'static str, hook: F) -> &mut Self
    where
        F: Fn(&mut WireWriter) + 'a,
    {
        self.instead.insert(field, Box::new(hook));
        self
    }

    pub fn after<F>(&mut self, field: &'static str, hook: F) -> &mut Self
    where
        F: Fn(&mut WireWriter) + 'a,
    {
        self.after.insert(field, Box::new(hook));
        self
    }

    pub fn convert<F>(&mut self, field: &'static str, target: PrimitiveKind, convert: F) -> &mut Self
    where
        F: Fn(&WireValue<'_>) -> Primitive<'static> + 'a,
    {
        self.conversion
            .insert(field, Conversion::new(target, convert));
        self
    }

    /// Total number of rules across all four maps
    pub fn len(&self) -> usize {
        self.before.len() + self.instead.len() + self.after.len() + self.conversion.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn keys(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        let before = self.before.keys().map(|k| ("before", *k));
        let instead = self.instead.keys().map(|k| ("instead", *k));
        let after = self.after.keys().map(|k| ("after", *k));
        let conversion = self.conversion.keys().map(|k| ("conversion", *k));
        before.chain(instead).chain(after).chain(conversion)
    }

    /// Check that every rule targets a field the type declares
    pub fn validate(&self, type_name: &str, fields: &FieldSet<'_>) -> Result<()> {
        if let Some((map, field)) = self.keys().find(|(_, field)| !fields.contains(field)) {
            return Err(ProtocolError::MalformedRuleMap(format!(
                "{type_name}: {map} {} `{field}`",
                constants::ERR_UNKNOWN_RULE_FIELD
            )));
        }
        Ok(())
    }

    /// Merge map entries with the field's inline declaration
    pub fn resolve<'s>(&'s self, field: &'s Field<'_>) -> ResolvedRules<'s> {
        let name = field.name();
        let (inline_before, inline_instead, inline_conversion) = match field.rule() {
            FieldRule::Default => (None, None, None),
            FieldRule::Before(hook) => (Some(hook), None, None),
            FieldRule::Instead(hook) => (None, Some(hook), None),
            FieldRule::Conversion(conversion) => (None, None, Some(conversion)),
        };

        ResolvedRules {
            conversion: self.conversion.get(name).or(inline_conversion),
            instead: self.instead.get(name).or(inline_instead),
            before: self.before.get(name).or(inline_before),
            after: self.after.get(name).or(field.after_hook()),
        }
    }
}

impl fmt::Debug for RuleSet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet")
            .field("before", &self.before.keys().collect::<Vec<_>>())
            .field("instead", &self.instead.keys().collect::<Vec<_>>())
            .field("after", &self.after.keys().collect::<Vec<_>>())
            .field("conversion", &self.conversion.keys().collect::<Vec<_>>())
            .finish()
    }
}

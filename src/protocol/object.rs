//! # Wire Objects
//!
//! Types that take part in encoding list their fields explicitly through
//! [`WireObject::describe`]. Declaration order is encoding order.
//!
//! Two registration calls control visibility:
//! - [`FieldSet::field`] registers a public field. It is encoded when the object is
//!   the top-level packet and ignored when the object is reached through recursion.
//! - [`FieldSet::data`] registers a field tagged as wire data. It is encoded at every
//!   depth.
//!
//! Per-field overrides are declared inline on the returned [`Field`]:
//!
//! ```rust
//! use packet_encoder::core::primitive::{Primitive, PrimitiveKind};
//! use packet_encoder::protocol::object::{FieldSet, WireObject};
//!
//! struct Profile {
//!     name: String,
//!     age: i32,
//! }
//!
//! impl WireObject for Profile {
//!     fn describe<'a>(&'a self, fields: &mut FieldSet<'a>) {
//!         fields.data("name", &self.name).before(|w| w.write_bool(true));
//!         fields
//!             .data("age", &self.age)
//!             .convert(PrimitiveKind::Str, |v| Primitive::from(format!("{v:?}")));
//!     }
//! }
//! ```

use crate::core::primitive::{Primitive, PrimitiveKind};
use crate::core::value::{ToWire, WireValue};
use crate::core::writer::WireWriter;
use crate::protocol::rules::{Conversion, FieldRule, Hook, RuleSet};

/// A type whose fields can be encoded
pub trait WireObject {
    /// Register this value's fields, in declaration order
    fn describe<'a>(&'a self, fields: &mut FieldSet<'a>);

    /// Declare the type's rule maps. Looked up fresh for every encoding pass.
    fn rules<'a>(&'a self, rules: &mut RuleSet<'a>) {
        let _ = rules;
    }

    /// Name used in logs and error messages
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl<T: WireObject + ?Sized> WireObject for Box<T> {
    fn describe<'a>(&'a self, fields: &mut FieldSet<'a>) {
        (**self).describe(fields)
    }

    fn rules<'a>(&'a self, rules: &mut RuleSet<'a>) {
        (**self).rules(rules)
    }

    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }
}

/// Which fields an encoding pass may see
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// The packet itself: every registered field
    TopLevel,
    /// Anything reached through recursion: only fields tagged as wire data
    Nested,
}

impl Visibility {
    pub fn admits(self, field: &Field<'_>) -> bool {
        match self {
            Visibility::TopLevel => true,
            Visibility::Nested => field.wire_data,
        }
    }
}

/// One registered field
pub struct Field<'a> {
    name: &'static str,
    wire_data: bool,
    value: &'a dyn ToWire,
    rule: FieldRule<'a>,
    after: Option<Hook<'a>>,
}

impl<'a> Field<'a> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the field is tagged as wire data
    pub fn is_wire_data(&self) -> bool {
        self.wire_data
    }

    /// Classify the field's current value
    pub fn value(&self) -> WireValue<'a> {
        self.value.to_wire()
    }

    pub fn rule(&self) -> &FieldRule<'a> {
        &self.rule
    }

    pub fn after_hook(&self) -> Option<&Hook<'a>> {
        self.after.as_ref()
    }

    /// Run `hook` right before the field's default encoding
    pub fn before<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&mut WireWriter) + 'a,
    {
        self.rule = FieldRule::Before(Box::new(hook));
        self
    }

    /// Run `hook` in place of the field's encoding; the value is never read
    pub fn instead<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&mut WireWriter) + 'a,
    {
        self.rule = FieldRule::Instead(Box::new(hook));
        self
    }

    /// Run `hook` right after the field's default encoding
    pub fn after<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&mut WireWriter) + 'a,
    {
        self.after = Some(Box::new(hook));
        self
    }

    /// Convert the value to a primitive of kind `target` and write that instead
    pub fn convert<F>(&mut self, target: PrimitiveKind, convert: F) -> &mut Self
    where
        F: Fn(&WireValue<'_>) -> Primitive<'static> + 'a,
    {
        self.rule = FieldRule::Conversion(Conversion::new(target, convert));
        self
    }
}

impl std::fmt::Debug for Field<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("wire_data", &self.wire_data)
            .field("rule", &self.rule)
            .field("after", &self.after.is_some())
            .finish()
    }
}

/// Ordered field registrations for one value
#[derive(Default)]
pub struct FieldSet<'a> {
    fields: Vec<Field<'a>>,
}

impl<'a> FieldSet<'a> {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Register a public field, visible at top level only
    pub fn field(&mut self, name: &'static str, value: &'a dyn ToWire) -> &mut Field<'a> {
        self.push(name, value, false)
    }

    /// Register a field tagged as wire data, visible at every depth
    pub fn data(&mut self, name: &'static str, value: &'a dyn ToWire) -> &mut Field<'a> {
        self.push(name, value, true)
    }

    fn push(&mut self, name: &'static str, value: &'a dyn ToWire, wire_data: bool) -> &mut Field<'a> {
        let index = self.fields.len();
        self.fields.push(Field {
            name,
            wire_data,
            value,
            rule: FieldRule::Default,
            after: None,
        });
        &mut self.fields[index]
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field<'a>> {
        self.fields.iter()
    }
}

impl<'s, 'a> IntoIterator for &'s FieldSet<'a> {
    type Item = &'s Field<'a>;
    type IntoIter = std::slice::Iter<'s, Field<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

//! Property descriptors: the per-type table the generic machinery walks.

use core::fmt;

use crate::error::{ModelError, ModelResult};
use crate::value::{Value, ValueKind};

/// One named, typed attribute of a model type.
///
/// Accessors are plain function pointers so a whole table can live in a
/// `static`.
pub struct Property<M> {
    name: &'static str,
    kind: ValueKind,
    optional: bool,
    get: fn(&M) -> Value,
    set: fn(&mut M, Value) -> ModelResult<()>,
}

impl<M> Property<M> {
    pub const fn new(
        name: &'static str,
        kind: ValueKind,
        optional: bool,
        get: fn(&M) -> Value,
        set: fn(&mut M, Value) -> ModelResult<()>,
    ) -> Self {
        Self {
            name,
            kind,
            optional,
            get,
            set,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Whether `value` may be stored in this attribute.
    pub fn accepts(&self, value: &Value) -> bool {
        match value {
            Value::Null => self.optional,
            v => v.kind() == self.kind,
        }
    }

    /// Like [`Property::accepts`], as an error naming the attribute.
    pub fn check(&self, value: &Value) -> ModelResult<()> {
        if self.accepts(value) {
            Ok(())
        } else {
            Err(ModelError::type_mismatch(self.name, self.kind, value.kind()))
        }
    }

    /// Read the boxed attribute value.
    pub fn get(&self, model: &M) -> Value {
        (self.get)(model)
    }

    /// Write the attribute directly, bypassing observers.
    pub fn set(&self, model: &mut M, value: Value) -> ModelResult<()> {
        self.check(&value)?;
        (self.set)(model, value)
    }

    pub fn info(&self) -> PropertyInfo {
        PropertyInfo {
            name: self.name,
            kind: self.kind,
            optional: self.optional,
        }
    }
}

impl<M> fmt::Debug for Property<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("optional", &self.optional)
            .finish()
    }
}

/// Type-erased description of a property.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PropertyInfo {
    pub name: &'static str,
    pub kind: ValueKind,
    pub optional: bool,
}

/// Find a property by name in a table.
pub fn find<'a, M>(table: &'a [Property<M>], name: &str) -> Option<&'a Property<M>> {
    table.iter().find(|p| p.name == name)
}

//! Model object trait: equality by attribute value, copying, archiving.
//!
//! A model object is a mutable record whose identity is its state: two
//! instances are equal when every attribute compares equal, whether or not
//! they are the same instance.
//!
//! Concrete types describe their attributes once, in a [`Property`] table.
//! Equality, copying and archiving are provided on top of that table. Every
//! model object is also its own [`PropertyChangeObserver`]: its hooks run on
//! every write made through the mutator, before any attached observer. A
//! model type only has to declare:
//!
//! ```ignore
//! #[derive(Debug, Clone, Default)]
//! struct Tag { name: String }
//!
//! modelkit_core::model_object!(Tag, "Tag", { name: String });
//! ```

use core::any::Any;
use core::fmt;

use tracing::debug;

use crate::archive::{ARCHIVE_VERSION, Archive, ArchivedField};
use crate::dynamic::ModelClass;
use crate::error::{ModelError, ModelResult};
use crate::observer::PropertyChangeObserver;
use crate::property::{self, Property};
use crate::value::Value;

/// A record with value equality, value copies and archival.
///
/// `Clone` must be a deep copy: nothing reachable from the clone may be shared
/// mutably with the original. Plain owned fields satisfy this.
///
/// The [`PropertyChangeObserver`] supertrait holds the model's own change
/// hooks; the defaults accept every change.
pub trait ModelObject:
    PropertyChangeObserver + Clone + Default + fmt::Debug + Send + Sync + 'static
{
    /// Stable class name, written into archives.
    const CLASS_NAME: &'static str;

    /// Attribute table, in archive order.
    fn properties() -> &'static [Property<Self>];

    /// The class descriptor of this type.
    fn class() -> ModelClass {
        ModelClass::of::<Self>()
    }

    /// Look up one of this type's properties.
    fn property_named(name: &str) -> ModelResult<&'static Property<Self>> {
        property::find(Self::properties(), name)
            .ok_or_else(|| ModelError::unknown_property(Self::CLASS_NAME, name))
    }

    /// Read an attribute, boxed.
    fn property(&self, name: &str) -> ModelResult<Value> {
        Ok(Self::property_named(name)?.get(self))
    }

    /// Every attribute, boxed, in table order.
    fn property_values(&self) -> Vec<(&'static str, Value)> {
        Self::properties()
            .iter()
            .map(|p| (p.name(), p.get(self)))
            .collect()
    }

    /// Attribute-wise equality against any model object.
    ///
    /// `None` and instances of another concrete type are never equal.
    fn is_equal_to_model_object(&self, other: Option<&dyn AnyModelObject>) -> bool {
        let Some(other) = other else {
            return false;
        };
        match other.as_any().downcast_ref::<Self>() {
            Some(other) => Self::properties()
                .iter()
                .all(|p| p.get(self) == p.get(other)),
            None => false,
        }
    }

    /// An independent copy with equal attributes.
    fn copy(&self) -> Self {
        self.clone()
    }

    /// Archive every attribute in table order.
    fn encode(&self) -> Archive {
        let fields = Self::properties()
            .iter()
            .map(|p| ArchivedField::new(p.name(), p.get(self)))
            .collect();
        Archive::new(Self::CLASS_NAME, ARCHIVE_VERSION, fields)
    }

    /// Rebuild an instance from an archive produced by [`ModelObject::encode`].
    ///
    /// Fails with [`ModelError::MalformedArchive`] when the archive belongs to
    /// another class or a newer format, or when any attribute is missing,
    /// duplicated or of the wrong kind. On failure nothing is returned.
    fn decode(archive: &Archive) -> ModelResult<Self> {
        archive.expect_class(Self::CLASS_NAME)?;

        let table = Self::properties();
        for field in archive.fields() {
            if property::find(table, field.key()).is_none() {
                debug!(
                    class = Self::CLASS_NAME,
                    key = field.key(),
                    "ignoring unknown archive key"
                );
            }
        }

        let mut model = Self::default();
        for p in table {
            let value = archive.field(p.name())?;
            p.set(&mut model, value.clone()).map_err(|e| {
                ModelError::malformed(format!("{}.{}: {e}", Self::CLASS_NAME, p.name()))
            })?;
        }
        Ok(model)
    }
}

/// Object-safe view of any [`ModelObject`].
pub trait AnyModelObject: fmt::Debug + Send + Sync {
    fn class_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn values_dyn(&self) -> Vec<(&'static str, Value)>;

    fn encode_dyn(&self) -> Archive;

    fn clone_boxed(&self) -> Box<dyn AnyModelObject>;

    fn is_equal_dyn(&self, other: Option<&dyn AnyModelObject>) -> bool;
}

impl<M: ModelObject> AnyModelObject for M {
    fn class_name(&self) -> &'static str {
        M::CLASS_NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn values_dyn(&self) -> Vec<(&'static str, Value)> {
        self.property_values()
    }

    fn encode_dyn(&self) -> Archive {
        self.encode()
    }

    fn clone_boxed(&self) -> Box<dyn AnyModelObject> {
        Box::new(self.copy())
    }

    fn is_equal_dyn(&self, other: Option<&dyn AnyModelObject>) -> bool {
        self.is_equal_to_model_object(other)
    }
}

impl Clone for Box<dyn AnyModelObject> {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

//! `modelkit-core` — model object building blocks.
//!
//! Model objects are mutable records compared by attribute value, copied by
//! value and archived to an ordered, keyed representation. Attribute writes
//! can be intercepted by observers that may veto a change before it happens
//! and are notified after it happened.
//!
//! This crate has no IO: archives are plain data (serde-serializable), and
//! logging goes through `tracing`.

pub mod archive;
pub mod dynamic;
pub mod error;
mod macros;
pub mod model;
pub mod mutator;
pub mod observer;
pub mod property;
pub mod value;

pub use archive::{ARCHIVE_VERSION, Archive, ArchivedField};
pub use dynamic::{
    DynamicClass, ModelClass, Observed, register_dynamic_class, registered_classes,
};
pub use error::{ModelError, ModelResult};
pub use model::{AnyModelObject, ModelObject};
pub use mutator::{set_property, write_property};
pub use observer::{AcceptAll, ChangeLog, ChangeOutcome, ChangeRecord, PropertyChangeObserver};
pub use property::{Property, PropertyInfo};
pub use value::{Point, PropertyValue, Rect, Size, Value, ValueKind};

//! The shared attribute mutator.
//!
//! All observed writes funnel through here, so the veto/notify protocol is
//! implemented once instead of in every setter:
//!
//! - look the property up and check the new value's kind (no hook runs for a
//!   write that could never succeed),
//! - ask the model's own `property_will_change`, then the attached observer;
//!   on the first `false` leave the model untouched and notify nobody,
//! - write, then call `property_did_change` exactly once on the model and
//!   once on the observer.
//!
//! Writing a value equal to the current one still commits and notifies.

use tracing::{debug, trace};

use crate::error::ModelResult;
use crate::model::ModelObject;
use crate::observer::{AcceptAll, ChangeOutcome, PropertyChangeObserver};
use crate::property::Property;
use crate::value::Value;

fn vetoed<M: ModelObject>(property: &Property<M>, by: &str) -> ModelResult<ChangeOutcome> {
    debug!(class = M::CLASS_NAME, property = property.name(), by, "change vetoed");
    Ok(ChangeOutcome::Vetoed)
}

/// Write attribute `name` of `model`, consulting the model's own hooks and
/// then `observer`.
pub fn set_property<M, O>(
    model: &mut M,
    observer: &mut O,
    name: &str,
    value: impl Into<Value>,
) -> ModelResult<ChangeOutcome>
where
    M: ModelObject,
    O: PropertyChangeObserver + ?Sized,
{
    let new = value.into();
    let property = M::property_named(name)?;
    property.check(&new)?;
    let old = property.get(model);

    if !model.property_will_change(property.name(), &old, &new) {
        return vetoed(property, "model");
    }
    if !observer.property_will_change(property.name(), &old, &new) {
        return vetoed(property, "observer");
    }
    property.set(model, new.clone())?;
    model.property_did_change(property.name(), &old, &new);
    observer.property_did_change(property.name(), &old, &new);

    trace!(class = M::CLASS_NAME, property = property.name(), ?old, ?new, "change committed");
    Ok(ChangeOutcome::Committed { old, new })
}

/// Write attribute `name` of `model` with no attached observer. The model's
/// own hooks still run.
pub fn write_property<M: ModelObject>(
    model: &mut M,
    name: &str,
    value: impl Into<Value>,
) -> ModelResult<ChangeOutcome> {
    set_property(model, &mut AcceptAll, name, value)
}

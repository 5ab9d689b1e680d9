//! Property-change observation.
//!
//! Every attribute write that goes through [`crate::set_property`] runs a
//! two-phase protocol:
//!
//! 1. [`PropertyChangeObserver::property_will_change`] may veto the write.
//! 2. If it did not, the attribute is written and
//!    [`PropertyChangeObserver::property_did_change`] is told about it.
//!
//! Every model object implements the trait for itself and is asked first;
//! an attached observer is asked second. Both hooks have defaults (accept, do
//! nothing), so an observer implements only what it cares about. Old and new values arrive boxed as [`Value`]s.

use std::sync::{Arc, Mutex, PoisonError};

use crate::value::Value;

/// Hooks around attribute writes.
pub trait PropertyChangeObserver {
    /// Called before `name` changes from `old` to `new`. Return `false` to
    /// reject the change.
    fn property_will_change(&mut self, _name: &str, _old: &Value, _new: &Value) -> bool {
        true
    }

    /// Called right after `name` changed from `old` to `new`.
    fn property_did_change(&mut self, _name: &str, _old: &Value, _new: &Value) {}
}

/// Observer that accepts every change and ignores notifications.
#[derive(Debug, Copy, Clone, Default)]
pub struct AcceptAll;

impl PropertyChangeObserver for AcceptAll {}

impl<O: PropertyChangeObserver + ?Sized> PropertyChangeObserver for Box<O> {
    fn property_will_change(&mut self, name: &str, old: &Value, new: &Value) -> bool {
        (**self).property_will_change(name, old, new)
    }

    fn property_did_change(&mut self, name: &str, old: &Value, new: &Value) {
        (**self).property_did_change(name, old, new)
    }
}

/// A shared observer, so the caller can keep a handle to it after handing it
/// to an observed instance.
impl<O: PropertyChangeObserver + ?Sized> PropertyChangeObserver for Arc<Mutex<O>> {
    fn property_will_change(&mut self, name: &str, old: &Value, new: &Value) -> bool {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .property_will_change(name, old, new)
    }

    fn property_did_change(&mut self, name: &str, old: &Value, new: &Value) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .property_did_change(name, old, new)
    }
}

/// A group of observers: any one of them can veto, all of them are notified.
///
/// Observers are asked in order and asking stops at the first veto.
impl<O: PropertyChangeObserver> PropertyChangeObserver for Vec<O> {
    fn property_will_change(&mut self, name: &str, old: &Value, new: &Value) -> bool {
        self.iter_mut()
            .all(|o| o.property_will_change(name, old, new))
    }

    fn property_did_change(&mut self, name: &str, old: &Value, new: &Value) {
        for o in self.iter_mut() {
            o.property_did_change(name, old, new);
        }
    }
}

/// Result of one attempted attribute write.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeOutcome {
    /// The write was committed.
    Committed { old: Value, new: Value },
    /// An observer rejected the write; the attribute is unchanged.
    Vetoed,
}

impl ChangeOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, ChangeOutcome::Committed { .. })
    }
}

/// A committed change, as seen by `property_did_change`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeRecord {
    pub name: String,
    pub old: Value,
    pub new: Value,
}

type VetoFn = Box<dyn FnMut(&str, &Value, &Value) -> bool + Send>;

/// Observer that records every committed change, optionally vetoing some.
#[derive(Default)]
pub struct ChangeLog {
    records: Vec<ChangeRecord>,
    proposals: usize,
    veto: Option<VetoFn>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every change for which `veto` returns `true`.
    pub fn vetoing(veto: impl FnMut(&str, &Value, &Value) -> bool + Send + 'static) -> Self {
        Self {
            veto: Some(Box::new(veto)),
            ..Self::default()
        }
    }

    /// Committed changes, oldest first.
    pub fn records(&self) -> &[ChangeRecord] {
        &self.records
    }

    /// Number of `property_will_change` calls seen, vetoed or not.
    pub fn proposals(&self) -> usize {
        self.proposals
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.proposals = 0;
    }
}

impl core::fmt::Debug for ChangeLog {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ChangeLog")
            .field("records", &self.records)
            .field("proposals", &self.proposals)
            .field("vetoing", &self.veto.is_some())
            .finish()
    }
}

impl PropertyChangeObserver for ChangeLog {
    fn property_will_change(&mut self, name: &str, old: &Value, new: &Value) -> bool {
        self.proposals += 1;
        match self.veto.as_mut() {
            Some(veto) => !veto(name, old, new),
            None => true,
        }
    }

    fn property_did_change(&mut self, name: &str, old: &Value, new: &Value) {
        self.records.push(ChangeRecord {
            name: name.to_string(),
            old: old.clone(),
            new: new.clone(),
        });
    }
}

//! Dynamic class registration.
//!
//! A model type that needs its attribute writes intercepted is instantiated
//! through a derived "dynamic class": one per base type, registered once per
//! process and shared afterwards. Instances of the derived class are
//! [`Observed`] wrappers that route every write through the mutator and the
//! attached observers.
//!
//! Registration is idempotent: asking twice for the same base type returns
//! the same `Arc<DynamicClass>`. The registry is process-wide and guarded by a
//! mutex, so concurrent first registrations still produce a single class.

use core::any::TypeId;
use core::fmt;
use core::ops::Deref;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use tracing::info;

use crate::archive::Archive;
use crate::error::{ModelError, ModelResult};
use crate::model::ModelObject;
use crate::mutator::set_property;
use crate::observer::{ChangeOutcome, PropertyChangeObserver};
use crate::property::PropertyInfo;
use crate::value::Value;

/// Prefix of every derived class name.
pub const DYNAMIC_CLASS_PREFIX: &str = "ModelObject_";

/// Descriptor of a model type.
#[derive(Debug, Clone)]
pub struct ModelClass {
    type_id: TypeId,
    name: &'static str,
    properties: Vec<PropertyInfo>,
}

impl ModelClass {
    pub fn new(type_id: TypeId, name: &'static str, properties: Vec<PropertyInfo>) -> Self {
        Self {
            type_id,
            name,
            properties,
        }
    }

    pub fn of<M: ModelObject>() -> Self {
        Self::new(
            TypeId::of::<M>(),
            M::CLASS_NAME,
            M::properties().iter().map(|p| p.info()).collect(),
        )
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn properties(&self) -> &[PropertyInfo] {
        &self.properties
    }

    fn validate(&self) -> ModelResult<()> {
        if self.name.is_empty() {
            return Err(ModelError::invalid_class("class name is empty"));
        }
        if self.properties.is_empty() {
            return Err(ModelError::invalid_class(format!(
                "{} declares no properties",
                self.name
            )));
        }
        let mut seen = HashSet::new();
        for p in &self.properties {
            if p.name.is_empty() {
                return Err(ModelError::invalid_class(format!(
                    "{} declares a property with an empty name",
                    self.name
                )));
            }
            if !seen.insert(p.name) {
                return Err(ModelError::invalid_class(format!(
                    "{} declares property `{}` twice",
                    self.name, p.name
                )));
            }
        }
        Ok(())
    }
}

impl PartialEq for ModelClass {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ModelClass {}

/// A derived class that intercepts attribute writes of its base class.
#[derive(Debug)]
pub struct DynamicClass {
    name: String,
    base: ModelClass,
}

impl DynamicClass {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base(&self) -> &ModelClass {
        &self.base
    }

    /// Allocate an instance of this class around `model`.
    ///
    /// Fails when `M` is not the base type this class was derived from.
    pub fn instantiate<M: ModelObject>(self: &Arc<Self>, model: M) -> ModelResult<Observed<M>> {
        if self.base.type_id != TypeId::of::<M>() {
            return Err(ModelError::invalid_class(format!(
                "{} cannot allocate a {}",
                self.name,
                M::CLASS_NAME
            )));
        }
        Ok(Observed {
            model,
            class: Arc::clone(self),
            observers: Vec::new(),
        })
    }
}

type Registry = HashMap<TypeId, Arc<DynamicClass>>;

fn registry() -> &'static Mutex<Registry> {
    static REGISTRY: OnceLock<Mutex<Registry>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Register (or look up) the dynamic class derived from `base`.
///
/// A later call for the same type must carry the same descriptor (name and
/// properties) as the first one.
pub fn register_dynamic_class(base: &ModelClass) -> ModelResult<Arc<DynamicClass>> {
    base.validate()?;

    // Entries are only ever inserted whole, so a poisoned lock still guards a
    // consistent map.
    let mut classes = registry().lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(existing) = classes.get(&base.type_id) {
        if existing.base.name != base.name || existing.base.properties != base.properties {
            return Err(ModelError::invalid_class(format!(
                "{} is already registered with a different descriptor",
                existing.name
            )));
        }
        return Ok(Arc::clone(existing));
    }

    let name = format!("{DYNAMIC_CLASS_PREFIX}{}", base.name);
    if classes.values().any(|c| c.name == name) {
        return Err(ModelError::invalid_class(format!(
            "{name} is already registered for another type"
        )));
    }

    let class = Arc::new(DynamicClass {
        name,
        base: base.clone(),
    });
    classes.insert(base.type_id, Arc::clone(&class));
    info!(
        class = %class.name,
        properties = base.properties.len(),
        "registered dynamic class"
    );
    Ok(class)
}

/// Names of every registered dynamic class, sorted.
pub fn registered_classes() -> Vec<String> {
    let classes = registry().lock().unwrap_or_else(PoisonError::into_inner);
    let mut names: Vec<_> = classes.values().map(|c| c.name.clone()).collect();
    names.sort();
    names
}

/// An instance of a dynamic class: a model whose writes are observed.
///
/// Reads go straight to the model through `Deref`; writes must go through
/// [`Observed::set`].
pub struct Observed<M: ModelObject> {
    model: M,
    class: Arc<DynamicClass>,
    observers: Vec<Box<dyn PropertyChangeObserver + Send>>,
}

impl<M: ModelObject> Observed<M> {
    /// Wrap `model` in the dynamic class derived from `M`, registering it on
    /// first use.
    pub fn new(model: M) -> ModelResult<Self> {
        register_dynamic_class(&M::class())?.instantiate(model)
    }

    /// Decode an archive straight into an observed instance.
    pub fn decode(archive: &Archive) -> ModelResult<Self> {
        Self::new(M::decode(archive)?)
    }

    /// Attach an observer. Observers are consulted in attachment order.
    pub fn observe(&mut self, observer: impl PropertyChangeObserver + Send + 'static) -> &mut Self {
        self.observers.push(Box::new(observer));
        self
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Write attribute `name`. The model's own hooks run first, then the
    /// observers in attachment order. Any of them may veto; all are notified
    /// of a committed change.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> ModelResult<ChangeOutcome> {
        set_property(&mut self.model, &mut self.observers, name, value)
    }

    pub fn class(&self) -> &Arc<DynamicClass> {
        &self.class
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Drop the observers and return the plain model.
    pub fn into_inner(self) -> M {
        self.model
    }
}

impl<M: ModelObject> Deref for Observed<M> {
    type Target = M;

    fn deref(&self) -> &M {
        &self.model
    }
}

impl<M: ModelObject> fmt::Debug for Observed<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observed")
            .field("class", &self.class.name)
            .field("model", &self.model)
            .field("observers", &self.observers.len())
            .finish()
    }
}

//! Class Registry
//!
//! Model classes are built once and shared. The registry maps class names to
//! built [`ModelClass`]es so that code creating instances in many places
//! (one per widget, say) pays for validation and layering only on first use.
//!
//! # Thread Safety
//!
//! The registry is backed by a concurrent map and may be used from any
//! thread. Two threads racing to build the same class may both build it;
//! the first insertion wins and both receive the same shared class.

use std::sync::OnceLock;

use dashmap::DashMap;
use tracing::debug;

use super::model::ModelClass;
use crate::error::Result;
use crate::graph::DefinitionSet;

/// Name-keyed cache of built model classes.
#[derive(Debug, Default)]
pub struct ClassRegistry {
    classes: DashMap<String, ModelClass>,
}

static GLOBAL: OnceLock<ClassRegistry> = OnceLock::new();

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> &'static ClassRegistry {
        GLOBAL.get_or_init(ClassRegistry::new)
    }

    /// Return the class registered as `name`, building it from `define` if
    /// this is the first request.
    ///
    /// A failed build registers nothing; the next request tries again.
    pub fn class<F>(&self, name: &str, define: F) -> Result<ModelClass>
    where
        F: FnOnce() -> DefinitionSet,
    {
        if let Some(existing) = self.classes.get(name) {
            return Ok(existing.value().clone());
        }

        let built = ModelClass::build(name, define())?;
        debug!(class = name, "registered model class");
        Ok(self
            .classes
            .entry(name.to_owned())
            .or_insert(built)
            .value()
            .clone())
    }

    /// Register a class built elsewhere, e.g. one produced by
    /// [`ModelClass::extend`]. Replaces any class with the same name.
    pub fn insert(&self, class: ModelClass) -> Option<ModelClass> {
        self.classes.insert(class.name().to_owned(), class)
    }

    pub fn get(&self, name: &str) -> Option<ModelClass> {
        self.classes.get(name).map(|entry| entry.value().clone())
    }

    pub fn remove(&self, name: &str) -> Option<ModelClass> {
        self.classes.remove(name).map(|(_, class)| class)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::graph::PropertyDefinition;
    use crate::value::ValueType;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> DefinitionSet {
        DefinitionSet::new().define(PropertyDefinition::fundamental("count", ValueType::Number, 0))
    }

    #[test]
    fn builds_each_class_once() {
        let registry = ClassRegistry::new();
        let builds = AtomicUsize::new(0);

        let first = registry
            .class("Counter", || {
                builds.fetch_add(1, Ordering::SeqCst);
                counter()
            })
            .unwrap();
        let second = registry
            .class("Counter", || {
                builds.fetch_add(1, Ordering::SeqCst);
                counter()
            })
            .unwrap();

        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert!(first.same_class(&second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn failed_build_is_not_cached() {
        let registry = ClassRegistry::new();
        let cyclic = || {
            DefinitionSet::new().define(PropertyDefinition::computed(
                "loop",
                ValueType::Any,
                ["loop"],
                |ctx| Ok(ctx.input(0).clone()),
            ))
        };

        assert!(matches!(
            registry.class("Loop", cyclic),
            Err(EngineError::Cycle(_))
        ));
        assert!(registry.get("Loop").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn insert_and_remove() {
        let registry = ClassRegistry::new();
        let class = ModelClass::build("Manual", counter()).unwrap();

        assert!(registry.insert(class.clone()).is_none());
        assert!(registry.get("Manual").unwrap().same_class(&class));
        assert!(registry.remove("Manual").is_some());
        assert!(registry.get("Manual").is_none());
    }

    #[test]
    fn global_registry_is_shared() {
        let a = ClassRegistry::global()
            .class("registry-tests::Global", counter)
            .unwrap();
        let b = ClassRegistry::global().get("registry-tests::Global").unwrap();
        assert!(a.same_class(&b));
    }
}

//! Property Definitions
//!
//! A [`PropertyDefinition`] is the raw declaration of one property. A
//! [`DefinitionSet`] is the declaration table of a model class, kept in
//! declaration order. Nothing here is validated until the set is handed to
//! the graph builder.
//!
//! # Extension
//!
//! A derived class starts from [`DefinitionSet::derive`], which copies the
//! base table and remembers the kind of every inherited property. Defining
//! an inherited name again overrides it in place; the override must keep the
//! base kind.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::error::{ComputeError, DeclarationError};
use crate::reactive::ComputeContext;
use crate::value::{Comparator, Value, ValueType};

/// Whether a property is assigned directly or derived from other properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// Directly settable; seeded from an initial value.
    Fundamental,

    /// Derived from its dependencies by a compute function.
    Computed,
}

/// Compute function of a computed property.
///
/// Receives the current values of the declared dependencies, in declaration
/// order, through the [`ComputeContext`].
pub type ComputeFn =
    Arc<dyn Fn(&ComputeContext<'_>) -> Result<Value, ComputeError> + Send + Sync>;

/// Initial value of a fundamental property.
#[derive(Clone)]
pub enum Initial {
    Literal(Value),
    Factory(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl Initial {
    /// Produce the value for a fresh instance.
    pub fn resolve(&self) -> Value {
        match self {
            Initial::Literal(value) => value.clone(),
            Initial::Factory(factory) => factory(),
        }
    }
}

impl fmt::Debug for Initial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Initial::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Initial::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

/// Declaration of a single property.
#[derive(Clone)]
pub struct PropertyDefinition {
    pub name: String,
    pub kind: PropertyKind,
    pub value_type: ValueType,
    pub dependencies: SmallVec<[String; 4]>,
    pub initial: Option<Initial>,
    pub compute: Option<ComputeFn>,
    pub comparator: Option<Comparator>,
    pub read_only: bool,
}

impl PropertyDefinition {
    /// Declare a fundamental property with a literal initial value.
    pub fn fundamental(
        name: impl Into<String>,
        value_type: ValueType,
        initial: impl Into<Value>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: PropertyKind::Fundamental,
            value_type,
            dependencies: SmallVec::new(),
            initial: Some(Initial::Literal(initial.into())),
            compute: None,
            comparator: None,
            read_only: false,
        }
    }

    /// Declare a fundamental property whose initial value is produced per
    /// instance.
    pub fn fundamental_with<F>(name: impl Into<String>, value_type: ValueType, factory: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Self {
            initial: Some(Initial::Factory(Arc::new(factory))),
            ..Self::fundamental(name, value_type, Value::Null)
        }
    }

    /// Declare a computed property.
    pub fn computed<I, S, F>(
        name: impl Into<String>,
        value_type: ValueType,
        dependencies: I,
        compute: F,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&ComputeContext<'_>) -> Result<Value, ComputeError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            kind: PropertyKind::Computed,
            value_type,
            dependencies: dependencies.into_iter().map(Into::into).collect(),
            initial: None,
            compute: Some(Arc::new(compute)),
            comparator: None,
            read_only: false,
        }
    }

    /// Replace the default comparator.
    pub fn with_comparator<F>(mut self, comparator: F) -> Self
    where
        F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        self.comparator = Some(Arc::new(comparator));
        self
    }

    /// Reject external assignments after construction.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// The comparator in effect: the declared one, or the value type default.
    pub fn effective_comparator(&self) -> Comparator {
        self.comparator
            .clone()
            .unwrap_or_else(|| self.value_type.default_comparator())
    }

    /// Check that the declaration body matches its kind.
    pub fn validate(&self) -> Result<(), DeclarationError> {
        let name = || self.name.clone();
        match (&self.initial, &self.compute) {
            (Some(_), Some(_)) => Err(DeclarationError::InitialAndCompute(name())),
            (None, None) => Err(DeclarationError::NoInitialOrCompute(name())),
            (Some(_), None) if self.kind == PropertyKind::Computed => Err(
                DeclarationError::KindMismatch(name(), PropertyKind::Fundamental, self.kind),
            ),
            (None, Some(_)) if self.kind == PropertyKind::Fundamental => Err(
                DeclarationError::KindMismatch(name(), PropertyKind::Computed, self.kind),
            ),
            _ if self.kind == PropertyKind::Fundamental && !self.dependencies.is_empty() => {
                Err(DeclarationError::FundamentalWithDependencies(name()))
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for PropertyDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDefinition")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("value_type", &self.value_type)
            .field("dependencies", &self.dependencies)
            .field("initial", &self.initial)
            .field("compute", &self.compute.as_ref().map(|_| ".."))
            .field("custom_comparator", &self.comparator.is_some())
            .field("read_only", &self.read_only)
            .finish()
    }
}

/// The declaration table of one model class.
#[derive(Debug, Clone, Default)]
pub struct DefinitionSet {
    definitions: IndexMap<String, PropertyDefinition>,

    /// Kinds of inherited properties, checked against overrides.
    inherited: IndexMap<String, PropertyKind>,

    /// Names declared at this level (not inherited).
    declared: HashSet<String>,

    /// Names declared twice at this level.
    duplicates: Vec<String>,
}

impl DefinitionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition, builder style.
    pub fn define(mut self, definition: PropertyDefinition) -> Self {
        self.insert(definition);
        self
    }

    /// Add a definition. An inherited name is overridden in place.
    pub fn insert(&mut self, definition: PropertyDefinition) {
        if !self.declared.insert(definition.name.clone()) {
            self.duplicates.push(definition.name.clone());
        }
        self.definitions.insert(definition.name.clone(), definition);
    }

    /// Start a derived table that inherits every definition of `self`.
    pub fn derive(&self) -> Self {
        let mut inherited = self.inherited.clone();
        for (name, def) in &self.definitions {
            inherited.insert(name.clone(), def.kind);
        }
        Self {
            definitions: self.definitions.clone(),
            inherited,
            declared: HashSet::new(),
            duplicates: Vec::new(),
        }
    }

    /// Merge every definition of `other` into `self`, as overrides or
    /// additions.
    pub fn merge(&mut self, other: DefinitionSet) {
        self.duplicates.extend(other.duplicates);
        for (_, definition) in other.definitions {
            self.insert(definition);
        }
    }

    pub fn get(&self, name: &str) -> Option<&PropertyDefinition> {
        self.definitions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Definitions in declaration order (overrides keep the base position).
    pub fn iter(&self) -> impl Iterator<Item = &PropertyDefinition> {
        self.definitions.values()
    }

    /// Every check that does not need the dependency graph.
    pub fn validate(&self) -> Result<(), DeclarationError> {
        if let Some(name) = self.duplicates.first() {
            return Err(DeclarationError::DuplicateProperty(name.clone()));
        }
        for def in self.definitions.values() {
            def.validate()?;
        }
        for (name, &base) in &self.inherited {
            if let Some(def) = self.definitions.get(name) {
                if def.kind != base {
                    return Err(DeclarationError::KindOverride {
                        property: name.clone(),
                        base,
                        declared: def.kind,
                    });
                }
            }
        }
        Ok(())
    }
}

//! Cascade Core
//!
//! This crate provides a reactive property engine. A model declares named
//! properties and their dependencies; derived properties are recomputed
//! automatically when their inputs change. It implements:
//!
//! - Property declarations with per-type equality comparators
//! - A layered (topologically sorted) dependency graph, built once per class
//! - Depth-ordered change propagation, each property recomputed at most once
//!   per cycle
//! - Typed change subscriptions with unsubscribe handles
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `graph`: declarations, graph building, and the propagation queue
//! - `reactive`: model classes, instances, subscriptions, and the registry
//! - `value`: the dynamic value type and comparators
//! - `month`: the month-grid calendar model built on the engine
//!
//! # Example
//!
//! ```rust
//! use cascade_core::{DefinitionSet, ModelClass, PropertyDefinition, Value, ValueType};
//!
//! let defs = DefinitionSet::new()
//!     .define(PropertyDefinition::fundamental("count", ValueType::Number, 2))
//!     .define(PropertyDefinition::computed(
//!         "doubled",
//!         ValueType::Number,
//!         ["count"],
//!         |ctx| Ok(Value::Int(ctx.int(0)? * 2)),
//!     ));
//!
//! let class = ModelClass::build("Counter", defs)?;
//! let mut model = class.instantiate()?;
//! assert_eq!(model.get("doubled")?, &Value::Int(4));
//!
//! model.set("count", 5)?;
//! assert_eq!(model.get("doubled")?, &Value::Int(10));
//! # Ok::<(), cascade_core::EngineError>(())
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod month;
pub mod reactive;
pub mod snapshot;
pub mod value;

pub use config::EngineConfig;
pub use error::{
    ComputeError, CycleError, DeclarationError, EngineError, InvalidOperation, Result,
    SnapshotError,
};
pub use graph::{DefinitionSet, Graph, PropertyDefinition, PropertyId, PropertyKind};
pub use reactive::{
    ChangeSet, ClassRegistry, ComputeContext, Model, ModelClass, ModelSender, Subscription,
};
pub use snapshot::Snapshot;
pub use value::{Comparator, Value, ValueType};

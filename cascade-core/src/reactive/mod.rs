//! Reactive Models
//!
//! This module implements the dynamic side of the engine: model instances,
//! their value stores, change propagation, and change subscriptions.
//!
//! # Concepts
//!
//! ## Model classes
//!
//! A [`ModelClass`] is built once from a [`DefinitionSet`](crate::graph::DefinitionSet).
//! Building validates the declarations and layers the dependency graph; the
//! result is immutable and shared by every instance.
//!
//! ## Models
//!
//! A [`Model`] owns the current value of every property. Reads are plain
//! cache reads. Assigning a fundamental property runs one propagation
//! cycle, recomputing affected computed properties in depth order, each at
//! most once.
//!
//! ## Subscriptions
//!
//! [`Model::on_change`] registers a callback for a set of property names.
//! It runs once per cycle in which any of them changed.
//!
//! # Implementation Notes
//!
//! Dependencies are declared, not discovered: a compute function receives
//! exactly the values of the dependencies it declared, through a
//! [`ComputeContext`]. All per-instance state lives on the [`Model`]; nothing
//! is shared between instances except the read-only class.

mod context;
mod model;
mod registry;
mod sender;
mod store;
mod subscriber;

pub use context::ComputeContext;
pub use model::{Model, ModelClass};
pub use registry::ClassRegistry;
pub use sender::{Disconnected, ModelSender, PendingSet};
pub use store::ValueStore;
pub use subscriber::{ChangeCallback, ChangeSet, SubscriberId, Subscription};

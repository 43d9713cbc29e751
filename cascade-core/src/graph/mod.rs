//! Dependency Graph
//!
//! This module implements the static side of the engine: property
//! declarations, the layered dependency graph built from them, and the
//! depth-ordered queue used to propagate changes through it.
//!
//! # Overview
//!
//! The dependency graph is a directed acyclic graph (DAG) where:
//!
//! - Nodes are properties, either fundamental (assigned) or computed (derived)
//! - Edges are dependencies: if B depends on A, there is an edge from A to B
//!
//! The graph is built once per model class and is read-only afterwards.
//! Every node carries a depth (its layer index); propagation recomputes
//! pending properties in ascending depth so that nothing is computed twice
//! in one cycle.
//!
//! # Design Decisions
//!
//! 1. Properties are addressed by dense [`PropertyId`]s in declaration order,
//!    so per-instance state is a plain vector.
//!
//! 2. Nodes keep both dependencies (to gather compute inputs) and dependents
//!    (to fan out changes).

mod builder;
mod definition;
mod node;
mod scheduler;

pub use builder::Graph;
pub use definition::{ComputeFn, DefinitionSet, Initial, PropertyDefinition, PropertyKind};
pub use node::{Node, PropertyId};
pub use scheduler::PropagationQueue;

//! Graph Nodes
//!
//! A node is a resolved property: its definition plus the edges and depth
//! assigned by the graph builder.

use std::fmt;

use smallvec::SmallVec;

use super::definition::{ComputeFn, Initial, PropertyDefinition, PropertyKind};
use crate::value::Comparator;

/// Index of a property within its model class.
///
/// Ids are dense and follow declaration order, so they double as indices
/// into a model's value store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyId(u32);

impl PropertyId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    /// Get the raw index.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// A property in the dependency graph.
pub struct Node {
    id: PropertyId,

    definition: PropertyDefinition,

    /// Resolved comparator (declared or default for the value type).
    comparator: Comparator,

    /// Topological rank. Every dependency has a strictly smaller depth.
    depth: usize,

    /// Properties this node reads from, in declaration order.
    dependencies: SmallVec<[PropertyId; 4]>,

    /// Properties that read from this node. No duplicates.
    dependents: SmallVec<[PropertyId; 4]>,
}

impl Node {
    pub(crate) fn new(
        id: PropertyId,
        definition: PropertyDefinition,
        dependencies: SmallVec<[PropertyId; 4]>,
    ) -> Self {
        Self {
            id,
            comparator: definition.effective_comparator(),
            definition,
            depth: 0,
            dependencies,
            dependents: SmallVec::new(),
        }
    }

    pub fn id(&self) -> PropertyId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn kind(&self) -> PropertyKind {
        self.definition.kind
    }

    pub fn is_read_only(&self) -> bool {
        self.definition.read_only
    }

    pub fn definition(&self) -> &PropertyDefinition {
        &self.definition
    }

    pub fn initial(&self) -> Option<&Initial> {
        self.definition.initial.as_ref()
    }

    pub fn compute(&self) -> Option<&ComputeFn> {
        self.definition.compute.as_ref()
    }

    pub fn comparator(&self) -> &Comparator {
        &self.comparator
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn set_depth(&mut self, depth: usize) {
        self.depth = depth;
    }

    pub fn dependencies(&self) -> &[PropertyId] {
        &self.dependencies
    }

    pub fn dependents(&self) -> &[PropertyId] {
        &self.dependents
    }

    /// Record a dependent. Returns `false` if it was already known.
    pub(crate) fn add_dependent(&mut self, id: PropertyId) -> bool {
        if self.dependents.contains(&id) {
            return false;
        }
        self.dependents.push(id);
        true
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("kind", &self.kind())
            .field("depth", &self.depth)
            .field("dependencies", &self.dependencies)
            .field("dependents", &self.dependents)
            .finish()
    }
}

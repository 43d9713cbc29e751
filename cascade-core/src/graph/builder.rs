//! Graph Builder
//!
//! Turns a [`DefinitionSet`] into an immutable, layered [`Graph`].
//!
//! # Algorithm
//!
//! Layering is an iterative fixed-point removal:
//!
//! 1. Every property starts with a working copy of its dependency list.
//! 2. A pass moves every property whose working list is empty into the
//!    current layer and assigns it the current depth.
//! 3. The names placed in this pass are struck from every remaining working
//!    list; each strike records a dependent edge.
//! 4. Depth increments and the next pass starts.
//!
//! A pass that places nothing while properties remain means the remaining
//! properties wait on each other: a cycle.

use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::debug;

use super::definition::DefinitionSet;
use super::node::{Node, PropertyId};
use crate::error::{CycleError, DeclarationError, Result};

/// The resolved dependency graph of a model class.
#[derive(Debug)]
pub struct Graph {
    nodes: Vec<Node>,
    index: IndexMap<String, PropertyId>,
    layers: Vec<Vec<PropertyId>>,
}

impl Graph {
    /// Validate the declarations and build the layered graph.
    pub fn build(definitions: &DefinitionSet) -> Result<Self> {
        definitions.validate()?;

        let index: IndexMap<String, PropertyId> = definitions
            .iter()
            .enumerate()
            .map(|(i, def)| (def.name.clone(), PropertyId::from_index(i)))
            .collect();

        let mut nodes = Vec::with_capacity(definitions.len());
        for (i, def) in definitions.iter().enumerate() {
            let dependencies = def
                .dependencies
                .iter()
                .map(|dep| {
                    index.get(dep.as_str()).copied().ok_or_else(|| {
                        DeclarationError::UnknownDependency {
                            property: def.name.clone(),
                            dependency: dep.clone(),
                        }
                    })
                })
                .collect::<Result<SmallVec<[PropertyId; 4]>, _>>()?;
            nodes.push(Node::new(PropertyId::from_index(i), def.clone(), dependencies));
        }

        let layers = assign_layers(&mut nodes)?;
        debug!(
            properties = nodes.len(),
            layers = layers.len(),
            "built dependency graph"
        );

        Ok(Self {
            nodes,
            index,
            layers,
        })
    }

    pub fn node(&self, id: PropertyId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.id_of(name).map(|id| self.node(id))
    }

    pub fn id_of(&self, name: &str) -> Option<PropertyId> {
        self.index.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in declaration order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Layers by ascending depth. Order inside a layer is unspecified.
    pub fn layers(&self) -> &[Vec<PropertyId>] {
        &self.layers
    }

    /// Every property, dependencies before dependents.
    pub fn evaluation_order(&self) -> impl Iterator<Item = PropertyId> + '_ {
        self.layers.iter().flatten().copied()
    }
}

fn assign_layers(nodes: &mut [Node]) -> Result<Vec<Vec<PropertyId>>, CycleError> {
    let mut working: Vec<(PropertyId, SmallVec<[PropertyId; 4]>)> = nodes
        .iter()
        .map(|node| (node.id(), node.dependencies().iter().copied().collect()))
        .collect();
    let mut placed = vec![false; nodes.len()];
    let mut layers = Vec::new();
    let mut depth = 0;

    while !working.is_empty() {
        let (ready, pending): (Vec<_>, Vec<_>) =
            working.into_iter().partition(|(_, deps)| deps.is_empty());

        if ready.is_empty() {
            let mut unresolved: Vec<String> = pending
                .iter()
                .map(|(id, _)| nodes[id.index()].name().to_owned())
                .collect();
            unresolved.sort();
            return Err(CycleError { unresolved });
        }

        let layer: Vec<PropertyId> = ready.into_iter().map(|(id, _)| id).collect();
        for &id in &layer {
            nodes[id.index()].set_depth(depth);
            placed[id.index()] = true;
        }

        working = pending;
        for (dependent, deps) in working.iter_mut() {
            deps.retain(|dep| {
                if placed[dep.index()] {
                    nodes[dep.index()].add_dependent(*dependent);
                    false
                } else {
                    true
                }
            });
        }

        debug!(depth, size = layer.len(), "placed layer");
        layers.push(layer);
        depth += 1;
    }

    Ok(layers)
}

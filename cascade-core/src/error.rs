//! Error Types
//!
//! Declaration problems are caught when a model class is built and are never
//! recovered from. Runtime problems (assigning a computed property, a failing
//! compute function) are surfaced to the caller of the mutating operation and
//! leave the value store consistent per property.

use thiserror::Error;

use crate::graph::PropertyKind;

/// A malformed property declaration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationError {
    #[error("property `{0}` declares both an initial value and a compute function")]
    InitialAndCompute(String),

    #[error("property `{0}` declares neither an initial value nor a compute function")]
    NoInitialOrCompute(String),

    #[error("property `{0}` declares a {1:?} body but is marked {2:?}")]
    KindMismatch(String, PropertyKind, PropertyKind),

    #[error("fundamental property `{0}` cannot declare dependencies")]
    FundamentalWithDependencies(String),

    #[error("property `{property}` depends on unknown property `{dependency}`")]
    UnknownDependency { property: String, dependency: String },

    #[error("property `{property}` overrides a {base:?} property as {declared:?}")]
    KindOverride {
        property: String,
        base: PropertyKind,
        declared: PropertyKind,
    },

    #[error("property `{0}` is declared more than once")]
    DuplicateProperty(String),
}

/// The dependency graph is not a DAG.
///
/// `unresolved` lists (sorted) every property still waiting on a dependency
/// after the last layer pass that made progress.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("dependency cycle among properties: {}", unresolved.join(", "))]
pub struct CycleError {
    pub unresolved: Vec<String>,
}

/// An operation that is not legal for the targeted property.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidOperation {
    #[error("cannot assign computed property `{0}`")]
    SetComputed(String),

    #[error("cannot assign read-only property `{0}`")]
    SetReadOnly(String),

    #[error("cannot invalidate fundamental property `{0}`; assign it instead")]
    InvalidateFundamental(String),
}

/// Failure raised by a compute function.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ComputeError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ComputeError {
    /// Create an error with a message only.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create an error wrapping an underlying cause.
    pub fn with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Top-level error for every fallible engine operation.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Declaration(#[from] DeclarationError),

    #[error(transparent)]
    Cycle(#[from] CycleError),

    #[error(transparent)]
    InvalidOperation(#[from] InvalidOperation),

    #[error("unknown property `{0}`")]
    UnknownProperty(String),

    #[error("computing `{property}` failed: {source}")]
    Compute {
        property: String,
        #[source]
        source: ComputeError,
    },

    #[error("propagation exceeded {limit} recomputations in one cycle")]
    PropagationLimit { limit: usize },

    #[error("invalid engine configuration: {0}")]
    Config(String),
}

/// Failure while encoding a [`Snapshot`](crate::Snapshot).
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("msgpack encoding failed: {0}")]
    MsgPack(#[from] rmp_serde::encode::Error),
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;

//! Value Store
//!
//! Per-instance cache of current property values, indexed by [`PropertyId`].
//! Reads never recompute anything.

use std::ops::Index;

use crate::graph::PropertyId;
use crate::value::Value;

#[derive(Debug, Clone, Default)]
pub struct ValueStore {
    values: Vec<Value>,
}

impl ValueStore {
    /// A store of `len` null slots.
    pub fn with_len(len: usize) -> Self {
        Self {
            values: vec![Value::Null; len],
        }
    }

    pub fn get(&self, id: PropertyId) -> Option<&Value> {
        self.values.get(id.index())
    }

    /// Write a value, returning the previous one.
    pub fn replace(&mut self, id: PropertyId, value: Value) -> Value {
        std::mem::replace(&mut self.values[id.index()], value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Index<PropertyId> for ValueStore {
    type Output = Value;

    fn index(&self, id: PropertyId) -> &Value {
        &self.values[id.index()]
    }
}

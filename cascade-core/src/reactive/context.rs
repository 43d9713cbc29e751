//! Compute Context
//!
//! The compute context is what a compute function sees: the current values
//! of its declared dependencies and a way to assign other fundamental
//! properties.
//!
//! # Nested Assignments
//!
//! A compute function runs while the model is in the middle of a drain, so
//! it cannot assign anything directly. [`ComputeContext::set`] records the
//! assignment instead; the model applies it right after the compute
//! function returns, inside the same drain loop, and any dependents it
//! enqueues are processed in depth order with everything else.

use std::cell::RefCell;

use chrono::NaiveDateTime;

use crate::error::ComputeError;
use crate::value::Value;

static NULL: Value = Value::Null;

/// Inputs and side channel handed to a compute function.
pub struct ComputeContext<'a> {
    property: &'a str,
    inputs: &'a [&'a Value],
    deferred: RefCell<Vec<(String, Value)>>,
}

impl<'a> ComputeContext<'a> {
    pub(crate) fn new(property: &'a str, inputs: &'a [&'a Value]) -> Self {
        Self {
            property,
            inputs,
            deferred: RefCell::new(Vec::new()),
        }
    }

    /// Name of the property being computed.
    pub fn property(&self) -> &str {
        self.property
    }

    /// Dependency values in declaration order.
    pub fn inputs(&self) -> &[&'a Value] {
        self.inputs
    }

    /// Value of the `index`-th declared dependency, `Null` when out of range.
    pub fn input(&self, index: usize) -> &Value {
        self.inputs.get(index).copied().unwrap_or(&NULL)
    }

    pub fn int(&self, index: usize) -> Result<i64, ComputeError> {
        self.input(index).as_int().ok_or_else(|| self.mismatch(index, "int"))
    }

    pub fn float(&self, index: usize) -> Result<f64, ComputeError> {
        self.input(index)
            .as_float()
            .ok_or_else(|| self.mismatch(index, "number"))
    }

    pub fn str(&self, index: usize) -> Result<&str, ComputeError> {
        self.input(index).as_str().ok_or_else(|| self.mismatch(index, "string"))
    }

    pub fn date(&self, index: usize) -> Result<NaiveDateTime, ComputeError> {
        self.input(index).as_date().ok_or_else(|| self.mismatch(index, "date"))
    }

    /// Assign a fundamental property once this computation returns.
    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.deferred.borrow_mut().push((name.into(), value.into()));
    }

    pub(crate) fn into_deferred(self) -> Vec<(String, Value)> {
        self.deferred.into_inner()
    }

    fn mismatch(&self, index: usize, expected: &str) -> ComputeError {
        ComputeError::new(format!(
            "`{}` expected input {index} to be {expected}, found {}",
            self.property,
            self.input(index).type_name()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposes_inputs_in_order() {
        let a = Value::Int(2);
        let b = Value::from("x");
        let inputs = [&a, &b];
        let ctx = ComputeContext::new("p", &inputs);

        assert_eq!(ctx.property(), "p");
        assert_eq!(ctx.int(0).unwrap(), 2);
        assert_eq!(ctx.str(1).unwrap(), "x");
        assert!(ctx.input(5).is_null());
    }

    #[test]
    fn type_mismatch_names_the_property() {
        let a = Value::from("not a date");
        let inputs = [&a];
        let ctx = ComputeContext::new("end", &inputs);

        let err = ctx.date(0).unwrap_err();
        assert_eq!(
            err.message(),
            "`end` expected input 0 to be date, found string"
        );
    }

    #[test]
    fn records_deferred_assignments() {
        let ctx = ComputeContext::new("p", &[]);
        ctx.set("a", 1);
        ctx.set("b", "two");

        let deferred = ctx.into_deferred();
        assert_eq!(deferred.len(), 2);
        assert_eq!(deferred[0], ("a".to_string(), Value::Int(1)));
    }
}

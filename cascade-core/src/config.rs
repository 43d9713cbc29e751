//! Engine Configuration
//!
//! Per-class tuning knobs, deserialized from JSON. Every field has a
//! default so partial documents are accepted.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Configuration attached to a model class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Upper bound on recomputations within one propagation cycle.
    ///
    /// Only nested assignments from compute functions can push a cycle past
    /// the number of computed properties; the bound turns runaway feedback
    /// into an error instead of a hang.
    pub max_recomputes_per_cycle: usize,

    /// Notify subscribers about values committed before a compute failure.
    pub notify_on_error: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_recomputes_per_cycle: 100_000,
            notify_on_error: true,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_recomputes_per_cycle == 0 {
            return Err(EngineError::Config(
                "max_recomputes_per_cycle must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_document_keeps_defaults() {
        let config = EngineConfig::from_json(r#"{ "notify_on_error": false }"#).unwrap();
        assert!(!config.notify_on_error);
        assert_eq!(config.max_recomputes_per_cycle, 100_000);
    }

    #[test]
    fn rejects_zero_limit() {
        let err = EngineConfig::from_json(r#"{ "max_recomputes_per_cycle": 0 }"#).unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(EngineConfig::from_json(r#"{ "lazy": true }"#).is_err());
    }
}

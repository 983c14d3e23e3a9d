//! Collapser configuration.

use serde::{Deserialize, Serialize};

use crate::Result;

/// Tunables for a `Collapser`.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```rust
/// use depgraph_collapse::CollapserConfig;
///
/// let config = CollapserConfig::from_json(r#"{ "tree_collapse_additive": true }"#).unwrap();
/// assert!(config.tree_collapse_additive);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollapserConfig {
    /// `additive` flag used for every group `collapse_tree()` creates.
    /// When false, a hierarchy node that already leads a group absorbs its
    /// children into that group instead of wrapping it.
    pub tree_collapse_additive: bool,
}

impl CollapserConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        assert_eq!(CollapserConfig::from_json("{}").unwrap(), CollapserConfig::default());
    }

    #[test]
    fn test_malformed_document() {
        let err = CollapserConfig::from_json("{ tree_collapse_additive: yes }").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = CollapserConfig { tree_collapse_additive: true };
        let json = config.to_json().unwrap();
        assert_eq!(CollapserConfig::from_json(&json).unwrap(), config);
    }
}

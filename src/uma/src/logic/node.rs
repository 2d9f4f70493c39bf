//! Parsed scope expression nodes

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::engine;
use super::error::{LogicError, Result};
use crate::types::ScopeId;

/// Scope expression: a JsonLogic rule plus the scope ids it combines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicNode {
    /// JsonLogic rule tree
    pub rule: Value,

    /// Scope ids, in the order their decisions are passed to the rule
    #[serde(default)]
    pub data: Vec<ScopeId>,
}

impl LogicNode {
    /// Parse a scope expression
    ///
    /// # Errors
    ///
    /// Returns error if the text is not a `{rule, data}` object or the rule
    /// is not a JSON object
    pub fn parse(expression: &str) -> Result<Self> {
        let node: LogicNode = serde_json::from_str(expression)
            .map_err(|e| LogicError::ParseError(e.to_string()))?;

        if !node.rule.is_object() {
            return Err(LogicError::MissingRule);
        }

        Ok(node)
    }

    /// Whether `expression` parses and its rule can run
    ///
    /// The rule is dry-run with every scope decision set to `true`, which
    /// catches unknown operators and malformed arguments.
    pub fn is_valid(expression: &str) -> bool {
        match Self::parse(expression) {
            Ok(node) => {
                let decisions = vec![true; node.data.len()];
                engine::apply(&node.rule, &decisions).is_ok()
            }
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_node() {
        let node = LogicNode::parse(
            r#"{"rule": {"and": [{"var": 0}, {"var": 1}]}, "data": ["read", "write"]}"#,
        )
        .unwrap();
        assert_eq!(node.data, vec!["read", "write"]);
        assert_eq!(node.rule, json!({"and": [{"var": 0}, {"var": 1}]}));
    }

    #[test]
    fn test_parse_without_data() {
        let node = LogicNode::parse(r#"{"rule": {"==": [1, 1]}}"#).unwrap();
        assert!(node.data.is_empty());
    }

    #[test]
    fn test_parse_failures() {
        assert!(matches!(
            LogicNode::parse("not json"),
            Err(LogicError::ParseError(_))
        ));
        assert!(matches!(
            LogicNode::parse(r#"{"data": ["read"]}"#),
            Err(LogicError::ParseError(_))
        ));
        assert!(matches!(
            LogicNode::parse(r#"{"rule": true, "data": []}"#),
            Err(LogicError::MissingRule)
        ));
    }

    #[test]
    fn test_is_valid() {
        assert!(LogicNode::is_valid(
            r#"{"rule": {"or": [{"var": 0}, {"var": 1}]}, "data": ["a", "b"]}"#
        ));
        assert!(!LogicNode::is_valid(r#"{"rule": {"or": "#));
        assert!(!LogicNode::is_valid(r#"{"rule": [], "data": ["a"]}"#));
    }
}

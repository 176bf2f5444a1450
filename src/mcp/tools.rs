//! MCP tool definitions.

use crate::error::ToolError;
use crate::math;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Trait for tools callable through `tools/call`.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool name.
    fn name(&self) -> &'static str;

    /// Get the definition advertised by `tools/list`.
    fn definition(&self) -> ToolDefinition;

    /// Run the tool and return its text output.
    async fn call(&self, arguments: Value) -> Result<String, ToolError>;
}

/// Tools registered with a server, in registration order.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Registry holding the built-in tools.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(AddTool));
        registry
    }

    /// Register a tool, replacing any tool with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.retain(|t| t.name() != tool.name());
        self.tools.push(tool);
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    /// Get all available MCP tools.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// The `add` tool.
pub struct AddTool;

#[derive(Debug, Deserialize)]
struct AddArguments {
    a: Value,
    b: Value,
}

impl AddTool {
    /// Lax integer coercion: integral floats and decimal strings are accepted.
    fn integer_arg(name: &str, value: &Value) -> Result<i64, ToolError> {
        let coerced = match value {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64().and_then(|f| {
                    let integral = f.is_finite() && f.fract() == 0.0;
                    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
                    (integral && in_range).then_some(f as i64)
                })
            }),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };

        coerced.ok_or_else(|| ToolError::InvalidArguments {
            tool: "add".to_string(),
            message: format!("argument '{}' must be an integer, got {}", name, value),
        })
    }
}

#[async_trait]
impl Tool for AddTool {
    fn name(&self) -> &'static str {
        "add"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "add".to_string(),
            description: "Add two numbers together".to_string(),
            input_schema: json!({
                "type": "object",
                "title": "addArguments",
                "properties": {
                    "a": { "title": "A", "type": "integer" },
                    "b": { "title": "B", "type": "integer" }
                },
                "required": ["a", "b"]
            }),
        }
    }

    async fn call(&self, arguments: Value) -> Result<String, ToolError> {
        let args: AddArguments =
            serde_json::from_value(arguments).map_err(|e| ToolError::InvalidArguments {
                tool: "add".to_string(),
                message: e.to_string(),
            })?;

        let a = Self::integer_arg("a", &args.a)?;
        let b = Self::integer_arg("b", &args.b)?;

        let sum = math::checked_add(a, b).ok_or(ToolError::Overflow { a, b })?;
        Ok(sum.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_definition() {
        let def = AddTool.definition();
        assert_eq!(def.name, "add");
        assert_eq!(def.description, "Add two numbers together");
        assert_eq!(def.input_schema["required"], json!(["a", "b"]));
        assert_eq!(def.input_schema["properties"]["a"]["type"], "integer");

        let serialized = serde_json::to_value(&def).unwrap();
        assert!(serialized.get("inputSchema").is_some());
        assert!(serialized.get("input_schema").is_none());
    }

    #[tokio::test]
    async fn test_add_call() {
        assert_eq!(AddTool.call(json!({"a": 2, "b": 3})).await.unwrap(), "5");
        assert_eq!(AddTool.call(json!({"a": -1, "b": -4})).await.unwrap(), "-5");
        assert_eq!(AddTool.call(json!({"a": 0, "b": 5})).await.unwrap(), "5");
    }

    #[tokio::test]
    async fn test_add_missing_argument() {
        let err = AddTool.call(json!({"a": 2})).await.unwrap_err();
        match err {
            ToolError::InvalidArguments { tool, message } => {
                assert_eq!(tool, "add");
                assert!(message.contains('b'), "{}", message);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_add_coerces_integral_values() {
        assert_eq!(AddTool.call(json!({"a": "2", "b": 3})).await.unwrap(), "5");
        assert_eq!(AddTool.call(json!({"a": 2.0, "b": 3})).await.unwrap(), "5");
        assert_eq!(AddTool.call(json!({"a": " -7 ", "b": -3.0})).await.unwrap(), "-10");
    }

    #[tokio::test]
    async fn test_add_rejects_non_integers() {
        for args in [
            json!({"a": "two", "b": 3}),
            json!({"a": "2.5", "b": 3}),
            json!({"a": 2.5, "b": 3}),
            json!({"a": true, "b": 3}),
            json!({"a": [2], "b": 3}),
            json!({"a": 1e300, "b": 0}),
            json!({"a": 2, "b": null}),
            json!({"a": 18446744073709551615u64, "b": 0}),
        ] {
            let err = AddTool.call(args.clone()).await.unwrap_err();
            assert!(
                matches!(err, ToolError::InvalidArguments { .. }),
                "{} -> {:?}",
                args,
                err
            );
        }
    }

    #[tokio::test]
    async fn test_add_overflow() {
        let err = AddTool
            .call(json!({"a": i64::MAX, "b": 1}))
            .await
            .unwrap_err();
        assert_eq!(err, ToolError::Overflow { a: i64::MAX, b: 1 });
    }

    #[test]
    fn test_registry() {
        let registry = ToolRegistry::with_defaults();
        assert_eq!(registry.len(), 1);
        assert!(registry.get("add").is_some());
        assert!(registry.get("subtract").is_none());

        let mut registry = registry;
        registry.register(Box::new(AddTool));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.definitions()[0].name, "add");

        assert!(ToolRegistry::new().is_empty());
    }
}

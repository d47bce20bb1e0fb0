use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

use crate::JokeError;

/// Boxed future returned by [`Tool::execute`]
pub type ToolFuture<'a> = Pin<Box<dyn Future<Output = Result<String, JokeError>> + Send + 'a>>;

/// Parameters every joke tool accepts
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct JokeParams {
    /// The category of jokes to generate
    pub category: String,
}

impl JokeParams {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
        }
    }

    /// Parse tool-call arguments
    pub fn from_value(parameters: serde_json::Value) -> Result<Self, JokeError> {
        serde_json::from_value(parameters)
            .map_err(|e| JokeError::ToolExecution(format!("Invalid parameters: {}", e)))
    }
}

/// A joke-producing tool
pub trait Tool: Send + Sync + std::fmt::Debug {
    /// The name of the tool (used in logs and tool definitions)
    fn name(&self) -> &'static str;

    /// A description of what the tool does
    fn description(&self) -> &'static str;

    /// JSON Schema for the tool's parameters
    fn parameters_schema(&self) -> serde_json::Value {
        let schema = schemars::schema_for!(JokeParams);
        serde_json::to_value(&schema.schema).unwrap_or_else(|_| {
            serde_json::json!({
                "type": "object",
                "properties": {"category": {"type": "string"}},
                "required": ["category"]
            })
        })
    }

    /// Execute the tool with given parameters
    fn execute(&self, parameters: serde_json::Value) -> ToolFuture<'_>;

    /// Tool definition in OpenAI function-calling format
    fn definition(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name(),
                "description": self.description(),
                "parameters": self.parameters_schema()
            }
        })
    }
}

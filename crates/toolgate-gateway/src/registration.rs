//! Registration surface handed to the outer transport.
//!
//! [`ToolGateway::registrations`] yields exactly three operations. Each
//! carries a JSON schema for its parameters and a handler that takes the
//! parameter object the transport received.

use crate::gateway::ToolGateway;
use crate::response::GatewayResponse;
use serde_json::{json, Value};
use std::sync::Arc;
use toolgate_core::{Arguments, ExecutionContext, ToolAnnotations};

/// Operation suffix for discovery.
pub const DISCOVER: &str = "discover";
/// Operation suffix for describing one tool.
pub const DESCRIBE: &str = "describe";
/// Operation suffix for executing one tool.
pub const EXECUTE: &str = "execute";

/// Callable bound to one gateway operation.
pub type OperationHandler =
    Arc<dyn Fn(&Arguments, Option<ExecutionContext>) -> GatewayResponse + Send + Sync>;

/// One externally registrable operation.
#[derive(Clone)]
pub struct GatewayOperation {
    /// Registered name, including the gateway prefix.
    pub name: String,
    /// Human-readable description for the agent.
    pub description: String,
    /// JSON schema of the parameter object.
    pub input_schema: Value,
    /// Behavioural hints.
    pub annotations: ToolAnnotations,
    handler: OperationHandler,
}

impl GatewayOperation {
    /// Run the operation with the parameter object the transport received.
    pub fn call(&self, params: &Arguments, context: Option<ExecutionContext>) -> GatewayResponse {
        (self.handler)(params, context)
    }
}

impl std::fmt::Debug for GatewayOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayOperation")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

fn required_string<'a>(params: &'a Arguments, key: &str) -> Result<&'a str, GatewayResponse> {
    params
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| GatewayResponse::failure(format!("Missing required parameter: {key}")))
}

impl ToolGateway {
    /// The three operations to register with the transport, in the order
    /// discover, describe, execute.
    pub fn registrations(&self) -> Vec<GatewayOperation> {
        let discover = self.clone();
        let describe = self.clone();
        let execute = self.clone();

        vec![
            GatewayOperation {
                name: format!("{}{DISCOVER}", self.prefix()),
                description: "Search the available tools by name, label, or description. \
                              Omit the query to list every tool."
                    .to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "query": {
                            "type": "string",
                            "description": "Case-insensitive substring to search for"
                        }
                    }
                }),
                annotations: ToolAnnotations {
                    read_only: Some(true),
                    destructive: Some(false),
                    idempotent: Some(true),
                    open_world: Some(false),
                },
                handler: Arc::new(move |params: &Arguments, _ctx: Option<ExecutionContext>| {
                    discover.discover(params.get("query").and_then(Value::as_str))
                }),
            },
            GatewayOperation {
                name: format!("{}{DESCRIBE}", self.prefix()),
                description: "Show the full input schema and hints of one tool.".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "tool_name": {
                            "type": "string",
                            "description": "Name returned by discovery"
                        }
                    },
                    "required": ["tool_name"]
                }),
                annotations: ToolAnnotations {
                    read_only: Some(true),
                    destructive: Some(false),
                    idempotent: Some(true),
                    open_world: Some(false),
                },
                handler: Arc::new(move |params: &Arguments, _ctx: Option<ExecutionContext>| {
                    match required_string(params, "tool_name") {
                        Ok(name) => describe.describe(name),
                        Err(response) => response,
                    }
                }),
            },
            GatewayOperation {
                name: format!("{}{EXECUTE}", self.prefix()),
                description: "Run one tool with the given arguments.".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "tool_name": {
                            "type": "string",
                            "description": "Name returned by discovery"
                        },
                        "arguments": {
                            "type": "object",
                            "description": "Arguments matching the tool's input schema"
                        }
                    },
                    "required": ["tool_name"]
                }),
                annotations: ToolAnnotations {
                    read_only: Some(false),
                    destructive: None,
                    idempotent: None,
                    open_world: Some(true),
                },
                handler: Arc::new(move |params: &Arguments, ctx: Option<ExecutionContext>| {
                    let name = match required_string(params, "tool_name") {
                        Ok(name) => name,
                        Err(response) => return response,
                    };
                    match params.get("arguments") {
                        None | Some(Value::Null) => execute.invoke(name, &Arguments::new(), ctx),
                        Some(Value::Object(args)) => execute.invoke(name, args, ctx),
                        Some(_) => {
                            GatewayResponse::failure("Parameter 'arguments' must be an object")
                        }
                    }
                }),
            },
        ]
    }
}

// ============================================================================
// Tests
// ============================================================================

//! The gateway façade: discover, describe, execute.

use crate::response::GatewayResponse;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use toolgate_core::{Arguments, ExecutionContext, ToolDescriptor};
use toolgate_provider::ToolProvider;

/// Fronts a provider (usually a middleware pipeline) with three stable
/// operations.
///
/// No operation ever returns a raised failure: every error is rendered into
/// a [`GatewayResponse`] with `success: false`.
#[derive(Clone)]
pub struct ToolGateway {
    provider: Arc<dyn ToolProvider>,
    prefix: String,
    assign_request_ids: bool,
}

impl ToolGateway {
    /// Front `provider` with no operation prefix.
    pub fn new(provider: Arc<dyn ToolProvider>) -> Self {
        Self {
            provider,
            prefix: String::new(),
            assign_request_ids: true,
        }
    }

    /// Prefix for the three registered operation names.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// When on, `invoke` without a context generates a uuid request id.
    pub fn assign_request_ids(mut self, enabled: bool) -> Self {
        self.assign_request_ids = enabled;
        self
    }

    /// The configured operation prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The fronted provider.
    pub fn provider(&self) -> &Arc<dyn ToolProvider> {
        &self.provider
    }

    /// List tools whose name, label, or description contains `query`,
    /// case-insensitively. An absent or blank query lists everything.
    pub fn discover(&self, query: Option<&str>) -> GatewayResponse {
        let tools = match self.provider.list_tools() {
            Ok(tools) => tools,
            Err(err) => {
                tracing::warn!(error = %err, "Tool discovery failed");
                return GatewayResponse::failure(format!("Tool discovery failed: {err}"));
            }
        };

        let needle = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);
        let summaries: Vec<Value> = tools
            .values()
            .filter(|tool| needle.as_deref().is_none_or(|q| tool.matches_query(q)))
            .map(summary)
            .collect();

        let mut content = Map::new();
        content.insert("count".into(), json!(summaries.len()));
        content.insert("tools".into(), Value::Array(summaries));
        GatewayResponse::ok(content)
    }

    /// Full detail for one tool.
    pub fn describe(&self, name: &str) -> GatewayResponse {
        match self.provider.get_tool(name) {
            Ok(Some(tool)) => GatewayResponse::ok(detail(&tool)),
            Ok(None) => GatewayResponse::unknown_tool(name),
            Err(err) if err.is_not_found() => GatewayResponse::unknown_tool(name),
            Err(err) => {
                tracing::warn!(tool = %name, error = %err, "Tool lookup failed");
                GatewayResponse::failure(format!("Tool lookup failed: {err}"))
            }
        }
    }

    /// Execute a tool and render its outcome.
    pub fn invoke(
        &self,
        name: &str,
        args: &Arguments,
        context: Option<ExecutionContext>,
    ) -> GatewayResponse {
        let context = context.unwrap_or_else(|| {
            if self.assign_request_ids {
                ExecutionContext::for_request()
            } else {
                ExecutionContext::new()
            }
        });

        match self.provider.execute(name, args, &context) {
            Ok(result) => GatewayResponse::from_result(&result),
            Err(err) => {
                tracing::debug!(
                    tool = %name,
                    request_id = %context.request_id_or_unknown(),
                    kind = err.kind(),
                    "Rendering execution failure"
                );
                GatewayResponse::from_error(name, &err)
            }
        }
    }
}

impl std::fmt::Debug for ToolGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolGateway")
            .field("provider", &self.provider.name())
            .field("prefix", &self.prefix)
            .field("assign_request_ids", &self.assign_request_ids)
            .finish()
    }
}

fn summary(tool: &ToolDescriptor) -> Value {
    json!({
        "name": tool.name(),
        "label": tool.label(),
        "description": tool.description(),
        "provider": tool.source_provider(),
        "hints": Value::Object(tool.annotations().known_hints()),
    })
}

fn detail(tool: &ToolDescriptor) -> Map<String, Value> {
    let mut out = Map::new();
    out.insert("name".into(), json!(tool.name()));
    out.insert("label".into(), json!(tool.label()));
    out.insert("description".into(), json!(tool.description()));
    out.insert("provider".into(), json!(tool.source_provider()));
    out.insert("input_schema".into(), tool.input_schema().clone());
    out.insert("annotations".into(), json!(tool.annotations()));
    out.insert("metadata".into(), Value::Object(tool.metadata().clone()));
    out
}

// ============================================================================
// Tests
// ============================================================================

//! Name-keyed tool registry.

use std::collections::HashMap;
use std::sync::Arc;

use confbot_program::Catalog;
use tracing::{debug, warn};

use super::{GetExperts, GetSessionsByExpert, ToolHandler, ToolInvocationError, ToolResult};
use crate::{ToolCall, ToolDefinition};

/// Executes tool calls against the catalog.
///
/// Immutable once built, so it can be shared across sessions without
/// locking.
pub struct ToolDispatcher {
    catalog: Arc<Catalog>,
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
    definitions: Vec<ToolDefinition>,
}

impl ToolDispatcher {
    /// An empty registry.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            handlers: HashMap::new(),
            definitions: Vec::new(),
        }
    }

    /// The registry with `getExperts` and `getSessionsByExpert`.
    pub fn with_conference_tools(catalog: Arc<Catalog>) -> Self {
        Self::new(catalog)
            .with_handler(GetExperts)
            .with_handler(GetSessionsByExpert)
    }

    pub fn with_handler(mut self, handler: impl ToolHandler + 'static) -> Self {
        self.register(Arc::new(handler));
        self
    }

    /// Register a handler, replacing any handler of the same name.
    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) {
        let definition = handler.definition();
        self.definitions.retain(|d| d.name != definition.name);
        self.handlers.insert(definition.name.clone(), handler);
        self.definitions.push(definition);
    }

    /// Definitions in registration order.
    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Execute a call. Always yields a JSON payload, errors included.
    pub fn execute(&self, call: &ToolCall) -> ToolResult {
        debug!(tool = %call.name, id = %call.id, "Executing tool");

        let outcome = match self.handlers.get(&call.name) {
            Some(handler) => handler.call(&call.arguments, &self.catalog),
            None => Err(ToolInvocationError::UnknownFunction),
        };

        let payload = outcome.unwrap_or_else(|e| {
            warn!(tool = %call.name, error = %e, "Tool call failed");
            e.to_payload()
        });

        ToolResult {
            tool_call_id: call.id.clone(),
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    struct Echo;

    impl ToolHandler for Echo {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition {
                name: "echo".into(),
                description: "Echo the arguments".into(),
                parameters: json!({"type": "object", "properties": {}}),
            }
        }

        fn call(&self, arguments: &str, _catalog: &Catalog) -> Result<Value, ToolInvocationError> {
            serde_json::from_str(arguments).map_err(|_| ToolInvocationError::InvalidArguments)
        }
    }

    fn call(name: &str, arguments: &str) -> ToolCall {
        ToolCall {
            id: "call_0".into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    #[test]
    fn conference_tools_are_registered_in_order() {
        let dispatcher = ToolDispatcher::with_conference_tools(Arc::default());
        let names: Vec<_> = dispatcher.definitions().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["getExperts", "getSessionsByExpert"]);
    }

    #[test]
    fn unknown_name_yields_error_payload() {
        let dispatcher = ToolDispatcher::with_conference_tools(Arc::default());
        let result = dispatcher.execute(&call("getWeather", "{}"));
        assert_eq!(result.tool_call_id, "call_0");
        assert_eq!(result.payload, json!({"error": "Unknown function name"}));
    }

    #[test]
    fn custom_handlers_can_be_registered() {
        let dispatcher = ToolDispatcher::new(Arc::default()).with_handler(Echo);
        let result = dispatcher.execute(&call("echo", r#"{"a":1}"#));
        assert_eq!(result.payload, json!({"a": 1}));

        let result = dispatcher.execute(&call("echo", "{"));
        assert_eq!(result.payload, json!({"error": "Invalid arguments"}));
    }

    #[test]
    fn re_registering_replaces_definition() {
        let mut dispatcher = ToolDispatcher::new(Arc::default()).with_handler(Echo);
        dispatcher.register(Arc::new(Echo));
        assert_eq!(dispatcher.definitions().len(), 1);
    }
}

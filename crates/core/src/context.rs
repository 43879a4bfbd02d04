//! Diagnostic context attached to handled failures

use serde::{Deserialize, Serialize};

/// Where a failure happened; used for logging only
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
}

impl ErrorContext {
    pub fn operation(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            component: None,
        }
    }

    #[must_use]
    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }
}

/// Extra diagnostics reported by the render-failure channel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderInfo {
    /// Trace of the component tree, or the panic location
    pub component_stack: Option<String>,
}

impl RenderInfo {
    pub fn new(component_stack: impl Into<String>) -> Self {
        Self {
            component_stack: Some(component_stack.into()),
        }
    }
}

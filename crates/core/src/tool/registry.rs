use std::collections::HashMap;
use std::sync::Arc;

use pitwall_model::ModelTool;

use crate::tool::{AnyTool, Tool, ToolObject};

/// A mapping from tool name to its type-erased implementation.
///
/// The registry is built once at process start, then shared read-only
/// (behind an [`Arc`]) by every loop instance. Dispatch is a plain
/// lookup, which keeps the toolset inspectable and statically
/// enumerable.
#[derive(Default)]
pub struct Registry {
    tools: HashMap<String, Arc<dyn ToolObject>>,
}

impl Registry {
    /// Creates an empty registry.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool.
    ///
    /// # Panics
    ///
    /// Panics if the tool name contains `[`, which would collide with
    /// the wire protocol's marker tokens.
    pub fn add_tool<T: Tool>(&mut self, tool: T) {
        let name = tool.name().to_owned();
        assert!(
            !name.contains('['),
            "tool name {name:?} would collide with stream markers"
        );
        self.tools.insert(name, Arc::new(AnyTool(tool)));
    }

    /// Returns the definitions of every registered tool, for handing to
    /// the model.
    pub fn definitions(&self) -> Vec<ModelTool> {
        self.tools
            .values()
            .map(|tool| ModelTool {
                name: tool.name().to_owned(),
                description: tool.description().to_owned(),
                parameters: tool.parameter_schema().clone(),
            })
            .collect()
    }

    /// Returns the number of registered tools.
    #[inline]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns `true` if no tools are registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    #[inline]
    pub(crate) fn get(&self, name: &str) -> Option<&Arc<dyn ToolObject>> {
        self.tools.get(name)
    }
}

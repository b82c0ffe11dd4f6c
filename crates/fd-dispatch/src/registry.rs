use crate::error::RegistryError;
use crate::tool::ToolDescriptor;
use std::collections::{HashMap, HashSet};

/// Registry of all available tools, in registration order.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolDescriptor>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool. A second tool under an existing name replaces the first
    /// in its original position.
    pub fn register(&mut self, descriptor: ToolDescriptor) -> Result<(), RegistryError> {
        let name = descriptor.name().to_string();
        if name.trim().is_empty() {
            return Err(RegistryError::EmptyName);
        }

        let mut seen = HashSet::new();
        for param in descriptor.parameters() {
            if !seen.insert(param.name.as_str()) {
                return Err(RegistryError::DuplicateParameter {
                    tool: name,
                    param: param.name.clone(),
                });
            }
        }

        match self.index.get(&name) {
            Some(&pos) => {
                tracing::warn!("Tool '{name}' registered twice; keeping the later definition");
                self.tools[pos] = descriptor;
            }
            None => {
                tracing::debug!("Registered tool '{name}'");
                self.index.insert(name, self.tools.len());
                self.tools.push(descriptor);
            }
        }
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&ToolDescriptor> {
        self.index.get(name).map(|&pos| &self.tools[pos])
    }

    pub fn list_all(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(ToolDescriptor::name).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::{handler_fn, DeclaredType, ParamSpec, ToolOutput};

    fn tool(name: &str, reply: &'static str) -> ToolDescriptor {
        ToolDescriptor::new(name, handler_fn(move |_| async move { Ok(ToolOutput::from(reply)) }))
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut registry = ToolRegistry::new();
        for name in ["zeta", "alpha", "mid"] {
            registry.register(tool(name, "x")).unwrap();
        }
        assert_eq!(registry.names(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_lookup_absent() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.lookup("nope").is_none());
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut registry = ToolRegistry::new();
        assert!(matches!(registry.register(tool("", "x")), Err(RegistryError::EmptyName)));
        assert!(matches!(registry.register(tool("  ", "x")), Err(RegistryError::EmptyName)));
    }

    #[test]
    fn test_duplicate_parameter_rejected() {
        let mut registry = ToolRegistry::new();
        let descriptor = tool("dup", "x")
            .with_param(ParamSpec::required("id", DeclaredType::Int))
            .with_param(ParamSpec::optional("id", DeclaredType::Str));
        let err = registry.register(descriptor).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateParameter { ref param, .. } if param == "id"));
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_name_replaces_in_place() {
        let mut registry = ToolRegistry::new();
        registry.register(tool("a", "first")).unwrap();
        registry.register(tool("b", "other")).unwrap();
        registry.register(tool("a", "second")).unwrap();

        assert_eq!(registry.names(), vec!["a", "b"]);
        let handler = registry.lookup("a").unwrap().handler();
        let output = handler.call(Default::default()).await.unwrap();
        assert_eq!(output, ToolOutput::Text("second".into()));
    }
}

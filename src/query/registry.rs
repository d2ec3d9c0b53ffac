//! Named path registry

use crate::error::{Error, Result};
use crate::query::ast::{is_reserved, PathDefinition};
use indexmap::IndexMap;
use tracing::{debug, warn};

/// Paths defined by `path <name> … end`, keyed by name in definition order.
#[derive(Debug, Clone, Default)]
pub struct PathRegistry {
    paths: IndexMap<String, PathDefinition>,
}

impl PathRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a path. Built-in navigation names are rejected; redefining an
    /// existing name replaces it.
    pub fn define(&mut self, definition: PathDefinition) -> Result<()> {
        if is_reserved(&definition.name) {
            return Err(Error::ReservedName(definition.name));
        }

        debug!(
            path = %definition.name,
            line = definition.line,
            statements = definition.body.len(),
            "registering path"
        );
        if let Some(previous) = self.paths.get(&definition.name) {
            warn!(
                path = %definition.name,
                previous_line = previous.line,
                line = definition.line,
                "path redefined, keeping the later definition"
            );
        }
        self.paths.insert(definition.name.clone(), definition);
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Option<&PathDefinition> {
        self.paths.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.paths.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.paths.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::parser::PathParser;

    fn definition(name: &str, line: usize, body: &[&str]) -> PathDefinition {
        PathDefinition {
            name: name.to_string(),
            line,
            body: body
                .iter()
                .enumerate()
                .map(|(i, text)| PathParser::new(text).parse_statement(line + i + 1).unwrap())
                .collect(),
        }
    }

    #[test]
    fn test_reserved_names_rejected() {
        let mut registry = PathRegistry::new();
        for name in ["outE", "inE", "outV", "inV", "bothV", "both"] {
            let err = registry.define(definition(name, 1, &[])).unwrap_err();
            assert!(matches!(err, Error::ReservedName(n) if n == name));
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_define_and_resolve() {
        let mut registry = PathRegistry::new();
        registry
            .define(definition("knows", 1, &["./outE[@label='knows']"]))
            .unwrap();
        registry.define(definition("created", 4, &["./outE"])).unwrap();

        assert!(registry.contains("knows"));
        assert_eq!(registry.resolve("knows").unwrap().body.len(), 1);
        assert!(registry.resolve("likes").is_none());
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["knows", "created"]);
    }

    #[test]
    fn test_redefinition_last_write_wins() {
        let mut registry = PathRegistry::new();
        registry.define(definition("knows", 1, &["./outE"])).unwrap();
        registry
            .define(definition("knows", 4, &["./outE", "./inV"]))
            .unwrap();

        assert_eq!(registry.len(), 1);
        let knows = registry.resolve("knows").unwrap();
        assert_eq!(knows.line, 4);
        assert_eq!(knows.body.len(), 2);
    }
}

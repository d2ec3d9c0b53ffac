//! Variable environment
//!
//! One flat map from variable name to element sequence per script run. Names
//! are stored without the leading `$`; `set("$x", …)` and `set("x", …)` are
//! the same variable.

use crate::error::{Error, Result};
use crate::graph::Element;
use crate::query::ast::CONTEXT;
use indexmap::IndexMap;

fn normalize(name: &str) -> &str {
    name.strip_prefix('$').unwrap_or(name)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    vars: IndexMap<String, Vec<Element>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `$_`.
    pub fn with_context(mut self, elements: Vec<Element>) -> Self {
        self.set(CONTEXT, elements);
        self
    }

    /// Seed an arbitrary variable.
    pub fn with_variable(mut self, name: &str, elements: Vec<Element>) -> Self {
        self.set(name, elements);
        self
    }

    pub fn get(&self, name: &str) -> Result<&[Element]> {
        let name = normalize(name);
        self.vars
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::UnboundVariable(name.to_string()))
    }

    /// Value of `$_`.
    pub fn context(&self) -> Result<&[Element]> {
        self.get(CONTEXT)
    }

    pub fn set(&mut self, name: &str, elements: Vec<Element>) {
        self.vars.insert(normalize(name).to_string(), elements);
    }

    /// Remove a variable and return its value.
    pub fn take(&mut self, name: &str) -> Option<Vec<Element>> {
        self.vars.shift_remove(normalize(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(normalize(name))
    }

    /// Variables in first-assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Element])> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// Read view used while an expression evaluates.
///
/// At script level only the script environment is visible. Inside a path
/// invocation the path's private frame is searched first, then the script
/// environment.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    local: &'a Environment,
    script: Option<&'a Environment>,
}

impl<'a> Scope<'a> {
    /// Script-level scope.
    pub fn root(env: &'a Environment) -> Self {
        Self {
            local: env,
            script: None,
        }
    }

    /// Scope of a path invocation frame.
    pub fn frame(local: &'a Environment, script: Option<&'a Environment>) -> Self {
        Self { local, script }
    }

    pub fn lookup(&self, name: &str) -> Result<&'a [Element]> {
        match self.local.get(name) {
            Ok(elements) => Ok(elements),
            Err(err) => match self.script {
                Some(script) => script.get(name),
                None => Err(err),
            },
        }
    }

    /// The script environment, as seen by paths invoked from this scope.
    pub fn script_env(&self) -> Option<&'a Environment> {
        match self.script {
            Some(script) => Some(script),
            None => Some(self.local),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::VertexId;

    fn v(id: u64) -> Element {
        Element::Vertex(VertexId::new(id))
    }

    #[test]
    fn test_unbound_variable() {
        let env = Environment::new();
        assert!(matches!(env.get("$x"), Err(Error::UnboundVariable(name)) if name == "x"));
        assert!(matches!(env.context(), Err(Error::UnboundVariable(name)) if name == "_"));
    }

    #[test]
    fn test_set_overwrites() {
        let mut env = Environment::new().with_context(vec![v(1)]);
        env.set("$x", vec![v(1), v(2)]);
        env.set("x", vec![v(3)]);

        assert_eq!(env.get("x").unwrap(), &[v(3)]);
        assert_eq!(env.get("$x").unwrap(), &[v(3)]);
        assert_eq!(env.context().unwrap(), &[v(1)]);
        assert_eq!(env.len(), 2);
        assert_eq!(env.take("x"), Some(vec![v(3)]));
        assert!(!env.contains("x"));
    }

    #[test]
    fn test_empty_sequence_is_bound() {
        let env = Environment::new().with_variable("empty", Vec::new());
        assert_eq!(env.get("empty").unwrap(), &[] as &[Element]);
    }

    #[test]
    fn test_frame_falls_back_to_script() {
        let script = Environment::new()
            .with_context(vec![v(1)])
            .with_variable("g", vec![v(9)]);
        let local = Environment::new().with_context(vec![v(2)]);
        let scope = Scope::frame(&local, Some(&script));

        assert_eq!(scope.lookup("_").unwrap(), &[v(2)]);
        assert_eq!(scope.lookup("g").unwrap(), &[v(9)]);
        assert!(matches!(scope.lookup("nope"), Err(Error::UnboundVariable(_))));
        assert!(std::ptr::eq(scope.script_env().unwrap(), &script));

        let root = Scope::root(&script);
        assert!(std::ptr::eq(root.script_env().unwrap(), &script));
    }
}

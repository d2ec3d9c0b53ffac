//! Script evaluator
//!
//! Parses a script, registers every `path` block, then executes the body
//! statements in order against a seeded environment.

use crate::error::{Error, Result};
use crate::graph::{Element, GraphAccess};
use crate::query::ast::{is_reserved, Script};
use crate::query::environment::Environment;
use crate::query::parser::parse_script;
use crate::query::pipeline::Pipeline;
use crate::query::registry::PathRegistry;
use tracing::{debug, debug_span, info};

/// Registry and environment kept across several inputs, as in the console.
#[derive(Debug, Clone, Default)]
pub struct Session {
    registry: PathRegistry,
    env: Environment,
    /// Variables the session started with, restored by `reset`
    seed: Environment,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_environment(env: Environment) -> Self {
        Self {
            registry: PathRegistry::new(),
            seed: env.clone(),
            env,
        }
    }

    pub fn registry(&self) -> &PathRegistry {
        &self.registry
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    /// Forget every path and every variable assigned since the session
    /// started. Seeded variables such as the starting `$_` are restored.
    pub fn reset(&mut self) {
        self.registry.clear();
        self.env = self.seed.clone();
    }
}

pub struct ScriptEvaluator<'g, G: GraphAccess + ?Sized> {
    graph: &'g G,
}

impl<'g, G: GraphAccess + ?Sized> ScriptEvaluator<'g, G> {
    pub fn new(graph: &'g G) -> Self {
        Self { graph }
    }

    /// Evaluate `script` with a fresh registry and the given environment.
    /// Returns the sequence bound by the last executed statement.
    pub fn evaluate(&self, script: &str, env: Environment) -> Result<Vec<Element>> {
        let mut session = Session::with_environment(env);
        self.evaluate_session(script, &mut session)
    }

    /// Evaluate `script` against a long-lived session. Paths and variables
    /// defined here stay visible to later calls.
    ///
    /// Nothing executes if the script fails to parse or a path name is
    /// reserved.
    pub fn evaluate_session(&self, script: &str, session: &mut Session) -> Result<Vec<Element>> {
        let span = debug_span!("evaluate", lines = script.lines().count());
        let _guard = span.enter();

        let parsed = parse_script(script)?;
        self.execute(parsed, session)
    }

    fn execute(&self, script: Script, session: &mut Session) -> Result<Vec<Element>> {
        let Script { paths, body } = script;
        let path_count = paths.len();
        // All or nothing: a session registry is never left half-updated
        if let Some(definition) = paths.iter().find(|d| is_reserved(&d.name)) {
            return Err(Error::ReservedName(definition.name.clone()));
        }
        for definition in paths {
            session.registry.define(definition)?;
        }

        let pipeline = Pipeline::new(self.graph, &session.registry);
        let mut last = None;
        for statement in &body {
            debug!(line = statement.line, text = %statement.text, "executing statement");
            pipeline.execute(statement, &mut session.env)?;
            last = Some(statement.target_name());
        }

        let result = match last {
            Some(name) => session.env.get(name)?.to_vec(),
            None => Vec::new(),
        };
        info!(
            paths = path_count,
            statements = body.len(),
            results = result.len(),
            "script evaluated"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeId, Graph, VertexId};
    use crate::query::ast::PathDefinition;

    fn setup() -> Graph {
        let graph = Graph::new();
        let v1 = graph.add_vertex("person");
        let v2 = graph.add_vertex("person");
        let v3 = graph.add_vertex("software");
        let e4 = graph.add_edge("knows", v1, v2).unwrap();
        let e5 = graph.add_edge("created", v1, v3).unwrap();
        graph.set_edge_property(e4, "weight", 0.5).unwrap();
        graph.set_edge_property(e5, "weight", 0.4).unwrap();
        graph
    }

    fn start() -> Environment {
        Environment::new().with_context(vec![Element::Vertex(VertexId::new(1))])
    }

    #[test]
    fn test_paths_registered_before_body() {
        let graph = setup();
        let evaluator = ScriptEvaluator::new(&graph);
        // the body invokes a path defined further down
        let result = evaluator
            .evaluate("./knows\npath knows\n./outE[@label='knows']\nend", start())
            .unwrap();
        assert_eq!(result, vec![Element::Edge(EdgeId::new(4))]);
    }

    #[test]
    fn test_reserved_name_stops_before_body() {
        let graph = setup();
        let evaluator = ScriptEvaluator::new(&graph);
        // `$missing` would fail if the body ran
        let err = evaluator
            .evaluate("$missing\npath inE\n./outE\nend", Environment::new())
            .unwrap_err();
        assert!(matches!(err, Error::ReservedName(name) if name == "inE"));
    }

    #[test]
    fn test_empty_body_returns_empty() {
        let graph = setup();
        let evaluator = ScriptEvaluator::new(&graph);
        assert!(evaluator.evaluate("", start()).unwrap().is_empty());
        assert!(evaluator
            .evaluate("# only a path\npath knows\n./outE\nend\n", start())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_result_is_last_target() {
        let graph = setup();
        let evaluator = ScriptEvaluator::new(&graph);
        let result = evaluator
            .evaluate("$e := ./outE\n$v := $e/inV", start())
            .unwrap();
        assert_eq!(
            result,
            vec![Element::Vertex(VertexId::new(2)), Element::Vertex(VertexId::new(3))]
        );
    }

    #[test]
    fn test_session_keeps_state() {
        let graph = setup();
        let evaluator = ScriptEvaluator::new(&graph);
        let mut session = Session::with_environment(start());

        evaluator
            .evaluate_session("path knows\n./outE[@label='knows']\nend", &mut session)
            .unwrap();
        assert!(session.registry().contains("knows"));

        evaluator.evaluate_session("$k := ./knows", &mut session).unwrap();
        let result = evaluator.evaluate_session("$k/inV", &mut session).unwrap();
        assert_eq!(result, vec![Element::Vertex(VertexId::new(2))]);
        assert_eq!(session.environment().context().unwrap(), result.as_slice());

        session.reset();
        assert!(session.registry().is_empty());
        assert!(!session.environment().contains("k"));
        // the seeded start survives a reset
        assert_eq!(
            session.environment().context().unwrap(),
            &[Element::Vertex(VertexId::new(1))]
        );
        let result = evaluator.evaluate_session("./outE", &mut session).unwrap();
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_reserved_block_leaves_session_untouched() {
        let graph = setup();
        let evaluator = ScriptEvaluator::new(&graph);
        let mut session = Session::with_environment(start());

        let err = evaluator
            .evaluate_session("path knows\n./outE\nend\npath bothV\nend", &mut session)
            .unwrap_err();
        assert!(matches!(err, Error::ReservedName(name) if name == "bothV"));
        assert!(session.registry().is_empty());

        // a hand-built script takes the same path
        let script = Script {
            paths: vec![
                PathDefinition { name: "knows".to_string(), line: 1, body: Vec::new() },
                PathDefinition { name: "outE".to_string(), line: 3, body: Vec::new() },
            ],
            body: Vec::new(),
        };
        assert!(matches!(
            evaluator.execute(script, &mut session),
            Err(Error::ReservedName(_))
        ));
        assert!(session.registry().is_empty());
    }
}

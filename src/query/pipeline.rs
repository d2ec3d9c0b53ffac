//! Pipeline executor
//!
//! Folds a step sequence over an element sequence. Built-in steps map each
//! element to its neighbours and concatenate the results in input order; a
//! user path step runs the path's body on the whole running sequence and
//! splices its output in before the step's own filter is applied.

use crate::error::{Error, Result};
use crate::graph::{Element, GraphAccess};
use crate::query::ast::{BuiltinStep, Expr, PathDefinition, Source, Statement, Step, StepTarget, CONTEXT};
use crate::query::environment::{Environment, Scope};
use crate::query::predicate::PredicateEvaluator;
use crate::query::registry::PathRegistry;
use smallvec::SmallVec;
use tracing::{debug, trace};

/// Neighbours produced by navigating from one element
type Neighbours = SmallVec<[Element; 4]>;

pub struct Pipeline<'a, G: GraphAccess + ?Sized> {
    graph: &'a G,
    registry: &'a PathRegistry,
    predicates: PredicateEvaluator<'a, G>,
}

impl<'a, G: GraphAccess + ?Sized> Pipeline<'a, G> {
    pub fn new(graph: &'a G, registry: &'a PathRegistry) -> Self {
        Self {
            graph,
            registry,
            predicates: PredicateEvaluator::new(graph),
        }
    }

    /// Run `steps` starting from `initial`.
    ///
    /// Paths invoked from here see an empty script environment.
    pub fn run(&self, initial: Vec<Element>, steps: &[Step]) -> Result<Vec<Element>> {
        let env = Environment::new();
        self.run_steps(initial, steps, Scope::root(&env), &mut Vec::new())
    }

    /// Execute one script-level statement and bind its result.
    pub fn execute(&self, statement: &Statement, env: &mut Environment) -> Result<()> {
        let value = self
            .eval_expr(&statement.expr, Scope::root(env), &mut Vec::new())
            .map_err(|err| statement.wrap_error(err))?;
        debug!(
            line = statement.line,
            target = statement.target_name(),
            len = value.len(),
            "statement executed"
        );
        env.set(statement.target_name(), value);
        Ok(())
    }

    fn eval_expr(
        &self,
        expr: &Expr,
        scope: Scope<'_>,
        active: &mut Vec<String>,
    ) -> Result<Vec<Element>> {
        let source = match &expr.source {
            Source::Context => scope.lookup(CONTEXT)?.to_vec(),
            Source::Variable(name) => scope.lookup(name)?.to_vec(),
            Source::Lookup(id) => {
                let element = self
                    .graph
                    .fetch_by_id(id)
                    .ok_or_else(|| Error::ElementNotFound(id.clone()))?;
                vec![element]
            }
        };

        let source = match &expr.filter {
            Some(predicate) => self.predicates.filter(predicate, source)?,
            None => source,
        };

        self.run_steps(source, &expr.steps, scope, active)
    }

    fn run_steps(
        &self,
        initial: Vec<Element>,
        steps: &[Step],
        scope: Scope<'_>,
        active: &mut Vec<String>,
    ) -> Result<Vec<Element>> {
        steps.iter().try_fold(initial, |current, step| {
            self.apply_step(step, current, scope, active)
        })
    }

    fn apply_step(
        &self,
        step: &Step,
        input: Vec<Element>,
        scope: Scope<'_>,
        active: &mut Vec<String>,
    ) -> Result<Vec<Element>> {
        let input_len = input.len();
        let output = match &step.target {
            StepTarget::Builtin(kind) => self.navigate_all(*kind, step, &input)?,
            StepTarget::UserPath(name) => self.invoke_path(name, input, scope, active)?,
        };
        let output = match &step.predicate {
            Some(predicate) => self.predicates.filter(predicate, output)?,
            None => output,
        };
        trace!(step = %step, input = input_len, output = output.len(), "step applied");
        Ok(output)
    }

    fn navigate_all(&self, kind: BuiltinStep, step: &Step, input: &[Element]) -> Result<Vec<Element>> {
        let mut output = Vec::with_capacity(input.len());
        for element in input {
            output.extend(self.navigate(kind, step, *element)?);
        }
        Ok(output)
    }

    fn navigate(&self, kind: BuiltinStep, step: &Step, element: Element) -> Result<Neighbours> {
        let invalid = || Error::InvalidNavigation {
            step: step.token.clone(),
            element: format!("{} {}", element.kind_name(), element),
        };

        let neighbours = match kind {
            BuiltinStep::OutE | BuiltinStep::InE | BuiltinStep::Both => {
                let vertex = element.as_vertex().ok_or_else(invalid)?;
                let mut edges: Neighbours = SmallVec::new();
                if kind != BuiltinStep::InE {
                    edges.extend(self.graph.outgoing_edges(vertex).into_iter().map(Element::Edge));
                }
                if kind != BuiltinStep::OutE {
                    edges.extend(self.graph.incoming_edges(vertex).into_iter().map(Element::Edge));
                }
                edges
            }
            BuiltinStep::OutV | BuiltinStep::InV | BuiltinStep::BothV => {
                let edge = element.as_edge().ok_or_else(invalid)?;
                let missing = || Error::ElementNotFound(edge.to_string());
                let mut vertices: Neighbours = SmallVec::new();
                if kind != BuiltinStep::InV {
                    vertices.push(Element::Vertex(self.graph.source_of(edge).ok_or_else(missing)?));
                }
                if kind != BuiltinStep::OutV {
                    vertices.push(Element::Vertex(self.graph.target_of(edge).ok_or_else(missing)?));
                }
                vertices
            }
        };
        Ok(neighbours)
    }

    fn invoke_path(
        &self,
        name: &str,
        input: Vec<Element>,
        scope: Scope<'_>,
        active: &mut Vec<String>,
    ) -> Result<Vec<Element>> {
        let definition = self
            .registry
            .resolve(name)
            .ok_or_else(|| Error::PathNotFound(name.to_string()))?;

        if let Some(start) = active.iter().position(|open| open == name) {
            let mut chain: Vec<&str> = active[start..].iter().map(String::as_str).collect();
            chain.push(name);
            return Err(Error::RecursiveDefinition(chain.join(" -> ")));
        }

        trace!(path = name, depth = active.len(), input = input.len(), "invoking path");
        active.push(name.to_string());
        let result = self.run_body(definition, input, scope.script_env(), active);
        active.pop();
        result
    }

    /// Run a path body in a private frame whose `$_` is the invocation input.
    /// The value of the last statement's target is the path's output; an
    /// empty body passes its input through.
    fn run_body(
        &self,
        definition: &PathDefinition,
        input: Vec<Element>,
        script: Option<&Environment>,
        active: &mut Vec<String>,
    ) -> Result<Vec<Element>> {
        if definition.body.is_empty() {
            return Ok(input);
        }

        let mut frame = Environment::new().with_context(input);
        let mut last = CONTEXT;
        for statement in &definition.body {
            let value = self
                .eval_expr(&statement.expr, Scope::frame(&frame, script), active)
                .map_err(|err| statement.wrap_error(err))?;
            frame.set(statement.target_name(), value);
            last = statement.target_name();
        }
        Ok(frame.take(last).unwrap_or_default())
    }
}

//! Predicate evaluation against a single graph element

use crate::error::{Error, Result};
use crate::graph::{Element, GraphAccess};
use crate::query::ast::{CompareOp, Operand, Predicate};
use crate::types::PropertyValue;

/// Evaluates filter predicates. Pure: reads the graph, never writes it.
pub struct PredicateEvaluator<'g, G: GraphAccess + ?Sized> {
    graph: &'g G,
}

impl<'g, G: GraphAccess + ?Sized> PredicateEvaluator<'g, G> {
    pub fn new(graph: &'g G) -> Self {
        Self { graph }
    }

    /// Evaluate `predicate` for `element`. `and`/`or` short-circuit left to
    /// right, so a type error in an unevaluated branch is never raised.
    pub fn evaluate(&self, predicate: &Predicate, element: Element) -> Result<bool> {
        match predicate {
            Predicate::And(left, right) => {
                Ok(self.evaluate(left, element)? && self.evaluate(right, element)?)
            }
            Predicate::Or(left, right) => {
                Ok(self.evaluate(left, element)? || self.evaluate(right, element)?)
            }
            Predicate::Compare(left, op, right) => {
                match (self.resolve(left, element), self.resolve(right, element)) {
                    (Some(l), Some(r)) => compare(&l, *op, &r),
                    // Absent properties never match
                    _ => Ok(false),
                }
            }
        }
    }

    /// Keep the elements satisfying `predicate`, in order.
    pub fn filter(&self, predicate: &Predicate, elements: Vec<Element>) -> Result<Vec<Element>> {
        let mut kept = Vec::with_capacity(elements.len());
        for element in elements {
            if self.evaluate(predicate, element)? {
                kept.push(element);
            }
        }
        Ok(kept)
    }

    fn resolve(&self, operand: &Operand, element: Element) -> Option<PropertyValue> {
        match operand {
            Operand::Property(name) => self.graph.property(element, name),
            Operand::Label => self.graph.label(element).map(PropertyValue::String),
            Operand::Id => Some(PropertyValue::String(element.id().to_string())),
            Operand::Literal(value) => Some(value.clone()),
        }
    }
}

fn compare(left: &PropertyValue, op: CompareOp, right: &PropertyValue) -> Result<bool> {
    let compatible = match (left, right) {
        (PropertyValue::String(_), PropertyValue::String(_)) => true,
        (PropertyValue::Boolean(_), PropertyValue::Boolean(_)) => op.is_equality(),
        (l, r) => l.is_number() && r.is_number(),
    };
    if !compatible {
        return Err(Error::PredicateType {
            left: format!("{} ({})", left, left.type_name()),
            op: op.to_string(),
            right: format!("{} ({})", right, right.type_name()),
        });
    }
    Ok(op.holds(left.partial_compare(right)))
}

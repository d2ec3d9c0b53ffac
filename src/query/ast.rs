//! Path language AST
//!
//! Scripts are parsed into these types before anything executes; they are
//! immutable afterwards.

use crate::error::Error;
use crate::types::PropertyValue;
use std::cmp::Ordering;
use std::fmt;

/// Name of the implicit context variable `$_`.
pub const CONTEXT: &str = "_";

// ============================================================================
// Steps
// ============================================================================

/// Built-in navigation kinds. Their names are reserved and cannot be used as
/// path names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinStep {
    /// vertex -> outgoing edges
    OutE,
    /// vertex -> incoming edges
    InE,
    /// edge -> source vertex
    OutV,
    /// edge -> target vertex
    InV,
    /// edge -> source, then target
    BothV,
    /// vertex -> outgoing edges, then incoming edges
    Both,
}

impl BuiltinStep {
    pub const ALL: [BuiltinStep; 6] = [
        BuiltinStep::OutE,
        BuiltinStep::InE,
        BuiltinStep::OutV,
        BuiltinStep::InV,
        BuiltinStep::BothV,
        BuiltinStep::Both,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|step| step.as_str() == name)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BuiltinStep::OutE => "outE",
            BuiltinStep::InE => "inE",
            BuiltinStep::OutV => "outV",
            BuiltinStep::InV => "inV",
            BuiltinStep::BothV => "bothV",
            BuiltinStep::Both => "both",
        }
    }
}

impl fmt::Display for BuiltinStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `name` collides with a built-in navigation kind.
pub fn is_reserved(name: &str) -> bool {
    BuiltinStep::from_name(name).is_some()
}

/// What a step navigates with.
#[derive(Debug, Clone, PartialEq)]
pub enum StepTarget {
    Builtin(BuiltinStep),
    /// Reference to a named path, resolved when the step executes.
    UserPath(String),
}

/// One navigation step with an optional filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub target: StepTarget,
    pub predicate: Option<Predicate>,
    /// Source text of the step, kept for error reporting.
    pub token: String,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token)
    }
}

// ============================================================================
// Predicates
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

impl CompareOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::Ge => ">=",
            CompareOp::Le => "<=",
        }
    }

    /// Equality operators are defined for every value kind; ordering
    /// operators are not defined for booleans.
    pub fn is_equality(&self) -> bool {
        matches!(self, CompareOp::Eq | CompareOp::Ne)
    }

    /// Apply the operator to the result of comparing two values. `None`
    /// means the values are unordered (NaN) and only `!=` holds.
    pub fn holds(&self, ordering: Option<Ordering>) -> bool {
        match ordering {
            None => *self == CompareOp::Ne,
            Some(ord) => match self {
                CompareOp::Eq => ord == Ordering::Equal,
                CompareOp::Ne => ord != Ordering::Equal,
                CompareOp::Gt => ord == Ordering::Greater,
                CompareOp::Lt => ord == Ordering::Less,
                CompareOp::Ge => ord != Ordering::Less,
                CompareOp::Le => ord != Ordering::Greater,
            },
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// `@name`
    Property(String),
    /// `@label`, resolved against the element label
    Label,
    /// `@id`, the element id rendered as a string
    Id,
    Literal(PropertyValue),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Property(name) => write!(f, "@{}", name),
            Operand::Label => f.write_str("@label"),
            Operand::Id => f.write_str("@id"),
            Operand::Literal(value) => write!(f, "{}", value),
        }
    }
}

/// Boolean filter expression. `and` binds tighter than `or`.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Compare(Operand, CompareOp, Operand),
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Compare(left, op, right) => write!(f, "{} {} {}", left, op, right),
            Predicate::And(left, right) => write!(f, "({} and {})", left, right),
            Predicate::Or(left, right) => write!(f, "({} or {})", left, right),
        }
    }
}

// ============================================================================
// Statements
// ============================================================================

/// Where an expression takes its starting sequence from.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// `./…`, relative to `$_`
    Context,
    /// `$name`
    Variable(String),
    /// `g:id(<literal>)`
    Lookup(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub source: Source,
    /// Filter applied to the source sequence before any step, as in `$x[@weight > 0.5]`.
    pub filter: Option<Predicate>,
    pub steps: Vec<Step>,
}

/// `<var> := <expr>` or a bare `<expr>` targeting `$_`.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// 1-based line number in the script.
    pub line: usize,
    pub text: String,
    pub target: Option<String>,
    pub expr: Expr,
}

impl Statement {
    /// Variable written by this statement.
    pub fn target_name(&self) -> &str {
        self.target.as_deref().unwrap_or(CONTEXT)
    }

    /// Attach this statement's position and text to an error.
    pub fn wrap_error(&self, err: Error) -> Error {
        Error::Statement {
            line: self.line,
            text: self.text.clone(),
            source: Box::new(err),
        }
    }
}

/// A `path <name> … end` block.
#[derive(Debug, Clone, PartialEq)]
pub struct PathDefinition {
    pub name: String,
    /// Line of the `path` header.
    pub line: usize,
    pub body: Vec<Statement>,
}

/// A parsed script: every path block, then the body statements in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    pub paths: Vec<PathDefinition>,
    pub body: Vec<Statement>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_names() {
        for name in ["outE", "inE", "outV", "inV", "bothV", "both"] {
            assert!(is_reserved(name), "{} should be reserved", name);
        }
        assert!(!is_reserved("knows"));
        assert!(!is_reserved("OUTE"));
    }

    #[test]
    fn test_compare_op_holds() {
        assert!(CompareOp::Ge.holds(Some(Ordering::Equal)));
        assert!(!CompareOp::Gt.holds(Some(Ordering::Equal)));
        assert!(CompareOp::Le.holds(Some(Ordering::Less)));
        assert!(CompareOp::Ne.holds(None));
        assert!(!CompareOp::Eq.holds(None));
    }
}

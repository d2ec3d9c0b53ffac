//! 路径语言模块
//!
//! 解析并执行动态路径脚本：
//! - 内置导航步骤: outE, inE, outV, inV, bothV, both
//! - `[...]` 属性谓词过滤
//! - `path <name> ... end` 命名路径
//! - `$var := <expr>` 变量绑定

mod ast;
mod environment;
mod evaluator;
mod parser;
mod pipeline;
mod predicate;
mod registry;

// 导出 AST 类型
pub use ast::{
    is_reserved, BuiltinStep, CompareOp, Expr, Operand, PathDefinition, Predicate, Script, Source,
    Statement, Step, StepTarget, CONTEXT,
};

// 导出执行组件
pub use environment::{Environment, Scope};
pub use evaluator::{ScriptEvaluator, Session};
pub use pipeline::Pipeline;
pub use predicate::PredicateEvaluator;
pub use registry::PathRegistry;

// 导出解析器
pub use parser::{parse_predicate, parse_script, parse_step, path_header, PathParser};

//! GraphPath - 属性图上的动态路径语言解释器
//!
//! 逐行执行的路径脚本，支持：
//! - 内置导航步骤与属性谓词过滤
//! - `path ... end` 命名路径，调用时按内联语义展开
//! - 变量绑定与 `g:id(...)` 元素查找
//! - 内存属性图与 JSON 图导入

pub mod cli;
pub mod error;
pub mod graph;
pub mod import;
pub mod query;
pub mod types;

// 重导出常用类型
pub use error::{Error, Result};
pub use graph::{Edge, EdgeId, Element, ElementData, Graph, GraphAccess, Vertex, VertexId};
pub use import::{GraphLoader, ImportStats};
pub use query::{Environment, PathRegistry, ScriptEvaluator, Session};
pub use types::{Properties, PropertyValue};

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

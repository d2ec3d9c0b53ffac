//! 图核心模块
//!
//! 定义元素句柄、图读取接口以及内存属性图

mod edge;
mod element;
mod graph;
mod index;
mod vertex;

pub use edge::{Edge, EdgeId};
pub use element::{Element, ElementData, GraphAccess};
pub use graph::Graph;
pub use vertex::{Vertex, VertexId};

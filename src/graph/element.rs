//! 元素句柄与图读取接口
//!
//! 解释器只通过 [`GraphAccess`] 读取图，元素以可复制的句柄传递，不复制数据。

use crate::graph::edge::EdgeId;
use crate::graph::vertex::VertexId;
use crate::types::{Properties, PropertyValue};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 图元素句柄：顶点或边
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Vertex(VertexId),
    Edge(EdgeId),
}

impl Element {
    /// 元素 ID（顶点与边共享 ID 空间）
    pub fn id(&self) -> u64 {
        match self {
            Element::Vertex(id) => id.as_u64(),
            Element::Edge(id) => id.as_u64(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Element::Vertex(_) => "vertex",
            Element::Edge(_) => "edge",
        }
    }

    pub fn as_vertex(&self) -> Option<VertexId> {
        match self {
            Element::Vertex(id) => Some(*id),
            Element::Edge(_) => None,
        }
    }

    pub fn as_edge(&self) -> Option<EdgeId> {
        match self {
            Element::Edge(id) => Some(*id),
            Element::Vertex(_) => None,
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Vertex(id) => write!(f, "{}", id),
            Element::Edge(id) => write!(f, "{}", id),
        }
    }
}

impl From<VertexId> for Element {
    fn from(id: VertexId) -> Self {
        Element::Vertex(id)
    }
}

impl From<EdgeId> for Element {
    fn from(id: EdgeId) -> Self {
        Element::Edge(id)
    }
}

/// 图的只读能力集合
///
/// 邻接列表的顺序必须稳定，遍历结果的顺序完全由它决定。
pub trait GraphAccess {
    /// 按 ID 查找元素
    fn fetch_by_id(&self, id: &str) -> Option<Element>;

    /// 顶点的出边（按邻接顺序）
    fn outgoing_edges(&self, vertex: VertexId) -> Vec<EdgeId>;

    /// 顶点的入边（按邻接顺序）
    fn incoming_edges(&self, vertex: VertexId) -> Vec<EdgeId>;

    fn source_of(&self, edge: EdgeId) -> Option<VertexId>;

    fn target_of(&self, edge: EdgeId) -> Option<VertexId>;

    fn label(&self, element: Element) -> Option<String>;

    fn property(&self, element: Element, name: &str) -> Option<PropertyValue>;
}

/// 元素的可序列化视图，用于结果输出
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementData {
    pub id: u64,
    pub kind: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dst: Option<u64>,
    pub properties: Properties,
}

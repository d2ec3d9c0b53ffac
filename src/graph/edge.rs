//! 边定义

use crate::graph::vertex::VertexId;
use crate::types::{Properties, PropertyValue};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 边 ID（与顶点共享同一 ID 空间）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub u64);

impl EdgeId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for EdgeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e[{}]", self.0)
    }
}

/// 边
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    /// 边 ID
    id: EdgeId,
    /// 边标签
    label: String,
    /// 源顶点 ID
    src: VertexId,
    /// 目标顶点 ID
    dst: VertexId,
    /// 属性
    properties: Properties,
}

impl Edge {
    /// 创建新边
    pub fn new(id: EdgeId, label: impl Into<String>, src: VertexId, dst: VertexId) -> Self {
        Self {
            id,
            label: label.into(),
            src,
            dst,
            properties: Properties::new(),
        }
    }

    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// 源顶点
    pub fn src(&self) -> VertexId {
        self.src
    }

    /// 目标顶点
    pub fn dst(&self) -> VertexId {
        self.dst
    }

    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    pub fn set_property(&mut self, key: String, value: PropertyValue) {
        self.properties.insert(key, value);
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_endpoints() {
        let mut e = Edge::new(EdgeId::new(7), "knows", VertexId::new(1), VertexId::new(2));
        e.set_property("weight".to_string(), 0.5.into());

        assert_eq!(e.src(), VertexId::new(1));
        assert_eq!(e.dst(), VertexId::new(2));
        assert_eq!(e.label(), "knows");
        assert_eq!(e.property("weight"), Some(&PropertyValue::Float(0.5)));
        assert_eq!(e.id().to_string(), "e[7]");
    }
}

//! 邻接索引
//!
//! 出边/入边列表按插入顺序保存，遍历结果的顺序由此决定

use crate::graph::edge::EdgeId;
use crate::graph::vertex::VertexId;
use parking_lot::RwLock;
use std::collections::HashMap;

/// 边索引
pub struct EdgeIndex {
    /// 源顶点到出边的映射
    outgoing: RwLock<HashMap<VertexId, Vec<EdgeId>>>,
    /// 目标顶点到入边的映射
    incoming: RwLock<HashMap<VertexId, Vec<EdgeId>>>,
    /// 边 ID 到 (src, dst) 的映射
    edge_endpoints: RwLock<HashMap<EdgeId, (VertexId, VertexId)>>,
}

impl EdgeIndex {
    /// 创建新索引
    pub fn new() -> Self {
        Self {
            outgoing: RwLock::new(HashMap::new()),
            incoming: RwLock::new(HashMap::new()),
            edge_endpoints: RwLock::new(HashMap::new()),
        }
    }

    /// 添加边
    pub fn add_edge(&self, edge_id: EdgeId, src: VertexId, dst: VertexId) {
        self.outgoing.write().entry(src).or_default().push(edge_id);
        self.incoming.write().entry(dst).or_default().push(edge_id);
        self.edge_endpoints.write().insert(edge_id, (src, dst));
    }

    /// 获取顶点的出边
    pub fn get_outgoing(&self, vertex_id: VertexId) -> Vec<EdgeId> {
        self.outgoing
            .read()
            .get(&vertex_id)
            .cloned()
            .unwrap_or_default()
    }

    /// 获取顶点的入边
    pub fn get_incoming(&self, vertex_id: VertexId) -> Vec<EdgeId> {
        self.incoming
            .read()
            .get(&vertex_id)
            .cloned()
            .unwrap_or_default()
    }

    /// 获取边的端点
    pub fn get_endpoints(&self, edge_id: EdgeId) -> Option<(VertexId, VertexId)> {
        self.edge_endpoints.read().get(&edge_id).copied()
    }
}

impl Default for EdgeIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacency_keeps_insertion_order() {
        let index = EdgeIndex::new();
        let (a, b, c) = (VertexId::new(1), VertexId::new(2), VertexId::new(3));
        index.add_edge(EdgeId::new(12), a, c);
        index.add_edge(EdgeId::new(10), a, b);
        index.add_edge(EdgeId::new(11), b, c);

        assert_eq!(index.get_outgoing(a), vec![EdgeId::new(12), EdgeId::new(10)]);
        assert_eq!(index.get_incoming(c), vec![EdgeId::new(12), EdgeId::new(11)]);
        assert_eq!(index.get_endpoints(EdgeId::new(11)), Some((b, c)));
        assert!(index.get_incoming(a).is_empty());
    }
}

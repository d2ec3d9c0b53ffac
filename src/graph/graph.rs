//! 内存属性图
//!
//! 顶点和边共享一个 ID 空间，`g:id(...)` 查找因此没有歧义。

use super::edge::{Edge, EdgeId};
use super::element::{Element, ElementData, GraphAccess};
use super::index::EdgeIndex;
use super::vertex::{Vertex, VertexId};
use crate::error::{Error, Result};
use crate::types::PropertyValue;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// 图数据库
pub struct Graph {
    /// 邻接索引
    edge_index: EdgeIndex,
    /// 下一个元素 ID
    next_id: AtomicU64,
    /// 顶点存储
    vertex_cache: RwLock<HashMap<VertexId, Vertex>>,
    /// 边存储
    edge_cache: RwLock<HashMap<EdgeId, Edge>>,
}

impl Graph {
    /// 创建空图
    pub fn new() -> Self {
        Self {
            edge_index: EdgeIndex::new(),
            next_id: AtomicU64::new(1),
            vertex_cache: RwLock::new(HashMap::new()),
            edge_cache: RwLock::new(HashMap::new()),
        }
    }

    /// 创建共享的空图
    pub fn in_memory() -> Arc<Self> {
        Arc::new(Self::new())
    }

    fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// 占用指定 ID，后续自动分配的 ID 会跳过它
    fn reserve_id(&self, id: u64) -> Result<()> {
        if self.contains_id(id) {
            return Err(Error::ElementAlreadyExists(id.to_string()));
        }
        self.next_id.fetch_max(id.saturating_add(1), Ordering::SeqCst);
        Ok(())
    }

    fn contains_id(&self, id: u64) -> bool {
        self.vertex_cache.read().contains_key(&VertexId::new(id))
            || self.edge_cache.read().contains_key(&EdgeId::new(id))
    }

    // ==================== 顶点操作 ====================

    /// 添加顶点
    pub fn add_vertex(&self, label: impl Into<String>) -> VertexId {
        let id = VertexId::new(self.allocate_id());
        self.vertex_cache.write().insert(id, Vertex::new(id, label));
        id
    }

    /// 以指定 ID 添加顶点
    pub fn add_vertex_with_id(&self, id: u64, label: impl Into<String>) -> Result<VertexId> {
        self.reserve_id(id)?;
        let id = VertexId::new(id);
        self.vertex_cache.write().insert(id, Vertex::new(id, label));
        Ok(id)
    }

    /// 获取顶点
    pub fn vertex(&self, id: VertexId) -> Option<Vertex> {
        self.vertex_cache.read().get(&id).cloned()
    }

    /// 设置顶点属性
    pub fn set_vertex_property(
        &self,
        id: VertexId,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Result<()> {
        let mut cache = self.vertex_cache.write();
        let vertex = cache
            .get_mut(&id)
            .ok_or_else(|| Error::ElementNotFound(id.to_string()))?;
        vertex.set_property(key.into(), value.into());
        Ok(())
    }

    /// 获取顶点数量
    pub fn vertex_count(&self) -> usize {
        self.vertex_cache.read().len()
    }

    // ==================== 边操作 ====================

    /// 添加边
    pub fn add_edge(
        &self,
        label: impl Into<String>,
        src: VertexId,
        dst: VertexId,
    ) -> Result<EdgeId> {
        self.check_endpoints(src, dst)?;
        let id = EdgeId::new(self.allocate_id());
        self.insert_edge(Edge::new(id, label, src, dst));
        Ok(id)
    }

    /// 以指定 ID 添加边
    pub fn add_edge_with_id(
        &self,
        id: u64,
        label: impl Into<String>,
        src: VertexId,
        dst: VertexId,
    ) -> Result<EdgeId> {
        self.check_endpoints(src, dst)?;
        self.reserve_id(id)?;
        let id = EdgeId::new(id);
        self.insert_edge(Edge::new(id, label, src, dst));
        Ok(id)
    }

    fn check_endpoints(&self, src: VertexId, dst: VertexId) -> Result<()> {
        let vertices = self.vertex_cache.read();
        if !vertices.contains_key(&src) {
            return Err(Error::ElementNotFound(format!("源顶点 {}", src)));
        }
        if !vertices.contains_key(&dst) {
            return Err(Error::ElementNotFound(format!("目标顶点 {}", dst)));
        }
        Ok(())
    }

    fn insert_edge(&self, edge: Edge) {
        self.edge_index.add_edge(edge.id(), edge.src(), edge.dst());
        self.edge_cache.write().insert(edge.id(), edge);
    }

    /// 获取边
    pub fn edge(&self, id: EdgeId) -> Option<Edge> {
        self.edge_cache.read().get(&id).cloned()
    }

    /// 设置边属性
    pub fn set_edge_property(
        &self,
        id: EdgeId,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Result<()> {
        let mut cache = self.edge_cache.write();
        let edge = cache
            .get_mut(&id)
            .ok_or_else(|| Error::ElementNotFound(id.to_string()))?;
        edge.set_property(key.into(), value.into());
        Ok(())
    }

    /// 获取边数量
    pub fn edge_count(&self) -> usize {
        self.edge_cache.read().len()
    }

    // ==================== 结果输出 ====================

    /// 生成元素的可序列化视图
    pub fn describe(&self, element: Element) -> Option<ElementData> {
        match element {
            Element::Vertex(id) => self.vertex(id).map(|v| ElementData {
                id: id.as_u64(),
                kind: element.kind_name().to_string(),
                label: v.label().to_string(),
                src: None,
                dst: None,
                properties: v.properties().clone(),
            }),
            Element::Edge(id) => self.edge(id).map(|e| ElementData {
                id: id.as_u64(),
                kind: element.kind_name().to_string(),
                label: e.label().to_string(),
                src: Some(e.src().as_u64()),
                dst: Some(e.dst().as_u64()),
                properties: e.properties().clone(),
            }),
        }
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphAccess for Graph {
    fn fetch_by_id(&self, id: &str) -> Option<Element> {
        let id: u64 = id.trim().parse().ok()?;
        if self.vertex_cache.read().contains_key(&VertexId::new(id)) {
            return Some(Element::Vertex(VertexId::new(id)));
        }
        if self.edge_cache.read().contains_key(&EdgeId::new(id)) {
            return Some(Element::Edge(EdgeId::new(id)));
        }
        None
    }

    fn outgoing_edges(&self, vertex: VertexId) -> Vec<EdgeId> {
        self.edge_index.get_outgoing(vertex)
    }

    fn incoming_edges(&self, vertex: VertexId) -> Vec<EdgeId> {
        self.edge_index.get_incoming(vertex)
    }

    fn source_of(&self, edge: EdgeId) -> Option<VertexId> {
        self.edge_index.get_endpoints(edge).map(|(src, _)| src)
    }

    fn target_of(&self, edge: EdgeId) -> Option<VertexId> {
        self.edge_index.get_endpoints(edge).map(|(_, dst)| dst)
    }

    fn label(&self, element: Element) -> Option<String> {
        match element {
            Element::Vertex(id) => self
                .vertex_cache
                .read()
                .get(&id)
                .map(|v| v.label().to_string()),
            Element::Edge(id) => self
                .edge_cache
                .read()
                .get(&id)
                .map(|e| e.label().to_string()),
        }
    }

    fn property(&self, element: Element, name: &str) -> Option<PropertyValue> {
        match element {
            Element::Vertex(id) => self.vertex_cache.read().get(&id)?.property(name).cloned(),
            Element::Edge(id) => self.edge_cache.read().get(&id)?.property(name).cloned(),
        }
    }
}

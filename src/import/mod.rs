//! 图数据导入模块
//!
//! 从 JSON 文档加载顶点和边：
//!
//! ```json
//! {
//!   "vertices": [{"id": 1, "label": "person", "properties": {"name": "marko"}}],
//!   "edges": [{"id": 7, "label": "knows", "src": 1, "dst": 2, "properties": {"weight": 0.5}}]
//! }
//! ```
//!
//! ID 可以是数字或数字字符串；顶点和边的 `id` 可省略，由图自动分配。

use crate::error::{Error, Result};
use crate::graph::{Graph, VertexId};
use crate::types::Properties;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// 导入统计
#[derive(Debug, Default, Clone)]
pub struct ImportStats {
    pub vertices_imported: usize,
    pub edges_imported: usize,
    pub errors: usize,
    pub duration_ms: u64,
}

/// 数字或数字字符串形式的 ID
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

impl RawId {
    fn resolve(&self) -> Result<u64> {
        match self {
            RawId::Number(n) => Ok(*n),
            RawId::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| Error::Import(format!("无效的 ID: {:?}", s))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawVertex {
    id: Option<RawId>,
    label: String,
    #[serde(default)]
    properties: Properties,
}

#[derive(Debug, Deserialize)]
struct RawEdge {
    id: Option<RawId>,
    label: String,
    src: RawId,
    dst: RawId,
    #[serde(default)]
    properties: Properties,
}

#[derive(Debug, Deserialize)]
struct RawGraph {
    #[serde(default)]
    vertices: Vec<RawVertex>,
    #[serde(default)]
    edges: Vec<RawEdge>,
}

/// JSON 图加载器
pub struct GraphLoader {
    graph: Arc<Graph>,
    skip_errors: bool,
}

impl GraphLoader {
    /// 创建加载器，默认遇到错误立即失败
    pub fn new(graph: Arc<Graph>) -> Self {
        Self {
            graph,
            skip_errors: false,
        }
    }

    /// 跳过有问题的记录，只计入 `errors`
    pub fn with_skip_errors(mut self, skip: bool) -> Self {
        self.skip_errors = skip;
        self
    }

    /// 从文件加载
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<ImportStats> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading graph file");
        let text = fs::read_to_string(path)?;
        self.load_str(&text)
    }

    /// 从 JSON 文本加载
    pub fn load_str(&self, text: &str) -> Result<ImportStats> {
        let start = Instant::now();
        let raw: RawGraph =
            serde_json::from_str(text).map_err(|e| Error::Import(format!("JSON 解析失败: {}", e)))?;

        let mut stats = ImportStats::default();

        // 先导入全部顶点，边的端点才能解析
        for vertex in raw.vertices {
            match self.import_vertex(vertex) {
                Ok(()) => stats.vertices_imported += 1,
                Err(e) => self.record_error(&mut stats, e)?,
            }
        }

        for edge in raw.edges {
            match self.import_edge(edge) {
                Ok(()) => stats.edges_imported += 1,
                Err(e) => self.record_error(&mut stats, e)?,
            }
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            vertices = stats.vertices_imported,
            edges = stats.edges_imported,
            errors = stats.errors,
            "graph loaded"
        );
        Ok(stats)
    }

    fn record_error(&self, stats: &mut ImportStats, err: Error) -> Result<()> {
        if !self.skip_errors {
            return Err(err);
        }
        warn!(error = %err, "skipping record");
        stats.errors += 1;
        Ok(())
    }

    fn import_vertex(&self, raw: RawVertex) -> Result<()> {
        let id = match raw.id {
            Some(id) => self.graph.add_vertex_with_id(id.resolve()?, raw.label)?,
            None => self.graph.add_vertex(raw.label),
        };
        for (key, value) in raw.properties {
            self.graph.set_vertex_property(id, key, value)?;
        }
        Ok(())
    }

    fn import_edge(&self, raw: RawEdge) -> Result<()> {
        let src = VertexId::new(raw.src.resolve()?);
        let dst = VertexId::new(raw.dst.resolve()?);
        let id = match raw.id {
            Some(id) => self
                .graph
                .add_edge_with_id(id.resolve()?, raw.label, src, dst)?,
            None => self.graph.add_edge(raw.label, src, dst)?,
        };
        for (key, value) in raw.properties {
            self.graph.set_edge_property(id, key, value)?;
        }
        Ok(())
    }
}

//! 结果打印器
//!
//! 提供表格、垂直和 JSON 格式的结果输出

use crate::graph::ElementData;
use crate::query::{PathRegistry, Session};
use crate::types::Properties;
use prettytable::{format, row, Cell, Row, Table};
use std::fmt;
use std::str::FromStr;

/// 打印模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintMode {
    /// 表格模式
    Table,
    /// 垂直模式 (\G)
    Vertical,
    /// JSON 数组
    Json,
}

impl FromStr for PrintMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(PrintMode::Table),
            "vertical" => Ok(PrintMode::Vertical),
            "json" => Ok(PrintMode::Json),
            other => Err(format!("未知输出格式: {} (可选 table, vertical, json)", other)),
        }
    }
}

impl fmt::Display for PrintMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrintMode::Table => "table",
            PrintMode::Vertical => "vertical",
            PrintMode::Json => "json",
        };
        f.write_str(name)
    }
}

const COLUMNS: [&str; 6] = ["id", "kind", "label", "src", "dst", "properties"];

/// 结果打印器
pub struct Printer {
    mode: PrintMode,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new(PrintMode::Table)
    }
}

impl Printer {
    pub fn new(mode: PrintMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> PrintMode {
        self.mode
    }

    /// 设置打印模式
    pub fn set_mode(&mut self, mode: PrintMode) {
        self.mode = mode;
    }

    /// 打印结果序列
    pub fn print_elements(&self, rows: &[ElementData], elapsed_ms: u64) -> serde_json::Result<String> {
        if self.mode == PrintMode::Json {
            return serde_json::to_string_pretty(rows).map(|mut s| {
                s.push('\n');
                s
            });
        }

        if rows.is_empty() {
            return Ok(format!("Empty sequence ({} ms)\n", elapsed_ms));
        }

        let cells: Vec<Vec<String>> = rows.iter().map(row_cells).collect();
        let output = match self.mode {
            PrintMode::Vertical => format_vertical(&cells),
            _ => format_table(&cells),
        };

        Ok(format!(
            "{}\n{} element(s) ({} ms)\n",
            output,
            rows.len(),
            elapsed_ms
        ))
    }

    /// 打印统计信息
    pub fn print_stats(&self, vertex_count: usize, edge_count: usize, session: &Session) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);
        table.set_titles(row!["Property", "Value"]);
        table.add_row(row!["Vertex Count", vertex_count.to_string()]);
        table.add_row(row!["Edge Count", edge_count.to_string()]);
        table.add_row(row!["Paths", session.registry().len().to_string()]);
        table.add_row(row!["Variables", session.environment().len().to_string()]);
        table.to_string()
    }

    /// 打印变量及其序列
    pub fn print_variables(&self, session: &Session) -> String {
        let env = session.environment();
        if env.is_empty() {
            return "No variables bound\n".to_string();
        }
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);
        table.set_titles(row!["Variable", "Size", "Elements"]);
        for (name, elements) in env.iter() {
            let shown: Vec<String> = elements.iter().take(8).map(|e| e.to_string()).collect();
            let mut preview = shown.join(", ");
            if elements.len() > shown.len() {
                preview.push_str(", ...");
            }
            table.add_row(row![format!("${}", name), elements.len().to_string(), preview]);
        }
        table.to_string()
    }

    /// 打印已定义的路径
    pub fn print_paths(&self, registry: &PathRegistry) -> String {
        if registry.is_empty() {
            return "No paths defined\n".to_string();
        }
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);
        table.set_titles(row!["Path", "Line", "Body"]);
        for name in registry.names() {
            if let Some(definition) = registry.resolve(name) {
                let body: Vec<&str> = definition.body.iter().map(|s| s.text.as_str()).collect();
                table.add_row(row![name, definition.line.to_string(), body.join("\n")]);
            }
        }
        table.to_string()
    }

    /// 打印帮助信息
    pub fn print_help() -> String {
        r#"
═══════════════════════════════════════════════════════════════
                   GraphPath 命令帮助
═══════════════════════════════════════════════════════════════

语句:
  ./outE                           从 $_ 出发导航
  ./outE[@label='knows']/inV       链式步骤与谓词过滤
  $x := ./outE[@weight > 0.5]      绑定变量
  $x[@weight > 0.5]                过滤已有变量
  g:id('1')                        按 ID 查找元素

内置步骤:
  outE  inE  outV  inV  bothV  both

命名路径 (多行输入，以 end 结束):
  path knows
  ./outE[@label='knows']
  end

谓词:
  @name = 'marko'   @weight >= 0.5   @active = true
  @label, @id       元素标签与 ID
  and / or / ( )    组合条件，and 优先

═══════════════════════════════════════════════════════════════
控制台命令 (以 : 开头)
═══════════════════════════════════════════════════════════════

  :help, :h              显示帮助
  :quit, :q              退出程序
  :vars                  列出变量
  :paths                 列出命名路径
  :stats                 图与会话统计
  :format <mode>         输出格式: table, vertical, json
  :reset                 清空路径和变量 (保留 --start 初始的 $_)
  :tee [-o] <file>       输出同时写入文件 (-o 覆盖)
  :notee                 停止写入文件
  :clear                 清屏

提示: 在语句末尾加 \G 可垂直显示结果

═══════════════════════════════════════════════════════════════
"#
        .to_string()
    }
}

fn row_cells(data: &ElementData) -> Vec<String> {
    vec![
        data.id.to_string(),
        data.kind.clone(),
        data.label.clone(),
        data.src.map(|id| id.to_string()).unwrap_or_default(),
        data.dst.map(|id| id.to_string()).unwrap_or_default(),
        format_properties(&data.properties),
    ]
}

fn format_properties(properties: &Properties) -> String {
    properties
        .iter()
        .map(|(k, v)| format!("{}: {}", k, v))
        .collect::<Vec<_>>()
        .join(", ")
}

/// 表格格式
fn format_table(rows: &[Vec<String>]) -> String {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);

    let header: Vec<Cell> = COLUMNS.iter().map(|c| Cell::new(c)).collect();
    table.set_titles(Row::new(header));

    for row_data in rows {
        let cells: Vec<Cell> = row_data.iter().map(|v| Cell::new(v)).collect();
        table.add_row(Row::new(cells));
    }

    table.to_string()
}

/// 垂直格式
fn format_vertical(rows: &[Vec<String>]) -> String {
    let width = COLUMNS.iter().map(|c| c.len()).max().unwrap_or(0);
    let mut output = String::new();

    for (i, row_data) in rows.iter().enumerate() {
        output.push_str(&format!(
            "*************************** {}. element ***************************\n",
            i + 1
        ));
        for (col, value) in COLUMNS.iter().zip(row_data) {
            output.push_str(&format!("{:>width$}: {}\n", col, value, width = width));
        }
    }

    output
}

/// 检查输入是否以 \G 结尾（垂直显示）
pub fn check_vertical_display(input: &str) -> (String, bool) {
    let trimmed = input.trim();
    if trimmed.ends_with("\\G") || trimmed.ends_with("\\g") {
        let clean = trimmed[..trimmed.len() - 2].trim().to_string();
        (clean, true)
    } else {
        (trimmed.to_string(), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Element, Graph};

    fn sample() -> Vec<ElementData> {
        let graph = Graph::new();
        let v1 = graph.add_vertex("person");
        let v2 = graph.add_vertex("person");
        graph.set_vertex_property(v1, "name", "marko").unwrap();
        let e = graph.add_edge("knows", v1, v2).unwrap();
        graph.set_edge_property(e, "weight", 0.5).unwrap();
        [Element::Vertex(v1), Element::Edge(e)]
            .into_iter()
            .filter_map(|el| graph.describe(el))
            .collect()
    }

    #[test]
    fn test_print_mode_from_str() {
        assert_eq!("JSON".parse::<PrintMode>().unwrap(), PrintMode::Json);
        assert_eq!("vertical".parse::<PrintMode>().unwrap(), PrintMode::Vertical);
        assert!("csv".parse::<PrintMode>().is_err());
    }

    #[test]
    fn test_table_output() {
        let out = Printer::default().print_elements(&sample(), 3).unwrap();
        assert!(out.contains("knows"));
        assert!(out.contains("name: 'marko'"));
        assert!(out.contains("2 element(s)"));
    }

    #[test]
    fn test_vertical_output() {
        let out = Printer::new(PrintMode::Vertical)
            .print_elements(&sample(), 0)
            .unwrap();
        assert!(out.contains("1. element"));
        assert!(out.contains("weight: 0.5"));
    }

    #[test]
    fn test_json_output() {
        let out = Printer::new(PrintMode::Json).print_elements(&sample(), 0).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[1]["label"], "knows");
        assert_eq!(parsed[1]["src"], 1);
        assert!(parsed[0].get("src").is_none());
    }

    #[test]
    fn test_empty_sequence() {
        let out = Printer::default().print_elements(&[], 1).unwrap();
        assert!(out.starts_with("Empty sequence"));
        let json = Printer::new(PrintMode::Json).print_elements(&[], 1).unwrap();
        assert_eq!(json.trim(), "[]");
    }

    #[test]
    fn test_check_vertical_display() {
        assert_eq!(check_vertical_display("./outE \\G"), ("./outE".to_string(), true));
        assert_eq!(check_vertical_display("./outE"), ("./outE".to_string(), false));
    }
}

//! 路径语言补全器
//!
//! 基于 rustyline 实现 Tab 补全与多行 `path ... end` 输入

use crate::query::{path_header, BuiltinStep, Session};
use parking_lot::RwLock;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Context, Helper};

/// 语言关键字
const KEYWORDS: &[&str] = &["path", "end", "and", "or", "true", "false", "g:id(", "@label", "@id"];

/// 控制台命令列表
const CONSOLE_COMMANDS: &[&str] = &[
    ":help", ":h",
    ":quit", ":q",
    ":exit",
    ":vars",
    ":paths",
    ":stats",
    ":format",
    ":reset",
    ":tee",
    ":notee",
    ":clear",
];

/// 单词分隔符：补全只替换光标前最后一个分隔符之后的部分
fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '/' | '[' | '(' | '=' | '<' | '>' | '!')
}

/// GraphPath CLI 补全器
///
/// 会话中的路径名和变量名在每次执行后通过 [`PathCompleter::update`] 刷新。
#[derive(Default)]
pub struct PathCompleter {
    paths: RwLock<Vec<String>>,
    variables: RwLock<Vec<String>>,
}

impl PathCompleter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 同步会话中的路径和变量名
    pub fn update(&self, session: &Session) {
        *self.paths.write() = session.registry().names().map(str::to_string).collect();
        *self.variables.write() = session
            .environment()
            .iter()
            .map(|(name, _)| format!("${}", name))
            .collect();
    }

    /// 计算补全起点与候选项
    pub fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<String>) {
        let line_to_cursor = &line[..pos];

        // 控制台命令
        if line_to_cursor.starts_with(':') && !line_to_cursor.contains(' ') {
            let found = CONSOLE_COMMANDS
                .iter()
                .filter(|cmd| cmd.starts_with(line_to_cursor))
                .map(|cmd| cmd.to_string())
                .collect();
            return (0, found);
        }

        let start = line_to_cursor
            .char_indices()
            .filter(|(_, c)| is_delimiter(*c))
            .map(|(i, c)| i + c.len_utf8())
            .last()
            .unwrap_or(0);
        let word = &line_to_cursor[start..];
        if word.is_empty() {
            return (pos, Vec::new());
        }

        if word.starts_with('$') {
            let found = self
                .variables
                .read()
                .iter()
                .filter(|name| name.starts_with(word))
                .cloned()
                .collect();
            return (start, found);
        }

        let found: Vec<String> = self
            .step_names()
            .into_iter()
            .chain(KEYWORDS.iter().map(|kw| kw.to_string()))
            .filter(|name| name.starts_with(word))
            .collect();
        (start, found)
    }

    fn step_names(&self) -> Vec<String> {
        BuiltinStep::ALL
            .iter()
            .map(|step| step.as_str().to_string())
            .chain(self.paths.read().iter().cloned())
            .collect()
    }
}

/// 输入中是否有尚未以 `end` 关闭的 `path` 块
pub fn has_open_block(input: &str) -> bool {
    let mut open = false;
    for line in input.lines() {
        let line = line.trim();
        if line == "end" {
            open = false;
        } else if path_header(line).is_some() {
            open = true;
        }
    }
    open
}

impl Completer for PathCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, found) = self.candidates(line, pos);
        let pairs = found
            .into_iter()
            .map(|c| Pair {
                display: c.clone(),
                replacement: c,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for PathCompleter {
    type Hint = String;
}

impl Highlighter for PathCompleter {}

impl Validator for PathCompleter {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> rustyline::Result<ValidationResult> {
        if has_open_block(ctx.input()) {
            Ok(ValidationResult::Incomplete)
        } else {
            Ok(ValidationResult::Valid(None))
        }
    }
}

impl Helper for PathCompleter {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::query::{Environment, ScriptEvaluator};

    #[test]
    fn test_console_commands() {
        let completer = PathCompleter::new();
        let (start, found) = completer.candidates(":p", 2);
        assert_eq!(start, 0);
        assert_eq!(found, vec![":paths".to_string()]);
    }

    #[test]
    fn test_step_names() {
        let completer = PathCompleter::new();
        let line = "./outE/i";
        let (start, found) = completer.candidates(line, line.len());
        assert_eq!(start, 7);
        assert_eq!(found, vec!["inE".to_string(), "inV".to_string()]);

        let (start, found) = completer.candidates("./b", 3);
        assert_eq!(start, 2);
        assert_eq!(found, vec!["bothV".to_string(), "both".to_string()]);
    }

    #[test]
    fn test_session_names() {
        let graph = Graph::new();
        graph.add_vertex("person");
        let mut session = Session::with_environment(Environment::new());
        ScriptEvaluator::new(&graph)
            .evaluate_session("path knows\n./outE\nend\n$start := g:id(1)", &mut session)
            .unwrap();

        let completer = PathCompleter::new();
        completer.update(&session);

        let (_, found) = completer.candidates("./kn", 4);
        assert_eq!(found, vec!["knows".to_string()]);
        let line = "$x := $st";
        let (start, found) = completer.candidates(line, line.len());
        assert_eq!(start, 6);
        assert_eq!(found, vec!["$start".to_string()]);
    }

    #[test]
    fn test_open_block() {
        assert!(has_open_block("path knows"));
        assert!(has_open_block("path knows\n./outE"));
        assert!(!has_open_block("path knows\n./outE\nend"));
        assert!(!has_open_block("./outE"));
        assert!(!has_open_block("pathology"));
    }
}

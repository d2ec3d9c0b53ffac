//! 控制台命令处理
//!
//! 处理以 : 开头的控制台命令

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use super::printer::{PrintMode, Printer};
use crate::graph::Graph;
use crate::query::Session;

/// 控制台命令执行结果
#[derive(Debug)]
pub enum CommandResult {
    /// 继续运行
    Continue,
    /// 退出程序
    Exit,
    /// 显示消息
    Message(String),
    /// 错误
    Error(String),
}

/// 控制台状态
pub struct ConsoleState {
    pub printer: Printer,
    /// 输出到文件
    pub tee_file: Option<File>,
}

impl ConsoleState {
    pub fn new(mode: PrintMode) -> Self {
        Self {
            printer: Printer::new(mode),
            tee_file: None,
        }
    }

    /// 写入输出（同时写入 stdout 和 tee 文件）
    pub fn write_output(&mut self, content: &str) {
        print!("{}", content);
        if let Some(ref mut file) = self.tee_file {
            let _ = file.write_all(content.as_bytes());
        }
    }
}

impl Default for ConsoleState {
    fn default() -> Self {
        Self::new(PrintMode::Table)
    }
}

/// 解析并执行控制台命令
pub fn execute_console_command(
    input: &str,
    state: &mut ConsoleState,
    session: &mut Session,
    graph: &Graph,
) -> CommandResult {
    let input = input.trim();
    let cmd_line = input.strip_prefix(':').unwrap_or(input);

    let parts: Vec<&str> = cmd_line.splitn(2, ' ').collect();
    let cmd = parts[0].to_lowercase();
    let args = parts.get(1).map(|s| s.trim()).unwrap_or("");

    match cmd.as_str() {
        "help" | "h" => CommandResult::Message(Printer::print_help()),

        "quit" | "q" | "exit" => CommandResult::Exit,

        "vars" => CommandResult::Message(state.printer.print_variables(session)),

        "paths" => CommandResult::Message(state.printer.print_paths(session.registry())),

        "stats" => CommandResult::Message(state.printer.print_stats(
            graph.vertex_count(),
            graph.edge_count(),
            session,
        )),

        "format" => {
            if args.is_empty() {
                return CommandResult::Message(format!("Output format: {}", state.printer.mode()));
            }
            match args.parse::<PrintMode>() {
                Ok(mode) => {
                    state.printer.set_mode(mode);
                    CommandResult::Message(format!("Output format set to {}", mode))
                }
                Err(e) => CommandResult::Error(e),
            }
        }

        "reset" => {
            session.reset();
            CommandResult::Message("Paths and variables cleared, start context restored".to_string())
        }

        "tee" => {
            let args_parts: Vec<&str> = args.split_whitespace().collect();
            let (overwrite, filename) = if args_parts.first() == Some(&"-o") {
                (true, args_parts.get(1).copied())
            } else {
                (false, args_parts.first().copied())
            };

            if let Some(filename) = filename {
                let path = PathBuf::from(filename);
                let file = if overwrite {
                    File::create(&path)
                } else {
                    File::options().create(true).append(true).open(&path)
                };

                match file {
                    Ok(f) => {
                        state.tee_file = Some(f);
                        CommandResult::Message(format!("Logging to {}", filename))
                    }
                    Err(e) => CommandResult::Error(format!("Cannot open file: {}", e)),
                }
            } else {
                CommandResult::Error("Usage: :tee [-o] <filename>".to_string())
            }
        }

        "notee" => {
            if state.tee_file.take().is_some() {
                CommandResult::Message("Stopped logging".to_string())
            } else {
                CommandResult::Message("No active logging".to_string())
            }
        }

        "clear" => {
            print!("\x1B[2J\x1B[1;1H");
            CommandResult::Continue
        }

        _ => CommandResult::Error(format!("Unknown command: {}. Type :help for help.", cmd)),
    }
}

/// 检查输入是否是控制台命令
pub fn is_console_command(input: &str) -> bool {
    input.trim().starts_with(':')
}

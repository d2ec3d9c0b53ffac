//! GraphPath CLI 工具
//!
//! 加载 JSON 图，执行路径脚本或进入交互模式

use anyhow::{anyhow, Context as _};
use clap::Parser;
use colored::Colorize;
use graphpath::cli::{
    check_vertical_display, execute_console_command, is_console_command, CommandResult,
    ConsoleState, PathCompleter, PrintMode, Printer,
};
use graphpath::{Element, Environment, Graph, GraphAccess, GraphLoader, ScriptEvaluator, Session};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "graphpath-cli")]
#[command(version, about = "属性图动态路径语言命令行工具")]
struct Args {
    /// JSON 图文件
    #[arg(short, long)]
    graph: Option<PathBuf>,

    /// 执行脚本文件后退出
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// 执行单条脚本文本后退出
    #[arg(short = 'e', long)]
    execute: Option<String>,

    /// 用于初始化 $_ 的元素 ID，可重复
    #[arg(long = "start")]
    start: Vec<String>,

    /// 输出格式: table, vertical, json
    #[arg(short, long, default_value = "table")]
    format: PrintMode,

    /// 日志级别（RUST_LOG 优先）
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn init_logging(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let graph = Graph::in_memory();
    if let Some(path) = &args.graph {
        let stats = GraphLoader::new(graph.clone())
            .load_file(path)
            .with_context(|| format!("加载图文件失败: {}", path.display()))?;
        info!(
            vertices = stats.vertices_imported,
            edges = stats.edges_imported,
            duration_ms = stats.duration_ms,
            "graph ready"
        );
    }

    let env = seed_environment(&graph, &args.start)?;
    let mut session = Session::with_environment(env);
    let mut state = ConsoleState::new(args.format);

    // 脚本模式
    let script = match (&args.script, &args.execute) {
        (Some(path), _) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("读取脚本失败: {}", path.display()))?,
        ),
        (None, Some(text)) => Some(text.clone()),
        (None, None) => None,
    };
    if let Some(script) = script {
        let output = run_script(&graph, &mut session, &state.printer, &script)?;
        state.write_output(&output);
        return Ok(());
    }

    run_repl(&graph, &mut session, &mut state)
}

/// 按 --start 参数初始化 $_
fn seed_environment(graph: &Graph, ids: &[String]) -> anyhow::Result<Environment> {
    if ids.is_empty() {
        return Ok(Environment::new());
    }
    let elements = ids
        .iter()
        .map(|id| {
            graph
                .fetch_by_id(id)
                .ok_or_else(|| anyhow!("起始元素不存在: {}", id))
        })
        .collect::<anyhow::Result<Vec<Element>>>()?;
    debug!(count = elements.len(), "seeded $_");
    Ok(Environment::new().with_context(elements))
}

fn run_script(
    graph: &Graph,
    session: &mut Session,
    printer: &Printer,
    script: &str,
) -> anyhow::Result<String> {
    let start = Instant::now();
    let result = ScriptEvaluator::new(graph).evaluate_session(script, session)?;
    let elapsed_ms = start.elapsed().as_millis() as u64;

    let rows: Vec<_> = result.iter().filter_map(|e| graph.describe(*e)).collect();
    Ok(printer.print_elements(&rows, elapsed_ms)?)
}

fn history_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".graphpath_history"))
}

fn run_repl(graph: &Graph, session: &mut Session, state: &mut ConsoleState) -> anyhow::Result<()> {
    println!("GraphPath CLI v{}", graphpath::VERSION);
    println!("==============================");
    println!("  顶点数: {}", graph.vertex_count());
    println!("  边数: {}", graph.edge_count());
    println!("\n输入 :help 查看帮助，:quit 退出\n");

    let mut rl: Editor<PathCompleter, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(PathCompleter::new()));
    let history = history_path();
    if let Some(path) = &history {
        let _ = rl.load_history(path);
    }

    loop {
        match rl.readline("graphpath> ") {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(input);

                if is_console_command(input) {
                    match execute_console_command(input, state, session, graph) {
                        CommandResult::Exit => break,
                        CommandResult::Continue => {}
                        CommandResult::Message(msg) => state.write_output(&format!("{}\n", msg)),
                        CommandResult::Error(msg) => eprintln!("{} {}", "错误:".red().bold(), msg),
                    }
                    continue;
                }

                let (script, vertical) = check_vertical_display(input);
                let previous = state.printer.mode();
                if vertical {
                    state.printer.set_mode(PrintMode::Vertical);
                }
                let outcome = run_script(graph, session, &state.printer, &script);
                state.printer.set_mode(previous);

                match outcome {
                    Ok(output) => state.write_output(&output),
                    Err(e) => eprintln!("{} {}", "错误:".red().bold(), e),
                }
                if let Some(helper) = rl.helper() {
                    helper.update(session);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    if let Some(path) = &history {
        let _ = rl.save_history(path);
    }
    println!("再见！");
    Ok(())
}

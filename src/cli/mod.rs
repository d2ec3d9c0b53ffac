//! 命令行交互组件：控制台命令、补全和结果打印

pub mod commands;
pub mod completer;
pub mod printer;

pub use commands::{execute_console_command, is_console_command, CommandResult, ConsoleState};
pub use completer::{has_open_block, PathCompleter};
pub use printer::{check_vertical_display, PrintMode, Printer};

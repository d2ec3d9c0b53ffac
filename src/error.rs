//! 错误类型定义

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("保留名称不能用作路径名: {0}")]
    ReservedName(String),

    #[error("步骤语法错误 `{token}`: {reason}")]
    StepSyntax { token: String, reason: String },

    #[error("谓词语法错误 `{input}`: {reason}")]
    PredicateSyntax { input: String, reason: String },

    #[error("脚本结构错误 (第 {line} 行): {reason}")]
    ScriptSyntax { line: usize, reason: String },

    #[error("变量未绑定: ${0}")]
    UnboundVariable(String),

    #[error("步骤 `{step}` 不能作用于 {element}")]
    InvalidNavigation { step: String, element: String },

    #[error("元素不存在: {0}")]
    ElementNotFound(String),

    #[error("谓词类型不匹配: {left} {op} {right}")]
    PredicateType {
        left: String,
        op: String,
        right: String,
    },

    #[error("路径递归定义: {0}")]
    RecursiveDefinition(String),

    #[error("路径不存在: {0}")]
    PathNotFound(String),

    #[error("第 {line} 行语句 `{text}` 执行失败: {source}")]
    Statement {
        line: usize,
        text: String,
        #[source]
        source: Box<Error>,
    },

    #[error("元素已存在: {0}")]
    ElementAlreadyExists(String),

    #[error("导入错误: {0}")]
    Import(String),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// 剥离语句上下文，返回最内层的错误
    pub fn root(&self) -> &Error {
        match self {
            Error::Statement { source, .. } => source.root(),
            other => other,
        }
    }

    pub(crate) fn step_syntax(token: &str, reason: impl Into<String>) -> Self {
        Error::StepSyntax {
            token: token.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn predicate_syntax(input: &str, reason: impl Into<String>) -> Self {
        Error::PredicateSyntax {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

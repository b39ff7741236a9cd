//! 包管理器相关错误类型

use thiserror::Error;

/// 外部命令执行失败
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("无法启动 `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` 执行失败 (exit={code:?})")]
    Failed {
        command: String,
        code: Option<i32>,
        /// 捕获模式下的合并输出，流式模式下为空
        output: String,
    },
}

impl CommandError {
    /// 映射为本进程的退出码；子进程被信号杀死时返回 1
    pub fn exit_code(&self) -> i32 {
        match self {
            CommandError::Spawn { .. } => 127,
            CommandError::Failed { code, .. } => code.unwrap_or(1),
        }
    }

    /// 失败时捕获到的工具输出
    pub fn output(&self) -> Option<&str> {
        match self {
            CommandError::Failed { output, .. } if !output.trim().is_empty() => Some(output),
            _ => None,
        }
    }
}

/// info 输出无法按包名切分
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("info 输出第 {line_number} 行不属于任何请求的包: {line:?}")]
    UnattributedLine { line_number: usize, line: String },
}

impl ParseError {
    /// EX_SOFTWARE
    pub fn exit_code(&self) -> i32 {
        70
    }
}

//! 子进程执行

use super::error::CommandError;

/// 外部命令执行器
///
/// `capture` 合并 stdout/stderr 并返回输出；`stream` 直接继承终端。
/// 非零退出码一律返回 [`CommandError::Failed`]。
pub trait CommandRunner {
    fn capture(&self, program: &str, args: &[String]) -> Result<String, CommandError>;
    fn stream(&self, program: &str, args: &[String]) -> Result<(), CommandError>;
}

/// 基于 duct 的真实执行器
#[derive(Debug, Clone, Copy, Default)]
pub struct DuctRunner;

pub fn display_command(program: &str, args: &[String]) -> String {
    let mut parts = Vec::with_capacity(args.len() + 1);
    parts.push(program.to_string());
    parts.extend(args.iter().cloned());
    parts.join(" ")
}

impl CommandRunner for DuctRunner {
    fn capture(&self, program: &str, args: &[String]) -> Result<String, CommandError> {
        let command = display_command(program, args);
        log::debug!("capture: {}", command);

        let output = duct::cmd(program, args)
            .stderr_to_stdout()
            .stdout_capture()
            .unchecked()
            .run()
            .map_err(|source| CommandError::Spawn {
                command: command.clone(),
                source,
            })?;

        let text = String::from_utf8_lossy(&output.stdout).to_string();
        if !output.status.success() {
            return Err(CommandError::Failed {
                command,
                code: output.status.code(),
                output: text,
            });
        }
        Ok(text)
    }

    fn stream(&self, program: &str, args: &[String]) -> Result<(), CommandError> {
        let command = display_command(program, args);
        log::debug!("stream: {}", command);

        let output = duct::cmd(program, args)
            .unchecked()
            .run()
            .map_err(|source| CommandError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(CommandError::Failed {
                command,
                code: output.status.code(),
                output: String::new(),
            });
        }
        Ok(())
    }
}

//! 包管理器模块 — 对 brew cask 的封装

pub mod error;
pub mod parser;
pub mod runner;
pub mod strategy;
pub mod types;

// 重新导出常用类型
pub use error::{CommandError, ParseError};
pub use runner::{CommandRunner, DuctRunner};
pub use types::{Package, UpgradeState};

use crate::config::CaskStyle;
use parser::{parse_installed_list, split_info_records, strip_terminal_escapes};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Brew<R> {
    runner: R,
    program: String,
    style: CaskStyle,
}

impl<R: CommandRunner> Brew<R> {
    pub fn new(runner: R, program: impl Into<String>, style: CaskStyle) -> Self {
        Self {
            runner,
            program: program.into(),
            style,
        }
    }

    #[cfg(test)]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// `brew cask <action> <names...>` 或 `brew <action> --cask <names...>`
    fn cask_args(&self, action: &str, names: &[String]) -> Vec<String> {
        let mut args = match self.style {
            CaskStyle::Subcommand => vec!["cask".to_string(), action.to_string()],
            CaskStyle::Flag => vec![action.to_string(), "--cask".to_string()],
        };
        args.extend(names.iter().cloned());
        args
    }

    // ===== 查询 =====

    /// 已安装的 cask 列表，保持工具输出的顺序
    pub fn list_installed(&self) -> Result<Vec<String>, CommandError> {
        let output = self
            .runner
            .capture(&self.program, &self.cask_args("list", &[]))?;
        Ok(parse_installed_list(&strip_terminal_escapes(&output)))
    }

    /// 一次 info 调用取回所有包的原始输出
    pub fn info(&self, names: &[String]) -> Result<String, CommandError> {
        let output = self
            .runner
            .capture(&self.program, &self.cask_args("info", names))?;
        Ok(strip_terminal_escapes(&output))
    }

    /// 批量查询并按包名切分，空列表不调用外部命令
    pub fn info_records(&self, names: &[String]) -> anyhow::Result<HashMap<String, Vec<String>>> {
        if names.is_empty() {
            return Ok(HashMap::new());
        }
        let output = self.info(names)?;
        Ok(split_info_records(&output, names)?)
    }

    // ===== 变更 =====

    pub fn install(&self, name: &str) -> Result<(), CommandError> {
        self.runner
            .stream(&self.program, &self.cask_args("install", &[name.to_string()]))
    }

    pub fn uninstall(&self, name: &str) -> Result<(), CommandError> {
        self.runner
            .stream(&self.program, &self.cask_args("uninstall", &[name.to_string()]))
    }

    /// 刷新仓库索引 (brew update)
    pub fn update(&self) -> Result<(), CommandError> {
        self.runner.stream(&self.program, &["update".to_string()])
    }

    /// 清理旧版本和缓存 (brew cleanup)
    pub fn cleanup(&self) -> Result<(), CommandError> {
        self.runner.stream(&self.program, &["cleanup".to_string()])
    }

    /// 把 .app 目录的属主改回当前用户
    pub fn reclaim_ownership(&self, path: &Path) -> Result<(), CommandError> {
        let uid = unsafe { libc::getuid() };
        let args = vec![
            "chown".to_string(),
            "-R".to_string(),
            uid.to_string(),
            path.display().to_string(),
        ];
        self.runner.stream("sudo", &args)
    }
}

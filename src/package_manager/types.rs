//! 包模型与升级判定

use super::parser::{installed_version, repo_version};
use super::strategy::UpgradeStrategy;

/// 升级判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeState {
    /// 未安装，任何情况下都不升级
    NotInstalled,
    UpToDate,
    UpgradeAvailable,
}

/// 单个 cask 包，由批量 info 输出中属于它的那几行构造
#[derive(Debug, Clone)]
pub struct Package {
    pub name: String,
    pub repo_version: Option<String>,
    pub installed_version: Option<String>,
    pub strategy: UpgradeStrategy,
}

impl Package {
    pub fn from_info(name: &str, lines: &[String]) -> Self {
        Self {
            name: name.to_string(),
            repo_version: repo_version(lines),
            installed_version: installed_version(lines),
            strategy: UpgradeStrategy::for_package(name),
        }
    }

    pub fn is_installed(&self) -> bool {
        self.installed_version.is_some()
    }

    /// 纯字符串比较，不做语义化版本排序。
    /// 仓库版本缺失而本地已安装时同样视为有更新。
    pub fn is_upgrade_available(&self) -> bool {
        self.installed_version.is_some() && self.repo_version != self.installed_version
    }

    pub fn state(&self) -> UpgradeState {
        if !self.is_installed() {
            UpgradeState::NotInstalled
        } else if self.is_upgrade_available() {
            UpgradeState::UpgradeAvailable
        } else {
            UpgradeState::UpToDate
        }
    }

    pub fn should_upgrade(&self, force: bool) -> bool {
        match self.state() {
            UpgradeState::NotInstalled => false,
            UpgradeState::UpToDate => force,
            UpgradeState::UpgradeAvailable => true,
        }
    }
}

//! 按包名选择的升级策略

use super::error::CommandError;
use super::runner::CommandRunner;
use super::Brew;
use std::path::Path;

/// 卸载前需要额外处理的包
///
/// 某些 .app 在安装后被 root 接管，普通用户直接卸载会报权限错误，
/// 需要先把属主改回当前用户。
const SPECIAL_CASES: &[(&str, UpgradeStrategy)] = &[(
    "google-chrome",
    UpgradeStrategy::ReclaimOwnership {
        bundle: "Google Chrome.app",
    },
)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeStrategy {
    /// 直接卸载再安装
    Standard,
    /// 卸载前先 `sudo chown -R <uid>` 应用目录
    ReclaimOwnership { bundle: &'static str },
}

impl UpgradeStrategy {
    pub fn for_package(name: &str) -> Self {
        SPECIAL_CASES
            .iter()
            .find(|(special, _)| *special == name)
            .map(|(_, strategy)| *strategy)
            .unwrap_or(UpgradeStrategy::Standard)
    }

    pub fn uninstall<R: CommandRunner>(
        &self,
        brew: &Brew<R>,
        applications_dir: &Path,
        name: &str,
    ) -> Result<(), CommandError> {
        if let UpgradeStrategy::ReclaimOwnership { bundle } = self {
            brew.reclaim_ownership(&applications_dir.join(bundle))?;
        }
        brew.uninstall(name)
    }
}

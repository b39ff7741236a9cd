//! 批量检查与升级

use crate::console::Console;
use crate::package_manager::{Brew, CommandRunner, Package, UpgradeState};
use anyhow::Result;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default)]
pub struct UpgradeOptions {
    /// 处理前先 `brew update`
    pub update: bool,
    /// 处理后 `brew cleanup`
    pub cleanup: bool,
    /// 版本相同也重装
    pub force: bool,
    /// 只报告，不卸载/安装
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub checked: usize,
    pub upgraded: usize,
    pub not_installed: usize,
}

pub struct Upgrader<'a, R, W: Write> {
    brew: &'a Brew<R>,
    console: &'a mut Console<W>,
    applications_dir: &'a Path,
    options: UpgradeOptions,
}

impl<'a, R: CommandRunner, W: Write> Upgrader<'a, R, W> {
    pub fn new(
        brew: &'a Brew<R>,
        console: &'a mut Console<W>,
        applications_dir: &'a Path,
        options: UpgradeOptions,
    ) -> Self {
        Self {
            brew,
            console,
            applications_dir,
            options,
        }
    }

    /// 处理单个指定的包，或全部已安装的包。
    /// 任何外部命令失败都会立即中止整个流程。
    pub fn run(&mut self, program: Option<&str>) -> Result<RunSummary> {
        if self.options.update {
            self.console.status("更新 cask 索引 ...")?;
            self.brew.update()?;
        }

        let names = match program {
            Some(name) => vec![name.to_string()],
            None => self.brew.list_installed()?,
        };
        log::info!("待检查 {} 个包", names.len());

        let mut records = self.brew.info_records(&names)?;
        let mut summary = RunSummary::default();

        for name in &names {
            let lines = records.remove(name).unwrap_or_default();
            let package = Package::from_info(name, &lines);
            summary.checked += 1;

            if self.check_and_upgrade(&package)? {
                summary.upgraded += 1;
            } else if package.state() == UpgradeState::NotInstalled {
                summary.not_installed += 1;
            }
        }

        if self.options.cleanup {
            self.console.status("清理旧版本 ...")?;
            self.brew.cleanup()?;
        }

        Ok(summary)
    }

    /// 返回是否执行了升级
    fn check_and_upgrade(&mut self, package: &Package) -> Result<bool> {
        self.console.partial(&format!("{} ... ", package.name))?;
        let state = package.state();
        log::info!("{}: {:?}", package.name, state);

        match package.installed_version.as_deref() {
            Some(version) => self.console.line(version)?,
            None => self.console.line("未安装")?,
        }

        if !package.should_upgrade(self.options.force) {
            return Ok(false);
        }

        let installed = package.installed_version.as_deref().unwrap_or_default();
        let repo = match package.repo_version.as_deref() {
            Some(version) if !version.is_empty() => version,
            _ => {
                log::warn!("{}: info 输出中没有仓库版本", package.name);
                self.console
                    .warn(&format!("{} 的仓库版本未知，仍按有更新处理", package.name))?;
                "?"
            }
        };

        if state == UpgradeState::UpToDate {
            self.console
                .status(&format!("强制重装 {}: {} ...", package.name, installed))?;
        } else {
            self.console.status(&format!(
                "升级 {}: {} -> {} ...",
                package.name, installed, repo
            ))?;
        }

        if self.options.dry_run {
            self.console.line("(dry run) 跳过卸载与安装")?;
            return Ok(false);
        }

        self.console.status("卸载旧版本 ...")?;
        package
            .strategy
            .uninstall(self.brew, self.applications_dir, &package.name)?;
        self.console.status("安装新版本 ...")?;
        self.brew.install(&package.name)?;
        self.console.line("完成。")?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CaskStyle;
    use crate::package_manager::runner::fake::RecordingRunner;
    use crate::package_manager::CommandError;

    const KEEPASSX_OUTDATED: &str =
        "keepassx: 2.0.3\n\n/usr/local/Caskroom/keepassx/2.0.2 (217B)\n";

    fn brew(runner: RecordingRunner) -> Brew<RecordingRunner> {
        Brew::new(runner, "brew", CaskStyle::Subcommand)
    }

    fn run(
        brew: &Brew<RecordingRunner>,
        program: Option<&str>,
        options: UpgradeOptions,
    ) -> (Result<RunSummary>, String) {
        let mut console = Console::new(Vec::new(), "==>", false);
        let result =
            Upgrader::new(brew, &mut console, Path::new("/Applications"), options).run(program);
        let text = String::from_utf8(console.into_inner()).unwrap();
        (result, text)
    }

    #[test]
    fn outdated_single_package_is_reinstalled() {
        let brew = brew(RecordingRunner::new().respond("brew cask info keepassx", KEEPASSX_OUTDATED));
        let (result, text) = run(&brew, Some("keepassx"), UpgradeOptions::default());

        assert_eq!(
            result.unwrap(),
            RunSummary {
                checked: 1,
                upgraded: 1,
                not_installed: 0
            }
        );
        assert_eq!(
            brew.runner().calls(),
            vec![
                "brew cask info keepassx",
                "brew cask uninstall keepassx",
                "brew cask install keepassx",
            ]
        );
        assert!(text.starts_with("keepassx ... 2.0.2\n==> 升级 keepassx: 2.0.2 -> 2.0.3 ...\n"));
        assert!(text.ends_with("完成。\n"));
    }

    #[test]
    fn empty_install_line_means_not_installed() {
        let brew = brew(RecordingRunner::new().respond("brew cask info foo", "foo: 1.0.0\n\n\n"));
        let (result, text) = run(
            &brew,
            Some("foo"),
            UpgradeOptions {
                force: true,
                ..Default::default()
            },
        );

        assert_eq!(result.unwrap().not_installed, 1);
        assert_eq!(brew.runner().calls(), vec!["brew cask info foo"]);
        assert_eq!(text, "foo ... 未安装\n");
    }

    #[test]
    fn all_installed_use_one_info_call_in_list_order() {
        let runner = RecordingRunner::new()
            .respond("brew cask list", "zulu\nalfa\n")
            .respond(
                "brew cask info zulu alfa",
                "alfa: 1.1\nhttps://alfa.example/\n/usr/local/Caskroom/alfa/1.0 (1B)\n\
                 zulu: 3.0\nhttps://zulu.example/\n/usr/local/Caskroom/zulu/3.0 (3B)\n",
            );
        let brew = brew(runner);
        let (result, text) = run(&brew, None, UpgradeOptions::default());

        assert_eq!(
            result.unwrap(),
            RunSummary {
                checked: 2,
                upgraded: 1,
                not_installed: 0
            }
        );
        assert_eq!(
            brew.runner().calls(),
            vec![
                "brew cask list",
                "brew cask info zulu alfa",
                "brew cask uninstall alfa",
                "brew cask install alfa",
            ]
        );
        assert!(text.starts_with("zulu ... 3.0\nalfa ... 1.0\n"));
    }

    #[test]
    fn up_to_date_is_skipped_unless_forced() {
        let info = "keepassx: 2.0.2\n\n/usr/local/Caskroom/keepassx/2.0.2 (217B)\n";

        let skipped = brew(RecordingRunner::new().respond("brew cask info keepassx", info));
        let (result, _) = run(&skipped, Some("keepassx"), UpgradeOptions::default());
        assert_eq!(result.unwrap().upgraded, 0);
        assert_eq!(skipped.runner().calls(), vec!["brew cask info keepassx"]);

        let forced = brew(RecordingRunner::new().respond("brew cask info keepassx", info));
        let (result, text) = run(
            &forced,
            Some("keepassx"),
            UpgradeOptions {
                force: true,
                ..Default::default()
            },
        );
        assert_eq!(result.unwrap().upgraded, 1);
        assert_eq!(forced.runner().calls().len(), 3);
        assert!(text.contains("==> 强制重装 keepassx: 2.0.2 ..."));
    }

    #[test]
    fn special_package_reclaims_ownership_first() {
        let info = "google-chrome: 120.0\nhttps://www.google.com/chrome/\n\
                    /usr/local/Caskroom/google-chrome/119.0 (1.2KB)\n";
        let brew = brew(RecordingRunner::new().respond("brew cask info google-chrome", info));
        let (result, _) = run(&brew, Some("google-chrome"), UpgradeOptions::default());
        result.unwrap();

        let calls = brew.runner().calls();
        assert_eq!(calls.len(), 4);
        assert!(calls[1].starts_with("sudo chown -R "));
        assert!(calls[1].ends_with("/Applications/Google Chrome.app"));
        assert_eq!(calls[2], "brew cask uninstall google-chrome");
        assert_eq!(calls[3], "brew cask install google-chrome");
    }

    #[test]
    fn failed_install_aborts_remaining_packages() {
        let runner = RecordingRunner::new()
            .respond("brew cask list", "alfa\nbravo\n")
            .respond(
                "brew cask info alfa bravo",
                "alfa: 2\n\n/usr/local/Caskroom/alfa/1 (1B)\nbravo: 2\n\n/usr/local/Caskroom/bravo/1 (1B)\n",
            )
            .fail("brew cask install alfa", 5);
        let brew = brew(runner);
        let (result, _) = run(
            &brew,
            None,
            UpgradeOptions {
                cleanup: true,
                ..Default::default()
            },
        );

        let err = result.unwrap_err();
        let command_err = err.downcast_ref::<CommandError>().unwrap();
        assert_eq!(command_err.exit_code(), 5);
        assert_eq!(
            brew.runner().calls(),
            vec![
                "brew cask list",
                "brew cask info alfa bravo",
                "brew cask uninstall alfa",
                "brew cask install alfa",
            ]
        );
    }

    #[test]
    fn update_and_cleanup_wrap_the_batch() {
        let brew = brew(RecordingRunner::new().respond(
            "brew cask info keepassx",
            "keepassx: 2.0.2\n\nNot installed\n",
        ));
        let (result, text) = run(
            &brew,
            Some("keepassx"),
            UpgradeOptions {
                update: true,
                cleanup: true,
                ..Default::default()
            },
        );

        result.unwrap();
        assert_eq!(
            brew.runner().calls(),
            vec!["brew update", "brew cask info keepassx", "brew cleanup"]
        );
        assert!(text.starts_with("==> 更新 cask 索引 ...\n"));
        assert!(text.ends_with("==> 清理旧版本 ...\n"));
    }

    #[test]
    fn dry_run_reports_without_changes() {
        let brew = brew(RecordingRunner::new().respond("brew cask info keepassx", KEEPASSX_OUTDATED));
        let (result, text) = run(
            &brew,
            Some("keepassx"),
            UpgradeOptions {
                dry_run: true,
                ..Default::default()
            },
        );

        assert_eq!(result.unwrap().upgraded, 0);
        assert_eq!(brew.runner().calls(), vec!["brew cask info keepassx"]);
        assert!(text.contains("==> 升级 keepassx: 2.0.2 -> 2.0.3 ..."));
        assert!(text.contains("(dry run)"));
    }

    #[test]
    fn blank_repo_version_still_upgrades() {
        let brew = brew(RecordingRunner::new().respond(
            "brew cask info keepassx",
            "keepassx: \n\n/usr/local/Caskroom/keepassx/2.0.2 (217B)\n",
        ));
        let (result, text) = run(&brew, Some("keepassx"), UpgradeOptions::default());
        assert_eq!(result.unwrap().upgraded, 1);
        assert!(text.contains("警告: keepassx 的仓库版本未知"));
        assert!(text.contains("==> 升级 keepassx: 2.0.2 -> ? ..."));
    }

    #[test]
    fn package_missing_from_info_output_is_not_installed() {
        let brew = brew(RecordingRunner::new());
        let (result, text) = run(&brew, Some("ghost"), UpgradeOptions::default());
        assert_eq!(result.unwrap().not_installed, 1);
        assert_eq!(text, "ghost ... 未安装\n");
    }

    #[test]
    fn leading_noise_in_info_output_is_fatal() {
        let brew = brew(RecordingRunner::new().respond(
            "brew cask info keepassx",
            "Error: Unknown command: cask\n",
        ));
        let (result, _) = run(&brew, Some("keepassx"), UpgradeOptions::default());
        let err = result.unwrap_err();
        assert!(err.downcast_ref::<crate::package_manager::ParseError>().is_some());
        assert_eq!(brew.runner().calls(), vec!["brew cask info keepassx"]);
    }
}

use clap::Parser;
use std::path::PathBuf;

use crate::upgrade::UpgradeOptions;

#[derive(Parser, Debug)]
#[command(name = "brew-cask-upgrade")]
#[command(about = "Check versions and upgrade brew cask programs.", long_about = None)]
pub struct Cli {
    /// program to check and update if necessary; all installed programs when omitted
    pub program: Option<String>,

    /// run `brew update` before checking
    #[arg(short, long)]
    pub update: bool,

    /// run `brew cleanup` after upgrading
    #[arg(short, long)]
    pub cleanup: bool,

    /// reinstall even when the versions match
    #[arg(short, long)]
    pub force: bool,

    /// only report what would be upgraded
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// alternate config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    pub fn options(&self) -> UpgradeOptions {
        UpgradeOptions {
            update: self.update,
            cleanup: self.cleanup,
            force: self.force,
            dry_run: self.dry_run,
        }
    }
}

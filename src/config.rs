use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// brew 调用 cask 命令的方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaskStyle {
    /// `brew cask info foo`
    Subcommand,
    /// `brew info --cask foo`
    Flag,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub brew: String,
    pub cask_style: CaskStyle,
    pub applications_dir: PathBuf,
    pub marker: String,
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            brew: "brew".to_string(),
            cask_style: CaskStyle::Subcommand,
            applications_dir: PathBuf::from("/Applications"),
            marker: "==>".to_string(),
            color: true,
        }
    }
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".config/brew-cask-upgrade/config.toml")
    }

    /// 读取配置；显式指定的路径必须存在，默认路径不存在时使用默认值
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => Self::load_or_default(),
        }
    }

    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::default_path();
        if config_path.exists() {
            Self::from_file(&config_path)
        } else {
            log::debug!("配置文件 {} 不存在，使用默认配置", config_path.display());
            Ok(Self::default())
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("无法读取配置文件 {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("配置文件格式错误 {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

mod cli;
mod config;
mod console;
mod package_manager;
mod upgrade;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use console::Console;
use package_manager::{Brew, CommandError, DuctRunner, ParseError};
use upgrade::Upgrader;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        std::process::exit(report_error(&err));
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = config::Config::load(cli.config.as_deref())?;
    log::debug!("config: {:?}", config);

    let brew = Brew::new(DuctRunner, config.brew.clone(), config.cask_style);
    let mut console = Console::stdout(&config.marker, config.color && !cli.no_color);

    let summary = Upgrader::new(&brew, &mut console, &config.applications_dir, cli.options())
        .run(cli.program.as_deref())?;

    console.status(&format!(
        "检查 {} 个，升级 {} 个，未安装 {} 个",
        summary.checked, summary.upgraded, summary.not_installed
    ))?;
    Ok(())
}

/// 输出错误并返回退出码：外部命令失败时沿用其退出码
fn report_error(err: &anyhow::Error) -> i32 {
    if let Some(command_err) = err.downcast_ref::<CommandError>() {
        if let Some(output) = command_err.output() {
            print!("{}", output);
        }
        eprintln!("错误: {}", command_err);
        return command_err.exit_code();
    }
    if let Some(parse_err) = err.downcast_ref::<ParseError>() {
        eprintln!("内部错误: {}", parse_err);
        return parse_err.exit_code();
    }
    eprintln!("错误: {:#}", err);
    1
}

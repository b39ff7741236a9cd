//! 终端输出

use anstyle::{AnsiColor, Effects, Style};
use std::io::{self, IsTerminal, Write};

/// 进度输出，状态行带前缀标记
pub struct Console<W: Write> {
    out: W,
    marker: String,
    color: bool,
}

impl Console<io::Stdout> {
    /// 标准输出；非终端或设置了 `NO_COLOR` 时不上色
    pub fn stdout(marker: &str, color: bool) -> Self {
        let stdout = io::stdout();
        let color = color && stdout.is_terminal() && std::env::var_os("NO_COLOR").is_none();
        Self::new(stdout, marker, color)
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W, marker: &str, color: bool) -> Self {
        Self {
            out,
            marker: marker.to_string(),
            color,
        }
    }

    /// `==> message`
    pub fn status(&mut self, message: &str) -> io::Result<()> {
        let marker = self.paint(marker_style(), &self.marker);
        writeln!(self.out, "{} {}", marker, message)
    }

    /// 不带标记的普通行
    pub fn line(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{}", message)
    }

    /// 不换行，供后续 `line` 补全，如 `keepassx ... 2.0.2`
    pub fn partial(&mut self, message: &str) -> io::Result<()> {
        write!(self.out, "{}", message)?;
        self.out.flush()
    }

    pub fn warn(&mut self, message: &str) -> io::Result<()> {
        let badge = self.paint(warn_style(), "警告:");
        writeln!(self.out, "{} {}", badge, message)
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, style: Style, text: &str) -> String {
        if self.color {
            format!("{}{}{}", style.render(), text, style.render_reset())
        } else {
            text.to_string()
        }
    }
}

fn marker_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::Blue.into()))
        .effects(Effects::BOLD)
}

fn warn_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::Yellow.into()))
        .effects(Effects::BOLD)
}

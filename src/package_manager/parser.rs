//! brew cask 输出解析函数

use super::error::ParseError;
use std::collections::HashMap;

/// 清理终端输出中的 ANSI 转义序列和 `\r`
///
/// 与展示用的清理不同，这里保留空行：info 记录按行号取字段，空行也占一行。
pub fn strip_terminal_escapes(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\x1b' => {
                if chars.peek() == Some(&'[') {
                    chars.next();
                    while let Some(&next) = chars.peek() {
                        chars.next();
                        if next.is_ascii_alphabetic() {
                            break;
                        }
                    }
                }
            }
            '\r' => {}
            c if c.is_control() && c != '\n' && c != '\t' => {}
            _ => result.push(c),
        }
    }

    result
}

/// 解析 `brew cask list` 的输出：每行一个包名，忽略空行
pub fn parse_installed_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// 把批量 `brew cask info a b c` 的输出按包名切分成记录。
///
/// 某行第一个冒号之前的文本等于请求的包名时，从该行开始新的记录；
/// 之后的每一行（包括这一行本身）都归入当前记录，直到下一个记录头。
/// 出现在第一个记录头之前的行无法归属，直接报错。
pub fn split_info_records(
    output: &str,
    names: &[String],
) -> Result<HashMap<String, Vec<String>>, ParseError> {
    let mut records: HashMap<String, Vec<String>> = HashMap::new();
    let mut current: Option<String> = None;

    for (index, line) in output.lines().enumerate() {
        if let Some((head, _)) = line.split_once(':') {
            if let Some(name) = names.iter().find(|n| n.as_str() == head) {
                records.entry(name.clone()).or_default();
                current = Some(name.clone());
            }
        }

        let Some(name) = current.as_ref() else {
            return Err(ParseError::UnattributedLine {
                line_number: index + 1,
                line: line.to_string(),
            });
        };
        if let Some(lines) = records.get_mut(name) {
            lines.push(line.to_string());
        }
    }

    Ok(records)
}

/// 仓库版本：第 0 行 `name: 2.0.3 (auto_updates)` 中冒号后的第一个词
pub fn repo_version(lines: &[String]) -> Option<String> {
    let first = lines.first()?;
    let (_, rest) = first.split_once(':')?;
    let rest = rest.trim();
    let version = rest.split_once(' ').map_or(rest, |(v, _)| v);
    Some(version.trim().to_string())
}

/// 已安装版本：第 2 行 `/usr/local/Caskroom/name/2.0.2 (217B)` 路径的最后一段
///
/// 该行为 `Not installed`（不区分大小写）或取出的末段为空时视为未安装。
pub fn installed_version(lines: &[String]) -> Option<String> {
    let line = lines.get(2)?;
    if line.trim().eq_ignore_ascii_case("not installed") {
        return None;
    }
    let token = line.split(' ').next().unwrap_or_default();
    let version = token.rsplit('/').next().unwrap_or_default();
    if version.is_empty() {
        None
    } else {
        Some(version.to_string())
    }
}

// src/ui.rs

use crate::{constants, controller::View, models::HistoryEntry, symbols, utils};
use colored::*;
use log::warn;
use std::io::{self, Write};

pub fn print_header(title: &str) {
    println!("\n{}", "═".repeat(constants::UI_WIDTH));
    println!(" {}", title.cyan().bold());
    println!("{}", "═".repeat(constants::UI_WIDTH));
}

pub fn print_sub_header(title: &str) {
    println!("\n--- {} ---", title.bold());
}

pub fn prompt(message: &str, default: Option<&str>) -> io::Result<String> {
    let default_str = default.map_or("".to_string(), |d| format!(" (默认: {})", d));
    print!("\n>>> {}{}: ", message, default_str);
    io::stdout().flush()?;
    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        // 输入流已关闭
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
    }
    let input = input.trim().to_string();
    if input.is_empty() {
        Ok(default.unwrap_or("").to_string())
    } else {
        Ok(input)
    }
}

pub fn confirm(question: &str, default_yes: bool) -> bool {
    let options = if default_yes { "(Y/n)" } else { "(y/N)" };
    loop {
        match prompt(&format!("{} {}", question, options), None) {
            Ok(choice) => {
                let choice = choice.to_lowercase();
                if choice == "y" {
                    return true;
                }
                if choice == "n" {
                    return false;
                }
                if choice.is_empty() {
                    return default_yes;
                }
                println!("{}", "无效输入，请输入 'y' 或 'n'。".red());
            }
            Err(_) => return false,
        }
    }
}

pub fn selection_menu(
    options: &[String],
    title: &str,
    instructions: &str,
    default_choice: &str,
) -> String {
    println!("\n┌{}┐", "─".repeat(constants::UI_WIDTH - 2));
    println!("  {}", title.cyan().bold());
    println!("├{}┤", "─".repeat(constants::UI_WIDTH - 2));

    let pad = options.len().to_string().len();
    for (i, option) in options.iter().enumerate() {
        println!(
            "  [{}] {}",
            format!("{:<pad$}", i + 1, pad = pad).yellow(),
            option
        );
    }

    println!("├{}┤", "─".repeat(constants::UI_WIDTH - 2));
    println!("  {} (按 {} 可取消)", instructions, *symbols::CTRL_C);
    println!("└{}┘", "─".repeat(constants::UI_WIDTH - 2));

    prompt("请输入你的选择", Some(default_choice)).unwrap_or_default()
}

/// 从菜单中选出一项，无效输入返回 `None`
pub fn choose_one(options: &[String], title: &str, default_index: usize) -> Option<String> {
    if options.is_empty() {
        return None;
    }
    let default_choice = (default_index.min(options.len() - 1) + 1).to_string();
    let input = selection_menu(options, title, "请输入一个数字", &default_choice);
    match input.trim().parse::<usize>() {
        Ok(idx) if idx > 0 && idx <= options.len() => Some(options[idx - 1].clone()),
        _ => None,
    }
}

/// 终端中的“页面”：把控制器的每次状态变化打印出来
#[derive(Debug, Default)]
pub struct TerminalView {
    open_browser: bool,
    preview_source: Option<String>,
    history: Vec<HistoryEntry>,
    resolutions: Vec<String>,
}

impl TerminalView {
    pub fn new(open_browser: bool) -> Self {
        Self {
            open_browser,
            ..Default::default()
        }
    }

    pub fn resolutions(&self) -> &[String] {
        &self.resolutions
    }

    pub fn print_history(&self) {
        if self.history.is_empty() {
            return;
        }
        print_sub_header("本次会话的下载记录");
        for (i, entry) in self.history.iter().enumerate() {
            println!(
                "  {}. {} {}",
                i + 1,
                entry.label.bold(),
                utils::truncate_text(&entry.file, constants::URL_TRUNCATE_LENGTH).underline()
            );
        }
    }
}

impl View for TerminalView {
    fn set_message(&mut self, message: &str) {
        println!("{} {}", *symbols::INFO, message);
    }

    fn set_preview_source(&mut self, source: &str) {
        self.preview_source = Some(source.to_string());
    }

    // 终端没有可隐藏的播放器，只在显示时打印
    fn set_preview_visible(&mut self, visible: bool) {
        if let (true, Some(source)) = (visible, &self.preview_source) {
            println!("{} 预览: {}", *symbols::OK, source.underline());
        }
    }

    fn append_history(&mut self, entry: HistoryEntry) {
        println!("{} {}: {}", *symbols::OK, entry.label, entry.file.underline());
        self.history.push(entry);
    }

    fn show_history(&mut self) {
        self.print_history();
    }

    fn replace_resolutions(&mut self, resolutions: &[String]) {
        self.resolutions = resolutions.to_vec();
    }

    fn open_target(&mut self, target: &str) {
        if target.is_empty() {
            return;
        }
        println!("{} {}", *symbols::INFO, target.underline());
        if self.open_browser
            && let Err(e) = open::that(target)
        {
            warn!("无法在浏览器中打开 '{}': {}", target, e);
            eprintln!("{} 无法打开浏览器: {}", *symbols::WARN, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_view_keeps_history_and_latest_options() {
        let mut view = TerminalView::new(false);
        view.set_preview_source("p.mp4");
        view.set_preview_visible(true);
        view.append_history(HistoryEntry::new("a.mp4", "720p"));
        view.append_history(HistoryEntry::new("b.mp4", "1080p"));
        view.replace_resolutions(&["1080p".to_string(), "720p".to_string()]);
        view.replace_resolutions(&["360p".to_string()]);

        assert_eq!(view.preview_source.as_deref(), Some("p.mp4"));
        assert_eq!(view.history.len(), 2);
        assert_eq!(view.history[1].label, "Download (1080p)");
        assert_eq!(view.resolutions().to_vec(), vec!["360p"]);
    }
}

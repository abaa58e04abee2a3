//! Log formatting and output with ANSI colors and text wrapping
//!
//! Console lines go to stderr, plain lines go to the log file.

use super::file::write_to_file;
use super::tags::LogTag;
use chrono::Local;
use colored::*;
use std::io::{stderr, Write};

/// Log format widths for alignment
const TAG_WIDTH: usize = 10;
const LOG_TYPE_WIDTH: usize = 8;
const TOTAL_PREFIX_WIDTH: usize = TAG_WIDTH + LOG_TYPE_WIDTH + 6;

/// Maximum line length before wrapping
const MAX_LINE_LENGTH: usize = 145;

/// Format and output a log message
pub fn format_and_log(tag: LogTag, log_type: &str, message: &str) {
    let now = Local::now();
    let time = now.format("%H:%M:%S").to_string();
    let timestamp = now.format("%Y-%m-%d %H:%M:%S").to_string();

    let base_line = format!(
        "{} [{}] [{}] ",
        time.dimmed(),
        format_tag(&tag),
        format_log_type(log_type)
    );

    let available_space = MAX_LINE_LENGTH.saturating_sub(TOTAL_PREFIX_WIDTH + time.len() + 1).max(50);
    let chunks = wrap_text(message, available_space);
    let tag_clean = tag.to_plain_string();

    let continuation_prefix = " ".repeat(TOTAL_PREFIX_WIDTH + time.len() + 1);
    for (i, chunk) in chunks.iter().enumerate() {
        if i == 0 {
            print_stderr_safe(&format!("{}{}", base_line, chunk));
        } else {
            print_stderr_safe(&format!("{}{}", continuation_prefix, chunk));
        }
        write_to_file(&format!("{} [{}] [{}] {}", timestamp, tag_clean, log_type, chunk));
    }
}

fn format_tag(tag: &LogTag) -> ColoredString {
    let label = format!("{:<width$}", tag.to_plain_string(), width = TAG_WIDTH);
    match tag {
        LogTag::System => label.bright_yellow().bold(),
        LogTag::Config => label.bright_white().bold(),
        LogTag::Rpc => label.bright_cyan().bold(),
        LogTag::Wallet => label.bright_magenta().bold(),
        LogTag::Tokens => label.bright_cyan().bold(),
        LogTag::Metadata => label.bright_blue().bold(),
        LogTag::Swap => label.bright_magenta().bold(),
        LogTag::Transactions => label.bright_blue().bold(),
        LogTag::Events => label.bright_green().bold(),
        LogTag::Other(_) => label.white().bold(),
    }
}

fn format_log_type(log_type: &str) -> ColoredString {
    let label = format!("{:<width$}", log_type, width = LOG_TYPE_WIDTH);
    match log_type {
        "ERROR" => label.bright_red().bold(),
        "WARNING" => label.yellow().bold(),
        "DEBUG" | "VERBOSE" => label.dimmed(),
        _ => label.white().bold(),
    }
}

fn print_stderr_safe(message: &str) {
    let mut handle = stderr().lock();
    let _ = writeln!(handle, "{}", message);
}

/// Wrap text at word boundaries, respecting existing newlines
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let mut result = Vec::new();

    for line in text.split('\n') {
        if line.chars().count() <= max_width {
            result.push(line.to_string());
            continue;
        }

        let mut current = String::new();
        for word in line.split_whitespace() {
            let word_len = word.chars().count();
            let current_len = current.chars().count();

            if word_len > max_width {
                if !current.is_empty() {
                    result.push(std::mem::take(&mut current));
                }
                let chars: Vec<char> = word.chars().collect();
                result.extend(chars.chunks(max_width).map(|c| c.iter().collect::<String>()));
            } else if current.is_empty() {
                current = word.to_string();
            } else if current_len + word_len + 1 <= max_width {
                current.push(' ');
                current.push_str(word);
            } else {
                result.push(std::mem::replace(&mut current, word.to_string()));
            }
        }

        if !current.is_empty() {
            result.push(current);
        }
    }

    if result.is_empty() {
        result.push(String::new());
    }

    result
}

//! Terminal styling for status lines and summaries

/// ANSI color codes
pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";

    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

use colors::*;

/// Colored `[TAG]` prefix for live status lines
pub fn status_tag(tag: &str, color: &str) -> String {
    format!("{}[{}]{}", color, tag, RESET)
}

pub fn style_dim(s: &str) -> String {
    format!("{}{}{}", GRAY, s, RESET)
}

pub fn icon_success() -> String {
    format!("{}✓{}", GREEN, RESET)
}

pub fn icon_warning() -> String {
    format!("{}⚠{}", YELLOW, RESET)
}

pub fn print_success(msg: &str) {
    println!("{} {}", icon_success(), msg);
}

pub fn print_warning(msg: &str) {
    println!("{} {}{}{}", icon_warning(), YELLOW, msg, RESET);
}

pub fn print_header(title: &str) {
    println!();
    println!(
        "{}{} {} {}{}",
        BOLD,
        CYAN,
        title,
        "─".repeat(50usize.saturating_sub(title.len())),
        RESET
    );
    println!();
}

pub fn print_key_value(key: &str, value: &str) {
    println!("  {}{}:{} {}", GRAY, key, RESET, value);
}

pub fn print_key_value_colored(key: &str, value: &str, color: &str) {
    println!("  {}{}:{} {}{}{}", GRAY, key, RESET, color, value, RESET);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_tag() {
        assert_eq!(status_tag("OK", GREEN), "\x1b[32m[OK]\x1b[0m");
    }

    #[test]
    fn test_style_dim_wraps() {
        let s = style_dim("x");
        assert!(s.starts_with(GRAY) && s.ends_with(RESET));
    }
}

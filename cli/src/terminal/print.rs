use crate::terminal::{colors, logging::PRINT_TARGET};
use colored::*;
use tracing::info;
use unicode_width::UnicodeWidthStr;

pub const TOTAL_WIDTH: usize = 64;
const TREE_KEY_WIDTH: usize = 7;

#[macro_export]
macro_rules! rprint {
    () => {
        $crate::terminal::print::print("");
    };
    ($msg:expr) => {
        $crate::terminal::print::print($msg);
    };
}

pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, "{msg}");
}

/// Splits the padding around a label of `label_width` columns on a line of `TOTAL_WIDTH`.
fn padding(label_width: usize) -> (usize, usize) {
    let free = TOTAL_WIDTH.saturating_sub(label_width);
    (free / 2, free - free / 2)
}

/// Dots that line up the colons of keys padded to `width`.
fn leader(key: &str, width: usize) -> String {
    ".".repeat(width.saturating_sub(UnicodeWidthStr::width(key)))
}

fn ruled(fill: &str, label: &str, styled: ColoredString) {
    let (left, right) = padding(console::measure_text_width(label));
    print(&format!(
        "{}{}{}",
        fill.repeat(left).bright_black(),
        styled,
        fill.repeat(right).bright_black()
    ));
}

pub fn banner() {
    let label = format!("⟦ REBOOTR v{} ⟧", env!("CARGO_PKG_VERSION"));
    let styled = label.bright_green().bold();
    ruled("═", &label, styled);
}

pub fn header(msg: &str) {
    let label = format!("⟦ {} ⟧", msg.to_uppercase());
    let styled = label.bright_green();
    ruled("─", &label, styled);
}

pub fn fat_separator() {
    print(&"═".repeat(TOTAL_WIDTH).color(colors::SEPARATOR).to_string());
}

pub fn end_of_program() {
    fat_separator();
}

pub fn centerln(msg: &str) {
    let (left, _) = padding(console::measure_text_width(msg));
    print(&format!("{}{}", " ".repeat(left), msg));
}

pub fn print_status<T: AsRef<str>>(msg: T) {
    let prefix = ">".color(colors::SEPARATOR);
    print(&format!("{} {}", prefix, msg.as_ref().color(colors::TEXT_DEFAULT)));
}

/// `> key.....: value`, with colons aligned for keys up to `key_width` columns.
pub fn aligned_line(key: &str, key_width: usize, value: ColoredString) {
    let dots = leader(key, key_width + 1).color(colors::SEPARATOR);
    print_status(format!(
        "{}{}{} {}",
        key.color(colors::PRIMARY),
        dots,
        ":".color(colors::SEPARATOR),
        value
    ));
}

pub fn tree_head(idx: usize, name: &str) {
    print(&format!(
        "{}{}{} {}",
        "[".color(colors::SEPARATOR),
        idx.to_string().color(colors::ACCENT),
        "]".color(colors::SEPARATOR),
        name.color(colors::PRIMARY)
    ));
}

pub fn as_tree_one_level(details: Vec<(String, ColoredString)>) {
    let last = details.len().saturating_sub(1);
    for (i, (key, value)) in details.into_iter().enumerate() {
        let branch = if i == last { "└─" } else { "├─" };
        print(&format!(
            " {} {}{}{} {}",
            branch.bright_black(),
            key.color(colors::TEXT_DEFAULT),
            leader(&key, TREE_KEY_WIDTH).color(colors::SEPARATOR),
            ":".color(colors::SEPARATOR),
            value
        ));
    }
}

const NO_TARGETS: &str = r#"
         _   _  ___    _____  _    ____   ____ _____ _____ ____
        | \ | |/ _ \  |_   _|/ \  |  _ \ / ___| ____|_   _/ ___|
        |  \| | | | |   | | / _ \ | |_) | |  _|  _|   | | \___ \
        | |\  | |_| |   | |/ ___ \|  _ <| |_| | |___  | |  ___) |
        |_| \_|\___/    |_/_/   \_\_| \_\\____|_____| |_| |____/
"#;

pub fn no_targets() {
    print(&NO_TARGETS.red().bold().to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_splits_the_free_columns() {
        assert_eq!(padding(10), (27, 27));
        assert_eq!(padding(11), (26, 27));
        assert_eq!(padding(TOTAL_WIDTH + 5), (0, 0));
    }

    #[test]
    fn leader_aligns_keys_and_never_underflows() {
        assert_eq!(leader("Down", TREE_KEY_WIDTH), "...");
        assert_eq!(leader("Status", TREE_KEY_WIDTH), ".");
        assert_eq!(leader("phone-7.lobby.local", 4), "");
    }
}

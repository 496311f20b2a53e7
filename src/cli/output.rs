//! Console output for the shell: tagged status lines and plain-text tables.

use colored::{ColoredString, Colorize};
use std::fmt;

/// How a status line is tagged and coloured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Hint,
    Section,
}

impl MessageKind {
    fn tag(self) -> &'static str {
        match self {
            MessageKind::Info => "INFO: [i] ",
            MessageKind::Success => "SUCCESS: [+] ",
            MessageKind::Warning => "WARNING: [!] ",
            MessageKind::Error => "ERROR: [x] ",
            MessageKind::Hint => "HINT: ",
            MessageKind::Section => "",
        }
    }

    fn paint(self, line: String) -> ColoredString {
        match self {
            MessageKind::Info => line.normal(),
            MessageKind::Success => line.bright_green(),
            MessageKind::Warning => line.bright_yellow(),
            MessageKind::Error => line.bright_red(),
            MessageKind::Hint => line.dimmed(),
            MessageKind::Section => line.bold(),
        }
    }
}

/// The uncoloured line printed for `message`.
pub fn render(kind: MessageKind, message: impl fmt::Display) -> String {
    match kind {
        MessageKind::Section => format!("=== {} ===", message.to_string().trim()),
        _ => format!("{}{message}", kind.tag()),
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let line = kind.paint(render(kind, message));
    if kind == MessageKind::Section {
        println!();
    }
    println!("{line}");
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn hint(message: impl fmt::Display) {
    print(MessageKind::Hint, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// Renders `rows` under `headers` with every column padded to its widest cell.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (index, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(index) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_row(headers.iter().copied(), &widths));
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in rows {
        lines.push(format_row(row.iter().map(String::as_str), &widths));
    }
    lines.join("\n")
}

fn format_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths.iter())
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    println!("{}", render_table(headers, rows));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_lines_carry_their_tag() {
        assert_eq!(
            render(MessageKind::Error, "No bill matches `x`."),
            "ERROR: [x] No bill matches `x`."
        );
        assert_eq!(render(MessageKind::Hint, "try help"), "HINT: try help");
        assert_eq!(render(MessageKind::Section, " Totals "), "=== Totals ===");
    }

    #[test]
    fn table_columns_align_to_widest_cell() {
        let rows = vec![
            vec!["Rent".to_string(), "$1200.00".to_string()],
            vec!["Wi-Fi Internet".to_string(), "$30.00".to_string()],
        ];
        let table = render_table(&["Name", "Amount"], &rows);
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines[0], "Name            Amount");
        assert_eq!(lines[1], "--------------  --------");
        assert_eq!(lines[2], "Rent            $1200.00");
        assert_eq!(lines[3], "Wi-Fi Internet  $30.00");
    }
}

use colored::Colorize;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use crate::outcome_tree::OutcomeNode;

/// Table of labelled win/loss/draw counts with share columns.
pub fn counts_table(rows: &[(String, i32, i32, i32)]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new(""),
        Cell::new("P1 wins").set_alignment(CellAlignment::Right),
        Cell::new("P2 wins").set_alignment(CellAlignment::Right),
        Cell::new("Draws").set_alignment(CellAlignment::Right),
        Cell::new("Total").set_alignment(CellAlignment::Right),
        Cell::new("P1 %").set_alignment(CellAlignment::Right),
        Cell::new("P2 %").set_alignment(CellAlignment::Right),
    ]);

    for (label, win_first, win_second, draws) in rows {
        let total = win_first + win_second + draws;
        table.add_row(vec![
            Cell::new(label.bold().to_string()),
            Cell::new(win_first).set_alignment(CellAlignment::Right),
            Cell::new(win_second).set_alignment(CellAlignment::Right),
            Cell::new(draws).set_alignment(CellAlignment::Right),
            Cell::new(total).set_alignment(CellAlignment::Right),
            Cell::new(pct(*win_first, total)).set_alignment(CellAlignment::Right),
            Cell::new(pct(*win_second, total)).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

/// Render a raw semicolon-delimited stats file as a table. The first
/// non-empty line is taken as the header.
pub fn stats_table(contents: &str) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let mut lines = contents.lines().filter(|line| !line.trim().is_empty());
    if let Some(header) = lines.next() {
        table.set_header(split_row(header));
    }
    for line in lines {
        table.add_row(split_row(line));
    }
    table
}

fn split_row(line: &str) -> Vec<Cell> {
    line.trim_end_matches(';').split(';').map(Cell::new).collect()
}

fn pct(count: i32, total: i32) -> String {
    if total == 0 {
        "-".to_string()
    } else {
        format!("{:.1}%", count as f64 / total as f64 * 100.0)
    }
}

pub fn counts_line(node: &OutcomeNode) -> String {
    format!(
        "P1 {} / P2 {} / draws {}",
        node.win_first, node.win_second, node.draws
    )
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "Error:".red().bold(), msg);
}

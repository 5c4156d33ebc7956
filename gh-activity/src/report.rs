//! Plain text rendering of activity rows.

use crate::summary::ActivityRow;
use std::fmt::Write;

pub const HEADERS: [&str; 3] = ["Activity", "Count", "Project name"];

const GAP: &str = "  ";

/// Renders `rows` as a table: left aligned text, right aligned counts and a
/// dashed rule under the headers. Only the headers are printed when there are no rows.
pub fn render(rows: &[ActivityRow]) -> String {
    let cells: Vec<[String; 3]> = rows
        .iter()
        .map(|row| {
            [
                row.kind.label().to_string(),
                row.count.to_string(),
                row.repository.clone(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|header| header.chars().count());
    for line in &cells {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut table = String::new();
    push_line(&mut table, HEADERS, widths);
    push_line(&mut table, widths.map(|width| "-".repeat(width)), widths);
    for line in &cells {
        push_line(&mut table, [&line[0], &line[1], &line[2]], widths);
    }
    table
}

fn push_line<S: AsRef<str>>(table: &mut String, cells: [S; 3], widths: [usize; 3]) {
    let [activity, count, project] = cells;
    let line = format!(
        "{:<a$}{GAP}{:>c$}{GAP}{}",
        activity.as_ref(),
        count.as_ref(),
        project.as_ref(),
        a = widths[0],
        c = widths[1],
    );
    // Writing to a String cannot fail.
    let _ = writeln!(table, "{}", line.trim_end());
}

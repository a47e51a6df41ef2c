//! Write side: [`Table`] → text.

use crate::Table;

const MIN_WIDTH: usize = 3;

/// Render a table as aligned pipe-delimited text with a trailing newline.
///
/// Column widths are measured in characters after escaping, so the output
/// is a pure function of the table's content.
pub fn render_table(table: &Table) -> String {
    let headers: Vec<String> = table.headers.iter().map(|h| escape(h)).collect();
    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|r| r.iter().map(|c| escape(c)).collect())
        .collect();

    let mut widths: Vec<usize> = headers
        .iter()
        .map(|h| h.chars().count().max(MIN_WIDTH))
        .collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &headers, &widths);

    out.push('|');
    for w in &widths {
        out.push_str(&"-".repeat(w + 2));
        out.push('|');
    }
    out.push('\n');

    for row in &rows {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    out.push('|');
    for (cell, w) in cells.iter().zip(widths) {
        out.push(' ');
        out.push_str(cell);
        for _ in cell.chars().count()..*w {
            out.push(' ');
        }
        out.push_str(" |");
    }
    out.push('\n');
}

fn escape(cell: &str) -> String {
    cell.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_table_str;

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        Table {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn renders_aligned_columns() {
        let t = table(&["Protocol Number", "Received"], &[&["6", "yes"], &["17", "no"]]);
        let expected = "\
| Protocol Number | Received |
|-----------------|----------|
| 6               | yes      |
| 17              | no       |
";
        assert_eq!(render_table(&t), expected);
    }

    #[test]
    fn short_headers_get_minimum_width() {
        let t = table(&["a"], &[&["1"]]);
        assert_eq!(render_table(&t), "| a   |\n|-----|\n| 1   |\n");
    }

    #[test]
    fn width_counts_characters_not_bytes() {
        let t = table(&["Time (μs)"], &[&["🫡"]]);
        let out = render_table(&t);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "| Time (μs) |");
        assert_eq!(lines[2], "| 🫡         |");
    }

    #[test]
    fn pipes_in_cells_survive_reparse() {
        let t = table(&["k", "note"], &[&["1", "a|b"]]);
        let back = parse_table_str(&render_table(&t)).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn header_only_table() {
        let t = table(&["k"], &[]);
        assert_eq!(render_table(&t), "| k   |\n|-----|\n");
    }
}

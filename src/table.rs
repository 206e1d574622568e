use std::fmt::Write as _;

/// Renders rows as a boxed text table:
///
/// ```text
/// +--------+------+
/// | Column | Type |
/// +--------+------+
/// | id     | int  |
/// +--------+------+
/// ```
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(widths.len()) {
            widths[idx] = widths[idx].max(cell_width(cell));
        }
    }

    let border = widths
        .iter()
        .map(|w| "-".repeat(w + 2))
        .collect::<Vec<_>>()
        .join("+");
    let border = format!("+{border}+");

    let mut output = String::new();
    let _ = writeln!(output, "{border}");
    let _ = writeln!(output, "{}", format_row(headers.iter().copied(), &widths));
    let _ = writeln!(output, "{border}");
    for row in rows {
        let _ = writeln!(output, "{}", format_row(row.iter().map(String::as_str), &widths));
    }
    let _ = writeln!(output, "{border}");
    output
}

pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

fn format_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let mut cells = cells;
    let rendered = widths
        .iter()
        .map(|width| {
            let cell = sanitize(cells.next().unwrap_or_default());
            let padding = width.saturating_sub(cell_width(&cell));
            format!(" {cell}{} ", " ".repeat(padding))
        })
        .collect::<Vec<_>>()
        .join("|");
    format!("|{rendered}|")
}

fn cell_width(value: &str) -> usize {
    sanitize(value).chars().count()
}

fn sanitize(value: &str) -> String {
    value.replace(['\n', '\r', '\t'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_pads_to_widest_cell() {
        let rendered = render_table(
            &["Column", "Type"],
            &[
                vec!["id".to_string(), "int".to_string()],
                vec!["description".to_string(), "varchar".to_string()],
            ],
        );
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "+-------------+---------+");
        assert_eq!(lines[1], "| Column      | Type    |");
        assert_eq!(lines[3], "| id          | int     |");
        assert_eq!(lines[4], "| description | varchar |");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn control_characters_are_flattened() {
        let rendered = render_table(&["v"], &[vec!["a\nb".to_string()]]);
        assert!(rendered.contains("| a b |"));
    }

    #[test]
    fn short_rows_are_padded() {
        let rendered = render_table(&["a", "b"], &[vec!["x".to_string()]]);
        assert!(rendered.contains("| x |   |"));
    }
}

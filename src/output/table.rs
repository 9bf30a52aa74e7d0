//! Aligned, human-readable tables.
//!
//! Columns are sized to their widest cell (measured in terminal columns, so
//! Bengali or CJK text lines up) and may be capped, in which case longer
//! cells are truncated with `...`.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Separator between columns.
const COLUMN_GAP: &str = "  ";

/// A simple table formatter.
#[derive(Debug, Default)]
pub struct TableFormatter {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    max_widths: Vec<Option<usize>>,
}

impl TableFormatter {
    /// Create a new table formatter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the column headers.
    pub fn headers<I, S>(&mut self, headers: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers = headers.into_iter().map(Into::into).collect();
        self
    }

    /// Add a row to the table.
    pub fn row<I, S>(&mut self, cells: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
        self
    }

    /// Cap the width of one column.
    pub fn max_width(&mut self, column: usize, width: usize) -> &mut Self {
        if self.max_widths.len() <= column {
            self.max_widths.resize(column + 1, None);
        }
        self.max_widths[column] = Some(width);
        self
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column_widths(&self) -> Vec<usize> {
        let columns =
            self.rows.iter().map(Vec::len).chain([self.headers.len()]).max().unwrap_or_default();

        (0..columns)
            .map(|i| {
                let widest = std::iter::once(&self.headers)
                    .chain(&self.rows)
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.width())
                    .max()
                    .unwrap_or_default();
                match self.max_widths.get(i).copied().flatten() {
                    Some(cap) => widest.min(cap),
                    None => widest,
                }
            })
            .collect()
    }

    /// Render the table as a string.
    pub fn render(&self) -> String {
        let widths = self.column_widths();
        let mut output = String::new();

        if !self.headers.is_empty() {
            output.push_str(&render_row(&self.headers, &widths));
            output.push('\n');
            let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            output.push_str(separator.join(COLUMN_GAP).trim_end());
            output.push('\n');
        }

        for row in &self.rows {
            output.push_str(&render_row(row, &widths));
            output.push('\n');
        }

        output
    }

    /// Print the table to stdout.
    pub fn print(&self) {
        print!("{}", self.render());
    }
}

fn render_row(cells: &[String], widths: &[usize]) -> String {
    let line: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(i, width)| {
            let cell = cells.get(i).map_or("", String::as_str);
            let cell_width = cell.width();
            if cell_width <= *width {
                format!("{cell}{}", " ".repeat(width - cell_width))
            } else {
                truncate(cell, *width)
            }
        })
        .collect();

    line.join(COLUMN_GAP).trim_end().to_string()
}

/// Truncate a string to fit within a given width.
fn truncate(s: &str, max_width: usize) -> String {
    if max_width <= 3 {
        return ".".repeat(max_width);
    }

    let mut width = 0;
    let mut out = String::new();

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if width + char_width + 3 > max_width {
            out.push_str("...");
            width += 3;
            break;
        }
        out.push(c);
        width += char_width;
    }

    if width < max_width {
        out.push_str(&" ".repeat(max_width - width));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_alignment() {
        let mut table = TableFormatter::new();
        table.headers(["LOCALE", "DEFAULT"]);
        table.row(["en", "*"]);
        table.row(["zh-CN", ""]);

        assert_eq!(table.render(), "LOCALE  DEFAULT\n------  -------\nen      *\nzh-CN\n");
    }

    #[test]
    fn test_wide_characters_align() {
        let mut table = TableFormatter::new();
        table.row(["日本", "x"]);
        table.row(["ab", "y"]);

        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0].width(), lines[1].width());
    }

    #[test]
    fn test_max_width_truncates() {
        let mut table = TableFormatter::new();
        table.max_width(1, 8);
        table.row(["home", "hello world"]);
        assert_eq!(table.render(), "home  hello...\n");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello world", 8), "hello...");
        assert_eq!(truncate("hi", 10).trim(), "hi");
        assert_eq!(truncate("hello", 2), "..");
    }
}

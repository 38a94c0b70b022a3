//! Bordered fixed-width text tables with optional header groups.

use std::io::Write;

use crate::{strip_ansi, visible_width};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

/// A header spanning `col_span` adjacent columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderGroup {
    pub header: String,
    pub col_span: usize,
}

impl HeaderGroup {
    pub fn new(header: impl Into<String>, col_span: usize) -> Self {
        Self {
            header: header.into(),
            col_span,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub header_groups: Vec<HeaderGroup>,
    pub alignment: Vec<Alignment>,
    pub rows: Vec<Vec<String>>,
    pub padding: usize,
}

impl Table {
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    fn alignment_of(&self, column: usize) -> Alignment {
        self.alignment
            .get(column)
            .copied()
            .unwrap_or(Alignment::Left)
    }

    fn cell<'r>(row: &'r [String], column: usize) -> &'r str {
        row.get(column).map(String::as_str).unwrap_or("")
    }

    /// Groups covering exactly the table's columns; a shortfall becomes a blank group.
    fn normalized_groups(&self) -> Vec<HeaderGroup> {
        let columns = self.column_count();
        let mut groups = Vec::new();
        let mut covered = 0;
        for group in &self.header_groups {
            if covered >= columns {
                break;
            }
            let span = group.col_span.min(columns - covered);
            if span == 0 {
                continue;
            }
            groups.push(HeaderGroup::new(group.header.clone(), span));
            covered += span;
        }
        if !groups.is_empty() && covered < columns {
            groups.push(HeaderGroup::new("", columns - covered));
        }
        groups
    }

    fn column_widths(&self, groups: &[HeaderGroup]) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| visible_width(h)).collect();
        for row in &self.rows {
            for (column, width) in widths.iter_mut().enumerate() {
                let cell = visible_width(Self::cell(row, column));
                *width = (*width).max(cell);
            }
        }

        let mut start = 0;
        for group in groups {
            let inner = self.span_width(&widths[start..start + group.col_span]) - 2 * self.padding;
            let wanted = visible_width(&group.header);
            if wanted > inner {
                widths[start + group.col_span - 1] += wanted - inner;
            }
            start += group.col_span;
        }
        widths
    }

    /// Width between the outer `+` of a run of columns.
    fn span_width(&self, widths: &[usize]) -> usize {
        let cells: usize = widths.iter().map(|w| w + 2 * self.padding).sum();
        cells + widths.len().saturating_sub(1)
    }

    fn border(&self, segments: impl Iterator<Item = usize>) -> String {
        let mut line = String::from("+");
        for width in segments {
            line.push_str(&"-".repeat(width));
            line.push('+');
        }
        line
    }

    fn aligned(&self, text: &str, width: usize, alignment: Alignment, strip: bool) -> String {
        let fill = " ".repeat(width.saturating_sub(visible_width(text)));
        let text = if strip {
            strip_ansi(text)
        } else {
            text.to_string()
        };
        let pad = " ".repeat(self.padding);
        match alignment {
            Alignment::Left => format!("{pad}{text}{fill}{pad}"),
            Alignment::Right => format!("{pad}{fill}{text}{pad}"),
        }
    }

    fn line(&self, row: &[String], widths: &[usize], strip: bool) -> String {
        let mut line = String::from("|");
        for (column, &width) in widths.iter().enumerate() {
            line.push_str(&self.aligned(
                Self::cell(row, column),
                width,
                self.alignment_of(column),
                strip,
            ));
            line.push('|');
        }
        line
    }

    /// Render the grid. With `strip_ansi`, escape sequences are removed from
    /// every cell; column widths are unaffected since they are measured on
    /// visible text.
    pub fn render(&self, strip_ansi: bool) -> String {
        let groups = self.normalized_groups();
        let widths = self.column_widths(&groups);
        let column_border = self.border(widths.iter().map(|w| w + 2 * self.padding));

        let mut lines = Vec::with_capacity(self.rows.len() + 6);
        if !groups.is_empty() {
            let mut start = 0;
            let mut group_widths = Vec::with_capacity(groups.len());
            for group in &groups {
                group_widths.push(self.span_width(&widths[start..start + group.col_span]));
                start += group.col_span;
            }
            let group_border = self.border(group_widths.iter().copied());

            let mut group_line = String::from("|");
            for (group, &width) in groups.iter().zip(&group_widths) {
                group_line.push_str(&self.aligned(
                    &group.header,
                    width - 2 * self.padding,
                    Alignment::Left,
                    strip_ansi,
                ));
                group_line.push('|');
            }

            lines.push(group_border.clone());
            lines.push(group_line);
            lines.push(group_border);
        } else {
            lines.push(column_border.clone());
        }

        lines.push(self.line(&self.headers, &widths, strip_ansi));
        lines.push(column_border.clone());
        for row in &self.rows {
            lines.push(self.line(row, &widths, strip_ansi));
        }
        lines.push(column_border);

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    pub fn write(&self, out: &mut impl Write, strip_ansi: bool) -> std::io::Result<()> {
        out.write_all(self.render(strip_ansi).as_bytes())?;
        out.flush()
    }
}

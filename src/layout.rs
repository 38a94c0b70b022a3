//! Diff table assembly: column layout, call-stack labels and cell rows.

use crate::{
    Alignment, Correlation, DiffFormatter, HeaderGroup, MetricRecord, Profile, StatColumn, Table,
    align_and_append,
};

pub const CALL_STACK_HEADER: &str = "call stack";
pub const TABLE_PADDING: usize = 1;

const TREE_GUIDE: &str = "| ";
const LEAF_MARKER: &str = "- ";
const BRANCH_MARKER: &str = "+ ";

/// Shape of an N-profile × M-column table: one call-stack column followed by
/// one block of `columns` per profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    columns: Vec<StatColumn>,
    profile_count: usize,
}

impl TableLayout {
    pub fn new(columns: Vec<StatColumn>, profile_count: usize) -> Self {
        Self {
            columns,
            profile_count,
        }
    }

    pub fn columns(&self) -> &[StatColumn] {
        &self.columns
    }

    pub fn profile_count(&self) -> usize {
        self.profile_count
    }

    pub fn width(&self) -> usize {
        1 + self.profile_count * self.columns.len()
    }

    /// Table column holding statistic `column_pos` of profile `profile_index`.
    pub fn cell_index(&self, profile_index: usize, column_pos: usize) -> usize {
        1 + profile_index * self.columns.len() + column_pos
    }

    pub fn headers(&self) -> Vec<String> {
        let mut headers = Vec::with_capacity(self.width());
        headers.push(CALL_STACK_HEADER.to_string());
        for _ in 0..self.profile_count {
            let names = self.columns.iter().map(|c| c.header().to_string());
            headers.extend(names);
        }
        headers
    }

    pub fn alignment(&self) -> Vec<Alignment> {
        let mut alignment = vec![Alignment::Right; self.width()];
        alignment[0] = Alignment::Left;
        alignment
    }

    pub fn header_groups(&self, profiles: &[Profile]) -> Vec<HeaderGroup> {
        let mut groups = Vec::with_capacity(self.profile_count + 1);
        groups.push(HeaderGroup::new("", 1));
        for (index, profile) in profiles.iter().take(self.profile_count).enumerate() {
            groups.push(HeaderGroup::new(
                profile.display_label(index),
                self.columns.len(),
            ));
        }
        groups
    }

    pub fn empty_table(&self, profiles: &[Profile]) -> Table {
        Table {
            headers: self.headers(),
            header_groups: self.header_groups(profiles),
            alignment: self.alignment(),
            rows: Vec::new(),
            padding: TABLE_PADDING,
        }
    }
}

/// `"| | + name"`: one guide per depth level, then a branch or leaf marker.
pub fn call_stack_label(node: &MetricRecord, depth: usize) -> String {
    let marker = if node.is_leaf() {
        LEAF_MARKER
    } else {
        BRANCH_MARKER
    };
    format!("{}{marker}{}", TREE_GUIDE.repeat(depth), node.fn_name)
}

/// One unaligned row per node of the baseline tree, in depth-first pre-order.
pub fn build_rows(
    layout: &TableLayout,
    profiles: &[Profile],
    correlation: &Correlation<'_>,
    formatter: &DiffFormatter<'_>,
) -> Vec<Vec<String>> {
    let Some(anchor) = profiles.first() else {
        return Vec::new();
    };

    let mut rows = Vec::new();
    anchor.target.walk(&mut |node, depth| {
        let mut row = vec![String::new(); layout.width()];
        row[0] = call_stack_label(node, depth);

        if let Some(entry) = correlation.get(&node.fn_name) {
            let baseline = entry.baseline();
            for profile_index in 0..layout.profile_count() {
                let Some(metrics) = entry.get(profile_index) else {
                    continue;
                };
                for (pos, &column) in layout.columns().iter().enumerate() {
                    row[layout.cell_index(profile_index, pos)] = if profile_index == 0 {
                        formatter.format_value(metrics, column)
                    } else {
                        formatter.format_diff(baseline, metrics, column)
                    };
                }
            }
        }
        rows.push(row);
    });
    rows
}

/// Assemble the aligned diff table. The first profile anchors row emission:
/// names that only appear in later profiles get no row of their own.
pub fn build_table(
    profiles: &[Profile],
    correlation: &Correlation<'_>,
    columns: &[StatColumn],
    formatter: &DiffFormatter<'_>,
) -> Table {
    let layout = TableLayout::new(columns.to_vec(), profiles.len());
    let mut table = layout.empty_table(profiles);
    let rows = build_rows(&layout, profiles, correlation, formatter);
    align_and_append(rows, &mut table);
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PlainPalette, ResolvedUnit, correlate, strip_ansi};

    const MS: i64 = 1_000_000;

    fn node(name: &str, total: i64, children: Vec<MetricRecord>) -> MetricRecord {
        MetricRecord {
            fn_name: name.to_string(),
            total_time: total,
            invocations: 1,
            children,
            ..MetricRecord::default()
        }
    }

    #[test]
    fn call_stack_label_marks_leaves_and_branches() {
        let leaf = node("leaf", 0, vec![]);
        let branch = node("branch", 0, vec![node("x", 0, vec![])]);
        assert_eq!(call_stack_label(&branch, 2), "| | + branch");
        assert_eq!(call_stack_label(&leaf, 2), "| | - leaf");
        assert_eq!(call_stack_label(&leaf, 0), "- leaf");
    }

    #[test]
    fn layout_spans_one_group_per_profile() {
        let profiles = vec![
            Profile::new(None, node("main", 0, vec![])),
            Profile::new(Some("after".to_string()), node("main", 0, vec![])),
        ];
        let columns = vec![StatColumn::Total, StatColumn::Invocations];
        let layout = TableLayout::new(columns, 2);
        assert_eq!(layout.width(), 5);
        assert_eq!(layout.cell_index(1, 1), 4);
        assert_eq!(
            layout.headers(),
            vec!["call stack", "total", "invoc", "total", "invoc"]
        );
        assert_eq!(
            layout.alignment(),
            vec![
                Alignment::Left,
                Alignment::Right,
                Alignment::Right,
                Alignment::Right,
                Alignment::Right
            ]
        );
        assert_eq!(
            layout.header_groups(&profiles),
            vec![
                HeaderGroup::new("", 1),
                HeaderGroup::new("baseline", 2),
                HeaderGroup::new("after", 2),
            ]
        );
    }

    #[test]
    fn rows_follow_baseline_tree_and_blank_missing_slots() {
        let foo = node("foo", 10 * MS, vec![node("bar", 5 * MS, vec![])]);
        let before = node("main", 20 * MS, vec![foo]);
        let moved = vec![node("bar", 5 * MS, vec![]), node("baz", MS, vec![])];
        let after = node("main", 10 * MS, moved);
        let profiles = vec![Profile::new(None, before), Profile::new(None, after)];
        let correlation = correlate(&profiles);
        let palette = PlainPalette;
        let formatter = DiffFormatter::new(ResolvedUnit::Ms, 0.0, &palette);
        let layout = TableLayout::new(vec![StatColumn::Total], 2);
        let rows = build_rows(&layout, &profiles, &correlation, &formatter);

        assert_eq!(
            rows,
            vec![
                vec!["+ main", "20.00 ms", "10.00 ms (↓ 100.0%)"],
                vec!["| + foo", "10.00 ms", ""],
                vec!["| | - bar", "5.00 ms", "5.00 ms (--)"],
            ]
        );
    }

    #[test]
    fn build_table_aligns_cells() {
        let before = node("main", 120 * MS, vec![node("foo", 10 * MS, vec![])]);
        let after = node("main", 10 * MS, vec![node("foo", 4 * MS, vec![])]);
        let profiles = vec![Profile::new(None, before), Profile::new(None, after)];
        let correlation = correlate(&profiles);
        let palette = PlainPalette;
        let formatter = DiffFormatter::new(ResolvedUnit::Ms, 0.0, &palette);
        let table = build_table(&profiles, &correlation, &[StatColumn::Total], &formatter);

        assert_eq!(table.rows.len(), 2);
        assert_eq!(strip_ansi(&table.rows[0][2]), "10.00 ms (↓ 1100.0%)");
        assert_eq!(strip_ansi(&table.rows[1][2]), " 4.00 ms  (↓ 150.0%)");
        assert_eq!(table.rows[1][0], "| - foo");
        assert_eq!(table.rows[0][0], "+ main ");
    }

    #[test]
    fn empty_profile_list_yields_no_rows() {
        let correlation = correlate(&[]);
        let palette = PlainPalette;
        let formatter = DiffFormatter::new(ResolvedUnit::Ms, 0.0, &palette);
        let table = build_table(&[], &correlation, &[StatColumn::Total], &formatter);
        assert!(table.rows.is_empty());
        assert_eq!(table.headers, vec!["call stack"]);
    }
}

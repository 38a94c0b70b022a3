//! Structured diff output for `--json`.

use serde::{Deserialize, Serialize};

use crate::{
    Change, Correlation, DiffFormatter, Profile, ResolvedUnit, StatColumn, call_stack_label,
};

pub const DIFF_SCHEMA_VERSION: &str = "stackdiff.diff.v1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffReport {
    #[serde(rename = "schemaVersion")]
    pub schema_version: String,
    pub unit: ResolvedUnit,
    pub threshold: f64,
    pub columns: Vec<StatColumn>,
    pub profiles: Vec<String>,
    pub rows: Vec<ReportRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRow {
    #[serde(rename = "callStack")]
    pub call_stack: String,
    pub name: String,
    pub depth: usize,
    /// One entry per profile; `None` when that profile never ran this function.
    pub profiles: Vec<Option<Vec<ReportCell>>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportCell {
    pub column: StatColumn,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<Change>,
}

/// Same rows as the rendered table, as data.
pub fn build_report(
    profiles: &[Profile],
    correlation: &Correlation<'_>,
    columns: &[StatColumn],
    formatter: &DiffFormatter<'_>,
) -> DiffReport {
    let mut rows = Vec::new();
    if let Some(anchor) = profiles.first() {
        anchor.target.walk(&mut |node, depth| {
            let entry = correlation.get(&node.fn_name);
            let baseline = entry.and_then(|e| e.baseline());
            let cells: Vec<Option<Vec<ReportCell>>> = (0..profiles.len())
                .map(|profile_index| {
                    let metrics = entry.and_then(|e| e.get(profile_index))?;
                    Some(
                        columns
                            .iter()
                            .map(|&column| ReportCell {
                                column,
                                value: formatter.value(metrics, column),
                                change: if profile_index == 0 {
                                    None
                                } else {
                                    formatter.change(baseline, metrics, column)
                                },
                            })
                            .collect::<Vec<_>>(),
                    )
                })
                .collect();
            rows.push(ReportRow {
                call_stack: call_stack_label(node, depth),
                name: node.fn_name.clone(),
                depth,
                profiles: cells,
            });
        });
    }

    DiffReport {
        schema_version: DIFF_SCHEMA_VERSION.to_string(),
        unit: formatter.unit(),
        threshold: formatter.clip_threshold(),
        columns: columns.to_vec(),
        profiles: profiles
            .iter()
            .enumerate()
            .map(|(index, p)| p.display_label(index))
            .collect(),
        rows,
    }
}

//! Statistic columns and column-list parsing.

use serde::{Deserialize, Serialize};

use std::str::FromStr;

use crate::{DiffError, DiffResult, MetricRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatColumn {
    Total,
    Min,
    Max,
    Mean,
    Median,
    Invocations,
    P50,
    P75,
    P90,
    P99,
    #[serde(rename = "stddev")]
    StdDev,
}

impl StatColumn {
    pub const ALL: [StatColumn; 11] = [
        StatColumn::Total,
        StatColumn::Min,
        StatColumn::Max,
        StatColumn::Mean,
        StatColumn::Median,
        StatColumn::Invocations,
        StatColumn::P50,
        StatColumn::P75,
        StatColumn::P90,
        StatColumn::P99,
        StatColumn::StdDev,
    ];

    /// Identifier accepted by `--columns`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Total => "total",
            Self::Min => "min",
            Self::Max => "max",
            Self::Mean => "mean",
            Self::Median => "median",
            Self::Invocations => "invocations",
            Self::P50 => "p50",
            Self::P75 => "p75",
            Self::P90 => "p90",
            Self::P99 => "p99",
            Self::StdDev => "stddev",
        }
    }

    pub fn header(self) -> &'static str {
        match self {
            Self::Invocations => "invoc",
            other => other.name(),
        }
    }

    /// Duration statistic in nanoseconds; `None` for count-like columns.
    pub fn duration(self, record: &MetricRecord) -> Option<i64> {
        match self {
            Self::Total => Some(record.total_time),
            Self::Min => Some(record.min_time),
            Self::Max => Some(record.max_time),
            Self::Mean => Some(record.mean_time),
            Self::Median => Some(record.median_time),
            Self::P50 => Some(record.p50_time),
            Self::P75 => Some(record.p75_time),
            Self::P90 => Some(record.p90_time),
            Self::P99 => Some(record.p99_time),
            Self::Invocations | Self::StdDev => None,
        }
    }

    pub fn is_duration(self) -> bool {
        !matches!(self, Self::Invocations | Self::StdDev)
    }
}

impl FromStr for StatColumn {
    type Err = DiffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        StatColumn::ALL
            .into_iter()
            .find(|c| c.name() == wanted)
            .ok_or_else(|| {
                DiffError::Config(format!(
                    "unsupported column {:?} (supported: {})",
                    s.trim(),
                    supported_column_names()
                ))
            })
    }
}

/// Comma-separated list of every supported column, in display order.
pub fn supported_column_names() -> String {
    StatColumn::ALL
        .iter()
        .map(|c| c.name())
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse `total, min,max` into columns. Duplicates keep their first position.
pub fn parse_column_list(list: &str) -> DiffResult<Vec<StatColumn>> {
    let mut columns = Vec::new();
    for part in list.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let column: StatColumn = part.parse()?;
        if !columns.contains(&column) {
            columns.push(column);
        }
    }
    if columns.is_empty() {
        return Err(DiffError::NoColumns);
    }
    Ok(columns)
}

//! Baseline/candidate comparison and cell formatting.
//!
//! The math ([`classify`]) only produces a [`Change`]; turning a change into
//! coloured text goes through a [`Palette`], so the escape sequences can be
//! swapped without touching the comparison.

use serde::{Deserialize, Serialize};

use crate::{MetricRecord, ResolvedUnit, StatColumn};

/// Absolute deltas below this are treated as equal values.
pub const DIFF_EPSILON: f64 = 0.01;

const NO_CHANGE_MARKER: &str = "--";
const IMPROVEMENT_GLYPH: char = '↓';
const REGRESSION_GLYPH: char = '↑';

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Change {
    /// Delta below the clip threshold, or the values cannot be compared.
    Clipped,
    /// Values equal within [`DIFF_EPSILON`].
    Unchanged,
    /// Candidate is smaller; `percent` is `(baseline / candidate - 1) * 100`.
    Improvement { percent: f64 },
    /// Candidate is larger; `percent` is `(candidate / baseline - 1) * 100`.
    Regression { percent: f64 },
}

impl Change {
    pub fn tone(self) -> Option<Tone> {
        match self {
            Self::Clipped => None,
            Self::Unchanged => Some(Tone::Neutral),
            Self::Improvement { .. } => Some(Tone::Improvement),
            Self::Regression { .. } => Some(Tone::Regression),
        }
    }

    /// Parenthesised annotation, painted with `palette`.
    pub fn annotation(self, palette: &dyn Palette) -> String {
        let painted = match self {
            Self::Clipped => return format!("({NO_CHANGE_MARKER})"),
            Self::Unchanged => palette.paint(Tone::Neutral, NO_CHANGE_MARKER),
            Self::Improvement { percent } => {
                let text = format!("{IMPROVEMENT_GLYPH} {percent:.1}%");
                palette.paint(Tone::Improvement, &text)
            }
            Self::Regression { percent } => {
                let text = format!("{REGRESSION_GLYPH} {percent:.1}%");
                palette.paint(Tone::Regression, &text)
            }
        };
        format!("({painted})")
    }
}

/// Compare two values expressed in the same display unit. Lower is better.
pub fn classify(baseline: f64, candidate: f64, clip_threshold: f64) -> Change {
    let abs_delta = (baseline - candidate).abs();
    if abs_delta < clip_threshold {
        return Change::Clipped;
    }

    let mut speedup = if candidate != 0.0 {
        baseline / candidate
    } else {
        0.0
    };
    if abs_delta < DIFF_EPSILON {
        speedup = 1.0;
    }

    if speedup == 0.0 {
        Change::Clipped
    } else if speedup == 1.0 {
        Change::Unchanged
    } else if speedup > 1.0 {
        Change::Improvement {
            percent: (speedup - 1.0) * 100.0,
        }
    } else {
        Change::Regression {
            percent: (1.0 / speedup - 1.0) * 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    Neutral,
    Improvement,
    Regression,
}

pub trait Palette {
    fn paint(&self, tone: Tone, text: &str) -> String;
}

/// Basic 8-colour SGR codes.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiPalette;

impl Palette for AnsiPalette {
    fn paint(&self, tone: Tone, text: &str) -> String {
        let ansi = match tone {
            Tone::Neutral => "33",
            Tone::Improvement => "32",
            Tone::Regression => "31",
        };
        format!("\x1b[{ansi}m{text}\x1b[0m")
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlainPalette;

impl Palette for PlainPalette {
    fn paint(&self, _tone: Tone, text: &str) -> String {
        text.to_string()
    }
}

/// Renders metric cells for one table: a resolved unit, a clip threshold and
/// a palette.
pub struct DiffFormatter<'p> {
    unit: ResolvedUnit,
    clip_threshold: f64,
    palette: &'p dyn Palette,
}

impl<'p> DiffFormatter<'p> {
    pub fn new(unit: ResolvedUnit, clip_threshold: f64, palette: &'p dyn Palette) -> Self {
        Self {
            unit,
            clip_threshold,
            palette,
        }
    }

    pub fn unit(&self) -> ResolvedUnit {
        self.unit
    }

    pub fn clip_threshold(&self) -> f64 {
        self.clip_threshold
    }

    /// Numeric value of `column` as shown in the table (display unit for durations).
    pub fn value(&self, record: &MetricRecord, column: StatColumn) -> f64 {
        match column.duration(record) {
            Some(nanos) => self.unit.convert(nanos),
            None if column == StatColumn::Invocations => record.invocations as f64,
            None => record.std_dev,
        }
    }

    /// Plain rendering without any comparison.
    pub fn format_value(&self, record: &MetricRecord, column: StatColumn) -> String {
        match column.duration(record) {
            Some(nanos) => self.unit.format_nanos(nanos),
            None if column == StatColumn::Invocations => record.invocations.to_string(),
            None => format!("{:.3}", record.std_dev),
        }
    }

    /// Comparison outcome for duration columns with a baseline; `None` otherwise.
    pub fn change(
        &self,
        baseline: Option<&MetricRecord>,
        candidate: &MetricRecord,
        column: StatColumn,
    ) -> Option<Change> {
        if !column.is_duration() {
            return None;
        }
        let baseline = baseline?;
        Some(classify(
            self.value(baseline, column),
            self.value(candidate, column),
            self.clip_threshold,
        ))
    }

    /// Candidate value followed by its annotation against `baseline`.
    pub fn format_diff(
        &self,
        baseline: Option<&MetricRecord>,
        candidate: &MetricRecord,
        column: StatColumn,
    ) -> String {
        let value = self.format_value(candidate, column);
        if !column.is_duration() {
            return value;
        }
        let change = self
            .change(baseline, candidate, column)
            .unwrap_or(Change::Clipped);
        format!("{value} {}", change.annotation(self.palette))
    }
}

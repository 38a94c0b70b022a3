//! Display unit selection and duration formatting.

use serde::{Deserialize, Serialize};

use std::str::FromStr;

use crate::DiffError;

/// Unit requested on the command line or in `stackdiff.toml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayUnit {
    Ns,
    Us,
    Ms,
    Auto,
}

impl clap::ValueEnum for DisplayUnit {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Ns, Self::Us, Self::Ms, Self::Auto]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Ns => clap::builder::PossibleValue::new("ns"),
            Self::Us => clap::builder::PossibleValue::new("us"),
            Self::Ms => clap::builder::PossibleValue::new("ms"),
            Self::Auto => clap::builder::PossibleValue::new("auto"),
        })
    }
}

impl FromStr for DisplayUnit {
    type Err = DiffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ns" => Ok(Self::Ns),
            "us" => Ok(Self::Us),
            "ms" => Ok(Self::Ms),
            "auto" => Ok(Self::Auto),
            other => Err(DiffError::Config(format!(
                "unsupported display unit {other:?} (expected ns, us, ms or auto)"
            ))),
        }
    }
}

/// A concrete unit every cell of one table is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvedUnit {
    Ns,
    Us,
    Ms,
}

impl ResolvedUnit {
    /// Nanoseconds per unit.
    pub fn scale(self) -> f64 {
        match self {
            Self::Ns => 1.0,
            Self::Us => 1.0e3,
            Self::Ms => 1.0e6,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Self::Ns => "ns",
            Self::Us => "us",
            Self::Ms => "ms",
        }
    }

    pub fn convert(self, nanos: i64) -> f64 {
        nanos as f64 / self.scale()
    }

    /// Render a value already expressed in this unit, suffix included.
    pub fn format_value(self, value: f64) -> String {
        let number = match self {
            Self::Ns => group_thousands(&format!("{value:.0}")),
            Self::Us => group_thousands(&format!("{value:.2}")),
            Self::Ms => format!("{value:.2}"),
        };
        format!("{number} {}", self.suffix())
    }

    pub fn format_nanos(self, nanos: i64) -> String {
        self.format_value(self.convert(nanos))
    }
}

/// Pick the unit for a table. `auto` chooses the coarsest unit in which
/// `sample_nanos` is at least 1.
pub fn resolve_unit(requested: DisplayUnit, sample_nanos: i64) -> ResolvedUnit {
    match requested {
        DisplayUnit::Ns => ResolvedUnit::Ns,
        DisplayUnit::Us => ResolvedUnit::Us,
        DisplayUnit::Ms => ResolvedUnit::Ms,
        DisplayUnit::Auto => {
            let magnitude = sample_nanos.unsigned_abs();
            if magnitude >= 1_000_000 {
                ResolvedUnit::Ms
            } else if magnitude >= 1_000 {
                ResolvedUnit::Us
            } else {
                ResolvedUnit::Ns
            }
        }
    }
}

/// Insert `,` separators into the integer part of a formatted decimal number.
fn group_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let mut out = format!("{sign}{grouped}");
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_units_format_with_expected_grouping() {
        assert_eq!(ResolvedUnit::Ns.format_nanos(120_000_000), "120,000,000 ns");
        assert_eq!(ResolvedUnit::Us.format_nanos(120_000_000), "120,000.00 us");
        assert_eq!(ResolvedUnit::Ms.format_nanos(120_000_000), "120.00 ms");
        assert_eq!(ResolvedUnit::Ms.format_nanos(1_234_567_000), "1234.57 ms");
        assert_eq!(ResolvedUnit::Ns.format_nanos(999), "999 ns");
        assert_eq!(ResolvedUnit::Ns.format_nanos(-1_500), "-1,500 ns");
    }

    #[test]
    fn auto_picks_coarsest_unit_at_least_one() {
        assert_eq!(resolve_unit(DisplayUnit::Auto, 120_000_000), ResolvedUnit::Ms);
        assert_eq!(resolve_unit(DisplayUnit::Auto, 1_000_000), ResolvedUnit::Ms);
        assert_eq!(resolve_unit(DisplayUnit::Auto, 999_999), ResolvedUnit::Us);
        assert_eq!(resolve_unit(DisplayUnit::Auto, 1_000), ResolvedUnit::Us);
        assert_eq!(resolve_unit(DisplayUnit::Auto, 999), ResolvedUnit::Ns);
        assert_eq!(resolve_unit(DisplayUnit::Auto, 0), ResolvedUnit::Ns);
        assert_eq!(resolve_unit(DisplayUnit::Us, 120_000_000), ResolvedUnit::Us);
    }

    #[test]
    fn auto_matches_explicit_unit_rendering() {
        let nanos = 42_500_000;
        let auto = resolve_unit(DisplayUnit::Auto, nanos);
        let fixed = resolve_unit(DisplayUnit::Ms, nanos);
        assert_eq!(auto.format_nanos(nanos), fixed.format_nanos(nanos));

        let nanos = 42_500;
        let auto = resolve_unit(DisplayUnit::Auto, nanos);
        let fixed = resolve_unit(DisplayUnit::Us, nanos);
        assert_eq!(auto.format_nanos(nanos), fixed.format_nanos(nanos));
    }

    #[test]
    fn parses_unit_names() {
        let auto: DisplayUnit = "AUTO".parse().expect("auto");
        assert_eq!(auto, DisplayUnit::Auto);
        let us: DisplayUnit = " us ".parse().expect("us");
        assert_eq!(us, DisplayUnit::Us);
        assert!(matches!("s".parse::<DisplayUnit>(), Err(DiffError::Config(_))));
    }
}

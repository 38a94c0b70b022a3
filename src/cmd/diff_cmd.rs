//! `stackdiff diff`: N-way comparison of call-stack profiles.

use clap::Args;

use crate::{
    AnsiPalette, ColorChoice, Config, DiffError, DiffFormatter, DiffReport, DiffResult,
    DisplayUnit, Palette, PlainPalette, Profile, StatColumn, Table, build_report, build_table,
    correlate, expand_profile_args, load_profiles, parse_column_list, resolve_unit,
};

/// Table flags shared by `diff` and `print`. Unset flags fall back to the config file.
#[derive(Debug, Clone, Default, Args)]
pub struct TableOptions {
    /// Comma-separated statistic columns, e.g. `total,min,max,p99,stddev`.
    #[arg(long, value_name = "LIST")]
    pub columns: Option<String>,

    #[arg(long)]
    pub unit: Option<DisplayUnit>,

    /// Minimum absolute delta, in the display unit, before a change is shown.
    #[arg(long)]
    pub threshold: Option<f64>,

    #[arg(long)]
    pub color: Option<ColorChoice>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableSettings {
    pub columns: Vec<StatColumn>,
    pub unit: DisplayUnit,
    pub threshold: f64,
    pub color: ColorChoice,
}

impl TableOptions {
    pub fn resolve(&self, config: &Config, no_color: bool) -> DiffResult<TableSettings> {
        let columns = match &self.columns {
            Some(list) => parse_column_list(list)?,
            None => config.column_list()?,
        };
        let threshold = self.threshold.unwrap_or(config.threshold);
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(DiffError::InvalidArgument(format!(
                "--threshold must be a non-negative number (got {threshold})"
            )));
        }
        let color = if no_color {
            ColorChoice::Never
        } else {
            self.color.unwrap_or(config.color)
        };
        Ok(TableSettings {
            columns,
            unit: self.unit.unwrap_or(config.unit),
            threshold,
            color,
        })
    }
}

#[derive(Debug, Clone, Args)]
pub struct DiffArgs {
    /// Profile files or glob patterns. The first profile is the baseline.
    #[arg(value_name = "PROFILE", required = true)]
    pub profiles: Vec<String>,

    #[command(flatten)]
    pub table: TableOptions,
}

#[derive(Debug, Clone)]
pub enum DiffOutput {
    Table { table: Table, color: ColorChoice },
    Report(DiffReport),
}

pub fn diff_command(
    config: &Config,
    args: &DiffArgs,
    json: bool,
    no_color: bool,
) -> DiffResult<DiffOutput> {
    let paths = expand_profile_args(&args.profiles)?;
    if paths.len() < 2 {
        return Err(DiffError::NotEnoughProfiles { got: paths.len() });
    }
    let settings = args.table.resolve(config, no_color)?;
    let profiles = load_profiles(&paths)?;
    Ok(render_comparison(&profiles, &settings, json))
}

/// Correlate, format and assemble already-loaded profiles. The first profile
/// is the baseline and also picks the unit when `auto` is requested.
pub fn render_comparison(
    profiles: &[Profile],
    settings: &TableSettings,
    json: bool,
) -> DiffOutput {
    let sample = profiles.first().map(|p| p.target.total_time).unwrap_or(0);
    let unit = resolve_unit(settings.unit, sample);
    tracing::debug!(
        "rendering {} profiles in {} (threshold {})",
        profiles.len(),
        unit.suffix(),
        settings.threshold
    );

    let palette: &dyn Palette = match settings.color {
        ColorChoice::Never => &PlainPalette,
        ColorChoice::Auto | ColorChoice::Always => &AnsiPalette,
    };
    let formatter = DiffFormatter::new(unit, settings.threshold, palette);
    let correlation = correlate(profiles);

    let columns = &settings.columns;
    if json {
        DiffOutput::Report(build_report(profiles, &correlation, columns, &formatter))
    } else {
        DiffOutput::Table {
            table: build_table(profiles, &correlation, columns, &formatter),
            color: settings.color,
        }
    }
}

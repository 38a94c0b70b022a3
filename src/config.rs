//! `stackdiff.toml` config loading.

use serde::{Deserialize, Serialize};

use std::path::{Path, PathBuf};

use crate::{DiffError, DiffResult, DisplayUnit, StatColumn, parse_column_list};

pub const DEFAULT_CONFIG_FILE: &str = "stackdiff.toml";
pub const DEFAULT_COLUMNS: &str = "total,min,max,mean,invocations";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl clap::ValueEnum for ColorChoice {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Auto, Self::Always, Self::Never]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Auto => clap::builder::PossibleValue::new("auto"),
            Self::Always => clap::builder::PossibleValue::new("always"),
            Self::Never => clap::builder::PossibleValue::new("never"),
        })
    }
}

impl ColorChoice {
    /// Whether escapes reach the output, given whether stdout is a terminal.
    pub fn keeps_escapes(self, stdout_is_terminal: bool) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => stdout_is_terminal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Comma-separated statistic columns.
    #[serde(default = "default_columns")]
    pub columns: String,

    #[serde(default = "default_unit")]
    pub unit: DisplayUnit,

    /// Minimum absolute delta, in the display unit, before a change is shown.
    #[serde(default)]
    pub threshold: f64,

    #[serde(default = "default_color")]
    pub color: ColorChoice,
}

fn default_columns() -> String {
    DEFAULT_COLUMNS.to_string()
}

fn default_unit() -> DisplayUnit {
    DisplayUnit::Ms
}

fn default_color() -> ColorChoice {
    ColorChoice::Auto
}

impl Default for Config {
    fn default() -> Self {
        Self {
            columns: default_columns(),
            unit: default_unit(),
            threshold: 0.0,
            color: default_color(),
        }
    }
}

impl Config {
    pub fn default_path() -> PathBuf {
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }

    /// Load `path`, falling back to defaults when it is missing or broken.
    pub fn load_optional(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(s) => match Self::parse(&s) {
                Ok(cfg) => cfg,
                Err(err) => {
                    tracing::warn!("failed to parse config {}: {err}", path.display());
                    Self::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(err) => {
                tracing::warn!("failed to read config {}: {err}", path.display());
                Self::default()
            }
        }
    }

    /// Strict load for an explicitly requested config file.
    pub fn load(path: &Path) -> DiffResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|err| {
            DiffError::Config(format!("failed to read config {}: {err}", path.display()))
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> DiffResult<Self> {
        let cfg: Config = toml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> DiffResult<()> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(DiffError::Config(format!(
                "threshold must be a non-negative number (got {})",
                self.threshold
            )));
        }
        Ok(())
    }

    pub fn column_list(&self) -> DiffResult<Vec<StatColumn>> {
        parse_column_list(&self.columns)
    }
}

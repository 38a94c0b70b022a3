//! Call-stack profile model and JSON loading.

use serde::{Deserialize, Serialize};

use std::path::{Path, PathBuf};

use crate::{DiffError, DiffResult};

/// Measurements for one call-stack node. Durations are nanoseconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricRecord {
    pub fn_name: String,
    #[serde(default)]
    pub total_time: i64,
    #[serde(default)]
    pub min_time: i64,
    #[serde(default)]
    pub max_time: i64,
    #[serde(default)]
    pub mean_time: i64,
    #[serde(default)]
    pub median_time: i64,
    #[serde(default)]
    pub p50_time: i64,
    #[serde(default)]
    pub p75_time: i64,
    #[serde(default)]
    pub p90_time: i64,
    #[serde(default)]
    pub p99_time: i64,
    #[serde(default)]
    pub std_dev: f64,
    #[serde(default)]
    pub invocations: u64,
    #[serde(default, rename = "nestedCalls")]
    pub children: Vec<MetricRecord>,
}

impl MetricRecord {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Depth-first pre-order walk; the callback receives each node and its depth.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a MetricRecord, usize)) {
        self.walk_at(0, visit);
    }

    fn walk_at<'a>(&'a self, depth: usize, visit: &mut impl FnMut(&'a MetricRecord, usize)) {
        visit(self, depth);
        for child in &self.children {
            child.walk_at(depth + 1, visit);
        }
    }

    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_, _| count += 1);
        count
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub target: MetricRecord,
}

impl Profile {
    pub fn new(label: Option<String>, target: MetricRecord) -> Self {
        Self { label, target }
    }

    /// The free-text label, ignoring empty strings.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref().filter(|l| !l.trim().is_empty())
    }

    /// Header group text for this profile at `index` in an N-way comparison.
    pub fn display_label(&self, index: usize) -> String {
        match (self.label(), index) {
            (Some(label), 0) => format!("{label} - baseline"),
            (Some(label), _) => label.to_string(),
            (None, 0) => "baseline".to_string(),
            (None, n) => format!("profile {n}"),
        }
    }

    pub fn load(path: &Path) -> DiffResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| DiffError::Load {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let profile: Profile = serde_json::from_slice(&bytes).map_err(|e| DiffError::Load {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        tracing::debug!(
            "loaded profile {} ({} nodes, root {:?})",
            path.display(),
            profile.target.node_count(),
            profile.target.fn_name
        );
        Ok(profile)
    }

    pub fn write_json(&self, path: &Path) -> DiffResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(self)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

pub fn load_profiles(paths: &[PathBuf]) -> DiffResult<Vec<Profile>> {
    paths.iter().map(|p| Profile::load(p.as_path())).collect()
}

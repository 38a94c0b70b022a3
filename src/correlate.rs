//! Cross-profile grouping of call-stack nodes by function name.

use std::collections::HashMap;

use crate::{MetricRecord, Profile};

/// All nodes named `fn_name`, one slot per input profile.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationRow<'a> {
    pub fn_name: &'a str,
    pub metrics: Vec<Option<&'a MetricRecord>>,
}

impl<'a> CorrelationRow<'a> {
    pub fn baseline(&self) -> Option<&'a MetricRecord> {
        self.metrics.first().copied().flatten()
    }

    pub fn get(&self, profile_index: usize) -> Option<&'a MetricRecord> {
        self.metrics.get(profile_index).copied().flatten()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Correlation<'a> {
    rows: Vec<CorrelationRow<'a>>,
    by_name: HashMap<&'a str, usize>,
}

impl<'a> Correlation<'a> {
    /// Rows in first-seen order (profile by profile, depth-first pre-order).
    pub fn rows(&self) -> &[CorrelationRow<'a>] {
        &self.rows
    }

    pub fn get(&self, fn_name: &str) -> Option<&CorrelationRow<'a>> {
        self.by_name.get(fn_name).map(|&i| &self.rows[i])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn record(&mut self, profile_count: usize, profile_index: usize, node: &'a MetricRecord) {
        let index = match self.by_name.get(node.fn_name.as_str()) {
            Some(&index) => index,
            None => {
                let index = self.rows.len();
                self.rows.push(CorrelationRow {
                    fn_name: node.fn_name.as_str(),
                    metrics: vec![None; profile_count],
                });
                self.by_name.insert(node.fn_name.as_str(), index);
                index
            }
        };
        // A name seen twice in one profile keeps the last node visited.
        self.rows[index].metrics[profile_index] = Some(node);
    }
}

/// Group every node of every profile by function name. Matching is purely by
/// name, so trees of any shape correlate.
pub fn correlate(profiles: &[Profile]) -> Correlation<'_> {
    let mut correlation = Correlation::default();
    for (profile_index, profile) in profiles.iter().enumerate() {
        profile.target.walk(&mut |node, _depth| {
            correlation.record(profiles.len(), profile_index, node);
        });
    }
    tracing::debug!(
        "correlated {} profiles into {} rows",
        profiles.len(),
        correlation.len()
    );
    correlation
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str, total: i64, children: Vec<MetricRecord>) -> MetricRecord {
        MetricRecord {
            fn_name: name.to_string(),
            total_time: total,
            children,
            ..MetricRecord::default()
        }
    }

    fn leaf(name: &str) -> MetricRecord {
        node(name, 0, vec![])
    }

    fn presence(row: &CorrelationRow<'_>) -> Vec<bool> {
        row.metrics.iter().map(Option::is_some).collect()
    }

    fn profile(target: MetricRecord) -> Profile {
        Profile::new(None, target)
    }

    #[test]
    fn correlates_trees_of_different_shape() {
        let foo = node("foo", 0, vec![leaf("bar")]);
        let profiles = vec![
            profile(node("main", 0, vec![foo])),
            profile(node("main", 0, vec![leaf("bar")])),
        ];
        let correlation = correlate(&profiles);
        assert_eq!(correlation.len(), 3);

        let cases = [
            ("main", true, true),
            ("foo", true, false),
            ("bar", true, true),
        ];
        for (index, (name, left, right)) in cases.into_iter().enumerate() {
            let row = &correlation.rows()[index];
            assert_eq!(row.fn_name, name, "case {index}");
            assert_eq!(row.metrics.len(), profiles.len(), "case {index}");
            assert_eq!(row.get(0).is_some(), left, "case {index}");
            assert_eq!(row.get(1).is_some(), right, "case {index}");
        }
    }

    #[test]
    fn row_count_matches_distinct_names_across_all_profiles() {
        let profiles = vec![
            profile(node("main", 0, vec![leaf("a")])),
            profile(node("main", 0, vec![leaf("b")])),
            profile(node("entry", 0, vec![leaf("a"), leaf("c")])),
        ];
        let correlation = correlate(&profiles);
        let names: Vec<&str> = correlation.rows().iter().map(|r| r.fn_name).collect();
        assert_eq!(names, vec!["main", "a", "b", "entry", "c"]);

        let b = correlation.get("b").expect("b row");
        assert_eq!(presence(b), vec![false, true, false]);
        assert!(b.baseline().is_none());
        let a = correlation.get("a").expect("a row");
        assert_eq!(presence(a), vec![true, false, true]);
    }

    #[test]
    fn repeated_name_keeps_last_visited_node() {
        let profiles = vec![profile(node(
            "main",
            1,
            vec![
                node("work", 10, vec![node("work", 20, vec![])]),
                node("work", 30, vec![]),
            ],
        ))];
        let correlation = correlate(&profiles);
        assert_eq!(correlation.len(), 2);
        let work = correlation.get("work").expect("work row");
        assert_eq!(work.baseline().map(|m| m.total_time), Some(30));
    }

    #[test]
    fn empty_input_has_no_rows() {
        let correlation = correlate(&[]);
        assert!(correlation.is_empty());
        assert!(correlation.get("main").is_none());
    }
}

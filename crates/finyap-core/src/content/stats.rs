//! Scenario statistics for the selection screen.

use std::collections::{BTreeMap, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Aggregated play history for one scenario, read from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioStat {
    pub name: String,
    pub total_plays: u64,
    pub correct_plays: u64,
    pub sentence_count: u64,
}

impl ScenarioStat {
    /// Share of successful plays, 0.0 .. 100.0. Zero when never played.
    pub fn accuracy_pct(&self) -> f64 {
        if self.total_plays == 0 {
            return 0.0;
        }
        self.correct_plays as f64 / self.total_plays as f64 * 100.0
    }
}

/// Most-played scenarios first; scenarios with equal play counts are
/// shuffled so ties do not always list in the same order.
pub fn order_stats<R: Rng + ?Sized>(stats: Vec<ScenarioStat>, rng: &mut R) -> Vec<ScenarioStat> {
    let mut groups: BTreeMap<u64, Vec<ScenarioStat>> = BTreeMap::new();
    for stat in stats {
        groups.entry(stat.total_plays).or_default().push(stat);
    }
    groups
        .into_values()
        .rev()
        .flat_map(|mut group| {
            group.shuffle(&mut *rng);
            group
        })
        .collect()
}

/// Case-insensitive substring filter on scenario name.
pub fn filter_stats<'a>(stats: &'a [ScenarioStat], query: &str) -> Vec<&'a ScenarioStat> {
    let query = query.to_lowercase();
    stats
        .iter()
        .filter(|s| s.name.to_lowercase().contains(&query))
        .collect()
}

/// Scenarios picked on the selection screen.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    selected: HashSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, name: &str) -> bool {
        if !self.selected.remove(name) {
            self.selected.insert(name.to_string());
            return true;
        }
        false
    }

    pub fn select(&mut self, name: &str) {
        self.selected.insert(name.to_string());
    }

    pub fn select_all<'a>(&mut self, stats: impl IntoIterator<Item = &'a ScenarioStat>) {
        self.selected.extend(stats.into_iter().map(|s| s.name.clone()));
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selected.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected names in the order they appear in `displayed`.
    ///
    /// This order becomes the block order of the session queue.
    pub fn ordered(&self, displayed: &[ScenarioStat]) -> Vec<String> {
        displayed
            .iter()
            .filter(|s| self.selected.contains(&s.name))
            .map(|s| s.name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Mcg128Xsl64;

    fn stat(name: &str, total: u64, correct: u64) -> ScenarioStat {
        ScenarioStat {
            name: name.into(),
            total_plays: total,
            correct_plays: correct,
            sentence_count: 5,
        }
    }

    #[test]
    fn accuracy_is_zero_without_plays() {
        assert_eq!(stat("a", 0, 0).accuracy_pct(), 0.0);
        assert_eq!(stat("a", 4, 3).accuracy_pct(), 75.0);
    }

    #[test]
    fn orders_by_play_count_descending() {
        let mut rng = Mcg128Xsl64::seed_from_u64(7);
        let stats = vec![stat("a", 1, 0), stat("b", 5, 2), stat("c", 0, 0), stat("d", 5, 5)];
        let ordered = order_stats(stats, &mut rng);
        let plays: Vec<_> = ordered.iter().map(|s| s.total_plays).collect();
        assert_eq!(plays, vec![5, 5, 1, 0]);
        assert_eq!(ordered[3].name, "c");
    }

    #[test]
    fn filter_matches_substring_ignoring_case() {
        let stats = vec![stat("Food.tsv", 0, 0), stat("travel.tsv", 0, 0)];
        let hits = filter_stats(&stats, "FOO");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Food.tsv");
        assert_eq!(filter_stats(&stats, "").len(), 2);
    }

    #[test]
    fn selection_follows_display_order() {
        let stats = vec![stat("a", 0, 0), stat("b", 0, 0), stat("c", 0, 0)];
        let mut sel = Selection::new();
        assert!(sel.toggle("c"));
        sel.select("a");
        assert_eq!(sel.ordered(&stats), vec!["a", "c"]);
        assert!(!sel.toggle("a"));
        assert_eq!(sel.ordered(&stats), vec!["c"]);
        sel.clear();
        assert!(sel.is_empty());
        sel.select_all(&stats);
        assert_eq!(sel.ordered(&stats).len(), 3);
    }
}

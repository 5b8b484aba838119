use std::collections::HashMap;

use crate::catalog::Catalog;
use crate::model::LaunchItem;

pub const DEFAULT_RECENT_CAPACITY: usize = 8;
pub const DEFAULT_FREQUENT_LIMIT: usize = 10;

/// Launch counts plus a move-to-front list of recently launched identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchHistory {
    counts: HashMap<String, u64>,
    recent: Vec<String>,
    recent_capacity: usize,
}

impl Default for LaunchHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_RECENT_CAPACITY)
    }
}

impl LaunchHistory {
    pub fn with_capacity(recent_capacity: usize) -> Self {
        Self {
            counts: HashMap::new(),
            recent: Vec::new(),
            recent_capacity: recent_capacity.max(1),
        }
    }

    /// Rebuilds history from persisted values. Duplicate or blank entries in
    /// the stored recency list are dropped and the list is re-capped.
    pub fn from_persisted(
        counts: HashMap<String, u64>,
        recent: Vec<String>,
        recent_capacity: usize,
    ) -> Self {
        let mut history = Self::with_capacity(recent_capacity);
        history.counts = counts;
        for id in recent {
            if id.trim().is_empty() || history.recent.contains(&id) {
                continue;
            }
            history.recent.push(id);
        }
        history.recent.truncate(history.recent_capacity);
        history
    }

    pub fn record(&mut self, id: &str) {
        *self.counts.entry(id.to_string()).or_insert(0) += 1;

        self.recent.retain(|existing| existing != id);
        self.recent.insert(0, id.to_string());
        self.recent.truncate(self.recent_capacity);
    }

    pub fn count(&self, id: &str) -> u64 {
        self.counts.get(id).copied().unwrap_or(0)
    }

    pub fn counts(&self) -> &HashMap<String, u64> {
        &self.counts
    }

    pub fn recent_ids(&self) -> &[String] {
        &self.recent
    }

    pub fn recent_capacity(&self) -> usize {
        self.recent_capacity
    }

    /// Recently launched items still present in `catalog`, most recent first.
    pub fn recent_items(&self, catalog: &Catalog) -> Vec<LaunchItem> {
        self.recent
            .iter()
            .filter_map(|id| catalog.lookup(id).cloned())
            .collect()
    }

    /// Items by descending launch count, limited to `limit`. Equal counts have
    /// no guaranteed relative order.
    pub fn frequent_items(&self, catalog: &Catalog, limit: usize) -> Vec<LaunchItem> {
        let mut ranked: Vec<(&String, u64)> = self
            .counts
            .iter()
            .map(|(id, count)| (id, *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        ranked
            .into_iter()
            .filter_map(|(id, _)| catalog.lookup(id).cloned())
            .take(limit)
            .collect()
    }
}

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use crate::model::LaunchItem;

/// Immutable snapshot of every launchable item found by the last scan.
/// Cloning is cheap; a rescan builds a new snapshot and swaps it in whole.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Arc<[LaunchItem]>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            items: Vec::new().into(),
        }
    }
}

impl Catalog {
    pub fn new(mut items: Vec<LaunchItem>) -> Self {
        let mut seen = HashSet::new();
        items.retain(|item| seen.insert(item.id.clone()));
        items.sort_by(compare_items);
        Self {
            items: items.into(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[LaunchItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn lookup(&self, id: &str) -> Option<&LaunchItem> {
        self.items.iter().find(|item| item.id == id)
    }
}

fn compare_items(a: &LaunchItem, b: &LaunchItem) -> Ordering {
    natural_cmp(&a.name, &b.name).then_with(|| a.id.cmp(&b.id))
}

/// Case-insensitive compare where runs of ASCII digits compare by value,
/// so "Xcode 9" sorts before "Xcode 10".
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let left: Vec<char> = a.chars().flat_map(|c| c.to_lowercase()).collect();
    let right: Vec<char> = b.chars().flat_map(|c| c.to_lowercase()).collect();

    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        if left[i].is_ascii_digit() && right[j].is_ascii_digit() {
            let start_i = i;
            while i < left.len() && left[i].is_ascii_digit() {
                i += 1;
            }
            let start_j = j;
            while j < right.len() && right[j].is_ascii_digit() {
                j += 1;
            }
            let ordering = compare_digit_runs(&left[start_i..i], &right[start_j..j]);
            if ordering != Ordering::Equal {
                return ordering;
            }
            continue;
        }

        match left[i].cmp(&right[j]) {
            Ordering::Equal => {
                i += 1;
                j += 1;
            }
            other => return other,
        }
    }

    (left.len() - i).cmp(&(right.len() - j))
}

fn compare_digit_runs(a: &[char], b: &[char]) -> Ordering {
    let a = trim_leading_zeros(a);
    let b = trim_leading_zeros(b);
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn trim_leading_zeros(run: &[char]) -> &[char] {
    let first_significant = run.iter().position(|c| *c != '0').unwrap_or(run.len());
    &run[first_significant..]
}

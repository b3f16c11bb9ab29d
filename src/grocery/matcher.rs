use crate::grocery::constants::*;
use crate::grocery::normalize::normalize;
use crate::models::{IndexEntry, IngredientIndex};

/// Tunable weights for aisle scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchWeights {
    /// Added when the entry's aisle is set and is not "Other".
    pub non_other_aisle_bonus: u32,
    /// Upper bound on the specificity bonus (normalized description length).
    pub specificity_cap: usize,
    /// Added when the entry's debug metadata carries a strong aisle reason.
    pub strong_signal_bonus: u32,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            non_other_aisle_bonus: NON_OTHER_AISLE_BONUS,
            specificity_cap: SPECIFICITY_CAP,
            strong_signal_bonus: STRONG_SIGNAL_BONUS,
        }
    }
}

/// An autocomplete hit from [`IndexMatcher::search`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit<'a> {
    pub key: &'a str,
    pub entry: &'a IndexEntry,
    /// 1 = prefix match, 2 = substring match.
    pub rank: u8,
}

/// Bidirectional substring test between two normalized strings.
#[inline]
fn contains_either(entry_norm: &str, query: &str) -> bool {
    entry_norm.contains(query) || query.contains(entry_norm)
}

/// Classifies raw ingredient names against a reference index snapshot.
///
/// A matcher without an index degrades to "Other" for everything.
#[derive(Debug, Clone, Copy)]
pub struct IndexMatcher<'a> {
    index: Option<&'a IngredientIndex>,
    weights: MatchWeights,
}

impl<'a> IndexMatcher<'a> {
    pub fn new(index: &'a IngredientIndex) -> Self {
        Self {
            index: Some(index),
            weights: MatchWeights::default(),
        }
    }

    /// A matcher for when the reference index is not available.
    pub fn without_index() -> Self {
        Self {
            index: None,
            weights: MatchWeights::default(),
        }
    }

    pub fn with_weights(mut self, weights: MatchWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn weights(&self) -> MatchWeights {
        self.weights
    }

    fn entries(&self) -> impl Iterator<Item = (&'a String, &'a IndexEntry)> {
        self.index.into_iter().flat_map(|idx| idx.iter())
    }

    /// Score an entry that already passed the containment test.
    pub fn score(&self, entry: &IndexEntry) -> u32 {
        let mut score = 0;

        if !entry.aisle.is_empty() && entry.aisle != OTHER_AISLE {
            score += self.weights.non_other_aisle_bonus;
        }

        score += entry.normalized.len().min(self.weights.specificity_cap) as u32;

        if entry.has_strong_signal() {
            score += self.weights.strong_signal_bonus;
        }

        score
    }

    /// Find the index entry for a raw name: exact normalized match first,
    /// then the first entry related by containment in either direction.
    pub fn find_best_match(&self, raw_name: &str) -> Option<&'a IndexEntry> {
        let query = normalize(raw_name);
        if query.is_empty() {
            return None;
        }

        if let Some((_, entry)) = self.entries().find(|(_, e)| e.normalized == query) {
            return Some(entry);
        }

        self.entries()
            .find(|(_, e)| !e.normalized.is_empty() && contains_either(&e.normalized, &query))
            .map(|(_, e)| e)
    }

    /// The highest-scoring containment match, first seen on ties.
    pub fn best_scored(&self, raw_name: &str) -> Option<&'a IndexEntry> {
        let query = normalize(raw_name);
        if query.is_empty() {
            return None;
        }

        let mut best: Option<(&IndexEntry, u32)> = None;

        for (_, entry) in self.entries() {
            if entry.normalized.is_empty() || !contains_either(&entry.normalized, &query) {
                continue;
            }

            let score = self.score(entry);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((entry, score)),
            }
        }

        best.map(|(entry, _)| entry)
    }

    /// Aisle for a raw ingredient name; "Other" when nothing matches.
    pub fn aisle_for(&self, raw_name: &str) -> String {
        self.best_scored(raw_name)
            .map(|e| e.aisle.trim())
            .filter(|aisle| !aisle.is_empty())
            .unwrap_or(OTHER_AISLE)
            .to_string()
    }

    /// Autocomplete search: prefix matches before substring matches, capped
    /// at `limit` hits in index order.
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchHit<'a>> {
        if query.trim().chars().count() < AUTOCOMPLETE_MIN_QUERY {
            return Vec::new();
        }

        let norm = normalize(query);
        if norm.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<SearchHit> = self
            .entries()
            .filter(|(_, e)| !e.normalized.is_empty())
            .filter_map(|(key, entry)| {
                let rank = if entry.normalized.starts_with(&norm) {
                    1
                } else if entry.normalized.contains(&norm) {
                    2
                } else {
                    return None;
                };
                Some(SearchHit {
                    key: key.as_str(),
                    entry,
                    rank,
                })
            })
            .take(limit)
            .collect();

        hits.sort_by_key(|h| h.rank);
        hits
    }
}

/// Convenience wrapper around [`IndexMatcher::find_best_match`].
pub fn find_best_match<'a>(raw_name: &str, index: &'a IngredientIndex) -> Option<&'a IndexEntry> {
    IndexMatcher::new(index).find_best_match(raw_name)
}

/// Convenience wrapper around [`IndexMatcher::aisle_for`].
pub fn aisle_for(raw_name: &str, index: &IngredientIndex) -> String {
    IndexMatcher::new(index).aisle_for(raw_name)
}

//! Single-flight cache of mapping results.
//!
//! Each distinct term gets one slot. The first caller fills it; concurrent
//! callers for the same term block on the slot until that value is ready,
//! so the lookup service sees every term at most once.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use evd_model::MappingResult;

type Slot = Arc<OnceLock<MappingResult>>;

/// Thread-safe term → [`MappingResult`] cache.
#[derive(Debug, Default)]
pub struct MappingCache {
    slots: Mutex<HashMap<String, Slot>>,
}

/// Whether [`MappingCache::get_or_query`] ran the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    Hit,
    Queried,
}

impl MappingCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, term: &str) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(term.to_string()).or_default())
    }

    /// Returns the cached result, if the term has been resolved.
    pub fn get(&self, term: &str) -> Option<MappingResult> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.get(term).and_then(|slot| slot.get().cloned())
    }

    /// Returns the cached result for `term`, running `query` if no caller
    /// has resolved it yet.
    ///
    /// The map lock is released before `query` runs; only callers waiting on
    /// the same term are blocked.
    pub fn get_or_query(
        &self,
        term: &str,
        query: impl FnOnce() -> MappingResult,
    ) -> (MappingResult, CacheOutcome) {
        let slot = self.slot(term);
        let mut outcome = CacheOutcome::Hit;
        let result = slot
            .get_or_init(|| {
                outcome = CacheOutcome::Queried;
                query()
            })
            .clone();
        (result, outcome)
    }

    /// Seeds the cache with known results. Terms already resolved keep
    /// their value. Returns how many entries were added.
    pub fn preload(&self, entries: impl IntoIterator<Item = (String, MappingResult)>) -> usize {
        entries
            .into_iter()
            .filter(|(term, result)| self.slot(term).set(result.clone()).is_ok())
            .count()
    }

    /// All resolved entries, ordered by term.
    pub fn snapshot(&self) -> BTreeMap<String, MappingResult> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots
            .iter()
            .filter_map(|(term, slot)| slot.get().map(|result| (term.clone(), result.clone())))
            .collect()
    }

    pub fn len(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.values().filter(|slot| slot.get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_call_is_a_hit() {
        let cache = MappingCache::new();
        let (first, outcome) = cache.get_or_query("Rett syndrome", || {
            MappingResult::unmatched("Rett syndrome")
        });
        assert_eq!(outcome, CacheOutcome::Queried);

        let (second, outcome) =
            cache.get_or_query("Rett syndrome", || panic!("must not query twice"));
        assert_eq!(outcome, CacheOutcome::Hit);
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn preload_does_not_overwrite() {
        let cache = MappingCache::new();
        cache.get_or_query("a", || MappingResult::unmatched("a"));

        let mut replacement = MappingResult::unmatched("a");
        replacement.ontology_term = Some("EFO:1".to_string());
        let added = cache.preload([
            ("a".to_string(), replacement),
            ("b".to_string(), MappingResult::unmatched("b")),
        ]);
        assert_eq!(added, 1);
        assert_eq!(cache.get("a").unwrap().ontology_term, None);

        let snapshot = cache.snapshot();
        assert_eq!(snapshot.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}

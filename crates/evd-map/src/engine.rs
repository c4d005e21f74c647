//! Ontology mapping reconciliation.
//!
//! Every phenotype is looked up twice: by its cleaned label (free text) and
//! by its structured identifier. The two answers are combined as follows:
//!
//! | label result | id result          | outcome                      |
//! |--------------|--------------------|------------------------------|
//! | `match`      | any                | label, `match`               |
//! | `fuzzy`      | same non-null term | label, upgraded to `match`   |
//! | `fuzzy`      | other / none       | label, stays `fuzzy`         |
//! | none/unmatched | `match`          | id, `match`                  |
//! | otherwise    |                    | `unmatched`                  |
//!
//! [`Reconciler::reconcile_by_identifier`] is the stricter variant for curated
//! sources that carry an ontology id: the id is tried first, the label only
//! when the id gives no `match`, and a fuzzy label is never upgraded.
//!
//! Lookups go through a [`MappingCache`], so each distinct term reaches the
//! service at most once, and through a [`RetryPolicy`]. A term whose lookup
//! keeps failing is recorded as unmatched and the batch continues.

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::{debug, info, warn};

use evd_model::{MappingResult, MappingRoute, MatchQuality, Phenotype, ReconciledMapping};

use crate::cache::{CacheOutcome, MappingCache};
use crate::lookup::OntologyLookup;
use crate::retry::RetryPolicy;

/// Counters collected while reconciling, reported in the run summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Distinct terms sent to the lookup.
    pub lookups: usize,
    /// Distinct terms answered from the cache.
    pub cache_hits: usize,
    /// Terms whose lookup failed after retries.
    pub failed_terms: BTreeSet<String>,
    /// Fuzzy label results confirmed by the identifier lookup.
    pub upgraded: usize,
    pub matched: usize,
    pub fuzzy: usize,
    pub unmatched: usize,
}

impl ReconcileStats {
    pub fn failures(&self) -> usize {
        self.failed_terms.len()
    }

    fn record(&mut self, quality: MatchQuality) {
        match quality {
            MatchQuality::Match => self.matched += 1,
            MatchQuality::Fuzzy => self.fuzzy += 1,
            MatchQuality::Unmatched => self.unmatched += 1,
        }
    }
}

/// Reconciles phenotypes against an [`OntologyLookup`], reusing one cache
/// across calls.
pub struct Reconciler<'a, L: OntologyLookup + ?Sized> {
    lookup: &'a L,
    cache: &'a MappingCache,
    retry: RetryPolicy,
    stats: ReconcileStats,
}

impl<'a, L: OntologyLookup + ?Sized> Reconciler<'a, L> {
    pub fn new(lookup: &'a L, cache: &'a MappingCache) -> Self {
        Self {
            lookup,
            cache,
            retry: RetryPolicy::default(),
            stats: ReconcileStats::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn stats(&self) -> &ReconcileStats {
        &self.stats
    }

    pub fn into_stats(self) -> ReconcileStats {
        self.stats
    }

    /// Maps each phenotype, in input order.
    pub fn reconcile(&mut self, phenotypes: &[Phenotype]) -> Vec<ReconciledMapping> {
        let resolved = self.resolve_terms(phenotypes);

        let mappings: Vec<ReconciledMapping> = phenotypes
            .iter()
            .map(|phenotype| {
                let label = phenotype.label().and_then(|label| resolved.get(label));
                let id = phenotype
                    .source_id()
                    .and_then(|id| resolved.get(&id.to_string()));
                let (mapping, route) = combine(phenotype, label, id);
                if mapping.corroborated {
                    self.stats.upgraded += 1;
                }
                self.stats.record(mapping.match_quality);
                ReconciledMapping {
                    phenotype: phenotype.clone(),
                    mapping,
                    route,
                }
            })
            .collect();

        info!(
            phenotypes = phenotypes.len(),
            terms = resolved.len(),
            failures = self.stats.failures(),
            "reconciled phenotype mappings"
        );
        mappings
    }

    /// Maps each phenotype by identifier first and label second, keeping only
    /// `match` results. A fuzzy label answer is reported as-is and is never
    /// accepted under [`evd_model::MappingPolicy::MatchOnly`].
    pub fn reconcile_by_identifier(&mut self, phenotypes: &[Phenotype]) -> Vec<ReconciledMapping> {
        let mappings: Vec<ReconciledMapping> = phenotypes
            .iter()
            .map(|phenotype| {
                let (mapping, route) = self.resolve_by_identifier(phenotype);
                self.stats.record(mapping.match_quality);
                ReconciledMapping {
                    phenotype: phenotype.clone(),
                    mapping,
                    route,
                }
            })
            .collect();
        info!(
            phenotypes = phenotypes.len(),
            failures = self.stats.failures(),
            "reconciled curated mappings"
        );
        mappings
    }

    fn resolve_by_identifier(&mut self, phenotype: &Phenotype) -> (MappingResult, MappingRoute) {
        let id_result = phenotype
            .source_id()
            .map(|id| self.resolve(&id.to_string()));
        if let Some(result) = id_result.as_ref().filter(|result| result.is_match()) {
            return (result.clone(), MappingRoute::SourceId);
        }
        let label_result = phenotype.label().map(|label| self.resolve(label));
        match label_result {
            Some(result) if result.is_match() => (result, MappingRoute::Label),
            Some(result) if result.match_quality == MatchQuality::Fuzzy => {
                debug!(label = %result.queried_term, "fuzzy label ignored");
                (result, MappingRoute::Unresolved)
            }
            other => {
                let queried = other
                    .or(id_result)
                    .map_or_else(|| phenotype.display_name(), |result| result.queried_term);
                (MappingResult::unmatched(queried), MappingRoute::Unresolved)
            }
        }
    }

    /// Resolves every distinct label and identifier once.
    fn resolve_terms(&mut self, phenotypes: &[Phenotype]) -> HashMap<String, MappingResult> {
        let mut seen = HashSet::new();
        let terms: Vec<String> = phenotypes
            .iter()
            .flat_map(|phenotype| {
                let label = phenotype.label().map(str::to_string);
                let id = phenotype.source_id().map(ToString::to_string);
                label.into_iter().chain(id)
            })
            .filter(|term| seen.insert(term.clone()))
            .collect();

        terms
            .into_iter()
            .map(|term| {
                let result = self.resolve(&term);
                (term, result)
            })
            .collect()
    }

    fn resolve(&mut self, term: &str) -> MappingResult {
        let mut failed = false;
        let (result, outcome) = self.cache.get_or_query(term, || {
            match self.retry.run(term, || self.lookup.find_term(term)) {
                Ok(Some(hit)) => hit.into_result(term),
                Ok(None) => MappingResult::unmatched(term),
                Err(err) => {
                    warn!(term = %term, error = %err, "ontology lookup failed, treating as unmatched");
                    failed = true;
                    MappingResult::unmatched(term)
                }
            }
        });
        match outcome {
            CacheOutcome::Hit => self.stats.cache_hits += 1,
            CacheOutcome::Queried => self.stats.lookups += 1,
        }
        if failed {
            self.stats.failed_terms.insert(term.to_string());
        }
        result
    }
}

/// Maps phenotypes with a fresh cache and the default retry policy.
pub fn reconcile<L: OntologyLookup + ?Sized>(
    phenotypes: &[Phenotype],
    lookup: &L,
) -> Vec<ReconciledMapping> {
    let cache = MappingCache::new();
    Reconciler::new(lookup, &cache).reconcile(phenotypes)
}

fn combine(
    phenotype: &Phenotype,
    label: Option<&MappingResult>,
    id: Option<&MappingResult>,
) -> (MappingResult, MappingRoute) {
    if let Some(label_result) = label.filter(|result| result.match_quality != MatchQuality::Unmatched)
    {
        let mut mapping = label_result.clone();
        if let Some(witness) = id
            && mapping.corroborate_with(witness)
        {
            debug!(
                label = %mapping.queried_term,
                term = ?mapping.ontology_term,
                "fuzzy mapping confirmed by identifier"
            );
        }
        return (mapping, MappingRoute::Label);
    }

    if let Some(id_result) = id.filter(|result| result.is_match()) {
        return (id_result.clone(), MappingRoute::SourceId);
    }

    let queried = label
        .or(id)
        .map_or_else(|| phenotype.display_name(), |result| result.queried_term.clone());
    (MappingResult::unmatched(queried), MappingRoute::Unresolved)
}

#[cfg(test)]
mod tests {
    use evd_model::SourceId;

    use super::*;
    use crate::lookup::LookupHit;

    fn result(term: Option<&str>, quality: MatchQuality) -> MappingResult {
        MappingResult {
            queried_term: "q".to_string(),
            ontology_term: term.map(str::to_string),
            ontology_label: None,
            match_quality: quality,
            source: None,
            corroborated: false,
        }
    }

    fn phenotype() -> Phenotype {
        Phenotype::new(
            Some("Bladder cancer, somatic".to_string()),
            Some(SourceId::omim("109800").unwrap()),
        )
        .unwrap()
    }

    #[test]
    fn fuzzy_label_confirmed_by_identifier() {
        let label = result(Some("EFO:0001"), MatchQuality::Fuzzy);
        let id = result(Some("EFO:0001"), MatchQuality::Fuzzy);
        let (mapping, route) = combine(&phenotype(), Some(&label), Some(&id));
        assert_eq!(mapping.match_quality, MatchQuality::Match);
        assert!(mapping.corroborated);
        assert_eq!(route, MappingRoute::Label);
    }

    #[test]
    fn fuzzy_label_with_other_identifier_term_stays_fuzzy() {
        let label = result(Some("EFO:0001"), MatchQuality::Fuzzy);
        for id in [
            Some(result(Some("EFO:0002"), MatchQuality::Match)),
            Some(result(None, MatchQuality::Unmatched)),
            None,
        ] {
            let (mapping, route) = combine(&phenotype(), Some(&label), id.as_ref());
            assert_eq!(mapping.match_quality, MatchQuality::Fuzzy);
            assert_eq!(route, MappingRoute::Label);
        }
    }

    #[test]
    fn identifier_used_when_label_unmatched() {
        let label = result(None, MatchQuality::Unmatched);
        let id = result(Some("MONDO:0007915"), MatchQuality::Match);
        let (mapping, route) = combine(&phenotype(), Some(&label), Some(&id));
        assert_eq!(route, MappingRoute::SourceId);
        assert_eq!(mapping.ontology_term.as_deref(), Some("MONDO:0007915"));
    }

    #[test]
    fn fuzzy_identifier_alone_is_not_used() {
        let id = result(Some("MONDO:0007915"), MatchQuality::Fuzzy);
        let (mapping, route) = combine(&phenotype(), None, Some(&id));
        assert_eq!(route, MappingRoute::Unresolved);
        assert_eq!(mapping.match_quality, MatchQuality::Unmatched);
        assert_eq!(mapping.ontology_term, None);
    }

    #[test]
    fn reconcile_uses_both_lookups() {
        let lookup = |text: &str| -> crate::Result<Option<LookupHit>> {
            Ok(match text {
                "Bladder cancer, somatic" => Some(LookupHit::fuzzy("EFO:0000292")),
                "OMIM:109800" => Some(LookupHit::matched("EFO:0000292")),
                _ => None,
            })
        };
        let mappings = reconcile(&[phenotype()], &lookup);
        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings[0].quality(), MatchQuality::Match);
        assert_eq!(mappings[0].mapping.mapped_id().as_deref(), Some("EFO_0000292"));
    }
}

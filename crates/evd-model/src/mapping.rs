//! Ontology mapping results and the reconciliation outcome per phenotype.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ModelError, Phenotype};

/// Confidence of an ontology lookup.
///
/// Ordered `Unmatched < Fuzzy < Match`. The only transition allowed after a
/// result is built is `Fuzzy -> Match`, see [`MatchQuality::allows_transition_to`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MatchQuality {
    #[default]
    Unmatched,
    Fuzzy,
    Match,
}

impl MatchQuality {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unmatched => "unmatched",
            Self::Fuzzy => "fuzzy",
            Self::Match => "match",
        }
    }

    /// Returns true if a result of quality `self` may become `next`.
    #[must_use]
    pub fn allows_transition_to(self, next: Self) -> bool {
        self == next || (self == Self::Fuzzy && next == Self::Match)
    }
}

impl fmt::Display for MatchQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchQuality {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "match" => Ok(Self::Match),
            "fuzzy" => Ok(Self::Fuzzy),
            "" | "unmatched" | "none" | "null" => Ok(Self::Unmatched),
            other => Err(ModelError::InvalidMatchQuality(other.to_string())),
        }
    }
}

/// Result of querying the ontology service for one term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingResult {
    /// The text or identifier that was sent to the service.
    pub queried_term: String,
    /// Ontology term returned by the service (CURIE or IRI).
    pub ontology_term: Option<String>,
    /// Preferred label of the returned term.
    pub ontology_label: Option<String>,
    pub match_quality: MatchQuality,
    /// Which resource produced the answer (service-defined).
    pub source: Option<String>,
    /// Set when a fuzzy result was confirmed by the structured-id lookup.
    #[serde(default)]
    pub corroborated: bool,
}

impl MappingResult {
    pub fn unmatched(queried_term: impl Into<String>) -> Self {
        Self {
            queried_term: queried_term.into(),
            ontology_term: None,
            ontology_label: None,
            match_quality: MatchQuality::Unmatched,
            source: None,
            corroborated: false,
        }
    }

    pub fn is_match(&self) -> bool {
        self.match_quality == MatchQuality::Match
    }

    /// Upgrades a fuzzy result to a match when `witness` points at the same
    /// non-null ontology term. Returns true if the quality changed.
    pub fn corroborate_with(&mut self, witness: &MappingResult) -> bool {
        if self.match_quality != MatchQuality::Fuzzy {
            return false;
        }
        let (Some(own), Some(other)) = (&self.ontology_term, &witness.ontology_term) else {
            return false;
        };
        if own != other {
            return false;
        }
        debug_assert!(self.match_quality.allows_transition_to(MatchQuality::Match));
        self.match_quality = MatchQuality::Match;
        self.corroborated = true;
        true
    }

    /// The ontology term with its IRI namespace stripped, e.g.
    /// `http://www.ebi.ac.uk/efo/EFO_0000270` and `EFO:0000270` both give
    /// `EFO_0000270`.
    pub fn mapped_id(&self) -> Option<String> {
        self.ontology_term.as_deref().and_then(strip_namespace)
    }
}

/// Keeps the last path segment of an IRI and turns a CURIE colon into `_`.
pub fn strip_namespace(term: &str) -> Option<String> {
    let last = term.trim().trim_end_matches('/').rsplit('/').next()?;
    let last = last.rsplit('#').next().unwrap_or(last);
    if last.is_empty() {
        return None;
    }
    Some(last.replacen(':', "_", 1))
}

/// Which lookup produced the final mapping of a phenotype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingRoute {
    /// The free-text label lookup (possibly corroborated by the id).
    Label,
    /// The structured-id lookup, used when the label gave nothing.
    SourceId,
    /// Neither lookup produced a usable term.
    Unresolved,
}

/// Which mapping qualities are kept in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MappingPolicy {
    /// Keep only `match` mappings.
    #[default]
    MatchOnly,
    /// Keep `match` and uncorroborated `fuzzy` mappings.
    KeepFuzzy,
}

impl MappingPolicy {
    #[must_use]
    pub fn accepts(&self, quality: MatchQuality) -> bool {
        match self {
            Self::MatchOnly => quality == MatchQuality::Match,
            Self::KeepFuzzy => quality >= MatchQuality::Fuzzy,
        }
    }
}

/// A phenotype with its final mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciledMapping {
    pub phenotype: Phenotype,
    pub mapping: MappingResult,
    pub route: MappingRoute,
}

impl ReconciledMapping {
    pub fn quality(&self) -> MatchQuality {
        self.mapping.match_quality
    }

    pub fn is_accepted(&self, policy: MappingPolicy) -> bool {
        policy.accepts(self.mapping.match_quality) && self.mapping.ontology_term.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fuzzy(term: Option<&str>) -> MappingResult {
        MappingResult {
            queried_term: "Bladder cancer".to_string(),
            ontology_term: term.map(str::to_string),
            ontology_label: None,
            match_quality: MatchQuality::Fuzzy,
            source: None,
            corroborated: false,
        }
    }

    #[test]
    fn quality_order() {
        assert!(MatchQuality::Unmatched < MatchQuality::Fuzzy);
        assert!(MatchQuality::Fuzzy < MatchQuality::Match);
        assert!(!MatchQuality::Unmatched.allows_transition_to(MatchQuality::Match));
        assert!(!MatchQuality::Match.allows_transition_to(MatchQuality::Fuzzy));
        assert!(MatchQuality::Fuzzy.allows_transition_to(MatchQuality::Match));
    }

    #[test]
    fn corroboration_requires_equal_terms() {
        let mut result = fuzzy(Some("EFO:0001"));
        assert!(!result.corroborate_with(&fuzzy(Some("EFO:0002"))));
        assert!(!result.corroborate_with(&fuzzy(None)));
        assert_eq!(result.match_quality, MatchQuality::Fuzzy);

        assert!(result.corroborate_with(&fuzzy(Some("EFO:0001"))));
        assert_eq!(result.match_quality, MatchQuality::Match);
        assert!(result.corroborated);
    }

    #[test]
    fn null_terms_never_corroborate() {
        let mut result = fuzzy(None);
        assert!(!result.corroborate_with(&fuzzy(None)));
    }

    #[test]
    fn unmatched_is_never_upgraded() {
        let mut result = MappingResult::unmatched("x");
        result.ontology_term = Some("EFO:0001".to_string());
        assert!(!result.corroborate_with(&fuzzy(Some("EFO:0001"))));
        assert_eq!(result.match_quality, MatchQuality::Unmatched);
    }

    #[test]
    fn strips_namespaces() {
        assert_eq!(
            strip_namespace("http://www.ebi.ac.uk/efo/EFO_0000270").as_deref(),
            Some("EFO_0000270")
        );
        assert_eq!(strip_namespace("EFO:0000270").as_deref(), Some("EFO_0000270"));
        assert_eq!(
            strip_namespace("http://purl.obolibrary.org/obo/MONDO_0007915").as_deref(),
            Some("MONDO_0007915")
        );
        assert_eq!(strip_namespace("  "), None);
    }

    #[test]
    fn policy_filters_quality() {
        assert!(MappingPolicy::MatchOnly.accepts(MatchQuality::Match));
        assert!(!MappingPolicy::MatchOnly.accepts(MatchQuality::Fuzzy));
        assert!(MappingPolicy::KeepFuzzy.accepts(MatchQuality::Fuzzy));
        assert!(!MappingPolicy::KeepFuzzy.accepts(MatchQuality::Unmatched));
    }

    #[test]
    fn quality_parses_service_values() {
        assert_eq!("match".parse::<MatchQuality>().unwrap(), MatchQuality::Match);
        assert_eq!(" Fuzzy ".parse::<MatchQuality>().unwrap(), MatchQuality::Fuzzy);
        assert_eq!("".parse::<MatchQuality>().unwrap(), MatchQuality::Unmatched);
        assert!("maybe".parse::<MatchQuality>().is_err());
    }
}

#![deny(unsafe_code)]

use std::fmt;
use std::str::FromStr;

use crate::ModelError;

/// Ontology namespace of a disease code found in source text.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Namespace {
    Omim,
    Orpha,
    Hp,
    Mondo,
}

impl Namespace {
    /// Canonical prefix used when rendering a [`SourceId`].
    #[must_use]
    pub const fn prefix(&self) -> &'static str {
        match self {
            Self::Omim => "OMIM",
            Self::Orpha => "ORPHA",
            Self::Hp => "HP",
            Self::Mondo => "MONDO",
        }
    }

    /// Resolves the prefix spellings seen in curated tables.
    ///
    /// `MIM` is an OMIM alias; `Orphanet` and `OrphaNet: ORPHA` are Orphanet
    /// aliases. Matching ignores ASCII case and surrounding separators.
    pub fn from_prefix(raw: &str) -> Option<Self> {
        let key: String = raw
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|ch| ch.to_ascii_uppercase())
            .collect();
        match key.as_str() {
            "OMIM" | "MIM" => Some(Self::Omim),
            "ORPHA" | "ORPHANET" | "ORPHANETORPHA" => Some(Self::Orpha),
            "HP" | "HPO" => Some(Self::Hp),
            "MONDO" => Some(Self::Mondo),
            _ => None,
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// A structured disease identifier, e.g. `OMIM:305400` or `ORPHA:1234`.
///
/// The accession is kept as text so leading zeros (`HP:0006574`) survive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceId {
    namespace: Namespace,
    accession: String,
}

impl SourceId {
    pub fn new(namespace: Namespace, accession: impl Into<String>) -> Result<Self, ModelError> {
        let accession = accession.into();
        let trimmed = accession.trim();
        if trimmed.is_empty() || !trimmed.chars().all(|ch| ch.is_ascii_digit()) {
            return Err(ModelError::InvalidSourceId(format!(
                "{}:{accession}",
                namespace.prefix()
            )));
        }
        if namespace == Namespace::Omim && trimmed.len() != 6 {
            return Err(ModelError::InvalidOmimAccession(trimmed.to_string()));
        }
        Ok(Self {
            namespace,
            accession: trimmed.to_string(),
        })
    }

    pub fn omim(accession: impl Into<String>) -> Result<Self, ModelError> {
        Self::new(Namespace::Omim, accession)
    }

    /// Parses `PREFIX<separators>DIGITS`, e.g. `OMIM:305400`, `MIM #305400`,
    /// `Orphanet_558` or `OrphaNet: ORPHA558`.
    pub fn parse(raw: &str) -> Result<Self, ModelError> {
        let trimmed = raw.trim();
        let digits_start = trimmed
            .char_indices()
            .rev()
            .take_while(|(_, ch)| ch.is_ascii_digit())
            .last()
            .map(|(idx, _)| idx)
            .ok_or_else(|| ModelError::InvalidSourceId(raw.to_string()))?;
        let (prefix, accession) = trimmed.split_at(digits_start);
        let prefix = prefix.trim_end_matches([':', '_', ' ', '#']);
        if prefix.is_empty() {
            return Err(ModelError::InvalidSourceId(raw.to_string()));
        }
        let namespace = Namespace::from_prefix(prefix)
            .ok_or_else(|| ModelError::UnknownNamespace(prefix.to_string()))?;
        Self::new(namespace, accession)
    }

    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    pub fn accession(&self) -> &str {
        &self.accession
    }

    pub fn is_omim(&self) -> bool {
        self.namespace == Namespace::Omim
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace.prefix(), self.accession)
    }
}

impl FromStr for SourceId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for SourceId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for SourceId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

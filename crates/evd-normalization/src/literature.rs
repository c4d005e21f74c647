//! PubMed identifier extraction from free-text publication fields.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

/// Known publication representations: a leading list of bare IDs
/// (`"12345, 67890 some title"`) and `PMID`/`PubMed`-prefixed IDs.
static PUBLICATION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [r"^[\d, ]+(?: |$)", r"(?i:PubMed|PMID)[: ]*[\d, ]+"]
        .into_iter()
        .map(|pattern| Regex::new(pattern).expect("Invalid publication regex"))
        .collect()
});

static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("Invalid digits regex"));

/// `0` stands for a missing ID in the source.
const MISSING_ID: &str = "0";

/// Extracts all PubMed IDs mentioned in a publication string.
pub fn extract_pubmed_ids(publication: &str) -> BTreeSet<String> {
    let publication = publication.trim();
    let mut ids = BTreeSet::new();
    for pattern in PUBLICATION_PATTERNS.iter() {
        for occurrence in pattern.find_iter(publication) {
            for id in DIGITS.find_iter(occurrence.as_str()) {
                if id.as_str() != MISSING_ID {
                    ids.insert(id.as_str().to_string());
                }
            }
        }
    }
    ids
}

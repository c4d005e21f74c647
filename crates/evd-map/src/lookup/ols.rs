//! EBI Ontology Lookup Service search client.
//!
//! Each term is searched exactly first (`exact=true`); an exact hit is a
//! `match`. Otherwise the best free-text hit is returned as `fuzzy`.

use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Deserialize;
use tracing::{debug, trace};

use evd_model::MatchQuality;

use super::{LookupHit, OntologyLookup};
use crate::error::{LookupError, Result};

/// Public OLS instance.
pub const DEFAULT_OLS_URL: &str = "https://www.ebi.ac.uk/ols4";

/// Ontology searched unless configured otherwise.
const DEFAULT_ONTOLOGY: &str = "efo";

/// HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct SearchResponse {
    response: SearchBody,
}

#[derive(Debug, Deserialize)]
struct SearchBody {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Deserialize)]
struct SearchDoc {
    iri: Option<String>,
    obo_id: Option<String>,
    label: Option<String>,
    ontology_name: Option<String>,
}

/// Blocking client for the OLS `/api/search` endpoint.
pub struct OlsLookup {
    client: Client,
    base_url: String,
    ontology: String,
}

impl OlsLookup {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ontology: DEFAULT_ONTOLOGY.to_string(),
        })
    }

    /// Searches a different ontology than EFO.
    pub fn with_ontology(mut self, ontology: impl Into<String>) -> Self {
        self.ontology = ontology.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn search_url(&self, text: &str, exact: bool) -> Result<Url> {
        let endpoint = format!("{}/api/search", self.base_url);
        Url::parse_with_params(
            &endpoint,
            [
                ("q", text),
                ("ontology", self.ontology.as_str()),
                ("rows", "1"),
                ("exact", if exact { "true" } else { "false" }),
            ],
        )
        .map_err(|err| LookupError::InvalidResponse(format!("invalid OLS URL {endpoint}: {err}")))
    }

    fn search(&self, text: &str, exact: bool) -> Result<Option<SearchDoc>> {
        let url = self.search_url(text, exact)?;
        trace!(%url, "querying OLS");

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, format!("evd/{}", env!("CARGO_PKG_VERSION")))
            .header(ACCEPT, "application/json")
            .send()?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(LookupError::RateLimited);
        }
        if !status.is_success() {
            let message = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LookupError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let body: SearchResponse = response.json()?;
        Ok(body.response.docs.into_iter().next())
    }
}

impl OntologyLookup for OlsLookup {
    fn find_term(&self, text: &str) -> Result<Option<LookupHit>> {
        let (doc, quality) = match self.search(text, true)? {
            Some(doc) => (doc, MatchQuality::Match),
            None => match self.search(text, false)? {
                Some(doc) => (doc, MatchQuality::Fuzzy),
                None => {
                    debug!(term = %text, "no OLS hit");
                    return Ok(None);
                }
            },
        };
        Ok(hit_from_doc(doc, quality))
    }
}

fn hit_from_doc(doc: SearchDoc, quality: MatchQuality) -> Option<LookupHit> {
    let term = doc.iri.or(doc.obo_id)?;
    let mut hit = LookupHit::new(term).with_quality(quality);
    hit.label = doc.label;
    hit.source = doc.ontology_name;
    Some(hit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_search_url() {
        let lookup = OlsLookup::new("https://example.org/ols4/").unwrap();
        let url = lookup.search_url("Bladder cancer, somatic", true).unwrap();
        assert_eq!(url.path(), "/ols4/api/search");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        assert!(pairs.contains(&("q".to_string(), "Bladder cancer, somatic".to_string())));
        assert!(pairs.contains(&("ontology".to_string(), "efo".to_string())));
        assert!(pairs.contains(&("exact".to_string(), "true".to_string())));
    }

    #[test]
    fn parses_search_response() {
        let body = r#"{"response":{"numFound":1,"docs":[{
            "iri":"http://www.ebi.ac.uk/efo/EFO_0000292",
            "obo_id":"EFO:0000292",
            "label":"bladder carcinoma",
            "ontology_name":"efo"
        }]}}"#;
        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        let doc = parsed.response.docs.into_iter().next().unwrap();
        let hit = hit_from_doc(doc, MatchQuality::Fuzzy).unwrap();
        assert_eq!(hit.term, "http://www.ebi.ac.uk/efo/EFO_0000292");
        assert_eq!(hit.label.as_deref(), Some("bladder carcinoma"));
        assert_eq!(hit.quality, Some(MatchQuality::Fuzzy));
    }

    #[test]
    fn empty_response_has_no_docs() {
        let parsed: SearchResponse = serde_json::from_str(r#"{"response":{"numFound":0}}"#).unwrap();
        assert!(parsed.response.docs.is_empty());
    }
}

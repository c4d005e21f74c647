//! Literature references from the PanelApp API.
//!
//! `GET {base}/api/v1/panels/{panel_id}` lists the genes of a panel with
//! free-text publication strings; each string is reduced to PubMed IDs.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Deserialize;
use tracing::{debug, warn};

use evd_normalization::extract_pubmed_ids;

use crate::error::{IngestError, Result};

/// Public PanelApp instance.
pub const DEFAULT_PANELAPP_URL: &str = "https://panelapp.genomicsengland.co.uk";

/// HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Body of `/api/v1/panels/{id}`, reduced to the fields we read.
#[derive(Debug, Clone, Deserialize)]
pub struct PanelResponse {
    #[serde(default)]
    pub genes: Vec<PanelGene>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PanelGene {
    pub gene_data: GeneData,
    #[serde(default)]
    pub publications: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneData {
    pub gene_symbol: String,
}

/// PubMed IDs per (panel id, gene symbol).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiteratureIndex {
    references: BTreeMap<(String, String), BTreeSet<String>>,
}

impl LiteratureIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the publications of one panel response.
    pub fn add_panel(&mut self, panel_id: &str, panel: &PanelResponse) {
        for gene in &panel.genes {
            let ids: BTreeSet<String> = gene
                .publications
                .iter()
                .flat_map(|publication| extract_pubmed_ids(publication))
                .collect();
            if ids.is_empty() {
                continue;
            }
            self.references
                .entry((panel_id.to_string(), gene.gene_data.gene_symbol.clone()))
                .or_default()
                .extend(ids);
        }
    }

    pub fn get(&self, panel_id: &str, symbol: &str) -> Option<&BTreeSet<String>> {
        self.references
            .get(&(panel_id.to_string(), symbol.to_string()))
    }

    /// Number of (panel, gene) pairs with at least one reference.
    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}

/// Blocking PanelApp API client.
pub struct PanelAppClient {
    client: Client,
    base_url: String,
}

impl PanelAppClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn panel_url(&self, panel_id: &str) -> String {
        format!("{}/api/v1/panels/{panel_id}", self.base_url)
    }

    pub fn fetch_panel(&self, panel_id: &str) -> Result<PanelResponse> {
        let url = self.panel_url(panel_id);
        debug!(panel_id, %url, "fetching literature references");
        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, format!("evd/{}", env!("CARGO_PKG_VERSION")))
            .header(ACCEPT, "application/json")
            .send()?;
        if !response.status().is_success() {
            return Err(IngestError::Api {
                url,
                status: response.status().as_u16(),
            });
        }
        Ok(response.json()?)
    }

    /// Fetches every panel. A panel that cannot be fetched is logged and
    /// contributes no references.
    pub fn fetch_literature<'a>(
        &self,
        panel_ids: impl IntoIterator<Item = &'a str>,
    ) -> LiteratureIndex {
        let mut index = LiteratureIndex::new();
        for panel_id in panel_ids {
            match self.fetch_panel(panel_id) {
                Ok(panel) => index.add_panel(panel_id, &panel),
                Err(err) => warn!(panel_id, error = %err, "skipping panel literature"),
            }
        }
        index
    }
}

//! Source ingestion: PanelApp exports and literature, ClinGen curations.

pub mod clingen;
pub mod error;
pub mod literature;
pub mod panelapp;

pub use clingen::{CLINGEN_COLUMNS, ClinGenRow, read_clingen};
pub use error::{IngestError, Result};
pub use literature::{DEFAULT_PANELAPP_URL, LiteratureIndex, PanelAppClient, PanelResponse};
pub use panelapp::{PanelAppRow, REQUIRED_COLUMNS, read_panelapp};

//! JSON scrape requests
//!
//! A request carries the mode, the root directive and the target shape, so a
//! caller without Rust types (the C boundary, a config file) can describe a
//! whole scrape as data.

use scraper::Html;
use serde::{Deserialize, Serialize};

use crate::engine::Scraper;
use crate::error::ScrapeError;
use crate::extractors::Registry;
use crate::mode::Mode;
use crate::shape::Shape;
use crate::value::Value;

/// Declarative scrape request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeRequest {
    #[serde(default)]
    pub mode: Mode,
    /// Root selector; empty means the whole document.
    #[serde(default)]
    pub select: String,
    /// Root extract spec, handed down to non-record shapes.
    #[serde(default)]
    pub extract: String,
    #[serde(default)]
    pub shape: Shape,
}

/// Bound value plus the rendered failures, one per entry.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeOutcome {
    pub value: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ScrapeOutcome {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

impl ScrapeRequest {
    pub fn from_json(json: &str) -> Result<Self, ScrapeError> {
        serde_json::from_str(json).map_err(|err| ScrapeError::InvalidRequest {
            message: err.to_string(),
        })
    }

    /// Run against `html` with the built-in extraction methods only.
    pub fn run(&self, html: &str) -> ScrapeOutcome {
        self.run_with(Registry::new(), html)
    }

    pub fn run_with(&self, registry: Registry, html: &str) -> ScrapeOutcome {
        let document = Html::parse_document(html);
        let scraper = Scraper::new(self.mode).with_registry(registry);
        let (value, result) = scraper.scrape_value(&document, &self.shape, &self.select, &self.extract);
        let errors = match result {
            Ok(()) => Vec::new(),
            Err(err) => err.errors().iter().map(ToString::to_string).collect(),
        };
        ScrapeOutcome { value, errors }
    }
}

/// Run `request` against `html` with the built-in extraction methods.
pub fn scrape_request(html: &str, request: &ScrapeRequest) -> ScrapeOutcome {
    request.run(html)
}

/// Decode `request_json`, run it against `html` and encode the outcome.
pub fn scrape_json(html: &str, request_json: &str) -> Result<String, ScrapeError> {
    let request = ScrapeRequest::from_json(request_json)?;
    let outcome = scrape_request(html, &request);
    serde_json::to_string(&outcome).map_err(|err| ScrapeError::InvalidRequest {
        message: err.to_string(),
    })
}

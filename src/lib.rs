//! Declarative HTML-to-record binding
//!
//! A [`Shape`] describes the destination (a primitive string, a sequence, a
//! record of named fields, or an optional), and each field carries a CSS
//! selector plus an extract spec. [`Scraper`] walks a parsed document along
//! that shape and fills a [`Value`] or any type implementing [`Scrape`]:
//!
//! - extract specs resolve through a [`Registry`] of [`Match`]/extractor
//!   pairs (`text`, `deeptext`, `html`, `outerhtml`, `@attr`, plus custom ones)
//! - failures follow the [`Mode`]: strict, tolerant or silent
//! - every error carries the selector path that led to it
//!
//! The same engine is reachable from JSON through [`ScrapeRequest`] and from C
//! through `scrape_from_html`.

#[macro_use]
mod macros;

mod binder;
pub mod engine;
pub mod error;
pub mod extractors;
pub mod ffi;
pub mod mode;
pub mod request;
pub mod selection;
pub mod shape;
pub mod target;
pub mod value;

pub(crate) const LOG_TARGET: &str = "html_bind";

pub use engine::Scraper;
pub use error::ScrapeError;
pub use extractors::{ExtractMethod, Match, Registry};
pub use ffi::{free_scrape_result, scrape_from_html, ScrapeResultFFI};
pub use mode::Mode;
pub use request::{scrape_json, scrape_request, ScrapeOutcome, ScrapeRequest};
pub use selection::Selection;
pub use shape::{DeferredShape, Directive, Field, Shape};
pub use target::Scrape;
#[doc(hidden)]
pub use target::{record_shape, FieldReader};
pub use value::Value;

//! The configured scraper and its entry points

use scraper::{ElementRef, Html};
use tracing::debug;

use crate::binder::Binder;
use crate::error::ScrapeError;
use crate::extractors::{ExtractMethod, Match, Registry};
use crate::mode::Mode;
use crate::selection::Selection;
use crate::shape::{Directive, Shape};
use crate::target::Scrape;
use crate::value::Value;
use crate::LOG_TARGET;

/// Binds documents to targets under a fixed mode and set of extraction methods.
///
/// ```
/// use html_bind::{Mode, Scraper};
///
/// html_bind::scrape_record! {
///     #[derive(Debug, Default, PartialEq)]
///     struct Product {
///         #[select = "h2", extract = "text"]
///         name: String,
///         #[select = ".price", extract = "text"]
///         price: String,
///     }
/// }
///
/// let html = r#"<div class="product"><h2>Widget</h2><p class="price">$9.99</p></div>"#;
/// let product: Product = Scraper::new(Mode::Strict).scrape_html(html, ".product", "").unwrap();
/// assert_eq!(product.name, "Widget");
/// assert_eq!(product.price, "$9.99");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Scraper {
    mode: Mode,
    registry: Registry,
}

impl Scraper {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            registry: Registry::new(),
        }
    }

    /// Replace the custom extraction methods.
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Add a custom extraction method after the ones already registered.
    pub fn with_method<F>(mut self, matcher: Match, extractor: F) -> Self
    where
        F: for<'a> Fn(ElementRef<'a>, &str) -> Result<String, ScrapeError> + Send + Sync + 'static,
    {
        self.registry.register(ExtractMethod::new(matcher, extractor));
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Bind `document` into `target`, starting from `select` and `extract`.
    ///
    /// `target` must conform to `shape`; otherwise `InvalidTargetShape` is
    /// returned before anything is read, whatever the mode. After that:
    /// strict returns the first failure and leaves `target` as far as it got,
    /// tolerant fills what it can and returns every failure in one
    /// `Aggregate`, silent always succeeds.
    pub fn scrape(
        &self,
        document: &Html,
        target: &mut Value,
        shape: &Shape,
        select: &str,
        extract: &str,
    ) -> Result<(), ScrapeError> {
        target.conforms(shape)?;

        debug!(
            target: LOG_TARGET,
            mode = ?self.mode,
            select,
            extract,
            shape = shape.kind_name(),
            custom_methods = self.registry.len(),
            "scrape started"
        );

        let mut binder = Binder::new(&self.registry, self.mode);
        let directive = Directive::new(select, extract);
        let outcome = binder.bind(&Selection::root(document), shape, &directive, target);
        let errors = binder.error_count();
        let result = outcome.and_then(|()| binder.finish());

        match &result {
            Ok(()) => debug!(target: LOG_TARGET, "scrape finished"),
            Err(err) => debug!(target: LOG_TARGET, errors, error = %err, "scrape failed"),
        }
        result
    }

    /// Typed form of [`scrape`](Self::scrape): `target` is overwritten with
    /// whatever was bound, including on error.
    pub fn scrape_into<T: Scrape>(
        &self,
        document: &Html,
        target: &mut T,
        select: &str,
        extract: &str,
    ) -> Result<(), ScrapeError> {
        let shape = T::shape();
        let mut value = target.to_value();
        let result = self.scrape(document, &mut value, &shape, select, extract);
        *target = T::from_value(value)?;
        result
    }

    /// Parse `html` and bind a fresh `T` from it.
    pub fn scrape_html<T: Scrape + Default>(
        &self,
        html: &str,
        select: &str,
        extract: &str,
    ) -> Result<T, ScrapeError> {
        let document = Html::parse_document(html);
        let mut target = T::default();
        self.scrape_into(&document, &mut target, select, extract)?;
        Ok(target)
    }

    /// Bind a zero value of `shape` and return it with the outcome.
    pub fn scrape_value(
        &self,
        document: &Html,
        shape: &Shape,
        select: &str,
        extract: &str,
    ) -> (Value, Result<(), ScrapeError>) {
        let mut value = Value::zero(shape);
        let result = self.scrape(document, &mut value, shape, select, extract);
        (value, result)
    }
}

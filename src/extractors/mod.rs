//! Extraction methods
//!
//! An extract spec such as `text`, `deeptext` or `@href` names how a selected
//! node becomes a string. Each [`ExtractMethod`] pairs a [`Match`] over the
//! spec with an extractor function. Resolution walks the built-in methods and
//! then the custom ones, in declaration order, and the first match wins.

mod attr_extractor;
mod text_extractor;

pub use attr_extractor::*;
pub use text_extractor::*;

use std::borrow::Cow;
use std::fmt;
use std::sync::{Arc, LazyLock};

use scraper::ElementRef;
use tracing::trace;

use crate::error::ScrapeError;
use crate::LOG_TARGET;

/// Immediate text-node children.
pub const TEXT_EXTRACT: &str = "text";
/// All descendant text.
pub const DEEP_TEXT_EXTRACT: &str = "deeptext";
/// Inner markup.
pub const HTML_EXTRACT: &str = "html";
/// Markup including the element's own tag.
pub const OUTER_HTML_EXTRACT: &str = "outerhtml";
/// Attribute value, e.g. `@href`.
pub const ATTR_EXTRACT_PREFIX: &str = "@";

/// Turns a node plus the matched spec into a string.
pub type ExtractFn =
    dyn for<'a> Fn(ElementRef<'a>, &str) -> Result<String, ScrapeError> + Send + Sync;

/// Custom spec predicate: `Some(transformed)` on match.
pub type MatchFn = dyn Fn(&str) -> Option<String> + Send + Sync;

/// Decides whether an extract spec belongs to a method, and what argument
/// the extractor receives.
#[derive(Clone)]
pub enum Match {
    /// Spec equals the literal; passed through unchanged.
    Exact(Cow<'static, str>),
    /// Spec starts with the literal; the prefix is stripped.
    Prefix(Cow<'static, str>),
    Custom(Arc<MatchFn>),
}

impl Match {
    pub fn exact(literal: impl Into<Cow<'static, str>>) -> Self {
        Match::Exact(literal.into())
    }

    pub fn prefix(literal: impl Into<Cow<'static, str>>) -> Self {
        Match::Prefix(literal.into())
    }

    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Match::Custom(Arc::new(predicate))
    }

    /// The extractor argument if `spec` matches.
    pub fn apply<'s>(&self, spec: &'s str) -> Option<Cow<'s, str>> {
        match self {
            Match::Exact(literal) => (spec == &**literal).then_some(Cow::Borrowed(spec)),
            Match::Prefix(literal) => spec.strip_prefix(&**literal).map(Cow::Borrowed),
            Match::Custom(predicate) => predicate(spec).map(Cow::Owned),
        }
    }
}

impl fmt::Debug for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Match::Exact(literal) => f.debug_tuple("Exact").field(literal).finish(),
            Match::Prefix(literal) => f.debug_tuple("Prefix").field(literal).finish(),
            Match::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A match paired with its extractor.
#[derive(Clone)]
pub struct ExtractMethod {
    matcher: Match,
    extractor: Arc<ExtractFn>,
}

impl ExtractMethod {
    pub fn new<F>(matcher: Match, extractor: F) -> Self
    where
        F: for<'a> Fn(ElementRef<'a>, &str) -> Result<String, ScrapeError> + Send + Sync + 'static,
    {
        Self {
            matcher,
            extractor: Arc::new(extractor),
        }
    }

    pub fn matcher(&self) -> &Match {
        &self.matcher
    }
}

impl fmt::Debug for ExtractMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractMethod")
            .field("matcher", &self.matcher)
            .finish_non_exhaustive()
    }
}

static BUILTIN_METHODS: LazyLock<Vec<ExtractMethod>> = LazyLock::new(|| {
    vec![
        ExtractMethod::new(Match::exact(TEXT_EXTRACT), |node, _| Ok(extract_text(node))),
        ExtractMethod::new(Match::exact(DEEP_TEXT_EXTRACT), |node, _| {
            Ok(extract_deep_text(node))
        }),
        ExtractMethod::new(Match::exact(HTML_EXTRACT), |node, _| {
            Ok(extract_inner_html(node))
        }),
        ExtractMethod::new(Match::exact(OUTER_HTML_EXTRACT), |node, _| {
            Ok(extract_outer_html(node))
        }),
        ExtractMethod::new(Match::prefix(ATTR_EXTRACT_PREFIX), extract_attribute),
    ]
});

/// The built-in methods, in resolution order.
pub fn builtin_methods() -> &'static [ExtractMethod] {
    &BUILTIN_METHODS
}

/// A resolved extract spec, ready to run against a node.
pub struct Resolved<'r, 's> {
    extractor: &'r ExtractFn,
    arg: Cow<'s, str>,
}

impl Resolved<'_, '_> {
    /// The argument the matcher produced, e.g. `href` for `@href`.
    pub fn arg(&self) -> &str {
        &self.arg
    }

    pub fn extract(&self, node: ElementRef<'_>) -> Result<String, ScrapeError> {
        (self.extractor)(node, &*self.arg)
    }
}

/// Custom extraction methods layered behind the built-ins.
///
/// A custom method whose match overlaps a built-in one never runs for the
/// overlapping specs.
#[derive(Clone, Default)]
pub struct Registry {
    custom: Vec<ExtractMethod>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, method: ExtractMethod) -> &mut Self {
        self.custom.push(method);
        self
    }

    pub fn with<F>(mut self, matcher: Match, extractor: F) -> Self
    where
        F: for<'a> Fn(ElementRef<'a>, &str) -> Result<String, ScrapeError> + Send + Sync + 'static,
    {
        self.register(ExtractMethod::new(matcher, extractor));
        self
    }

    /// Number of custom methods.
    pub fn len(&self) -> usize {
        self.custom.len()
    }

    pub fn is_empty(&self) -> bool {
        self.custom.is_empty()
    }

    /// Every method in resolution order.
    pub fn methods(&self) -> impl Iterator<Item = &ExtractMethod> + '_ {
        builtin_methods().iter().chain(self.custom.iter())
    }

    pub fn resolve<'r, 's>(&'r self, spec: &'s str) -> Result<Resolved<'r, 's>, ScrapeError> {
        for (position, method) in self.methods().enumerate() {
            if let Some(arg) = method.matcher.apply(spec) {
                trace!(target: LOG_TARGET, spec, position, "resolved extract spec");
                return Ok(Resolved {
                    extractor: method.extractor.as_ref(),
                    arg,
                });
            }
        }
        Err(ScrapeError::UnresolvedExtractSpec {
            spec: spec.to_string(),
        })
    }

    /// Resolve `spec` and run it against `node`.
    pub fn extract(&self, node: ElementRef<'_>, spec: &str) -> Result<String, ScrapeError> {
        self.resolve(spec)?.extract(node)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.custom.iter().map(ExtractMethod::matcher))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use scraper::{Html, Selector};

    fn node<'a>(html: &'a Html, selector: &str) -> ElementRef<'a> {
        let selector = Selector::parse(selector).unwrap();
        html.select(&selector).next().unwrap()
    }

    #[rstest]
    #[case::exact_hit(Match::exact("text"), "text", Some("text"))]
    #[case::exact_miss(Match::exact("text"), "TEXT", None)]
    #[case::exact_is_not_prefix(Match::exact("text"), "textual", None)]
    #[case::prefix_strips(Match::prefix("@"), "@href", Some("href"))]
    #[case::prefix_strips_once(Match::prefix("@"), "@@x", Some("@x"))]
    #[case::prefix_miss(Match::prefix("@"), "href", None)]
    #[case::custom(Match::custom(|s| s.strip_suffix("!").map(str::to_uppercase)), "loud!", Some("LOUD"))]
    fn test_match_apply(#[case] matcher: Match, #[case] spec: &str, #[case] expected: Option<&str>) {
        assert_eq!(matcher.apply(spec).as_deref(), expected);
    }

    #[test]
    fn test_builtins_resolve() {
        let html = Html::parse_fragment(r#"<a href="/x">go <b>now</b></a>"#);
        let a = node(&html, "a");
        let registry = Registry::new();

        assert_eq!(registry.extract(a, "text").unwrap(), "go ");
        assert_eq!(registry.extract(a, "deeptext").unwrap(), "go now");
        assert_eq!(registry.extract(a, "@href").unwrap(), "/x");
        assert_eq!(registry.extract(a, "html").unwrap(), "go <b>now</b>");
        assert_eq!(
            registry.extract(a, "@title").unwrap_err(),
            ScrapeError::attribute_not_found("title")
        );
    }

    #[test]
    fn test_unresolved_spec_keeps_input() {
        let registry = Registry::new();
        let err = registry.resolve("*level").err().unwrap();
        assert_eq!(
            err,
            ScrapeError::UnresolvedExtractSpec {
                spec: "*level".into()
            }
        );
        assert!(matches!(
            registry.resolve("").err(),
            Some(ScrapeError::UnresolvedExtractSpec { .. })
        ));
    }

    #[test]
    fn test_builtins_take_precedence() {
        let html = Html::parse_fragment(r#"<p>plain</p>"#);
        let p = node(&html, "p");
        let registry = Registry::new()
            .with(Match::exact("text"), |_, _| Ok("custom".to_string()))
            .with(Match::prefix("@"), |_, _| Ok("custom attr".to_string()));

        assert_eq!(registry.extract(p, "text").unwrap(), "plain");
        assert!(registry.extract(p, "@id").is_err());
    }

    #[test]
    fn test_custom_methods_resolve_in_declaration_order() {
        let html = Html::parse_fragment(r#"<p>plain</p>"#);
        let p = node(&html, "p");
        let registry = Registry::new()
            .with(Match::prefix("*"), |_, arg| Ok(format!("first:{arg}")))
            .with(Match::exact("*level"), |_, _| Ok("second".to_string()));

        for _ in 0..10 {
            assert_eq!(registry.extract(p, "*level").unwrap(), "first:level");
        }
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_custom_extractor_error() {
        let html = Html::parse_fragment(r#"<span class="price">n/a</span>"#);
        let span = node(&html, "span");
        let registry = Registry::new().with(Match::exact("*price"), |node, _| {
            let text = extract_text(node);
            text.strip_prefix('$')
                .map(str::to_string)
                .ok_or_else(|| ScrapeError::extract(format!("not a price: {text}")))
        });

        assert_eq!(
            registry.extract(span, "*price").unwrap_err(),
            ScrapeError::extract("not a price: n/a")
        );
    }

    #[test]
    fn test_resolved_exposes_argument() {
        let registry = Registry::new();
        let resolved = registry.resolve("@data-src-mp3").unwrap();
        assert_eq!(resolved.arg(), "data-src-mp3");
    }
}

//! Scrape error taxonomy
//!
//! Leaf variants describe what went wrong. `Context` and `Element` each add one
//! segment of the selector path, so a rendered error reads from the root
//! selector down to the cause:
//!
//! ```text
//! .product > img > attribute "src" not found
//! ```

use thiserror::Error;

/// Errors produced while binding a document to a target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScrapeError {
    /// A required input was absent.
    #[error("{name} is nil")]
    NilInput { name: String },

    /// The target handle does not have the shape the binder expects.
    #[error("target must be a {expected}, but it is a {actual}")]
    InvalidTargetShape { expected: String, actual: String },

    /// A required selector narrowed to zero nodes.
    #[error("no nodes found by selector \"{selector}\"")]
    NotFound { selector: String },

    /// The selector could not be parsed.
    #[error("invalid selector \"{selector}\": {message}")]
    InvalidSelector { selector: String, message: String },

    /// No extraction method accepted the extract spec.
    #[error("unresolved extract spec \"{spec}\"")]
    UnresolvedExtractSpec { spec: String },

    /// The selected node has no attribute with this name.
    #[error("attribute \"{attr}\" not found")]
    AttributeNotFound { attr: String },

    /// A custom extractor rejected the node.
    #[error("extraction failed: {message}")]
    Extract { message: String },

    /// A JSON request could not be decoded.
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    /// Failure below a narrowing selector.
    #[error("{selector} > {source}")]
    Context {
        selector: String,
        #[source]
        source: Box<ScrapeError>,
    },

    /// Failure inside one element of a sequence.
    #[error("[{index}] > {source}")]
    Element {
        index: usize,
        #[source]
        source: Box<ScrapeError>,
    },

    /// Every failure recorded during a tolerant traversal.
    #[error("{}", render_aggregate(.0))]
    Aggregate(Vec<ScrapeError>),
}

fn render_aggregate(errors: &[ScrapeError]) -> String {
    let mut out = format!("{} scrape errors", errors.len());
    for err in errors {
        out.push_str("\n  ");
        out.push_str(&err.to_string());
    }
    out
}

impl ScrapeError {
    pub fn not_found(selector: impl Into<String>) -> Self {
        ScrapeError::NotFound {
            selector: selector.into(),
        }
    }

    pub fn attribute_not_found(attr: impl Into<String>) -> Self {
        ScrapeError::AttributeNotFound { attr: attr.into() }
    }

    /// Failure raised by a user-supplied extractor.
    pub fn extract(message: impl Into<String>) -> Self {
        ScrapeError::Extract {
            message: message.into(),
        }
    }

    pub fn shape_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        ScrapeError::InvalidTargetShape {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Wrap with a selector segment. Empty selectors add nothing to the path.
    pub fn in_selector(self, selector: &str) -> Self {
        if selector.is_empty() {
            return self;
        }
        ScrapeError::Context {
            selector: selector.to_string(),
            source: Box::new(self),
        }
    }

    pub fn at_element(self, index: usize) -> Self {
        ScrapeError::Element {
            index,
            source: Box::new(self),
        }
    }

    /// The leaf failure beneath any path segments.
    pub fn root_cause(&self) -> &ScrapeError {
        let mut current = self;
        while let ScrapeError::Context { source, .. } | ScrapeError::Element { source, .. } = current
        {
            current = source.as_ref();
        }
        current
    }

    /// Path segments from the root down to the cause, e.g. `[".list", "[2]", "a"]`.
    pub fn path(&self) -> Vec<String> {
        let mut segments = Vec::new();
        let mut current = self;
        loop {
            match current {
                ScrapeError::Context { selector, source } => {
                    segments.push(selector.clone());
                    current = source.as_ref();
                }
                ScrapeError::Element { index, source } => {
                    segments.push(format!("[{index}]"));
                    current = source.as_ref();
                }
                _ => return segments,
            }
        }
    }

    /// The individual failures: the members of an aggregate, or just `self`.
    pub fn errors(&self) -> Vec<&ScrapeError> {
        match self {
            ScrapeError::Aggregate(errors) => errors.iter().collect(),
            other => vec![other],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_renders_selector_path() {
        let err = ScrapeError::attribute_not_found("src")
            .in_selector("img")
            .in_selector(".product");

        assert_eq!(err.to_string(), ".product > img > attribute \"src\" not found");
        assert_eq!(err.path(), vec![".product".to_string(), "img".to_string()]);
        assert_eq!(err.root_cause(), &ScrapeError::attribute_not_found("src"));
    }

    #[test]
    fn test_empty_selector_is_not_a_segment() {
        let err = ScrapeError::not_found(".x").in_selector("");
        assert_eq!(err, ScrapeError::not_found(".x"));
        assert!(err.path().is_empty());
    }

    #[test]
    fn test_element_segment() {
        let err = ScrapeError::UnresolvedExtractSpec {
            spec: "TEXT".into(),
        }
        .at_element(2)
        .in_selector("li");

        assert_eq!(err.to_string(), "li > [2] > unresolved extract spec \"TEXT\"");
        assert_eq!(err.path(), vec!["li".to_string(), "[2]".to_string()]);
    }

    #[test]
    fn test_aggregate_lists_every_error() {
        let err = ScrapeError::Aggregate(vec![
            ScrapeError::not_found(".a").in_selector("#top"),
            ScrapeError::attribute_not_found("href"),
        ]);

        assert_eq!(err.errors().len(), 2);
        assert_eq!(
            err.to_string(),
            "2 scrape errors\n  #top > no nodes found by selector \".a\"\n  attribute \"href\" not found"
        );
    }
}

//! Attribute extraction

use scraper::ElementRef;

use crate::error::ScrapeError;

/// Value of the named attribute on `node`.
pub fn extract_attribute(node: ElementRef<'_>, attr: &str) -> Result<String, ScrapeError> {
    node.value()
        .attr(attr)
        .map(String::from)
        .ok_or_else(|| ScrapeError::attribute_not_found(attr))
}

//! Text and markup extraction

use scraper::ElementRef;

/// Text of the element's immediate text-node children, in order.
/// Text inside child elements is skipped.
pub fn extract_text(node: ElementRef<'_>) -> String {
    node.children()
        .filter_map(|child| child.value().as_text())
        .map(|text| &**text)
        .collect()
}

/// Text of every descendant text node, depth-first.
pub fn extract_deep_text(node: ElementRef<'_>) -> String {
    node.text().collect()
}

/// Markup of the element's children.
pub fn extract_inner_html(node: ElementRef<'_>) -> String {
    node.inner_html()
}

/// Markup of the element including its own tag.
pub fn extract_outer_html(node: ElementRef<'_>) -> String {
    node.html()
}

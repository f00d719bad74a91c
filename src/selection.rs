//! Node selections over a parsed document
//!
//! Uses the scraper crate for CSS selector matching. A selection is an ordered,
//! de-duplicated list of elements; narrowing it searches the descendants of
//! every element and keeps document order.

use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};
use tracing::trace;

use crate::error::ScrapeError;
use crate::LOG_TARGET;

/// Zero or more elements of one document.
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    nodes: Vec<ElementRef<'a>>,
    /// Whether narrowing may match the selected elements themselves. Only the
    /// document-level selection sets this, so `"html"` or `"body"` resolve from
    /// the root.
    inclusive: bool,
}

impl<'a> Selection<'a> {
    /// Selection covering the whole document.
    pub fn root(document: &'a Html) -> Self {
        Self {
            nodes: vec![document.root_element()],
            inclusive: true,
        }
    }

    /// Selection of a single element.
    pub fn of(element: ElementRef<'a>) -> Self {
        Self {
            nodes: vec![element],
            inclusive: false,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn first(&self) -> Option<ElementRef<'a>> {
        self.nodes.first().copied()
    }

    pub fn nodes(&self) -> &[ElementRef<'a>] {
        &self.nodes
    }

    /// Selection holding only the first element, empty if there is none.
    pub fn first_only(&self) -> Selection<'a> {
        Self {
            nodes: self.nodes.iter().take(1).copied().collect(),
            inclusive: self.inclusive,
        }
    }

    /// Each element as a singleton selection, in document order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Selection<'a>)> + '_ {
        self.nodes.iter().enumerate().map(|(index, node)| {
            (
                index,
                Self {
                    nodes: vec![*node],
                    inclusive: self.inclusive,
                },
            )
        })
    }

    /// Elements below this selection matching `selector`.
    pub fn narrow(&self, selector: &str) -> Result<Selection<'a>, ScrapeError> {
        let parsed = Selector::parse(selector).map_err(|err| ScrapeError::InvalidSelector {
            selector: selector.to_string(),
            message: err.to_string(),
        })?;

        let mut seen = HashSet::new();
        let mut matched = Vec::new();
        for scope in &self.nodes {
            let candidates = scope
                .descendants()
                .skip(usize::from(!self.inclusive))
                .filter_map(ElementRef::wrap);
            for element in candidates {
                if parsed.matches(&element) && seen.insert(element.id()) {
                    matched.push(element);
                }
            }
        }

        // Overlapping scopes can interleave their matches.
        if self.nodes.len() > 1 {
            matched = document_order(matched);
        }

        trace!(
            target: LOG_TARGET,
            selector,
            scopes = self.nodes.len(),
            matched = matched.len(),
            "narrowed selection"
        );

        Ok(Self {
            nodes: matched,
            inclusive: false,
        })
    }
}

fn document_order(nodes: Vec<ElementRef<'_>>) -> Vec<ElementRef<'_>> {
    let Some(first) = nodes.first() else {
        return nodes;
    };
    let ids: HashSet<_> = nodes.iter().map(|node| node.id()).collect();
    let top = first.ancestors().last().unwrap_or(**first);

    top.descendants()
        .filter_map(ElementRef::wrap)
        .filter(|element| ids.contains(&element.id()))
        .collect()
}

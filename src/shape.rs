//! Target shapes and binding directives
//!
//! A [`Shape`] describes the destination the binder fills: a string, a list,
//! a record of named fields or an optional value. Shapes are plain data; they
//! deserialize from JSON so a request can carry its own schema:
//!
//! ```json
//! { "kind": "record", "fields": [
//!     { "name": "title", "select": "h2", "extract": "text" },
//!     { "name": "tags", "select": ".tag", "extract": "text",
//!       "shape": { "kind": "sequence", "element": { "kind": "primitive" } } }
//! ] }
//! ```

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Where to look and how to read, attached to a shape node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    /// CSS selector; empty keeps the inherited selection.
    #[serde(default)]
    pub select: String,
    /// Extract spec; empty is only meaningful on non-leaf shapes, where it is
    /// handed down unchanged.
    #[serde(default)]
    pub extract: String,
}

impl Directive {
    pub fn new(select: impl Into<String>, extract: impl Into<String>) -> Self {
        Self {
            select: select.into(),
            extract: extract.into(),
        }
    }

    /// Directive whose selector has already been applied.
    pub fn extract_only(extract: impl Into<String>) -> Self {
        Self::new(String::new(), extract)
    }
}

/// A named record field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(flatten)]
    pub directive: Directive,
    #[serde(default)]
    pub shape: Shape,
}

impl Field {
    pub fn new(
        name: impl Into<String>,
        select: impl Into<String>,
        extract: impl Into<String>,
        shape: Shape,
    ) -> Self {
        Self {
            name: name.into(),
            directive: Directive::new(select, extract),
            shape,
        }
    }
}

/// Structure of a destination value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// A single string.
    #[default]
    Primitive,
    /// One element per selected node, in document order.
    Sequence { element: Box<Shape> },
    /// Fixed, ordered fields bound against the first selected node.
    Record { fields: Vec<Field> },
    /// A value that may be absent.
    Optional { inner: Box<Shape> },
    /// A record type met again while its own shape was being built. Expanded
    /// one level at a time during binding. Has no JSON form.
    #[serde(skip)]
    Deferred(DeferredShape),
}

/// Shape of a recursive record type, built on demand.
#[derive(Clone, Copy)]
pub struct DeferredShape(fn() -> Shape);

impl DeferredShape {
    pub fn resolve(&self) -> Shape {
        (self.0)()
    }
}

impl PartialEq for DeferredShape {
    fn eq(&self, other: &Self) -> bool {
        self.0 as usize == other.0 as usize
    }
}

impl Eq for DeferredShape {}

impl fmt::Debug for DeferredShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DeferredShape")
    }
}

impl Shape {
    pub fn sequence(element: Shape) -> Self {
        Shape::Sequence {
            element: Box::new(element),
        }
    }

    pub fn record(fields: Vec<Field>) -> Self {
        Shape::Record { fields }
    }

    pub fn optional(inner: Shape) -> Self {
        Shape::Optional {
            inner: Box::new(inner),
        }
    }

    pub fn deferred(build: fn() -> Shape) -> Self {
        Shape::Deferred(DeferredShape(build))
    }

    /// This shape with a top-level deferred shape expanded.
    pub fn resolved(&self) -> Cow<'_, Shape> {
        match self {
            Shape::Deferred(deferred) => Cow::Owned(deferred.resolve()),
            shape => Cow::Borrowed(shape),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape::Primitive => "primitive",
            Shape::Sequence { .. } => "sequence",
            Shape::Record { .. } => "record",
            Shape::Optional { .. } => "optional",
            Shape::Deferred(deferred) => deferred.resolve().kind_name(),
        }
    }
}

//! Typed scrape targets
//!
//! [`Scrape`] ties a Rust type to its [`Shape`] and converts between the type
//! and a [`Value`]. `String`, `Vec<T>`, `Option<T>` and `Box<T>` are covered
//! here; structs get an implementation from [`scrape_record!`](crate::scrape_record).

use std::any::TypeId;
use std::cell::RefCell;

use crate::error::ScrapeError;
use crate::shape::Shape;
use crate::value::Value;

pub trait Scrape: Sized {
    /// Shape of this type's destination.
    fn shape() -> Shape;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self, ScrapeError>;
}

impl Scrape for String {
    fn shape() -> Shape {
        Shape::Primitive
    }

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, ScrapeError> {
        match value {
            Value::Text(text) => Ok(text),
            other => Err(ScrapeError::shape_mismatch("primitive", other.kind_name())),
        }
    }
}

impl<T: Scrape> Scrape for Vec<T> {
    fn shape() -> Shape {
        Shape::sequence(T::shape())
    }

    fn to_value(&self) -> Value {
        Value::List(self.iter().map(Scrape::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self, ScrapeError> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(ScrapeError::shape_mismatch("sequence", other.kind_name())),
        }
    }
}

impl<T: Scrape> Scrape for Option<T> {
    fn shape() -> Shape {
        Shape::optional(T::shape())
    }

    fn to_value(&self) -> Value {
        Value::Optional(self.as_ref().map(|inner| Box::new(inner.to_value())))
    }

    fn from_value(value: Value) -> Result<Self, ScrapeError> {
        match value {
            Value::Optional(slot) => slot.map(|inner| T::from_value(*inner)).transpose(),
            other => Err(ScrapeError::shape_mismatch("optional", other.kind_name())),
        }
    }
}

impl<T: Scrape> Scrape for Box<T> {
    fn shape() -> Shape {
        T::shape()
    }

    fn to_value(&self) -> Value {
        T::to_value(self)
    }

    fn from_value(value: Value) -> Result<Self, ScrapeError> {
        T::from_value(value).map(Box::new)
    }
}

thread_local! {
    static EXPANDING: RefCell<Vec<TypeId>> = const { RefCell::new(Vec::new()) };
}

struct ExpandGuard;

impl Drop for ExpandGuard {
    fn drop(&mut self) {
        EXPANDING.with(|stack| stack.borrow_mut().pop());
    }
}

/// Build the record shape of `T`, deferring any nested occurrence of `T`
/// itself. Used by `scrape_record!`.
#[doc(hidden)]
pub fn record_shape<T: Scrape + 'static>(build: impl FnOnce() -> Shape) -> Shape {
    let id = TypeId::of::<T>();
    if EXPANDING.with(|stack| stack.borrow().contains(&id)) {
        return Shape::deferred(T::shape);
    }
    EXPANDING.with(|stack| stack.borrow_mut().push(id));
    let _guard = ExpandGuard;
    build()
}

/// Reads record fields back in declaration order. Used by `scrape_record!`.
#[doc(hidden)]
pub struct FieldReader {
    fields: std::vec::IntoIter<(String, Value)>,
}

impl FieldReader {
    pub fn new(value: Value) -> Result<Self, ScrapeError> {
        match value {
            Value::Record(fields) => Ok(Self {
                fields: fields.into_iter(),
            }),
            other => Err(ScrapeError::shape_mismatch("record", other.kind_name())),
        }
    }

    pub fn next<T: Scrape>(&mut self, name: &str) -> Result<T, ScrapeError> {
        match self.fields.next() {
            Some((field, value)) if field == name => T::from_value(value),
            Some((field, _)) => Err(ScrapeError::shape_mismatch(
                format!("record field \"{name}\""),
                format!("record field \"{field}\""),
            )),
            None => Err(ScrapeError::shape_mismatch(
                format!("record field \"{name}\""),
                "end of record",
            )),
        }
    }
}

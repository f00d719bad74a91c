//! Dynamic destination values
//!
//! A [`Value`] is the in-memory target the binder writes into. Its structure
//! must conform to the [`Shape`] it is bound with.

use serde::{Serialize, Serializer};

use crate::error::ScrapeError;
use crate::shape::Shape;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    List(Vec<Value>),
    /// Field values in declaration order.
    Record(Vec<(String, Value)>),
    Optional(Option<Box<Value>>),
}

impl Value {
    /// Zero value for `shape`: empty strings, empty lists, absent optionals.
    pub fn zero(shape: &Shape) -> Value {
        match shape {
            Shape::Primitive => Value::Text(String::new()),
            Shape::Sequence { .. } => Value::List(Vec::new()),
            Shape::Record { fields } => Value::Record(
                fields
                    .iter()
                    .map(|field| (field.name.clone(), Value::zero(&field.shape)))
                    .collect(),
            ),
            Shape::Optional { .. } => Value::Optional(None),
            Shape::Deferred(deferred) => Value::zero(&deferred.resolve()),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Text(_) => "primitive",
            Value::List(_) => "sequence",
            Value::Record(_) => "record",
            Value::Optional(_) => "optional",
        }
    }

    /// Check that this value can be bound with `shape`.
    pub fn conforms(&self, shape: &Shape) -> Result<(), ScrapeError> {
        match (shape, self) {
            (Shape::Deferred(deferred), value) => value.conforms(&deferred.resolve()),
            (Shape::Primitive, Value::Text(_)) => Ok(()),
            (Shape::Sequence { element }, Value::List(items)) => {
                items.iter().try_for_each(|item| item.conforms(element))
            }
            (Shape::Record { fields }, Value::Record(values)) => {
                if fields.len() != values.len() {
                    return Err(ScrapeError::shape_mismatch(
                        format!("record of {} fields", fields.len()),
                        format!("record of {} fields", values.len()),
                    ));
                }
                for (field, (name, value)) in fields.iter().zip(values) {
                    if field.name != *name {
                        return Err(ScrapeError::shape_mismatch(
                            format!("record field \"{}\"", field.name),
                            format!("record field \"{name}\""),
                        ));
                    }
                    value.conforms(&field.shape)?;
                }
                Ok(())
            }
            (Shape::Optional { inner }, Value::Optional(slot)) => match slot {
                Some(value) => value.conforms(inner),
                None => Ok(()),
            },
            (shape, value) => Err(ScrapeError::shape_mismatch(
                shape.kind_name(),
                value.kind_name(),
            )),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Field of a record by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Record(fields) => fields
                .iter()
                .find(|(field, _)| field == name)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    /// Present inner value of an optional. Non-optionals return themselves.
    pub fn present(&self) -> Option<&Value> {
        match self {
            Value::Optional(slot) => slot.as_deref(),
            other => Some(other),
        }
    }

    pub(crate) fn text_mut(&mut self) -> Result<&mut String, ScrapeError> {
        match self {
            Value::Text(text) => Ok(text),
            other => Err(ScrapeError::shape_mismatch("primitive", other.kind_name())),
        }
    }

    pub(crate) fn list_mut(&mut self) -> Result<&mut Vec<Value>, ScrapeError> {
        match self {
            Value::List(items) => Ok(items),
            other => Err(ScrapeError::shape_mismatch("sequence", other.kind_name())),
        }
    }

    pub(crate) fn record_mut(&mut self) -> Result<&mut Vec<(String, Value)>, ScrapeError> {
        match self {
            Value::Record(fields) => Ok(fields),
            other => Err(ScrapeError::shape_mismatch("record", other.kind_name())),
        }
    }

    pub(crate) fn optional_mut(&mut self) -> Result<&mut Option<Box<Value>>, ScrapeError> {
        match self {
            Value::Optional(slot) => Ok(slot),
            other => Err(ScrapeError::shape_mismatch("optional", other.kind_name())),
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

/// Records serialize as objects in field order, optionals as value or null.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Text(text) => serializer.serialize_str(text),
            Value::List(items) => serializer.collect_seq(items),
            Value::Record(fields) => {
                serializer.collect_map(fields.iter().map(|(name, value)| (name, value)))
            }
            Value::Optional(Some(value)) => value.serialize(serializer),
            Value::Optional(None) => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Field;

    fn product_shape() -> Shape {
        Shape::record(vec![
            Field::new("name", "h2", "text", Shape::Primitive),
            Field::new("tags", ".tag", "text", Shape::sequence(Shape::Primitive)),
            Field::new("image", "img", "@src", Shape::optional(Shape::Primitive)),
        ])
    }

    #[test]
    fn test_zero_value() {
        let zero = Value::zero(&product_shape());
        assert_eq!(
            zero,
            Value::Record(vec![
                ("name".into(), Value::Text(String::new())),
                ("tags".into(), Value::List(vec![])),
                ("image".into(), Value::Optional(None)),
            ])
        );
        assert!(zero.conforms(&product_shape()).is_ok());
    }

    #[test]
    fn test_conforms_rejects_kind_mismatch() {
        let err = Value::List(vec![]).conforms(&Shape::Primitive).unwrap_err();
        assert_eq!(err, ScrapeError::shape_mismatch("primitive", "sequence"));
    }

    #[test]
    fn test_conforms_checks_field_names() {
        let value = Value::Record(vec![("title".into(), Value::from(""))]);
        let shape = Shape::record(vec![Field::new("name", "", "text", Shape::Primitive)]);
        let err = value.conforms(&shape).unwrap_err();
        assert!(err.to_string().contains("record field \"name\""));
    }

    #[test]
    fn test_conforms_checks_list_items() {
        let value = Value::List(vec![Value::from("a"), Value::List(vec![])]);
        assert!(value.conforms(&Shape::sequence(Shape::Primitive)).is_err());
    }

    #[test]
    fn test_serialize_keeps_field_order() {
        let value = Value::Record(vec![
            ("zeta".into(), Value::from("z")),
            ("alpha".into(), Value::List(vec![Value::from("a")])),
            ("gone".into(), Value::Optional(None)),
            (
                "here".into(),
                Value::Optional(Some(Box::new(Value::from("h")))),
            ),
        ]);
        assert_eq!(
            serde_json::to_string(&value).unwrap(),
            r#"{"zeta":"z","alpha":["a"],"gone":null,"here":"h"}"#
        );
    }

    #[test]
    fn test_accessors() {
        let value = Value::Record(vec![
            ("name".into(), Value::from("Widget")),
            ("image".into(), Value::Optional(None)),
        ]);
        assert_eq!(value.get("name").and_then(Value::as_text), Some("Widget"));
        assert_eq!(value.get("image").and_then(Value::present), None);
        assert!(value.get("missing").is_none());
    }
}

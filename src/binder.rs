//! Shape-driven value binder
//!
//! Walks a selection depth-first, guided by a [`Shape`], and writes into a
//! [`Value`] in place. Every failure goes through the [`ErrorSink`], which
//! decides from the mode whether traversal continues.

use tracing::trace;

use crate::error::ScrapeError;
use crate::extractors::Registry;
use crate::mode::{ErrorSink, Mode, Segment};
use crate::selection::Selection;
use crate::shape::{Directive, Field, Shape};
use crate::value::Value;
use crate::LOG_TARGET;

pub(crate) struct Binder<'r> {
    registry: &'r Registry,
    sink: ErrorSink,
}

impl<'r> Binder<'r> {
    pub(crate) fn new(registry: &'r Registry, mode: Mode) -> Self {
        Self {
            registry,
            sink: ErrorSink::new(mode),
        }
    }

    pub(crate) fn error_count(&self) -> usize {
        self.sink.error_count()
    }

    /// Result of the traversal: the aggregate of recorded failures, if any.
    pub(crate) fn finish(self) -> Result<(), ScrapeError> {
        self.sink.finish()
    }

    /// Narrow `selection` by the directive's selector and fill `target`.
    pub(crate) fn bind(
        &mut self,
        selection: &Selection<'_>,
        shape: &Shape,
        directive: &Directive,
        target: &mut Value,
    ) -> Result<(), ScrapeError> {
        if let Shape::Deferred(deferred) = shape {
            trace!(target: LOG_TARGET, "expanding recursive shape");
            return self.bind(selection, &deferred.resolve(), directive, target);
        }

        let selector = directive.select.as_str();
        let narrowed = if selector.is_empty() {
            selection.clone()
        } else {
            match selection.narrow(selector) {
                Ok(narrowed) => narrowed,
                Err(err) => return self.fail(shape, target, err),
            }
        };

        if narrowed.is_empty() {
            return self.bind_empty(shape, selector, target);
        }

        if selector.is_empty() {
            return self.dispatch(&narrowed, shape, &directive.extract, target);
        }
        self.sink.enter(Segment::Selector(selector.to_string()));
        let result = self.dispatch(&narrowed, shape, &directive.extract, target);
        self.sink.leave();
        result
    }

    fn bind_empty(
        &mut self,
        shape: &Shape,
        selector: &str,
        target: &mut Value,
    ) -> Result<(), ScrapeError> {
        match shape {
            Shape::Sequence { .. } => {
                target.list_mut()?.clear();
                Ok(())
            }
            Shape::Optional { .. } if self.sink.mode() != Mode::Strict => {
                *target.optional_mut()? = None;
                Ok(())
            }
            _ => self.fail(shape, target, ScrapeError::not_found(selector)),
        }
    }

    /// Report `err`; outside strict mode the failed slot drops back to its
    /// zero value.
    fn fail(
        &mut self,
        shape: &Shape,
        target: &mut Value,
        err: ScrapeError,
    ) -> Result<(), ScrapeError> {
        if self.sink.mode() != Mode::Strict {
            *target = Value::zero(shape);
        }
        self.sink.report(err)
    }

    fn dispatch(
        &mut self,
        selection: &Selection<'_>,
        shape: &Shape,
        extract: &str,
        target: &mut Value,
    ) -> Result<(), ScrapeError> {
        match shape {
            Shape::Primitive => self.bind_primitive(selection, extract, target),
            Shape::Sequence { element } => self.bind_sequence(selection, element, extract, target),
            Shape::Record { fields } => self.bind_record(selection, fields, target),
            Shape::Optional { inner } => self.bind_optional(selection, inner, extract, target),
            Shape::Deferred(deferred) => {
                self.dispatch(selection, &deferred.resolve(), extract, target)
            }
        }
    }

    fn bind_primitive(
        &mut self,
        selection: &Selection<'_>,
        extract: &str,
        target: &mut Value,
    ) -> Result<(), ScrapeError> {
        target.text_mut()?;
        let extracted = match selection.first() {
            Some(node) => self.registry.extract(node, extract),
            None => Err(ScrapeError::not_found("")),
        };
        match extracted {
            Ok(text) => {
                *target.text_mut()? = text;
                Ok(())
            }
            Err(err) => self.fail(&Shape::Primitive, target, err),
        }
    }

    /// Strict mode leaves `target` untouched when any element fails.
    fn bind_sequence(
        &mut self,
        selection: &Selection<'_>,
        element: &Shape,
        extract: &str,
        target: &mut Value,
    ) -> Result<(), ScrapeError> {
        let items = target.list_mut()?;
        let directive = Directive::extract_only(extract);
        let mut bound = Vec::with_capacity(selection.len());

        for (index, single) in selection.iter() {
            let mut item = Value::zero(element);
            self.sink.enter(Segment::Element(index));
            let result = self.bind(&single, element, &directive, &mut item);
            self.sink.leave();
            result?;
            bound.push(item);
        }

        trace!(target: LOG_TARGET, elements = bound.len(), "bound sequence");
        *items = bound;
        Ok(())
    }

    fn bind_record(
        &mut self,
        selection: &Selection<'_>,
        fields: &[Field],
        target: &mut Value,
    ) -> Result<(), ScrapeError> {
        let values = target.record_mut()?;
        let context = selection.first_only();

        for (field, (_, value)) in fields.iter().zip(values.iter_mut()) {
            self.bind(&context, &field.shape, &field.directive, value)?;
        }
        Ok(())
    }

    fn bind_optional(
        &mut self,
        selection: &Selection<'_>,
        inner: &Shape,
        extract: &str,
        target: &mut Value,
    ) -> Result<(), ScrapeError> {
        let slot = target.optional_mut()?;
        let mut value = Value::zero(inner);
        let result = self.bind(selection, inner, &Directive::extract_only(extract), &mut value);
        *slot = Some(Box::new(value));
        result
    }
}

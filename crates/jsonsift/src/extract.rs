//! Prefix-filtered extraction of values.
//!
//! Both extractors watch an annotated stream for events at an exact path and
//! hand the matching subtree to an [`ObjectBuilder`]. Only the subtree being
//! built is ever held in memory.

use log::trace;

use crate::{
    builder::ObjectBuilder,
    error::Error,
    event::Event,
    factory::ValueFactory,
    prefix::PrefixedEvent,
    stage::Stage,
};

/// Yields every value whose path equals the target prefix.
///
/// `""` matches top-level values only, `"docs.item"` matches each element of
/// a top-level `docs` array. Matching is by equality, so `"docs"` does not
/// match `"docs.item"`.
pub struct ItemsExtractor<F: ValueFactory> {
    prefix: String,
    builder: ObjectBuilder<F>,
    building: bool,
}

impl<F: ValueFactory> ItemsExtractor<F> {
    pub fn new(prefix: &str, factory: F) -> Self {
        Self {
            prefix: prefix.to_owned(),
            builder: ObjectBuilder::new(factory),
            building: false,
        }
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl<F: ValueFactory> Stage<PrefixedEvent> for ItemsExtractor<F> {
    type Output = F::Value;

    fn process(&mut self, input: PrefixedEvent) -> Result<Option<F::Value>, Error> {
        if !self.building {
            if input.path != self.prefix || !input.event.kind().starts_value() {
                return Ok(None);
            }
            self.building = true;
        }
        let done = self.builder.event(input.event)?;
        if done.is_some() {
            self.building = false;
            trace!("extracted item at {:?}", self.prefix);
        }
        Ok(done)
    }
}

/// Yields `(key, value)` for every member of the objects found at the target
/// prefix, in document order.
pub struct KvItemsExtractor<F: ValueFactory> {
    prefix: String,
    builder: ObjectBuilder<F>,
    key: Option<String>,
    building: bool,
}

impl<F: ValueFactory> KvItemsExtractor<F> {
    pub fn new(prefix: &str, factory: F) -> Self {
        Self {
            prefix: prefix.to_owned(),
            builder: ObjectBuilder::new(factory),
            key: None,
            building: false,
        }
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl<F: ValueFactory> Stage<PrefixedEvent> for KvItemsExtractor<F> {
    type Output = (String, F::Value);

    fn process(&mut self, input: PrefixedEvent) -> Result<Option<(String, F::Value)>, Error> {
        let PrefixedEvent { path, event } = input;
        if !self.building {
            match event {
                Event::MapKey(key) if path == self.prefix => {
                    self.key = Some(key);
                    return Ok(None);
                }
                // The event right after a matched key opens its value.
                _ if self.key.is_some() && event.kind().starts_value() => self.building = true,
                _ => return Ok(None),
            }
        }
        match self.builder.event(event)? {
            Some(value) => {
                self.building = false;
                // `building` is only set while a key is pending.
                Ok(self.key.take().map(|key| (key, value)))
            }
            None => Ok(None),
        }
    }
}

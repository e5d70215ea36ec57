//! Primitive events emitted by every tokenizer engine.
//!
//! An [`Event`] is one lexical or structural notification. Containers are
//! bracketed by start/end events, object members are introduced by
//! [`Event::MapKey`], and scalars carry their decoded value.
//!
//! # Examples
//!
//! ```
//! use jsonsift::{Event, Number, ParseOptions, basic_parse};
//!
//! let events: Vec<Event> = basic_parse(&br#"{"a": [1, null]}"#[..], &ParseOptions::default())
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(
//!     events,
//!     vec![
//!         Event::StartMap,
//!         Event::MapKey("a".into()),
//!         Event::StartArray,
//!         Event::Number(Number::Integer(1)),
//!         Event::Null,
//!         Event::EndArray,
//!         Event::EndMap,
//!     ]
//! );
//! ```

use std::fmt;

use crate::number::Number;

/// One primitive event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Null,
    Boolean(bool),
    Number(Number),
    String(String),
    StartMap,
    /// A member name; the member's value follows as the next value subtree.
    MapKey(String),
    EndMap,
    StartArray,
    EndArray,
}

impl Event {
    /// The payload-free kind of this event.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Null => EventKind::Null,
            Self::Boolean(_) => EventKind::Boolean,
            Self::Number(_) => EventKind::Number,
            Self::String(_) => EventKind::String,
            Self::StartMap => EventKind::StartMap,
            Self::MapKey(_) => EventKind::MapKey,
            Self::EndMap => EventKind::EndMap,
            Self::StartArray => EventKind::StartArray,
            Self::EndArray => EventKind::EndArray,
        }
    }
}

/// The kind of an [`Event`], without its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Null,
    Boolean,
    Number,
    String,
    StartMap,
    MapKey,
    EndMap,
    StartArray,
    EndArray,
}

impl EventKind {
    /// Conventional snake-case name, e.g. `start_map`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::StartMap => "start_map",
            Self::MapKey => "map_key",
            Self::EndMap => "end_map",
            Self::StartArray => "start_array",
            Self::EndArray => "end_array",
        }
    }

    /// `true` for events that begin a value: scalars and container openers.
    #[must_use]
    pub fn starts_value(self) -> bool {
        !matches!(self, Self::MapKey | Self::EndMap | Self::EndArray)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_starting_kinds() {
        let starting: Vec<_> = [
            EventKind::Null,
            EventKind::Boolean,
            EventKind::Number,
            EventKind::String,
            EventKind::StartMap,
            EventKind::MapKey,
            EventKind::EndMap,
            EventKind::StartArray,
            EventKind::EndArray,
        ]
        .into_iter()
        .filter(|k| k.starts_value())
        .map(EventKind::as_str)
        .collect();
        assert_eq!(
            starting,
            ["null", "boolean", "number", "string", "start_map", "start_array"]
        );
    }
}

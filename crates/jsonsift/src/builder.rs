//! Incremental reconstruction of values from events.

use crate::{
    error::{Error, SyntaxError, SyntaxErrorKind},
    event::{Event, EventKind},
    factory::{StdFactory, ValueFactory},
};

enum Frame<F: ValueFactory> {
    Array(F::Array),
    Map { map: F::Map, key: Option<String> },
}

/// Rebuilds one value from the events of its subtree.
///
/// Feed it events starting at a value boundary; [`ObjectBuilder::event`]
/// returns the completed value once the subtree closes. The frame stack is
/// empty exactly between values, so the same builder can be reused for a
/// sequence of top-level values.
///
/// ```
/// use jsonsift::{Event, Number, ObjectBuilder, StdFactory, Value};
///
/// let mut builder = ObjectBuilder::new(StdFactory::default());
/// assert_eq!(builder.event(Event::StartArray).unwrap(), None);
/// assert_eq!(builder.event(Event::Number(Number::Integer(1))).unwrap(), None);
/// let done = builder.event(Event::EndArray).unwrap();
/// assert_eq!(done, Some(Value::from(vec![Value::from(1)])));
/// ```
pub struct ObjectBuilder<F: ValueFactory = StdFactory> {
    factory: F,
    frames: Vec<Frame<F>>,
}

impl<F: ValueFactory> ObjectBuilder<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            frames: Vec::new(),
        }
    }

    /// Number of open containers.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// `true` between values.
    pub fn is_idle(&self) -> bool {
        self.frames.is_empty()
    }

    /// Consume one event; `Some` once a complete value is available.
    ///
    /// # Errors
    ///
    /// A syntax error when the event cannot occur at this point, e.g. a close
    /// without a matching open or a value inside an object without a key.
    pub fn event(&mut self, event: Event) -> Result<Option<F::Value>, Error> {
        let kind = event.kind();
        let value = match event {
            Event::Null => self.factory.null(),
            Event::Boolean(b) => self.factory.boolean(b),
            Event::Number(n) => self.factory.number(n),
            Event::String(s) => self.factory.string(s),
            Event::StartMap => {
                let map = self.factory.new_map();
                self.frames.push(Frame::Map { map, key: None });
                return Ok(None);
            }
            Event::StartArray => {
                let array = self.factory.new_array();
                self.frames.push(Frame::Array(array));
                return Ok(None);
            }
            Event::MapKey(k) => {
                return match self.frames.last_mut() {
                    Some(Frame::Map { key: slot @ None, .. }) => {
                        *slot = Some(k);
                        Ok(None)
                    }
                    _ => Err(unexpected(kind)),
                };
            }
            Event::EndMap => match self.frames.pop() {
                Some(Frame::Map { map, key: None }) => self.factory.from_map(map),
                _ => return Err(unexpected(kind)),
            },
            Event::EndArray => match self.frames.pop() {
                Some(Frame::Array(array)) => self.factory.from_array(array),
                _ => return Err(unexpected(kind)),
            },
        };
        self.attach(value, kind)
    }

    /// Hand a completed value to the top frame, or out if there is none.
    fn attach(&mut self, value: F::Value, kind: EventKind) -> Result<Option<F::Value>, Error> {
        match self.frames.last_mut() {
            None => Ok(Some(value)),
            Some(Frame::Array(array)) => {
                self.factory.push_array(array, value);
                Ok(None)
            }
            Some(Frame::Map { map, key }) => match key.take() {
                Some(k) => {
                    self.factory.insert_map(map, k, value);
                    Ok(None)
                }
                None => Err(unexpected(kind)),
            },
        }
    }
}

fn unexpected(kind: EventKind) -> Error {
    SyntaxError::new(SyntaxErrorKind::UnexpectedEvent(kind), None).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Map, MapRepresentation, Number, Value};

    fn build(events: Vec<Event>) -> Result<Vec<Value>, Error> {
        let mut builder = ObjectBuilder::new(StdFactory::default());
        let mut out = Vec::new();
        for e in events {
            out.extend(builder.event(e)?);
        }
        assert!(builder.is_idle());
        Ok(out)
    }

    #[test]
    fn scalar_completes_immediately() {
        assert_eq!(
            build(vec![Event::String("s".into())]).unwrap(),
            [Value::from("s")]
        );
    }

    #[test]
    fn nested_structure() {
        let values = build(vec![
            Event::StartMap,
            Event::MapKey("a".into()),
            Event::Number(Number::Integer(1)),
            Event::MapKey("b".into()),
            Event::StartArray,
            Event::Boolean(true),
            Event::StartMap,
            Event::EndMap,
            Event::EndArray,
            Event::EndMap,
        ])
        .unwrap();
        let mut inner = Map::new(MapRepresentation::Ordered);
        inner.insert("a".into(), Value::from(1));
        inner.insert(
            "b".into(),
            Value::from(vec![
                Value::Boolean(true),
                Value::Object(Map::new(MapRepresentation::Ordered)),
            ]),
        );
        assert_eq!(values, [Value::Object(inner)]);
    }

    #[test]
    fn reusable_across_values() {
        let values = build(vec![
            Event::StartArray,
            Event::EndArray,
            Event::Null,
            Event::StartArray,
            Event::Null,
            Event::EndArray,
        ])
        .unwrap();
        assert_eq!(
            values,
            [
                Value::Array(vec![]),
                Value::Null,
                Value::Array(vec![Value::Null])
            ]
        );
    }

    #[test]
    fn unordered_representation() {
        let mut builder = ObjectBuilder::new(StdFactory::new(MapRepresentation::Unordered));
        builder.event(Event::StartMap).unwrap();
        builder.event(Event::MapKey("k".into())).unwrap();
        builder.event(Event::Null).unwrap();
        let Some(Value::Object(map)) = builder.event(Event::EndMap).unwrap() else {
            panic!("expected an object");
        };
        assert_eq!(map.representation(), MapRepresentation::Unordered);
        assert_eq!(map.get("k"), Some(&Value::Null));
    }

    #[test]
    fn depth_tracks_frames() {
        let mut builder = ObjectBuilder::new(StdFactory::default());
        builder.event(Event::StartArray).unwrap();
        builder.event(Event::StartMap).unwrap();
        assert_eq!(builder.depth(), 2);
    }

    #[test]
    fn rejects_malformed_sequences() {
        for events in [
            vec![Event::EndArray],
            vec![Event::StartArray, Event::EndMap],
            vec![Event::MapKey("k".into())],
            vec![Event::StartMap, Event::Null],
            vec![Event::StartMap, Event::MapKey("a".into()), Event::MapKey("b".into())],
            vec![Event::StartMap, Event::MapKey("a".into()), Event::EndMap],
        ] {
            let err = build(events).unwrap_err();
            assert!(err.is_syntax());
        }
    }
}

//! The prefix annotator.
//!
//! Turns primitive events into [`PrefixedEvent`]s carrying the dotted path of
//! the container context they occur in. Array contexts contribute the label
//! `item`, object contexts contribute their current member name, and the root
//! contributes nothing:
//!
//! ```text
//! {"a": [1]}      ""      start_map
//!                 ""      map_key a
//!                 "a"     start_array
//!                 "a.item" number 1
//!                 "a"     end_array
//!                 ""      end_map
//! ```

use crate::{
    error::{Error, SyntaxError, SyntaxErrorKind},
    event::Event,
    stage::Stage,
};

/// An event together with its dotted path.
#[derive(Debug, Clone, PartialEq)]
pub struct PrefixedEvent {
    pub path: String,
    pub event: Event,
}

impl PrefixedEvent {
    pub fn new(path: impl Into<String>, event: Event) -> Self {
        Self {
            path: path.into(),
            event,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Map,
    Array,
}

/// One open container and the path length before it contributed a label.
#[derive(Debug, Clone, Copy)]
struct Frame {
    context: Context,
    base: usize,
}

/// Maintains the container-context stack and the current dotted path.
///
/// `path` always holds the full current path; each frame remembers where its
/// own label starts so closing a container truncates back in O(1).
#[derive(Debug, Default)]
pub struct Prefixer {
    path: String,
    frames: Vec<Frame>,
}

impl Prefixer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The path the next scalar would be reported at.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Number of open containers.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Append the label of the innermost frame. Every enclosing frame has
    /// already contributed a label, possibly an empty member name.
    fn push_label(&mut self, label: &str) {
        if self.frames.len() > 1 {
            self.path.push('.');
        }
        self.path.push_str(label);
    }

    fn open(&mut self, context: Context) {
        self.frames.push(Frame {
            context,
            base: self.path.len(),
        });
        if context == Context::Array {
            self.push_label("item");
        }
    }

    fn close(&mut self, context: Context, event: &Event) -> Result<(), Error> {
        match self.frames.pop() {
            Some(frame) if frame.context == context => {
                self.path.truncate(frame.base);
                Ok(())
            }
            _ => Err(misplaced(event)),
        }
    }

    /// Annotate one event, advancing the context stack.
    pub fn annotate(&mut self, event: Event) -> Result<PrefixedEvent, Error> {
        let path = match &event {
            Event::StartMap => {
                let path = self.path.clone();
                self.open(Context::Map);
                path
            }
            Event::StartArray => {
                let path = self.path.clone();
                self.open(Context::Array);
                path
            }
            Event::MapKey(key) => {
                let Some(frame) = self.frames.last().copied() else {
                    return Err(misplaced(&event));
                };
                if frame.context != Context::Map {
                    return Err(misplaced(&event));
                }
                self.path.truncate(frame.base);
                let path = self.path.clone();
                self.push_label(key);
                path
            }
            Event::EndMap => {
                self.close(Context::Map, &event)?;
                self.path.clone()
            }
            Event::EndArray => {
                self.close(Context::Array, &event)?;
                self.path.clone()
            }
            Event::Null | Event::Boolean(_) | Event::Number(_) | Event::String(_) => {
                self.path.clone()
            }
        };
        Ok(PrefixedEvent { path, event })
    }
}

fn misplaced(event: &Event) -> Error {
    SyntaxError::new(SyntaxErrorKind::UnexpectedEvent(event.kind()), None).into()
}

impl Stage<Event> for Prefixer {
    type Output = PrefixedEvent;

    #[inline]
    fn process(&mut self, input: Event) -> Result<Option<PrefixedEvent>, Error> {
        self.annotate(input).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Number;

    fn annotate_all(events: Vec<Event>) -> Vec<(String, Event)> {
        let mut prefixer = Prefixer::new();
        events
            .into_iter()
            .map(|e| {
                let p = prefixer.annotate(e).unwrap();
                (p.path, p.event)
            })
            .collect()
    }

    fn p(path: &str, event: Event) -> (String, Event) {
        (path.to_string(), event)
    }

    #[test]
    fn nested_paths() {
        let one = || Event::Number(Number::Integer(1));
        let annotated = annotate_all(vec![
            Event::StartMap,
            Event::MapKey("docs".into()),
            Event::StartArray,
            Event::StartMap,
            Event::MapKey("meta".into()),
            Event::StartArray,
            Event::StartArray,
            one(),
            Event::EndArray,
            Event::StartMap,
            Event::EndMap,
            Event::EndArray,
            Event::MapKey("n".into()),
            Event::Null,
            Event::EndMap,
            Event::EndArray,
            Event::EndMap,
        ]);
        assert_eq!(
            annotated,
            [
                p("", Event::StartMap),
                p("", Event::MapKey("docs".into())),
                p("docs", Event::StartArray),
                p("docs.item", Event::StartMap),
                p("docs.item", Event::MapKey("meta".into())),
                p("docs.item.meta", Event::StartArray),
                p("docs.item.meta.item", Event::StartArray),
                p("docs.item.meta.item.item", one()),
                p("docs.item.meta.item", Event::EndArray),
                p("docs.item.meta.item", Event::StartMap),
                p("docs.item.meta.item", Event::EndMap),
                p("docs.item.meta", Event::EndArray),
                p("docs.item", Event::MapKey("n".into())),
                p("docs.item.n", Event::Null),
                p("docs.item", Event::EndMap),
                p("docs", Event::EndArray),
                p("", Event::EndMap),
            ]
        );
    }

    #[test]
    fn depth_matches_open_containers() {
        let mut prefixer = Prefixer::new();
        for e in [Event::StartArray, Event::StartMap, Event::MapKey("a".into())] {
            prefixer.annotate(e).unwrap();
        }
        assert_eq!(prefixer.depth(), 2);
        assert_eq!(prefixer.path(), "item.a");
        prefixer.annotate(Event::EndMap).unwrap();
        assert_eq!(prefixer.depth(), 1);
        assert_eq!(prefixer.path(), "item");
    }

    #[test]
    fn scalars_at_root() {
        let annotated = annotate_all(vec![Event::String("x".into()), Event::Null]);
        assert_eq!(
            annotated,
            [p("", Event::String("x".into())), p("", Event::Null)]
        );
    }

    #[test]
    fn empty_member_names_keep_their_separator() {
        // {"": {"a": 1, "": [null]}, "a": 2}
        let annotated = annotate_all(vec![
            Event::StartMap,
            Event::MapKey(String::new()),
            Event::StartMap,
            Event::MapKey("a".into()),
            Event::Number(Number::Integer(1)),
            Event::MapKey(String::new()),
            Event::StartArray,
            Event::Null,
            Event::EndArray,
            Event::EndMap,
            Event::MapKey("a".into()),
            Event::Number(Number::Integer(2)),
            Event::EndMap,
        ]);
        let paths: Vec<&str> = annotated.iter().map(|(path, _)| path.as_str()).collect();
        assert_eq!(
            paths,
            ["", "", "", "", ".a", "", ".", "..item", ".", "", "", "a", ""]
        );
    }

    #[test]
    fn rejects_unbalanced_sequences() {
        let mut prefixer = Prefixer::new();
        assert!(prefixer.annotate(Event::EndMap).unwrap_err().is_syntax());
        let mut prefixer = Prefixer::new();
        prefixer.annotate(Event::StartArray).unwrap();
        assert!(prefixer.annotate(Event::MapKey("k".into())).is_err());
        assert!(prefixer.annotate(Event::EndMap).is_err());
    }
}

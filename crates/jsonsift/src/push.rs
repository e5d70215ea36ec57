//! Push discipline: the caller feeds chunks, results go to a [`Target`].
//!
//! Nothing here blocks. Each [`Pusher::feed`] runs the engine over the chunk
//! and hands every result it completes to the target before returning.

use std::collections::VecDeque;

use crate::{
    backend::Engine,
    error::{Error, SyntaxError, SyntaxErrorKind},
    event::Event,
    extract::{ItemsExtractor, KvItemsExtractor},
    factory::{StdFactory, ValueFactory},
    options::ParseOptions,
    prefix::{PrefixedEvent, Prefixer},
    session::{Session, Step},
    stage::{Chain, Passthrough, Stage},
    value::Value,
};

/// Receiver of the results of a [`Pusher`].
pub trait Target<T> {
    fn send(&mut self, item: T);
}

impl<T> Target<T> for Vec<T> {
    #[inline]
    fn send(&mut self, item: T) {
        self.push(item);
    }
}

impl<T> Target<T> for VecDeque<T> {
    #[inline]
    fn send(&mut self, item: T) {
        self.push_back(item);
    }
}

impl<T, U: Target<T> + ?Sized> Target<T> for &mut U {
    #[inline]
    fn send(&mut self, item: T) {
        (**self).send(item);
    }
}

/// Adapts a closure into a [`Target`].
///
/// ```
/// use jsonsift::{FnTarget, ParseOptions, Value, items_push};
///
/// let mut seen = 0;
/// let mut pusher = items_push(
///     FnTarget(|_: Value| seen += 1),
///     "item",
///     &ParseOptions::default(),
/// );
/// pusher.feed(b"[1, [2], ").unwrap();
/// pusher.feed(b"{}]").unwrap();
/// pusher.close().unwrap();
/// assert_eq!(seen, 3);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FnTarget<F>(pub F);

impl<T, F: FnMut(T)> Target<T> for FnTarget<F> {
    #[inline]
    fn send(&mut self, item: T) {
        (self.0)(item);
    }
}

/// A parsing session driven by explicit `feed` calls.
pub struct Pusher<S, T, E = Box<dyn Engine>> {
    session: Session<S, E>,
    target: T,
    error: Option<Error>,
    closed: bool,
}

impl<S, T, E> Pusher<S, T, E>
where
    S: Stage<Event>,
    T: Target<S::Output>,
    E: Engine,
{
    pub fn new(engine: E, stage: S, target: T) -> Self {
        Self {
            session: Session::new(engine, stage),
            target,
            error: None,
            closed: false,
        }
    }

    /// Feed one chunk. An empty chunk signals end of input.
    ///
    /// # Errors
    ///
    /// The first error the session runs into. Results completed before it
    /// have already been sent to the target. Once an error was returned,
    /// every later call returns it again.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<(), Error> {
        if let Some(err) = &self.error {
            return Err(err.replay());
        }
        if chunk.is_empty() {
            if self.closed {
                return Ok(());
            }
            self.closed = true;
            self.session.finish();
        } else if self.closed {
            let err: Error = SyntaxError::new(SyntaxErrorKind::AfterClose, None).into();
            self.error = Some(err.replay());
            return Err(err);
        } else {
            self.session.feed(chunk);
        }
        self.drain()
    }

    fn drain(&mut self) -> Result<(), Error> {
        loop {
            match self.session.step() {
                Step::Ready(Ok(output)) => self.target.send(output),
                Step::Ready(Err(err)) => {
                    self.error = Some(err.replay());
                    return Err(err);
                }
                Step::NeedInput | Step::Done => return Ok(()),
            }
        }
    }

    /// Signal end of input and hand back the target.
    ///
    /// # Errors
    ///
    /// An incompleteness error when the document was cut short, or the error
    /// an earlier `feed` already reported.
    pub fn close(mut self) -> Result<T, Error> {
        self.feed(&[])?;
        Ok(self.target)
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    /// Name of the engine driving this session.
    pub fn engine_name(&self) -> &'static str {
        self.session.engine().name()
    }
}

pub type BasicParsePush<T> = Pusher<Passthrough, T>;
pub type ParsePush<T> = Pusher<Prefixer, T>;
pub type ItemsPush<T, F = StdFactory> = Pusher<Chain<Prefixer, ItemsExtractor<F>>, T>;
pub type KvItemsPush<T, F = StdFactory> = Pusher<Chain<Prefixer, KvItemsExtractor<F>>, T>;

/// Push primitive events into `target`.
pub fn basic_parse_push<T: Target<Event>>(
    target: T,
    options: &ParseOptions,
) -> BasicParsePush<T> {
    Pusher::new(options.backend.engine(options), Passthrough, target)
}

/// Push `(path, event)` pairs into `target`.
pub fn parse_push<T: Target<PrefixedEvent>>(
    target: T,
    options: &ParseOptions,
) -> ParsePush<T> {
    Pusher::new(options.backend.engine(options), Prefixer::new(), target)
}

/// Push every value found at `prefix` into `target`.
pub fn items_push<T: Target<Value>>(
    target: T,
    prefix: &str,
    options: &ParseOptions,
) -> ItemsPush<T> {
    items_push_with_factory(target, prefix, options, StdFactory::from_options(options))
}

/// Push `(key, value)` for every member of the objects at `prefix` into
/// `target`.
pub fn kvitems_push<T: Target<(String, Value)>>(
    target: T,
    prefix: &str,
    options: &ParseOptions,
) -> KvItemsPush<T> {
    kvitems_push_with_factory(target, prefix, options, StdFactory::from_options(options))
}

/// [`items_push`], building values with `factory`.
pub fn items_push_with_factory<T, F>(
    target: T,
    prefix: &str,
    options: &ParseOptions,
    factory: F,
) -> ItemsPush<T, F>
where
    F: ValueFactory,
    T: Target<F::Value>,
{
    let stage = Chain::new(Prefixer::new(), ItemsExtractor::new(prefix, factory));
    Pusher::new(options.backend.engine(options), stage, target)
}

/// [`kvitems_push`], building values with `factory`.
pub fn kvitems_push_with_factory<T, F>(
    target: T,
    prefix: &str,
    options: &ParseOptions,
    factory: F,
) -> KvItemsPush<T, F>
where
    F: ValueFactory,
    T: Target<(String, F::Value)>,
{
    let stage = Chain::new(Prefixer::new(), KvItemsExtractor::new(prefix, factory));
    Pusher::new(options.backend.engine(options), stage, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Number;

    #[test]
    fn events_arrive_as_chunks_complete() {
        let mut pusher = basic_parse_push(Vec::new(), &ParseOptions::default());
        pusher.feed(b"[12").unwrap();
        assert_eq!(pusher.target(), &[Event::StartArray]);
        pusher.feed(b"3, ").unwrap();
        assert_eq!(pusher.target().len(), 2);
        pusher.feed(b"4]").unwrap();
        let events = pusher.close().unwrap();
        assert_eq!(
            events,
            [
                Event::StartArray,
                Event::Number(Number::Integer(123)),
                Event::Number(Number::Integer(4)),
                Event::EndArray,
            ]
        );
    }

    #[test]
    fn close_reports_truncation() {
        let mut pusher = items_push(Vec::new(), "", &ParseOptions::default());
        pusher.feed(b"{\"a\": [1").unwrap();
        assert!(pusher.close().unwrap_err().is_incomplete());
    }

    #[test]
    fn empty_chunk_closes() {
        let mut out = Vec::new();
        let mut pusher = parse_push(&mut out, &ParseOptions::default());
        pusher.feed(b"7").unwrap();
        assert!(pusher.target().is_empty());
        pusher.feed(b"").unwrap();
        let err = pusher.feed(b"8").unwrap_err();
        assert!(matches!(
            err,
            Error::Syntax(ref e) if *e.kind() == SyntaxErrorKind::AfterClose
        ));
        drop(pusher);
        assert_eq!(
            out,
            [PrefixedEvent::new("", Event::Number(Number::Integer(7)))]
        );
    }

    #[test]
    fn errors_are_sticky() {
        let mut pusher = kvitems_push(Vec::new(), "", &ParseOptions::default());
        pusher.feed(b"{\"a\": 1, \"b\" 2}").unwrap_err();
        assert_eq!(pusher.target(), &[("a".to_string(), Value::from(1))]);
        assert!(pusher.feed(b"{}").unwrap_err().is_syntax());
        assert!(pusher.close().unwrap_err().is_syntax());
    }

    #[test]
    fn target_can_be_drained_between_feeds() {
        let mut pusher = items_push(VecDeque::new(), "item", &ParseOptions::default());
        pusher.feed(b"[1, 2,").unwrap();
        let first: Vec<Value> = pusher.target_mut().drain(..).collect();
        assert_eq!(first, [Value::from(1), Value::from(2)]);
        pusher.feed(b" 3]").unwrap();
        let rest = pusher.close().unwrap();
        assert_eq!(rest, [Value::from(3)]);
    }
}

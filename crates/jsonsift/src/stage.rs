//! Per-event pipeline stages.
//!
//! Every layer above the tokenizer (annotation, extraction) is a [`Stage`]:
//! it takes one item and returns at most one output. The execution
//! disciplines are generic over a stage, and stages compose with [`Chain`].
//!
//! The iterator extensions at the bottom run the same stages over event
//! streams that already exist, e.g. events recorded earlier or produced by
//! another parser.

use crate::{
    error::Error,
    event::Event,
    extract::{ItemsExtractor, KvItemsExtractor},
    factory::StdFactory,
    prefix::{PrefixedEvent, Prefixer},
};

/// One step of the event pipeline.
pub trait Stage<In> {
    type Output;

    /// Consume `input`, possibly producing one output.
    fn process(&mut self, input: In) -> Result<Option<Self::Output>, Error>;
}

/// Forwards every item unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl<T> Stage<T> for Passthrough {
    type Output = T;

    #[inline]
    fn process(&mut self, input: T) -> Result<Option<T>, Error> {
        Ok(Some(input))
    }
}

/// Runs `first`, then feeds its outputs to `second`.
#[derive(Debug, Clone, Default)]
pub struct Chain<A, B> {
    first: A,
    second: B,
}

impl<A, B> Chain<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<In, A, B> Stage<In> for Chain<A, B>
where
    A: Stage<In>,
    B: Stage<A::Output>,
{
    type Output = B::Output;

    #[inline]
    fn process(&mut self, input: In) -> Result<Option<B::Output>, Error> {
        match self.first.process(input)? {
            Some(mid) => self.second.process(mid),
            None => Ok(None),
        }
    }
}

/// Iterator applying a [`Stage`] to a fallible source iterator.
///
/// Fused after the first error.
#[derive(Debug)]
pub struct Staged<I, S> {
    iter: I,
    stage: S,
    done: bool,
}

impl<I, S> Staged<I, S> {
    pub fn new(iter: I, stage: S) -> Self {
        Self {
            iter,
            stage,
            done: false,
        }
    }
}

impl<I, T, S> Iterator for Staged<I, S>
where
    I: Iterator<Item = Result<T, Error>>,
    S: Stage<T>,
{
    type Item = Result<S::Output, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        for item in self.iter.by_ref() {
            match item.and_then(|input| self.stage.process(input)) {
                Ok(Some(output)) => return Some(Ok(output)),
                Ok(None) => {}
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }
        self.done = true;
        None
    }
}

/// Annotation over any stream of primitive events.
pub trait EventIteratorExt: Iterator<Item = Result<Event, Error>> + Sized {
    /// Attach a dotted path to every event.
    fn prefixed(self) -> Staged<Self, Prefixer> {
        Staged::new(self, Prefixer::new())
    }
}

impl<I: Iterator<Item = Result<Event, Error>>> EventIteratorExt for I {}

/// Extraction over any stream of annotated events.
pub trait PrefixedIteratorExt: Iterator<Item = Result<PrefixedEvent, Error>> + Sized {
    /// Reconstruct every value found at `prefix`.
    fn items(self, prefix: &str) -> Staged<Self, ItemsExtractor<StdFactory>> {
        Staged::new(self, ItemsExtractor::new(prefix, StdFactory::default()))
    }

    /// Reconstruct every member of the objects found at `prefix`.
    fn kvitems(self, prefix: &str) -> Staged<Self, KvItemsExtractor<StdFactory>> {
        Staged::new(self, KvItemsExtractor::new(prefix, StdFactory::default()))
    }
}

impl<I: Iterator<Item = Result<PrefixedEvent, Error>>> PrefixedIteratorExt for I {}

//! Blocking pull discipline over [`std::io::Read`].
//!
//! Each call to `next` reads from the source only when every event produced
//! so far has been consumed, so memory stays bounded by one read plus the
//! subtree currently being built.

use std::io::{self, Read};

use log::trace;

use crate::{
    backend::Engine,
    error::Error,
    event::Event,
    extract::{ItemsExtractor, KvItemsExtractor},
    factory::{StdFactory, ValueFactory},
    options::ParseOptions,
    prefix::Prefixer,
    session::{Session, Step},
    stage::{Chain, Passthrough, Stage},
};

/// Iterator pulling chunks from a reader through an engine and a stage.
///
/// Fused: after an error or the end of input it only returns `None`.
/// Dropping it early releases the engine without reading further.
pub struct Reader<R, S, E = Box<dyn Engine>> {
    source: R,
    session: Session<S, E>,
    buf: Box<[u8]>,
}

impl<R, S, E> Reader<R, S, E>
where
    R: Read,
    S: Stage<Event>,
    E: Engine,
{
    /// Drive `engine` with reads of `chunk_size` bytes from `source`.
    pub fn new(source: R, engine: E, stage: S, chunk_size: usize) -> Self {
        Self {
            source,
            session: Session::new(engine, stage),
            buf: vec![0; chunk_size.max(1)].into_boxed_slice(),
        }
    }

    /// Name of the engine driving this reader.
    pub fn engine_name(&self) -> &'static str {
        self.session.engine().name()
    }

    fn read_chunk(&mut self) {
        loop {
            match self.source.read(&mut self.buf) {
                Ok(0) => return self.session.finish(),
                Ok(n) => return self.session.feed(&self.buf[..n]),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {
                    trace!("read interrupted, retrying");
                }
                Err(err) => return self.session.fail(err.into()),
            }
        }
    }
}

impl<R, S, E> Iterator for Reader<R, S, E>
where
    R: Read,
    S: Stage<Event>,
    E: Engine,
{
    type Item = Result<S::Output, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.session.step() {
                Step::Ready(item) => return Some(item),
                Step::Done => return None,
                Step::NeedInput => self.read_chunk(),
            }
        }
    }
}

impl<R, S, E> std::iter::FusedIterator for Reader<R, S, E>
where
    R: Read,
    S: Stage<Event>,
    E: Engine,
{
}

/// Primitive events read from `R`.
pub type BasicParse<R> = Reader<R, Passthrough>;
/// Annotated events read from `R`.
pub type Parse<R> = Reader<R, Prefixer>;
/// Values at a prefix read from `R`.
pub type Items<R, F = StdFactory> = Reader<R, Chain<Prefixer, ItemsExtractor<F>>>;
/// Object members at a prefix read from `R`.
pub type KvItems<R, F = StdFactory> = Reader<R, Chain<Prefixer, KvItemsExtractor<F>>>;

fn reader<R: Read, S: Stage<Event>>(
    source: R,
    options: &ParseOptions,
    stage: S,
) -> Reader<R, S> {
    Reader::new(
        source,
        options.backend.engine(options),
        stage,
        options.read_size(),
    )
}

/// Stream the primitive events of the document read from `source`.
///
/// ```
/// use jsonsift::{Event, ParseOptions, basic_parse};
///
/// let events: Vec<Event> = basic_parse(&b"[true]"[..], &ParseOptions::default())
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(events, [Event::StartArray, Event::Boolean(true), Event::EndArray]);
/// ```
pub fn basic_parse<R: Read>(source: R, options: &ParseOptions) -> BasicParse<R> {
    reader(source, options, Passthrough)
}

/// Stream `(path, event)` pairs for the document read from `source`.
pub fn parse<R: Read>(source: R, options: &ParseOptions) -> Parse<R> {
    reader(source, options, Prefixer::new())
}

/// Stream every value found at `prefix`.
///
/// ```
/// use jsonsift::{ParseOptions, Value, items};
///
/// let doc = br#"{"b": [2, 3]}"#;
/// let values: Vec<Value> = items(&doc[..], "b.item", &ParseOptions::default())
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(values, [Value::from(2), Value::from(3)]);
/// ```
pub fn items<R: Read>(source: R, prefix: &str, options: &ParseOptions) -> Items<R> {
    items_with_factory(source, prefix, options, StdFactory::from_options(options))
}

/// Stream `(key, value)` for every member of the objects found at `prefix`.
pub fn kvitems<R: Read>(source: R, prefix: &str, options: &ParseOptions) -> KvItems<R> {
    kvitems_with_factory(source, prefix, options, StdFactory::from_options(options))
}

/// [`items`], building values with `factory`.
pub fn items_with_factory<R: Read, F: ValueFactory>(
    source: R,
    prefix: &str,
    options: &ParseOptions,
    factory: F,
) -> Items<R, F> {
    let stage = Chain::new(Prefixer::new(), ItemsExtractor::new(prefix, factory));
    reader(source, options, stage)
}

/// [`kvitems`], building values with `factory`.
pub fn kvitems_with_factory<R: Read, F: ValueFactory>(
    source: R,
    prefix: &str,
    options: &ParseOptions,
    factory: F,
) -> KvItems<R, F> {
    let stage = Chain::new(Prefixer::new(), KvItemsExtractor::new(prefix, factory));
    reader(source, options, stage)
}

//! Cooperative async pull over [`tokio::io::AsyncRead`].
//!
//! The same session as the blocking reader, except that fetching more input
//! awaits the source. A task waiting on [`AsyncReader::next`] only holds its
//! thread while the engine is running over a chunk already read.

use std::io;

use log::trace;
use tokio::io::{AsyncRead, AsyncReadExt};

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

/// Async counterpart of [`Reader`](crate::Reader).
///
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use jsonsift::{ParseOptions, Value, items_async};
///
/// let mut values = items_async(&b"[1, 2]"[..], "item", &ParseOptions::default());
/// let mut out = Vec::new();
/// while let Some(value) = values.next().await {
///     out.push(value.unwrap());
/// }
/// assert_eq!(out, [Value::from(1), Value::from(2)]);
/// # }
/// ```
pub struct AsyncReader<R, S, E = Box<dyn Engine>> {
    source: R,
    session: Session<S, E>,
    buf: Box<[u8]>,
}

impl<R, S, E> AsyncReader<R, S, E>
where
    R: AsyncRead + Unpin,
    S: Stage<Event>,
    E: Engine,
{
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

    /// The next result, or `None` once the document is exhausted or an error
    /// has been returned.
    ///
    /// Cancel safe: dropping the future never loses input.
    pub async fn next(&mut self) -> Option<Result<S::Output, Error>> {
        loop {
            match self.session.step() {
                Step::Ready(item) => return Some(item),
                Step::Done => return None,
                Step::NeedInput => self.read_chunk().await,
            }
        }
    }

    async fn read_chunk(&mut self) {
        loop {
            match self.source.read(&mut self.buf).await {
                Ok(0) => return self.session.finish(),
                Ok(n) => return self.session.feed(&self.buf[..n]),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {
                    trace!("read interrupted, retrying");
                }
                Err(err) => return self.session.fail(err.into()),
            }
        }
    }

    /// Drain every remaining result.
    ///
    /// # Errors
    ///
    /// The first error the session reports.
    pub async fn collect(mut self) -> Result<Vec<S::Output>, Error> {
        let mut out = Vec::new();
        while let Some(item) = self.next().await {
            out.push(item?);
        }
        Ok(out)
    }
}

pub type BasicParseAsync<R> = AsyncReader<R, Passthrough>;
pub type ParseAsync<R> = AsyncReader<R, Prefixer>;
pub type ItemsAsync<R, F = StdFactory> = AsyncReader<R, Chain<Prefixer, ItemsExtractor<F>>>;
pub type KvItemsAsync<R, F = StdFactory> = AsyncReader<R, Chain<Prefixer, KvItemsExtractor<F>>>;

fn reader<R, S>(source: R, options: &ParseOptions, stage: S) -> AsyncReader<R, S>
where
    R: AsyncRead + Unpin,
    S: Stage<Event>,
{
    AsyncReader::new(
        source,
        options.backend.engine(options),
        stage,
        options.read_size(),
    )
}

/// Async [`basic_parse`](crate::basic_parse).
pub fn basic_parse_async<R: AsyncRead + Unpin>(
    source: R,
    options: &ParseOptions,
) -> BasicParseAsync<R> {
    reader(source, options, Passthrough)
}

/// Async [`parse`](crate::parse).
pub fn parse_async<R: AsyncRead + Unpin>(source: R, options: &ParseOptions) -> ParseAsync<R> {
    reader(source, options, Prefixer::new())
}

/// Async [`items`](crate::items).
pub fn items_async<R: AsyncRead + Unpin>(
    source: R,
    prefix: &str,
    options: &ParseOptions,
) -> ItemsAsync<R> {
    items_async_with_factory(source, prefix, options, StdFactory::from_options(options))
}

/// Async [`kvitems`](crate::kvitems).
pub fn kvitems_async<R: AsyncRead + Unpin>(
    source: R,
    prefix: &str,
    options: &ParseOptions,
) -> KvItemsAsync<R> {
    kvitems_async_with_factory(source, prefix, options, StdFactory::from_options(options))
}

/// [`items_async`], building values with `factory`.
pub fn items_async_with_factory<R: AsyncRead + Unpin, F: ValueFactory>(
    source: R,
    prefix: &str,
    options: &ParseOptions,
    factory: F,
) -> ItemsAsync<R, F> {
    let stage = Chain::new(Prefixer::new(), ItemsExtractor::new(prefix, factory));
    reader(source, options, stage)
}

/// [`kvitems_async`], building values with `factory`.
pub fn kvitems_async_with_factory<R: AsyncRead + Unpin, F: ValueFactory>(
    source: R,
    prefix: &str,
    options: &ParseOptions,
    factory: F,
) -> KvItemsAsync<R, F> {
    let stage = Chain::new(Prefixer::new(), KvItemsExtractor::new(prefix, factory));
    reader(source, options, stage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Number, Value};

    #[tokio::test]
    async fn events_in_document_order() {
        let reader = basic_parse_async(&b"{\"a\": 1}"[..], &ParseOptions::default());
        let events = reader.collect().await.unwrap();
        assert_eq!(
            events,
            [
                Event::StartMap,
                Event::MapKey("a".into()),
                Event::Number(Number::Integer(1)),
                Event::EndMap,
            ]
        );
    }

    #[tokio::test]
    async fn values_yielded_before_truncation() {
        let options = ParseOptions {
            chunk_size: 2,
            ..ParseOptions::default()
        };
        let mut reader = items_async(&b"[1, 2, {\"a\""[..], "item", &options);
        assert_eq!(reader.next().await.unwrap().unwrap(), Value::from(1));
        assert_eq!(reader.next().await.unwrap().unwrap(), Value::from(2));
        assert!(reader.next().await.unwrap().unwrap_err().is_incomplete());
        assert!(reader.next().await.is_none());
    }
}

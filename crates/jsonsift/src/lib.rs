//! Incremental JSON parsing over chunked input.
//!
//! A document is consumed chunk by chunk, with boundaries allowed anywhere,
//! and surfaces at four levels:
//!
//! - [`basic_parse`]: primitive [`Event`]s.
//! - [`parse`]: events annotated with their dotted path ([`PrefixedEvent`]).
//! - [`items`]: every [`Value`] found at one path.
//! - [`kvitems`]: every `(key, value)` member of the objects found at one
//!   path.
//!
//! Each comes in three execution disciplines with identical output: a
//! blocking iterator over [`std::io::Read`], a push variant fed explicitly
//! by the caller ([`items_push`] and friends), and an async variant over
//! [`tokio::io::AsyncRead`] ([`items_async`] and friends, feature `async`).
//!
//! Tokenizing is done by an [`Engine`]. The pure-Rust [`Tokenizer`] is always
//! available; feature `yajl` adds [`YajlEngine`] on top of libyajl 2.x.
//! [`ParseOptions::backend`] picks one.
//!
//! ```
//! use jsonsift::{ParseOptions, Value, kvitems};
//!
//! let doc = br#"{"a": 1, "b": [2, 3]}"#;
//! let pairs: Vec<(String, Value)> = kvitems(&doc[..], "", &ParseOptions::default())
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(pairs[0], ("a".to_string(), Value::from(1)));
//! assert_eq!(pairs[1].1, Value::from(vec![Value::from(2), Value::from(3)]));
//! ```

#![allow(missing_docs)]

#[cfg(feature = "async")]
mod async_reader;
mod backend;
mod blocking;
mod builder;
mod error;
mod event;
mod extract;
mod factory;
mod number;
mod options;
mod prefix;
mod push;
mod session;
mod stage;
mod tokenizer;
mod value;

#[doc(hidden)]
pub mod chunk_utils;

#[cfg(test)]
mod tests;

#[cfg(feature = "async")]
pub use async_reader::{
    AsyncReader, BasicParseAsync, ItemsAsync, KvItemsAsync, ParseAsync, basic_parse_async,
    items_async, items_async_with_factory, kvitems_async, kvitems_async_with_factory, parse_async,
};
#[cfg(feature = "yajl")]
pub use backend::YajlEngine;
pub use backend::{Backend, Engine, EventSink};
pub use blocking::{
    BasicParse, Items, KvItems, Parse, Reader, basic_parse, items, items_with_factory, kvitems,
    kvitems_with_factory, parse,
};
pub use builder::ObjectBuilder;
pub use error::{Error, IncompleteError, Position, SyntaxError, SyntaxErrorKind};
pub use event::{Event, EventKind};
pub use extract::{ItemsExtractor, KvItemsExtractor};
pub use factory::{StdFactory, ValueFactory};
pub use number::Number;
pub use options::{DEFAULT_CHUNK_SIZE, MapRepresentation, ParseOptions};
pub use prefix::{PrefixedEvent, Prefixer};
pub use push::{
    BasicParsePush, FnTarget, ItemsPush, KvItemsPush, ParsePush, Pusher, Target, basic_parse_push,
    items_push, items_push_with_factory, kvitems_push, kvitems_push_with_factory, parse_push,
};
pub use stage::{Chain, EventIteratorExt, Passthrough, PrefixedIteratorExt, Stage, Staged};
pub use tokenizer::Tokenizer;
pub use value::{Array, Iter, Map, Value};

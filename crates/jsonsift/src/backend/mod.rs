//! Tokenizer engines and the contract they share.
//!
//! An [`Engine`] turns input chunks into primitive events delivered through an
//! [`EventSink`]. Everything above this layer (annotation, building,
//! extraction, the execution disciplines) is written once against these two
//! traits.
//!
//! Engines are chosen explicitly through the [`Backend`] registry; nothing
//! here probes the environment for installed libraries.

#[cfg(feature = "yajl")]
mod yajl;

use std::collections::VecDeque;

#[cfg(feature = "yajl")]
pub use yajl::YajlEngine;

use crate::{
    error::Error, event::Event, number::Number, options::ParseOptions, tokenizer::Tokenizer,
};

/// Receiver of primitive events, one method per event kind.
pub trait EventSink {
    fn null(&mut self);
    fn boolean(&mut self, value: bool);
    fn number(&mut self, value: Number);
    fn string(&mut self, value: String);
    fn start_map(&mut self);
    fn map_key(&mut self, key: String);
    fn end_map(&mut self);
    fn start_array(&mut self);
    fn end_array(&mut self);

    /// Dispatch an already-built event to the matching method.
    fn event(&mut self, event: Event) {
        match event {
            Event::Null => self.null(),
            Event::Boolean(b) => self.boolean(b),
            Event::Number(n) => self.number(n),
            Event::String(s) => self.string(s),
            Event::StartMap => self.start_map(),
            Event::MapKey(k) => self.map_key(k),
            Event::EndMap => self.end_map(),
            Event::StartArray => self.start_array(),
            Event::EndArray => self.end_array(),
        }
    }
}

macro_rules! queue_sink {
    ($ty:ident, $push:ident) => {
        impl EventSink for $ty<Event> {
            fn null(&mut self) {
                self.$push(Event::Null);
            }
            fn boolean(&mut self, value: bool) {
                self.$push(Event::Boolean(value));
            }
            fn number(&mut self, value: Number) {
                self.$push(Event::Number(value));
            }
            fn string(&mut self, value: String) {
                self.$push(Event::String(value));
            }
            fn start_map(&mut self) {
                self.$push(Event::StartMap);
            }
            fn map_key(&mut self, key: String) {
                self.$push(Event::MapKey(key));
            }
            fn end_map(&mut self) {
                self.$push(Event::EndMap);
            }
            fn start_array(&mut self) {
                self.$push(Event::StartArray);
            }
            fn end_array(&mut self) {
                self.$push(Event::EndArray);
            }
            fn event(&mut self, event: Event) {
                self.$push(event);
            }
        }
    };
}

queue_sink!(Vec, push);
queue_sink!(VecDeque, push_back);

/// A tokenizer engine.
///
/// Chunk boundaries may fall anywhere, including inside a multi-byte
/// character, an escape or a number; engines buffer partial lexemes
/// internally. For identical well-formed input every engine produces the
/// same events regardless of how the input was chunked.
///
/// After an engine has returned an error, every later call returns that same
/// error again.
pub trait Engine: Send {
    /// Consume one chunk. An empty chunk is a no-op.
    fn feed(&mut self, chunk: &[u8], sink: &mut dyn EventSink) -> Result<(), Error>;

    /// Signal end of input, flushing a trailing number and reporting
    /// truncated input as an incompleteness error.
    fn finish(&mut self, sink: &mut dyn EventSink) -> Result<(), Error>;

    /// Short engine name for diagnostics.
    fn name(&self) -> &'static str;
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn feed(&mut self, chunk: &[u8], sink: &mut dyn EventSink) -> Result<(), Error> {
        (**self).feed(chunk, sink)
    }

    fn finish(&mut self, sink: &mut dyn EventSink) -> Result<(), Error> {
        (**self).finish(sink)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Registry of the engines compiled into this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// The pure-Rust [`Tokenizer`].
    #[default]
    Software,
    /// libyajl 2.x through FFI.
    #[cfg(feature = "yajl")]
    Yajl,
}

impl Backend {
    /// Every engine available in this build.
    #[must_use]
    pub fn available() -> &'static [Backend] {
        #[cfg(not(feature = "yajl"))]
        const ALL: &[Backend] = &[Backend::Software];
        #[cfg(feature = "yajl")]
        const ALL: &[Backend] = &[Backend::Software, Backend::Yajl];
        ALL
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Software => "software",
            #[cfg(feature = "yajl")]
            Self::Yajl => "yajl2",
        }
    }

    /// Look an engine up by [`name`](Self::name).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::available().iter().copied().find(|b| b.name() == name)
    }

    /// A fresh engine instance configured from `options`.
    #[must_use]
    pub fn engine(self, options: &ParseOptions) -> Box<dyn Engine> {
        match self {
            Self::Software => Box::new(Tokenizer::new(options)),
            #[cfg(feature = "yajl")]
            Self::Yajl => Box::new(YajlEngine::new(options)),
        }
    }
}

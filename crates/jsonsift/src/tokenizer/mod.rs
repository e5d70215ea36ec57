//! The software tokenizer engine.
//!
//! # Design
//!
//! The tokenizer is a byte-driven state machine split into two layers, both
//! stored as plain fields so that a chunk boundary can fall anywhere:
//!
//! - The **lexer state** ([`Lex`]) says what kind of lexeme is in flight
//!   (literal, number, string, comment) and where inside it we are. Bytes of
//!   the pending string or number are kept in `lexeme`; UTF-8 is validated only
//!   when a string closes, so a multi-byte character split over two chunks needs
//!   no special handling.
//! - The **structural state** ([`ParseState`]) plus the container stack say
//!   which token may legally come next.
//!
//! Feeding a chunk runs every byte through the machine and pushes events into
//! the caller's [`EventSink`] as soon as they are known. A number can only be
//! known complete once the byte after it arrives, so a number that ends the
//! input is emitted by [`Engine::finish`].

mod escape;
mod literal;

use bstr::ByteSlice;
use log::{debug, trace};

use self::{
    escape::{UnicodeEscapeBuffer, combine_surrogates, is_high_surrogate, is_low_surrogate},
    literal::{LiteralMatcher, Step},
};
use crate::{
    backend::{Engine, EventSink},
    error::{Error, IncompleteError, Position, SyntaxError, SyntaxErrorKind},
    number::Number,
    options::ParseOptions,
};

/// Pure-Rust implementation of the [`Engine`] contract.
#[derive(Debug)]
pub struct Tokenizer {
    allow_comments: bool,
    multiple_values: bool,
    exact_numbers: bool,

    lex: Lex,
    parse: ParseState,
    containers: Vec<Container>,

    /// Raw bytes of the string or number being lexed.
    lexeme: Vec<u8>,
    /// Whether the string being lexed is a member name.
    key: bool,
    literal: LiteralMatcher,
    escape: UnicodeEscapeBuffer,
    high_surrogate: u16,

    position: Position,
    values: usize,
    finished: bool,
    failed: Option<Error>,
}

// ---- States ----

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lex {
    /// Between tokens.
    Between,
    Literal,
    Number(Num),
    String(Str),
    Comment(Comment),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Num {
    Minus,
    Zero,
    Integer,
    Point,
    Fraction,
    Exponent,
    ExponentSign,
    ExponentDigits,
}

impl Num {
    /// Whether the lexeme read so far is a complete number.
    fn is_complete(self) -> bool {
        matches!(
            self,
            Self::Zero | Self::Integer | Self::Fraction | Self::ExponentDigits
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Str {
    Plain,
    Escape,
    Unicode,
    /// A high surrogate was decoded; expecting `\` of its low half.
    PairBackslash,
    PairU,
    PairUnicode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comment {
    Slash,
    Block,
    BlockStar,
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Before the first top-level value.
    Start,
    /// After `{`: a member name or `}`.
    MapOpen,
    /// After `,` in an object: a member name.
    KeyAfterComma,
    /// After a member name: `:`.
    AfterKey,
    /// After `:`: a value.
    BeforeValue,
    /// After `[`: a value or `]`.
    ArrayOpen,
    /// After `,` in an array: a value.
    ItemAfterComma,
    /// After a value inside a container: `,` or the closing bracket.
    AfterValue,
    /// After a complete top-level value.
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Map,
    Array,
}

/// Whether the byte just examined was consumed or must be examined again in
/// the new state.
enum Flow {
    Consumed,
    Reprocess,
}

impl Tokenizer {
    #[must_use]
    pub fn new(options: &ParseOptions) -> Self {
        Self {
            allow_comments: options.allow_comments,
            multiple_values: options.multiple_values,
            exact_numbers: options.use_exact_numbers,
            lex: Lex::Between,
            parse: ParseState::Start,
            containers: Vec::new(),
            lexeme: Vec::new(),
            key: false,
            literal: LiteralMatcher::default(),
            escape: UnicodeEscapeBuffer::default(),
            high_surrogate: 0,
            position: Position::START,
            values: 0,
            finished: false,
            failed: None,
        }
    }

    /// Position of the next byte to be read.
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Number of containers currently open.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.containers.len()
    }

    // ---- Error helpers ----

    fn syntax(&self, kind: SyntaxErrorKind) -> Error {
        SyntaxError::new(kind, Some(self.position)).into()
    }

    fn unexpected(&self, b: u8) -> Error {
        self.syntax(SyntaxErrorKind::InvalidCharacter(b))
    }

    fn incomplete(&self, context: &'static str) -> Error {
        IncompleteError::new(context, Some(self.position)).into()
    }

    fn fail(&mut self, err: Error) -> Error {
        debug!("software tokenizer failed: {err}");
        self.failed = Some(err.replay());
        err
    }

    // ---- Driver ----

    fn run(&mut self, chunk: &[u8], sink: &mut dyn EventSink) -> Result<(), Error> {
        let mut i = 0;
        while i < chunk.len() {
            if self.lex == Lex::String(Str::Plain) {
                // Copy the run of ordinary string bytes in one go.
                let rest = &chunk[i..];
                let run = &rest[..rest.find_byteset(b"\"\\").unwrap_or(rest.len())];
                if let Some(ctrl) = run.iter().position(|b| *b < 0x20) {
                    self.position.advance_inline(&run[..ctrl]);
                    return Err(self.syntax(SyntaxErrorKind::ControlCharacter(run[ctrl])));
                }
                self.lexeme.extend_from_slice(run);
                self.position.advance_inline(run);
                i += run.len();
                if i == chunk.len() {
                    break;
                }
            }

            let b = chunk[i];
            match self.step(b, sink)? {
                Flow::Consumed => {
                    self.position.advance(b);
                    i += 1;
                }
                Flow::Reprocess => {}
            }
        }
        Ok(())
    }

    fn step(&mut self, b: u8, sink: &mut dyn EventSink) -> Result<Flow, Error> {
        match self.lex {
            Lex::Between => self.between(b, sink),
            Lex::Literal => match self.literal.step(b) {
                Step::NeedMore => Ok(Flow::Consumed),
                Step::Done(event) => {
                    self.lex = Lex::Between;
                    sink.event(event);
                    self.value_completed();
                    Ok(Flow::Consumed)
                }
                Step::Reject => Err(self.syntax(SyntaxErrorKind::InvalidLiteral)),
            },
            Lex::Number(state) => self.number(state, b, sink),
            Lex::String(state) => self.string(state, b, sink),
            Lex::Comment(state) => self.comment(state, b),
        }
    }

    // ---- Structure ----

    fn between(&mut self, b: u8, sink: &mut dyn EventSink) -> Result<Flow, Error> {
        match b {
            b' ' | b'\t' | b'\n' | b'\r' => Ok(Flow::Consumed),
            b'/' if self.allow_comments => {
                self.lex = Lex::Comment(Comment::Slash);
                Ok(Flow::Consumed)
            }
            _ => self.token(b, sink),
        }
    }

    fn token(&mut self, b: u8, sink: &mut dyn EventSink) -> Result<Flow, Error> {
        match self.parse {
            ParseState::Start | ParseState::BeforeValue | ParseState::ItemAfterComma => {
                self.value(b, sink)
            }
            ParseState::End if self.multiple_values => self.value(b, sink),
            ParseState::End => Err(self.syntax(SyntaxErrorKind::TrailingData)),
            ParseState::ArrayOpen if b == b']' => Ok(self.close(Container::Array, sink)),
            ParseState::ArrayOpen => self.value(b, sink),
            ParseState::MapOpen | ParseState::KeyAfterComma => match b {
                b'"' => {
                    self.begin_string(true);
                    Ok(Flow::Consumed)
                }
                b'}' if self.parse == ParseState::MapOpen => Ok(self.close(Container::Map, sink)),
                _ => Err(self.unexpected(b)),
            },
            ParseState::AfterKey if b == b':' => {
                self.parse = ParseState::BeforeValue;
                Ok(Flow::Consumed)
            }
            ParseState::AfterKey => Err(self.unexpected(b)),
            ParseState::AfterValue => match (b, self.containers.last().copied()) {
                (b',', Some(Container::Map)) => {
                    self.parse = ParseState::KeyAfterComma;
                    Ok(Flow::Consumed)
                }
                (b',', Some(Container::Array)) => {
                    self.parse = ParseState::ItemAfterComma;
                    Ok(Flow::Consumed)
                }
                (b'}', Some(Container::Map)) => Ok(self.close(Container::Map, sink)),
                (b']', Some(Container::Array)) => Ok(self.close(Container::Array, sink)),
                _ => Err(self.unexpected(b)),
            },
        }
    }

    /// First byte of a value.
    fn value(&mut self, b: u8, sink: &mut dyn EventSink) -> Result<Flow, Error> {
        match b {
            b'{' => {
                sink.start_map();
                self.containers.push(Container::Map);
                self.parse = ParseState::MapOpen;
            }
            b'[' => {
                sink.start_array();
                self.containers.push(Container::Array);
                self.parse = ParseState::ArrayOpen;
            }
            b'"' => self.begin_string(false),
            b'-' => self.begin_number(b, Num::Minus),
            b'0' => self.begin_number(b, Num::Zero),
            b'1'..=b'9' => self.begin_number(b, Num::Integer),
            _ => match LiteralMatcher::start(b) {
                Some(matcher) => {
                    self.literal = matcher;
                    self.lex = Lex::Literal;
                }
                None => return Err(self.unexpected(b)),
            },
        }
        Ok(Flow::Consumed)
    }

    fn close(&mut self, container: Container, sink: &mut dyn EventSink) -> Flow {
        self.containers.pop();
        match container {
            Container::Map => sink.end_map(),
            Container::Array => sink.end_array(),
        }
        self.value_completed();
        Flow::Consumed
    }

    fn value_completed(&mut self) {
        if self.containers.is_empty() {
            self.parse = ParseState::End;
            self.values += 1;
            trace!(
                "top-level value #{} complete at byte {}",
                self.values, self.position.offset
            );
        } else {
            self.parse = ParseState::AfterValue;
        }
    }

    // ---- Numbers ----

    fn begin_number(&mut self, b: u8, state: Num) {
        self.lexeme.clear();
        self.lexeme.push(b);
        self.lex = Lex::Number(state);
    }

    fn number(&mut self, state: Num, b: u8, sink: &mut dyn EventSink) -> Result<Flow, Error> {
        let next = match (state, b) {
            (Num::Minus, b'0') => Num::Zero,
            (Num::Minus | Num::Integer, b'0'..=b'9') => Num::Integer,
            (Num::Zero | Num::Integer, b'.') => Num::Point,
            (Num::Zero | Num::Integer | Num::Fraction, b'e' | b'E') => Num::Exponent,
            (Num::Point | Num::Fraction, b'0'..=b'9') => Num::Fraction,
            (Num::Exponent, b'+' | b'-') => Num::ExponentSign,
            (Num::Exponent | Num::ExponentSign | Num::ExponentDigits, b'0'..=b'9') => {
                Num::ExponentDigits
            }
            _ if state.is_complete() => {
                self.complete_number(sink)?;
                return Ok(Flow::Reprocess);
            }
            _ => return Err(self.syntax(SyntaxErrorKind::InvalidNumber)),
        };
        self.lexeme.push(b);
        self.lex = Lex::Number(next);
        Ok(Flow::Consumed)
    }

    fn complete_number(&mut self, sink: &mut dyn EventSink) -> Result<(), Error> {
        let number = std::str::from_utf8(&self.lexeme)
            .map_err(|_| SyntaxErrorKind::InvalidNumber)
            .and_then(|lexeme| Number::from_lexeme(lexeme, self.exact_numbers))
            .map_err(|kind| self.syntax(kind))?;
        self.lexeme.clear();
        self.lex = Lex::Between;
        sink.number(number);
        self.value_completed();
        Ok(())
    }

    // ---- Strings ----

    fn begin_string(&mut self, key: bool) {
        self.lexeme.clear();
        self.key = key;
        self.lex = Lex::String(Str::Plain);
    }

    fn push_char(&mut self, c: char) {
        let mut buf = [0; 4];
        self.lexeme
            .extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
    }

    fn string(&mut self, state: Str, b: u8, sink: &mut dyn EventSink) -> Result<Flow, Error> {
        match state {
            Str::Plain => match b {
                b'"' => self.complete_string(sink)?,
                b'\\' => self.lex = Lex::String(Str::Escape),
                0x00..=0x1F => return Err(self.syntax(SyntaxErrorKind::ControlCharacter(b))),
                _ => self.lexeme.push(b),
            },
            Str::Escape => {
                let unescaped = match b {
                    b'"' | b'\\' | b'/' => b,
                    b'b' => 0x08,
                    b'f' => 0x0C,
                    b'n' => b'\n',
                    b'r' => b'\r',
                    b't' => b'\t',
                    b'u' => {
                        self.escape.reset();
                        self.lex = Lex::String(Str::Unicode);
                        return Ok(Flow::Consumed);
                    }
                    _ => return Err(self.syntax(SyntaxErrorKind::InvalidEscape(b))),
                };
                self.lexeme.push(unescaped);
                self.lex = Lex::String(Str::Plain);
            }
            Str::Unicode => {
                let unit = self.escape.feed(b).map_err(|kind| self.syntax(kind))?;
                if let Some(unit) = unit {
                    if is_high_surrogate(unit) {
                        self.high_surrogate = unit;
                        self.lex = Lex::String(Str::PairBackslash);
                    } else {
                        let c = char::from_u32(unit.into()).ok_or_else(|| {
                            self.syntax(SyntaxErrorKind::LoneSurrogate(unit.into()))
                        })?;
                        self.push_char(c);
                        self.lex = Lex::String(Str::Plain);
                    }
                }
            }
            Str::PairBackslash if b == b'\\' => self.lex = Lex::String(Str::PairU),
            Str::PairU if b == b'u' => {
                self.escape.reset();
                self.lex = Lex::String(Str::PairUnicode);
            }
            Str::PairBackslash | Str::PairU => return Err(self.lone_high_surrogate()),
            Str::PairUnicode => {
                let unit = self.escape.feed(b).map_err(|kind| self.syntax(kind))?;
                if let Some(low) = unit {
                    let c = Some(low)
                        .filter(|low| is_low_surrogate(*low))
                        .and_then(|low| combine_surrogates(self.high_surrogate, low))
                        .ok_or_else(|| self.lone_high_surrogate())?;
                    self.push_char(c);
                    self.lex = Lex::String(Str::Plain);
                }
            }
        }
        Ok(Flow::Consumed)
    }

    fn lone_high_surrogate(&self) -> Error {
        self.syntax(SyntaxErrorKind::LoneSurrogate(self.high_surrogate.into()))
    }

    fn complete_string(&mut self, sink: &mut dyn EventSink) -> Result<(), Error> {
        let text = String::from_utf8(std::mem::take(&mut self.lexeme))
            .map_err(|_| self.syntax(SyntaxErrorKind::InvalidUtf8))?;
        self.lex = Lex::Between;
        if self.key {
            sink.map_key(text);
            self.parse = ParseState::AfterKey;
        } else {
            sink.string(text);
            self.value_completed();
        }
        Ok(())
    }

    // ---- Comments ----

    fn comment(&mut self, state: Comment, b: u8) -> Result<Flow, Error> {
        self.lex = match (state, b) {
            (Comment::Slash, b'*') => Lex::Comment(Comment::Block),
            (Comment::Slash, b'/') => Lex::Comment(Comment::Line),
            (Comment::Slash, _) => return Err(self.unexpected(b)),
            (Comment::Block | Comment::BlockStar, b'*') => Lex::Comment(Comment::BlockStar),
            (Comment::BlockStar, b'/') => Lex::Between,
            (Comment::Block | Comment::BlockStar, _) => Lex::Comment(Comment::Block),
            (Comment::Line, b'\n') => Lex::Between,
            (Comment::Line, _) => Lex::Comment(Comment::Line),
        };
        Ok(Flow::Consumed)
    }

    // ---- End of input ----

    fn end_of_input(&mut self, sink: &mut dyn EventSink) -> Result<(), Error> {
        match self.lex {
            Lex::Between | Lex::Comment(Comment::Line) => {}
            Lex::Number(state) if state.is_complete() => self.complete_number(sink)?,
            Lex::Number(_) => return Err(self.incomplete("unterminated number")),
            Lex::Literal => return Err(self.incomplete("unterminated literal")),
            Lex::String(_) => return Err(self.incomplete("unterminated string")),
            Lex::Comment(_) => return Err(self.incomplete("unterminated comment")),
        }
        self.lex = Lex::Between;
        match (self.parse, self.containers.last().copied()) {
            (ParseState::End, _) => Ok(()),
            (_, Some(Container::Map)) => Err(self.incomplete("unclosed object")),
            (_, Some(Container::Array)) => Err(self.incomplete("unclosed array")),
            (_, None) => Err(self.incomplete("no JSON value")),
        }
    }
}

impl Engine for Tokenizer {
    fn feed(&mut self, chunk: &[u8], sink: &mut dyn EventSink) -> Result<(), Error> {
        if let Some(err) = &self.failed {
            return Err(err.replay());
        }
        if chunk.is_empty() {
            return Ok(());
        }
        if self.finished {
            let err = self.syntax(SyntaxErrorKind::AfterClose);
            return Err(self.fail(err));
        }
        self.run(chunk, sink).map_err(|err| self.fail(err))
    }

    fn finish(&mut self, sink: &mut dyn EventSink) -> Result<(), Error> {
        if let Some(err) = &self.failed {
            return Err(err.replay());
        }
        if self.finished {
            return Ok(());
        }
        self.end_of_input(sink).map_err(|err| self.fail(err))?;
        self.finished = true;
        trace!(
            "software tokenizer finished after {} bytes, {} value(s)",
            self.position.offset, self.values
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "software"
    }
}

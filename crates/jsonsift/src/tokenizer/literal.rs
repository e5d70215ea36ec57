use crate::event::Event;

/// Outcome of feeding one more byte into the literal matcher.
#[derive(Debug, PartialEq)]
pub(crate) enum Step {
    /// Byte matched, but the literal is not finished yet.
    NeedMore,
    /// Byte matched and completed the literal.
    Done(Event),
    /// Byte did not match.
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Literal {
    Null,
    True,
    False,
}

/// Matches `null`, `true` and `false` one byte at a time, so a literal may be
/// split across any number of chunks.
///
/// `None` while no literal is in flight, otherwise the bytes still expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct LiteralMatcher(Option<(&'static [u8], Literal)>);

impl LiteralMatcher {
    /// Start matching after the first byte (`n`, `t` or `f`).
    pub(crate) fn start(first: u8) -> Option<Self> {
        let expected = match first {
            b'n' => (&b"ull"[..], Literal::Null),
            b't' => (&b"rue"[..], Literal::True),
            b'f' => (&b"alse"[..], Literal::False),
            _ => return None,
        };
        Some(Self(Some(expected)))
    }

    pub(crate) fn step(&mut self, b: u8) -> Step {
        let Some((bytes, kind)) = self.0.take() else {
            return Step::Reject;
        };
        match bytes.split_first() {
            Some((expected, rest)) if *expected == b => {
                if rest.is_empty() {
                    Step::Done(match kind {
                        Literal::Null => Event::Null,
                        Literal::True => Event::Boolean(true),
                        Literal::False => Event::Boolean(false),
                    })
                } else {
                    self.0 = Some((rest, kind));
                    Step::NeedMore
                }
            }
            _ => {
                self.0 = Some((bytes, kind));
                Step::Reject
            }
        }
    }
}

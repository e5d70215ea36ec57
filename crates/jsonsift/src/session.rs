//! The state shared by every execution discipline.
//!
//! A [`Session`] owns one engine, one stage and the queue of events the
//! engine has produced but the stage has not consumed yet. The disciplines
//! only differ in who supplies chunks: a blocking reader, the caller, or an
//! async read loop.

use std::collections::VecDeque;

use log::{debug, trace};

use crate::{backend::Engine, error::Error, event::Event, stage::Stage};

/// Outcome of [`Session::step`].
pub(crate) enum Step<T> {
    /// An output, or the error that ended the session.
    Ready(Result<T, Error>),
    /// Every buffered event is consumed; feed more input or finish.
    NeedInput,
    /// The session has ended and reported everything it had.
    Done,
}

pub(crate) struct Session<S, E> {
    engine: E,
    stage: S,
    queue: VecDeque<Event>,
    error: Option<Error>,
    finished: bool,
    done: bool,
}

impl<S: Stage<Event>, E: Engine> Session<S, E> {
    pub(crate) fn new(engine: E, stage: S) -> Self {
        debug!("starting session on the {} engine", engine.name());
        Self {
            engine,
            stage,
            queue: VecDeque::new(),
            error: None,
            finished: false,
            done: false,
        }
    }

    pub(crate) fn engine(&self) -> &E {
        &self.engine
    }

    /// `true` once end of input was signalled or the engine failed.
    pub(crate) fn is_closed(&self) -> bool {
        self.finished || self.error.is_some() || self.done
    }

    pub(crate) fn feed(&mut self, chunk: &[u8]) {
        if self.is_closed() || chunk.is_empty() {
            return;
        }
        trace!("feeding {} byte(s)", chunk.len());
        if let Err(err) = self.engine.feed(chunk, &mut self.queue) {
            debug!("{} engine failed: {err}", self.engine.name());
            self.error = Some(err);
        }
    }

    pub(crate) fn finish(&mut self) {
        if self.is_closed() {
            return;
        }
        self.finished = true;
        debug!("end of input");
        if let Err(err) = self.engine.finish(&mut self.queue) {
            debug!("{} engine failed at end of input: {err}", self.engine.name());
            self.error = Some(err);
        }
    }

    /// Record a failure of the input source.
    pub(crate) fn fail(&mut self, err: Error) {
        if !self.done && self.error.is_none() {
            debug!("input source failed: {err}");
            self.error = Some(err);
        }
    }

    /// Advance the stage over buffered events.
    ///
    /// Events the engine produced before a failure are still delivered; the
    /// failure is reported once they run out, after which the session is
    /// done.
    pub(crate) fn step(&mut self) -> Step<S::Output> {
        if self.done {
            return Step::Done;
        }
        while let Some(event) = self.queue.pop_front() {
            match self.stage.process(event) {
                Ok(Some(output)) => return Step::Ready(Ok(output)),
                Ok(None) => {}
                Err(err) => {
                    debug!("event pipeline failed: {err}");
                    self.queue.clear();
                    self.done = true;
                    return Step::Ready(Err(err));
                }
            }
        }
        if let Some(err) = self.error.take() {
            self.done = true;
            return Step::Ready(Err(err));
        }
        if self.finished {
            self.done = true;
            debug!("session complete");
            return Step::Done;
        }
        Step::NeedInput
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ParseOptions, stage::Passthrough, tokenizer::Tokenizer};

    fn session() -> Session<Passthrough, Tokenizer> {
        Session::new(Tokenizer::new(&ParseOptions::default()), Passthrough)
    }

    #[test]
    fn needs_input_until_finished() {
        let mut s = session();
        assert!(matches!(s.step(), Step::NeedInput));
        s.feed(b"[tr");
        assert!(matches!(s.step(), Step::Ready(Ok(Event::StartArray))));
        assert!(matches!(s.step(), Step::NeedInput));
        s.feed(b"ue]");
        assert!(matches!(s.step(), Step::Ready(Ok(Event::Boolean(true)))));
        assert!(matches!(s.step(), Step::Ready(Ok(Event::EndArray))));
        s.finish();
        assert!(matches!(s.step(), Step::Done));
        assert!(matches!(s.step(), Step::Done));
    }

    #[test]
    fn events_before_a_failure_are_delivered() {
        let mut s = session();
        s.feed(b"[null, ?");
        assert!(matches!(s.step(), Step::Ready(Ok(Event::StartArray))));
        assert!(matches!(s.step(), Step::Ready(Ok(Event::Null))));
        let Step::Ready(Err(err)) = s.step() else {
            panic!("expected the syntax error");
        };
        assert!(err.is_syntax());
        assert!(matches!(s.step(), Step::Done));
        s.feed(b"]");
        assert!(matches!(s.step(), Step::Done));
    }

    #[test]
    fn truncated_input_is_incomplete() {
        let mut s = session();
        s.feed(b"{\"a\":");
        while let Step::Ready(Ok(_)) = s.step() {}
        s.finish();
        let Step::Ready(Err(err)) = s.step() else {
            panic!("expected an incompleteness error");
        };
        assert!(err.is_incomplete());
    }
}

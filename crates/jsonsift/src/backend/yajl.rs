//! libyajl 2.x behind the [`Engine`] contract.
//!
//! yajl reports events through a table of C callbacks. Ours append to an
//! event buffer owned by the engine; after every call into yajl the buffer is
//! drained into the caller's sink, so no callback ever reaches Rust code
//! outside this module.

use std::{
    ffi::{CStr, c_char, c_double, c_int, c_longlong, c_uchar, c_void},
    ptr, slice,
};

use bstr::ByteSlice;
use log::trace;

use super::{Engine, EventSink};
use crate::{
    error::{Error, IncompleteError, SyntaxError, SyntaxErrorKind},
    event::Event,
    number::Number,
    options::ParseOptions,
};

#[repr(C)]
struct YajlHandle {
    _private: [u8; 0],
}

type Status = c_int;
const STATUS_OK: Status = 0;
const STATUS_CLIENT_CANCELED: Status = 1;

const OPT_ALLOW_COMMENTS: c_int = 0x01;
const OPT_ALLOW_MULTIPLE_VALUES: c_int = 0x08;

type EmptyCb = unsafe extern "C" fn(*mut c_void) -> c_int;
type BoolCb = unsafe extern "C" fn(*mut c_void, c_int) -> c_int;
type IntegerCb = unsafe extern "C" fn(*mut c_void, c_longlong) -> c_int;
type DoubleCb = unsafe extern "C" fn(*mut c_void, c_double) -> c_int;
type NumberCb = unsafe extern "C" fn(*mut c_void, *const c_char, usize) -> c_int;
type StringCb = unsafe extern "C" fn(*mut c_void, *const c_uchar, usize) -> c_int;

/// Mirrors `yajl_callbacks`; field order is part of the ABI.
#[repr(C)]
struct Callbacks {
    null: Option<EmptyCb>,
    boolean: Option<BoolCb>,
    integer: Option<IntegerCb>,
    double: Option<DoubleCb>,
    number: Option<NumberCb>,
    string: Option<StringCb>,
    start_map: Option<EmptyCb>,
    map_key: Option<StringCb>,
    end_map: Option<EmptyCb>,
    start_array: Option<EmptyCb>,
    end_array: Option<EmptyCb>,
}

#[link(name = "yajl")]
unsafe extern "C" {
    fn yajl_alloc(
        callbacks: *const Callbacks,
        alloc_funcs: *const c_void,
        ctx: *mut c_void,
    ) -> *mut YajlHandle;
    fn yajl_config(handle: *mut YajlHandle, option: c_int, ...) -> c_int;
    fn yajl_parse(handle: *mut YajlHandle, text: *const c_uchar, len: usize) -> Status;
    fn yajl_complete_parse(handle: *mut YajlHandle) -> Status;
    fn yajl_get_error(
        handle: *mut YajlHandle,
        verbose: c_int,
        text: *const c_uchar,
        len: usize,
    ) -> *mut c_uchar;
    fn yajl_free_error(handle: *mut YajlHandle, error: *mut c_uchar);
    fn yajl_free(handle: *mut YajlHandle);
}

// yajl keeps the pointer to this table for the lifetime of the handle.
static CALLBACKS: Callbacks = Callbacks {
    null: Some(on_null),
    boolean: Some(on_boolean),
    // Unused: yajl reports every number through `number` when it is set.
    integer: None,
    double: None,
    number: Some(on_number),
    string: Some(on_string),
    start_map: Some(on_start_map),
    map_key: Some(on_map_key),
    end_map: Some(on_end_map),
    start_array: Some(on_start_array),
    end_array: Some(on_end_array),
};

/// Callback context. Heap-allocated so its address survives moves of the
/// engine.
struct CallbackState {
    events: Vec<Event>,
    exact: bool,
    /// Set by a callback that rejected its input; yajl then returns
    /// `yajl_status_client_canceled`.
    error: Option<SyntaxErrorKind>,
}

/// Recover the callback context.
///
/// # Safety
///
/// `ctx` must be the `CallbackState` pointer handed to `yajl_alloc`, with no
/// other live reference to it.
unsafe fn state<'a>(ctx: *mut c_void) -> &'a mut CallbackState {
    // SAFETY: guaranteed by the caller.
    unsafe { &mut *ctx.cast::<CallbackState>() }
}

/// Borrow a `(pointer, length)` pair from yajl.
///
/// # Safety
///
/// `ptr` must be valid for `len` bytes for the duration of the callback.
unsafe fn bytes<'a>(ptr: *const c_uchar, len: usize) -> &'a [u8] {
    if len == 0 {
        return &[];
    }
    // SAFETY: guaranteed by the caller.
    unsafe { slice::from_raw_parts(ptr, len) }
}

/// # Safety
///
/// `ctx` must be the registered context and no other reference to the state
/// may be live. yajl only calls back from inside `yajl_parse` and
/// `yajl_complete_parse`, where the engine holds none.
unsafe fn push(ctx: *mut c_void, event: Event) -> c_int {
    // SAFETY: guaranteed by the caller.
    unsafe { state(ctx) }.events.push(event);
    1
}

/// # Safety
///
/// As for [`push`].
unsafe fn reject(ctx: *mut c_void, kind: SyntaxErrorKind) -> c_int {
    // SAFETY: guaranteed by the caller.
    unsafe { state(ctx) }.error = Some(kind);
    0
}

/// # Safety
///
/// As for [`push`] and [`bytes`].
unsafe fn text(ctx: *mut c_void, ptr: *const c_uchar, len: usize) -> Result<String, c_int> {
    // SAFETY: guaranteed by the caller.
    let raw = unsafe { bytes(ptr, len) };
    match String::from_utf8(raw.to_vec()) {
        Ok(s) => Ok(s),
        // SAFETY: guaranteed by the caller.
        Err(_) => Err(unsafe { reject(ctx, SyntaxErrorKind::InvalidUtf8) }),
    }
}

// SAFETY (all callbacks): yajl passes back the context registered in
// `YajlEngine::new` and buffers valid for the stated length.

unsafe extern "C" fn on_null(ctx: *mut c_void) -> c_int {
    unsafe { push(ctx, Event::Null) }
}

unsafe extern "C" fn on_boolean(ctx: *mut c_void, value: c_int) -> c_int {
    unsafe { push(ctx, Event::Boolean(value != 0)) }
}

unsafe extern "C" fn on_number(ctx: *mut c_void, ptr: *const c_char, len: usize) -> c_int {
    let raw = unsafe { bytes(ptr.cast(), len) };
    let exact = unsafe { state(ctx) }.exact;
    let parsed = raw
        .to_str()
        .map_err(|_| SyntaxErrorKind::InvalidNumber)
        .and_then(|lexeme| Number::from_lexeme(lexeme, exact));
    match parsed {
        Ok(n) => unsafe { push(ctx, Event::Number(n)) },
        Err(kind) => unsafe { reject(ctx, kind) },
    }
}

unsafe extern "C" fn on_string(ctx: *mut c_void, ptr: *const c_uchar, len: usize) -> c_int {
    match unsafe { text(ctx, ptr, len) } {
        Ok(s) => unsafe { push(ctx, Event::String(s)) },
        Err(code) => code,
    }
}

unsafe extern "C" fn on_map_key(ctx: *mut c_void, ptr: *const c_uchar, len: usize) -> c_int {
    match unsafe { text(ctx, ptr, len) } {
        Ok(s) => unsafe { push(ctx, Event::MapKey(s)) },
        Err(code) => code,
    }
}

unsafe extern "C" fn on_start_map(ctx: *mut c_void) -> c_int {
    unsafe { push(ctx, Event::StartMap) }
}

unsafe extern "C" fn on_end_map(ctx: *mut c_void) -> c_int {
    unsafe { push(ctx, Event::EndMap) }
}

unsafe extern "C" fn on_start_array(ctx: *mut c_void) -> c_int {
    unsafe { push(ctx, Event::StartArray) }
}

unsafe extern "C" fn on_end_array(ctx: *mut c_void) -> c_int {
    unsafe { push(ctx, Event::EndArray) }
}

/// Native engine backed by libyajl 2.x.
///
/// Error messages come from yajl and carry no [`Position`](crate::Position).
pub struct YajlEngine {
    handle: *mut YajlHandle,
    /// From `Box::into_raw`, released in `Drop` after the handle.
    state: *mut CallbackState,
    failed: Option<Error>,
    finished: bool,
}

// SAFETY: the handle is owned exclusively by this engine and only touched
// through `&mut self`; yajl handles carry no thread affinity.
unsafe impl Send for YajlEngine {}

impl YajlEngine {
    #[must_use]
    pub fn new(options: &ParseOptions) -> Self {
        let state = Box::into_raw(Box::new(CallbackState {
            events: Vec::new(),
            exact: options.use_exact_numbers,
            error: None,
        }));
        // SAFETY: `CALLBACKS` is static and `state` outlives the handle.
        let handle = unsafe { yajl_alloc(&raw const CALLBACKS, ptr::null(), state.cast()) };
        let failed = if handle.is_null() {
            Some(engine_error("yajl_alloc failed".to_owned()))
        } else {
            trace!("allocated yajl handle {handle:p}");
            let on: c_int = 1;
            // SAFETY: `handle` is a live handle fresh from `yajl_alloc`.
            unsafe {
                if options.allow_comments {
                    yajl_config(handle, OPT_ALLOW_COMMENTS, on);
                }
                if options.multiple_values {
                    yajl_config(handle, OPT_ALLOW_MULTIPLE_VALUES, on);
                }
            }
            None
        };
        Self {
            handle,
            state,
            failed,
            finished: false,
        }
    }

    fn state(&mut self) -> &mut CallbackState {
        // SAFETY: `state` is live until drop, and no callback can run while
        // we hold `&mut self` outside a yajl call.
        unsafe { &mut *self.state }
    }

    fn flush(&mut self, sink: &mut dyn EventSink) {
        for event in self.state().events.drain(..) {
            sink.event(event);
        }
    }

    /// yajl's description of the last failure.
    fn message(&self) -> String {
        // SAFETY: `handle` is live; non-verbose messages never read the
        // input text, so passing none is allowed.
        let raw = unsafe { yajl_get_error(self.handle, 0, ptr::null(), 0) };
        if raw.is_null() {
            return "unknown yajl error".to_owned();
        }
        // SAFETY: yajl returns a NUL-terminated string we own until it is
        // handed back to `yajl_free_error`.
        let msg = unsafe { CStr::from_ptr(raw.cast::<c_char>()) }
            .to_bytes()
            .to_str_lossy()
            .trim()
            .to_owned();
        // SAFETY: `raw` came from `yajl_get_error` on this handle.
        unsafe { yajl_free_error(self.handle, raw) };
        msg
    }

    fn check(&mut self, status: Status, at_end: bool) -> Result<(), Error> {
        match status {
            STATUS_OK => Ok(()),
            STATUS_CLIENT_CANCELED => {
                let kind = self
                    .state()
                    .error
                    .take()
                    .unwrap_or_else(|| SyntaxErrorKind::Engine("parse canceled".to_owned()));
                Err(SyntaxError::new(kind, None).into())
            }
            _ => {
                let msg = self.message();
                if at_end && msg.contains("premature EOF") {
                    Err(IncompleteError::new("premature EOF", None).into())
                } else {
                    Err(engine_error(msg))
                }
            }
        }
    }

    fn fail(&mut self, err: Error) -> Error {
        self.failed = Some(err.replay());
        err
    }
}

fn engine_error(msg: String) -> Error {
    SyntaxError::new(SyntaxErrorKind::Engine(msg), None).into()
}

impl Engine for YajlEngine {
    fn feed(&mut self, chunk: &[u8], sink: &mut dyn EventSink) -> Result<(), Error> {
        if let Some(err) = &self.failed {
            return Err(err.replay());
        }
        if chunk.is_empty() {
            return Ok(());
        }
        if self.finished {
            let err = SyntaxError::new(SyntaxErrorKind::AfterClose, None).into();
            return Err(self.fail(err));
        }
        // SAFETY: `handle` is live and `chunk` is valid for its length.
        let status = unsafe { yajl_parse(self.handle, chunk.as_ptr(), chunk.len()) };
        self.flush(sink);
        self.check(status, false).map_err(|err| self.fail(err))
    }

    fn finish(&mut self, sink: &mut dyn EventSink) -> Result<(), Error> {
        if let Some(err) = &self.failed {
            return Err(err.replay());
        }
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        // SAFETY: `handle` is live.
        let status = unsafe { yajl_complete_parse(self.handle) };
        self.flush(sink);
        self.check(status, true).map_err(|err| self.fail(err))
    }

    fn name(&self) -> &'static str {
        "yajl2"
    }
}

impl Drop for YajlEngine {
    fn drop(&mut self) {
        if !self.handle.is_null() {
            trace!("freeing yajl handle {:p}", self.handle);
            // SAFETY: the handle came from `yajl_alloc` and is freed once.
            unsafe { yajl_free(self.handle) };
        }
        // SAFETY: from `Box::into_raw` in `new`; the handle that referenced
        // it is gone.
        drop(unsafe { Box::from_raw(self.state) });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: &[u8], options: &ParseOptions) -> (Vec<Event>, Result<(), Error>) {
        let mut engine = YajlEngine::new(options);
        let mut events: Vec<Event> = Vec::new();
        let result = engine
            .feed(input, &mut events)
            .and_then(|()| engine.finish(&mut events));
        (events, result)
    }

    #[test]
    fn scenario_events() {
        let (events, result) = run(br#"{"a": 1, "b": [2, 3]}"#, &ParseOptions::default());
        result.unwrap();
        assert_eq!(events.len(), 9);
        assert_eq!(events[2], Event::Number(Number::Integer(1)));
    }

    #[test]
    fn truncation_is_incomplete() {
        let (_, result) = run(br#"{"a": [1"#, &ParseOptions::default());
        assert!(result.unwrap_err().is_incomplete());
    }

    #[test]
    fn garbage_is_syntax_error() {
        let (_, result) = run(b"[1, ?]", &ParseOptions::default());
        assert!(result.unwrap_err().is_syntax());
    }

    #[test]
    fn split_across_feeds() {
        let mut engine = YajlEngine::new(&ParseOptions::default());
        let mut events: Vec<Event> = Vec::new();
        for chunk in [&b"[\"h\xc3"[..], &b"\xa9\", 1."[..], &b"5]"[..]] {
            engine.feed(chunk, &mut events).unwrap();
        }
        engine.finish(&mut events).unwrap();
        assert_eq!(events[1], Event::String("h\u{e9}".into()));
    }
}

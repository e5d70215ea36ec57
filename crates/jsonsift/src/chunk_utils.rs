//! Helpers for splitting documents into chunks, used by tests, benchmarks and
//! the fuzzer to exercise chunk-boundary handling.
//!
//! Splits deliberately ignore UTF-8 boundaries: engines must cope with a
//! chunk ending inside a multi-byte character.

/// Split `payload` into `parts` chunks of approximately equal size.
///
/// # Panics
///
/// Panics if `parts` is zero.
#[must_use]
pub fn produce_chunks(payload: &[u8], parts: usize) -> Vec<&[u8]> {
    assert!(parts > 0);
    let chunk_size = payload.len().div_ceil(parts).max(1);
    payload.chunks(chunk_size).collect()
}

/// Split `payload` at the given cut points, reduced modulo the remaining
/// length so any sequence of numbers yields a valid partition. Every returned
/// chunk is non-empty.
#[must_use]
pub fn split_at_points<'a>(payload: &'a [u8], points: &[usize]) -> Vec<&'a [u8]> {
    let mut chunks = Vec::with_capacity(points.len() + 1);
    let mut rest = payload;
    for point in points {
        if rest.is_empty() {
            break;
        }
        let size = 1 + point % rest.len();
        let (head, tail) = rest.split_at(size);
        chunks.push(head);
        rest = tail;
    }
    if !rest.is_empty() {
        chunks.push(rest);
    }
    chunks
}

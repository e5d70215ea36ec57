use quickcheck::QuickCheck;

use super::{arbitrary::Doc, quickcheck_tests};
use crate::{ParseOptions, PrefixedEvent, chunk_utils::produce_chunks, parse, parse_push};

fn blocking(text: &[u8], options: &ParseOptions) -> Vec<PrefixedEvent> {
    parse(text, options).collect::<Result<_, _>>().unwrap()
}

fn pushed(text: &[u8], parts: usize, options: &ParseOptions) -> Vec<PrefixedEvent> {
    let mut pusher = parse_push(Vec::new(), options);
    for chunk in produce_chunks(text, parts) {
        pusher.feed(chunk).unwrap();
    }
    pusher.close().unwrap()
}

#[cfg(feature = "async")]
fn awaited(text: &[u8], options: &ParseOptions) -> Vec<PrefixedEvent> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    runtime
        .block_on(crate::parse_async(text, options).collect())
        .unwrap()
}

/// Property: blocking, push and async sessions produce the same annotated
/// stream.
#[test]
fn disciplines_agree_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: Doc, chunk_size: usize, parts: usize) -> bool {
        let options = ParseOptions {
            chunk_size: 1 + chunk_size % 32,
            ..ParseOptions::default()
        };
        let text = doc.text.as_bytes();
        let reference = blocking(text, &options);
        let push_ok = pushed(text, 1 + parts % 16, &options) == reference;
        #[cfg(feature = "async")]
        let async_ok = awaited(text, &options) == reference;
        #[cfg(not(feature = "async"))]
        let async_ok = true;
        push_ok && async_ok
    }

    QuickCheck::new()
        .tests(quickcheck_tests() / 10)
        .quickcheck(prop as fn(Doc, usize, usize) -> bool);
}

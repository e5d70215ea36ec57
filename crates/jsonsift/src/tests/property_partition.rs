use quickcheck::QuickCheck;

use super::{arbitrary::Doc, from_serde, quickcheck_tests};
use crate::{
    Event, EventKind, ParseOptions, Tokenizer, Value,
    backend::Engine,
    chunk_utils::split_at_points,
    items,
    prefix::Prefixer,
};

fn events_of(chunks: &[&[u8]]) -> Vec<Event> {
    let mut engine = Tokenizer::new(&ParseOptions::default());
    let mut events: Vec<Event> = Vec::new();
    for chunk in chunks {
        engine.feed(chunk, &mut events).unwrap();
    }
    engine.finish(&mut events).unwrap();
    events
}

/// Property: the event sequence never depends on where the input was split.
#[test]
fn partition_invariance_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: Doc, splits: Vec<usize>) -> bool {
        let whole = events_of(&[doc.text.as_bytes()]);
        let chunks = split_at_points(doc.text.as_bytes(), &splits);
        events_of(&chunks) == whole
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(Doc, Vec<usize>) -> bool);
}

/// Property: `items` at the root rebuilds exactly the generated value, which
/// `serde_json` agrees with.
#[test]
fn root_items_match_oracle_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: Doc, chunk_size: usize) -> bool {
        let options = ParseOptions {
            chunk_size: chunk_size % 64,
            ..ParseOptions::default()
        };
        let values: Vec<Value> = items(doc.text.as_bytes(), "", &options)
            .collect::<Result<_, _>>()
            .unwrap();
        let oracle: serde_json::Value = serde_json::from_str(&doc.text).unwrap();
        values.len() == 1 && values[0] == doc.value && values[0] == from_serde(&oracle)
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(Doc, usize) -> bool);
}

/// Property: opens and closes balance, and the annotator ends at the root.
#[test]
fn balanced_containers_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: Doc) -> bool {
        let events = events_of(&[doc.text.as_bytes()]);
        let count = |kind: EventKind| events.iter().filter(|e| e.kind() == kind).count();
        let mut prefixer = Prefixer::new();
        for event in events.iter().cloned() {
            prefixer.annotate(event).unwrap();
        }
        count(EventKind::StartMap) == count(EventKind::EndMap)
            && count(EventKind::StartArray) == count(EventKind::EndArray)
            && prefixer.depth() == 0
            && prefixer.path().is_empty()
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(Doc) -> bool);
}

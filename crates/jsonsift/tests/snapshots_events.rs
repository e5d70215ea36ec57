#![allow(missing_docs)]

use std::fmt::Write;

use jsonsift::{Event, ParseOptions, PrefixedEvent, parse, parse_push};

const STREAM: &str = r#"{"name": "sift", "tags": ["a", "b"], "size": {"w": 2, "h": 0.5}, "ok": true, "none": null}"#;

fn render(events: &[PrefixedEvent]) -> String {
    let mut out = String::new();
    for PrefixedEvent { path, event } in events {
        write!(out, "{path:?} {}", event.kind()).unwrap();
        match event {
            Event::MapKey(s) | Event::String(s) => write!(out, " {s:?}").unwrap(),
            Event::Number(n) => write!(out, " {n}").unwrap(),
            Event::Boolean(b) => write!(out, " {b}").unwrap(),
            _ => {}
        }
        out.push('\n');
    }
    out
}

#[test_log::test]
fn prefixed_events() {
    let events: Vec<PrefixedEvent> = parse(STREAM.as_bytes(), &ParseOptions::default())
        .collect::<Result<_, _>>()
        .unwrap();

    // Inline snapshots; run `cargo insta test` then `cargo insta review` to
    // update them.
    insta::assert_snapshot!(render(&events), @r#"
    "" start_map
    "" map_key "name"
    "name" string "sift"
    "" map_key "tags"
    "tags" start_array
    "tags.item" string "a"
    "tags.item" string "b"
    "tags" end_array
    "" map_key "size"
    "size" start_map
    "size" map_key "w"
    "size.w" number 2
    "size" map_key "h"
    "size.h" number 0.5
    "size" end_map
    "" map_key "ok"
    "ok" boolean true
    "" map_key "none"
    "none" null
    "" end_map
    "#);
}

#[test]
fn one_byte_pushes_render_identically() {
    let expected: Vec<PrefixedEvent> = parse(STREAM.as_bytes(), &ParseOptions::default())
        .collect::<Result<_, _>>()
        .unwrap();
    let mut pusher = parse_push(Vec::new(), &ParseOptions::default());
    for byte in STREAM.as_bytes().chunks(1) {
        pusher.feed(byte).unwrap();
    }
    let events = pusher.close().unwrap();
    assert_eq!(render(&events), render(&expected));
}

#[test]
fn escaped_keys_and_nested_arrays() {
    let text = r#"{"a.b": [[1], []], "ñ": "\t"}"#;
    let events: Vec<PrefixedEvent> = parse(text.as_bytes(), &ParseOptions::default())
        .collect::<Result<_, _>>()
        .unwrap();

    insta::assert_snapshot!(render(&events), @r#"
    "" start_map
    "" map_key "a.b"
    "a.b" start_array
    "a.b.item" start_array
    "a.b.item.item" number 1
    "a.b.item" end_array
    "a.b.item" start_array
    "a.b.item" end_array
    "a.b" end_array
    "" map_key "ñ"
    "ñ" string "\t"
    "" end_map
    "#);
}

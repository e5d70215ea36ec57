#![no_main]
use std::cell::RefCell;

use arbitrary::Arbitrary;
use jsonsift::{
    Error, ParseOptions, PrefixedEvent, chunk_utils::split_at_points, parse, parse_push,
};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use serde_json::{Map, Value};

const HEADER: usize = 5; // 1 flag byte + 4-byte split seed

thread_local! {
    static RNG: RefCell<SmallRng> = RefCell::new(SmallRng::from_os_rng());
}

static WS_TABLE: &[&[u8]] = &[b" ", b"\t", b"\n", b"\r", b"/* c */", b"// c\n"];

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed.is_multiple_of(10) {
        data[0] = with_rng(|rng| rng.next_u32() as u8 & 0x07);
        data[1..5].copy_from_slice(&with_rng(|rng| rng.next_u32().to_le_bytes()));

        let mut prefix = HEADER;
        while prefix < size {
            let limit = max_size - prefix;
            prefix += append_whitespace(&mut data[prefix..], limit);
            prefix += append_value(&mut data[prefix..], size, limit);
        }
        prefix
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

/// Append a few whitespace or comment tokens, never writing past `limit`.
fn append_whitespace(buf: &mut [u8], limit: usize) -> usize {
    with_rng(|rng| {
        if limit == 0 {
            return 0;
        }
        let mut written = 0;
        for _ in 0..rng.random_range(1..=limit.min(4)) {
            let w = WS_TABLE[rng.random_range(0..WS_TABLE.len())];
            if written + w.len() > limit {
                break;
            }
            buf[written..written + w.len()].copy_from_slice(w);
            written += w.len();
        }
        written
    })
}

fn append_value(data: &mut [u8], size: usize, limit: usize) -> usize {
    let value = loop {
        let s = with_rng(|rng| rng.random_range(size / 2..size * 2 + 1).min(limit));
        let bytes: Vec<u8> = with_rng(|rng| (0..s).map(|_| rng.random::<u8>()).collect());
        if let Ok(value) = ArbitraryValue::arbitrary(&mut arbitrary::Unstructured::new(&bytes)) {
            break value;
        }
    };

    let serialized = serde_json::to_vec(&value.0).expect("serializing a generated value");
    let len = serialized.len().min(limit);
    data[..len].copy_from_slice(&serialized[..len]);
    len
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

#[derive(Debug)]
struct ArbitraryValue(Value);

impl<'a> Arbitrary<'a> for ArbitraryValue {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        let value = match u.choose_index(21)? {
            0 => Value::Null,
            1 => Value::Bool(u.arbitrary()?),
            2 => {
                let n: f64 = u.arbitrary()?;
                Value::Number(
                    serde_json::Number::from_f64(n).ok_or(arbitrary::Error::IncorrectFormat)?,
                )
            }
            3 | 4 => Value::Number(i64::arbitrary(u)?.into()),
            5..=10 => Value::String(u.arbitrary()?),
            11..=15 => {
                let elems: Vec<ArbitraryValue> = u.arbitrary()?;
                Value::Array(elems.into_iter().map(|v| v.0).collect())
            }
            _ => {
                let m: Vec<(String, ArbitraryValue)> = u.arbitrary()?;
                Value::Object(Map::from_iter(m.into_iter().map(|(k, v)| (k, v.0))))
            }
        };
        Ok(ArbitraryValue(value))
    }
}

/// Events produced before the first error, plus that error's category.
type Run = (Vec<PrefixedEvent>, Option<(bool, bool)>);

fn category(err: &Error) -> (bool, bool) {
    (err.is_syntax(), err.is_incomplete())
}

fn whole(data: &[u8], options: &ParseOptions) -> Run {
    let mut events = Vec::new();
    for result in parse(data, options) {
        match result {
            Ok(event) => events.push(event),
            Err(err) => return (events, Some(category(&err))),
        }
    }
    (events, None)
}

fn pushed(data: &[u8], points: &[usize], options: &ParseOptions) -> Run {
    let mut pusher = parse_push(Vec::new(), options);
    for chunk in split_at_points(data, points) {
        if let Err(err) = pusher.feed(chunk) {
            return (std::mem::take(pusher.target_mut()), Some(category(&err)));
        }
    }
    if let Err(err) = pusher.feed(&[]) {
        return (std::mem::take(pusher.target_mut()), Some(category(&err)));
    }
    (std::mem::take(pusher.target_mut()), None)
}

fn chunking(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }
    let flags = data[0];
    let seed = u32::from_le_bytes([data[1], data[2], data[3], data[4]]) as usize;
    let data = &data[HEADER..];

    let options = ParseOptions {
        multiple_values: flags & 1 != 0,
        allow_comments: flags & 2 != 0,
        use_exact_numbers: flags & 4 == 0,
        chunk_size: 1 + seed % 97,
        ..ParseOptions::default()
    };
    let points: Vec<usize> = (0..data.len()).map(|i| seed.rotate_left(i as u32)).collect();

    assert_eq!(whole(data, &options), pushed(data, &points, &options));
}

fuzz_target!(|data: &[u8]| chunking(data));

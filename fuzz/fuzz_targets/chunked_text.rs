#![no_main]

use libfuzzer_sys::fuzz_target;

use concise_rules::{ArrayType, ErrorCode, EventReceiver, NullReceiver, Rules};

// Splitting a string payload at any point must not change whether it is accepted.
fuzz_target!(|data: &[u8]| {
    let Some((&split, text)) = data.split_first() else {
        return;
    };
    let split = usize::from(split).min(text.len());
    let (head, tail) = text.split_at(split);

    let mut whole = Rules::with_default_limits(NullReceiver);
    whole.on_version(1).unwrap();
    let one = whole.on_array(ArrayType::String, text.len() as u64, text);

    let mut parts = Rules::with_default_limits(NullReceiver);
    parts.on_version(1).unwrap();
    let two = parts
        .on_begin_array(ArrayType::String)
        .and_then(|()| parts.on_array_chunk(head.len() as u64, true))
        .and_then(|()| {
            if head.is_empty() {
                Ok(())
            } else {
                parts.on_array_data(head)
            }
        })
        .and_then(|()| parts.on_array_chunk(tail.len() as u64, false))
        .and_then(|()| {
            if tail.is_empty() {
                Ok(())
            } else {
                parts.on_array_data(tail)
            }
        });

    assert_eq!(one.is_ok(), two.is_ok());
    if let (Err(a), Err(b)) = (one, two) {
        assert_eq!(a.code, ErrorCode::InvalidUTF8);
        assert_eq!(b.code, ErrorCode::InvalidUTF8);
    }
});

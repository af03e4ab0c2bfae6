#![no_main]

use libfuzzer_sys::fuzz_target;

use concise_rules::{ArrayType, EventReceiver, Limits, NullReceiver, Rules};

const ARRAY_TYPES: [ArrayType; 6] = [
    ArrayType::String,
    ArrayType::Uri,
    ArrayType::Uint8,
    ArrayType::Uint32,
    ArrayType::Bit,
    ArrayType::CustomText,
];

fn fuzz_limits() -> Limits {
    Limits {
        max_container_depth: 64,
        max_object_count: 1 << 16,
        max_string_len: 1 << 12,
        max_array_len: 1 << 12,
        max_uri_len: 256,
        max_id_len: 64,
        max_reference_count: 64,
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(mut rules) = Rules::new(fuzz_limits(), NullReceiver) else {
        return;
    };
    let mut bytes = data.iter().copied();
    while let Some(op) = bytes.next() {
        let arg = bytes.next().unwrap_or(0);
        let result = match op % 20 {
            0 => rules.on_version(u64::from(arg % 3)),
            1 => rules.on_padding(),
            2 => rules.on_nil(),
            3 => rules.on_bool(arg & 1 == 1),
            4 => rules.on_positive_int(u64::from(arg % 8)),
            5 => rules.on_negative_int(u64::from(arg)),
            6 => rules.on_float(if arg == 0 { f64::NAN } else { f64::from(arg) }),
            7 => rules.on_begin_list(),
            8 => rules.on_begin_map(),
            9 => rules.on_begin_markup(),
            10 => rules.on_begin_metadata(),
            11 => rules.on_begin_comment(),
            12 => rules.on_begin_marker(),
            13 => rules.on_begin_reference(),
            14 => rules.on_end(),
            15 => rules.on_begin_array(ARRAY_TYPES[usize::from(arg) % ARRAY_TYPES.len()]),
            16 => rules.on_array_chunk(u64::from(arg >> 1), arg & 1 == 1),
            17 => {
                let take = usize::from(arg % 8);
                let chunk: Vec<u8> = bytes.by_ref().take(take).collect();
                rules.on_array_data(&chunk)
            }
            18 => rules.on_end_document(),
            _ => {
                rules.reset();
                Ok(())
            }
        };
        if result.is_err() {
            assert!(rules.is_poisoned());
        }
    }
});

use concise_rules::{
    ArrayType, ErrorCode, ErrorKind, EventReceiver, Limits, NullReceiver, Recorder, Rules, StateId,
    Value,
};

fn in_list(limits: Limits) -> Rules<NullReceiver> {
    let mut rules = Rules::new(limits, NullReceiver).unwrap();
    rules.on_version(1).unwrap();
    rules.on_begin_list().unwrap();
    rules
}

fn default_list() -> Rules<NullReceiver> {
    in_list(Limits::default())
}

#[test]
fn multi_chunk_byte_array() {
    let mut rules = default_list();
    rules.on_begin_array(ArrayType::Uint8).unwrap();
    assert_eq!(rules.state(), StateId::AwaitingArrayChunk);

    rules.on_array_chunk(5, true).unwrap();
    assert_eq!(rules.state(), StateId::AwaitingArrayData);
    rules.on_array_data(&[1, 2, 3, 4, 5]).unwrap();
    assert_eq!(rules.state(), StateId::AwaitingArrayChunk);

    rules.on_array_chunk(6, true).unwrap();
    rules.on_array_data(&[0; 3]).unwrap();
    assert_eq!(rules.state(), StateId::AwaitingArrayData);
    rules.on_array_data(&[0; 3]).unwrap();

    rules.on_array_chunk(4, false).unwrap();
    rules.on_array_data(&[9; 4]).unwrap();
    assert_eq!(rules.state(), StateId::AwaitingListItem);
    assert_eq!(rules.object_count(), 1);

    rules.on_end().unwrap();
    rules.on_end_document().unwrap();
}

#[test]
fn empty_chunks() {
    let mut rules = default_list();
    rules.on_begin_array(ArrayType::Uint8).unwrap();
    rules.on_array_chunk(0, true).unwrap();
    assert_eq!(rules.state(), StateId::AwaitingArrayChunk);
    rules.on_array_chunk(0, false).unwrap();
    assert_eq!(rules.state(), StateId::AwaitingListItem);

    rules.on_array(ArrayType::String, 0, &[]).unwrap();
    assert_eq!(rules.object_count(), 2);
}

#[test]
fn data_beyond_chunk_is_rejected() {
    let mut rules = default_list();
    rules.on_begin_array(ArrayType::Uint8).unwrap();
    rules.on_array_chunk(2, false).unwrap();
    let err = rules.on_array_data(&[1, 2, 3]).unwrap_err();
    assert_eq!(err.code, ErrorCode::ChunkOverflow);
    assert_eq!(err.kind(), ErrorKind::Limit);
}

#[test]
fn chunk_of_five_accepts_exactly_five_bytes() {
    let mut rules = default_list();
    rules.on_begin_array(ArrayType::Uint8).unwrap();
    rules.on_array_chunk(5, false).unwrap();
    rules.on_array_data(&[1, 2]).unwrap();
    rules.on_array_data(&[3, 4, 5]).unwrap();
    assert_eq!(rules.state(), StateId::AwaitingListItem);

    let mut rules = default_list();
    rules.on_begin_array(ArrayType::Uint8).unwrap();
    rules.on_array_chunk(5, false).unwrap();
    rules.on_array_data(&[1, 2, 3]).unwrap();
    let err = rules.on_array_data(&[4, 5, 6]).unwrap_err();
    assert_eq!(err.code, ErrorCode::ChunkOverflow);

    let mut rules = default_list();
    rules.on_begin_array(ArrayType::Uint8).unwrap();
    rules.on_array_chunk(5, false).unwrap();
    rules.on_array_data(&[1, 2, 3, 4]).unwrap();
    let err = rules.on_end().unwrap_err();
    assert_eq!(err.code, ErrorCode::GrammarViolation);
    assert_eq!(err.state, Some(StateId::AwaitingArrayData));
    assert!(rules.is_poisoned());
}

#[test]
fn bit_chunks_are_packed_separately() {
    let mut rules = default_list();
    rules.on_begin_array(ArrayType::Bit).unwrap();
    rules.on_array_chunk(8, false).unwrap();
    rules.on_array_data(&[0b1010_1010]).unwrap();
    assert_eq!(rules.state(), StateId::AwaitingListItem);

    rules.on_begin_array(ArrayType::Bit).unwrap();
    rules.on_array_chunk(3, true).unwrap();
    rules.on_array_data(&[0b101]).unwrap();
    assert_eq!(rules.state(), StateId::AwaitingArrayChunk);
    rules.on_array_chunk(5, false).unwrap();
    assert_eq!(rules.state(), StateId::AwaitingArrayData);
    rules.on_array_data(&[0b1_0101]).unwrap();
    assert_eq!(rules.state(), StateId::AwaitingListItem);

    rules.on_begin_array(ArrayType::Bit).unwrap();
    rules.on_array_chunk(3, true).unwrap();
    let err = rules.on_array_data(&[0, 0]).unwrap_err();
    assert_eq!(err.code, ErrorCode::ChunkOverflow);
}

#[test]
fn data_before_chunk_header_is_rejected() {
    let mut rules = default_list();
    rules.on_begin_array(ArrayType::Uint8).unwrap();
    let err = rules.on_array_data(&[1]).unwrap_err();
    assert_eq!(err.code, ErrorCode::GrammarViolation);
    assert_eq!(err.state, Some(StateId::AwaitingArrayChunk));
}

#[test]
fn other_events_inside_array_are_rejected() {
    let mut rules = default_list();
    rules.on_begin_array(ArrayType::String).unwrap();
    rules.on_array_chunk(3, false).unwrap();
    let err = rules.on_nil().unwrap_err();
    assert_eq!(err.code, ErrorCode::GrammarViolation);
    assert_eq!(err.state, Some(StateId::AwaitingArrayData));
}

#[test]
fn typed_array_lengths_are_in_elements() {
    let mut rules = default_list();
    rules.on_array(ArrayType::Uint16, 3, &[0; 6]).unwrap();
    rules.on_array(ArrayType::Float32, 2, &[0; 8]).unwrap();
    rules.on_array(ArrayType::Int64, 1, &[0; 8]).unwrap();
    rules.on_array(ArrayType::Uuid, 1, &[0; 16]).unwrap();
    rules.on_array(ArrayType::Bit, 9, &[0xff, 0x01]).unwrap();
    assert_eq!(rules.state(), StateId::AwaitingListItem);

    rules.on_begin_array(ArrayType::Uint32).unwrap();
    rules.on_array_chunk(1, false).unwrap();
    let err = rules.on_array_data(&[0; 5]).unwrap_err();
    assert_eq!(err.code, ErrorCode::ChunkOverflow);
}

#[test]
fn element_count_overflow_is_detected() {
    let mut rules = default_list();
    rules.on_begin_array(ArrayType::Uint64).unwrap();
    let err = rules.on_array_chunk(u64::MAX, false).unwrap_err();
    assert_eq!(err.code, ErrorCode::LengthOverflow);
}

#[test]
fn utf8_split_across_chunks() {
    let mut rules = default_list();
    let text = "h\u{e9}llo \u{20ac} \u{1f600}";
    for chunk_len in 1..=text.len() {
        Value::String(text.into())
            .emit_chunked(&mut rules, chunk_len)
            .unwrap();
    }

    // one-byte chunk then a two-byte chunk completing a three-byte rune
    let euro = "\u{20ac}".as_bytes();
    rules.on_begin_array(ArrayType::String).unwrap();
    rules.on_array_chunk(1, true).unwrap();
    rules.on_array_data(&euro[..1]).unwrap();
    rules.on_array_chunk(2, false).unwrap();
    rules.on_array_data(&euro[1..]).unwrap();
    assert_eq!(rules.state(), StateId::AwaitingListItem);
}

#[test]
fn truncated_rune_at_end_of_string() {
    let mut rules = default_list();
    rules.on_begin_array(ArrayType::String).unwrap();
    rules.on_array_chunk(1, false).unwrap();
    let err = rules.on_array_data(&[0xc3]).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidUTF8);
    assert_eq!(err.kind(), ErrorKind::Content);
}

#[test]
fn malformed_utf8_is_rejected() {
    for bytes in [&[0xff][..], &[0xc3, 0x28], &[0xed, 0xa0, 0x80], &[0x80]] {
        let mut rules = default_list();
        let err = rules
            .on_array(ArrayType::String, bytes.len() as u64, bytes)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidUTF8, "{bytes:x?}");
    }
}

#[test]
fn byte_arrays_skip_utf8_checks() {
    let mut rules = default_list();
    rules.on_array(ArrayType::Uint8, 2, &[0xff, 0xfe]).unwrap();
    rules.on_array(ArrayType::CustomBinary, 1, &[0xc3]).unwrap();
}

#[test]
fn custom_text_must_be_utf8() {
    let mut rules = default_list();
    rules.on_array(ArrayType::CustomText, 2, b"ok").unwrap();
    let err = rules
        .on_array(ArrayType::CustomText, 1, &[0xff])
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidUTF8);
}

#[test]
fn comment_characters() {
    let mut rules = default_list();
    rules.on_begin_comment().unwrap();
    rules.on_string("tab\there\r\nand line").unwrap();
    rules.on_end().unwrap();

    for bad in ["bell\u{7}", "del\u{7f}", "c1\u{85}", "sep\u{2028}", "ff\u{c}"] {
        let mut rules = default_list();
        rules.on_begin_comment().unwrap();
        let err = rules.on_string(bad).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCommentCharacter, "{bad:?}");
    }
}

#[test]
fn comment_character_split_across_chunks() {
    let mut rules = default_list();
    rules.on_begin_comment().unwrap();
    let sep = "\u{2028}".as_bytes();
    rules.on_begin_array(ArrayType::String).unwrap();
    rules.on_array_chunk(3, false).unwrap();
    rules.on_array_data(&sep[..2]).unwrap();
    let err = rules.on_array_data(&sep[2..]).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidCommentCharacter);
}

#[test]
fn control_characters_allowed_in_strings_outside_comments() {
    let mut rules = default_list();
    rules.on_string("bell\u{7}").unwrap();
}

#[test]
fn uri_characters() {
    let mut rules = default_list();
    Value::Uri("https://example.com/a?b=c#d".into())
        .emit(&mut rules)
        .unwrap();
    for bad in ["https://example.com/a b", "x\u{0}", "x\u{9f}", "\n"] {
        let mut rules = default_list();
        let err = Value::Uri(bad.into()).emit(&mut rules).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidURICharacter, "{bad:?}");
    }
}

#[test]
fn string_length_limit() {
    let limits = Limits {
        max_string_len: 4,
        ..Limits::default()
    };
    let mut rules = in_list(limits);
    rules.on_string("four").unwrap();

    rules.on_begin_array(ArrayType::String).unwrap();
    rules.on_array_chunk(3, true).unwrap();
    rules.on_array_data(b"abc").unwrap();
    let err = rules.on_array_chunk(2, false).unwrap_err();
    assert_eq!(err.code, ErrorCode::StringTooLong);
}

#[test]
fn array_length_limit() {
    let limits = Limits {
        max_array_len: 7,
        ..Limits::default()
    };
    let mut rules = in_list(limits);
    rules.on_array(ArrayType::Uint8, 7, &[0; 7]).unwrap();
    let err = rules.on_array(ArrayType::Uint32, 2, &[0; 8]).unwrap_err();
    assert_eq!(err.code, ErrorCode::ArrayTooLong);
}

#[test]
fn uri_length_limit() {
    let limits = Limits {
        max_uri_len: 8,
        ..Limits::default()
    };
    let mut rules = in_list(limits);
    let err = Value::Uri("https://example.com".into())
        .emit(&mut rules)
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::URITooLong);
}

#[test]
fn identifier_length_limit() {
    let limits = Limits {
        max_id_len: 3,
        ..Limits::default()
    };
    let mut rules = in_list(limits);
    rules.on_begin_marker().unwrap();
    rules.on_string("abc").unwrap();
    rules.on_nil().unwrap();

    rules.on_begin_marker().unwrap();
    let err = rules.on_string("abcd").unwrap_err();
    assert_eq!(err.code, ErrorCode::IDTooLong);

    let mut rules = in_list(limits);
    rules.on_begin_markup().unwrap();
    let err = rules.on_string("main").unwrap_err();
    assert_eq!(err.code, ErrorCode::IDTooLong);
}

#[test]
fn non_keyable_arrays_are_rejected_as_map_keys() {
    for array_type in [ArrayType::Uint8, ArrayType::CustomBinary, ArrayType::Bit] {
        let mut rules = Rules::with_default_limits(Recorder::new());
        rules.on_version(1).unwrap();
        rules.on_begin_map().unwrap();
        let err = rules.on_begin_array(array_type).unwrap_err();
        assert_eq!(err.code, ErrorCode::GrammarViolation);
        assert_eq!(err.event, Some(array_type.begin_event()));
    }
}

#[test]
fn uri_is_a_valid_map_key() {
    let mut rules = Rules::with_default_limits(NullReceiver);
    Value::Map(vec![(Value::Uri("urn:x".into()), Value::Nil)])
        .emit_document(1, &mut rules)
        .unwrap();
}

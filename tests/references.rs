use concise_rules::{
    DataType, ErrorCode, ErrorKind, EventReceiver, Identifier, Limits, NullReceiver, Rules,
    StateId, Value,
};

fn started() -> Rules<NullReceiver> {
    let mut rules = Rules::with_default_limits(NullReceiver);
    rules.on_version(1).unwrap();
    rules
}

fn marked(id: Identifier, value: Value) -> Value {
    Value::Marked {
        id,
        value: Box::new(value),
    }
}

#[test]
fn reference_resolves_to_marked_type() {
    let mut rules = started();
    rules.on_begin_list().unwrap();
    marked(Identifier::Int(1), Value::Bool(true))
        .emit(&mut rules)
        .unwrap();
    assert_eq!(
        rules.marked_type(&Identifier::Int(1)),
        Some(DataType::Bool)
    );

    Value::Reference(Identifier::Int(1))
        .emit(&mut rules)
        .unwrap();
    assert_eq!(rules.state(), StateId::AwaitingListItem);
    rules.on_end().unwrap();
    rules.on_end_document().unwrap();
}

#[test]
fn string_identifiers() {
    let doc = Value::List(vec![
        marked(
            Identifier::String("node-1.a".into()),
            Value::Map(Vec::new()),
        ),
        Value::Reference(Identifier::String("node-1.a".into())),
    ]);
    let mut rules = Rules::with_default_limits(NullReceiver);
    doc.emit_document(1, &mut rules).unwrap();
    assert_eq!(
        rules.marked_type(&Identifier::String("node-1.a".into())),
        Some(DataType::Map)
    );
}

#[test]
fn unresolved_reference() {
    let mut rules = started();
    rules.on_begin_list().unwrap();
    marked(Identifier::Int(1), Value::Nil)
        .emit(&mut rules)
        .unwrap();
    let err = Value::Reference(Identifier::Int(2))
        .emit(&mut rules)
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::UnresolvedReference);
    assert_eq!(err.kind(), ErrorKind::Reference);
}

#[test]
fn reference_to_open_marker_is_unresolved() {
    let doc = marked(
        Identifier::Int(7),
        Value::List(vec![Value::Reference(Identifier::Int(7))]),
    );
    let mut rules = Rules::with_default_limits(NullReceiver);
    let err = doc.emit_document(1, &mut rules).unwrap_err();
    assert_eq!(err.code, ErrorCode::UnresolvedReference);
}

#[test]
fn duplicate_marker_id() {
    let doc = Value::List(vec![
        marked(Identifier::String("x".into()), Value::Nil),
        marked(Identifier::String("x".into()), Value::Int(1)),
    ]);
    let mut rules = Rules::with_default_limits(NullReceiver);
    let err = doc.emit_document(1, &mut rules).unwrap_err();
    assert_eq!(err.code, ErrorCode::DuplicateMarkerID);
}

#[test]
fn integer_and_string_identifiers_are_distinct() {
    let doc = Value::List(vec![
        marked(Identifier::Int(1), Value::Nil),
        marked(Identifier::String("1".into()), Value::Nil),
    ]);
    let mut rules = Rules::with_default_limits(NullReceiver);
    doc.emit_document(1, &mut rules).unwrap();
}

#[test]
fn uri_reference_is_accepted_anywhere() {
    let doc = Value::Map(vec![(
        Value::Reference(Identifier::Uri("https://example.com/doc.ce".into())),
        Value::Reference(Identifier::Uri("common.ce#node".into())),
    )]);
    let mut rules = Rules::with_default_limits(NullReceiver);
    doc.emit_document(1, &mut rules).unwrap();
}

#[test]
fn referenced_type_is_checked_by_parent() {
    let mut rules = started();
    rules.on_begin_list().unwrap();
    marked(Identifier::Int(1), Value::List(vec![Value::Nil]))
        .emit(&mut rules)
        .unwrap();
    marked(Identifier::Int(2), Value::String("k".into()))
        .emit(&mut rules)
        .unwrap();
    rules.on_begin_map().unwrap();

    Value::Reference(Identifier::Int(2))
        .emit(&mut rules)
        .unwrap();
    assert_eq!(rules.state(), StateId::AwaitingMapValue);
    rules.on_nil().unwrap();

    let err = Value::Reference(Identifier::Int(1))
        .emit(&mut rules)
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::GrammarViolation);
    assert_eq!(err.state, Some(StateId::AwaitingMapKey));
}

#[test]
fn marked_map_key_obeys_key_rules() {
    let mut rules = started();
    rules.on_begin_map().unwrap();
    rules.on_begin_marker().unwrap();
    rules.on_positive_int(3).unwrap();
    assert_eq!(rules.state(), StateId::AwaitingMarkedObject);
    let err = rules.on_begin_list().unwrap_err();
    assert_eq!(err.code, ErrorCode::GrammarViolation);
    assert_eq!(err.state, Some(StateId::AwaitingMapKey));
}

#[test]
fn marker_identifier_must_be_int_or_string() {
    let mut rules = started();
    rules.on_begin_marker().unwrap();
    let err = rules.on_negative_int(1).unwrap_err();
    assert_eq!(err.code, ErrorCode::GrammarViolation);
    assert_eq!(err.state, Some(StateId::AwaitingMarkerId));

    let mut rules = started();
    rules.on_begin_marker().unwrap();
    let err = Value::Uri("urn:a".into()).emit(&mut rules).unwrap_err();
    assert_eq!(err.code, ErrorCode::GrammarViolation);
}

#[test]
fn marker_identifier_characters() {
    for bad in ["", "a b", "-lead", "tab\t"] {
        let mut rules = started();
        rules.on_begin_marker().unwrap();
        let err = rules.on_string(bad).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidMarkerIDCharacter, "{bad:?}");
    }
}

#[test]
fn reference_cannot_be_marked() {
    let mut rules = started();
    rules.on_begin_marker().unwrap();
    rules.on_positive_int(1).unwrap();
    let err = rules.on_begin_reference().unwrap_err();
    assert_eq!(err.code, ErrorCode::GrammarViolation);
    assert_eq!(err.state, Some(StateId::AwaitingMarkedObject));
}

#[test]
fn marked_object_may_carry_metadata() {
    let doc = marked(
        Identifier::Int(1),
        Value::WithMetadata {
            metadata: vec![(Value::String("m".into()), Value::Nil)],
            value: Box::new(Value::Float(2.5)),
        },
    );
    let mut rules = Rules::with_default_limits(NullReceiver);
    doc.emit_document(1, &mut rules).unwrap();
    assert_eq!(
        rules.marked_type(&Identifier::Int(1)),
        Some(DataType::Float)
    );
}

#[test]
fn marker_count_limit() {
    let limits = Limits {
        max_reference_count: 2,
        ..Limits::default()
    };
    let doc = Value::List(vec![
        marked(Identifier::Int(1), Value::Nil),
        marked(Identifier::Int(2), Value::Nil),
        marked(Identifier::Int(3), Value::Nil),
    ]);
    let mut rules = Rules::new(limits, NullReceiver).unwrap();
    let err = doc.emit_document(1, &mut rules).unwrap_err();
    assert_eq!(err.code, ErrorCode::TooManyReferences);
}

#[test]
fn reference_count_limit() {
    let limits = Limits {
        max_reference_count: 2,
        ..Limits::default()
    };
    let doc = Value::List(vec![
        marked(Identifier::Int(1), Value::Nil),
        Value::Reference(Identifier::Int(1)),
        Value::Reference(Identifier::Int(1)),
        Value::Reference(Identifier::Int(1)),
    ]);
    let mut rules = Rules::new(limits, NullReceiver).unwrap();
    let err = doc.emit_document(1, &mut rules).unwrap_err();
    assert_eq!(err.code, ErrorCode::TooManyReferences);
}

#[test]
fn reset_forgets_markers() {
    let mut rules = Rules::with_default_limits(NullReceiver);
    marked(Identifier::Int(1), Value::Nil)
        .emit_document(1, &mut rules)
        .unwrap();
    rules.reset();
    assert_eq!(rules.marked_type(&Identifier::Int(1)), None);
    let err = Value::Reference(Identifier::Int(1))
        .emit_document(1, &mut rules)
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::UnresolvedReference);
}

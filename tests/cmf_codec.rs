use cmf::{
    build, build_hex, parse, parse_hex, Builder, Dictionary, DictionaryError, Entry,
    MalformedMessageError, Parser, StatusCode, Tag, Value,
};
use rstest::rstest;

fn single(
    message: &cmf::Message,
    tag: impl Into<Tag>,
) -> Value {
    match &message[&tag.into()] {
        Entry::Single(v) => v.clone(),
        Entry::Repeated(vs) => panic!("expected a single value, got {vs:?}"),
    }
}

////////////////////////////////////////////////////////////////////////////////
// Reference vectors
////////////////////////////////////////////////////////////////////////////////

#[test]
fn test_vector_bools() {
    let hex = build_hex([(0u64, true), (1, false)], None).unwrap();
    assert_eq!(hex, "040d");
    assert_eq!(build_hex([(0u64, false)], None).unwrap(), "05");
}

#[test]
fn test_vector_int_and_double() {
    assert_eq!(Builder::new().add_int(15, 6512).unwrap().to_hex(), "78b170");
    assert_eq!(Builder::new().add_int(15, "6512").unwrap().to_hex(), "78b170");
    assert_eq!(Builder::new().add_int(15, 6512.1).unwrap().to_hex(), "78b170");
    assert_eq!(
        Builder::new().add_double(0, 1.1).unwrap().to_hex(),
        "069a9999999999f13f"
    );
    assert_eq!(
        Builder::new().add_double(0, "1.1").unwrap().to_hex(),
        "069a9999999999f13f"
    );
}

#[test]
fn test_vector_bool_coercion_and_chaining() {
    assert_eq!(Builder::new().add_bool(0, None::<()>).unwrap().to_hex(), "05");
    assert_eq!(
        Builder::new()
            .add(0, true)
            .unwrap()
            .add(0, false)
            .unwrap()
            .to_hex(),
        "0405"
    );
}

#[test]
fn test_reset_empties_message() {
    let mut b = Builder::new();
    b.add(0, "value0").unwrap().add(1, "value1").unwrap();
    assert!(!b.to_hex().is_empty());
    assert_eq!(b.reset().to_hex(), "");
}

#[test]
fn test_parse_repeated_tag() {
    let message = parse_hex("040504", None).unwrap();
    assert_eq!(
        message[&Tag::Number(0)],
        Entry::Repeated(vec![
            Value::Bool(true),
            Value::Bool(false),
            Value::Bool(true)
        ])
    );
}

////////////////////////////////////////////////////////////////////////////////
// Round trips
////////////////////////////////////////////////////////////////////////////////

#[test]
fn test_roundtrip_every_kind() {
    let mut b = Builder::new();
    b.add(0, 0)
        .unwrap()
        .add(1, -6512)
        .unwrap()
        .add(2, "héllo")
        .unwrap()
        .add(3, vec![0u8, 0xFF, 0x80])
        .unwrap()
        .add(4, true)
        .unwrap()
        .add(5, false)
        .unwrap()
        .add(6, -0.5)
        .unwrap()
        .add(100, u64::MAX)
        .unwrap();

    let message = parse(b.as_bytes(), None).unwrap();
    assert_eq!(single(&message, 0u64), Value::Int(0));
    assert_eq!(single(&message, 1u64), Value::Int(-6512));
    assert_eq!(single(&message, 2u64), Value::Text("héllo".into()));
    assert_eq!(single(&message, 3u64), Value::Bytes(vec![0, 0xFF, 0x80]));
    assert_eq!(single(&message, 4u64), Value::Bool(true));
    assert_eq!(single(&message, 5u64), Value::Bool(false));
    assert_eq!(single(&message, 6u64), Value::Double(-0.5));
    assert_eq!(single(&message, 100u64), Value::Int(u64::MAX as i128));

    let tags: Vec<_> = message.keys().cloned().collect();
    assert_eq!(
        tags,
        [0u64, 1, 2, 3, 4, 5, 6, 100]
            .into_iter()
            .map(Tag::Number)
            .collect::<Vec<_>>()
    );
}

#[rstest]
#[case(30, 1)]
#[case(31, 2)]
#[case(32, 2)]
#[case(127, 2)]
#[case(0x407F, 3)]
#[case(0x4080, 4)]
fn test_tag_escape_boundary(
    #[case] tag: u64,
    #[case] header_len: usize,
) {
    let mut b = Builder::new();
    b.add(tag, true).unwrap();
    assert_eq!(b.len(), header_len);

    let message = parse(b.as_bytes(), None).unwrap();
    assert_eq!(single(&message, tag), Value::Bool(true));
}

#[test]
fn test_repeated_values_keep_order() {
    let bytes = build(
        [("list", Entry::from(vec!["a", "b", "c"])), ("other", Entry::from(1))],
        Some(Dictionary::from_names(["list", "other"]).unwrap()),
    )
    .unwrap();

    let message = parse(&bytes, None).unwrap();
    assert_eq!(
        message[&Tag::Number(0)].values(),
        &[Value::from("a"), Value::from("b"), Value::from("c")]
    );
    assert_eq!(single(&message, 1u64), Value::Int(1));
}

#[test]
fn test_message_roundtrip_through_build() {
    let original = parse_hex("04057800", None).unwrap();
    let rebuilt = build_hex(&original, None).unwrap();
    assert_eq!(rebuilt, "04057800");
}

////////////////////////////////////////////////////////////////////////////////
// Malformed input
////////////////////////////////////////////////////////////////////////////////

#[rstest]
#[case::truncated_varint("00")]
#[case::unterminated_varint("00ff")]
#[case::unknown_type("0700")]
#[case::short_string("020261")]
#[case::short_double("069a9999999999b9")]
#[case::truncated_escape("f8")]
#[case::varint_overflow("00ffffffffffffffffffff7f")]
fn test_malformed_message(#[case] hex: &str) {
    let err = parse_hex(hex, None).unwrap_err();
    assert_eq!(err.status_code(), StatusCode::MalformedMessage);
    assert!(err.is::<MalformedMessageError>());
}

#[rstest]
#[case("0")]
#[case("0g")]
#[case("04 0d")]
fn test_invalid_hex_is_not_malformed(#[case] hex: &str) {
    let err = parse_hex(hex, None).unwrap_err();
    assert_eq!(err.status_code(), StatusCode::InvalidHex);
}

#[test]
fn test_pairs_iterator_reports_error_once() {
    let mut p = Parser::new();
    p.set_message_hex("04020261").unwrap();

    let mut pairs = p.pairs();
    assert_eq!(
        pairs.next().unwrap().unwrap(),
        (Tag::Number(0), Value::Bool(true))
    );
    assert!(pairs.next().unwrap().is_err());
    assert!(pairs.next().is_none());
}

////////////////////////////////////////////////////////////////////////////////
// Dictionary
////////////////////////////////////////////////////////////////////////////////

#[test]
fn test_dictionary_substitution() {
    let dict = Dictionary::from_entries([("tag0", 0), ("tag1", 1)]).unwrap();

    let bytes = build([("tag0", true), ("tag1", false)], Some(dict.clone())).unwrap();
    assert_eq!(bytes, vec![0x04, 0x0D]);

    let named = parse(&bytes, Some(dict)).unwrap();
    assert_eq!(single(&named, "tag0"), Value::Bool(true));
    assert_eq!(single(&named, "tag1"), Value::Bool(false));

    let plain = parse(&bytes, None).unwrap();
    assert_eq!(single(&plain, 0u64), Value::Bool(true));
    assert_eq!(single(&plain, 1u64), Value::Bool(false));
}

#[test]
fn test_dictionary_list_and_map_forms_agree() {
    let list = Dictionary::from_names(["name", "address", "email"]).unwrap();
    let map = Dictionary::from_entries([("name", 0), ("address", 1), ("email", 2)]).unwrap();

    let from_list = build_hex([("email", "a@b.c")], Some(list)).unwrap();
    let from_map = build_hex([("email", "a@b.c")], Some(map)).unwrap();
    assert_eq!(from_list, from_map);
}

#[test]
fn test_dictionary_validation_kinds() {
    let wrong_kind = Dictionary::from_json(r#"{"a": "zero"}"#).unwrap_err();
    let duplicate = Dictionary::from_entries([("a", 0), ("b", 0)]).unwrap_err();
    let negative = Dictionary::from_entries([("a", -3)]).unwrap_err();

    assert_eq!(wrong_kind.status_code(), StatusCode::TypeError);
    assert_eq!(duplicate.status_code(), StatusCode::DuplicateValue);
    assert_eq!(negative.status_code(), StatusCode::InvalidValue);
    assert!(matches!(
        duplicate.downcast_ref::<DictionaryError>(),
        Some(DictionaryError::DuplicateValue { value: 0, .. })
    ));
}

#[test]
fn test_unknown_name_and_negative_tag_are_configuration_errors() {
    let mut b = Builder::with_dictionary(Dictionary::from_names(["known"]).unwrap());

    let unknown = b.add("unknown", 1).unwrap_err();
    assert_eq!(unknown.status_code(), StatusCode::UnknownTagName);
    assert!(unknown.status_code().is_config_error());

    let negative = b.add(-1, 1).unwrap_err();
    assert_eq!(negative.status_code(), StatusCode::InvalidTag);
    assert!(negative.status_code().is_config_error());

    assert!(b.is_empty());
}

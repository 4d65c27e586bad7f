#![no_main]

use arbitrary::Arbitrary;
use cmf::{Builder, Parser, Tag, Value};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum FuzzValue {
    Positive(u64),
    Negative(u64),
    Text(String),
    Bytes(Vec<u8>),
    Bool(bool),
    Double(f64),
}

impl From<FuzzValue> for Value {
    fn from(v: FuzzValue) -> Self {
        match v {
            FuzzValue::Positive(n) => Value::Int(n as i128),
            FuzzValue::Negative(n) => Value::Int(-(n as i128)),
            FuzzValue::Text(s) => Value::Text(s),
            FuzzValue::Bytes(b) => Value::Bytes(b),
            FuzzValue::Bool(b) => Value::Bool(b),
            FuzzValue::Double(d) => Value::Double(d),
        }
    }
}

fn same(
    a: &Value,
    b: &Value,
) -> bool {
    match (a, b) {
        (Value::Double(x), Value::Double(y)) => x.to_bits() == y.to_bits(),
        _ => a == b,
    }
}

fuzz_target!(|pairs: Vec<(u64, FuzzValue)>| {
    let pairs: Vec<(u64, Value)> = pairs.into_iter().map(|(t, v)| (t, v.into())).collect();

    let mut builder = Builder::new();
    for (tag, value) in &pairs {
        builder.add(*tag, value).expect("every fuzz value is encodable");
    }

    let mut parser = Parser::new();
    parser.set_message(builder.as_bytes());
    let decoded: Vec<(Tag, Value)> = parser
        .pairs()
        .collect::<Result<_, _>>()
        .expect("built message must parse");

    assert_eq!(decoded.len(), pairs.len());
    for ((tag, value), (dtag, dvalue)) in pairs.iter().zip(&decoded) {
        assert_eq!(&Tag::Number(*tag), dtag);
        assert!(same(value, dvalue), "{value:?} != {dvalue:?}");
    }
});

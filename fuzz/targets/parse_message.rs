#![no_main]

use arbitrary::Arbitrary;
use cmf::{Parser, ParserOptions, StatusCode, Utf8Policy};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    data: Vec<u8>,
    lossy: bool,
}

fuzz_target!(|input: FuzzInput| {
    let utf8 = if input.lossy {
        Utf8Policy::Lossy
    } else {
        Utf8Policy::Strict
    };
    let mut parser = Parser::new().with_options(ParserOptions { utf8 });
    parser.set_message(input.data.as_slice());

    for pair in parser.pairs() {
        if let Err(e) = pair {
            assert_eq!(e.status_code(), StatusCode::MalformedMessage);
        }
    }
    assert!(parser.position() <= input.data.len());
});

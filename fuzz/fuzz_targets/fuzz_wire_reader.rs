#![no_main]

use libfuzzer_sys::fuzz_target;
use packet_encoder::core::primitive::{Primitive, PrimitiveKind};
use packet_encoder::core::reader::WireReader;

fuzz_target!(|data: &[u8]| {
    // Walk the input as a stream of primitives; must never panic
    for kind in PrimitiveKind::ALL {
        let mut reader = WireReader::new(data);
        while Primitive::decode(kind, &mut reader).is_ok() && !reader.is_empty() {}
    }
});

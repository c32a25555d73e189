#![no_main]

use interchain_query::prelude::*;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Whatever decodes must reach a fixed point after one re-encode
    if let Ok(requests) = deserialize_query(data) {
        let encoded = serialize_query(&requests).expect("decoded batch re-encodes");
        let again = deserialize_query(&encoded).expect("canonical batch decodes");
        assert_eq!(again, requests);
    }
    let _ = deserialize_response(data);
});

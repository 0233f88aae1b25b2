#![no_main]
use deepsecurity::soap::envelope::parse_response;
use deepsecurity::{HostDetail, SchemaRegistry, TransportObject, WireValue};
use libfuzzer_sys::fuzz_target;

const MAX_WRAPPED_INPUT_LEN: usize = 10_000;

/// Fuzz envelope parsing and record decoding.
///
/// Wraps input in a response body so the decoder sees payloads that got
/// past the envelope checks.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = parse_response("host_detail_retrieve", s);

        if s.len() < MAX_WRAPPED_INPUT_LEN {
            let wrapped = format!(
                "<Envelope><Body><hostDetailRetrieveResponse><hostDetailRetrieveReturn>{s}\
                 </hostDetailRetrieveReturn></hostDetailRetrieveResponse></Body></Envelope>"
            );
            if let Ok(payload) = parse_response("host_detail_retrieve", &wrapped) {
                let registry = SchemaRegistry::global();
                match &payload {
                    WireValue::List(items) => {
                        for item in items {
                            let _ = HostDetail::decode(registry, item);
                        }
                    }
                    single => {
                        let _ = HostDetail::decode(registry, single);
                    }
                }
            }
        }
    }
});

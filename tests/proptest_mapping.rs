//! Property-based tests for name conversion, converters and envelope parsing.
//!
//! Decoders must reject malformed input with an error, never a panic.

use chrono::{DateTime, FixedOffset};
use deepsecurity::mapping::{lower_camel_case, parse_datetime, snake_case, TypeMapping};
use deepsecurity::reports::{escape_csv, format_time};
use deepsecurity::soap::envelope::{build_request, parse_document, parse_response};
use deepsecurity::{SchemaRegistry, Value, WireValue};
use proptest::prelude::*;
use std::net::IpAddr;

/// Encode `value` through `mapping`, then decode the wire form again.
fn round_trip(mapping: &TypeMapping, value: &Value) -> Value {
    let registry = SchemaRegistry::global();
    let wire = mapping.encode(registry, value).unwrap();
    mapping.decode(registry, &wire).unwrap()
}

/// Send `wire` as a request parameter and read it back from the XML.
fn through_envelope(wire: WireValue) -> WireValue {
    let xml = build_request("echo", &[("value", wire)]).unwrap();
    let document = parse_document(&xml).unwrap();
    document
        .get("envelope")
        .and_then(|envelope| envelope.get("body"))
        .and_then(|body| body.get("echo"))
        .and_then(|echo| echo.get("value"))
        .cloned()
        .unwrap_or_default()
}

fn datetime_strategy() -> impl Strategy<Value = DateTime<FixedOffset>> {
    (
        0i64..4_102_444_800,
        0u32..1_000_000_000,
        -(14 * 60)..=(14 * 60),
    )
        .prop_map(|(secs, nanos, offset_minutes)| {
            let offset = FixedOffset::east_opt(offset_minutes * 60).unwrap();
            DateTime::from_timestamp(secs, nanos)
                .unwrap()
                .with_timezone(&offset)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn snake_case_is_idempotent(name in "[A-Za-z][A-Za-z0-9 ]{0,40}") {
        let once = snake_case(&name);
        prop_assert_eq!(snake_case(&once), once.clone());
        prop_assert!(!once.chars().any(char::is_uppercase));
    }

    #[test]
    fn camel_case_round_trips_through_snake_case(
        words in prop::collection::vec("[a-z]{1,8}", 1..5)
    ) {
        let name = words.join("_");
        prop_assert_eq!(snake_case(&lower_camel_case(&name)), name);
    }

    #[test]
    fn integer_decoding_matches_parse(text in "\\PC{0,20}") {
        let decoded = TypeMapping::Integer.decode(SchemaRegistry::global(), &WireValue::text(text.clone()));
        match text.trim().parse::<i64>() {
            Ok(expected) => prop_assert_eq!(decoded.unwrap(), Value::Integer(expected)),
            Err(_) => prop_assert!(decoded.is_err()),
        }
    }

    #[test]
    fn boolean_decoding_never_fails(text in "\\PC{0,20}") {
        let decoded = TypeMapping::Boolean
            .decode(SchemaRegistry::global(), &WireValue::text(text.clone()))
            .unwrap();
        prop_assert_eq!(decoded, Value::Boolean(text == "true"));
    }

    #[test]
    fn integer_encoding_round_trips(n in any::<i64>()) {
        let registry = SchemaRegistry::global();
        let wire = TypeMapping::Integer.encode(registry, &Value::Integer(n)).unwrap();
        prop_assert_eq!(TypeMapping::Integer.decode(registry, &wire).unwrap(), Value::Integer(n));
    }

    #[test]
    fn float_encoding_round_trips(f in any::<f64>().prop_filter("finite", |f| f.is_finite())) {
        let decoded = round_trip(&TypeMapping::Float, &Value::Float(f));
        prop_assert_eq!(decoded.as_float().map(f64::to_bits), Some(f.to_bits()));
    }

    #[test]
    fn datetime_encoding_round_trips(dt in datetime_strategy()) {
        let decoded = round_trip(&TypeMapping::DateTime, &Value::DateTime(dt));
        let decoded = decoded.as_datetime().unwrap();
        prop_assert_eq!(decoded, dt);
        prop_assert_eq!(decoded.offset(), dt.offset());
        prop_assert_eq!(decoded.timestamp_subsec_nanos(), dt.timestamp_subsec_nanos());
    }

    #[test]
    fn string_encoding_round_trips(text in "[a-zA-Z0-9 <>&\"'.:/é€-]{1,40}") {
        prop_assume!(!text.trim().is_empty());
        let registry = SchemaRegistry::global();
        let value = Value::String(text.clone());
        prop_assert_eq!(round_trip(&TypeMapping::String, &value), value.clone());

        let wire = TypeMapping::String.encode(registry, &value).unwrap();
        let received = through_envelope(wire);
        prop_assert_eq!(TypeMapping::String.decode(registry, &received).unwrap(), value);
    }

    #[test]
    fn ip_address_encoding_round_trips(ip in any::<IpAddr>()) {
        let registry = SchemaRegistry::global();
        let value = Value::IpAddress(ip.to_string());
        prop_assert_eq!(round_trip(&TypeMapping::IpAddress, &value), value.clone());

        let wire = TypeMapping::IpAddress.encode(registry, &value).unwrap();
        let received = through_envelope(wire);
        prop_assert_eq!(TypeMapping::IpAddress.decode(registry, &received).unwrap(), value);
    }

    #[test]
    fn datetime_parsing_doesnt_panic(text in "\\PC{0,40}") {
        let _ = parse_datetime(&text);
    }

    #[test]
    fn valid_timestamps_parse(
        year in 1970i32..2100,
        month in 1u32..=12,
        day in 1u32..=28,
        hour in 0u32..24,
        minute in 0u32..60,
    ) {
        let text = format!("{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}:00.000Z");
        let parsed = parse_datetime(&text).unwrap();
        prop_assert_eq!(format_time(&parsed, "%Y-%m-%dT%H:%M"), text[..16].to_string());
    }

    #[test]
    fn envelope_parsing_doesnt_panic(xml in "\\PC{0,300}") {
        let _ = parse_document(&xml);
        let _ = parse_response("get_api_version", &xml);
    }

    #[test]
    fn returned_text_survives_escaping(text in "[a-zA-Z0-9 <>&\"']{1,60}") {
        let escaped = text
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;");
        let xml = format!(
            "<soapenv:Envelope xmlns:soapenv=\"http://schemas.xmlsoap.org/soap/envelope/\">\
             <soapenv:Body><getApiVersionResponse><getApiVersionReturn>{escaped}</getApiVersionReturn>\
             </getApiVersionResponse></soapenv:Body></soapenv:Envelope>"
        );
        let payload = parse_response("get_api_version", &xml).unwrap();
        // Whitespace-only text is indistinguishable from layout between elements.
        if text.trim().is_empty() {
            prop_assert!(payload.is_blank());
        } else {
            prop_assert_eq!(payload, WireValue::text(text));
        }
    }

    #[test]
    fn csv_escaping_is_reversible(field in "\\PC{0,60}") {
        let escaped = escape_csv(&field);
        let unescaped = if escaped.starts_with('"') && escaped != field {
            escaped[1..escaped.len() - 1].replace("\"\"", "\"")
        } else {
            escaped.clone()
        };
        prop_assert_eq!(unescaped, field);
    }
}

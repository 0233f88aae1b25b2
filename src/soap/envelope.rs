//! SOAP 1.1 envelope encoding and decoding.
//!
//! Requests are written with the operation element in the `urn:Manager`
//! namespace and parameter names verbatim. Responses are read into a
//! [`WireValue`] tree with snake_case keys, then unwrapped to the
//! `<method>_return` element.

use crate::error::{DeepSecurityError, Result, SoapErrorKind};
use crate::mapping::{lower_camel_case, snake_case, WireValue};
use indexmap::IndexMap;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

/// Namespace of the manager's web service operations.
pub const MANAGER_NAMESPACE: &str = "urn:Manager";

const SOAP_ENVELOPE_NAMESPACE: &str = "http://schemas.xmlsoap.org/soap/envelope/";

fn envelope_error(message: impl Into<String>) -> DeepSecurityError {
    DeepSecurityError::soap(
        "decoding envelope",
        SoapErrorKind::InvalidEnvelope(message.into()),
    )
}

// ============================================================================
// Requests
// ============================================================================

/// Build the request envelope for `method` (snake_case) with ordered parameters.
pub fn build_request(method: &str, params: &[(&str, WireValue)]) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    let operation = lower_camel_case(method);

    let envelope = BytesStart::new("soapenv:Envelope").with_attributes([
        ("xmlns:soapenv", SOAP_ENVELOPE_NAMESPACE),
        ("xmlns:man", MANAGER_NAMESPACE),
    ]);
    write(&mut writer, Event::Start(envelope))?;
    write(&mut writer, Event::Empty(BytesStart::new("soapenv:Header")))?;
    write(&mut writer, Event::Start(BytesStart::new("soapenv:Body")))?;

    let operation_tag = format!("man:{operation}");
    write(&mut writer, Event::Start(BytesStart::new(operation_tag.as_str())))?;
    for (name, value) in params {
        write_element(&mut writer, name, value)?;
    }
    write(&mut writer, Event::End(BytesEnd::new(operation_tag.as_str())))?;

    write(&mut writer, Event::End(BytesEnd::new("soapenv:Body")))?;
    write(&mut writer, Event::End(BytesEnd::new("soapenv:Envelope")))?;

    String::from_utf8(writer.into_inner()).map_err(|e| envelope_error(e.to_string()))
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| envelope_error(format!("writing request: {e}")))
}

fn write_element(writer: &mut Writer<Vec<u8>>, name: &str, value: &WireValue) -> Result<()> {
    match value {
        WireValue::Nil => Ok(()),
        WireValue::Text(text) => {
            write(writer, Event::Start(BytesStart::new(name)))?;
            write(writer, Event::Text(BytesText::new(text)))?;
            write(writer, Event::End(BytesEnd::new(name)))
        }
        WireValue::List(items) => {
            for item in items {
                write_element(writer, name, item)?;
            }
            Ok(())
        }
        WireValue::Map(entries) => {
            write(writer, Event::Start(BytesStart::new(name)))?;
            for (key, nested) in entries {
                write_element(writer, key, nested)?;
            }
            write(writer, Event::End(BytesEnd::new(name)))
        }
    }
}

// ============================================================================
// Responses
// ============================================================================

/// One open element while reading a response.
#[derive(Default)]
struct Frame {
    name: String,
    children: IndexMap<String, WireValue>,
    text: String,
    nil: bool,
}

impl Frame {
    fn open(name: String, nil: bool) -> Self {
        Self {
            name,
            nil,
            ..Self::default()
        }
    }

    fn into_value(self) -> WireValue {
        if self.nil {
            WireValue::Nil
        } else if !self.children.is_empty() {
            WireValue::Map(self.children)
        } else if !self.text.is_empty() {
            WireValue::Text(self.text)
        } else {
            WireValue::Nil
        }
    }

    /// Add a child; repeated names collect into a list.
    fn push_child(&mut self, name: String, value: WireValue) {
        match self.children.get_mut(&name) {
            Some(WireValue::List(items)) => items.push(value),
            Some(existing) => {
                let first = std::mem::take(existing);
                *existing = WireValue::List(vec![first, value]);
            }
            None => {
                self.children.insert(name, value);
            }
        }
    }
}

/// Parse a whole XML document into a wire tree keyed by snake_case names.
///
/// Whitespace-only text between elements is dropped; any other text is kept
/// verbatim, surrounding whitespace included.
pub fn parse_document(xml: &str) -> Result<WireValue> {
    let mut reader = Reader::from_str(xml);

    let mut stack = vec![Frame::default()];
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = snake_case(&local_name(e.name().as_ref()));
                stack.push(Frame::open(name, is_nil(e)));
            }
            Ok(Event::Empty(ref e)) => {
                let name = snake_case(&local_name(e.name().as_ref()));
                if let Some(parent) = stack.last_mut() {
                    parent.push_child(name, WireValue::Nil);
                }
            }
            Ok(Event::Text(ref e)) => {
                let text = e
                    .unescape()
                    .map_err(|err| envelope_error(format!("invalid text: {err}")))?;
                if let Some(frame) = stack.last_mut().filter(|_| !text.trim().is_empty()) {
                    frame.text.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::End(_)) => {
                if stack.len() < 2 {
                    return Err(envelope_error("unbalanced end tag"));
                }
                let Some(frame) = stack.pop() else {
                    return Err(envelope_error("unbalanced end tag"));
                };
                let name = frame.name.clone();
                if let Some(parent) = stack.last_mut() {
                    parent.push_child(name, frame.into_value());
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(envelope_error(format!(
                    "error at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    if stack.len() != 1 {
        return Err(envelope_error("unexpected end of document"));
    }
    let document = stack.pop().map(Frame::into_value).unwrap_or_default();
    Ok(document)
}

/// Decode the response of `method` (snake_case) to its `_return` payload.
///
/// Faults become [`SoapErrorKind::Fault`]; a response without a return
/// element (void operations) yields `Nil`.
pub fn parse_response(method: &str, xml: &str) -> Result<WireValue> {
    let mut document = parse_document(xml)?;
    let mut body = document
        .take("envelope")
        .and_then(|mut envelope| envelope.take("body"))
        .ok_or_else(|| envelope_error("missing Envelope/Body"))?;

    if let Some(fault) = body.get("fault") {
        return Err(fault_error(method, fault));
    }

    let response_key = format!("{method}_response");
    let return_key = format!("{method}_return");
    let mut response = body.take(&response_key).ok_or_else(|| {
        DeepSecurityError::soap(
            format!("calling {method}"),
            SoapErrorKind::MissingResponse {
                method: method.to_string(),
            },
        )
    })?;
    Ok(response.take(&return_key).unwrap_or_default())
}

/// Whether `xml` is an envelope carrying a fault.
pub fn is_fault(xml: &str) -> bool {
    parse_document(xml)
        .ok()
        .and_then(|document| {
            document
                .get("envelope")
                .and_then(|envelope| envelope.get("body"))
                .map(|body| body.get("fault").is_some())
        })
        .unwrap_or(false)
}

fn fault_error(method: &str, fault: &WireValue) -> DeepSecurityError {
    let code = fault
        .get("faultcode")
        .and_then(WireValue::as_text)
        .unwrap_or_default()
        .to_string();
    let message = fault
        .get("faultstring")
        .and_then(WireValue::as_text)
        .filter(|text| !text.trim().is_empty())
        .or_else(|| fault.get("detail").and_then(|d| find_text(d, "exception_name")))
        .unwrap_or_default()
        .to_string();
    DeepSecurityError::soap(
        format!("calling {method}"),
        SoapErrorKind::Fault { code, message },
    )
}

/// Depth-first search for a text value under `key`.
fn find_text<'a>(value: &'a WireValue, key: &str) -> Option<&'a str> {
    let map = value.as_map()?;
    if let Some(text) = map.get(key).and_then(WireValue::as_text) {
        return Some(text);
    }
    map.values().find_map(|nested| find_text(nested, key))
}

fn is_nil(start: &BytesStart<'_>) -> bool {
    start
        .attributes()
        .filter_map(std::result::Result::ok)
        .any(|attr| local_name(attr.key.as_ref()) == "nil" && attr.value.as_ref() == b"true")
}

/// Local part of a qualified XML name.
fn local_name(name: &[u8]) -> String {
    let name = String::from_utf8_lossy(name);
    name.rfind(':')
        .map_or_else(|| name.to_string(), |idx| name[idx + 1..].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><soapenv:Body>{body}</soapenv:Body></soapenv:Envelope>"#
        )
    }

    #[test]
    fn test_build_request() {
        let params = [
            ("hostFilter", WireValue::map([("type", "ALL_HOSTS".into())])),
            ("hostDetailLevel", "LOW".into()),
            ("skipped", WireValue::Nil),
            ("sID", "a&b".into()),
        ];
        let xml = build_request("host_detail_retrieve", &params).unwrap();
        assert!(xml.contains(r#"xmlns:man="urn:Manager""#));
        assert!(xml.contains("<man:hostDetailRetrieve>"));
        assert!(xml.contains("<hostFilter><type>ALL_HOSTS</type></hostFilter>"));
        assert!(xml.contains("<hostDetailLevel>LOW</hostDetailLevel>"));
        assert!(xml.contains("<sID>a&amp;b</sID>"));
        assert!(!xml.contains("skipped"));
        let filter_at = xml.find("hostFilter").unwrap();
        let sid_at = xml.find("sID").unwrap();
        assert!(filter_at < sid_at);
    }

    #[test]
    fn test_build_request_repeats_lists() {
        let params = [(
            "ids",
            WireValue::map([("item", WireValue::List(vec!["1".into(), "2".into()]))]),
        )];
        let xml = build_request("do_it", &params).unwrap();
        assert!(xml.contains("<ids><item>1</item><item>2</item></ids>"));
    }

    #[test]
    fn test_parse_response_unwraps_return() {
        let xml = envelope(
            "<ns1:getApiVersionResponse xmlns:ns1=\"urn:Manager\"><ns1:getApiVersionReturn>5</ns1:getApiVersionReturn></ns1:getApiVersionResponse>",
        );
        assert_eq!(parse_response("get_api_version", &xml).unwrap(), WireValue::text("5"));
    }

    #[test]
    fn test_parse_response_collects_repeated_elements() {
        let xml = envelope(
            "<hostRetrieveAllResponse>\
               <hostRetrieveAllReturn><ID>1</ID><name>a</name><hostGroupID xsi:nil=\"true\"/></hostRetrieveAllReturn>\
               <hostRetrieveAllReturn><ID>2</ID><name>b &amp; c</name></hostRetrieveAllReturn>\
             </hostRetrieveAllResponse>",
        );
        let hosts = parse_response("host_retrieve_all", &xml).unwrap();
        let WireValue::List(items) = hosts else {
            panic!("expected a list, got {hosts:?}");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].get("id"), Some(&WireValue::text("1")));
        assert_eq!(items[0].get("host_group_id"), Some(&WireValue::Nil));
        assert_eq!(items[1].get("name"), Some(&WireValue::text("b & c")));
    }

    #[test]
    fn test_void_response_is_nil() {
        let xml = envelope("<endSessionResponse/>");
        assert_eq!(parse_response("end_session", &xml).unwrap(), WireValue::Nil);
    }

    #[test]
    fn test_nil_attribute_wins_over_content() {
        let document =
            parse_document(r#"<a xmlns:xsi="x"><b xsi:nil="true"></b><c>  </c></a>"#).unwrap();
        assert_eq!(document.get("a").and_then(|a| a.get("b")), Some(&WireValue::Nil));
        assert_eq!(document.get("a").and_then(|a| a.get("c")), Some(&WireValue::Nil));
    }

    #[test]
    fn test_fault_string() {
        let xml = envelope(
            "<soapenv:Fault><faultcode>soapenv:Server.userException</faultcode><faultstring>Authentication failed</faultstring></soapenv:Fault>",
        );
        assert!(is_fault(&xml));
        let err = parse_response("authenticate", &xml).unwrap_err();
        assert_eq!(
            err.as_fault(),
            Some(("soapenv:Server.userException", "Authentication failed"))
        );
    }

    #[test]
    fn test_blank_fault_string_uses_exception_name() {
        let xml = envelope(
            "<soapenv:Fault><faultcode>Server</faultcode><faultstring></faultstring><detail><ns1:exceptionName xmlns:ns1=\"urn:x\">com.thirdbrigade.manager.core.AuthenticationException</ns1:exceptionName></detail></soapenv:Fault>",
        );
        let err = parse_response("authenticate", &xml).unwrap_err();
        assert_eq!(
            err.as_fault().map(|(_, message)| message),
            Some("com.thirdbrigade.manager.core.AuthenticationException")
        );
    }

    #[test]
    fn test_text_whitespace_is_kept() {
        let xml = envelope(
            "<hostRetrieveResponse>\n  <hostRetrieveReturn>\n    <name>  padded name </name>\n    \
             <description> a &amp; b\n</description>\n  </hostRetrieveReturn>\n</hostRetrieveResponse>",
        );
        let host = parse_response("host_retrieve", &xml).unwrap();
        assert_eq!(host.get("name"), Some(&WireValue::text("  padded name ")));
        assert_eq!(host.get("description"), Some(&WireValue::text(" a & b\n")));
        assert_eq!(host.as_map().map(|fields| fields.len()), Some(2));
    }

    #[test]
    fn test_malformed_documents() {
        assert!(parse_response("x", "<not-soap>").is_err());
        assert!(parse_response("x", "<a><b></a>").is_err());
        assert!(parse_response("x", &envelope("<otherResponse/>")).is_err());
        assert!(!is_fault("garbage"));
    }
}

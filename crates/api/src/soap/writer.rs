use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::SOAP11_ENV_NS;
use super::envelope::EnvelopeError;

const ENV_PREFIX: &str = "SOAP-ENV";

/// SOAP 1.1 fault codes used by this service.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FaultCode {
    Client,
    Server,
    VersionMismatch,
}

impl FaultCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FaultCode::Client => "SOAP-ENV:Client",
            FaultCode::Server => "SOAP-ENV:Server",
            FaultCode::VersionMismatch => "SOAP-ENV:VersionMismatch",
        }
    }
}

/// Thin wrapper over `quick_xml::Writer` with element-level helpers.
///
/// Text and attribute values are escaped by the writer.
pub struct XmlOut {
    writer: Writer<Vec<u8>>,
}

impl XmlOut {
    fn new() -> Self {
        Self {
            writer: Writer::new(Vec::new()),
        }
    }

    fn emit(&mut self, event: Event<'_>) -> Result<(), EnvelopeError> {
        self.writer
            .write_event(event)
            .map_err(|e| EnvelopeError::Encode(e.to_string()))
    }

    pub fn start(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), EnvelopeError> {
        let mut start = BytesStart::new(name);
        for &(key, value) in attributes {
            start.push_attribute((key, value));
        }
        self.emit(Event::Start(start))
    }

    pub fn end(&mut self, name: &str) -> Result<(), EnvelopeError> {
        self.emit(Event::End(BytesEnd::new(name)))
    }

    pub fn empty(&mut self, name: &str) -> Result<(), EnvelopeError> {
        self.emit(Event::Empty(BytesStart::new(name)))
    }

    /// `<name>text</name>`
    pub fn text_element(&mut self, name: &str, text: &str) -> Result<(), EnvelopeError> {
        self.start(name, &[])?;
        self.emit(Event::Text(BytesText::new(text)))?;
        self.end(name)
    }

    fn finish(self) -> Result<String, EnvelopeError> {
        String::from_utf8(self.writer.into_inner()).map_err(|e| EnvelopeError::Encode(e.to_string()))
    }
}

/// Wrap a body payload in a SOAP 1.1 envelope with an empty header.
pub fn encode_envelope<F>(body: F) -> Result<String, EnvelopeError>
where
    F: FnOnce(&mut XmlOut) -> Result<(), EnvelopeError>,
{
    let envelope = format!("{ENV_PREFIX}:Envelope");
    let header = format!("{ENV_PREFIX}:Header");
    let body_name = format!("{ENV_PREFIX}:Body");
    let ns_attr = format!("xmlns:{ENV_PREFIX}");

    let mut out = XmlOut::new();
    out.emit(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    out.start(&envelope, &[(ns_attr.as_str(), SOAP11_ENV_NS)])?;
    out.empty(&header)?;
    out.start(&body_name, &[])?;
    body(&mut out)?;
    out.end(&body_name)?;
    out.end(&envelope)?;
    out.finish()
}

/// Encode a SOAP 1.1 fault envelope.
pub fn encode_fault(code: FaultCode, message: &str) -> Result<String, EnvelopeError> {
    let fault = format!("{ENV_PREFIX}:Fault");
    encode_envelope(|out| {
        out.start(&fault, &[])?;
        out.text_element("faultcode", code.as_str())?;
        out.start("faultstring", &[("xml:lang", "en")])?;
        out.emit(Event::Text(BytesText::new(message)))?;
        out.end("faultstring")?;
        out.end(&fault)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soap::envelope::parse_envelope;

    #[test]
    fn envelope_wraps_body_payload() {
        let xml = encode_envelope(|out| {
            out.start("ns2:Ping", &[("xmlns:ns2", "urn:test")])?;
            out.text_element("ns2:value", "a < b & c")?;
            out.end("ns2:Ping")
        })
        .unwrap();

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains("<SOAP-ENV:Header/>"));
        assert!(xml.contains("<ns2:value>a &lt; b &amp; c</ns2:value>"));

        // Our own output is a valid envelope for our own parser.
        let parsed = parse_envelope(&xml).unwrap();
        let payload = parsed.payload().unwrap();
        assert!(payload.is("urn:test", "Ping"));
        assert_eq!(payload.child_by_local_name("value").unwrap().text, "a < b & c");
    }

    #[test]
    fn fault_carries_code_and_message() {
        let xml = encode_fault(FaultCode::Client, "No WS-Security header found").unwrap();
        let parsed = parse_envelope(&xml).unwrap();
        let fault = parsed.payload().unwrap();
        assert!(fault.is(SOAP11_ENV_NS, "Fault"));
        assert_eq!(fault.child_by_local_name("faultcode").unwrap().text, "SOAP-ENV:Client");
        let faultstring = fault.child_by_local_name("faultstring").unwrap();
        assert_eq!(faultstring.text, "No WS-Security header found");
        assert_eq!(faultstring.attribute("lang"), Some("en"));
    }

    #[test]
    fn fault_codes_are_prefixed() {
        assert_eq!(FaultCode::Server.as_str(), "SOAP-ENV:Server");
        assert_eq!(FaultCode::VersionMismatch.as_str(), "SOAP-ENV:VersionMismatch");
    }
}

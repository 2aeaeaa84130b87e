use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use thiserror::Error;

use super::{SOAP11_ENV_NS, SOAP12_ENV_NS};

/// Maximum element nesting accepted in an inbound message.
pub const MAX_DEPTH: usize = 32;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("malformed xml: {0}")]
    Xml(String),

    #[error("empty message")]
    Empty,

    #[error("DOCTYPE declarations are not allowed")]
    DocTypeNotAllowed,

    #[error("element nesting exceeds {0} levels")]
    TooDeep(usize),

    #[error("root element is not a SOAP envelope")]
    NotAnEnvelope,

    #[error("SOAP envelope has no Body")]
    MissingBody,

    #[error("unsupported envelope namespace '{0}'")]
    VersionMismatch(String),

    #[error("failed to encode response: {0}")]
    Encode(String),
}

impl EnvelopeError {
    fn xml(err: impl core::fmt::Display) -> Self {
        Self::Xml(err.to_string())
    }
}

/// A parsed XML element with its namespace resolved.
///
/// Namespace declarations are not kept as attributes; other attributes are
/// keyed by local name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub namespace: Option<String>,
    pub local_name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    pub text: String,
}

impl Element {
    /// `{namespace}local` form used in endpoint mapping and diagnostics.
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{{{ns}}}{}", self.local_name),
            None => self.local_name.clone(),
        }
    }

    pub fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.namespace.as_deref() == Some(namespace) && self.local_name == local_name
    }

    /// First child with the given namespace and local name.
    pub fn child(&self, namespace: &str, local_name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.is(namespace, local_name))
    }

    /// First child with the given local name, in any namespace.
    pub fn child_by_local_name(&self, local_name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.local_name == local_name)
    }

    pub fn attribute(&self, local_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == local_name)
            .map(|(_, value)| value.as_str())
    }
}

/// A SOAP 1.1 envelope split into its header and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub header: Option<Element>,
    pub body: Element,
}

impl Envelope {
    /// The first element inside `Body` (the payload root).
    pub fn payload(&self) -> Option<&Element> {
        self.body.children.first()
    }
}

/// Parse and structurally validate a SOAP 1.1 envelope.
pub fn parse_envelope(xml: &str) -> Result<Envelope, EnvelopeError> {
    let mut root = parse_document(xml)?;

    if root.local_name != "Envelope" {
        return Err(EnvelopeError::NotAnEnvelope);
    }
    match root.namespace.as_deref() {
        Some(SOAP11_ENV_NS) => {}
        Some(SOAP12_ENV_NS) => {
            return Err(EnvelopeError::VersionMismatch(SOAP12_ENV_NS.to_string()));
        }
        _ => return Err(EnvelopeError::NotAnEnvelope),
    }

    let mut header = None;
    let mut body = None;
    for child in root.children.drain(..) {
        if child.is(SOAP11_ENV_NS, "Header") && header.is_none() {
            header = Some(child);
        } else if child.is(SOAP11_ENV_NS, "Body") && body.is_none() {
            body = Some(child);
        }
    }

    Ok(Envelope {
        header,
        body: body.ok_or(EnvelopeError::MissingBody)?,
    })
}

/// Parse a whole document into an element tree.
///
/// Rejects DOCTYPE declarations (no entity expansion is ever attempted) and
/// nesting deeper than [`MAX_DEPTH`].
pub fn parse_document(xml: &str) -> Result<Element, EnvelopeError> {
    let mut reader = NsReader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let (ns, event) = reader.read_resolved_event().map_err(EnvelopeError::xml)?;
        match event {
            Event::Start(start) => {
                if stack.len() >= MAX_DEPTH {
                    return Err(EnvelopeError::TooDeep(MAX_DEPTH));
                }
                let element = element_from_start(ns, &start)?;
                if root.is_some() && stack.is_empty() {
                    return Err(EnvelopeError::Xml("multiple root elements".to_string()));
                }
                stack.push(element);
            }
            Event::Empty(start) => {
                if stack.len() >= MAX_DEPTH {
                    return Err(EnvelopeError::TooDeep(MAX_DEPTH));
                }
                let element = element_from_start(ns, &start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| EnvelopeError::Xml("unexpected closing tag".to_string()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(EnvelopeError::xml)?;
                match stack.last_mut() {
                    Some(current) => current.text.push_str(&text),
                    None if text.trim().is_empty() => {}
                    None => return Err(EnvelopeError::Xml("text outside root element".to_string())),
                }
            }
            Event::CData(data) => {
                let data = std::str::from_utf8(&data).map_err(EnvelopeError::xml)?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(data);
                }
            }
            Event::DocType(_) => return Err(EnvelopeError::DocTypeNotAllowed),
            Event::Eof => break,
            // Declarations, comments, processing instructions.
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(EnvelopeError::Xml("unexpected end of document".to_string()));
    }
    root.ok_or(EnvelopeError::Empty)
}

fn element_from_start(ns: ResolveResult<'_>, start: &BytesStart<'_>) -> Result<Element, EnvelopeError> {
    let namespace = match ns {
        ResolveResult::Bound(ns) => Some(utf8(ns.as_ref())?.to_string()),
        ResolveResult::Unbound => None,
        ResolveResult::Unknown(prefix) => {
            return Err(EnvelopeError::Xml(format!(
                "unbound namespace prefix '{}'",
                String::from_utf8_lossy(&prefix)
            )));
        }
    };

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(EnvelopeError::xml)?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let name = utf8(attr.key.local_name().as_ref())?.to_string();
        let value = attr.unescape_value().map_err(EnvelopeError::xml)?.into_owned();
        attributes.push((name, value));
    }

    Ok(Element {
        namespace,
        local_name: utf8(start.local_name().as_ref())?.to_string(),
        attributes,
        children: Vec::new(),
        text: String::new(),
    })
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), EnvelopeError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(EnvelopeError::Xml("multiple root elements".to_string())),
    }
    Ok(())
}

fn utf8(bytes: &[u8]) -> Result<&str, EnvelopeError> {
    std::str::from_utf8(bytes).map_err(EnvelopeError::xml)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GET_BOOK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/"
                  xmlns:cat="http://globalbooks.com/catalog">
  <soapenv:Header/>
  <soapenv:Body>
    <cat:GetBookRequest>
      <cat:isbn>978-0596009205</cat:isbn>
    </cat:GetBookRequest>
  </soapenv:Body>
</soapenv:Envelope>"#;

    #[test]
    fn parses_header_body_and_payload() {
        let envelope = parse_envelope(GET_BOOK).unwrap();
        assert!(envelope.header.is_some());

        let payload = envelope.payload().unwrap();
        assert_eq!(
            payload.qualified_name(),
            "{http://globalbooks.com/catalog}GetBookRequest"
        );
        assert_eq!(payload.child_by_local_name("isbn").unwrap().text, "978-0596009205");
    }

    #[test]
    fn default_namespace_applies_to_unprefixed_children() {
        let xml = r#"<Envelope xmlns="http://schemas.xmlsoap.org/soap/envelope/"><Body><SearchBooksRequest xmlns="http://globalbooks.com/catalog"><keyword>java</keyword></SearchBooksRequest></Body></Envelope>"#;
        let envelope = parse_envelope(xml).unwrap();
        assert!(envelope.header.is_none());
        let payload = envelope.payload().unwrap();
        assert!(payload.is("http://globalbooks.com/catalog", "SearchBooksRequest"));
        assert!(payload.child("http://globalbooks.com/catalog", "keyword").is_some());
    }

    #[test]
    fn unescapes_text_and_attributes() {
        let xml = r#"<a x="1 &amp; 2"><b>Tom &amp; Jerry</b><c><![CDATA[<raw>]]></c></a>"#;
        let root = parse_document(xml).unwrap();
        assert_eq!(root.attribute("x"), Some("1 & 2"));
        assert_eq!(root.child_by_local_name("b").unwrap().text, "Tom & Jerry");
        assert_eq!(root.child_by_local_name("c").unwrap().text, "<raw>");
    }

    #[test]
    fn namespace_declarations_are_not_attributes() {
        let root = parse_document(r#"<a xmlns="urn:x" xmlns:p="urn:p" p:k="v"/>"#).unwrap();
        assert_eq!(root.namespace.as_deref(), Some("urn:x"));
        assert_eq!(root.attributes, vec![("k".to_string(), "v".to_string())]);
    }

    #[test]
    fn rejects_doctype() {
        let xml = r#"<?xml version="1.0"?><!DOCTYPE foo [<!ENTITY xxe SYSTEM "file:///etc/passwd">]><foo>&xxe;</foo>"#;
        assert_eq!(parse_document(xml), Err(EnvelopeError::DocTypeNotAllowed));
    }

    #[test]
    fn rejects_excessive_nesting() {
        let depth = MAX_DEPTH + 1;
        let xml = format!("{}{}", "<a>".repeat(depth), "</a>".repeat(depth));
        assert_eq!(parse_document(&xml), Err(EnvelopeError::TooDeep(MAX_DEPTH)));

        let ok = format!("{}{}", "<a>".repeat(MAX_DEPTH), "</a>".repeat(MAX_DEPTH));
        assert!(parse_document(&ok).is_ok());
    }

    #[test]
    fn rejects_malformed_documents() {
        assert_eq!(parse_document(""), Err(EnvelopeError::Empty));
        assert!(matches!(parse_document("<a><b></a>"), Err(EnvelopeError::Xml(_))));
        assert!(matches!(parse_document("<a>"), Err(EnvelopeError::Xml(_))));
        assert!(matches!(parse_document("<a/><b/>"), Err(EnvelopeError::Xml(_))));
        assert!(matches!(parse_document("<p:a/>"), Err(EnvelopeError::Xml(_))));
    }

    #[test]
    fn rejects_non_envelopes_and_missing_body() {
        assert_eq!(parse_envelope("<Envelope/>"), Err(EnvelopeError::NotAnEnvelope));
        assert_eq!(
            parse_envelope(r#"<s:Message xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"/>"#),
            Err(EnvelopeError::NotAnEnvelope)
        );
        assert_eq!(
            parse_envelope(r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Header/></s:Envelope>"#),
            Err(EnvelopeError::MissingBody)
        );
    }

    #[test]
    fn soap12_is_a_version_mismatch() {
        let xml = r#"<s:Envelope xmlns:s="http://www.w3.org/2003/05/soap-envelope"><s:Body/></s:Envelope>"#;
        assert_eq!(
            parse_envelope(xml),
            Err(EnvelopeError::VersionMismatch(SOAP12_ENV_NS.to_string()))
        );
    }
}

//! SOAP 1.1 envelope codec.
//!
//! - `envelope.rs`: namespace-aware parsing into a small element tree
//! - `writer.rs`: response and fault encoding

pub mod envelope;
pub mod writer;

pub use envelope::{Element, Envelope, EnvelopeError, parse_envelope};
pub use writer::{FaultCode, XmlOut, encode_envelope, encode_fault};

/// SOAP 1.1 envelope namespace.
pub const SOAP11_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// SOAP 1.2 envelope namespace (recognized only to report a version mismatch).
pub const SOAP12_ENV_NS: &str = "http://www.w3.org/2003/05/soap-envelope";

/// Content type of every SOAP 1.1 message and of the WSDL.
pub const CONTENT_TYPE: &str = "text/xml; charset=utf-8";

//! SOAP transport for the book catalog: server, routing, envelope codec,
//! WS-Security and request/response mapping.

pub mod app;
pub mod config;
pub mod middleware;
pub mod security;
pub mod soap;

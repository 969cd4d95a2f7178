//! Data Transfer Objects
//!
//! Request bodies and query strings accepted by the HTTP API. Responses are
//! the domain entities themselves.

pub mod request;

pub use request::*;

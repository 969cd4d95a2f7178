//! HTTP Presentation
//!
//! Handlers, extractors and route composition.

pub mod extractors;
pub mod handlers;
pub mod routes;

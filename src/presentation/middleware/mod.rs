//! Middleware
//!
//! Tower middleware for request processing.

pub mod logging;
pub mod recover;

pub use logging::{client_ip, create_trace_layer, log_request};
pub use recover::recover_layer;

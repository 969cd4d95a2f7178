//! HTTP Handlers
//!
//! One delivery per domain. Each exposes `routes(usecase)` returning a
//! router with its usecase already bound as state.

pub mod forum;
pub mod post;
pub mod service;
pub mod thread;
pub mod user;

//! # Domain Layer
//!
//! The domain layer contains the core types of the forum backend.
//! It is independent of any external frameworks or infrastructure concerns.
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Repository traits define data access contracts
//! - Entities are plain data; rules live in the application layer

pub mod entities;

pub use entities::*;

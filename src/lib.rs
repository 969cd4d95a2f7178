//! # Forum Server Library
//!
//! HTTP backend for a discussion forum: users, forums, threads with votes,
//! and tree-structured posts stored in PostgreSQL.
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Entities and repository traits
//! - **Application Layer**: Usecases and request DTOs
//! - **Infrastructure Layer**: PostgreSQL repositories, pool and metrics
//! - **Presentation Layer**: HTTP handlers and middleware
//!
//! ## Module Structure
//!
//! ```text
//! forum_server/
//! +-- config/         Configuration management
//! +-- domain/         Entities and repository traits
//! +-- application/    Usecases and DTOs
//! +-- infrastructure/ Database, repositories and metrics
//! +-- presentation/   HTTP routes and middleware
//! +-- shared/         Errors and validation helpers
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Usecases
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Composition root
pub mod startup;

// Telemetry and observability
pub mod telemetry;

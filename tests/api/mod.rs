//! REST API tests

mod recovery_tests;
mod service_tests;
mod startup_tests;

//! Application Usecases
//!
//! Business rules, one usecase per domain.
//!
//! ## Available Usecases
//!
//! - **UserUsecase**: Registration and profiles
//! - **ForumUsecase**: Forums and their participants
//! - **ThreadUsecase**: Threads, votes and forum thread listings
//! - **PostUsecase**: Post batches, details and thread post listings
//! - **ServiceUsecase**: Status counts and full data reset
//!
//! Usecases that need another domain's data take that domain's repository,
//! never its usecase.

pub mod forum_usecase;
pub mod post_usecase;
pub mod service_usecase;
pub mod thread_usecase;
pub mod user_usecase;

pub use forum_usecase::{ForumError, ForumUsecase, ForumUsecaseImpl};
pub use post_usecase::{PostError, PostUsecase, PostUsecaseImpl};
pub use service_usecase::{ServiceUsecase, ServiceUsecaseImpl};
pub use thread_usecase::{CreateThreadDto, ThreadError, ThreadUsecase, ThreadUsecaseImpl};
pub use user_usecase::{UserError, UserUsecase, UserUsecaseImpl};

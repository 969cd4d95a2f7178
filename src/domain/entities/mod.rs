//! # Domain Entities
//!
//! Core domain entities of the forum. All entities map directly to their
//! corresponding database tables.
//!
//! - **User**: forum member identified by a case-insensitive nickname
//! - **Forum**: top-level board owned by a user
//! - **Thread**: discussion inside a forum, addressable by id or slug
//! - **Post**: message inside a thread, arranged as a tree
//! - **ServiceStatus**: row counts used by the maintenance endpoints
//!
//! ## Repository Traits
//!
//! Each entity has an associated repository trait defining data access operations.
//! These traits are implemented in the infrastructure layer, following the
//! dependency inversion principle.

mod forum;
mod post;
mod service_status;
mod thread;
mod user;

pub use forum::{Forum, ForumRepository, NewForum};
pub use post::{NewPost, Post, PostFull, PostListQuery, PostRelated, PostRepository, PostSort};
pub use service_status::{ServiceRepository, ServiceStatus};
pub use thread::{NewThread, Thread, ThreadListQuery, ThreadRef, ThreadRepository, ThreadUpdate, Vote};
pub use user::{ForumUsersQuery, User, UserRepository, UserUpdate};

#[cfg(test)]
pub use forum::MockForumRepository;
#[cfg(test)]
pub use post::MockPostRepository;
#[cfg(test)]
pub use service_status::MockServiceRepository;
#[cfg(test)]
pub use thread::MockThreadRepository;
#[cfg(test)]
pub use user::MockUserRepository;

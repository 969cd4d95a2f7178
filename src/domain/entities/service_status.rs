//! Service status snapshot and the maintenance repository trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Row counts of every domain table, taken from one consistent snapshot.
///
/// Built fresh on every query and never mutated afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub user: i64,
    pub forum: i64,
    pub thread: i64,
    pub post: i64,
}

impl ServiceStatus {
    /// True when every counted table is empty.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Backend-wide maintenance operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    /// Delete all domain data in a single atomic statement.
    async fn clear_data(&self) -> Result<(), AppError>;

    /// Count the rows of every domain table.
    async fn select_status(&self) -> Result<ServiceStatus, AppError>;
}

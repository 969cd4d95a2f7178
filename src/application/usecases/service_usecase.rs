//! Service Usecase
//!
//! Backend-wide maintenance: aggregate status and full data reset.
//!
//! Both operations map one-to-one onto the repository. Nothing is retried,
//! cached, validated or wrapped, so a storage error reaches the caller as is.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{ServiceRepository, ServiceStatus};
use crate::shared::error::AppError;

/// Service usecase trait
#[async_trait]
pub trait ServiceUsecase: Send + Sync {
    /// Delete all persisted domain data.
    async fn clear_data(&self) -> Result<(), AppError>;

    /// Current row counts of every domain.
    async fn select_status(&self) -> Result<ServiceStatus, AppError>;
}

/// ServiceUsecase implementation
pub struct ServiceUsecaseImpl<R>
where
    R: ServiceRepository,
{
    service_repo: Arc<R>,
}

impl<R> ServiceUsecaseImpl<R>
where
    R: ServiceRepository,
{
    pub fn new(service_repo: Arc<R>) -> Self {
        Self { service_repo }
    }
}

#[async_trait]
impl<R> ServiceUsecase for ServiceUsecaseImpl<R>
where
    R: ServiceRepository + 'static,
{
    async fn clear_data(&self) -> Result<(), AppError> {
        self.service_repo.clear_data().await
    }

    async fn select_status(&self) -> Result<ServiceStatus, AppError> {
        self.service_repo.select_status().await
    }
}

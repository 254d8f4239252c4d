//! Port for school persistence.

use async_trait::async_trait;

use crate::domain::{
    NewSchool, School, SchoolChanges, SchoolFilter, SchoolId, SchoolStats, SchoolStatus,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by school repository adapters.
    pub enum SchoolRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "school repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "school repository query failed: {message}",
    }
}

/// Storage operations over the school roster.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SchoolRepository: Send + Sync {
    /// Schools matching `filter`, in insertion order.
    async fn list(&self, filter: &SchoolFilter) -> Result<Vec<School>, SchoolRepositoryError>;

    async fn find_by_id(&self, id: &SchoolId) -> Result<Option<School>, SchoolRepositoryError>;

    /// Insert a school and return it with its generated id.
    async fn create(&self, school: &NewSchool) -> Result<School, SchoolRepositoryError>;

    /// Apply `changes`; `None` when no school has `id`.
    async fn update(
        &self,
        id: &SchoolId,
        changes: &SchoolChanges,
    ) -> Result<Option<School>, SchoolRepositoryError>;

    /// Set the status only; `false` when no school has `id`.
    async fn update_status(
        &self,
        id: &SchoolId,
        status: SchoolStatus,
    ) -> Result<bool, SchoolRepositoryError>;

    /// Remove a school; `false` when no school has `id`.
    async fn delete(&self, id: &SchoolId) -> Result<bool, SchoolRepositoryError>;

    /// Counts across the whole roster, ignoring any filter.
    async fn status_counts(&self) -> Result<SchoolStats, SchoolRepositoryError>;
}

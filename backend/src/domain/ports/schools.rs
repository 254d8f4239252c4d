//! Driving ports for reading and changing the school roster.

use async_trait::async_trait;

use crate::domain::{
    Error, School, SchoolChanges, SchoolDraft, SchoolFilter, SchoolId, SchoolStats, SchoolStatus,
    SortState,
};

/// Read-side school use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SchoolsQuery: Send + Sync {
    /// Filtered listing, ordered by `sort` when given.
    async fn list(&self, filter: SchoolFilter, sort: Option<SortState>)
    -> Result<Vec<School>, Error>;

    /// Status counts over every school.
    async fn stats(&self) -> Result<SchoolStats, Error>;

    /// A single school; `not_found` when absent.
    async fn get(&self, id: &SchoolId) -> Result<School, Error>;
}

/// Write-side school use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SchoolsCommand: Send + Sync {
    /// Register a school, generating defaults for omitted fields.
    async fn create(&self, draft: SchoolDraft) -> Result<School, Error>;

    async fn update(&self, id: &SchoolId, changes: SchoolChanges) -> Result<School, Error>;

    async fn update_status(&self, id: &SchoolId, status: SchoolStatus) -> Result<(), Error>;

    async fn delete(&self, id: &SchoolId) -> Result<(), Error>;
}

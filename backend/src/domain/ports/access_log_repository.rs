//! Port for the remote access audit trail.
//!
//! Entries are append-only and outlive the school they refer to.

use async_trait::async_trait;

use crate::domain::{AccessLog, NewAccessLog};

use super::define_port_error;

define_port_error! {
    /// Errors raised by access log repository adapters.
    pub enum AccessLogRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "access log repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "access log repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccessLogRepository: Send + Sync {
    async fn append(&self, entry: &NewAccessLog) -> Result<AccessLog, AccessLogRepositoryError>;

    /// Newest entries first, at most `limit` of them.
    async fn recent(&self, limit: u32) -> Result<Vec<AccessLog>, AccessLogRepositoryError>;
}

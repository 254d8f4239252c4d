//! Driving port for access logs and QR scans recorded in the field.

use async_trait::async_trait;

use crate::domain::{AccessLog, Error, QrScan, SchoolId, UserId};

/// Access log entry as submitted; the service stamps the time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessLogRequest {
    pub school_id: SchoolId,
    pub user_id: Option<UserId>,
    pub user: String,
    pub action: String,
    pub details: Option<String>,
    pub ip_address: Option<String>,
}

/// QR scan as submitted; the service stamps the time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrScanRequest {
    pub school_id: SchoolId,
    pub looma_id: String,
    pub staff_name: String,
    pub notes: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FieldActivity: Send + Sync {
    async fn record_access(&self, request: AccessLogRequest) -> Result<AccessLog, Error>;

    async fn recent_access(&self, limit: u32) -> Result<Vec<AccessLog>, Error>;

    async fn record_scan(&self, request: QrScanRequest) -> Result<QrScan, Error>;

    async fn recent_scans(&self, limit: u32) -> Result<Vec<QrScan>, Error>;
}

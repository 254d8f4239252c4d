//! Port for recorded QR scans.

use async_trait::async_trait;

use crate::domain::{NewQrScan, QrScan};

use super::define_port_error;

define_port_error! {
    /// Errors raised by QR scan repository adapters.
    pub enum QrScanRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "qr scan repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "qr scan repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QrScanRepository: Send + Sync {
    async fn append(&self, scan: &NewQrScan) -> Result<QrScan, QrScanRepositoryError>;

    /// Newest scans first, at most `limit` of them.
    async fn recent(&self, limit: u32) -> Result<Vec<QrScan>, QrScanRepositoryError>;
}

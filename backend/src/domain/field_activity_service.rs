//! Records and lists field activity: remote access actions and QR scans.
//!
//! New entries must name an existing school. Once written they are never
//! touched again, even when that school is later deleted.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    AccessLogRepository, AccessLogRequest, FieldActivity, QrScanRepository, QrScanRequest,
    SchoolRepository,
};
use crate::domain::repository_errors::{
    map_access_log_error, map_qr_scan_error, map_school_error,
};
use crate::domain::{AccessLog, Error, NewAccessLog, NewQrScan, QrScan, SchoolId};

#[derive(Clone)]
pub struct FieldActivityService<S, A, Q> {
    schools: Arc<S>,
    access_logs: Arc<A>,
    qr_scans: Arc<Q>,
    clock: Arc<dyn Clock>,
}

impl<S, A, Q> FieldActivityService<S, A, Q> {
    pub fn new(
        schools: Arc<S>,
        access_logs: Arc<A>,
        qr_scans: Arc<Q>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            schools,
            access_logs,
            qr_scans,
            clock,
        }
    }
}

impl<S, A, Q> FieldActivityService<S, A, Q>
where
    S: SchoolRepository,
{
    async fn require_school(&self, id: &SchoolId) -> Result<(), Error> {
        match self.schools.find_by_id(id).await.map_err(map_school_error)? {
            Some(_) => Ok(()),
            None => Err(Error::not_found(format!("school {id} not found"))),
        }
    }
}

#[async_trait]
impl<S, A, Q> FieldActivity for FieldActivityService<S, A, Q>
where
    S: SchoolRepository,
    A: AccessLogRepository,
    Q: QrScanRepository,
{
    async fn record_access(&self, request: AccessLogRequest) -> Result<AccessLog, Error> {
        let AccessLogRequest {
            school_id,
            user_id,
            user,
            action,
            details,
            ip_address,
        } = request;
        self.require_school(&school_id).await?;
        let entry = NewAccessLog {
            school_id,
            user_id,
            user,
            action,
            details,
            ip_address,
            timestamp: self.clock.utc(),
        };
        let log = self
            .access_logs
            .append(&entry)
            .await
            .map_err(map_access_log_error)?;
        info!(school_id = %log.school_id, action = %log.action, user = %log.user, "access recorded");
        Ok(log)
    }

    async fn recent_access(&self, limit: u32) -> Result<Vec<AccessLog>, Error> {
        self.access_logs
            .recent(limit)
            .await
            .map_err(map_access_log_error)
    }

    async fn record_scan(&self, request: QrScanRequest) -> Result<QrScan, Error> {
        let QrScanRequest {
            school_id,
            looma_id,
            staff_name,
            notes,
        } = request;
        self.require_school(&school_id).await?;
        let scan = NewQrScan {
            school_id,
            looma_id,
            staff_name,
            notes,
            timestamp: self.clock.utc(),
        };
        let scan = self
            .qr_scans
            .append(&scan)
            .await
            .map_err(map_qr_scan_error)?;
        info!(school_id = %scan.school_id, looma_id = %scan.looma_id, "qr scan recorded");
        Ok(scan)
    }

    async fn recent_scans(&self, limit: u32) -> Result<Vec<QrScan>, Error> {
        self.qr_scans.recent(limit).await.map_err(map_qr_scan_error)
    }
}

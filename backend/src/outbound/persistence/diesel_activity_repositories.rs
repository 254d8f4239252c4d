//! PostgreSQL-backed access log and QR scan repositories.
//!
//! Neither table carries a foreign key to `schools`, so rows survive the
//! deletion of the school they mention.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{
    AccessLogRepository, AccessLogRepositoryError, QrScanRepository, QrScanRepositoryError,
};
use crate::domain::{AccessLog, NewAccessLog, NewQrScan, QrScan};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{AccessLogRow, NewAccessLogRow, NewQrScanRow, QrScanRow};
use super::pool::{DbPool, PoolError};
use super::schema::{access_logs, qr_scans};

fn limit_to_i64(limit: u32) -> i64 {
    i64::from(limit)
}

#[derive(Clone)]
pub struct DieselAccessLogRepository {
    pool: DbPool,
}

impl DieselAccessLogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_access_pool_error(error: PoolError) -> AccessLogRepositoryError {
    map_basic_pool_error(error, AccessLogRepositoryError::connection)
}

fn map_access_diesel_error(error: diesel::result::Error) -> AccessLogRepositoryError {
    map_basic_diesel_error(
        error,
        AccessLogRepositoryError::query,
        AccessLogRepositoryError::connection,
    )
}

#[async_trait]
impl AccessLogRepository for DieselAccessLogRepository {
    async fn append(&self, entry: &NewAccessLog) -> Result<AccessLog, AccessLogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_access_pool_error)?;
        let row: AccessLogRow = diesel::insert_into(access_logs::table)
            .values(NewAccessLogRow::from(entry))
            .returning(AccessLogRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_access_diesel_error)?;
        Ok(row.into())
    }

    async fn recent(&self, limit: u32) -> Result<Vec<AccessLog>, AccessLogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_access_pool_error)?;
        let rows: Vec<AccessLogRow> = access_logs::table
            .select(AccessLogRow::as_select())
            .order_by((access_logs::logged_at.desc(), access_logs::id.desc()))
            .limit(limit_to_i64(limit))
            .load(&mut conn)
            .await
            .map_err(map_access_diesel_error)?;
        Ok(rows.into_iter().map(AccessLog::from).collect())
    }
}

#[derive(Clone)]
pub struct DieselQrScanRepository {
    pool: DbPool,
}

impl DieselQrScanRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_scan_pool_error(error: PoolError) -> QrScanRepositoryError {
    map_basic_pool_error(error, QrScanRepositoryError::connection)
}

fn map_scan_diesel_error(error: diesel::result::Error) -> QrScanRepositoryError {
    map_basic_diesel_error(
        error,
        QrScanRepositoryError::query,
        QrScanRepositoryError::connection,
    )
}

#[async_trait]
impl QrScanRepository for DieselQrScanRepository {
    async fn append(&self, scan: &NewQrScan) -> Result<QrScan, QrScanRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_scan_pool_error)?;
        let row: QrScanRow = diesel::insert_into(qr_scans::table)
            .values(NewQrScanRow::from(scan))
            .returning(QrScanRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_scan_diesel_error)?;
        Ok(row.into())
    }

    async fn recent(&self, limit: u32) -> Result<Vec<QrScan>, QrScanRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_scan_pool_error)?;
        let rows: Vec<QrScanRow> = qr_scans::table
            .select(QrScanRow::as_select())
            .order_by((qr_scans::scanned_at.desc(), qr_scans::id.desc()))
            .limit(limit_to_i64(limit))
            .load(&mut conn)
            .await
            .map_err(map_scan_diesel_error)?;
        Ok(rows.into_iter().map(QrScan::from).collect())
    }
}

//! PostgreSQL-backed `SchoolRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{SchoolRepository, SchoolRepositoryError};
use crate::domain::{
    NewSchool, School, SchoolChanges, SchoolFilter, SchoolId, SchoolStats, SchoolStatus,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewSchoolRow, SchoolChangeset, SchoolRow};
use super::pool::{DbPool, PoolError};
use super::schema::schools;

/// Diesel-backed implementation of the school repository port.
#[derive(Clone)]
pub struct DieselSchoolRepository {
    pool: DbPool,
}

impl DieselSchoolRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SchoolRepositoryError {
    map_basic_pool_error(error, SchoolRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> SchoolRepositoryError {
    map_basic_diesel_error(
        error,
        SchoolRepositoryError::query,
        SchoolRepositoryError::connection,
    )
}

fn row_to_school(row: SchoolRow) -> Result<School, SchoolRepositoryError> {
    row.into_school().map_err(SchoolRepositoryError::query)
}

fn fold_status_count(
    stats: SchoolStats,
    (status, count): (String, i64),
) -> Result<SchoolStats, SchoolRepositoryError> {
    let status = status
        .parse::<SchoolStatus>()
        .map_err(|err| SchoolRepositoryError::query(err.to_string()))?;
    let count = u64::try_from(count).unwrap_or_default();
    debug!(%status, count, "school status count");
    Ok(stats.with_count(status, count))
}

/// Escape `LIKE` metacharacters so user input matches literally.
pub(crate) fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[async_trait]
impl SchoolRepository for DieselSchoolRepository {
    async fn list(&self, filter: &SchoolFilter) -> Result<Vec<School>, SchoolRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = schools::table
            .select(SchoolRow::as_select())
            .order_by((schools::name.asc(), schools::id.asc()))
            .into_boxed();
        if let Some(status) = filter.status() {
            query = query.filter(schools::status.eq(status.as_str()));
        }
        if let Some(province) = filter.province() {
            query = query.filter(schools::province.eq(province.to_owned()));
        }
        if let Some(search) = filter.search() {
            let pattern = like_pattern(search);
            query = query.filter(
                schools::name
                    .ilike(pattern.clone())
                    .or(schools::district.ilike(pattern.clone()))
                    .or(schools::palika.ilike(pattern.clone()))
                    .or(schools::looma_id.ilike(pattern)),
            );
        }

        let rows: Vec<SchoolRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_school).collect()
    }

    async fn find_by_id(&self, id: &SchoolId) -> Result<Option<School>, SchoolRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<SchoolRow> = schools::table
            .find(*id.as_uuid())
            .select(SchoolRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_school).transpose()
    }

    async fn create(&self, school: &NewSchool) -> Result<School, SchoolRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: SchoolRow = diesel::insert_into(schools::table)
            .values(NewSchoolRow::from(school))
            .returning(SchoolRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_school(row)
    }

    async fn update(
        &self,
        id: &SchoolId,
        changes: &SchoolChanges,
    ) -> Result<Option<School>, SchoolRepositoryError> {
        if changes.is_empty() {
            return self.find_by_id(id).await;
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<SchoolRow> = diesel::update(schools::table.find(*id.as_uuid()))
            .set(SchoolChangeset::from(changes))
            .returning(SchoolRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_school).transpose()
    }

    async fn update_status(
        &self,
        id: &SchoolId,
        status: SchoolStatus,
    ) -> Result<bool, SchoolRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(schools::table.find(*id.as_uuid()))
            .set(schools::status.eq(status.as_str()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &SchoolId) -> Result<bool, SchoolRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(schools::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn status_counts(&self) -> Result<SchoolStats, SchoolRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(String, i64)> = schools::table
            .group_by(schools::status)
            .select((schools::status, diesel::dsl::count_star()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .try_fold(SchoolStats::default(), fold_status_count)
    }
}

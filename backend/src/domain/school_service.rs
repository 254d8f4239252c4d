//! School roster services implementing the school driving ports.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{SchoolRepository, SchoolsCommand, SchoolsQuery};
use crate::domain::repository_errors::map_school_error;
use crate::domain::{
    Error, School, SchoolChanges, SchoolDraft, SchoolFilter, SchoolId, SchoolStats, SchoolStatus,
    SortState,
};

fn school_not_found(id: &SchoolId) -> Error {
    Error::not_found(format!("school {id} not found"))
}

/// Reads and writes the school roster through a [`SchoolRepository`].
#[derive(Clone)]
pub struct SchoolService<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> SchoolService<R> {
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

#[async_trait]
impl<R> SchoolsQuery for SchoolService<R>
where
    R: SchoolRepository,
{
    async fn list(
        &self,
        filter: SchoolFilter,
        sort: Option<SortState>,
    ) -> Result<Vec<School>, Error> {
        let mut schools = self.repo.list(&filter).await.map_err(map_school_error)?;
        if let Some(sort) = sort {
            sort.sort(&mut schools);
        }
        Ok(schools)
    }

    async fn stats(&self) -> Result<SchoolStats, Error> {
        self.repo.status_counts().await.map_err(map_school_error)
    }

    async fn get(&self, id: &SchoolId) -> Result<School, Error> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(map_school_error)?
            .ok_or_else(|| school_not_found(id))
    }
}

#[async_trait]
impl<R> SchoolsCommand for SchoolService<R>
where
    R: SchoolRepository,
{
    async fn create(&self, draft: SchoolDraft) -> Result<School, Error> {
        let new_school = draft.into_new_school(self.clock.utc(), &mut rand::thread_rng());
        let school = self
            .repo
            .create(&new_school)
            .await
            .map_err(map_school_error)?;
        info!(school_id = %school.id, looma_id = %school.looma_id, "school registered");
        Ok(school)
    }

    async fn update(&self, id: &SchoolId, changes: SchoolChanges) -> Result<School, Error> {
        if changes.is_empty() {
            return self.get(id).await;
        }
        let school = self
            .repo
            .update(id, &changes)
            .await
            .map_err(map_school_error)?
            .ok_or_else(|| school_not_found(id))?;
        info!(school_id = %id, "school updated");
        Ok(school)
    }

    async fn update_status(&self, id: &SchoolId, status: SchoolStatus) -> Result<(), Error> {
        if self
            .repo
            .update_status(id, status)
            .await
            .map_err(map_school_error)?
        {
            info!(school_id = %id, %status, "school status changed");
            Ok(())
        } else {
            Err(school_not_found(id))
        }
    }

    async fn delete(&self, id: &SchoolId) -> Result<(), Error> {
        if self.repo.delete(id).await.map_err(map_school_error)? {
            info!(school_id = %id, "school deleted");
            Ok(())
        } else {
            Err(school_not_found(id))
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockSchoolRepository, SchoolRepositoryError};
    use crate::domain::{SortDirection, SortField};
    use crate::test_support::{MutableClock, fixed_now};
    use rstest::rstest;
    use uuid::Uuid;

    fn service(repo: MockSchoolRepository) -> SchoolService<MockSchoolRepository> {
        SchoolService::new(Arc::new(repo), Arc::new(MutableClock::fixed()))
    }

    fn school(name: &str) -> School {
        SchoolDraft::new(name, "Lumbini", "Rupandehi")
            .expect("draft")
            .into_new_school(fixed_now(), &mut rand::thread_rng())
            .with_id(SchoolId::from_uuid(Uuid::new_v4()))
    }

    #[rstest]
    #[tokio::test]
    async fn create_stamps_clock_time_and_defaults() {
        let mut repo = MockSchoolRepository::new();
        repo.expect_create()
            .withf(|new_school| {
                new_school.last_seen == fixed_now() && new_school.status == SchoolStatus::Offline
            })
            .times(1)
            .returning(|new_school| Ok(new_school.clone().with_id(SchoolId::from_uuid(Uuid::nil()))));

        let draft = SchoolDraft::new("Bal Kalyan", "Lumbini", "Rupandehi").expect("draft");
        let created = service(repo).create(draft).await.expect("create");
        assert_eq!(created.id, SchoolId::from_uuid(Uuid::nil()));
        assert_eq!(created.looma.last_update, fixed_now());
    }

    #[rstest]
    #[tokio::test]
    async fn list_applies_requested_order() {
        let mut repo = MockSchoolRepository::new();
        repo.expect_list()
            .return_once(|_| Ok(vec![school("b"), school("C"), school("a")]));
        let sort = SortState::new(SortField::Name, SortDirection::Desc);
        let schools = service(repo)
            .list(SchoolFilter::default(), Some(sort))
            .await
            .expect("list");
        let names: Vec<_> = schools.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["C", "b", "a"]);
    }

    #[rstest]
    #[case::status(true)]
    #[case::delete(false)]
    #[tokio::test]
    async fn missing_school_is_not_found(#[case] status_update: bool) {
        let mut repo = MockSchoolRepository::new();
        repo.expect_update_status().returning(|_, _| Ok(false));
        repo.expect_delete().returning(|_| Ok(false));
        let service = service(repo);
        let id = SchoolId::from_uuid(Uuid::new_v4());

        let result = if status_update {
            service.update_status(&id, SchoolStatus::Online).await
        } else {
            service.delete(&id).await
        };
        assert_eq!(result.expect_err("missing").code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn empty_update_reads_current_record() {
        let existing = school("Unchanged");
        let id = existing.id;
        let mut repo = MockSchoolRepository::new();
        repo.expect_update().times(0);
        repo.expect_find_by_id()
            .return_once(move |_| Ok(Some(existing)));
        let school = service(repo)
            .update(&id, SchoolChanges::default())
            .await
            .expect("read back");
        assert_eq!(school.name, "Unchanged");
    }

    #[rstest]
    #[tokio::test]
    async fn connection_failure_is_service_unavailable() {
        let mut repo = MockSchoolRepository::new();
        repo.expect_status_counts()
            .return_once(|| Err(SchoolRepositoryError::connection("pool timed out")));
        let err = service(repo).stats().await.expect_err("unavailable");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}

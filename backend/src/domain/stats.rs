//! Status counts shown in the dashboard's overview tiles.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::school::{School, SchoolStatus};

/// Aggregate school counts.
///
/// `total` is always `online + offline + maintenance`. Each school carries one
/// device, so `devices` equals `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SchoolStats {
    pub total: u64,
    pub online: u64,
    pub offline: u64,
    pub maintenance: u64,
    pub devices: u64,
    /// Share of online schools, rounded to the nearest whole percent.
    pub online_percentage: u64,
}

impl SchoolStats {
    /// Build stats from per-status counts.
    ///
    /// # Examples
    /// ```
    /// use looma_backend::domain::SchoolStats;
    ///
    /// let stats = SchoolStats::from_counts(2, 1, 0);
    /// assert_eq!(stats.total, 3);
    /// assert_eq!(stats.online_percentage, 67);
    /// assert_eq!(SchoolStats::from_counts(0, 0, 0).online_percentage, 0);
    /// ```
    pub fn from_counts(online: u64, offline: u64, maintenance: u64) -> Self {
        let total = online + offline + maintenance;
        Self {
            total,
            online,
            offline,
            maintenance,
            devices: total,
            online_percentage: rounded_percentage(online, total),
        }
    }

    /// Count statuses across an already-loaded list.
    pub fn from_schools<'a>(schools: impl IntoIterator<Item = &'a School>) -> Self {
        let (online, offline, maintenance) =
            schools
                .into_iter()
                .fold((0, 0, 0), |(on, off, maint), school| match school.status {
                    SchoolStatus::Online => (on + 1, off, maint),
                    SchoolStatus::Offline => (on, off + 1, maint),
                    SchoolStatus::Maintenance => (on, off, maint + 1),
                });
        Self::from_counts(online, offline, maintenance)
    }

    /// Fold one `(status, count)` row into the running totals.
    #[must_use]
    pub fn with_count(self, status: SchoolStatus, count: u64) -> Self {
        let (online, offline, maintenance) = match status {
            SchoolStatus::Online => (self.online + count, self.offline, self.maintenance),
            SchoolStatus::Offline => (self.online, self.offline + count, self.maintenance),
            SchoolStatus::Maintenance => (self.online, self.offline, self.maintenance + count),
        };
        Self::from_counts(online, offline, maintenance)
    }
}

/// Half-up rounding of `part / whole * 100` without floating point.
fn rounded_percentage(part: u64, whole: u64) -> u64 {
    if whole == 0 {
        return 0;
    }
    (part * 200 + whole) / (whole * 2)
}

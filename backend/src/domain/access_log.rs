//! Audit trail of remote access actions taken against school devices.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::school::SchoolId;
use super::user::UserId;

/// Default number of entries returned by the access log listing.
pub const ACCESS_LOG_DEFAULT_LIMIT: u32 = 100;
/// Hard cap on a single access log page.
pub const ACCESS_LOG_MAX_LIMIT: u32 = 500;

/// One recorded access action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccessLog {
    pub id: Uuid,
    #[schema(value_type = String)]
    pub school_id: SchoolId,
    #[schema(value_type = Option<String>)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    /// Display name of the actor.
    #[schema(example = "admin")]
    pub user: String,
    #[schema(example = "remote_access")]
    pub action: String,
    pub details: Option<String>,
    pub ip_address: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Access log entry awaiting insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccessLog {
    pub school_id: SchoolId,
    pub user_id: Option<UserId>,
    pub user: String,
    pub action: String,
    pub details: Option<String>,
    pub ip_address: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl NewAccessLog {
    pub fn with_id(self, id: Uuid) -> AccessLog {
        AccessLog {
            id,
            school_id: self.school_id,
            user_id: self.user_id,
            user: self.user,
            action: self.action,
            details: self.details,
            ip_address: self.ip_address,
            timestamp: self.timestamp,
        }
    }
}

/// Clamp a requested page size into `1..=max`, falling back to `default`.
///
/// # Examples
/// ```
/// use looma_backend::domain::clamp_limit;
///
/// assert_eq!(clamp_limit(None, 100, 500), 100);
/// assert_eq!(clamp_limit(Some(0), 100, 500), 1);
/// assert_eq!(clamp_limit(Some(9_000), 100, 500), 500);
/// ```
pub fn clamp_limit(requested: Option<u32>, default: u32, max: u32) -> u32 {
    requested.unwrap_or(default).clamp(1, max)
}

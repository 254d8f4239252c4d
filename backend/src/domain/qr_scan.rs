//! QR code scans recorded by staff visiting a school.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::school::SchoolId;

pub const QR_SCAN_DEFAULT_LIMIT: u32 = 50;
pub const QR_SCAN_MAX_LIMIT: u32 = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QrScan {
    pub id: Uuid,
    #[schema(value_type = String)]
    pub school_id: SchoolId,
    #[schema(example = "LMA-482913")]
    pub looma_id: String,
    #[schema(example = "Sita Sharma")]
    pub staff_name: String,
    pub notes: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQrScan {
    pub school_id: SchoolId,
    pub looma_id: String,
    pub staff_name: String,
    pub notes: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl NewQrScan {
    pub fn with_id(self, id: Uuid) -> QrScan {
        QrScan {
            id,
            school_id: self.school_id,
            looma_id: self.looma_id,
            staff_name: self.staff_name,
            notes: self.notes,
            timestamp: self.timestamp,
        }
    }
}

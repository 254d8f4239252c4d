//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types return
//! `Result<_, String>` so a corrupt row surfaces as a query error rather than
//! a panic.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    AccessLog, Contact, CredentialedUser, Email, LoomaDevice, NewAccessLog, NewQrScan, NewSchool,
    PasswordHash, QrScan, Role, School, SchoolChanges, SchoolId, SchoolStatus, Session,
    SessionTokenHash, User, UserId, Username,
};

use super::schema::{access_logs, qr_scans, schools, sessions, users};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub last_login: Option<DateTime<Utc>>,
}

impl UserRow {
    pub(crate) fn into_user(self) -> Result<User, String> {
        self.into_credentialed().map(|found| found.user)
    }

    pub(crate) fn into_credentialed(self) -> Result<CredentialedUser, String> {
        let username = Username::new(self.username).map_err(|err| err.to_string())?;
        let email = Email::new(self.email).map_err(|err| err.to_string())?;
        let role = self
            .role
            .parse::<Role>()
            .map_err(|err| err.to_string())?;
        let user = User::new(UserId::from_uuid(self.id), username, email, role)
            .with_last_login(self.last_login);
        Ok(CredentialedUser {
            user,
            password_hash: PasswordHash::from_phc(self.password_hash),
        })
    }
}

/// Insertable struct for creating user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SessionRow {
    pub token_hash: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<&Session> for SessionRow {
    fn from(session: &Session) -> Self {
        Self {
            token_hash: session.token_hash.as_str().to_owned(),
            user_id: *session.user_id.as_uuid(),
            expires_at: session.expires_at,
            created_at: session.created_at,
        }
    }
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Self {
            token_hash: SessionTokenHash::from_hex(row.token_hash),
            user_id: UserId::from_uuid(row.user_id),
            expires_at: row.expires_at,
            created_at: row.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Schools
// ---------------------------------------------------------------------------

/// Row struct for reading from the schools table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = schools)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SchoolRow {
    pub id: Uuid,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub contact_email: String,
    pub contact_phone: String,
    pub headmaster: String,
    pub province: String,
    pub district: String,
    pub palika: String,
    pub status: String,
    pub last_seen: DateTime<Utc>,
    pub looma_id: String,
    pub looma_count: i32,
    pub looma_serial_number: String,
    pub looma_version: String,
    pub looma_last_update: DateTime<Utc>,
}

impl SchoolRow {
    pub(crate) fn into_school(self) -> Result<School, String> {
        let status = self
            .status
            .parse::<SchoolStatus>()
            .map_err(|err| err.to_string())?;
        Ok(School {
            id: SchoolId::from_uuid(self.id),
            name: self.name,
            latitude: self.latitude,
            longitude: self.longitude,
            contact: Contact {
                email: self.contact_email,
                phone: self.contact_phone,
                headmaster: self.headmaster,
            },
            province: self.province,
            district: self.district,
            palika: self.palika,
            status,
            last_seen: self.last_seen,
            looma: LoomaDevice {
                id: self.looma_id.clone(),
                serial_number: self.looma_serial_number,
                version: self.looma_version,
                last_update: self.looma_last_update,
            },
            looma_id: self.looma_id,
            looma_count: self.looma_count,
        })
    }
}

/// Insertable struct for registering a school.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schools)]
pub(crate) struct NewSchoolRow<'a> {
    pub name: &'a str,
    pub latitude: f64,
    pub longitude: f64,
    pub contact_email: &'a str,
    pub contact_phone: &'a str,
    pub headmaster: &'a str,
    pub province: &'a str,
    pub district: &'a str,
    pub palika: &'a str,
    pub status: &'a str,
    pub last_seen: DateTime<Utc>,
    pub looma_id: &'a str,
    pub looma_count: i32,
    pub looma_serial_number: &'a str,
    pub looma_version: &'a str,
    pub looma_last_update: DateTime<Utc>,
}

impl<'a> From<&'a NewSchool> for NewSchoolRow<'a> {
    fn from(school: &'a NewSchool) -> Self {
        Self {
            name: &school.name,
            latitude: school.latitude,
            longitude: school.longitude,
            contact_email: &school.contact.email,
            contact_phone: &school.contact.phone,
            headmaster: &school.contact.headmaster,
            province: &school.province,
            district: &school.district,
            palika: &school.palika,
            status: school.status.as_str(),
            last_seen: school.last_seen,
            looma_id: &school.looma_id,
            looma_count: school.looma_count,
            looma_serial_number: &school.looma.serial_number,
            looma_version: &school.looma.version,
            looma_last_update: school.looma.last_update,
        }
    }
}

/// Partial update; `None` columns are left untouched.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = schools)]
pub(crate) struct SchoolChangeset<'a> {
    pub name: Option<&'a str>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub contact_email: Option<&'a str>,
    pub contact_phone: Option<&'a str>,
    pub headmaster: Option<&'a str>,
    pub province: Option<&'a str>,
    pub district: Option<&'a str>,
    pub palika: Option<&'a str>,
    pub status: Option<&'a str>,
    pub looma_id: Option<&'a str>,
    pub looma_count: Option<i32>,
}

impl<'a> From<&'a SchoolChanges> for SchoolChangeset<'a> {
    fn from(changes: &'a SchoolChanges) -> Self {
        Self {
            name: changes.name.as_deref(),
            latitude: changes.latitude,
            longitude: changes.longitude,
            contact_email: changes.email.as_deref(),
            contact_phone: changes.phone.as_deref(),
            headmaster: changes.headmaster.as_deref(),
            province: changes.province.as_deref(),
            district: changes.district.as_deref(),
            palika: changes.palika.as_deref(),
            status: changes.status.map(SchoolStatus::as_str),
            looma_id: changes.looma_id.as_deref(),
            looma_count: changes.looma_count,
        }
    }
}

// ---------------------------------------------------------------------------
// Access logs and QR scans
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = access_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccessLogRow {
    pub id: Uuid,
    pub school_id: Uuid,
    pub user_id: Option<Uuid>,
    pub user_name: String,
    pub action: String,
    pub details: Option<String>,
    pub ip_address: Option<String>,
    pub logged_at: DateTime<Utc>,
}

impl From<AccessLogRow> for AccessLog {
    fn from(row: AccessLogRow) -> Self {
        Self {
            id: row.id,
            school_id: SchoolId::from_uuid(row.school_id),
            user_id: row.user_id.map(UserId::from_uuid),
            user: row.user_name,
            action: row.action,
            details: row.details,
            ip_address: row.ip_address,
            timestamp: row.logged_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = access_logs)]
pub(crate) struct NewAccessLogRow<'a> {
    pub school_id: Uuid,
    pub user_id: Option<Uuid>,
    pub user_name: &'a str,
    pub action: &'a str,
    pub details: Option<&'a str>,
    pub ip_address: Option<&'a str>,
    pub logged_at: DateTime<Utc>,
}

impl<'a> From<&'a NewAccessLog> for NewAccessLogRow<'a> {
    fn from(entry: &'a NewAccessLog) -> Self {
        Self {
            school_id: *entry.school_id.as_uuid(),
            user_id: entry.user_id.as_ref().map(|id| *id.as_uuid()),
            user_name: &entry.user,
            action: &entry.action,
            details: entry.details.as_deref(),
            ip_address: entry.ip_address.as_deref(),
            logged_at: entry.timestamp,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = qr_scans)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct QrScanRow {
    pub id: Uuid,
    pub school_id: Uuid,
    pub looma_id: String,
    pub staff_name: String,
    pub notes: Option<String>,
    pub scanned_at: DateTime<Utc>,
}

impl From<QrScanRow> for QrScan {
    fn from(row: QrScanRow) -> Self {
        Self {
            id: row.id,
            school_id: SchoolId::from_uuid(row.school_id),
            looma_id: row.looma_id,
            staff_name: row.staff_name,
            notes: row.notes,
            timestamp: row.scanned_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = qr_scans)]
pub(crate) struct NewQrScanRow<'a> {
    pub school_id: Uuid,
    pub looma_id: &'a str,
    pub staff_name: &'a str,
    pub notes: Option<&'a str>,
    pub scanned_at: DateTime<Utc>,
}

impl<'a> From<&'a NewQrScan> for NewQrScanRow<'a> {
    fn from(scan: &'a NewQrScan) -> Self {
        Self {
            school_id: *scan.school_id.as_uuid(),
            looma_id: &scan.looma_id,
            staff_name: &scan.staff_name,
            notes: scan.notes.as_deref(),
            scanned_at: scan.timestamp,
        }
    }
}

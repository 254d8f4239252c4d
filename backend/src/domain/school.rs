//! Schools and the Looma device each one hosts.
//!
//! A school embeds exactly one device record. `looma_count` is kept for API
//! compatibility as an informational integer that is always at least one.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Firmware version recorded for freshly registered devices.
pub const DEFAULT_LOOMA_VERSION: &str = "v3.0.0";
/// Headmaster placeholder used when none is supplied.
pub const UNKNOWN_HEADMASTER: &str = "Unknown";
/// Domain appended to generated school contact addresses.
pub const SCHOOL_EMAIL_DOMAIN: &str = "edu.gov.np";
const CARD_IMAGE_COUNT: u32 = 5;

/// Validation failures for school input.
#[derive(Debug, Clone, PartialEq)]
pub enum SchoolValidationError {
    InvalidId,
    MissingField { field: &'static str },
    InvalidStatus { value: String },
    LatitudeOutOfRange { value: f64 },
    LongitudeOutOfRange { value: f64 },
    InvalidLoomaCount { value: i32 },
}

impl SchoolValidationError {
    /// JSON field the failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "id",
            Self::MissingField { field } => *field,
            Self::InvalidStatus { .. } => "status",
            Self::LatitudeOutOfRange { .. } => "latitude",
            Self::LongitudeOutOfRange { .. } => "longitude",
            Self::InvalidLoomaCount { .. } => "loomaCount",
        }
    }
}

impl fmt::Display for SchoolValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "school id must be a valid UUID"),
            Self::MissingField { field } => write!(f, "missing required field: {field}"),
            Self::InvalidStatus { value } => write!(
                f,
                "invalid status '{value}'; expected online, offline or maintenance"
            ),
            Self::LatitudeOutOfRange { value } => {
                write!(f, "latitude {value} must be between -90 and 90")
            }
            Self::LongitudeOutOfRange { value } => {
                write!(f, "longitude {value} must be between -180 and 180")
            }
            Self::InvalidLoomaCount { value } => {
                write!(f, "loomaCount {value} must be at least 1")
            }
        }
    }
}

impl std::error::Error for SchoolValidationError {}

/// Database-generated school identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchoolId(Uuid);

impl SchoolId {
    /// Parse an identifier taken from a path or payload.
    pub fn new(raw: &str) -> Result<Self, SchoolValidationError> {
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| SchoolValidationError::InvalidId)
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for SchoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<SchoolId> for String {
    fn from(value: SchoolId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for SchoolId {
    type Error = SchoolValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

/// Connectivity state reported for a school's device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SchoolStatus {
    Online,
    Offline,
    Maintenance,
}

impl SchoolStatus {
    pub const ALL: [Self; 3] = [Self::Online, Self::Offline, Self::Maintenance];

    /// Stored and serialised representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for SchoolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchoolStatus {
    type Err = SchoolValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| SchoolValidationError::InvalidStatus {
                value: value.to_owned(),
            })
    }
}

/// School contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[schema(example = "shreejanata@edu.gov.np")]
    pub email: String,
    #[schema(example = "+977-61-465123")]
    pub phone: String,
    #[schema(example = "Hari Prasad Adhikari")]
    pub headmaster: String,
}

/// The Looma device installed at a school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoomaDevice {
    #[schema(example = "LMA-482913")]
    pub id: String,
    #[schema(example = "SN1718000482913")]
    pub serial_number: String,
    #[schema(example = "v3.0.0")]
    pub version: String,
    pub last_update: DateTime<Utc>,
}

/// A monitored school.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct School {
    #[schema(value_type = String, example = "0b7d3c8e-6a55-4f0f-9a0c-1f2d3e4f5a6b")]
    pub id: SchoolId,
    #[schema(example = "Shree Janata Secondary School")]
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub contact: Contact,
    #[schema(example = "Gandaki")]
    pub province: String,
    #[schema(example = "Kaski")]
    pub district: String,
    #[schema(example = "Pokhara")]
    pub palika: String,
    pub status: SchoolStatus,
    pub last_seen: DateTime<Utc>,
    pub looma_id: String,
    pub looma_count: i32,
    pub looma: LoomaDevice,
}

impl School {
    /// Apply a partial update in place.
    pub fn apply(&mut self, changes: &SchoolChanges) {
        let SchoolChanges {
            name,
            latitude,
            longitude,
            email,
            phone,
            headmaster,
            province,
            district,
            palika,
            status,
            looma_id,
            looma_count,
        } = changes;
        assign(&mut self.name, name);
        assign(&mut self.latitude, latitude);
        assign(&mut self.longitude, longitude);
        assign(&mut self.contact.email, email);
        assign(&mut self.contact.phone, phone);
        assign(&mut self.contact.headmaster, headmaster);
        assign(&mut self.province, province);
        assign(&mut self.district, district);
        assign(&mut self.palika, palika);
        assign(&mut self.status, status);
        if let Some(looma_id) = looma_id {
            self.looma_id.clone_from(looma_id);
            self.looma.id.clone_from(looma_id);
        }
        assign(&mut self.looma_count, looma_count);
    }

    /// Dashboard card image for this school.
    pub fn card_image(&self) -> String {
        card_image(&self.id)
    }
}

fn assign<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        target.clone_from(value);
    }
}

/// Pick one of five stock card images from the id's character codes.
///
/// The same id always maps to the same image.
///
/// # Examples
/// ```
/// use looma_backend::domain::{SchoolId, card_image};
///
/// let id = SchoolId::new("00000000-0000-0000-0000-000000000000").unwrap();
/// assert_eq!(card_image(&id), "/schools/school-2.jpg");
/// ```
pub fn card_image(id: &SchoolId) -> String {
    let sum = id
        .to_string()
        .chars()
        .fold(0_u32, |acc, ch| acc.wrapping_add(u32::from(ch)));
    format!("/schools/school-{}.jpg", sum % CARD_IMAGE_COUNT + 1)
}

fn required_text(value: &str, field: &'static str) -> Result<String, SchoolValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(SchoolValidationError::MissingField { field })
    } else {
        Ok(trimmed.to_owned())
    }
}

fn check_latitude(value: f64) -> Result<f64, SchoolValidationError> {
    if value.is_finite() && (-90.0..=90.0).contains(&value) {
        Ok(value)
    } else {
        Err(SchoolValidationError::LatitudeOutOfRange { value })
    }
}

fn check_longitude(value: f64) -> Result<f64, SchoolValidationError> {
    if value.is_finite() && (-180.0..=180.0).contains(&value) {
        Ok(value)
    } else {
        Err(SchoolValidationError::LongitudeOutOfRange { value })
    }
}

fn check_looma_count(value: i32) -> Result<i32, SchoolValidationError> {
    if value >= 1 {
        Ok(value)
    } else {
        Err(SchoolValidationError::InvalidLoomaCount { value })
    }
}

/// Validated input for registering a school.
///
/// `name`, `province` and `district` are required; every other field falls
/// back to a generated default in [`SchoolDraft::into_new_school`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchoolDraft {
    name: String,
    province: String,
    district: String,
    pub palika: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub headmaster: Option<String>,
    pub looma_id: Option<String>,
    pub serial_number: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    looma_count: Option<i32>,
}

impl SchoolDraft {
    /// Validate the required location fields.
    pub fn new(
        name: &str,
        province: &str,
        district: &str,
    ) -> Result<Self, SchoolValidationError> {
        Ok(Self {
            name: required_text(name, "name")?,
            province: required_text(province, "province")?,
            district: required_text(district, "district")?,
            ..Self::default()
        })
    }

    /// Supply explicit coordinates.
    pub fn with_coordinates(
        mut self,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<Self, SchoolValidationError> {
        self.latitude = latitude.map(check_latitude).transpose()?;
        self.longitude = longitude.map(check_longitude).transpose()?;
        Ok(self)
    }

    /// Supply an explicit device count.
    pub fn with_looma_count(mut self, count: Option<i32>) -> Result<Self, SchoolValidationError> {
        self.looma_count = count.map(check_looma_count).transpose()?;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fill in generated defaults and produce an insertable record.
    ///
    /// Missing coordinates land at a random point in central Nepal; a missing
    /// device id or serial is derived from `now` in epoch milliseconds. New
    /// schools always start `offline`.
    pub fn into_new_school<R: Rng>(self, now: DateTime<Utc>, rng: &mut R) -> NewSchool {
        let millis = now.timestamp_millis();
        let looma_id = non_blank(self.looma_id)
            .unwrap_or_else(|| format!("LMA-{:06}", millis.rem_euclid(1_000_000)));
        let serial_number =
            non_blank(self.serial_number).unwrap_or_else(|| format!("SN{millis}"));
        let latitude = self
            .latitude
            .unwrap_or_else(|| 27.7 + rng.gen_range(0.0..2.0));
        let longitude = self
            .longitude
            .unwrap_or_else(|| 83.0 + rng.gen_range(0.0..4.0));
        let email = self
            .email
            .unwrap_or_else(|| default_school_email(&self.name));
        let phone = self.phone.unwrap_or_else(|| random_phone(rng));

        NewSchool {
            name: self.name,
            latitude,
            longitude,
            contact: Contact {
                email,
                phone,
                headmaster: self
                    .headmaster
                    .unwrap_or_else(|| UNKNOWN_HEADMASTER.to_owned()),
            },
            province: self.province,
            district: self.district,
            palika: self.palika.unwrap_or_default(),
            status: SchoolStatus::Offline,
            last_seen: now,
            looma_id: looma_id.clone(),
            looma_count: self.looma_count.unwrap_or(1),
            looma: LoomaDevice {
                id: looma_id,
                serial_number,
                version: DEFAULT_LOOMA_VERSION.to_owned(),
                last_update: now,
            },
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}

/// `<name lowercased, whitespace removed>@edu.gov.np`
pub fn default_school_email(name: &str) -> String {
    let local: String = name
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    format!("{local}@{SCHOOL_EMAIL_DOMAIN}")
}

fn random_phone<R: Rng>(rng: &mut R) -> String {
    let area = rng.gen_range(10..100);
    let number = rng.gen_range(100_000..1_000_000);
    format!("+977-{area}-{number}")
}

/// Fully populated school awaiting an identifier from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSchool {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub contact: Contact,
    pub province: String,
    pub district: String,
    pub palika: String,
    pub status: SchoolStatus,
    pub last_seen: DateTime<Utc>,
    pub looma_id: String,
    pub looma_count: i32,
    pub looma: LoomaDevice,
}

impl NewSchool {
    /// Attach a store-assigned identifier.
    pub fn with_id(self, id: SchoolId) -> School {
        School {
            id,
            name: self.name,
            latitude: self.latitude,
            longitude: self.longitude,
            contact: self.contact,
            province: self.province,
            district: self.district,
            palika: self.palika,
            status: self.status,
            last_seen: self.last_seen,
            looma_id: self.looma_id,
            looma_count: self.looma_count,
            looma: self.looma,
        }
    }
}

/// Partial update applied by `PUT /api/schools/{id}`.
///
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchoolChanges {
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub headmaster: Option<String>,
    pub province: Option<String>,
    pub district: Option<String>,
    pub palika: Option<String>,
    pub status: Option<SchoolStatus>,
    pub looma_id: Option<String>,
    pub looma_count: Option<i32>,
}

impl SchoolChanges {
    /// Reject blank required fields and out-of-range numbers.
    pub fn validated(mut self) -> Result<Self, SchoolValidationError> {
        self.name = self
            .name
            .map(|value| required_text(&value, "name"))
            .transpose()?;
        self.province = self
            .province
            .map(|value| required_text(&value, "province"))
            .transpose()?;
        self.district = self
            .district
            .map(|value| required_text(&value, "district"))
            .transpose()?;
        self.latitude = self.latitude.map(check_latitude).transpose()?;
        self.longitude = self.longitude.map(check_longitude).transpose()?;
        self.looma_count = self.looma_count.map(check_looma_count).transpose()?;
        Ok(self)
    }

    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use rstest::{fixture, rstest};

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0)
            .single()
            .expect("valid timestamp")
    }

    #[rstest]
    #[case("", "Gandaki", "Kaski", "name")]
    #[case("School", "  ", "Kaski", "province")]
    #[case("School", "Gandaki", "", "district")]
    fn draft_requires_location_fields(
        #[case] name: &str,
        #[case] province: &str,
        #[case] district: &str,
        #[case] field: &str,
    ) {
        let err = SchoolDraft::new(name, province, district).expect_err("missing field");
        assert_eq!(err.field(), field);
    }

    #[rstest]
    fn draft_fills_defaults(now: DateTime<Utc>) {
        let mut rng = SmallRng::seed_from_u64(7);
        let school = SchoolDraft::new("Shree Janata School", "Gandaki", "Kaski")
            .expect("valid draft")
            .into_new_school(now, &mut rng);

        let millis = now.timestamp_millis();
        assert_eq!(school.contact.email, "shreejanataschool@edu.gov.np");
        assert_eq!(school.contact.headmaster, UNKNOWN_HEADMASTER);
        assert_eq!(school.status, SchoolStatus::Offline);
        assert_eq!(school.last_seen, now);
        assert_eq!(school.looma_count, 1);
        assert_eq!(school.looma_id, format!("LMA-{:06}", millis % 1_000_000));
        assert_eq!(school.looma.id, school.looma_id);
        assert_eq!(school.looma.serial_number, format!("SN{millis}"));
        assert_eq!(school.looma.version, DEFAULT_LOOMA_VERSION);
        assert!((27.7..29.7).contains(&school.latitude));
        assert!((83.0..87.0).contains(&school.longitude));
        assert!(school.contact.phone.starts_with("+977-"));
        assert_eq!(school.contact.phone.len(), "+977-NN-NNNNNN".len());
    }

    #[rstest]
    fn draft_keeps_explicit_values(now: DateTime<Utc>) {
        let mut draft = SchoolDraft::new("A", "Bagmati", "Lalitpur")
            .and_then(|draft| draft.with_coordinates(Some(27.6), Some(85.3)))
            .and_then(|draft| draft.with_looma_count(Some(2)))
            .expect("valid draft");
        draft.headmaster = Some("Gita".to_owned());
        draft.looma_id = Some(" LMA-CUSTOM ".to_owned());
        draft.serial_number = Some("SN-XYZ".to_owned());
        let school = draft.into_new_school(now, &mut SmallRng::seed_from_u64(1));
        assert_eq!(school.latitude, 27.6);
        assert_eq!(school.longitude, 85.3);
        assert_eq!(school.looma_count, 2);
        assert_eq!(school.contact.headmaster, "Gita");
        assert_eq!(school.looma_id, "LMA-CUSTOM");
        assert_eq!(school.looma.id, "LMA-CUSTOM");
        assert_eq!(school.looma.serial_number, "SN-XYZ");
        assert_eq!(school.status, SchoolStatus::Offline);
    }

    #[rstest]
    fn blank_device_identifiers_fall_back_to_generated_ones(now: DateTime<Utc>) {
        let mut draft = SchoolDraft::new("A", "Bagmati", "Lalitpur").expect("valid draft");
        draft.looma_id = Some("  ".to_owned());
        draft.serial_number = Some(String::new());
        let school = draft.into_new_school(now, &mut SmallRng::seed_from_u64(2));
        let millis = now.timestamp_millis();
        assert_eq!(school.looma_id, format!("LMA-{:06}", millis % 1_000_000));
        assert_eq!(school.looma.serial_number, format!("SN{millis}"));
    }

    #[rstest]
    fn apply_moves_the_device_with_a_new_looma_id(now: DateTime<Utc>) {
        let mut school = SchoolDraft::new("A", "B", "C")
            .expect("draft")
            .into_new_school(now, &mut SmallRng::seed_from_u64(4))
            .with_id(SchoolId::from_uuid(Uuid::nil()));
        let serial = school.looma.serial_number.clone();
        school.apply(&SchoolChanges {
            looma_id: Some("LMA-424242".to_owned()),
            ..SchoolChanges::default()
        });
        assert_eq!(school.looma_id, "LMA-424242");
        assert_eq!(school.looma.id, "LMA-424242");
        assert_eq!(school.looma.serial_number, serial);
    }

    #[rstest]
    #[case(Some(91.0), None)]
    #[case(None, Some(-181.0))]
    #[case(Some(f64::NAN), None)]
    fn draft_rejects_out_of_range_coordinates(
        #[case] latitude: Option<f64>,
        #[case] longitude: Option<f64>,
    ) {
        let result = SchoolDraft::new("A", "B", "C")
            .expect("valid draft")
            .with_coordinates(latitude, longitude);
        assert!(result.is_err());
    }

    #[rstest]
    #[case("online", SchoolStatus::Online)]
    #[case("offline", SchoolStatus::Offline)]
    #[case("maintenance", SchoolStatus::Maintenance)]
    fn parses_statuses(#[case] raw: &str, #[case] expected: SchoolStatus) {
        assert_eq!(raw.parse::<SchoolStatus>().expect("status"), expected);
    }

    #[rstest]
    #[case("ONLINE")]
    #[case("broken")]
    #[case("")]
    fn rejects_unknown_statuses(#[case] raw: &str) {
        assert!(raw.parse::<SchoolStatus>().is_err());
    }

    #[rstest]
    fn card_image_is_deterministic_and_in_range() {
        let id = SchoolId::from_uuid(Uuid::new_v4());
        let first = card_image(&id);
        assert_eq!(first, card_image(&id));
        let index: u32 = first
            .trim_start_matches("/schools/school-")
            .trim_end_matches(".jpg")
            .parse()
            .expect("numeric index");
        assert!((1..=5).contains(&index));
    }

    #[rstest]
    fn changes_reject_blank_name() {
        let changes = SchoolChanges {
            name: Some("   ".to_owned()),
            ..SchoolChanges::default()
        };
        assert_eq!(
            changes.validated().expect_err("blank name"),
            SchoolValidationError::MissingField { field: "name" }
        );
    }

    #[rstest]
    fn apply_only_touches_supplied_fields(now: DateTime<Utc>) {
        let mut school = SchoolDraft::new("A", "B", "C")
            .expect("draft")
            .into_new_school(now, &mut SmallRng::seed_from_u64(3))
            .with_id(SchoolId::from_uuid(Uuid::nil()));
        let before = school.clone();
        school.apply(&SchoolChanges {
            palika: Some("Pokhara".to_owned()),
            headmaster: Some("Ram".to_owned()),
            ..SchoolChanges::default()
        });
        assert_eq!(school.palika, "Pokhara");
        assert_eq!(school.contact.headmaster, "Ram");
        assert_eq!(school.name, before.name);
        assert_eq!(school.contact.email, before.contact.email);
        assert!(SchoolChanges::default().is_empty());
    }
}

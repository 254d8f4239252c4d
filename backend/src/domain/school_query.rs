//! Filtering and table ordering for school listings.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::school::{School, SchoolStatus};

/// Selection sentinel the dashboard sends for "no filter".
pub const ALL_SENTINEL: &str = "all";

/// Predicates applied to `GET /api/schools`.
///
/// `search` is a case-insensitive substring match over name, district,
/// palika and Looma id; `status` and `province` are equality filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchoolFilter {
    search: Option<String>,
    status: Option<SchoolStatus>,
    province: Option<String>,
}

impl SchoolFilter {
    /// Build a filter, dropping blank values and the `all` sentinel.
    pub fn new(
        search: Option<String>,
        status: Option<SchoolStatus>,
        province: Option<String>,
    ) -> Self {
        Self {
            search: normalise(search),
            status,
            province: normalise(province).filter(|value| value != ALL_SENTINEL),
        }
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn status(&self) -> Option<SchoolStatus> {
        self.status
    }

    pub fn province(&self) -> Option<&str> {
        self.province.as_deref()
    }

    /// Evaluate the filter against one school.
    pub fn matches(&self, school: &School) -> bool {
        let status_ok = self.status.is_none_or(|status| school.status == status);
        let province_ok = self
            .province
            .as_deref()
            .is_none_or(|province| school.province == province);
        let search_ok = self.search.as_deref().is_none_or(|needle| {
            let needle = needle.to_lowercase();
            [
                school.name.as_str(),
                school.district.as_str(),
                school.palika.as_str(),
                school.looma_id.as_str(),
            ]
            .iter()
            .any(|haystack| haystack.to_lowercase().contains(&needle))
        });
        status_ok && province_ok && search_ok
    }
}

fn normalise(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}

/// Error raised when a sort parameter is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported {kind} '{value}'")]
pub struct SortParseError {
    kind: &'static str,
    value: String,
}

/// Column the school table can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Name,
    District,
    Province,
    Status,
    LastSeen,
}

impl SortField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::District => "district",
            Self::Province => "province",
            Self::Status => "status",
            Self::LastSeen => "lastSeen",
        }
    }

    /// Ascending comparison for this column.
    ///
    /// Text columns compare case-insensitively and fall back to the raw value.
    /// `lastSeen` ascending puts the most recently seen school first.
    fn compare(self, a: &School, b: &School) -> Ordering {
        match self {
            Self::Name => compare_text(&a.name, &b.name),
            Self::District => compare_text(&a.district, &b.district),
            Self::Province => compare_text(&a.province, &b.province),
            Self::Status => a.status.as_str().cmp(b.status.as_str()),
            Self::LastSeen => b.last_seen.cmp(&a.last_seen),
        }
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = SortParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "name" => Ok(Self::Name),
            "district" => Ok(Self::District),
            "province" => Ok(Self::Province),
            "status" => Ok(Self::Status),
            "lastSeen" => Ok(Self::LastSeen),
            other => Err(SortParseError {
                kind: "sort field",
                value: other.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl FromStr for SortDirection {
    type Err = SortParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(SortParseError {
                kind: "sort order",
                value: other.to_owned(),
            }),
        }
    }
}

/// Current ordering of the school table.
///
/// # Examples
/// ```
/// use looma_backend::domain::{SortDirection, SortField, SortState};
///
/// let state = SortState::default().toggle(SortField::Name);
/// assert_eq!(state.direction, SortDirection::Desc);
/// let state = state.toggle(SortField::District);
/// assert_eq!((state.field, state.direction), (SortField::District, SortDirection::Asc));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            field: SortField::Name,
            direction: SortDirection::Asc,
        }
    }
}

impl SortState {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Header click: the same column flips direction, another column
    /// starts ascending.
    #[must_use]
    pub fn toggle(self, field: SortField) -> Self {
        if self.field == field {
            Self::new(field, self.direction.flipped())
        } else {
            Self::new(field, SortDirection::Asc)
        }
    }

    /// Stable in-place sort; ties keep their incoming order.
    pub fn sort(self, schools: &mut [School]) {
        schools.sort_by(|a, b| {
            let ordering = self.field.compare(a, b);
            match self.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }
}

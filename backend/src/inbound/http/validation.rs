//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every validation failure becomes `400 invalid_request` with
//! `details: {field, code}` and, where useful, the rejected `value`.

use serde_json::json;
use uuid::Uuid;

use crate::domain::{
    Error, LoginValidationError, SchoolId, SchoolValidationError, UserId, UserValidationError,
};

/// Validation error codes reported in `details.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    MissingField,
    InvalidUuid,
    InvalidValue,
    OutOfRange,
    TooLong,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidValue => "invalid_value",
            Self::OutOfRange => "out_of_range",
            Self::TooLong => "too_long",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, code: ValidationCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

fn value_error(
    field: FieldName,
    code: ValidationCode,
    value: &str,
    message: impl Into<String>,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(
        field,
        ValidationCode::MissingField,
        format!("missing required field: {}", field.as_str()),
    )
}

/// `400` for a value outside the field's accepted set.
pub(crate) fn invalid_value_error(field: FieldName, value: &str, message: impl Into<String>) -> Error {
    value_error(field, ValidationCode::InvalidValue, value, message)
}

/// Require a present, non-blank string field.
pub(crate) fn require_text(value: Option<String>, field: FieldName) -> Result<String, Error> {
    value
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| missing_field_error(field))
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value.trim()).map_err(|_| {
        value_error(
            field,
            ValidationCode::InvalidUuid,
            value,
            format!("{} must be a valid UUID", field.as_str()),
        )
    })
}

/// Parse a school id taken from a request body.
pub(crate) fn parse_school_id(value: &str, field: FieldName) -> Result<SchoolId, Error> {
    parse_uuid(value, field).map(SchoolId::from_uuid)
}

/// Parse a user id taken from a request body.
pub(crate) fn parse_user_id(value: &str, field: FieldName) -> Result<UserId, Error> {
    parse_uuid(value, field).map(UserId::from_uuid)
}

/// Parse a `limit` query value; blank means absent.
pub(crate) fn parse_limit(raw: Option<&str>) -> Result<Option<u32>, Error> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse::<u32>().map(Some).map_err(|_| {
            invalid_value_error(
                FieldName::new("limit"),
                value,
                "limit must be a non-negative integer",
            )
        }),
    }
}

/// Path ids that do not parse cannot name an existing row.
pub(crate) fn school_id_from_path(raw: &str) -> Result<SchoolId, Error> {
    SchoolId::new(raw).map_err(|_| Error::not_found(format!("school {raw} not found")))
}

pub(crate) fn user_id_from_path(raw: &str) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|_| Error::not_found(format!("user {raw} not found")))
}

pub(crate) fn map_school_validation_error(err: SchoolValidationError) -> Error {
    let field = FieldName::new(err.field());
    let message = err.to_string();
    match err {
        SchoolValidationError::MissingField { .. } => {
            field_error(field, ValidationCode::MissingField, message)
        }
        SchoolValidationError::InvalidId => field_error(field, ValidationCode::InvalidUuid, message),
        SchoolValidationError::InvalidStatus { value } => {
            value_error(field, ValidationCode::InvalidValue, &value, message)
        }
        SchoolValidationError::LatitudeOutOfRange { .. }
        | SchoolValidationError::LongitudeOutOfRange { .. }
        | SchoolValidationError::InvalidLoomaCount { .. } => {
            field_error(field, ValidationCode::OutOfRange, message)
        }
    }
}

pub(crate) fn map_user_validation_error(err: UserValidationError) -> Error {
    let message = err.to_string();
    match err {
        UserValidationError::EmptyId | UserValidationError::InvalidId => {
            field_error(FieldName::new("id"), ValidationCode::InvalidUuid, message)
        }
        UserValidationError::EmptyUsername => missing_field_error(FieldName::new("username")),
        UserValidationError::UsernameTooLong { .. } => {
            field_error(FieldName::new("username"), ValidationCode::TooLong, message)
        }
        UserValidationError::EmptyEmail => missing_field_error(FieldName::new("email")),
        UserValidationError::InvalidEmail => {
            field_error(FieldName::new("email"), ValidationCode::InvalidValue, message)
        }
        UserValidationError::EmailTooLong { .. } => {
            field_error(FieldName::new("email"), ValidationCode::TooLong, message)
        }
        UserValidationError::InvalidRole { value } => value_error(
            FieldName::new("role"),
            ValidationCode::InvalidValue,
            &value,
            message,
        ),
    }
}

pub(crate) fn map_login_validation_error(err: LoginValidationError) -> Error {
    field_error(
        FieldName::new(err.field()),
        ValidationCode::MissingField,
        err.to_string(),
    )
}

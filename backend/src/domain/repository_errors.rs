//! Translation of driven-port failures into domain errors.

use crate::domain::Error;
use crate::domain::ports::{
    AccessLogRepositoryError, QrScanRepositoryError, SchoolRepositoryError,
    SessionRepositoryError, UserPersistenceError,
};

pub(crate) fn map_school_error(error: SchoolRepositoryError) -> Error {
    match error {
        SchoolRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("school repository unavailable: {message}"))
        }
        SchoolRepositoryError::Query { message } => {
            Error::internal(format!("school repository error: {message}"))
        }
    }
}

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateUsername { username } => {
            Error::conflict(format!("username already exists: {username}"))
        }
    }
}

pub(crate) fn map_session_error(error: SessionRepositoryError) -> Error {
    match error {
        SessionRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("session repository unavailable: {message}"))
        }
        SessionRepositoryError::Query { message } => {
            Error::internal(format!("session repository error: {message}"))
        }
    }
}

pub(crate) fn map_access_log_error(error: AccessLogRepositoryError) -> Error {
    match error {
        AccessLogRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("access log repository unavailable: {message}"))
        }
        AccessLogRepositoryError::Query { message } => {
            Error::internal(format!("access log repository error: {message}"))
        }
    }
}

pub(crate) fn map_qr_scan_error(error: QrScanRepositoryError) -> Error {
    match error {
        QrScanRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("qr scan repository unavailable: {message}"))
        }
        QrScanRepositoryError::Query { message } => {
            Error::internal(format!("qr scan repository error: {message}"))
        }
    }
}

//! Login credentials accepted by the dashboard sign-in form.
//!
//! Handlers build [`LoginCredentials`] from the raw JSON body before calling
//! the [`LoginService`](crate::domain::ports::LoginService) port, so blank
//! input never reaches the user repository.

use std::fmt;

use zeroize::Zeroizing;

/// Reasons a login payload is rejected before any lookup happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was missing or empty.
    EmptyPassword,
}

impl LoginValidationError {
    /// JSON field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyUsername => "username",
            Self::EmptyPassword => "password",
        }
    }
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Username and password pair presented at login.
///
/// The username is trimmed; the password is kept verbatim and wiped from
/// memory when dropped.
///
/// # Examples
/// ```
/// use looma_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" ramesh ", "s3cret").unwrap();
/// assert_eq!(creds.username(), "ramesh");
/// assert_eq!(creds.password(), "s3cret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Validate raw inputs from a login request.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username: username.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username used for the repository lookup.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password to verify against the stored hash.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

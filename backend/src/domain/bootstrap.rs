//! First-run provisioning of an administrator account.

use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::UserRepository;
use crate::domain::repository_errors::map_user_error;
use crate::domain::{Email, Error, NewUser, PasswordHash, Role, User, Username};

/// Credentials for the account created on an empty user table.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub email: String,
    pub password: Option<Zeroizing<String>>,
}

/// Create the bootstrap admin when no users exist yet.
///
/// Returns `Ok(None)` when users already exist or no password is
/// configured.
pub async fn ensure_bootstrap_admin<R>(
    repo: &R,
    admin: &BootstrapAdmin,
) -> Result<Option<User>, Error>
where
    R: UserRepository + ?Sized,
{
    if repo.count().await.map_err(map_user_error)? > 0 {
        return Ok(None);
    }
    let Some(password) = admin.password.as_ref().filter(|pw| !pw.is_empty()) else {
        warn!("no users exist and no bootstrap admin password is configured");
        return Ok(None);
    };

    let username = Username::new(admin.username.as_str())
        .map_err(|err| Error::invalid_request(format!("bootstrap admin username: {err}")))?;
    let email = Email::new(admin.email.as_str())
        .map_err(|err| Error::invalid_request(format!("bootstrap admin email: {err}")))?;
    let password_hash =
        PasswordHash::hash(password.as_str()).map_err(|err| Error::internal(err.to_string()))?;

    let user = repo
        .create(&NewUser {
            username,
            email,
            role: Role::Admin,
            password_hash,
        })
        .await
        .map_err(map_user_error)?;
    info!(user_id = %user.id(), username = %user.username(), "bootstrap admin created");
    Ok(Some(user))
}

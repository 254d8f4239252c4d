//! Role-based permissions for dashboard actions.

use super::error::Error;
use super::user::{Role, User};

/// An action the dashboard gates by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    ViewDashboard,
    UpdateSchoolStatus,
    RecordAccess,
    RecordQrScan,
    ExportCsv,
    ManageSchools,
    RemoteAccess,
    ManageUsers,
}

impl Capability {
    pub const ALL: [Self; 8] = [
        Self::ViewDashboard,
        Self::UpdateSchoolStatus,
        Self::RecordAccess,
        Self::RecordQrScan,
        Self::ExportCsv,
        Self::ManageSchools,
        Self::RemoteAccess,
        Self::ManageUsers,
    ];
}

impl Role {
    /// Whether this role may perform `capability`.
    ///
    /// # Examples
    /// ```
    /// use looma_backend::domain::{Capability, Role};
    ///
    /// assert!(Role::Staff.can(Capability::UpdateSchoolStatus));
    /// assert!(!Role::Staff.can(Capability::ManageSchools));
    /// assert!(Role::Viewer.can(Capability::ViewDashboard));
    /// ```
    pub fn can(self, capability: Capability) -> bool {
        match capability {
            Capability::ViewDashboard => true,
            Capability::UpdateSchoolStatus
            | Capability::RecordAccess
            | Capability::RecordQrScan => matches!(self, Self::Admin | Self::Staff),
            Capability::ExportCsv
            | Capability::ManageSchools
            | Capability::RemoteAccess
            | Capability::ManageUsers => self == Self::Admin,
        }
    }
}

/// Fail with `forbidden` unless `user` holds `capability`.
pub fn require(user: &User, capability: Capability) -> Result<(), Error> {
    if user.role().can(capability) {
        Ok(())
    } else {
        Err(Error::forbidden("insufficient permissions"))
    }
}

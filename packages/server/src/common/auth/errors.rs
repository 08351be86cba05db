use thiserror::Error;

use super::{PointOperation, Role};

/// Authorization outcomes produced by the permission guard
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Identity required")]
    IdentityRequired,

    #[error("Administrator access required to {0} a donation point")]
    AdminRequired(PointOperation),

    #[error("Role {role} may not {operation} donation points")]
    RoleNotAllowed { role: Role, operation: PointOperation },

    #[error("Only the organization that created this point may {0} it")]
    NotOwner(PointOperation),

    #[error("Point already approved, contact an administrator to change it")]
    AlreadyApproved,
}

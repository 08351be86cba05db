use super::{AuthError, Identity, PointOperation, Role};
use crate::common::entity_ids::ActorId;

/// Entry point for authorization checks
///
/// Usage:
/// ```ignore
/// Actor::new(identity)
///     .can(PointOperation::Edit)
///     .on(point.scope())
///     .check()?;
/// ```
pub struct Actor {
    identity: Identity,
}

impl Actor {
    /// Create a new actor for authorization checks
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }

    /// Specify what operation the actor wants to perform
    pub fn can(self, operation: PointOperation) -> CapabilityBuilder {
        CapabilityBuilder {
            identity: self.identity,
            operation,
        }
    }
}

/// Ownership facts about a point that the guard needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointScope {
    pub creator_id: Option<ActorId>,
    pub organization_owned: bool,
    pub approved: bool,
}

/// Builder after specifying the operation
pub struct CapabilityBuilder {
    identity: Identity,
    operation: PointOperation,
}

impl CapabilityBuilder {
    /// Narrow the check to a specific point
    pub fn on(self, scope: PointScope) -> PointCapabilityBuilder {
        PointCapabilityBuilder {
            identity: self.identity,
            operation: self.operation,
            scope,
        }
    }

    /// Role-level check, run before any point is loaded
    pub fn check(self) -> Result<(), AuthError> {
        check_role(&self.identity, self.operation)
    }
}

/// Builder after specifying the target point
pub struct PointCapabilityBuilder {
    identity: Identity,
    operation: PointOperation,
    scope: PointScope,
}

impl PointCapabilityBuilder {
    /// Full check: role first, then ownership and edit-lock
    pub fn check(self) -> Result<(), AuthError> {
        check_role(&self.identity, self.operation)?;
        check_point(&self.identity, self.operation, &self.scope)
    }
}

fn check_role(identity: &Identity, operation: PointOperation) -> Result<(), AuthError> {
    match identity.role {
        Role::Administrator => Ok(()),
        _ if operation.requires_admin() => Err(AuthError::AdminRequired(operation)),
        Role::Organization => Ok(()),
        Role::Donor => Err(AuthError::RoleNotAllowed {
            role: identity.role,
            operation,
        }),
    }
}

fn check_point(
    identity: &Identity,
    operation: PointOperation,
    scope: &PointScope,
) -> Result<(), AuthError> {
    if identity.role == Role::Administrator {
        return Ok(());
    }

    // Only organizations reach here; moderation was already refused.
    let owns_point = scope.organization_owned && scope.creator_id == Some(identity.actor_id);
    if !owns_point {
        return Err(AuthError::NotOwner(operation));
    }

    if operation == PointOperation::Edit && scope.approved {
        return Err(AuthError::AlreadyApproved);
    }

    Ok(())
}

//! Donation point mutation activities
//!
//! Every mutation checks the caller's role before touching storage, then runs
//! the point-level guard and the state transition inside `modify`, against
//! the locked record.

use tracing::info;

use crate::common::{
    Actor, ActorId, DomainError, DomainResult, Identity, PointId, PointOperation, Role,
};
use crate::domains::points::data::PointInput;
use crate::domains::points::models::DonationPoint;
use crate::kernel::{PointChange, ServerDeps};

/// Result of a delete
#[derive(Debug, Clone)]
pub enum DeleteOutcome {
    /// Organization-created point removed along with its favorites
    Hard(PointId),
    /// Admin-created point kept and deactivated
    Soft(DonationPoint),
}

/// Create a point. Organizations start PENDING, administrators ACTIVE.
pub async fn create_point(
    input: PointInput,
    identity: &Identity,
    deps: &ServerDeps,
) -> DomainResult<DonationPoint> {
    Actor::new(*identity).can(PointOperation::Create).check()?;

    let details = input.validate()?;
    let point = DonationPoint::new(details, identity);
    deps.points.insert(&point).await?;

    info!(
        point_id = %point.id,
        creator_id = %identity.actor_id,
        estado = %point.status,
        "Donation point created"
    );

    Ok(point)
}

/// Overwrite a point's details
pub async fn edit_point(
    point_id: PointId,
    input: PointInput,
    identity: &Identity,
    deps: &ServerDeps,
) -> DomainResult<DonationPoint> {
    Actor::new(*identity).can(PointOperation::Edit).check()?;
    let details = input.validate()?;

    let actor = *identity;
    let mutation = deps
        .points
        .modify(
            point_id,
            Box::new(move |point: &mut DonationPoint| -> DomainResult<PointChange> {
                Actor::new(actor)
                    .can(PointOperation::Edit)
                    .on(point.scope())
                    .check()?;
                point.apply_edit(details);
                Ok(PointChange::Saved)
            }),
        )
        .await?;

    info!(
        point_id = %point_id,
        actor_id = %identity.actor_id,
        reenviado = mutation.point.resubmitted,
        "Donation point edited"
    );

    Ok(mutation.point)
}

/// Approve a point awaiting review (admin only)
pub async fn approve_point(
    point_id: PointId,
    identity: &Identity,
    deps: &ServerDeps,
) -> DomainResult<DonationPoint> {
    Actor::new(*identity).can(PointOperation::Approve).check()?;

    let mutation = deps
        .points
        .modify(
            point_id,
            Box::new(|point: &mut DonationPoint| -> DomainResult<PointChange> {
                point.approve()?;
                Ok(PointChange::Saved)
            }),
        )
        .await?;

    info!(point_id = %point_id, reviewed_by = %identity.actor_id, "Donation point approved");

    Ok(mutation.point)
}

/// Reject a point awaiting review (admin only)
pub async fn reject_point(
    point_id: PointId,
    reason: &str,
    identity: &Identity,
    deps: &ServerDeps,
) -> DomainResult<DonationPoint> {
    Actor::new(*identity).can(PointOperation::Reject).check()?;

    let reason = reason.trim().to_string();
    if reason.is_empty() {
        return Err(DomainError::invalid("motivoRechazo is required"));
    }

    let mutation = deps
        .points
        .modify(
            point_id,
            Box::new(move |point: &mut DonationPoint| -> DomainResult<PointChange> {
                point.reject(&reason)?;
                Ok(PointChange::Saved)
            }),
        )
        .await?;

    info!(
        point_id = %point_id,
        reviewed_by = %identity.actor_id,
        reason = ?mutation.point.rejection_reason,
        "Donation point rejected"
    );

    Ok(mutation.point)
}

/// Flip the public visibility switch (admin only)
pub async fn toggle_point_active(
    point_id: PointId,
    identity: &Identity,
    deps: &ServerDeps,
) -> DomainResult<DonationPoint> {
    Actor::new(*identity).can(PointOperation::ToggleActive).check()?;

    let mutation = deps
        .points
        .modify(
            point_id,
            Box::new(|point: &mut DonationPoint| -> DomainResult<PointChange> {
                point.toggle_active();
                Ok(PointChange::Saved)
            }),
        )
        .await?;

    info!(point_id = %point_id, activo = mutation.point.active, "Donation point toggled");

    Ok(mutation.point)
}

/// Delete a point.
///
/// Organization-created points are removed outright, with their favorites.
/// Admin-created and legacy points are only deactivated. Organizations must
/// pass their own id as `claimed_owner`.
pub async fn delete_point(
    point_id: PointId,
    identity: &Identity,
    claimed_owner: Option<ActorId>,
    deps: &ServerDeps,
) -> DomainResult<DeleteOutcome> {
    Actor::new(*identity).can(PointOperation::Delete).check()?;

    if identity.role == Role::Organization {
        let claimed = claimed_owner
            .ok_or_else(|| DomainError::invalid("usuarioId is required to delete a point"))?;
        if claimed != identity.actor_id {
            return Err(DomainError::PermissionDenied(
                "usuarioId does not match the calling organization".into(),
            ));
        }
    }

    let actor = *identity;
    let mutation = deps
        .points
        .modify(
            point_id,
            Box::new(move |point: &mut DonationPoint| -> DomainResult<PointChange> {
                Actor::new(actor)
                    .can(PointOperation::Delete)
                    .on(point.scope())
                    .check()?;

                if point.is_organization_owned() {
                    Ok(PointChange::Removed)
                } else {
                    point.active = false;
                    Ok(PointChange::Saved)
                }
            }),
        )
        .await?;

    match mutation.change {
        PointChange::Removed => {
            let removed = deps.favorites.delete_by_point(point_id).await?;
            info!(
                point_id = %point_id,
                actor_id = %identity.actor_id,
                favorites_removed = removed,
                "Donation point deleted"
            );
            Ok(DeleteOutcome::Hard(point_id))
        }
        PointChange::Saved => {
            info!(
                point_id = %point_id,
                actor_id = %identity.actor_id,
                "Donation point deactivated"
            );
            Ok(DeleteOutcome::Soft(mutation.point))
        }
    }
}

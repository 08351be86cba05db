//! Favorites activities - per-donor bookmarks of donation points
//!
//! Mutations are limited to the donor who owns the favorite. Reads are also
//! open to administrators.

use tracing::{info, warn};

use crate::common::{ActorId, DomainError, DomainResult, FavoriteId, Identity, PointId, Role};
use crate::domains::favorites::models::{normalize_tag, parse_schedule_date, Favorite};
use crate::domains::points::models::DonationPoint;
use crate::kernel::ServerDeps;

fn ensure_donor_self(identity: &Identity, donor_id: ActorId) -> DomainResult<()> {
    if identity.role != Role::Donor {
        return Err(DomainError::PermissionDenied(
            "Only donors can keep favorites".into(),
        ));
    }
    if identity.actor_id != donor_id {
        return Err(DomainError::PermissionDenied(
            "Donors may only manage their own favorites".into(),
        ));
    }
    Ok(())
}

fn ensure_can_read(identity: &Identity, donor_id: ActorId) -> DomainResult<()> {
    if identity.is_admin() || identity.actor_id == donor_id {
        return Ok(());
    }
    Err(DomainError::PermissionDenied(
        "Favorites are visible only to their donor".into(),
    ))
}

/// Load a favorite the caller owns
async fn owned_favorite(
    favorite_id: FavoriteId,
    identity: &Identity,
    deps: &ServerDeps,
) -> DomainResult<Favorite> {
    let favorite = deps
        .favorites
        .find(favorite_id)
        .await?
        .ok_or_else(|| DomainError::not_found(format!("Favorite {} not found", favorite_id)))?;
    ensure_donor_self(identity, favorite.donor_id)?;
    Ok(favorite)
}

/// Bookmark a publicly visible point. Adding the same point twice returns the
/// existing favorite with `created = false`.
pub async fn add_favorite(
    donor_id: ActorId,
    point_id: PointId,
    identity: &Identity,
    deps: &ServerDeps,
) -> DomainResult<(Favorite, bool)> {
    ensure_donor_self(identity, donor_id)?;

    let visible = deps
        .points
        .find(point_id)
        .await?
        .is_some_and(|point| point.is_publicly_visible());
    if !visible {
        return Err(DomainError::conflict(format!(
            "Point {} is not available for favorites",
            point_id
        )));
    }

    let (favorite, created) = deps
        .favorites
        .insert_or_get(Favorite::new(donor_id, point_id))
        .await?;

    // A hard delete may have run between the visibility check and the insert
    if created && deps.points.find(point_id).await?.is_none() {
        deps.favorites.delete(favorite.id).await?;
        warn!(favorite_id = %favorite.id, point_id = %point_id, "Point deleted while adding favorite");
        return Err(DomainError::conflict(format!(
            "Point {} is not available for favorites",
            point_id
        )));
    }

    if created {
        info!(favorite_id = %favorite.id, donor_id = %donor_id, point_id = %point_id, "Favorite added");
    }

    Ok((favorite, created))
}

/// Remove a favorite. Missing favorites are an error.
pub async fn remove_favorite(
    favorite_id: FavoriteId,
    identity: &Identity,
    deps: &ServerDeps,
) -> DomainResult<()> {
    owned_favorite(favorite_id, identity, deps).await?;

    if !deps.favorites.delete(favorite_id).await? {
        return Err(DomainError::not_found(format!("Favorite {} not found", favorite_id)));
    }

    info!(favorite_id = %favorite_id, "Favorite removed");
    Ok(())
}

/// Overwrite the tag. A blank tag clears it.
pub async fn tag_favorite(
    favorite_id: FavoriteId,
    tag: Option<&str>,
    identity: &Identity,
    deps: &ServerDeps,
) -> DomainResult<Favorite> {
    let tag = normalize_tag(tag)?;
    owned_favorite(favorite_id, identity, deps).await?;

    let favorite = deps
        .favorites
        .set_tag(favorite_id, tag)
        .await?
        .ok_or_else(|| DomainError::not_found(format!("Favorite {} not found", favorite_id)))?;

    info!(favorite_id = %favorite_id, etiqueta = ?favorite.tag, "Favorite tagged");
    Ok(favorite)
}

/// Set or clear the planned visit date
pub async fn schedule_favorite(
    favorite_id: FavoriteId,
    date: Option<&str>,
    identity: &Identity,
    deps: &ServerDeps,
) -> DomainResult<Favorite> {
    let date = parse_schedule_date(date, deps.schedule_year)?;
    owned_favorite(favorite_id, identity, deps).await?;

    let favorite = deps
        .favorites
        .set_scheduled_date(favorite_id, date)
        .await?
        .ok_or_else(|| DomainError::not_found(format!("Favorite {} not found", favorite_id)))?;

    info!(favorite_id = %favorite_id, fecha_agendada = ?favorite.scheduled_date, "Favorite scheduled");
    Ok(favorite)
}

/// A single favorite
pub async fn get_favorite(
    favorite_id: FavoriteId,
    identity: &Identity,
    deps: &ServerDeps,
) -> DomainResult<Favorite> {
    let favorite = deps
        .favorites
        .find(favorite_id)
        .await?
        .ok_or_else(|| DomainError::not_found(format!("Favorite {} not found", favorite_id)))?;
    ensure_can_read(identity, favorite.donor_id)?;
    Ok(favorite)
}

/// A donor's favorites, each resolved to its point. Favorites whose point no
/// longer exists are skipped.
pub async fn list_donor_favorites(
    donor_id: ActorId,
    identity: &Identity,
    deps: &ServerDeps,
) -> DomainResult<Vec<(Favorite, DonationPoint)>> {
    ensure_can_read(identity, donor_id)?;

    let favorites = deps.favorites.list_by_donor(donor_id).await?;
    let mut resolved = Vec::with_capacity(favorites.len());
    for favorite in favorites {
        match deps.points.find(favorite.point_id).await? {
            Some(point) => resolved.push((favorite, point)),
            None => warn!(
                favorite_id = %favorite.id,
                point_id = %favorite.point_id,
                "Skipping favorite with missing point"
            ),
        }
    }
    Ok(resolved)
}

//! Donation point query activities
//!
//! Reads take an optional identity: anonymous callers only ever see points
//! that are on the public map.

use std::cmp::Ordering;
use tracing::debug;

use crate::common::{ActorId, DomainError, DomainResult, Identity, PointId, Role};
use crate::domains::points::data::validate_coordinates;
use crate::domains::points::filter::{filter_by_category, public_listing, CategoryFilter};
use crate::domains::points::models::{DonationPoint, PointStatus};
use crate::kernel::{PointQuery, ServerDeps};

/// Radius used by nearby search when the caller does not give one
pub const DEFAULT_NEARBY_RADIUS_KM: f64 = 10.0;

fn can_see(point: &DonationPoint, identity: Option<&Identity>) -> bool {
    if point.is_publicly_visible() {
        return true;
    }
    match identity {
        Some(identity) if identity.is_admin() => true,
        Some(identity) if identity.role == Role::Organization => {
            point.is_organization_owned() && point.creator_id == Some(identity.actor_id)
        }
        _ => false,
    }
}

/// Get a single point, if the caller may see it
pub async fn get_point(
    point_id: PointId,
    identity: Option<&Identity>,
    deps: &ServerDeps,
) -> DomainResult<DonationPoint> {
    debug!(point_id = %point_id, "Getting donation point");

    deps.points
        .find(point_id)
        .await?
        .filter(|point| can_see(point, identity))
        .ok_or_else(|| DomainError::not_found(format!("Point {} not found", point_id)))
}

/// Public map listing with an optional category filter
pub async fn list_public_points(
    category: &CategoryFilter,
    deps: &ServerDeps,
) -> DomainResult<Vec<DonationPoint>> {
    let points = deps
        .points
        .list(&PointQuery::all().with_status(PointStatus::Active))
        .await?;
    Ok(public_listing(points, category))
}

/// Management listing. Administrators see every point, organizations their
/// own. Without `include_all_states` only ACTIVE points are returned.
pub async fn list_managed_points(
    identity: &Identity,
    include_all_states: bool,
    category: &CategoryFilter,
    deps: &ServerDeps,
) -> DomainResult<Vec<DonationPoint>> {
    let mut query = match identity.role {
        Role::Administrator => PointQuery::all(),
        Role::Organization => PointQuery::all().created_by_organization(identity.actor_id),
        Role::Donor => {
            return Err(DomainError::PermissionDenied(
                "Donors have no management view".into(),
            ))
        }
    };
    if !include_all_states {
        query = query.with_status(PointStatus::Active);
    }

    let points = deps.points.list(&query).await?;
    Ok(filter_by_category(points, category))
}

/// Review queue (admin only)
pub async fn list_pending_points(
    identity: &Identity,
    deps: &ServerDeps,
) -> DomainResult<Vec<DonationPoint>> {
    if !identity.is_admin() {
        return Err(DomainError::PermissionDenied(
            "Administrator access required to view pending points".into(),
        ));
    }
    deps.points
        .list(&PointQuery::all().with_status(PointStatus::Pending))
        .await
}

/// Every point created by an organization, in any state
pub async fn list_organization_points(
    organization_id: ActorId,
    identity: &Identity,
    deps: &ServerDeps,
) -> DomainResult<Vec<DonationPoint>> {
    let allowed = identity.is_admin()
        || (identity.role == Role::Organization && identity.actor_id == organization_id);
    if !allowed {
        return Err(DomainError::PermissionDenied(
            "Only the organization itself or an administrator may list its points".into(),
        ));
    }

    deps.points
        .list(&PointQuery::all().created_by_organization(organization_id))
        .await
}

/// Case-insensitive substring search over public points
pub async fn search_points_by_name(
    name: &str,
    deps: &ServerDeps,
) -> DomainResult<Vec<DonationPoint>> {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return Err(DomainError::invalid("nombre is required"));
    }

    let points = list_public_points(&CategoryFilter::All, deps).await?;
    Ok(points
        .into_iter()
        .filter(|point| point.name.to_lowercase().contains(&needle))
        .collect())
}

/// Public points within `radius_km`, nearest first
pub async fn find_nearby_points(
    latitude: f64,
    longitude: f64,
    radius_km: Option<f64>,
    deps: &ServerDeps,
) -> DomainResult<Vec<(DonationPoint, f64)>> {
    validate_coordinates(latitude, longitude)?;
    let radius_km = radius_km.unwrap_or(DEFAULT_NEARBY_RADIUS_KM);
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(DomainError::invalid("radioKm must be a positive number"));
    }

    let points = list_public_points(&CategoryFilter::All, deps).await?;
    let mut nearby: Vec<(DonationPoint, f64)> = points
        .into_iter()
        .map(|point| {
            let distance = point.distance_km(latitude, longitude);
            (point, distance)
        })
        .filter(|(_, distance)| *distance <= radius_km)
        .collect();
    nearby.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

    debug!(count = nearby.len(), radius_km, "Nearby donation points");
    Ok(nearby)
}

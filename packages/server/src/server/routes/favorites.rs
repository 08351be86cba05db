//! Favorites endpoints under `/favoritos`

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    Json,
};

use crate::common::{ActorId, DomainError, DomainResult, FavoriteId, Id, PointId};
use crate::domains::favorites::activities;
use crate::domains::favorites::data::{
    AddFavoriteInput, FavoriteData, ScheduleFavoriteInput, TagFavoriteInput,
};
use crate::server::app::AppState;
use crate::server::error::invalid_request;
use crate::server::middleware::RequireIdentity;

fn parse_favorite_id(raw: &str) -> DomainResult<FavoriteId> {
    FavoriteId::parse(raw)
        .map_err(|_| DomainError::invalid(format!("Invalid favorite id: {}", raw)))
}

fn required_id<T>(raw: Option<&str>, field: &str) -> DomainResult<Id<T>> {
    let raw = raw
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| DomainError::invalid(format!("{} is required", field)))?;
    Id::parse(raw).map_err(|_| DomainError::invalid(format!("Invalid {}: {}", field, raw)))
}

/// GET /favoritos/usuario/:donorId
pub async fn list_favorites_handler(
    Extension(state): Extension<AppState>,
    RequireIdentity(identity): RequireIdentity,
    Path(donor_id): Path<String>,
) -> DomainResult<Json<Vec<FavoriteData>>> {
    let donor_id: ActorId = required_id(Some(&donor_id), "donorId")?;
    let favorites = activities::list_donor_favorites(donor_id, &identity, &state.deps).await?;
    Ok(Json(
        favorites
            .into_iter()
            .map(|(favorite, point)| FavoriteData::with_point(favorite, point))
            .collect(),
    ))
}

/// POST /favoritos
pub async fn add_favorite_handler(
    Extension(state): Extension<AppState>,
    RequireIdentity(identity): RequireIdentity,
    payload: Result<Json<AddFavoriteInput>, JsonRejection>,
) -> DomainResult<(StatusCode, Json<FavoriteData>)> {
    let Json(input) = payload.map_err(invalid_request)?;
    let donor_id: ActorId = required_id(input.donor_id.as_deref(), "donorId")?;
    let point_id: PointId = required_id(input.point_id.as_deref(), "pointId")?;

    let (favorite, created) =
        activities::add_favorite(donor_id, point_id, &identity, &state.deps).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(favorite.into())))
}

/// GET /favoritos/:id
pub async fn get_favorite_handler(
    Extension(state): Extension<AppState>,
    RequireIdentity(identity): RequireIdentity,
    Path(favorite_id): Path<String>,
) -> DomainResult<Json<FavoriteData>> {
    let favorite_id = parse_favorite_id(&favorite_id)?;
    let favorite = activities::get_favorite(favorite_id, &identity, &state.deps).await?;
    Ok(Json(favorite.into()))
}

/// DELETE /favoritos/:id
pub async fn remove_favorite_handler(
    Extension(state): Extension<AppState>,
    RequireIdentity(identity): RequireIdentity,
    Path(favorite_id): Path<String>,
) -> DomainResult<StatusCode> {
    let favorite_id = parse_favorite_id(&favorite_id)?;
    activities::remove_favorite(favorite_id, &identity, &state.deps).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /favoritos/:id/etiqueta
pub async fn tag_favorite_handler(
    Extension(state): Extension<AppState>,
    RequireIdentity(identity): RequireIdentity,
    Path(favorite_id): Path<String>,
    payload: Result<Json<TagFavoriteInput>, JsonRejection>,
) -> DomainResult<Json<FavoriteData>> {
    let favorite_id = parse_favorite_id(&favorite_id)?;
    let Json(input) = payload.map_err(invalid_request)?;
    let favorite = activities::tag_favorite(
        favorite_id,
        input.etiqueta.as_deref(),
        &identity,
        &state.deps,
    )
    .await?;
    Ok(Json(favorite.into()))
}

/// PUT /favoritos/:id/agendar
pub async fn schedule_favorite_handler(
    Extension(state): Extension<AppState>,
    RequireIdentity(identity): RequireIdentity,
    Path(favorite_id): Path<String>,
    payload: Result<Json<ScheduleFavoriteInput>, JsonRejection>,
) -> DomainResult<Json<FavoriteData>> {
    let favorite_id = parse_favorite_id(&favorite_id)?;
    let Json(input) = payload.map_err(invalid_request)?;
    let favorite = activities::schedule_favorite(
        favorite_id,
        input.fecha_agendada.as_deref(),
        &identity,
        &state.deps,
    )
    .await?;
    Ok(Json(favorite.into()))
}

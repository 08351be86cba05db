//! Donation point endpoints under `/puntos-donacion`

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Extension, Path, Query},
    http::StatusCode,
    Json,
};

use crate::common::{ActorId, DomainError, DomainResult, PointId};
use crate::domains::points::activities::{self, DeleteOutcome};
use crate::domains::points::models::parse_flag;
use crate::domains::points::data::{
    DeletePointParams, DeletePointResult, DonationPointData, ListPointsParams, NearbyParams,
    NearbyPointData, PointInput, RejectPointInput, SearchParams,
};
use crate::domains::points::filter::CategoryFilter;
use crate::server::app::AppState;
use crate::server::error::invalid_request;
use crate::server::middleware::{MaybeIdentity, RequireIdentity};

type PointsResponse = DomainResult<Json<Vec<DonationPointData>>>;

fn parse_point_id(raw: &str) -> DomainResult<PointId> {
    PointId::parse(raw).map_err(|_| DomainError::invalid(format!("Invalid point id: {}", raw)))
}

fn parse_actor_id(raw: &str) -> DomainResult<ActorId> {
    ActorId::parse(raw).map_err(|_| DomainError::invalid(format!("Invalid user id: {}", raw)))
}

fn to_data(points: Vec<crate::domains::points::DonationPoint>) -> Vec<DonationPointData> {
    points.into_iter().map(DonationPointData::from).collect()
}

/// GET /puntos-donacion?tipo=
pub async fn list_points_handler(
    Extension(state): Extension<AppState>,
    params: Result<Query<ListPointsParams>, QueryRejection>,
) -> PointsResponse {
    let Query(params) = params.map_err(invalid_request)?;
    let filter = CategoryFilter::parse(params.tipo.as_deref());

    let points = activities::list_public_points(&filter, &state.deps).await?;
    Ok(Json(to_data(points)))
}

/// GET /puntos-donacion/gestion?todos=&tipo=
pub async fn managed_points_handler(
    Extension(state): Extension<AppState>,
    RequireIdentity(identity): RequireIdentity,
    params: Result<Query<ListPointsParams>, QueryRejection>,
) -> PointsResponse {
    let Query(params) = params.map_err(invalid_request)?;
    let include_all_states = params.todos.as_deref().map_or(false, parse_flag);
    let filter = CategoryFilter::parse(params.tipo.as_deref());

    let points =
        activities::list_managed_points(&identity, include_all_states, &filter, &state.deps)
            .await?;
    Ok(Json(to_data(points)))
}

/// GET /puntos-donacion/pendientes
pub async fn pending_points_handler(
    Extension(state): Extension<AppState>,
    RequireIdentity(identity): RequireIdentity,
) -> PointsResponse {
    let points = activities::list_pending_points(&identity, &state.deps).await?;
    Ok(Json(to_data(points)))
}

/// GET /puntos-donacion/organizacion/:id
pub async fn organization_points_handler(
    Extension(state): Extension<AppState>,
    RequireIdentity(identity): RequireIdentity,
    Path(organization_id): Path<String>,
) -> PointsResponse {
    let organization_id = parse_actor_id(&organization_id)?;
    let points =
        activities::list_organization_points(organization_id, &identity, &state.deps).await?;
    Ok(Json(to_data(points)))
}

/// GET /puntos-donacion/buscar?nombre=
pub async fn search_points_handler(
    Extension(state): Extension<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> PointsResponse {
    let Query(params) = params.map_err(invalid_request)?;
    let name = params.nombre.unwrap_or_default();

    let points = activities::search_points_by_name(&name, &state.deps).await?;
    Ok(Json(to_data(points)))
}

/// GET /puntos-donacion/cercanos?latitud=&longitud=&radioKm=
pub async fn nearby_points_handler(
    Extension(state): Extension<AppState>,
    params: Result<Query<NearbyParams>, QueryRejection>,
) -> DomainResult<Json<Vec<NearbyPointData>>> {
    let Query(params) = params.map_err(invalid_request)?;
    let (latitude, longitude) = match (params.latitud, params.longitud) {
        (Some(latitude), Some(longitude)) => (latitude, longitude),
        _ => return Err(DomainError::invalid("latitud and longitud are required")),
    };

    let nearby =
        activities::find_nearby_points(latitude, longitude, params.radio_km, &state.deps).await?;
    Ok(Json(
        nearby
            .into_iter()
            .map(|(point, distance)| NearbyPointData {
                punto: point.into(),
                distancia_km: distance,
            })
            .collect(),
    ))
}

/// GET /puntos-donacion/:id
pub async fn get_point_handler(
    Extension(state): Extension<AppState>,
    MaybeIdentity(identity): MaybeIdentity,
    Path(point_id): Path<String>,
) -> DomainResult<Json<DonationPointData>> {
    let point_id = parse_point_id(&point_id)?;
    let point = activities::get_point(point_id, identity.as_ref(), &state.deps).await?;
    Ok(Json(point.into()))
}

/// POST /puntos-donacion
pub async fn create_point_handler(
    Extension(state): Extension<AppState>,
    RequireIdentity(identity): RequireIdentity,
    payload: Result<Json<PointInput>, JsonRejection>,
) -> DomainResult<(StatusCode, Json<DonationPointData>)> {
    let Json(input) = payload.map_err(invalid_request)?;
    let point = activities::create_point(input, &identity, &state.deps).await?;
    Ok((StatusCode::CREATED, Json(point.into())))
}

/// PUT /puntos-donacion/:id
pub async fn edit_point_handler(
    Extension(state): Extension<AppState>,
    RequireIdentity(identity): RequireIdentity,
    Path(point_id): Path<String>,
    payload: Result<Json<PointInput>, JsonRejection>,
) -> DomainResult<Json<DonationPointData>> {
    let point_id = parse_point_id(&point_id)?;
    let Json(input) = payload.map_err(invalid_request)?;
    let point = activities::edit_point(point_id, input, &identity, &state.deps).await?;
    Ok(Json(point.into()))
}

/// DELETE /puntos-donacion/:id?usuarioId=
pub async fn delete_point_handler(
    Extension(state): Extension<AppState>,
    RequireIdentity(identity): RequireIdentity,
    Path(point_id): Path<String>,
    params: Result<Query<DeletePointParams>, QueryRejection>,
) -> DomainResult<Json<DeletePointResult>> {
    let point_id = parse_point_id(&point_id)?;
    let Query(params) = params.map_err(invalid_request)?;
    let claimed_owner = match params.usuario_id.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(parse_actor_id(raw)?),
    };

    let outcome = activities::delete_point(point_id, &identity, claimed_owner, &state.deps).await?;
    let result = match outcome {
        DeleteOutcome::Hard(id) => DeletePointResult {
            id: id.to_string(),
            eliminado: true,
            punto: None,
        },
        DeleteOutcome::Soft(point) => DeletePointResult {
            id: point.id.to_string(),
            eliminado: false,
            punto: Some(point.into()),
        },
    };
    Ok(Json(result))
}

/// POST /puntos-donacion/:id/aprobar
pub async fn approve_point_handler(
    Extension(state): Extension<AppState>,
    RequireIdentity(identity): RequireIdentity,
    Path(point_id): Path<String>,
) -> DomainResult<Json<DonationPointData>> {
    let point_id = parse_point_id(&point_id)?;
    let point = activities::approve_point(point_id, &identity, &state.deps).await?;
    Ok(Json(point.into()))
}

/// POST /puntos-donacion/:id/rechazar
pub async fn reject_point_handler(
    Extension(state): Extension<AppState>,
    RequireIdentity(identity): RequireIdentity,
    Path(point_id): Path<String>,
    payload: Result<Json<RejectPointInput>, JsonRejection>,
) -> DomainResult<Json<DonationPointData>> {
    let point_id = parse_point_id(&point_id)?;
    let Json(input) = payload.map_err(invalid_request)?;
    let point =
        activities::reject_point(point_id, &input.motivo_rechazo, &identity, &state.deps).await?;
    Ok(Json(point.into()))
}

/// POST /puntos-donacion/:id/alternar-activo
pub async fn toggle_point_handler(
    Extension(state): Extension<AppState>,
    RequireIdentity(identity): RequireIdentity,
    Path(point_id): Path<String>,
) -> DomainResult<Json<DonationPointData>> {
    let point_id = parse_point_id(&point_id)?;
    let point = activities::toggle_point_active(point_id, &identity, &state.deps).await?;
    Ok(Json(point.into()))
}

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::activation::normalize_active;
use super::category::{decode, encode};
use crate::common::{ActorId, DomainError, DomainResult, Identity, PointId, PointScope, Role};

/// Mean Earth radius used for distance queries
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Lifecycle state of a donation point
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PointStatus {
    #[serde(rename = "PENDIENTE")]
    Pending,
    #[serde(rename = "ACTIVO")]
    Active,
    #[serde(rename = "RECHAZADO")]
    Rejected,
}

impl std::fmt::Display for PointStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PointStatus::Pending => write!(f, "PENDIENTE"),
            PointStatus::Active => write!(f, "ACTIVO"),
            PointStatus::Rejected => write!(f, "RECHAZADO"),
        }
    }
}

impl std::str::FromStr for PointStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "PENDIENTE" => Ok(PointStatus::Pending),
            "ACTIVO" => Ok(PointStatus::Active),
            "RECHAZADO" => Ok(PointStatus::Rejected),
            _ => Err(anyhow::anyhow!("Invalid point status: {}", s)),
        }
    }
}

/// Who created a point. Absent on legacy rows, which count as admin-created.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CreatorType {
    #[serde(rename = "ADMINISTRADOR")]
    Administrator,
    #[serde(rename = "ORGANIZACION")]
    Organization,
}

impl std::fmt::Display for CreatorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreatorType::Administrator => write!(f, "ADMINISTRADOR"),
            CreatorType::Organization => write!(f, "ORGANIZACION"),
        }
    }
}

impl std::str::FromStr for CreatorType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ADMINISTRADOR" => Ok(CreatorType::Administrator),
            "ORGANIZACION" => Ok(CreatorType::Organization),
            _ => Err(anyhow::anyhow!("Invalid creator type: {}", s)),
        }
    }
}

/// Validated, caller-editable fields of a point
#[derive(Debug, Clone, PartialEq)]
pub struct PointDetails {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub categories: Vec<String>,
    pub open_time: Option<NaiveTime>,
    pub close_time: Option<NaiveTime>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// A physical donation drop-off point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationPoint {
    pub id: PointId,

    // Details
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub categories: Vec<String>,
    pub open_time: Option<NaiveTime>,
    pub close_time: Option<NaiveTime>,
    pub phone: Option<String>,
    pub email: Option<String>,

    // Visibility
    pub active: bool,

    // Moderation workflow
    pub status: PointStatus,
    pub rejection_reason: Option<String>,
    pub resubmitted: bool,

    // Ownership
    pub creator_id: Option<ActorId>,
    pub creator_type: Option<CreatorType>,

    // Timestamps
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DonationPoint {
    /// Build a new point for its creator. Organizations start in review,
    /// administrators publish directly.
    pub fn new(details: PointDetails, creator: &Identity) -> Self {
        let (status, creator_type) = match creator.role {
            Role::Organization => (PointStatus::Pending, CreatorType::Organization),
            _ => (PointStatus::Active, CreatorType::Administrator),
        };
        let now = Utc::now();

        Self {
            id: PointId::new(),
            name: details.name,
            address: details.address,
            latitude: details.latitude,
            longitude: details.longitude,
            categories: details.categories,
            open_time: details.open_time,
            close_time: details.close_time,
            phone: details.phone,
            email: details.email,
            active: true,
            status,
            rejection_reason: None,
            resubmitted: false,
            creator_id: Some(creator.actor_id),
            creator_type: Some(creator_type),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn scope(&self) -> PointScope {
        PointScope {
            creator_id: self.creator_id,
            organization_owned: self.is_organization_owned(),
            approved: self.status == PointStatus::Active,
        }
    }

    pub fn is_organization_owned(&self) -> bool {
        self.creator_type == Some(CreatorType::Organization)
    }

    /// Shown on the public map and available to donors
    pub fn is_publicly_visible(&self) -> bool {
        self.status == PointStatus::Active && self.active
    }

    /// PENDING, or REJECTED and edited since the rejection
    pub fn is_awaiting_review(&self) -> bool {
        match self.status {
            PointStatus::Pending => true,
            PointStatus::Rejected => self.resubmitted,
            PointStatus::Active => false,
        }
    }

    pub fn has_category(&self, category: &str) -> bool {
        let category = category.trim();
        self.categories
            .iter()
            .any(|tag| tag.trim().eq_ignore_ascii_case(category))
    }

    pub fn approve(&mut self) -> DomainResult<()> {
        if !self.is_awaiting_review() {
            return Err(DomainError::conflict(format!(
                "Point {} is not awaiting review (state {})",
                self.id, self.status
            )));
        }

        self.status = PointStatus::Active;
        self.rejection_reason = None;
        self.resubmitted = false;
        Ok(())
    }

    pub fn reject(&mut self, reason: &str) -> DomainResult<()> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(DomainError::invalid("Rejection reason is required"));
        }
        if !self.is_awaiting_review() {
            return Err(DomainError::conflict(format!(
                "Point {} is not awaiting review (state {})",
                self.id, self.status
            )));
        }

        self.status = PointStatus::Rejected;
        self.rejection_reason = Some(reason.to_string());
        self.resubmitted = false;
        Ok(())
    }

    /// Overwrite the editable fields. State, ownership and id are untouched.
    pub fn apply_edit(&mut self, details: PointDetails) {
        self.name = details.name;
        self.address = details.address;
        self.latitude = details.latitude;
        self.longitude = details.longitude;
        self.categories = details.categories;
        self.open_time = details.open_time;
        self.close_time = details.close_time;
        self.phone = details.phone;
        self.email = details.email;

        if self.status == PointStatus::Rejected {
            self.resubmitted = true;
        }
    }

    pub fn toggle_active(&mut self) {
        self.active = !self.active;
    }

    /// Great-circle distance from the given coordinates
    pub fn distance_km(&self, latitude: f64, longitude: f64) -> f64 {
        haversine_km(self.latitude, self.longitude, latitude, longitude)
    }
}

pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Row shape of `puntos_donacion`
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct PointRecord {
    pub id: Uuid,
    pub nombre: String,
    pub direccion: String,
    pub latitud: f64,
    pub longitud: f64,
    pub tipo_donacion: String,
    pub horario_apertura: Option<NaiveTime>,
    pub horario_cierre: Option<NaiveTime>,
    pub telefono: Option<String>,
    pub email: Option<String>,
    pub activo: Option<serde_json::Value>,
    pub estado: String,
    pub motivo_rechazo: Option<String>,
    pub reenviado: bool,
    pub usuario_creador_id: Option<Uuid>,
    pub tipo_creador: Option<String>,
    pub fecha_creacion: DateTime<Utc>,
    pub fecha_actualizacion: DateTime<Utc>,
}

impl PointRecord {
    /// Decode a stored row. Categories and the active flag are normalized here
    /// and nowhere else.
    pub fn into_point(self) -> Result<DonationPoint> {
        let status = self
            .estado
            .parse::<PointStatus>()
            .with_context(|| format!("Corrupt estado on point {}", self.id))?;
        let creator_type = self
            .tipo_creador
            .as_deref()
            .map(str::parse::<CreatorType>)
            .transpose()
            .with_context(|| format!("Corrupt tipo_creador on point {}", self.id))?;

        Ok(DonationPoint {
            id: PointId::from_uuid(self.id),
            name: self.nombre,
            address: self.direccion,
            latitude: self.latitud,
            longitude: self.longitud,
            categories: decode(&self.tipo_donacion),
            open_time: self.horario_apertura,
            close_time: self.horario_cierre,
            phone: self.telefono,
            email: self.email,
            active: normalize_active(self.activo.as_ref()),
            status,
            rejection_reason: self.motivo_rechazo,
            resubmitted: self.reenviado,
            creator_id: self.usuario_creador_id.map(ActorId::from_uuid),
            creator_type,
            created_at: self.fecha_creacion,
            updated_at: self.fecha_actualizacion,
        })
    }

    pub fn from_point(point: &DonationPoint) -> Self {
        Self {
            id: point.id.into_uuid(),
            nombre: point.name.clone(),
            direccion: point.address.clone(),
            latitud: point.latitude,
            longitud: point.longitude,
            tipo_donacion: encode(&point.categories),
            horario_apertura: point.open_time,
            horario_cierre: point.close_time,
            telefono: point.phone.clone(),
            email: point.email.clone(),
            activo: Some(serde_json::Value::Bool(point.active)),
            estado: point.status.to_string(),
            motivo_rechazo: point.rejection_reason.clone(),
            reenviado: point.resubmitted,
            usuario_creador_id: point.creator_id.map(|id| id.into_uuid()),
            tipo_creador: point.creator_type.map(|t| t.to_string()),
            fecha_creacion: point.created_at,
            fecha_actualizacion: point.updated_at,
        }
    }
}

use chrono::{DateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{DomainError, DomainResult};
use crate::domains::points::models::{
    decode, encode, Category, CreatorType, DonationPoint, PointDetails, PointStatus,
};

/// Donation point as exposed over the API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationPointData {
    pub id: String,

    pub nombre: String,
    pub direccion: String,
    pub latitud: f64,
    pub longitud: f64,

    /// Encoded category column, kept for legacy clients
    pub tipo_donacion: String,
    pub tipos_donacion: Vec<String>,

    pub horario_apertura: Option<String>,
    pub horario_cierre: Option<String>,
    pub telefono: Option<String>,
    pub email: Option<String>,

    pub activo: bool,
    pub estado: PointStatus,
    pub motivo_rechazo: Option<String>,
    pub reenviado: bool,

    pub usuario_creador_id: Option<String>,
    pub tipo_creador: Option<CreatorType>,

    pub fecha_creacion: DateTime<Utc>,
    pub fecha_actualizacion: DateTime<Utc>,
}

impl From<DonationPoint> for DonationPointData {
    fn from(point: DonationPoint) -> Self {
        Self {
            id: point.id.to_string(),
            nombre: point.name,
            direccion: point.address,
            latitud: point.latitude,
            longitud: point.longitude,
            tipo_donacion: encode(&point.categories),
            tipos_donacion: point.categories,
            horario_apertura: point.open_time.map(format_time),
            horario_cierre: point.close_time.map(format_time),
            telefono: point.phone,
            email: point.email,
            activo: point.active,
            estado: point.status,
            motivo_rechazo: point.rejection_reason,
            reenviado: point.resubmitted,
            usuario_creador_id: point.creator_id.map(|id| id.to_string()),
            tipo_creador: point.creator_type,
            fecha_creacion: point.created_at,
            fecha_actualizacion: point.updated_at,
        }
    }
}

fn format_time(time: NaiveTime) -> String {
    if time.second() == 0 {
        time.format("%H:%M").to_string()
    } else {
        time.format("%H:%M:%S").to_string()
    }
}

/// Create/edit payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PointInput {
    pub nombre: String,
    pub direccion: String,
    pub latitud: Option<f64>,
    pub longitud: Option<f64>,
    pub tipos_donacion: Vec<String>,
    /// Legacy single-field form, used only when `tiposDonacion` is empty
    pub tipo_donacion: Option<String>,
    pub horario_apertura: Option<String>,
    pub horario_cierre: Option<String>,
    pub telefono: Option<String>,
    pub email: Option<String>,
}

impl PointInput {
    pub fn validate(self) -> DomainResult<PointDetails> {
        let name = required_text(&self.nombre, "nombre")?;
        let address = required_text(&self.direccion, "direccion")?;

        let latitude = self
            .latitud
            .ok_or_else(|| DomainError::invalid("latitud is required"))?;
        let longitude = self
            .longitud
            .ok_or_else(|| DomainError::invalid("longitud is required"))?;
        validate_coordinates(latitude, longitude)?;

        let raw_categories = if self.tipos_donacion.is_empty() {
            self.tipo_donacion.as_deref().map(decode).unwrap_or_default()
        } else {
            self.tipos_donacion
        };

        Ok(PointDetails {
            name,
            address,
            latitude,
            longitude,
            categories: canonical_categories(&raw_categories)?,
            open_time: parse_time(self.horario_apertura.as_deref(), "horarioApertura")?,
            close_time: parse_time(self.horario_cierre.as_deref(), "horarioCierre")?,
            phone: optional_text(self.telefono),
            email: optional_text(self.email),
        })
    }
}

fn required_text(value: &str, field: &str) -> DomainResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::invalid(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Latitude in [-90, 90] and longitude in [-180, 180], both finite
pub fn validate_coordinates(latitude: f64, longitude: f64) -> DomainResult<()> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(DomainError::invalid("latitud must be between -90 and 90"));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(DomainError::invalid("longitud must be between -180 and 180"));
    }
    Ok(())
}

/// Map input tags onto the vocabulary, lowercase, first occurrence wins
fn canonical_categories(raw: &[String]) -> DomainResult<Vec<String>> {
    let mut categories: Vec<String> = Vec::with_capacity(raw.len());
    for tag in raw {
        let category = tag
            .parse::<Category>()
            .map_err(|e| DomainError::invalid(e.to_string()))?;
        let name = category.as_str().to_string();
        if !categories.contains(&name) {
            categories.push(name);
        }
    }

    if categories.is_empty() {
        return Err(DomainError::invalid(
            "tiposDonacion must contain at least one category",
        ));
    }
    Ok(categories)
}

fn parse_time(value: Option<&str>, field: &str) -> DomainResult<Option<NaiveTime>> {
    let value = match value.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(value) => value,
    };

    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map(Some)
        .map_err(|_| DomainError::invalid(format!("{} must be HH:MM or HH:MM:SS", field)))
}

/// Reject body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RejectPointInput {
    pub motivo_rechazo: String,
}

/// Query string of the delete endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletePointParams {
    pub usuario_id: Option<String>,
}

/// Query string of the listing endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPointsParams {
    pub tipo: Option<String>,
    pub todos: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchParams {
    pub nombre: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyParams {
    pub latitud: Option<f64>,
    pub longitud: Option<f64>,
    pub radio_km: Option<f64>,
}

/// Outcome of a delete call
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletePointResult {
    pub id: String,
    /// True when the record was removed, false when it was only deactivated
    pub eliminado: bool,
    pub punto: Option<DonationPointData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyPointData {
    #[serde(flatten)]
    pub punto: DonationPointData,
    pub distancia_km: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> PointInput {
        PointInput {
            nombre: "  Centro Norte ".into(),
            direccion: "Av. Siempre Viva 742".into(),
            latitud: Some(-34.6),
            longitud: Some(-58.4),
            tipos_donacion: vec!["Ropa".into(), "papel".into(), "ROPA".into()],
            horario_apertura: Some("09:00".into()),
            horario_cierre: Some("18:30:15".into()),
            telefono: Some("".into()),
            email: Some(" centro@example.org ".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_normalizes_fields() {
        let details = input().validate().unwrap();
        assert_eq!(details.name, "Centro Norte");
        assert_eq!(details.categories, vec!["ropa".to_string(), "papel".to_string()]);
        assert_eq!(details.open_time, NaiveTime::from_hms_opt(9, 0, 0));
        assert_eq!(details.close_time, NaiveTime::from_hms_opt(18, 30, 15));
        assert_eq!(details.phone, None);
        assert_eq!(details.email.as_deref(), Some("centro@example.org"));
    }

    #[test]
    fn test_validate_rejects_missing_fields() {
        let mut blank_name = input();
        blank_name.nombre = "   ".into();
        assert!(matches!(blank_name.validate(), Err(DomainError::InvalidInput(_))));

        let mut no_categories = input();
        no_categories.tipos_donacion.clear();
        assert!(matches!(no_categories.validate(), Err(DomainError::InvalidInput(_))));

        let mut no_latitude = input();
        no_latitude.latitud = None;
        assert!(matches!(no_latitude.validate(), Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut unknown = input();
        unknown.tipos_donacion = vec!["metal".into()];
        assert!(matches!(unknown.validate(), Err(DomainError::InvalidInput(_))));

        let mut out_of_range = input();
        out_of_range.latitud = Some(91.0);
        assert!(matches!(out_of_range.validate(), Err(DomainError::InvalidInput(_))));

        let mut not_finite = input();
        not_finite.longitud = Some(f64::NAN);
        assert!(matches!(not_finite.validate(), Err(DomainError::InvalidInput(_))));

        let mut bad_time = input();
        bad_time.horario_apertura = Some("9am".into());
        assert!(matches!(bad_time.validate(), Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn test_legacy_category_field_is_accepted() {
        let mut legacy = input();
        legacy.tipos_donacion.clear();
        legacy.tipo_donacion = Some(r#"["vidrio","otros"]"#.into());
        let details = legacy.validate().unwrap();
        assert_eq!(details.categories, vec!["vidrio".to_string(), "otros".to_string()]);
    }

    #[test]
    fn test_point_data_carries_both_category_forms() {
        let payload = serde_json::json!({
            "nombre": "Punto Sur",
            "direccion": "Calle 1",
            "latitud": -34.7,
            "longitud": -58.5,
            "tiposDonacion": ["vidrio"]
        });
        let input: PointInput = serde_json::from_value(payload).unwrap();
        let details = input.validate().unwrap();
        let point = DonationPoint::new(
            details,
            &crate::common::Identity::administrator(crate::common::ActorId::new()),
        );

        let json = serde_json::to_value(DonationPointData::from(point)).unwrap();
        assert_eq!(json["tipoDonacion"], r#"["vidrio"]"#);
        assert_eq!(json["tiposDonacion"][0], "vidrio");
        assert_eq!(json["estado"], "ACTIVO");
        assert_eq!(json["tipoCreador"], "ADMINISTRADOR");
    }
}

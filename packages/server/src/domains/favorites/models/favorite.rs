use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{ActorId, DomainError, DomainResult, FavoriteId, PointId};

/// Maximum tag length, in characters
pub const MAX_TAG_LEN: usize = 100;

/// A donor's bookmark of a donation point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Favorite {
    pub id: FavoriteId,
    #[sqlx(rename = "usuario_id")]
    pub donor_id: ActorId,
    #[sqlx(rename = "punto_donacion_id")]
    pub point_id: PointId,
    #[sqlx(rename = "etiqueta")]
    pub tag: Option<String>,
    #[sqlx(rename = "fecha_agendada")]
    pub scheduled_date: Option<NaiveDate>,
    #[sqlx(rename = "fecha_agregado")]
    pub created_at: DateTime<Utc>,
}

impl Favorite {
    pub fn new(donor_id: ActorId, point_id: PointId) -> Self {
        Self {
            id: FavoriteId::new(),
            donor_id,
            point_id,
            tag: None,
            scheduled_date: None,
            created_at: Utc::now(),
        }
    }
}

/// Blank tags mean no tag.
pub fn normalize_tag(raw: Option<&str>) -> DomainResult<Option<String>> {
    let tag = match raw.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(tag) => tag,
    };

    if tag.chars().count() > MAX_TAG_LEN {
        return Err(DomainError::invalid(format!(
            "etiqueta must be at most {} characters",
            MAX_TAG_LEN
        )));
    }
    Ok(Some(tag.to_string()))
}

/// Parse an ISO date that must fall in the operating year. Blank clears.
pub fn parse_schedule_date(raw: Option<&str>, operating_year: i32) -> DomainResult<Option<NaiveDate>> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(raw) => raw,
    };

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| DomainError::invalid("fechaAgendada must be an ISO date (YYYY-MM-DD)"))?;

    if date.year() != operating_year {
        return Err(DomainError::invalid(format!(
            "fechaAgendada must fall within {}",
            operating_year
        )));
    }
    Ok(Some(date))
}

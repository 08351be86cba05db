use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domains::favorites::models::Favorite;
use crate::domains::points::data::DonationPointData;
use crate::domains::points::models::DonationPoint;

/// Favorite as exposed over the API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteData {
    pub id: String,
    pub donor_id: String,
    pub point_id: String,
    pub etiqueta: Option<String>,
    pub fecha_agendada: Option<NaiveDate>,
    pub fecha_agregado: DateTime<Utc>,
    /// Resolved point, present on listings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub punto_donacion: Option<DonationPointData>,
}

impl From<Favorite> for FavoriteData {
    fn from(favorite: Favorite) -> Self {
        Self {
            id: favorite.id.to_string(),
            donor_id: favorite.donor_id.to_string(),
            point_id: favorite.point_id.to_string(),
            etiqueta: favorite.tag,
            fecha_agendada: favorite.scheduled_date,
            fecha_agregado: favorite.created_at,
            punto_donacion: None,
        }
    }
}

impl FavoriteData {
    pub fn with_point(favorite: Favorite, point: DonationPoint) -> Self {
        Self {
            punto_donacion: Some(point.into()),
            ..favorite.into()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFavoriteInput {
    pub donor_id: Option<String>,
    pub point_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagFavoriteInput {
    pub etiqueta: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleFavoriteInput {
    pub fecha_agendada: Option<String>,
}

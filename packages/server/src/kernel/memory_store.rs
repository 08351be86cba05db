//! In-memory stores, used when no database is configured and by tests.
//!
//! Points are kept in their storage row shape so reads go through the same
//! decoding path as the Postgres store.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::traits::{
    BaseFavoriteStore, BasePointStore, PointChange, PointMutation, PointMutator, PointQuery,
};
use crate::common::{ActorId, DomainError, DomainResult, FavoriteId, PointId};
use crate::domains::favorites::models::Favorite;
use crate::domains::points::models::{DonationPoint, PointRecord};

// =============================================================================
// Points
// =============================================================================

#[derive(Default)]
pub struct InMemoryPointStore {
    records: RwLock<HashMap<Uuid, PointRecord>>,
}

impl InMemoryPointStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw row, e.g. a legacy record with a plain-text category or a
    /// string `activo` flag.
    pub async fn insert_record(&self, record: PointRecord) {
        self.records.write().await.insert(record.id, record);
    }
}

#[async_trait]
impl BasePointStore for InMemoryPointStore {
    async fn insert(&self, point: &DonationPoint) -> DomainResult<()> {
        let mut records = self.records.write().await;
        let id = point.id.into_uuid();
        if records.contains_key(&id) {
            return Err(DomainError::conflict(format!("Point {} already exists", point.id)));
        }
        records.insert(id, PointRecord::from_point(point));
        Ok(())
    }

    async fn find(&self, id: PointId) -> DomainResult<Option<DonationPoint>> {
        let records = self.records.read().await;
        records
            .get(id.as_uuid())
            .cloned()
            .map(PointRecord::into_point)
            .transpose()
            .map_err(DomainError::from)
    }

    async fn list(&self, query: &PointQuery) -> DomainResult<Vec<DonationPoint>> {
        let records = self.records.read().await;
        let mut points = Vec::with_capacity(records.len());
        for record in records.values() {
            let point = record.clone().into_point()?;
            if query.matches(&point) {
                points.push(point);
            }
        }
        points.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(points)
    }

    async fn modify(&self, id: PointId, mutator: PointMutator) -> DomainResult<PointMutation> {
        // The write guard is held for the whole read-mutate-write cycle
        let mut records = self.records.write().await;
        let record = records
            .get(id.as_uuid())
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("Point {} not found", id)))?;

        let mut point = record.into_point()?;
        let change = mutator(&mut point)?;

        match change {
            PointChange::Saved => {
                point.updated_at = Utc::now();
                records.insert(id.into_uuid(), PointRecord::from_point(&point));
            }
            PointChange::Removed => {
                records.remove(id.as_uuid());
            }
        }

        Ok(PointMutation { point, change })
    }

    async fn ping(&self) -> DomainResult<()> {
        Ok(())
    }
}

// =============================================================================
// Favorites
// =============================================================================

#[derive(Default)]
pub struct InMemoryFavoriteStore {
    favorites: RwLock<HashMap<FavoriteId, Favorite>>,
}

impl InMemoryFavoriteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseFavoriteStore for InMemoryFavoriteStore {
    async fn insert_or_get(&self, favorite: Favorite) -> DomainResult<(Favorite, bool)> {
        let mut favorites = self.favorites.write().await;
        let existing = favorites
            .values()
            .find(|f| f.donor_id == favorite.donor_id && f.point_id == favorite.point_id);
        if let Some(existing) = existing {
            return Ok((existing.clone(), false));
        }

        favorites.insert(favorite.id, favorite.clone());
        Ok((favorite, true))
    }

    async fn find(&self, id: FavoriteId) -> DomainResult<Option<Favorite>> {
        Ok(self.favorites.read().await.get(&id).cloned())
    }

    async fn list_by_donor(&self, donor_id: ActorId) -> DomainResult<Vec<Favorite>> {
        let favorites = self.favorites.read().await;
        let mut owned: Vec<Favorite> = favorites
            .values()
            .filter(|f| f.donor_id == donor_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(owned)
    }

    async fn set_tag(&self, id: FavoriteId, tag: Option<String>) -> DomainResult<Option<Favorite>> {
        let mut favorites = self.favorites.write().await;
        Ok(favorites.get_mut(&id).map(|favorite| {
            favorite.tag = tag;
            favorite.clone()
        }))
    }

    async fn set_scheduled_date(
        &self,
        id: FavoriteId,
        date: Option<NaiveDate>,
    ) -> DomainResult<Option<Favorite>> {
        let mut favorites = self.favorites.write().await;
        Ok(favorites.get_mut(&id).map(|favorite| {
            favorite.scheduled_date = date;
            favorite.clone()
        }))
    }

    async fn delete(&self, id: FavoriteId) -> DomainResult<bool> {
        Ok(self.favorites.write().await.remove(&id).is_some())
    }

    async fn delete_by_point(&self, point_id: PointId) -> DomainResult<u64> {
        let mut favorites = self.favorites.write().await;
        let before = favorites.len();
        favorites.retain(|_, f| f.point_id != point_id);
        Ok((before - favorites.len()) as u64)
    }

    async fn ping(&self) -> DomainResult<()> {
        Ok(())
    }
}

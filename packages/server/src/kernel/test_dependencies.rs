// TestDependencies - in-memory stores and failing doubles for testing
//
// Builds a ServerDeps whose stores the test keeps handles to, so it can seed
// legacy rows or inspect state directly.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

use super::{
    BaseFavoriteStore, BasePointStore, InMemoryFavoriteStore, InMemoryPointStore, PointMutation,
    PointMutator, PointQuery, ServerDeps,
};
use crate::common::{ActorId, DomainError, DomainResult, FavoriteId, PointId};
use crate::domains::favorites::models::Favorite;
use crate::domains::points::models::DonationPoint;

// =============================================================================
// Unreachable Store
// =============================================================================

/// Store double whose every call fails as if the database were down
#[derive(Default)]
pub struct UnreachableStore;

fn unreachable<T>() -> DomainResult<T> {
    Err(DomainError::Internal(anyhow::anyhow!("store unreachable")))
}

#[async_trait]
impl BasePointStore for UnreachableStore {
    async fn insert(&self, _point: &DonationPoint) -> DomainResult<()> {
        unreachable()
    }

    async fn find(&self, _id: PointId) -> DomainResult<Option<DonationPoint>> {
        unreachable()
    }

    async fn list(&self, _query: &PointQuery) -> DomainResult<Vec<DonationPoint>> {
        unreachable()
    }

    async fn modify(&self, _id: PointId, _mutator: PointMutator) -> DomainResult<PointMutation> {
        unreachable()
    }

    async fn ping(&self) -> DomainResult<()> {
        unreachable()
    }
}

#[async_trait]
impl BaseFavoriteStore for UnreachableStore {
    async fn insert_or_get(&self, _favorite: Favorite) -> DomainResult<(Favorite, bool)> {
        unreachable()
    }

    async fn find(&self, _id: FavoriteId) -> DomainResult<Option<Favorite>> {
        unreachable()
    }

    async fn list_by_donor(&self, _donor_id: ActorId) -> DomainResult<Vec<Favorite>> {
        unreachable()
    }

    async fn set_tag(&self, _id: FavoriteId, _tag: Option<String>) -> DomainResult<Option<Favorite>> {
        unreachable()
    }

    async fn set_scheduled_date(
        &self,
        _id: FavoriteId,
        _date: Option<NaiveDate>,
    ) -> DomainResult<Option<Favorite>> {
        unreachable()
    }

    async fn delete(&self, _id: FavoriteId) -> DomainResult<bool> {
        unreachable()
    }

    async fn delete_by_point(&self, _point_id: PointId) -> DomainResult<u64> {
        unreachable()
    }

    async fn ping(&self) -> DomainResult<()> {
        unreachable()
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

pub struct TestDependencies {
    pub points: Arc<InMemoryPointStore>,
    pub favorites: Arc<InMemoryFavoriteStore>,
    pub schedule_year: i32,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            points: Arc::new(InMemoryPointStore::new()),
            favorites: Arc::new(InMemoryFavoriteStore::new()),
            schedule_year: 2025,
        }
    }

    /// Set the favorites operating year
    pub fn schedule_year(mut self, year: i32) -> Self {
        self.schedule_year = year;
        self
    }

    /// Convert into ServerDeps; the stores stay shared with `self`
    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.points.clone(),
            self.favorites.clone(),
            self.schedule_year,
        )
    }

    /// ServerDeps whose stores always fail
    pub fn unreachable(schedule_year: i32) -> ServerDeps {
        ServerDeps::new(
            Arc::new(UnreachableStore),
            Arc::new(UnreachableStore),
            schedule_year,
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}

// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Lifecycle rules and permission checks live in the domain activities and
// run inside the closure handed to `BasePointStore::modify`.
//
// Naming convention: Base* for trait names (e.g., BasePointStore)

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::common::{ActorId, DomainResult, FavoriteId, PointId};
use crate::domains::favorites::models::Favorite;
use crate::domains::points::models::{CreatorType, DonationPoint, PointStatus};

// =============================================================================
// Point Store
// =============================================================================

/// What a mutator decided to do with the locked point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointChange {
    /// Persist the mutated point
    Saved,
    /// Remove the record entirely
    Removed,
}

/// Closure run against a locked point. Returning an error discards every
/// change made to the point.
pub type PointMutator =
    Box<dyn FnOnce(&mut DonationPoint) -> DomainResult<PointChange> + Send + 'static>;

/// Result of a committed `modify` call
#[derive(Debug, Clone)]
pub struct PointMutation {
    /// The point as written, or as it was just before removal
    pub point: DonationPoint,
    pub change: PointChange,
}

/// Storage-level filter for listing points
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointQuery {
    pub status: Option<PointStatus>,
    pub creator_id: Option<ActorId>,
    pub creator_type: Option<CreatorType>,
}

impl PointQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: PointStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn created_by_organization(mut self, organization_id: ActorId) -> Self {
        self.creator_id = Some(organization_id);
        self.creator_type = Some(CreatorType::Organization);
        self
    }

    pub fn matches(&self, point: &DonationPoint) -> bool {
        self.status.map_or(true, |s| point.status == s)
            && self.creator_id.map_or(true, |id| point.creator_id == Some(id))
            && self
                .creator_type
                .map_or(true, |t| point.creator_type == Some(t))
    }
}

#[async_trait]
pub trait BasePointStore: Send + Sync {
    async fn insert(&self, point: &DonationPoint) -> DomainResult<()>;

    async fn find(&self, id: PointId) -> DomainResult<Option<DonationPoint>>;

    /// Points matching the query, newest first
    async fn list(&self, query: &PointQuery) -> DomainResult<Vec<DonationPoint>>;

    /// Lock the point, run the mutator and persist its decision atomically.
    ///
    /// Fails with NotFound if the point does not exist. Concurrent calls on
    /// the same id are serialized.
    async fn modify(&self, id: PointId, mutator: PointMutator) -> DomainResult<PointMutation>;

    /// Health probe
    async fn ping(&self) -> DomainResult<()>;
}

// =============================================================================
// Favorite Store
// =============================================================================

#[async_trait]
pub trait BaseFavoriteStore: Send + Sync {
    /// Insert unless the donor already bookmarked the point. Returns the stored
    /// favorite and whether it was newly created.
    async fn insert_or_get(&self, favorite: Favorite) -> DomainResult<(Favorite, bool)>;

    async fn find(&self, id: FavoriteId) -> DomainResult<Option<Favorite>>;

    /// A donor's favorites, oldest first
    async fn list_by_donor(&self, donor_id: ActorId) -> DomainResult<Vec<Favorite>>;

    async fn set_tag(&self, id: FavoriteId, tag: Option<String>) -> DomainResult<Option<Favorite>>;

    async fn set_scheduled_date(
        &self,
        id: FavoriteId,
        date: Option<NaiveDate>,
    ) -> DomainResult<Option<Favorite>>;

    /// Returns false if nothing was deleted
    async fn delete(&self, id: FavoriteId) -> DomainResult<bool>;

    /// Remove every favorite pointing at a point; returns the count removed
    async fn delete_by_point(&self, point_id: PointId) -> DomainResult<u64>;

    async fn ping(&self) -> DomainResult<()>;
}

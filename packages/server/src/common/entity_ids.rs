//! Typed ID definitions for all domain entities.
//!
//! ```rust
//! use donation_core::common::{FavoriteId, PointId};
//!
//! let point_id = PointId::new();
//! let favorite_id = FavoriteId::new();
//! // let wrong: FavoriteId = point_id; // compile error
//! # let _ = (point_id, favorite_id);
//! ```

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for donation point records.
pub struct DonationPointEntity;

/// Marker type for donor favorites.
pub struct FavoriteEntity;

/// Marker type for actors supplied by the identity collaborator
/// (donors, organizations, administrators).
pub struct ActorEntity;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

pub type PointId = Id<DonationPointEntity>;

pub type FavoriteId = Id<FavoriteEntity>;

pub type ActorId = Id<ActorEntity>;

//! Server dependencies for activities (using traits for testability)
//!
//! This module provides the central dependency container used by all domain
//! activities. Storage is reached only through the `Base*` traits.

use sqlx::PgPool;
use std::sync::Arc;

use crate::kernel::{
    BaseFavoriteStore, BasePointStore, InMemoryFavoriteStore, InMemoryPointStore,
    PostgresFavoriteStore, PostgresPointStore,
};

/// Server dependencies accessible to activities
#[derive(Clone)]
pub struct ServerDeps {
    pub points: Arc<dyn BasePointStore>,
    pub favorites: Arc<dyn BaseFavoriteStore>,
    /// The only year favorites may be scheduled in
    pub schedule_year: i32,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    pub fn new(
        points: Arc<dyn BasePointStore>,
        favorites: Arc<dyn BaseFavoriteStore>,
        schedule_year: i32,
    ) -> Self {
        Self {
            points,
            favorites,
            schedule_year,
        }
    }

    /// Stores backed by a Postgres pool
    pub fn postgres(pool: PgPool, schedule_year: i32) -> Self {
        Self::new(
            Arc::new(PostgresPointStore::new(pool.clone())),
            Arc::new(PostgresFavoriteStore::new(pool)),
            schedule_year,
        )
    }

    /// Process-local stores; contents are lost on restart
    pub fn in_memory(schedule_year: i32) -> Self {
        Self::new(
            Arc::new(InMemoryPointStore::new()),
            Arc::new(InMemoryFavoriteStore::new()),
            schedule_year,
        )
    }
}

//! Favorites ledger tests

mod common;

use std::sync::Arc;

use crate::common::{create_approved_org_point, create_test_point, TestHarness, TEST_YEAR};
use async_trait::async_trait;
use chrono::NaiveDate;
use donation_core::common::{ActorId, DomainError, DomainResult, FavoriteId, Identity, PointId};
use donation_core::domains::favorites::activities::{
    add_favorite, get_favorite, list_donor_favorites, remove_favorite, schedule_favorite,
    tag_favorite,
};
use donation_core::domains::points::activities::{
    delete_point, edit_point, toggle_point_active, DeleteOutcome,
};
use donation_core::domains::points::models::DonationPoint;
use donation_core::kernel::{
    BaseFavoriteStore, BasePointStore, InMemoryPointStore, PointMutation, PointMutator,
    PointQuery, ServerDeps,
};
use tokio::sync::{oneshot, Mutex};

/// Point store that stalls the first `find` after reading, until released
struct StallingPointStore {
    inner: Arc<InMemoryPointStore>,
    gate: Mutex<Option<(oneshot::Sender<()>, oneshot::Receiver<()>)>>,
}

#[async_trait]
impl BasePointStore for StallingPointStore {
    async fn insert(&self, point: &DonationPoint) -> DomainResult<()> {
        self.inner.insert(point).await
    }

    async fn find(&self, id: PointId) -> DomainResult<Option<DonationPoint>> {
        let gate = self.gate.lock().await.take();
        let found = self.inner.find(id).await;
        if let Some((reached, release)) = gate {
            let _ = reached.send(());
            let _ = release.await;
        }
        found
    }

    async fn list(&self, query: &PointQuery) -> DomainResult<Vec<DonationPoint>> {
        self.inner.list(query).await
    }

    async fn modify(&self, id: PointId, mutator: PointMutator) -> DomainResult<PointMutation> {
        self.inner.modify(id, mutator).await
    }

    async fn ping(&self) -> DomainResult<()> {
        self.inner.ping().await
    }
}

async fn setup_favorite(h: &TestHarness) -> (PointId, FavoriteId) {
    let point = create_test_point(&h.deps, &h.admin, "Punto Limpio", &["vidrio"]).await;
    let (favorite, created) = add_favorite(h.donor.actor_id, point.id, &h.donor, &h.deps)
        .await
        .unwrap();
    assert!(created);
    (point.id, favorite.id)
}

// ============================================================================
// Add / remove
// ============================================================================

#[tokio::test]
async fn donor_adds_visible_point() {
    let h = TestHarness::new();
    let point = create_test_point(&h.deps, &h.admin, "Punto Limpio", &["vidrio"]).await;

    let (favorite, created) = add_favorite(h.donor.actor_id, point.id, &h.donor, &h.deps)
        .await
        .unwrap();

    assert!(created);
    assert_eq!(favorite.donor_id, h.donor.actor_id);
    assert_eq!(favorite.point_id, point.id);
    assert!(favorite.tag.is_none());
    assert!(favorite.scheduled_date.is_none());
}

#[tokio::test]
async fn adding_same_point_twice_returns_existing_favorite() {
    let h = TestHarness::new();
    let (point_id, favorite_id) = setup_favorite(&h).await;

    let (again, created) = add_favorite(h.donor.actor_id, point_id, &h.donor, &h.deps)
        .await
        .unwrap();

    assert!(!created);
    assert_eq!(again.id, favorite_id);
    let listed = list_donor_favorites(h.donor.actor_id, &h.donor, &h.deps)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn cannot_favorite_hidden_or_missing_points() {
    let h = TestHarness::new();
    let pending = create_test_point(&h.deps, &h.org, "Pendiente", &["ropa"]).await;
    let inactive = create_test_point(&h.deps, &h.admin, "Apagado", &["ropa"]).await;
    toggle_point_active(inactive.id, &h.admin, &h.deps).await.unwrap();

    for point_id in [pending.id, inactive.id, PointId::new()] {
        let err = add_favorite(h.donor.actor_id, point_id, &h.donor, &h.deps)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)), "{:?}", err);
    }
}

#[tokio::test]
async fn hard_delete_during_add_leaves_no_favorite() {
    let h = TestHarness::new();
    let point = create_approved_org_point(&h.deps, &h.org, &h.admin, "Efímero", &["ropa"]).await;

    let (reached_tx, reached_rx) = oneshot::channel();
    let (release_tx, release_rx) = oneshot::channel();
    let stalling = ServerDeps::new(
        Arc::new(StallingPointStore {
            inner: h.test_deps.points.clone(),
            gate: Mutex::new(Some((reached_tx, release_rx))),
        }),
        h.test_deps.favorites.clone(),
        TEST_YEAR,
    );

    let donor = h.donor;
    let point_id = point.id;
    let adding =
        tokio::spawn(async move { add_favorite(donor.actor_id, point_id, &donor, &stalling).await });

    // The visibility check has read the point; remove it before the insert lands
    reached_rx.await.expect("add_favorite reached the point lookup");
    let outcome = delete_point(point.id, &h.org, Some(h.org.actor_id), &h.deps)
        .await
        .unwrap();
    assert!(matches!(outcome, DeleteOutcome::Hard(_)));
    release_tx.send(()).expect("add_favorite still waiting");

    let err = adding.await.unwrap().unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)), "{:?}", err);

    let stored = h
        .test_deps
        .favorites
        .list_by_donor(h.donor.actor_id)
        .await
        .unwrap();
    assert!(stored.is_empty());
}

#[tokio::test]
async fn only_donors_add_favorites_for_themselves() {
    let h = TestHarness::new();
    let point = create_test_point(&h.deps, &h.admin, "Punto Limpio", &["vidrio"]).await;
    let other_donor = Identity::donor(ActorId::new());

    for (donor_id, identity) in [
        (h.donor.actor_id, other_donor),
        (h.org.actor_id, h.org),
        (h.admin.actor_id, h.admin),
    ] {
        let err = add_favorite(donor_id, point.id, &identity, &h.deps)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::PermissionDenied(_)));
    }
}

#[tokio::test]
async fn remove_deletes_and_second_remove_is_not_found() {
    let h = TestHarness::new();
    let (_, favorite_id) = setup_favorite(&h).await;

    remove_favorite(favorite_id, &h.donor, &h.deps).await.unwrap();

    let err = remove_favorite(favorite_id, &h.donor, &h.deps)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
}

#[tokio::test]
async fn other_donor_cannot_remove_favorite() {
    let h = TestHarness::new();
    let (_, favorite_id) = setup_favorite(&h).await;
    let other_donor = Identity::donor(ActorId::new());

    let err = remove_favorite(favorite_id, &other_donor, &h.deps)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::PermissionDenied(_)));
    assert!(get_favorite(favorite_id, &h.donor, &h.deps).await.is_ok());
}

// ============================================================================
// Tags
// ============================================================================

#[tokio::test]
async fn tag_is_set_trimmed_and_cleared_when_blank() {
    let h = TestHarness::new();
    let (_, favorite_id) = setup_favorite(&h).await;

    let tagged = tag_favorite(favorite_id, Some("  cerca de casa "), &h.donor, &h.deps)
        .await
        .unwrap();
    assert_eq!(tagged.tag.as_deref(), Some("cerca de casa"));

    let cleared = tag_favorite(favorite_id, Some("   "), &h.donor, &h.deps)
        .await
        .unwrap();
    assert!(cleared.tag.is_none());
}

#[tokio::test]
async fn tag_longer_than_limit_is_invalid() {
    let h = TestHarness::new();
    let (_, favorite_id) = setup_favorite(&h).await;

    let at_limit = "ñ".repeat(100);
    let tagged = tag_favorite(favorite_id, Some(&at_limit), &h.donor, &h.deps)
        .await
        .unwrap();
    assert_eq!(tagged.tag.as_deref(), Some(at_limit.as_str()));

    let too_long = "a".repeat(101);
    let err = tag_favorite(favorite_id, Some(&too_long), &h.donor, &h.deps)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidInput(_)));

    let stored = get_favorite(favorite_id, &h.donor, &h.deps).await.unwrap();
    assert_eq!(stored.tag.as_deref(), Some(at_limit.as_str()));
}

#[tokio::test]
async fn tagging_missing_favorite_is_not_found() {
    let h = TestHarness::new();

    let err = tag_favorite(FavoriteId::new(), Some("x"), &h.donor, &h.deps)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
}

// ============================================================================
// Scheduling
// ============================================================================

#[tokio::test]
async fn schedule_accepts_dates_in_operating_year() {
    let h = TestHarness::new();
    let (_, favorite_id) = setup_favorite(&h).await;

    for (raw, expected) in [
        ("2025-01-01", NaiveDate::from_ymd_opt(2025, 1, 1)),
        ("2025-12-31", NaiveDate::from_ymd_opt(2025, 12, 31)),
    ] {
        let scheduled = schedule_favorite(favorite_id, Some(raw), &h.donor, &h.deps)
            .await
            .unwrap();
        assert_eq!(scheduled.scheduled_date, expected);
    }
}

#[tokio::test]
async fn schedule_outside_operating_year_is_invalid_without_clamping() {
    let h = TestHarness::new();
    let (_, favorite_id) = setup_favorite(&h).await;
    schedule_favorite(favorite_id, Some("2025-06-15"), &h.donor, &h.deps)
        .await
        .unwrap();

    for raw in ["2024-12-31", "2026-01-01", "15/06/2025", "2025-02-30"] {
        let err = schedule_favorite(favorite_id, Some(raw), &h.donor, &h.deps)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)), "{}", raw);
    }

    let stored = get_favorite(favorite_id, &h.donor, &h.deps).await.unwrap();
    assert_eq!(stored.scheduled_date, NaiveDate::from_ymd_opt(2025, 6, 15));
}

#[tokio::test]
async fn empty_schedule_clears_date() {
    let h = TestHarness::new();
    let (_, favorite_id) = setup_favorite(&h).await;
    schedule_favorite(favorite_id, Some("2025-06-15"), &h.donor, &h.deps)
        .await
        .unwrap();

    let cleared = schedule_favorite(favorite_id, Some(""), &h.donor, &h.deps)
        .await
        .unwrap();
    assert!(cleared.scheduled_date.is_none());
}

#[tokio::test]
async fn operating_year_comes_from_deps() {
    let h = TestHarness::with_year(2030);
    let (_, favorite_id) = setup_favorite(&h).await;
    assert_ne!(TEST_YEAR, 2030);

    let err = schedule_favorite(favorite_id, Some("2025-06-15"), &h.donor, &h.deps)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidInput(_)));

    let scheduled = schedule_favorite(favorite_id, Some("2030-06-15"), &h.donor, &h.deps)
        .await
        .unwrap();
    assert_eq!(scheduled.scheduled_date, NaiveDate::from_ymd_opt(2030, 6, 15));
}

// ============================================================================
// Listing
// ============================================================================

#[tokio::test]
async fn listing_resolves_points() {
    let h = TestHarness::new();
    let first = create_test_point(&h.deps, &h.admin, "Primero", &["vidrio"]).await;
    let second =
        create_approved_org_point(&h.deps, &h.org, &h.admin, "Segundo", &["ropa", "papel"]).await;
    add_favorite(h.donor.actor_id, first.id, &h.donor, &h.deps)
        .await
        .unwrap();
    add_favorite(h.donor.actor_id, second.id, &h.donor, &h.deps)
        .await
        .unwrap();

    let listed = list_donor_favorites(h.donor.actor_id, &h.donor, &h.deps)
        .await
        .unwrap();

    let mut names: Vec<&str> = listed.iter().map(|(_, p)| p.name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["Primero", "Segundo"]);
    for (favorite, point) in &listed {
        assert_eq!(favorite.point_id, point.id);
    }
}

#[tokio::test]
async fn listing_reflects_later_point_changes() {
    let h = TestHarness::new();
    let (point_id, _) = setup_favorite(&h).await;
    edit_point(
        point_id,
        crate::common::point_input("Renombrado", &["vidrio"]),
        &h.admin,
        &h.deps,
    )
    .await
    .unwrap();

    let listed = list_donor_favorites(h.donor.actor_id, &h.donor, &h.deps)
        .await
        .unwrap();
    assert_eq!(listed[0].1.name, "Renombrado");
}

#[tokio::test]
async fn listing_is_private_to_donor_and_admins() {
    let h = TestHarness::new();
    setup_favorite(&h).await;
    let other_donor = Identity::donor(ActorId::new());

    let err = list_donor_favorites(h.donor.actor_id, &other_donor, &h.deps)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::PermissionDenied(_)));

    let err = list_donor_favorites(h.donor.actor_id, &h.org, &h.deps)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::PermissionDenied(_)));

    let as_admin = list_donor_favorites(h.donor.actor_id, &h.admin, &h.deps)
        .await
        .unwrap();
    assert_eq!(as_admin.len(), 1);
}

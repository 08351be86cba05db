//! Test harness over in-memory stores.
//!
//! Each test gets fresh stores. The harness keeps handles to them so tests can
//! seed legacy rows and inspect state, and can drive the HTTP router directly.

use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use donation_core::common::{ActorId, Identity};
use donation_core::kernel::{ServerDeps, TestDependencies};
use donation_core::server::build_app;
use donation_core::server::middleware::{ACTOR_ID_HEADER, ACTOR_ROLE_HEADER};
use serde_json::Value;
use tower::ServiceExt;

/// Operating year used by every harness unless overridden
pub const TEST_YEAR: i32 = 2025;

pub struct TestHarness {
    pub test_deps: TestDependencies,
    pub deps: ServerDeps,
    pub admin: Identity,
    pub org: Identity,
    pub other_org: Identity,
    pub donor: Identity,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_year(TEST_YEAR)
    }

    pub fn with_year(year: i32) -> Self {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let test_deps = TestDependencies::new().schedule_year(year);
        let deps = test_deps.server_deps();

        Self {
            test_deps,
            deps,
            admin: Identity::administrator(ActorId::new()),
            org: Identity::organization(ActorId::new()),
            other_org: Identity::organization(ActorId::new()),
            donor: Identity::donor(ActorId::new()),
        }
    }

    /// Router over the same stores as `deps`
    pub fn app(&self) -> Router {
        build_app(self.deps.clone(), Duration::from_secs(5))
    }

    /// Send one request through a fresh router and decode the JSON body
    /// (`Value::Null` for empty bodies).
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        identity: Option<&Identity>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(identity) = identity {
            builder = builder
                .header(ACTOR_ID_HEADER, identity.actor_id.to_string())
                .header(ACTOR_ROLE_HEADER, identity.role.to_string());
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        };

        let response = self.app().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, json)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

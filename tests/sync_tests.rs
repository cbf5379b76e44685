mod common;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use api_studio::models::{EndpointDraft, HttpMethod};
use api_studio::sync::simulated::{SimulatedRepository, seed_endpoints};
use api_studio::sync::{SyncError, SyncGateway};
use api_studio::validation;
use common::{StubSync, draft, sync_gateway};

fn simulated() -> SyncGateway {
    SyncGateway::new(
        Arc::new(SimulatedRepository::new(Duration::ZERO, Duration::ZERO)),
        Duration::from_secs(5),
    )
}

#[test]
fn seed_collection_is_valid() {
    let seeds = seed_endpoints();
    assert_eq!(seeds.len(), 2);
    assert_eq!(seeds[0].method, HttpMethod::Post);
    assert_eq!(seeds[0].path, "/auth/login");
    assert_eq!(seeds[1].path, "/health");
    assert!(seeds.iter().all(|d| validation::validate_draft(d).is_ok()));
}

#[tokio::test]
async fn pull_from_fresh_repository_returns_seeds_with_new_ids() {
    let gateway = simulated();
    let before = Utc::now();

    let first = gateway.pull("github.com/acme/api").await.unwrap();
    let second = gateway.pull("github.com/acme/api").await.unwrap();

    let drafts: Vec<EndpointDraft> = first.iter().map(EndpointDraft::from).collect();
    assert_eq!(drafts, seed_endpoints());

    let ids: HashSet<_> = first.iter().chain(&second).map(|r| r.id).collect();
    assert_eq!(ids.len(), 4);
    assert!(first.iter().all(|r| r.created_at >= before));
    assert!(first.iter().all(|r| r.created_at == first[0].created_at));
}

#[tokio::test]
async fn push_then_pull_round_trips_content() {
    let gateway = simulated();
    let records = vec![
        draft("One", "/one").into_record(uuid::Uuid::now_v7(), Utc::now()),
        draft("Two", "/two").into_record(uuid::Uuid::now_v7(), Utc::now()),
    ];

    assert!(gateway.push("acme/api", &records).await.unwrap());

    let pulled = gateway.pull("acme/api").await.unwrap();
    assert_eq!(pulled.len(), 2);
    assert_eq!(pulled[0].name, "One");
    assert_eq!(pulled[1].path, "/two");
    assert!(pulled.iter().zip(&records).all(|(p, r)| p.id != r.id));

    // Other repositories are unaffected.
    assert_eq!(gateway.pull("acme/other").await.unwrap().len(), 2);
    assert_eq!(gateway.pull("acme/other").await.unwrap()[0].name, "User Authentication");
}

#[tokio::test]
async fn empty_locator_is_a_sync_error() {
    let gateway = simulated();
    assert!(matches!(gateway.pull("  ").await, Err(SyncError::Backend(_))));
    assert!(matches!(gateway.push("", &[]).await, Err(SyncError::Backend(_))));
}

#[tokio::test]
async fn slow_repository_times_out() {
    let gateway = SyncGateway::new(
        Arc::new(SimulatedRepository::new(
            Duration::from_millis(500),
            Duration::from_millis(500),
        )),
        Duration::from_millis(50),
    );

    assert!(matches!(gateway.pull("acme/api").await, Err(SyncError::Timeout(_))));
    assert!(matches!(gateway.push("acme/api", &[]).await, Err(SyncError::Timeout(_))));
}

#[tokio::test]
async fn malformed_remote_record_fails_the_pull() {
    let backend = Arc::new(StubSync::new());
    backend.drafts.lock()[0].response_schema = "not json".to_string();
    let gateway = sync_gateway(backend);

    assert!(matches!(gateway.pull("acme/api").await, Err(SyncError::Malformed(_))));
}

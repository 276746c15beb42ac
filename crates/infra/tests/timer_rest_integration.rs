//! Timer service wired to the REST store and the SQLite mirror

#[path = "support.rs"]
mod support;

use std::sync::Arc;

use chrono::Duration;
use serde_json::json;
use support::{rest_client, t0, time_entry_row};
use ticktally_common::time::MockClock;
use ticktally_core::{LocalTimerCache, NotificationBus, TimerService};
use ticktally_domain::{TickTallyError, TimerStatus};
use ticktally_infra::{RestTaskStore, RestTimeEntryStore, SqliteLocalCache};
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Wiring {
    clock: MockClock,
    cache: Arc<SqliteLocalCache>,
    service: TimerService<MockClock>,
}

fn wire(server: &MockServer) -> Wiring {
    let client = rest_client(server);
    let clock = MockClock::at(t0());
    let cache = Arc::new(SqliteLocalCache::in_memory().expect("cache"));
    let service = TimerService::new(
        Arc::new(RestTimeEntryStore::new(client.clone())),
        Arc::new(RestTaskStore::new(client)),
        cache.clone(),
        NotificationBus::default(),
        clock.clone(),
    );
    Wiring { clock, cache, service }
}

#[tokio::test]
async fn start_then_stop_round_trips_through_the_store() {
    let server = MockServer::start().await;
    let task_id = Uuid::new_v4();
    let entry_id = Uuid::new_v4();

    let mut finished = time_entry_row(entry_id, task_id, false);
    finished["end_time"] = json!(t0() + Duration::seconds(25));
    finished["duration_seconds"] = json!(25);

    Mock::given(method("GET"))
        .and(path("/rest/v1/time_entries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/time_entries"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!([time_entry_row(entry_id, task_id, true)])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/time_entries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([finished])))
        .expect(1)
        .mount(&server)
        .await;

    let wiring = wire(&server);
    wiring.service.start(task_id, Uuid::nil()).await.expect("start");
    assert_eq!(wiring.cache.load().unwrap().map(|state| state.entry_id), Some(entry_id));

    wiring.clock.advance_secs(25);
    let stopped = wiring.service.stop(false).await.expect("stop").expect("stopped entry");

    assert_eq!(stopped.duration_seconds, Some(25));
    assert_eq!(wiring.service.status(), TimerStatus::Idle);
    assert_eq!(wiring.cache.load().unwrap(), None);
}

#[tokio::test]
async fn store_outage_on_start_leaves_timer_idle() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let wiring = wire(&server);
    let result = wiring.service.start(Uuid::new_v4(), Uuid::nil()).await;

    assert!(matches!(result, Err(TickTallyError::Network(_))), "got {result:?}");
    assert_eq!(wiring.service.status(), TimerStatus::Idle);
    assert_eq!(wiring.cache.load().unwrap(), None);
}

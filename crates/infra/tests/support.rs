//! Shared helpers for infra integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};
use ticktally_domain::StoreConfig;
use ticktally_infra::RestClient;
use uuid::Uuid;
use wiremock::MockServer;

pub const API_KEY: &str = "anon-key";

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

pub fn store_config(server: &MockServer) -> StoreConfig {
    StoreConfig {
        base_url: server.uri(),
        api_key: API_KEY.into(),
        access_token: None,
        timeout_seconds: 5,
    }
}

/// Client pointed at `server`, authenticated with only the public key.
pub fn rest_client(server: &MockServer) -> Arc<RestClient> {
    Arc::new(RestClient::new(&store_config(server)).expect("rest client"))
}

pub fn time_entry_row(id: Uuid, task_id: Uuid, running: bool) -> Value {
    json!({
        "id": id,
        "task_id": task_id,
        "project_id": Uuid::nil(),
        "owner_id": Uuid::nil(),
        "start_time": t0(),
        "end_time": null,
        "duration_seconds": null,
        "is_running": running,
        "is_paused": false,
        "paused_seconds": 0,
        "paused_at": null
    })
}

pub fn project_row(id: Uuid, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "hourly_rate": 40.0,
        "owner_id": Uuid::nil(),
        "team_id": null,
        "created_at": t0()
    })
}

pub fn task_row(id: Uuid, project_id: Uuid, name: &str) -> Value {
    json!({
        "id": id,
        "project_id": project_id,
        "name": name,
        "elapsed_seconds": 0,
        "is_completed": false,
        "created_at": t0()
    })
}

pub fn tag_row(id: Uuid, name: &str) -> Value {
    json!({ "id": id, "name": name, "owner_id": Uuid::nil(), "created_at": t0() })
}

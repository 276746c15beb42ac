//! Server clock alignment
//!
//! One function endpoint returns the backend's current time. The offset it
//! yields is advisory and only shifts timestamps the client produces.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use reqwest::Method;
use serde::Deserialize;
use ticktally_common::time::{Clock, OffsetClock};
use ticktally_domain::Result;
use tracing::{debug, info, instrument};

use super::rest::RestClient;

const SERVER_TIME_FUNCTION: &str = "server-time";

#[derive(Debug, Deserialize)]
struct ServerTimeResponse {
    now: DateTime<Utc>,
}

pub struct ServerTimeClient {
    client: Arc<RestClient>,
}

impl ServerTimeClient {
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }

    pub async fn fetch_server_time(&self) -> Result<DateTime<Utc>> {
        let request =
            self.client.request(Method::GET, &self.client.function_url(SERVER_TIME_FUNCTION));
        let body: ServerTimeResponse = self.client.json(request).await?;
        Ok(body.now)
    }

    /// Server time minus the local midpoint of the round trip, as seen by
    /// `clock`.
    #[instrument(skip_all)]
    pub async fn estimate_offset<C: Clock>(&self, clock: &C) -> Result<Duration> {
        let sent = clock.utc_now();
        let server_now = self.fetch_server_time().await?;
        let received = clock.utc_now();

        let midpoint = sent + (received - sent) / 2;
        let offset = server_now - midpoint;
        debug!(
            offset_ms = offset.num_milliseconds(),
            round_trip_ms = (received - sent).num_milliseconds(),
            "Estimated server clock offset"
        );
        Ok(offset)
    }

    /// Measure against the clock's own base and install the offset.
    pub async fn sync_clock<C: Clock>(&self, clock: &OffsetClock<C>) -> Result<Duration> {
        let offset = self.estimate_offset(clock.inner()).await?;
        clock.set_offset(offset);
        info!(offset_ms = offset.num_milliseconds(), "Clock aligned with server");
        Ok(offset)
    }
}

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use ticktally_core::PlanProvider;
use ticktally_domain::{PlanTier, Result, UserPlan};
use tracing::{debug, warn};

use super::rest::RestClient;
use super::PROFILES_TABLE;

/// Reads the owner's tier from the `profiles` row the payment workflow keeps
/// up to date. Row-level security limits the select to the owner's own row.
pub struct RestPlanProvider {
    client: Arc<RestClient>,
}

#[derive(Debug, Deserialize)]
struct ProfileRow {
    #[serde(default)]
    plan: Option<String>,
    #[serde(default)]
    pending_plan: Option<String>,
}

impl RestPlanProvider {
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PlanProvider for RestPlanProvider {
    async fn current_plan(&self) -> Result<UserPlan> {
        let Some(row) = self.client.select_one::<ProfileRow>(PROFILES_TABLE, &[]).await? else {
            debug!("No profile row; assuming free plan");
            return Ok(UserPlan::default());
        };
        let pending = row.pending_plan.as_deref().map(str::trim).filter(|raw| !raw.is_empty());
        Ok(UserPlan {
            current: parse_tier(row.plan.as_deref()),
            pending: pending.map(|raw| parse_tier(Some(raw))),
        })
    }
}

fn parse_tier(raw: Option<&str>) -> PlanTier {
    match raw.map(str::trim) {
        None | Some("") => PlanTier::Free,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(plan = raw, "Unknown plan tier; treating as free");
            PlanTier::Free
        }),
    }
}

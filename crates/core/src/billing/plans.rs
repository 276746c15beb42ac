//! Port for the owner's subscription plan
//!
//! The payment workflow lives outside this crate; only the resulting tier is
//! consumed here.

use async_trait::async_trait;
use ticktally_domain::{Result, UserPlan};

#[async_trait]
pub trait PlanProvider: Send + Sync {
    async fn current_plan(&self) -> Result<UserPlan>;
}

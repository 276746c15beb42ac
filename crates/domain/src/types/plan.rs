//! Subscription plans and their project limits

use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

use crate::impl_domain_status_conversions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub enum PlanTier {
    #[default]
    Free,
    Pro,
    Business,
}

impl_domain_status_conversions!(PlanTier {
    Free => "free",
    Pro => "pro",
    Business => "business",
});

impl PlanTier {
    /// Maximum number of active projects, `None` meaning unlimited.
    pub fn max_active_projects(self) -> Option<usize> {
        match self {
            Self::Free => Some(3),
            Self::Pro => Some(15),
            Self::Business => None,
        }
    }
}

/// The owner's plan. `pending` is a tier awaiting payment confirmation and
/// does not lift limits until it becomes `current`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct UserPlan {
    pub current: PlanTier,
    #[serde(default)]
    pub pending: Option<PlanTier>,
}

impl UserPlan {
    pub fn new(current: PlanTier) -> Self {
        Self { current, pending: None }
    }

    pub fn can_create_project(&self, active_projects: usize) -> bool {
        self.current.max_active_projects().map_or(true, |max| active_projects < max)
    }

    pub fn has_pending_change(&self) -> bool {
        self.pending.is_some_and(|pending| pending != self.current)
    }
}

//! Billable projects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;
use uuid::Uuid;

use crate::errors::{Result, TickTallyError};

/// A project tasks are tracked against, billed at a fixed hourly rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub hourly_rate: f64,
    pub owner_id: Uuid,
    pub team_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload; the backend assigns id, owner and creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProject {
    pub name: String,
    pub hourly_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<Uuid>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub hourly_rate: Option<f64>,
    pub team_id: Option<Uuid>,
}

impl NewProject {
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        validate_rate(self.hourly_rate)
    }
}

impl ProjectPatch {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(rate) = self.hourly_rate {
            validate_rate(rate)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.hourly_rate.is_none() && self.team_id.is_none()
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(TickTallyError::InvalidInput("project.name must not be empty".into()));
    }
    Ok(())
}

fn validate_rate(rate: f64) -> Result<()> {
    if !rate.is_finite() || rate < 0.0 {
        return Err(TickTallyError::InvalidInput(format!(
            "project.hourly_rate must be a non-negative number, got {rate}"
        )));
    }
    Ok(())
}

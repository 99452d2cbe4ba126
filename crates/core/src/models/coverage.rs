use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::SwimError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageStatus {
    Open,
    Filled,
    Cancelled,
}

impl CoverageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoverageStatus::Open => "open",
            CoverageStatus::Filled => "filled",
            CoverageStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for CoverageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoverageStatus {
    type Err = SwimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(CoverageStatus::Open),
            "filled" => Ok(CoverageStatus::Filled),
            "cancelled" => Ok(CoverageStatus::Cancelled),
            other => Err(SwimError::InvalidInput(format!(
                "unknown coverage status: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageRequest {
    pub id: Uuid,
    pub lesson_id: Uuid,
    pub requesting_instructor_id: Uuid,
    pub covering_instructor_id: Option<Uuid>,
    pub status: CoverageStatus,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCoverageRequest {
    pub requesting_instructor_id: Uuid,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptCoverageRequest {
    pub instructor_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageListResponse {
    pub requests: Vec<CoverageRequest>,
}

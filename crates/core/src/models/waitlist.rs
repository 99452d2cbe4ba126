use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::SwimError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Active,
    Inactive,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Active => "active",
            EntryStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryStatus {
    type Err = SwimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(EntryStatus::Active),
            "inactive" => Ok(EntryStatus::Inactive),
            other => Err(SwimError::InvalidInput(format!(
                "unknown waitlist status: {}",
                other
            ))),
        }
    }
}

/// Why an entry left the active sequence. Kept for audit only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExitReason {
    Promoted,
    Cancelled,
}

impl ExitReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExitReason::Promoted => "promoted",
            ExitReason::Cancelled => "cancelled",
        }
    }
}

impl FromStr for ExitReason {
    type Err = SwimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "promoted" => Ok(ExitReason::Promoted),
            "cancelled" => Ok(ExitReason::Cancelled),
            other => Err(SwimError::InvalidInput(format!(
                "unknown waitlist exit reason: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistEntry {
    pub id: Uuid,
    pub swimmer_id: Uuid,
    pub position: i32,
    pub status: EntryStatus,
    pub created_at: DateTime<Utc>,
}

impl WaitlistEntry {
    pub fn is_active(&self) -> bool {
        self.status == EntryStatus::Active
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionAssignment {
    pub id: Uuid,
    pub position: i32,
}

/// Result of taking one entry out of the active sequence: the entry itself,
/// now inactive, and fresh positions for everyone still waiting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionPlan {
    pub entry: WaitlistEntry,
    pub positions: Vec<PositionAssignment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinWaitlistRequest {
    pub swimmer_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitlistEntryResponse {
    pub id: Uuid,
    pub lesson_id: Uuid,
    pub swimmer_id: Uuid,
    pub position: i32,
    pub status: EntryStatus,
    pub exit_reason: Option<ExitReason>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitlistResponse {
    pub lesson_id: Uuid,
    pub entries: Vec<WaitlistEntryResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextCandidateResponse {
    pub lesson_id: Uuid,
    pub candidate: Option<WaitlistEntryResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawResponse {
    pub entry: WaitlistEntryResponse,
    pub positions: Vec<PositionAssignment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderResponse {
    pub lesson_id: Uuid,
    pub updated: usize,
    pub positions: Vec<PositionAssignment>,
}

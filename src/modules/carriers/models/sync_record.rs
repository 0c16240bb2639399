use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncStatus {
    /// Recorded, not yet accepted by the carrier
    Pending,
    Synced,
    /// Last attempt failed; picked up again by a retry run
    Failed,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Pending => "PENDING",
            SyncStatus::Synced => "SYNCED",
            SyncStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(SyncStatus::Pending),
            "SYNCED" => Ok(SyncStatus::Synced),
            "FAILED" => Ok(SyncStatus::Failed),
            other => Err(AppError::internal(format!("unknown sync status: {}", other))),
        }
    }
}

/// Outbox entry tracking delivery of one invoice to the carrier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarrierSyncRecord {
    pub id: String,
    pub invoice_id: String,
    pub request_id: String,
    pub status: SyncStatus,
    pub attempts: u32,
    pub last_error: Option<String>,
    pub carrier_reference: Option<String>,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CarrierSyncRecord {
    pub fn mark_synced(&mut self, reference: String) {
        self.status = SyncStatus::Synced;
        self.attempts += 1;
        self.carrier_reference = Some(reference);
        self.last_error = None;
        self.updated_at = Utc::now();
    }

    pub fn mark_failed(&mut self, error: String) {
        self.status = SyncStatus::Failed;
        self.attempts += 1;
        self.last_error = Some(error);
        self.updated_at = Utc::now();
    }
}

/// Outcome of a retry run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrySummary {
    pub attempted: usize,
    pub synced: usize,
    pub failed: usize,
}

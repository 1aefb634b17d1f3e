//! Outcome record of one scan.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// How a scan ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    Completed,
    /// Price source failed its health check; nothing ran.
    SourceUnhealthy,
    /// Stopped between stages.
    Cancelled,
}

/// Counters for one scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub status: ScanStatus,
    pub price_points: usize,
    pub opportunities_found: usize,
    pub opportunities_stored: usize,
    pub users_considered: usize,
    pub users_notified: usize,
    pub deliveries_attempted: usize,
    pub deliveries_succeeded: usize,
}

impl ScanReport {
    #[must_use]
    pub fn started(at: DateTime<Utc>) -> Self {
        Self {
            started_at: at,
            finished_at: at,
            status: ScanStatus::Completed,
            price_points: 0,
            opportunities_found: 0,
            opportunities_stored: 0,
            users_considered: 0,
            users_notified: 0,
            deliveries_attempted: 0,
            deliveries_succeeded: 0,
        }
    }

    #[must_use]
    pub fn finish(mut self, status: ScanStatus) -> Self {
        self.status = status;
        self.finished_at = Utc::now();
        self
    }
}

//! Opportunity listing for operator-facing adapters.

use crate::domain::opportunity::Opportunity;
use crate::error::Result;

/// Opportunity use-cases for operator-facing adapters.
pub trait OpportunityOperator: Send + Sync {
    /// Active opportunities, best net profit first.
    fn active_opportunities(&self, config_toml: &str, limit: usize) -> Result<Vec<Opportunity>>;
}

//! Opportunity operator implementation.

use crate::domain::opportunity::Opportunity;
use crate::error::Result;
use crate::port::inbound::operator::opportunity::OpportunityOperator;

use super::{entry::Operator, shared};

impl OpportunityOperator for Operator {
    fn active_opportunities(&self, config_toml: &str, limit: usize) -> Result<Vec<Opportunity>> {
        let (_, stores) = shared::open_stores(config_toml)?;
        stores.opportunities.list_active(limit)
    }
}

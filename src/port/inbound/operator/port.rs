//! Unified operator capability surface for inbound adapters.

use super::config::ConfigurationOperator;
use super::diagnostic::DiagnosticOperator;
use super::opportunity::OpportunityOperator;
use super::runtime::RuntimeOperator;
use super::user::UserOperator;

/// Unified operator capability surface consumed by inbound adapters.
pub trait OperatorPort:
    ConfigurationOperator + DiagnosticOperator + OpportunityOperator + RuntimeOperator + UserOperator
{
}

impl<T> OperatorPort for T where
    T: ConfigurationOperator
        + DiagnosticOperator
        + OpportunityOperator
        + RuntimeOperator
        + UserOperator
{
}

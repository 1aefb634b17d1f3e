//! Deduplication and persistence of detected opportunities.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info};

use crate::domain::opportunity::{Opportunity, DEDUP_WINDOW};
use crate::port::outbound::store::OpportunityStore;

/// Filters out repeats and swaps in the new active set.
pub struct PersistenceGate {
    store: Arc<dyn OpportunityStore>,
}

impl PersistenceGate {
    pub fn new(store: Arc<dyn OpportunityStore>) -> Self {
        Self { store }
    }

    /// Store the opportunities that are not repeats of a recent active
    /// one and return them with their assigned ids.
    ///
    /// A store failure is logged and yields an empty result; the previous
    /// active set is left untouched.
    pub fn store_new(&self, opportunities: Vec<Opportunity>) -> Vec<Opportunity> {
        let since = Utc::now() - DEDUP_WINDOW;
        let mut fresh = Vec::with_capacity(opportunities.len());

        for opportunity in opportunities {
            match self.store.find_recent_active(&opportunity.key(), since) {
                Ok(Some(existing)) => {
                    debug!(
                        asset = %opportunity.asset_id(),
                        buy = %opportunity.buy_exchange_id(),
                        sell = %opportunity.sell_exchange_id(),
                        existing_id = ?existing.id(),
                        "Skipping duplicate opportunity"
                    );
                }
                Ok(None) => fresh.push(opportunity),
                Err(e) => {
                    error!(error = %e, "Duplicate lookup failed, storing nothing");
                    return Vec::new();
                }
            }
        }

        if fresh.is_empty() {
            debug!("No new opportunities to store");
            return Vec::new();
        }

        match self.store.supersede_and_insert(&fresh) {
            Ok(stored) => {
                info!(stored = stored.len(), "Stored new opportunities");
                stored
            }
            Err(e) => {
                error!(error = %e, count = fresh.len(), "Failed to store opportunities");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::memory::MemoryOpportunityStore;
    use crate::testkit::domain::opportunity;
    use rust_decimal_macros::dec;

    fn gate() -> (Arc<MemoryOpportunityStore>, PersistenceGate) {
        let store = Arc::new(MemoryOpportunityStore::new());
        (store.clone(), PersistenceGate::new(store))
    }

    #[test]
    fn stores_fresh_opportunities_with_ids() {
        let (store, gate) = gate();

        let stored = gate.store_new(vec![
            opportunity("bitcoin", "a", "b", dec!(100), dec!(110)),
            opportunity("ethereum", "a", "b", dec!(10), dec!(11)),
        ]);

        assert_eq!(stored.len(), 2);
        assert!(stored.iter().all(|o| o.id().is_some() && o.is_active()));
        assert_eq!(store.all().len(), 2);
    }

    #[test]
    fn repeat_within_window_is_dropped() {
        let (store, gate) = gate();
        gate.store_new(vec![opportunity("bitcoin", "a", "b", dec!(100), dec!(110))]);

        let second = gate.store_new(vec![opportunity("bitcoin", "a", "b", dec!(100), dec!(111))]);

        assert!(second.is_empty());
        assert_eq!(store.all().len(), 1);
        assert!(store.all()[0].is_active());
    }

    #[test]
    fn new_batch_supersedes_previous_active_set() {
        let (store, gate) = gate();
        gate.store_new(vec![opportunity("bitcoin", "a", "b", dec!(100), dec!(110))]);

        let stored = gate.store_new(vec![
            opportunity("bitcoin", "a", "b", dec!(100), dec!(110)),
            opportunity("bitcoin", "b", "c", dec!(100), dec!(110)),
        ]);

        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].sell_exchange_id().as_str(), "c");
        let active: Vec<_> = store.all().into_iter().filter(|o| o.is_active()).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id(), stored[0].id());
    }

    #[test]
    fn store_failure_yields_nothing_and_keeps_previous_set() {
        let (store, gate) = gate();
        gate.store_new(vec![opportunity("bitcoin", "a", "b", dec!(100), dec!(110))]);
        store.fail_writes(true);

        let stored = gate.store_new(vec![opportunity("ethereum", "a", "b", dec!(10), dec!(11))]);

        assert!(stored.is_empty());
        assert_eq!(store.all().len(), 1);
        assert!(store.all()[0].is_active());
    }

    #[test]
    fn empty_batch_touches_nothing() {
        let (store, gate) = gate();
        gate.store_new(vec![opportunity("bitcoin", "a", "b", dec!(100), dec!(110))]);
        store.fail_writes(true);

        assert!(gate.store_new(Vec::new()).is_empty());
        assert!(store.all()[0].is_active());
    }
}

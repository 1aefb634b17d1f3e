//! One scan: fetch prices, detect, store, notify.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tracing::{error, info, warn};

use super::detector::OpportunityDetector;
use super::dispatcher::NotificationDispatcher;
use super::eligibility::filter_for_user;
use super::gate::PersistenceGate;
use crate::domain::catalog::Catalog;
use crate::domain::id::{AssetId, ExchangeId};
use crate::domain::opportunity::Opportunity;
use crate::domain::scan::{ScanReport, ScanStatus};
use crate::domain::tier::TierTable;
use crate::error::Result;
use crate::port::outbound::price_source::PriceSource;
use crate::port::outbound::store::UserDirectory;

/// Scan pipeline over injected ports.
pub struct ScanService {
    source: Arc<dyn PriceSource>,
    detector: OpportunityDetector,
    gate: PersistenceGate,
    users: Arc<dyn UserDirectory>,
    dispatcher: Arc<NotificationDispatcher>,
    tiers: TierTable,
}

impl ScanService {
    pub fn new(
        source: Arc<dyn PriceSource>,
        catalog: Catalog,
        gate: PersistenceGate,
        users: Arc<dyn UserDirectory>,
        dispatcher: Arc<NotificationDispatcher>,
        tiers: TierTable,
    ) -> Self {
        Self {
            source,
            detector: OpportunityDetector::new(catalog),
            gate,
            users,
            dispatcher,
            tiers,
        }
    }

    pub fn source(&self) -> &Arc<dyn PriceSource> {
        &self.source
    }

    pub fn catalog(&self) -> &Catalog {
        self.detector.catalog()
    }

    /// Run one scan with no stop signal.
    ///
    /// # Errors
    /// See [`run`](Self::run).
    pub async fn run_once(&self) -> Result<ScanReport> {
        let (_tx, rx) = watch::channel(false);
        self.run(&rx).await
    }

    /// Run one scan, checking `shutdown` between stages.
    ///
    /// Each user receives at most one alert: their best matching
    /// opportunity by net profit.
    ///
    /// # Errors
    /// Returns an error only if the active user list cannot be read.
    /// Price, storage and per-user delivery failures are logged and
    /// reflected in the report counters.
    pub async fn run(&self, shutdown: &watch::Receiver<bool>) -> Result<ScanReport> {
        let mut report = ScanReport::started(Utc::now());
        let stopped = || *shutdown.borrow();

        if !self.source.health_check().await {
            warn!(source = self.source.name(), "Price source unhealthy, skipping scan");
            return Ok(report.finish(ScanStatus::SourceUnhealthy));
        }
        if stopped() {
            return Ok(report.finish(ScanStatus::Cancelled));
        }

        let catalog = self.detector.catalog();
        let assets: Vec<AssetId> = catalog.enabled_assets().map(|a| a.id.clone()).collect();
        let exchanges: Vec<ExchangeId> = catalog.enabled_exchanges().map(|e| e.id.clone()).collect();

        let points = self.source.fetch_prices(&assets, &exchanges).await;
        report.price_points = points.len();
        if stopped() {
            return Ok(report.finish(ScanStatus::Cancelled));
        }

        let found = self.detector.detect(&points);
        report.opportunities_found = found.len();
        if found.is_empty() {
            info!(points = points.len(), "No arbitrage opportunities found");
            return Ok(report.finish(ScanStatus::Completed));
        }

        let stored = self.gate.store_new(found);
        report.opportunities_stored = stored.len();
        if stored.is_empty() {
            return Ok(report.finish(ScanStatus::Completed));
        }
        if stopped() {
            return Ok(report.finish(ScanStatus::Cancelled));
        }

        let users = self.users.active_users()?;
        if users.is_empty() {
            info!("No active users to notify");
            return Ok(report.finish(ScanStatus::Completed));
        }

        for prefs in &users {
            if stopped() {
                return Ok(report.finish(ScanStatus::Cancelled));
            }
            report.users_considered += 1;

            let matched = filter_for_user(&stored, prefs, catalog, &self.tiers);
            let Some(best) = best_opportunity(&matched) else {
                continue;
            };

            match self
                .dispatcher
                .send_opportunity(&prefs.user_id, best, matched.len())
                .await
            {
                Ok(delivery) => {
                    if !delivery.is_empty() {
                        report.users_notified += 1;
                    }
                    report.deliveries_attempted += delivery.len();
                    report.deliveries_succeeded += delivery.values().filter(|ok| **ok).count();
                    info!(
                        user = %prefs.user_id,
                        asset = best.asset_symbol(),
                        matches = matched.len(),
                        "Sent arbitrage notification"
                    );
                }
                Err(e) => {
                    error!(user = %prefs.user_id, error = %e, "Failed to notify user");
                }
            }
        }

        let report = report.finish(ScanStatus::Completed);
        info!(
            points = report.price_points,
            found = report.opportunities_found,
            stored = report.opportunities_stored,
            notified = report.users_notified,
            "Scan complete"
        );
        Ok(report)
    }
}

/// Highest net profit; the first one wins ties.
fn best_opportunity(opportunities: &[Opportunity]) -> Option<&Opportunity> {
    opportunities.iter().fold(None, |best, o| match best {
        Some(b) if b.net_profit_percent() >= o.net_profit_percent() => Some(b),
        _ => Some(o),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::memory::{
        MemoryNotificationStore, MemoryOpportunityStore, MemoryUserDirectory,
    };
    use crate::application::dispatcher::ChannelRegistry;
    use crate::domain::preference::UserNotificationPreference;
    use crate::domain::notification::Channel;
    use crate::domain::price::PricePoint;
    use crate::testkit::channel::RecordingSender;
    use crate::testkit::domain::{catalog, opportunity, point};
    use crate::testkit::price::ScriptedPriceSource;
    use rust_decimal_macros::dec;

    struct Fixture {
        service: ScanService,
        opportunities: Arc<MemoryOpportunityStore>,
        in_app: Arc<RecordingSender>,
    }

    fn fixture(source: ScriptedPriceSource, users: Vec<UserNotificationPreference>) -> Fixture {
        let opportunities = Arc::new(MemoryOpportunityStore::new());
        let directory = Arc::new(MemoryUserDirectory::with_users(users));
        let in_app = Arc::new(RecordingSender::delivering(Channel::InApp));
        let dispatcher = Arc::new(NotificationDispatcher::new(
            directory.clone(),
            Arc::new(MemoryNotificationStore::new()),
            ChannelRegistry::new().with(in_app.clone()),
            TierTable::default(),
        ));
        let service = ScanService::new(
            Arc::new(source),
            catalog(&["a", "b"], &[("bitcoin", "BTC"), ("ethereum", "ETH")]),
            PersistenceGate::new(opportunities.clone()),
            directory,
            dispatcher,
            TierTable::default(),
        );
        Fixture {
            service,
            opportunities,
            in_app,
        }
    }

    fn spread_points() -> Vec<PricePoint> {
        vec![
            point("bitcoin", "a", dec!(100)),
            point("bitcoin", "b", dec!(106)),
            point("ethereum", "a", dec!(50)),
            point("ethereum", "b", dec!(55)),
        ]
    }

    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn unhealthy_source_skips_everything() {
        let source = ScriptedPriceSource::new()
            .with_points(spread_points())
            .unhealthy();
        let counter = source.fetch_counter();
        let fx = fixture(source, vec![UserNotificationPreference::new("u1")]);

        let report = fx.service.run_once().await.unwrap();

        assert_eq!(report.status, ScanStatus::SourceUnhealthy);
        assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 0);
        assert!(fx.opportunities.all().is_empty());
    }

    #[tokio::test]
    async fn user_gets_only_their_best_opportunity() {
        let fx = fixture(
            ScriptedPriceSource::new().with_points(spread_points()),
            vec![UserNotificationPreference::new("u1")],
        );

        let report = fx.service.run_once().await.unwrap();

        assert_eq!(report.status, ScanStatus::Completed);
        assert_eq!(report.opportunities_stored, 2);
        assert_eq!(report.users_notified, 1);
        let sent = fx.in_app.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].1.title.ends_with("ETH"));
        assert_eq!(sent[0].1.payload["total_opportunities"], 2);
    }

    #[tokio::test]
    async fn repeat_scan_stores_nothing_new() {
        let fx = fixture(
            ScriptedPriceSource::new().with_points(spread_points()),
            vec![UserNotificationPreference::new("u1")],
        );

        fx.service.run_once().await.unwrap();
        let second = fx.service.run_once().await.unwrap();

        assert_eq!(second.opportunities_found, 2);
        assert_eq!(second.opportunities_stored, 0);
        assert_eq!(fx.in_app.call_count(), 1);
    }

    #[tokio::test]
    async fn cancelled_before_fetch_does_nothing() {
        let source = ScriptedPriceSource::new().with_points(spread_points());
        let counter = source.fetch_counter();
        let fx = fixture(source, vec![]);
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();

        let report = fx.service.run(&rx).await.unwrap();

        assert_eq!(report.status, ScanStatus::Cancelled);
        assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[test]
    fn best_prefers_first_on_ties() {
        let first = opportunity("bitcoin", "a", "b", dec!(100), dec!(106));
        let second = opportunity("bitcoin", "b", "a", dec!(100), dec!(106));
        let opps = [first, second];
        let best = best_opportunity(&opps).unwrap();
        assert_eq!(best.buy_exchange_id().as_str(), "a");
    }
}

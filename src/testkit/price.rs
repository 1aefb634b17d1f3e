//! Scripted [`PriceSource`] for pipeline and scheduler tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::id::{AssetId, ExchangeId};
use crate::domain::price::PricePoint;
use crate::port::outbound::price_source::PriceSource;

/// A price source that pops one queued batch per fetch.
///
/// When the queue is exhausted the fallback batch is returned. Each fetch
/// can be delayed to simulate a slow upstream.
pub struct ScriptedPriceSource {
    batches: Mutex<VecDeque<Vec<PricePoint>>>,
    fallback: Vec<PricePoint>,
    healthy: Arc<AtomicBool>,
    panic_on_fetch: AtomicBool,
    delay: Duration,
    fetch_count: Arc<AtomicU32>,
}

impl ScriptedPriceSource {
    pub fn new() -> Self {
        Self {
            batches: Mutex::new(VecDeque::new()),
            fallback: Vec::new(),
            healthy: Arc::new(AtomicBool::new(true)),
            panic_on_fetch: AtomicBool::new(false),
            delay: Duration::ZERO,
            fetch_count: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Always return `points`.
    pub fn with_points(mut self, points: Vec<PricePoint>) -> Self {
        self.fallback = points;
        self
    }

    pub fn with_batches(self, batches: Vec<Vec<PricePoint>>) -> Self {
        *self.batches.lock() = batches.into();
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn unhealthy(self) -> Self {
        self.healthy.store(false, Ordering::SeqCst);
        self
    }

    /// Panic inside the next fetches.
    pub fn panicking(self) -> Self {
        self.panic_on_fetch.store(true, Ordering::SeqCst);
        self
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    pub fn set_panicking(&self, panicking: bool) {
        self.panic_on_fetch.store(panicking, Ordering::SeqCst);
    }

    /// Shared counter for asserting how many fetches ran.
    pub fn fetch_counter(&self) -> Arc<AtomicU32> {
        self.fetch_count.clone()
    }

    pub fn fetch_count(&self) -> u32 {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

impl Default for ScriptedPriceSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceSource for ScriptedPriceSource {
    async fn fetch_prices(
        &self,
        _assets: &[AssetId],
        _exchanges: &[ExchangeId],
    ) -> Vec<PricePoint> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        assert!(
            !self.panic_on_fetch.load(Ordering::SeqCst),
            "scripted price source panic"
        );
        self.batches
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }

    async fn health_check(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

//! Background scan loop.
//!
//! ```text
//!  Stopped ──start()──▶ Running ──stop()──▶ Stopped
//!                          │
//!                          └─ loop { scan; wait(interval) or shutdown }
//! ```
//!
//! Each scan runs in its own task so a panic inside the pipeline is
//! reported as a failed scan instead of killing the loop. Scans, whether
//! scheduled or triggered with [`Scanner::scan_now`], never overlap. The
//! scan task holds the scan lock for its whole life and is aborted along
//! with the loop when [`Scanner::stop`] times out.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tokio::sync::{watch, Mutex as AsyncMutex};
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{error, info, warn};

use crate::application::scan::ScanService;
use crate::domain::scan::ScanReport;
use crate::error::{Error, Result};

enum State {
    Stopped,
    Running {
        handle: JoinHandle<()>,
        shutdown: watch::Sender<bool>,
    },
}

/// Snapshot returned by [`Scanner::status`].
#[derive(Debug, Clone, Serialize)]
pub struct ScannerStatus {
    pub running: bool,
    pub interval_secs: u64,
    pub last_report: Option<ScanReport>,
}

/// Owns the scan loop task and its lifecycle.
pub struct Scanner {
    service: Arc<ScanService>,
    interval: Duration,
    stop_timeout: Duration,
    state: Mutex<State>,
    scan_lock: Arc<AsyncMutex<()>>,
    last_report: Arc<RwLock<Option<ScanReport>>>,
}

impl Scanner {
    pub fn new(service: Arc<ScanService>, interval: Duration, stop_timeout: Duration) -> Self {
        Self {
            service,
            interval,
            stop_timeout,
            state: Mutex::new(State::Stopped),
            scan_lock: Arc::new(AsyncMutex::new(())),
            last_report: Arc::new(RwLock::new(None)),
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(*self.state.lock(), State::Running { .. })
    }

    /// Spawn the scan loop. Returns false if it was already running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) -> bool {
        let mut state = self.state.lock();
        if matches!(*state, State::Running { .. }) {
            info!("Scanner already running");
            return false;
        }

        let (shutdown, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(run_loop(
            Arc::clone(&self.service),
            self.interval,
            Arc::clone(&self.scan_lock),
            Arc::clone(&self.last_report),
            shutdown_rx,
        ));
        *state = State::Running { handle, shutdown };

        info!(interval_secs = self.interval.as_secs(), "Scanner started");
        true
    }

    /// Signal the loop to stop and wait for it, aborting after the stop
    /// timeout. Returns false if it was not running.
    pub async fn stop(&self) -> bool {
        let previous = std::mem::replace(&mut *self.state.lock(), State::Stopped);
        let State::Running { mut handle, shutdown } = previous else {
            info!("Scanner not running");
            return false;
        };

        let _ = shutdown.send(true);
        match tokio::time::timeout(self.stop_timeout, &mut handle).await {
            Ok(Ok(())) => info!("Scanner stopped"),
            Ok(Err(e)) => error!(error = %e, "Scanner task ended abnormally"),
            Err(_) => {
                warn!(
                    timeout_secs = self.stop_timeout.as_secs(),
                    "Scanner did not stop in time, aborting"
                );
                handle.abort();
            }
        }
        true
    }

    /// Run one scan now, after any scan already in progress.
    ///
    /// # Errors
    /// Returns an error if the scan itself fails.
    pub async fn scan_now(&self) -> Result<ScanReport> {
        let _guard = self.scan_lock.lock().await;
        let report = self.service.run_once().await?;
        *self.last_report.write() = Some(report.clone());
        Ok(report)
    }

    pub fn status(&self) -> ScannerStatus {
        ScannerStatus {
            running: self.is_running(),
            interval_secs: self.interval.as_secs(),
            last_report: self.last_report.read().clone(),
        }
    }
}

async fn run_loop(
    service: Arc<ScanService>,
    interval: Duration,
    scan_lock: Arc<AsyncMutex<()>>,
    last_report: Arc<RwLock<Option<ScanReport>>>,
    mut shutdown: watch::Receiver<bool>,
) {
    info!("Scan loop started");

    loop {
        if *shutdown.borrow() {
            break;
        }

        match run_guarded(&service, &scan_lock, &shutdown).await {
            Ok(report) => *last_report.write() = Some(report),
            Err(e) => error!(error = %e, "Scan failed"),
        }

        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            () = tokio::time::sleep(interval) => {}
        }
    }

    info!("Scan loop stopped");
}

/// Aborts the scan task if the loop is dropped while awaiting it.
struct AbortOnDrop(AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

async fn run_guarded(
    service: &Arc<ScanService>,
    scan_lock: &Arc<AsyncMutex<()>>,
    shutdown: &watch::Receiver<bool>,
) -> Result<ScanReport> {
    let guard = Arc::clone(scan_lock).lock_owned().await;
    let service = Arc::clone(service);
    let shutdown = shutdown.clone();

    let mut task = tokio::spawn(async move {
        let _guard = guard;
        service.run(&shutdown).await
    });
    let _abort = AbortOnDrop(task.abort_handle());

    match (&mut task).await {
        Ok(result) => result,
        Err(e) if e.is_panic() => Err(Error::Task(format!("scan panicked: {e}"))),
        Err(e) => Err(Error::Task(e.to_string())),
    }
}

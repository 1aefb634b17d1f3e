//! Wiring from [`Config`] to running services.
//!
//! Operators build an [`App`] here and never touch adapters directly.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::adapter::outbound::channel::email::EmailSender;
use crate::adapter::outbound::channel::in_app::InAppSender;
use crate::adapter::outbound::channel::whatsapp::WhatsappSender;
use crate::adapter::outbound::coingecko::client::CoinGeckoClient;
use crate::adapter::outbound::memory::{
    MemoryNotificationStore, MemoryOpportunityStore, MemoryUserDirectory,
};
use crate::adapter::outbound::sqlite::database::connection::{create_pool, enable_wal, run_migrations};
use crate::adapter::outbound::sqlite::notification::SqliteNotificationStore;
use crate::adapter::outbound::sqlite::opportunity::SqliteOpportunityStore;
use crate::adapter::outbound::sqlite::user::SqliteUserDirectory;
use crate::application::dispatcher::{ChannelRegistry, NotificationDispatcher};
use crate::application::gate::PersistenceGate;
use crate::application::scan::ScanService;
use crate::error::{Error, Result};
use crate::infrastructure::config::settings::{ChannelsConfig, Config};
use crate::infrastructure::scheduler::Scanner;
use crate::port::outbound::price_source::PriceSource;
use crate::port::outbound::store::{NotificationStore, OpportunityStore, UserDirectory};

/// Database path that selects the in-memory stores.
pub const MEMORY_DATABASE: &str = ":memory:";

/// The three persistence ports, backed by one database.
#[derive(Clone)]
pub struct Stores {
    pub opportunities: Arc<dyn OpportunityStore>,
    pub notifications: Arc<dyn NotificationStore>,
    pub users: Arc<dyn UserDirectory>,
}

impl Stores {
    /// Open (and migrate) the database at `path`.
    ///
    /// # Errors
    /// Returns an error if the pool cannot be created or migrations fail.
    pub fn open(path: &str) -> Result<Self> {
        if path == MEMORY_DATABASE {
            debug!("Using in-memory stores");
            return Ok(Self::in_memory());
        }

        let pool = create_pool(path)?;
        run_migrations(&pool)?;
        {
            let mut conn = pool.get().map_err(|e| Error::Connection(e.to_string()))?;
            if let Err(e) = enable_wal(&mut conn) {
                warn!(error = %e, "Failed to enable WAL journaling");
            }
        }
        info!(path, "Database ready");

        Ok(Self {
            opportunities: Arc::new(SqliteOpportunityStore::new(pool.clone())),
            notifications: Arc::new(SqliteNotificationStore::new(pool.clone())),
            users: Arc::new(SqliteUserDirectory::new(pool)),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            opportunities: Arc::new(MemoryOpportunityStore::new()),
            notifications: Arc::new(MemoryNotificationStore::new()),
            users: Arc::new(MemoryUserDirectory::new()),
        }
    }
}

/// Register in-app delivery plus every external channel that is
/// configured and has its secrets.
pub fn channel_registry(config: &ChannelsConfig) -> ChannelRegistry {
    let mut registry = ChannelRegistry::new();
    registry.register(Arc::new(InAppSender));

    if let Some(email) = &config.email {
        registry.register(Arc::new(EmailSender::new(email.clone())));
    }

    #[cfg(feature = "telegram")]
    if config.telegram {
        match crate::adapter::outbound::channel::telegram::TelegramConfig::from_env() {
            Some(telegram) => registry.register(Arc::new(
                crate::adapter::outbound::channel::telegram::TelegramSender::new(telegram),
            )),
            None => debug!("Telegram bot token not set, channel disabled"),
        }
    }

    if let Some(whatsapp) = &config.whatsapp {
        match whatsapp.clone().with_env_credentials() {
            Some(whatsapp) => registry.register(Arc::new(WhatsappSender::new(whatsapp))),
            None => warn!("WhatsApp configured but credentials are missing, channel disabled"),
        }
    }

    info!(channels = ?registry.channels(), "Notification channels registered");
    registry
}

/// Fully wired services.
pub struct App {
    pub config: Config,
    pub stores: Stores,
    pub dispatcher: Arc<NotificationDispatcher>,
    pub scan: Arc<ScanService>,
    pub scanner: Scanner,
}

impl App {
    /// Wire the application against the CoinGecko price source.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened.
    pub fn build(config: Config) -> Result<Self> {
        let source = Arc::new(CoinGeckoClient::new(config.price_source.clone()));
        Self::with_source(config, source)
    }

    /// Wire the application against any price source.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened.
    pub fn with_source(config: Config, source: Arc<dyn PriceSource>) -> Result<Self> {
        let stores = Stores::open(&config.database)?;
        Ok(Self::assemble(config, stores, source))
    }

    /// Wire the application from already opened stores.
    pub fn assemble(config: Config, stores: Stores, source: Arc<dyn PriceSource>) -> Self {
        let tiers = config.tier_table();
        let dispatcher = Arc::new(NotificationDispatcher::new(
            Arc::clone(&stores.users),
            Arc::clone(&stores.notifications),
            channel_registry(&config.channels),
            tiers.clone(),
        ));
        let scan = Arc::new(ScanService::new(
            source,
            config.catalog.to_catalog(),
            PersistenceGate::new(Arc::clone(&stores.opportunities)),
            Arc::clone(&stores.users),
            Arc::clone(&dispatcher),
            tiers,
        ));
        let scanner = Scanner::new(
            Arc::clone(&scan),
            config.scanner.interval(),
            config.scanner.stop_timeout(),
        );

        Self {
            config,
            stores,
            dispatcher,
            scan,
            scanner,
        }
    }
}

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

use rusqlite::Connection;

use crate::action_executor::{AppOpener, LaunchError, SystemOpener};
use crate::catalog::Catalog;
use crate::config::{validate, Config};
use crate::discovery::{build_catalog, AppBundleProvider, DiscoveryProvider};
use crate::history::LaunchHistory;
use crate::hotkey::{parse_toggle_gesture, DoubleTapDetector};
use crate::kv_store::{self, StoreError};
use crate::launcher_state::{LauncherEffect, LauncherEvent, LauncherState};
use crate::model::{PassthroughTransliterator, Transliterator};
use crate::navigator::GridNavigator;
use crate::view::ViewOptions;

#[derive(Debug)]
pub enum ServiceError {
    Config(String),
    Store(StoreError),
    Launch(LaunchError),
    InvalidRequest(String),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(error) => write!(f, "config error: {error}"),
            Self::Store(error) => write!(f, "store error: {error}"),
            Self::Launch(error) => write!(f, "launch error: {error}"),
            Self::InvalidRequest(error) => write!(f, "invalid request: {error}"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<LaunchError> for ServiceError {
    fn from(value: LaunchError) -> Self {
        Self::Launch(value)
    }
}

type SharedProviders = Arc<Vec<Box<dyn DiscoveryProvider>>>;

/// Owns launcher state plus its collaborators. All mutation happens on the
/// caller's thread; background scans only hand back finished catalogs.
pub struct CoreService {
    config: Config,
    db: Connection,
    state: LauncherState,
    providers: SharedProviders,
    transliterator: Arc<dyn Transliterator>,
    opener: Box<dyn AppOpener>,
    pending_scan: Option<Receiver<Catalog>>,
}

impl CoreService {
    pub fn new(config: Config) -> Result<Self, ServiceError> {
        validate(&config).map_err(ServiceError::Config)?;
        let db = kv_store::open_from_config(&config)?;
        Self::with_connection(config, db)
    }

    pub fn with_connection(config: Config, db: Connection) -> Result<Self, ServiceError> {
        validate(&config).map_err(ServiceError::Config)?;
        let history = kv_store::load_history(&db, config.recent_capacity);
        let state = LauncherState::new(
            Catalog::empty(),
            history,
            GridNavigator::new(config.columns),
            view_options(&config),
        );
        let providers: Vec<Box<dyn DiscoveryProvider>> =
            vec![Box::new(AppBundleProvider::new(config.scan_roots.clone()))];

        Ok(Self {
            config,
            db,
            state,
            providers: Arc::new(providers),
            transliterator: Arc::new(PassthroughTransliterator),
            opener: Box::new(SystemOpener),
            pending_scan: None,
        })
    }

    pub fn with_providers(mut self, providers: Vec<Box<dyn DiscoveryProvider>>) -> Self {
        self.providers = Arc::new(providers);
        self
    }

    pub fn with_transliterator(mut self, transliterator: Arc<dyn Transliterator>) -> Self {
        self.transliterator = transliterator;
        self
    }

    pub fn with_opener(mut self, opener: Box<dyn AppOpener>) -> Self {
        self.opener = opener;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &LauncherState {
        &self.state
    }

    pub fn double_tap_detector(&self) -> Result<DoubleTapDetector, ServiceError> {
        let gesture =
            parse_toggle_gesture(&self.config.toggle_gesture).map_err(ServiceError::Config)?;
        Ok(DoubleTapDetector::new(
            gesture,
            Duration::from_millis(self.config.double_tap_interval_ms),
        ))
    }

    /// Scans synchronously and swaps the result in. Returns the item count.
    pub fn rebuild_catalog(&mut self) -> usize {
        // A background scan still in flight predates this one.
        self.pending_scan = None;
        let catalog = build_catalog(&self.providers, self.transliterator.as_ref());
        let count = catalog.len();
        self.state.apply(LauncherEvent::CatalogReplaced(catalog));
        crate::logging::info(&format!("[catalog] rebuilt items={count}"));
        count
    }

    /// Starts a scan on a worker thread. The finished catalog is published by
    /// a later `poll_catalog`; a newer request supersedes an unfinished one.
    pub fn spawn_rescan(&mut self) {
        let (sender, receiver) = mpsc::channel();
        let providers = Arc::clone(&self.providers);
        let transliterator = Arc::clone(&self.transliterator);
        std::thread::spawn(move || {
            let catalog = build_catalog(&providers, transliterator.as_ref());
            let _ = sender.send(catalog);
        });
        self.pending_scan = Some(receiver);
    }

    /// Swaps in a finished background scan, if any. Returns true on swap.
    pub fn poll_catalog(&mut self) -> bool {
        let Some(receiver) = self.pending_scan.as_ref() else {
            return false;
        };

        match receiver.try_recv() {
            Ok(catalog) => {
                self.pending_scan = None;
                let count = catalog.len();
                self.state.apply(LauncherEvent::CatalogReplaced(catalog));
                crate::logging::info(&format!("[catalog] published background scan items={count}"));
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                self.pending_scan = None;
                crate::logging::warn("[catalog] background scan ended without a result");
                false
            }
        }
    }

    pub fn wait_for_catalog(&mut self, timeout: Duration) -> bool {
        let Some(receiver) = self.pending_scan.take() else {
            return false;
        };
        match receiver.recv_timeout(timeout) {
            Ok(catalog) => {
                self.state.apply(LauncherEvent::CatalogReplaced(catalog));
                true
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                self.pending_scan = Some(receiver);
                false
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => false,
        }
    }

    /// Applies one UI event. A launch effect opens the item and persists the
    /// updated history; open failures are logged, never surfaced.
    pub fn handle(&mut self, event: LauncherEvent) -> Result<LauncherEffect, ServiceError> {
        let effect = self.state.apply(event);
        if let LauncherEffect::Launch(item) = &effect {
            if let Err(error) = self.opener.open(&item.id) {
                crate::logging::warn(&format!("[launch] {} failed: {error}", item.id));
            }
            self.persist_history()?;
        }
        Ok(effect)
    }

    pub fn persist_history(&self) -> Result<(), ServiceError> {
        kv_store::save_history(&self.db, self.state.history())?;
        Ok(())
    }

    pub fn history(&self) -> &LaunchHistory {
        self.state.history()
    }
}

fn view_options(config: &Config) -> ViewOptions {
    ViewOptions {
        show_frequent: config.show_frequent_section,
        frequent_limit: config.frequent_limit,
    }
}

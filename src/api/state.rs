//! Application state for the Incident Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::Settings;
use crate::master_data::MasterDataCache;
use crate::session::SessionRegistry;

/// Shared application state.
///
/// Holds the settings, the master data cache and the open sessions. Cloning
/// is cheap; every clone points at the same resources.
#[derive(Clone)]
pub struct AppState {
    settings: Arc<Settings>,
    master: Arc<MasterDataCache>,
    sessions: Arc<SessionRegistry>,
}

impl AppState {
    /// Creates the state with no open sessions.
    pub fn new(settings: Settings, master: MasterDataCache) -> Self {
        Self {
            settings: Arc::new(settings),
            master: Arc::new(master),
            sessions: Arc::new(SessionRegistry::new()),
        }
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the master data cache.
    pub fn master(&self) -> &MasterDataCache {
        &self.master
    }

    /// Returns the session registry.
    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }
}

//! Memoized access to the master workbook.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::SystemTime;

use tracing::{info, warn};

use crate::config::MasterDataLayout;
use crate::error::EngineResult;

use super::loader::MasterDataLoader;
use super::types::MasterData;

#[derive(Debug, Clone)]
struct CachedMaster {
    data: Arc<MasterData>,
    modified: Option<SystemTime>,
}

/// Loads the master workbook once and hands out shared snapshots.
///
/// The memo is replaced only through [`invalidate`](Self::invalidate),
/// [`reload`](Self::reload) or [`refresh_if_modified`](Self::refresh_if_modified).
/// A snapshot already handed out stays valid after a reload.
#[derive(Debug)]
pub struct MasterDataCache {
    path: PathBuf,
    layout: MasterDataLayout,
    state: RwLock<Option<CachedMaster>>,
}

impl MasterDataCache {
    /// Creates an empty cache for the workbook at `path`.
    pub fn new(path: impl Into<PathBuf>, layout: MasterDataLayout) -> Self {
        Self {
            path: path.into(),
            layout,
            state: RwLock::new(None),
        }
    }

    /// Creates a cache already holding `data`. Used by tests and embedders
    /// that build master data in memory.
    pub fn preloaded(data: MasterData) -> Self {
        Self {
            path: PathBuf::new(),
            layout: MasterDataLayout::default(),
            state: RwLock::new(Some(CachedMaster {
                data: Arc::new(data),
                modified: None,
            })),
        }
    }

    /// The workbook path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the loaded master data, loading it on first use.
    ///
    /// # Errors
    ///
    /// Propagates the loader's configuration errors.
    pub fn get(&self) -> EngineResult<Arc<MasterData>> {
        if let Some(cached) = self.read_state() {
            return Ok(cached.data);
        }

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have loaded while we waited for the lock.
        if let Some(cached) = state.as_ref() {
            return Ok(Arc::clone(&cached.data));
        }
        let cached = self.load()?;
        let data = Arc::clone(&cached.data);
        *state = Some(cached);
        Ok(data)
    }

    /// Whether master data is currently memoized.
    pub fn is_loaded(&self) -> bool {
        self.read_state().is_some()
    }

    /// Drops the memo; the next [`get`](Self::get) reads the workbook again.
    pub fn invalidate(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *state = None;
        info!(path = %self.path.display(), "Master data cache invalidated");
    }

    /// Reads the workbook again and swaps it in.
    ///
    /// On failure the previous snapshot stays in place and the error is
    /// returned.
    pub fn reload(&self) -> EngineResult<Arc<MasterData>> {
        match self.load() {
            Ok(cached) => {
                let data = Arc::clone(&cached.data);
                let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
                *state = Some(cached);
                Ok(data)
            }
            Err(error) => {
                warn!(path = %self.path.display(), error = %error, "Master data reload failed, keeping previous data");
                Err(error)
            }
        }
    }

    /// Reloads only when the workbook's modification time changed since the
    /// last load. Returns whether a reload happened.
    pub fn refresh_if_modified(&self) -> EngineResult<bool> {
        let Some(cached) = self.read_state() else {
            self.get()?;
            return Ok(true);
        };
        let current = modified_time(&self.path);
        if current.is_some() && current != cached.modified {
            self.reload()?;
            return Ok(true);
        }
        Ok(false)
    }

    fn read_state(&self) -> Option<CachedMaster> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn load(&self) -> EngineResult<CachedMaster> {
        let modified = modified_time(&self.path);
        let data = MasterDataLoader::load(&self.path, &self.layout)?;
        Ok(CachedMaster {
            data: Arc::new(data),
            modified,
        })
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AdminConfig;
use crate::services::CategoryDisplayService;
use crate::store::{AdminDirectory, CategorySource, SettingsStore};

/// Application state shared across all handlers.
///
/// Cheap to clone; collaborators sit behind trait objects so the binary can
/// wire `PostgreSQL` while tests wire in-memory stores.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    settings: Arc<dyn SettingsStore>,
    categories: Arc<dyn CategorySource>,
    admins: Arc<dyn AdminDirectory>,
}

impl AppState {
    /// Create the application state.
    pub fn new(
        config: AdminConfig,
        settings: Arc<dyn SettingsStore>,
        categories: Arc<dyn CategorySource>,
        admins: Arc<dyn AdminDirectory>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                settings,
                categories,
                admins,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn settings(&self) -> &dyn SettingsStore {
        self.inner.settings.as_ref()
    }

    #[must_use]
    pub fn categories(&self) -> &dyn CategorySource {
        self.inner.categories.as_ref()
    }

    #[must_use]
    pub fn admins(&self) -> &dyn AdminDirectory {
        self.inner.admins.as_ref()
    }

    /// Category display service bound to this state's collaborators.
    #[must_use]
    pub fn category_display(&self) -> CategoryDisplayService<'_> {
        CategoryDisplayService::new(self.settings(), self.categories())
    }
}

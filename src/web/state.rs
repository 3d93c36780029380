use std::sync::Arc;

use tokio::sync::Mutex;

use crate::catalog::Catalog;
use crate::tracker::Tracker;

use super::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tracker: Arc<Mutex<Tracker>>,
    /// `None` when loading the element sources failed at startup
    pub catalog: Option<Arc<Catalog>>,
}

impl AppState {
    pub fn knows(&self, id: &str) -> bool {
        self.catalog.as_ref().is_some_and(|c| c.contains(id))
    }
}

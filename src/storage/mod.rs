pub mod file;
pub mod history;
pub mod memory;
pub mod traits;

use crate::config::HistoryConfig;
use std::sync::Arc;

pub use file::FileStore;
pub use history::{HistoryStore, HISTORY_KEY, HISTORY_LIMIT};
pub use memory::MemoryStore;
pub use traits::KeyValueStore;

/// Pick the backend the configuration asks for.
pub fn backend_from_config(config: &HistoryConfig) -> Arc<dyn KeyValueStore> {
    if config.enabled {
        Arc::new(FileStore::new(config.dir.clone()))
    } else {
        log::info!("History persistence disabled, keeping history in memory");
        Arc::new(MemoryStore::new())
    }
}

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::store::{JsonFileStore, MemoryStore, Store};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<AppConfig>,
    /// Serializes every read-modify-write against the store. The workflow's
    /// check-then-act sequences (duplicate-email check, transition plus
    /// balance credit) are only correct when writers cannot interleave.
    pub write_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn init() -> Self {
        let config = Arc::new(AppConfig::from_env());
        let store = Arc::new(JsonFileStore::new(&config.data_path)) as Arc<dyn Store>;
        Self {
            store,
            config,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// State over the in-memory fake store, for tests.
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(MemoryStore::default()),
            config: Arc::new(AppConfig {
                host: "127.0.0.1".into(),
                port: 0,
                data_path: String::new(),
            }),
            write_lock: Arc::new(Mutex::new(())),
        }
    }
}

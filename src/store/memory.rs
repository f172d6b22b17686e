use super::PluginStore;
use crate::error::RepliesError;
use ahash::AHashMap;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

/// Process-local plugin store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryPluginStore {
    rows: RwLock<AHashMap<(String, String), Value>>,
}

impl MemoryPluginStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PluginStore for MemoryPluginStore {
    async fn get(&self, plugin_name: &str, key: &str) -> Result<Option<Value>, RepliesError> {
        let rows = self.rows.read().await;
        Ok(rows
            .get(&(plugin_name.to_string(), key.to_string()))
            .cloned())
    }

    async fn set(&self, plugin_name: &str, key: &str, value: Value) -> Result<(), RepliesError> {
        self.rows
            .write()
            .await
            .insert((plugin_name.to_string(), key.to_string()), value);
        Ok(())
    }
}

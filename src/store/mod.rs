//! Host key-value facility that plugins persist their state through.
//!
//! Values are opaque JSON documents addressed by `(plugin_name, key)`. Writes replace the whole
//! value; there is no partial update and no cross-key transaction.

mod memory;

pub use memory::MemoryPluginStore;

use crate::error::RepliesError;
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait PluginStore: Send + Sync + 'static {
    /// Returns the stored value, or `None` if nothing was ever set for this key.
    async fn get(&self, plugin_name: &str, key: &str) -> Result<Option<Value>, RepliesError>;

    /// Replaces the stored value (last writer wins).
    async fn set(&self, plugin_name: &str, key: &str, value: Value) -> Result<(), RepliesError>;
}

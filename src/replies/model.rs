use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// A reusable (title, content) template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub id: String,

    /// Missing or null titles read back as empty strings.
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub title: String,

    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub content: String,

    /// Number of recorded uses; absent until the first one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usages: Option<u64>,
}

fn deserialize_null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Reply {
    pub fn new(id: String, title: String, content: String) -> Self {
        Self {
            id,
            title,
            content,
            usages: None,
        }
    }

    pub(crate) fn record_use(&mut self) {
        self.usages = Some(self.usages.unwrap_or(0) + 1);
    }
}

/// Persisted layout: reply id -> record.
pub type ReplyMap = BTreeMap<String, Reply>;

/// 128 random bits, hex-encoded (32 lowercase chars).
pub fn new_reply_id() -> String {
    let mut bytes = [0u8; 16];
    rand::rng().fill_bytes(&mut bytes);
    bytes.iter().fold(String::with_capacity(32), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}

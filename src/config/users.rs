use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A user entry for the static session provider.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserEntry {
    pub id: i64,
    pub username: String,

    /// Key presented by the client; numeric TOML values are accepted as strings.
    #[serde(deserialize_with = "deserialize_string_lax")]
    pub api_key: String,

    /// Group names the user belongs to.
    #[serde(default)]
    pub groups: Vec<String>,
}

fn deserialize_string_lax<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;

    match v {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(serde::de::Error::custom(
            "expected a string or a number for users.api_key",
        )),
    }
}

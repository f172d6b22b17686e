mod basic;
mod replies;
mod users;

pub use basic::BasicConfig;
pub use replies::RepliesConfig;
pub use users::UserEntry;

use crate::error::RepliesError;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, path::PathBuf};

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Core server configuration (see `basic` table in config.toml).
    #[serde(default)]
    pub basic: BasicConfig,

    /// Host-managed canned reply settings (see `canned_replies` table in config.toml).
    #[serde(default)]
    pub canned_replies: RepliesConfig,

    /// Users known to the static session provider (see `[[users]]` in config.toml).
    #[serde(default)]
    pub users: Vec<UserEntry>,
}

const DEFAULT_CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "CANNED_REPLIES_";

impl Config {
    /// Builds a Figment that merges defaults, an optional config TOML file and
    /// `CANNED_REPLIES_`-prefixed environment variables (`__` separates tables).
    pub fn figment() -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if PathBuf::from(DEFAULT_CONFIG_FILE).is_file() {
            figment = figment.merge(Toml::file(DEFAULT_CONFIG_FILE));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Extracts and validates the configuration.
    pub fn load() -> Result<Self, RepliesError> {
        let cfg: Self = Self::figment()
            .extract()
            .map_err(|err| RepliesError::Config(format!("failed to extract configuration: {err}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), RepliesError> {
        let mount = self.basic.mount_path.as_str();
        if !mount.starts_with('/') || mount == "/" {
            return Err(RepliesError::Config(format!(
                "basic.mount_path must start with '/' and not be the root, got {mount:?}"
            )));
        }

        let mut seen = HashSet::new();
        for user in &self.users {
            if user.api_key.trim().is_empty() {
                return Err(RepliesError::Config(format!(
                    "users.api_key must be non-empty (user {})",
                    user.username
                )));
            }
            if !seen.insert(user.api_key.as_str()) {
                return Err(RepliesError::Config(format!(
                    "users.api_key must be unique (user {})",
                    user.username
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(username: &str, api_key: &str) -> UserEntry {
        UserEntry {
            id: 1,
            username: username.to_string(),
            api_key: api_key.to_string(),
            groups: Vec::new(),
        }
    }

    #[test]
    fn defaults_are_valid() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.basic.mount_path, "/community_canned_replies");
        assert!(cfg.canned_replies.enabled);
        assert!(!cfg.canned_replies.everyone_enabled);
        assert!(!cfg.canned_replies.everyone_can_edit);
    }

    #[test]
    fn rejects_root_mount_path() {
        let mut cfg = Config::default();
        cfg.basic.mount_path = "/".to_string();
        assert!(matches!(cfg.validate(), Err(RepliesError::Config(_))));

        cfg.basic.mount_path = "replies".to_string();
        assert!(matches!(cfg.validate(), Err(RepliesError::Config(_))));
    }

    #[test]
    fn rejects_blank_and_duplicate_api_keys() {
        let mut cfg = Config::default();
        cfg.users = vec![user("alice", "  ")];
        assert!(matches!(cfg.validate(), Err(RepliesError::Config(_))));

        cfg.users = vec![user("alice", "k1"), user("bob", "k1")];
        assert!(matches!(cfg.validate(), Err(RepliesError::Config(_))));

        cfg.users = vec![user("alice", "k1"), user("bob", "k2")];
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn toml_tables_override_defaults() {
        let cfg: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::string(
                r#"
                [canned_replies]
                everyone_enabled = true
                groups = "Staff|moderators"

                [[users]]
                id = 7
                username = "mod"
                api_key = "secret"
                groups = ["moderators"]
                "#,
            ))
            .extract()
            .expect("valid toml config");

        assert!(cfg.canned_replies.everyone_enabled);
        assert!(!cfg.canned_replies.everyone_can_edit);
        assert_eq!(cfg.canned_replies.groups, "Staff|moderators");
        assert_eq!(cfg.basic.listen_port, 8188);
        assert_eq!(cfg.users.len(), 1);
        assert_eq!(cfg.users[0].groups, vec!["moderators".to_string()]);
    }
}

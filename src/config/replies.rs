use serde::{Deserialize, Serialize};

pub const DEFAULT_REPLY_TITLE: &str = "My first canned reply";
pub const DEFAULT_REPLY_BODY: &str = "This is an example canned reply.\n\n\
You can use **markdown** to style your replies. Click the **new** button to create new replies \
or the **edit** button to edit or remove an existing canned reply.\n\n\
_This reply will be added when the replies list is empty._";

/// Site settings governing canned replies.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RepliesConfig {
    /// Master switch for the whole feature.
    /// TOML: `canned_replies.enabled`. Default: `true`.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Everyone may use canned replies, regardless of group membership.
    /// TOML: `canned_replies.everyone_enabled`. Default: `false`.
    #[serde(default)]
    pub everyone_enabled: bool,

    /// Everyone may create, edit and remove canned replies.
    /// TOML: `canned_replies.everyone_can_edit`. Default: `false`.
    #[serde(default)]
    pub everyone_can_edit: bool,

    /// Pipe-delimited group names allowed to use and edit (case-insensitive).
    /// TOML: `canned_replies.groups`. Default: empty.
    #[serde(default)]
    pub groups: String,

    /// Title of the reply seeded into an empty store.
    #[serde(default = "default_title")]
    pub default_title: String,

    /// Body of the reply seeded into an empty store.
    #[serde(default = "default_body")]
    pub default_body: String,
}

impl Default for RepliesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            everyone_enabled: false,
            everyone_can_edit: false,
            groups: String::new(),
            default_title: default_title(),
            default_body: default_body(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_title() -> String {
    DEFAULT_REPLY_TITLE.to_string()
}

fn default_body() -> String {
    DEFAULT_REPLY_BODY.to_string()
}

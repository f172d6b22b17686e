//! Canned reply records and the repository that owns them.
//!
//! All replies live in a single plugin-store value: a JSON object mapping reply id to record.
//! Every operation loads the whole object, mutates it and writes it back.

pub mod actor;
mod model;

pub use actor::{ReplyRepositoryHandle, SeedReply, spawn};
pub use model::{Reply, ReplyMap, new_reply_id};

/// Plugin-store namespace for this feature.
pub const PLUGIN_NAME: &str = "community-canned-replies";

/// Key of the single plugin-store value holding every reply.
pub const STORE_NAME: &str = "replies";

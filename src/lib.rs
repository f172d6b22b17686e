//! Canned reply templates for a forum composer, served over HTTP.
//!
//! Replies are kept in one value of the host's plugin store (see [`store::PluginStore`]) and
//! exposed under a mount point guarded by [`policy::PermissionPolicy`].

pub mod config;
pub mod db;
pub mod error;
pub mod policy;
pub mod replies;
pub mod server;
pub mod session;
pub mod store;

mod utils;

pub use error::RepliesError;
pub use replies::{Reply, ReplyRepositoryHandle};

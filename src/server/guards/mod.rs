pub mod replies;

pub use replies::{CurrentUser, OptionalUser, ReplyRouteGuard};

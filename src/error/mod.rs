mod replies;

pub use replies::{ApiErrorBody, ApiErrorObject, RepliesError};

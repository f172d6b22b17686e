pub mod replies;
pub mod session;

use super::extract::ReplyParams;
use crate::error::RepliesError;
use crate::policy::Ability;
use crate::replies::Reply;
use crate::server::guards::CurrentUser;
use crate::server::router::AppState;
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Serialize)]
pub struct ReplyList {
    pub replies: Vec<Reply>,
}

/// GET / -> `{"replies": [...]}` ordered by title.
pub(super) async fn list(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<ReplyList>, RepliesError> {
    state.authorize(&user, Ability::Use)?;
    let replies = state.replies.all().await?;
    debug!(user = %user.username, count = replies.len(), "Listing canned replies");
    Ok(Json(ReplyList { replies }))
}

/// POST / -> the created reply.
pub(super) async fn create(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    params: ReplyParams,
) -> Result<Json<Reply>, RepliesError> {
    state.authorize(&user, Ability::Edit)?;
    let (title, content) = params.require_title_and_content()?;
    Ok(Json(state.replies.add(title, content).await?))
}

/// PUT /{id} -> the replacement reply.
pub(super) async fn update(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
    params: ReplyParams,
) -> Result<Json<Reply>, RepliesError> {
    state.authorize(&user, Ability::Edit)?;
    let (title, content) = params.require_title_and_content()?;
    Ok(Json(state.replies.edit(id, title, content).await?))
}

/// DELETE /{id} -> the removed reply, or `null` if there was none.
pub(super) async fn destroy(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<Option<Reply>>, RepliesError> {
    state.authorize(&user, Ability::Edit)?;
    Ok(Json(state.replies.remove(id).await?))
}

/// GET /{id}/reply -> the reply, or `null` if there is none.
pub(super) async fn retrieve(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<Option<Reply>>, RepliesError> {
    state.authorize(&user, Ability::Use)?;
    Ok(Json(state.replies.get(id).await?))
}

/// PATCH /{id}/use -> the reply with its incremented usage count.
pub(super) async fn record_use(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<Reply>, RepliesError> {
    state.authorize(&user, Ability::Use)?;
    Ok(Json(state.replies.record_use(id).await?))
}

use crate::error::RepliesError;
use crate::policy::User;
use crate::server::guards::OptionalUser;
use crate::server::router::AppState;
use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CurrentUserPayload {
    #[serde(flatten)]
    pub user: User,
    pub can_use_community_canned_replies: bool,
    pub can_edit_community_canned_replies: bool,
}

#[derive(Debug, Serialize)]
pub struct CurrentUserBody {
    pub current_user: CurrentUserPayload,
}

/// GET /session/current
///
/// Lets the composer decide whether to offer canned replies. Unlike the reply routes this is
/// not guarded by the permission policy; it reports the flags instead.
async fn current(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
) -> Result<Json<CurrentUserBody>, RepliesError> {
    let user = user.ok_or(RepliesError::NotFound)?;
    let can_use = state.enabled && state.policy.can_use(&user);
    let can_edit = state.enabled && state.policy.can_edit(&user);
    Ok(Json(CurrentUserBody {
        current_user: CurrentUserPayload {
            user,
            can_use_community_canned_replies: can_use,
            can_edit_community_canned_replies: can_edit,
        },
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/session/current", get(current))
}

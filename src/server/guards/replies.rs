use crate::error::RepliesError;
use crate::policy::{Ability, User};
use crate::server::router::AppState;
use axum::{extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;
use tracing::debug;

/// The user admitted by [`ReplyRouteGuard`], stored in request extensions for handlers.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

async fn resolve_user(parts: &Parts, state: &AppState) -> Option<User> {
    match state.users.current_user(parts).await {
        Ok(user) => user,
        Err(e) => {
            debug!(error = %e, "Current user lookup failed; treating request as anonymous");
            None
        }
    }
}

/// Route gate for every canned reply endpoint.
///
/// GET and PATCH need the use permission, everything else needs the edit permission. A disabled
/// feature, an anonymous request, a failed session lookup and a missing permission are all
/// rejected with a bare 404 so unauthorized callers cannot tell the routes exist.
#[derive(Debug, Clone, Copy)]
pub struct ReplyRouteGuard;

impl FromRequestParts<AppState> for ReplyRouteGuard {
    type Rejection = RepliesError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if !state.enabled {
            debug!(path = %parts.uri.path(), "Canned replies disabled");
            return Err(RepliesError::NotFound);
        }

        let Some(user) = resolve_user(parts, state).await else {
            debug!(path = %parts.uri.path(), "Canned reply route denied: no current user");
            return Err(RepliesError::NotFound);
        };

        let ability = Ability::required_for(&parts.method);
        if !state.policy.allows(&user, ability) {
            debug!(
                user = %user.username,
                method = %parts.method,
                ability = ?ability,
                "Canned reply route denied: missing permission"
            );
            return Err(RepliesError::NotFound);
        }

        parts.extensions.insert(CurrentUser(user));
        Ok(ReplyRouteGuard)
    }
}

/// The current user if the request carries valid credentials.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<User>);

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(OptionalUser(resolve_user(parts, state).await))
    }
}

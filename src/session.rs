//! Resolution of the acting user from an inbound request.

use crate::config::UserEntry;
use crate::error::RepliesError;
use crate::policy::User;
use async_trait::async_trait;
use axum::http::{HeaderMap, request::Parts};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use subtle::ConstantTimeEq;

/// Host authentication seam. `Ok(None)` means the request is anonymous.
#[async_trait]
pub trait CurrentUserProvider: Send + Sync + 'static {
    async fn current_user(&self, parts: &Parts) -> Result<Option<User>, RepliesError>;
}

fn extract_header_token(headers: &HeaderMap) -> Option<String> {
    if let Some(k) = headers.get("api-key").and_then(|v| v.to_str().ok()) {
        return Some(k.to_string());
    }
    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().to_string())
}

fn extract_query_token(query: Option<&str>) -> Option<String> {
    query.and_then(|q| {
        url::form_urlencoded::parse(q.as_bytes())
            .find(|(k, _)| k == "api_key")
            .map(|(_, v)| v.into_owned())
    })
}

/// Users and API keys fixed at startup.
#[derive(Debug, Clone, Default)]
pub struct StaticUserProvider {
    entries: Vec<(String, User)>,
}

impl StaticUserProvider {
    pub fn new(users: &[UserEntry]) -> Self {
        let entries = users
            .iter()
            .map(|u| {
                (
                    u.api_key.clone(),
                    User {
                        id: u.id,
                        username: u.username.clone(),
                        groups: u.groups.clone(),
                    },
                )
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn find(&self, key: &str) -> Option<&User> {
        // No early return: every entry is compared.
        let mut found = None;
        for (api_key, user) in &self.entries {
            if bool::from(key.as_bytes().ct_eq(api_key.as_bytes())) {
                found = Some(user);
            }
        }
        found
    }
}

#[async_trait]
impl CurrentUserProvider for StaticUserProvider {
    async fn current_user(&self, parts: &Parts) -> Result<Option<User>, RepliesError> {
        let token =
            extract_header_token(&parts.headers).or_else(|| extract_query_token(parts.uri.query()));
        Ok(token.and_then(|key| self.find(&key).cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn provider() -> StaticUserProvider {
        StaticUserProvider::new(&[
            UserEntry {
                id: 1,
                username: "admin".to_string(),
                api_key: "admin-key".to_string(),
                groups: vec!["staff".to_string()],
            },
            UserEntry {
                id: 2,
                username: "member".to_string(),
                api_key: "member-key".to_string(),
                groups: Vec::new(),
            },
        ])
    }

    fn parts(builder: axum::http::request::Builder) -> Parts {
        builder
            .body(())
            .expect("failed to build request")
            .into_parts()
            .0
    }

    #[tokio::test]
    async fn resolves_user_from_api_key_header() {
        let p = parts(Request::builder().uri("/").header("Api-Key", "admin-key"));
        let user = provider().current_user(&p).await.unwrap().expect("user");
        assert_eq!(user.username, "admin");
        assert_eq!(user.groups, vec!["staff".to_string()]);
    }

    #[tokio::test]
    async fn resolves_user_from_bearer_and_query() {
        let p = parts(
            Request::builder()
                .uri("/")
                .header("Authorization", "Bearer member-key"),
        );
        let user = provider().current_user(&p).await.unwrap().expect("user");
        assert_eq!(user.id, 2);

        let p = parts(Request::builder().uri("/x?api_key=admin-key"));
        let user = provider().current_user(&p).await.unwrap().expect("user");
        assert_eq!(user.id, 1);
    }

    #[tokio::test]
    async fn unknown_or_missing_key_is_anonymous() {
        let p = parts(Request::builder().uri("/").header("Api-Key", "nope"));
        assert!(provider().current_user(&p).await.unwrap().is_none());

        let p = parts(Request::builder().uri("/"));
        assert!(provider().current_user(&p).await.unwrap().is_none());
    }
}

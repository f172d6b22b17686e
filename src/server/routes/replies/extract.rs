use crate::error::RepliesError;
use crate::utils::logging::debug_pretty_json;
use axum::{
    Form,
    body::Bytes,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Request parameters for creating or editing a reply.
///
/// Accepts a JSON object or an urlencoded form. An empty body decodes as "no parameters" so
/// the missing fields are reported by name instead of as a parse failure. JSON numbers and
/// booleans are taken as their string form.
#[derive(Debug, Default, Deserialize, Serialize)]
pub(crate) struct ReplyParams {
    #[serde(default, deserialize_with = "deserialize_param_lax")]
    pub(crate) title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_param_lax")]
    pub(crate) content: Option<String>,
}

fn deserialize_param_lax<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        _ => Err(serde::de::Error::custom(
            "expected a string, number or boolean parameter",
        )),
    }
}

fn require(value: Option<String>, name: &'static str) -> Result<String, RepliesError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(RepliesError::MissingParam(name)),
    }
}

impl ReplyParams {
    /// Returns `(title, content)`, failing on the first absent or blank one.
    pub(crate) fn require_title_and_content(self) -> Result<(String, String), RepliesError> {
        let title = require(self.title, "title")?;
        let content = require(self.content, "content")?;
        Ok((title, content))
    }
}

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"))
}

impl<S> FromRequest<S> for ReplyParams
where
    S: Send + Sync,
{
    type Rejection = RepliesError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let params = if is_form(&req) {
            let Form(params) = Form::<ReplyParams>::from_request(req, state).await?;
            params
        } else {
            let body = Bytes::from_request(req, state).await?;
            if body.iter().all(u8::is_ascii_whitespace) {
                ReplyParams::default()
            } else {
                serde_json::from_slice(&body).map_err(|e| {
                    RepliesError::InvalidRequest(format!("malformed JSON body: {e}"))
                })?
            }
        };

        debug_pretty_json(&params, "Extracted canned reply params");

        Ok(params)
    }
}

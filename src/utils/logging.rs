use serde::Serialize;

/// Renders `value` as pretty JSON for a DEBUG event. Nothing is serialized unless DEBUG is on.
pub(crate) fn debug_pretty_json<T>(value: &T, what: &str)
where
    T: Serialize,
{
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }

    let pretty_json = serde_json::to_string_pretty(value)
        .unwrap_or_else(|error| format!("<pretty serialize failed: {error}>"));
    tracing::debug!(body = %pretty_json, "{what}");
}

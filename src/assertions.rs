use std::time::Duration;

use chrono::{NaiveDateTime, Utc};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Response, StatusCode};
use serde_json::Value;

/// Body-level status string the services under test report on success.
pub const SUCCESS_STATUS: &str = "success";

/// Content type the services under test respond with unless told otherwise.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// How far a server-generated timestamp may drift from the local clock.
pub const UPDATE_TOLERANCE: Duration = Duration::from_secs(10);

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Checks the response status code.
pub fn assert_status(response: &Response, expected: StatusCode) -> Result<(), String> {
    let got = response.status();
    if got != expected {
        return Err(format!("expected status code {}, got {}", expected, got));
    }
    Ok(())
}

/// Checks the `Content-Type` header, exactly. A missing header counts as
/// an empty string.
pub fn assert_content_type(response: &Response, expected: &str) -> Result<(), String> {
    let got = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");
    if got != expected {
        return Err(format!(
            "expected content type '{}', got '{}'",
            expected, got
        ));
    }
    Ok(())
}

/// Checks the status string a response body reported.
pub fn assert_body_status(got: &str, expected: &str) -> Result<(), String> {
    if got != expected {
        return Err(format!("expected status '{}', got '{}'", expected, got));
    }
    Ok(())
}

/// Checks that a body is empty: no content at all, whitespace only, or the
/// empty JSON object.
pub fn assert_empty_body(body: &str) -> Result<(), String> {
    if body.trim().is_empty() {
        return Ok(());
    }
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(fields)) if fields.is_empty() => Ok(()),
        _ => Err(format!("expected empty body, got: {}", body)),
    }
}

/// Checks that at least one of `urls` contains `needle`.
pub fn assert_any_url_contains<S: AsRef<str>>(urls: &[S], needle: &str) -> Result<(), String> {
    if urls.iter().any(|url| url.as_ref().contains(needle)) {
        return Ok(());
    }
    let urls = urls
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ");
    Err(format!("no URL in [{}] contains '{}'", urls, needle))
}

/// Checks that a server-generated timestamp lies within `tolerance` of the
/// local clock. The expected format is `2024-01-06T10:15:30.123Z`.
pub fn assert_recent_timestamp(timestamp: &str, tolerance: Duration) -> Result<(), String> {
    let parsed = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT)
        .map_err(|err| format!("timestamp '{}' has an unexpected format: {}", timestamp, err))?
        .and_utc();

    let drift = Utc::now()
        .signed_duration_since(parsed)
        .num_milliseconds()
        .unsigned_abs();
    if u128::from(drift) > tolerance.as_millis() {
        return Err(format!(
            "timestamp '{}' drifts {}s from now, more than the allowed {}s",
            timestamp,
            drift / 1000,
            tolerance.as_secs()
        ));
    }
    Ok(())
}

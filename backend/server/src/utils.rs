use axum::{body::Bytes, http::HeaderMap};
use serde::de::DeserializeOwned;

pub const API_KEY_HEADER: &str = "x-api-key";

pub fn parse_payload<T: DeserializeOwned>(body: &Bytes) -> Result<T, serde_json::Error> {
    serde_json::from_slice(body)
}

/// Missing header, missing configured key, or a mismatch are all unauthorized.
pub fn authorized(headers: &HeaderMap, expected: Option<&str>) -> bool {
    let Some(expected) = expected else {
        return false;
    };

    headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|provided| provided == expected)
}

use axum::http::{HeaderMap, HeaderValue, header};

use crate::{config::Session, error::Error};

fn build(config: &Session, token: &str, max_age: i64) -> Result<HeaderValue, Error> {
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        config.cookie_name, token, max_age
    );
    if config.secure {
        cookie.push_str("; Secure");
    }

    HeaderValue::from_str(&cookie).map_err(|e| Error::Other(e.into()))
}

/// `Set-Cookie` value carrying a new session token for the configured lifetime.
pub fn session_cookie(config: &Session, token: &str) -> Result<HeaderValue, Error> {
    build(config, token, config.ttl().num_seconds())
}

/// `Set-Cookie` value that makes the browser drop the session cookie.
pub fn expired_session_cookie(config: &Session) -> Result<HeaderValue, Error> {
    build(config, "", 0)
}

/// Finds the session token among every `Cookie` header of the request.
pub fn read_session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .filter(|(name, _)| *name == cookie_name)
        .map(|(_, value)| unquote(value.trim()))
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

/// Cookie values may be sent as a quoted string.
fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(value)
}

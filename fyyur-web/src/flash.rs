//! One-shot flash messages carried in a cookie
//!
//! Handlers that redirect store their message with [`set_cookie`]; the next
//! page render reads it through the [`IncomingFlash`] extractor, shows it and
//! clears the cookie.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderValue},
};
use std::convert::Infallible;

pub const FLASH_COOKIE: &str = "fyyur_flash";

/// Flash message sent by the browser with this request, if any
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncomingFlash(pub Option<String>);

impl IncomingFlash {
    pub fn message(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for IncomingFlash
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let message = parts
            .headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(read_cookie);
        Ok(IncomingFlash(message))
    }
}

/// Extract the flash message from one `Cookie` header value
fn read_cookie(header: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == FLASH_COOKIE)
        .and_then(|(_, value)| urlencoding::decode(value).ok())
        .map(|message| message.into_owned())
        .filter(|message| !message.is_empty())
}

/// `Set-Cookie` header storing a message for the next page
pub fn set_cookie(message: &str) -> (header::HeaderName, HeaderValue) {
    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        FLASH_COOKIE,
        urlencoding::encode(message)
    );
    // Percent-encoding leaves only visible ASCII
    let value = HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static(""));
    (header::SET_COOKIE, value)
}

/// `Set-Cookie` header expiring a displayed message
pub fn clear_cookie() -> (header::HeaderName, HeaderValue) {
    (
        header::SET_COOKIE,
        HeaderValue::from_static("fyyur_flash=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"),
    )
}

//! One-shot user messages carried across a redirect in a cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;

const FLASH_COOKIE: &str = "gigbook_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Danger,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Danger => "danger",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "success" => Some(Level::Success),
            "danger" => Some(Level::Danger),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub level: Level,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            level: Level::Danger,
            message: message.into(),
        }
    }

    /// `level:message`. The jar percent-encodes the cookie value.
    fn encode(&self) -> String {
        format!("{}:{}", self.level.as_str(), self.message)
    }

    fn decode(raw: &str) -> Option<Self> {
        let (level, message) = raw.split_once(':')?;
        Some(Self {
            level: Level::parse(level)?,
            message: message.to_string(),
        })
    }
}

/// Queue a message for the next page render.
pub fn set(jar: CookieJar, flash: Flash) -> CookieJar {
    jar.add(
        Cookie::build((FLASH_COOKIE, flash.encode()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax),
    )
}

/// Read the pending message, if any, and clear it.
pub fn take(jar: CookieJar) -> (CookieJar, Option<Flash>) {
    let Some(raw) = jar.get(FLASH_COOKIE).map(|c| c.value().to_string()) else {
        return (jar, None);
    };
    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
    (jar, Flash::decode(&raw))
}

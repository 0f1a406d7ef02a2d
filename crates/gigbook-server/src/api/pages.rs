use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use minijinja::context;
use serde::Serialize;

use super::Page;
use crate::error::PageError;
use crate::flash;
use crate::views;

#[derive(Serialize)]
pub struct ApiStatus {
    status: &'static str,
    version: &'static str,
}

/// GET /
pub async fn index(jar: CookieJar) -> Page {
    let (jar, flash) = flash::take(jar);
    let html = views::render("pages/home.html", context! { flash })?;
    Ok((jar, html))
}

/// GET /healthz
pub async fn healthz() -> Json<ApiStatus> {
    Json(ApiStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn not_found() -> PageError {
    PageError::NotFound
}

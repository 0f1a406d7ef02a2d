//! HTML rendering. Templates are compiled into the binary and parsed on
//! first use.

use axum::response::Html;
use chrono::DateTime;
use minijinja::Environment;
use serde::Serialize;
use std::sync::OnceLock;

use crate::error::PageError;

static TEMPLATES: OnceLock<Environment<'static>> = OnceLock::new();

fn environment() -> &'static Environment<'static> {
    TEMPLATES.get_or_init(|| {
        let mut env = Environment::new();
        env.set_loader(load_template);
        env.add_filter("datetime", format_datetime);
        env
    })
}

fn load_template(name: &str) -> Result<Option<String>, minijinja::Error> {
    let source = match name {
        "base.html" => include_str!("../templates/base.html"),
        "pages/home.html" => include_str!("../templates/pages/home.html"),
        "pages/venues.html" => include_str!("../templates/pages/venues.html"),
        "pages/show_venue.html" => include_str!("../templates/pages/show_venue.html"),
        "pages/artists.html" => include_str!("../templates/pages/artists.html"),
        "pages/show_artist.html" => include_str!("../templates/pages/show_artist.html"),
        "pages/search.html" => include_str!("../templates/pages/search.html"),
        "pages/shows.html" => include_str!("../templates/pages/shows.html"),
        "forms/venue.html" => include_str!("../templates/forms/venue.html"),
        "forms/artist.html" => include_str!("../templates/forms/artist.html"),
        "forms/show.html" => include_str!("../templates/forms/show.html"),
        "errors/404.html" => include_str!("../templates/errors/404.html"),
        "errors/500.html" => include_str!("../templates/errors/500.html"),
        _ => return Ok(None),
    };
    Ok(Some(source.to_string()))
}

/// `2035-04-01T20:00:00+00:00` → `Sun 04, 01, 2035 8:00PM`. Anything that is
/// not RFC 3339 is passed through unchanged.
fn format_datetime(value: String) -> String {
    match DateTime::parse_from_rfc3339(&value) {
        Ok(dt) => dt.format("%a %m, %d, %Y %-I:%M%p").to_string(),
        Err(_) => value,
    }
}

pub fn render<S: Serialize>(name: &str, ctx: S) -> Result<Html<String>, PageError> {
    let template = environment().get_template(name)?;
    Ok(Html(template.render(ctx)?))
}

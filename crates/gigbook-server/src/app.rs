use axum::{
    http::{header, HeaderName, HeaderValue},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use gigbook_db::AppState;
use std::sync::Arc;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::api;

const APP_JS: &str = include_str!("../static/app.js");

pub fn router(state: Arc<AppState>) -> Router {
    let venue_routes = Router::new()
        .route("/", get(api::venues::list_venues))
        .route("/search", post(api::venues::search_venues))
        .route(
            "/create",
            get(api::venues::create_venue_form).post(api::venues::create_venue_submission),
        )
        .route(
            "/{id}",
            get(api::venues::show_venue).delete(api::venues::delete_venue),
        )
        .route(
            "/{id}/edit",
            get(api::venues::edit_venue_form).post(api::venues::edit_venue_submission),
        );

    let artist_routes = Router::new()
        .route("/", get(api::artists::list_artists))
        .route("/search", post(api::artists::search_artists))
        .route(
            "/create",
            get(api::artists::create_artist_form).post(api::artists::create_artist_submission),
        )
        .route(
            "/{id}",
            get(api::artists::show_artist).delete(api::artists::delete_artist),
        )
        .route(
            "/{id}/edit",
            get(api::artists::edit_artist_form).post(api::artists::edit_artist_submission),
        );

    let show_routes = Router::new()
        .route("/", get(api::shows::list_shows))
        .route(
            "/create",
            get(api::shows::create_show_form).post(api::shows::create_show_submission),
        );

    Router::new()
        .route("/", get(api::pages::index))
        .route("/healthz", get(api::pages::healthz))
        .route("/static/app.js", get(app_js))
        .nest("/venues", venue_routes)
        .nest("/artists", artist_routes)
        .nest("/shows", show_routes)
        .fallback(api::pages::not_found)
        .layer(TraceLayer::new_for_http())
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("content-security-policy"),
            HeaderValue::from_static(
                "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data: https:; frame-ancestors 'none'",
            ),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state)
}

async fn app_js() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        APP_JS,
    )
}

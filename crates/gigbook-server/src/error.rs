use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use gigbook_db::StoreError;
use thiserror::Error;

use crate::views;

/// Failures that end a request with an error page instead of a redirect.
#[derive(Error, Debug)]
pub enum PageError {
    #[error("page not found")]
    NotFound,

    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, template) = match &self {
            PageError::NotFound | PageError::Store(StoreError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, "errors/404.html")
            }
            other => {
                tracing::error!(error = %other, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "errors/500.html")
            }
        };

        let body = views::render(template, minijinja::context! {}).unwrap_or_else(|e| {
            tracing::error!(error = %e, template, "failed to render error page");
            Html(format!("<h1>{}</h1>", status))
        });
        (status, body).into_response()
    }
}

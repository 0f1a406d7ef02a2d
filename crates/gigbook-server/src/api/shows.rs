use axum::{extract::State, response::Response};
use axum_extra::extract::{cookie::CookieJar, Form};
use gigbook_db::store::{self, ShowInput};
use gigbook_db::{AppState, StoreError};
use minijinja::context;
use std::sync::Arc;

use super::{failure, redirect_with, Page};
use crate::flash::{self, Flash};
use crate::forms::ShowForm;
use crate::views;

/// GET /shows
pub async fn list_shows(State(state): State<Arc<AppState>>, jar: CookieJar) -> Page {
    let (jar, flash) = flash::take(jar);
    let shows = store::list_shows(&state.db).await?;
    let html = views::render("pages/shows.html", context! { shows, flash })?;
    Ok((jar, html))
}

/// GET /shows/create
pub async fn create_show_form(jar: CookieJar) -> Page {
    let (jar, flash) = flash::take(jar);
    let html = views::render(
        "forms/show.html",
        context! { form => ShowForm::default(), flash },
    )?;
    Ok((jar, html))
}

/// POST /shows/create
pub async fn create_show_submission(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<ShowForm>,
) -> Response {
    let input = match ShowInput::try_from(form) {
        Ok(input) => input,
        Err(e) => {
            tracing::warn!(error = %e, "rejected show form");
            return redirect_with(
                jar,
                "/",
                Flash::danger(format!("An error occurred. Show could not be listed: {e}.")),
            );
        }
    };

    let message = match store::create_show(&state.db, input).await {
        Ok(_) => Flash::success("Show was successfully listed!"),
        Err(e @ StoreError::Reference { .. }) => {
            tracing::warn!(error = %e, "show references a missing row");
            Flash::danger(format!("{e}. Show could not be listed."))
        }
        Err(e) => failure(&e, "Show could not be listed."),
    };
    redirect_with(jar, "/", message)
}

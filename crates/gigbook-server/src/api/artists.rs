use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::{cookie::CookieJar, Form};
use chrono::Utc;
use gigbook_db::entities::artist;
use gigbook_db::store::{self, ShowDetail};
use gigbook_db::{directory, AppState};
use minijinja::context;
use serde::Serialize;
use std::sync::Arc;

use super::{failure, parse_path_id, redirect_with, DeleteResponse, Page, SearchHit, SearchResults};
use crate::error::PageError;
use crate::flash::{self, Flash};
use crate::forms::{ArtistForm, SearchForm, GENRE_CHOICES, STATE_CHOICES};
use crate::views;

#[derive(Debug, Serialize)]
pub struct ArtistDetail {
    #[serde(flatten)]
    pub artist: artist::Model,
    pub past_shows: Vec<ShowDetail>,
    pub upcoming_shows: Vec<ShowDetail>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

#[derive(Debug, Serialize)]
struct ArtistRow {
    id: uuid::Uuid,
    name: String,
}

fn not_found(jar: CookieJar, id: &str) -> Response {
    redirect_with(
        jar,
        "/artists",
        Flash::danger(format!("Artist with ID {id} was not found!")),
    )
}

/// GET /artists
pub async fn list_artists(State(state): State<Arc<AppState>>, jar: CookieJar) -> Page {
    let (jar, flash) = flash::take(jar);
    let artists: Vec<ArtistRow> = store::list_artists(&state.db)
        .await?
        .into_iter()
        .map(|a| ArtistRow {
            id: a.id,
            name: a.name,
        })
        .collect();
    let html = views::render("pages/artists.html", context! { artists, flash })?;
    Ok((jar, html))
}

/// POST /artists/search
pub async fn search_artists(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<SearchForm>,
) -> Page {
    let (jar, flash) = flash::take(jar);
    let artists = store::list_artists_with_shows(&state.db).await?;
    let hits: Vec<SearchHit> = directory::search(&artists, &form.search_term)
        .into_iter()
        .map(|a| SearchHit {
            id: a.entity.id,
            name: a.entity.name.clone(),
            num_upcoming_shows: a.num_upcoming_shows(),
        })
        .collect();
    let results = SearchResults::from(hits);

    tracing::debug!(term = %form.search_term, count = results.count, "artist search");
    let html = views::render(
        "pages/search.html",
        context! {
            kind => "artists",
            search_term => form.search_term,
            results,
            flash,
        },
    )?;
    Ok((jar, html))
}

/// GET /artists/{id}
pub async fn show_artist(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(raw_id): Path<String>,
) -> Result<Response, PageError> {
    let Some(id) = parse_path_id(&raw_id) else {
        return Ok(not_found(jar, &raw_id));
    };
    let booked = match store::find_artist_with_shows(&state.db, id).await {
        Ok(booked) => booked,
        Err(e) if e.is_not_found() => return Ok(not_found(jar, &raw_id)),
        Err(e) => return Err(e.into()),
    };

    let shows = store::show_details_for_artist(&state.db, &booked, Utc::now()).await?;
    let (artist, _) = booked.into_parts();
    let detail = ArtistDetail {
        artist,
        past_shows_count: shows.past.len(),
        upcoming_shows_count: shows.upcoming.len(),
        past_shows: shows.past,
        upcoming_shows: shows.upcoming,
    };

    let (jar, flash) = flash::take(jar);
    let html = views::render("pages/show_artist.html", context! { artist => detail, flash })?;
    Ok((jar, html).into_response())
}

/// GET /artists/create
pub async fn create_artist_form(jar: CookieJar) -> Page {
    let (jar, flash) = flash::take(jar);
    let html = views::render(
        "forms/artist.html",
        context! {
            title => "List a new artist",
            action => "/artists/create",
            form => ArtistForm::default(),
            genre_choices => GENRE_CHOICES,
            state_choices => STATE_CHOICES,
            flash,
        },
    )?;
    Ok((jar, html))
}

/// POST /artists/create
pub async fn create_artist_submission(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<ArtistForm>,
) -> Response {
    let name = form.name.trim().to_string();
    let message = match store::create_artist(&state.db, form.into()).await {
        Ok(created) => Flash::success(format!("Artist {} was successfully listed!", created.name)),
        Err(e) => failure(&e, &format!("Artist {name} could not be listed.")),
    };
    redirect_with(jar, "/", message)
}

/// GET /artists/{id}/edit
pub async fn edit_artist_form(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(raw_id): Path<String>,
) -> Result<Response, PageError> {
    let Some(id) = parse_path_id(&raw_id) else {
        return Ok(not_found(jar, &raw_id));
    };
    let artist = match store::find_artist(&state.db, id).await {
        Ok(artist) => artist,
        Err(e) if e.is_not_found() => return Ok(not_found(jar, &raw_id)),
        Err(e) => return Err(e.into()),
    };

    let (jar, flash) = flash::take(jar);
    let html = views::render(
        "forms/artist.html",
        context! {
            title => format!("Edit artist {}", artist.name),
            action => format!("/artists/{id}/edit"),
            form => ArtistForm::from(&artist),
            genre_choices => GENRE_CHOICES,
            state_choices => STATE_CHOICES,
            flash,
        },
    )?;
    Ok((jar, html).into_response())
}

/// POST /artists/{id}/edit
pub async fn edit_artist_submission(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(raw_id): Path<String>,
    Form(form): Form<ArtistForm>,
) -> Response {
    let Some(id) = parse_path_id(&raw_id) else {
        return not_found(jar, &raw_id);
    };
    let name = form.name.trim().to_string();
    match store::update_artist(&state.db, id, form.into()).await {
        Ok(updated) => redirect_with(
            jar,
            &format!("/artists/{id}"),
            Flash::success(format!("Artist {} was successfully updated!", updated.name)),
        ),
        Err(e) if e.is_not_found() => not_found(jar, &raw_id),
        Err(e) => redirect_with(
            jar,
            &format!("/artists/{id}/edit"),
            failure(&e, &format!("Artist {name} could not be updated.")),
        ),
    }
}

/// DELETE /artists/{id}
pub async fn delete_artist(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(raw_id): Path<String>,
) -> (CookieJar, Json<DeleteResponse>) {
    let result = match parse_path_id(&raw_id) {
        Some(id) => store::delete_artist(&state.db, id).await,
        None => Ok(false),
    };
    let (success, message) = match result {
        Ok(true) => (true, Flash::success("Artist was successfully deleted!")),
        Ok(false) => (
            false,
            Flash::danger(format!("Artist with ID {raw_id} was not found!")),
        ),
        Err(e) => (
            false,
            failure(&e, &format!("Artist with ID {raw_id} could not be deleted.")),
        ),
    };
    (flash::set(jar, message), Json(DeleteResponse { success }))
}

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::{cookie::CookieJar, Form};
use chrono::Utc;
use gigbook_db::entities::venue;
use gigbook_db::store::{self, ShowDetail};
use gigbook_db::{directory, AppState};
use minijinja::context;
use serde::Serialize;
use std::sync::Arc;

use super::{failure, parse_path_id, redirect_with, DeleteResponse, Page, SearchHit, SearchResults};
use crate::error::PageError;
use crate::flash::{self, Flash};
use crate::forms::{SearchForm, VenueForm, GENRE_CHOICES, STATE_CHOICES};
use crate::views;

#[derive(Debug, Serialize)]
pub struct VenueDetail {
    #[serde(flatten)]
    pub venue: venue::Model,
    pub past_shows: Vec<ShowDetail>,
    pub upcoming_shows: Vec<ShowDetail>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

fn not_found(jar: CookieJar, id: &str) -> Response {
    redirect_with(
        jar,
        "/venues",
        Flash::danger(format!("Venue with ID {id} was not found!")),
    )
}

/// GET /venues
pub async fn list_venues(State(state): State<Arc<AppState>>, jar: CookieJar) -> Page {
    let (jar, flash) = flash::take(jar);
    let venues = store::list_venues_with_shows(&state.db).await?;
    let areas = directory::group_by_location(&venues);
    let html = views::render("pages/venues.html", context! { areas, flash })?;
    Ok((jar, html))
}

/// POST /venues/search
pub async fn search_venues(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<SearchForm>,
) -> Page {
    let (jar, flash) = flash::take(jar);
    let venues = store::list_venues_with_shows(&state.db).await?;
    let hits: Vec<SearchHit> = directory::search(&venues, &form.search_term)
        .into_iter()
        .map(|v| SearchHit {
            id: v.entity.id,
            name: v.entity.name.clone(),
            num_upcoming_shows: v.num_upcoming_shows(),
        })
        .collect();
    let results = SearchResults::from(hits);

    tracing::debug!(term = %form.search_term, count = results.count, "venue search");
    let html = views::render(
        "pages/search.html",
        context! {
            kind => "venues",
            search_term => form.search_term,
            results,
            flash,
        },
    )?;
    Ok((jar, html))
}

/// GET /venues/{id}
pub async fn show_venue(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(raw_id): Path<String>,
) -> Result<Response, PageError> {
    let Some(id) = parse_path_id(&raw_id) else {
        return Ok(not_found(jar, &raw_id));
    };
    let booked = match store::find_venue_with_shows(&state.db, id).await {
        Ok(booked) => booked,
        Err(e) if e.is_not_found() => return Ok(not_found(jar, &raw_id)),
        Err(e) => return Err(e.into()),
    };

    let shows = store::show_details_for_venue(&state.db, &booked, Utc::now()).await?;
    let (venue, _) = booked.into_parts();
    let detail = VenueDetail {
        venue,
        past_shows_count: shows.past.len(),
        upcoming_shows_count: shows.upcoming.len(),
        past_shows: shows.past,
        upcoming_shows: shows.upcoming,
    };

    let (jar, flash) = flash::take(jar);
    let html = views::render("pages/show_venue.html", context! { venue => detail, flash })?;
    Ok((jar, html).into_response())
}

/// GET /venues/create
pub async fn create_venue_form(jar: CookieJar) -> Page {
    let (jar, flash) = flash::take(jar);
    let html = views::render(
        "forms/venue.html",
        context! {
            title => "List a new venue",
            action => "/venues/create",
            form => VenueForm::default(),
            genre_choices => GENRE_CHOICES,
            state_choices => STATE_CHOICES,
            flash,
        },
    )?;
    Ok((jar, html))
}

/// POST /venues/create
pub async fn create_venue_submission(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<VenueForm>,
) -> Response {
    let name = form.name.trim().to_string();
    let message = match store::create_venue(&state.db, form.into()).await {
        Ok(created) => Flash::success(format!("Venue {} was successfully listed!", created.name)),
        Err(e) => failure(&e, &format!("Venue {name} could not be listed.")),
    };
    redirect_with(jar, "/", message)
}

/// GET /venues/{id}/edit
pub async fn edit_venue_form(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(raw_id): Path<String>,
) -> Result<Response, PageError> {
    let Some(id) = parse_path_id(&raw_id) else {
        return Ok(not_found(jar, &raw_id));
    };
    let venue = match store::find_venue(&state.db, id).await {
        Ok(venue) => venue,
        Err(e) if e.is_not_found() => return Ok(not_found(jar, &raw_id)),
        Err(e) => return Err(e.into()),
    };

    let (jar, flash) = flash::take(jar);
    let html = views::render(
        "forms/venue.html",
        context! {
            title => format!("Edit venue {}", venue.name),
            action => format!("/venues/{id}/edit"),
            form => VenueForm::from(&venue),
            genre_choices => GENRE_CHOICES,
            state_choices => STATE_CHOICES,
            flash,
        },
    )?;
    Ok((jar, html).into_response())
}

/// POST /venues/{id}/edit
pub async fn edit_venue_submission(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(raw_id): Path<String>,
    Form(form): Form<VenueForm>,
) -> Response {
    let Some(id) = parse_path_id(&raw_id) else {
        return not_found(jar, &raw_id);
    };
    let name = form.name.trim().to_string();
    match store::update_venue(&state.db, id, form.into()).await {
        Ok(updated) => redirect_with(
            jar,
            &format!("/venues/{id}"),
            Flash::success(format!("Venue {} was successfully updated!", updated.name)),
        ),
        Err(e) if e.is_not_found() => not_found(jar, &raw_id),
        Err(e) => redirect_with(
            jar,
            &format!("/venues/{id}/edit"),
            failure(&e, &format!("Venue {name} could not be updated.")),
        ),
    }
}

/// DELETE /venues/{id}
pub async fn delete_venue(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(raw_id): Path<String>,
) -> (CookieJar, Json<DeleteResponse>) {
    let result = match parse_path_id(&raw_id) {
        Some(id) => store::delete_venue(&state.db, id).await,
        None => Ok(false),
    };
    let (success, message) = match result {
        Ok(true) => (true, Flash::success("Venue was successfully deleted!")),
        Ok(false) => (
            false,
            Flash::danger(format!("Venue with ID {raw_id} was not found!")),
        ),
        Err(e) => (
            false,
            failure(&e, &format!("Venue with ID {raw_id} could not be deleted.")),
        ),
    };
    (flash::set(jar, message), Json(DeleteResponse { success }))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use axum::http::StatusCode;
    use chrono::{Duration, Utc};
    use gigbook_db::entities::{show, venue};
    use gigbook_db::sea_orm::{EntityTrait, PaginatorTrait};
    use gigbook_db::store::{self, ArtistInput, ShowInput, VenueInput};

    const HOP_FORM: &str = "name=The+Musical+Hop&city=San+Francisco&state=CA\
                            &address=1015+Folsom+Street&genres=Jazz&genres=Reggae&seeking_talent=y";

    fn venue_input(name: &str, city: &str, state: &str) -> VenueInput {
        VenueInput {
            name: name.into(),
            city: city.into(),
            state: state.into(),
            address: "1015 Folsom Street".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_venue_redirects_home_with_flash() {
        let (app, db) = test_app().await;

        let response = post_form(&app, "/venues/create", HOP_FORM).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
        assert_eq!(
            flash_message(&response).as_deref(),
            Some("Venue The Musical Hop was successfully listed!")
        );

        let stored = venue::Entity::find().all(&db).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert!(stored[0].seeking_talent);
        assert_eq!(stored[0].genres.as_slice(), ["Jazz", "Reggae"]);
    }

    #[tokio::test]
    async fn test_create_venue_missing_address_is_rejected() {
        let (app, db) = test_app().await;

        let response = post_form(&app, "/venues/create", "name=Hop&city=SF&state=CA").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
        let message = flash_message(&response).unwrap();
        assert!(message.contains("could not be listed"), "{message}");
        assert!(message.contains("address"), "{message}");
        assert_eq!(venue::Entity::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_venues_groups_by_city() {
        let (app, db) = test_app().await;
        store::create_venue(&db, venue_input("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();
        store::create_venue(&db, venue_input("Park Square Live Music & Coffee", "San Francisco", "CA"))
            .await
            .unwrap();
        store::create_venue(&db, venue_input("The Dueling Pianos Bar", "New York", "NY"))
            .await
            .unwrap();

        let response = get(&app, "/venues").await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("The Musical Hop"));
        assert!(html.contains("Park Square Live Music &amp; Coffee"));
        assert_eq!(html.matches("San Francisco, CA").count(), 1);
        assert!(html.contains("New York, NY"));
    }

    #[tokio::test]
    async fn test_search_venues() {
        let (app, db) = test_app().await;
        store::create_venue(&db, venue_input("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();
        store::create_venue(&db, venue_input("Park Square Live Music & Coffee", "San Francisco", "CA"))
            .await
            .unwrap();

        let html = body_text(post_form(&app, "/venues/search", "search_term=hop").await).await;
        assert!(html.contains("Number of search results for \"hop\": 1"));
        assert!(html.contains("The Musical Hop"));
        assert!(!html.contains("Park Square"));

        let html = body_text(post_form(&app, "/venues/search", "search_term=Music").await).await;
        assert!(html.contains("Number of search results for \"Music\": 2"));
    }

    #[tokio::test]
    async fn test_show_venue_partitions_shows() {
        let (app, db) = test_app().await;
        let hop = store::create_venue(&db, venue_input("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();
        let band = store::create_artist(
            &db,
            ArtistInput {
                name: "Guns N Petals".into(),
                city: "San Francisco".into(),
                state: "CA".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        for offset in [Duration::days(-30), Duration::days(30), Duration::days(60)] {
            store::create_show(
                &db,
                ShowInput {
                    venue_id: hop.id,
                    artist_id: band.id,
                    start_time: (Utc::now() + offset).fixed_offset(),
                },
            )
            .await
            .unwrap();
        }

        let response = get(&app, &format!("/venues/{}", hop.id)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("1 Past Show"));
        assert!(html.contains("2 Upcoming Shows"));
        assert!(html.contains("Guns N Petals"));
    }

    #[tokio::test]
    async fn test_show_missing_venue_redirects_to_list() {
        let (app, _db) = test_app().await;
        let missing = uuid::Uuid::new_v4();

        let response = get(&app, &format!("/venues/{missing}")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/venues");
        assert_eq!(
            flash_message(&response),
            Some(format!("Venue with ID {missing} was not found!"))
        );

        let response = get(&app, "/venues/not-a-uuid").await;
        assert_eq!(location(&response), "/venues");
    }

    #[tokio::test]
    async fn test_edit_venue() {
        let (app, db) = test_app().await;
        let hop = store::create_venue(&db, venue_input("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();

        let html = body_text(get(&app, &format!("/venues/{}/edit", hop.id)).await).await;
        assert!(html.contains("value=\"The Musical Hop\""));

        let response = post_form(
            &app,
            &format!("/venues/{}/edit", hop.id),
            "name=The+Musical+Hop+II&city=Oakland&state=CA&address=1+Broadway",
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), format!("/venues/{}", hop.id));

        let updated = store::find_venue(&db, hop.id).await.unwrap();
        assert_eq!(updated.name, "The Musical Hop II");
        assert_eq!(updated.city, "Oakland");
    }

    #[tokio::test]
    async fn test_edit_with_bad_link_returns_to_form() {
        let (app, db) = test_app().await;
        let hop = store::create_venue(&db, venue_input("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();

        let response = post_form(
            &app,
            &format!("/venues/{}/edit", hop.id),
            "name=Hop&city=SF&state=CA&address=1+Broadway&image_link=not+a+link",
        )
        .await;
        assert_eq!(location(&response), format!("/venues/{}/edit", hop.id));
        assert_eq!(store::find_venue(&db, hop.id).await.unwrap().name, "The Musical Hop");
    }

    #[tokio::test]
    async fn test_delete_venue_returns_json() {
        let (app, db) = test_app().await;
        let hop = store::create_venue(&db, venue_input("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();

        let response = delete(&app, &format!("/venues/{}", hop.id)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            flash_message(&response).as_deref(),
            Some("Venue was successfully deleted!")
        );
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(venue::Entity::find().count(&db).await.unwrap(), 0);
        assert_eq!(show::Entity::find().count(&db).await.unwrap(), 0);

        let response = delete(&app, &format!("/venues/{}", hop.id)).await;
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["success"], false);
    }
}

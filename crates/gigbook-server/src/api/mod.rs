pub mod artists;
pub mod pages;
pub mod shows;
pub mod venues;

use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use gigbook_db::StoreError;
use serde::Serialize;
use uuid::Uuid;

use crate::error::PageError;
use crate::flash::{self, Flash};

/// A rendered page plus the jar with the consumed flash removed.
pub type Page = Result<(CookieJar, Html<String>), PageError>;

#[derive(Debug, Serialize)]
pub struct SearchHit {
    pub id: Uuid,
    pub name: String,
    pub num_upcoming_shows: usize,
}

#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub count: usize,
    pub data: Vec<SearchHit>,
}

impl From<Vec<SearchHit>> for SearchResults {
    fn from(data: Vec<SearchHit>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// 303 to `to` with a message for the next page.
pub(crate) fn redirect_with(jar: CookieJar, to: &str, message: Flash) -> Response {
    (flash::set(jar, message), Redirect::to(to)).into_response()
}

/// Flash for a failed mutation. Database failures are logged and replaced by
/// a generic message; anything else is shown to the user.
pub(crate) fn failure(err: &StoreError, summary: &str) -> Flash {
    match err {
        StoreError::Persistence(cause) => {
            tracing::error!(error = %cause, "{summary}");
            Flash::danger(format!("An error occurred. {summary}"))
        }
        other => {
            tracing::warn!(error = %other, "{summary}");
            Flash::danger(format!("{summary} Reason: {other}."))
        }
    }
}

pub(crate) fn parse_path_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}


#[cfg(test)]
mod tests {
    use super::*;
    use gigbook_db::sea_orm::DbErr;

    #[test]
    fn test_failure_hides_database_errors() {
        let err = StoreError::from(DbErr::Custom("password authentication failed".into()));
        let message = failure(&err, "Venue Hop could not be listed.");
        assert_eq!(message, Flash::danger("An error occurred. Venue Hop could not be listed."));
    }

    #[test]
    fn test_failure_shows_validation_reason() {
        let err = StoreError::Validation {
            field: "city",
            reason: "is required".into(),
        };
        let message = failure(&err, "Venue Hop could not be listed.");
        assert_eq!(
            message.message,
            "Venue Hop could not be listed. Reason: invalid city: is required."
        );
    }

    #[test]
    fn test_parse_path_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_path_id(&id.to_string()), Some(id));
        assert_eq!(parse_path_id("17"), None);
    }

    #[test]
    fn test_search_results_count() {
        let results = SearchResults::from(vec![SearchHit {
            id: Uuid::nil(),
            name: "The Musical Hop".into(),
            num_upcoming_shows: 0,
        }]);
        assert_eq!(results.count, 1);
    }
}

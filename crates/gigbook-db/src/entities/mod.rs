pub mod artist;
pub mod show;
pub mod venue;

use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

/// Ordered, free-form genre list stored as a JSON array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct Genres(pub Vec<String>);

impl Genres {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for Genres {
    fn from(genres: Vec<String>) -> Self {
        Self(genres)
    }
}

use chrono::{DateTime, FixedOffset};
use sea_orm::Set;
use url::Url;
use uuid::Uuid;

use crate::entities::{artist, venue, Genres};
use crate::StoreError;

/// Venue fields as submitted. Text fields are raw; blank optional fields are
/// stored as `NULL`.
#[derive(Debug, Clone, Default)]
pub struct VenueInput {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub image_link: String,
    pub facebook_link: String,
    pub website: String,
    pub seeking_talent: bool,
    pub seeking_description: String,
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ArtistInput {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub image_link: String,
    pub facebook_link: String,
    pub website: String,
    pub seeking_venue: bool,
    pub seeking_description: String,
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct ShowInput {
    pub venue_id: Uuid,
    pub artist_id: Uuid,
    pub start_time: DateTime<FixedOffset>,
}

pub(crate) struct ValidVenue {
    name: String,
    city: String,
    state: String,
    address: String,
    phone: Option<String>,
    image_link: Option<String>,
    facebook_link: Option<String>,
    website: Option<String>,
    seeking_talent: bool,
    seeking_description: Option<String>,
    genres: Genres,
}

pub(crate) struct ValidArtist {
    name: String,
    city: String,
    state: String,
    phone: Option<String>,
    image_link: Option<String>,
    facebook_link: Option<String>,
    website: Option<String>,
    seeking_venue: bool,
    seeking_description: Option<String>,
    genres: Genres,
}

impl VenueInput {
    pub(crate) fn validate(self) -> Result<ValidVenue, StoreError> {
        Ok(ValidVenue {
            name: required("name", self.name)?,
            city: required("city", self.city)?,
            state: required("state", self.state)?,
            address: required("address", self.address)?,
            phone: optional(self.phone),
            image_link: optional_url("image_link", self.image_link)?,
            facebook_link: optional_url("facebook_link", self.facebook_link)?,
            website: optional_url("website", self.website)?,
            seeking_talent: self.seeking_talent,
            seeking_description: optional(self.seeking_description),
            genres: clean_genres(self.genres),
        })
    }
}

impl ValidVenue {
    pub(crate) fn apply(self, active: &mut venue::ActiveModel) {
        active.name = Set(self.name);
        active.city = Set(self.city);
        active.state = Set(self.state);
        active.address = Set(self.address);
        active.phone = Set(self.phone);
        active.image_link = Set(self.image_link);
        active.facebook_link = Set(self.facebook_link);
        active.website = Set(self.website);
        active.seeking_talent = Set(self.seeking_talent);
        active.seeking_description = Set(self.seeking_description);
        active.genres = Set(self.genres);
    }
}

impl ArtistInput {
    pub(crate) fn validate(self) -> Result<ValidArtist, StoreError> {
        Ok(ValidArtist {
            name: required("name", self.name)?,
            city: required("city", self.city)?,
            state: required("state", self.state)?,
            phone: optional(self.phone),
            image_link: optional_url("image_link", self.image_link)?,
            facebook_link: optional_url("facebook_link", self.facebook_link)?,
            website: optional_url("website", self.website)?,
            seeking_venue: self.seeking_venue,
            seeking_description: optional(self.seeking_description),
            genres: clean_genres(self.genres),
        })
    }
}

impl ValidArtist {
    pub(crate) fn apply(self, active: &mut artist::ActiveModel) {
        active.name = Set(self.name);
        active.city = Set(self.city);
        active.state = Set(self.state);
        active.phone = Set(self.phone);
        active.image_link = Set(self.image_link);
        active.facebook_link = Set(self.facebook_link);
        active.website = Set(self.website);
        active.seeking_venue = Set(self.seeking_venue);
        active.seeking_description = Set(self.seeking_description);
        active.genres = Set(self.genres);
    }
}

fn required(field: &'static str, value: String) -> Result<String, StoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StoreError::validation(field, "is required"));
    }
    Ok(trimmed.to_string())
}

fn optional(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn optional_url(field: &'static str, value: String) -> Result<Option<String>, StoreError> {
    let Some(link) = optional(value) else {
        return Ok(None);
    };
    match Url::parse(&link) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(Some(link)),
        Ok(url) => Err(StoreError::validation(
            field,
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => Err(StoreError::validation(field, format!("not a valid URL ({e})"))),
    }
}

fn clean_genres(genres: Vec<String>) -> Genres {
    genres
        .into_iter()
        .map(|g| g.trim().to_string())
        .filter(|g| !g.is_empty())
        .collect::<Vec<_>>()
        .into()
}

//! Form payloads and the parsing done once at the HTTP boundary.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use gigbook_db::entities::{artist, venue};
use gigbook_db::store::{ArtistInput, ShowInput, VenueInput};

pub const GENRE_CHOICES: &[&str] = &[
    "Alternative",
    "Blues",
    "Classical",
    "Country",
    "Electronic",
    "Folk",
    "Funk",
    "Hip-Hop",
    "Heavy Metal",
    "Instrumental",
    "Jazz",
    "Musical Theatre",
    "Pop",
    "Punk",
    "R&B",
    "Reggae",
    "Rock n Roll",
    "Soul",
    "Other",
];

pub const STATE_CHOICES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MT", "NE", "NV", "NH", "NJ", "NM", "NY", "NC", "ND", "OH",
    "OK", "OR", "MD", "MA", "MI", "MN", "MS", "MO", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{field} '{value}' is not a valid ID")]
    InvalidId { field: &'static str, value: String },

    #[error("'{0}' is not a valid date and time")]
    InvalidStartTime(String),
}

/// Checkbox and legacy truthy values. Absent or unrecognised means `false`.
pub fn parse_flag(value: Option<&str>) -> bool {
    value.is_some_and(|v| {
        matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "y" | "yes" | "t" | "true" | "on" | "1"
        )
    })
}

/// RFC 3339, or a naive `YYYY-MM-DD[ T]HH:MM[:SS]` taken as UTC.
pub fn parse_start_time(raw: &str) -> Result<DateTime<FixedOffset>, FormError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(FormError::Missing("start_time"));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt);
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc().fixed_offset())
        .ok_or_else(|| FormError::InvalidStartTime(raw.to_string()))
}

fn parse_id(field: &'static str, raw: &str) -> Result<Uuid, FormError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(FormError::Missing(field));
    }
    Uuid::parse_str(raw).map_err(|_| FormError::InvalidId {
        field,
        value: raw.to_string(),
    })
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchForm {
    pub search_term: String,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct VenueForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub image_link: String,
    pub facebook_link: String,
    pub website_link: String,
    pub seeking_talent: Option<String>,
    pub seeking_description: String,
    pub genres: Vec<String>,
}

impl From<VenueForm> for VenueInput {
    fn from(f: VenueForm) -> Self {
        Self {
            name: f.name,
            city: f.city,
            state: f.state,
            address: f.address,
            phone: f.phone,
            image_link: f.image_link,
            facebook_link: f.facebook_link,
            website: f.website_link,
            seeking_talent: parse_flag(f.seeking_talent.as_deref()),
            seeking_description: f.seeking_description,
            genres: f.genres,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ArtistForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub image_link: String,
    pub facebook_link: String,
    pub website_link: String,
    pub seeking_venue: Option<String>,
    pub seeking_description: String,
    pub genres: Vec<String>,
}

/// Pre-fills the edit form.
impl From<&venue::Model> for VenueForm {
    fn from(v: &venue::Model) -> Self {
        Self {
            name: v.name.clone(),
            city: v.city.clone(),
            state: v.state.clone(),
            address: v.address.clone(),
            phone: v.phone.clone().unwrap_or_default(),
            image_link: v.image_link.clone().unwrap_or_default(),
            facebook_link: v.facebook_link.clone().unwrap_or_default(),
            website_link: v.website.clone().unwrap_or_default(),
            seeking_talent: v.seeking_talent.then(|| "y".to_string()),
            seeking_description: v.seeking_description.clone().unwrap_or_default(),
            genres: v.genres.as_slice().to_vec(),
        }
    }
}

impl From<ArtistForm> for ArtistInput {
    fn from(f: ArtistForm) -> Self {
        Self {
            name: f.name,
            city: f.city,
            state: f.state,
            phone: f.phone,
            image_link: f.image_link,
            facebook_link: f.facebook_link,
            website: f.website_link,
            seeking_venue: parse_flag(f.seeking_venue.as_deref()),
            seeking_description: f.seeking_description,
            genres: f.genres,
        }
    }
}

impl From<&artist::Model> for ArtistForm {
    fn from(a: &artist::Model) -> Self {
        Self {
            name: a.name.clone(),
            city: a.city.clone(),
            state: a.state.clone(),
            phone: a.phone.clone().unwrap_or_default(),
            image_link: a.image_link.clone().unwrap_or_default(),
            facebook_link: a.facebook_link.clone().unwrap_or_default(),
            website_link: a.website.clone().unwrap_or_default(),
            seeking_venue: a.seeking_venue.then(|| "y".to_string()),
            seeking_description: a.seeking_description.clone().unwrap_or_default(),
            genres: a.genres.as_slice().to_vec(),
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ShowForm {
    pub artist_id: String,
    pub venue_id: String,
    pub start_time: String,
}

impl TryFrom<ShowForm> for ShowInput {
    type Error = FormError;

    fn try_from(f: ShowForm) -> Result<Self, Self::Error> {
        Ok(Self {
            venue_id: parse_id("venue_id", &f.venue_id)?,
            artist_id: parse_id("artist_id", &f.artist_id)?,
            start_time: parse_start_time(&f.start_time)?,
        })
    }
}

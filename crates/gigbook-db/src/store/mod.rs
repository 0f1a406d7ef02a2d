//! Reads and mutations against the venue/artist/show tables.
//!
//! Every mutation runs inside its own `DatabaseTransaction`. The transaction
//! is committed as the last step; any earlier return (validation failure,
//! missing row, database error) drops it, which rolls it back.

pub mod artists;
mod input;
pub mod shows;
pub mod venues;

pub use artists::{
    create_artist, delete_artist, find_artist, find_artist_with_shows, list_artists,
    list_artists_with_shows, update_artist,
};
pub use input::{ArtistInput, ShowInput, VenueInput};
pub use shows::{
    create_show, list_shows, show_details_for_artist, show_details_for_venue, ShowDetail,
    ShowListing,
};
pub use venues::{
    create_venue, delete_venue, find_venue, find_venue_with_shows, list_venues_with_shows,
    update_venue,
};

pub(crate) const VENUE: &str = "Venue";
pub(crate) const ARTIST: &str = "Artist";

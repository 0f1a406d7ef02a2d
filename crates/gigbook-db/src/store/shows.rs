use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use super::{ShowInput, ARTIST, VENUE};
use crate::entities::{artist, show, venue};
use crate::{Booked, Partition, StoreError};

/// One row of the all-shows listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShowListing {
    pub id: Uuid,
    pub venue_id: Uuid,
    pub venue_name: String,
    pub artist_id: Uuid,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: DateTimeWithTimeZone,
}

/// A show seen from one side of the booking: on a venue page the
/// counterpart is the artist, on an artist page it is the venue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShowDetail {
    pub show_id: Uuid,
    pub counterpart_id: Uuid,
    pub counterpart_name: String,
    pub counterpart_image_link: Option<String>,
    pub start_time: DateTimeWithTimeZone,
}

/// Book an artist at a venue. Both ids are checked inside the transaction
/// before anything is written.
pub async fn create_show(
    db: &DatabaseConnection,
    input: ShowInput,
) -> Result<show::Model, StoreError> {
    let txn = db.begin().await?;

    if venue::Entity::find_by_id(input.venue_id)
        .one(&txn)
        .await?
        .is_none()
    {
        return Err(StoreError::Reference {
            entity: VENUE,
            id: input.venue_id,
        });
    }
    if artist::Entity::find_by_id(input.artist_id)
        .one(&txn)
        .await?
        .is_none()
    {
        return Err(StoreError::Reference {
            entity: ARTIST,
            id: input.artist_id,
        });
    }

    let created = show::ActiveModel {
        id: Set(Uuid::new_v4()),
        start_time: Set(input.start_time),
        artist_id: Set(input.artist_id),
        venue_id: Set(input.venue_id),
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    tracing::info!(
        show_id = %created.id,
        venue_id = %created.venue_id,
        artist_id = %created.artist_id,
        start_time = %created.start_time,
        "show created"
    );
    Ok(created)
}

/// Every show with its venue and artist names, earliest first.
pub async fn list_shows<C: ConnectionTrait>(db: &C) -> Result<Vec<ShowListing>, StoreError> {
    let shows = show::Entity::find()
        .order_by_asc(show::Column::StartTime)
        .order_by_asc(show::Column::Id)
        .all(db)
        .await?;
    if shows.is_empty() {
        return Ok(vec![]);
    }

    let venue_ids: HashSet<Uuid> = shows.iter().map(|s| s.venue_id).collect();
    let artist_ids: HashSet<Uuid> = shows.iter().map(|s| s.artist_id).collect();

    let venues: HashMap<Uuid, String> = venue::Entity::find()
        .filter(venue::Column::Id.is_in(venue_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|v| (v.id, v.name))
        .collect();
    let artists: HashMap<Uuid, artist::Model> = artist::Entity::find()
        .filter(artist::Column::Id.is_in(artist_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|a| (a.id, a))
        .collect();

    Ok(shows
        .into_iter()
        .filter_map(|s| {
            let venue_name = venues.get(&s.venue_id)?.clone();
            let artist = artists.get(&s.artist_id)?;
            Some(ShowListing {
                id: s.id,
                venue_id: s.venue_id,
                venue_name,
                artist_id: s.artist_id,
                artist_name: artist.name.clone(),
                artist_image_link: artist.image_link.clone(),
                start_time: s.start_time,
            })
        })
        .collect())
}

/// Past and upcoming shows of a venue, each with its artist's name and
/// image.
pub async fn show_details_for_venue<C: ConnectionTrait>(
    db: &C,
    booked: &Booked<venue::Model>,
    now: DateTime<Utc>,
) -> Result<Partition<ShowDetail>, StoreError> {
    let artist_ids: HashSet<Uuid> = booked.shows().iter().map(|s| s.artist_id).collect();
    if artist_ids.is_empty() {
        return Ok(Partition::default());
    }
    let artists: HashMap<Uuid, (String, Option<String>)> = artist::Entity::find()
        .filter(artist::Column::Id.is_in(artist_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|a| (a.id, (a.name, a.image_link)))
        .collect();

    Ok(details(booked.partition_at(now), &artists, |s| s.artist_id))
}

/// Past and upcoming shows of an artist, each with its venue's name and
/// image.
pub async fn show_details_for_artist<C: ConnectionTrait>(
    db: &C,
    booked: &Booked<artist::Model>,
    now: DateTime<Utc>,
) -> Result<Partition<ShowDetail>, StoreError> {
    let venue_ids: HashSet<Uuid> = booked.shows().iter().map(|s| s.venue_id).collect();
    if venue_ids.is_empty() {
        return Ok(Partition::default());
    }
    let venues: HashMap<Uuid, (String, Option<String>)> = venue::Entity::find()
        .filter(venue::Column::Id.is_in(venue_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|v| (v.id, (v.name, v.image_link)))
        .collect();

    Ok(details(booked.partition_at(now), &venues, |s| s.venue_id))
}

fn details(
    partition: Partition<&show::Model>,
    counterparts: &HashMap<Uuid, (String, Option<String>)>,
    counterpart_of: fn(&show::Model) -> Uuid,
) -> Partition<ShowDetail> {
    let enrich = |shows: Vec<&show::Model>| -> Vec<ShowDetail> {
        shows
            .into_iter()
            .filter_map(|s| {
                let counterpart_id = counterpart_of(s);
                let Some((name, image_link)) = counterparts.get(&counterpart_id) else {
                    tracing::warn!(show_id = %s.id, %counterpart_id, "show references a missing row");
                    return None;
                };
                Some(ShowDetail {
                    show_id: s.id,
                    counterpart_id,
                    counterpart_name: name.clone(),
                    counterpart_image_link: image_link.clone(),
                    start_time: s.start_time,
                })
            })
            .collect()
    };

    Partition {
        past: enrich(partition.past),
        upcoming: enrich(partition.upcoming),
    }
}

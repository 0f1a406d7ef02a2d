use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

use super::{VenueInput, VENUE};
use crate::entities::{show, venue};
use crate::{Booked, StoreError};

/// Every venue with its shows, ordered by name.
pub async fn list_venues_with_shows<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<Booked<venue::Model>>, StoreError> {
    let venues = venue::Entity::find()
        .order_by_asc(venue::Column::Name)
        .order_by_asc(venue::Column::Id)
        .all(db)
        .await?;

    let mut shows_by_venue: HashMap<Uuid, Vec<show::Model>> = HashMap::new();
    for s in show::Entity::find().all(db).await? {
        shows_by_venue.entry(s.venue_id).or_default().push(s);
    }

    Ok(venues
        .into_iter()
        .map(|v| {
            let shows = shows_by_venue.remove(&v.id).unwrap_or_default();
            Booked::new(v, shows)
        })
        .collect())
}

pub async fn find_venue<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<venue::Model, StoreError> {
    venue::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(StoreError::NotFound { entity: VENUE, id })
}

pub async fn find_venue_with_shows<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Booked<venue::Model>, StoreError> {
    let venue_model = find_venue(db, id).await?;
    let shows = show::Entity::find()
        .filter(show::Column::VenueId.eq(id))
        .all(db)
        .await?;
    Ok(Booked::new(venue_model, shows))
}

pub async fn create_venue(
    db: &DatabaseConnection,
    input: VenueInput,
) -> Result<venue::Model, StoreError> {
    let valid = input.validate()?;

    let txn = db.begin().await?;
    let mut active = venue::ActiveModel {
        id: Set(Uuid::new_v4()),
        ..Default::default()
    };
    valid.apply(&mut active);
    let created = active.insert(&txn).await?;
    txn.commit().await?;

    tracing::info!(venue_id = %created.id, name = %created.name, "venue created");
    Ok(created)
}

/// Overwrite every mutable field of an existing venue.
pub async fn update_venue(
    db: &DatabaseConnection,
    id: Uuid,
    input: VenueInput,
) -> Result<venue::Model, StoreError> {
    let txn = db.begin().await?;
    let existing = find_venue(&txn, id).await?;
    let valid = input.validate()?;

    let mut active: venue::ActiveModel = existing.into();
    valid.apply(&mut active);
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(venue_id = %id, "venue updated");
    Ok(updated)
}

/// Delete a venue and all of its shows. Returns `false` when no venue has
/// this id.
pub async fn delete_venue(db: &DatabaseConnection, id: Uuid) -> Result<bool, StoreError> {
    let txn = db.begin().await?;
    let shows = show::Entity::delete_many()
        .filter(show::Column::VenueId.eq(id))
        .exec(&txn)
        .await?;
    let deleted = venue::Entity::delete_by_id(id).exec(&txn).await?;
    if deleted.rows_affected == 0 {
        txn.rollback().await?;
        return Ok(false);
    }
    txn.commit().await?;

    tracing::info!(venue_id = %id, shows_removed = shows.rows_affected, "venue deleted");
    Ok(true)
}

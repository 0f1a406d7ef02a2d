use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

use super::{ArtistInput, ARTIST};
use crate::entities::{artist, show};
use crate::{Booked, StoreError};

/// Every artist, ordered by name. Shows are not loaded.
pub async fn list_artists<C: ConnectionTrait>(db: &C) -> Result<Vec<artist::Model>, StoreError> {
    Ok(artist::Entity::find()
        .order_by_asc(artist::Column::Name)
        .order_by_asc(artist::Column::Id)
        .all(db)
        .await?)
}

/// Every artist with their shows, ordered by name.
pub async fn list_artists_with_shows<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<Booked<artist::Model>>, StoreError> {
    let artists = artist::Entity::find()
        .order_by_asc(artist::Column::Name)
        .order_by_asc(artist::Column::Id)
        .all(db)
        .await?;

    let mut shows_by_artist: HashMap<Uuid, Vec<show::Model>> = HashMap::new();
    for s in show::Entity::find().all(db).await? {
        shows_by_artist.entry(s.artist_id).or_default().push(s);
    }

    Ok(artists
        .into_iter()
        .map(|a| {
            let shows = shows_by_artist.remove(&a.id).unwrap_or_default();
            Booked::new(a, shows)
        })
        .collect())
}

pub async fn find_artist<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<artist::Model, StoreError> {
    artist::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(StoreError::NotFound { entity: ARTIST, id })
}

pub async fn find_artist_with_shows<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Booked<artist::Model>, StoreError> {
    let artist_model = find_artist(db, id).await?;
    let shows = show::Entity::find()
        .filter(show::Column::ArtistId.eq(id))
        .all(db)
        .await?;
    Ok(Booked::new(artist_model, shows))
}

pub async fn create_artist(
    db: &DatabaseConnection,
    input: ArtistInput,
) -> Result<artist::Model, StoreError> {
    let valid = input.validate()?;

    let txn = db.begin().await?;
    let mut active = artist::ActiveModel {
        id: Set(Uuid::new_v4()),
        created_on: Set(Utc::now().fixed_offset()),
        ..Default::default()
    };
    valid.apply(&mut active);
    let created = active.insert(&txn).await?;
    txn.commit().await?;

    tracing::info!(artist_id = %created.id, name = %created.name, "artist created");
    Ok(created)
}

/// Overwrite every mutable field of an existing artist. `created_on` is
/// left untouched.
pub async fn update_artist(
    db: &DatabaseConnection,
    id: Uuid,
    input: ArtistInput,
) -> Result<artist::Model, StoreError> {
    let txn = db.begin().await?;
    let existing = find_artist(&txn, id).await?;
    let valid = input.validate()?;

    let mut active: artist::ActiveModel = existing.into();
    valid.apply(&mut active);
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(artist_id = %id, "artist updated");
    Ok(updated)
}

/// Delete an artist and all of their shows. Returns `false` when no artist
/// has this id.
pub async fn delete_artist(db: &DatabaseConnection, id: Uuid) -> Result<bool, StoreError> {
    let txn = db.begin().await?;
    let shows = show::Entity::delete_many()
        .filter(show::Column::ArtistId.eq(id))
        .exec(&txn)
        .await?;
    let deleted = artist::Entity::delete_by_id(id).exec(&txn).await?;
    if deleted.rows_affected == 0 {
        txn.rollback().await?;
        return Ok(false);
    }
    txn.commit().await?;

    tracing::info!(artist_id = %id, shows_removed = shows.rows_affected, "artist deleted");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{create_show, create_venue, ShowInput, VenueInput};
    use crate::test_support::test_db;
    use chrono::Duration;
    use sea_orm::PaginatorTrait;

    fn artist_input(name: &str) -> ArtistInput {
        ArtistInput {
            name: name.into(),
            city: "San Francisco".into(),
            state: "CA".into(),
            phone: "326-123-5000".into(),
            genres: vec!["Rock n Roll".into()],
            seeking_venue: true,
            seeking_description: "Looking for shows to perform at in the San Francisco Bay Area!"
                .into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_list_artists_by_name() {
        let db = test_db().await;
        create_artist(&db, artist_input("The Wild Sax Band")).await.unwrap();
        create_artist(&db, artist_input("Guns N Petals")).await.unwrap();
        create_artist(&db, artist_input("Matt Quevedo")).await.unwrap();

        let names: Vec<String> = list_artists(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, ["Guns N Petals", "Matt Quevedo", "The Wild Sax Band"]);
    }

    #[tokio::test]
    async fn test_create_artist_sets_created_on() {
        let db = test_db().await;
        let before = Utc::now();
        let created = create_artist(&db, artist_input("Guns N Petals")).await.unwrap();
        assert!(created.created_on >= before - Duration::seconds(1));
        assert!(created.seeking_venue);
        assert_eq!(created.genres.as_slice(), ["Rock n Roll"]);

        let found = find_artist(&db, created.id).await.unwrap();
        assert_eq!(found.name, "Guns N Petals");
    }

    #[tokio::test]
    async fn test_update_artist_keeps_created_on() {
        let db = test_db().await;
        let created = create_artist(&db, artist_input("Matt Quevedo")).await.unwrap();

        let mut input = artist_input("Matt Quevedo Trio");
        input.seeking_venue = false;
        let updated = update_artist(&db, created.id, input).await.unwrap();

        assert_eq!(updated.name, "Matt Quevedo Trio");
        assert!(!updated.seeking_venue);
        assert_eq!(updated.created_on, created.created_on);
    }

    #[tokio::test]
    async fn test_update_missing_artist_leaves_store_unchanged() {
        let db = test_db().await;
        let existing = create_artist(&db, artist_input("The Wild Sax Band"))
            .await
            .unwrap();

        let err = update_artist(&db, Uuid::new_v4(), artist_input("Imposter"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "Artist", .. }));

        let all = artist::Entity::find().all(&db).await.unwrap();
        assert_eq!(all, vec![existing]);
    }

    #[tokio::test]
    async fn test_delete_artist_cascades_and_is_idempotent() {
        let db = test_db().await;
        let band = create_artist(&db, artist_input("Band")).await.unwrap();
        let venue = create_venue(
            &db,
            VenueInput {
                name: "Hop".into(),
                city: "SF".into(),
                state: "CA".into(),
                address: "1015 Folsom Street".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        for days in [-3, 3] {
            create_show(
                &db,
                ShowInput {
                    venue_id: venue.id,
                    artist_id: band.id,
                    start_time: (Utc::now() + Duration::days(days)).fixed_offset(),
                },
            )
            .await
            .unwrap();
        }

        assert!(delete_artist(&db, band.id).await.unwrap());
        assert_eq!(show::Entity::find().count(&db).await.unwrap(), 0);
        assert!(!delete_artist(&db, band.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_find_artist_with_shows_partitions() {
        let db = test_db().await;
        let band = create_artist(&db, artist_input("Band")).await.unwrap();
        let venue = create_venue(
            &db,
            VenueInput {
                name: "Hop".into(),
                city: "SF".into(),
                state: "CA".into(),
                address: "1015 Folsom Street".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        for days in [-10, -2, 5] {
            create_show(
                &db,
                ShowInput {
                    venue_id: venue.id,
                    artist_id: band.id,
                    start_time: (Utc::now() + Duration::days(days)).fixed_offset(),
                },
            )
            .await
            .unwrap();
        }

        let booked = find_artist_with_shows(&db, band.id).await.unwrap();
        assert_eq!(booked.num_past_shows(), 2);
        assert_eq!(booked.num_upcoming_shows(), 1);
    }
}

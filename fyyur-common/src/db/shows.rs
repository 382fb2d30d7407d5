//! Show database operations
//!
//! Start times are stored as `YYYY-MM-DD HH:MM:SS` text; see [`crate::time`].

use sqlx::{Row, SqlitePool};

use super::models::{ArtistShow, ShowData, ShowListing, VenueShow};
use crate::time;
use crate::Result;

/// Insert a show, returning its id
///
/// Fails with a database error when the artist or venue does not exist.
pub async fn insert_show(pool: &SqlitePool, data: &ShowData) -> Result<i64> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query("INSERT INTO shows (artist_id, venue_id, start_time) VALUES (?, ?, ?)")
        .bind(data.artist_id)
        .bind(data.venue_id)
        .bind(time::to_db(data.start_time))
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(result.last_insert_rowid())
}

/// Every show with its artist and venue, earliest first
pub async fn list_shows(pool: &SqlitePool) -> Result<Vec<ShowListing>> {
    let rows = sqlx::query(
        r#"
        SELECT s.id, s.start_time,
               v.id AS venue_id, v.name AS venue_name,
               a.id AS artist_id, a.name AS artist_name, a.image_link AS artist_image_link
        FROM shows s
        JOIN artists a ON a.id = s.artist_id
        JOIN venues v ON v.id = s.venue_id
        ORDER BY s.start_time, s.id
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            Ok(ShowListing {
                id: row.try_get("id")?,
                venue_id: row.try_get("venue_id")?,
                venue_name: row.try_get("venue_name")?,
                artist_id: row.try_get("artist_id")?,
                artist_name: row.try_get("artist_name")?,
                artist_image_link: row.try_get("artist_image_link")?,
                start_time: row.try_get("start_time")?,
            })
        })
        .collect()
}

/// Shows at one venue, earliest first
pub async fn shows_for_venue(pool: &SqlitePool, venue_id: i64) -> Result<Vec<VenueShow>> {
    let rows = sqlx::query(
        r#"
        SELECT a.id AS artist_id, a.name AS artist_name,
               a.image_link AS artist_image_link, s.start_time
        FROM shows s
        JOIN artists a ON a.id = s.artist_id
        WHERE s.venue_id = ?
        ORDER BY s.start_time, s.id
        "#,
    )
    .bind(venue_id)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            Ok(VenueShow {
                artist_id: row.try_get("artist_id")?,
                artist_name: row.try_get("artist_name")?,
                artist_image_link: row.try_get("artist_image_link")?,
                start_time: row.try_get("start_time")?,
            })
        })
        .collect()
}

/// Shows by one artist, earliest first
pub async fn shows_for_artist(pool: &SqlitePool, artist_id: i64) -> Result<Vec<ArtistShow>> {
    let rows = sqlx::query(
        r#"
        SELECT v.id AS venue_id, v.name AS venue_name,
               v.image_link AS venue_image_link, s.start_time
        FROM shows s
        JOIN venues v ON v.id = s.venue_id
        WHERE s.artist_id = ?
        ORDER BY s.start_time, s.id
        "#,
    )
    .bind(artist_id)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            Ok(ArtistShow {
                venue_id: row.try_get("venue_id")?,
                venue_name: row.try_get("venue_name")?,
                venue_image_link: row.try_get("venue_image_link")?,
                start_time: row.try_get("start_time")?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init::init_memory_database;
    use crate::db::models::{ArtistData, VenueData};
    use crate::db::{artists, venues};
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    async fn seed(pool: &SqlitePool) -> (i64, i64) {
        let venue_id = venues::insert_venue(
            pool,
            &VenueData {
                name: "The Musical Hop".to_string(),
                city: "San Francisco".to_string(),
                state: "CA".to_string(),
                address: "1015 Folsom Street".to_string(),
                genres: vec!["Jazz".to_string()],
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let artist_id = artists::insert_artist(
            pool,
            &ArtistData {
                name: "Guns N Petals".to_string(),
                city: "San Francisco".to_string(),
                state: "CA".to_string(),
                image_link: Some("https://example.com/petals.jpg".to_string()),
                genres: vec!["Rock n Roll".to_string()],
                ..Default::default()
            },
        )
        .await
        .unwrap();
        (venue_id, artist_id)
    }

    #[tokio::test]
    async fn test_insert_and_list_shows() {
        let pool = init_memory_database().await.unwrap();
        let (venue_id, artist_id) = seed(&pool).await;

        for start_time in [at(2035, 4, 1, 20), at(2019, 5, 21, 21)] {
            insert_show(
                &pool,
                &ShowData {
                    artist_id,
                    venue_id,
                    start_time,
                },
            )
            .await
            .unwrap();
        }

        let listed = list_shows(&pool).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].start_time, at(2019, 5, 21, 21));
        assert_eq!(listed[0].venue_name, "The Musical Hop");
        assert_eq!(listed[0].artist_name, "Guns N Petals");
        assert_eq!(
            listed[0].artist_image_link.as_deref(),
            Some("https://example.com/petals.jpg")
        );
        assert_eq!(listed[1].start_time, at(2035, 4, 1, 20));
    }

    #[tokio::test]
    async fn test_start_time_stored_as_sortable_text() {
        let pool = init_memory_database().await.unwrap();
        let (venue_id, artist_id) = seed(&pool).await;
        insert_show(
            &pool,
            &ShowData {
                artist_id,
                venue_id,
                start_time: at(2035, 4, 1, 20),
            },
        )
        .await
        .unwrap();

        let raw: String = sqlx::query_scalar("SELECT start_time FROM shows")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(raw, "2035-04-01 20:00:00");
    }

    #[tokio::test]
    async fn test_show_requires_existing_artist_and_venue() {
        let pool = init_memory_database().await.unwrap();
        let (venue_id, artist_id) = seed(&pool).await;

        let missing_artist = ShowData {
            artist_id: artist_id + 100,
            venue_id,
            start_time: at(2035, 4, 1, 20),
        };
        assert!(insert_show(&pool, &missing_artist).await.is_err());

        let missing_venue = ShowData {
            artist_id,
            venue_id: venue_id + 100,
            start_time: at(2035, 4, 1, 20),
        };
        assert!(insert_show(&pool, &missing_venue).await.is_err());

        assert!(list_shows(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_shows_for_venue_and_artist() {
        let pool = init_memory_database().await.unwrap();
        let (venue_id, artist_id) = seed(&pool).await;
        insert_show(
            &pool,
            &ShowData {
                artist_id,
                venue_id,
                start_time: at(2035, 4, 1, 20),
            },
        )
        .await
        .unwrap();

        let at_venue = shows_for_venue(&pool, venue_id).await.unwrap();
        assert_eq!(at_venue.len(), 1);
        assert_eq!(at_venue[0].artist_id, artist_id);

        let by_artist = shows_for_artist(&pool, artist_id).await.unwrap();
        assert_eq!(by_artist.len(), 1);
        assert_eq!(by_artist[0].venue_id, venue_id);
        assert_eq!(by_artist[0].venue_name, "The Musical Hop");

        assert!(shows_for_venue(&pool, venue_id + 1).await.unwrap().is_empty());
    }
}

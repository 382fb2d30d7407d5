//! Artist database operations
//!
//! Artists can be created and edited but never deleted.

use chrono::NaiveDateTime;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::models::{
    decode_genres, encode_genres, fold_case, Artist, ArtistData, ArtistDetail, SearchTerm,
    Summary,
};
use super::shows;
use crate::time;
use crate::Result;

fn artist_from_row(row: &SqliteRow) -> Result<Artist> {
    let genres: Option<String> = row.try_get("genres")?;
    Ok(Artist {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        city: row.try_get("city")?,
        state: row.try_get("state")?,
        phone: row.try_get("phone")?,
        genres: decode_genres(genres.as_deref())?,
        image_link: row.try_get("image_link")?,
        facebook_link: row.try_get("facebook_link")?,
        website_link: row.try_get("website_link")?,
        seeking_venue: row.try_get("seeking_venue")?,
        seeking_description: row.try_get("seeking_description")?,
    })
}

/// Insert an artist, returning its id
pub async fn insert_artist(pool: &SqlitePool, data: &ArtistData) -> Result<i64> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        INSERT INTO artists (
            name, name_folded, city, city_folded, state, phone, genres, image_link,
            facebook_link, website_link, seeking_venue, seeking_description
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&data.name)
    .bind(fold_case(&data.name))
    .bind(&data.city)
    .bind(fold_case(&data.city))
    .bind(&data.state)
    .bind(&data.phone)
    .bind(encode_genres(&data.genres)?)
    .bind(&data.image_link)
    .bind(&data.facebook_link)
    .bind(&data.website_link)
    .bind(data.seeking_venue)
    .bind(&data.seeking_description)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(result.last_insert_rowid())
}

/// Overwrite every editable field of an artist
///
/// Returns false when no artist has this id.
pub async fn update_artist(pool: &SqlitePool, id: i64, data: &ArtistData) -> Result<bool> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE artists SET
            name = ?, name_folded = ?, city = ?, city_folded = ?, state = ?,
            phone = ?, genres = ?,
            image_link = ?, facebook_link = ?, website_link = ?,
            seeking_venue = ?, seeking_description = ?
        WHERE id = ?
        "#,
    )
    .bind(&data.name)
    .bind(fold_case(&data.name))
    .bind(&data.city)
    .bind(fold_case(&data.city))
    .bind(&data.state)
    .bind(&data.phone)
    .bind(encode_genres(&data.genres)?)
    .bind(&data.image_link)
    .bind(&data.facebook_link)
    .bind(&data.website_link)
    .bind(data.seeking_venue)
    .bind(&data.seeking_description)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(result.rows_affected() > 0)
}

pub async fn load_artist(pool: &SqlitePool, id: i64) -> Result<Option<Artist>> {
    let row = sqlx::query(
        r#"
        SELECT id, name, city, state, phone, genres, image_link,
               facebook_link, website_link, seeking_venue, seeking_description
        FROM artists
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(artist_from_row).transpose()
}

/// Artist with its past and upcoming shows relative to `now`
pub async fn load_artist_detail(
    pool: &SqlitePool,
    id: i64,
    now: NaiveDateTime,
) -> Result<Option<ArtistDetail>> {
    let Some(artist) = load_artist(pool, id).await? else {
        return Ok(None);
    };

    let shows = shows::shows_for_artist(pool, id).await?;
    let (past_shows, upcoming_shows) = time::partition_by_time(shows, now, |s| s.start_time);

    Ok(Some(ArtistDetail {
        artist,
        past_shows,
        upcoming_shows,
    }))
}

/// Every artist as (id, name), ordered by name
pub async fn list_artists(pool: &SqlitePool) -> Result<Vec<(i64, String)>> {
    let rows = sqlx::query_as::<_, (i64, String)>("SELECT id, name FROM artists ORDER BY name, id")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Case-insensitive substring search on name, or `City, ST` location search
pub async fn search_artists(
    pool: &SqlitePool,
    term: &str,
    now: NaiveDateTime,
) -> Result<Vec<Summary>> {
    let term = SearchTerm::parse(term);
    let (city, state) = term.location.unzip();

    let rows = sqlx::query(
        r#"
        SELECT a.id, a.name,
               (SELECT COUNT(*) FROM shows s
                WHERE s.artist_id = a.id AND s.start_time > ?) AS num_upcoming_shows
        FROM artists a
        WHERE a.name_folded LIKE ? ESCAPE '\'
           OR (? IS NOT NULL AND a.city_folded = ? AND a.state = ?)
        ORDER BY a.name, a.id
        "#,
    )
    .bind(time::to_db(now))
    .bind(&term.name_pattern)
    .bind(&city)
    .bind(&city)
    .bind(&state)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            Ok(Summary {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                num_upcoming_shows: row.try_get("num_upcoming_shows")?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init::init_memory_database;
    use crate::db::models::{ShowData, VenueData};
    use crate::db::venues;
    use chrono::Duration;

    fn artist(name: &str, city: &str, state: &str) -> ArtistData {
        ArtistData {
            name: name.to_string(),
            city: city.to_string(),
            state: state.to_string(),
            phone: Some("326-123-5000".to_string()),
            genres: vec!["Rock n Roll".to_string()],
            image_link: Some("https://example.com/a.jpg".to_string()),
            facebook_link: None,
            website_link: Some("https://gunsnpetalsband.com".to_string()),
            seeking_venue: true,
            seeking_description: Some("Looking for shows in the Bay Area".to_string()),
        }
    }

    #[tokio::test]
    async fn test_insert_update_load_artist() {
        let pool = init_memory_database().await.unwrap();
        let data = artist("Guns N Petals", "San Francisco", "CA");
        let id = insert_artist(&pool, &data).await.unwrap();

        let loaded = load_artist(&pool, id).await.unwrap().expect("artist not found");
        assert_eq!(ArtistData::from(loaded), data);

        let mut changed = artist("Matt Quevedo", "New York", "NY");
        changed.genres = vec!["Jazz".to_string()];
        changed.seeking_venue = false;
        assert!(update_artist(&pool, id, &changed).await.unwrap());

        let loaded = load_artist(&pool, id).await.unwrap().unwrap();
        assert_eq!(ArtistData::from(loaded), changed);

        assert!(!update_artist(&pool, id + 1, &changed).await.unwrap());
        assert!(load_artist(&pool, id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_artists_sorted_by_name() {
        let pool = init_memory_database().await.unwrap();
        insert_artist(&pool, &artist("The Wild Sax Band", "San Francisco", "CA"))
            .await
            .unwrap();
        insert_artist(&pool, &artist("Guns N Petals", "San Francisco", "CA"))
            .await
            .unwrap();

        let names: Vec<String> = list_artists(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|(_, name)| name)
            .collect();
        assert_eq!(names, vec!["Guns N Petals", "The Wild Sax Band"]);
    }

    #[tokio::test]
    async fn test_artist_detail_splits_shows() {
        let pool = init_memory_database().await.unwrap();
        let artist_id = insert_artist(&pool, &artist("Guns N Petals", "San Francisco", "CA"))
            .await
            .unwrap();
        let venue_id = venues::insert_venue(
            &pool,
            &VenueData {
                name: "The Musical Hop".to_string(),
                city: "San Francisco".to_string(),
                state: "CA".to_string(),
                address: "1015 Folsom Street".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let now = time::now();
        for offset in [-10, -1, 4] {
            shows::insert_show(
                &pool,
                &ShowData {
                    artist_id,
                    venue_id,
                    start_time: now + Duration::days(offset),
                },
            )
            .await
            .unwrap();
        }

        let detail = load_artist_detail(&pool, artist_id, now).await.unwrap().unwrap();
        assert_eq!(detail.past_shows_count(), 2);
        assert_eq!(detail.upcoming_shows_count(), 1);
        assert_eq!(detail.upcoming_shows[0].venue_name, "The Musical Hop");
        assert!(detail.past_shows[0].start_time < detail.past_shows[1].start_time);

        // Same rows, later "now": everything is past
        let later = now + Duration::days(30);
        let detail = load_artist_detail(&pool, artist_id, later).await.unwrap().unwrap();
        assert_eq!(detail.past_shows_count(), 3);
        assert_eq!(detail.upcoming_shows_count(), 0);

        let found = search_artists(&pool, "petals", now).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].num_upcoming_shows, 1);
    }

    #[tokio::test]
    async fn test_search_artists_by_location() {
        let pool = init_memory_database().await.unwrap();
        insert_artist(&pool, &artist("Guns N Petals", "San Francisco", "CA"))
            .await
            .unwrap();
        insert_artist(&pool, &artist("Matt Quevedo", "New York", "NY"))
            .await
            .unwrap();

        let now = time::now();
        let found = search_artists(&pool, "San Francisco, CA", now).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Guns N Petals");

        assert!(search_artists(&pool, "Boston, MA", now).await.unwrap().is_empty());
        assert_eq!(search_artists(&pool, "a", now).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_search_artists_folds_non_ascii_case() {
        let pool = init_memory_database().await.unwrap();
        insert_artist(&pool, &artist("Ólafur Arnalds", "Zürich", "NY"))
            .await
            .unwrap();

        let now = time::now();
        assert_eq!(search_artists(&pool, "ólafur", now).await.unwrap().len(), 1);
        assert_eq!(search_artists(&pool, "ÓLAFUR", now).await.unwrap().len(), 1);
        assert_eq!(search_artists(&pool, "ZÜRICH, NY", now).await.unwrap().len(), 1);
    }
}

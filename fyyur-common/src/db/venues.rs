//! Venue database operations

use chrono::NaiveDateTime;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::models::{
    decode_genres, encode_genres, fold_case, SearchTerm, Summary, Venue, VenueArea, VenueData,
    VenueDetail,
};
use super::shows;
use crate::time;
use crate::Result;

const VENUE_COLUMNS: &str = "id, name, city, state, address, phone, genres, image_link, \
     facebook_link, website_link, seeking_talent, seeking_description";

fn venue_from_row(row: &SqliteRow) -> Result<Venue> {
    let genres: Option<String> = row.try_get("genres")?;
    Ok(Venue {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        city: row.try_get("city")?,
        state: row.try_get("state")?,
        address: row.try_get("address")?,
        phone: row.try_get("phone")?,
        genres: decode_genres(genres.as_deref())?,
        image_link: row.try_get("image_link")?,
        facebook_link: row.try_get("facebook_link")?,
        website_link: row.try_get("website_link")?,
        seeking_talent: row.try_get("seeking_talent")?,
        seeking_description: row.try_get("seeking_description")?,
    })
}

fn summary_from_row(row: &SqliteRow) -> Result<Summary> {
    Ok(Summary {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        num_upcoming_shows: row.try_get("num_upcoming_shows")?,
    })
}

/// Insert a venue, returning its id
pub async fn insert_venue(pool: &SqlitePool, data: &VenueData) -> Result<i64> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        INSERT INTO venues (
            name, name_folded, city, city_folded, state, address, phone, genres,
            image_link, facebook_link, website_link, seeking_talent, seeking_description
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&data.name)
    .bind(fold_case(&data.name))
    .bind(&data.city)
    .bind(fold_case(&data.city))
    .bind(&data.state)
    .bind(&data.address)
    .bind(&data.phone)
    .bind(encode_genres(&data.genres)?)
    .bind(&data.image_link)
    .bind(&data.facebook_link)
    .bind(&data.website_link)
    .bind(data.seeking_talent)
    .bind(&data.seeking_description)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(result.last_insert_rowid())
}

/// Overwrite every editable field of a venue
///
/// Returns false when no venue has this id.
pub async fn update_venue(pool: &SqlitePool, id: i64, data: &VenueData) -> Result<bool> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE venues SET
            name = ?, name_folded = ?, city = ?, city_folded = ?, state = ?,
            address = ?, phone = ?, genres = ?,
            image_link = ?, facebook_link = ?, website_link = ?,
            seeking_talent = ?, seeking_description = ?
        WHERE id = ?
        "#,
    )
    .bind(&data.name)
    .bind(fold_case(&data.name))
    .bind(&data.city)
    .bind(fold_case(&data.city))
    .bind(&data.state)
    .bind(&data.address)
    .bind(&data.phone)
    .bind(encode_genres(&data.genres)?)
    .bind(&data.image_link)
    .bind(&data.facebook_link)
    .bind(&data.website_link)
    .bind(data.seeking_talent)
    .bind(&data.seeking_description)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a venue and (by cascade) its shows
///
/// Returns false when no venue has this id.
pub async fn delete_venue(pool: &SqlitePool, id: i64) -> Result<bool> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query("DELETE FROM venues WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(result.rows_affected() > 0)
}

pub async fn load_venue(pool: &SqlitePool, id: i64) -> Result<Option<Venue>> {
    let row = sqlx::query(&format!("SELECT {VENUE_COLUMNS} FROM venues WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(venue_from_row).transpose()
}

/// Venue with its past and upcoming shows relative to `now`
pub async fn load_venue_detail(
    pool: &SqlitePool,
    id: i64,
    now: NaiveDateTime,
) -> Result<Option<VenueDetail>> {
    let Some(venue) = load_venue(pool, id).await? else {
        return Ok(None);
    };

    let shows = shows::shows_for_venue(pool, id).await?;
    let (past_shows, upcoming_shows) = time::partition_by_time(shows, now, |s| s.start_time);

    Ok(Some(VenueDetail {
        venue,
        past_shows,
        upcoming_shows,
    }))
}

/// All venues grouped by (city, state), each with its own upcoming-show count
pub async fn list_venue_areas(pool: &SqlitePool, now: NaiveDateTime) -> Result<Vec<VenueArea>> {
    let rows = sqlx::query(
        r#"
        SELECT v.id, v.name, v.city, v.state,
               (SELECT COUNT(*) FROM shows s
                WHERE s.venue_id = v.id AND s.start_time > ?) AS num_upcoming_shows
        FROM venues v
        ORDER BY v.state, v.city, v.name, v.id
        "#,
    )
    .bind(time::to_db(now))
    .fetch_all(pool)
    .await?;

    let mut areas: Vec<VenueArea> = Vec::new();
    for row in &rows {
        let city: String = row.try_get("city")?;
        let state: String = row.try_get("state")?;
        let summary = summary_from_row(row)?;

        match areas.last_mut() {
            Some(area) if area.city == city && area.state == state => area.venues.push(summary),
            _ => areas.push(VenueArea {
                city,
                state,
                venues: vec![summary],
            }),
        }
    }

    Ok(areas)
}

/// Case-insensitive substring search on name, or `City, ST` location search
pub async fn search_venues(
    pool: &SqlitePool,
    term: &str,
    now: NaiveDateTime,
) -> Result<Vec<Summary>> {
    let term = SearchTerm::parse(term);
    let (city, state) = term.location.unzip();

    let rows = sqlx::query(
        r#"
        SELECT v.id, v.name,
               (SELECT COUNT(*) FROM shows s
                WHERE s.venue_id = v.id AND s.start_time > ?) AS num_upcoming_shows
        FROM venues v
        WHERE v.name_folded LIKE ? ESCAPE '\'
           OR (? IS NOT NULL AND v.city_folded = ? AND v.state = ?)
        ORDER BY v.name, v.id
        "#,
    )
    .bind(time::to_db(now))
    .bind(&term.name_pattern)
    .bind(&city)
    .bind(&city)
    .bind(&state)
    .fetch_all(pool)
    .await?;

    rows.iter().map(summary_from_row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init::init_memory_database;
    use crate::db::models::{ArtistData, ShowData};
    use crate::db::{artists, shows};
    use chrono::Duration;

    fn venue(name: &str, city: &str, state: &str) -> VenueData {
        VenueData {
            name: name.to_string(),
            city: city.to_string(),
            state: state.to_string(),
            address: "1015 Folsom Street".to_string(),
            phone: Some("123-123-1234".to_string()),
            genres: vec!["Jazz".to_string(), "Folk".to_string()],
            image_link: None,
            facebook_link: Some("https://www.facebook.com/TheMusicalHop".to_string()),
            website_link: None,
            seeking_talent: true,
            seeking_description: Some("Looking for local artists".to_string()),
        }
    }

    async fn add_artist(pool: &SqlitePool) -> i64 {
        let data = ArtistData {
            name: "Guns N Petals".to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            genres: vec!["Rock n Roll".to_string()],
            ..Default::default()
        };
        artists::insert_artist(pool, &data).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_load_venue() {
        let pool = init_memory_database().await.unwrap();

        let data = venue("The Musical Hop", "San Francisco", "CA");
        let id = insert_venue(&pool, &data).await.unwrap();

        let loaded = load_venue(&pool, id).await.unwrap().expect("venue not found");
        assert_eq!(loaded.id, id);
        assert_eq!(VenueData::from(loaded), data);
    }

    #[tokio::test]
    async fn test_load_missing_venue() {
        let pool = init_memory_database().await.unwrap();
        assert!(load_venue(&pool, 42).await.unwrap().is_none());
        assert!(load_venue_detail(&pool, 42, time::now()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_venue() {
        let pool = init_memory_database().await.unwrap();
        let id = insert_venue(&pool, &venue("Old Name", "Austin", "TX")).await.unwrap();

        let mut changed = venue("New Name", "Dallas", "TX");
        changed.genres = vec!["Blues".to_string()];
        changed.seeking_talent = false;
        changed.seeking_description = None;

        assert!(update_venue(&pool, id, &changed).await.unwrap());
        let loaded = load_venue(&pool, id).await.unwrap().unwrap();
        assert_eq!(VenueData::from(loaded), changed);

        assert!(!update_venue(&pool, id + 100, &changed).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_venue_cascades_to_shows() {
        let pool = init_memory_database().await.unwrap();
        let venue_id = insert_venue(&pool, &venue("Park Square", "San Francisco", "CA"))
            .await
            .unwrap();
        let artist_id = add_artist(&pool).await;
        shows::insert_show(
            &pool,
            &ShowData {
                artist_id,
                venue_id,
                start_time: time::now() + Duration::days(3),
            },
        )
        .await
        .unwrap();

        assert!(delete_venue(&pool, venue_id).await.unwrap());
        assert!(load_venue(&pool, venue_id).await.unwrap().is_none());
        assert!(shows::list_shows(&pool).await.unwrap().is_empty());

        // Second delete finds nothing
        assert!(!delete_venue(&pool, venue_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_venue_areas_groups_and_counts_per_venue() {
        let pool = init_memory_database().await.unwrap();
        let hop = insert_venue(&pool, &venue("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();
        let park = insert_venue(&pool, &venue("Park Square Live", "San Francisco", "CA"))
            .await
            .unwrap();
        insert_venue(&pool, &venue("The Dueling Pianos Bar", "New York", "NY"))
            .await
            .unwrap();
        let artist_id = add_artist(&pool).await;

        let now = time::now();
        for (venue_id, offset) in [(park, 1), (park, 2), (park, -2), (hop, -5)] {
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

        let areas = list_venue_areas(&pool, now).await.unwrap();
        assert_eq!(areas.len(), 2);

        assert_eq!(areas[0].state, "CA");
        assert_eq!(areas[0].city, "San Francisco");
        let names: Vec<_> = areas[0].venues.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Park Square Live", "The Musical Hop"]);
        assert_eq!(areas[0].venues[0].num_upcoming_shows, 2);
        assert_eq!(areas[0].venues[1].num_upcoming_shows, 0);

        assert_eq!(areas[1].state, "NY");
        assert_eq!(areas[1].venues.len(), 1);
    }

    #[tokio::test]
    async fn test_search_venues() {
        let pool = init_memory_database().await.unwrap();
        insert_venue(&pool, &venue("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();
        insert_venue(&pool, &venue("Park Square Live Music & Coffee", "San Francisco", "CA"))
            .await
            .unwrap();
        insert_venue(&pool, &venue("The Dueling Pianos Bar", "New York", "NY"))
            .await
            .unwrap();

        let now = time::now();

        let hop = search_venues(&pool, "Hop", now).await.unwrap();
        assert_eq!(hop.len(), 1);
        assert_eq!(hop[0].name, "The Musical Hop");

        let music = search_venues(&pool, "MUSIC", now).await.unwrap();
        assert_eq!(music.len(), 2);

        let all = search_venues(&pool, "", now).await.unwrap();
        assert_eq!(all.len(), 3);

        // Wildcards match literally
        assert!(search_venues(&pool, "%", now).await.unwrap().is_empty());

        let located = search_venues(&pool, "new york, ny", now).await.unwrap();
        assert_eq!(located.len(), 1);
        assert_eq!(located[0].name, "The Dueling Pianos Bar");
    }

    #[tokio::test]
    async fn test_search_venues_folds_non_ascii_case() {
        let pool = init_memory_database().await.unwrap();
        let id = insert_venue(&pool, &venue("Café Élan", "Montréal", "NY"))
            .await
            .unwrap();

        let now = time::now();
        assert_eq!(search_venues(&pool, "Élan", now).await.unwrap().len(), 1);
        assert_eq!(search_venues(&pool, "élan", now).await.unwrap().len(), 1);
        assert_eq!(search_venues(&pool, "CAFÉ", now).await.unwrap().len(), 1);
        assert_eq!(search_venues(&pool, "MONTRÉAL, ny", now).await.unwrap().len(), 1);

        // Renaming keeps the folded copy in step
        update_venue(&pool, id, &venue("Öl Haus", "Montréal", "NY"))
            .await
            .unwrap();
        assert!(search_venues(&pool, "élan", now).await.unwrap().is_empty());
        let found = search_venues(&pool, "öl", now).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Öl Haus");
    }
}

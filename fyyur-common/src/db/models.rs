//! Database models

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::time::{self, DisplayFormat};

/// Venue row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

/// Venue fields written by the create and edit forms
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VenueData {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

impl From<Venue> for VenueData {
    fn from(venue: Venue) -> Self {
        Self {
            name: venue.name,
            city: venue.city,
            state: venue.state,
            address: venue.address,
            phone: venue.phone,
            genres: venue.genres,
            image_link: venue.image_link,
            facebook_link: venue.facebook_link,
            website_link: venue.website_link,
            seeking_talent: venue.seeking_talent,
            seeking_description: venue.seeking_description,
        }
    }
}

/// Artist row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

/// Artist fields written by the create and edit forms
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtistData {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

impl From<Artist> for ArtistData {
    fn from(artist: Artist) -> Self {
        Self {
            name: artist.name,
            city: artist.city,
            state: artist.state,
            phone: artist.phone,
            genres: artist.genres,
            image_link: artist.image_link,
            facebook_link: artist.facebook_link,
            website_link: artist.website_link,
            seeking_venue: artist.seeking_venue,
            seeking_description: artist.seeking_description,
        }
    }
}

/// New show linking an artist to a venue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowData {
    pub artist_id: i64,
    pub venue_id: i64,
    pub start_time: NaiveDateTime,
}

/// Name plus upcoming-show count, used by listings and search results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: i64,
}

/// Venues sharing one city/state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueArea {
    pub city: String,
    pub state: String,
    pub venues: Vec<Summary>,
}

/// A show as seen from its venue's page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueShow {
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: NaiveDateTime,
}

/// A show as seen from its artist's page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistShow {
    pub venue_id: i64,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: NaiveDateTime,
}

/// A show in the global listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShowListing {
    pub id: i64,
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: NaiveDateTime,
}

impl VenueShow {
    pub fn start_time_display(&self) -> String {
        time::format_datetime(self.start_time, DisplayFormat::Full)
    }

    /// Compact form used for past shows
    pub fn start_time_short(&self) -> String {
        time::format_datetime(self.start_time, DisplayFormat::Medium)
    }
}

impl ArtistShow {
    pub fn start_time_display(&self) -> String {
        time::format_datetime(self.start_time, DisplayFormat::Full)
    }

    /// Compact form used for past shows
    pub fn start_time_short(&self) -> String {
        time::format_datetime(self.start_time, DisplayFormat::Medium)
    }
}

impl ShowListing {
    pub fn start_time_display(&self) -> String {
        time::format_datetime(self.start_time, DisplayFormat::Full)
    }
}

/// Venue with its shows split around "now"
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueDetail {
    pub venue: Venue,
    pub past_shows: Vec<VenueShow>,
    pub upcoming_shows: Vec<VenueShow>,
}

impl VenueDetail {
    pub fn past_shows_count(&self) -> usize {
        self.past_shows.len()
    }

    pub fn upcoming_shows_count(&self) -> usize {
        self.upcoming_shows.len()
    }
}

/// Artist with its shows split around "now"
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistDetail {
    pub artist: Artist,
    pub past_shows: Vec<ArtistShow>,
    pub upcoming_shows: Vec<ArtistShow>,
}

impl ArtistDetail {
    pub fn past_shows_count(&self) -> usize {
        self.past_shows.len()
    }

    pub fn upcoming_shows_count(&self) -> usize {
        self.upcoming_shows.len()
    }
}

/// Lowercased copy stored beside `name` and `city` for searching
///
/// SQLite's `LIKE` and `lower()` only fold ASCII, so search compares text
/// folded here instead.
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Search term split into its name pattern and optional `City, ST` location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    /// LIKE pattern over `name_folded`
    pub name_pattern: String,
    /// `(folded city, state)` when the term reads like `Seattle, WA`
    pub location: Option<(String, String)>,
}

impl SearchTerm {
    pub fn parse(term: &str) -> Self {
        let term = term.trim();
        let location = term.rsplit_once(',').and_then(|(city, state)| {
            let city = city.trim();
            let state = state.trim().to_ascii_uppercase();
            (!city.is_empty() && crate::choices::is_state(&state))
                .then(|| (fold_case(city), state))
        });

        Self {
            name_pattern: format!("%{}%", escape_like(&fold_case(term))),
            location,
        }
    }
}

/// Escape LIKE wildcards so they match literally (ESCAPE '\')
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Encode a genre list for its TEXT column
pub fn encode_genres(genres: &[String]) -> crate::Result<String> {
    Ok(serde_json::to_string(genres)?)
}

/// Decode a stored genre list; NULL or empty text is an empty list
pub fn decode_genres(raw: Option<&str>) -> crate::Result<Vec<String>> {
    match raw {
        None => Ok(Vec::new()),
        Some(text) if text.trim().is_empty() => Ok(Vec::new()),
        Some(text) => Ok(serde_json::from_str(text)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_term_plain() {
        let term = SearchTerm::parse("  Hop ");
        assert_eq!(term.name_pattern, "%hop%");
        assert!(term.location.is_none());
    }

    #[test]
    fn test_search_term_escapes_wildcards() {
        let term = SearchTerm::parse("100%_off\\");
        assert_eq!(term.name_pattern, "%100\\%\\_off\\\\%");
    }

    #[test]
    fn test_search_term_folds_non_ascii() {
        let term = SearchTerm::parse("ÉLAN");
        assert_eq!(term.name_pattern, "%élan%");

        let term = SearchTerm::parse("MÜNCHEN, NY");
        assert_eq!(
            term.location,
            Some(("münchen".to_string(), "NY".to_string()))
        );
    }

    #[test]
    fn test_search_term_location() {
        let term = SearchTerm::parse("San Francisco, ca");
        assert_eq!(
            term.location,
            Some(("san francisco".to_string(), "CA".to_string()))
        );

        // Not a state code: plain name search only
        assert!(SearchTerm::parse("Rock, Paper").location.is_none());
        assert!(SearchTerm::parse(", WA").location.is_none());
    }

    #[test]
    fn test_show_time_formats() {
        let show = VenueShow {
            artist_id: 1,
            artist_name: "Guns N Petals".to_string(),
            artist_image_link: None,
            start_time: chrono::NaiveDate::from_ymd_opt(2019, 5, 21)
                .unwrap()
                .and_hms_opt(21, 30, 0)
                .unwrap(),
        };
        assert_eq!(show.start_time_display(), "Tuesday May, 21, 2019 at 9:30PM");
        assert_eq!(show.start_time_short(), "Tue 05, 21, 2019 9:30PM");
    }

    #[test]
    fn test_genres_codec() {
        let genres = vec!["Jazz".to_string(), "R&B".to_string()];
        let encoded = encode_genres(&genres).unwrap();
        assert_eq!(encoded, r#"["Jazz","R&B"]"#);
        assert_eq!(decode_genres(Some(&encoded)).unwrap(), genres);
        assert!(decode_genres(None).unwrap().is_empty());
        assert!(decode_genres(Some("")).unwrap().is_empty());
        assert!(decode_genres(Some("not json")).is_err());
    }
}

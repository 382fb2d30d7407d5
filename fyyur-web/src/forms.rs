//! Venue, artist and show forms
//!
//! Forms keep the raw submitted text so a rejected submission can be shown
//! again unchanged. `validate` turns a form into the row data to write, or
//! into the list of problems to display.

use chrono::NaiveDateTime;
use fyyur_common::choices::{is_genre, is_state};
use fyyur_common::db::{ArtistData, ShowData, VenueData};
use fyyur_common::time;
use serde::Deserialize;
use url::Url;

/// Search box submission
#[derive(Debug, Default, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search_term: String,
}

/// Collects field errors while a form is validated
#[derive(Default)]
struct Checker {
    errors: Vec<String>,
}

impl Checker {
    fn required(&mut self, label: &str, value: &str) -> String {
        let value = value.trim();
        if value.is_empty() {
            self.errors.push(format!("{label} is required."));
        }
        value.to_string()
    }

    fn state(&mut self, value: &str) -> String {
        let value = self.required("State", value);
        if !value.is_empty() && !is_state(&value) {
            self.errors.push(format!("State {value} is not a valid choice."));
        }
        value
    }

    fn genres(&mut self, values: &[String]) -> Vec<String> {
        if values.is_empty() {
            self.errors.push("Pick at least one genre.".to_string());
        }
        for genre in values.iter().filter(|g| !is_genre(g)) {
            self.errors.push(format!("Genre {genre} is not a valid choice."));
        }
        values.to_vec()
    }

    fn phone(&mut self, value: &str) -> Option<String> {
        let value = optional(value)?;
        if !is_phone(&value) {
            self.errors
                .push("Phone must look like 123-456-7890.".to_string());
        }
        Some(value)
    }

    fn url(&mut self, label: &str, value: &str) -> Option<String> {
        let value = optional(value)?;
        if !is_url(&value) {
            self.errors
                .push(format!("{label} must be an http:// or https:// URL."));
        }
        Some(value)
    }

    fn finish<T>(self, data: T) -> Result<T, Vec<String>> {
        if self.errors.is_empty() {
            Ok(data)
        } else {
            Err(self.errors)
        }
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// `XXX-XXX-XXXX`
fn is_phone(value: &str) -> bool {
    let groups: Vec<&str> = value.split('-').collect();
    groups.len() == 3
        && [3, 3, 4]
            .iter()
            .zip(&groups)
            .all(|(len, group)| group.len() == *len && group.bytes().all(|b| b.is_ascii_digit()))
}

fn is_url(value: &str) -> bool {
    Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
        .unwrap_or(false)
}

/// Checkbox value: absent, empty, `n` or `false` means unchecked
fn checkbox(value: &str) -> bool {
    !matches!(value.trim().to_ascii_lowercase().as_str(), "" | "n" | "no" | "false" | "off")
}

/// Venue create/edit form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VenueForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub genres: Vec<String>,
    pub image_link: String,
    pub facebook_link: String,
    pub website_link: String,
    pub seeking_talent: bool,
    pub seeking_description: String,
}

impl VenueForm {
    /// Build from urlencoded pairs; `genres` may repeat
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut form = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "name" => form.name = value,
                "city" => form.city = value,
                "state" => form.state = value,
                "address" => form.address = value,
                "phone" => form.phone = value,
                "genres" => form.genres.push(value),
                "image_link" => form.image_link = value,
                "facebook_link" => form.facebook_link = value,
                "website_link" => form.website_link = value,
                "seeking_talent" => form.seeking_talent = checkbox(&value),
                "seeking_description" => form.seeking_description = value,
                _ => {}
            }
        }
        form
    }

    pub fn validate(&self) -> Result<VenueData, Vec<String>> {
        let mut check = Checker::default();
        let data = VenueData {
            name: check.required("Name", &self.name),
            city: check.required("City", &self.city),
            state: check.state(&self.state),
            address: check.required("Address", &self.address),
            phone: check.phone(&self.phone),
            genres: check.genres(&self.genres),
            image_link: check.url("Image link", &self.image_link),
            facebook_link: check.url("Facebook link", &self.facebook_link),
            website_link: check.url("Website link", &self.website_link),
            seeking_talent: self.seeking_talent,
            seeking_description: optional(&self.seeking_description),
        };
        check.finish(data)
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }

    pub fn has_state(&self, state: &str) -> bool {
        self.state == state
    }
}

impl From<VenueData> for VenueForm {
    fn from(data: VenueData) -> Self {
        Self {
            name: data.name,
            city: data.city,
            state: data.state,
            address: data.address,
            phone: data.phone.unwrap_or_default(),
            genres: data.genres,
            image_link: data.image_link.unwrap_or_default(),
            facebook_link: data.facebook_link.unwrap_or_default(),
            website_link: data.website_link.unwrap_or_default(),
            seeking_talent: data.seeking_talent,
            seeking_description: data.seeking_description.unwrap_or_default(),
        }
    }
}

/// Artist create/edit form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArtistForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub genres: Vec<String>,
    pub image_link: String,
    pub facebook_link: String,
    pub website_link: String,
    pub seeking_venue: bool,
    pub seeking_description: String,
}

impl ArtistForm {
    /// Build from urlencoded pairs; `genres` may repeat
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut form = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "name" => form.name = value,
                "city" => form.city = value,
                "state" => form.state = value,
                "phone" => form.phone = value,
                "genres" => form.genres.push(value),
                "image_link" => form.image_link = value,
                "facebook_link" => form.facebook_link = value,
                "website_link" => form.website_link = value,
                "seeking_venue" => form.seeking_venue = checkbox(&value),
                "seeking_description" => form.seeking_description = value,
                _ => {}
            }
        }
        form
    }

    pub fn validate(&self) -> Result<ArtistData, Vec<String>> {
        let mut check = Checker::default();
        let data = ArtistData {
            name: check.required("Name", &self.name),
            city: check.required("City", &self.city),
            state: check.state(&self.state),
            phone: check.phone(&self.phone),
            genres: check.genres(&self.genres),
            image_link: check.url("Image link", &self.image_link),
            facebook_link: check.url("Facebook link", &self.facebook_link),
            website_link: check.url("Website link", &self.website_link),
            seeking_venue: self.seeking_venue,
            seeking_description: optional(&self.seeking_description),
        };
        check.finish(data)
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }

    pub fn has_state(&self, state: &str) -> bool {
        self.state == state
    }
}

impl From<ArtistData> for ArtistForm {
    fn from(data: ArtistData) -> Self {
        Self {
            name: data.name,
            city: data.city,
            state: data.state,
            phone: data.phone.unwrap_or_default(),
            genres: data.genres,
            image_link: data.image_link.unwrap_or_default(),
            facebook_link: data.facebook_link.unwrap_or_default(),
            website_link: data.website_link.unwrap_or_default(),
            seeking_venue: data.seeking_venue,
            seeking_description: data.seeking_description.unwrap_or_default(),
        }
    }
}

/// Show create form
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ShowForm {
    #[serde(default)]
    pub artist_id: String,
    #[serde(default)]
    pub venue_id: String,
    #[serde(default)]
    pub start_time: String,
}

impl ShowForm {
    /// Empty form with the start time preset to now
    pub fn starting_at(now: NaiveDateTime) -> Self {
        Self {
            artist_id: String::new(),
            venue_id: String::new(),
            start_time: time::to_db(now),
        }
    }

    pub fn validate(&self) -> Result<ShowData, Vec<String>> {
        let mut errors = Vec::new();

        let artist_id = self.artist_id.trim().parse::<i64>();
        if artist_id.is_err() {
            errors.push("Artist ID must be a number.".to_string());
        }
        let venue_id = self.venue_id.trim().parse::<i64>();
        if venue_id.is_err() {
            errors.push("Venue ID must be a number.".to_string());
        }
        let start_time = time::parse_input(&self.start_time);
        if start_time.is_none() {
            errors.push("Start time must look like 2035-05-21 21:30:00.".to_string());
        }

        match (artist_id, venue_id, start_time) {
            (Ok(artist_id), Ok(venue_id), Some(start_time)) => Ok(ShowData {
                artist_id,
                venue_id,
                start_time,
            }),
            _ => Err(errors),
        }
    }
}

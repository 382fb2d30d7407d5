//! Page templates (askama, compiled from `templates/`)

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use fyyur_common::choices::{GENRES, STATES};
use fyyur_common::db::{ArtistDetail, ShowListing, Summary, VenueArea, VenueDetail};

use crate::error::ApiResult;
use crate::flash::{self, IncomingFlash};
use crate::forms::{ArtistForm, ShowForm, VenueForm};

/// Which search box the layout shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Venues,
    Artists,
}

/// Data every page's layout needs
#[derive(Debug, Clone)]
pub struct Page {
    pub section: Section,
    pub messages: Vec<String>,
}

impl Page {
    pub fn new(section: Section) -> Self {
        Self {
            section,
            messages: Vec::new(),
        }
    }

    pub fn home() -> Self {
        Self::new(Section::Venues)
    }

    /// Page that also shows the flash message sent with this request
    pub fn with_flash(section: Section, incoming: &IncomingFlash) -> Self {
        let mut page = Self::new(section);
        if let Some(message) = incoming.message() {
            page.messages.push(message.to_string());
        }
        page
    }

    pub fn flash(mut self, message: impl Into<String>) -> Self {
        self.messages.push(message.into());
        self
    }

    pub fn search_action(&self) -> &'static str {
        match self.section {
            Section::Venues => "/venues/search",
            Section::Artists => "/artists/search",
        }
    }

    pub fn search_placeholder(&self) -> &'static str {
        match self.section {
            Section::Venues => "Find a venue",
            Section::Artists => "Find an artist",
        }
    }
}

/// Render a page; clears the flash cookie if this request carried one
pub fn render<T: Template>(template: &T, incoming: &IncomingFlash) -> ApiResult<Response> {
    render_with_status(StatusCode::OK, template, incoming)
}

pub fn render_with_status<T: Template>(
    status: StatusCode,
    template: &T,
    incoming: &IncomingFlash,
) -> ApiResult<Response> {
    let body = template.render()?;
    if incoming.is_present() {
        Ok((status, [flash::clear_cookie()], Html(body)).into_response())
    } else {
        Ok((status, Html(body)).into_response())
    }
}

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub page: Page,
}

#[derive(Template)]
#[template(path = "pages/venues.html")]
pub struct VenuesTemplate {
    pub page: Page,
    pub areas: Vec<VenueArea>,
}

#[derive(Template)]
#[template(path = "pages/search_results.html")]
pub struct SearchResultsTemplate {
    pub page: Page,
    pub search_term: String,
    /// `/venues` or `/artists`, prefix of each result link
    pub link_base: &'static str,
    pub results: Vec<Summary>,
}

impl SearchResultsTemplate {
    pub fn count(&self) -> usize {
        self.results.len()
    }
}

#[derive(Template)]
#[template(path = "pages/show_venue.html")]
pub struct ShowVenueTemplate {
    pub page: Page,
    pub detail: VenueDetail,
}

#[derive(Template)]
#[template(path = "pages/artists.html")]
pub struct ArtistsTemplate {
    pub page: Page,
    pub artists: Vec<(i64, String)>,
}

#[derive(Template)]
#[template(path = "pages/show_artist.html")]
pub struct ShowArtistTemplate {
    pub page: Page,
    pub detail: ArtistDetail,
}

#[derive(Template)]
#[template(path = "pages/shows.html")]
pub struct ShowsTemplate {
    pub page: Page,
    pub shows: Vec<ShowListing>,
}

/// New or edit venue form
#[derive(Template)]
#[template(path = "forms/venue.html")]
pub struct VenueFormTemplate {
    pub page: Page,
    /// Set when editing an existing venue
    pub venue_id: Option<i64>,
    pub form: VenueForm,
    pub errors: Vec<String>,
    pub states: &'static [&'static str],
    pub genres: &'static [&'static str],
}

impl VenueFormTemplate {
    pub fn new(page: Page, venue_id: Option<i64>, form: VenueForm, errors: Vec<String>) -> Self {
        Self {
            page,
            venue_id,
            form,
            errors,
            states: STATES,
            genres: GENRES,
        }
    }

    pub fn action(&self) -> String {
        match self.venue_id {
            Some(id) => format!("/venues/{id}/edit"),
            None => "/venues/create".to_string(),
        }
    }
}

/// New or edit artist form
#[derive(Template)]
#[template(path = "forms/artist.html")]
pub struct ArtistFormTemplate {
    pub page: Page,
    /// Set when editing an existing artist
    pub artist_id: Option<i64>,
    pub form: ArtistForm,
    pub errors: Vec<String>,
    pub states: &'static [&'static str],
    pub genres: &'static [&'static str],
}

impl ArtistFormTemplate {
    pub fn new(page: Page, artist_id: Option<i64>, form: ArtistForm, errors: Vec<String>) -> Self {
        Self {
            page,
            artist_id,
            form,
            errors,
            states: STATES,
            genres: GENRES,
        }
    }

    pub fn action(&self) -> String {
        match self.artist_id {
            Some(id) => format!("/artists/{id}/edit"),
            None => "/artists/create".to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "forms/show.html")]
pub struct ShowFormTemplate {
    pub page: Page,
    pub form: ShowForm,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "errors/404.html")]
pub struct NotFoundTemplate {
    pub page: Page,
}

#[derive(Template)]
#[template(path = "errors/500.html")]
pub struct ServerErrorTemplate {
    pub page: Page,
}

//! fyyur-web library - venue/artist/show booking directory
//!
//! Server-rendered HTML over a SQLite database. Every route is a single
//! query or mutation followed by a template render or redirect.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod flash;
pub mod forms;
pub mod templates;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
}

impl AppState {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let venues = Router::new()
        .route("/venues", get(api::venues::list_venues))
        .route("/venues/search", post(api::venues::search_venues))
        .route(
            "/venues/create",
            get(api::venues::create_venue_form).post(api::venues::create_venue_submission),
        )
        .route(
            "/venues/:venue_id",
            get(api::venues::show_venue).delete(api::venues::delete_venue),
        )
        .route(
            "/venues/:venue_id/edit",
            get(api::venues::edit_venue_form).post(api::venues::edit_venue_submission),
        );

    let artists = Router::new()
        .route("/artists", get(api::artists::list_artists))
        .route("/artists/search", post(api::artists::search_artists))
        .route(
            "/artists/create",
            get(api::artists::create_artist_form).post(api::artists::create_artist_submission),
        )
        .route("/artists/:artist_id", get(api::artists::show_artist))
        .route(
            "/artists/:artist_id/edit",
            get(api::artists::edit_artist_form).post(api::artists::edit_artist_submission),
        );

    let shows = Router::new()
        .route("/shows", get(api::shows::list_shows))
        .route(
            "/shows/create",
            get(api::shows::create_show_form).post(api::shows::create_show_submission),
        );

    Router::new()
        .route("/", get(api::pages::index))
        .merge(venues)
        .merge(artists)
        .merge(shows)
        .merge(api::health_routes())
        .fallback(api::pages::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

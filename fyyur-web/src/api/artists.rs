//! Artist pages: list, search, detail, create, edit
//!
//! Artists have no delete route.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use fyyur_common::db::{artists, ArtistData};
use fyyur_common::time;
use tracing::{error, info, warn};

use crate::error::{parse_id, ApiError, ApiResult};
use crate::flash::{self, IncomingFlash};
use crate::forms::{ArtistForm, SearchForm};
use crate::templates::{
    render, render_with_status, ArtistFormTemplate, ArtistsTemplate, HomeTemplate, Page,
    SearchResultsTemplate, Section, ShowArtistTemplate,
};
use crate::AppState;

/// GET /artists
pub async fn list_artists(
    State(state): State<AppState>,
    flash: IncomingFlash,
) -> ApiResult<Response> {
    let artists = artists::list_artists(&state.db).await?;
    let page = Page::with_flash(Section::Artists, &flash);
    render(&ArtistsTemplate { page, artists }, &flash)
}

/// POST /artists/search
pub async fn search_artists(
    State(state): State<AppState>,
    flash: IncomingFlash,
    Form(search): Form<SearchForm>,
) -> ApiResult<Response> {
    let results = artists::search_artists(&state.db, &search.search_term, time::now()).await?;
    let page = Page::with_flash(Section::Artists, &flash);
    render(
        &SearchResultsTemplate {
            page,
            search_term: search.search_term,
            link_base: "/artists",
            results,
        },
        &flash,
    )
}

/// GET /artists/:artist_id
pub async fn show_artist(
    State(state): State<AppState>,
    flash: IncomingFlash,
    Path(artist_id): Path<String>,
) -> ApiResult<Response> {
    let artist_id = parse_id(&artist_id)?;
    let Some(detail) = artists::load_artist_detail(&state.db, artist_id, time::now()).await? else {
        return Ok(Redirect::to("/").into_response());
    };
    let page = Page::with_flash(Section::Artists, &flash);
    render(&ShowArtistTemplate { page, detail }, &flash)
}

/// GET /artists/create
pub async fn create_artist_form(flash: IncomingFlash) -> ApiResult<Response> {
    let page = Page::with_flash(Section::Artists, &flash);
    render(
        &ArtistFormTemplate::new(page, None, ArtistForm::default(), Vec::new()),
        &flash,
    )
}

/// POST /artists/create
pub async fn create_artist_submission(
    State(state): State<AppState>,
    flash: IncomingFlash,
    Form(pairs): Form<Vec<(String, String)>>,
) -> ApiResult<Response> {
    let form = ArtistForm::from_pairs(pairs);
    let data = match form.validate() {
        Ok(data) => data,
        Err(errors) => {
            warn!("Rejected artist form: {:?}", errors);
            let page = Page::with_flash(Section::Artists, &flash).flash(format!(
                "An error occurred. Artist {} could not be created.",
                form.name
            ));
            return render_with_status(
                StatusCode::BAD_REQUEST,
                &ArtistFormTemplate::new(page, None, form, errors),
                &flash,
            );
        }
    };

    let message = match artists::insert_artist(&state.db, &data).await {
        Ok(id) => {
            info!(artist_id = id, "Artist created: {}", data.name);
            format!("Artist {} was successfully listed!", data.name)
        }
        Err(e) => {
            error!("Failed to create artist {}: {}", data.name, e);
            format!("An error occurred. Artist {} could not be created.", data.name)
        }
    };

    let page = Page::with_flash(Section::Artists, &flash).flash(message);
    render(&HomeTemplate { page }, &flash)
}

/// GET /artists/:artist_id/edit
pub async fn edit_artist_form(
    State(state): State<AppState>,
    flash: IncomingFlash,
    Path(artist_id): Path<String>,
) -> ApiResult<Response> {
    let artist_id = parse_id(&artist_id)?;
    let artist = artists::load_artist(&state.db, artist_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("artist {artist_id}")))?;

    let page = Page::with_flash(Section::Artists, &flash);
    let form = ArtistForm::from(ArtistData::from(artist));
    render(
        &ArtistFormTemplate::new(page, Some(artist_id), form, Vec::new()),
        &flash,
    )
}

/// POST /artists/:artist_id/edit
pub async fn edit_artist_submission(
    State(state): State<AppState>,
    flash: IncomingFlash,
    Path(artist_id): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> ApiResult<Response> {
    let artist_id = parse_id(&artist_id)?;
    let form = ArtistForm::from_pairs(pairs);
    let data = match form.validate() {
        Ok(data) => data,
        Err(errors) => {
            warn!("Rejected edit of artist {}: {:?}", artist_id, errors);
            let page = Page::with_flash(Section::Artists, &flash).flash(format!(
                "An error occurred. Artist {} could not be updated.",
                form.name
            ));
            return render_with_status(
                StatusCode::BAD_REQUEST,
                &ArtistFormTemplate::new(page, Some(artist_id), form, errors),
                &flash,
            );
        }
    };

    let message = match artists::update_artist(&state.db, artist_id, &data).await {
        Ok(true) => {
            info!(artist_id, "Artist updated: {}", data.name);
            format!("Artist {} was successfully updated!", data.name)
        }
        Ok(false) => {
            warn!("Edit submitted for unknown artist {}", artist_id);
            format!("An error occurred. Artist {} could not be updated.", data.name)
        }
        Err(e) => {
            error!("Failed to update artist {}: {}", artist_id, e);
            format!("An error occurred. Artist {} could not be updated.", data.name)
        }
    };

    Ok((
        [flash::set_cookie(&message)],
        Redirect::to(&format!("/artists/{artist_id}")),
    )
        .into_response())
}

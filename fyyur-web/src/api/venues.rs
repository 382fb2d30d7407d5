//! Venue pages: list, search, detail, create, edit, delete

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use fyyur_common::db::venues;
use fyyur_common::time;
use serde_json::json;
use tracing::{error, info, warn};

use crate::error::{parse_id, ApiError, ApiResult};
use crate::flash::{self, IncomingFlash};
use crate::forms::{SearchForm, VenueForm};
use crate::templates::{
    render, render_with_status, HomeTemplate, Page, SearchResultsTemplate, Section,
    ShowVenueTemplate, VenueFormTemplate, VenuesTemplate,
};
use crate::AppState;

/// GET /venues
///
/// Venues grouped by city and state, each with its upcoming-show count
pub async fn list_venues(
    State(state): State<AppState>,
    flash: IncomingFlash,
) -> ApiResult<Response> {
    let areas = venues::list_venue_areas(&state.db, time::now()).await?;
    let page = Page::with_flash(Section::Venues, &flash);
    render(&VenuesTemplate { page, areas }, &flash)
}

/// POST /venues/search
pub async fn search_venues(
    State(state): State<AppState>,
    flash: IncomingFlash,
    Form(search): Form<SearchForm>,
) -> ApiResult<Response> {
    let results = venues::search_venues(&state.db, &search.search_term, time::now()).await?;
    let page = Page::with_flash(Section::Venues, &flash);
    render(
        &SearchResultsTemplate {
            page,
            search_term: search.search_term,
            link_base: "/venues",
            results,
        },
        &flash,
    )
}

/// GET /venues/:venue_id
///
/// Unknown venues send the browser back to the home page.
pub async fn show_venue(
    State(state): State<AppState>,
    flash: IncomingFlash,
    Path(venue_id): Path<String>,
) -> ApiResult<Response> {
    let venue_id = parse_id(&venue_id)?;
    let Some(detail) = venues::load_venue_detail(&state.db, venue_id, time::now()).await? else {
        return Ok(Redirect::to("/").into_response());
    };
    let page = Page::with_flash(Section::Venues, &flash);
    render(&ShowVenueTemplate { page, detail }, &flash)
}

/// GET /venues/create
pub async fn create_venue_form(flash: IncomingFlash) -> ApiResult<Response> {
    let page = Page::with_flash(Section::Venues, &flash);
    render(
        &VenueFormTemplate::new(page, None, VenueForm::default(), Vec::new()),
        &flash,
    )
}

/// POST /venues/create
pub async fn create_venue_submission(
    State(state): State<AppState>,
    flash: IncomingFlash,
    Form(pairs): Form<Vec<(String, String)>>,
) -> ApiResult<Response> {
    let form = VenueForm::from_pairs(pairs);
    let data = match form.validate() {
        Ok(data) => data,
        Err(errors) => {
            warn!("Rejected venue form: {:?}", errors);
            let page = Page::with_flash(Section::Venues, &flash).flash(format!(
                "An error occurred. Venue {} could not be created.",
                form.name
            ));
            return render_with_status(
                StatusCode::BAD_REQUEST,
                &VenueFormTemplate::new(page, None, form, errors),
                &flash,
            );
        }
    };

    let message = match venues::insert_venue(&state.db, &data).await {
        Ok(id) => {
            info!(venue_id = id, "Venue created: {}", data.name);
            format!("Venue {} was successfully listed!", data.name)
        }
        Err(e) => {
            error!("Failed to create venue {}: {}", data.name, e);
            format!("An error occurred. Venue {} could not be created.", data.name)
        }
    };

    let page = Page::with_flash(Section::Venues, &flash).flash(message);
    render(&HomeTemplate { page }, &flash)
}

/// DELETE /venues/:venue_id
///
/// Called from the venue page script; answers JSON and leaves a flash
/// message for the page the script navigates to.
pub async fn delete_venue(
    State(state): State<AppState>,
    Path(venue_id): Path<String>,
) -> Response {
    let result = match parse_id(&venue_id) {
        Ok(id) => venues::delete_venue(&state.db, id).await.map_err(ApiError::from),
        Err(e) => Err(e),
    };

    let success = match result {
        Ok(true) => {
            info!("Venue {} deleted", venue_id);
            true
        }
        Ok(false) => {
            warn!("Delete requested for unknown venue {}", venue_id);
            false
        }
        Err(e) => {
            error!("Failed to delete venue {}: {}", venue_id, e);
            false
        }
    };

    let message = if success {
        "Venue was successfully deleted!"
    } else {
        "An error occurred. Venue could not be deleted."
    };

    (
        [flash::set_cookie(message)],
        Json(json!({ "success": success })),
    )
        .into_response()
}

/// GET /venues/:venue_id/edit
pub async fn edit_venue_form(
    State(state): State<AppState>,
    flash: IncomingFlash,
    Path(venue_id): Path<String>,
) -> ApiResult<Response> {
    let venue_id = parse_id(&venue_id)?;
    let venue = venues::load_venue(&state.db, venue_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("venue {venue_id}")))?;

    let page = Page::with_flash(Section::Venues, &flash);
    let form = VenueForm::from(fyyur_common::db::VenueData::from(venue));
    render(
        &VenueFormTemplate::new(page, Some(venue_id), form, Vec::new()),
        &flash,
    )
}

/// POST /venues/:venue_id/edit
pub async fn edit_venue_submission(
    State(state): State<AppState>,
    flash: IncomingFlash,
    Path(venue_id): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> ApiResult<Response> {
    let venue_id = parse_id(&venue_id)?;
    let form = VenueForm::from_pairs(pairs);
    let data = match form.validate() {
        Ok(data) => data,
        Err(errors) => {
            warn!("Rejected edit of venue {}: {:?}", venue_id, errors);
            let page = Page::with_flash(Section::Venues, &flash).flash(format!(
                "An error occurred. Venue {} could not be updated.",
                form.name
            ));
            return render_with_status(
                StatusCode::BAD_REQUEST,
                &VenueFormTemplate::new(page, Some(venue_id), form, errors),
                &flash,
            );
        }
    };

    let message = match venues::update_venue(&state.db, venue_id, &data).await {
        Ok(true) => {
            info!(venue_id, "Venue updated: {}", data.name);
            format!("Venue {} was successfully updated!", data.name)
        }
        Ok(false) => {
            warn!("Edit submitted for unknown venue {}", venue_id);
            format!("An error occurred. Venue {} could not be updated.", data.name)
        }
        Err(e) => {
            error!("Failed to update venue {}: {}", venue_id, e);
            format!("An error occurred. Venue {} could not be updated.", data.name)
        }
    };

    Ok((
        [flash::set_cookie(&message)],
        Redirect::to(&format!("/venues/{venue_id}")),
    )
        .into_response())
}

//! Show pages: list and create

use axum::{extract::State, http::StatusCode, response::Response, Form};
use fyyur_common::db::shows;
use fyyur_common::time;
use tracing::{error, info, warn};

use crate::error::ApiResult;
use crate::flash::IncomingFlash;
use crate::forms::ShowForm;
use crate::templates::{
    render, render_with_status, HomeTemplate, Page, Section, ShowFormTemplate, ShowsTemplate,
};
use crate::AppState;

const CREATE_FAILED: &str = "An error occurred. Show could not be listed.";

/// GET /shows
pub async fn list_shows(
    State(state): State<AppState>,
    flash: IncomingFlash,
) -> ApiResult<Response> {
    let shows = shows::list_shows(&state.db).await?;
    let page = Page::with_flash(Section::Venues, &flash);
    render(&ShowsTemplate { page, shows }, &flash)
}

/// GET /shows/create
pub async fn create_show_form(flash: IncomingFlash) -> ApiResult<Response> {
    let page = Page::with_flash(Section::Venues, &flash);
    render(
        &ShowFormTemplate {
            page,
            form: ShowForm::starting_at(time::now()),
            errors: Vec::new(),
        },
        &flash,
    )
}

/// POST /shows/create
///
/// A show naming a missing artist or venue is rejected by the database and
/// reported like any other failed write.
pub async fn create_show_submission(
    State(state): State<AppState>,
    flash: IncomingFlash,
    Form(form): Form<ShowForm>,
) -> ApiResult<Response> {
    let data = match form.validate() {
        Ok(data) => data,
        Err(errors) => {
            warn!("Rejected show form: {:?}", errors);
            let page = Page::with_flash(Section::Venues, &flash).flash(CREATE_FAILED);
            return render_with_status(
                StatusCode::BAD_REQUEST,
                &ShowFormTemplate { page, form, errors },
                &flash,
            );
        }
    };

    let message = match shows::insert_show(&state.db, &data).await {
        Ok(id) => {
            info!(
                show_id = id,
                artist_id = data.artist_id,
                venue_id = data.venue_id,
                "Show created"
            );
            "Show was successfully listed!"
        }
        Err(e) => {
            error!(
                "Failed to create show (artist {}, venue {}): {}",
                data.artist_id, data.venue_id, e
            );
            CREATE_FAILED
        }
    };

    let page = Page::with_flash(Section::Venues, &flash).flash(message);
    render(&HomeTemplate { page }, &flash)
}

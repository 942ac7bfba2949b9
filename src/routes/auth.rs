use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::instrument;

use crate::core::error::Error;
use crate::core::state::AppState;
use crate::types::request::{LoginData, RefreshData};
use crate::types::response;

#[instrument(skip_all)]
pub(crate) async fn login(
    State(state): State<AppState>,
    Json(user_data): Json<LoginData>,
) -> Result<Json<response::Login>, Error> {
    if user_data.username.trim().is_empty() || user_data.password.trim().is_empty() {
        return Err(Error::BadRequest("Username and password are required."));
    }

    let session = state
        .token_controller
        .login(&user_data.username, &user_data.password)?;

    Ok(Json(session.into()))
}

#[instrument(skip_all)]
pub(crate) async fn refresh(
    State(state): State<AppState>,
    Json(params): Json<RefreshData>,
) -> Result<Json<response::Login>, Error> {
    if params.refresh_token.trim().is_empty() {
        return Err(Error::BadRequest("Refresh token is required."));
    }

    let session = state.token_controller.refresh(&params.refresh_token)?;

    Ok(Json(session.into()))
}

#[instrument(skip_all)]
pub(crate) async fn logout(
    State(state): State<AppState>,
    Json(params): Json<RefreshData>,
) -> Result<StatusCode, Error> {
    if params.refresh_token.trim().is_empty() {
        return Err(Error::BadRequest("Refresh token is required."));
    }

    state
        .token_controller
        .revoke_refresh_token(&params.refresh_token);

    Ok(StatusCode::NO_CONTENT)
}

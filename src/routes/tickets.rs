use axum::Extension;
use axum::extract::{Json, Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use tracing::instrument;

use crate::core::error::Error;
use crate::core::state::AppState;
use crate::types::response::Message;
use crate::types::ticket::Ticket;
use crate::types::user::AuthorizedUser;
use crate::utils::auth::{ADMIN, USER, require_role};

const READERS: &[&str] = &[ADMIN, USER];
const WRITERS: &[&str] = &[ADMIN];

#[instrument(skip(state))]
pub(crate) async fn get_all(
    State(state): State<AppState>,
    Extension(user): Extension<AuthorizedUser>,
) -> Result<Json<Vec<Ticket>>, Error> {
    require_role(&user, READERS)?;

    Ok(Json(state.ticket_controller.get_all().await))
}

#[instrument(skip(state))]
pub(crate) async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthorizedUser>,
    Path(id): Path<String>,
) -> Result<Json<Ticket>, Error> {
    require_role(&user, READERS)?;

    let ticket = state
        .ticket_controller
        .get(&id)
        .await
        .ok_or(Error::TicketNotFound(id))?;

    Ok(Json(ticket))
}

#[instrument(skip(state, ticket))]
pub(crate) async fn post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthorizedUser>,
    Json(ticket): Json<Ticket>,
) -> Result<impl IntoResponse, Error> {
    require_role(&user, WRITERS)?;

    let location = format!("/api/tickets/{}", ticket.ticket_id);

    state.ticket_controller.add(ticket.clone()).await;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ticket),
    ))
}

#[instrument(skip(state, ticket))]
pub(crate) async fn put(
    State(state): State<AppState>,
    Extension(user): Extension<AuthorizedUser>,
    Path(id): Path<String>,
    Json(ticket): Json<Ticket>,
) -> Result<Json<Message>, Error> {
    require_role(&user, WRITERS)?;

    if !state.ticket_controller.update(&id, ticket).await {
        return Err(Error::TicketNotFound(id));
    }

    Ok(Json(Message::new("Ticket updated successfully.")))
}

#[instrument(skip(state))]
pub(crate) async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthorizedUser>,
    Path(id): Path<String>,
) -> Result<Json<Message>, Error> {
    require_role(&user, WRITERS)?;

    if !state.ticket_controller.delete(&id).await {
        return Err(Error::TicketNotFound(id));
    }

    Ok(Json(Message::new("Ticket deleted successfully.")))
}

use axum::extract::State;
use axum::{body::Body, extract::Request, http, http::Response, middleware::Next};

use crate::core::error::Error;
use crate::core::state::AppState;
use crate::types::user::AuthorizedUser;

pub(crate) const ADMIN: &str = "Admin";
pub(crate) const USER: &str = "User";

pub(crate) async fn authorize(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response<Body>, Error> {
    let auth_header = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or(Error::NoCredentials)?;

    let mut header = auth_header.to_str()?.split_whitespace();

    let token = match (header.next(), header.next()) {
        (Some(scheme), Some(token)) if scheme.eq_ignore_ascii_case("bearer") => token,
        _ => return Err(Error::Unauthorized),
    };

    let claims = state.token_controller.decode_access_token(token)?;

    request.extensions_mut().insert(AuthorizedUser {
        username: claims.sub,
        role: claims.role,
    });

    Ok(next.run(request).await)
}

pub(crate) fn require_role(user: &AuthorizedUser, roles: &[&str]) -> Result<(), Error> {
    if user.has_role(roles) {
        Ok(())
    } else {
        tracing::warn!("User {} with role {} denied", user.username, user.role);
        Err(Error::Forbidden)
    }
}

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("JWT secret key is not configured")]
    MissingSecret,
    #[error("{0} must be a positive number of minutes no longer than a century, got {1}")]
    InvalidExpiry(&'static str, i64),
    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Invalid or expired refresh token")]
    InvalidRefreshToken,
    #[error("No credentials provided")]
    NoCredentials,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden")]
    Forbidden,
    #[error("Ticket {0} not found")]
    TicketNotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(&'static str),
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("Header decode error: {0}")]
    Header(#[from] axum::http::header::ToStrError),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!("{:?}", self);

        let (status, message) = match self {
            Error::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Invalid username or password.".to_string(),
            ),
            Error::InvalidRefreshToken => (
                StatusCode::UNAUTHORIZED,
                "Invalid or expired refresh token.".to_string(),
            ),
            Error::NoCredentials => (
                StatusCode::UNAUTHORIZED,
                "No credentials provided".to_string(),
            ),
            Error::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            Error::Forbidden => (StatusCode::FORBIDDEN, "Forbidden".to_string()),
            Error::TicketNotFound(id) => (
                StatusCode::NOT_FOUND,
                format!("Ticket with ID {} not found.", id),
            ),
            Error::BadRequest(message) => (StatusCode::BAD_REQUEST, message.to_string()),
            Error::Jwt(_) => (StatusCode::INTERNAL_SERVER_ERROR, "JWT error".to_string()),
            Error::Header(_) => (StatusCode::BAD_REQUEST, "Invalid header value".to_string()),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

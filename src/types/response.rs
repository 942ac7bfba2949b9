use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::controllers::token::Session;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Login {
    pub(crate) token: String,
    pub(crate) username: String,
    pub(crate) role: String,
    pub(crate) expires_at: DateTime<Utc>,
    pub(crate) refresh_token: String,
    pub(crate) refresh_expires_at: DateTime<Utc>,
}

impl From<Session> for Login {
    fn from(session: Session) -> Self {
        Self {
            token: session.access_token,
            username: session.user.username,
            role: session.user.role,
            expires_at: session.access_expires_at,
            refresh_token: session.refresh_token,
            refresh_expires_at: session.refresh_expires_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct Message {
    pub(crate) message: &'static str,
}

impl Message {
    pub(crate) fn new(message: &'static str) -> Self {
        Self { message }
    }
}

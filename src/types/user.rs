use serde::{Deserialize, Serialize};

pub(crate) type Username = String;

/// A statically configured account. Passwords are compared in plaintext.
#[derive(Clone, Deserialize)]
pub(crate) struct UserCredential {
    pub(crate) username: Username,
    #[serde(default)]
    pub(crate) password: String,
    pub(crate) role: String,
}

impl std::fmt::Debug for UserCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserCredential")
            .field("username", &self.username)
            .field("role", &self.role)
            .finish()
    }
}

/// The identity carried by a verified access token or a live refresh token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct AuthorizedUser {
    pub(crate) username: Username,
    pub(crate) role: String,
}

impl AuthorizedUser {
    pub(crate) fn has_role(&self, roles: &[&str]) -> bool {
        roles.contains(&self.role.as_str())
    }
}

impl From<&UserCredential> for AuthorizedUser {
    fn from(user: &UserCredential) -> Self {
        Self {
            username: user.username.clone(),
            role: user.role.clone(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug)]
pub(crate) struct Claims {
    pub(crate) sub: String,
    pub(crate) role: String,
    pub(crate) jti: String,
    pub(crate) iat: i64,
    pub(crate) exp: i64,
    pub(crate) iss: String,
    pub(crate) aud: String,
}

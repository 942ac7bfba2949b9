use base64::{Engine as _, engine::general_purpose};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use rand::rngs::OsRng;
use uuid::Uuid;

use crate::core::config::{
    DEFAULT_ACCESS_EXPIRY_MINUTES, DEFAULT_REFRESH_EXPIRY_MINUTES, JwtSettings,
};
use crate::core::error::{ConfigError, Error};
use crate::token::store::{RefreshToken, TokenStore};
use crate::types::user::{AuthorizedUser, Claims, UserCredential};

const REFRESH_TOKEN_BYTES: usize = 64;

/// Everything a client receives after a successful login or refresh.
#[derive(Debug)]
pub(crate) struct Session {
    pub(crate) user: AuthorizedUser,
    pub(crate) access_token: String,
    pub(crate) access_expires_at: DateTime<Utc>,
    pub(crate) refresh_token: String,
    pub(crate) refresh_expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub(crate) struct TokenController<T: TokenStore> {
    users: Vec<UserCredential>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    access_expiry_minutes: Option<i64>,
    refresh_expiry_minutes: Option<i64>,
    token_store: T,
}

impl<T: TokenStore> std::fmt::Debug for TokenController<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenController")
            .field("users", &self.users)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish()
    }
}

impl<T: TokenStore> TokenController<T> {
    pub(crate) fn new(
        settings: &JwtSettings,
        users: Vec<UserCredential>,
        token_store: T,
    ) -> Result<Self, ConfigError> {
        if settings.secret.trim().is_empty() {
            return Err(ConfigError::MissingSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[&settings.issuer]);
        validation.set_audience(&[&settings.audience]);

        Ok(Self {
            users,
            encoding_key: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
            validation,
            issuer: settings.issuer.clone(),
            audience: settings.audience.clone(),
            access_expiry_minutes: settings.expiry_minutes,
            refresh_expiry_minutes: settings.refresh_expiry_minutes,
            token_store,
        })
    }

    pub(crate) fn access_token_expiry_minutes(&self) -> i64 {
        self.access_expiry_minutes
            .unwrap_or(DEFAULT_ACCESS_EXPIRY_MINUTES)
    }

    pub(crate) fn refresh_token_expiry_minutes(&self) -> i64 {
        self.refresh_expiry_minutes
            .unwrap_or(DEFAULT_REFRESH_EXPIRY_MINUTES)
    }

    /// Case-insensitive username match, exact password match.
    pub(crate) fn validate_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Option<&UserCredential> {
        self.users.iter().find(|user| {
            user.username.to_lowercase() == username.to_lowercase() && user.password == password
        })
    }

    /// Signs an access token for `user` that expires one access lifetime
    /// after `now`. Returns the token along with that expiry.
    pub(crate) fn issue_access_token(
        &self,
        user: &AuthorizedUser,
        now: DateTime<Utc>,
    ) -> Result<(String, DateTime<Utc>), Error> {
        let expires_at = now + Duration::minutes(self.access_token_expiry_minutes());

        let claims = Claims {
            sub: user.username.clone(),
            role: user.role.clone(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };

        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?;

        Ok((token, expires_at))
    }

    pub(crate) fn decode_access_token(&self, token: &str) -> Result<Claims, Error> {
        match jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(token_data) => Ok(token_data.claims),
            Err(e) => {
                tracing::debug!("rejected access token: {}", e);
                Err(Error::Unauthorized)
            }
        }
    }

    pub(crate) fn issue_refresh_token(&self, user: &AuthorizedUser) -> (String, DateTime<Utc>) {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);

        let token = general_purpose::STANDARD.encode(bytes);
        let expires_at = Utc::now() + Duration::minutes(self.refresh_token_expiry_minutes());

        self.token_store.create(
            token.clone(),
            RefreshToken::new(user.username.clone(), user.role.clone(), expires_at),
        );

        (token, expires_at)
    }

    pub(crate) fn validate_refresh_token(&self, token: &str) -> Option<AuthorizedUser> {
        self.token_store
            .read(token, Utc::now())
            .map(|record| AuthorizedUser {
                username: record.username,
                role: record.role,
            })
    }

    /// Returns whether the token was still registered.
    pub(crate) fn revoke_refresh_token(&self, token: &str) -> bool {
        self.token_store.revoke(token).is_some()
    }

    pub(crate) fn login(&self, username: &str, password: &str) -> Result<Session, Error> {
        tracing::info!("Login attempt for user: {}", username);

        let user = match self.validate_credentials(username, password) {
            Some(user) => AuthorizedUser::from(user),
            None => {
                tracing::warn!("Invalid login attempt for user: {}", username);
                return Err(Error::InvalidCredentials);
            }
        };

        let session = self.open_session(user)?;

        tracing::info!("User {} logged in successfully", session.user.username);

        Ok(session)
    }

    /// Redeems a refresh token for a new session. Only the caller whose
    /// revocation actually removes the token gets a session, so a token is
    /// redeemed at most once even when two requests race on it.
    pub(crate) fn refresh(&self, token: &str) -> Result<Session, Error> {
        let user = match self.validate_refresh_token(token) {
            Some(user) if self.revoke_refresh_token(token) => user,
            _ => {
                tracing::warn!("Rejected refresh token");
                return Err(Error::InvalidRefreshToken);
            }
        };

        self.open_session(user)
    }

    fn open_session(&self, user: AuthorizedUser) -> Result<Session, Error> {
        let (access_token, access_expires_at) = self.issue_access_token(&user, Utc::now())?;
        let (refresh_token, refresh_expires_at) = self.issue_refresh_token(&user);

        Ok(Session {
            user,
            access_token,
            access_expires_at,
            refresh_token,
            refresh_expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::store::MemoryStore;

    fn settings() -> JwtSettings {
        JwtSettings {
            secret: "test-secret-key-that-is-long-enough".into(),
            issuer: "ticketdesk".into(),
            audience: "ticketdesk-clients".into(),
            expiry_minutes: None,
            refresh_expiry_minutes: None,
        }
    }

    fn users() -> Vec<UserCredential> {
        vec![
            UserCredential {
                username: "alice".into(),
                password: "pw1".into(),
                role: "Admin".into(),
            },
            UserCredential {
                username: "Bob".into(),
                password: "pw2".into(),
                role: "User".into(),
            },
        ]
    }

    fn build(settings: &JwtSettings) -> (TokenController<MemoryStore>, MemoryStore) {
        let store = MemoryStore::new();
        let controller = TokenController::new(settings, users(), store.clone()).unwrap();
        (controller, store)
    }

    fn alice() -> AuthorizedUser {
        AuthorizedUser {
            username: "alice".into(),
            role: "Admin".into(),
        }
    }

    #[test]
    fn test_missing_secret_is_fatal() {
        let mut settings = settings();
        settings.secret = String::new();

        assert!(matches!(
            TokenController::new(&settings, users(), MemoryStore::new()),
            Err(ConfigError::MissingSecret)
        ));
    }

    #[test]
    fn test_validate_credentials_ignores_username_case() {
        let (controller, _) = build(&settings());

        let user = controller.validate_credentials("ALICE", "pw1").unwrap();
        assert_eq!(user.role, "Admin");
        assert_eq!(user.username, "alice");

        assert!(controller.validate_credentials("bob", "pw2").is_some());
        assert!(controller.validate_credentials("BoB", "pw2").is_some());
    }

    #[test]
    fn test_validate_credentials_rejects_bad_input() {
        let (controller, _) = build(&settings());

        assert!(controller.validate_credentials("alice", "wrong").is_none());
        assert!(controller.validate_credentials("alice", "PW1").is_none());
        assert!(controller.validate_credentials("carol", "pw1").is_none());
        assert!(controller.validate_credentials("", "").is_none());
    }

    #[test]
    fn test_expiry_defaults() {
        let (controller, _) = build(&settings());
        assert_eq!(controller.access_token_expiry_minutes(), 60);
        assert_eq!(controller.refresh_token_expiry_minutes(), 1440);

        let mut configured = settings();
        configured.expiry_minutes = Some(5);
        configured.refresh_expiry_minutes = Some(30);
        let (controller, _) = build(&configured);
        assert_eq!(controller.access_token_expiry_minutes(), 5);
        assert_eq!(controller.refresh_token_expiry_minutes(), 30);
    }

    #[test]
    fn test_access_token_claims() {
        let (controller, _) = build(&settings());
        let now = Utc::now();

        let (token, expires_at) = controller.issue_access_token(&alice(), now).unwrap();
        assert_eq!(expires_at, now + Duration::minutes(60));

        let claims = controller.decode_access_token(&token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.role, "Admin");
        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.exp, expires_at.timestamp());
        assert_eq!(claims.iss, "ticketdesk");
        assert_eq!(claims.aud, "ticketdesk-clients");
        assert!(Uuid::parse_str(&claims.jti).is_ok());
    }

    #[test]
    fn test_access_tokens_have_unique_ids() {
        let (controller, _) = build(&settings());
        let now = Utc::now();

        let (first, _) = controller.issue_access_token(&alice(), now).unwrap();
        let (second, _) = controller.issue_access_token(&alice(), now).unwrap();

        let first = controller.decode_access_token(&first).unwrap();
        let second = controller.decode_access_token(&second).unwrap();
        assert_ne!(first.jti, second.jti);
    }

    #[test]
    fn test_expired_access_token_is_rejected() {
        let (controller, _) = build(&settings());
        let issued = Utc::now() - Duration::minutes(120);

        let (token, _) = controller.issue_access_token(&alice(), issued).unwrap();

        assert!(matches!(
            controller.decode_access_token(&token),
            Err(Error::Unauthorized)
        ));
    }

    #[test]
    fn test_foreign_access_tokens_are_rejected() {
        let (controller, _) = build(&settings());
        let now = Utc::now();

        let mut other_key = settings();
        other_key.secret = "some-other-secret-key-entirely".into();
        let (other, _) = build(&other_key);
        let (token, _) = other.issue_access_token(&alice(), now).unwrap();
        assert!(controller.decode_access_token(&token).is_err());

        let mut other_audience = settings();
        other_audience.audience = "someone-else".into();
        let (other, _) = build(&other_audience);
        let (token, _) = other.issue_access_token(&alice(), now).unwrap();
        assert!(controller.decode_access_token(&token).is_err());

        assert!(controller.decode_access_token("not.a.token").is_err());
    }

    #[test]
    fn test_refresh_token_shape() {
        let (controller, store) = build(&settings());
        let before = Utc::now();

        let (token, expires_at) = controller.issue_refresh_token(&alice());

        let bytes = general_purpose::STANDARD.decode(&token).unwrap();
        assert_eq!(bytes.len(), REFRESH_TOKEN_BYTES);
        assert!(expires_at >= before + Duration::minutes(1440));
        assert_eq!(store.len(), 1);

        let (other, _) = controller.issue_refresh_token(&alice());
        assert_ne!(token, other);
    }

    #[test]
    fn test_refresh_token_validates_until_revoked() {
        let (controller, _) = build(&settings());
        let (token, _) = controller.issue_refresh_token(&alice());

        assert_eq!(controller.validate_refresh_token(&token), Some(alice()));
        assert!(controller.revoke_refresh_token(&token));

        assert_eq!(controller.validate_refresh_token(&token), None);
        assert_eq!(controller.validate_refresh_token(&token), None);

        // revoking twice, or revoking an unknown token, is a no-op
        assert!(!controller.revoke_refresh_token(&token));
        assert!(!controller.revoke_refresh_token("unknown"));
    }

    #[test]
    fn test_expired_refresh_token_is_purged() {
        let mut settings = settings();
        settings.refresh_expiry_minutes = Some(0);
        let (controller, store) = build(&settings);

        let (token, _) = controller.issue_refresh_token(&alice());
        assert_eq!(store.len(), 1);

        assert_eq!(controller.validate_refresh_token(&token), None);
        assert_eq!(store.len(), 0);
        assert_eq!(controller.validate_refresh_token(&token), None);
    }

    #[test]
    fn test_login() {
        let (controller, store) = build(&settings());

        let session = controller.login("Alice", "pw1").unwrap();
        assert_eq!(session.user, alice());
        assert!(session.refresh_expires_at > session.access_expires_at);
        assert_eq!(store.len(), 1);

        let claims = controller
            .decode_access_token(&session.access_token)
            .unwrap();
        assert_eq!(claims.exp, session.access_expires_at.timestamp());

        assert!(matches!(
            controller.login("alice", "wrong"),
            Err(Error::InvalidCredentials)
        ));
    }

    #[test]
    fn test_refresh_rotates_token() {
        let (controller, store) = build(&settings());
        let session = controller.login("bob", "pw2").unwrap();

        let rotated = controller.refresh(&session.refresh_token).unwrap();
        assert_eq!(rotated.user.username, "Bob");
        assert_eq!(rotated.user.role, "User");
        assert_ne!(rotated.refresh_token, session.refresh_token);
        assert_eq!(store.len(), 1);

        // the old token is single-use
        assert!(matches!(
            controller.refresh(&session.refresh_token),
            Err(Error::InvalidRefreshToken)
        ));
        assert!(controller.refresh(&rotated.refresh_token).is_ok());
    }

    #[test]
    fn test_concurrent_refresh_redeems_once() {
        let (controller, store) = build(&settings());
        let session = controller.login("alice", "pw1").unwrap();
        let token = session.refresh_token.as_str();

        let redeemed = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| controller.refresh(token).is_ok()))
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .filter(|ok| *ok)
                .count()
        });

        assert_eq!(redeemed, 1);
        // only the winner's rotated token is left
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_refresh_rejects_expired_and_unknown() {
        let mut settings = settings();
        settings.refresh_expiry_minutes = Some(0);
        let (controller, store) = build(&settings);

        let session = controller.login("alice", "pw1").unwrap();

        assert!(matches!(
            controller.refresh(&session.refresh_token),
            Err(Error::InvalidRefreshToken)
        ));
        assert_eq!(store.len(), 0);

        assert!(matches!(
            controller.refresh("unknown"),
            Err(Error::InvalidRefreshToken)
        ));
    }
}

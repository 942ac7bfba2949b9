use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Clone, Debug)]
pub(crate) struct RefreshToken {
    pub(crate) username: String,
    pub(crate) role: String,
    pub(crate) expires_at: DateTime<Utc>,
}

impl RefreshToken {
    pub(crate) fn new(username: String, role: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            username,
            role,
            expires_at,
        }
    }

    pub(crate) fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Registry of live refresh tokens, keyed by the opaque token string.
///
/// Every method is atomic with respect to the others for a given key.
pub(crate) trait TokenStore {
    fn create(&self, token_id: String, token: RefreshToken);

    /// Returns the record if it is still live at `now`. An expired record is
    /// removed as part of the same lookup.
    fn read(&self, token_id: &str, now: DateTime<Utc>) -> Option<RefreshToken>;

    /// Removes the record, returning it if it was present (expired or not).
    fn revoke(&self, token_id: &str) -> Option<RefreshToken>;
}

#[derive(Clone, Debug, Default)]
pub(crate) struct MemoryStore {
    tokens: Arc<Mutex<HashMap<String, RefreshToken>>>,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, RefreshToken>> {
        // every critical section leaves the map consistent
        self.tokens.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }
}

impl TokenStore for MemoryStore {
    fn create(&self, token_id: String, token: RefreshToken) {
        self.lock().insert(token_id, token);
    }

    fn read(&self, token_id: &str, now: DateTime<Utc>) -> Option<RefreshToken> {
        let mut tokens = self.lock();

        match tokens.get(token_id) {
            Some(token) if token.is_expired_at(now) => {
                tokens.remove(token_id);
                None
            }
            Some(token) => Some(token.clone()),
            None => None,
        }
    }

    fn revoke(&self, token_id: &str) -> Option<RefreshToken> {
        self.lock().remove(token_id)
    }
}

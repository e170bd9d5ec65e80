//! Redis-backed session store for opaque login tokens
//!
//! A successful login mints a random token and stores the caller's identity
//! under `session:{token}` with the configured TTL. Handlers never consult
//! ambient state; the middleware resolves the token and passes the session
//! user down explicitly.

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use common::cache::RedisPool;

use crate::error::ApiError;

/// Identity carried by an active session
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SessionUser {
    pub user_id: Uuid,
    pub is_admin: bool,
}

/// Session store over the shared Redis pool
#[derive(Clone)]
pub struct SessionStore {
    redis_pool: RedisPool,
    ttl_seconds: u64,
}

impl SessionStore {
    /// Create a new session store
    pub fn new(redis_pool: RedisPool, ttl_seconds: u64) -> Self {
        Self {
            redis_pool,
            ttl_seconds,
        }
    }

    fn key(token: &str) -> String {
        format!("session:{token}")
    }

    /// Mint a session for a user, returning the opaque token
    pub async fn create(&self, user: &SessionUser) -> Result<String, ApiError> {
        info!("Creating session for user: {}", user.user_id);

        let token = Uuid::new_v4().to_string();
        let payload = serde_json::to_string(user).map_err(anyhow::Error::new)?;

        self.redis_pool
            .set(&Self::key(&token), &payload, Some(self.ttl_seconds))
            .await?;

        Ok(token)
    }

    /// Resolve a token to its session user, if the session is still live
    pub async fn fetch(&self, token: &str) -> Result<Option<SessionUser>, ApiError> {
        match self.redis_pool.get(&Self::key(token)).await? {
            Some(raw) => {
                let user = serde_json::from_str(&raw).map_err(anyhow::Error::new)?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    /// Destroy a session; destroying an absent session is a no-op
    pub async fn destroy(&self, token: &str) -> Result<(), ApiError> {
        self.redis_pool.delete(&Self::key(token)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_key_format() {
        assert_eq!(SessionStore::key("abc"), "session:abc");
    }

    #[test]
    fn test_session_user_round_trip() {
        let user = SessionUser {
            user_id: Uuid::new_v4(),
            is_admin: true,
        };
        let raw = serde_json::to_string(&user).unwrap();
        let back: SessionUser = serde_json::from_str(&raw).unwrap();
        assert_eq!(back.user_id, user.user_id);
        assert!(back.is_admin);
    }
}

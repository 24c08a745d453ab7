//! Operator session persisted in a key-value store.

use crate::{Cache, CacheError};
use serde::{Deserialize, Serialize};

/// Key of the bearer token.
pub const TOKEN_KEY: &str = "session:token";

/// Key of the UI preferences.
pub const PREFERENCES_KEY: &str = "session:preferences";

/// Per-operator display preferences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub dark_mode: bool,
}

/// Session context handed to the API layer.
///
/// Reads go through to the store on every call so that a token replaced by
/// another process is picked up on the next request.
///
/// # Example
///
/// ```rust,ignore
/// use sole_cache::{Cache, Session};
///
/// let session = Session::init(Cache::open(dir).await?).await?;
/// session.login("eyJhbGciOi...").await?;
///
/// if let Some(token) = session.token().await? {
///     request = request.bearer_auth(token);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    cache: Cache,
    preferences: Preferences,
}

impl Session {
    /// Load the session from `cache`.
    ///
    /// Unreadable preferences fall back to the defaults.
    pub async fn init(cache: Cache) -> Result<Self, CacheError> {
        let preferences = match cache.get::<Preferences>(PREFERENCES_KEY).await {
            Ok(prefs) => prefs.unwrap_or_default(),
            Err(CacheError::SerializeError(e)) => {
                tracing::warn!(error = %e, "resetting unreadable preferences");
                Preferences::default()
            }
            Err(e) => return Err(e),
        };
        Ok(Self { cache, preferences })
    }

    /// Backing cache.
    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Current bearer token. Blank tokens count as absent.
    pub async fn token(&self) -> Result<Option<String>, CacheError> {
        Ok(self
            .cache
            .get_raw(TOKEN_KEY)
            .await?
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty()))
    }

    /// Whether a token is stored.
    pub async fn is_authenticated(&self) -> Result<bool, CacheError> {
        Ok(self.token().await?.is_some())
    }

    /// Store a bearer token.
    pub async fn login(&self, token: &str) -> Result<(), CacheError> {
        tracing::debug!("storing session token");
        self.cache.set_raw(TOKEN_KEY, token.trim()).await
    }

    /// Forget the bearer token. Preferences are kept.
    pub async fn logout(&self) -> Result<(), CacheError> {
        tracing::debug!("clearing session token");
        self.cache.delete(TOKEN_KEY).await
    }

    pub fn preferences(&self) -> Preferences {
        self.preferences
    }

    /// Persist new preferences.
    pub async fn set_preferences(&mut self, preferences: Preferences) -> Result<(), CacheError> {
        self.cache.set(PREFERENCES_KEY, &preferences).await?;
        self.preferences = preferences;
        Ok(())
    }
}

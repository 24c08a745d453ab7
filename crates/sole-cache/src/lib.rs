//! Local persistence for the register.
//!
//! Provides a small async key-value abstraction with memory and file
//! backends, JSON-typed access, TTL-bounded entries and the operator session.
//!
//! # Example
//!
//! ```rust,ignore
//! use sole_cache::{Cache, Session, TtlCache};
//!
//! let cache = Cache::open("/home/kasir/.local/share/sole").await?;
//!
//! // Operator session
//! let session = Session::init(cache.clone()).await?;
//! session.login(&token).await?;
//!
//! // Entries that expire after five minutes
//! let catalog = TtlCache::with_default_ttl(cache);
//! catalog.set("catalog:nike:42", &units).await?;
//! let units: Option<Vec<Unit>> = catalog.get("catalog:nike:42").await?;
//! ```

mod error;
mod kv;
mod session;
mod ttl;

pub use error::CacheError;
pub use kv::{Cache, FileStore, KeyValueStore, MemoryStore, STORE_FILE};
pub use session::{Preferences, Session, PREFERENCES_KEY, TOKEN_KEY};
pub use ttl::{now_millis, Timestamped, TtlCache, DEFAULT_TTL};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, KeyValueStore, Preferences, Session, TtlCache};
}

//! Authenticated API client.

use std::sync::Arc;

use sole_cache::{CacheError, Session};

use crate::transport::{ApiRequest, ApiResponse, Transport};
use crate::FetchError;

/// API client carrying the transport and the operator session.
///
/// Cheap to clone; clones share the transport and the session store.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: Session,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new client.
    pub fn new(transport: impl Transport + 'static, session: Session) -> Self {
        Self::from_arc(Arc::new(transport), session)
    }

    /// Create a client over a shared transport.
    pub fn from_arc(transport: Arc<dyn Transport>, session: Session) -> Self {
        Self { transport, session }
    }

    /// Get the session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Bearer token for the next call, if one is stored.
    pub async fn token(&self) -> Result<Option<String>, CacheError> {
        self.session.token().await
    }

    /// Send a request, turning non-2xx answers into [`FetchError::Http`].
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, FetchError> {
        let path = request.path.clone();
        let response = self.transport.send(request).await?;
        response.error_for_status(&path)
    }
}

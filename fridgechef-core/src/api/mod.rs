//! Typed surface over the backend REST API.
//!
//! Endpoint groups live in submodules as `impl ApiClient` blocks; everything
//! funnels through the injected [`Transport`].

mod ai;
mod auth;
mod board;
mod favorites;
mod ratings;
mod recipes;

use std::sync::Arc;

use crate::auth::Session;
use crate::config::Config;
use crate::error::ApiError;
use crate::transport::{HttpTransport, Transport};

pub use ai::AiSession;

/// Client for the recipe backend.
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: Arc<Session>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, session: Arc<Session>) -> Self {
        Self { transport, session }
    }

    /// Build a production client from configuration and a token session.
    pub fn connect(config: &Config, session: Arc<Session>) -> Result<Self, ApiError> {
        let transport = HttpTransport::new(config, Arc::clone(&session))?;
        Ok(Self::new(Arc::new(transport), session))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }
}

//! Static launcher
//!
//! A [`SmartLauncher`] for launches completed outside this process: the token
//! response values are provided through configuration and `ready()` only
//! builds the [`HttpSession`].

use super::{HttpSession, SessionHandle, SmartLauncher};
use crate::config::SessionConfig;
use crate::domain::{EmrError, Result, TokenClaims, VendorTag};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use std::sync::Arc;

/// Launcher over an already-completed token response
#[derive(Debug, Clone)]
pub struct StaticLauncher {
    config: SessionConfig,
}

impl StaticLauncher {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    /// Vendor forced by configuration, if any
    pub fn configured_vendor(&self) -> Option<VendorTag> {
        self.config.vendor
    }
}

#[async_trait]
impl SmartLauncher for StaticLauncher {
    async fn ready(&self) -> Result<Arc<dyn SessionHandle>> {
        let has_token = self
            .config
            .access_token
            .as_ref()
            .is_some_and(|token| !token.expose_secret().is_blank());
        if !has_token {
            tracing::warn!(
                server_url = %self.config.server_url,
                "No access token configured, requests will be sent unauthenticated"
            );
        }

        let session = HttpSession::new(&self.config)?;
        Ok(Arc::new(session))
    }

    fn token_claims(&self) -> Result<Option<TokenClaims>> {
        let Some(ref id_token) = self.config.id_token else {
            return Ok(None);
        };
        let token: &str = id_token.expose_secret().as_ref();
        TokenClaims::from_jwt(token)
            .map(Some)
            .map_err(|e| EmrError::InvalidInput(format!("session.id_token: {e}")))
    }
}

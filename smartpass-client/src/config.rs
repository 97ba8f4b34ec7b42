//! Client configuration

use std::sync::Arc;

use shared::models::IdentifierSource;
use smartpass_qr::{DEFAULT_PATH_PREFIX, QrCodec, QrOptions, QrResult, VerificationUrl};

use crate::api::SmartPassClient;
use crate::error::ClientResult;
use crate::session::{NoSession, SessionProvider, StaticSession};

/// Hosted API used by the admin front-end
pub const DEFAULT_API_URL: &str = "https://smartpass-api.onrender.com";

/// Where the public badge page is served during development
pub const DEFAULT_PUBLIC_ORIGIN: &str = "http://localhost:3000";

/// Client configuration for one SmartPass deployment
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// REST API base URL (e.g., "https://smartpass-api.onrender.com")
    pub api_url: String,

    /// Origin of the public profile page; goes into every badge
    pub public_origin: String,

    /// Path prefix of the public profile route
    pub qr_path_prefix: String,

    /// Badge look
    pub qr_options: QrOptions,

    /// Which record field a badge identifies the employee by
    pub identifier_source: IdentifierSource,

    /// Bearer token for admin endpoints
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            public_origin: DEFAULT_PUBLIC_ORIGIN.to_string(),
            qr_path_prefix: DEFAULT_PATH_PREFIX.to_string(),
            qr_options: QrOptions::default(),
            identifier_source: IdentifierSource::default(),
            token: None,
            timeout: 30,
        }
    }

    /// Read `SMARTPASS_*` variables, falling back to defaults
    pub fn from_env() -> Self {
        let mut config = Self::new(
            std::env::var("SMARTPASS_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
        );

        if let Ok(origin) = std::env::var("SMARTPASS_PUBLIC_ORIGIN") {
            config.public_origin = origin;
        }
        if let Ok(prefix) = std::env::var("SMARTPASS_QR_PATH_PREFIX") {
            config.qr_path_prefix = prefix;
        }
        config.timeout = std::env::var("SMARTPASS_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(config.timeout);
        config.token = std::env::var("SMARTPASS_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());
        config.identifier_source = match std::env::var("SMARTPASS_IDENTIFIER_SOURCE") {
            Ok(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!(value = %raw, error = %e, "ignoring SMARTPASS_IDENTIFIER_SOURCE");
                IdentifierSource::default()
            }),
            Err(_) => IdentifierSource::default(),
        };

        config
    }

    pub fn with_public_origin(mut self, origin: impl Into<String>) -> Self {
        self.public_origin = origin.into();
        self
    }

    pub fn with_qr_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.qr_path_prefix = prefix.into();
        self
    }

    pub fn with_qr_options(mut self, options: QrOptions) -> Self {
        self.qr_options = options;
        self
    }

    pub fn with_identifier_source(mut self, source: IdentifierSource) -> Self {
        self.identifier_source = source;
        self
    }

    /// Set the JWT token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Codec for this deployment's origin, prefix and look
    pub fn build_codec(&self) -> QrResult<QrCodec> {
        let url = VerificationUrl::new(&self.public_origin)?.with_path_prefix(&self.qr_path_prefix)?;
        QrCodec::new(url, self.qr_options)
    }

    /// Client whose session is the configured token (or none)
    pub fn build_client(&self) -> ClientResult<SmartPassClient> {
        let session: Arc<dyn SessionProvider> = match &self.token {
            Some(token) => Arc::new(StaticSession::new(token.clone())),
            None => Arc::new(NoSession),
        };
        SmartPassClient::with_session(self, session)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

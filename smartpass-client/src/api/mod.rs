//! Typed SmartPass endpoints
//!
//! Each submodule adds one resource's calls to [`SmartPassClient`].

mod activity;
mod employees;
mod public;
mod users;

use std::sync::Arc;

use serde::Deserialize;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::http::HttpClient;
use crate::session::SessionProvider;

pub use public::Resolution;

/// Client for one SmartPass API deployment
#[derive(Debug, Clone)]
pub struct SmartPassClient {
    http: HttpClient,
}

impl SmartPassClient {
    pub fn with_session(
        config: &ClientConfig,
        session: Arc<dyn SessionProvider>,
    ) -> ClientResult<Self> {
        Ok(Self {
            http: HttpClient::new(&config.api_url, config.timeout, session)?,
        })
    }

    /// Underlying HTTP client, for endpoints without a typed wrapper
    pub fn http(&self) -> &HttpClient {
        &self.http
    }
}

/// A single record, sent bare or wrapped as `{ "<entity>": {...} }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Envelope<R> {
    Wrapped {
        #[serde(alias = "employee", alias = "user")]
        data: R,
    },
    Bare(R),
}

impl<R> Envelope<R> {
    fn into_inner(self) -> R {
        match self {
            Envelope::Wrapped { data } | Envelope::Bare(data) => data,
        }
    }
}

/// Multipart field both photo endpoints read
const PHOTO_FIELD: &str = "profilePic";

/// Reply to a photo upload: the stored picture's reference
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PhotoReply {
    #[serde(alias = "photo")]
    profile_pic: Option<String>,
}

impl SmartPassClient {
    async fn upload_photo(
        &self,
        path: &str,
        bytes: Vec<u8>,
        file_name: &str,
    ) -> ClientResult<String> {
        let reply: Envelope<PhotoReply> = self
            .http
            .post_multipart(path, PHOTO_FIELD, file_name, bytes)
            .await?;
        reply
            .into_inner()
            .profile_pic
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| {
                ClientError::InvalidResponse("upload reply has no profilePic".to_string())
            })
    }
}

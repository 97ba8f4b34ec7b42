//! HTTP client for the SmartPass REST API

use std::sync::Arc;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ClientError, ClientResult};
use crate::session::SessionProvider;

/// Thin `reqwest` wrapper: base URL, bearer token, status mapping
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    session: Arc<dyn SessionProvider>,
}

impl HttpClient {
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        session: Arc<dyn SessionProvider>,
    ) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ClientError::Config(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `path` starts with `/`
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build authorization header value
    fn auth_header(&self) -> Option<String> {
        self.session.bearer_token().map(|t| format!("Bearer {}", t))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.auth_header() {
            Some(auth) => request.header(reqwest::header::AUTHORIZATION, auth),
            None => request,
        }
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.get_query(path, &[]).await
    }

    /// Make a GET request with query-string pairs
    pub async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ClientResult<T> {
        tracing::debug!(path, params = query.len(), "GET");
        let request = self.authorized(self.client.get(self.url(path)).query(query));
        Self::handle_response(request.send().await?).await
    }

    /// GET without credentials, for endpoints anyone holding a badge may call
    pub async fn get_public<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        tracing::debug!(path, "GET (public)");
        let response = self.client.get(self.url(path)).send().await?;
        Self::handle_response(response).await
    }

    /// GET a raw body (file downloads)
    pub async fn get_bytes(&self, path: &str) -> ClientResult<Vec<u8>> {
        tracing::debug!(path, "GET (bytes)");
        let response = self.authorized(self.client.get(self.url(path))).send().await?;
        let bytes = Self::check(response).await?.bytes().await?;
        Ok(bytes.to_vec())
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        tracing::debug!(path, "POST");
        let request = self.authorized(self.client.post(self.url(path)).json(body));
        Self::handle_response(request.send().await?).await
    }

    /// POST whose reply body is not needed
    pub async fn post_discard<B: Serialize>(&self, path: &str, body: &B) -> ClientResult<()> {
        tracing::debug!(path, "POST");
        let request = self.authorized(self.client.post(self.url(path)).json(body));
        Self::check(request.send().await?).await?;
        Ok(())
    }

    /// POST one file as `multipart/form-data` under `field`
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        field: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<T> {
        tracing::debug!(path, field, file_name, size = bytes.len(), "POST (multipart)");
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime_for(file_name))?;
        let form = Form::new().part(field.to_string(), part);
        let request = self.authorized(self.client.post(self.url(path)).multipart(form));
        Self::handle_response(request.send().await?).await
    }

    /// PUT a JSON body; the reply body, if any, is ignored
    pub async fn put<B: Serialize>(&self, path: &str, body: &B) -> ClientResult<()> {
        tracing::debug!(path, "PUT");
        let request = self.authorized(self.client.put(self.url(path)).json(body));
        Self::check(request.send().await?).await?;
        Ok(())
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        tracing::debug!(path, "DELETE");
        let request = self.authorized(self.client.delete(self.url(path)));
        Self::check(request.send().await?).await?;
        Ok(())
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        Self::check(response).await?.json().await.map_err(Into::into)
    }

    /// Turn a non-success status into the matching error
    async fn check(response: Response) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let path = response.url().path().to_string();
        let message = error_message(response.text().await.unwrap_or_default(), status);
        tracing::warn!(status = status.as_u16(), path = %path, message = %message, "request failed");

        Err(match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
            StatusCode::FORBIDDEN => ClientError::Forbidden(message),
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ClientError::Validation(message)
            }
            StatusCode::CONFLICT => ClientError::Conflict(message),
            _ => ClientError::Server {
                status: status.as_u16(),
                message,
            },
        })
    }
}

/// Content type for an uploaded image, from its extension
fn mime_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Backends answer errors as `{ "message": ... }`, `{ "error": ... }` or plain text
fn error_message(text: String, status: StatusCode) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: Option<String>,
        error: Option<String>,
    }

    let unwrapped = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|b| b.message.or(b.error))
        .filter(|m| !m.trim().is_empty());

    match unwrapped {
        Some(message) => message,
        None if text.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
        None => text,
    }
}

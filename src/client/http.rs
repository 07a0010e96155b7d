//! HTTP transport for the Mealie API.
//!
//! Every call performs exactly one network round trip and returns a
//! [`Response`] envelope. A non-2xx status is still an envelope (with
//! [`Status::Failure`]), never an error; only transport-level problems
//! (connection refused, timeout, a body that is not JSON) raise [`HttpError`].
//! No retries happen at this layer.

use reqwest::header::HeaderMap;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::client::error::HttpError;

/// Success/failure classification of one round trip.
///
/// `Success` iff the HTTP status was in the 2xx range, independent of the
/// body content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Failure,
}

/// The envelope returned by every transport call.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: Status,
    pub status_code: u16,
    /// Raw decoded JSON body. `None` when the server sent an empty body.
    pub data: Option<Value>,
}

impl Response {
    /// The decoded body, treating an empty body, a literal JSON `null`, and
    /// empty containers (`{}`, `[]`, `""`) the same way. The meal-plan
    /// endpoints answer with any of these when nothing is planned.
    pub fn body(&self) -> Option<&Value> {
        match &self.data {
            Some(Value::Null) | None => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(Value::Array(items)) if items.is_empty() => None,
            Some(Value::Object(map)) if map.is_empty() => None,
            Some(value) => Some(value),
        }
    }
}

pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub async fn get(&self, url: &str, headers: HeaderMap) -> Result<Response, HttpError> {
        tracing::debug!(%url, "GET");
        let resp = self.client.get(url).headers(headers).send().await?;
        Self::into_envelope(resp).await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        url: &str,
        headers: HeaderMap,
        body: &B,
    ) -> Result<Response, HttpError> {
        tracing::debug!(%url, "POST");
        let resp = self
            .client
            .post(url)
            .headers(headers)
            .json(body)
            .send()
            .await?;
        Self::into_envelope(resp).await
    }

    pub async fn put<B: Serialize + ?Sized>(
        &self,
        url: &str,
        headers: HeaderMap,
        body: &B,
    ) -> Result<Response, HttpError> {
        tracing::debug!(%url, "PUT");
        let resp = self
            .client
            .put(url)
            .headers(headers)
            .json(body)
            .send()
            .await?;
        Self::into_envelope(resp).await
    }

    async fn into_envelope(resp: reqwest::Response) -> Result<Response, HttpError> {
        let status_code = resp.status().as_u16();
        let status = if resp.status().is_success() {
            Status::Success
        } else {
            Status::Failure
        };

        let bytes = resp.bytes().await?;
        let data = if bytes.is_empty() {
            None
        } else {
            Some(serde_json::from_slice(&bytes)?)
        };

        tracing::debug!(status_code, has_body = data.is_some(), "response");
        Ok(Response {
            status,
            status_code,
            data,
        })
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

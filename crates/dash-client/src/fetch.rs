//! Remote fetch wrapper
//!
//! One authenticated GET, raising on any non-2xx status. Every API client in
//! this crate goes through [`HttpFetcher`], so status handling lives in one place.

use crate::error::{ClientError, Result};
use reqwest::{Client, Response};
use serde_json::Value;

/// Query parameters as sent on the wire
pub type QueryParams<'a> = [(&'a str, String)];

/// One page of a paginated list endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub body: Value,
    /// Value of the `x-next-page` header; `None` on the last page
    pub next_page: Option<u32>,
}

/// Thin wrapper around a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher with the default client settings.
    ///
    /// No request timeout is configured: a hung request simply waits until
    /// the owning task is cancelled.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("homedash/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    async fn send(
        &self,
        url: &str,
        query: &QueryParams<'_>,
        bearer: Option<&str>,
    ) -> Result<Response> {
        let mut request = self.client.get(url).query(query);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            log::warn!("GET {} returned {}", url, status);
            return Err(ClientError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }

    async fn decode(response: Response, url: &str) -> Result<Value> {
        response
            .json::<Value>()
            .await
            .map_err(|e| ClientError::Decode(format!("{}: {}", url, e)))
    }

    /// GET `url` and decode the body as JSON.
    ///
    /// `bearer` is sent as `Authorization: Bearer <token>` when present.
    pub async fn get_json(
        &self,
        url: &str,
        query: &QueryParams<'_>,
        bearer: Option<&str>,
    ) -> Result<Value> {
        let response = self.send(url, query, bearer).await?;
        Self::decode(response, url).await
    }

    /// Like [`get_json`](Self::get_json), but also reads GitLab's
    /// `x-next-page` header. An empty or missing header marks the last page.
    pub async fn get_page(
        &self,
        url: &str,
        query: &QueryParams<'_>,
        bearer: Option<&str>,
    ) -> Result<Page> {
        let response = self.send(url, query, bearer).await?;
        let next_page = response
            .headers()
            .get("x-next-page")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse().ok());
        let body = Self::decode(response, url).await?;
        Ok(Page { body, next_page })
    }
}

use crate::api::OfferApi;
use crate::config::ApiConfig;
use crate::error::RequestError;
use crate::models::{CommentPayload, FavoritePayload, Offer, Review};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

const TOKEN_HEADER: &str = "X-Token";

/// Error body returned by the listings server
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    messages: Vec<String>,
    #[serde(default)]
    details: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    messages: Vec<String>,
}

#[derive(Debug, Serialize)]
struct CommentBody<'a> {
    comment: &'a str,
    rating: u8,
}

/// Turn a server error body into user-facing messages.
///
/// Detail messages win over the top-level message. Returns `None` when the
/// body is not the server's error shape.
pub fn parse_error_body(body: &str) -> Option<RequestError> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;

    let detail_messages: Vec<String> = parsed
        .details
        .into_iter()
        .flat_map(|detail| detail.messages)
        .collect();

    RequestError::new(parsed.messages)
        .or_else(|| RequestError::new(detail_messages))
        .or_else(|| parsed.message.map(RequestError::single))
}

/// REST client for the listings server
pub struct HttpApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpApi {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("offer-sync/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.header(TOKEN_HEADER, token),
            None => request,
        }
    }

    /// Send a request and fail on non-success status, keeping structured errors
    async fn send(&self, request: RequestBuilder, what: &str) -> Result<Response> {
        let response = self
            .authorized(request)
            .send()
            .await
            .with_context(|| format!("Failed to {}", what))?;

        let status = response.status();
        if status.is_success() {
            debug!("{} returned {}", what, status);
            return Ok(response);
        }

        warn!("{} returned status: {}", what, status);
        let body = response.text().await.unwrap_or_default();
        match parse_error_body(&body) {
            Some(error) => Err(anyhow::Error::new(error).context(format!("Failed to {}: {}", what, status))),
            None => anyhow::bail!("Failed to {}: {}", what, status),
        }
    }
}

#[async_trait]
impl OfferApi for HttpApi {
    async fn fetch_offers(&self) -> Result<Vec<Offer>> {
        let response = self
            .send(self.client.get(self.url("/offers")), "fetch offers")
            .await?;
        response.json().await.context("Failed to decode offers")
    }

    async fn fetch_nearby_offers(&self, offer_id: &str) -> Result<Vec<Offer>> {
        let url = self.url(&format!("/offers/{}/nearby", offer_id));
        let response = self
            .send(self.client.get(url), "fetch nearby offers")
            .await?;
        response.json().await.context("Failed to decode nearby offers")
    }

    async fn fetch_comments(&self, offer_id: &str) -> Result<Vec<Review>> {
        let url = self.url(&format!("/comments/{}", offer_id));
        let response = self.send(self.client.get(url), "fetch comments").await?;
        response.json().await.context("Failed to decode comments")
    }

    async fn post_comment(&self, payload: &CommentPayload) -> Result<Review> {
        let url = self.url(&format!("/comments/{}", payload.offer_id));
        let body = CommentBody {
            comment: &payload.comment,
            rating: payload.rating,
        };
        let response = self
            .send(self.client.post(url).json(&body), "post comment")
            .await?;
        response.json().await.context("Failed to decode posted comment")
    }

    async fn toggle_favorite(&self, payload: &FavoritePayload) -> Result<Offer> {
        let status = if payload.status { 1 } else { 0 };
        let url = self.url(&format!("/favorite/{}/{}", payload.offer_id, status));
        let response = self
            .send(self.client.post(url), "toggle favorite")
            .await?;
        response.json().await.context("Failed to decode favorite offer")
    }

    async fn logout(&self) -> Result<()> {
        self.send(self.client.delete(self.url("/logout")), "log out")
            .await?;
        Ok(())
    }

    fn source_name(&self) -> &'static str {
        "HTTP"
    }
}

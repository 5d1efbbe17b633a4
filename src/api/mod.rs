pub mod http;
pub mod mock;

pub use http::HttpApi;
pub use mock::MockApi;

use crate::models::{CommentPayload, FavoritePayload, Offer, Review};
use anyhow::Result;
use async_trait::async_trait;

/// Transport used by the store for every remote operation.
///
/// A failure carrying a [`crate::error::RequestError`] is shown to the user
/// as is; any other error is replaced by the generic fallback.
#[async_trait]
pub trait OfferApi: Send + Sync {
    async fn fetch_offers(&self) -> Result<Vec<Offer>>;

    async fn fetch_nearby_offers(&self, offer_id: &str) -> Result<Vec<Offer>>;

    async fn fetch_comments(&self, offer_id: &str) -> Result<Vec<Review>>;

    async fn post_comment(&self, payload: &CommentPayload) -> Result<Review>;

    /// Returns the offer with its updated favorite flag
    async fn toggle_favorite(&self, payload: &FavoritePayload) -> Result<Offer>;

    async fn logout(&self) -> Result<()>;

    /// Get the name of the backend
    fn source_name(&self) -> &'static str;
}

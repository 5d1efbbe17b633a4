use crate::api::OfferApi;
use crate::error::RequestError;
use crate::models::{City, CommentPayload, FavoritePayload, Location, Offer, Review, ReviewAuthor};
use crate::selectors::{MAX_COMMENT_LENGTH, MIN_COMMENT_LENGTH};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

const NEARBY_LIMIT: usize = 3;

/// How a mocked operation should fail
#[derive(Debug, Clone)]
pub enum Failure {
    Structured(RequestError),
    Unstructured(String),
}

#[derive(Default)]
struct MockData {
    offers: Vec<Offer>,
    comments: HashMap<String, Vec<Review>>,
    failures: HashMap<&'static str, Failure>,
    delays: HashMap<&'static str, Vec<Duration>>,
    posted: usize,
}

/// In-memory listings backend for demos and tests.
///
/// Operations are keyed by their action names (`fetchOffers`, `postComment`, ...)
/// when injecting failures or delays.
#[derive(Default)]
pub struct MockApi {
    data: Mutex<MockData>,
}

impl MockApi {
    pub fn new(offers: Vec<Offer>) -> Self {
        Self {
            data: Mutex::new(MockData {
                offers,
                ..MockData::default()
            }),
        }
    }

    /// Backend preloaded with a handful of offers across cities
    pub fn sample() -> Self {
        let mut comments = HashMap::new();
        comments.insert(
            "paris-1".to_string(),
            vec![review("paris-1-r1", 4), review("paris-1-r2", 5)],
        );

        Self {
            data: Mutex::new(MockData {
                offers: sample_offers(),
                comments,
                ..MockData::default()
            }),
        }
    }

    /// Make every call of `operation` fail until cleared
    pub async fn fail(&self, operation: &'static str, failure: Failure) {
        self.data.lock().await.failures.insert(operation, failure);
    }

    pub async fn clear_failures(&self) {
        self.data.lock().await.failures.clear();
    }

    /// Queue a delay for the next call of `operation`
    pub async fn delay_next(&self, operation: &'static str, delay: Duration) {
        self.data
            .lock()
            .await
            .delays
            .entry(operation)
            .or_default()
            .push(delay);
    }

    pub async fn set_offers(&self, offers: Vec<Offer>) {
        self.data.lock().await.offers = offers;
    }

    /// Apply the injected delay and failure for one call
    async fn enter(&self, operation: &'static str) -> Result<()> {
        let (delay, failure) = {
            let mut data = self.data.lock().await;
            let delay = data.delays.get_mut(operation).and_then(|queued| {
                if queued.is_empty() {
                    None
                } else {
                    Some(queued.remove(0))
                }
            });
            (delay, data.failures.get(operation).cloned())
        };

        if let Some(delay) = delay {
            debug!("Delaying {} by {:?}", operation, delay);
            tokio::time::sleep(delay).await;
        }

        match failure {
            Some(Failure::Structured(error)) => Err(error.into()),
            Some(Failure::Unstructured(message)) => Err(anyhow::anyhow!(message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl OfferApi for MockApi {
    /// The response is taken before any injected delay, so a slow call
    /// returns the offers as they were when it started.
    async fn fetch_offers(&self) -> Result<Vec<Offer>> {
        let offers = self.data.lock().await.offers.clone();
        self.enter("fetchOffers").await?;
        info!("Serving {} mock offers", offers.len());
        Ok(offers)
    }

    async fn fetch_nearby_offers(&self, offer_id: &str) -> Result<Vec<Offer>> {
        self.enter("fetchNearbyOffers").await?;
        let data = self.data.lock().await;
        let origin = data
            .offers
            .iter()
            .find(|offer| offer.id == offer_id)
            .ok_or_else(|| not_found(offer_id))?;

        Ok(data
            .offers
            .iter()
            .filter(|offer| offer.id != origin.id && offer.city.name == origin.city.name)
            .take(NEARBY_LIMIT)
            .cloned()
            .collect())
    }

    async fn fetch_comments(&self, offer_id: &str) -> Result<Vec<Review>> {
        self.enter("fetchComments").await?;
        let data = self.data.lock().await;
        if !data.offers.iter().any(|offer| offer.id == offer_id) {
            return Err(not_found(offer_id));
        }
        Ok(data.comments.get(offer_id).cloned().unwrap_or_default())
    }

    async fn post_comment(&self, payload: &CommentPayload) -> Result<Review> {
        self.enter("postComment").await?;

        let mut problems = Vec::new();
        let length = payload.comment.chars().count();
        if !(MIN_COMMENT_LENGTH..=MAX_COMMENT_LENGTH).contains(&length) {
            problems.push(format!(
                "comment must be between {} and {} characters",
                MIN_COMMENT_LENGTH, MAX_COMMENT_LENGTH
            ));
        }
        if !(1..=5).contains(&payload.rating) {
            problems.push("rating must be between 1 and 5".to_string());
        }
        if let Some(error) = RequestError::new(problems) {
            return Err(error.into());
        }

        let mut data = self.data.lock().await;
        if !data.offers.iter().any(|offer| offer.id == payload.offer_id) {
            return Err(not_found(&payload.offer_id));
        }

        data.posted += 1;
        let review = Review {
            id: format!("{}-posted-{}", payload.offer_id, data.posted),
            date: Utc::now(),
            user: guest(),
            comment: payload.comment.clone(),
            rating: payload.rating,
        };
        data.comments
            .entry(payload.offer_id.clone())
            .or_default()
            .push(review.clone());
        Ok(review)
    }

    async fn toggle_favorite(&self, payload: &FavoritePayload) -> Result<Offer> {
        self.enter("toggleFavorite").await?;
        let mut data = self.data.lock().await;
        let offer = data
            .offers
            .iter_mut()
            .find(|offer| offer.id == payload.offer_id)
            .ok_or_else(|| not_found(&payload.offer_id))?;
        offer.is_favorite = payload.status;
        Ok(offer.clone())
    }

    async fn logout(&self) -> Result<()> {
        self.enter("logout").await?;
        let mut data = self.data.lock().await;
        for offer in data.offers.iter_mut() {
            offer.is_favorite = false;
        }
        Ok(())
    }

    fn source_name(&self) -> &'static str {
        "Mock"
    }
}

fn not_found(offer_id: &str) -> anyhow::Error {
    RequestError::single(format!("Offer with id {} not found", offer_id)).into()
}

fn guest() -> ReviewAuthor {
    ReviewAuthor {
        name: "Guest".to_string(),
        avatar_url: "img/avatar.svg".to_string(),
        is_pro: false,
    }
}

fn city(name: &str) -> City {
    let (latitude, longitude) = match name {
        "Paris" => (48.85661, 2.351499),
        "Cologne" => (50.938361, 6.959974),
        "Brussels" => (50.846557, 4.351697),
        "Amsterdam" => (52.37454, 4.897976),
        "Hamburg" => (53.550341, 10.000654),
        "Dusseldorf" => (51.225402, 6.776314),
        _ => (0.0, 0.0),
    };
    City {
        name: name.to_string(),
        location: Location {
            latitude,
            longitude,
            zoom: 13,
        },
    }
}

/// Build an offer with the fields the derivations care about
pub fn offer(id: &str, city_name: &str, price: u32, rating: f64) -> Offer {
    let city = city(city_name);
    Offer {
        id: id.to_string(),
        title: format!("Stay {} in {}", id, city_name),
        kind: "apartment".to_string(),
        price,
        location: Location { zoom: 16, ..city.location },
        city,
        is_favorite: false,
        is_premium: false,
        rating,
        preview_image: format!("img/{}.jpg", id),
    }
}

/// Build a review with a fixed date
pub fn review(id: &str, rating: u8) -> Review {
    Review {
        id: id.to_string(),
        date: Utc.timestamp_opt(1_715_177_636, 0).single().unwrap_or_default(),
        user: ReviewAuthor {
            name: "Oliver".to_string(),
            avatar_url: "img/avatar-max.jpg".to_string(),
            is_pro: true,
        },
        comment: "A quiet cozy and picturesque place that hides behind a river by the unique lightness of Amsterdam.".to_string(),
        rating,
    }
}

/// Offers served by [`MockApi::sample`]
pub fn sample_offers() -> Vec<Offer> {
    let mut offers = vec![
        offer("paris-1", "Paris", 120, 4.8),
        offer("paris-2", "Paris", 95, 4.1),
        offer("cologne-1", "Cologne", 80, 3.9),
        offer("paris-3", "Paris", 210, 4.8),
        offer("amsterdam-1", "Amsterdam", 150, 4.6),
        offer("cologne-2", "Cologne", 60, 4.4),
        offer("hamburg-1", "Hamburg", 110, 3.2),
    ];
    offers[0].is_premium = true;
    offers[3].is_favorite = true;
    offers[4].is_premium = true;
    offers
}

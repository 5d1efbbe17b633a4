//! Client-side state store.
//!
//! [`RootState`] composes the four slices. [`Store`] keeps it behind a
//! `tokio::sync::watch` channel so readers always see a fully applied
//! transition, and drives remote operations through the lifecycle phases.

pub mod action;
pub mod lifecycle;
pub mod slices;

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::OfferApi;
use crate::error::RequestError;
use crate::models::{CityName, CommentPayload, FavoritePayload, Offer, Review, SortOption};

pub use action::Action;
pub use lifecycle::{Loadable, Phase};
pub use slices::{CommentsState, CommonState, NearbyOffersState, OffersState};

/// Everything the UI reads
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RootState {
    pub offers: OffersState,
    pub nearby_offers: NearbyOffersState,
    pub comments: CommentsState,
    pub common: CommonState,
}

impl RootState {
    pub fn with_selection(common: CommonState) -> Self {
        Self {
            common,
            ..Self::default()
        }
    }

    /// Route an action to the single slice that owns it
    pub fn reduce(&mut self, action: Action) {
        match action {
            Action::FetchOffers(phase) => self.offers.fetch_offers(phase),
            Action::ToggleFavorite(phase) => self.offers.toggle_favorite(phase),
            Action::Logout(phase) => self.offers.logout(phase),
            Action::FetchNearbyOffers(phase) => self.nearby_offers.fetch_nearby_offers(phase),
            Action::FetchComments(phase) => self.comments.fetch_comments(phase),
            Action::PostComment(phase) => self.comments.post_comment(phase),
            Action::SetActiveCity(city) => self.common.set_active_city(city),
            Action::SetSortOption(option) => self.common.set_sort_option(option),
        }
    }
}

/// Shared handle to the application state and its transport
#[derive(Clone)]
pub struct Store {
    api: Arc<dyn OfferApi>,
    state: Arc<watch::Sender<RootState>>,
    next_request_id: Arc<AtomicU64>,
}

impl Store {
    pub fn new(api: Arc<dyn OfferApi>) -> Self {
        Self::with_state(api, RootState::default())
    }

    pub fn with_state(api: Arc<dyn OfferApi>, initial: RootState) -> Self {
        let (state, _) = watch::channel(initial);
        Self {
            api,
            state: Arc::new(state),
            next_request_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> RootState {
        self.state.borrow().clone()
    }

    /// Run `selector` on a snapshot of the state.
    ///
    /// The read lock is released before the closure runs, so it may dispatch.
    pub fn select<R>(&self, selector: impl FnOnce(&RootState) -> R) -> R {
        let snapshot = self.state();
        selector(&snapshot)
    }

    /// Receiver notified after every applied transition
    pub fn subscribe(&self) -> watch::Receiver<RootState> {
        self.state.subscribe()
    }

    /// Apply one transition atomically
    pub fn dispatch(&self, action: Action) {
        debug!(
            "Dispatching {} {}",
            action.name(),
            action.phase().unwrap_or("sync")
        );
        self.state.send_modify(|state| state.reduce(action));
    }

    pub fn set_active_city(&self, city: CityName) {
        self.dispatch(Action::SetActiveCity(city));
    }

    pub fn set_sort_option(&self, option: SortOption) {
        self.dispatch(Action::SetSortOption(option));
    }

    pub async fn fetch_offers(&self) -> Result<Vec<Offer>, RequestError> {
        let api = self.api.clone();
        self.run("fetchOffers", Action::FetchOffers, async move {
            api.fetch_offers().await
        })
        .await
    }

    pub async fn fetch_nearby_offers(&self, offer_id: &str) -> Result<Vec<Offer>, RequestError> {
        let api = self.api.clone();
        let offer_id = offer_id.to_string();
        self.run("fetchNearbyOffers", Action::FetchNearbyOffers, async move {
            api.fetch_nearby_offers(&offer_id).await
        })
        .await
    }

    pub async fn fetch_comments(&self, offer_id: &str) -> Result<Vec<Review>, RequestError> {
        let api = self.api.clone();
        let offer_id = offer_id.to_string();
        self.run("fetchComments", Action::FetchComments, async move {
            api.fetch_comments(&offer_id).await
        })
        .await
    }

    pub async fn post_comment(&self, payload: CommentPayload) -> Result<Review, RequestError> {
        let api = self.api.clone();
        self.run("postComment", Action::PostComment, async move {
            api.post_comment(&payload).await
        })
        .await
    }

    pub async fn toggle_favorite(&self, payload: FavoritePayload) -> Result<Offer, RequestError> {
        let api = self.api.clone();
        self.run("toggleFavorite", Action::ToggleFavorite, async move {
            api.toggle_favorite(&payload).await
        })
        .await
    }

    pub async fn logout(&self) -> Result<(), RequestError> {
        let api = self.api.clone();
        self.run("logout", Action::Logout, async move { api.logout().await })
            .await
    }

    /// Drive one invocation through pending and then exactly one settle phase.
    ///
    /// The request runs on its own task, so the slice settles even when the
    /// caller stops awaiting. Invocations cannot be cancelled.
    async fn run<T, Fut>(
        &self,
        operation: &'static str,
        wrap: fn(Phase<T>) -> Action,
        request: Fut,
    ) -> Result<T, RequestError>
    where
        T: Clone + Send + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        let request_id = self.next_request_id.fetch_add(1, Ordering::Relaxed);
        debug!("{} #{} pending", operation, request_id);
        self.dispatch(wrap(Phase::Pending));

        let store = self.clone();
        let task = tokio::spawn(async move {
            let result = request.await;
            store.settle(operation, request_id, wrap, result)
        });

        match task.await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!("{} #{} task failed: {}", operation, request_id, err);
                self.dispatch(wrap(Phase::Rejected(None)));
                Err(RequestError::fallback())
            }
        }
    }

    fn settle<T: Clone>(
        &self,
        operation: &'static str,
        request_id: u64,
        wrap: fn(Phase<T>) -> Action,
        result: anyhow::Result<T>,
    ) -> Result<T, RequestError> {
        match result {
            Ok(payload) => {
                info!("{} #{} fulfilled", operation, request_id);
                self.dispatch(wrap(Phase::Fulfilled(payload.clone())));
                Ok(payload)
            }
            Err(err) => {
                let rejection = RequestError::from_rejection(&err);
                warn!("{} #{} rejected: {:#}", operation, request_id, err);
                let error = RequestError::normalize(rejection.clone());
                self.dispatch(wrap(Phase::Rejected(rejection)));
                Err(error)
            }
        }
    }
}

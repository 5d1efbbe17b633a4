//! State containers, one per domain concern.
//!
//! Each slice owns its fields and exposes only its own transitions.

use std::ops::Deref;

use tracing::debug;

use crate::models::{CityName, Offer, Review, SortOption};
use crate::store::lifecycle::{Loadable, Phase};

/// Main offers list, including favorite markers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OffersState(Loadable<Vec<Offer>>);

impl OffersState {
    pub fn offers(&self) -> &[Offer] {
        self.0.data()
    }

    pub fn fetch_offers(&mut self, phase: Phase<Vec<Offer>>) {
        self.0.apply(phase, |offers, payload| *offers = payload);
    }

    /// Copy the favorite flag of the returned offer onto the stored one.
    /// Unknown ids are ignored.
    pub fn toggle_favorite(&mut self, phase: Phase<Offer>) {
        self.0.apply(phase, |offers, updated| {
            match offers.iter_mut().find(|offer| offer.id == updated.id) {
                Some(offer) => offer.is_favorite = updated.is_favorite,
                None => debug!("Favorite update for unknown offer {}", updated.id),
            }
        });
    }

    /// Clear every favorite marker once the session has ended
    pub fn logout(&mut self, phase: Phase<()>) {
        self.0.apply(phase, |offers, ()| {
            for offer in offers.iter_mut() {
                offer.is_favorite = false;
            }
        });
    }
}

impl Deref for OffersState {
    type Target = Loadable<Vec<Offer>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Offers near the one currently opened
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NearbyOffersState(Loadable<Vec<Offer>>);

impl NearbyOffersState {
    pub fn offers(&self) -> &[Offer] {
        self.0.data()
    }

    pub fn fetch_nearby_offers(&mut self, phase: Phase<Vec<Offer>>) {
        self.0.apply(phase, |offers, payload| *offers = payload);
    }
}

impl Deref for NearbyOffersState {
    type Target = Loadable<Vec<Offer>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Reviews of the offer currently opened
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentsState(Loadable<Vec<Review>>);

impl CommentsState {
    pub fn comments(&self) -> &[Review] {
        self.0.data()
    }

    pub fn fetch_comments(&mut self, phase: Phase<Vec<Review>>) {
        self.0.apply(phase, |comments, payload| *comments = payload);
    }

    pub fn post_comment(&mut self, phase: Phase<Review>) {
        self.0.apply(phase, |comments, review| comments.push(review));
    }
}

impl Deref for CommentsState {
    type Target = Loadable<Vec<Review>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Active city and sort option
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommonState {
    city: CityName,
    sort_option: SortOption,
}

impl CommonState {
    pub fn new(city: CityName, sort_option: SortOption) -> Self {
        Self { city, sort_option }
    }

    pub fn city(&self) -> CityName {
        self.city
    }

    pub fn sort_option(&self) -> SortOption {
        self.sort_option
    }

    /// Switching city always resets the sort order.
    pub fn set_active_city(&mut self, city: CityName) {
        self.city = city;
        self.sort_option = SortOption::default();
    }

    pub fn set_sort_option(&mut self, option: SortOption) {
        self.sort_option = option;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{offer, review};
    use crate::error::RequestError;

    fn loaded_offers() -> OffersState {
        let mut state = OffersState::default();
        let mut favorite = offer("2", "Cologne", 90, 4.0);
        favorite.is_favorite = true;
        state.fetch_offers(Phase::Pending);
        state.fetch_offers(Phase::Fulfilled(vec![
            offer("1", "Paris", 120, 4.5),
            favorite,
            offer("3", "Paris", 80, 3.1),
        ]));
        state
    }

    #[test]
    fn fetch_replaces_offers_in_order() {
        let mut state = loaded_offers();
        let payload = vec![offer("9", "Hamburg", 50, 2.0), offer("8", "Hamburg", 60, 3.0)];

        state.fetch_offers(Phase::Pending);
        assert_eq!(state.offers().len(), 3);

        state.fetch_offers(Phase::Fulfilled(payload.clone()));
        assert_eq!(state.offers(), payload.as_slice());
        assert!(!state.is_loading());
        assert!(state.error().is_none());
    }

    #[test]
    fn toggle_favorite_touches_only_the_matching_flag() {
        let mut state = loaded_offers();
        let before = state.offers().to_vec();

        let mut updated = offer("3", "Somewhere else", 1, 0.0);
        updated.is_favorite = true;
        state.toggle_favorite(Phase::Pending);
        state.toggle_favorite(Phase::Fulfilled(updated));

        let after = state.offers();
        assert!(after[2].is_favorite);
        assert_eq!(after[2].price, 80);
        assert_eq!(after[2].city.name, "Paris");
        assert_eq!(after[0], before[0]);
        assert_eq!(after[1], before[1]);
    }

    #[test]
    fn toggle_favorite_miss_is_ignored() {
        let mut state = loaded_offers();
        let before = state.offers().to_vec();

        state.toggle_favorite(Phase::Pending);
        state.toggle_favorite(Phase::Fulfilled(offer("404", "Paris", 1, 1.0)));

        assert_eq!(state.offers(), before.as_slice());
        assert!(state.error().is_none());
    }

    #[test]
    fn toggle_favorite_rejection_keeps_flags() {
        let mut state = loaded_offers();
        let before = state.offers().to_vec();

        state.toggle_favorite(Phase::Pending);
        state.toggle_favorite(Phase::Rejected(None));

        assert_eq!(state.offers(), before.as_slice());
        assert_eq!(state.error(), Some(&RequestError::fallback()));
        assert!(!state.is_loading());
    }

    #[test]
    fn logout_clears_every_favorite() {
        let mut state = loaded_offers();
        state.logout(Phase::Pending);
        state.logout(Phase::Fulfilled(()));
        assert!(state.offers().iter().all(|offer| !offer.is_favorite));
        assert_eq!(state.offers().len(), 3);
    }

    #[test]
    fn nearby_fetch_replaces_list() {
        let mut state = NearbyOffersState::default();
        state.fetch_nearby_offers(Phase::Pending);
        assert!(state.is_loading());
        state.fetch_nearby_offers(Phase::Fulfilled(vec![offer("5", "Paris", 10, 1.0)]));
        assert_eq!(state.offers().len(), 1);
        assert!(!state.is_loading());
    }

    #[test]
    fn post_comment_appends_one_review() {
        let mut state = CommentsState::default();
        state.fetch_comments(Phase::Pending);
        state.fetch_comments(Phase::Fulfilled(vec![review("a", 4), review("b", 5)]));

        state.post_comment(Phase::Pending);
        state.post_comment(Phase::Fulfilled(review("a", 4)));

        let ids: Vec<_> = state.comments().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "a"]);
        assert!(!state.is_loading());
    }

    #[test]
    fn post_comment_rejection_keeps_reviews() {
        let mut state = CommentsState::default();
        state.fetch_comments(Phase::Fulfilled(vec![review("a", 4)]));

        let error = RequestError::single("Comment is too short");
        state.post_comment(Phase::Pending);
        state.post_comment(Phase::Rejected(Some(error.clone())));

        assert_eq!(state.comments().len(), 1);
        assert_eq!(state.error(), Some(&error));
        assert!(!state.is_loading());
    }

    #[test]
    fn active_city_resets_sort_and_is_idempotent() {
        let mut state = CommonState::default();
        assert_eq!(state.city(), CityName::Paris);
        assert_eq!(state.sort_option(), SortOption::Popular);

        state.set_sort_option(SortOption::TopRatedFirst);
        state.set_active_city(CityName::Amsterdam);
        let once = state;
        state.set_active_city(CityName::Amsterdam);

        assert_eq!(state, once);
        assert_eq!(state.sort_option(), SortOption::Popular);
    }

    #[test]
    fn sort_option_leaves_city_alone() {
        let mut state = CommonState::new(CityName::Hamburg, SortOption::Popular);
        state.set_sort_option(SortOption::PriceHighToLow);
        assert_eq!(state.city(), CityName::Hamburg);
        assert_eq!(state.sort_option(), SortOption::PriceHighToLow);
    }
}

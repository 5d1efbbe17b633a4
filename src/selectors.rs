//! Pure views computed from store state on every read.

use std::cmp::Ordering;

use crate::models::{City, Offer, SortOption};

pub const MIN_COMMENT_LENGTH: usize = 50;
pub const MAX_COMMENT_LENGTH: usize = 300;

/// Star values in the order the review form shows them
pub const STARS: [u8; 5] = [5, 4, 3, 2, 1];

/// City to center the map on.
///
/// Prefers the city of the first offer matching `active_city`, then the first
/// offer's city, so a loaded list always has something to render.
pub fn resolve_city<'a>(offers: &'a [Offer], active_city: &str) -> Option<&'a City> {
    offers
        .iter()
        .find(|offer| offer.city.name == active_city)
        .or_else(|| offers.first())
        .map(|offer| &offer.city)
}

pub fn offers_in_city<'a>(offers: &'a [Offer], city: &str) -> Vec<&'a Offer> {
    offers.iter().filter(|offer| offer.city.name == city).collect()
}

fn compare(option: SortOption, a: &Offer, b: &Offer) -> Ordering {
    match option {
        SortOption::Popular => Ordering::Equal,
        SortOption::PriceLowToHigh => a.price.cmp(&b.price),
        SortOption::PriceHighToLow => b.price.cmp(&a.price),
        SortOption::TopRatedFirst => b.rating.total_cmp(&a.rating),
    }
}

/// Stable sort into a new list; the input is left untouched.
/// `Popular` keeps the server order.
pub fn sort_offers<'a, I>(offers: I, option: SortOption) -> Vec<&'a Offer>
where
    I: IntoIterator<Item = &'a Offer>,
{
    let mut sorted: Vec<&Offer> = offers.into_iter().collect();
    sorted.sort_by(|a, b| compare(option, a, b));
    sorted
}

/// Favorite offers grouped by city, groups in first-seen order
pub fn favorites_by_city(offers: &[Offer]) -> Vec<(&str, Vec<&Offer>)> {
    let mut groups: Vec<(&str, Vec<&Offer>)> = Vec::new();
    for offer in offers.iter().filter(|offer| offer.is_favorite) {
        match groups.iter_mut().find(|(city, _)| *city == offer.city.name) {
            Some((_, group)) => group.push(offer),
            None => groups.push((offer.city.name.as_str(), vec![offer])),
        }
    }
    groups
}

/// Current contents of the review form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewDraft {
    pub rating: Option<u8>,
    pub text: String,
}

impl ReviewDraft {
    /// Whether the submit button is enabled
    pub fn can_submit(&self, is_submitting: bool) -> bool {
        let length = self.text.chars().count();
        self.rating.is_some()
            && (MIN_COMMENT_LENGTH..=MAX_COMMENT_LENGTH).contains(&length)
            && !is_submitting
    }
}

/// Accessibility hint for a star value
pub fn rating_title(stars: u8) -> Option<&'static str> {
    match stars {
        5 => Some("perfect"),
        4 => Some("good"),
        3 => Some("not bad"),
        2 => Some("badly"),
        1 => Some("terribly"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::offer;
    use proptest::prelude::*;

    fn ids<'a>(offers: &[&'a Offer]) -> Vec<&'a str> {
        offers.iter().map(|offer| offer.id.as_str()).collect()
    }

    #[test]
    fn resolves_matching_city() {
        let offers = vec![offer("1", "Paris", 10, 1.0), offer("2", "Cologne", 10, 1.0)];
        assert_eq!(resolve_city(&offers, "Cologne").map(|c| c.name.as_str()), Some("Cologne"));
    }

    #[test]
    fn falls_back_to_first_offer_city() {
        let offers = vec![offer("1", "Paris", 10, 1.0), offer("2", "Cologne", 10, 1.0)];
        assert_eq!(resolve_city(&offers, "Berlin").map(|c| c.name.as_str()), Some("Paris"));
        assert!(resolve_city(&[], "Paris").is_none());
    }

    #[test]
    fn filters_by_city_keeping_order() {
        let offers = vec![
            offer("1", "Paris", 10, 1.0),
            offer("2", "Cologne", 10, 1.0),
            offer("3", "Paris", 10, 1.0),
        ];
        assert_eq!(ids(&offers_in_city(&offers, "Paris")), ["1", "3"]);
        assert!(offers_in_city(&offers, "Hamburg").is_empty());
    }

    #[test]
    fn sorts_are_stable_on_ties() {
        let offers = vec![
            offer("a", "Paris", 100, 4.0),
            offer("b", "Paris", 50, 4.5),
            offer("c", "Paris", 100, 4.5),
            offer("d", "Paris", 50, 3.0),
        ];

        assert_eq!(ids(&sort_offers(&offers, SortOption::Popular)), ["a", "b", "c", "d"]);
        assert_eq!(ids(&sort_offers(&offers, SortOption::PriceLowToHigh)), ["b", "d", "a", "c"]);
        assert_eq!(ids(&sort_offers(&offers, SortOption::PriceHighToLow)), ["a", "c", "b", "d"]);
        assert_eq!(ids(&sort_offers(&offers, SortOption::TopRatedFirst)), ["b", "c", "a", "d"]);
        assert_eq!(offers[0].id, "a");
    }

    #[test]
    fn review_length_boundaries() {
        let draft = |len: usize| ReviewDraft {
            rating: Some(4),
            text: "x".repeat(len),
        };

        assert!(!draft(49).can_submit(false));
        assert!(draft(50).can_submit(false));
        assert!(draft(300).can_submit(false));
        assert!(!draft(301).can_submit(false));
    }

    #[test]
    fn review_needs_rating_and_idle_form() {
        let mut draft = ReviewDraft {
            rating: None,
            text: "é".repeat(60),
        };
        assert!(!draft.can_submit(false));

        draft.rating = Some(1);
        assert!(draft.can_submit(false));
        assert!(!draft.can_submit(true));
    }

    #[test]
    fn review_length_counts_characters_not_utf16_units() {
        let draft = |len: usize| ReviewDraft {
            rating: Some(5),
            text: "😀".repeat(len),
        };

        assert!(!draft(49).can_submit(false));
        assert!(draft(50).can_submit(false));
        assert!(draft(300).can_submit(false));
        assert!(!draft(301).can_submit(false));
    }

    #[test]
    fn every_star_has_a_title() {
        let titles: Vec<_> = STARS.iter().filter_map(|&stars| rating_title(stars)).collect();
        assert_eq!(titles, ["perfect", "good", "not bad", "badly", "terribly"]);
        assert!(rating_title(0).is_none());
        assert!(rating_title(6).is_none());
    }

    #[test]
    fn favorites_group_by_first_seen_city() {
        let mut offers = vec![
            offer("1", "Cologne", 10, 1.0),
            offer("2", "Paris", 10, 1.0),
            offer("3", "Cologne", 10, 1.0),
            offer("4", "Paris", 10, 1.0),
        ];
        offers[0].is_favorite = true;
        offers[1].is_favorite = true;
        offers[2].is_favorite = true;

        let groups = favorites_by_city(&offers);
        let shape: Vec<(&str, Vec<&str>)> = groups
            .iter()
            .map(|(city, group)| (*city, ids(group)))
            .collect();
        assert_eq!(shape, [("Cologne", vec!["1", "3"]), ("Paris", vec!["2"])]);
    }

    fn offers_strategy() -> impl Strategy<Value = Vec<Offer>> {
        prop::collection::vec((0u32..500, 0u8..=50), 0..30).prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (price, rating))| offer(&i.to_string(), "Paris", price, f64::from(rating) / 10.0))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn ascending_reversed_is_descending_for_distinct_prices(
            prices in prop::collection::hash_set(0u32..10_000, 0..30)
        ) {
            let offers: Vec<Offer> = prices
                .into_iter()
                .enumerate()
                .map(|(i, price)| offer(&i.to_string(), "Paris", price, 3.0))
                .collect();

            let mut ascending = sort_offers(&offers, SortOption::PriceLowToHigh);
            ascending.reverse();
            let descending = sort_offers(&offers, SortOption::PriceHighToLow);
            prop_assert_eq!(ids(&ascending), ids(&descending));
        }

        #[test]
        fn sorting_sorted_output_is_a_no_op(offers in offers_strategy()) {
            for option in SortOption::ALL {
                let once = sort_offers(&offers, option);
                let twice = sort_offers(once.iter().copied(), option);
                prop_assert_eq!(ids(&once), ids(&twice));
            }
        }

        #[test]
        fn sorting_keeps_every_offer(offers in offers_strategy()) {
            for option in SortOption::ALL {
                let sorted = sort_offers(&offers, option);
                prop_assert_eq!(sorted.len(), offers.len());
            }
        }
    }
}

use crate::models::{CityName, Offer, Review, SortOption};
use crate::store::lifecycle::Phase;

/// Every transition the store accepts.
///
/// Remote operations carry a lifecycle [`Phase`]; selection changes are
/// synchronous.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    FetchOffers(Phase<Vec<Offer>>),
    FetchNearbyOffers(Phase<Vec<Offer>>),
    FetchComments(Phase<Vec<Review>>),
    PostComment(Phase<Review>),
    ToggleFavorite(Phase<Offer>),
    Logout(Phase<()>),
    SetActiveCity(CityName),
    SetSortOption(SortOption),
}

impl Action {
    /// Operation name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Action::FetchOffers(_) => "fetchOffers",
            Action::FetchNearbyOffers(_) => "fetchNearbyOffers",
            Action::FetchComments(_) => "fetchComments",
            Action::PostComment(_) => "postComment",
            Action::ToggleFavorite(_) => "toggleFavorite",
            Action::Logout(_) => "logout",
            Action::SetActiveCity(_) => "setActiveCity",
            Action::SetSortOption(_) => "setSortOption",
        }
    }

    /// Lifecycle phase name, `None` for synchronous transitions
    pub fn phase(&self) -> Option<&'static str> {
        match self {
            Action::FetchOffers(phase) | Action::FetchNearbyOffers(phase) => Some(phase.name()),
            Action::FetchComments(phase) => Some(phase.name()),
            Action::PostComment(phase) => Some(phase.name()),
            Action::ToggleFavorite(phase) => Some(phase.name()),
            Action::Logout(phase) => Some(phase.name()),
            Action::SetActiveCity(_) | Action::SetSortOption(_) => None,
        }
    }
}

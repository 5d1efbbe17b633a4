use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Map position with the zoom level used when centering on it
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: u8,
}

/// City an offer belongs to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct City {
    pub name: String,
    pub location: Location,
}

/// A rentable property offer as returned by the listings endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub price: u32,
    pub city: City,
    pub location: Location,
    pub is_favorite: bool,
    pub is_premium: bool,
    pub rating: f64,
    pub preview_image: String,
}

/// Author of a review
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewAuthor {
    pub name: String,
    pub avatar_url: String,
    pub is_pro: bool,
}

/// A user comment on one offer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: String,
    pub date: DateTime<Utc>,
    pub user: ReviewAuthor,
    pub comment: String,
    pub rating: u8,
}

/// Body sent when submitting a review
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommentPayload {
    pub offer_id: String,
    pub rating: u8,
    pub comment: String,
}

/// Desired favorite status for one offer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FavoritePayload {
    pub offer_id: String,
    pub status: bool,
}

/// Cities the browsing UI lets the user pick from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum CityName {
    #[default]
    Paris,
    Cologne,
    Brussels,
    Amsterdam,
    Hamburg,
    Dusseldorf,
}

impl CityName {
    pub const ALL: [CityName; 6] = [
        CityName::Paris,
        CityName::Cologne,
        CityName::Brussels,
        CityName::Amsterdam,
        CityName::Hamburg,
        CityName::Dusseldorf,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CityName::Paris => "Paris",
            CityName::Cologne => "Cologne",
            CityName::Brussels => "Brussels",
            CityName::Amsterdam => "Amsterdam",
            CityName::Hamburg => "Hamburg",
            CityName::Dusseldorf => "Dusseldorf",
        }
    }
}

impl fmt::Display for CityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CityName {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CityName::ALL
            .into_iter()
            .find(|city| city.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow::anyhow!("Unknown city: {}", s))
    }
}

/// Ordering applied to the offers list
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum SortOption {
    #[default]
    Popular,
    PriceLowToHigh,
    PriceHighToLow,
    TopRatedFirst,
}

impl SortOption {
    pub const ALL: [SortOption; 4] = [
        SortOption::Popular,
        SortOption::PriceLowToHigh,
        SortOption::PriceHighToLow,
        SortOption::TopRatedFirst,
    ];

    /// Text shown in the sorting dropdown
    pub fn label(self) -> &'static str {
        match self {
            SortOption::Popular => "Popular",
            SortOption::PriceLowToHigh => "Price: low to high",
            SortOption::PriceHighToLow => "Price: high to low",
            SortOption::TopRatedFirst => "Top rated first",
        }
    }
}

impl FromStr for SortOption {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOption::ALL
            .into_iter()
            .find(|option| format!("{:?}", option).eq_ignore_ascii_case(s) || option.label() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown sort option: {}", s))
    }
}

use std::path::PathBuf;
use std::sync::Arc;

use offer_sync::api::{HttpApi, MockApi, OfferApi};
use offer_sync::config::Config;
use offer_sync::selectors::{offers_in_city, resolve_city, sort_offers};
use offer_sync::store::RootState;
use offer_sync::Store;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut use_mock = false;
    let mut config_path = PathBuf::from("offer-sync.toml");
    for arg in std::env::args().skip(1) {
        if arg == "--mock" {
            use_mock = true;
        } else {
            config_path = PathBuf::from(arg);
        }
    }

    let config = Config::load(&config_path)?;

    let api: Arc<dyn OfferApi> = if use_mock {
        Arc::new(MockApi::sample())
    } else {
        Arc::new(HttpApi::new(&config.api)?)
    };
    info!("Using {} backend", api.source_name());

    let store = Store::with_state(api, RootState::with_selection(config.selection()));

    if let Err(error) = store.fetch_offers().await {
        warn!("Could not load offers: {}", error);
        for message in error.messages() {
            println!("! {}", message);
        }
        return Ok(());
    }

    let state = store.state();
    let active_city = state.common.city();
    let offers = state.offers.offers();
    let in_city = offers_in_city(offers, active_city.as_str());
    let sorted = sort_offers(in_city, state.common.sort_option());

    match resolve_city(offers, active_city.as_str()) {
        Some(city) => println!(
            "{} places to stay in {} (map centered on {} @ {:.4}, {:.4})",
            sorted.len(),
            active_city,
            city.name,
            city.location.latitude,
            city.location.longitude
        ),
        None => println!("No places to stay available in {}", active_city),
    }
    println!("Sorted by: {}", state.common.sort_option().label());
    println!();

    for (i, offer) in sorted.iter().enumerate() {
        let marker = if offer.is_favorite { "*" } else { " " };
        println!("{}. [{}] {} ({} per night)", i + 1, marker, offer.title, offer.price);
        println!("   {} · rating {:.1}", offer.kind, offer.rating);
    }

    if let Some(first) = sorted.first() {
        let id = first.id.clone();
        let (nearby, comments) = tokio::join!(store.fetch_nearby_offers(&id), store.fetch_comments(&id));
        if let Ok(nearby) = nearby {
            info!("{} offers near {}", nearby.len(), id);
        }
        if let Ok(comments) = comments {
            info!("{} reviews for {}", comments.len(), id);
        }
    }

    Ok(())
}

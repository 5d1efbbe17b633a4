pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod selectors;
pub mod store;

pub use error::RequestError;
pub use store::{Action, RootState, Store};

pub mod config;
pub mod criteria;
pub mod extractor;
pub mod handlers_health;
pub mod handlers_property;
pub mod handlers_search;
pub mod property;
pub mod property_store;
pub mod search;
pub mod warp_helpers;

//! Configuration: application settings and persisted control properties.

mod app_config;
mod property;
mod store;

pub use app_config::AppConfig;
pub use property::{PostSet, Property, INVALIDATE, INVALIDATE_PERSIST, PERSIST};
pub use store::{config_key, ConfigStore, MemoryConfig};

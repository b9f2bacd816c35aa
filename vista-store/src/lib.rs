pub mod airport_repo;
pub mod app_config;
pub mod events;
pub mod fleet_repo;
pub mod mailer;
pub mod seed;

pub use airport_repo::InMemoryAirportDirectory;
pub use app_config::Config;
pub use events::EventPublisher;
pub use fleet_repo::{FleetSeed, InMemoryFleetCatalog};
pub use mailer::LogNotificationDispatcher;
pub use seed::SeedError;

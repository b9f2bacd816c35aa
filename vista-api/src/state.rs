use std::sync::Arc;
use std::time::Duration;

use vista_catalog::{CommissionPolicy, FleetCatalog, QuotePricingEngine, RouteQuoter};
use vista_core::AirportDirectory;
use vista_reservation::{
    DispatchSettings, GuardedDispatcher, InMemoryReservationRepository, ReservationDesk, ReservationLifecycle,
    ReservationRegistry, Tracker, TransitionPolicy,
};
use vista_store::app_config::Config;
use vista_store::{EventPublisher, InMemoryAirportDirectory, InMemoryFleetCatalog, LogNotificationDispatcher};

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
}

#[derive(Clone)]
pub struct AppState {
    pub airports: Arc<dyn AirportDirectory>,
    pub fleet: Arc<dyn FleetCatalog>,
    pub quoter: Arc<RouteQuoter>,
    pub commission: Arc<CommissionPolicy>,
    pub desk: Arc<ReservationDesk>,
    pub tracker: Arc<Tracker>,
    pub events: EventPublisher,
    pub auth: AuthConfig,
}

impl AppState {
    /// Wires the engine around the given reference data.
    pub fn assemble(
        config: &Config,
        airports: Arc<dyn AirportDirectory>,
        fleet: Arc<dyn FleetCatalog>,
    ) -> anyhow::Result<Self> {
        let quoter = RouteQuoter::new(QuotePricingEngine::new(config.pricing.add_on_rates())).with_estimate_settings(
            config.pricing.fallback_cruise_speed_kmh,
            config.pricing.estimate_overhead_factor,
        );
        let commission = CommissionPolicy::new(config.pricing.default_commission_pct, "config")?;

        let policy = if config.lifecycle.strict_ordering {
            TransitionPolicy::Strict
        } else {
            TransitionPolicy::Permissive
        };

        let dispatcher = GuardedDispatcher::new(
            Arc::new(LogNotificationDispatcher),
            DispatchSettings {
                timeout: Duration::from_millis(config.notifications.timeout_ms),
                failure_threshold: config.notifications.failure_threshold as usize,
                reset_timeout: Duration::from_secs(config.notifications.reset_timeout_secs),
                audit_capacity: config.notifications.audit_capacity,
            },
        );

        let events = EventPublisher::default();
        let desk = Arc::new(ReservationDesk::new(
            ReservationRegistry::new(Arc::new(InMemoryReservationRepository::new())),
            ReservationLifecycle::new(policy),
            Arc::new(dispatcher),
            events.clone(),
        ));

        Ok(Self {
            airports,
            fleet,
            quoter: Arc::new(quoter),
            commission: Arc::new(commission),
            tracker: Arc::new(Tracker::new(desk.clone())),
            desk,
            events,
            auth: AuthConfig {
                secret: config.auth.jwt_secret.clone(),
            },
        })
    }

    /// Loads seeded reference data from the paths in config.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let airports = InMemoryAirportDirectory::from_path(&config.seed.airports_path).await?;
        let fleet = InMemoryFleetCatalog::from_path(&config.seed.fleet_path).await?;
        Self::assemble(config, Arc::new(airports), Arc::new(fleet))
    }
}

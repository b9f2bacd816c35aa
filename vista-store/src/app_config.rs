use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub pricing: PricingConfig,
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub lifecycle: LifecycleConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

/// Pricing knobs. Amounts are whole dollars here and converted to cents at the edge.
#[derive(Debug, Deserialize, Clone)]
pub struct PricingConfig {
    pub default_commission_pct: f64,
    #[serde(default = "default_catering")]
    pub catering_per_guest_usd: i64,
    #[serde(default = "default_ground_transport")]
    pub ground_transport_usd: i64,
    #[serde(default = "default_concierge")]
    pub concierge_usd: i64,
    #[serde(default = "default_overhead")]
    pub estimate_overhead_factor: f64,
    #[serde(default = "default_fallback_speed")]
    pub fallback_cruise_speed_kmh: f64,
}

fn default_catering() -> i64 { 500 }
fn default_ground_transport() -> i64 { 750 }
fn default_concierge() -> i64 { 1_000 }
fn default_overhead() -> f64 { 1.25 }
fn default_fallback_speed() -> f64 { 800.0 }

impl PricingConfig {
    pub fn add_on_rates(&self) -> vista_catalog::AddOnRates {
        vista_catalog::AddOnRates {
            catering_per_guest_cents: self.catering_per_guest_usd * 100,
            ground_transport_cents: self.ground_transport_usd * 100,
            concierge_cents: self.concierge_usd * 100,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationConfig {
    pub timeout_ms: u64,
    pub failure_threshold: u32,
    pub reset_timeout_secs: u64,
    #[serde(default = "default_audit_capacity")]
    pub audit_capacity: usize,
}

fn default_audit_capacity() -> usize { 500 }

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LifecycleConfig {
    #[serde(default)]
    pub strict_ordering: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeedConfig {
    pub airports_path: String,
    pub fleet_path: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `VISTA_AUTH__JWT_SECRET=...`
            .add_source(config::Environment::with_prefix("VISTA").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

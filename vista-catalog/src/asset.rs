use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Aircraft size classes offered for charter
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AircraftCategory {
    Light,
    Midsize,
    SuperMidsize,
    Heavy,
    UltraLong,
    VipAirliner,
}

impl AircraftCategory {
    pub fn label(&self) -> &'static str {
        match self {
            AircraftCategory::Light => "Light Jet",
            AircraftCategory::Midsize => "Midsize Jet",
            AircraftCategory::SuperMidsize => "Super Midsize Jet",
            AircraftCategory::Heavy => "Heavy Jet",
            AircraftCategory::UltraLong => "Ultra Long Range",
            AircraftCategory::VipAirliner => "VIP Airliner",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum YachtSize {
    Small,
    Medium,
    Large,
    Superyacht,
}

impl YachtSize {
    pub fn label(&self) -> &'static str {
        match self {
            YachtSize::Small => "Small (under 30m)",
            YachtSize::Medium => "Medium (30-50m)",
            YachtSize::Large => "Large (50-80m)",
            YachtSize::Superyacht => "Superyacht (80m+)",
        }
    }
}

/// Charter aircraft. Rates are USD cents per flight hour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Aircraft {
    pub id: Uuid,
    pub name: String,
    pub model: String,
    pub category: AircraftCategory,
    pub passenger_capacity: u32,
    pub range_km: u32,
    /// Required for priced quotes; absent on some listings.
    pub cruise_speed_kmh: Option<f64>,
    pub hourly_rate_cents: i64,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

/// Charter yacht. Rates are USD cents per night.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Yacht {
    pub id: Uuid,
    pub name: String,
    pub size_category: YachtSize,
    pub length_meters: f64,
    pub guest_capacity: u32,
    pub crew_count: u32,
    pub daily_rate_cents: i64,
    pub home_port: String,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Asset catalog unavailable: {0}")]
    Unavailable(String),
}

/// Read-only access to the charter fleet. Assets are managed outside this engine.
#[async_trait]
pub trait FleetCatalog: Send + Sync {
    async fn list_aircraft(&self, category: Option<AircraftCategory>) -> Result<Vec<Aircraft>, AssetError>;

    async fn get_aircraft(&self, id: Uuid) -> Result<Aircraft, AssetError>;

    async fn list_yachts(&self, size: Option<YachtSize>) -> Result<Vec<Yacht>, AssetError>;

    async fn get_yacht(&self, id: Uuid) -> Result<Yacht, AssetError>;
}

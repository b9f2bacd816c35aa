//! Great-circle distance and flight-time estimation.
//!
//! All distances are kilometres on a spherical Earth (R = 6371 km). Flight
//! time is a straight division of distance by cruise speed, rounded to one
//! decimal; no taxi, climb or wind allowance is applied here.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Cruise speed substituted only when a caller opts into [`SpeedMode::BestEffort`].
pub const FALLBACK_CRUISE_SPEED_KMH: f64 = 800.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeoError {
    #[error("Airport {code} has no latitude/longitude on record")]
    MissingCoordinates { code: String },

    #[error("Invalid coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("Invalid aircraft data: {0}")]
    InvalidAircraftData(String),
}

/// A WGS-84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);

        if !valid {
            return Err(GeoError::InvalidCoordinate { latitude, longitude });
        }

        Ok(Self { latitude, longitude })
    }

    /// Great-circle distance to another point (haversine formula)
    pub fn distance_to_km(&self, other: &Coordinate) -> f64 {
        distance_km(*self, *other)
    }
}

/// How a missing cruise speed is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedMode {
    /// Priced quotes: the aircraft must carry a usable cruise speed.
    Strict,
    /// Public estimates: fall back to a documented default speed.
    BestEffort,
}

pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

pub fn estimated_flight_hours(distance_km: f64, cruise_speed_kmh: f64) -> Result<f64, GeoError> {
    if !cruise_speed_kmh.is_finite() || cruise_speed_kmh <= 0.0 {
        return Err(GeoError::InvalidAircraftData(format!(
            "cruise speed must be positive, got {} km/h",
            cruise_speed_kmh
        )));
    }

    Ok(round_to_tenth(distance_km / cruise_speed_kmh))
}

/// Pick the cruise speed to use for an estimate.
///
/// A recorded speed is always validated, never replaced. The fallback is
/// only used when no speed is recorded and the caller asked for best effort.
pub fn resolve_cruise_speed(
    recorded_kmh: Option<f64>,
    mode: SpeedMode,
    fallback_kmh: f64,
) -> Result<f64, GeoError> {
    match (recorded_kmh, mode) {
        (Some(speed), _) if speed.is_finite() && speed > 0.0 => Ok(speed),
        (Some(speed), _) => Err(GeoError::InvalidAircraftData(format!(
            "cruise speed must be positive, got {} km/h",
            speed
        ))),
        (None, SpeedMode::BestEffort) => Ok(fallback_kmh),
        (None, SpeedMode::Strict) => Err(GeoError::InvalidAircraftData(
            "aircraft has no cruise speed on record".to_string(),
        )),
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

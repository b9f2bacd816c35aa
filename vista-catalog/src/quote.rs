use serde::{Deserialize, Serialize};

use vista_core::airport::{self, Airport};
use vista_core::geo::{self, GeoError, SpeedMode, FALLBACK_CRUISE_SPEED_KMH};
use vista_core::schedule::DateRange;

use crate::asset::{Aircraft, Yacht};
use crate::commission::CommissionSnapshot;
use crate::pricing::{AddOns, PriceBreakdown, PricingError, QuotePricingEngine, QuoteRequest, RateBasis};

/// Multiplier applied to the raw flight cost in public estimates (positioning, fees, crew).
pub const ESTIMATE_OVERHEAD_FACTOR: f64 = 1.25;

pub const ESTIMATE_NOTE: &str = "Estimate only. Final pricing confirmed by our team.";

#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    #[error(transparent)]
    Geo(#[from] GeoError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("{requested} travellers exceed {asset} capacity of {capacity}")]
    CapacityExceeded { asset: String, requested: u32, capacity: u32 },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlightQuoteOptions {
    pub passengers: u32,
    #[serde(default)]
    pub round_trip: bool,
    #[serde(default)]
    pub add_ons: AddOns,
    #[serde(default)]
    pub discount_pct: f64,
    pub commission_pct: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CharterQuoteOptions {
    pub guests: u32,
    #[serde(default)]
    pub add_ons: AddOns,
    #[serde(default)]
    pub discount_pct: f64,
    pub commission_pct: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightQuote {
    pub origin: String,
    pub destination: String,
    pub aircraft_id: uuid::Uuid,
    pub distance_km: f64,
    pub estimated_flight_hours: f64,
    pub billable_hours: f64,
    pub round_trip: bool,
    /// Route is longer than the aircraft's published range; a fuel stop is implied.
    pub exceeds_range: bool,
    pub breakdown: PriceBreakdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharterQuote {
    pub yacht_id: uuid::Uuid,
    pub nights: u32,
    pub breakdown: PriceBreakdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickEstimate {
    pub origin: Airport,
    pub destination: Airport,
    pub aircraft_id: uuid::Uuid,
    pub aircraft_name: String,
    pub estimated_flight_hours: f64,
    /// Whole dollars, in cents.
    pub estimated_price_cents: i64,
    pub note: String,
}

/// Staff route/charter quoting and the public quick estimate.
pub struct RouteQuoter {
    engine: QuotePricingEngine,
    fallback_speed_kmh: f64,
    overhead_factor: f64,
}

impl RouteQuoter {
    pub fn new(engine: QuotePricingEngine) -> Self {
        Self {
            engine,
            fallback_speed_kmh: FALLBACK_CRUISE_SPEED_KMH,
            overhead_factor: ESTIMATE_OVERHEAD_FACTOR,
        }
    }

    pub fn with_estimate_settings(mut self, fallback_speed_kmh: f64, overhead_factor: f64) -> Self {
        self.fallback_speed_kmh = fallback_speed_kmh;
        self.overhead_factor = overhead_factor;
        self
    }

    pub fn engine(&self) -> &QuotePricingEngine {
        &self.engine
    }

    /// Priced flight quote. The aircraft must carry a cruise speed; no fallback is used.
    pub fn quote_flight(
        &self,
        origin: &Airport,
        destination: &Airport,
        aircraft: &Aircraft,
        options: &FlightQuoteOptions,
        commission: &CommissionSnapshot,
    ) -> Result<FlightQuote, QuoteError> {
        if options.passengers > aircraft.passenger_capacity {
            return Err(QuoteError::CapacityExceeded {
                asset: aircraft.name.clone(),
                requested: options.passengers,
                capacity: aircraft.passenger_capacity,
            });
        }

        let distance_km = airport::route_distance_km(origin, destination)?;
        let speed = geo::resolve_cruise_speed(aircraft.cruise_speed_kmh, SpeedMode::Strict, self.fallback_speed_kmh)?;
        let hours = geo::estimated_flight_hours(distance_km, speed)?;
        let billable_hours = if options.round_trip { hours * 2.0 } else { hours };

        let breakdown = self.engine.price(
            &QuoteRequest {
                base_rate_cents: aircraft.hourly_rate_cents,
                basis: RateBasis::Hourly,
                duration: billable_hours,
                passengers: options.passengers,
                add_ons: options.add_ons,
                discount_pct: options.discount_pct,
                commission_pct: options.commission_pct,
            },
            commission,
        )?;

        Ok(FlightQuote {
            origin: origin.code.to_string(),
            destination: destination.code.to_string(),
            aircraft_id: aircraft.id,
            distance_km,
            estimated_flight_hours: hours,
            billable_hours,
            round_trip: options.round_trip,
            exceeds_range: distance_km > aircraft.range_km as f64,
            breakdown,
        })
    }

    /// Priced yacht charter for a date window, billed per night.
    pub fn quote_charter(
        &self,
        yacht: &Yacht,
        window: &DateRange,
        options: &CharterQuoteOptions,
        commission: &CommissionSnapshot,
    ) -> Result<CharterQuote, QuoteError> {
        if options.guests > yacht.guest_capacity {
            return Err(QuoteError::CapacityExceeded {
                asset: yacht.name.clone(),
                requested: options.guests,
                capacity: yacht.guest_capacity,
            });
        }

        let nights = window.nights();
        let breakdown = self.engine.price(
            &QuoteRequest {
                base_rate_cents: yacht.daily_rate_cents,
                basis: RateBasis::Daily,
                duration: nights as f64,
                passengers: options.guests,
                add_ons: options.add_ons,
                discount_pct: options.discount_pct,
                commission_pct: options.commission_pct,
            },
            commission,
        )?;

        Ok(CharterQuote {
            yacht_id: yacht.id,
            nights,
            breakdown,
        })
    }

    /// Public rough estimate: falls back to a default cruise speed, but never to default coordinates.
    pub fn quick_estimate(
        &self,
        origin: &Airport,
        destination: &Airport,
        aircraft: &Aircraft,
    ) -> Result<QuickEstimate, QuoteError> {
        if aircraft.hourly_rate_cents <= 0 {
            return Err(PricingError::InvalidRate(aircraft.hourly_rate_cents).into());
        }

        let distance_km = airport::route_distance_km(origin, destination)?;
        let speed = geo::resolve_cruise_speed(aircraft.cruise_speed_kmh, SpeedMode::BestEffort, self.fallback_speed_kmh)?;
        let hours = geo::estimated_flight_hours(distance_km, speed)?;

        let raw_cents = aircraft.hourly_rate_cents as f64 * (distance_km / speed) * self.overhead_factor;
        let estimated_price_cents = (raw_cents / 100.0).round() as i64 * 100;

        Ok(QuickEstimate {
            origin: origin.clone(),
            destination: destination.clone(),
            aircraft_id: aircraft.id,
            aircraft_name: aircraft.name.clone(),
            estimated_flight_hours: hours,
            estimated_price_cents,
            note: ESTIMATE_NOTE.to_string(),
        })
    }
}

impl Default for RouteQuoter {
    fn default() -> Self {
        Self::new(QuotePricingEngine::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{AircraftCategory, YachtSize};
    use chrono::NaiveDate;
    use uuid::Uuid;
    use vista_core::IataCode;

    fn airport(code: &str, lat: f64, lon: f64) -> Airport {
        Airport {
            code: IataCode::parse(code).unwrap(),
            name: format!("{} International", code),
            city: code.to_string(),
            country: "Test".to_string(),
            latitude: Some(lat),
            longitude: Some(lon),
        }
    }

    fn jfk() -> Airport {
        airport("JFK", 40.6413, -73.7781)
    }

    fn lhr() -> Airport {
        airport("LHR", 51.4700, -0.4543)
    }

    fn heavy_jet(speed: Option<f64>) -> Aircraft {
        Aircraft {
            id: Uuid::new_v4(),
            name: "Gulfstream G650ER".to_string(),
            model: "G650ER".to_string(),
            category: AircraftCategory::UltraLong,
            passenger_capacity: 14,
            range_km: 13_890,
            cruise_speed_kmh: speed,
            hourly_rate_cents: 1_200_000,
            amenities: vec![],
            is_available: true,
        }
    }

    fn snapshot() -> CommissionSnapshot {
        CommissionSnapshot { version: 1, rate_pct: 12.0 }
    }

    #[test]
    fn test_flight_quote_uses_estimated_hours() {
        let quoter = RouteQuoter::default();
        let options = FlightQuoteOptions { passengers: 6, ..Default::default() };

        let quote = quoter.quote_flight(&jfk(), &lhr(), &heavy_jet(Some(900.0)), &options, &snapshot()).unwrap();
        assert_eq!(quote.estimated_flight_hours, 6.2);
        assert_eq!(quote.billable_hours, 6.2);
        assert!(!quote.exceeds_range);
        assert_eq!(quote.breakdown.base_cost_cents, 7_440_000);
        assert_eq!(quote.breakdown.commission_version, Some(1));
    }

    #[test]
    fn test_round_trip_doubles_billable_hours() {
        let quoter = RouteQuoter::default();
        let options = FlightQuoteOptions { passengers: 2, round_trip: true, ..Default::default() };

        let quote = quoter.quote_flight(&jfk(), &lhr(), &heavy_jet(Some(900.0)), &options, &snapshot()).unwrap();
        assert!((quote.billable_hours - 12.4).abs() < 1e-9);
    }

    #[test]
    fn test_priced_quote_requires_cruise_speed() {
        let quoter = RouteQuoter::default();
        let options = FlightQuoteOptions { passengers: 2, ..Default::default() };

        let err = quoter.quote_flight(&jfk(), &lhr(), &heavy_jet(None), &options, &snapshot()).unwrap_err();
        assert!(matches!(err, QuoteError::Geo(GeoError::InvalidAircraftData(_))));
    }

    #[test]
    fn test_missing_coordinates_fail_quote() {
        let quoter = RouteQuoter::default();
        let mut destination = lhr();
        destination.longitude = None;
        let options = FlightQuoteOptions { passengers: 2, ..Default::default() };

        let err = quoter.quote_flight(&jfk(), &destination, &heavy_jet(Some(900.0)), &options, &snapshot()).unwrap_err();
        assert!(matches!(err, QuoteError::Geo(GeoError::MissingCoordinates { .. })));

        assert!(quoter.quick_estimate(&jfk(), &destination, &heavy_jet(None)).is_err());
    }

    #[test]
    fn test_capacity_exceeded() {
        let quoter = RouteQuoter::default();
        let options = FlightQuoteOptions { passengers: 20, ..Default::default() };

        let err = quoter.quote_flight(&jfk(), &lhr(), &heavy_jet(Some(900.0)), &options, &snapshot()).unwrap_err();
        assert!(matches!(err, QuoteError::CapacityExceeded { requested: 20, capacity: 14, .. }));
    }

    #[test]
    fn test_quick_estimate_falls_back_to_default_speed() {
        let quoter = RouteQuoter::default();
        let estimate = quoter.quick_estimate(&jfk(), &lhr(), &heavy_jet(None)).unwrap();

        // 5540 km at the 800 km/h fallback
        assert_eq!(estimate.estimated_flight_hours, 6.9);
        assert_eq!(estimate.estimated_price_cents % 100, 0);
        assert_eq!(estimate.note, ESTIMATE_NOTE);
        let distance = airport::route_distance_km(&jfk(), &lhr()).unwrap();
        let expected_dollars = (12_000.0 * (distance / 800.0) * 1.25).round() as i64;
        assert_eq!(estimate.estimated_price_cents, expected_dollars * 100);
    }

    #[test]
    fn test_charter_quote_bills_nights() {
        let quoter = RouteQuoter::default();
        let yacht = Yacht {
            id: Uuid::new_v4(),
            name: "Azure Horizon".to_string(),
            size_category: YachtSize::Large,
            length_meters: 62.0,
            guest_capacity: 12,
            crew_count: 18,
            daily_rate_cents: 8_500_000,
            home_port: "Monaco".to_string(),
            amenities: vec![],
            is_available: true,
        };
        let window = DateRange::new(
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 7, 5).unwrap(),
        )
        .unwrap();
        let options = CharterQuoteOptions { guests: 8, ..Default::default() };

        let quote = quoter.quote_charter(&yacht, &window, &options, &snapshot()).unwrap();
        assert_eq!(quote.nights, 4);
        assert_eq!(quote.breakdown.basis, RateBasis::Daily);
        assert_eq!(quote.breakdown.base_cost_cents, 34_000_000);

        let same_day = DateRange::new(window.start, window.start).unwrap();
        let err = quoter.quote_charter(&yacht, &same_day, &options, &snapshot()).unwrap_err();
        assert!(matches!(err, QuoteError::Pricing(PricingError::InvalidDuration(_))));
    }
}

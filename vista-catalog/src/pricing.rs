use serde::{Deserialize, Serialize};

use crate::commission::CommissionSnapshot;

/// Catering charge per passenger/guest, in cents ($500).
pub const CATERING_PER_GUEST_CENTS: i64 = 50_000;

/// Flat ground transport charge, in cents ($750).
pub const GROUND_TRANSPORT_CENTS: i64 = 75_000;

/// Flat concierge charge, in cents ($1,000).
pub const CONCIERGE_CENTS: i64 = 100_000;

/// Unit of the quoted duration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RateBasis {
    /// Aircraft: rate per flight hour, duration in hours.
    Hourly,
    /// Yacht: rate per night, duration in nights.
    Daily,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AddOn {
    Catering,
    GroundTransport,
    Concierge,
}

/// Add-on prices. Overridable per deployment; defaults are the public constants above.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AddOnRates {
    pub catering_per_guest_cents: i64,
    pub ground_transport_cents: i64,
    pub concierge_cents: i64,
}

impl Default for AddOnRates {
    fn default() -> Self {
        Self {
            catering_per_guest_cents: CATERING_PER_GUEST_CENTS,
            ground_transport_cents: GROUND_TRANSPORT_CENTS,
            concierge_cents: CONCIERGE_CENTS,
        }
    }
}

/// Requested add-ons. Not every reservation kind offers every add-on.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddOns {
    #[serde(default)]
    pub catering: bool,
    #[serde(default)]
    pub ground_transport: bool,
    #[serde(default)]
    pub concierge: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub base_rate_cents: i64,
    pub basis: RateBasis,
    pub duration: f64,
    pub passengers: u32,
    #[serde(default)]
    pub add_ons: AddOns,
    #[serde(default)]
    pub discount_pct: f64,
    /// Transaction-level override; the current policy rate applies when absent.
    pub commission_pct: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddOnLine {
    pub add_on: AddOn,
    pub description: String,
    pub amount_cents: i64,
}

/// Itemized result of a quote. Every intermediate line is kept for staff display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceBreakdown {
    pub currency: String,
    pub basis: RateBasis,
    pub base_rate_cents: i64,
    pub duration: f64,
    pub passengers: u32,
    pub base_cost_cents: i64,
    pub add_ons: Vec<AddOnLine>,
    pub add_ons_total_cents: i64,
    pub subtotal_cents: i64,
    pub discount_pct: f64,
    pub discount_cents: i64,
    pub commission_pct: f64,
    /// Policy version the commission came from; `None` for an explicit override.
    pub commission_version: Option<u64>,
    pub commission_cents: i64,
    pub owner_net_cents: i64,
    pub grand_total_cents: i64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PricingError {
    #[error("Invalid rate: {0} cents (must be greater than zero)")]
    InvalidRate(i64),

    #[error("Invalid duration: {0} (must be greater than zero)")]
    InvalidDuration(f64),

    #[error("Invalid {field} percentage: {value} (must be between 0 and 100)")]
    InvalidPercentage { field: &'static str, value: f64 },

    #[error("Invalid passenger count: must be at least 1")]
    InvalidPassengerCount,
}

/// Deterministic, itemized quote pricing
pub struct QuotePricingEngine {
    rates: AddOnRates,
}

impl QuotePricingEngine {
    pub fn new(rates: AddOnRates) -> Self {
        Self { rates }
    }

    pub fn rates(&self) -> &AddOnRates {
        &self.rates
    }

    /// Price a request against one commission snapshot.
    ///
    /// The snapshot is read once by the caller, so a concurrent rate change
    /// can never produce a breakdown that mixes two rates.
    pub fn price(&self, request: &QuoteRequest, commission: &CommissionSnapshot) -> Result<PriceBreakdown, PricingError> {
        if request.base_rate_cents <= 0 {
            return Err(PricingError::InvalidRate(request.base_rate_cents));
        }
        if !request.duration.is_finite() || request.duration <= 0.0 {
            return Err(PricingError::InvalidDuration(request.duration));
        }
        if request.passengers == 0 {
            return Err(PricingError::InvalidPassengerCount);
        }
        validate_percentage("discount", request.discount_pct)?;

        let (commission_pct, commission_version) = match request.commission_pct {
            Some(pct) => {
                validate_percentage("commission", pct)?;
                (pct, None)
            }
            None => (commission.rate_pct, Some(commission.version)),
        };

        let base_cost_cents = (request.base_rate_cents as f64 * request.duration).round() as i64;
        let add_ons = self.add_on_lines(&request.add_ons, request.passengers);
        let add_ons_total_cents: i64 = add_ons.iter().map(|line| line.amount_cents).sum();

        let subtotal_cents = base_cost_cents + add_ons_total_cents;
        let discount_cents = percent_of(subtotal_cents, request.discount_pct);
        let grand_total_cents = subtotal_cents - discount_cents;
        let commission_cents = percent_of(grand_total_cents, commission_pct);
        let owner_net_cents = grand_total_cents - commission_cents;

        Ok(PriceBreakdown {
            currency: "USD".to_string(),
            basis: request.basis,
            base_rate_cents: request.base_rate_cents,
            duration: request.duration,
            passengers: request.passengers,
            base_cost_cents,
            add_ons,
            add_ons_total_cents,
            subtotal_cents,
            discount_pct: request.discount_pct,
            discount_cents,
            commission_pct,
            commission_version,
            commission_cents,
            owner_net_cents,
            grand_total_cents,
        })
    }

    fn add_on_lines(&self, add_ons: &AddOns, passengers: u32) -> Vec<AddOnLine> {
        let mut lines = Vec::new();

        if add_ons.catering {
            lines.push(AddOnLine {
                add_on: AddOn::Catering,
                description: format!("Catering ({} x ${})", passengers, self.rates.catering_per_guest_cents / 100),
                amount_cents: self.rates.catering_per_guest_cents * passengers as i64,
            });
        }
        if add_ons.ground_transport {
            lines.push(AddOnLine {
                add_on: AddOn::GroundTransport,
                description: "Ground transport".to_string(),
                amount_cents: self.rates.ground_transport_cents,
            });
        }
        if add_ons.concierge {
            lines.push(AddOnLine {
                add_on: AddOn::Concierge,
                description: "Concierge service".to_string(),
                amount_cents: self.rates.concierge_cents,
            });
        }

        lines
    }
}

impl Default for QuotePricingEngine {
    fn default() -> Self {
        Self::new(AddOnRates::default())
    }
}

fn validate_percentage(field: &'static str, value: f64) -> Result<(), PricingError> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(PricingError::InvalidPercentage { field, value });
    }
    Ok(())
}

/// Percentage of an amount, rounded to the nearest cent.
fn percent_of(amount_cents: i64, pct: f64) -> i64 {
    (amount_cents as f64 * pct / 100.0).round() as i64
}

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use vista_catalog::PriceBreakdown;
use vista_core::DateRange;
use vista_shared::Masked;

// ============================================================================
// Kinds and statuses
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReservationKind {
    FlightBooking,
    YachtCharter,
    LeaseInquiry,
    GroupCharter,
    AirCargo,
    AircraftSale,
}

const FLIGHT_PATH: &[ReservationStatus] = &[
    ReservationStatus::Inquiry,
    ReservationStatus::Quoted,
    ReservationStatus::Confirmed,
    ReservationStatus::InFlight,
    ReservationStatus::Completed,
];

const CHARTER_PATH: &[ReservationStatus] = &[
    ReservationStatus::Inquiry,
    ReservationStatus::Quoted,
    ReservationStatus::Confirmed,
    ReservationStatus::Active,
    ReservationStatus::Completed,
];

const SIMPLE_PATH: &[ReservationStatus] = &[
    ReservationStatus::Pending,
    ReservationStatus::Active,
    ReservationStatus::Completed,
];

impl ReservationKind {
    pub const ALL: [ReservationKind; 6] = [
        ReservationKind::FlightBooking,
        ReservationKind::YachtCharter,
        ReservationKind::LeaseInquiry,
        ReservationKind::GroupCharter,
        ReservationKind::AirCargo,
        ReservationKind::AircraftSale,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationKind::FlightBooking => "flight_booking",
            ReservationKind::YachtCharter => "yacht_charter",
            ReservationKind::LeaseInquiry => "lease_inquiry",
            ReservationKind::GroupCharter => "group_charter",
            ReservationKind::AirCargo => "air_cargo",
            ReservationKind::AircraftSale => "aircraft_sale",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReservationKind::FlightBooking => "Flight booking",
            ReservationKind::YachtCharter => "Yacht charter",
            ReservationKind::LeaseInquiry => "Lease inquiry",
            ReservationKind::GroupCharter => "Group charter inquiry",
            ReservationKind::AirCargo => "Air cargo inquiry",
            ReservationKind::AircraftSale => "Aircraft sales inquiry",
        }
    }

    /// Ordered lifecycle path, excluding `cancelled`.
    pub fn lifecycle_path(&self) -> &'static [ReservationStatus] {
        match self {
            ReservationKind::FlightBooking => FLIGHT_PATH,
            ReservationKind::YachtCharter => CHARTER_PATH,
            _ => SIMPLE_PATH,
        }
    }

    pub fn initial_status(&self) -> ReservationStatus {
        self.lifecycle_path()[0]
    }

    pub fn allows_status(&self, status: ReservationStatus) -> bool {
        status == ReservationStatus::Cancelled || self.lifecycle_path().contains(&status)
    }

    /// Whether the kind goes through a `quoted` step before confirmation.
    pub fn is_quoted_path(&self) -> bool {
        self.lifecycle_path().contains(&ReservationStatus::Quoted)
    }

    /// Yacht charters are kept for the operator's records and cannot be hard-deleted.
    pub fn supports_delete(&self) -> bool {
        !matches!(self, ReservationKind::YachtCharter)
    }

    pub fn confirmation_message(&self) -> &'static str {
        match self {
            ReservationKind::FlightBooking => {
                "Your flight request has been received. Our team will contact you shortly."
            }
            ReservationKind::YachtCharter => {
                "Your yacht charter request has been received. Our concierge will be in touch."
            }
            ReservationKind::LeaseInquiry => {
                "Your lease inquiry has been submitted. Our leasing specialists will contact you."
            }
            ReservationKind::GroupCharter => {
                "Your group charter inquiry has been received. Our team will contact you with a tailored solution within 4 hours."
            }
            ReservationKind::AirCargo => {
                "Your air cargo inquiry has been submitted. A cargo specialist will respond within 2 hours."
            }
            ReservationKind::AircraftSale => {
                "Your aircraft sales inquiry has been received. Our aviation sales team will be in touch within 24 hours."
            }
        }
    }
}

impl fmt::Display for ReservationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown reservation kind: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for ReservationKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReservationKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Inquiry,
    Pending,
    Quoted,
    Confirmed,
    InFlight,
    Active,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Inquiry => "inquiry",
            ReservationStatus::Pending => "pending",
            ReservationStatus::Quoted => "quoted",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::InFlight => "in_flight",
            ReservationStatus::Active => "active",
            ReservationStatus::Completed => "completed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReservationStatus::Inquiry => "Inquiry",
            ReservationStatus::Pending => "Pending",
            ReservationStatus::Quoted => "Quoted",
            ReservationStatus::Confirmed => "Confirmed",
            ReservationStatus::InFlight => "In Flight",
            ReservationStatus::Active => "Active",
            ReservationStatus::Completed => "Completed",
            ReservationStatus::Cancelled => "Cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ReservationStatus::Completed | ReservationStatus::Cancelled)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Kind-specific payloads
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TripType {
    #[default]
    OneWay,
    RoundTrip,
    MultiLeg,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlightLeg {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub departure_time: Option<NaiveTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlightDetails {
    #[serde(default)]
    pub trip_type: TripType,
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub departure_time: Option<NaiveTime>,
    pub return_date: Option<NaiveDate>,
    pub passenger_count: u32,
    pub aircraft_id: Option<Uuid>,
    #[serde(default)]
    pub legs: Vec<FlightLeg>,
    #[serde(default)]
    pub catering_requested: bool,
    #[serde(default)]
    pub ground_transport_requested: bool,
    #[serde(default)]
    pub concierge_requested: bool,
    #[serde(default)]
    pub special_requests: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CharterDetails {
    pub yacht_id: Option<Uuid>,
    pub departure_port: String,
    #[serde(default)]
    pub destination_port: String,
    pub charter_start: NaiveDate,
    pub charter_end: NaiveDate,
    pub guest_count: u32,
    #[serde(default)]
    pub itinerary_description: String,
    #[serde(default)]
    pub special_requests: String,
}

impl CharterDetails {
    pub fn window(&self) -> Result<DateRange, vista_core::ScheduleError> {
        DateRange::new(self.charter_start, self.charter_end)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LeaseAssetType {
    Aircraft,
    Yacht,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LeaseDuration {
    Monthly,
    Quarterly,
    Annual,
    MultiYear,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeaseDetails {
    pub asset_type: LeaseAssetType,
    pub asset_id: Option<Uuid>,
    pub lease_duration: LeaseDuration,
    pub preferred_start_date: NaiveDate,
    #[serde(default)]
    pub budget_range: String,
    #[serde(default)]
    pub usage_description: String,
    #[serde(default)]
    pub additional_notes: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GroupType {
    Corporate,
    SportsTeam,
    Entertainment,
    Incentive,
    Wedding,
    Government,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupCharterDetails {
    pub group_type: GroupType,
    pub group_size: u32,
    pub origin_description: String,
    pub destination_description: String,
    pub departure_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_round_trip: bool,
    #[serde(default)]
    pub preferred_aircraft_category: Option<String>,
    #[serde(default)]
    pub catering_required: bool,
    #[serde(default)]
    pub ground_transport_required: bool,
    #[serde(default)]
    pub budget_range: String,
    #[serde(default)]
    pub additional_notes: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CargoUrgency {
    #[default]
    Standard,
    Express,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CargoDetails {
    pub cargo_type: String,
    pub cargo_description: String,
    pub weight_kg: f64,
    pub volume_m3: Option<f64>,
    #[serde(default)]
    pub dimensions: String,
    pub origin_description: String,
    pub destination_description: String,
    pub pickup_date: NaiveDate,
    #[serde(default)]
    pub urgency: CargoUrgency,
    #[serde(default)]
    pub is_hazardous: bool,
    #[serde(default)]
    pub requires_temperature_control: bool,
    #[serde(default)]
    pub insurance_required: bool,
    #[serde(default)]
    pub customs_assistance_needed: bool,
    #[serde(default)]
    pub additional_notes: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SaleInquiryType {
    Buy,
    Sell,
    Trade,
    Valuation,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaleDetails {
    pub inquiry_type: SaleInquiryType,
    pub preferred_category: Option<String>,
    pub preferred_make_model: Option<String>,
    pub aircraft_make: Option<String>,
    pub aircraft_model: Option<String>,
    pub year_of_manufacture: Option<u16>,
    pub total_flight_hours: Option<u32>,
    pub asking_price_cents: Option<i64>,
    #[serde(default)]
    pub budget_range: String,
    pub new_or_pre_owned: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// Closed set of reservation payloads, tagged by `kind` on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReservationDetails {
    FlightBooking(FlightDetails),
    YachtCharter(CharterDetails),
    LeaseInquiry(LeaseDetails),
    GroupCharter(GroupCharterDetails),
    AirCargo(CargoDetails),
    AircraftSale(SaleDetails),
}

impl ReservationDetails {
    pub fn kind(&self) -> ReservationKind {
        match self {
            ReservationDetails::FlightBooking(_) => ReservationKind::FlightBooking,
            ReservationDetails::YachtCharter(_) => ReservationKind::YachtCharter,
            ReservationDetails::LeaseInquiry(_) => ReservationKind::LeaseInquiry,
            ReservationDetails::GroupCharter(_) => ReservationKind::GroupCharter,
            ReservationDetails::AirCargo(_) => ReservationKind::AirCargo,
            ReservationDetails::AircraftSale(_) => ReservationKind::AircraftSale,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            ReservationDetails::FlightBooking(flight) => {
                require_text("origin", &flight.origin)?;
                require_text("destination", &flight.destination)?;
                require_count("passenger_count", flight.passenger_count)?;
                if let Some(return_date) = flight.return_date {
                    if return_date < flight.departure_date {
                        return Err(ValidationError::InvalidField {
                            field: "return_date",
                            reason: "must not be before departure_date".to_string(),
                        });
                    }
                }
                if flight.trip_type == TripType::MultiLeg && flight.legs.is_empty() {
                    return Err(ValidationError::InvalidField {
                        field: "legs",
                        reason: "multi-leg trips need at least one leg".to_string(),
                    });
                }
                Ok(())
            }
            ReservationDetails::YachtCharter(charter) => {
                require_text("departure_port", &charter.departure_port)?;
                require_count("guest_count", charter.guest_count)?;
                charter.window().map_err(|e| ValidationError::InvalidField {
                    field: "charter_end",
                    reason: e.to_string(),
                })?;
                Ok(())
            }
            ReservationDetails::LeaseInquiry(_) => Ok(()),
            ReservationDetails::GroupCharter(group) => {
                require_count("group_size", group.group_size)?;
                require_text("origin_description", &group.origin_description)?;
                require_text("destination_description", &group.destination_description)?;
                if let Some(return_date) = group.return_date {
                    if return_date < group.departure_date {
                        return Err(ValidationError::InvalidField {
                            field: "return_date",
                            reason: "must not be before departure_date".to_string(),
                        });
                    }
                }
                Ok(())
            }
            ReservationDetails::AirCargo(cargo) => {
                require_text("cargo_description", &cargo.cargo_description)?;
                if !cargo.weight_kg.is_finite() || cargo.weight_kg <= 0.0 {
                    return Err(ValidationError::InvalidField {
                        field: "weight_kg",
                        reason: "must be greater than zero".to_string(),
                    });
                }
                Ok(())
            }
            ReservationDetails::AircraftSale(sale) => {
                if let Some(price) = sale.asking_price_cents {
                    if price <= 0 {
                        return Err(ValidationError::InvalidField {
                            field: "asking_price_cents",
                            reason: "must be greater than zero".to_string(),
                        });
                    }
                }
                Ok(())
            }
        }
    }
}

fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

fn require_count(field: &'static str, value: u32) -> Result<(), ValidationError> {
    if value == 0 {
        return Err(ValidationError::InvalidField {
            field,
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

// ============================================================================
// Reservation
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Requester {
    pub name: String,
    pub email: Masked<String>,
    pub phone: Option<Masked<String>>,
    pub company: Option<String>,
}

impl Requester {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        let email = self.email.expose().trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
            _ => Err(ValidationError::InvalidField {
                field: "email",
                reason: "must be a valid email address".to_string(),
            }),
        }
    }

    /// Trims surrounding whitespace from every contact field; blank optionals become `None`.
    pub fn normalized(self) -> Self {
        let trimmed = |value: String| value.trim().to_string();
        Self {
            name: trimmed(self.name),
            email: Masked(trimmed(self.email.into_inner())),
            phone: self
                .phone
                .map(|p| trimmed(p.into_inner()))
                .filter(|p| !p.is_empty())
                .map(Masked),
            company: self.company.map(trimmed).filter(|c| !c.is_empty()),
        }
    }
}

/// What a requester sends: contact details plus the kind-tagged payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub requester: Requester,
    pub details: ReservationDetails,
}

impl Submission {
    pub fn kind(&self) -> ReservationKind {
        self.details.kind()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.requester.validate()?;
        self.details.validate()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StaffNote {
    pub author: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusChange {
    pub from: Option<ReservationStatus>,
    pub to: ReservationStatus,
    pub at: DateTime<Utc>,
    pub by: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reservation {
    pub reference: Uuid,
    pub requester: Requester,
    pub details: ReservationDetails,
    pub status: ReservationStatus,
    pub quoted_price_cents: Option<i64>,
    /// Itemized quote behind `quoted_price_cents`, frozen when it was attached.
    /// Absent when staff entered the price by hand.
    #[serde(default)]
    pub quote_breakdown: Option<PriceBreakdown>,
    pub notes: Vec<StaffNote>,
    pub timeline: Vec<StatusChange>,
    /// Compare-and-swap token, bumped by every stored mutation.
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    pub fn new(reference: Uuid, submission: Submission, now: DateTime<Utc>) -> Self {
        let status = submission.kind().initial_status();
        Self {
            reference,
            requester: submission.requester.normalized(),
            details: submission.details,
            status,
            quoted_price_cents: None,
            quote_breakdown: None,
            notes: Vec::new(),
            timeline: vec![StatusChange {
                from: None,
                to: status,
                at: now,
                by: "requester".to_string(),
            }],
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn kind(&self) -> ReservationKind {
        self.details.kind()
    }

    pub fn email(&self) -> &str {
        self.requester.email.expose()
    }

    /// Moves `updated_at` strictly forward, even when the clock has not.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        let floor = self.updated_at + chrono::Duration::microseconds(1);
        self.updated_at = now.max(floor);
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn requester(email: &str) -> Requester {
        Requester {
            name: "Jane Doe".to_string(),
            email: email.into(),
            phone: None,
            company: None,
        }
    }

    pub fn flight_submission(email: &str) -> Submission {
        Submission {
            requester: requester(email),
            details: ReservationDetails::FlightBooking(FlightDetails {
                trip_type: TripType::OneWay,
                origin: "JFK".to_string(),
                destination: "LHR".to_string(),
                departure_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
                departure_time: None,
                return_date: None,
                passenger_count: 4,
                aircraft_id: None,
                legs: vec![],
                catering_requested: true,
                ground_transport_requested: false,
                concierge_requested: false,
                special_requests: String::new(),
            }),
        }
    }

    pub fn charter_submission(email: &str) -> Submission {
        Submission {
            requester: requester(email),
            details: ReservationDetails::YachtCharter(CharterDetails {
                yacht_id: None,
                departure_port: "Monaco".to_string(),
                destination_port: "Portofino".to_string(),
                charter_start: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
                charter_end: NaiveDate::from_ymd_opt(2025, 7, 5).unwrap(),
                guest_count: 8,
                itinerary_description: String::new(),
                special_requests: String::new(),
            }),
        }
    }

    pub fn lease_submission(email: &str) -> Submission {
        Submission {
            requester: requester(email),
            details: ReservationDetails::LeaseInquiry(LeaseDetails {
                asset_type: LeaseAssetType::Aircraft,
                asset_id: None,
                lease_duration: LeaseDuration::Annual,
                preferred_start_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
                budget_range: "$2M-$3M".to_string(),
                usage_description: "Corporate shuttle".to_string(),
                additional_notes: String::new(),
            }),
        }
    }

    pub fn reservation(submission: Submission) -> Reservation {
        Reservation::new(Uuid::new_v4(), submission, Utc::now())
    }
}

pub mod asset;
pub mod commission;
pub mod pricing;
pub mod quote;

pub use asset::{Aircraft, AircraftCategory, AssetError, FleetCatalog, Yacht, YachtSize};
pub use commission::{CommissionPolicy, CommissionSetting, CommissionSnapshot};
pub use pricing::{AddOn, AddOnRates, AddOns, PriceBreakdown, PricingError, QuotePricingEngine, QuoteRequest, RateBasis};
pub use quote::{CharterQuote, CharterQuoteOptions, FlightQuote, FlightQuoteOptions, QuickEstimate, QuoteError, RouteQuoter};

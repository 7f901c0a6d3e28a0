//! Market data inputs for the pricers.
//!
//! # Components
//!
//! - [`MarketObservation`]: Immutable spot / vol / carry / rate snapshot
//! - [`VolQuote`], [`VolSmile`]: Implied volatility quotes for one expiry
//! - [`MarketDataProvider`]: Collaborator trait that produces the above
//! - [`StaticMarketData`]: In-memory provider
//! - [`TreasuryTenor`]: Listed treasury tenors for rate lookup

mod observation;
mod provider;
mod smile;

pub use observation::MarketObservation;
pub use provider::{MarketDataProvider, StaticMarketData, TreasuryTenor};
pub use smile::{VolQuote, VolSmile};

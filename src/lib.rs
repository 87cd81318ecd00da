//! Shipping cost calculation service.
//!
//! Produces a monetary shipping cost for a destination province/city name and
//! a package weight by consulting three layered configuration sources in
//! strict precedence order:
//!
//! 1. City overrides: a locality can fix a flat all-inclusive price, or pin
//!    the travel distance fed into zone pricing
//! 2. Zones and weight-banded rates: provinces grouped into pricing regions
//!    with a per-kilometer multiplier
//! 3. Global fallback config: base rate plus per-kilogram pricing when
//!    nothing matches
//!
//! Location matching ignores case and diacritics and strips qualifiers like
//! "Provincia de", so "Provincia de Loja" and "loja" resolve identically.
//! Missing configuration never fails a quote; it degrades to zero-valued
//! defaults.

pub mod domain;
pub mod error;
pub mod resolver;
pub mod store;

pub use error::{Result, ShippingError};
pub use resolver::ShippingCostResolver;
pub use store::{InMemoryShippingStore, PgShippingStore, ShippingStore};

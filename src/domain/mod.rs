//! Shipping configuration domain: location normalization plus the three
//! layered pricing sources (city overrides, zones with weight-banded rates,
//! global fallback config).

pub mod city;
pub mod config;
pub mod location;
pub mod rate;
pub mod zone;

pub use city::{City, CityInput};
pub use config::{GlobalConfig, GlobalConfigInput};
pub use location::Location;
pub use rate::{Rate, RateInput};
pub use zone::{Zone, ZoneInput};

pub(crate) fn default_true() -> bool {
    true
}

//! Persistence seam for shipping configuration.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    City, CityInput, GlobalConfig, GlobalConfigInput, Location, Rate, RateInput, Zone, ZoneInput,
};
use crate::error::Result;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryShippingStore;
pub use postgres::PgShippingStore;

/// Storage contract for shipping configuration.
///
/// Read-path lookups are single-result with a defined order (oldest row
/// first), so cost resolution stays deterministic regardless of backend
/// iteration order.
#[async_trait]
pub trait ShippingStore: Send + Sync {
    /// First city whose normalized name or province equals `location`.
    async fn find_city(&self, location: &Location) -> Result<Option<City>>;
    /// Active zones in creation order.
    async fn list_active_zones(&self) -> Result<Vec<Zone>>;
    /// First active rate of `zone_id` whose weight band covers `weight_kg`.
    async fn find_rate(&self, zone_id: Uuid, weight_kg: f64) -> Result<Option<Rate>>;
    /// The canonical global config row, created with defaults when missing.
    async fn global_config(&self) -> Result<GlobalConfig>;

    async fn list_cities(&self) -> Result<Vec<City>>;
    async fn get_city(&self, id: Uuid) -> Result<Option<City>>;
    async fn create_city(&self, input: CityInput) -> Result<City>;
    async fn update_city(&self, id: Uuid, input: CityInput) -> Result<Option<City>>;
    async fn delete_city(&self, id: Uuid) -> Result<bool>;

    async fn list_zones(&self) -> Result<Vec<Zone>>;
    async fn get_zone(&self, id: Uuid) -> Result<Option<Zone>>;
    async fn create_zone(&self, input: ZoneInput) -> Result<Zone>;
    async fn update_zone(&self, id: Uuid, input: ZoneInput) -> Result<Option<Zone>>;
    /// Deleting a zone also deletes its rates.
    async fn delete_zone(&self, id: Uuid) -> Result<bool>;

    async fn list_zone_rates(&self, zone_id: Uuid) -> Result<Vec<Rate>>;
    /// Fails with [`crate::ShippingError::ZoneNotFound`] when the zone is missing.
    async fn create_rate(&self, zone_id: Uuid, input: RateInput) -> Result<Rate>;
    async fn update_rate(&self, id: Uuid, input: RateInput) -> Result<Option<Rate>>;
    async fn delete_rate(&self, id: Uuid) -> Result<bool>;

    /// Overwrites the canonical config row, creating it first when absent.
    async fn update_global_config(&self, input: GlobalConfigInput) -> Result<GlobalConfig>;
}

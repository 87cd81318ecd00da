//! In-memory shipping store for tests and embedded use. Not durable.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::ShippingStore;
use crate::domain::{
    City, CityInput, GlobalConfig, GlobalConfigInput, Location, Rate, RateInput, Zone, ZoneInput,
};
use crate::error::{Result, ShippingError};

/// Mutex-guarded, insertion-ordered store mirroring the Postgres semantics:
/// reads follow creation order, the config row is created on demand, and
/// deleting a zone takes its rates with it.
#[derive(Default)]
pub struct InMemoryShippingStore {
    cities: Mutex<Vec<City>>,
    zones: Mutex<Vec<Zone>>,
    rates: Mutex<Vec<Rate>>,
    config: Mutex<Vec<GlobalConfig>>,
}

impl InMemoryShippingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn new_city(input: CityInput) -> City {
    let now = Utc::now();
    City {
        id: Uuid::new_v4(),
        name: input.name,
        province: input.province,
        distance_km: input.distance_km,
        is_custom_rate: input.is_custom_rate,
        custom_price: input.custom_price,
        created_at: now,
        updated_at: now,
    }
}

fn new_zone(input: ZoneInput) -> Zone {
    let now = Utc::now();
    Zone {
        id: Uuid::new_v4(),
        name: input.name,
        provinces: input.provinces,
        multiplier: input.multiplier,
        active: input.active,
        created_at: now,
        updated_at: now,
    }
}

fn new_rate(zone_id: Uuid, input: RateInput) -> Rate {
    let now = Utc::now();
    Rate {
        id: Uuid::new_v4(),
        zone_id,
        min_weight_kg: input.min_weight_kg,
        max_weight_kg: input.max_weight_kg,
        price: input.price,
        active: input.active,
        created_at: now,
        updated_at: now,
    }
}

fn new_config(input: GlobalConfigInput) -> GlobalConfig {
    let now = Utc::now();
    GlobalConfig {
        id: Uuid::new_v4(),
        base_rate: input.base_rate,
        rate_per_km: input.rate_per_km,
        rate_per_kg: input.rate_per_kg,
        iva_rate: input.iva_rate,
        is_active: input.is_active,
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl ShippingStore for InMemoryShippingStore {
    async fn find_city(&self, location: &Location) -> Result<Option<City>> {
        let cities = self.cities.lock().unwrap_or_else(|e| e.into_inner());
        Ok(cities.iter().find(|c| c.is_named(location)).cloned())
    }

    async fn list_active_zones(&self) -> Result<Vec<Zone>> {
        let zones = self.zones.lock().unwrap_or_else(|e| e.into_inner());
        Ok(zones.iter().filter(|z| z.active).cloned().collect())
    }

    async fn find_rate(&self, zone_id: Uuid, weight_kg: f64) -> Result<Option<Rate>> {
        let rates = self.rates.lock().unwrap_or_else(|e| e.into_inner());
        Ok(rates
            .iter()
            .find(|r| r.zone_id == zone_id && r.active && r.covers_weight(weight_kg))
            .cloned())
    }

    async fn global_config(&self) -> Result<GlobalConfig> {
        let mut config = self.config.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(existing) = config.first() {
            return Ok(existing.clone());
        }
        let created = new_config(GlobalConfigInput::default());
        config.push(created.clone());
        Ok(created)
    }

    async fn list_cities(&self) -> Result<Vec<City>> {
        let cities = self.cities.lock().unwrap_or_else(|e| e.into_inner());
        Ok(cities.clone())
    }

    async fn get_city(&self, id: Uuid) -> Result<Option<City>> {
        let cities = self.cities.lock().unwrap_or_else(|e| e.into_inner());
        Ok(cities.iter().find(|c| c.id == id).cloned())
    }

    async fn create_city(&self, input: CityInput) -> Result<City> {
        let city = new_city(input);
        let mut cities = self.cities.lock().unwrap_or_else(|e| e.into_inner());
        cities.push(city.clone());
        Ok(city)
    }

    async fn update_city(&self, id: Uuid, input: CityInput) -> Result<Option<City>> {
        let mut cities = self.cities.lock().unwrap_or_else(|e| e.into_inner());
        let Some(city) = cities.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        city.name = input.name;
        city.province = input.province;
        city.distance_km = input.distance_km;
        city.is_custom_rate = input.is_custom_rate;
        city.custom_price = input.custom_price;
        city.updated_at = Utc::now();
        Ok(Some(city.clone()))
    }

    async fn delete_city(&self, id: Uuid) -> Result<bool> {
        let mut cities = self.cities.lock().unwrap_or_else(|e| e.into_inner());
        let before = cities.len();
        cities.retain(|c| c.id != id);
        Ok(cities.len() < before)
    }

    async fn list_zones(&self) -> Result<Vec<Zone>> {
        let zones = self.zones.lock().unwrap_or_else(|e| e.into_inner());
        Ok(zones.clone())
    }

    async fn get_zone(&self, id: Uuid) -> Result<Option<Zone>> {
        let zones = self.zones.lock().unwrap_or_else(|e| e.into_inner());
        Ok(zones.iter().find(|z| z.id == id).cloned())
    }

    async fn create_zone(&self, input: ZoneInput) -> Result<Zone> {
        let zone = new_zone(input);
        let mut zones = self.zones.lock().unwrap_or_else(|e| e.into_inner());
        zones.push(zone.clone());
        Ok(zone)
    }

    async fn update_zone(&self, id: Uuid, input: ZoneInput) -> Result<Option<Zone>> {
        let mut zones = self.zones.lock().unwrap_or_else(|e| e.into_inner());
        let Some(zone) = zones.iter_mut().find(|z| z.id == id) else {
            return Ok(None);
        };
        zone.name = input.name;
        zone.provinces = input.provinces;
        zone.multiplier = input.multiplier;
        zone.active = input.active;
        zone.updated_at = Utc::now();
        Ok(Some(zone.clone()))
    }

    async fn delete_zone(&self, id: Uuid) -> Result<bool> {
        let mut zones = self.zones.lock().unwrap_or_else(|e| e.into_inner());
        let before = zones.len();
        zones.retain(|z| z.id != id);
        if zones.len() == before {
            return Ok(false);
        }
        let mut rates = self.rates.lock().unwrap_or_else(|e| e.into_inner());
        rates.retain(|r| r.zone_id != id);
        Ok(true)
    }

    async fn list_zone_rates(&self, zone_id: Uuid) -> Result<Vec<Rate>> {
        let rates = self.rates.lock().unwrap_or_else(|e| e.into_inner());
        Ok(rates.iter().filter(|r| r.zone_id == zone_id).cloned().collect())
    }

    async fn create_rate(&self, zone_id: Uuid, input: RateInput) -> Result<Rate> {
        if self.get_zone(zone_id).await?.is_none() {
            return Err(ShippingError::ZoneNotFound);
        }
        let rate = new_rate(zone_id, input);
        let mut rates = self.rates.lock().unwrap_or_else(|e| e.into_inner());
        rates.push(rate.clone());
        Ok(rate)
    }

    async fn update_rate(&self, id: Uuid, input: RateInput) -> Result<Option<Rate>> {
        let mut rates = self.rates.lock().unwrap_or_else(|e| e.into_inner());
        let Some(rate) = rates.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        rate.min_weight_kg = input.min_weight_kg;
        rate.max_weight_kg = input.max_weight_kg;
        rate.price = input.price;
        rate.active = input.active;
        rate.updated_at = Utc::now();
        Ok(Some(rate.clone()))
    }

    async fn delete_rate(&self, id: Uuid) -> Result<bool> {
        let mut rates = self.rates.lock().unwrap_or_else(|e| e.into_inner());
        let before = rates.len();
        rates.retain(|r| r.id != id);
        Ok(rates.len() < before)
    }

    async fn update_global_config(&self, input: GlobalConfigInput) -> Result<GlobalConfig> {
        let mut config = self.config.lock().unwrap_or_else(|e| e.into_inner());
        if config.is_empty() {
            config.push(new_config(GlobalConfigInput::default()));
        }
        let row = &mut config[0];
        row.base_rate = input.base_rate;
        row.rate_per_km = input.rate_per_km;
        row.rate_per_kg = input.rate_per_kg;
        row.iva_rate = input.iva_rate;
        row.is_active = input.is_active;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }
}

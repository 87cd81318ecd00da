//! Shipping cost resolution.
//!
//! Layered precedence: city overrides, then zone/rate tables, then the global
//! fallback config. Missing configuration never fails a quote; every absent
//! piece degrades to a zero-valued default.

use std::sync::Arc;

use crate::domain::Location;
use crate::error::Result;
use crate::store::ShippingStore;

/// Resolves a shipping cost from a destination name and a package weight.
///
/// Stateless: every call re-reads the configuration sources, so quotes always
/// reflect the current admin data. Read-only and safe to share across
/// requests.
#[derive(Clone)]
pub struct ShippingCostResolver {
    store: Arc<dyn ShippingStore>,
}

impl ShippingCostResolver {
    pub fn new(store: Arc<dyn ShippingStore>) -> Self {
        Self { store }
    }

    /// Cost in USD for shipping `weight_kg` to `location_name`.
    ///
    /// Resolution order:
    /// 1. A city override with a custom flat price short-circuits everything,
    ///    weight included.
    /// 2. Otherwise a matched city contributes its distance, and the first
    ///    active zone covering the input (or the city's province) prices the
    ///    quote as `distance * multiplier + rate_price`, rounded to cents.
    ///    `rate_price` comes from the zone's weight band and is 0 when no
    ///    band covers the weight.
    /// 3. With no zone match the global config prices `base_rate + weight_kg
    ///    * rate_per_kg`, un-rounded, or 0 when the config is inactive.
    pub async fn calculate(&self, location_name: &str, weight_kg: f64) -> Result<f64> {
        let location = Location::normalize(location_name);

        let city = self.store.find_city(&location).await?;
        if let Some(city) = &city {
            if city.is_custom_rate {
                tracing::debug!(city = %city.name, "using custom city rate");
                return Ok(city.custom_price.unwrap_or(0.0));
            }
        }
        let distance_km = city.as_ref().map_or(0.0, |c| c.distance_km);
        let city_province = city.as_ref().map(|c| Location::normalize(&c.province));

        let zones = self.store.list_active_zones().await?;
        let Some(zone) = zones.iter().find(|z| z.covers(&location, city_province.as_ref()))
        else {
            let config = self.store.global_config().await?;
            if !config.is_active {
                return Ok(0.0);
            }
            tracing::debug!(%location, "no zone matched, using global fallback");
            return Ok(config.base_rate + weight_kg * config.rate_per_kg);
        };

        let rate_price = self
            .store
            .find_rate(zone.id, weight_kg)
            .await?
            .map_or(0.0, |r| r.price);
        tracing::debug!(zone = %zone.name, distance_km, rate_price, "zone pricing");
        Ok(round_to_cents(distance_km * zone.multiplier + rate_price))
    }
}

/// Round half away from zero to 2 decimal places.
fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CityInput, GlobalConfigInput, RateInput, ZoneInput};
    use crate::store::InMemoryShippingStore;
    use uuid::Uuid;

    fn resolver(store: &Arc<InMemoryShippingStore>) -> ShippingCostResolver {
        ShippingCostResolver::new(store.clone())
    }

    async fn seed_city(store: &InMemoryShippingStore, name: &str, province: &str, distance_km: f64) {
        store
            .create_city(CityInput {
                name: name.into(),
                province: province.into(),
                distance_km,
                is_custom_rate: false,
                custom_price: None,
            })
            .await
            .unwrap();
    }

    async fn seed_custom_city(store: &InMemoryShippingStore, name: &str, price: Option<f64>) {
        store
            .create_city(CityInput {
                name: name.into(),
                province: "Pichincha".into(),
                distance_km: 0.0,
                is_custom_rate: true,
                custom_price: price,
            })
            .await
            .unwrap();
    }

    async fn seed_zone(
        store: &InMemoryShippingStore,
        name: &str,
        provinces: &[&str],
        multiplier: f64,
        active: bool,
    ) -> Uuid {
        store
            .create_zone(ZoneInput {
                name: name.into(),
                provinces: provinces.iter().map(|p| p.to_string()).collect(),
                multiplier,
                active,
            })
            .await
            .unwrap()
            .id
    }

    async fn seed_rate(store: &InMemoryShippingStore, zone_id: Uuid, min: f64, max: f64, price: f64) {
        store
            .create_rate(zone_id, RateInput {
                min_weight_kg: min,
                max_weight_kg: max,
                price,
                active: true,
            })
            .await
            .unwrap();
    }

    async fn set_config(store: &InMemoryShippingStore, base_rate: f64, rate_per_kg: f64, is_active: bool) {
        store
            .update_global_config(GlobalConfigInput {
                base_rate,
                rate_per_km: 0.1,
                rate_per_kg,
                iva_rate: 0.15,
                is_active,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn inactive_config_prices_unmatched_location_at_zero() {
        let store = Arc::new(InMemoryShippingStore::new());
        set_config(&store, 4.0, 0.25, false).await;
        let r = resolver(&store);
        assert_eq!(r.calculate("atlantis", 0.0).await.unwrap(), 0.0);
        assert_eq!(r.calculate("atlantis", 12.0).await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn global_fallback_prices_base_plus_weight() {
        let store = Arc::new(InMemoryShippingStore::new());
        set_config(&store, 4.0, 0.25, true).await;
        let r = resolver(&store);
        assert_eq!(r.calculate("atlantis", 3.0).await.unwrap(), 4.75);
        assert_eq!(r.calculate("atlantis", 0.0).await.unwrap(), 4.0);
    }

    #[tokio::test]
    async fn global_fallback_is_not_rounded() {
        let store = Arc::new(InMemoryShippingStore::new());
        set_config(&store, 5.0, 0.333, true).await;
        let r = resolver(&store);
        let cost = r.calculate("atlantis", 1.0).await.unwrap();
        assert_eq!(cost, 5.0 + 0.333);
        assert_ne!(cost, 5.33);
    }

    #[tokio::test]
    async fn empty_store_quotes_with_default_config() {
        let store = Arc::new(InMemoryShippingStore::new());
        let r = resolver(&store);
        // Defaults: base 5.0, 0.5 per kg, active.
        assert_eq!(r.calculate("anywhere", 2.0).await.unwrap(), 6.0);
    }

    #[tokio::test]
    async fn custom_city_price_ignores_weight() {
        let store = Arc::new(InMemoryShippingStore::new());
        seed_custom_city(&store, "Quito", Some(7.5)).await;
        let r = resolver(&store);
        assert_eq!(r.calculate("Quito", 0.0).await.unwrap(), 7.5);
        assert_eq!(r.calculate("quito", 120.0).await.unwrap(), 7.5);
    }

    #[tokio::test]
    async fn custom_city_without_price_quotes_zero() {
        let store = Arc::new(InMemoryShippingStore::new());
        seed_custom_city(&store, "Quito", None).await;
        let r = resolver(&store);
        assert_eq!(r.calculate("Quito", 2.0).await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn zone_prices_distance_plus_weight_band() {
        let store = Arc::new(InMemoryShippingStore::new());
        seed_city(&store, "Loja", "Loja", 5.0).await;
        let zone = seed_zone(&store, "Sierra", &["Loja"], 0.35, true).await;
        seed_rate(&store, zone, 1.0, 3.0, 2.0).await;
        let r = resolver(&store);
        assert_eq!(r.calculate("Loja", 2.0).await.unwrap(), 3.75);
    }

    #[tokio::test]
    async fn normalization_equivalence() {
        let store = Arc::new(InMemoryShippingStore::new());
        seed_city(&store, "Loja", "Loja", 5.0).await;
        let zone = seed_zone(&store, "Sierra", &["Loja"], 0.35, true).await;
        seed_rate(&store, zone, 1.0, 3.0, 2.0).await;
        let r = resolver(&store);
        let expected = r.calculate("loja", 2.0).await.unwrap();
        assert_eq!(r.calculate("Provincia de Loja", 2.0).await.unwrap(), expected);
        assert_eq!(r.calculate("LOJA ", 2.0).await.unwrap(), expected);
    }

    #[tokio::test]
    async fn weight_outside_bands_prices_distance_only() {
        let store = Arc::new(InMemoryShippingStore::new());
        seed_city(&store, "Loja", "Loja", 5.0).await;
        let zone = seed_zone(&store, "Sierra", &["Loja"], 0.35, true).await;
        seed_rate(&store, zone, 1.0, 3.0, 2.0).await;
        let r = resolver(&store);
        assert_eq!(r.calculate("Loja", 10.0).await.unwrap(), 1.75);
    }

    #[tokio::test]
    async fn city_routes_to_zone_through_its_province() {
        let store = Arc::new(InMemoryShippingStore::new());
        seed_city(&store, "Cuenca", "Azuay", 8.0).await;
        seed_zone(&store, "Austro", &["Azuay"], 0.5, true).await;
        let r = resolver(&store);
        // Input names the city; the zone only lists the province.
        assert_eq!(r.calculate("cuenca", 2.0).await.unwrap(), 4.0);
    }

    #[tokio::test]
    async fn input_matching_zone_without_city_has_zero_distance() {
        let store = Arc::new(InMemoryShippingStore::new());
        let zone = seed_zone(&store, "Austro", &["Azuay"], 0.5, true).await;
        seed_rate(&store, zone, 0.0, 10.0, 3.25).await;
        let r = resolver(&store);
        assert_eq!(r.calculate("Azuay", 2.0).await.unwrap(), 3.25);
    }

    #[tokio::test]
    async fn inactive_zone_falls_back_to_config() {
        let store = Arc::new(InMemoryShippingStore::new());
        seed_zone(&store, "Insular", &["Galápagos"], 2.0, false).await;
        set_config(&store, 4.0, 0.25, true).await;
        let r = resolver(&store);
        assert_eq!(r.calculate("Galápagos", 2.0).await.unwrap(), 4.5);
    }

    #[tokio::test]
    async fn first_created_zone_wins_on_province_overlap() {
        let store = Arc::new(InMemoryShippingStore::new());
        let first = seed_zone(&store, "Costa A", &["Manabí"], 0.2, true).await;
        let second = seed_zone(&store, "Costa B", &["Manabí"], 0.9, true).await;
        seed_rate(&store, first, 0.0, 100.0, 3.0).await;
        seed_rate(&store, second, 0.0, 100.0, 9.0).await;
        let r = resolver(&store);
        assert_eq!(r.calculate("Manabí", 1.0).await.unwrap(), 3.0);
    }

    #[tokio::test]
    async fn zone_path_rounds_to_cents() {
        let store = Arc::new(InMemoryShippingStore::new());
        seed_city(&store, "Zaruma", "El Oro", 7.0).await;
        seed_zone(&store, "Costa", &["El Oro"], 0.123, true).await;
        let r = resolver(&store);
        // 7 * 0.123 = 0.861, rounded to 0.86.
        assert_eq!(r.calculate("Zaruma", 1.0).await.unwrap(), 0.86);
    }

    #[tokio::test]
    async fn non_custom_city_ignores_stale_custom_price() {
        let store = Arc::new(InMemoryShippingStore::new());
        store
            .create_city(CityInput {
                name: "Ambato".into(),
                province: "Tungurahua".into(),
                distance_km: 4.0,
                is_custom_rate: false,
                custom_price: Some(99.0),
            })
            .await
            .unwrap();
        seed_zone(&store, "Sierra", &["Tungurahua"], 0.5, true).await;
        let r = resolver(&store);
        assert_eq!(r.calculate("Ambato", 1.0).await.unwrap(), 2.0);
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_to_cents(0.125), 0.13);
        assert_eq!(round_to_cents(2.674), 2.67);
        assert_eq!(round_to_cents(3.0), 3.0);
    }
}

use super::geocode_cache::GeocodeCache;
use crate::domain::catalog::{Catalog, RestaurantId};
use crate::error::Result;
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRestaurant {
    pub restaurant: RestaurantId,
    pub name: String,
    pub distance_km: f64,
}

/// Orders candidate restaurants by geodesic distance from a delivery address.
pub struct DistanceRanker<'a> {
    catalog: &'a Catalog,
    cache: &'a GeocodeCache,
}

impl<'a> DistanceRanker<'a> {
    pub fn new(catalog: &'a Catalog, cache: &'a GeocodeCache) -> Self {
        Self { catalog, cache }
    }

    /// Nearest first. Equal distances keep the candidates' order.
    ///
    /// Restaurants whose address cannot be located, or that are missing from
    /// the catalog, are left out. An unlocatable customer address gives an
    /// empty ranking.
    pub async fn rank(
        &self,
        candidates: &[RestaurantId],
        customer_address: &str,
    ) -> Result<Vec<RankedRestaurant>> {
        let Some(customer) = self.cache.coordinates_for(customer_address).await? else {
            debug!(customer_address, "customer address unknown, nothing to rank");
            return Ok(Vec::new());
        };

        let mut ranked = Vec::with_capacity(candidates.len());
        for &id in candidates {
            let Some(restaurant) = self.catalog.restaurant(id) else {
                debug!(%id, "candidate missing from catalog");
                continue;
            };
            let Some(location) = self.cache.coordinates_for(&restaurant.address).await? else {
                debug!(%id, address = %restaurant.address, "restaurant address unknown");
                continue;
            };
            ranked.push(RankedRestaurant {
                restaurant: id,
                name: restaurant.name.clone(),
                distance_km: customer.distance_km(&location),
            });
        }

        ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        Ok(ranked)
    }

    /// Ranks a resolver result, taking candidates in ascending id order.
    pub async fn rank_set(
        &self,
        candidates: &HashSet<RestaurantId>,
        customer_address: &str,
    ) -> Result<Vec<RankedRestaurant>> {
        let mut ordered: Vec<RestaurantId> = candidates.iter().copied().collect();
        ordered.sort();
        self.rank(&ordered, customer_address).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::Restaurant;
    use crate::domain::place::Coordinates;
    use crate::infrastructure::in_memory::{InMemoryPlaceStore, StaticGeocoder};
    use rand::seq::SliceRandom;

    const X: RestaurantId = RestaurantId(1);
    const Y: RestaurantId = RestaurantId(2);
    const Z: RestaurantId = RestaurantId(3);
    const LOST: RestaurantId = RestaurantId(4);

    fn at(lat: f64, lon: f64) -> Coordinates {
        Coordinates::new(lat, lon).unwrap()
    }

    fn fixture() -> (Catalog, GeocodeCache) {
        let mut catalog = Catalog::new();
        for (id, address) in [
            (X, "X street"),
            (Y, "Y street"),
            (Z, "Z street"),
            (LOST, "Lost street"),
        ] {
            catalog.add_restaurant(Restaurant {
                id,
                name: format!("R{}", id.0),
                address: address.to_string(),
                contact_phone: String::new(),
            });
        }
        let geocoder = StaticGeocoder::new([
            ("Customer".to_string(), at(55.0, 37.0)),
            ("X street".to_string(), at(55.1, 37.1)),
            ("Y street".to_string(), at(56.0, 38.0)),
            // Same point as X: equal distance.
            ("Z street".to_string(), at(55.1, 37.1)),
        ]);
        let cache = GeocodeCache::new(Box::new(InMemoryPlaceStore::new()), Box::new(geocoder));
        (catalog, cache)
    }

    #[tokio::test]
    async fn test_rank_ascending_by_distance() {
        let (catalog, cache) = fixture();
        let ranker = DistanceRanker::new(&catalog, &cache);

        let ranked = ranker.rank(&[Y, X], "Customer").await.unwrap();
        let ids: Vec<RestaurantId> = ranked.iter().map(|r| r.restaurant).collect();
        assert_eq!(ids, vec![X, Y]);
        assert!((ranked[0].distance_km - 12.8).abs() < 0.5);
        assert!((ranked[1].distance_km - 128.0).abs() < 3.0);
        assert_eq!(ranked[0].name, "R1");
    }

    #[tokio::test]
    async fn test_unknown_restaurant_address_is_excluded() {
        let (catalog, cache) = fixture();
        let ranker = DistanceRanker::new(&catalog, &cache);

        let ranked = ranker.rank(&[LOST, Y], "Customer").await.unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].restaurant, Y);

        assert!(ranker.rank(&[LOST], "Customer").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_customer_address_ranks_nothing() {
        let (catalog, cache) = fixture();
        let ranker = DistanceRanker::new(&catalog, &cache);
        assert!(ranker.rank(&[X, Y], "Atlantis").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_restaurant_is_excluded() {
        let (catalog, cache) = fixture();
        let ranker = DistanceRanker::new(&catalog, &cache);
        let ranked = ranker.rank(&[RestaurantId(99), X], "Customer").await.unwrap();
        assert_eq!(ranked.len(), 1);
    }

    #[tokio::test]
    async fn test_equal_distances_keep_candidate_order() {
        let (catalog, cache) = fixture();
        let ranker = DistanceRanker::new(&catalog, &cache);

        let ranked = ranker.rank(&[Z, Y, X], "Customer").await.unwrap();
        let ids: Vec<RestaurantId> = ranked.iter().map(|r| r.restaurant).collect();
        assert_eq!(ids, vec![Z, X, Y]);

        let ranked = ranker.rank(&[X, Y, Z], "Customer").await.unwrap();
        let ids: Vec<RestaurantId> = ranked.iter().map(|r| r.restaurant).collect();
        assert_eq!(ids, vec![X, Z, Y]);
    }

    #[tokio::test]
    async fn test_sorted_for_shuffled_input() {
        let (catalog, cache) = fixture();
        let ranker = DistanceRanker::new(&catalog, &cache);
        let mut rng = rand::thread_rng();

        for _ in 0..20 {
            let mut candidates = vec![X, Y, Z, LOST];
            candidates.shuffle(&mut rng);
            let ranked = ranker.rank(&candidates, "Customer").await.unwrap();

            assert_eq!(ranked.len(), 3);
            assert!(ranked.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));
            // X and Z tie; their relative order follows the input.
            let pos = |id| candidates.iter().position(|&c| c == id).unwrap();
            let tied: Vec<RestaurantId> = ranked
                .iter()
                .map(|r| r.restaurant)
                .filter(|&id| id == X || id == Z)
                .collect();
            let expected = if pos(X) < pos(Z) { vec![X, Z] } else { vec![Z, X] };
            assert_eq!(tied, expected);
        }
    }

    #[tokio::test]
    async fn test_rank_set_is_deterministic() {
        let (catalog, cache) = fixture();
        let ranker = DistanceRanker::new(&catalog, &cache);
        let set = HashSet::from([Z, X, Y]);
        let ids: Vec<RestaurantId> = ranker
            .rank_set(&set, "Customer")
            .await
            .unwrap()
            .iter()
            .map(|r| r.restaurant)
            .collect();
        assert_eq!(ids, vec![X, Z, Y]);
    }
}

use std::collections::HashMap;

use waymark_core::{GeoPoint, RouteSummary};

use crate::{GeocodedPlace, PlaceCandidate, PlaceResolver, ResolveError, RouteProvider};

const ROAD_FACTOR: f64 = 1.25;
const AVERAGE_SPEED_MPS: f64 = 24.6;
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

// Deterministic in-memory resolver used by tests, demos, and keyless runs.
// Candidate tables intentionally contain closed and duplicate entries so the
// pipeline's filter policy is exercised.
#[derive(Debug, Clone, Default)]
pub struct FixtureResolver {
    geocodes: HashMap<String, GeocodedPlace>,
    places: Vec<(String, PlaceCandidate)>,
}

impl FixtureResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut fixture = Self::new();

        for (name, lat, lon) in [
            ("dallas", 32.7767, -96.7970),
            ("austin", 30.2672, -97.7431),
            ("houston", 29.7604, -95.3698),
            ("new york", 40.7128, -74.0060),
            ("philadelphia", 39.9526, -75.1652),
            ("san francisco", 37.7749, -122.4194),
            ("napa valley", 38.5025, -122.2654),
            ("sonoma", 38.2919, -122.4580),
            ("los angeles", 34.0522, -118.2437),
            ("chicago", 41.8781, -87.6298),
            ("denver", 39.7392, -104.9903),
            ("seattle", 47.6062, -122.3321),
            ("portland", 45.5152, -122.6784),
            ("yosemite national park", 37.8651, -119.5383),
        ] {
            fixture = fixture.with_geocode(name, GeoPoint::new(lat, lon), Some("USA"));
        }

        fixture
            .with_place("walmart", open_place("Walmart Supercenter", "200 Main St, Dallas, TX", 32.78, -96.80))
            .with_place("walmart", open_place("Walmart Supercenter", "200 Main St, Dallas, TX", 32.78, -96.80))
            .with_place("walmart", closed_place("Walmart Neighborhood Market", "77 Oak Ave, Dallas, TX", 32.75, -96.82))
            .with_place("walmart", open_place("Walmart Supercenter", "901 Loop 12, Dallas, TX", 32.70, -96.88))
            .with_place("coffee", open_place("Mudsmith Coffee", "2114 Greenville Ave, Dallas, TX", 32.82, -96.77))
            .with_place("coffee", closed_place("Night Owl Espresso", "400 Elm St, Dallas, TX", 32.78, -96.81))
            .with_place("coffee", open_place("Drip Coffee Co", "4343 Lovers Ln, Dallas, TX", 32.85, -96.79))
            .with_place("gas station", open_place("QuikTrip", "1401 Inwood Rd, Dallas, TX", 32.80, -96.83))
            .with_place("pharmacy", open_place("CVS Pharmacy", "3133 Knox St, Dallas, TX", 32.82, -96.79))
            .with_place("atm", open_place("Chase ATM", "1100 Commerce St, Dallas, TX", 32.78, -96.80))
    }

    pub fn with_geocode(
        mut self,
        name: &str,
        position: GeoPoint,
        country_code: Option<&str>,
    ) -> Self {
        self.geocodes.insert(
            name.to_lowercase(),
            GeocodedPlace {
                position,
                country_code: country_code.map(str::to_string),
            },
        );
        self
    }

    pub fn with_place(mut self, keyword: &str, candidate: PlaceCandidate) -> Self {
        self.places.push((keyword.to_lowercase(), candidate));
        self
    }
}

fn open_place(title: &str, address: &str, lat: f64, lon: f64) -> PlaceCandidate {
    PlaceCandidate {
        title: title.to_string(),
        address: address.to_string(),
        position: GeoPoint::new(lat, lon),
        is_open: true,
    }
}

fn closed_place(title: &str, address: &str, lat: f64, lon: f64) -> PlaceCandidate {
    PlaceCandidate {
        is_open: false,
        ..open_place(title, address, lat, lon)
    }
}

impl PlaceResolver for FixtureResolver {
    async fn geocode(
        &self,
        name: &str,
        country_hint: Option<&str>,
    ) -> Result<Option<GeocodedPlace>, ResolveError> {
        let found = self.geocodes.get(&name.trim().to_lowercase());

        let scoped = found.filter(|place| match country_hint {
            Some(hint) => place.country_code.as_deref() == Some(hint),
            None => true,
        });

        Ok(scoped.cloned())
    }

    async fn search_nearby(
        &self,
        query: &str,
        _at: GeoPoint,
        limit: usize,
    ) -> Result<Vec<PlaceCandidate>, ResolveError> {
        let query = query.to_lowercase();

        Ok(self
            .places
            .iter()
            .filter(|(keyword, _)| query.contains(keyword.as_str()))
            .map(|(_, candidate)| candidate.clone())
            .take(limit)
            .collect())
    }
}

impl RouteProvider for FixtureResolver {
    async fn route(
        &self,
        start: GeoPoint,
        end: GeoPoint,
    ) -> Result<Option<RouteSummary>, ResolveError> {
        let mean_lat = ((start.lat + end.lat) / 2.0).to_radians();
        let dx = (end.lon - start.lon).to_radians() * mean_lat.cos();
        let dy = (end.lat - start.lat).to_radians();
        let crow_meters = (dx * dx + dy * dy).sqrt() * EARTH_RADIUS_METERS;

        let distance_meters = (crow_meters * ROAD_FACTOR) as u64;
        let duration_seconds = (crow_meters * ROAD_FACTOR / AVERAGE_SPEED_MPS) as u64;

        Ok(Some(RouteSummary {
            distance_meters,
            duration_seconds,
            polyline: format!(
                "fixture:{:.4},{:.4};{:.4},{:.4}",
                start.lat, start.lon, end.lat, end.lon
            ),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn geocodes_known_city() {
        let fixture = FixtureResolver::with_defaults();
        let place = fixture.geocode("Dallas", None).await.unwrap().unwrap();
        assert!((place.position.lat - 32.7767).abs() < 1e-6);
        assert_eq!(place.country_code.as_deref(), Some("USA"));
    }

    #[tokio::test]
    async fn unknown_name_is_not_found() {
        let fixture = FixtureResolver::with_defaults();
        assert!(fixture.geocode("atlantis", None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn country_hint_scopes_results() {
        let fixture = FixtureResolver::new().with_geocode(
            "springfield",
            GeoPoint::new(39.78, -89.65),
            Some("USA"),
        );

        assert!(fixture
            .geocode("springfield", Some("USA"))
            .await
            .unwrap()
            .is_some());
        assert!(fixture
            .geocode("springfield", Some("CAN"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn search_returns_raw_candidates_up_to_limit() {
        let fixture = FixtureResolver::with_defaults();
        let anchor = GeoPoint::new(32.7767, -96.7970);

        let raw = fixture.search_nearby("a walmart", anchor, 10).await.unwrap();
        assert_eq!(raw.len(), 4);
        assert!(raw.iter().any(|candidate| !candidate.is_open));

        let limited = fixture.search_nearby("a walmart", anchor, 2).await.unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[tokio::test]
    async fn route_is_deterministic() {
        let fixture = FixtureResolver::with_defaults();
        let dallas = GeoPoint::new(32.7767, -96.7970);
        let austin = GeoPoint::new(30.2672, -97.7431);

        let first = fixture.route(dallas, austin).await.unwrap().unwrap();
        let second = fixture.route(dallas, austin).await.unwrap().unwrap();
        assert_eq!(first, second);
        assert!(first.distance_meters > 250_000);
        assert!(first.duration_seconds > 0);
    }
}

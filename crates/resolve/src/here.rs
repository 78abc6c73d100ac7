use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use waymark_core::{GeoPoint, RouteSummary};

use crate::{GeocodedPlace, PlaceCandidate, PlaceResolver, ResolveError, RouteProvider};

const GEOCODE_URL: &str = "https://geocode.search.hereapi.com/v1/geocode";
const DISCOVER_URL: &str = "https://discover.search.hereapi.com/v1/discover";
const ROUTING_URL: &str = "https://router.hereapi.com/v8/routes";

#[derive(Clone)]
pub struct HereResolver {
    client: Client,
    api_key: String,
}

impl HereResolver {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(6))
            .timeout(Duration::from_secs(20))
            .build()
            .context("failed to build resolver HTTP client")?;

        Ok(Self {
            client,
            api_key: api_key.into(),
        })
    }
}

impl PlaceResolver for HereResolver {
    async fn geocode(
        &self,
        name: &str,
        country_hint: Option<&str>,
    ) -> Result<Option<GeocodedPlace>, ResolveError> {
        let mut request = self
            .client
            .get(GEOCODE_URL)
            .query(&[("q", name), ("apiKey", self.api_key.as_str())]);

        if let Some(hint) = country_hint {
            let scope = format!("countryCode:{hint}");
            request = request.query(&[("in", scope.as_str())]);
        }

        let response: GeocodeResponse = request
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let Some(item) = response.items.into_iter().next() else {
            return Ok(None);
        };
        let Some(position) = item.position else {
            return Ok(None);
        };

        Ok(Some(GeocodedPlace {
            position: GeoPoint::new(position.lat, position.lng),
            country_code: item.address.and_then(|address| address.country_code),
        }))
    }

    async fn search_nearby(
        &self,
        query: &str,
        at: GeoPoint,
        limit: usize,
    ) -> Result<Vec<PlaceCandidate>, ResolveError> {
        let anchor = format!("{},{}", at.lat, at.lon);
        let limit = limit.to_string();

        let response: DiscoverResponse = self
            .client
            .get(DISCOVER_URL)
            .query(&[
                ("q", query),
                ("at", anchor.as_str()),
                ("limit", limit.as_str()),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let candidates = response
            .items
            .into_iter()
            .filter_map(|item| {
                let position = item.position?;
                Some(PlaceCandidate {
                    title: item.title.unwrap_or_default(),
                    address: item
                        .address
                        .and_then(|address| address.label)
                        .unwrap_or_default(),
                    position: GeoPoint::new(position.lat, position.lng),
                    is_open: item
                        .opening_hours
                        .first()
                        .map(|hours| hours.is_open)
                        .unwrap_or(false),
                })
            })
            .collect();

        Ok(candidates)
    }
}

impl RouteProvider for HereResolver {
    async fn route(
        &self,
        start: GeoPoint,
        end: GeoPoint,
    ) -> Result<Option<RouteSummary>, ResolveError> {
        let origin = format!("{},{}", start.lat, start.lon);
        let destination = format!("{},{}", end.lat, end.lon);

        let response: RoutingResponse = self
            .client
            .get(ROUTING_URL)
            .query(&[
                ("transportMode", "car"),
                ("origin", origin.as_str()),
                ("destination", destination.as_str()),
                ("return", "summary,polyline"),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let Some(route) = response.routes.into_iter().next() else {
            return Ok(None);
        };
        if route.sections.is_empty() {
            return Err(ResolveError::Payload("route without sections".to_string()));
        }

        let mut distance_meters = 0;
        let mut duration_seconds = 0;
        let mut polyline = String::new();

        for section in route.sections {
            let summary = section
                .summary
                .ok_or_else(|| ResolveError::Payload("route section without summary".to_string()))?;
            distance_meters += summary.length;
            duration_seconds += summary.duration;
            if polyline.is_empty() {
                polyline = section.polyline.unwrap_or_default();
            }
        }

        Ok(Some(RouteSummary {
            distance_meters,
            duration_seconds,
            polyline,
        }))
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    items: Vec<GeocodeItem>,
}

#[derive(Debug, Deserialize)]
struct GeocodeItem {
    position: Option<WirePosition>,
    address: Option<WireAddress>,
}

#[derive(Debug, Deserialize)]
struct WirePosition {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireAddress {
    label: Option<String>,
    country_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DiscoverResponse {
    #[serde(default)]
    items: Vec<DiscoverItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DiscoverItem {
    title: Option<String>,
    address: Option<WireAddress>,
    position: Option<WirePosition>,
    #[serde(default)]
    opening_hours: Vec<WireOpeningHours>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireOpeningHours {
    #[serde(default)]
    is_open: bool,
}

#[derive(Debug, Deserialize)]
struct RoutingResponse {
    #[serde(default)]
    routes: Vec<WireRoute>,
}

#[derive(Debug, Deserialize)]
struct WireRoute {
    #[serde(default)]
    sections: Vec<WireSection>,
}

#[derive(Debug, Deserialize)]
struct WireSection {
    summary: Option<WireSummary>,
    polyline: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireSummary {
    duration: u64,
    length: u64,
}

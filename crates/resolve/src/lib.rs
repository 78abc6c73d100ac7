mod fixture;
mod here;

use std::env;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use waymark_core::{GeoPoint, RouteSummary};

pub use fixture::FixtureResolver;
pub use here::HereResolver;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("resolver call failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("resolver call timed out")]
    Timeout,
    #[error("unexpected resolver payload: {0}")]
    Payload(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodedPlace {
    pub position: GeoPoint,
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    pub title: String,
    pub address: String,
    pub position: GeoPoint,
    pub is_open: bool,
}

pub trait PlaceResolver: Send + Sync {
    async fn geocode(
        &self,
        name: &str,
        country_hint: Option<&str>,
    ) -> Result<Option<GeocodedPlace>, ResolveError>;

    async fn search_nearby(
        &self,
        query: &str,
        at: GeoPoint,
        limit: usize,
    ) -> Result<Vec<PlaceCandidate>, ResolveError>;
}

pub trait RouteProvider: Send + Sync {
    async fn route(
        &self,
        start: GeoPoint,
        end: GeoPoint,
    ) -> Result<Option<RouteSummary>, ResolveError>;
}

#[derive(Clone)]
pub enum Resolver {
    Here(HereResolver),
    Fixture(FixtureResolver),
}

impl Resolver {
    pub fn from_env() -> anyhow::Result<Self> {
        if let Ok(api_key) = env::var("WAYMARK_HERE_API_KEY") {
            return Ok(Self::Here(HereResolver::new(api_key)?));
        }

        Ok(Self::Fixture(FixtureResolver::with_defaults()))
    }

    pub fn fixture() -> Self {
        Self::Fixture(FixtureResolver::with_defaults())
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Here(_) => "here",
            Self::Fixture(_) => "fixture",
        }
    }
}

impl PlaceResolver for Resolver {
    async fn geocode(
        &self,
        name: &str,
        country_hint: Option<&str>,
    ) -> Result<Option<GeocodedPlace>, ResolveError> {
        match self {
            Resolver::Here(resolver) => resolver.geocode(name, country_hint).await,
            Resolver::Fixture(resolver) => resolver.geocode(name, country_hint).await,
        }
    }

    async fn search_nearby(
        &self,
        query: &str,
        at: GeoPoint,
        limit: usize,
    ) -> Result<Vec<PlaceCandidate>, ResolveError> {
        match self {
            Resolver::Here(resolver) => resolver.search_nearby(query, at, limit).await,
            Resolver::Fixture(resolver) => resolver.search_nearby(query, at, limit).await,
        }
    }
}

impl RouteProvider for Resolver {
    async fn route(
        &self,
        start: GeoPoint,
        end: GeoPoint,
    ) -> Result<Option<RouteSummary>, ResolveError> {
        match self {
            Resolver::Here(resolver) => resolver.route(start, end).await,
            Resolver::Fixture(resolver) => resolver.route(start, end).await,
        }
    }
}

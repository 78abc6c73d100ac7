use std::collections::HashSet;
use std::env;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use tokio::time::timeout;
use tracing::{info, instrument};
use uuid::Uuid;

use waymark_core::{
    classify_intents, dedup_waypoints, extract_distance_constraints, extract_durations,
    extract_endpoints, extract_waypoints, filter_generic_locations, normalize_text, GeoPoint,
    Place, QueryAnalysis, ResolvedLocation, RouteSummary, TimeConstraints, TripResult, Waypoint,
};
use waymark_observability::AppMetrics;
use waymark_resolve::{PlaceCandidate, PlaceResolver, ResolveError, RouteProvider};
use waymark_tagger::TaggerStack;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub fallback_position: GeoPoint,
    pub fallback_country: String,
    pub places_per_waypoint: usize,
    pub search_fetch_limit: usize,
    pub resolver_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            // Dallas-area default.
            fallback_position: GeoPoint::new(32.7767, -96.7970),
            fallback_country: "USA".to_string(),
            places_per_waypoint: 2,
            search_fetch_limit: 10,
            resolver_timeout: Duration::from_secs(8),
        }
    }
}

impl PipelineConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let fallback_lat = env::var("WAYMARK_FALLBACK_LAT")
            .ok()
            .and_then(|value| value.parse::<f64>().ok())
            .unwrap_or(defaults.fallback_position.lat);
        let fallback_lon = env::var("WAYMARK_FALLBACK_LON")
            .ok()
            .and_then(|value| value.parse::<f64>().ok())
            .unwrap_or(defaults.fallback_position.lon);
        let fallback_country =
            env::var("WAYMARK_FALLBACK_COUNTRY").unwrap_or(defaults.fallback_country);
        let places_per_waypoint = env::var("WAYMARK_PLACES_PER_WAYPOINT")
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .unwrap_or(defaults.places_per_waypoint);
        let search_fetch_limit = env::var("WAYMARK_SEARCH_FETCH_LIMIT")
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .unwrap_or(defaults.search_fetch_limit);
        let resolver_timeout = Duration::from_secs(
            env::var("WAYMARK_RESOLVER_TIMEOUT_SECONDS")
                .ok()
                .and_then(|value| value.parse::<u64>().ok())
                .unwrap_or(defaults.resolver_timeout.as_secs()),
        );

        Self {
            fallback_position: GeoPoint::new(fallback_lat, fallback_lon),
            fallback_country,
            places_per_waypoint,
            search_fetch_limit,
            resolver_timeout,
        }
    }
}

#[derive(Clone)]
pub struct TripPipeline<R>
where
    R: PlaceResolver + RouteProvider,
{
    resolver: Arc<R>,
    tagger: TaggerStack,
    config: PipelineConfig,
    metrics: Arc<AppMetrics>,
}

impl<R> TripPipeline<R>
where
    R: PlaceResolver + RouteProvider,
{
    pub fn new(
        resolver: Arc<R>,
        tagger: TaggerStack,
        config: PipelineConfig,
        metrics: Arc<AppMetrics>,
    ) -> Self {
        Self {
            resolver,
            tagger,
            config,
            metrics,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn analyze(&self, query: &str) -> QueryAnalysis {
        let text = normalize_text(query);

        let endpoints = extract_endpoints(&text);
        let spans = self.tagger.place_mentions(&text);
        let generic_locations =
            filter_generic_locations(&spans, &endpoints.start, endpoints.end.as_deref());
        let waypoints = dedup_waypoints(extract_waypoints(&text), &generic_locations);

        QueryAnalysis {
            intents: classify_intents(&text),
            start: endpoints.start,
            start_explicit: endpoints.start_explicit,
            end: endpoints.end,
            waypoints,
            generic_locations,
            distance_constraints: extract_distance_constraints(&text),
            time_constraints: TimeConstraints {
                times: self.tagger.calendar_mentions(&text),
                durations: extract_durations(&text),
            },
        }
    }

    #[instrument(skip(self, query))]
    pub async fn run(&self, query: &str) -> TripResult {
        let started = Instant::now();
        self.metrics.inc_query();
        let query_id = Uuid::new_v4();

        let analysis = self.analyze(query);
        let mut notices = Vec::new();

        let (start, start_notices) = self
            .resolve_start(&analysis.start, analysis.start_explicit)
            .await;
        notices.extend(start_notices);

        let country_hint = if start.is_resolved() {
            start.country_code.clone()
        } else {
            None
        };
        let anchor = start.position.unwrap_or(self.config.fallback_position);

        let end_future = self.resolve_end(analysis.end.clone(), country_hint);
        let waypoint_futures = join_all(
            analysis
                .waypoints
                .iter()
                .cloned()
                .map(|waypoint| self.resolve_waypoint(waypoint, anchor)),
        );
        let ((end, end_notices), waypoint_results) = futures::join!(end_future, waypoint_futures);
        notices.extend(end_notices);

        let mut waypoints = Vec::with_capacity(waypoint_results.len());
        for (waypoint, waypoint_notices) in waypoint_results {
            waypoints.push(waypoint);
            notices.extend(waypoint_notices);
        }

        let (route, route_notices) = self.resolve_route(&start, end.as_ref()).await;
        notices.extend(route_notices);

        let result = TripResult {
            query: normalize_text(query),
            intents: analysis.intents,
            start,
            end,
            waypoints,
            generic_locations: analysis.generic_locations,
            distance_constraints: analysis.distance_constraints,
            time_constraints: analysis.time_constraints,
            route,
            notices,
        };

        self.metrics.observe_latency(started.elapsed());
        info!(
            query_id = %query_id,
            intents = result.intents.len(),
            waypoints = result.waypoints.len(),
            start_status = ?result.start.status,
            route = result.route.is_some(),
            "trip query assembled"
        );

        result
    }

    async fn resolve_start(
        &self,
        start: &str,
        start_explicit: bool,
    ) -> (ResolvedLocation, Vec<String>) {
        // A sentinel start never goes to the resolver; there is nothing to
        // geocode and the Fallback status already records the substitution.
        if !start_explicit {
            self.metrics.inc_resolver_fallback();
            return (
                self.fallback_location(start),
                vec!["start location not specified; using configured default position".to_string()],
            );
        }

        self.metrics.inc_resolver_call();
        match self.bounded(self.resolver.geocode(start, None)).await {
            Ok(Some(place)) => (
                ResolvedLocation::resolved(start, place.position, place.country_code),
                Vec::new(),
            ),
            Ok(None) => {
                self.metrics.inc_resolver_fallback();
                (
                    self.fallback_location(start),
                    vec![format!(
                        "could not geocode start '{start}'; using configured default position"
                    )],
                )
            }
            Err(error) => {
                self.metrics.inc_resolver_fallback();
                (
                    self.fallback_location(start),
                    vec![format!("start resolution failed ({error}); using configured default position")],
                )
            }
        }
    }

    async fn resolve_end(
        &self,
        end: Option<String>,
        country_hint: Option<String>,
    ) -> (Option<ResolvedLocation>, Vec<String>) {
        let Some(end) = end else {
            return (None, Vec::new());
        };

        self.metrics.inc_resolver_call();
        match self
            .bounded(self.resolver.geocode(&end, country_hint.as_deref()))
            .await
        {
            Ok(Some(place)) => (
                Some(ResolvedLocation::resolved(
                    &end,
                    place.position,
                    place.country_code,
                )),
                Vec::new(),
            ),
            Ok(None) => {
                self.metrics.inc_resolver_fallback();
                (
                    Some(self.fallback_location(&end)),
                    vec![format!(
                        "could not geocode destination '{end}'; using configured default position"
                    )],
                )
            }
            Err(error) => {
                self.metrics.inc_resolver_fallback();
                (
                    Some(self.fallback_location(&end)),
                    vec![format!(
                        "destination resolution failed ({error}); using configured default position"
                    )],
                )
            }
        }
    }

    async fn resolve_waypoint(&self, text: String, anchor: GeoPoint) -> (Waypoint, Vec<String>) {
        self.metrics.inc_resolver_call();
        match self
            .bounded(
                self.resolver
                    .search_nearby(&text, anchor, self.config.search_fetch_limit),
            )
            .await
        {
            Ok(candidates) => {
                let places = self.select_places(candidates);
                (Waypoint { text, places }, Vec::new())
            }
            Err(error) => {
                self.metrics.inc_resolver_fallback();
                let notice = format!("waypoint '{text}' search failed ({error}); no candidates");
                (
                    Waypoint {
                        text,
                        places: Vec::new(),
                    },
                    vec![notice],
                )
            }
        }
    }

    async fn resolve_route(
        &self,
        start: &ResolvedLocation,
        end: Option<&ResolvedLocation>,
    ) -> (Option<RouteSummary>, Vec<String>) {
        let (Some(start_position), Some(end_position)) = (
            start.position.filter(|_| start.is_resolved()),
            end.filter(|location| location.is_resolved())
                .and_then(|location| location.position),
        ) else {
            return (None, Vec::new());
        };

        self.metrics.inc_resolver_call();
        match self
            .bounded(self.resolver.route(start_position, end_position))
            .await
        {
            Ok(Some(summary)) => {
                self.metrics.inc_route_summary();
                (Some(summary), Vec::new())
            }
            Ok(None) => (
                None,
                vec!["route summary unavailable for the resolved endpoints".to_string()],
            ),
            Err(error) => (None, vec![format!("route summary failed ({error})")]),
        }
    }

    fn select_places(&self, candidates: Vec<PlaceCandidate>) -> Vec<Place> {
        let mut seen = HashSet::new();

        candidates
            .into_iter()
            .filter(|candidate| candidate.is_open)
            .filter(|candidate| seen.insert((candidate.title.clone(), candidate.address.clone())))
            .take(self.config.places_per_waypoint)
            .map(|candidate| Place {
                title: candidate.title,
                address: candidate.address,
                position: candidate.position,
            })
            .collect()
    }

    fn fallback_location(&self, text: &str) -> ResolvedLocation {
        ResolvedLocation::fallback(
            text,
            self.config.fallback_position,
            self.config.fallback_country.clone(),
        )
    }

    async fn bounded<T>(
        &self,
        call: impl std::future::Future<Output = Result<T, ResolveError>>,
    ) -> Result<T, ResolveError> {
        match timeout(self.config.resolver_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ResolveError::Timeout),
        }
    }
}

use serde::{Deserialize, Serialize};

pub const CURRENT_LOCATION: &str = "current location";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    BasicNavigation,
    MultiStop,
    TimeConstrained,
    TrafficAware,
    ScenicRouting,
    FuelEfficient,
    AvoidingTolls,
    AvoidingHighways,
    WeatherBased,
    EvCharging,
    EmergencyRouting,
    ParkingAvailability,
    Shortest,
    RestStop,
    NightStay,
}

impl Intent {
    pub const ALL: [Self; 15] = [
        Self::BasicNavigation,
        Self::MultiStop,
        Self::TimeConstrained,
        Self::TrafficAware,
        Self::ScenicRouting,
        Self::FuelEfficient,
        Self::AvoidingTolls,
        Self::AvoidingHighways,
        Self::WeatherBased,
        Self::EvCharging,
        Self::EmergencyRouting,
        Self::ParkingAvailability,
        Self::Shortest,
        Self::RestStop,
        Self::NightStay,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::BasicNavigation => "Basic Navigation",
            Self::MultiStop => "Multi-Stop",
            Self::TimeConstrained => "Time-Constrained",
            Self::TrafficAware => "Traffic-Aware",
            Self::ScenicRouting => "Scenic Routing",
            Self::FuelEfficient => "Fuel-Efficient",
            Self::AvoidingTolls => "Avoiding Tolls",
            Self::AvoidingHighways => "Avoiding Highways",
            Self::WeatherBased => "Weather-Based",
            Self::EvCharging => "EV Charging",
            Self::EmergencyRouting => "Emergency Routing",
            Self::ParkingAvailability => "Parking Availability",
            Self::Shortest => "Shortest",
            Self::RestStop => "Rest Stop",
            Self::NightStay => "Night Stay",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStatus {
    Resolved,
    Fallback,
    Unresolved,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub text: String,
    pub position: Option<GeoPoint>,
    pub country_code: Option<String>,
    pub status: ResolutionStatus,
}

impl ResolvedLocation {
    pub fn resolved(text: impl Into<String>, position: GeoPoint, country_code: Option<String>) -> Self {
        Self {
            text: text.into(),
            position: Some(position),
            country_code,
            status: ResolutionStatus::Resolved,
        }
    }

    pub fn fallback(text: impl Into<String>, position: GeoPoint, country_code: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            position: Some(position),
            country_code: Some(country_code.into()),
            status: ResolutionStatus::Fallback,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.status == ResolutionStatus::Resolved
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub title: String,
    pub address: String,
    pub position: GeoPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub text: String,
    pub places: Vec<Place>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    Miles,
    Kilometers,
}

impl DistanceUnit {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "miles" | "mile" => Some(Self::Miles),
            "km" | "kilometers" => Some(Self::Kilometers),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceConstraint {
    pub raw: String,
    pub value: u32,
    pub unit: DistanceUnit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationUnit {
    Minutes,
    Hours,
}

impl DurationUnit {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "minutes" | "minute" | "mins" | "min" => Some(Self::Minutes),
            "hours" | "hour" | "hrs" | "hr" => Some(Self::Hours),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationConstraint {
    pub raw: String,
    pub value: u32,
    pub unit: DurationUnit,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeConstraints {
    pub times: Vec<String>,
    pub durations: Vec<DurationConstraint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub distance_meters: u64,
    pub duration_seconds: u64,
    pub polyline: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    pub start: String,
    pub start_explicit: bool,
    pub end: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryAnalysis {
    pub intents: Vec<Intent>,
    pub start: String,
    pub start_explicit: bool,
    pub end: Option<String>,
    pub waypoints: Vec<String>,
    pub generic_locations: Vec<String>,
    pub distance_constraints: Vec<DistanceConstraint>,
    pub time_constraints: TimeConstraints,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripResult {
    pub query: String,
    pub intents: Vec<Intent>,
    pub start: ResolvedLocation,
    pub end: Option<ResolvedLocation>,
    pub waypoints: Vec<Waypoint>,
    pub generic_locations: Vec<String>,
    pub distance_constraints: Vec<DistanceConstraint>,
    pub time_constraints: TimeConstraints,
    pub route: Option<RouteSummary>,
    pub notices: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_distance_units() {
        assert_eq!(DistanceUnit::parse("miles"), Some(DistanceUnit::Miles));
        assert_eq!(DistanceUnit::parse("Mile"), Some(DistanceUnit::Miles));
        assert_eq!(DistanceUnit::parse("km"), Some(DistanceUnit::Kilometers));
        assert_eq!(DistanceUnit::parse("furlongs"), None);
    }

    #[test]
    fn parses_duration_units() {
        assert_eq!(DurationUnit::parse("mins"), Some(DurationUnit::Minutes));
        assert_eq!(DurationUnit::parse("hr"), Some(DurationUnit::Hours));
        assert_eq!(DurationUnit::parse("fortnights"), None);
    }

    #[test]
    fn intent_labels_match_product_names() {
        assert_eq!(Intent::BasicNavigation.label(), "Basic Navigation");
        assert_eq!(Intent::EvCharging.label(), "EV Charging");
    }

    #[test]
    fn resolved_location_constructors_set_status() {
        let resolved = ResolvedLocation::resolved("dallas", GeoPoint::new(32.77, -96.79), None);
        assert!(resolved.is_resolved());

        let fallback = ResolvedLocation::fallback(CURRENT_LOCATION, GeoPoint::new(0.0, 0.0), "USA");
        assert_eq!(fallback.status, ResolutionStatus::Fallback);
        assert!(!fallback.is_resolved());
    }
}

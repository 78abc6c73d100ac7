use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{
    DistanceConstraint, DistanceUnit, DurationConstraint, DurationUnit, Endpoints,
    CURRENT_LOCATION,
};

// "from <X> to <Y>" where <Y> runs until the first stop token. Matching is
// case-insensitive but captures keep the original casing.
static FROM_TO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bfrom ([\w\s]+?) to ([\w\s]+?)(?:,|\.| with| but| and|$)")
        .expect("valid endpoint pattern")
});

static WAYPOINT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"stop at ([\w\s]+)",
        r"night stay (?:at|in) ([\w\s,]+)",
        r"via ([\w\s,]+)",
        r"quick stop at ([\w\s]+)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("valid waypoint pattern"))
    .collect()
});

// Word-bounded "and" so entries like "sandwich bar" survive the split.
static LIST_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",|\band\b").expect("valid list separator"));

static REST_STOP_DISTANCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"rest stops every ((\d+) ?(miles|mile|km|kilometers))")
        .expect("valid distance pattern")
});

static DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"((\d+)\s?(minutes|minute|mins|min|hours|hour|hrs|hr))")
        .expect("valid duration pattern")
});

pub fn extract_endpoints(text: &str) -> Endpoints {
    match FROM_TO.captures(text) {
        Some(caps) => Endpoints {
            start: caps[1].trim().to_string(),
            start_explicit: true,
            end: Some(caps[2].trim().to_string()),
        },
        None => Endpoints {
            start: CURRENT_LOCATION.to_string(),
            start_explicit: false,
            end: None,
        },
    }
}

pub fn extract_waypoints(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut waypoints = Vec::new();

    for pattern in WAYPOINT_PATTERNS.iter() {
        for caps in pattern.captures_iter(&lower) {
            for entry in LIST_SEPARATOR.split(&caps[1]) {
                let entry = entry.trim();
                if !entry.is_empty() {
                    waypoints.push(entry.to_string());
                }
            }
        }
    }

    waypoints
}

pub fn extract_distance_constraints(text: &str) -> Vec<DistanceConstraint> {
    let lower = text.to_lowercase();

    REST_STOP_DISTANCE
        .captures_iter(&lower)
        .filter_map(|caps| {
            let value = caps[2].parse().ok()?;
            let unit = DistanceUnit::parse(&caps[3])?;
            Some(DistanceConstraint {
                raw: caps[1].to_string(),
                value,
                unit,
            })
        })
        .collect()
}

pub fn extract_durations(text: &str) -> Vec<DurationConstraint> {
    let lower = text.to_lowercase();

    DURATION
        .captures_iter(&lower)
        .filter_map(|caps| {
            let value = caps[2].parse().ok()?;
            let unit = DurationUnit::parse(&caps[3])?;
            Some(DurationConstraint {
                raw: caps[1].to_string(),
                value,
                unit,
            })
        })
        .collect()
}

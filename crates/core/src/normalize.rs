use std::collections::HashSet;

pub fn normalize_text(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

pub fn filter_generic_locations(spans: &[String], start: &str, end: Option<&str>) -> Vec<String> {
    spans
        .iter()
        .filter(|span| !matches_endpoint(span, start, end))
        .cloned()
        .collect()
}

fn matches_endpoint(span: &str, start: &str, end: Option<&str>) -> bool {
    span.trim().eq_ignore_ascii_case(start.trim())
        || end
            .map(|end| span.trim().eq_ignore_ascii_case(end.trim()))
            .unwrap_or(false)
}

// A waypoint already reported as a generic location is dropped, as are exact
// repeats from overlapping extraction patterns. First occurrence wins.
pub fn dedup_waypoints(waypoints: Vec<String>, generic_locations: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();

    waypoints
        .into_iter()
        .filter(|waypoint| !generic_locations.iter().any(|location| location == waypoint))
        .filter(|waypoint| seen.insert(waypoint.clone()))
        .collect()
}

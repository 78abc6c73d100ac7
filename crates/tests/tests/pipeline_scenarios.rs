use std::sync::Arc;

use waymark_core::{Intent, ResolutionStatus, CURRENT_LOCATION};
use waymark_observability::AppMetrics;
use waymark_pipeline::{PipelineConfig, TripPipeline};
use waymark_resolve::FixtureResolver;
use waymark_tagger::TaggerStack;

fn pipeline() -> TripPipeline<FixtureResolver> {
    TripPipeline::new(
        Arc::new(FixtureResolver::with_defaults()),
        TaggerStack::heuristic(),
        PipelineConfig::default(),
        AppMetrics::shared(),
    )
}

#[tokio::test]
async fn canonical_multi_stop_scenario() {
    let result = pipeline()
        .run("Plan a trip from Dallas to Austin with a stop at a Walmart and a coffee shop.")
        .await;

    assert!(result.intents.contains(&Intent::BasicNavigation));
    assert!(result.intents.contains(&Intent::MultiStop));
    assert!(result.start.text.eq_ignore_ascii_case("dallas"));
    assert!(result
        .end
        .as_ref()
        .unwrap()
        .text
        .eq_ignore_ascii_case("austin"));

    let waypoint_texts: Vec<&str> = result
        .waypoints
        .iter()
        .map(|waypoint| waypoint.text.as_str())
        .collect();
    assert_eq!(waypoint_texts, vec!["a walmart", "a coffee shop"]);
}

#[tokio::test]
async fn rest_stop_distance_scenario() {
    let result = pipeline().run("rest stops every 300 miles").await;

    assert_eq!(result.distance_constraints.len(), 1);
    assert_eq!(result.distance_constraints[0].raw, "300 miles");
}

#[tokio::test]
async fn unrecognizable_query_scenario() {
    let result = pipeline().run("what should i eat for lunch").await;

    assert_eq!(result.start.text, CURRENT_LOCATION);
    assert_eq!(result.start.status, ResolutionStatus::Fallback);
    assert!(result.end.is_none());
    assert!(result.waypoints.is_empty());
    assert!(result.generic_locations.is_empty());
}

#[tokio::test]
async fn waypoints_and_generic_locations_are_disjoint() {
    let queries = [
        "Plan a trip from Dallas to Austin with a stop at a Walmart and a coffee shop.",
        "Drive from San Francisco to Napa Valley with scenic views and a night stay in Sonoma.",
        "Plan a trip from Seattle to Portland, include scenic views, parking availability near downtown, and rest stops every 100 miles.",
    ];

    for query in queries {
        let result = pipeline().run(query).await;

        for waypoint in &result.waypoints {
            assert!(
                !result.generic_locations.contains(&waypoint.text),
                "waypoint '{}' leaked into generic locations for query '{query}'",
                waypoint.text
            );
        }
        assert!(!result
            .generic_locations
            .iter()
            .any(|location| location == &result.start.text));
        if let Some(end) = &result.end {
            assert!(!result
                .generic_locations
                .iter()
                .any(|location| location == &end.text));
        }
    }
}

#[tokio::test]
async fn candidate_dedup_and_open_filter_hold() {
    let result = pipeline()
        .run("Plan a trip from Dallas to Austin with a stop at a Walmart.")
        .await;

    let walmart = result
        .waypoints
        .iter()
        .find(|waypoint| waypoint.text == "a walmart")
        .expect("walmart waypoint should be present");

    assert!(!walmart.places.is_empty());
    assert!(walmart.places.len() <= 2);

    let mut signatures = Vec::new();
    for place in &walmart.places {
        let signature = (place.title.clone(), place.address.clone());
        assert!(
            !signatures.contains(&signature),
            "duplicate candidate survived: {signature:?}"
        );
        signatures.push(signature);
    }
}

#[tokio::test]
async fn pipeline_is_idempotent_with_a_deterministic_resolver() {
    let query =
        "Plan a trip from Dallas to Austin with a stop at a Walmart and rest stops every 300 miles";

    let first = pipeline().run(query).await;
    let second = pipeline().run(query).await;

    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
}

#[tokio::test]
async fn quick_stop_double_report_collapses_to_one_waypoint() {
    let result = pipeline()
        .run("Find the shortest route from my house to the airport with a quick stop at a nearby ATM.")
        .await;

    let atm_waypoints = result
        .waypoints
        .iter()
        .filter(|waypoint| waypoint.text == "a nearby atm")
        .count();
    assert_eq!(atm_waypoints, 1);
    assert!(result.intents.contains(&Intent::Shortest));
}

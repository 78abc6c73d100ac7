use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Intent;

const INTENT_TRIGGERS: &[(Intent, &[&str])] = &[
    (
        Intent::BasicNavigation,
        &["navigate", "route", "direction", "way to reach", "go to", "plan a trip"],
    ),
    (
        Intent::MultiStop,
        &[
            "multi-stop",
            "stop at",
            "stops at",
            "via",
            "passing through",
            "multiple stops",
            "with stops",
        ],
    ),
    (
        Intent::TimeConstrained,
        &[
            "arrive by",
            "reach by",
            "leave at",
            "depart at",
            "by",
            "before",
            "after",
            "sharp",
        ],
    ),
    (
        Intent::TrafficAware,
        &["avoid traffic", "traffic-free", "least traffic", "no congestion"],
    ),
    (
        Intent::ScenicRouting,
        &["scenic", "beautiful", "picturesque", "scenery"],
    ),
    (
        Intent::FuelEfficient,
        &["fuel-efficient", "save fuel", "economic route"],
    ),
    (
        Intent::AvoidingTolls,
        &["avoid tolls", "no tolls", "without toll"],
    ),
    (
        Intent::AvoidingHighways,
        &["avoid highways", "no highways", "without highways"],
    ),
    (
        Intent::WeatherBased,
        &["weather", "rain", "snow", "storm", "avoid weather"],
    ),
    (
        Intent::EvCharging,
        &["ev charging", "electric charging", "charging stations", "ev stops"],
    ),
    (
        Intent::EmergencyRouting,
        &["hospital", "emergency", "urgent care", "immediately"],
    ),
    (
        Intent::ParkingAvailability,
        &["parking", "park near", "where can i park"],
    ),
    (Intent::Shortest, &["shortest", "quickest", "fastest"]),
    (
        Intent::RestStop,
        &["rest stop", "break every", "rest every", "stop every"],
    ),
    (
        Intent::NightStay,
        &["night stay", "overnight", "stay in", "stay at"],
    ),
];

// Triggers match at word boundaries so "by" does not fire inside "Albany".
static COMPILED_TRIGGERS: Lazy<Vec<(Intent, Vec<Regex>)>> = Lazy::new(|| {
    INTENT_TRIGGERS
        .iter()
        .map(|(intent, phrases)| {
            let patterns = phrases
                .iter()
                .map(|phrase| {
                    Regex::new(&format!(r"\b{}\b", regex::escape(phrase)))
                        .expect("valid trigger pattern")
                })
                .collect();
            (*intent, patterns)
        })
        .collect()
});

pub fn classify_intents(text: &str) -> Vec<Intent> {
    let lower = text.to_lowercase();

    COMPILED_TRIGGERS
        .iter()
        .filter(|(_, patterns)| patterns.iter().any(|pattern| pattern.is_match(&lower)))
        .map(|(intent, _)| *intent)
        .collect()
}

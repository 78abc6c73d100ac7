pub mod extract;
pub mod intent;
pub mod models;
pub mod normalize;

pub use extract::{
    extract_distance_constraints, extract_durations, extract_endpoints, extract_waypoints,
};
pub use intent::classify_intents;
pub use models::*;
pub use normalize::{dedup_waypoints, filter_generic_locations, normalize_text};

mod gazetteer;
mod heuristic;

use std::env;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use gazetteer::GazetteerTagger;
pub use heuristic::HeuristicTagger;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityCategory {
    Place,
    Facility,
    CalendarTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedSpan {
    pub text: String,
    pub category: EntityCategory,
}

pub trait EntityTagger: Send + Sync {
    fn tagger_name(&self) -> &'static str;
    fn tag(&self, text: &str) -> Vec<TaggedSpan>;
}

#[derive(Clone)]
pub struct TaggerStack {
    pub tagger: Arc<dyn EntityTagger>,
    pub gazetteer_enabled: bool,
}

impl TaggerStack {
    pub fn load_default() -> Self {
        let gazetteer_dir =
            env::var("WAYMARK_GAZETTEER_DIR").unwrap_or_else(|_| "data/gazetteer".to_string());

        if Path::new(&gazetteer_dir).exists() {
            if let Ok(tagger) = GazetteerTagger::from_dir(&gazetteer_dir) {
                return Self {
                    tagger: Arc::new(tagger),
                    gazetteer_enabled: true,
                };
            }
        }

        Self::heuristic()
    }

    pub fn heuristic() -> Self {
        Self {
            tagger: Arc::new(HeuristicTagger),
            gazetteer_enabled: false,
        }
    }

    pub fn place_mentions(&self, text: &str) -> Vec<String> {
        self.tagger
            .tag(text)
            .into_iter()
            .filter(|span| {
                matches!(
                    span.category,
                    EntityCategory::Place | EntityCategory::Facility
                )
            })
            .map(|span| span.text)
            .collect()
    }

    pub fn calendar_mentions(&self, text: &str) -> Vec<String> {
        self.tagger
            .tag(text)
            .into_iter()
            .filter(|span| span.category == EntityCategory::CalendarTime)
            .map(|span| span.text)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristic_stack_splits_categories() {
        let stack = TaggerStack::heuristic();
        let places = stack.place_mentions("Drive from Dallas to Austin by 5 pm");
        assert!(places.contains(&"Dallas".to_string()));
        assert!(places.contains(&"Austin".to_string()));

        let times = stack.calendar_mentions("Drive from Dallas to Austin by 5 pm");
        assert_eq!(times, vec!["5 pm"]);
    }
}

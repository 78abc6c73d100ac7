use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;
use walkdir::WalkDir;

use crate::heuristic::calendar_spans;
use crate::{EntityCategory, EntityTagger, TaggedSpan};

#[derive(Debug, Clone)]
struct GazetteerEntry {
    category: EntityCategory,
    pattern: Regex,
}

// Known-name tagger. Name lists live one-per-line in <dir>/places.txt and
// <dir>/facilities.txt; other files are ignored.
#[derive(Debug, Clone, Default)]
pub struct GazetteerTagger {
    entries: Vec<GazetteerEntry>,
}

impl GazetteerTagger {
    pub fn from_dir(path: impl AsRef<Path>) -> Result<Self> {
        let mut names = Vec::new();

        for entry in WalkDir::new(path.as_ref())
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.file_type().is_file())
        {
            let category = match entry.path().file_stem().and_then(|stem| stem.to_str()) {
                Some("places") => EntityCategory::Place,
                Some("facilities") => EntityCategory::Facility,
                _ => continue,
            };

            let raw = std::fs::read_to_string(entry.path())
                .with_context(|| format!("failed reading gazetteer file: {}", entry.path().display()))?;

            for line in raw.lines() {
                let name = line.trim();
                if name.is_empty() || name.starts_with('#') {
                    continue;
                }
                names.push((name.to_string(), category));
            }
        }

        Self::from_names(names)
    }

    pub fn from_names(names: Vec<(String, EntityCategory)>) -> Result<Self> {
        let mut names = names;
        // Longer names first so "Yosemite National Park" wins over "Yosemite".
        names.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()));

        let entries = names
            .into_iter()
            .map(|(name, category)| {
                let pattern = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(&name)))
                    .with_context(|| format!("invalid gazetteer name: {name}"))?;
                Ok(GazetteerEntry { category, pattern })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl EntityTagger for GazetteerTagger {
    fn tagger_name(&self) -> &'static str {
        "gazetteer"
    }

    fn tag(&self, text: &str) -> Vec<TaggedSpan> {
        let mut claimed: Vec<(usize, usize)> = Vec::new();
        let mut spans = Vec::new();

        for entry in &self.entries {
            for matched in entry.pattern.find_iter(text) {
                let range = (matched.start(), matched.end());
                let overlaps = claimed
                    .iter()
                    .any(|(start, end)| range.0 < *end && *start < range.1);
                if overlaps {
                    continue;
                }
                claimed.push(range);
                spans.push((
                    matched.start(),
                    TaggedSpan {
                        text: matched.as_str().to_string(),
                        category: entry.category,
                    },
                ));
            }
        }

        // Report in query order regardless of gazetteer order.
        spans.sort_by_key(|(start, _)| *start);
        let mut spans: Vec<TaggedSpan> = spans.into_iter().map(|(_, span)| span).collect();
        spans.extend(calendar_spans(text));
        spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GazetteerTagger {
        GazetteerTagger::from_names(vec![
            ("Dallas".to_string(), EntityCategory::Place),
            ("Austin".to_string(), EntityCategory::Place),
            ("Yosemite".to_string(), EntityCategory::Place),
            ("Yosemite National Park".to_string(), EntityCategory::Place),
            ("Walmart".to_string(), EntityCategory::Facility),
        ])
        .unwrap()
    }

    #[test]
    fn tags_known_names_in_query_order() {
        let spans = sample().tag("plan a trip from dallas to austin");
        let texts: Vec<_> = spans.iter().map(|span| span.text.as_str()).collect();
        assert_eq!(texts, vec!["dallas", "austin"]);
    }

    #[test]
    fn longest_name_wins_on_overlap() {
        let spans = sample().tag("a drive to Yosemite National Park");
        let texts: Vec<_> = spans.iter().map(|span| span.text.as_str()).collect();
        assert_eq!(texts, vec!["Yosemite National Park"]);
    }

    #[test]
    fn facility_category_comes_from_the_list() {
        let spans = sample().tag("stop at a Walmart");
        assert_eq!(spans[0].category, EntityCategory::Facility);
    }

    #[test]
    fn unknown_names_are_ignored() {
        assert!(sample().tag("a trip through Reykjavik").is_empty());
    }

    #[test]
    fn calendar_spans_ride_along() {
        let spans = sample().tag("reach Austin by 6 pm");
        assert!(spans
            .iter()
            .any(|span| span.category == EntityCategory::CalendarTime && span.text == "6 pm"));
    }
}

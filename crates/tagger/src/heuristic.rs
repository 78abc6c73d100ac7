use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::{EntityCategory, EntityTagger, TaggedSpan};

// Common sentence-leading words that look like proper nouns in queries.
const NON_PLACE_WORDS: &[&str] = &[
    "i", "plan", "navigate", "drive", "show", "find", "go", "take", "route", "from", "to",
    "via", "with", "and", "but", "the", "a", "an", "my", "me", "need", "avoid", "prefer",
    "include", "stop", "stops", "rest", "every",
];

const FACILITY_WORDS: &[&str] = &[
    "walmart", "airport", "station", "park", "hospital", "mall", "university", "museum",
    "cafe", "hotel", "viewpoint", "pharmacy",
];

static CALENDAR_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\b\d{1,2}(?::\d{2})?\s?(?:am|pm)\b",
        r"(?i)\b(?:today|tonight|tomorrow|noon|midnight)\b",
        r"(?i)\b(?:monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b",
        r"(?i)\b(?:january|february|march|april|may|june|july|august|september|october|november|december)\s+\d{1,2}\b",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("valid calendar pattern"))
    .collect()
});

pub(crate) fn calendar_spans(text: &str) -> Vec<TaggedSpan> {
    let mut spans = Vec::new();

    for pattern in CALENDAR_PATTERNS.iter() {
        for matched in pattern.find_iter(text) {
            let span = TaggedSpan {
                text: matched.as_str().to_string(),
                category: EntityCategory::CalendarTime,
            };
            if !spans.contains(&span) {
                spans.push(span);
            }
        }
    }

    spans
}

// Zero-data fallback: runs of capitalized words are treated as place mentions,
// unless the run is a lone word opening a sentence.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicTagger;

impl EntityTagger for HeuristicTagger {
    fn tagger_name(&self) -> &'static str {
        "heuristic"
    }

    fn tag(&self, text: &str) -> Vec<TaggedSpan> {
        let mut spans = capitalized_runs(text)
            .into_iter()
            .map(|run| TaggedSpan {
                category: categorize(&run),
                text: run,
            })
            .collect::<Vec<_>>();

        spans.extend(calendar_spans(text));
        spans
    }
}

fn capitalized_runs(text: &str) -> Vec<String> {
    let words: Vec<(usize, &str)> = text.unicode_word_indices().collect();
    let mut runs = Vec::new();
    let mut idx = 0;

    while idx < words.len() {
        let (offset, word) = words[idx];
        if !is_place_candidate(word) {
            idx += 1;
            continue;
        }

        let mut end_idx = idx;
        let mut end_offset = offset + word.len();
        while let Some(&(next_offset, next_word)) = words.get(end_idx + 1) {
            let gap = &text[end_offset..next_offset];
            if gap.chars().all(|ch| ch == ' ') && is_place_candidate(next_word) {
                end_idx += 1;
                end_offset = next_offset + next_word.len();
            } else {
                break;
            }
        }

        let single_word = end_idx == idx;
        if !(single_word && starts_sentence(text, offset)) {
            runs.push(text[offset..end_offset].to_string());
        }
        idx = end_idx + 1;
    }

    runs
}

fn is_place_candidate(word: &str) -> bool {
    let capitalized = word.chars().next().map(char::is_uppercase).unwrap_or(false);
    capitalized && !NON_PLACE_WORDS.contains(&word.to_lowercase().as_str())
}

fn starts_sentence(text: &str, offset: usize) -> bool {
    text[..offset]
        .chars()
        .rev()
        .find(|ch| !ch.is_whitespace())
        .map(|ch| matches!(ch, '.' | '!' | '?'))
        .unwrap_or(true)
}

fn categorize(run: &str) -> EntityCategory {
    let facility = run
        .unicode_words()
        .any(|word| FACILITY_WORDS.contains(&word.to_lowercase().as_str()));

    if facility {
        EntityCategory::Facility
    } else {
        EntityCategory::Place
    }
}

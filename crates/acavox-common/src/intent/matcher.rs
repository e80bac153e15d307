//! Rule-based matcher turning free text into an intent plus slots.
//!
//! This mirrors the interpretation the backend applies server-side; the
//! console ships it for offline parsing and as the contract reference for
//! tests. No match is not an error: the result is `Intent::Unknown` with
//! empty slots.

use crate::intent::patterns::{IntentPattern, Slots, pattern_table};
use crate::protocol::Intent;
use regex::Regex;
use serde::Serialize;

/// Canonical phrasings surfaced as guidance for unrecognized commands and
/// used for near-miss suggestions.
pub const EXAMPLE_COMMANDS: &[&str] = &[
    "list students",
    "list students in course cs101",
    "list courses",
    "list courses in department cs",
    "list teachers",
    "show enrollments for student 3",
];

/// Minimum Jaro-Winkler similarity for a "did you mean" hint.
const SUGGESTION_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone, Serialize)]
pub struct ParsedIntent {
    pub intent: Intent,
    pub slots: Slots,
}

pub struct IntentMatcher {
    patterns: Vec<IntentPattern>,
    punctuation: Regex,
    whitespace: Regex,
}

impl Default for IntentMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentMatcher {
    pub fn new() -> Self {
        Self {
            patterns: pattern_table(),
            // keep hyphens and digits for codes like cs-101 and roll numbers
            punctuation: Regex::new(r"[^\w\s-]").expect("normalize pattern compiles"),
            whitespace: Regex::new(r"\s+").expect("normalize pattern compiles"),
        }
    }

    /// Lowercase, strip punctuation (except hyphens), collapse whitespace.
    pub fn normalize(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let stripped = self.punctuation.replace_all(&lowered, " ");
        self.whitespace
            .replace_all(stripped.trim(), " ")
            .into_owned()
    }

    /// Convert raw text into a canonical intent + slots. First match wins.
    pub fn parse(&self, text: &str) -> ParsedIntent {
        let normalized = self.normalize(text);
        for pattern in &self.patterns {
            if let Some(caps) = pattern.regex.captures(&normalized) {
                return ParsedIntent {
                    intent: pattern.intent,
                    slots: (pattern.extract)(&caps),
                };
            }
        }
        ParsedIntent {
            intent: Intent::Unknown,
            slots: Slots::new(),
        }
    }

    /// Closest example command for unmatched input, if any is close enough.
    pub fn suggest(&self, text: &str) -> Option<&'static str> {
        let normalized = self.normalize(text);
        EXAMPLE_COMMANDS
            .iter()
            .map(|example| (*example, strsim::jaro_winkler(&normalized, example)))
            .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(example, _)| example)
    }
}

//! Offset Disambiguation - Closest-Match Resolution
//!
//! Documents drift between the time an annotation is recorded and the time
//! its position is needed again, so stored offsets are hints, not ground
//! truth. This module enumerates all occurrences of a serialized form
//! (literal string or compiled pattern) and picks the one whose start is
//! numerically closest to the hint offset.
//!
//! Shared by MarkupCortex and FootnoteCortex - implemented once,
//! parameterized over the match-enumeration strategy.

use aho_corasick::AhoCorasick;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::Range;

// =============================================================================
// Core Types
// =============================================================================

/// Text range (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "TextRange: start must be <= end");
        TextRange { start, end }
    }

    pub fn from_range(range: Range<usize>) -> Self {
        TextRange::new(range.start, range.end)
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True if `other` lies fully inside this range
    pub fn contains(&self, other: &TextRange) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    /// Extract the text slice from a source string
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

// =============================================================================
// Disambiguation
// =============================================================================

/// Pick the candidate whose start is closest to the hint offset.
///
/// Ties resolve to the first candidate seen (strict `<` comparison, no
/// re-comparison on equal distance). Returns `None` for zero candidates.
pub fn disambiguate<I>(candidates: I, hint: usize) -> Option<TextRange>
where
    I: IntoIterator<Item = TextRange>,
{
    let mut best: Option<(TextRange, usize)> = None;
    for candidate in candidates {
        let distance = candidate.start.abs_diff(hint);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((candidate, distance)),
        }
    }
    best.map(|(range, _)| range)
}

// =============================================================================
// Match Enumeration
// =============================================================================

/// All non-overlapping occurrences of a literal string, leftmost-first.
///
/// Uses an Aho-Corasick automaton so repeated lookups stay linear even for
/// pathological inputs. An empty literal yields no matches.
pub fn literal_occurrences(text: &str, literal: &str) -> Vec<TextRange> {
    if literal.is_empty() {
        return Vec::new();
    }
    let automaton = match AhoCorasick::new([literal]) {
        Ok(ac) => ac,
        Err(_) => return Vec::new(),
    };
    automaton
        .find_iter(text)
        .map(|m| TextRange::new(m.start(), m.end()))
        .collect()
}

/// All non-overlapping matches of a compiled pattern, leftmost-first.
pub fn regex_occurrences(re: &Regex, text: &str) -> Vec<TextRange> {
    re.find_iter(text)
        .map(|m| TextRange::new(m.start(), m.end()))
        .collect()
}

/// Closest literal occurrence to the hint offset
pub fn closest_literal(text: &str, literal: &str, hint: usize) -> Option<TextRange> {
    disambiguate(literal_occurrences(text, literal), hint)
}

/// Closest pattern match to the hint offset
pub fn closest_regex(re: &Regex, text: &str, hint: usize) -> Option<TextRange> {
    disambiguate(regex_occurrences(re, text), hint)
}

// =============================================================================
// Tests
// =============================================================================

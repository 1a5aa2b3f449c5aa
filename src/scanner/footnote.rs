//! FootnoteCortex - Marker Runs and Insertion Offsets
//!
//! Given an annotation descriptor and a (possibly stale) hint offset, this
//! cortex re-locates the annotation's markup in live document text and
//! computes where a new footnote marker must be inserted:
//!
//! 1. Build the kind-specific serialized form (`==text==`, `%%text%%`, the
//!    HTML element via MarkupCortex, or a caller-supplied custom form) and
//!    disambiguate among occurrences by the hint offset.
//! 2. From the markup's end, consume the run of adjacent markers - standard
//!    `[^key]` references and inline `^[content]` markers separated only by
//!    whitespace. A malformed marker stops consumption at the last boundary
//!    that ends a valid marker; it never fails the operation.
//! 3. The insertion offset is the end of that run. Trailing same-line
//!    whitespace is never crossed, so a highlight at end-of-line receives
//!    its marker before the newline.
//!
//! If the markup cannot be relocated the operation reports `NotFound`;
//! no best-effort position is ever produced.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use wasm_bindgen::prelude::*;

use super::locate::{self, TextRange};
use super::markup::{AnnotationKind, MarkupCortex};

// =============================================================================
// Core Types
// =============================================================================

/// Kind of footnote marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerKind {
    /// `[^key]` - reference to a footnote defined elsewhere
    Standard,
    /// `^[content]` - inline footnote body
    Inline,
}

/// A located footnote marker attached to an annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootnoteSpan {
    pub content: String,
    pub start: usize,
    pub end: usize,
    pub marker_kind: MarkerKind,
}

/// What to re-locate: the annotation's kind and literal text, plus the exact
/// serialized form for `custom-pattern` annotations (the pattern match is
/// already known, so only its offset needs resolving).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationDescriptor {
    pub kind: AnnotationKind,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_form: Option<String>,
}

/// Relocation failure - the document changed too much to find the annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolveError {
    NotFound,
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::NotFound => write!(f, "annotation not found in current text"),
        }
    }
}

impl std::error::Error for ResolveError {}

/// A consumed run of adjacent markers. `end` is the offset just past the
/// last complete marker (equal to the starting offset for an empty run).
#[derive(Debug, Clone)]
struct MarkerRun {
    markers: Vec<FootnoteSpan>,
    end: usize,
}

// =============================================================================
// FootnoteCortex
// =============================================================================

/// Footnote/comment position resolver
#[wasm_bindgen]
pub struct FootnoteCortex {
    standard_re: Regex,
}

impl Default for FootnoteCortex {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl FootnoteCortex {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        // [^key] - key has no whitespace or brackets. Anchored to the slice
        // start; the inline form needs bracket counting and is hand-rolled.
        let standard_re = Regex::new(r"^\[\^([^\[\]\s]+)\]").unwrap();
        Self { standard_re }
    }

    /// Extract the markers adjacent to `from` (JS binding)
    #[wasm_bindgen(js_name = extractAdjacentFootnotes)]
    pub fn js_extract_adjacent_footnotes(&self, content: &str, from: usize) -> Result<JsValue, JsValue> {
        let spans = self.extract_adjacent_footnotes(content, from);
        serde_wasm_bindgen::to_value(&spans)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }
}

// Native API
impl FootnoteCortex {
    /// Re-locate the annotation's full markup range in current text.
    ///
    /// HTML spans delegate to the markup scanner; the other kinds search for
    /// their literal serialized form and disambiguate by the hint offset.
    pub fn locate(
        &self,
        content: &str,
        descriptor: &AnnotationDescriptor,
        hint: usize,
        markup: &MarkupCortex,
        excluded: &[TextRange],
    ) -> Result<TextRange, ResolveError> {
        let found = match descriptor.kind {
            AnnotationKind::MarkdownHighlight => {
                let form = format!("=={}==", descriptor.text);
                locate::closest_literal(content, &form, hint)
            }
            AnnotationKind::NativeComment => {
                let form = format!("%%{}%%", descriptor.text);
                locate::closest_literal(content, &form, hint)
            }
            AnnotationKind::HtmlSpan => markup
                .find_at_offset(content, &descriptor.text, hint, excluded)
                .map(|a| a.range()),
            AnnotationKind::CustomPattern => descriptor
                .custom_form
                .as_deref()
                .and_then(|form| locate::closest_literal(content, form, hint)),
        };
        found.ok_or(ResolveError::NotFound)
    }

    /// Compute the byte offset at which a new footnote marker must be
    /// inserted: the end of the located markup plus the adjacent marker run.
    pub fn resolve_insertion_offset(
        &self,
        content: &str,
        descriptor: &AnnotationDescriptor,
        hint: usize,
        markup: &MarkupCortex,
        excluded: &[TextRange],
    ) -> Result<usize, ResolveError> {
        let range = self.locate(content, descriptor, hint, markup, excluded)?;
        Ok(self.marker_run(content, range.end).end)
    }

    /// All markers adjacent to `from`: each is reachable from `from` through
    /// whitespace and complete markers only. Stops at the first position
    /// that is neither.
    pub fn extract_adjacent_footnotes(&self, content: &str, from: usize) -> Vec<FootnoteSpan> {
        self.marker_run(content, from).markers
    }

    /// Inline marker bodies adjacent to `from`, empty strings filtered out
    pub fn adjacent_footnote_contents(&self, content: &str, from: usize) -> Vec<String> {
        self.marker_run(content, from)
            .markers
            .into_iter()
            .filter(|span| span.marker_kind == MarkerKind::Inline && !span.content.is_empty())
            .map(|span| span.content)
            .collect()
    }

    // -------------------------------------------------------------------------
    // Marker run consumption
    // -------------------------------------------------------------------------

    fn marker_run(&self, content: &str, from: usize) -> MarkerRun {
        let mut markers = Vec::new();

        // A stale offset past the end or inside a multi-byte character
        // cannot start a run
        if from > content.len() || !content.is_char_boundary(from) {
            return MarkerRun {
                markers,
                end: from,
            };
        }

        let mut run_end = from;
        let mut cursor = run_end;

        loop {
            // Probe past separating whitespace; only committed if a complete
            // marker follows (back-off to the last marker boundary otherwise)
            let mut probe = cursor;
            for c in content[probe..].chars() {
                if !c.is_whitespace() {
                    break;
                }
                probe += c.len_utf8();
            }

            match self.marker_at(content, probe) {
                Some(span) => {
                    cursor = span.end;
                    run_end = span.end;
                    markers.push(span);
                }
                None => break,
            }
        }

        MarkerRun {
            markers,
            end: run_end,
        }
    }

    /// Complete marker starting exactly at `pos`, if any
    fn marker_at(&self, content: &str, pos: usize) -> Option<FootnoteSpan> {
        let rest = &content[pos..];
        if rest.starts_with("^[") {
            return self.inline_marker_at(content, pos);
        }

        let caps = self.standard_re.captures(rest)?;
        let full = caps.get(0).unwrap();
        Some(FootnoteSpan {
            content: caps.get(1).unwrap().as_str().to_string(),
            start: pos,
            end: pos + full.end(),
            marker_kind: MarkerKind::Standard,
        })
    }

    /// `^[content]` with bracket counting: the closing bracket is the first
    /// unmatched `]`, so content may itself contain balanced brackets.
    /// An unterminated marker is not a marker.
    fn inline_marker_at(&self, content: &str, pos: usize) -> Option<FootnoteSpan> {
        let body_start = pos + 2;
        let mut depth = 1usize;
        for (i, c) in content[body_start..].char_indices() {
            match c {
                '[' => depth += 1,
                ']' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(FootnoteSpan {
                            content: content[body_start..body_start + i].to_string(),
                            start: pos,
                            end: body_start + i + 1,
                            marker_kind: MarkerKind::Inline,
                        });
                    }
                }
                _ => {}
            }
        }
        None
    }
}

// =============================================================================
// Tests
// =============================================================================

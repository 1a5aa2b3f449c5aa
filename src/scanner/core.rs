//! AnnotationCortex: Unified Annotation Facade
//!
//! Single entry point for the annotation pipeline:
//! - Styled-span scanning (via MarkupCortex)
//! - Position relocation + insertion offsets (via FootnoteCortex)
//! - Adjacent footnote extraction
//!
//! Designed for WASM with a single cross-boundary call per operation. The
//! host supplies document text, excluded (code-block) ranges, and hint
//! offsets; nothing here touches the DOM, files, or any store.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use super::footnote::{AnnotationDescriptor, FootnoteCortex, FootnoteSpan, MarkerKind, ResolveError};
use super::locate::TextRange;
use super::markup::{Annotation, CustomPatternDef, MarkupConfig, MarkupCortex};
use std::collections::HashMap;

// =============================================================================
// Types
// =============================================================================

/// Timing statistics for a scan
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScanTimings {
    pub total_us: u64,
    pub markup_us: u64,
}

/// Aggregate scan statistics
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScanStats {
    pub timings: ScanTimings,
    pub text_length: usize,
    pub annotation_count: usize,
    pub dropped_empty_text: usize,
    pub dropped_no_color: usize,
    pub dropped_excluded: usize,
}

/// Unified scan result
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScanResult {
    pub annotations: Vec<Annotation>,
    pub stats: ScanStats,
}

/// A relocated annotation, ready for the editing layer: the current markup
/// range, the safe insertion offset for a new footnote marker, and the
/// markers already attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedAnnotation {
    pub range: TextRange,
    pub insertion_offset: usize,
    pub footnotes: Vec<FootnoteSpan>,
    /// Non-empty inline marker bodies, in order
    pub footnote_contents: Vec<String>,
}

// =============================================================================
// AnnotationCortex
// =============================================================================

/// Unified annotation engine
#[wasm_bindgen]
pub struct AnnotationCortex {
    markup: MarkupCortex,
    footnote: FootnoteCortex,
}

impl Default for AnnotationCortex {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl AnnotationCortex {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            markup: MarkupCortex::new(),
            footnote: FootnoteCortex::new(),
        }
    }

    /// Hydrate the class -> color map for `<span class="...">` elements
    #[wasm_bindgen(js_name = hydrateClassColors)]
    pub fn js_hydrate_class_colors(&mut self, map: JsValue) -> Result<(), JsValue> {
        let map: HashMap<String, String> = serde_wasm_bindgen::from_value(map)
            .map_err(|e| JsValue::from_str(&format!("Invalid class color map: {}", e)))?;
        self.markup.hydrate_class_colors(map);
        Ok(())
    }

    /// Hydrate caller-configured custom annotation patterns
    #[wasm_bindgen(js_name = hydrateCustomPatterns)]
    pub fn js_hydrate_custom_patterns(&mut self, patterns: JsValue) -> Result<(), JsValue> {
        let defs: Vec<CustomPatternDef> = serde_wasm_bindgen::from_value(patterns)
            .map_err(|e| JsValue::from_str(&format!("Invalid custom patterns: {}", e)))?;
        self.markup.hydrate_custom_patterns(defs);
        Ok(())
    }

    /// Scan a document for annotations (JS binding).
    /// `excluded` is an array of `{ start, end }` code-block ranges.
    #[wasm_bindgen(js_name = scan)]
    pub fn js_scan(&self, content: &str, excluded: JsValue) -> JsValue {
        let excluded: Vec<TextRange> =
            serde_wasm_bindgen::from_value(excluded).unwrap_or_default();
        let result = self.scan(content, &excluded);
        match serde_wasm_bindgen::to_value(&result) {
            Ok(v) => v,
            Err(e) => {
                web_sys::console::error_1(
                    &format!("[AnnotationCortex] Serialization failed: {:?}", e).into(),
                );
                JsValue::NULL
            }
        }
    }

    /// Find the annotation matching `text` closest to `hint` (JS binding).
    /// Returns the annotation with its adjacent footnote contents filled,
    /// or null.
    #[wasm_bindgen(js_name = findAtOffset)]
    pub fn js_find_at_offset(
        &self,
        content: &str,
        text: &str,
        hint: usize,
        excluded: JsValue,
    ) -> JsValue {
        let excluded: Vec<TextRange> =
            serde_wasm_bindgen::from_value(excluded).unwrap_or_default();
        match self.find_at_offset(content, text, hint, &excluded) {
            Some(annotation) => serde_wasm_bindgen::to_value(&annotation).unwrap_or(JsValue::NULL),
            None => JsValue::NULL,
        }
    }

    /// Compute the insertion offset for a new footnote marker (JS binding)
    #[wasm_bindgen(js_name = resolveInsertionOffset)]
    pub fn js_resolve_insertion_offset(
        &self,
        content: &str,
        descriptor: JsValue,
        hint: usize,
        excluded: JsValue,
    ) -> Result<usize, JsValue> {
        let descriptor: AnnotationDescriptor = serde_wasm_bindgen::from_value(descriptor)
            .map_err(|e| JsValue::from_str(&format!("Invalid descriptor: {}", e)))?;
        let excluded: Vec<TextRange> =
            serde_wasm_bindgen::from_value(excluded).unwrap_or_default();
        self.resolve_insertion_offset(content, &descriptor, hint, &excluded)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Relocate an annotation and gather its attached markers (JS binding)
    #[wasm_bindgen(js_name = relocate)]
    pub fn js_relocate(
        &self,
        content: &str,
        descriptor: JsValue,
        hint: usize,
        excluded: JsValue,
    ) -> Result<JsValue, JsValue> {
        let descriptor: AnnotationDescriptor = serde_wasm_bindgen::from_value(descriptor)
            .map_err(|e| JsValue::from_str(&format!("Invalid descriptor: {}", e)))?;
        let excluded: Vec<TextRange> =
            serde_wasm_bindgen::from_value(excluded).unwrap_or_default();
        let resolved = self
            .relocate(content, &descriptor, hint, &excluded)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        serde_wasm_bindgen::to_value(&resolved)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Extract the markers adjacent to `from` (JS binding)
    #[wasm_bindgen(js_name = extractAdjacentFootnotes)]
    pub fn js_extract_adjacent_footnotes(
        &self,
        content: &str,
        from: usize,
    ) -> Result<JsValue, JsValue> {
        let spans = self.footnote.extract_adjacent_footnotes(content, from);
        serde_wasm_bindgen::to_value(&spans)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Get cortex status as JSON
    #[wasm_bindgen(js_name = getStatus)]
    pub fn get_status(&self) -> JsValue {
        let status = serde_json::json!({
            "custom_pattern_count": self.markup.custom_pattern_count(),
        });
        JsValue::from_str(&status.to_string())
    }
}

// Native API
impl AnnotationCortex {
    pub fn with_config(config: MarkupConfig) -> Self {
        Self {
            markup: MarkupCortex::with_config(config),
            footnote: FootnoteCortex::new(),
        }
    }

    pub fn hydrate_class_colors(&mut self, map: HashMap<String, String>) {
        self.markup.hydrate_class_colors(map);
    }

    pub fn hydrate_custom_patterns(&mut self, defs: Vec<CustomPatternDef>) {
        self.markup.hydrate_custom_patterns(defs);
    }

    /// Scan a document for annotations with timing statistics
    pub fn scan(&self, content: &str, excluded: &[TextRange]) -> ScanResult {
        let overall_start = instant::Instant::now();

        let markup_start = instant::Instant::now();
        let (annotations, markup_stats) = self.markup.scan(content, excluded);
        let markup_us = markup_start.elapsed().as_micros() as u64;

        let mut result = ScanResult {
            stats: ScanStats {
                timings: ScanTimings {
                    total_us: 0,
                    markup_us,
                },
                text_length: content.len(),
                annotation_count: annotations.len(),
                dropped_empty_text: markup_stats.dropped_empty_text,
                dropped_no_color: markup_stats.dropped_no_color,
                dropped_excluded: markup_stats.dropped_excluded,
            },
            annotations,
        };
        result.stats.timings.total_us = overall_start.elapsed().as_micros() as u64;
        result
    }

    /// Find the annotation matching `text` closest to `hint`, with its
    /// adjacent footnote contents filled in
    pub fn find_at_offset(
        &self,
        content: &str,
        text: &str,
        hint: usize,
        excluded: &[TextRange],
    ) -> Option<Annotation> {
        let mut annotation = self.markup.find_at_offset(content, text, hint, excluded)?;
        annotation.footnote_contents = self
            .footnote
            .adjacent_footnote_contents(content, annotation.end);
        Some(annotation)
    }

    /// Compute the insertion offset for a new footnote marker
    pub fn resolve_insertion_offset(
        &self,
        content: &str,
        descriptor: &AnnotationDescriptor,
        hint: usize,
        excluded: &[TextRange],
    ) -> Result<usize, ResolveError> {
        self.footnote
            .resolve_insertion_offset(content, descriptor, hint, &self.markup, excluded)
    }

    /// Relocate an annotation: current markup range, insertion offset, and
    /// the markers already attached to it
    pub fn relocate(
        &self,
        content: &str,
        descriptor: &AnnotationDescriptor,
        hint: usize,
        excluded: &[TextRange],
    ) -> Result<ResolvedAnnotation, ResolveError> {
        let range = self
            .footnote
            .locate(content, descriptor, hint, &self.markup, excluded)?;
        let footnotes = self.footnote.extract_adjacent_footnotes(content, range.end);
        let insertion_offset = footnotes.last().map_or(range.end, |span| span.end);
        let footnote_contents = footnotes
            .iter()
            .filter(|span| span.marker_kind == MarkerKind::Inline && !span.content.is_empty())
            .map(|span| span.content.clone())
            .collect();

        Ok(ResolvedAnnotation {
            range,
            insertion_offset,
            footnotes,
            footnote_contents,
        })
    }

    /// Extract the markers adjacent to `from`
    pub fn extract_adjacent_footnotes(&self, content: &str, from: usize) -> Vec<FootnoteSpan> {
        self.footnote.extract_adjacent_footnotes(content, from)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::markup::AnnotationKind;

    fn descriptor(kind: AnnotationKind, text: &str) -> AnnotationDescriptor {
        AnnotationDescriptor {
            kind,
            text: text.to_string(),
            custom_form: None,
        }
    }

    // -------------------------------------------------------------------------
    // Requirement 1: Basic scan returns annotations and stats
    // -------------------------------------------------------------------------
    #[test]
    fn test_basic_scan_returns_result() {
        let cortex = AnnotationCortex::new();
        let result = cortex.scan("==note== and <mark>kept</mark>", &[]);

        assert_eq!(result.annotations.len(), 2);
        assert_eq!(result.stats.annotation_count, 2);
        assert_eq!(result.stats.text_length, 30);
    }

    // -------------------------------------------------------------------------
    // Requirement 2: Dropped candidates are counted
    // -------------------------------------------------------------------------
    #[test]
    fn test_dropped_candidates_counted() {
        let cortex = AnnotationCortex::new();
        let content = r#"<font color="red"></font> <span style="background: bogus">x</span>"#;
        let result = cortex.scan(content, &[]);

        assert!(result.annotations.is_empty());
        assert_eq!(result.stats.dropped_empty_text, 1);
        assert_eq!(result.stats.dropped_no_color, 1);
    }

    // -------------------------------------------------------------------------
    // Requirement 3: find_at_offset fills adjacent footnote contents
    // -------------------------------------------------------------------------
    #[test]
    fn test_find_at_offset_fills_footnote_contents() {
        let cortex = AnnotationCortex::new();
        let content = "==note==^[remember this]^[] rest";
        let found = cortex.find_at_offset(content, "note", 0, &[]).unwrap();

        assert_eq!(found.start, 0);
        assert_eq!(found.end, 8);
        // Empty inline bodies are filtered before exposure
        assert_eq!(found.footnote_contents, vec!["remember this".to_string()]);
    }

    // -------------------------------------------------------------------------
    // Requirement 4: relocate aggregates range, insertion offset, markers
    // -------------------------------------------------------------------------
    #[test]
    fn test_relocate_aggregate() {
        let cortex = AnnotationCortex::new();
        let content = "==note==^[a][^ref] tail";
        let resolved = cortex
            .relocate(content, &descriptor(AnnotationKind::MarkdownHighlight, "note"), 0, &[])
            .unwrap();

        assert_eq!(resolved.range, TextRange::new(0, 8));
        assert_eq!(resolved.footnotes.len(), 2);
        assert_eq!(resolved.insertion_offset, 18); // after "[^ref]"
        assert_eq!(resolved.footnote_contents, vec!["a".to_string()]);
    }

    // -------------------------------------------------------------------------
    // Requirement 5: relocation failure is explicit, never approximated
    // -------------------------------------------------------------------------
    #[test]
    fn test_relocate_not_found() {
        let cortex = AnnotationCortex::new();
        let result = cortex.relocate(
            "document without the annotation",
            &descriptor(AnnotationKind::MarkdownHighlight, "gone"),
            4,
            &[],
        );
        assert_eq!(result.unwrap_err(), ResolveError::NotFound);
    }

    // -------------------------------------------------------------------------
    // Requirement 6: insertion offset respects existing markers
    // -------------------------------------------------------------------------
    #[test]
    fn test_insertion_offset_through_facade() {
        let cortex = AnnotationCortex::new();
        let offset = cortex
            .resolve_insertion_offset(
                "==hi==^[one]\nNext",
                &descriptor(AnnotationKind::MarkdownHighlight, "hi"),
                0,
                &[],
            )
            .unwrap();
        assert_eq!(offset, 12); // after "^[one]", before the newline
    }

    // -------------------------------------------------------------------------
    // Requirement 7: timings are populated
    // -------------------------------------------------------------------------
    #[test]
    fn test_timings_populated() {
        let cortex = AnnotationCortex::new();
        let result = cortex.scan("==a== ==b== ==c==", &[]);
        assert!(result.stats.timings.total_us >= result.stats.timings.markup_us);
    }

    // -------------------------------------------------------------------------
    // Requirement 8: html annotations resolve through the same facade
    // -------------------------------------------------------------------------
    #[test]
    fn test_html_annotation_relocation() {
        let cortex = AnnotationCortex::new();
        let content = r#"<mark>kept</mark>^[why] more"#;
        let resolved = cortex
            .relocate(content, &descriptor(AnnotationKind::HtmlSpan, "kept"), 0, &[])
            .unwrap();

        assert_eq!(resolved.range, TextRange::new(0, 17));
        assert_eq!(resolved.footnote_contents, vec!["why".to_string()]);
        assert_eq!(resolved.insertion_offset, 23); // after "^[why]"
    }
}

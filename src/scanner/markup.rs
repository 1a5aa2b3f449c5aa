//! MarkupCortex - Styled-Span Annotation Detection
//!
//! Extracts annotations from mixed plain/HTML document content:
//! - HTML spans: `<span style="background: ...">`, `<span class="...">`
//! - Font colors: `<font color="...">`
//! - Mark elements: `<mark>` (fixed default color)
//! - Markdown highlights: `==text==`
//! - Native comments: `%%text%%`
//! - Caller-configured custom patterns (capture group 1 is the text)
//!
//! All patterns use compiled regex; element patterns are non-greedy and span
//! newlines. Candidates inside caller-supplied excluded ranges (code blocks)
//! are skipped, as are candidates with empty text or no resolvable color.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use wasm_bindgen::prelude::*;

use super::color;
use super::locate::{self, TextRange};

// =============================================================================
// Type Definitions
// =============================================================================

/// Kind of annotation detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnnotationKind {
    MarkdownHighlight,
    HtmlSpan,
    NativeComment,
    CustomPattern,
}

impl AnnotationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationKind::MarkdownHighlight => "markdown-highlight",
            AnnotationKind::HtmlSpan => "html-span",
            AnnotationKind::NativeComment => "native-comment",
            AnnotationKind::CustomPattern => "custom-pattern",
        }
    }
}

/// Flavor of HTML span markup an annotation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpanKind {
    SpanBackground,
    SpanClass,
    FontColor,
    Mark,
}

impl SpanKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpanKind::SpanBackground => "span-background",
            SpanKind::SpanClass => "span-class",
            SpanKind::FontColor => "font-color",
            SpanKind::Mark => "mark",
        }
    }
}

/// A located annotation span.
///
/// `start`/`end` cover the full markup including delimiters and are byte
/// offsets into the source at discovery time - a hint for later relocation,
/// not ground truth. `text` never includes delimiters and is never
/// empty/whitespace-only (such candidates are dropped, not constructed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub text: String,
    pub kind: AnnotationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span_kind: Option<SpanKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub start: usize,
    pub end: usize,
    #[serde(default)]
    pub footnote_contents: Vec<String>,
}

impl Annotation {
    pub fn range(&self) -> TextRange {
        TextRange::new(self.start, self.end)
    }
}

/// Caller-configured custom annotation pattern.
/// `pattern` must contain a capture group 1 holding the annotation text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomPatternDef {
    pub name: String,
    pub pattern: String,
}

/// Configuration for MarkupCortex
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkupConfig {
    #[serde(default = "default_true")]
    pub enable_html: bool,
    #[serde(default = "default_true")]
    pub enable_markdown: bool,
    #[serde(default = "default_true")]
    pub enable_custom: bool,
    #[serde(default = "default_mark_color")]
    pub mark_color: String,
}

fn default_true() -> bool {
    true
}

fn default_mark_color() -> String {
    "#ffff00".to_string()
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            enable_html: true,
            enable_markdown: true,
            enable_custom: true,
            mark_color: default_mark_color(),
        }
    }
}

/// Dropped-candidate counts from a scan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarkupScanStats {
    pub dropped_empty_text: usize,
    pub dropped_no_color: usize,
    pub dropped_excluded: usize,
}

// =============================================================================
// MarkupCortex
// =============================================================================

/// Styled-span annotation scanner
#[wasm_bindgen]
pub struct MarkupCortex {
    // Pre-compiled element patterns (non-greedy, newline-spanning)
    span_re: Regex,
    font_re: Regex,
    mark_re: Regex,
    highlight_re: Regex,
    comment_re: Regex,
    // Attribute patterns
    style_re: Regex,
    class_re: Regex,
    color_attr_re: Regex,
    background_re: Regex,
    // Hydrated state
    class_colors: HashMap<String, String>,
    custom_patterns: Vec<(String, Regex)>,
    config: MarkupConfig,
}

impl Default for MarkupCortex {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl MarkupCortex {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        // Element patterns: open/close tag names are identical by
        // construction (one pattern per tag; Rust regex has no backrefs).
        // (?s) lets the inner text span newlines.
        let span_re = Regex::new(r"(?s)<span\b([^>]*)>(.*?)</span\s*>").unwrap();
        let font_re = Regex::new(r"(?s)<font\b([^>]*)>(.*?)</font\s*>").unwrap();
        let mark_re = Regex::new(r"(?s)<mark\b([^>]*)>(.*?)</mark\s*>").unwrap();

        // ==highlight== and %%comment%% (single-delimiter forms)
        let highlight_re = Regex::new(r"==([^=]+)==").unwrap();
        let comment_re = Regex::new(r"%%([^%]+)%%").unwrap();

        // Attribute extraction (double- or single-quoted)
        let style_re = Regex::new(r#"style\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap();
        let class_re = Regex::new(r#"class\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap();
        // font color may be unquoted
        let color_attr_re =
            Regex::new(r#"color\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>'"]+))"#).unwrap();
        // background declaration inside style text
        let background_re = Regex::new(r"background(?:-color)?\s*:\s*([^;]+)").unwrap();

        Self {
            span_re,
            font_re,
            mark_re,
            highlight_re,
            comment_re,
            style_re,
            class_re,
            color_attr_re,
            background_re,
            class_colors: HashMap::new(),
            custom_patterns: Vec::new(),
            config: MarkupConfig::default(),
        }
    }

    /// Hydrate the class -> color map used for `<span class="...">` elements.
    ///
    /// The JS host resolves its theme/DOM CSS up front and hands the result
    /// over; the cortex never touches the DOM.
    #[wasm_bindgen(js_name = hydrateClassColors)]
    pub fn js_hydrate_class_colors(&mut self, map: JsValue) -> Result<(), JsValue> {
        let map: HashMap<String, String> = serde_wasm_bindgen::from_value(map)
            .map_err(|e| JsValue::from_str(&format!("Invalid class color map: {}", e)))?;
        self.hydrate_class_colors(map);
        Ok(())
    }

    /// Hydrate caller-configured custom patterns
    #[wasm_bindgen(js_name = hydrateCustomPatterns)]
    pub fn js_hydrate_custom_patterns(&mut self, patterns: JsValue) -> Result<(), JsValue> {
        let defs: Vec<CustomPatternDef> = serde_wasm_bindgen::from_value(patterns)
            .map_err(|e| JsValue::from_str(&format!("Invalid custom patterns: {}", e)))?;
        self.hydrate_custom_patterns(defs);
        Ok(())
    }

    /// Scan content for annotations (JS binding).
    /// `excluded` is an array of `{ start, end }` code-block ranges.
    #[wasm_bindgen(js_name = scan)]
    pub fn js_scan(&self, content: &str, excluded: JsValue) -> Result<JsValue, JsValue> {
        let excluded: Vec<TextRange> =
            serde_wasm_bindgen::from_value(excluded).unwrap_or_default();
        let (annotations, _) = self.scan(content, &excluded);
        serde_wasm_bindgen::to_value(&annotations)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Number of hydrated custom patterns that compiled successfully
    #[wasm_bindgen(js_name = customPatternCount)]
    pub fn custom_pattern_count(&self) -> usize {
        self.custom_patterns.len()
    }
}

// Native API
impl MarkupCortex {
    pub fn with_config(config: MarkupConfig) -> Self {
        let mut cortex = Self::new();
        cortex.config = config;
        cortex
    }

    pub fn hydrate_class_colors(&mut self, map: HashMap<String, String>) {
        self.class_colors = map;
    }

    /// Compile and store custom patterns. An invalid pattern is skipped, not
    /// an error - the remaining patterns still apply.
    pub fn hydrate_custom_patterns(&mut self, defs: Vec<CustomPatternDef>) {
        self.custom_patterns = defs
            .into_iter()
            .filter_map(|def| Regex::new(&def.pattern).ok().map(|re| (def.name, re)))
            .collect();
    }

    /// Scan content for annotations, honoring excluded ranges.
    /// Results are sorted by start offset.
    pub fn scan(&self, content: &str, excluded: &[TextRange]) -> (Vec<Annotation>, MarkupScanStats) {
        let mut annotations = Vec::new();
        let mut stats = MarkupScanStats::default();

        if self.config.enable_html {
            self.scan_spans(content, excluded, &mut annotations, &mut stats);
            self.scan_fonts(content, excluded, &mut annotations, &mut stats);
            self.scan_marks(content, excluded, &mut annotations, &mut stats);
        }

        if self.config.enable_markdown {
            self.scan_delimited(
                content,
                excluded,
                &self.highlight_re,
                AnnotationKind::MarkdownHighlight,
                &mut annotations,
                &mut stats,
            );
            self.scan_delimited(
                content,
                excluded,
                &self.comment_re,
                AnnotationKind::NativeComment,
                &mut annotations,
                &mut stats,
            );
        }

        if self.config.enable_custom {
            self.scan_custom(content, excluded, &mut annotations, &mut stats);
        }

        annotations.sort_by_key(|a| a.start);
        (annotations, stats)
    }

    /// Scan and keep only the annotations
    pub fn scan_annotations(&self, content: &str, excluded: &[TextRange]) -> Vec<Annotation> {
        self.scan(content, excluded).0
    }

    /// Find the annotation matching `text` whose start is closest to `hint`.
    ///
    /// Runs a full scan, filters to annotations with identical text, then
    /// disambiguates by hint offset. `None` if no candidate matches.
    pub fn find_at_offset(
        &self,
        content: &str,
        text: &str,
        hint: usize,
        excluded: &[TextRange],
    ) -> Option<Annotation> {
        let (annotations, _) = self.scan(content, excluded);
        let candidates = annotations
            .iter()
            .filter(|a| a.text == text)
            .map(Annotation::range);
        let best = locate::disambiguate(candidates, hint)?;
        annotations.into_iter().find(|a| a.range() == best)
    }

    // -------------------------------------------------------------------------
    // Element handling
    // -------------------------------------------------------------------------

    fn scan_spans(
        &self,
        content: &str,
        excluded: &[TextRange],
        out: &mut Vec<Annotation>,
        stats: &mut MarkupScanStats,
    ) {
        for caps in self.span_re.captures_iter(content) {
            let full = caps.get(0).unwrap();
            let range = TextRange::from_range(full.range());
            if self.is_excluded(&range, excluded) {
                stats.dropped_excluded += 1;
                continue;
            }

            let attrs = caps.get(1).map_or("", |m| m.as_str());
            let text = caps.get(2).map_or("", |m| m.as_str());

            // background declaration wins over class resolution
            let style_text = capture_attr(&self.style_re, attrs);
            let background = style_text
                .as_deref()
                .and_then(|style| self.background_re.captures(style))
                .map(|c| c.get(1).unwrap().as_str().to_string());

            let (span_kind, resolved) = if let Some(decl) = background {
                (SpanKind::SpanBackground, color::normalize_color(&decl))
            } else {
                (SpanKind::SpanClass, self.resolve_class_color(attrs))
            };

            self.push_candidate(out, stats, text, range, AnnotationKind::HtmlSpan,
                Some(span_kind), resolved, true);
        }
    }

    fn scan_fonts(
        &self,
        content: &str,
        excluded: &[TextRange],
        out: &mut Vec<Annotation>,
        stats: &mut MarkupScanStats,
    ) {
        for caps in self.font_re.captures_iter(content) {
            let full = caps.get(0).unwrap();
            let range = TextRange::from_range(full.range());
            if self.is_excluded(&range, excluded) {
                stats.dropped_excluded += 1;
                continue;
            }

            let attrs = caps.get(1).map_or("", |m| m.as_str());
            let text = caps.get(2).map_or("", |m| m.as_str());
            let resolved = capture_font_color(&self.color_attr_re, attrs)
                .and_then(|value| color::normalize_color(&value));

            self.push_candidate(out, stats, text, range, AnnotationKind::HtmlSpan,
                Some(SpanKind::FontColor), resolved, true);
        }
    }

    fn scan_marks(
        &self,
        content: &str,
        excluded: &[TextRange],
        out: &mut Vec<Annotation>,
        stats: &mut MarkupScanStats,
    ) {
        for caps in self.mark_re.captures_iter(content) {
            let full = caps.get(0).unwrap();
            let range = TextRange::from_range(full.range());
            if self.is_excluded(&range, excluded) {
                stats.dropped_excluded += 1;
                continue;
            }

            let text = caps.get(2).map_or("", |m| m.as_str());
            self.push_candidate(out, stats, text, range, AnnotationKind::HtmlSpan,
                Some(SpanKind::Mark), Some(self.config.mark_color.clone()), true);
        }
    }

    fn scan_delimited(
        &self,
        content: &str,
        excluded: &[TextRange],
        re: &Regex,
        kind: AnnotationKind,
        out: &mut Vec<Annotation>,
        stats: &mut MarkupScanStats,
    ) {
        for caps in re.captures_iter(content) {
            let full = caps.get(0).unwrap();
            let range = TextRange::from_range(full.range());
            if self.is_excluded(&range, excluded) {
                stats.dropped_excluded += 1;
                continue;
            }

            let text = caps.get(1).map_or("", |m| m.as_str());
            self.push_candidate(out, stats, text, range, kind, None, None, false);
        }
    }

    fn scan_custom(
        &self,
        content: &str,
        excluded: &[TextRange],
        out: &mut Vec<Annotation>,
        stats: &mut MarkupScanStats,
    ) {
        for (_, re) in &self.custom_patterns {
            for caps in re.captures_iter(content) {
                let full = caps.get(0).unwrap();
                let range = TextRange::from_range(full.range());
                if self.is_excluded(&range, excluded) {
                    stats.dropped_excluded += 1;
                    continue;
                }

                // Missing capture group: skip the match, keep scanning
                let text = match caps.get(1) {
                    Some(m) => m.as_str(),
                    None => continue,
                };
                self.push_candidate(out, stats, text, range,
                    AnnotationKind::CustomPattern, None, None, false);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Candidate filtering
    // -------------------------------------------------------------------------

    #[allow(clippy::too_many_arguments)]
    fn push_candidate(
        &self,
        out: &mut Vec<Annotation>,
        stats: &mut MarkupScanStats,
        text: &str,
        range: TextRange,
        kind: AnnotationKind,
        span_kind: Option<SpanKind>,
        color: Option<String>,
        color_required: bool,
    ) {
        if text.trim().is_empty() {
            stats.dropped_empty_text += 1;
            return;
        }
        if color_required && color.is_none() {
            stats.dropped_no_color += 1;
            return;
        }
        out.push(Annotation {
            text: text.to_string(),
            kind,
            span_kind,
            color,
            start: range.start,
            end: range.end,
            footnote_contents: Vec::new(),
        });
    }

    fn is_excluded(&self, range: &TextRange, excluded: &[TextRange]) -> bool {
        excluded.iter().any(|ex| ex.contains(range))
    }

    /// First class name in the attribute text with a hydrated color wins
    fn resolve_class_color(&self, attrs: &str) -> Option<String> {
        let classes = capture_attr(&self.class_re, attrs)?;
        classes
            .split_whitespace()
            .find_map(|class| self.class_colors.get(class).cloned())
    }
}

/// Value of a quoted attribute (either quoting style)
fn capture_attr(re: &Regex, attrs: &str) -> Option<String> {
    let caps = re.captures(attrs)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

/// Value of the font `color` attribute (quoted or bare)
fn capture_font_color(re: &Regex, attrs: &str) -> Option<String> {
    let caps = re.captures(attrs)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))
        .map(|m| m.as_str().to_string())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(content: &str) -> Vec<Annotation> {
        MarkupCortex::new().scan_annotations(content, &[])
    }

    #[test]
    fn test_font_color_annotation() {
        let found = scan(r#"<font color="red">hi</font>"#);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "hi");
        assert_eq!(found[0].color.as_deref(), Some("#ff0000"));
        assert_eq!(found[0].kind, AnnotationKind::HtmlSpan);
        assert_eq!(found[0].span_kind, Some(SpanKind::FontColor));
        // Offsets cover the full markup, not just the inner text
        assert_eq!(found[0].start, 0);
        assert_eq!(found[0].end, r#"<font color="red">hi</font>"#.len());
    }

    #[test]
    fn test_font_empty_text_rejected() {
        assert!(scan(r#"<font color="red"></font>"#).is_empty());
        assert!(scan(r#"<font color="red">   </font>"#).is_empty());
    }

    #[test]
    fn test_span_background_declaration() {
        let found = scan(r#"<span style="background: rgb(255,0,0)">note</span>"#);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].color.as_deref(), Some("#ff0000"));
        assert_eq!(found[0].span_kind, Some(SpanKind::SpanBackground));
    }

    #[test]
    fn test_span_background_color_declaration() {
        let found = scan(r#"<span style="background-color: #abc;">note</span>"#);
        assert_eq!(found[0].color.as_deref(), Some("#aabbcc"));
    }

    #[test]
    fn test_span_unsupported_color_dropped() {
        let cortex = MarkupCortex::new();
        let (found, stats) =
            cortex.scan(r#"<span style="background: var(--hl)">note</span>"#, &[]);
        assert!(found.is_empty());
        assert_eq!(stats.dropped_no_color, 1);
    }

    #[test]
    fn test_span_class_resolution() {
        let mut cortex = MarkupCortex::new();
        cortex.hydrate_class_colors(HashMap::from([(
            "hl-warm".to_string(),
            "#ffaa00".to_string(),
        )]));
        let found =
            cortex.scan_annotations(r#"<span class="decor hl-warm">note</span>"#, &[]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].color.as_deref(), Some("#ffaa00"));
        assert_eq!(found[0].span_kind, Some(SpanKind::SpanClass));
    }

    #[test]
    fn test_span_class_without_resolution_dropped() {
        // No hydrated map entry -> no color -> dropped
        assert!(scan(r#"<span class="unknown">note</span>"#).is_empty());
    }

    #[test]
    fn test_background_wins_over_class() {
        let mut cortex = MarkupCortex::new();
        cortex.hydrate_class_colors(HashMap::from([(
            "hl".to_string(),
            "#00ff00".to_string(),
        )]));
        let found = cortex.scan_annotations(
            r#"<span class="hl" style="background: red">note</span>"#,
            &[],
        );
        assert_eq!(found[0].color.as_deref(), Some("#ff0000"));
        assert_eq!(found[0].span_kind, Some(SpanKind::SpanBackground));
    }

    #[test]
    fn test_mark_default_color() {
        let found = scan("<mark>kept</mark>");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].color.as_deref(), Some("#ffff00"));
        assert_eq!(found[0].span_kind, Some(SpanKind::Mark));
    }

    #[test]
    fn test_element_spans_newlines() {
        let found = scan("<mark>first\nsecond</mark>");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "first\nsecond");
    }

    #[test]
    fn test_markdown_highlight_and_comment() {
        let found = scan("==bright== and %%hidden%%");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].kind, AnnotationKind::MarkdownHighlight);
        assert_eq!(found[0].text, "bright");
        assert_eq!(found[0].color, None);
        assert_eq!(found[1].kind, AnnotationKind::NativeComment);
        assert_eq!(found[1].text, "hidden");
    }

    #[test]
    fn test_excluded_range_skips_candidate() {
        let content = "==keep== `==code==` after";
        // The backtick run (bytes 9..19) is a code range
        let excluded = vec![TextRange::new(9, 19)];
        let cortex = MarkupCortex::new();
        let (found, stats) = cortex.scan(content, &excluded);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "keep");
        assert_eq!(stats.dropped_excluded, 1);
    }

    #[test]
    fn test_partial_overlap_with_excluded_range_kept() {
        // Containment is full containment; straddling candidates survive
        let content = "==keep==";
        let excluded = vec![TextRange::new(0, 4)];
        assert_eq!(
            MarkupCortex::new().scan_annotations(content, &excluded).len(),
            1
        );
    }

    #[test]
    fn test_custom_pattern() {
        let mut cortex = MarkupCortex::new();
        cortex.hydrate_custom_patterns(vec![CustomPatternDef {
            name: "curly".to_string(),
            pattern: r"\{\{([^}]+)\}\}".to_string(),
        }]);
        let found = cortex.scan_annotations("before {{noted}} after", &[]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "noted");
        assert_eq!(found[0].kind, AnnotationKind::CustomPattern);
    }

    #[test]
    fn test_invalid_custom_pattern_skipped() {
        let mut cortex = MarkupCortex::new();
        cortex.hydrate_custom_patterns(vec![
            CustomPatternDef {
                name: "broken".to_string(),
                pattern: r"([unclosed".to_string(),
            },
            CustomPatternDef {
                name: "ok".to_string(),
                pattern: r"!!([^!]+)!!".to_string(),
            },
        ]);
        assert_eq!(cortex.custom_pattern_count(), 1);
        let found = cortex.scan_annotations("!!works!!", &[]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "works");
    }

    #[test]
    fn test_custom_pattern_without_capture_skipped() {
        let mut cortex = MarkupCortex::new();
        cortex.hydrate_custom_patterns(vec![CustomPatternDef {
            name: "no-capture".to_string(),
            pattern: r"@@[^@]+@@".to_string(),
        }]);
        assert!(cortex.scan_annotations("@@match@@", &[]).is_empty());
    }

    #[test]
    fn test_scan_sorted_by_start() {
        let found = scan("%%b%% ==a== <mark>c</mark>");
        let starts: Vec<usize> = found.iter().map(|a| a.start).collect();
        let mut sorted = starts.clone();
        sorted.sort_unstable();
        assert_eq!(starts, sorted);
    }

    #[test]
    fn test_find_at_offset_duplicate_resolution() {
        let cortex = MarkupCortex::new();
        let content = "==word== middle ==word==";
        let found = cortex.find_at_offset(content, "word", 17, &[]).unwrap();
        assert_eq!(found.start, 16);
        assert_eq!(found.end, 24);
    }

    #[test]
    fn test_config_disables_markdown_scanning() {
        let cortex = MarkupCortex::with_config(MarkupConfig {
            enable_markdown: false,
            ..MarkupConfig::default()
        });
        let found = cortex.scan_annotations("==skipped== <mark>kept</mark>", &[]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "kept");
    }

    #[test]
    fn test_config_mark_color() {
        let cortex = MarkupCortex::with_config(MarkupConfig {
            mark_color: "#ff00ff".to_string(),
            ..MarkupConfig::default()
        });
        let found = cortex.scan_annotations("<mark>kept</mark>", &[]);
        assert_eq!(found[0].color.as_deref(), Some("#ff00ff"));
    }

    #[test]
    fn test_find_at_offset_no_match() {
        let cortex = MarkupCortex::new();
        assert!(cortex.find_at_offset("==word==", "other", 0, &[]).is_none());
    }
}

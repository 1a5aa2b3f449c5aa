//! AnnoCore: Annotation Scanner + Query Engine
//!
//! A Rust/WASM implementation of the annotation extraction and query pipeline.
//!
//! # Architecture
//!
//! ## Scanner Components
//! - `core.rs` - AnnotationCortex: **Unified facade** - scan/relocate/insert in one place
//! - `markup.rs` - MarkupCortex: Styled-span detection (`<span>`, `<font>`, `<mark>`)
//! - `footnote.rs` - FootnoteCortex: Marker-run resolution and insertion offsets
//! - `locate.rs` - Offset disambiguation (closest match to a hint offset)
//! - `color.rs` - CSS color expression normalization to canonical hex
//!
//! ## Query Components
//! - `token.rs` - Query tokenizer (filters, keywords, free text)
//! - `parser.rs` - Recursive-descent parser producing the boolean AST
//! - `evaluate.rs` - Pure predicate evaluation against annotation records
//! - `cortex.rs` - QueryCortex: parsed-query facade with hydrated memberships
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { AnnotationCortex, QueryCortex } from 'annocore';
//!
//! await init();
//!
//! // Scan a document for styled-span annotations
//! const cortex = new AnnotationCortex();
//! cortex.hydrateClassColors({ 'hl-warm': '#ffaa00' });
//! const result = cortex.scan(documentText, excludedRanges);
//!
//! // Filter annotations with a query
//! const query = new QueryCortex();
//! query.setQuery('(#idea OR #question) AND @inbox');
//! query.hydrateMemberships(memberships);
//! const visible = annotations.filter(a => query.matches(a));
//! ```

pub mod query;
pub mod scanner;

// Public exports - Scanner
pub use scanner::*;

// Public exports - Query
pub use query::*;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("annocore v{}", env!("CARGO_PKG_VERSION"))
}

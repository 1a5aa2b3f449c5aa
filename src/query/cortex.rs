//! QueryCortex - Parsed-Query Facade
//!
//! Holds one parsed query plus hydrated tag/collection memberships so the
//! JS host can filter an annotation list with one boundary call per record.
//! Membership data comes from external stores; the host resolves it up
//! front and hydrates the cortex, mirroring how the scanners receive their
//! app-dependent data.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use wasm_bindgen::prelude::*;

use super::evaluate::{evaluate, QueryTarget};
use super::parser::{flatten, parse_query, FlatToken, QueryNode};

// =============================================================================
// Types
// =============================================================================

/// Membership data for one annotation, keyed by its id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipData {
    pub id: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub collections: Vec<String>,
}

// =============================================================================
// QueryCortex
// =============================================================================

/// Query parsing + evaluation facade
#[wasm_bindgen]
pub struct QueryCortex {
    raw_query: String,
    ast: Option<QueryNode>,
    tags: HashMap<String, HashSet<String>>,
    collections: HashMap<String, HashSet<String>>,
}

impl Default for QueryCortex {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl QueryCortex {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            raw_query: String::new(),
            ast: None,
            tags: HashMap::new(),
            collections: HashMap::new(),
        }
    }

    /// Parse and store a query. Returns true if the query produced an
    /// expression tree (false means "match everything").
    #[wasm_bindgen(js_name = setQuery)]
    pub fn set_query(&mut self, query: &str) -> bool {
        self.raw_query = query.to_string();
        self.ast = parse_query(query);
        self.ast.is_some()
    }

    /// Hydrate tag/collection memberships for the annotations about to be
    /// filtered (JS binding)
    #[wasm_bindgen(js_name = hydrateMemberships)]
    pub fn js_hydrate_memberships(&mut self, memberships: JsValue) -> Result<(), JsValue> {
        let data: Vec<MembershipData> = serde_wasm_bindgen::from_value(memberships)
            .map_err(|e| JsValue::from_str(&format!("Invalid memberships: {}", e)))?;
        self.hydrate_memberships(data);
        Ok(())
    }

    /// Evaluate the stored query against one record (JS binding).
    /// `record` is `{ id, text, secondary_label? }`.
    #[wasm_bindgen(js_name = matches)]
    pub fn js_matches(&self, record: JsValue) -> Result<bool, JsValue> {
        let target: QueryTarget = serde_wasm_bindgen::from_value(record)
            .map_err(|e| JsValue::from_str(&format!("Invalid record: {}", e)))?;
        Ok(self.matches_target(&target))
    }

    /// Flattened query leaves for chip-style display (JS binding)
    #[wasm_bindgen(js_name = tokens)]
    pub fn js_tokens(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.tokens())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Get cortex status as JSON
    #[wasm_bindgen(js_name = getStatus)]
    pub fn get_status(&self) -> JsValue {
        let status = serde_json::json!({
            "query": self.raw_query,
            "has_expression": self.ast.is_some(),
            "token_count": self.tokens().len(),
            "memberships_hydrated": self.tags.len(),
        });
        JsValue::from_str(&status.to_string())
    }
}

// Native API
impl QueryCortex {
    pub fn hydrate_memberships(&mut self, memberships: Vec<MembershipData>) {
        self.tags.clear();
        self.collections.clear();
        for m in memberships {
            self.tags.insert(m.id.clone(), m.tags.into_iter().collect());
            self.collections
                .insert(m.id, m.collections.into_iter().collect());
        }
    }

    /// The stored query's expression tree, if any
    pub fn ast(&self) -> Option<&QueryNode> {
        self.ast.as_ref()
    }

    /// Flattened query leaves, depth-first left-to-right
    pub fn tokens(&self) -> Vec<FlatToken> {
        flatten(self.ast.as_ref())
    }

    /// Evaluate the stored query against one record
    pub fn matches_target(&self, target: &QueryTarget) -> bool {
        evaluate(
            self.ast.as_ref(),
            target,
            &|t: &QueryTarget| self.tags.get(&t.id).cloned().unwrap_or_default(),
            &|t: &QueryTarget| self.collections.get(&t.id).cloned().unwrap_or_default(),
        )
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn membership(id: &str, tags: &[&str], collections: &[&str]) -> MembershipData {
        MembershipData {
            id: id.to_string(),
            tags: tags.iter().map(|s| s.to_string()).collect(),
            collections: collections.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn record(id: &str, text: &str) -> QueryTarget {
        QueryTarget {
            id: id.to_string(),
            text: text.to_string(),
            secondary_label: None,
        }
    }

    #[test]
    fn test_no_query_matches_everything() {
        let cortex = QueryCortex::new();
        assert!(cortex.matches_target(&record("a1", "anything")));
    }

    #[test]
    fn test_set_query_reports_expression() {
        let mut cortex = QueryCortex::new();
        assert!(cortex.set_query("#idea"));
        assert!(!cortex.set_query(""));
        assert!(!cortex.set_query("(((("));
    }

    #[test]
    fn test_matches_with_hydrated_memberships() {
        let mut cortex = QueryCortex::new();
        cortex.set_query("#idea AND @inbox");
        cortex.hydrate_memberships(vec![
            membership("a1", &["idea"], &["inbox"]),
            membership("a2", &["idea"], &[]),
        ]);

        assert!(cortex.matches_target(&record("a1", "first")));
        assert!(!cortex.matches_target(&record("a2", "second")));
        // Unknown id has no memberships
        assert!(!cortex.matches_target(&record("a3", "third")));
    }

    #[test]
    fn test_rehydration_replaces_memberships() {
        let mut cortex = QueryCortex::new();
        cortex.set_query("#idea");
        cortex.hydrate_memberships(vec![membership("a1", &["idea"], &[])]);
        assert!(cortex.matches_target(&record("a1", "x")));

        cortex.hydrate_memberships(vec![membership("a1", &["other"], &[])]);
        assert!(!cortex.matches_target(&record("a1", "x")));
    }

    #[test]
    fn test_tokens_for_display() {
        let mut cortex = QueryCortex::new();
        cortex.set_query("(#a OR @b) -#c");
        let tokens = cortex.tokens();
        let values: Vec<&str> = tokens.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(values, vec!["a", "b", "c"]);
        assert!(tokens[2].exclude);
    }
}

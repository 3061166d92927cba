//! WASM bindings for `ghostdoc-richtext`.
//!
//! Exposes the article translator to the editor front end via wasm-bindgen,
//! so a draft's formatting can be previewed before it is exported. Results
//! are returned as JSON strings; `*_value` variants return JS objects.

use ghostdoc_richtext::{BatchUpdate, DocsRequest};
use wasm_bindgen::prelude::*;

/// Flatten an HTML fragment.
///
/// Returns `{ text, ranges }` on success or `{ error }` when the markup
/// cannot be parsed.
#[wasm_bindgen]
pub fn parse(html: &str) -> String {
    match ghostdoc_richtext::parse(html) {
        Ok(result) => serde_json::to_string(&result).unwrap_or_else(|_| "{}".to_string()),
        Err(e) => serde_json::json!({ "error": e.to_string() }).to_string(),
    }
}

/// Flatten an HTML fragment into a JS object (`{ text, ranges }`).
#[wasm_bindgen]
pub fn parse_value(html: &str) -> Result<JsValue, JsError> {
    let result = ghostdoc_richtext::parse(html)?;
    Ok(serde_wasm_bindgen::to_value(&result)?)
}

/// Style operations for `html`, positioned at `base_offset`.
///
/// Returns a JSON array of `{ absoluteStart, absoluteEnd, attributes }`.
/// Unparseable markup yields an empty array.
#[wasm_bindgen]
pub fn style_operations(html: &str, base_offset: usize) -> String {
    let ops = ghostdoc_richtext::parse(html)
        .map(|result| ghostdoc_richtext::to_style_operations(&result.ranges, base_offset))
        .unwrap_or_default();
    serde_json::to_string(&ops).unwrap_or_else(|_| "[]".to_string())
}

/// Formatting batch update body for `html`, positioned at `base_offset`.
#[wasm_bindgen]
pub fn formatting_requests(html: &str, base_offset: usize) -> String {
    let batch: BatchUpdate = ghostdoc_richtext::parse(html)
        .map(|result| {
            ghostdoc_richtext::to_style_operations(&result.ranges, base_offset)
                .iter()
                .map(DocsRequest::from)
                .collect()
        })
        .unwrap_or_default();
    serde_json::to_string(&batch).unwrap_or_else(|_| r#"{"requests":[]}"#.to_string())
}

/// Full article export plan as JSON (`{ text, formatted, insert, formatting }`).
#[wasm_bindgen]
pub fn export_plan(plain: Option<String>, html: Option<String>, base_offset: usize) -> String {
    let plan =
        ghostdoc_richtext::plan_article_export(plain.as_deref(), html.as_deref(), base_offset);
    serde_json::to_string(&plan).unwrap_or_else(|_| "{}".to_string())
}

/// Clean stock LLM phrasing out of generated copy.
#[wasm_bindgen]
pub fn sanitize(text: &str) -> String {
    ghostdoc_richtext::sanitize_llm_output(text)
}

//! Bindings that hand JS values across the boundary, run with
//! `wasm-pack test --node`.

#![cfg(target_arch = "wasm32")]

use ghostdoc_richtext::{ParseResult, StyleKind};
use ghostdoc_richtext_wasm::parse_value;
use wasm_bindgen_test::wasm_bindgen_test;

#[wasm_bindgen_test]
fn parse_value_returns_text_and_ranges() {
    let value = parse_value("<p>Caf&eacute; <b>bold</b></p>").unwrap();
    let result: ParseResult = serde_wasm_bindgen::from_value(value).unwrap();
    assert_eq!(result.text, "Café bold\n");
    assert_eq!(result.ranges.len(), 1);
    assert_eq!(result.ranges[0].kind, StyleKind::Bold);
    assert_eq!(result.slice(&result.ranges[0]), "bold");
}

#[wasm_bindgen_test]
fn parse_value_rejects_unterminated_markup() {
    assert!(parse_value("<a href=\"https://exa").is_err());
}

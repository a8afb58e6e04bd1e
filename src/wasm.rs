use wasm_bindgen::prelude::*;

use crate::definition::solve_json;

/// Solve a puzzle given as a JSON definition, returning the JSON response.
/// Malformed or invalid definitions are thrown as strings.
#[wasm_bindgen]
pub fn solve(state: &str) -> Result<String, JsValue> {
    solve_json(state).map_err(|err| JsValue::from_str(&err.to_string()))
}

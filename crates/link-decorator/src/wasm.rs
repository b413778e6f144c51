//! WASM bindings for the decoration engine.

#![cfg(feature = "wasm")]

use crate::context::MetadataSnapshot;
use crate::evaluator::DecorationEngine;
use crate::settings::DecoratorSettings;
use std::collections::HashSet;
use wasm_bindgen::prelude::*;

/// WASM-compatible decoration engine wrapper.
#[wasm_bindgen]
pub struct WasmDecorationEngine {
    engine: DecorationEngine,
}

#[wasm_bindgen]
impl WasmDecorationEngine {
    /// Creates an engine with no rules.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            engine: DecorationEngine::new(),
        }
    }

    /// Loads settings from a JSON or YAML string, appending their rules.
    #[wasm_bindgen]
    pub fn load_settings(&mut self, content: &str) -> Result<(), JsValue> {
        self.engine
            .load_settings(content)
            .map_err(to_js_error)
    }

    /// Replaces all rules with those of a settings JSON string.
    #[wasm_bindgen]
    pub fn replace_settings(&mut self, json: &str) -> Result<(), JsValue> {
        let settings = DecoratorSettings::from_json(json).map_err(to_js_error)?;
        self.engine = DecorationEngine::from_settings(settings);
        Ok(())
    }

    /// Decorates a snapshot (JSON string).
    /// Returns the decorations as a JSON string.
    #[wasm_bindgen]
    pub fn decorate(&self, snapshot_json: &str) -> Result<String, JsValue> {
        let snapshot = parse_snapshot(snapshot_json)?;
        let decorations = self.engine.decorate(&snapshot);

        serde_json::to_string(&decorations).map_err(to_js_error)
    }

    /// Combined link class only.
    #[wasm_bindgen]
    pub fn css_class(&self, snapshot_json: &str) -> Result<String, JsValue> {
        let snapshot = parse_snapshot(snapshot_json)?;
        Ok(self.engine.style(&snapshot).css_class)
    }

    /// Reading-surface plan for one link. `existing_ids_json` is a JSON array
    /// of stable ids already rendered beside the link.
    #[wasm_bindgen]
    pub fn plan_reading_link(
        &self,
        snapshot_json: &str,
        existing_ids_json: &str,
    ) -> Result<String, JsValue> {
        let snapshot = parse_snapshot(snapshot_json)?;
        let existing: HashSet<String> = serde_json::from_str(existing_ids_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid id list: {}", e)))?;

        let plan = crate::surface::plan_reading_link(&self.engine.decorate(&snapshot), &existing);
        serde_json::to_string(&plan).map_err(to_js_error)
    }

    /// Returns the number of loaded rules.
    #[wasm_bindgen]
    pub fn rule_count(&self) -> usize {
        self.engine.rules().len()
    }
}

impl Default for WasmDecorationEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn parse_snapshot(json: &str) -> Result<MetadataSnapshot, JsValue> {
    serde_json::from_str(json).map_err(|e| JsValue::from_str(&format!("Invalid snapshot: {}", e)))
}

/// Checks an expression source without running it.
/// Returns `{valid, error?}` as a JSON string.
#[wasm_bindgen]
pub fn validate_source(source: &str) -> Result<String, JsValue> {
    serde_json::to_string(&crate::validate::validate_source(source)).map_err(to_js_error)
}

/// Checks a metadata script, with or without its backtick wrapper.
#[wasm_bindgen]
pub fn validate_script(script: &str) -> Result<String, JsValue> {
    serde_json::to_string(&crate::validate::validate_script(script)).map_err(to_js_error)
}

/// Returns the version of the decoration engine.
#[wasm_bindgen]
pub fn version() -> String {
    crate::VERSION.to_string()
}

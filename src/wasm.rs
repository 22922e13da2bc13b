//! WebAssembly bindings for EcoLlajta.
//!
//! This module provides JavaScript-accessible functions for the allocator,
//! exchanging JSON strings with the web form.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::models::{OptimizationReport, StageTimings, TimingConfig, DEFAULT_MAX_MOLDS};
use crate::optimizer::allocate;

/// JavaScript-friendly input for optimization.
#[derive(Debug, Clone, Deserialize)]
pub struct JsOptimizeInput {
    pub units: u32,
    pub workers: u32,
    #[serde(default)]
    pub timings: Option<TimingConfig>,
    #[serde(default = "default_max_molds")]
    pub max_molds: u32,
}

fn default_max_molds() -> u32 {
    DEFAULT_MAX_MOLDS
}

/// Default stage timings, as shown in the configuration dialog.
#[derive(Debug, Clone, Serialize)]
struct JsDefaults {
    timings: StageTimings,
    max_molds: u32,
}

/// Runs the allocator on a parsed input.
pub fn optimize_input(input: &JsOptimizeInput) -> OptimizationReport {
    let timings = input.timings.clone().unwrap_or_default().resolve();
    allocate(input.units, input.workers, &timings, input.max_molds).into()
}

/// Run the allocator with the given configuration.
///
/// Takes a JSON string input and returns a JSON string result.
#[wasm_bindgen]
pub fn optimize(input_json: &str) -> String {
    let report = match serde_json::from_str::<JsOptimizeInput>(input_json) {
        Ok(input) => optimize_input(&input),
        Err(e) => {
            let message = format!("Invalid input: {}", e);
            #[cfg(target_arch = "wasm32")]
            web_sys::console::warn_1(&JsValue::from_str(&message));
            OptimizationReport::failure(message)
        }
    };
    serde_json::to_string(&report).unwrap_or_default()
}

/// Get the default timings and mold cap as JSON.
#[wasm_bindgen]
pub fn default_timings() -> String {
    serde_json::to_string(&JsDefaults {
        timings: StageTimings::default(),
        max_molds: DEFAULT_MAX_MOLDS,
    })
    .unwrap_or_default()
}

/// Get the version of the optimizer.
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

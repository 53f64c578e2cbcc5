//! Core WASM dashboard wrapper and control metadata.

use crate::chart::{population_chart, Figure};
use anyhow::{Context, Result};
use serde::Serialize;
use volterra_core::model::{compute_trajectory, InitialPopulations, Parameters};
use volterra_core::sampler::SamplerSettings;
use volterra_core::summary::{summarize_series, SeriesSummary};
use wasm_bindgen::prelude::*;

/// UI-imposed slider range and default for one numeric control. Range
/// clamping happens on the JS side; the core accepts any finite reals.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ControlRange {
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ControlRanges {
    pub initial_prey: ControlRange,
    pub initial_predator: ControlRange,
    pub r: ControlRange,
    pub c: ControlRange,
    pub b: ControlRange,
    pub m: ControlRange,
}

impl ControlRanges {
    pub fn ui_defaults() -> Self {
        Self {
            initial_prey: ControlRange {
                min: 5.0,
                max: 100.0,
                default: 20.0,
            },
            initial_predator: ControlRange {
                min: 5.0,
                max: 100.0,
                default: 5.0,
            },
            r: ControlRange {
                min: 0.4,
                max: 1.2,
                default: 0.8,
            },
            c: ControlRange {
                min: 0.01,
                max: 0.2,
                default: 0.1,
            },
            b: ControlRange {
                min: 0.01,
                max: 0.08,
                default: 0.02,
            },
            m: ControlRange {
                min: 0.3,
                max: 0.7,
                default: 0.5,
            },
        }
    }
}

/// Slider ranges and defaults, serialized for the JS side.
#[wasm_bindgen]
pub fn control_ranges() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&ControlRanges::ui_defaults())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// One computed UI refresh: the chart figure, oscillation summaries for
/// both populations, and the id of the request that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct ChartResponse {
    pub request: u64,
    pub figure: Figure,
    pub predator_summary: SeriesSummary,
    pub prey_summary: SeriesSummary,
}

/// The dashboard's request/response logic, kept separate from the wasm
/// wrapper so it is testable off the wasm target. Holds the six numeric
/// controls and a monotonically increasing request counter.
#[derive(Debug, Default)]
pub struct DashboardState {
    pub(crate) initial: InitialPopulations,
    pub(crate) params: Parameters,
    pub(crate) settings: SamplerSettings,
    pub(crate) request: u64,
}

impl DashboardState {
    /// Runs one synchronous trajectory computation and packages the
    /// refresh payload. Each call consumes a fresh request id, including
    /// failed ones, so a slow superseded result can never outrank a
    /// newer one.
    pub fn compute_response(&mut self) -> Result<ChartResponse> {
        self.request += 1;
        let trajectory = compute_trajectory(self.initial, self.params, &self.settings)
            .context("trajectory computation failed")?;
        let predator_summary = summarize_series(&trajectory.time, &trajectory.predator)
            .context("predator summary failed")?;
        let prey_summary =
            summarize_series(&trajectory.time, &trajectory.prey).context("prey summary failed")?;
        Ok(ChartResponse {
            request: self.request,
            figure: population_chart(trajectory),
            predator_summary,
            prey_summary,
        })
    }
}

/// Dashboard bridge exposed to JS. Every slider change maps to one
/// setter call followed by `compute`. Results carry strictly increasing
/// request ids; the JS side must discard any payload whose id is lower
/// than the last one it rendered, so the most recent result always wins.
#[wasm_bindgen]
pub struct WasmDashboard {
    state: DashboardState,
}

#[wasm_bindgen]
impl WasmDashboard {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmDashboard {
        console_error_panic_hook::set_once();
        WasmDashboard {
            state: DashboardState::default(),
        }
    }

    pub fn set_initial_prey(&mut self, value: f64) {
        self.state.initial.prey = value;
    }

    pub fn set_initial_predator(&mut self, value: f64) {
        self.state.initial.predator = value;
    }

    pub fn set_r(&mut self, value: f64) {
        self.state.params.r = value;
    }

    pub fn set_c(&mut self, value: f64) {
        self.state.params.c = value;
    }

    pub fn set_b(&mut self, value: f64) {
        self.state.params.b = value;
    }

    pub fn set_m(&mut self, value: f64) {
        self.state.params.m = value;
    }

    /// Computes the trajectory for the current controls and returns the
    /// serialized refresh payload. Integration failures surface as an
    /// error string; no partial chart is ever produced.
    pub fn compute(&mut self) -> Result<JsValue, JsValue> {
        let response = self
            .state
            .compute_response()
            .map_err(|e| JsValue::from_str(&format!("{e:#}")))?;
        serde_wasm_bindgen::to_value(&response).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn last_request(&self) -> u64 {
        self.state.request
    }
}

impl Default for WasmDashboard {
    fn default() -> Self {
        Self::new()
    }
}


#[cfg(test)]
mod tests {
    use super::DashboardState;
    use volterra_core::sampler::SamplerSettings;

    #[test]
    fn responses_carry_strictly_increasing_request_ids() {
        let mut state = DashboardState {
            settings: SamplerSettings {
                samples: 1001,
                ..SamplerSettings::default()
            },
            ..DashboardState::default()
        };
        let first = state.compute_response().expect("first compute succeeds");
        let second = state.compute_response().expect("second compute succeeds");
        assert_eq!(first.request, 1);
        assert_eq!(second.request, 2);
    }

    #[test]
    fn default_controls_produce_an_oscillating_chart() {
        let mut state = DashboardState {
            settings: SamplerSettings {
                samples: 1001,
                ..SamplerSettings::default()
            },
            ..DashboardState::default()
        };
        let response = state.compute_response().expect("compute succeeds");
        assert_eq!(response.figure.traces.len(), 2);
        assert!(!response.predator_summary.maxima.is_empty());
        assert!(!response.prey_summary.maxima.is_empty());
    }

    #[test]
    fn integration_failure_is_reported_not_truncated() {
        let mut state = DashboardState {
            settings: SamplerSettings {
                max_steps: 1,
                ..SamplerSettings::default()
            },
            ..DashboardState::default()
        };
        let err = state
            .compute_response()
            .expect_err("starved step budget must fail");
        assert!(format!("{err:#}").contains("trajectory computation failed"));
        // The failed request still consumed an id.
        assert_eq!(state.request, 1);
    }
}

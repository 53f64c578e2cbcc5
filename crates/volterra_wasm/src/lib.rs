//! WASM bridge for the Volterra predator-prey explorer. The JS side
//! owns layout, sliders, and plotting; this crate owns the dashboard
//! state, the chart payload, and the static accordion content.

pub mod chart;
pub mod content;
pub mod dashboard;

pub use dashboard::WasmDashboard;

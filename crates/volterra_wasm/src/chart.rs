//! In-memory chart structure handed to the JS plotting collaborator.

use serde::Serialize;
use volterra_core::model::Trajectory;

#[derive(Debug, Clone, Serialize)]
pub struct LineStyle {
    pub color: &'static str,
    pub width: f64,
    /// Dash pattern name understood by the plotting collaborator;
    /// `None` draws a solid line.
    pub dash: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Trace {
    pub name: &'static str,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub line: LineStyle,
}

#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub title: &'static str,
    pub xaxis_title: &'static str,
    pub yaxis_title: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub traces: Vec<Trace>,
    pub layout: Layout,
}

/// Builds the population chart: two distinctly styled lines against
/// time, predator dash-dotted green and prey solid red.
pub fn population_chart(trajectory: Trajectory) -> Figure {
    let Trajectory {
        time,
        predator,
        prey,
    } = trajectory;
    Figure {
        traces: vec![
            Trace {
                name: "Predator",
                x: time.clone(),
                y: predator,
                line: LineStyle {
                    color: "#00b400",
                    width: 4.0,
                    dash: Some("dashdot"),
                },
            },
            Trace {
                name: "Prey",
                x: time,
                y: prey,
                line: LineStyle {
                    color: "#ff0000",
                    width: 4.0,
                    dash: None,
                },
            },
        ],
        layout: Layout {
            title: "Predator-Prey Dynamics (Lotka-Volterra)",
            xaxis_title: "Time",
            yaxis_title: "Population",
        },
    }
}

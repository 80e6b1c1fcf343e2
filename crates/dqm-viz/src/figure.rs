//! Figure descriptions (numbers-first) for comparison results.

use dqm_core::{ComparisonResult, Overlay, Plot, PullMap};
use serde::Serialize;

/// Five-stop diverging colorscale for pull maps, from -cap to +cap.
pub const PULL_COLORSCALE: [&str; 5] = [
    "rgb(26, 42, 198)",
    "rgb(118, 167, 231)",
    "rgb(215, 226, 194)",
    "rgb(212, 190, 109)",
    "rgb(188, 76, 38)",
];

const REF_FILL: &str = "rgb(204, 188, 172)";

/// A complete figure: traces plus layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    /// Traces, drawn in order.
    pub traces: Vec<Trace>,
    /// Titles and global styling.
    pub layout: Layout,
}

/// One drawable series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trace {
    /// Color-mapped grid. `z[y][x]`, `null` cells are left blank.
    Heatmap {
        /// Cell values.
        z: Vec<Vec<Option<f64>>>,
        /// Column labels.
        x: Vec<String>,
        /// Row labels.
        y: Vec<String>,
        /// Lower end of the color range.
        zmin: f64,
        /// Upper end of the color range.
        zmax: f64,
        /// Evenly spaced color stops.
        colorscale: Vec<String>,
    },
    /// Bar series.
    Bar {
        /// Legend entry.
        name: String,
        /// Bar positions.
        x: Vec<f64>,
        /// Bar heights.
        y: Vec<f64>,
        /// Fill and outline.
        marker: Marker,
        /// Opacity, if not fully opaque.
        #[serde(skip_serializing_if = "Option::is_none")]
        opacity: Option<f64>,
    },
}

/// Bar fill and outline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    /// Fill color.
    pub color: String,
    /// Outline color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_color: Option<String>,
    /// Outline width.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f64>,
}

/// Titles and global styling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    /// Figure title.
    pub title: String,
    /// X axis title.
    pub x_title: String,
    /// Y axis title.
    pub y_title: String,
    /// Background color of the plotting area.
    pub plot_bgcolor: String,
    /// Bar mode (`"overlay"` for overlaid bars).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<String>,
    /// Gap between bars.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bargap: Option<f64>,
}

fn pull_figure(result: &ComparisonResult, map: &PullMap) -> Figure {
    Figure {
        traces: vec![Trace::Heatmap {
            z: map.values.clone(),
            x: map.x_labels.clone(),
            y: map.y_labels.clone(),
            zmin: -map.cap,
            zmax: map.cap,
            colorscale: PULL_COLORSCALE.iter().map(|c| c.to_string()).collect(),
        }],
        layout: Layout {
            title: format!("{} Pull Values", result.data_name),
            x_title: map.x_title.clone(),
            y_title: map.y_title.clone(),
            plot_bgcolor: "white".to_string(),
            barmode: None,
            bargap: None,
        },
    }
}

fn overlay_figure(result: &ComparisonResult, overlay: &Overlay) -> Figure {
    let data = Trace::Bar {
        name: overlay.data_label.clone(),
        x: overlay.bin_lows.clone(),
        y: overlay.data.clone(),
        marker: Marker {
            color: "white".to_string(),
            line_color: Some("red".to_string()),
            line_width: Some(1.0),
        },
        opacity: None,
    };
    let reference = Trace::Bar {
        name: overlay.ref_label.clone(),
        x: overlay.bin_lows.clone(),
        y: overlay.reference.clone(),
        marker: Marker { color: REF_FILL.to_string(), line_color: None, line_width: None },
        opacity: Some(0.9),
    };
    Figure {
        traces: vec![data, reference],
        layout: Layout {
            title: format!("{} KS Test {} | {}", result.data_name, result.data_run, result.ref_run),
            x_title: overlay.x_title.clone(),
            y_title: overlay.y_title.clone(),
            plot_bgcolor: "white".to_string(),
            barmode: Some("overlay".to_string()),
            bargap: Some(0.0),
        },
    }
}

/// Figure for a comparison result, or `None` if the result has no plot.
pub fn figure_for(result: &ComparisonResult) -> Option<Figure> {
    match result.plot.as_ref()? {
        Plot::PullMap(map) => Some(pull_figure(result, map)),
        Plot::Overlay(overlay) => Some(overlay_figure(result, overlay)),
    }
}

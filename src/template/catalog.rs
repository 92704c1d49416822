//! Canonical diagram types and the template ids that render them
//!
//! Content refers to diagrams by a stable semantic name (`triangle`,
//! `barChart`) rather than a versioned template id. The mapping is an
//! exhaustive match, so every type always resolves to a template.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagramType {
    CoordinateGrid,
    NumberLine,
    Triangle,
    Rectangle,
    Circle,
    Angle,
    Cuboid,
    Cylinder,
    BarChart,
    BoxPlot,
    SeriesCircuit,
}

impl DiagramType {
    pub const ALL: [DiagramType; 11] = [
        DiagramType::CoordinateGrid,
        DiagramType::NumberLine,
        DiagramType::Triangle,
        DiagramType::Rectangle,
        DiagramType::Circle,
        DiagramType::Angle,
        DiagramType::Cuboid,
        DiagramType::Cylinder,
        DiagramType::BarChart,
        DiagramType::BoxPlot,
        DiagramType::SeriesCircuit,
    ];

    /// Template id rendering this diagram type
    pub fn template_id(&self) -> &'static str {
        match self {
            DiagramType::CoordinateGrid => "math.graphs.coordinate_point.v1",
            DiagramType::NumberLine => "math.number.number_line.v1",
            DiagramType::Triangle => "math.geometry.triangle.v1",
            DiagramType::Rectangle => "math.geometry.rectangle.v1",
            DiagramType::Circle => "math.geometry.circle.v1",
            DiagramType::Angle => "math.geometry.angle.v1",
            DiagramType::Cuboid => "math.geometry.cuboid.v1",
            DiagramType::Cylinder => "math.geometry.cylinder.v1",
            DiagramType::BarChart => "math.statistics.bar_chart.v1",
            DiagramType::BoxPlot => "math.statistics.box_plot.v1",
            DiagramType::SeriesCircuit => "science.physics.circuit_series.v1",
        }
    }

    /// Semantic name as used in content
    pub fn name(&self) -> &'static str {
        match self {
            DiagramType::CoordinateGrid => "coordinateGrid",
            DiagramType::NumberLine => "numberLine",
            DiagramType::Triangle => "triangle",
            DiagramType::Rectangle => "rectangle",
            DiagramType::Circle => "circle",
            DiagramType::Angle => "angle",
            DiagramType::Cuboid => "cuboid",
            DiagramType::Cylinder => "cylinder",
            DiagramType::BarChart => "barChart",
            DiagramType::BoxPlot => "boxPlot",
            DiagramType::SeriesCircuit => "seriesCircuit",
        }
    }

    /// Reverse lookup from a template id
    pub fn from_template_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.template_id() == id)
    }
}

impl fmt::Display for DiagramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DiagramType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| format!("Unknown diagram type: {}", s))
    }
}

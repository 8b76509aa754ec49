use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::graph::Canvas;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Random pairwise connections between nearby nodes.
    #[default]
    Mesh,
    /// One central node linked to every other node.
    Hub,
}

impl Topology {
    pub fn label(self) -> &'static str {
        match self {
            Self::Mesh => "Mesh",
            Self::Hub => "Hub",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Anywhere on the canvas.
    #[default]
    Uniform,
    /// Random angle, distance drawn from the distance band around the center.
    Radial,
    /// Evenly spread along the perimeter of a regular polygon.
    Polygon,
}

impl Placement {
    pub fn label(self) -> &'static str {
        match self {
            Self::Uniform => "Uniform",
            Self::Radial => "Radial band",
            Self::Polygon => "Polygon",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadiusDistribution {
    /// `u^4` skew: large circles are rare.
    #[default]
    Skewed,
    Uniform,
}

impl RadiusDistribution {
    pub fn label(self) -> &'static str {
        match self {
            Self::Skewed => "Skewed",
            Self::Uniform => "Uniform",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ValidationError {
    #[error("min connections > max")]
    Connections,
    #[error("min radius > max radius")]
    Radius,
    #[error("min distance > max")]
    Distance,
    #[error("min length > max")]
    LineLength,
    #[error("node radius must be positive")]
    NonPositiveRadius,
    #[error("a polygon needs at least 3 edges (got {0})")]
    PolygonEdges(usize),
    #[error("canvas must have a positive size (got {width}x{height})")]
    Canvas { width: f32, height: f32 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    pub node_count: usize,
    pub min_connections: usize,
    pub max_connections: usize,
    pub min_node_radius: f32,
    pub max_node_radius: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub connection_radius: Option<f32>,
    pub central_node_size: f32,
    pub min_line_length: f32,
    pub max_line_length: f32,
    pub polygon_edges: usize,
    pub placement: Placement,
    pub radius_distribution: RadiusDistribution,
    pub topology: Topology,
    pub dashed_lines: bool,
    pub placement_attempts: usize,
    pub placement_padding: f32,
    pub centering_exponent: f32,
    pub polygon_jitter: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            node_count: 40,
            min_connections: 1,
            max_connections: 3,
            min_node_radius: 4.0,
            max_node_radius: 28.0,
            min_distance: 30.0,
            max_distance: 120.0,
            connection_radius: Some(180.0),
            central_node_size: 36.0,
            min_line_length: 120.0,
            max_line_length: 260.0,
            polygon_edges: 6,
            placement: Placement::Uniform,
            radius_distribution: RadiusDistribution::Skewed,
            topology: Topology::Mesh,
            dashed_lines: false,
            placement_attempts: 100,
            placement_padding: 5.0,
            centering_exponent: 2.0,
            polygon_jitter: 8.0,
        }
    }
}

impl GenerationParams {
    pub fn validate(&self, canvas: Canvas) -> Result<(), ValidationError> {
        if self.min_connections > self.max_connections {
            return Err(ValidationError::Connections);
        }
        if self.min_node_radius > self.max_node_radius {
            return Err(ValidationError::Radius);
        }
        if self.min_distance > self.max_distance {
            return Err(ValidationError::Distance);
        }
        if self.min_line_length > self.max_line_length {
            return Err(ValidationError::LineLength);
        }

        let radius_ok = |value: f32| value.is_finite() && value > 0.0;
        if !radius_ok(self.min_node_radius) || !radius_ok(self.max_node_radius) {
            return Err(ValidationError::NonPositiveRadius);
        }
        if self.topology == Topology::Hub && !radius_ok(self.central_node_size) {
            return Err(ValidationError::NonPositiveRadius);
        }
        if self.placement == Placement::Polygon && self.polygon_edges < 3 {
            return Err(ValidationError::PolygonEdges(self.polygon_edges));
        }
        if !canvas.is_valid() {
            return Err(ValidationError::Canvas {
                width: canvas.width,
                height: canvas.height,
            });
        }
        Ok(())
    }

    /// Rest length used for links without their own length.
    pub fn default_link_length(&self) -> f32 {
        (self.min_distance + self.max_distance) * 0.5
    }

    /// Distance band from the canvas center used by radial and polygon placement.
    pub fn placement_band(&self) -> (f32, f32) {
        match self.topology {
            Topology::Mesh => (self.min_distance, self.max_distance),
            Topology::Hub => (self.min_line_length, self.max_line_length),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Canvas {
        Canvas::new(800.0, 600.0)
    }

    #[test]
    fn defaults_are_valid() {
        assert_eq!(GenerationParams::default().validate(canvas()), Ok(()));
    }

    #[test]
    fn inverted_connections_are_rejected() {
        let params = GenerationParams {
            min_connections: 5,
            max_connections: 2,
            ..GenerationParams::default()
        };
        let error = params.validate(canvas()).unwrap_err();
        assert_eq!(error, ValidationError::Connections);
        assert_eq!(error.to_string(), "min connections > max");
    }

    #[test]
    fn inverted_radius_and_distance_are_rejected() {
        let radius = GenerationParams {
            min_node_radius: 10.0,
            max_node_radius: 5.0,
            ..GenerationParams::default()
        };
        assert_eq!(radius.validate(canvas()), Err(ValidationError::Radius));

        let distance = GenerationParams {
            min_distance: 200.0,
            max_distance: 100.0,
            ..GenerationParams::default()
        };
        assert_eq!(distance.validate(canvas()), Err(ValidationError::Distance));

        let length = GenerationParams {
            min_line_length: 300.0,
            max_line_length: 100.0,
            ..GenerationParams::default()
        };
        assert_eq!(length.validate(canvas()), Err(ValidationError::LineLength));
    }

    #[test]
    fn polygon_needs_three_edges() {
        let params = GenerationParams {
            placement: Placement::Polygon,
            polygon_edges: 2,
            ..GenerationParams::default()
        };
        assert_eq!(
            params.validate(canvas()),
            Err(ValidationError::PolygonEdges(2))
        );
    }

    #[test]
    fn empty_canvas_is_rejected() {
        let result = GenerationParams::default().validate(Canvas::new(0.0, 10.0));
        assert!(matches!(result, Err(ValidationError::Canvas { .. })));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let params: GenerationParams =
            serde_json::from_str(r#"{ "node_count": 7, "topology": "hub" }"#).unwrap();
        assert_eq!(params.node_count, 7);
        assert_eq!(params.topology, Topology::Hub);
        assert_eq!(params.placement_attempts, 100);
        assert_eq!(params.placement_padding, 5.0);
    }
}

use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Vec2, vec2};
use rand::Rng;

use super::graph::Canvas;
use super::params::{GenerationParams, Placement, RadiusDistribution};

pub(super) fn sample_radius<R: Rng + ?Sized>(rng: &mut R, params: &GenerationParams) -> f32 {
    let unit = rng.r#gen::<f32>();
    let factor = match params.radius_distribution {
        RadiusDistribution::Skewed => unit.powi(4),
        RadiusDistribution::Uniform => unit,
    };
    params.min_node_radius + (params.max_node_radius - params.min_node_radius) * factor
}

/// Larger circles get pulled toward the center harder so they do not clip at the edges.
pub(super) fn centering_weight(radius: f32, params: &GenerationParams) -> f32 {
    if params.max_node_radius <= 0.0 {
        return 0.0;
    }
    (radius / params.max_node_radius)
        .powf(params.centering_exponent)
        .clamp(0.0, 1.0)
}

pub(super) fn seed_position<R: Rng + ?Sized>(
    rng: &mut R,
    params: &GenerationParams,
    canvas: Canvas,
    index: usize,
    count: usize,
) -> Vec2 {
    match params.placement {
        Placement::Uniform => vec2(
            rng.r#gen::<f32>() * canvas.width,
            rng.r#gen::<f32>() * canvas.height,
        ),
        Placement::Radial => {
            let (near, far) = params.placement_band();
            let angle = rng.r#gen::<f32>() * TAU;
            let distance = near + (far - near) * rng.r#gen::<f32>();
            canvas.center() + vec2(angle.cos(), angle.sin()) * distance
        }
        Placement::Polygon => {
            let (near, far) = params.placement_band();
            let limit = canvas.width.min(canvas.height) * 0.5;
            let radius = ((near + far) * 0.5).min(limit);
            let fraction = if count == 0 {
                0.0
            } else {
                index as f32 / count as f32
            };
            let jitter = vec2(
                (rng.r#gen::<f32>() * 2.0 - 1.0) * params.polygon_jitter,
                (rng.r#gen::<f32>() * 2.0 - 1.0) * params.polygon_jitter,
            );
            perimeter_point(canvas.center(), radius, params.polygon_edges, fraction) + jitter
        }
    }
}

/// Point at `fraction` of the way around a regular polygon whose first vertex sits on top.
pub(super) fn perimeter_point(center: Vec2, radius: f32, edges: usize, fraction: f32) -> Vec2 {
    let edges = edges.max(3);
    let vertex = |index: usize| {
        let angle = -FRAC_PI_2 + TAU * (index % edges) as f32 / edges as f32;
        center + vec2(angle.cos(), angle.sin()) * radius
    };

    let along = fraction.rem_euclid(1.0) * edges as f32;
    let edge = along.floor();
    let t = along - edge;
    let start = vertex(edge as usize);
    let end = vertex(edge as usize + 1);
    start + (end - start) * t
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::network::params::Topology;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn perimeter_starts_at_top_vertex() {
        let point = perimeter_point(vec2(100.0, 100.0), 50.0, 4, 0.0);
        assert!(close(point, vec2(100.0, 50.0)), "{point:?}");
    }

    #[test]
    fn perimeter_midpoint_lies_on_edge() {
        // Square with vertices top, right, bottom, left: an eighth of the way is
        // halfway between top and right.
        let point = perimeter_point(Vec2::ZERO, 10.0, 4, 0.125);
        assert!(close(point, vec2(5.0, -5.0)), "{point:?}");
    }

    #[test]
    fn skewed_radius_stays_in_bounds() {
        let params = GenerationParams::default();
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..500 {
            let radius = sample_radius(&mut rng, &params);
            assert!(radius >= params.min_node_radius && radius <= params.max_node_radius);
        }
    }

    #[test]
    fn centering_weight_grows_with_radius() {
        let params = GenerationParams::default();
        let small = centering_weight(params.min_node_radius, &params);
        let large = centering_weight(params.max_node_radius, &params);
        assert!(small < large);
        assert_eq!(large, 1.0);
    }

    #[test]
    fn radial_seeds_fall_inside_band() {
        let params = GenerationParams {
            placement: Placement::Radial,
            topology: Topology::Mesh,
            ..GenerationParams::default()
        };
        let canvas = Canvas::new(1000.0, 1000.0);
        let mut rng = StdRng::seed_from_u64(3);
        for index in 0..200 {
            let seed = seed_position(&mut rng, &params, canvas, index, 200);
            let distance = (seed - canvas.center()).length();
            assert!(distance >= params.min_distance - 1e-3);
            assert!(distance <= params.max_distance + 1e-3);
        }
    }
}

use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};

use super::quadtree::QuadNode;
use crate::network::Node;

/// Resolved link: node indices plus precomputed rest length and degree bias.
#[derive(Clone, Copy, Debug)]
pub(super) struct Spring {
    pub(super) source: usize,
    pub(super) target: usize,
    pub(super) rest_length: f32,
    /// Share of the correction taken by the target end.
    pub(super) bias: f32,
}

#[derive(Clone, Copy)]
pub(super) struct ChargeParams {
    pub(super) strength: f32,
    pub(super) theta: f32,
    pub(super) distance_min_sq: f32,
    pub(super) distance_max_sq: f32,
    pub(super) alpha: f32,
}

#[derive(Clone, Copy)]
pub(super) struct CollisionParams {
    pub(super) strength: f32,
    pub(super) max_reach_sq: f32,
}

/// Deterministic unit direction for coincident points.
fn jiggle(from: usize, to: usize) -> Vec2 {
    let angle = ((from as f32) * 0.618_034 + (to as f32) * 0.414_214) * TAU;
    vec2(angle.cos(), angle.sin())
}

pub(super) fn apply_springs(nodes: &mut [Node], springs: &[Spring], strength: f32, alpha: f32) {
    for spring in springs {
        let (Some(source), Some(target)) = (nodes.get(spring.source), nodes.get(spring.target))
        else {
            continue;
        };

        let mut offset =
            (target.position + target.velocity) - (source.position + source.velocity);
        if offset.length_sq() <= 1e-12 {
            offset = jiggle(spring.source, spring.target) * 1e-3;
        }
        let distance = offset.length();
        let pull = offset * ((distance - spring.rest_length) / distance * alpha * strength);

        nodes[spring.target].velocity -= pull * spring.bias;
        nodes[spring.source].velocity += pull * (1.0 - spring.bias);
    }
}

fn charge_impulse(offset: Vec2, distance_sq: f32, weight: f32, params: ChargeParams) -> Vec2 {
    let mut distance_sq = distance_sq;
    if distance_sq < params.distance_min_sq {
        distance_sq = (params.distance_min_sq * distance_sq).sqrt();
    }
    offset * (params.strength * weight * params.alpha / distance_sq)
}

/// Adds the many-body impulse on point `index`. Anything at or beyond the maximum
/// distance is ignored; closer than the minimum the distance is clamped up.
pub(super) fn accumulate_charge(
    node: &QuadNode,
    index: usize,
    positions: &[Vec2],
    params: ChargeParams,
    impulse: &mut Vec2,
) {
    if node.mass <= 0.0 {
        return;
    }

    let point = positions[index];

    if node.is_leaf() {
        for &other in &node.indices {
            if other == index {
                continue;
            }
            let mut offset = positions[other] - point;
            let mut distance_sq = offset.length_sq();
            if distance_sq >= params.distance_max_sq {
                continue;
            }
            if distance_sq <= 1e-12 {
                offset = jiggle(index, other) * 1e-3;
                distance_sq = offset.length_sq();
            }
            *impulse += charge_impulse(offset, distance_sq, 1.0, params);
        }
        return;
    }

    let offset = node.center_of_mass - point;
    let distance_sq = offset.length_sq();
    let side = node.bounds.side_length();
    let far_enough = !node.bounds.contains(point)
        && (side * side) / (params.theta * params.theta) < distance_sq;

    if far_enough {
        if distance_sq < params.distance_max_sq {
            *impulse += charge_impulse(offset, distance_sq, node.mass, params);
        }
        return;
    }

    for child in node.children() {
        accumulate_charge(child, index, positions, params, impulse);
    }
}

fn collide_pair(
    from: usize,
    to: usize,
    predicted: &[Vec2],
    radii: &[f32],
    strength: f32,
    impulses: &mut [Vec2],
) {
    let reach = radii[from] + radii[to];
    let mut offset = predicted[from] - predicted[to];
    let mut distance_sq = offset.length_sq();
    if distance_sq >= reach * reach {
        return;
    }
    if distance_sq <= 1e-12 {
        offset = jiggle(from, to) * 1e-3;
        distance_sq = offset.length_sq();
    }

    let distance = distance_sq.sqrt();
    let push = offset * ((reach - distance) / distance * strength);
    let from_sq = radii[from] * radii[from];
    let to_sq = radii[to] * radii[to];
    let share = to_sq / (from_sq + to_sq);

    impulses[from] += push * share;
    impulses[to] -= push * (1.0 - share);
}

/// Walks every pair of cells that could hold overlapping circles.
pub(super) fn accumulate_collision_pairs(
    node_a: &QuadNode,
    node_b: &QuadNode,
    same_node: bool,
    predicted: &[Vec2],
    radii: &[f32],
    params: CollisionParams,
    impulses: &mut [Vec2],
) {
    if node_a.bounds.distance_sq_to(node_b.bounds) > params.max_reach_sq {
        return;
    }

    if node_a.is_leaf() && node_b.is_leaf() {
        if same_node {
            for (offset, &from) in node_a.indices.iter().enumerate() {
                for &to in &node_a.indices[offset + 1..] {
                    collide_pair(from, to, predicted, radii, params.strength, impulses);
                }
            }
        } else {
            for &from in &node_a.indices {
                for &to in &node_b.indices {
                    collide_pair(from, to, predicted, radii, params.strength, impulses);
                }
            }
        }
        return;
    }

    if same_node {
        let children = node_a.children().collect::<Vec<_>>();
        for (first, child_a) in children.iter().enumerate() {
            accumulate_collision_pairs(
                child_a, child_a, true, predicted, radii, params, impulses,
            );
            for child_b in &children[first + 1..] {
                accumulate_collision_pairs(
                    child_a, child_b, false, predicted, radii, params, impulses,
                );
            }
        }
        return;
    }

    let split_a = if node_a.is_leaf() {
        false
    } else if node_b.is_leaf() {
        true
    } else {
        node_a.bounds.half_extent >= node_b.bounds.half_extent
    };

    if split_a {
        for child in node_a.children() {
            accumulate_collision_pairs(child, node_b, false, predicted, radii, params, impulses);
        }
    } else {
        for child in node_b.children() {
            accumulate_collision_pairs(node_a, child, false, predicted, radii, params, impulses);
        }
    }
}

/// Translates every node so the centroid lands on `center`.
pub(super) fn apply_centering(nodes: &mut [Node], center: Vec2) {
    if nodes.is_empty() {
        return;
    }
    let centroid = nodes
        .iter()
        .fold(Vec2::ZERO, |sum, node| sum + node.position)
        / nodes.len() as f32;
    let shift = centroid - center;
    for node in nodes {
        node.position -= shift;
    }
}

/// Independent x/y pull toward the canvas center, weighted per node.
pub(super) fn apply_axis_pull(
    nodes: &mut [Node],
    center: Vec2,
    strength: f32,
    default_weight: f32,
    alpha: f32,
) {
    for node in nodes {
        let weight = node.centering_force.unwrap_or(default_weight);
        node.velocity += (center - node.position) * (weight * strength * alpha);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_at(id: usize, x: f32, y: f32, radius: f32) -> Node {
        Node::new(id, vec2(x, y), radius)
    }

    fn charge(strength: f32, min: f32, max: f32) -> ChargeParams {
        ChargeParams {
            strength,
            theta: 0.9,
            distance_min_sq: min * min,
            distance_max_sq: max * max,
            alpha: 1.0,
        }
    }

    #[test]
    fn negative_charge_pushes_apart() {
        let positions = vec![vec2(0.0, 0.0), vec2(10.0, 0.0)];
        let tree = QuadNode::build(&positions).unwrap();
        let mut impulse = Vec2::ZERO;
        accumulate_charge(&tree, 0, &positions, charge(-100.0, 1.0, 500.0), &mut impulse);
        assert!(impulse.x < 0.0, "{impulse:?}");
    }

    #[test]
    fn charge_ignores_pairs_beyond_max_distance() {
        let positions = vec![vec2(0.0, 0.0), vec2(300.0, 0.0)];
        let tree = QuadNode::build(&positions).unwrap();
        let mut impulse = Vec2::ZERO;
        accumulate_charge(&tree, 0, &positions, charge(-100.0, 1.0, 200.0), &mut impulse);
        assert_eq!(impulse, Vec2::ZERO);
    }

    #[test]
    fn charge_clamps_close_pairs() {
        let positions = vec![vec2(0.0, 0.0), vec2(1.0, 0.0)];
        let tree = QuadNode::build(&positions).unwrap();
        let mut clamped = Vec2::ZERO;
        accumulate_charge(&tree, 0, &positions, charge(-100.0, 10.0, 500.0), &mut clamped);
        let mut raw = Vec2::ZERO;
        accumulate_charge(&tree, 0, &positions, charge(-100.0, 0.0, 500.0), &mut raw);
        assert!(clamped.length() < raw.length());
    }

    #[test]
    fn approximated_charge_matches_direct_sum_direction() {
        let mut positions = (0..60)
            .map(|index| vec2(500.0 + (index % 6) as f32 * 3.0, (index / 6) as f32 * 3.0))
            .collect::<Vec<_>>();
        positions.push(vec2(0.0, 0.0));
        let probe = positions.len() - 1;
        let tree = QuadNode::build(&positions).unwrap();

        let mut impulse = Vec2::ZERO;
        accumulate_charge(&tree, probe, &positions, charge(-100.0, 1.0, 5000.0), &mut impulse);
        assert!(impulse.x < 0.0);
        assert!(impulse.y.abs() < impulse.x.abs());
    }

    #[test]
    fn spring_pulls_stretched_link_together() {
        let mut nodes = vec![node_at(0, 0.0, 0.0, 5.0), node_at(1, 100.0, 0.0, 5.0)];
        let springs = [Spring {
            source: 0,
            target: 1,
            rest_length: 50.0,
            bias: 0.5,
        }];
        apply_springs(&mut nodes, &springs, 1.0, 1.0);
        assert!(nodes[0].velocity.x > 0.0);
        assert!(nodes[1].velocity.x < 0.0);
        assert!((nodes[0].velocity.x - 25.0).abs() < 1e-3);
    }

    #[test]
    fn overlapping_circles_are_pushed_apart() {
        let predicted = vec![vec2(0.0, 0.0), vec2(4.0, 0.0), vec2(400.0, 400.0)];
        let radii = vec![5.0, 5.0, 5.0];
        let mut impulses = vec![Vec2::ZERO; 3];
        let tree = QuadNode::build(&predicted).unwrap();
        accumulate_collision_pairs(
            &tree,
            &tree,
            true,
            &predicted,
            &radii,
            CollisionParams {
                strength: 1.0,
                max_reach_sq: 100.0,
            },
            &mut impulses,
        );
        assert!(impulses[0].x < 0.0);
        assert!(impulses[1].x > 0.0);
        assert_eq!(impulses[2], Vec2::ZERO);
    }

    #[test]
    fn centering_moves_centroid() {
        let mut nodes = vec![node_at(0, 0.0, 0.0, 1.0), node_at(1, 20.0, 40.0, 1.0)];
        apply_centering(&mut nodes, vec2(100.0, 100.0));
        let centroid = (nodes[0].position + nodes[1].position) / 2.0;
        assert!((centroid - vec2(100.0, 100.0)).length() < 1e-4);
    }

    #[test]
    fn heavier_weight_pulls_harder() {
        let mut nodes = vec![node_at(0, 0.0, 0.0, 1.0), node_at(1, 0.0, 0.0, 1.0)];
        nodes[0].centering_force = Some(1.0);
        nodes[1].centering_force = Some(0.1);
        apply_axis_pull(&mut nodes, vec2(100.0, 50.0), 0.4, 0.1, 1.0);
        assert!(nodes[0].velocity.x > nodes[1].velocity.x);
        assert!((nodes[0].velocity - vec2(40.0, 20.0)).length() < 1e-4);
    }
}

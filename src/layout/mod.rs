//! Force-directed layout. Forces add to node velocities scaled by an energy
//! ("alpha") that cools every tick until the arrangement settles.

mod forces;
pub mod interaction;
mod paths;
mod quadtree;

use std::collections::HashMap;

use eframe::egui::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::network::{Canvas, GenerationParams, Link, NetworkGraph, Node};
use forces::{
    ChargeParams, CollisionParams, Spring, accumulate_charge, accumulate_collision_pairs,
    apply_axis_pull, apply_centering, apply_springs,
};
pub use paths::{EdgePath, edge_paths};
pub(crate) use paths::fmt_coord;
use quadtree::QuadNode;

/// Receives the node and link state after every tick.
pub trait TickObserver {
    fn on_tick(&mut self, nodes: &[Node], links: &[Link]);
}

impl<F> TickObserver for F
where
    F: FnMut(&[Node], &[Link]),
{
    fn on_tick(&mut self, nodes: &[Node], links: &[Link]) {
        self(nodes, links);
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub initial_alpha: f32,
    pub alpha_min: f32,
    /// Higher settles faster with less residual jitter.
    pub alpha_decay: f32,
    /// Fraction of velocity removed per tick.
    pub velocity_decay: f32,
    pub link_strength: f32,
    pub charge_strength: f32,
    pub charge_theta: f32,
    pub collision_radius_scale: f32,
    pub collision_strength: f32,
    pub axis_strength: f32,
    pub default_centering_weight: f32,
    pub reheat_alpha: f32,
    pub curve_pull: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            initial_alpha: 1.0,
            alpha_min: 0.001,
            alpha_decay: 0.05,
            velocity_decay: 0.6,
            link_strength: 1.0,
            charge_strength: -100.0,
            charge_theta: 0.9,
            collision_radius_scale: 1.5,
            collision_strength: 1.0,
            axis_strength: 0.4,
            default_centering_weight: 0.1,
            reheat_alpha: 0.3,
            curve_pull: -0.2,
        }
    }
}

/// Distances taken from the generation parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spacing {
    pub link_length: f32,
    pub charge_distance_min: f32,
    pub charge_distance_max: f32,
}

impl Spacing {
    pub fn from_params(params: &GenerationParams) -> Self {
        Self {
            link_length: params.default_link_length(),
            charge_distance_min: params.min_distance,
            charge_distance_max: params.max_distance,
        }
    }
}

#[derive(Default)]
struct PhysicsScratch {
    positions: Vec<Vec2>,
    predicted: Vec<Vec2>,
    radii: Vec<f32>,
    impulses: Vec<Vec2>,
}

/// One simulation run. Regeneration builds a new session and drops the old one.
pub struct LayoutSession {
    graph: NetworkGraph,
    springs: Vec<Spring>,
    canvas: Canvas,
    config: LayoutConfig,
    spacing: Spacing,
    alpha: f32,
    alpha_target: f32,
    running: bool,
    ticks: u64,
    scratch: PhysicsScratch,
}

impl LayoutSession {
    pub fn new(graph: NetworkGraph, canvas: Canvas, config: LayoutConfig, spacing: Spacing) -> Self {
        let springs = resolve_springs(&graph, spacing.link_length);
        let mut session = Self {
            graph,
            springs,
            canvas,
            alpha: config.initial_alpha,
            alpha_target: 0.0,
            running: true,
            ticks: 0,
            config,
            spacing,
            scratch: PhysicsScratch::default(),
        };
        session.contain_all();
        session
    }

    pub fn nodes(&self) -> &[Node] {
        &self.graph.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.graph.links
    }

    pub fn graph(&self) -> &NetworkGraph {
        &self.graph
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn alpha_target(&self) -> f32 {
        self.alpha_target
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_alpha_target(&mut self, target: f32) {
        self.alpha_target = target.max(0.0);
    }

    pub fn restart(&mut self) {
        self.running = true;
    }

    pub fn reheat(&mut self, alpha: f32) {
        self.alpha = alpha.max(self.alpha);
        self.running = true;
    }

    /// In-place recentering: node identity is kept and the run reheated.
    pub fn resize(&mut self, canvas: Canvas) {
        if !canvas.is_valid() || canvas == self.canvas {
            return;
        }
        debug!(width = canvas.width, height = canvas.height, "layout canvas resized");
        self.canvas = canvas;
        for node in &mut self.graph.nodes {
            if let Some(pin) = node.pin {
                node.pin = Some(canvas.contain(pin, node.radius));
            }
        }
        self.contain_all();
        self.reheat(self.config.reheat_alpha);
    }

    pub fn pin(&mut self, index: usize, position: Vec2) -> bool {
        let canvas = self.canvas;
        let Some(node) = self.graph.nodes.get_mut(index) else {
            return false;
        };
        let position = canvas.contain(position, node.radius);
        node.pin = Some(position);
        node.position = position;
        node.velocity = Vec2::ZERO;
        true
    }

    pub fn unpin(&mut self, index: usize) {
        if let Some(node) = self.graph.nodes.get_mut(index) {
            node.pin = None;
        }
    }

    /// Topmost node whose circle contains `point`.
    pub fn node_at(&self, point: Vec2) -> Option<usize> {
        self.graph
            .nodes
            .iter()
            .enumerate()
            .rev()
            .find(|(_, node)| node.contains(point))
            .map(|(index, _)| index)
    }

    pub fn edge_paths(&self) -> Vec<EdgePath> {
        edge_paths(
            &self.graph.nodes,
            &self.graph.links,
            self.canvas.center(),
            self.config.curve_pull,
        )
    }

    /// Advances one step when running and reports the new state to `observer`.
    /// Returns whether the run is still active.
    pub fn tick<O: TickObserver + ?Sized>(&mut self, observer: &mut O) -> bool {
        if !self.running {
            return false;
        }

        self.step();
        observer.on_tick(&self.graph.nodes, &self.graph.links);

        if self.alpha < self.config.alpha_min {
            self.running = false;
            debug!(ticks = self.ticks, "layout settled");
        }
        self.running
    }

    /// Ticks until the run stops or `max_ticks` is reached. Returns the ticks taken.
    pub fn run_until_settled<O: TickObserver + ?Sized>(
        &mut self,
        max_ticks: u64,
        observer: &mut O,
    ) -> u64 {
        let start = self.ticks;
        while self.ticks - start < max_ticks && self.tick(observer) {}
        self.ticks - start
    }

    fn step(&mut self) {
        self.ticks += 1;
        self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
        let alpha = self.alpha;
        let center = self.canvas.center();
        let config = &self.config;
        let nodes = &mut self.graph.nodes;
        let node_count = nodes.len();
        if node_count == 0 {
            return;
        }

        apply_springs(nodes, &self.springs, config.link_strength, alpha);

        let scratch = &mut self.scratch;
        scratch.impulses.clear();
        scratch.impulses.resize(node_count, Vec2::ZERO);
        scratch.positions.clear();
        scratch.positions.extend(nodes.iter().map(|node| node.position));

        if let Some(tree) = QuadNode::build(&scratch.positions) {
            let params = ChargeParams {
                strength: config.charge_strength,
                theta: config.charge_theta,
                distance_min_sq: self.spacing.charge_distance_min.powi(2),
                distance_max_sq: self.spacing.charge_distance_max.powi(2),
                alpha,
            };
            for (index, impulse) in scratch.impulses.iter_mut().enumerate() {
                accumulate_charge(&tree, index, &scratch.positions, params, impulse);
            }
        }
        for (node, impulse) in nodes.iter_mut().zip(&scratch.impulses) {
            node.velocity += *impulse;
        }

        apply_centering(nodes, center);

        scratch.impulses.fill(Vec2::ZERO);
        scratch.predicted.clear();
        scratch
            .predicted
            .extend(nodes.iter().map(|node| node.position + node.velocity));
        scratch.radii.clear();
        scratch.radii.extend(
            nodes
                .iter()
                .map(|node| node.radius * config.collision_radius_scale),
        );
        let max_radius = scratch.radii.iter().copied().fold(0.0_f32, f32::max);
        if max_radius > 0.0
            && let Some(tree) = QuadNode::build(&scratch.predicted)
        {
            let max_reach = max_radius * 2.0;
            accumulate_collision_pairs(
                &tree,
                &tree,
                true,
                &scratch.predicted,
                &scratch.radii,
                CollisionParams {
                    strength: config.collision_strength,
                    max_reach_sq: max_reach * max_reach,
                },
                &mut scratch.impulses,
            );
        }
        for (node, impulse) in nodes.iter_mut().zip(&scratch.impulses) {
            node.velocity += *impulse;
        }

        apply_axis_pull(
            nodes,
            center,
            config.axis_strength,
            config.default_centering_weight,
            alpha,
        );

        let damping = 1.0 - config.velocity_decay;
        for node in nodes.iter_mut() {
            if let Some(pin) = node.pin {
                node.position = pin;
                node.velocity = Vec2::ZERO;
            } else {
                node.velocity *= damping;
                node.position += node.velocity;
            }
        }

        self.contain_all();
    }

    fn contain_all(&mut self) {
        let canvas = self.canvas;
        for node in &mut self.graph.nodes {
            node.position = canvas.contain(node.position, node.radius);
        }
    }
}

fn resolve_springs(graph: &NetworkGraph, default_length: f32) -> Vec<Spring> {
    let index_by_id = graph
        .nodes
        .iter()
        .enumerate()
        .map(|(index, node)| (node.id, index))
        .collect::<HashMap<_, _>>();

    let mut degree = vec![0usize; graph.nodes.len()];
    let mut resolved = Vec::with_capacity(graph.links.len());
    for link in &graph.links {
        let (Some(&source), Some(&target)) =
            (index_by_id.get(&link.source), index_by_id.get(&link.target))
        else {
            warn!(
                source = link.source,
                target = link.target,
                "skipping link with unknown endpoint"
            );
            continue;
        };
        if source == target {
            continue;
        }
        degree[source] += 1;
        degree[target] += 1;
        resolved.push((source, target, link.length.unwrap_or(default_length)));
    }

    resolved
        .into_iter()
        .map(|(source, target, rest_length)| {
            let total = (degree[source] + degree[target]) as f32;
            Spring {
                source,
                target,
                rest_length,
                bias: degree[source] as f32 / total,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::network::{Topology, generate};

    fn session_for(params: &GenerationParams, canvas: Canvas, seed: u64) -> LayoutSession {
        let graph = generate(params, canvas, &mut StdRng::seed_from_u64(seed)).unwrap();
        LayoutSession::new(
            graph,
            canvas,
            LayoutConfig::default(),
            Spacing::from_params(params),
        )
    }

    fn assert_contained(session: &LayoutSession) {
        let canvas = session.canvas();
        for node in session.nodes() {
            let p = node.position;
            assert!(p.x >= node.radius - 1e-3 && p.x <= canvas.width - node.radius + 1e-3);
            assert!(p.y >= node.radius - 1e-3 && p.y <= canvas.height - node.radius + 1e-3);
        }
    }

    #[test]
    fn every_tick_keeps_nodes_inside_canvas() {
        let params = GenerationParams {
            node_count: 80,
            ..GenerationParams::default()
        };
        let mut session = session_for(&params, Canvas::new(400.0, 300.0), 7);
        let mut observed = 0;
        for _ in 0..120 {
            session.tick(&mut |nodes: &[Node], _links: &[Link]| {
                observed += 1;
                let canvas = Canvas::new(400.0, 300.0);
                for node in nodes {
                    assert_eq!(canvas.contain(node.position, node.radius), node.position);
                }
            });
            assert_contained(&session);
        }
        assert!(observed > 0);
    }

    #[test]
    fn layout_settles_and_stops() {
        let params = GenerationParams::default();
        let mut session = session_for(&params, Canvas::new(1024.0, 768.0), 3);
        let ticks = session.run_until_settled(10_000, &mut |_: &[Node], _: &[Link]| {});
        assert!(!session.is_running());
        assert!(session.alpha() < session.config().alpha_min);
        // alpha decays geometrically: 1.0 * 0.95^n < 0.001 after ~135 ticks.
        assert!(ticks > 100 && ticks < 200, "took {ticks} ticks");
        assert!(!session.tick(&mut |_: &[Node], _: &[Link]| {}));
    }

    #[test]
    fn linked_pair_moves_toward_rest_length() {
        let mut graph = NetworkGraph::default();
        graph.nodes.push(Node::new(0, vec2(100.0, 300.0), 5.0));
        graph.nodes.push(Node::new(1, vec2(700.0, 300.0), 5.0));
        graph.links.push(Link::new(0, 1).with_length(80.0));
        let spacing = Spacing {
            link_length: 80.0,
            charge_distance_min: 1.0,
            charge_distance_max: 50.0,
        };
        let mut session =
            LayoutSession::new(graph, Canvas::new(800.0, 600.0), LayoutConfig::default(), spacing);
        session.run_until_settled(500, &mut |_: &[Node], _: &[Link]| {});

        let gap = (session.nodes()[0].position - session.nodes()[1].position).length();
        assert!((gap - 80.0).abs() < 20.0, "gap {gap}");
    }

    #[test]
    fn collision_separates_stacked_circles() {
        let mut graph = NetworkGraph::default();
        for id in 0..2 {
            graph
                .nodes
                .push(Node::new(id, vec2(400.0 + id as f32, 300.0), 20.0));
        }
        let spacing = Spacing {
            link_length: 50.0,
            charge_distance_min: 1.0,
            charge_distance_max: 2.0,
        };
        let mut session =
            LayoutSession::new(graph, Canvas::new(800.0, 600.0), LayoutConfig::default(), spacing);
        session.run_until_settled(300, &mut |_: &[Node], _: &[Link]| {});

        let gap = (session.nodes()[0].position - session.nodes()[1].position).length();
        assert!(gap >= 40.0, "circles still overlap: gap {gap}");
    }

    #[test]
    fn pinned_node_holds_position() {
        let params = GenerationParams {
            node_count: 10,
            ..GenerationParams::default()
        };
        let mut session = session_for(&params, Canvas::new(600.0, 600.0), 1);
        assert!(session.pin(0, vec2(120.0, 140.0)));
        for _ in 0..30 {
            session.tick(&mut |_: &[Node], _: &[Link]| {});
        }
        assert_eq!(session.nodes()[0].position, vec2(120.0, 140.0));
        assert!(!session.pin(99, vec2(0.0, 0.0)));
    }

    #[test]
    fn resize_recenters_and_reheats() {
        let params = GenerationParams {
            node_count: 20,
            ..GenerationParams::default()
        };
        let mut session = session_for(&params, Canvas::new(1200.0, 900.0), 4);
        session.run_until_settled(10_000, &mut |_: &[Node], _: &[Link]| {});
        let ids = session.nodes().iter().map(|node| node.id).collect::<Vec<_>>();

        session.resize(Canvas::new(300.0, 300.0));

        assert!(session.is_running());
        assert_eq!(session.alpha(), session.config().reheat_alpha);
        assert_eq!(
            session.nodes().iter().map(|node| node.id).collect::<Vec<_>>(),
            ids
        );
        assert_contained(&session);
    }

    #[test]
    fn hub_layout_keeps_hub_radius_and_links() {
        let params = GenerationParams {
            node_count: 15,
            topology: Topology::Hub,
            ..GenerationParams::default()
        };
        let mut session = session_for(&params, Canvas::new(1200.0, 900.0), 12);
        session.run_until_settled(50, &mut |_: &[Node], _: &[Link]| {});
        let hub = session.graph().central_node().unwrap();
        assert_eq!(hub.radius, params.central_node_size);
        assert_eq!(session.links().len(), session.nodes().len() - 1);
        assert!(
            session
                .edge_paths()
                .iter()
                .all(|path| matches!(path, EdgePath::Cubic { .. }))
        );
    }

    #[test]
    fn dangling_links_are_skipped() {
        let mut graph = NetworkGraph::default();
        graph.nodes.push(Node::new(0, vec2(10.0, 10.0), 2.0));
        graph.links.push(Link::new(0, 5));
        let session = LayoutSession::new(
            graph,
            Canvas::new(100.0, 100.0),
            LayoutConfig::default(),
            Spacing::from_params(&GenerationParams::default()),
        );
        assert!(session.springs.is_empty());
        assert!(session.edge_paths().is_empty());
    }

    #[test]
    fn hit_test_finds_topmost_node() {
        let mut graph = NetworkGraph::default();
        graph.nodes.push(Node::new(0, vec2(50.0, 50.0), 20.0));
        graph.nodes.push(Node::new(1, vec2(55.0, 50.0), 20.0));
        let session = LayoutSession::new(
            graph,
            Canvas::new(200.0, 200.0),
            LayoutConfig::default(),
            Spacing::from_params(&GenerationParams::default()),
        );
        assert_eq!(session.node_at(vec2(52.0, 50.0)), Some(1));
        assert_eq!(session.node_at(vec2(31.0, 50.0)), Some(0));
        assert_eq!(session.node_at(vec2(150.0, 150.0)), None);
    }
}

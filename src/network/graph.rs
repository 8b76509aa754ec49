use std::collections::HashSet;

use eframe::egui::{Vec2, vec2};

pub type NodeId = usize;

/// Simulation space: origin at the top-left corner, same units as the SVG viewBox.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
}

impl Canvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(self) -> Vec2 {
        vec2(self.width * 0.5, self.height * 0.5)
    }

    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Clamps a circle center so the whole circle stays inside the canvas.
    /// Circles wider than the canvas are centered on that axis.
    pub fn contain(self, position: Vec2, radius: f32) -> Vec2 {
        vec2(
            clamp_axis(position.x, radius, self.width),
            clamp_axis(position.y, radius, self.height),
        )
    }
}

fn clamp_axis(value: f32, radius: f32, extent: f32) -> f32 {
    let upper = extent - radius;
    if upper < radius {
        return extent * 0.5;
    }
    value.clamp(radius, upper)
}

#[derive(Clone, Debug)]
pub struct Node {
    pub id: NodeId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    pub is_central: bool,
    pub centering_force: Option<f32>,
    /// Fixed-position override while a drag holds the node.
    pub pin: Option<Vec2>,
}

impl Node {
    pub fn new(id: NodeId, position: Vec2, radius: f32) -> Self {
        Self {
            id,
            position,
            velocity: Vec2::ZERO,
            radius,
            is_central: false,
            centering_force: None,
            pin: None,
        }
    }

    pub fn is_pinned(&self) -> bool {
        self.pin.is_some()
    }

    pub fn contains(&self, point: Vec2) -> bool {
        (point - self.position).length_sq() <= self.radius * self.radius
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
    pub source: NodeId,
    pub target: NodeId,
    /// Preferred rest length; the layout falls back to its default when unset.
    pub length: Option<f32>,
}

impl Link {
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self {
            source,
            target,
            length: None,
        }
    }

    pub fn with_length(mut self, length: f32) -> Self {
        self.length = Some(length);
        self
    }

    fn unordered_key(&self) -> (NodeId, NodeId) {
        (self.source.min(self.target), self.source.max(self.target))
    }
}

#[derive(Clone, Debug, Default)]
pub struct NetworkGraph {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

impl NetworkGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn central_node(&self) -> Option<&Node> {
        self.nodes.iter().find(|node| node.is_central)
    }

    /// Drops self-loops and keeps the first link of every unordered pair.
    pub fn dedup_links(&mut self) {
        let mut seen = HashSet::with_capacity(self.links.len());
        self.links
            .retain(|link| link.source != link.target && seen.insert(link.unordered_key()));
    }

    pub fn degree(&self, id: NodeId) -> usize {
        self.links
            .iter()
            .filter(|link| link.source == id || link.target == id)
            .count()
    }
}

mod graph;
mod params;
mod placement;
mod sampler;

pub use graph::{Canvas, Link, NetworkGraph, Node, NodeId};
pub use params::{GenerationParams, Placement, RadiusDistribution, Topology, ValidationError};
pub use sampler::generate;

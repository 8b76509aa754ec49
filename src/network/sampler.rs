use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use super::graph::{Canvas, Link, NetworkGraph, Node, NodeId};
use super::params::{GenerationParams, Topology, ValidationError};
use super::placement::{centering_weight, sample_radius, seed_position};

/// Builds a fresh graph for `params`. Nothing is produced when the parameters are
/// inconsistent.
pub fn generate<R: Rng + ?Sized>(
    params: &GenerationParams,
    canvas: Canvas,
    rng: &mut R,
) -> Result<NetworkGraph, ValidationError> {
    params.validate(canvas)?;

    let graph = match params.topology {
        Topology::Mesh => generate_mesh(params, canvas, rng),
        Topology::Hub => generate_hub(params, canvas, rng),
    };

    debug!(
        topology = params.topology.label(),
        nodes = graph.node_count(),
        links = graph.link_count(),
        "generated network"
    );
    Ok(graph)
}

fn make_node<R: Rng + ?Sized>(
    rng: &mut R,
    params: &GenerationParams,
    canvas: Canvas,
    index: usize,
) -> Node {
    let radius = sample_radius(rng, params);
    let position = seed_position(rng, params, canvas, index, params.node_count);
    let mut node = Node::new(index, position, radius);
    node.centering_force = Some(centering_weight(radius, params));
    node
}

fn generate_mesh<R: Rng + ?Sized>(
    params: &GenerationParams,
    canvas: Canvas,
    rng: &mut R,
) -> NetworkGraph {
    let nodes = (0..params.node_count)
        .map(|index| make_node(rng, params, canvas, index))
        .collect::<Vec<_>>();

    let radius_sq = params
        .connection_radius
        .map(|radius| radius.max(0.0) * radius.max(0.0));

    let mut links = Vec::new();
    for node in &nodes {
        let wanted = rng.gen_range(params.min_connections..=params.max_connections);
        if wanted == 0 {
            continue;
        }

        let candidates = nodes
            .iter()
            .filter(|other| other.id != node.id)
            .filter(|other| {
                radius_sq.is_none_or(|limit| {
                    (other.position - node.position).length_sq() <= limit
                })
            })
            .map(|other| other.id)
            .collect::<Vec<NodeId>>();

        for &target in candidates.choose_multiple(rng, wanted) {
            links.push(Link::new(node.id, target));
        }
    }

    let mut graph = NetworkGraph { nodes, links };
    graph.dedup_links();
    graph
}

fn generate_hub<R: Rng + ?Sized>(
    params: &GenerationParams,
    canvas: Canvas,
    rng: &mut R,
) -> NetworkGraph {
    let hub_id: NodeId = 0;
    let mut hub = Node::new(hub_id, canvas.center(), params.central_node_size);
    hub.is_central = true;
    hub.centering_force = Some(1.0);

    let mut nodes = vec![hub];
    let mut links = Vec::new();
    let (shortest, longest) = params.placement_band();

    for index in 0..params.node_count {
        let Some(mut node) = place_without_overlap(rng, params, canvas, index, &nodes) else {
            debug!(
                candidate = index,
                attempts = params.placement_attempts,
                "dropping node: no free spot"
            );
            continue;
        };

        node.id = nodes.len();
        let length = (node.position - canvas.center())
            .length()
            .clamp(shortest, longest);
        links.push(Link::new(hub_id, node.id).with_length(length));
        nodes.push(node);
    }

    let mut graph = NetworkGraph { nodes, links };
    graph.dedup_links();
    graph
}

fn place_without_overlap<R: Rng + ?Sized>(
    rng: &mut R,
    params: &GenerationParams,
    canvas: Canvas,
    index: usize,
    placed: &[Node],
) -> Option<Node> {
    (0..params.placement_attempts).find_map(|_| {
        let candidate = make_node(rng, params, canvas, index);
        let clear = placed.iter().all(|other| {
            let gap = candidate.radius + other.radius + params.placement_padding;
            (candidate.position - other.position).length_sq() >= gap * gap
        });
        clear.then_some(candidate)
    })
}

use std::fmt::Write as _;

use eframe::egui::Vec2;

use crate::network::{Link, Node};

/// Curve drawn for one link, in canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EdgePath {
    Quadratic {
        start: Vec2,
        control: Vec2,
        end: Vec2,
    },
    Cubic {
        start: Vec2,
        first: Vec2,
        second: Vec2,
        end: Vec2,
    },
}

impl EdgePath {
    /// Quadratic curve bowed away from `center`: the control point is the midpoint
    /// moved by `pull` times the midpoint-to-center vector (negative pulls outward).
    pub fn bowed(start: Vec2, end: Vec2, center: Vec2, pull: f32) -> Self {
        let mid = (start + end) * 0.5;
        Self::Quadratic {
            start,
            control: mid + (center - mid) * pull,
            end,
        }
    }

    /// Elbow route used for hub spokes: leave horizontally, cross at the
    /// midpoint column, arrive horizontally.
    pub fn elbow(start: Vec2, end: Vec2) -> Self {
        let mid_x = (start.x + end.x) * 0.5;
        Self::Cubic {
            start,
            first: Vec2::new(mid_x, start.y),
            second: Vec2::new(mid_x, end.y),
            end,
        }
    }

    /// SVG path data (`d` attribute).
    pub fn svg_data(&self) -> String {
        let mut data = String::new();
        match *self {
            Self::Quadratic {
                start,
                control,
                end,
            } => {
                let _ = write!(
                    data,
                    "M{},{} Q{},{} {},{}",
                    fmt_coord(start.x),
                    fmt_coord(start.y),
                    fmt_coord(control.x),
                    fmt_coord(control.y),
                    fmt_coord(end.x),
                    fmt_coord(end.y),
                );
            }
            Self::Cubic {
                start,
                first,
                second,
                end,
            } => {
                let _ = write!(
                    data,
                    "M{},{} C{},{} {},{} {},{}",
                    fmt_coord(start.x),
                    fmt_coord(start.y),
                    fmt_coord(first.x),
                    fmt_coord(first.y),
                    fmt_coord(second.x),
                    fmt_coord(second.y),
                    fmt_coord(end.x),
                    fmt_coord(end.y),
                );
            }
        }
        data
    }
}

/// Two decimals, trailing zeros trimmed.
pub(crate) fn fmt_coord(value: f32) -> String {
    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_owned()
    } else {
        text.to_owned()
    }
}

fn node_by_id(nodes: &[Node], id: usize) -> Option<&Node> {
    nodes
        .get(id)
        .filter(|node| node.id == id)
        .or_else(|| nodes.iter().find(|node| node.id == id))
}

/// Paths for every link whose endpoints exist. Links touching the central node
/// take the elbow route.
pub fn edge_paths(nodes: &[Node], links: &[Link], center: Vec2, pull: f32) -> Vec<EdgePath> {
    links
        .iter()
        .filter_map(|link| {
            let source = node_by_id(nodes, link.source)?;
            let target = node_by_id(nodes, link.target)?;
            Some(if source.is_central || target.is_central {
                EdgePath::elbow(source.position, target.position)
            } else {
                EdgePath::bowed(source.position, target.position, center, pull)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;

    #[test]
    fn bow_points_away_from_center() {
        let path = EdgePath::bowed(vec2(0.0, 0.0), vec2(100.0, 0.0), vec2(50.0, 100.0), -0.2);
        let EdgePath::Quadratic { control, .. } = path else {
            panic!("expected quadratic path");
        };
        assert_eq!(control, vec2(50.0, -20.0));
        assert_eq!(path.svg_data(), "M0,0 Q50,-20 100,0");
    }

    #[test]
    fn elbow_waypoints_share_mid_column() {
        let path = EdgePath::elbow(vec2(10.0, 10.0), vec2(50.0, 90.5));
        assert_eq!(path.svg_data(), "M10,10 C30,10 30,90.5 50,90.5");
    }

    #[test]
    fn coords_are_trimmed() {
        assert_eq!(fmt_coord(1.0), "1");
        assert_eq!(fmt_coord(1.256), "1.26");
        assert_eq!(fmt_coord(-0.001), "0");
        assert_eq!(fmt_coord(120.5), "120.5");
    }

    #[test]
    fn hub_links_use_elbow_route() {
        let mut hub = Node::new(0, vec2(50.0, 50.0), 20.0);
        hub.is_central = true;
        let nodes = vec![
            hub,
            Node::new(1, vec2(150.0, 50.0), 5.0),
            Node::new(2, vec2(150.0, 150.0), 5.0),
        ];
        let links = vec![Link::new(0, 1), Link::new(1, 2), Link::new(1, 9)];
        let paths = edge_paths(&nodes, &links, vec2(50.0, 50.0), -0.2);
        assert_eq!(paths.len(), 2);
        assert!(matches!(paths[0], EdgePath::Cubic { .. }));
        assert!(matches!(paths[1], EdgePath::Quadratic { .. }));
    }
}

//! Standalone SVG serialization of the current layout.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::layout::{LayoutSession, fmt_coord};

pub const EXPORT_FILE_NAME: &str = "network.svg";
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Colors and strokes shared by the live view and the exported document.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiagramStyle {
    pub background: [u8; 3],
    pub node_fill: [u8; 3],
    pub stroke: [u8; 3],
    pub stroke_width: f32,
    pub dashed: bool,
    pub dash: [f32; 2],
}

impl Default for DiagramStyle {
    fn default() -> Self {
        Self {
            background: [255, 255, 255],
            node_fill: [0xFF, 0xDE, 0x00],
            stroke: [0x16, 0x16, 0x16],
            stroke_width: 1.0,
            dashed: false,
            dash: [5.0, 5.0],
        }
    }
}

impl DiagramStyle {
    pub fn with_dashed(mut self, dashed: bool) -> Self {
        self.dashed = dashed;
        self
    }
}

pub fn hex(rgb: [u8; 3]) -> String {
    format!("#{:02X}{:02X}{:02X}", rgb[0], rgb[1], rgb[2])
}

pub fn render_svg(session: &LayoutSession, style: &DiagramStyle) -> String {
    let canvas = session.canvas();
    let width = fmt_coord(canvas.width);
    let height = fmt_coord(canvas.height);
    let stroke = hex(style.stroke);
    let stroke_width = fmt_coord(style.stroke_width);

    let mut body = String::new();
    let _ = writeln!(
        body,
        r#"  <rect width="100%" height="100%" fill="{}"/>"#,
        hex(style.background)
    );

    let dash = if style.dashed {
        format!(
            r#" stroke-dasharray="{},{}""#,
            fmt_coord(style.dash[0]),
            fmt_coord(style.dash[1])
        )
    } else {
        String::new()
    };
    body.push_str("  <g class=\"links\">\n");
    for path in session.edge_paths() {
        let _ = writeln!(
            body,
            r#"    <path d="{}" fill="none" stroke="{stroke}" stroke-width="{stroke_width}"{dash}/>"#,
            path.svg_data()
        );
    }
    body.push_str("  </g>\n");

    let fill = hex(style.node_fill);
    body.push_str("  <g class=\"nodes\">\n");
    for node in session.nodes() {
        let _ = writeln!(
            body,
            r#"    <circle cx="{}" cy="{}" r="{}" fill="{fill}" stroke="{stroke}" stroke-width="{stroke_width}"/>"#,
            fmt_coord(node.position.x),
            fmt_coord(node.position.y),
            fmt_coord(node.radius),
        );
    }
    body.push_str("  </g>\n");

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="{SVG_NAMESPACE}" viewBox="0 0 {width} {height}" width="{width}" height="{height}">
{body}</svg>
"#
    )
}

pub fn export_svg(session: &LayoutSession, style: &DiagramStyle, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let document = render_svg(session, style);
    fs::write(path, document).with_context(|| format!("failed to write {}", path.display()))?;
    info!(
        path = %path.display(),
        nodes = session.nodes().len(),
        links = session.links().len(),
        "exported svg"
    );
    Ok(())
}

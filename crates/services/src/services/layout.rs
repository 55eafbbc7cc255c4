//! Tree layout for the mindmap view.
//!
//! Walks the built hierarchy once and assigns every node a canvas position:
//! depth maps to a horizontal column, leaves are spaced evenly down the
//! vertical axis, and interior nodes sit centered over their children. The
//! output is the flat node/link form a client needs to draw one marker per
//! node and one connector per edge.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::hierarchy::{MindmapNode, NodeId, NodeKind};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS)]
pub struct LayoutOptions {
    pub width: f64,
    pub height: f64,
    /// Horizontal inset on both edges so labels at the extremes stay on
    /// canvas.
    pub margin: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 600.0,
            margin: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct PlacedNode {
    pub id: NodeId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub depth: u32,
    pub x: f64,
    pub y: f64,
}

/// Parent→child edge, by index into `MindmapLayout::nodes`. Indices rather
/// than ids: a project and a task may share the same numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct LayoutLink {
    pub source: usize,
    pub target: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct MindmapLayout {
    pub nodes: Vec<PlacedNode>,
    pub links: Vec<LayoutLink>,
    pub width: f64,
    pub height: f64,
}

/// Lay out a tree. Deterministic: node order is a preorder walk of the
/// input, and positions depend only on the tree shape and options.
pub fn layout(root: &MindmapNode, options: LayoutOptions) -> MindmapLayout {
    let mut walk = Walk {
        nodes: Vec::new(),
        links: Vec::new(),
        rows: Vec::new(),
        next_leaf_row: 0.0,
        max_depth: 0,
    };
    walk.place(root, 0, None);

    let leaf_count = walk.next_leaf_row.max(1.0);
    let usable_width = (options.width - 2.0 * options.margin).max(0.0);
    let column_gap = if walk.max_depth == 0 {
        0.0
    } else {
        usable_width / walk.max_depth as f64
    };
    let row_gap = options.height / leaf_count;

    let nodes = walk
        .nodes
        .into_iter()
        .zip(walk.rows)
        .map(|(node, row)| PlacedNode {
            x: options.margin + node.depth as f64 * column_gap,
            y: (row + 0.5) * row_gap,
            ..node
        })
        .collect();

    MindmapLayout {
        nodes,
        links: walk.links,
        width: options.width,
        height: options.height,
    }
}

struct Walk {
    nodes: Vec<PlacedNode>,
    links: Vec<LayoutLink>,
    /// Unscaled row per node, parallel to `nodes`.
    rows: Vec<f64>,
    next_leaf_row: f64,
    max_depth: u32,
}

impl Walk {
    fn place(&mut self, node: &MindmapNode, depth: u32, parent: Option<usize>) -> f64 {
        self.max_depth = self.max_depth.max(depth);
        let index = self.nodes.len();
        self.nodes.push(PlacedNode {
            id: node.id.clone(),
            name: node.name.clone(),
            kind: node.kind,
            depth,
            x: 0.0,
            y: 0.0,
        });
        self.rows.push(0.0);
        if let Some(parent) = parent {
            self.links.push(LayoutLink {
                source: parent,
                target: index,
            });
        }

        let row = match node.children.as_deref() {
            None | Some([]) => {
                let row = self.next_leaf_row;
                self.next_leaf_row += 1.0;
                row
            }
            Some(children) => {
                let first = self.place(&children[0], depth + 1, Some(index));
                let mut last = first;
                for child in &children[1..] {
                    last = self.place(child, depth + 1, Some(index));
                }
                (first + last) / 2.0
            }
        };
        self.rows[index] = row;
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: i64, name: &str, kind: NodeKind) -> MindmapNode {
        MindmapNode {
            id: NodeId::Record(id),
            name: name.to_string(),
            kind,
            project_id: None,
            children: None,
        }
    }

    fn tree() -> MindmapNode {
        MindmapNode {
            id: NodeId::Synthetic("root".to_string()),
            name: "全クライアント".to_string(),
            kind: NodeKind::Client,
            project_id: None,
            children: Some(vec![
                MindmapNode {
                    id: NodeId::Record(10),
                    name: "Website".to_string(),
                    kind: NodeKind::Project,
                    project_id: None,
                    children: Some(vec![
                        leaf(100, "Design", NodeKind::Task),
                        leaf(101, "Launch", NodeKind::Task),
                    ]),
                },
                MindmapNode {
                    id: NodeId::Record(11),
                    name: "App".to_string(),
                    kind: NodeKind::Project,
                    project_id: None,
                    children: None,
                },
            ]),
        }
    }

    #[test]
    fn every_node_is_placed_with_one_link_per_edge() {
        let laid = layout(&tree(), LayoutOptions::default());
        assert_eq!(laid.nodes.len(), 5);
        assert_eq!(laid.links.len(), 4);
        for link in &laid.links {
            assert!(link.source < laid.nodes.len());
            assert!(link.target < laid.nodes.len());
            // Edges always point one column to the right.
            assert_eq!(
                laid.nodes[link.source].depth + 1,
                laid.nodes[link.target].depth
            );
        }
    }

    #[test]
    fn depth_maps_to_columns_left_to_right() {
        let options = LayoutOptions {
            width: 900.0,
            height: 300.0,
            margin: 50.0,
        };
        let laid = layout(&tree(), options);
        let root = &laid.nodes[0];
        assert_eq!(root.depth, 0);
        assert_eq!(root.x, 50.0);

        let max_x = laid.nodes.iter().map(|n| n.x).fold(f64::MIN, f64::max);
        assert_eq!(max_x, 850.0);
    }

    #[test]
    fn leaves_are_spaced_evenly_and_parents_centered() {
        let laid = layout(&tree(), LayoutOptions {
            width: 900.0,
            height: 300.0,
            margin: 50.0,
        });
        // Three leaves: Design, Launch, App.
        let leaf_ys: Vec<f64> = laid
            .nodes
            .iter()
            .filter(|n| n.name == "Design" || n.name == "Launch" || n.name == "App")
            .map(|n| n.y)
            .collect();
        assert_eq!(leaf_ys, vec![50.0, 150.0, 250.0]);

        let website = laid.nodes.iter().find(|n| n.name == "Website").unwrap();
        assert_eq!(website.y, 100.0);
    }

    #[test]
    fn single_node_tree_sits_mid_canvas() {
        let root = leaf(1, "Solo", NodeKind::Client);
        let laid = layout(&root, LayoutOptions {
            width: 800.0,
            height: 400.0,
            margin: 50.0,
        });
        assert_eq!(laid.nodes.len(), 1);
        assert!(laid.links.is_empty());
        assert_eq!(laid.nodes[0].x, 50.0);
        assert_eq!(laid.nodes[0].y, 200.0);
    }

    #[test]
    fn layout_is_deterministic() {
        let a = layout(&tree(), LayoutOptions::default());
        let b = layout(&tree(), LayoutOptions::default());
        assert_eq!(a, b);
    }
}

// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Open Consciousness Testbed ("The Twin Engine") - Network Graph

use serde::Serialize;
use std::collections::HashSet;

use crate::error::ConfigError;
use crate::random::RandomSource;
use crate::types::{Bounds, Edge, Node, MAX_EDGE_WEIGHT, MIN_EDGE_WEIGHT};

/// Independent probability of an edge between any unordered node pair.
pub const EDGE_PROBABILITY: f64 = 0.15;
/// Upper bound of the initial node activation.
const INITIAL_ACTIVATION: f64 = 0.1;

/// Meso-scale connectivity of one system: nodes drifting inside `bounds`,
/// joined by weighted undirected edges.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NetworkGraph {
    pub(crate) nodes: Vec<Node>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) bounds: Bounds,
}

impl NetworkGraph {
    /// Random graph: nodes scattered uniformly over `bounds`, each pair
    /// connected with probability [`EDGE_PROBABILITY`].
    pub fn random(node_count: u32, bounds: Bounds, rng: &mut dyn RandomSource) -> Self {
        let nodes: Vec<Node> = (0..node_count)
            .map(|id| {
                let x = rng.uniform() * bounds.width;
                let y = rng.uniform() * bounds.height;
                let activation = rng.uniform() * INITIAL_ACTIVATION;
                Node::at(id, x, y, activation)
            })
            .collect();

        let mut edges = Vec::new();
        for i in 0..node_count {
            for j in (i + 1)..node_count {
                if rng.uniform() < EDGE_PROBABILITY {
                    let weight = rng.uniform().clamp(MIN_EDGE_WEIGHT, MAX_EDGE_WEIGHT);
                    edges.push(Edge { source: i, target: j, weight });
                }
            }
        }

        Self { nodes, edges, bounds }
    }

    /// Graph from explicit parts. Node ids must equal their position, edges
    /// must join two distinct existing nodes, and each unordered pair may
    /// appear once.
    pub fn from_parts(
        nodes: Vec<Node>,
        edges: Vec<Edge>,
        bounds: Bounds,
    ) -> Result<Self, ConfigError> {
        bounds.validate()?;
        for (position, node) in nodes.iter().enumerate() {
            if node.id as usize != position {
                return Err(ConfigError::NodeIdMismatch { position, id: node.id });
            }
            if !(0.0..=1.0).contains(&node.activation) {
                return Err(ConfigError::OutOfRange {
                    field: "activation",
                    range: "[0, 1]",
                    value: node.activation,
                });
            }
        }

        let mut seen = HashSet::new();
        for edge in &edges {
            let n = nodes.len() as u32;
            if edge.source >= n || edge.target >= n {
                return Err(ConfigError::DanglingEdge {
                    source_id: edge.source,
                    target: edge.target,
                });
            }
            if edge.source == edge.target {
                return Err(ConfigError::SelfLoop(edge.source));
            }
            if !(MIN_EDGE_WEIGHT..=MAX_EDGE_WEIGHT).contains(&edge.weight) {
                return Err(ConfigError::OutOfRange {
                    field: "weight",
                    range: "[0.01, 1]",
                    value: edge.weight,
                });
            }
            let pair = (edge.source.min(edge.target), edge.source.max(edge.target));
            if !seen.insert(pair) {
                return Err(ConfigError::DuplicateEdge(pair.0, pair.1));
            }
        }

        Ok(Self { nodes, edges, bounds })
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Activation of every node, in node order. The returned vector does not
    /// alias the graph.
    pub fn activations(&self) -> Vec<f64> {
        self.nodes.iter().map(|n| n.activation).collect()
    }

    /// Move to new bounds, rescaling every node position proportionally.
    pub fn resize(&mut self, bounds: Bounds) -> Result<(), ConfigError> {
        bounds.validate()?;
        let sx = bounds.width / self.bounds.width;
        let sy = bounds.height / self.bounds.height;
        for node in &mut self.nodes {
            node.x = (node.x * sx).clamp(0.0, bounds.width);
            node.y = (node.y * sy).clamp(0.0, bounds.height);
        }
        self.bounds = bounds;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededSource;

    fn pair(source: u32, target: u32) -> Edge {
        Edge { source, target, weight: 0.5 }
    }

    fn line(count: u32) -> Vec<Node> {
        (0..count).map(|i| Node::at(i, i as f64, 0.0, 0.0)).collect()
    }

    #[test]
    fn test_random_graph_respects_invariants() {
        let mut rng = SeededSource::new(11);
        let graph = NetworkGraph::random(35, Bounds::default(), &mut rng);
        assert_eq!(graph.nodes().len(), 35);
        for (i, node) in graph.nodes().iter().enumerate() {
            assert_eq!(node.id as usize, i);
            assert!((0.0..=600.0).contains(&node.x));
            assert!((0.0..=400.0).contains(&node.y));
            assert!((0.0..INITIAL_ACTIVATION).contains(&node.activation));
            assert_eq!((node.vx, node.vy), (0.0, 0.0));
        }
        // Round-trip through the validating constructor
        let rebuilt = NetworkGraph::from_parts(
            graph.nodes().to_vec(),
            graph.edges().to_vec(),
            graph.bounds(),
        );
        assert!(rebuilt.is_ok());
    }

    #[test]
    fn test_random_graph_edge_density() {
        let mut rng = SeededSource::new(3);
        let graph = NetworkGraph::random(200, Bounds::default(), &mut rng);
        let pairs = 200.0 * 199.0 / 2.0;
        let density = graph.edges().len() as f64 / pairs;
        assert!((density - EDGE_PROBABILITY).abs() < 0.02, "density {}", density);
        assert!(graph.edges().iter().all(|e| e.source < e.target));
    }

    #[test]
    fn test_empty_graph() {
        let mut rng = SeededSource::new(0);
        let graph = NetworkGraph::random(0, Bounds::default(), &mut rng);
        assert!(graph.nodes().is_empty());
        assert!(graph.edges().is_empty());
        assert!(graph.activations().is_empty());
    }

    #[test]
    fn test_from_parts_rejects_dangling_edge() {
        let err = NetworkGraph::from_parts(line(2), vec![pair(0, 2)], Bounds::default());
        assert_eq!(err, Err(ConfigError::DanglingEdge { source_id: 0, target: 2 }));
    }

    #[test]
    fn test_from_parts_rejects_self_loop_and_duplicates() {
        let err = NetworkGraph::from_parts(line(3), vec![pair(1, 1)], Bounds::default());
        assert_eq!(err, Err(ConfigError::SelfLoop(1)));

        let err = NetworkGraph::from_parts(line(3), vec![pair(0, 1), pair(1, 0)], Bounds::default());
        assert_eq!(err, Err(ConfigError::DuplicateEdge(0, 1)));
    }

    #[test]
    fn test_from_parts_rejects_bad_weight_and_ids() {
        let edges = vec![Edge { source: 0, target: 1, weight: 0.0 }];
        assert!(NetworkGraph::from_parts(line(2), edges, Bounds::default()).is_err());

        let nodes = vec![Node::at(5, 0.0, 0.0, 0.0)];
        assert_eq!(
            NetworkGraph::from_parts(nodes, vec![], Bounds::default()),
            Err(ConfigError::NodeIdMismatch { position: 0, id: 5 })
        );
    }

    #[test]
    fn test_activations_copy_is_independent() {
        let mut graph = NetworkGraph::from_parts(line(3), vec![], Bounds::default()).unwrap();
        let mut copy = graph.activations();
        copy[0] = 1.0;
        assert_eq!(graph.nodes()[0].activation, 0.0);
        graph.nodes[1].activation = 0.5;
        assert_eq!(copy[1], 0.0);
    }

    #[test]
    fn test_resize_rescales_positions() {
        let nodes = vec![Node::at(0, 300.0, 200.0, 0.0), Node::at(1, 600.0, 0.0, 0.0)];
        let mut graph = NetworkGraph::from_parts(nodes, vec![], Bounds::default()).unwrap();
        graph.resize(Bounds { width: 1200.0, height: 200.0 }).unwrap();
        assert_eq!((graph.nodes()[0].x, graph.nodes()[0].y), (600.0, 100.0));
        assert_eq!((graph.nodes()[1].x, graph.nodes()[1].y), (1200.0, 0.0));
        assert_eq!(graph.bounds().width, 1200.0);
    }

    #[test]
    fn test_resize_rejects_degenerate_bounds() {
        let mut graph = NetworkGraph::from_parts(line(1), vec![], Bounds::default()).unwrap();
        assert!(graph.resize(Bounds { width: 0.0, height: 10.0 }).is_err());
        assert_eq!(graph.bounds(), Bounds::default());
    }
}

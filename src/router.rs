//! Shortest-path routing over the walkable node graph

use std::{cmp::Ordering, collections::BinaryHeap};

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use log::{debug, warn};
use nalgebra::Point2;

use crate::error::Error;

/// A walkable location on the floor plan
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    /// Floor-plan coordinate
    pub position: Point2<f32>,
    /// Display label, already localised by the caller
    pub label: String,
}

impl Node {
    pub fn new(id: impl Into<String>, x: f32, y: f32, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            position: Point2::new(x, y),
            label: label.into(),
        }
    }
}

/// An undirected connection between two nodes
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub from: String,
    pub to: String,
    /// Traversal cost in floor-plan units, expected to be positive
    pub weight: f32,
    /// Whether the connection uses stairs
    pub stairs: bool,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>, weight: f32, stairs: bool) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            weight,
            stairs,
        }
    }
}

/// Result of a successful route search
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Node ids from start to end, inclusive
    pub path: Vec<String>,
    /// Sum of traversed edge weights
    pub distance: f32,
}

/// Immutable node/edge table for one navigation session
#[derive(Debug, Clone)]
pub struct Graph {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
    edges: Vec<Edge>,
}

impl Graph {
    /// Build a graph, rejecting an empty node set and duplicate ids
    ///
    /// Edges are taken as given; ones that reference unknown nodes or carry
    /// a non-positive weight are skipped when a search builds its adjacency.
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self, Error> {
        if nodes.is_empty() {
            return Err(Error::EmptyGraph);
        }

        let mut index = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if index.insert(node.id.clone(), i).is_some() {
                return Err(Error::DuplicateNode(node.id.clone()));
            }
        }

        Ok(Self { nodes, index, edges })
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Find the minimum-weight route between two nodes
    ///
    /// Returns `None` when either id is unknown or the end is unreachable,
    /// including when avoiding stairs disconnects it.
    ///
    /// # Example
    /// ```
    /// use wayfind_fusion::{Edge, Graph, Node};
    ///
    /// let graph = Graph::new(
    ///     vec![Node::new("lobby", 0.0, 0.0, "Lobby"), Node::new("cafe", 40.0, 0.0, "Cafe")],
    ///     vec![Edge::new("lobby", "cafe", 40.0, false)],
    /// ).unwrap();
    ///
    /// let route = graph.shortest_path("lobby", "cafe", true).unwrap();
    /// assert_eq!(route.path, ["lobby", "cafe"]);
    /// assert_eq!(route.distance, 40.0);
    /// ```
    pub fn shortest_path(&self, start: &str, end: &str, avoid_stairs: bool) -> Option<Route> {
        dijkstra(self, start, end, avoid_stairs)
    }

    /// Adjacency lists by node index, built fresh for every search
    fn adjacency(&self, avoid_stairs: bool) -> Vec<Vec<(usize, f32)>> {
        let mut adjacency = vec![Vec::new(); self.nodes.len()];

        for edge in &self.edges {
            if avoid_stairs && edge.stairs {
                continue;
            }

            let (Some(&a), Some(&b)) = (self.index.get(&edge.from), self.index.get(&edge.to)) else {
                warn!("Skipping edge {} - {}: unknown endpoint", edge.from, edge.to);
                continue;
            };

            if !(edge.weight > 0.0 && edge.weight.is_finite()) {
                warn!("Skipping edge {} - {}: invalid weight {}", edge.from, edge.to, edge.weight);
                continue;
            }

            adjacency[a].push((b, edge.weight));
            adjacency[b].push((a, edge.weight));
        }

        adjacency
    }
}

#[derive(Copy, Clone, PartialEq)]
struct State {
    cost: f32,
    node: usize,
}

impl Eq for State {}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Cheapest state pops first
        other.cost.total_cmp(&self.cost)
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dijkstra's algorithm between two nodes of `graph`
///
/// Stairs edges are removed from the adjacency before the search when
/// `avoid_stairs` is set. Ties between equal-cost routes are broken by
/// heap order and must not be relied upon.
pub fn dijkstra(graph: &Graph, start: &str, end: &str, avoid_stairs: bool) -> Option<Route> {
    let Some(&source) = graph.index.get(start) else {
        debug!("Route search from unknown node {start}");
        return None;
    };
    let Some(&target) = graph.index.get(end) else {
        debug!("Route search to unknown node {end}");
        return None;
    };

    if source == target {
        return Some(Route {
            path: vec![start.to_string()],
            distance: 0.0,
        });
    }

    let adjacency = graph.adjacency(avoid_stairs);
    let mut distances: HashMap<usize, f32> = HashMap::new();
    let mut previous: HashMap<usize, usize> = HashMap::new();
    let mut heap = BinaryHeap::new();

    heap.push(State {
        cost: 0.0,
        node: source,
    });
    distances.insert(source, 0.0);

    while let Some(State { cost, node }) = heap.pop() {
        if node == target {
            break;
        }

        // Stale heap entry
        if let Some(&best) = distances.get(&node) {
            if cost > best {
                continue;
            }
        }

        for &(next, weight) in &adjacency[node] {
            let next_cost = cost + weight;

            match distances.entry(next) {
                Entry::Vacant(entry) => {
                    entry.insert(next_cost);
                    previous.insert(next, node);
                    heap.push(State {
                        cost: next_cost,
                        node: next,
                    });
                }
                Entry::Occupied(mut entry) => {
                    if next_cost < *entry.get() {
                        *entry.get_mut() = next_cost;
                        previous.insert(next, node);
                        heap.push(State {
                            cost: next_cost,
                            node: next,
                        });
                    }
                }
            }
        }
    }

    let Some(&distance) = distances.get(&target) else {
        debug!("No route from {start} to {end} (avoid_stairs = {avoid_stairs})");
        return None;
    };

    let mut path = vec![target];
    let mut current = target;
    while let Some(&prev) = previous.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();

    debug!("Route {start} -> {end}: {} nodes, distance {distance}", path.len());

    Some(Route {
        path: path.into_iter().map(|i| graph.nodes[i].id.clone()).collect(),
        distance,
    })
}

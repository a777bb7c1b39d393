use serde::Deserialize;
use std::error::Error;
use wayfind_fusion::{Edge, Graph, Node, dijkstra};

#[derive(Debug, Deserialize)]
struct NodeRecord {
    id: String,
    x: f32,
    y: f32,
    label: String,
}

#[derive(Debug, Deserialize)]
struct EdgeRecord {
    from: String,
    to: String,
    weight: f32,
    stairs: bool,
}

const EPSILON: f32 = 1e-4;

fn load_campus() -> Result<Graph, Box<dyn Error>> {
    let mut nodes = Vec::new();
    for record in csv::Reader::from_path("testdata/campus_nodes.csv")?.deserialize() {
        let r: NodeRecord = record?;
        nodes.push(Node::new(r.id, r.x, r.y, r.label));
    }

    let mut edges = Vec::new();
    for record in csv::Reader::from_path("testdata/campus_edges.csv")?.deserialize() {
        let r: EdgeRecord = record?;
        edges.push(Edge::new(r.from, r.to, r.weight, r.stairs));
    }

    Ok(Graph::new(nodes, edges)?)
}

/// Graph from the routing examples: the short way uses stairs B-E
fn six_node_graph() -> Graph {
    let nodes = vec![
        Node::new("A", 0.0, 0.0, "A"),
        Node::new("B", 5.0, 0.0, "B"),
        Node::new("C", 8.0, 0.0, "C"),
        Node::new("D", 0.0, 3.0, "D"),
        Node::new("E", 5.0, 3.0, "E"),
        Node::new("F", 8.0, 3.0, "F"),
    ];
    let edges = vec![
        Edge::new("A", "B", 5.0, false),
        Edge::new("B", "C", 3.0, false),
        Edge::new("A", "D", 2.0, false),
        Edge::new("B", "E", 1.0, true),
        Edge::new("C", "F", 4.0, false),
        Edge::new("D", "E", 6.0, false),
        Edge::new("E", "F", 2.0, false),
    ];
    Graph::new(nodes, edges).unwrap()
}

/// Distance must equal the sum of the traversed edge weights
fn path_weight(graph: &Graph, path: &[String]) -> f32 {
    path.windows(2)
        .map(|pair| {
            graph
                .edges()
                .iter()
                .filter(|e| (e.from == pair[0] && e.to == pair[1]) || (e.from == pair[1] && e.to == pair[0]))
                .map(|e| e.weight)
                .fold(f32::INFINITY, f32::min)
        })
        .sum()
}

fn uses_stairs(graph: &Graph, path: &[String]) -> bool {
    path.windows(2).any(|pair| {
        graph.edges().iter().any(|e| {
            e.stairs && ((e.from == pair[0] && e.to == pair[1]) || (e.from == pair[1] && e.to == pair[0]))
        })
    })
}

#[test]
fn test_six_node_reference_routes() {
    let graph = six_node_graph();

    let route = dijkstra(&graph, "A", "F", false).unwrap();
    assert_eq!(route.path, ["A", "B", "E", "F"]);
    assert!((route.distance - 8.0).abs() < EPSILON);

    let route = dijkstra(&graph, "A", "F", true).unwrap();
    assert_eq!(route.path, ["A", "D", "E", "F"]);
    assert!((route.distance - 10.0).abs() < EPSILON);
}

#[test]
fn test_trivial_route_for_every_node() {
    let graph = six_node_graph();
    for node in graph.nodes() {
        for avoid_stairs in [false, true] {
            let route = graph.shortest_path(&node.id, &node.id, avoid_stairs).unwrap();
            assert_eq!(route.path, [node.id.clone()]);
            assert_eq!(route.distance, 0.0);
        }
    }
}

#[test]
fn test_campus_routes() -> Result<(), Box<dyn Error>> {
    let graph = load_campus()?;

    let route = graph.shortest_path("entrance", "library", false).unwrap();
    assert_eq!(route.path, ["entrance", "lobby", "steps", "library"]);
    assert!((route.distance - 280.0).abs() < EPSILON);

    let route = graph.shortest_path("entrance", "library", true).unwrap();
    assert_eq!(route.path, ["entrance", "lobby", "lift", "cafe", "library"]);
    assert!((route.distance - 290.0).abs() < EPSILON);

    let route = graph.shortest_path("lab", "entrance", true).unwrap();
    assert_eq!(route.path, ["lab", "atrium", "lobby", "entrance"]);

    Ok(())
}

#[test]
fn test_campus_stairs_only_destination() -> Result<(), Box<dyn Error>> {
    let graph = load_campus()?;

    assert!(graph.shortest_path("entrance", "terrace", false).is_some());
    assert!(graph.shortest_path("entrance", "terrace", true).is_none());

    Ok(())
}

#[test]
fn test_every_pair_distance_and_accessibility() -> Result<(), Box<dyn Error>> {
    let graph = load_campus()?;

    for start in graph.nodes() {
        for end in graph.nodes() {
            if let Some(route) = graph.shortest_path(&start.id, &end.id, false) {
                assert!((route.distance - path_weight(&graph, &route.path)).abs() < EPSILON);
                assert_eq!(route.path.first(), Some(&start.id));
                assert_eq!(route.path.last(), Some(&end.id));
            }

            if let Some(accessible) = graph.shortest_path(&start.id, &end.id, true) {
                assert!(!uses_stairs(&graph, &accessible.path));
                assert!((accessible.distance - path_weight(&graph, &accessible.path)).abs() < EPSILON);

                // Filtering edges can only make routes longer
                let unrestricted = graph.shortest_path(&start.id, &end.id, false).unwrap();
                assert!(unrestricted.distance <= accessible.distance + EPSILON);
            }
        }
    }

    Ok(())
}

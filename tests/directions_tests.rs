use wayfind_fusion::{Direction, Edge, Graph, Language, Node, TURN_THRESHOLD_DEGREES, compile_directions};

const EPSILON: f32 = 1e-4;
const SCALE: f32 = 10.0; // floor-plan units per metre

fn directions(steps: &[wayfind_fusion::RouteStep]) -> Vec<Direction> {
    steps.iter().map(|s| s.direction).collect()
}

/// Three nodes with the middle turn at `angle` degrees (positive = left)
fn bend(angle: f32) -> Graph {
    let rad = angle.to_radians();
    Graph::new(
        vec![
            Node::new("a", 0.0, 0.0, "A"),
            Node::new("b", 100.0, 0.0, "B"),
            // y is flipped so positive angles turn up the plan
            Node::new("c", 100.0 + 50.0 * rad.cos(), -50.0 * rad.sin(), "C"),
        ],
        vec![],
    )
    .unwrap()
}

#[test]
fn test_sub_threshold_turn_emits_no_step() {
    for angle in [0.0, 10.0, -25.0, TURN_THRESHOLD_DEGREES - 1.0] {
        let route = compile_directions(&["a", "b", "c"], &bend(angle), Language::English, SCALE).unwrap();
        assert_eq!(
            directions(&route.steps),
            [Direction::Start, Direction::Straight, Direction::Arrive],
            "angle {angle}"
        );
    }
}

#[test]
fn test_turn_sign_convention() {
    for (angle, expected) in [(45.0, Direction::Left), (-45.0, Direction::Right), (120.0, Direction::Left), (-90.0, Direction::Right)] {
        let route = compile_directions(&["a", "b", "c"], &bend(angle), Language::English, SCALE).unwrap();
        let turns: Vec<_> = route
            .steps
            .iter()
            .filter(|s| matches!(s.direction, Direction::Left | Direction::Right))
            .map(|s| s.direction)
            .collect();
        assert_eq!(turns, [expected], "angle {angle}");
        assert!((route.steps[2].distance - 5.0).abs() < EPSILON);
    }
}

#[test]
fn test_straight_path_has_three_steps() {
    let graph = Graph::new(
        vec![
            Node::new("west", 0.0, 0.0, "West wing"),
            Node::new("mid1", 70.0, 0.0, "Corridor"),
            Node::new("mid2", 150.0, 5.0, "Corridor"),
            Node::new("east", 250.0, 0.0, "East wing"),
        ],
        vec![],
    )
    .unwrap();

    let route = compile_directions(&["west", "mid1", "mid2", "east"], &graph, Language::English, SCALE).unwrap();
    assert_eq!(route.steps.len(), 3);
    assert_eq!(directions(&route.steps), [Direction::Start, Direction::Straight, Direction::Arrive]);
    assert!((route.steps[1].distance - route.total_distance()).abs() < EPSILON);
    assert_eq!(route.steps[0].text, "Start at West wing");
    assert_eq!(route.steps[2].text, "You have arrived at East wing");
}

#[test]
fn test_route_geometry_matches_path() {
    let graph = bend(90.0);
    let route = compile_directions(&["a", "b", "c"], &graph, Language::English, SCALE).unwrap();

    assert_eq!(route.points.len(), 3);
    assert_eq!(route.segment_distances.len(), 2);
    assert!((route.segment_distances[0] - 10.0).abs() < EPSILON);
    assert!((route.segment_distances[1] - 5.0).abs() < EPSILON);
}

#[test]
fn test_routed_campus_walk() {
    let graph = Graph::new(
        vec![
            Node::new("entrance", 0.0, 0.0, "Main entrance"),
            Node::new("lobby", 100.0, 0.0, "Lobby"),
            Node::new("atrium", 100.0, 60.0, "Atrium"),
            Node::new("lab", 220.0, 60.0, "Lab"),
        ],
        vec![
            Edge::new("entrance", "lobby", 100.0, false),
            Edge::new("lobby", "atrium", 60.0, false),
            Edge::new("atrium", "lab", 120.0, false),
        ],
    )
    .unwrap();

    let route = graph.shortest_path("entrance", "lab", true).unwrap();
    let compiled = compile_directions(&route.path, &graph, Language::English, SCALE).unwrap();

    assert_eq!(
        directions(&compiled.steps),
        [Direction::Start, Direction::Straight, Direction::Right, Direction::Left, Direction::Arrive]
    );
    let distances: Vec<f32> = compiled.steps.iter().map(|s| s.distance).collect();
    for (actual, expected) in distances.iter().zip([0.0, 10.0, 6.0, 12.0, 0.0]) {
        assert!((actual - expected).abs() < EPSILON);
    }
    assert!((compiled.total_distance() - route.distance / SCALE).abs() < EPSILON);
}

//! Full wayfinding walkthrough
//!
//! Loads the campus graph from CSV, routes from the entrance to the library
//! without stairs, prints the instructions, then follows the route with
//! synthetic steps, a visual-positioning fix and a manual recalibration.
//!
//! Run with: `cargo run --example walkthrough`

use nalgebra::Point2;
use serde::Deserialize;
use std::error::Error;
use std::sync::{Arc, Mutex};
use wayfind_fusion::{
    Edge, ExternalFix, Graph, HeadingSample, Language, Node, PositionEngine, SimulatedWalk, compile_directions,
};

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

const SAMPLE_RATE: f32 = 50.0; // 50 Hz
const SCALE: f32 = 10.0; // floor-plan units per metre

fn main() -> Result<(), Box<dyn Error>> {
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
    let graph = Graph::new(nodes, edges)?;

    let Some(route) = graph.shortest_path("entrance", "library", true) else {
        println!("No accessible route found");
        return Ok(());
    };
    println!("Route: {} ({:.0} units)", route.path.join(" -> "), route.distance);

    let directions = compile_directions(&route.path, &graph, Language::English, SCALE)?;
    for step in &directions.steps {
        println!("  {:?}: {}", step.direction, step.text);
    }

    let mut engine = PositionEngine::new();
    engine.set_route(directions.points.clone(), directions.segment_distances.clone());

    let events = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&events);
    engine.on_segment_change(move |segment| log.lock().unwrap().push(format!("entered segment {segment}")));
    let log = Arc::clone(&events);
    engine.on_off_route(move |state| {
        log.lock()
            .unwrap()
            .push(format!("off route after {:.1} m", state.distance_walked))
    });

    // Walk twelve steps facing roughly east
    let walk = SimulatedWalk::new(1.8, SAMPLE_RATE);
    let mut t = 0.0;
    for sample in walk.samples(t, 12) {
        t = sample.timestamp;
        engine.process_motion(&sample);
        engine.process_heading(&HeadingSample::new(88.0, t));
    }
    report("after 12 steps", &engine);

    // Visual positioning places us near the lift lobby
    if let Some(projection) = engine.apply_external_fix(&ExternalFix::new(Point2::new(158.0, 4.0), 1.5, t)) {
        println!("Fix projected {:.1} units onto segment {}", projection.offset, projection.segment);
    }
    report("after fix", &engine);

    // Keep walking well past the destination
    for sample in walk.samples(t + 0.1, 30) {
        engine.process_motion(&sample);
    }
    report("after 30 more steps", &engine);

    // The user taps "I'm at the cafe"
    engine.recalibrate_to_node(3)?;
    report("after recalibration", &engine);

    for event in events.lock().unwrap().iter() {
        println!("event: {event}");
    }

    Ok(())
}

fn report(label: &str, engine: &PositionEngine) {
    let state = engine.state();
    println!(
        "{label}: {:.1} m, segment {}, ({:.0}, {:.0}), heading {:?}, confidence {:.2}, {:?}{}",
        state.distance_walked,
        state.segment,
        state.position.x,
        state.position.y,
        state.heading.map(|h| h.round()),
        state.confidence,
        state.source,
        if state.off_route { ", OFF ROUTE" } else { "" }
    );
}

use nalgebra::Point2;
use wayfind_fusion::{PositionEngine, SimulatedWalk};

const SAMPLE_RATE: f32 = 50.0; // 50 Hz accelerometer

fn main() {
    let mut engine = PositionEngine::new();

    // replace with the points and segment distances from compile_directions
    engine.set_route(
        vec![Point2::new(0.0, 0.0), Point2::new(120.0, 0.0), Point2::new(120.0, -60.0)],
        vec![12.0, 6.0],
    );

    // this loop should run each time a new accelerometer sample is available
    for sample in SimulatedWalk::new(2.0, SAMPLE_RATE).samples(0.0, 20) {
        engine.process_motion(&sample);
    }

    let state = engine.state();
    println!(
        "Walked {:.1} m in {} steps, segment {}, position ({:.0}, {:.0}), confidence {:.2}",
        state.distance_walked, state.step_count, state.segment, state.position.x, state.position.y, state.confidence
    );
}

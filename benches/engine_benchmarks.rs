use criterion::{Criterion, black_box, criterion_group, criterion_main};
use nalgebra::{Point2, Vector3};
use rand::prelude::*;
use rand_pcg::Pcg64;
use wayfind_fusion::{
    Edge, ExternalFix, Graph, HeadingSample, MotionSample, Node, PositionEngine, SimulatedWalk,
};

const SAMPLE_RATE: f32 = 50.0;

// Pre-generated sensor data to eliminate RNG overhead during benchmarks
struct PreGeneratedWalk {
    samples: Vec<MotionSample>,
    index: usize,
}

impl PreGeneratedWalk {
    fn new(steps: usize, seed: u64) -> Self {
        let mut rng = Pcg64::seed_from_u64(seed);
        let samples = SimulatedWalk::new(1.9, SAMPLE_RATE)
            .samples(0.0, steps)
            .map(|s| {
                let noise = Vector3::<f32>::new(
                    rng.random_range(-0.3..0.3),
                    rng.random_range(-0.3..0.3),
                    rng.random_range(-0.3..0.3),
                );
                MotionSample::new(s.acceleration + noise, s.timestamp)
            })
            .collect();

        Self { samples, index: 0 }
    }

    fn next(&mut self) -> MotionSample {
        let sample = self.samples[self.index];
        self.index = (self.index + 1) % self.samples.len();
        sample
    }
}

/// Square grid of corridors with every fifth vertical link on stairs
fn grid_graph(size: usize) -> Graph {
    let id = |x: usize, y: usize| format!("n{x}_{y}");
    let mut nodes = Vec::with_capacity(size * size);
    let mut edges = Vec::new();

    for y in 0..size {
        for x in 0..size {
            nodes.push(Node::new(id(x, y), x as f32 * 50.0, y as f32 * 50.0, id(x, y)));
            if x + 1 < size {
                edges.push(Edge::new(id(x, y), id(x + 1, y), 50.0, false));
            }
            if y + 1 < size {
                edges.push(Edge::new(id(x, y), id(x, y + 1), 50.0, (x + y) % 5 == 0));
            }
        }
    }

    Graph::new(nodes, edges).unwrap()
}

fn corridor_engine() -> PositionEngine {
    let points: Vec<Point2<f32>> = (0..20).map(|i| Point2::new(i as f32 * 100.0, (i % 2) as f32 * 40.0)).collect();
    let distances = points.windows(2).map(|p| nalgebra::distance(&p[0], &p[1]) / 10.0).collect();

    let mut engine = PositionEngine::new();
    engine.set_route(points, distances);
    engine
}

fn bench_routing(c: &mut Criterion) {
    let graph = grid_graph(15);

    c.bench_function("dijkstra_15x15", |b| {
        b.iter(|| black_box(graph.shortest_path(black_box("n0_0"), black_box("n14_14"), false)))
    });

    c.bench_function("dijkstra_15x15_avoid_stairs", |b| {
        b.iter(|| black_box(graph.shortest_path(black_box("n0_0"), black_box("n14_14"), true)))
    });
}

fn bench_engine(c: &mut Criterion) {
    let mut data = PreGeneratedWalk::new(2000, 42);
    let mut engine = corridor_engine();

    c.bench_function("process_motion", |b| {
        b.iter(|| {
            let sample = data.next();
            if sample.timestamp == 0.0 {
                engine.reset();
            }
            engine.process_motion(black_box(&sample));
        })
    });

    let mut engine = corridor_engine();
    let mut rng = Pcg64::seed_from_u64(7);
    let mut t = 0.0f32;
    c.bench_function("process_heading", |b| {
        b.iter(|| {
            t += 0.02;
            let heading = rng.random_range(0.0..360.0);
            engine.process_heading(black_box(&HeadingSample::new(heading, t)));
        })
    });

    let mut engine = corridor_engine();
    c.bench_function("apply_external_fix", |b| {
        b.iter(|| {
            let fix = ExternalFix::new(Point2::new(950.0, 25.0), 2.0, 0.0);
            black_box(engine.apply_external_fix(black_box(&fix)))
        })
    });

    c.bench_function("simulated_walk_1000_samples", |b| {
        b.iter(|| {
            let mut engine = corridor_engine();
            for sample in SimulatedWalk::new(2.0, SAMPLE_RATE).samples(0.0, 40) {
                engine.process_motion(&sample);
            }
            black_box(engine.state().distance_walked)
        })
    });
}

criterion_group!(benches, bench_routing, bench_engine);
criterion_main!(benches);

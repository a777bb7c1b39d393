//! Turn-by-turn direction compiler
//!
//! Converts a node path into a short list of instructions. Segments whose
//! turn stays under [`TURN_THRESHOLD_DEGREES`] are merged into the
//! surrounding straight travel, so the list only grows at the start, at
//! real turns and at arrival.

use nalgebra::Point2;

use crate::error::Error;
use crate::math::Vector2Ext;
use crate::router::Graph;

/// Smallest absolute turn angle, in degrees, that produces an instruction
pub const TURN_THRESHOLD_DEGREES: f32 = 30.0;

/// Instruction kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Start,
    Straight,
    Left,
    Right,
    Arrive,
}

/// Display language for instruction text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    English,
    German,
}

/// One turn-by-turn instruction
#[derive(Debug, Clone, PartialEq)]
pub struct RouteStep {
    pub direction: Direction,
    /// Length in metres of the leg this instruction begins
    pub distance: f32,
    pub text: String,
}

/// Instructions plus the reference geometry the position engine follows
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompiledRoute {
    pub steps: Vec<RouteStep>,
    /// Node positions in path order
    pub points: Vec<Point2<f32>>,
    /// Real-world length of each segment in metres
    pub segment_distances: Vec<f32>,
}

impl CompiledRoute {
    /// Total route length in metres
    pub fn total_distance(&self) -> f32 {
        self.segment_distances.iter().sum()
    }
}

/// Compile a node path into instructions and route geometry
///
/// `scale` is the number of floor-plan units per metre. A path with fewer
/// than two nodes yields no instructions.
///
/// # Example
/// ```
/// use wayfind_fusion::{compile_directions, Direction, Edge, Graph, Language, Node};
///
/// let graph = Graph::new(
///     vec![
///         Node::new("entrance", 0.0, 0.0, "Entrance"),
///         Node::new("corner", 100.0, 0.0, "Corner"),
///         Node::new("lab", 100.0, -50.0, "Lab"),
///     ],
///     vec![],
/// ).unwrap();
///
/// let route = compile_directions(&["entrance", "corner", "lab"], &graph, Language::English, 10.0).unwrap();
/// let kinds: Vec<_> = route.steps.iter().map(|s| s.direction).collect();
/// assert_eq!(kinds, [Direction::Start, Direction::Straight, Direction::Left, Direction::Arrive]);
/// assert_eq!(route.segment_distances, [10.0, 5.0]);
/// ```
pub fn compile_directions<S: AsRef<str>>(
    path: &[S],
    graph: &Graph,
    language: Language,
    scale: f32,
) -> Result<CompiledRoute, Error> {
    if !(scale > 0.0 && scale.is_finite()) {
        return Err(Error::InvalidScale(scale));
    }

    let nodes = path
        .iter()
        .map(|id| {
            let id = id.as_ref();
            graph.node(id).ok_or_else(|| Error::UnknownNode(id.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let points: Vec<Point2<f32>> = nodes.iter().map(|n| n.position).collect();
    let segment_distances: Vec<f32> = points
        .windows(2)
        .map(|pair| nalgebra::distance(&pair[0], &pair[1]) / scale)
        .collect();

    if nodes.len() < 2 {
        return Ok(CompiledRoute {
            steps: Vec::new(),
            points,
            segment_distances,
        });
    }

    let phrases = Phrasebook::for_language(language);
    let first = nodes[0];
    let last = nodes[nodes.len() - 1];

    let mut steps = vec![RouteStep {
        direction: Direction::Start,
        distance: 0.0,
        text: phrases.start(&first.label),
    }];

    let mut leg_direction = Direction::Straight;
    let mut leg_distance = segment_distances[0];

    for i in 1..points.len() - 1 {
        let incoming = points[i] - points[i - 1];
        let outgoing = points[i + 1] - points[i];
        let angle = incoming.turn_angle_to(&outgoing);

        if angle.abs() > TURN_THRESHOLD_DEGREES {
            steps.push(phrases.leg(leg_direction, leg_distance));
            leg_direction = if angle > 0.0 { Direction::Left } else { Direction::Right };
            leg_distance = 0.0;
        }
        leg_distance += segment_distances[i];
    }

    steps.push(phrases.leg(leg_direction, leg_distance));
    steps.push(RouteStep {
        direction: Direction::Arrive,
        distance: 0.0,
        text: phrases.arrive(&last.label),
    });

    Ok(CompiledRoute {
        steps,
        points,
        segment_distances,
    })
}

/// Fixed instruction templates per language
struct Phrasebook {
    language: Language,
}

impl Phrasebook {
    fn for_language(language: Language) -> Self {
        Self { language }
    }

    fn start(&self, label: &str) -> String {
        match self.language {
            Language::English => format!("Start at {label}"),
            Language::German => format!("Starten Sie bei {label}"),
        }
    }

    fn arrive(&self, label: &str) -> String {
        match self.language {
            Language::English => format!("You have arrived at {label}"),
            Language::German => format!("Sie haben {label} erreicht"),
        }
    }

    fn leg(&self, direction: Direction, distance: f32) -> RouteStep {
        let metres = distance.round() as i64;
        let text = match (self.language, direction) {
            (Language::English, Direction::Left) => format!("Turn left and walk {metres} m"),
            (Language::English, Direction::Right) => format!("Turn right and walk {metres} m"),
            (Language::English, _) => format!("Go straight for {metres} m"),
            (Language::German, Direction::Left) => format!("Links abbiegen und {metres} m gehen"),
            (Language::German, Direction::Right) => format!("Rechts abbiegen und {metres} m gehen"),
            (Language::German, _) => format!("{metres} m geradeaus gehen"),
        };

        RouteStep {
            direction,
            distance,
            text,
        }
    }
}

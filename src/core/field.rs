//! Particle field behind the portfolio page
//!
//! A handful of slowly drifting nodes, proximity lines between nearby nodes,
//! and short-lived packets that travel from one node to another. The field is
//! rebuilt from scratch whenever the viewport changes size.

use super::geometry::{Point, Viewport};
use super::rng::RandomSource;
use super::surface::{DrawSurface, SurfaceError};
use crate::theme::colors;
use tracing::debug;

/// Upper bound on nodes regardless of viewport size
pub const MAX_NODES: usize = 30;
/// One node per this many square pixels of viewport
pub const AREA_PER_NODE: f64 = 25_000.0;

const NODE_RADIUS_MIN: f64 = 2.0;
const NODE_RADIUS_MAX: f64 = 4.0;
/// Per-axis velocity range is `[-NODE_SPEED, NODE_SPEED)` pixels per frame
const NODE_SPEED: f64 = 0.1;

/// Per node, per frame
pub const PACKET_SPAWN_PROBABILITY: f64 = 0.005;
/// Frames from launch to arrival (progress step of 0.01)
pub const PACKET_LIFETIME_FRAMES: u32 = 100;
const PACKET_RADIUS: f64 = 2.0;
const PACKET_TRAIL_MAX_ALPHA: f64 = 0.05;

/// Nodes closer than this are joined by a line
pub const CONNECTION_DISTANCE: f64 = 150.0;
const CONNECTION_MAX_ALPHA: f64 = 0.15;
const CONNECTION_FADE_PER_PIXEL: f64 = 1.0 / 1000.0;

const LINE_WIDTH: f64 = 1.0;

/// Number of nodes for a viewport: `min(30, floor(area / 25000))`
pub fn node_count_for(viewport: Viewport) -> usize {
    let by_area = (viewport.area() / AREA_PER_NODE).floor() as usize;
    by_area.min(MAX_NODES)
}

/// Opacity of the line between two nodes `distance` apart, `None` if too far
pub fn connection_alpha(distance: f64) -> Option<f64> {
    if distance < CONNECTION_DISTANCE {
        Some((CONNECTION_MAX_ALPHA - distance * CONNECTION_FADE_PER_PIXEL).max(0.0))
    } else {
        None
    }
}

/// Opacity of a packet's trail line at `progress`
fn trail_alpha(progress: f64) -> f64 {
    PACKET_TRAIL_MAX_ALPHA * (1.0 - progress)
}

/// A pulse travelling from its owning node to `target`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Packet {
    /// Index into the field's node list. Only valid for the field generation
    /// that created it; a rebuild drops every packet together with the nodes.
    target: usize,
    /// Frames advanced so far
    frames: u32,
}

impl Packet {
    fn new(target: usize) -> Self {
        Self { target, frames: 0 }
    }

    pub fn target(&self) -> usize {
        self.target
    }

    /// Fraction of the trip completed, `frames / 100`
    pub fn progress(&self) -> f64 {
        self.frames as f64 / PACKET_LIFETIME_FRAMES as f64
    }

    #[inline]
    fn is_arrived(&self) -> bool {
        self.frames >= PACKET_LIFETIME_FRAMES
    }
}

/// A drifting point of the field
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub position: Point,
    /// Displacement per frame
    pub velocity: Point,
    pub radius: f64,
    packets: Vec<Packet>,
}

impl Node {
    pub fn new(position: Point, velocity: Point, radius: f64) -> Self {
        Self {
            position,
            velocity,
            radius,
            packets: Vec::new(),
        }
    }

    /// Random node anywhere inside `viewport`
    fn random<R: RandomSource + ?Sized>(viewport: Viewport, rng: &mut R) -> Self {
        let position = Point::new(
            rng.in_range(0.0, viewport.width),
            rng.in_range(0.0, viewport.height),
        );
        let radius = rng.in_range(NODE_RADIUS_MIN, NODE_RADIUS_MAX);
        let velocity = Point::new(
            rng.in_range(-NODE_SPEED, NODE_SPEED),
            rng.in_range(-NODE_SPEED, NODE_SPEED),
        );
        Self::new(position, velocity, radius)
    }

    /// In-flight packets, oldest first
    pub fn packets(&self) -> &[Packet] {
        &self.packets
    }

    /// Move one step and bounce off the viewport edges.
    /// The position may overshoot an edge by at most one step.
    fn advance(&mut self, viewport: Viewport) {
        self.position.x += self.velocity.x;
        self.position.y += self.velocity.y;

        if self.position.x < 0.0 || self.position.x > viewport.width {
            self.velocity.x = -self.velocity.x;
        }
        if self.position.y < 0.0 || self.position.y > viewport.height {
            self.velocity.y = -self.velocity.y;
        }
    }
}

/// Per-frame counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub nodes: usize,
    pub packets_spawned: usize,
    pub packets_drawn: usize,
    pub packets_retired: usize,
    pub connections: usize,
}

/// All nodes for the current viewport
#[derive(Debug)]
pub struct Field {
    viewport: Viewport,
    nodes: Vec<Node>,
}

impl Field {
    /// Build a field sized for `viewport`
    pub fn new<R: RandomSource + ?Sized>(viewport: Viewport, rng: &mut R) -> Self {
        let mut field = Self {
            viewport,
            nodes: Vec::new(),
        };
        field.resize(viewport, rng);
        field
    }

    /// Field with explicit nodes (no randomisation)
    pub fn from_nodes(viewport: Viewport, nodes: Vec<Node>) -> Self {
        Self { viewport, nodes }
    }

    /// Discard every node and packet and repopulate for `viewport`
    pub fn resize<R: RandomSource + ?Sized>(&mut self, viewport: Viewport, rng: &mut R) {
        let count = node_count_for(viewport);
        self.viewport = viewport;
        self.nodes.clear();
        self.nodes
            .extend((0..count).map(|_| Node::random(viewport, rng)));
        debug!(
            width = viewport.width,
            height = viewport.height,
            nodes = count,
            "Field rebuilt"
        );
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Packets currently in flight across all nodes
    pub fn packet_count(&self) -> usize {
        self.nodes.iter().map(|n| n.packets.len()).sum()
    }

    /// Advance the field by one display refresh and draw it.
    ///
    /// Each node is moved and then drawn (with its packets) before the next
    /// node moves; proximity lines are drawn last from the final positions.
    pub fn frame<R, S>(&mut self, rng: &mut R, surface: &mut S) -> Result<FrameStats, SurfaceError>
    where
        R: RandomSource + ?Sized,
        S: DrawSurface + ?Sized,
    {
        let mut stats = FrameStats {
            nodes: self.nodes.len(),
            ..FrameStats::default()
        };

        surface.clear(self.viewport.width, self.viewport.height)?;

        let count = self.nodes.len();
        for i in 0..count {
            let viewport = self.viewport;
            let node = &mut self.nodes[i];
            node.advance(viewport);
            if rng.chance(PACKET_SPAWN_PROBABILITY) {
                // Self-targeting is allowed; the pulse just sits on the node
                node.packets.push(Packet::new(rng.index(count)));
                stats.packets_spawned += 1;
            }

            surface.fill_circle(node.position, node.radius, colors::NODE)?;

            // Detach the packet list so the other nodes can be read while it is edited
            let origin = node.position;
            let mut packets = std::mem::take(&mut node.packets);
            let drawn = draw_packets(origin, &mut packets, &self.nodes, surface, &mut stats);
            self.nodes[i].packets = packets;
            drawn?;
        }

        for i in 0..count {
            for j in (i + 1)..count {
                let a = self.nodes[i].position;
                let b = self.nodes[j].position;
                if let Some(alpha) = connection_alpha(a.distance(b)) {
                    surface.stroke_line(a, b, colors::CONNECTION.with_alpha(alpha), LINE_WIDTH)?;
                    stats.connections += 1;
                }
            }
        }

        Ok(stats)
    }

    #[cfg(test)]
    pub(crate) fn launch_packet(&mut self, from: usize, to: usize) {
        self.nodes[from].packets.push(Packet::new(to));
    }
}

/// Step every packet of one node, newest first, dropping the ones that arrived
fn draw_packets<S: DrawSurface + ?Sized>(
    origin: Point,
    packets: &mut Vec<Packet>,
    nodes: &[Node],
    surface: &mut S,
    stats: &mut FrameStats,
) -> Result<(), SurfaceError> {
    for idx in (0..packets.len()).rev() {
        let packet = &mut packets[idx];
        packet.frames += 1;

        if packet.is_arrived() {
            packets.remove(idx);
            stats.packets_retired += 1;
            continue;
        }

        let Some(target) = nodes.get(packet.target) else {
            packets.remove(idx);
            continue;
        };

        let progress = packet.progress();
        let head = origin.lerp(target.position, progress);
        surface.fill_circle(head, PACKET_RADIUS, colors::PACKET)?;
        surface.stroke_line(
            origin,
            target.position,
            colors::PACKET_TRAIL.with_alpha(trail_alpha(progress)),
            LINE_WIDTH,
        )?;
        stats.packets_drawn += 1;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::ScriptedRandom;
    use crate::core::surface::{DrawOp, RecordingSurface};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    /// Never spawns packets
    fn quiet_rng() -> ScriptedRandom {
        ScriptedRandom::new(&[0.9])
    }

    fn still_node(x: f64, y: f64) -> Node {
        Node::new(Point::new(x, y), Point::default(), 3.0)
    }

    #[test]
    fn test_node_count_for() {
        let cases = [
            ((500.0, 500.0), 10),
            ((1920.0, 1080.0), 30),
            ((1000.0, 1000.0), 30),
            ((250.0, 100.0), 1),
            ((249.0, 100.0), 0),
            ((100.0, 100.0), 0),
            ((0.0, 0.0), 0),
            ((-500.0, 500.0), 0),
            ((800.0, 600.0), 19),
        ];
        for ((w, h), expected) in cases {
            assert_eq!(
                node_count_for(Viewport::new(w, h)),
                expected,
                "viewport {}x{}",
                w,
                h
            );
        }
    }

    #[test]
    fn test_new_field_500x500() {
        let mut rng = SmallRng::seed_from_u64(42);
        let viewport = Viewport::new(500.0, 500.0);
        let field = Field::new(viewport, &mut rng);

        assert_eq!(field.nodes().len(), 10);
        assert_eq!(field.packet_count(), 0);
        for node in field.nodes() {
            assert!((2.0..4.0).contains(&node.radius));
            assert!((-0.1..0.1).contains(&node.velocity.x));
            assert!((-0.1..0.1).contains(&node.velocity.y));
            assert!((0.0..500.0).contains(&node.position.x));
            assert!((0.0..500.0).contains(&node.position.y));
            assert!(node.packets().is_empty());
        }
    }

    #[test]
    fn test_nodes_stay_in_bounds() {
        let mut rng = SmallRng::seed_from_u64(7);
        let viewport = Viewport::new(300.0, 200.0);
        let mut field = Field::new(viewport, &mut rng);
        let mut surface = RecordingSurface::new();
        let tolerance = NODE_SPEED;

        for _ in 0..20_000 {
            field.frame(&mut rng, &mut surface).unwrap();
            surface.take();
            for node in field.nodes() {
                assert!(node.position.x >= -tolerance && node.position.x <= 300.0 + tolerance);
                assert!(node.position.y >= -tolerance && node.position.y <= 200.0 + tolerance);
            }
        }
    }

    #[test]
    fn test_reflection_flips_velocity() {
        let viewport = Viewport::new(100.0, 100.0);
        let node = Node::new(Point::new(0.05, 99.95), Point::new(-0.1, 0.1), 2.0);
        let mut field = Field::from_nodes(viewport, vec![node]);
        let mut surface = RecordingSurface::new();

        field.frame(&mut quiet_rng(), &mut surface).unwrap();

        let node = &field.nodes()[0];
        assert!(node.position.x < 0.0);
        assert!(node.position.y > 100.0);
        assert_eq!(node.velocity, Point::new(0.1, -0.1));

        field.frame(&mut quiet_rng(), &mut surface).unwrap();
        let node = &field.nodes()[0];
        assert!(node.position.x >= 0.0);
        assert!(node.position.y <= 100.0);
    }

    #[test]
    fn test_packet_lives_exactly_100_frames() {
        let viewport = Viewport::new(400.0, 400.0);
        let mut field = Field::from_nodes(
            viewport,
            vec![still_node(100.0, 100.0), still_node(300.0, 300.0)],
        );
        field.launch_packet(0, 1);
        let mut rng = quiet_rng();
        let mut surface = RecordingSurface::new();

        for frame in 1..PACKET_LIFETIME_FRAMES {
            let stats = field.frame(&mut rng, &mut surface).unwrap();
            assert_eq!(stats.packets_drawn, 1, "frame {}", frame);
            let packet = field.nodes()[0].packets()[0];
            assert_eq!(packet.progress(), frame as f64 / 100.0);
            // Two nodes plus one packet head
            assert_eq!(surface.circle_count(), 3);
            surface.take();
        }

        let stats = field.frame(&mut rng, &mut surface).unwrap();
        assert_eq!(stats.packets_retired, 1);
        assert_eq!(stats.packets_drawn, 0);
        assert_eq!(field.packet_count(), 0);
        assert_eq!(surface.circle_count(), 2);
    }

    #[test]
    fn test_packet_interpolates_and_fades() {
        let viewport = Viewport::new(400.0, 400.0);
        let mut field =
            Field::from_nodes(viewport, vec![still_node(0.0, 0.0), still_node(100.0, 0.0)]);
        field.launch_packet(0, 1);
        let mut rng = quiet_rng();
        let mut surface = RecordingSurface::new();

        for _ in 0..49 {
            field.frame(&mut rng, &mut surface).unwrap();
        }
        surface.take();
        field.frame(&mut rng, &mut surface).unwrap();

        let ops = surface.take();
        let head = ops.iter().find_map(|op| match op {
            DrawOp::Circle { center, radius, color } if *color == colors::PACKET => {
                Some((*center, *radius))
            }
            _ => None,
        });
        assert_eq!(head, Some((Point::new(50.0, 0.0), PACKET_RADIUS)));

        let trail = ops.iter().find_map(|op| match op {
            DrawOp::Line { from, to, color, .. } if color.b == 246 => Some((*from, *to, color.a)),
            _ => None,
        });
        let (from, to, alpha) = trail.unwrap();
        assert_eq!(from, Point::new(0.0, 0.0));
        assert_eq!(to, Point::new(100.0, 0.0));
        assert!((alpha - 0.025).abs() < 1e-12);
    }

    #[test]
    fn test_spawn_targets_random_node() {
        let viewport = Viewport::new(400.0, 400.0);
        let mut field =
            Field::from_nodes(viewport, vec![still_node(10.0, 10.0), still_node(390.0, 390.0)]);
        // node 0: spawn (0.0) targeting index floor(0.5 * 2) = 1; node 1: no spawn (0.9)
        let mut rng = ScriptedRandom::new(&[0.0, 0.5, 0.9]);
        let mut surface = RecordingSurface::new();

        let stats = field.frame(&mut rng, &mut surface).unwrap();

        assert_eq!(stats.packets_spawned, 1);
        assert_eq!(stats.packets_drawn, 1);
        let packets = field.nodes()[0].packets();
        assert_eq!(packets.len(), 1);
        assert_eq!(packets[0].target(), 1);
        // Advanced once in the frame it was launched
        assert_eq!(packets[0].progress(), 0.01);
        assert!(field.nodes()[1].packets().is_empty());
    }

    #[test]
    fn test_packet_may_target_its_own_node() {
        let viewport = Viewport::new(400.0, 400.0);
        let mut field = Field::from_nodes(viewport, vec![still_node(200.0, 200.0)]);
        let mut rng = ScriptedRandom::new(&[0.0, 0.7]);
        let mut surface = RecordingSurface::new();

        field.frame(&mut rng, &mut surface).unwrap();

        assert_eq!(field.nodes()[0].packets()[0].target(), 0);
    }

    #[test]
    fn test_connection_threshold() {
        assert_eq!(connection_alpha(150.0), None);
        assert_eq!(connection_alpha(200.0), None);
        assert!((connection_alpha(100.0).unwrap() - 0.05).abs() < 1e-12);
        assert!((connection_alpha(0.0).unwrap() - 0.15).abs() < 1e-12);
        assert!(connection_alpha(149.999).unwrap() >= 0.0);
    }

    #[test]
    fn test_connections_drawn_only_below_150px() {
        let viewport = Viewport::new(1000.0, 1000.0);
        let mut field = Field::from_nodes(
            viewport,
            vec![
                still_node(0.0, 0.0),
                still_node(150.0, 0.0),
                still_node(0.0, 100.0),
            ],
        );
        let mut surface = RecordingSurface::new();

        let stats = field.frame(&mut quiet_rng(), &mut surface).unwrap();

        // (0,0)-(0,100) at 100px and (150,0)-(0,100) at ~180px: only the first
        assert_eq!(stats.connections, 1);
        let lines: Vec<_> = surface
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::Line { from, to, color, width } => Some((*from, *to, color.a, *width)),
                _ => None,
            })
            .collect();
        assert_eq!(lines.len(), 1);
        let (from, to, alpha, width) = lines[0];
        assert_eq!(from, Point::new(0.0, 0.0));
        assert_eq!(to, Point::new(0.0, 100.0));
        assert!((alpha - 0.05).abs() < 1e-12);
        assert_eq!(width, 1.0);
    }

    #[test]
    fn test_frame_clears_then_draws_nodes() {
        let viewport = Viewport::new(640.0, 480.0);
        let mut field = Field::from_nodes(viewport, vec![still_node(5.0, 5.0)]);
        let mut surface = RecordingSurface::new();

        field.frame(&mut quiet_rng(), &mut surface).unwrap();

        assert_eq!(
            surface.ops(),
            &[
                DrawOp::Clear { width: 640.0, height: 480.0 },
                DrawOp::Circle {
                    center: Point::new(5.0, 5.0),
                    radius: 3.0,
                    color: colors::NODE
                },
            ]
        );
    }

    #[test]
    fn test_resize_discards_nodes_and_packets() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut field = Field::new(Viewport::new(500.0, 500.0), &mut rng);
        field.launch_packet(0, 1);
        field.launch_packet(2, 2);
        let before: Vec<Node> = field.nodes().to_vec();

        field.resize(Viewport::new(1200.0, 900.0), &mut rng);

        assert_eq!(field.nodes().len(), 30);
        assert_eq!(field.packet_count(), 0);
        assert!(field.nodes().iter().all(|n| !before.contains(n)));
        assert_eq!(field.viewport(), Viewport::new(1200.0, 900.0));

        field.resize(Viewport::new(100.0, 100.0), &mut rng);
        assert!(field.nodes().is_empty());

        let mut surface = RecordingSurface::new();
        let stats = field.frame(&mut rng, &mut surface).unwrap();
        assert_eq!(stats, FrameStats::default());
        assert_eq!(surface.ops().len(), 1);
    }

    #[test]
    fn test_surface_error_keeps_packets() {
        struct FailingLines(RecordingSurface);

        impl DrawSurface for FailingLines {
            fn clear(&mut self, w: f64, h: f64) -> Result<(), SurfaceError> {
                self.0.clear(w, h)
            }
            fn fill_circle(&mut self, c: Point, r: f64, col: crate::core::Rgba) -> Result<(), SurfaceError> {
                self.0.fill_circle(c, r, col)
            }
            fn stroke_line(
                &mut self,
                _from: Point,
                _to: Point,
                _color: crate::core::Rgba,
                _width: f64,
            ) -> Result<(), SurfaceError> {
                Err(SurfaceError::Detached)
            }
        }

        let viewport = Viewport::new(400.0, 400.0);
        let mut field =
            Field::from_nodes(viewport, vec![still_node(0.0, 0.0), still_node(300.0, 300.0)]);
        field.launch_packet(0, 1);
        let mut surface = FailingLines(RecordingSurface::new());

        let result = field.frame(&mut quiet_rng(), &mut surface);

        assert_eq!(result, Err(SurfaceError::Detached));
        assert_eq!(field.packet_count(), 1);
    }
}

use std::fmt::Write;

use crate::game::{DIR_BOTTOM, DIR_LEFT, DIR_RIGHT, DIR_TOP};
use crate::rules::ShapeSettings;
use crate::topology::{CellEdges, EdgeKind};

/// Fraction of the edge where the straight run ends and the knob begins.
pub const KNOB_START: f32 = 0.35;
pub const KNOB_END: f32 = 0.65;
const KNOB_NECK: f32 = 0.25;
const KNOB_SHOULDER: f32 = 0.8;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    pub fn expanded(&self, margin: f32) -> Rect {
        Rect {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + margin * 2.0,
            height: self.height + margin * 2.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo { x: f32, y: f32 },
    LineTo { x: f32, y: f32 },
    CubicTo {
        c1: (f32, f32),
        c2: (f32, f32),
        to: (f32, f32),
    },
    Close,
}

/// Closed piece outline in piece-local coordinates (origin at the cell's
/// top-left corner), traversed clockwise from the top-left corner.
#[derive(Clone, Debug, PartialEq)]
pub struct Outline {
    commands: Vec<PathCommand>,
    bounds: Rect,
}

impl Outline {
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn to_svg_path(&self) -> String {
        let mut path = String::new();
        for command in &self.commands {
            if !path.is_empty() {
                path.push(' ');
            }
            let _ = match *command {
                PathCommand::MoveTo { x, y } => write!(path, "M {} {}", fmt_f32(x), fmt_f32(y)),
                PathCommand::LineTo { x, y } => write!(path, "L {} {}", fmt_f32(x), fmt_f32(y)),
                PathCommand::CubicTo { c1, c2, to } => write!(
                    path,
                    "C {} {} {} {} {} {}",
                    fmt_f32(c1.0),
                    fmt_f32(c1.1),
                    fmt_f32(c2.0),
                    fmt_f32(c2.1),
                    fmt_f32(to.0),
                    fmt_f32(to.1)
                ),
                PathCommand::Close => write!(path, "Z"),
            };
        }
        path
    }

    /// Polyline approximation with `steps` points per cubic segment. The first
    /// point is not repeated at the end.
    pub fn flatten(&self, steps: u32) -> Vec<(f32, f32)> {
        flatten_commands(&self.commands, steps)
    }
}

pub fn fmt_f32(value: f32) -> String {
    format!("{:.3}", value)
}

pub fn cubic_point(
    p0: (f32, f32),
    p1: (f32, f32),
    p2: (f32, f32),
    p3: (f32, f32),
    t: f32,
) -> (f32, f32) {
    let u = 1.0 - t;
    let tt = t * t;
    let uu = u * u;
    let uuu = uu * u;
    let ttt = tt * t;
    (
        uuu * p0.0 + 3.0 * uu * t * p1.0 + 3.0 * u * tt * p2.0 + ttt * p3.0,
        uuu * p0.1 + 3.0 * uu * t * p1.1 + 3.0 * u * tt * p2.1 + ttt * p3.1,
    )
}

fn flatten_commands(commands: &[PathCommand], steps: u32) -> Vec<(f32, f32)> {
    let steps = steps.max(1);
    let mut points = Vec::new();
    let mut current = (0.0, 0.0);
    for command in commands {
        match *command {
            PathCommand::MoveTo { x, y } | PathCommand::LineTo { x, y } => {
                current = (x, y);
                points.push(current);
            }
            PathCommand::CubicTo { c1, c2, to } => {
                for step in 1..=steps {
                    let t = step as f32 / steps as f32;
                    points.push(cubic_point(current, c1, c2, to, t));
                }
                current = to;
            }
            PathCommand::Close => {}
        }
    }
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}

/// Placement of one side of a cell: start corner, unit direction along the
/// clockwise traversal, and the unit outward normal.
#[derive(Clone, Copy)]
struct EdgeFrame {
    origin: (f32, f32),
    along: (f32, f32),
    outward: (f32, f32),
    len: f32,
}

impl EdgeFrame {
    fn for_side(dir: usize, width: f32, height: f32) -> Self {
        match dir {
            DIR_TOP => EdgeFrame {
                origin: (0.0, 0.0),
                along: (1.0, 0.0),
                outward: (0.0, -1.0),
                len: width,
            },
            DIR_RIGHT => EdgeFrame {
                origin: (width, 0.0),
                along: (0.0, 1.0),
                outward: (1.0, 0.0),
                len: height,
            },
            DIR_BOTTOM => EdgeFrame {
                origin: (width, height),
                along: (-1.0, 0.0),
                outward: (0.0, 1.0),
                len: width,
            },
            _ => EdgeFrame {
                origin: (0.0, height),
                along: (0.0, -1.0),
                outward: (-1.0, 0.0),
                len: height,
            },
        }
    }

    fn point(&self, t: f32, offset: f32) -> (f32, f32) {
        (
            self.origin.0 + self.along.0 * t * self.len + self.outward.0 * offset,
            self.origin.1 + self.along.1 * t * self.len + self.outward.1 * offset,
        )
    }
}

/// Signed bulge of an edge in pixels; positive protrudes out of the piece.
pub fn edge_amplitude(kind: EdgeKind, jitter: f32, settings: &ShapeSettings, width: f32, height: f32) -> f32 {
    kind.sign() * (settings.tab_size + jitter) * width.min(height)
}

fn append_edge(commands: &mut Vec<PathCommand>, frame: EdgeFrame, amplitude: f32, flat: bool) {
    if flat {
        let (x, y) = frame.point(1.0, 0.0);
        commands.push(PathCommand::LineTo { x, y });
        return;
    }
    // The knob is symmetric about the midpoint, so the neighbour walking the
    // same seam backwards with the negated kind traces the same curve.
    let (x, y) = frame.point(KNOB_START, 0.0);
    commands.push(PathCommand::LineTo { x, y });
    commands.push(PathCommand::CubicTo {
        c1: frame.point(KNOB_NECK, amplitude * KNOB_SHOULDER),
        c2: frame.point(KNOB_START, amplitude),
        to: frame.point(0.5, amplitude),
    });
    commands.push(PathCommand::CubicTo {
        c1: frame.point(KNOB_END, amplitude),
        c2: frame.point(1.0 - KNOB_NECK, amplitude * KNOB_SHOULDER),
        to: frame.point(KNOB_END, 0.0),
    });
    let (x, y) = frame.point(1.0, 0.0);
    commands.push(PathCommand::LineTo { x, y });
}

pub fn build_outline(width: f32, height: f32, edges: &CellEdges, settings: &ShapeSettings) -> Outline {
    let mut commands = Vec::with_capacity(18);
    commands.push(PathCommand::MoveTo { x: 0.0, y: 0.0 });
    for dir in [DIR_TOP, DIR_RIGHT, DIR_BOTTOM, DIR_LEFT] {
        let kind = edges.kinds[dir];
        let amplitude = edge_amplitude(kind, edges.jitter[dir], settings, width, height);
        append_edge(
            &mut commands,
            EdgeFrame::for_side(dir, width, height),
            amplitude,
            kind.is_flat(),
        );
    }
    commands.push(PathCommand::Close);
    let bounds = bounds_of(&flatten_commands(&commands, settings.curve_detail));
    Outline { commands, bounds }
}

fn bounds_of(points: &[(f32, f32)]) -> Rect {
    let Some(&(first_x, first_y)) = points.first() else {
        return Rect::default();
    };
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first_x, first_y, first_x, first_y);
    for &(x, y) in points {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }
    Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(kinds: [EdgeKind; 4]) -> CellEdges {
        CellEdges {
            kinds,
            jitter: [0.0; 4],
        }
    }

    #[test]
    fn flat_cell_is_a_rectangle() {
        let outline = build_outline(
            100.0,
            80.0,
            &cell([EdgeKind::Flat; 4]),
            &ShapeSettings::default(),
        );
        assert_eq!(outline.bounds(), Rect::new(0.0, 0.0, 100.0, 80.0));
        assert_eq!(
            outline.to_svg_path(),
            "M 0.000 0.000 L 100.000 0.000 L 100.000 80.000 L 0.000 80.000 L 0.000 0.000 Z"
        );
    }

    #[test]
    fn tab_protrudes_and_blank_recedes() {
        let settings = ShapeSettings::default();
        let tab = build_outline(
            100.0,
            100.0,
            &cell([EdgeKind::Flat, EdgeKind::Tab, EdgeKind::Flat, EdgeKind::Flat]),
            &settings,
        );
        let bounds = tab.bounds();
        assert!((bounds.width - 120.0).abs() < 0.01);
        assert_eq!(bounds.height, 100.0);

        let blank = build_outline(
            100.0,
            100.0,
            &cell([EdgeKind::Flat, EdgeKind::Blank, EdgeKind::Flat, EdgeKind::Flat]),
            &settings,
        );
        assert_eq!(blank.bounds(), Rect::new(0.0, 0.0, 100.0, 100.0));
        let deepest = blank
            .flatten(settings.curve_detail)
            .into_iter()
            .map(|(x, _)| x)
            .fold(f32::INFINITY, f32::min);
        assert!(deepest >= 0.0);
        let inner = blank
            .flatten(settings.curve_detail)
            .into_iter()
            .filter(|&(_, y)| (y - 50.0).abs() < 0.01)
            .map(|(x, _)| x)
            .fold(f32::INFINITY, f32::min);
        assert!((inner - 80.0).abs() < 0.01);
    }

    #[test]
    fn matching_edges_trace_the_same_seam() {
        let settings = ShapeSettings::default();
        let left_piece = build_outline(
            100.0,
            100.0,
            &cell([EdgeKind::Flat, EdgeKind::Tab, EdgeKind::Flat, EdgeKind::Flat]),
            &settings,
        );
        let right_piece = build_outline(
            100.0,
            100.0,
            &cell([EdgeKind::Flat, EdgeKind::Flat, EdgeKind::Flat, EdgeKind::Blank]),
            &settings,
        );
        let seam = |outline: &Outline, offset_x: f32| -> Vec<(i32, i32)> {
            let mut points: Vec<(i32, i32)> = outline
                .flatten(16)
                .into_iter()
                .map(|(x, y)| (x + offset_x, y))
                .filter(|&(x, y)| x > 99.99 && x < 150.0 && y > 0.01 && y < 99.99)
                .map(|(x, y)| ((x * 100.0).round() as i32, (y * 100.0).round() as i32))
                .collect();
            points.sort_unstable();
            points
        };
        let a = seam(&left_piece, 0.0);
        let b = seam(&right_piece, 100.0);
        assert!(!a.is_empty());
        assert_eq!(a, b);
    }

    #[test]
    fn cubic_point_hits_endpoints() {
        let p0 = (0.0, 0.0);
        let p3 = (10.0, 5.0);
        assert_eq!(cubic_point(p0, (1.0, 1.0), (2.0, 2.0), p3, 0.0), p0);
        assert_eq!(cubic_point(p0, (1.0, 1.0), (2.0, 2.0), p3, 1.0), p3);
    }

    #[test]
    fn rect_expansion_grows_every_side() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0).expanded(5.0);
        assert!(rect.contains(5.0, 5.0));
        assert!(rect.contains(35.0, 35.0));
        assert!(!rect.contains(36.0, 20.0));
    }
}

use crate::geometry::{perpendicular, MolPoint};

/// One cubic bezier arc of a wavy line, in molecule space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BezierSegment {
    pub start: MolPoint,
    pub control1: MolPoint,
    pub control2: MolPoint,
    pub end: MolPoint,
}

/// Round an odd segment count up so the arcs pair off above and below the line.
///
/// `u32::MAX` has no even successor and rounds down instead.
pub fn even_segment_count(n_segments: u32) -> u32 {
    if n_segments % 2 == 1 {
        n_segments.checked_add(1).unwrap_or(n_segments - 1)
    } else {
        n_segments
    }
}

/// Split the line `from`-`to` into arcs bulging alternately to either side.
///
/// Control points sit at one and two thirds of each sub-interval, pushed off
/// the line by `vert_offset` along its perpendicular; even-numbered arcs go
/// one way, odd-numbered arcs the other.
///
/// # Panics
///
/// Panics if `n_segments` is less than 2.
pub fn wavy_segments(
    from: MolPoint,
    to: MolPoint,
    n_segments: u32,
    vert_offset: f64,
) -> Vec<BezierSegment> {
    assert!(n_segments > 1, "too few segments for a wavy line: {n_segments}");
    let n_segments = even_segment_count(n_segments);

    let perp = perpendicular(from, to) * vert_offset;
    let delta = (to - from) / n_segments as f64;

    (0..n_segments)
        .map(|i| {
            let start = from + delta * i as f64;
            let end = from + delta * (i + 1) as f64;
            let bulge = if i % 2 == 1 { -perp } else { perp };
            BezierSegment {
                start,
                control1: start + delta / 3.0 + bulge,
                control2: start + delta * 2.0 / 3.0 + bulge,
                end,
            }
        })
        .collect()
}

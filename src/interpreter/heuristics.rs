//! Geometric tests deciding whether a stroke acts on existing text.

use kurbo::{Point, Rect};

use crate::focus::LineKind;

const OVERLAP_RATIO: f64 = 0.4;

/// More than 40% of the stroke box lies over the text. Exactly 40% is not
/// enough.
pub(crate) fn overlaps_enough(stroke: Rect, intersect: Rect) -> bool {
    stroke.area() * OVERLAP_RATIO < intersect.area()
}

/// A line drawn within `extra` of the text: a horizontal line whose centre
/// lies over the text and which starts below the text top but no lower than
/// `extra` under its bottom; a vertical line spanning the text height that
/// starts right of the text's left edge, at most `extra` past its right edge.
pub(crate) fn in_distance(line: Rect, text: Rect, kind: LineKind, extra: f64) -> bool {
    match kind {
        LineKind::Horizontal => {
            let center = line.x0 + line.width() / 2.0;
            (text.x0 <= center && center <= text.x1)
                && (line.y0 > text.y0 && line.y0 < text.y1 + extra)
        }
        LineKind::Vertical => {
            (line.y0 < text.y0 && text.y1 < line.y1)
                && (line.x0 > text.x0 && line.x0 < text.x1 + extra)
        }
    }
}

/// A vertical line crossing the whole text height, horizontally within it.
pub(crate) fn passes_through(line: Rect, text: Rect) -> bool {
    (text.x0 <= line.x0 && line.x1 <= text.x1) && (line.y0 < text.y0 && text.y1 < line.y1)
}

/// Midpoint between the first and last stroke point inside `text`, when
/// more than two points are inside.
pub(crate) fn center_of_line(points: &[Point], text: Rect) -> Option<Point> {
    let mut inside = points.iter().filter(|p| text.contains(**p));
    let first = *inside.next()?;
    let mut count = 1;
    let mut last = first;
    for point in inside {
        last = *point;
        count += 1;
    }
    (count > 2).then(|| first.midpoint(last))
}

/// Where a vertical line gesture cuts the text: its centre over the text,
/// else the text edge nearest the stroke at mid-height.
pub(crate) fn line_anchor(points: &[Point], stroke: Rect, text: Rect) -> Point {
    center_of_line(points, text).unwrap_or_else(|| {
        let x = if stroke.x0 < text.x0 { text.x0 } else { text.x1 };
        Point::new(x, text.center().y)
    })
}

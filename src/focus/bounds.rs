use kurbo::{Point, Rect};

use crate::host::{FieldId, TextFieldHost};

/// Box around the rendered text of one line of `field`.
///
/// The line containing `at` is used, or the last line when none does. The
/// box spans the full line height and ends a quarter line height after the
/// last glyph, so a stroke just past the end of the text still counts.
pub(crate) fn text_bounds<H>(host: &H, field: FieldId, at: Point) -> Option<Rect>
where
    H: TextFieldHost + ?Sized,
{
    let count = host.line_count(field);
    (0..count).find_map(|line| {
        let bounds = host.line_bounds(field, line);
        if bounds.contains(at) || line + 1 == count {
            let right = bounds.x0 + host.line_width(field, line) + bounds.height() / 4.0;
            Some(Rect::new(bounds.x0, bounds.y0, right, bounds.y1))
        } else {
            None
        }
    })
}

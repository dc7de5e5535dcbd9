use kurbo::{Point, Rect};

use super::{FieldId, Highlight, TextFieldHost};

/// In-memory text fields laid out with a fixed advance per character and
/// hard line breaks only.
///
/// Useful for headless embedders and for exercising gesture handling without
/// a UI toolkit.
#[derive(Debug, Clone)]
pub struct MonospaceTextHost {
    char_width: f64,
    line_height: f64,
    fields: Vec<MonospaceField>,
    focused: Option<FieldId>,
    haptic_pulses: usize,
}

#[derive(Debug, Clone)]
struct MonospaceField {
    frame: Rect,
    text: Vec<char>,
    multiline: bool,
    selection: (usize, usize),
    highlight: Highlight,
}

impl MonospaceTextHost {
    pub fn new(char_width: f64, line_height: f64) -> Self {
        Self {
            char_width,
            line_height,
            fields: Vec::new(),
            focused: None,
            haptic_pulses: 0,
        }
    }

    pub fn add_field(&mut self, frame: Rect, text: &str, multiline: bool) -> FieldId {
        let text: Vec<char> = text.chars().collect();
        let end = text.len();
        self.fields.push(MonospaceField {
            frame,
            text,
            multiline,
            selection: (end, end),
            highlight: Highlight::Default,
        });
        FieldId(self.fields.len() - 1)
    }

    pub fn set_text(&mut self, field: FieldId, text: &str) {
        if let Some(f) = self.fields.get_mut(field.0) {
            f.text = text.chars().collect();
            let end = f.text.len();
            f.selection = (end, end);
        }
    }

    pub fn focused(&self) -> Option<FieldId> {
        self.focused
    }

    pub fn highlight(&self, field: FieldId) -> Highlight {
        self.fields
            .get(field.0)
            .map(|f| f.highlight)
            .unwrap_or_default()
    }

    pub fn haptic_pulses(&self) -> usize {
        self.haptic_pulses
    }

    /// Surface point at the left edge of character `offset`, vertically
    /// centred on its line.
    pub fn point_for_offset(&self, field: FieldId, offset: usize) -> Option<Point> {
        let f = self.fields.get(field.0)?;
        let mut line = 0usize;
        let mut column = 0usize;
        for c in f.text.iter().take(offset) {
            if *c == '\n' {
                line += 1;
                column = 0;
            } else {
                column += 1;
            }
        }
        Some(Point::new(
            f.frame.x0 + column as f64 * self.char_width,
            f.frame.y0 + (line as f64 + 0.5) * self.line_height,
        ))
    }

    /// `(start offset, length)` of each hard line.
    fn lines(&self, field: FieldId) -> Vec<(usize, usize)> {
        let Some(f) = self.fields.get(field.0) else {
            return Vec::new();
        };
        let mut lines = Vec::new();
        let mut start = 0;
        for (i, c) in f.text.iter().enumerate() {
            if *c == '\n' {
                lines.push((start, i - start));
                start = i + 1;
            }
        }
        lines.push((start, f.text.len() - start));
        lines
    }
}

fn shift(position: usize, start: usize, end: usize, inserted: usize) -> usize {
    if position >= end {
        position - (end - start) + inserted
    } else if position > start {
        start + inserted
    } else {
        position
    }
}

impl TextFieldHost for MonospaceTextHost {
    fn field_at(&self, point: Point) -> Option<FieldId> {
        self.fields
            .iter()
            .position(|f| f.frame.contains(point))
            .map(FieldId)
    }

    fn field_frame(&self, field: FieldId) -> Option<Rect> {
        self.fields.get(field.0).map(|f| f.frame)
    }

    fn is_multiline(&self, field: FieldId) -> bool {
        self.fields.get(field.0).map(|f| f.multiline).unwrap_or(false)
    }

    fn text(&self, field: FieldId) -> String {
        self.fields
            .get(field.0)
            .map(|f| f.text.iter().collect())
            .unwrap_or_default()
    }

    fn line_count(&self, field: FieldId) -> usize {
        if self.fields.get(field.0).is_none() {
            return 0;
        }
        self.lines(field).len()
    }

    fn line_bounds(&self, field: FieldId, line: usize) -> Rect {
        let Some(f) = self.fields.get(field.0) else {
            return Rect::ZERO;
        };
        let top = f.frame.y0 + line as f64 * self.line_height;
        Rect::new(f.frame.x0, top, f.frame.x1, top + self.line_height)
    }

    fn line_width(&self, field: FieldId, line: usize) -> f64 {
        self.lines(field)
            .get(line)
            .map(|(_, len)| *len as f64 * self.char_width)
            .unwrap_or(0.0)
    }

    fn offset_for_position(&self, field: FieldId, point: Point) -> usize {
        let Some(f) = self.fields.get(field.0) else {
            return 0;
        };
        let lines = self.lines(field);
        let row = ((point.y - f.frame.y0) / self.line_height).floor().max(0.0) as usize;
        let (start, len) = lines[row.min(lines.len() - 1)];
        let column = ((point.x - f.frame.x0) / self.char_width).round().max(0.0) as usize;
        start + column.min(len)
    }

    fn selection(&self, field: FieldId) -> (usize, usize) {
        self.fields.get(field.0).map(|f| f.selection).unwrap_or((0, 0))
    }

    fn set_selection(&mut self, field: FieldId, start: usize, end: usize) {
        if let Some(f) = self.fields.get_mut(field.0) {
            let len = f.text.len();
            f.selection = (start.min(len), end.min(len));
        }
    }

    fn replace(&mut self, field: FieldId, start: usize, end: usize, text: &str) {
        let Some(f) = self.fields.get_mut(field.0) else {
            return;
        };
        let len = f.text.len();
        let start = start.min(len);
        let end = end.clamp(start, len);
        let inserted: Vec<char> = text.chars().collect();
        let count = inserted.len();
        f.text.splice(start..end, inserted);
        let (a, b) = f.selection;
        f.selection = (shift(a, start, end, count), shift(b, start, end, count));
    }

    fn request_focus(&mut self, field: FieldId) {
        if field.0 < self.fields.len() {
            self.focused = Some(field);
        }
    }

    fn set_highlight(&mut self, field: FieldId, highlight: Highlight) {
        if let Some(f) = self.fields.get_mut(field.0) {
            f.highlight = highlight;
        }
    }

    fn haptic_feedback(&mut self) {
        self.haptic_pulses += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_maps_points_to_offsets() {
        let mut host = MonospaceTextHost::new(10.0, 20.0);
        let field = host.add_field(Rect::new(100.0, 100.0, 500.0, 160.0), "ab\ncdef", true);

        assert_eq!(host.line_count(field), 2);
        assert_eq!(host.line_width(field, 1), 40.0);
        assert_eq!(host.line_bounds(field, 1), Rect::new(100.0, 120.0, 500.0, 140.0));

        assert_eq!(host.offset_for_position(field, Point::new(104.0, 110.0)), 0);
        assert_eq!(host.offset_for_position(field, Point::new(106.0, 110.0)), 1);
        assert_eq!(host.offset_for_position(field, Point::new(300.0, 110.0)), 2);
        assert_eq!(host.offset_for_position(field, Point::new(120.0, 130.0)), 5);
        assert_eq!(host.offset_for_position(field, Point::new(120.0, 150.0)), 5);

        let point = host.point_for_offset(field, 5).unwrap();
        assert_eq!(host.offset_for_position(field, point), 5);
    }

    #[test]
    fn replace_moves_caret_after_insertion() {
        let mut host = MonospaceTextHost::new(10.0, 20.0);
        let field = host.add_field(Rect::new(0.0, 0.0, 100.0, 20.0), "ac", false);
        host.set_selection(field, 1, 1);
        host.replace(field, 1, 1, "b");
        assert_eq!(host.text(field), "abc");
        assert_eq!(host.selection(field), (2, 2));
    }
}

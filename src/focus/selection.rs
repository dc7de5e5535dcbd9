use kurbo::{Point, Rect};

use crate::host::{FieldId, Highlight, TextFieldHost};

const SPACE: char = ' ';
const NEW_LINE: char = '\n';

/// Selection for a word pick at `position`.
///
/// A space gives a caret, a punctuation character selects just itself and
/// anything else expands to the surrounding run of non-space,
/// non-punctuation characters. Multi-line text never expands past the
/// current line.
pub(crate) fn word_range(
    text: &[char],
    position: usize,
    multiline: bool,
    punctuations: &str,
) -> (usize, usize) {
    let Some(&at) = text.get(position) else {
        return (position, position);
    };

    if at == SPACE {
        return (position, position);
    }
    if punctuations.contains(at) {
        return (position, position + 1);
    }

    let is_break = |c: char| c == SPACE || punctuations.contains(c);
    let mut start = text[..position]
        .iter()
        .rposition(|c| is_break(*c))
        .map_or(0, |i| i + 1);
    let mut end = text[position..]
        .iter()
        .position(|c| is_break(*c))
        .map_or(text.len(), |i| position + i);

    if multiline {
        let line_start = text[..position]
            .iter()
            .rposition(|c| *c == NEW_LINE)
            .map_or(0, |i| i + 1);
        let line_end = text[position..]
            .iter()
            .position(|c| *c == NEW_LINE)
            .map_or(text.len(), |i| position + i);
        start = start.max(line_start);
        end = end.min(line_end);
    }

    (start, end)
}

/// Place a caret at `at`, or with `range`, select the word there.
pub(crate) fn select_at<H>(
    host: &mut H,
    field: FieldId,
    at: Point,
    range: bool,
    punctuations: &str,
) where
    H: TextFieldHost + ?Sized,
{
    let position = host.offset_for_position(field, at);
    if !range {
        host.set_selection(field, position, position);
        return;
    }

    let text: Vec<char> = host.text(field).chars().collect();
    if position < text.len() {
        host.set_highlight(field, Highlight::Default);
    }
    let (start, end) = word_range(&text, position, host.is_multiline(field), punctuations);
    host.set_selection(field, start, end);
}

/// Select from the left to the right edge of `rect`, along its vertical
/// centre.
pub(crate) fn select_rect<H>(host: &mut H, field: FieldId, rect: Rect, highlight: Highlight)
where
    H: TextFieldHost + ?Sized,
{
    host.set_highlight(field, highlight);
    let (start, end) = rect_range(host, field, rect);
    host.set_selection(field, start, end);
}

/// Offsets under the left and right edges of `rect`, along its vertical
/// centre.
pub(crate) fn rect_range<H>(host: &H, field: FieldId, rect: Rect) -> (usize, usize)
where
    H: TextFieldHost + ?Sized,
{
    let y = rect.center().y;
    let start = host.offset_for_position(field, Point::new(rect.x0, y));
    let end = host.offset_for_position(field, Point::new(rect.x1, y));
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MonospaceTextHost;
    use crate::settings::DEFAULT_PUNCTUATIONS;

    fn chars(text: &str) -> Vec<char> {
        text.chars().collect()
    }

    #[test]
    fn word_pick_expands_to_word() {
        let text = chars("hello brave world");
        assert_eq!(word_range(&text, 8, false, DEFAULT_PUNCTUATIONS), (6, 11));
        assert_eq!(word_range(&text, 0, false, DEFAULT_PUNCTUATIONS), (0, 5));
        assert_eq!(word_range(&text, 16, false, DEFAULT_PUNCTUATIONS), (12, 17));
    }

    #[test]
    fn word_pick_on_space_or_punctuation() {
        let text = chars("hi, there");
        assert_eq!(word_range(&text, 3, false, DEFAULT_PUNCTUATIONS), (3, 3));
        assert_eq!(word_range(&text, 2, false, DEFAULT_PUNCTUATIONS), (2, 3));
        assert_eq!(word_range(&text, 1, false, DEFAULT_PUNCTUATIONS), (0, 2));
    }

    #[test]
    fn word_pick_stays_on_its_line() {
        let text = chars("one\ntwo");
        assert_eq!(word_range(&text, 5, true, DEFAULT_PUNCTUATIONS), (4, 7));
        assert_eq!(word_range(&text, 1, true, DEFAULT_PUNCTUATIONS), (0, 3));
    }

    #[test]
    fn word_pick_past_the_end_is_a_caret() {
        let text = chars("abc");
        assert_eq!(word_range(&text, 3, false, DEFAULT_PUNCTUATIONS), (3, 3));
    }

    #[test]
    fn rect_selection_follows_the_edges() {
        let mut host = MonospaceTextHost::new(10.0, 20.0);
        let field = host.add_field(Rect::new(0.0, 0.0, 300.0, 20.0), "hello world", false);

        select_rect(&mut host, field, Rect::new(58.0, 2.0, 112.0, 18.0), Highlight::Scratch);
        assert_eq!(host.selection(field), (6, 11));
        assert_eq!(host.highlight(field), Highlight::Scratch);
    }

    #[test]
    fn point_selection_places_caret_or_word() {
        let mut host = MonospaceTextHost::new(10.0, 20.0);
        let field = host.add_field(Rect::new(0.0, 0.0, 300.0, 20.0), "hello world", false);

        select_at(&mut host, field, Point::new(31.0, 10.0), false, DEFAULT_PUNCTUATIONS);
        assert_eq!(host.selection(field), (3, 3));

        select_at(&mut host, field, Point::new(81.0, 10.0), true, DEFAULT_PUNCTUATIONS);
        assert_eq!(host.selection(field), (6, 11));
    }
}

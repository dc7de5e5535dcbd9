//! Text edits composed from [`TextFieldHost`] primitives.

use super::{FieldId, TextFieldHost};

const SPACE: char = ' ';
const NEW_LINE: char = '\n';

/// Replace the selection with `label`, separating it from preceding text with
/// a space when typing at the end of a line.
pub fn insert_text<H>(host: &mut H, field: FieldId, label: &str, punctuations: &str)
where
    H: TextFieldHost + ?Sized,
{
    if label.is_empty() {
        return;
    }

    let text: Vec<char> = host.text(field).chars().collect();
    let (start, end) = clamp_selection(host.selection(field), text.len());

    let mut insertion = String::new();
    if start != 0 && !punctuations.contains(label) {
        let after_text_at_end = end == text.len() && text.get(end - 1) != Some(&SPACE);
        let before_new_line = host.is_multiline(field) && text.get(end) == Some(&NEW_LINE);

        if after_text_at_end || before_new_line {
            let end_char = text[start - 1];
            let start_char = label.chars().next();
            let both_cj = is_cj(end_char) && start_char.map(is_cj).unwrap_or(false);
            if !both_cj {
                insertion.push(SPACE);
            }
        }
    }
    insertion.push_str(label);

    host.replace(field, start, end, &insertion);
    let caret = start + insertion.chars().count();
    host.set_selection(field, caret, caret);
}

/// Split at `position`. A space already there is left alone on single-line
/// fields and promoted to a line break on multi-line ones.
pub fn insert_space<H>(host: &mut H, field: FieldId, position: usize)
where
    H: TextFieldHost + ?Sized,
{
    let text: Vec<char> = host.text(field).chars().collect();
    let multiline = host.is_multiline(field);

    host.set_selection(field, position, position);

    match find_near(&text, SPACE, position) {
        None => {
            if find_near(&text, NEW_LINE, position).is_none() && text.len() != position {
                host.replace(field, position, position, " ");
            } else if multiline {
                host.replace(field, position, position, "\n");
            }
        }
        Some(at) if multiline => host.replace(field, at, at + 1, "\n"),
        Some(_) => {}
    }
}

/// Join at `position`: drop a space, or turn a line break into a space.
pub fn erase_space<H>(host: &mut H, field: FieldId, position: usize)
where
    H: TextFieldHost + ?Sized,
{
    let text: Vec<char> = host.text(field).chars().collect();

    host.set_selection(field, position, position);

    if let Some(at) = find_near(&text, SPACE, position) {
        host.replace(field, at, at + 1, "");
    } else if host.is_multiline(field) {
        if let Some(at) = find_near(&text, NEW_LINE, position) {
            host.replace(field, at, at + 1, " ");
        }
    }
}

/// Collapse a selection to its end, or step the caret one character right.
pub fn forward_cursor<H>(host: &mut H, field: FieldId)
where
    H: TextFieldHost + ?Sized,
{
    let len = host.text(field).chars().count();
    let (start, end) = clamp_selection(host.selection(field), len);

    if start != end {
        host.set_selection(field, end, end);
    } else if end < len {
        host.set_selection(field, end + 1, end + 1);
    }
}

/// Delete the selection, or the character before the caret.
pub fn backward_delete<H>(host: &mut H, field: FieldId)
where
    H: TextFieldHost + ?Sized,
{
    let len = host.text(field).chars().count();
    let (start, end) = clamp_selection(host.selection(field), len);

    if start != end {
        host.replace(field, start, end, "");
        host.set_selection(field, start, start);
    } else if start > 0 {
        host.set_selection(field, start, start);
        host.replace(field, start - 1, start, "");
    }
}

/// Delete `[start, end)` in either order and leave the caret at the cut.
pub fn erase_range<H>(host: &mut H, field: FieldId, start: usize, end: usize)
where
    H: TextFieldHost + ?Sized,
{
    let len = host.text(field).chars().count();
    let (start, end) = clamp_selection((start.min(end), start.max(end)), len);

    host.set_selection(field, start, start);
    if start != end {
        host.replace(field, start, end, "");
    }
}

/// Position of `target` at `position` or just before it, ignoring both ends
/// of the text.
fn find_near(text: &[char], target: char, position: usize) -> Option<usize> {
    if position == 0 || position >= text.len() {
        return None;
    }
    if text[position] == target {
        Some(position)
    } else if text[position - 1] == target {
        Some(position - 1)
    } else {
        None
    }
}

fn clamp_selection((start, end): (usize, usize), len: usize) -> (usize, usize) {
    let start = start.min(len);
    (start, end.clamp(start, len))
}

/// Chinese and Japanese script blocks, written without separating spaces.
pub fn is_cj(c: char) -> bool {
    matches!(
        u32::from(c),
        0x2E80..=0x2EFF
            | 0x2F00..=0x2FDF
            | 0x3040..=0x309F
            | 0x30A0..=0x30FF
            | 0x31C0..=0x31EF
            | 0x3400..=0x4DBF
            | 0x4E00..=0x9FFF
            | 0xF900..=0xFAFF
            | 0xFF00..=0xFFEF
            | 0x1B000..=0x1B0FF
            | 0x20000..=0x2A6DF
            | 0x2A700..=0x2B73F
            | 0x2B740..=0x2B81F
            | 0x2F800..=0x2FA1F
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MonospaceTextHost;
    use crate::settings::DEFAULT_PUNCTUATIONS;
    use kurbo::Rect;

    fn host(text: &str, multiline: bool) -> (MonospaceTextHost, FieldId) {
        let mut host = MonospaceTextHost::new(10.0, 20.0);
        let field = host.add_field(Rect::new(0.0, 0.0, 400.0, 60.0), text, multiline);
        (host, field)
    }

    #[test]
    fn typing_after_a_word_adds_a_separator() {
        let (mut host, field) = host("hello", false);
        host.set_selection(field, 5, 5);

        insert_text(&mut host, field, "world", DEFAULT_PUNCTUATIONS);
        assert_eq!(host.text(field), "hello world");
        assert_eq!(host.selection(field), (11, 11));

        insert_text(&mut host, field, "!", DEFAULT_PUNCTUATIONS);
        assert_eq!(host.text(field), "hello world!");
    }

    #[test]
    fn typing_mid_text_inserts_verbatim() {
        let (mut host, field) = host("ac", false);
        host.set_selection(field, 1, 1);
        insert_text(&mut host, field, "b", DEFAULT_PUNCTUATIONS);
        assert_eq!(host.text(field), "abc");
    }

    #[test]
    fn cj_neighbours_are_not_separated() {
        let (mut host, field) = host("日本", false);
        host.set_selection(field, 2, 2);
        insert_text(&mut host, field, "語", DEFAULT_PUNCTUATIONS);
        assert_eq!(host.text(field), "日本語");
    }

    #[test]
    fn space_insertion_is_idempotent_on_single_line() {
        let (mut host, field) = host("helloworld", false);
        insert_space(&mut host, field, 5);
        assert_eq!(host.text(field), "hello world");

        insert_space(&mut host, field, 5);
        assert_eq!(host.text(field), "hello world");
        insert_space(&mut host, field, 6);
        assert_eq!(host.text(field), "hello world");
    }

    #[test]
    fn space_becomes_line_break_on_multi_line() {
        let (mut host, field) = host("hello world", true);
        insert_space(&mut host, field, 6);
        assert_eq!(host.text(field), "hello\nworld");
    }

    #[test]
    fn no_space_at_text_end() {
        let (mut host, field) = host("hello", false);
        insert_space(&mut host, field, 5);
        assert_eq!(host.text(field), "hello");
    }

    #[test]
    fn erase_space_joins_words_and_lines() {
        let (mut host, field) = host("hello world", false);
        erase_space(&mut host, field, 5);
        assert_eq!(host.text(field), "helloworld");

        let (mut host, field) = self::host("hello\nworld", true);
        erase_space(&mut host, field, 6);
        assert_eq!(host.text(field), "hello world");
    }

    #[test]
    fn cursor_navigation_and_backspace() {
        let (mut host, field) = host("abc", false);
        host.set_selection(field, 1, 1);
        forward_cursor(&mut host, field);
        assert_eq!(host.selection(field), (2, 2));

        host.set_selection(field, 0, 2);
        forward_cursor(&mut host, field);
        assert_eq!(host.selection(field), (2, 2));

        backward_delete(&mut host, field);
        assert_eq!(host.text(field), "ac");
        assert_eq!(host.selection(field), (1, 1));

        host.set_selection(field, 0, 2);
        backward_delete(&mut host, field);
        assert_eq!(host.text(field), "");

        backward_delete(&mut host, field);
        assert_eq!(host.text(field), "");
    }

    #[test]
    fn erase_range_accepts_reversed_bounds() {
        let (mut host, field) = host("hello world", false);
        erase_range(&mut host, field, 11, 5);
        assert_eq!(host.text(field), "hello");
        assert_eq!(host.selection(field), (5, 5));
    }
}

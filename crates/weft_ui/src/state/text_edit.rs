//! Text-box editing state: buffer, cursor, selection, numeric commit.

use std::ops::Range;

/// Numeric behaviour of a text box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericMode {
    /// Last successfully committed value.
    pub last_valid: f64,
    /// Reject edits that leave an unparsable intermediate string.
    pub strict: bool,
}

/// Persistent state of one text box.
///
/// `cursor` and `anchor` are byte offsets on char boundaries. A selection
/// exists when the anchor is set and differs from the cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct TextEditState {
    text: String,
    cursor: usize,
    anchor: Option<usize>,
    numeric: Option<NumericMode>,
}

impl TextEditState {
    /// Free-text state with the cursor at the end.
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            cursor: text.len(),
            anchor: None,
            numeric: None,
        }
    }

    /// Numeric state showing `value`.
    #[must_use]
    pub fn numeric(value: f64, strict: bool) -> Self {
        let mut state = Self::new(&format_number(value));
        state.numeric = Some(NumericMode {
            last_valid: value,
            strict,
        });
        state
    }

    /// Current buffer.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cursor byte offset.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Numeric mode, if any.
    #[must_use]
    pub const fn numeric_mode(&self) -> Option<NumericMode> {
        self.numeric
    }

    /// Last committed numeric value.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        self.numeric.map(|n| n.last_valid)
    }

    /// Ordered, non-empty selected byte range.
    #[must_use]
    pub fn selection(&self) -> Option<Range<usize>> {
        let anchor = self.anchor?;
        match anchor.cmp(&self.cursor) {
            std::cmp::Ordering::Less => Some(anchor..self.cursor),
            std::cmp::Ordering::Greater => Some(self.cursor..anchor),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Replaces the whole buffer, cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
        self.cursor = self.text.len();
        self.anchor = None;
    }

    /// Moves the cursor to `pos` (snapped to a char boundary), optionally
    /// extending the selection.
    pub fn set_cursor(&mut self, pos: usize, extend: bool) {
        let mut pos = pos.min(self.text.len());
        while !self.text.is_char_boundary(pos) {
            pos -= 1;
        }
        if extend {
            self.anchor.get_or_insert(self.cursor);
        } else {
            self.anchor = None;
        }
        self.cursor = pos;
    }

    fn prev_boundary(&self, pos: usize) -> usize {
        self.text[..pos]
            .chars()
            .next_back()
            .map_or(0, |c| pos - c.len_utf8())
    }

    fn next_boundary(&self, pos: usize) -> usize {
        self.text[pos..]
            .chars()
            .next()
            .map_or(self.text.len(), |c| pos + c.len_utf8())
    }

    /// Moves one char left; without `extend` a selection collapses to its start.
    pub fn move_left(&mut self, extend: bool) {
        match (extend, self.selection()) {
            (false, Some(range)) => self.set_cursor(range.start, false),
            _ => self.set_cursor(self.prev_boundary(self.cursor), extend),
        }
    }

    /// Moves one char right; without `extend` a selection collapses to its end.
    pub fn move_right(&mut self, extend: bool) {
        match (extend, self.selection()) {
            (false, Some(range)) => self.set_cursor(range.end, false),
            _ => self.set_cursor(self.next_boundary(self.cursor), extend),
        }
    }

    /// Moves to the start of the buffer.
    pub fn home(&mut self, extend: bool) {
        self.set_cursor(0, extend);
    }

    /// Moves to the end of the buffer.
    pub fn end(&mut self, extend: bool) {
        self.set_cursor(self.text.len(), extend);
    }

    /// Inserts `input` at the cursor, replacing any selection.
    /// Returns true if the buffer changed.
    pub fn insert(&mut self, input: &str) -> bool {
        if input.is_empty() {
            return false;
        }
        let range = self.selection().unwrap_or(self.cursor..self.cursor);
        self.replace(range, input)
    }

    /// Deletes the selection or the char before the cursor.
    pub fn backspace(&mut self) -> bool {
        let range = match self.selection() {
            Some(range) => range,
            None if self.cursor > 0 => self.prev_boundary(self.cursor)..self.cursor,
            None => return false,
        };
        self.replace(range, "")
    }

    /// Deletes the selection or the char after the cursor.
    pub fn delete(&mut self) -> bool {
        let range = match self.selection() {
            Some(range) => range,
            None if self.cursor < self.text.len() => self.cursor..self.next_boundary(self.cursor),
            None => return false,
        };
        self.replace(range, "")
    }

    fn replace(&mut self, range: Range<usize>, input: &str) -> bool {
        if let Some(NumericMode { strict: true, .. }) = self.numeric {
            let mut candidate = String::with_capacity(self.text.len() + input.len());
            candidate.push_str(&self.text[..range.start]);
            candidate.push_str(input);
            candidate.push_str(&self.text[range.end..]);
            if !is_numeric_intermediate(&candidate) {
                return false;
            }
        }
        self.text.replace_range(range.clone(), input);
        self.cursor = range.start + input.len();
        self.anchor = None;
        true
    }

    /// Commits a numeric box: parses the buffer, or reverts it to the last
    /// valid value. Returns true if the committed value changed.
    /// Free-text boxes are left alone.
    pub fn commit(&mut self) -> bool {
        let Some(mode) = self.numeric else {
            return false;
        };
        if let Ok(value) = self.text.trim().parse::<f64>() {
            if value.is_finite() {
                let changed = value.to_bits() != mode.last_valid.to_bits();
                self.numeric = Some(NumericMode {
                    last_valid: value,
                    ..mode
                });
                return changed;
            }
        }
        let reverted = format_number(mode.last_valid);
        self.set_text(&reverted);
        false
    }
}

fn format_number(value: f64) -> String {
    format!("{value}")
}

/// Accepts complete numbers and the prefixes a user passes through while typing one.
fn is_numeric_intermediate(text: &str) -> bool {
    if !text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E'))
    {
        return false;
    }
    if text.is_empty() || text.parse::<f64>().is_ok() {
        return true;
    }
    let body = text.strip_prefix(['-', '+']).unwrap_or(text);
    if body.is_empty() || body == "." {
        return true;
    }
    // "1e", "1e-", "2.5E+"
    let trimmed = body.strip_suffix(['-', '+']).unwrap_or(body);
    trimmed
        .strip_suffix(['e', 'E'])
        .is_some_and(|mantissa| !mantissa.is_empty() && mantissa.parse::<f64>().is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_backspace() {
        let mut edit = TextEditState::new("helo");
        edit.move_left(false);
        assert!(edit.insert("l"));
        assert_eq!(edit.text(), "hello");
        assert_eq!(edit.cursor(), 4);

        edit.end(false);
        assert!(edit.backspace());
        assert_eq!(edit.text(), "hell");
        edit.home(false);
        assert!(!edit.backspace());
        assert!(edit.delete());
        assert_eq!(edit.text(), "ell");
    }

    #[test]
    fn test_selection_replace() {
        let mut edit = TextEditState::new("abcdef");
        edit.home(false);
        edit.move_right(true);
        edit.move_right(true);
        assert_eq!(edit.selection(), Some(0..2));

        edit.insert("X");
        assert_eq!(edit.text(), "Xcdef");
        assert_eq!(edit.selection(), None);
        assert_eq!(edit.cursor(), 1);
    }

    #[test]
    fn test_collapse_selection_on_move() {
        let mut edit = TextEditState::new("abcdef");
        edit.home(true);
        assert_eq!(edit.selection(), Some(0..6));
        edit.move_right(false);
        assert_eq!(edit.cursor(), 6);
        assert_eq!(edit.selection(), None);
    }

    #[test]
    fn test_multibyte_boundaries() {
        let mut edit = TextEditState::new("añb");
        edit.move_left(false);
        edit.move_left(false);
        assert_eq!(edit.cursor(), 1);
        edit.delete();
        assert_eq!(edit.text(), "ab");
        edit.set_cursor(1, false);
        assert_eq!(edit.cursor(), 1);
    }

    #[test]
    fn test_lenient_numeric_reverts_on_commit() {
        let mut edit = TextEditState::numeric(2.5, false);
        edit.set_text("abc");
        assert!(!edit.commit());
        assert_eq!(edit.text(), "2.5");
        assert_eq!(edit.value(), Some(2.5));

        edit.set_text("  7 ");
        assert!(edit.commit());
        assert_eq!(edit.value(), Some(7.0));
    }

    #[test]
    fn test_strict_numeric_rejects_keystrokes() {
        let mut edit = TextEditState::numeric(1.0, true);
        edit.set_text("");
        assert!(edit.insert("-"));
        assert!(edit.insert("1"));
        assert!(edit.insert("."));
        assert!(!edit.insert("x"));
        assert!(edit.insert("5"));
        assert!(edit.insert("e"));
        assert!(!edit.insert("."));
        assert!(edit.insert("3"));
        assert_eq!(edit.text(), "-1.5e3");
        assert!(edit.commit());
        assert_eq!(edit.value(), Some(-1500.0));
    }

    #[test]
    fn test_intermediates() {
        for ok in ["", "-", "+", ".", "-.", "1.", ".5", "1e", "1e-", "2.5E+", "42"] {
            assert!(is_numeric_intermediate(ok), "{ok}");
        }
        for bad in ["e", "1..", "--", "1e5e", "abc", "1x"] {
            assert!(!is_numeric_intermediate(bad), "{bad}");
        }
    }
}

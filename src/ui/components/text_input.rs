//! Single-line text input with char-aware cursor handling
//!
//! The cursor is a character index, not a byte offset, so umlauts and
//! other multi-byte input behave correctly.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::ui::theme;

#[derive(Debug, Clone, Default)]
pub struct TextInputState {
    input: String,
    /// Cursor position as a character index
    cursor: usize,
}

impl TextInputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: &str) -> Self {
        Self {
            input: value.to_string(),
            cursor: value.chars().count(),
        }
    }

    /// Set the value and move the cursor to the end
    pub fn set(&mut self, value: &str) {
        self.input = value.to_string();
        self.cursor = self.input.chars().count();
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }

    pub fn value(&self) -> &str {
        &self.input
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    fn char_count(&self) -> usize {
        self.input.chars().count()
    }

    /// Byte offset of the given character index
    fn byte_index(&self, char_index: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.input.insert(at, c);
        self.cursor += 1;
    }

    /// Backspace: delete the character before the cursor
    pub fn delete_char(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.input.remove(at);
        }
    }

    /// Delete the character under the cursor
    pub fn delete_forward(&mut self) {
        if self.cursor < self.char_count() {
            let at = self.byte_index(self.cursor);
            self.input.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    pub fn move_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    /// Delete from cursor to start of line (Ctrl+U)
    pub fn delete_to_start(&mut self) {
        let at = self.byte_index(self.cursor);
        self.input = self.input[at..].to_string();
        self.cursor = 0;
    }

    /// Delete from cursor to end of line (Ctrl+K)
    pub fn delete_to_end(&mut self) {
        let at = self.byte_index(self.cursor);
        self.input.truncate(at);
    }

    /// Delete the word before the cursor (Ctrl+W)
    pub fn delete_word(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let chars: Vec<char> = self.input.chars().collect();
        let end = self.cursor;
        let mut pos = self.cursor;
        while pos > 0 && chars[pos - 1] == ' ' {
            pos -= 1;
        }
        while pos > 0 && chars[pos - 1] != ' ' {
            pos -= 1;
        }
        let start_byte = self.byte_index(pos);
        let end_byte = self.byte_index(end);
        self.input.drain(start_byte..end_byte);
        self.cursor = pos;
    }

    /// Render as a labelled one-line field; the cursor is shown only
    /// when the field has focus.
    pub fn render_field(
        &self,
        area: Rect,
        buf: &mut Buffer,
        label: &str,
        placeholder: &str,
        focused: bool,
    ) {
        let label_style = if focused {
            Style::default().fg(theme::border_focused())
        } else {
            Style::default().fg(theme::text_muted())
        };

        let value_span = if self.input.is_empty() {
            Span::styled(placeholder.to_string(), Style::default().fg(theme::text_muted()))
        } else {
            Span::styled(
                self.input.clone(),
                Style::default().fg(theme::text_primary()),
            )
        };

        let line = Line::from(vec![Span::styled(format!("{label} "), label_style), value_span]);
        Paragraph::new(line).render(area, buf);

        if focused && area.width > 0 {
            let label_width = label.width() as u16 + 1;
            let before_cursor = &self.input[..self.byte_index(self.cursor)];
            let cursor_x = area.x
                + (label_width + before_cursor.width() as u16).min(area.width.saturating_sub(1));
            buf[(cursor_x, area.y)].set_style(Style::default().add_modifier(Modifier::REVERSED));
        }
    }
}

impl std::fmt::Display for TextInputState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.input)
    }
}

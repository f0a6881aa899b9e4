use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    Submit,
    Cancel,
}

/// Single-line text field with a char-indexed cursor and a length cap.
#[derive(Clone, Debug)]
pub struct NameInput {
    text: String,
    /// Cursor position as a char index (0 = before first char).
    cursor: usize,
    max_chars: usize,
}

impl NameInput {
    pub fn new(max_chars: usize) -> Self {
        Self {
            text: String::new(),
            cursor: 0,
            max_chars,
        }
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn char_to_byte(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    /// Insert at the cursor; ignored once the cap is reached.
    pub fn insert(&mut self, ch: char) -> bool {
        if ch.is_control() || self.char_count() >= self.max_chars {
            return false;
        }
        let byte_offset = self.char_to_byte(self.cursor);
        self.text.insert(byte_offset, ch);
        self.cursor += 1;
        true
    }

    pub fn insert_str(&mut self, text: &str) {
        for ch in text.chars() {
            if !self.insert(ch) && self.char_count() >= self.max_chars {
                break;
            }
        }
    }

    fn remove_at(&mut self, char_idx: usize) {
        let start = self.char_to_byte(char_idx);
        if let Some(ch) = self.text[start..].chars().next() {
            self.text.replace_range(start..start + ch.len_utf8(), "");
        }
    }

    pub fn handle(&mut self, key: KeyEvent) -> InputResult {
        match key.code {
            KeyCode::Esc => return InputResult::Cancel,
            KeyCode::Enter => return InputResult::Submit,
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.char_count()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.char_count(),
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.remove_at(self.cursor);
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.char_count() {
                    self.remove_at(self.cursor);
                }
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => self.clear(),
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.insert(ch);
            }
            _ => {}
        }
        InputResult::Continue
    }

    /// (before cursor, char under cursor, after cursor) for styled rendering.
    pub fn render_parts(&self) -> (&str, Option<char>, &str) {
        let byte_offset = self.char_to_byte(self.cursor);
        match self.text[byte_offset..].chars().next() {
            Some(ch) => {
                let next = byte_offset + ch.len_utf8();
                (&self.text[..byte_offset], Some(ch), &self.text[next..])
            }
            None => (&self.text, None, ""),
        }
    }
}

pub struct NameInputView<'a> {
    input: &'a NameInput,
    prompt: String,
    error: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> NameInputView<'a> {
    pub fn new(input: &'a NameInput, prompt: String, error: Option<&'a str>, theme: &'a Theme) -> Self {
        Self {
            input,
            prompt,
            error,
            theme,
        }
    }
}

impl Widget for NameInputView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Length(2),
                Constraint::Min(0),
            ])
            .split(area);

        Paragraph::new(Line::from(Span::styled(
            self.prompt,
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        let (before, at, after) = self.input.render_parts();
        let cursor_style = Style::default().fg(colors.bg()).bg(colors.accent());
        let cursor_text = at.map(String::from).unwrap_or_else(|| " ".to_string());
        let line = Line::from(vec![
            Span::styled(before, Style::default().fg(colors.fg())),
            Span::styled(cursor_text, cursor_style),
            Span::styled(after, Style::default().fg(colors.fg())),
        ]);
        let block = Block::bordered().border_style(Style::default().fg(colors.border_focused()));
        Paragraph::new(line).block(block).render(layout[1], buf);

        if let Some(error) = self.error {
            Paragraph::new(Line::from(Span::styled(
                error,
                Style::default().fg(colors.warning()),
            )))
            .alignment(Alignment::Center)
            .render(layout[2], buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut input = NameInput::new(20);
        for ch in "김성보".chars() {
            input.handle(key(KeyCode::Char(ch)));
        }
        assert_eq!(input.value(), "김성보");
        input.handle(key(KeyCode::Backspace));
        assert_eq!(input.value(), "김성");
    }

    #[test]
    fn test_insert_in_middle() {
        let mut input = NameInput::new(20);
        input.insert_str("Mna");
        input.handle(key(KeyCode::Left));
        input.handle(key(KeyCode::Left));
        input.handle(key(KeyCode::Char('i')));
        assert_eq!(input.value(), "Mina");
        assert_eq!(input.render_parts(), ("Mi", Some('n'), "a"));
    }

    #[test]
    fn test_length_cap() {
        let mut input = NameInput::new(3);
        input.insert_str("abcdef");
        assert_eq!(input.value(), "abc");
        assert!(!input.insert('x'));
    }

    #[test]
    fn test_paste_skips_control_chars() {
        let mut input = NameInput::new(10);
        input.insert_str("Mi\nna\t");
        assert_eq!(input.value(), "Mina");
    }

    #[test]
    fn test_submit_and_cancel() {
        let mut input = NameInput::new(10);
        assert_eq!(input.handle(key(KeyCode::Enter)), InputResult::Submit);
        assert_eq!(input.handle(key(KeyCode::Esc)), InputResult::Cancel);
        assert_eq!(input.handle(key(KeyCode::Char('a'))), InputResult::Continue);
    }

    #[test]
    fn test_ctrl_u_clears() {
        let mut input = NameInput::new(10);
        input.insert_str("Mina");
        input.handle(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert_eq!(input.value(), "");
        assert_eq!(input.render_parts(), ("", None, ""));
    }
}

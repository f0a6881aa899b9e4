use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};

use crate::ui::theme::Theme;

/// Centered message panel: a bold headline followed by plain lines.
pub struct Banner<'a> {
    pub headline: String,
    pub lines: Vec<String>,
    pub theme: &'a Theme,
}

impl<'a> Banner<'a> {
    pub fn new(headline: String, theme: &'a Theme) -> Self {
        Self {
            headline,
            lines: Vec::new(),
            theme,
        }
    }

    pub fn line(mut self, text: String) -> Self {
        self.lines.push(text);
        self
    }
}

impl Widget for Banner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        Clear.render(area, buf);

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));

        let mut text = vec![
            Line::from(""),
            Line::from(Span::styled(
                self.headline,
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        text.extend(
            self.lines
                .into_iter()
                .map(|line| Line::from(Span::styled(line, Style::default().fg(colors.fg())))),
        );

        Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}

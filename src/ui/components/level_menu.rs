use std::collections::BTreeSet;

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::quiz::Level;
use crate::ui::theme::Theme;
use crate::ui::{level_description, level_label};

pub struct LevelMenu<'a> {
    pub user_name: &'a str,
    pub selected: usize,
    pub completed: &'a BTreeSet<Level>,
    pub theme: &'a Theme,
}

impl<'a> LevelMenu<'a> {
    pub fn new(
        user_name: &'a str,
        selected: usize,
        completed: &'a BTreeSet<Level>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            user_name,
            selected,
            completed,
            theme,
        }
    }

    pub fn next(selected: usize) -> usize {
        (selected + 1) % Level::ALL.len()
    }

    pub fn prev(selected: usize) -> usize {
        if selected > 0 {
            selected - 1
        } else {
            Level::ALL.len() - 1
        }
    }
}

impl Widget for LevelMenu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                t!("level.title", name = self.user_name).to_string(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                t!("level.info").to_string(),
                Style::default().fg(colors.text_pending()),
            )),
        ];
        Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let menu_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                Level::ALL
                    .iter()
                    .map(|_| Constraint::Length(3))
                    .collect::<Vec<_>>(),
            )
            .split(layout[2]);

        for (i, level) in Level::ALL.into_iter().enumerate() {
            let is_selected = i == self.selected;
            let is_done = self.completed.contains(&level);
            let indicator = if is_selected { ">" } else { " " };

            let mut label_text = format!(" {indicator} [{}] {}", i + 1, level_label(level));
            if is_done {
                label_text.push(' ');
                label_text.push_str(&t!("level.done"));
            }
            let desc_text = format!("     {}", level_description(level));

            let label_color = if is_done {
                colors.text_pending()
            } else if is_selected {
                colors.accent()
            } else {
                colors.fg()
            };
            let label_modifier = if is_selected && !is_done {
                Modifier::BOLD
            } else {
                Modifier::empty()
            };

            let lines = vec![
                Line::from(Span::styled(
                    label_text,
                    Style::default().fg(label_color).add_modifier(label_modifier),
                )),
                Line::from(Span::styled(
                    desc_text,
                    Style::default().fg(if is_selected && !is_done {
                        colors.accent_dim()
                    } else {
                        colors.text_pending()
                    }),
                )),
            ];

            if i < menu_layout.len() {
                Paragraph::new(lines).render(menu_layout[i], buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_wraps() {
        assert_eq!(LevelMenu::next(0), 1);
        assert_eq!(LevelMenu::next(2), 0);
        assert_eq!(LevelMenu::prev(0), 2);
        assert_eq!(LevelMenu::prev(1), 0);
    }

    #[test]
    fn test_renders_done_marker() {
        let theme = Theme::default();
        let completed = BTreeSet::from([Level::Medium]);
        let area = Rect::new(0, 0, 60, 16);
        let mut buf = Buffer::empty(area);
        LevelMenu::new("Mina", 0, &completed, &theme).render(area, &mut buf);

        let text: String = buf.content.iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("[2]"));
        assert!(text.contains("(done)"));
    }
}

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use rust_i18n::t;

use crate::quiz::Question;
use crate::session::AnswerFeedback;
use crate::ui::ask_label;
use crate::ui::theme::Theme;

/// One question: the prompt, what is being asked for, and a 2x2 grid of
/// numbered choices. With `reveal` set the card shows the outcome of the
/// answer at `selected` instead of accepting input.
pub struct QuestionCard<'a> {
    pub question: &'a Question,
    pub selected: usize,
    pub reveal: Option<&'a AnswerFeedback>,
    pub theme: &'a Theme,
}

impl<'a> QuestionCard<'a> {
    pub fn new(question: &'a Question, selected: usize, theme: &'a Theme) -> Self {
        Self {
            question,
            selected,
            reveal: None,
            theme,
        }
    }

    pub fn reveal(mut self, feedback: &'a AnswerFeedback) -> Self {
        self.reveal = Some(feedback);
        self
    }

    fn choice_style(&self, index: usize, choice: &str) -> Style {
        let colors = &self.theme.colors;
        let is_selected = index == self.selected;
        match self.reveal {
            Some(_) if self.question.is_correct(choice) => Style::default()
                .fg(colors.success())
                .add_modifier(Modifier::BOLD),
            Some(_) if is_selected => Style::default()
                .fg(colors.error())
                .add_modifier(Modifier::CROSSED_OUT),
            Some(_) => Style::default().fg(colors.text_pending()),
            None if is_selected => Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
            None => Style::default().fg(colors.fg()),
        }
    }
}

impl Widget for QuestionCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(2),
                Constraint::Length(6),
                Constraint::Length(2),
                Constraint::Min(0),
            ])
            .split(area);

        let prompt_block = Block::bordered()
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.prompt_bg()));
        Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                self.question.prompt.as_str(),
                Style::default()
                    .fg(colors.fg())
                    .add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center)
        .block(prompt_block)
        .render(layout[0], buf);

        Paragraph::new(Line::from(Span::styled(
            ask_label(self.question.kind.answer_field()),
            Style::default().fg(colors.text_pending()),
        )))
        .alignment(Alignment::Center)
        .render(layout[1], buf);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(3)])
            .split(layout[2]);
        for (i, choice) in self.question.choices.iter().enumerate() {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(rows[(i / 2).min(1)]);
            let cell = cols[i % 2];

            let border = if i == self.selected && self.reveal.is_none() {
                colors.border_focused()
            } else {
                colors.border()
            };
            Paragraph::new(Line::from(Span::styled(
                format!("{}. {choice}", i + 1),
                self.choice_style(i, choice),
            )))
            .block(Block::bordered().border_style(Style::default().fg(border)))
            .render(cell, buf);
        }

        if let Some(feedback) = self.reveal {
            let (text, color) = match feedback {
                AnswerFeedback::Correct => (t!("quiz.correct").to_string(), colors.success()),
                AnswerFeedback::Incorrect { expected } => (
                    t!("quiz.incorrect", answer = expected).to_string(),
                    colors.error(),
                ),
            };
            Paragraph::new(Line::from(Span::styled(
                text,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(layout[3], buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::{PromptKind, VocabEntry};

    fn question() -> Question {
        Question {
            kind: PromptKind::MeaningFromReading,
            entry: VocabEntry::new("書く", "かく", "쓰다"),
            prompt: "かく".to_string(),
            correct_answer: "쓰다".to_string(),
            choices: vec![
                "읽다".to_string(),
                "쓰다".to_string(),
                "듣다".to_string(),
                "보다".to_string(),
            ],
        }
    }

    fn rendered(card: QuestionCard<'_>) -> String {
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        card.render(area, &mut buf);
        buf.content.iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_choices_are_numbered() {
        let theme = Theme::default();
        let q = question();
        let text = rendered(QuestionCard::new(&q, 0, &theme));
        for n in 1..=4 {
            assert!(text.contains(&format!("{n}.")));
        }
        assert!(!text.contains("Correct!"));
    }

    #[test]
    fn test_reveal_styles_answer() {
        let theme = Theme::default();
        let q = question();
        let feedback = AnswerFeedback::Incorrect {
            expected: "쓰다".to_string(),
        };
        let card = QuestionCard::new(&q, 0, &theme).reveal(&feedback);
        assert_eq!(card.choice_style(1, "쓰다").fg, Some(theme.colors.success()));
        assert_eq!(card.choice_style(0, "읽다").fg, Some(theme.colors.error()));
        assert_eq!(card.choice_style(2, "듣다").fg, Some(theme.colors.text_pending()));
    }
}

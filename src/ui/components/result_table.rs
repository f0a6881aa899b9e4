use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Cell, Paragraph, Row, Table, Widget, Wrap};
use rust_i18n::t;

use crate::session::{FeedbackTier, Summary};
use crate::ui::level_label;
use crate::ui::theme::Theme;

pub struct ResultTable<'a> {
    pub user_name: &'a str,
    pub summary: &'a Summary,
    /// Index of the first answer row shown.
    pub scroll: usize,
    pub theme: &'a Theme,
}

impl<'a> ResultTable<'a> {
    pub fn new(user_name: &'a str, summary: &'a Summary, scroll: usize, theme: &'a Theme) -> Self {
        Self {
            user_name,
            summary,
            scroll,
            theme,
        }
    }
}

impl Widget for ResultTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let summary = self.summary;

        let block = Block::bordered()
            .title(format!(" {} ", t!("result.title", name = self.user_name)))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(3),
            ])
            .split(inner);

        let acc_color = match summary.tier {
            FeedbackTier::Perfect | FeedbackTier::Great => colors.success(),
            FeedbackTier::Good => colors.warning(),
            FeedbackTier::KeepPracticing => colors.error(),
            FeedbackTier::NoData => colors.text_pending(),
        };
        let headline = t!(
            "result.headline",
            correct = summary.correct,
            total = summary.total,
            accuracy = format!("{:.1}", summary.accuracy * 100.0)
        )
        .to_string();
        Paragraph::new(Line::from(Span::styled(
            headline,
            Style::default().fg(acc_color).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        Paragraph::new(Line::from(Span::styled(
            summary.feedback.as_str(),
            Style::default().fg(colors.fg()),
        )))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(layout[1], buf);

        let mut tally_spans = vec![Span::styled(
            format!("  {}: ", t!("result.per_level")),
            Style::default().fg(colors.text_pending()),
        )];
        for tally in &summary.per_level {
            tally_spans.push(Span::styled(
                format!("{} {}/{}   ", level_label(tally.level), tally.correct, tally.total),
                Style::default().fg(colors.fg()),
            ));
        }
        Paragraph::new(Line::from(tally_spans)).render(layout[2], buf);

        let header = Row::new(vec![
            Cell::from(t!("result.col_number").to_string()),
            Cell::from(t!("result.col_level").to_string()),
            Cell::from(t!("result.col_prompt").to_string()),
            Cell::from(t!("result.col_answer").to_string()),
            Cell::from(t!("result.col_submitted").to_string()),
            Cell::from(t!("result.col_result").to_string()),
        ])
        .style(
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        );

        let rows: Vec<Row> = summary
            .rows
            .iter()
            .skip(self.scroll)
            .map(|row| {
                let marker_style = if row.is_correct {
                    Style::default().fg(colors.success())
                } else {
                    Style::default().fg(colors.error())
                };
                Row::new(vec![
                    Cell::from(row.number.to_string()),
                    Cell::from(level_label(row.level)),
                    Cell::from(row.prompt.clone()),
                    Cell::from(row.correct_answer.clone()),
                    Cell::from(row.submitted.clone()),
                    Cell::from(Span::styled(row.marker(), marker_style)),
                ])
                .style(Style::default().fg(colors.fg()))
            })
            .collect();

        let widths = [
            Constraint::Length(4),
            Constraint::Length(14),
            Constraint::Fill(2),
            Constraint::Fill(2),
            Constraint::Fill(2),
            Constraint::Length(6),
        ];
        Table::new(rows, widths)
            .header(header)
            .block(Block::bordered().border_style(Style::default().fg(colors.border())))
            .render(layout[3], buf);
    }
}

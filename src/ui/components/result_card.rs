use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::record::SessionRecord;
use crate::ui::theme::Theme;

pub struct ResultCard<'a> {
    record: &'a SessionRecord,
    theme: &'a Theme,
}

impl<'a> ResultCard<'a> {
    pub fn new(record: &'a SessionRecord, theme: &'a Theme) -> Self {
        Self { record, theme }
    }
}

impl Widget for ResultCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Session Complete ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                self.record.package.clone(),
                Style::default().fg(colors.fg()),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("Score: {}", self.record.score),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
        ];

        if let Some(breakdown) = self.record.breakdown {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!(
                    "easy {} | medium {} | hard {}",
                    breakdown.easy, breakdown.medium, breakdown.hard
                ),
                Style::default().fg(colors.text_dim()),
            )));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "[Enter] Back to menu",
            Style::default().fg(colors.text_dim()),
        )));

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }
}

use chrono::Local;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::record::SessionRecord;
use crate::ui::theme::Theme;

/// Most recent sessions, newest first.
const VISIBLE_ROWS: usize = 10;

pub struct HistoryTable<'a> {
    sessions: &'a [SessionRecord],
    confirm_clear: bool,
    theme: &'a Theme,
}

impl<'a> HistoryTable<'a> {
    pub fn new(sessions: &'a [SessionRecord], confirm_clear: bool, theme: &'a Theme) -> Self {
        Self {
            sessions,
            confirm_clear,
            theme,
        }
    }
}

impl Widget for HistoryTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Study History ")
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = Vec::new();

        lines.push(Line::from(Span::styled(
            format!(" {:<18} {:<16} {:>6}  {}", "Date", "Subject", "Score", "Mode"),
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        )));

        if self.sessions.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                " No sessions recorded yet",
                Style::default().fg(colors.text_dim()),
            )));
        } else {
            for record in self.sessions.iter().rev().take(VISIBLE_ROWS) {
                let local = record.date.with_timezone(&Local);
                let date = local.format("%Y-%m-%d %H:%M").to_string();
                lines.push(Line::from(Span::styled(
                    format!(
                        " {date:<18} {:<16} {:>6}  {}",
                        record.package, record.score, record.mode,
                    ),
                    Style::default().fg(colors.fg()),
                )));
            }
        }

        lines.push(Line::from(""));
        if self.confirm_clear {
            lines.push(Line::from(Span::styled(
                " Clear all history? [y] yes  [n] no",
                Style::default()
                    .fg(colors.warning())
                    .add_modifier(Modifier::BOLD),
            )));
        } else if !self.sessions.is_empty() {
            lines.push(Line::from(Span::styled(
                " [c] Clear history",
                Style::default().fg(colors.text_dim()),
            )));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}

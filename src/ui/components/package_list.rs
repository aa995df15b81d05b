use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::theme::Theme;

/// Scrollable pick-one list, used for the package menu, the daily package
/// menu, and the level menu.
pub struct PackageList<'a> {
    title: String,
    entries: &'a [String],
    selected: usize,
    empty_text: &'a str,
    theme: &'a Theme,
}

impl<'a> PackageList<'a> {
    pub fn new(title: impl Into<String>, entries: &'a [String], selected: usize, theme: &'a Theme) -> Self {
        Self {
            title: title.into(),
            entries,
            selected,
            empty_text: "No packages available",
            theme,
        }
    }

    pub fn empty_text(mut self, text: &'a str) -> Self {
        self.empty_text = text;
        self
    }
}

impl Widget for PackageList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.entries.is_empty() {
            let empty = Paragraph::new(Line::from(Span::styled(
                format!("  {}", self.empty_text),
                Style::default().fg(colors.text_dim()),
            )));
            empty.render(inner, buf);
            return;
        }

        // Keep the selection in view when the list outgrows the area.
        let visible = inner.height as usize;
        let first = if self.selected >= visible {
            self.selected + 1 - visible
        } else {
            0
        };

        let lines: Vec<Line> = self
            .entries
            .iter()
            .enumerate()
            .skip(first)
            .take(visible)
            .map(|(i, entry)| {
                let is_selected = i == self.selected;
                let indicator = if is_selected { ">" } else { " " };
                Line::from(Span::styled(
                    format!(" {indicator} {entry}"),
                    Style::default()
                        .fg(if is_selected {
                            colors.accent()
                        } else {
                            colors.fg()
                        })
                        .add_modifier(if is_selected {
                            Modifier::BOLD
                        } else {
                            Modifier::empty()
                        }),
                ))
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}

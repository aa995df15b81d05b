use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::quiz::{QuizPhase, QuizState};
use crate::ui::theme::Theme;

/// The in-session view: reading passage (if any), prompt, choices with the
/// selection cursor, and during feedback the verdict plus explanation.
pub struct QuestionCard<'a> {
    quiz: &'a QuizState,
    theme: &'a Theme,
}

impl<'a> QuestionCard<'a> {
    pub fn new(quiz: &'a QuizState, theme: &'a Theme) -> Self {
        Self { quiz, theme }
    }
}

impl Widget for QuestionCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let question = self.quiz.current();

        let block = Block::bordered()
            .title(format!(
                " Question {} / {} ",
                self.quiz.index + 1,
                self.quiz.total()
            ))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = Vec::new();

        if let Some(reading) = question.reading.as_deref()
            && !reading.is_empty()
        {
            lines.push(Line::from(Span::styled(
                reading.to_string(),
                Style::default().fg(colors.text_dim()),
            )));
            lines.push(Line::from(""));
        }

        lines.push(Line::from(Span::styled(
            question.question.as_deref().unwrap_or("-").to_string(),
            Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));

        let correct_idx = (0..question.choices.len()).find(|&i| question.is_correct_choice(i));
        for (i, choice) in question.choices.iter().enumerate() {
            let is_cursor = self.quiz.selected == Some(i);
            let marker = if is_cursor { ">" } else { " " };
            let letter = (b'A' + (i % 26) as u8) as char;

            let style = match self.quiz.phase {
                QuizPhase::AwaitingAnswer => {
                    if is_cursor {
                        Style::default()
                            .fg(colors.selection_fg())
                            .bg(colors.selection_bg())
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(colors.fg())
                    }
                }
                QuizPhase::ShowingFeedback => {
                    // Highlight the right answer; mark a wrong pick in red.
                    if correct_idx == Some(i) {
                        Style::default()
                            .fg(colors.correct())
                            .add_modifier(Modifier::BOLD)
                    } else if is_cursor {
                        Style::default().fg(colors.incorrect())
                    } else {
                        Style::default().fg(colors.text_dim())
                    }
                }
            };

            lines.push(Line::from(Span::styled(
                format!(" {marker} {letter}. {choice}"),
                style,
            )));
        }

        if self.quiz.phase == QuizPhase::ShowingFeedback {
            lines.push(Line::from(""));
            let (verdict, verdict_color) = match self.quiz.last_correct {
                Some(true) => ("Correct", colors.correct()),
                _ => ("Incorrect", colors.incorrect()),
            };
            lines.push(Line::from(Span::styled(
                format!(" {verdict}"),
                Style::default().fg(verdict_color).add_modifier(Modifier::BOLD),
            )));

            if let Some(explanation) = question.explanation.as_deref()
                && !explanation.is_empty()
            {
                lines.push(Line::from(Span::styled(
                    format!(" {explanation}"),
                    Style::default().fg(colors.text_dim()),
                )));
            }
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

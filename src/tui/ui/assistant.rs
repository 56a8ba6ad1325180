//! Health assistant chat panel.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::domain::faq::{DISCLAIMER, QUICK_QUESTIONS};
use crate::domain::{ChatMessage, Role};
use crate::tui::styles::MedicalTheme;

use super::{render_footer, render_header};

/// Longest question accepted from the input line.
const MAX_INPUT_CHARS: usize = 200;

#[derive(Debug, Clone, Default)]
pub struct AssistantState {
    pub input: String,
}

impl AssistantState {
    pub fn input_char(&mut self, c: char) {
        if !c.is_control() && self.input.chars().count() < MAX_INPUT_CHARS {
            self.input.push(c);
        }
    }

    pub fn delete_char(&mut self) {
        self.input.pop();
    }

    /// Take the typed question, leaving the line empty.
    pub fn take_input(&mut self) -> String {
        std::mem::take(&mut self.input)
    }
}

pub fn render_assistant(
    f: &mut Frame,
    area: Rect,
    state: &AssistantState,
    transcript: &[ChatMessage],
    user: &str,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(1), // Disclaimer
            Constraint::Min(0),    // Transcript
            Constraint::Length(1), // Quick questions
            Constraint::Length(3), // Input
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_header(f, chunks[0], "AI Health Assistant & FAQ", "Definitions, not diagnosis", user);

    f.render_widget(
        Paragraph::new(Span::styled(format!(" ⚠ {DISCLAIMER}"), MedicalTheme::warning())),
        chunks[1],
    );

    render_transcript(f, chunks[2], transcript);

    let quick: Vec<Span> = QUICK_QUESTIONS
        .iter()
        .enumerate()
        .flat_map(|(i, (label, _))| {
            [
                Span::styled(format!(" [F{}] ", i + 1), MedicalTheme::key_hint()),
                Span::styled(*label, MedicalTheme::text_secondary()),
            ]
        })
        .collect();
    f.render_widget(Paragraph::new(Line::from(quick)), chunks[3]);

    let input = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        if state.input.is_empty() {
            Span::styled("Ask about a medical term...", MedicalTheme::text_muted())
        } else {
            Span::styled(state.input.as_str(), MedicalTheme::text())
        },
        Span::styled("▌", MedicalTheme::cursor()),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border_focused()),
    );
    f.render_widget(input, chunks[4]);

    render_footer(
        f,
        chunks[5],
        &[("Enter", "Send"), ("Ctrl+L", "Clear Chat"), ("Esc", "Back")],
        None,
    );
}

fn render_transcript(f: &mut Frame, area: Rect, transcript: &[ChatMessage]) {
    let mut lines = Vec::with_capacity(transcript.len() * 2);
    for message in transcript {
        let (who, style) = match message.role {
            Role::User => ("You", MedicalTheme::focused()),
            Role::Assistant => ("Assistant", MedicalTheme::subtitle()),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{who}: "), style),
            Span::styled(message.content.as_str(), MedicalTheme::text()),
        ]));
        lines.push(Line::from(""));
    }

    // Keep the newest messages in view.
    let visible = area.height.saturating_sub(2) as usize;
    let scroll = lines.len().saturating_sub(visible) as u16;

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        );
    f.render_widget(p, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_editing() {
        let mut state = AssistantState::default();
        for c in "bmi?".chars() {
            state.input_char(c);
        }
        state.delete_char();
        assert_eq!(state.take_input(), "bmi");
        assert!(state.input.is_empty());
    }

    #[test]
    fn test_input_is_capped() {
        let mut state = AssistantState::default();
        for _ in 0..(MAX_INPUT_CHARS + 10) {
            state.input_char('a');
        }
        assert_eq!(state.input.len(), MAX_INPUT_CHARS);
    }
}

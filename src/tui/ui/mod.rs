//! UI module: View components for the TUI.

pub mod assistant;
pub mod dashboard;
pub mod form;
pub mod login;
pub mod result;
pub mod symptoms;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::MedicalTheme;

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(Span::styled(
            "DISCLAIMER: Results are indicative screening estimates and do not replace professional medical evaluation.",
            MedicalTheme::text_muted(),
        )),
        Line::from(Span::styled(
            "In an emergency call your local emergency number (911/112) immediately.",
            MedicalTheme::text_muted(),
        )),
    ];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(MedicalTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}

/// Title bar with a subtitle and, when logged in, the user's name.
pub(crate) fn render_header(f: &mut Frame, area: Rect, title: &str, subtitle: &str, user: &str) {
    let mut spans = vec![
        Span::raw(" "),
        Span::styled(title.to_string(), MedicalTheme::title()),
        Span::styled(" │ ", MedicalTheme::text_muted()),
        Span::styled(subtitle.to_string(), MedicalTheme::text_secondary()),
    ];
    if !user.is_empty() {
        spans.push(Span::styled("   ", MedicalTheme::text()));
        spans.push(Span::styled(format!("👤 {user}"), MedicalTheme::subtitle()));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

/// Footer line: an error if there is one, key hints otherwise.
pub(crate) fn render_footer(f: &mut Frame, area: Rect, hints: &[(&str, &str)], error: Option<&str>) {
    let content = match error {
        Some(err) => Line::from(vec![
            Span::styled("! ", MedicalTheme::danger()),
            Span::styled(err.to_string(), MedicalTheme::danger()),
        ]),
        None => Line::from(
            hints
                .iter()
                .flat_map(|(key, desc)| {
                    [
                        Span::styled(format!("[{key}] "), MedicalTheme::key_hint()),
                        Span::styled(format!("{desc} "), MedicalTheme::key_desc()),
                    ]
                })
                .collect::<Vec<_>>(),
        ),
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}

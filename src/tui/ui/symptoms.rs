//! Symptom checker: multi-select list, emergency banner and triage result.

use std::collections::BTreeSet;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::domain::condition::EMERGENCY_SIGNS;
use crate::domain::{DiseaseModel, TriageReport};
use crate::tui::styles::MedicalTheme;

use super::{render_footer, render_header};

pub const NO_MATCH_MESSAGE: &str = "No exact match found. Please consult a General Physician.";

pub struct SymptomState {
    options: Vec<&'static str>,
    pub filter: String,
    pub cursor: usize,
    pub chosen: BTreeSet<String>,
    pub report: Option<TriageReport>,
    /// Prediction tool linked from the top result
    pub related: Option<DiseaseModel>,
    pub warning: Option<String>,
}

impl SymptomState {
    #[must_use]
    pub fn new(options: Vec<&'static str>) -> Self {
        Self {
            options,
            filter: String::new(),
            cursor: 0,
            chosen: BTreeSet::new(),
            report: None,
            related: None,
            warning: None,
        }
    }

    /// Options matching the filter, case-insensitively.
    #[must_use]
    pub fn visible(&self) -> Vec<&'static str> {
        let needle = self.filter.to_lowercase();
        self.options
            .iter()
            .copied()
            .filter(|s| needle.is_empty() || s.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn next(&mut self) {
        let len = self.visible().len();
        if len > 0 {
            self.cursor = (self.cursor + 1) % len;
        }
    }

    pub fn prev(&mut self) {
        let len = self.visible().len();
        if len > 0 {
            self.cursor = self.cursor.checked_sub(1).unwrap_or(len - 1);
        }
    }

    pub fn push_filter(&mut self, c: char) {
        self.filter.push(c);
        self.cursor = 0;
    }

    pub fn pop_filter(&mut self) {
        self.filter.pop();
        self.cursor = 0;
    }

    /// Select or deselect the symptom under the cursor.
    pub fn toggle(&mut self) {
        if let Some(symptom) = self.visible().get(self.cursor) {
            if !self.chosen.remove(*symptom) {
                self.chosen.insert((*symptom).to_string());
            }
            self.warning = None;
        }
    }

    /// Drop the selection and any previous result.
    pub fn clear(&mut self) {
        self.chosen.clear();
        self.report = None;
        self.related = None;
        self.warning = None;
    }
}

pub fn render_symptom_checker(f: &mut Frame, area: Rect, state: &SymptomState, user: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    render_header(
        f,
        chunks[0],
        "Intelligent Symptom Checker",
        "Identify potential conditions and get triage advice",
        user,
    );
    render_emergency_banner(f, chunks[1]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[2]);

    render_options(f, body[0], state);
    render_report(f, body[1], state);

    let mut hints = vec![
        ("↑↓", "Move"),
        ("Space/Ins", "Select"),
        ("Enter", "Analyze"),
        ("Del", "Clear"),
    ];
    if state.related.is_some() {
        hints.push(("Tab", "Open Tool"));
    }
    hints.push(("Esc", "Back"));
    render_footer(f, chunks[3], &hints, state.warning.as_deref());
}

fn render_emergency_banner(f: &mut Frame, area: Rect) {
    let half = EMERGENCY_SIGNS.len().div_ceil(2);
    let line = |signs: &[&str]| {
        Line::from(
            signs
                .iter()
                .map(|s| Span::styled(format!("• {s}   "), MedicalTheme::text()))
                .collect::<Vec<_>>(),
        )
    };

    let text = vec![
        Line::from(Span::styled(
            "Do not use this tool if you have:",
            MedicalTheme::danger(),
        )),
        line(&EMERGENCY_SIGNS[..half]),
        line(&EMERGENCY_SIGNS[half..]),
        Line::from(Span::styled(
            "If you experience these, call Emergency Services (911/112) immediately.",
            MedicalTheme::text_muted(),
        )),
    ];

    let block = Block::default()
        .title(Span::styled(" EMERGENCY CHECK (READ FIRST) ", MedicalTheme::danger()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::danger());
    f.render_widget(Paragraph::new(text).block(block), area);
}

fn render_options(f: &mut Frame, area: Rect, state: &SymptomState) {
    let visible = state.visible();
    let items: Vec<ListItem> = visible
        .iter()
        .map(|s| {
            let (mark, style) = if state.chosen.contains(*s) {
                ("[x]", MedicalTheme::focused())
            } else {
                ("[ ]", MedicalTheme::text())
            };
            ListItem::new(Line::from(Span::styled(format!("{mark} {s}"), style)))
        })
        .collect();

    let title = if state.filter.is_empty() {
        format!(" What are you experiencing? ({} selected) ", state.chosen.len())
    } else {
        format!(" Search: {}▌ ", state.filter)
    };

    let list = List::new(items)
        .block(
            Block::default()
                .title(Span::styled(title, MedicalTheme::subtitle()))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border_focused()),
        )
        .highlight_style(MedicalTheme::selected());

    let mut list_state = ListState::default().with_selected((!visible.is_empty()).then_some(state.cursor));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn render_report(f: &mut Frame, area: Rect, state: &SymptomState) {
    let block = Block::default()
        .title(Span::styled(" Analysis Result ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    let Some(report) = &state.report else {
        let hint = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Select symptoms, then press Enter to compare against the condition guide.",
                MedicalTheme::text_muted(),
            )),
            Line::from(Span::styled(
                "Type to search the list.",
                MedicalTheme::text_muted(),
            )),
        ])
        .wrap(Wrap { trim: true })
        .block(block);
        f.render_widget(hint, area);
        return;
    };

    let Some(top) = report.top() else {
        let p = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(NO_MATCH_MESSAGE, MedicalTheme::info())),
        ])
        .wrap(Wrap { trim: true })
        .block(block);
        f.render_widget(p, area);
        return;
    };

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(inner);

    let title = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(top.condition, MedicalTheme::title()),
            Span::raw("  "),
            Span::styled(top.severity.priority_label(), MedicalTheme::severity(top.severity)),
        ]),
        Line::from(Span::styled(
            format!("Based on matching {} symptoms.", top.match_count),
            MedicalTheme::text_muted(),
        )),
    ]);
    f.render_widget(title, chunks[0]);

    let confidence = report.confidence();
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).border_style(MedicalTheme::border()))
        .gauge_style(MedicalTheme::confidence(confidence))
        .ratio(confidence)
        .label(format!("Match strength {:.0}%", confidence * 100.0));
    f.render_widget(gauge, chunks[1]);

    let mut lines = vec![
        Line::from(Span::styled("Recommended Action:", MedicalTheme::subtitle())),
        Line::from(Span::styled(top.advice, MedicalTheme::text())),
        Line::from(""),
        Line::from(vec![
            Span::styled("Symptoms Matched: ", MedicalTheme::text_secondary()),
            Span::styled(top.matched_symptoms.join(", "), MedicalTheme::text()),
        ]),
    ];

    if let Some(model) = state.related {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("[Tab] ", MedicalTheme::key_hint()),
            Span::styled(format!("Go to the {} tool", model.title()), MedicalTheme::info()),
        ]));
    }

    let others = report.other_causes();
    if !others.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Other possible causes:",
            MedicalTheme::text_secondary(),
        )));
        for other in others {
            lines.push(Line::from(vec![
                Span::styled(format!("  {} ", other.condition), MedicalTheme::text()),
                Span::styled(
                    format!("({} matches) - ", other.match_count),
                    MedicalTheme::text_muted(),
                ),
                Span::styled(other.severity.to_string(), MedicalTheme::severity(other.severity)),
            ]));
        }
    }

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::condition::all_symptoms;

    #[test]
    fn test_toggle_and_clear() {
        let mut state = SymptomState::new(all_symptoms());
        state.toggle();
        let first = state.visible()[0];
        assert!(state.chosen.contains(first));

        state.toggle();
        assert!(state.chosen.is_empty());

        state.toggle();
        state.clear();
        assert!(state.chosen.is_empty());
        assert!(state.report.is_none());
    }

    #[test]
    fn test_filter_narrows_options() {
        let mut state = SymptomState::new(all_symptoms());
        for c in "shak".chars() {
            state.push_filter(c);
        }
        assert_eq!(state.visible(), vec!["Tremors (Shaking)"]);

        state.toggle();
        assert!(state.chosen.contains("Tremors (Shaking)"));

        state.pop_filter();
        state.pop_filter();
        state.pop_filter();
        state.pop_filter();
        assert_eq!(state.visible().len(), all_symptoms().len());
    }

    #[test]
    fn test_cursor_wraps_within_visible() {
        let mut state = SymptomState::new(vec!["Fever", "Nausea"]);
        state.prev();
        assert_eq!(state.cursor, 1);
        state.next();
        assert_eq!(state.cursor, 0);
    }
}

//! Dashboard view: navigation menu and model status.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::application::ModelStatus;
use crate::domain::DiseaseModel;
use crate::tui::styles::MedicalTheme;

use super::{render_footer, render_header};

/// Entries of the navigation menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    SymptomChecker,
    Predict(DiseaseModel),
    Assistant,
    Logout,
}

impl MenuItem {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::SymptomChecker => "Symptom Checker",
            Self::Predict(DiseaseModel::Diabetes) => "Diabetes Check",
            Self::Predict(DiseaseModel::HeartDisease) => "Heart Disease Check",
            Self::Predict(DiseaseModel::Parkinsons) => "Parkinsons Check",
            Self::Assistant => "Health Assistant & FAQ",
            Self::Logout => "Log Out",
        }
    }
}

pub const MENU: [MenuItem; 6] = [
    MenuItem::SymptomChecker,
    MenuItem::Predict(DiseaseModel::Diabetes),
    MenuItem::Predict(DiseaseModel::HeartDisease),
    MenuItem::Predict(DiseaseModel::Parkinsons),
    MenuItem::Assistant,
    MenuItem::Logout,
];

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub selected: usize,
    pub models: Vec<(DiseaseModel, ModelStatus)>,
    pub notice: Option<String>,
}

impl DashboardState {
    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % MENU.len();
    }

    pub fn prev(&mut self) {
        self.selected = self.selected.checked_sub(1).unwrap_or(MENU.len() - 1);
    }

    #[must_use]
    pub fn current(&self) -> MenuItem {
        MENU[self.selected % MENU.len()]
    }

    /// Whether any model failed to load.
    #[must_use]
    pub fn models_missing(&self) -> bool {
        self.models.iter().any(|(_, s)| !s.is_ready())
    }
}

pub fn render_dashboard(f: &mut Frame, area: Rect, state: &DashboardState, user: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    render_header(f, chunks[0], "MediPredict Dashboard", "Secure Medical Screening", user);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(32), Constraint::Min(0)])
        .margin(1)
        .split(chunks[1]);

    render_menu(f, body[0], state);
    render_overview(f, body[1], state, user);

    render_footer(
        f,
        chunks[2],
        &[
            ("↑↓", "Navigate"),
            ("Enter", "Open"),
            ("1-6", "Jump"),
            ("Q", "Quit"),
        ],
        state.notice.as_deref(),
    );
}

fn render_menu(f: &mut Frame, area: Rect, state: &DashboardState) {
    let items: Vec<ListItem> = MENU
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let style = if i == state.selected {
                MedicalTheme::selected()
            } else {
                MedicalTheme::text()
            };
            ListItem::new(Line::from(Span::styled(
                format!(" {}  {}", i + 1, item.label()),
                style,
            )))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(Span::styled(" Navigate ", MedicalTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border_focused()),
    );
    f.render_widget(list, area);
}

fn render_overview(f: &mut Frame, area: Rect, state: &DashboardState, user: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(state.models.len() as u16 + 2),
            Constraint::Min(0),
        ])
        .split(area);

    let welcome = Paragraph::new(vec![
        Line::from(Span::styled(format!("Welcome back, {user}."), MedicalTheme::title())),
        Line::from(Span::styled(
            "Select a module from the menu to begin analysis.",
            MedicalTheme::text_secondary(),
        )),
    ])
    .block(Block::default().borders(Borders::NONE));
    f.render_widget(welcome, chunks[0]);

    let status_lines: Vec<Line> = state.models.iter().map(format_status_item).collect();
    let status = Paragraph::new(status_lines).block(
        Block::default()
            .title(Span::styled(" Prediction Models ", MedicalTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );
    f.render_widget(status, chunks[1]);

    let mut notes = Vec::new();
    if state.models_missing() {
        notes.push(Line::from(Span::styled(
            "⚠ Model files not found. Please check your file paths.",
            MedicalTheme::warning(),
        )));
    }
    notes.push(Line::from(Span::styled(
        "Update: The Symptom Checker includes Emergency Triage logic.",
        MedicalTheme::info(),
    )));
    f.render_widget(Paragraph::new(notes).wrap(Wrap { trim: true }), chunks[2]);
}

fn format_status_item((model, status): &(DiseaseModel, ModelStatus)) -> Line<'static> {
    let label = Span::styled(format!(" {:<22}", model.title()), MedicalTheme::text());
    match status {
        ModelStatus::Ready { feature_count } => Line::from(vec![
            label,
            Span::styled("Active", MedicalTheme::success()),
            Span::styled(format!("  ({feature_count} features)"), MedicalTheme::text_muted()),
        ]),
        ModelStatus::Unavailable(reason) => Line::from(vec![
            label,
            Span::styled("Unavailable", MedicalTheme::danger()),
            Span::styled(format!("  {reason}"), MedicalTheme::text_muted()),
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_wraps() {
        let mut state = DashboardState::default();
        state.prev();
        assert_eq!(state.current(), MenuItem::Logout);
        state.next();
        assert_eq!(state.current(), MenuItem::SymptomChecker);
    }

    #[test]
    fn test_models_missing() {
        let mut state = DashboardState {
            models: vec![(DiseaseModel::Diabetes, ModelStatus::Ready { feature_count: 8 })],
            ..DashboardState::default()
        };
        assert!(!state.models_missing());

        state
            .models
            .push((DiseaseModel::Parkinsons, ModelStatus::Unavailable("not found".into())));
        assert!(state.models_missing());
    }
}

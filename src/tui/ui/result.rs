//! Prediction progress and result view.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::domain::{DiseaseModel, Prediction};
use crate::tui::styles::MedicalTheme;

use super::{render_footer, render_header};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum PredictionState {
    #[default]
    Idle,
    Validating {
        model: DiseaseModel,
        progress: f64,
    },
    Running {
        model: DiseaseModel,
        progress: f64,
    },
    Complete {
        prediction: Prediction,
        /// Legacy RPDE/DFA constants stood in for blank fields
        used_placeholders: bool,
    },
    Error {
        model: DiseaseModel,
        message: String,
    },
}

impl PredictionState {
    #[must_use]
    pub fn model(&self) -> Option<DiseaseModel> {
        match self {
            Self::Idle => None,
            Self::Validating { model, .. }
            | Self::Running { model, .. }
            | Self::Error { model, .. } => Some(*model),
            Self::Complete { prediction, .. } => Some(prediction.model),
        }
    }

    #[must_use]
    pub fn progress(&self) -> Option<f64> {
        match self {
            Self::Validating { progress, .. } | Self::Running { progress, .. } => Some(*progress),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Complete { .. } | Self::Error { .. })
    }
}

fn spinner_text(model: DiseaseModel) -> &'static str {
    match model {
        DiseaseModel::Diabetes => "Processing...",
        DiseaseModel::HeartDisease => "Analyzing Cardiovascular Data...",
        DiseaseModel::Parkinsons => "Processing Vocal Biomarkers...",
    }
}

pub fn render_prediction(f: &mut Frame, area: Rect, state: &PredictionState, user: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let title = state
        .model()
        .map_or("Prediction".to_string(), |m| format!("{} Prediction", m.title()));
    render_header(f, chunks[0], &title, "Model Result", user);

    match state {
        PredictionState::Idle => {}
        PredictionState::Validating { model, progress } => {
            render_progress(f, chunks[1], "Validating input", *progress, spinner_text(*model));
        }
        PredictionState::Running { model, progress } => {
            render_progress(f, chunks[1], "Running model", *progress, spinner_text(*model));
        }
        PredictionState::Complete {
            prediction,
            used_placeholders,
        } => render_result(f, chunks[1], prediction, *used_placeholders),
        PredictionState::Error { message, .. } => render_error(f, chunks[1], message),
    }

    let hints: &[(&str, &str)] = match state {
        PredictionState::Complete { .. } => &[("Enter", "Dashboard"), ("N", "New Check")],
        PredictionState::Error { .. } => &[("Enter", "Edit Input"), ("Esc", "Dashboard")],
        _ => &[("Ctrl+Q", "Quit")],
    };
    render_footer(f, chunks[2], hints, None);
}

fn render_progress(f: &mut Frame, area: Rect, stage: &str, progress: f64, description: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .margin(2)
        .split(area);

    let stage_text = Paragraph::new(Line::from(vec![
        Span::styled("Stage: ", MedicalTheme::text_secondary()),
        Span::styled(stage.to_string(), MedicalTheme::focused()),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(stage_text, chunks[0]);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .gauge_style(MedicalTheme::info())
        .ratio(progress.clamp(0.0, 1.0))
        .label(format!("{:.0}%", progress * 100.0));
    f.render_widget(gauge, chunks[1]);

    let desc = Paragraph::new(Line::from(Span::styled(
        description.to_string(),
        MedicalTheme::text_muted(),
    )))
    .alignment(Alignment::Center);
    f.render_widget(desc, chunks[2]);
}

fn render_result(f: &mut Frame, area: Rect, prediction: &Prediction, used_placeholders: bool) {
    let style = MedicalTheme::prediction(prediction.is_positive());
    let block = Block::default()
        .title(Span::styled(" Result ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(style.remove_modifier(Modifier::BOLD));

    let marker = if prediction.is_positive() { "!" } else { "OK" };
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!("{marker} {}", prediction.headline()), style)),
        Line::from(""),
        Line::from(Span::styled(prediction.advice(), MedicalTheme::text())),
    ];

    if used_placeholders {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "RPDE/DFA were left blank; fixed legacy values were used. Treat this result with extra caution.",
            MedicalTheme::warning(),
        )));
    }

    let p = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    f.render_widget(p, area);
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("! Error", MedicalTheme::danger())),
        Line::from(""),
        Line::from(Span::styled(message.to_string(), MedicalTheme::text())),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::danger()),
    );

    f.render_widget(content, area);
}

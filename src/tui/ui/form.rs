//! Clinical data entry form, one layout for all three models.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::{field_specs, ClinicalInput, DiseaseModel, FieldSpec};
use crate::tui::styles::MedicalTheme;

use super::{render_footer, render_header};

#[derive(Debug, Clone)]
pub struct FormField {
    pub spec: FieldSpec,
    pub value: String,
}

pub struct ClinicalFormState {
    pub model: DiseaseModel,
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    pub error_message: Option<String>,
}

impl ClinicalFormState {
    #[must_use]
    pub fn new(model: DiseaseModel) -> Self {
        Self {
            model,
            fields: field_specs(model)
                .iter()
                .map(|spec| FormField {
                    spec: *spec,
                    value: String::new(),
                })
                .collect(),
            selected_field: 0,
            error_message: None,
        }
    }

    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    pub fn input_char(&mut self, c: char) {
        if c.is_ascii_digit() || c == '.' || c == '-' {
            self.fields[self.selected_field].value.push(c);
            self.error_message = None;
        }
    }

    pub fn delete_char(&mut self) {
        self.fields[self.selected_field].value.pop();
    }

    pub fn clear_field(&mut self) {
        self.fields[self.selected_field].value.clear();
    }

    /// Wipe typed values once they have been handed to the worker.
    pub fn clear_sensitive(&mut self) {
        for field in &mut self.fields {
            field.value.zeroize();
        }
        self.error_message = None;
        self.selected_field = 0;
    }

    /// Parse the typed values into a typed input. Blank optional fields become
    /// `None`; bounds are checked separately by `ClinicalInput::validate`.
    ///
    /// # Errors
    /// Names the first field that is blank-but-required or not a number.
    pub fn to_input(&self) -> Result<ClinicalInput, String> {
        let values = self
            .fields
            .iter()
            .map(|field| {
                let raw = field.value.trim();
                if raw.is_empty() {
                    return if field.spec.optional {
                        Ok(None)
                    } else {
                        Err(format!("{}: Required", field.spec.label))
                    };
                }
                raw.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .map(Some)
                    .ok_or_else(|| format!("{}: Invalid number", field.spec.label))
            })
            .collect::<Result<Vec<_>, _>>()?;

        ClinicalInput::from_values(self.model, &values)
    }

    /// Fill the form with a plausible record from the public training sets.
    pub fn load_sample_data(&mut self) {
        let sample: &[&str] = match self.model {
            DiseaseModel::Diabetes => &["6", "148", "72", "35", "0", "33.6", "0.627", "50"],
            DiseaseModel::HeartDisease => &[
                "63", "1", "3", "145", "233", "1", "0", "150", "0", "2.3", "0", "0", "1",
            ],
            DiseaseModel::Parkinsons => &[
                "119.992", "157.302", "74.997", "0.00784", "0.00007", "0.0037", "0.00554",
                "0.01109", "0.04374", "0.426", "0.02182", "0.0313", "0.02971", "0.06545",
                "0.02211", "21.033", "0.414783", "0.815285", "-4.813031", "0.266482",
                "2.301442", "0.284654",
            ],
        };
        for (field, value) in self.fields.iter_mut().zip(sample) {
            field.value = (*value).to_string();
        }
        self.error_message = None;
    }
}

fn subtitle(model: DiseaseModel) -> &'static str {
    match model {
        DiseaseModel::Diabetes => "Enter clinical data to assess Type 2 Diabetes risk",
        DiseaseModel::HeartDisease => "Cardiovascular risk assessment based on clinical metrics",
        DiseaseModel::Parkinsons => "Neural assessment using biomedical voice measurements",
    }
}

pub fn render_clinical_form(f: &mut Frame, area: Rect, state: &ClinicalFormState, user: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    render_header(
        f,
        chunks[0],
        &format!("{} Risk Prediction", state.model.title()),
        subtitle(state.model),
        user,
    );

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(chunks[1]);

    let mid = state.fields.len().div_ceil(2);
    render_field_column(f, columns[0], &state.fields[..mid], 0, state.selected_field);
    render_field_column(f, columns[1], &state.fields[mid..], mid, state.selected_field);

    render_footer(
        f,
        chunks[2],
        &[
            ("↑↓", "Navigate"),
            ("Enter", "Analyze"),
            ("S", "Sample Data"),
            ("Del", "Clear Field"),
            ("Esc", "Back"),
        ],
        state.error_message.as_deref(),
    );
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FormField],
    offset: usize,
    selected: usize,
) {
    // Bordered boxes when they fit, one line per field otherwise.
    let boxed = area.height as usize >= fields.len() * 3;
    let field_height = if boxed { 3 } else { 1 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            fields
                .iter()
                .map(|_| Constraint::Length(field_height))
                .chain(std::iter::once(Constraint::Min(0))),
        )
        .split(area);

    for (i, field) in fields.iter().enumerate() {
        let is_selected = offset + i == selected;
        let title_style = if is_selected {
            MedicalTheme::focused()
        } else {
            MedicalTheme::text_secondary()
        };

        let value = if field.value.is_empty() {
            Span::styled(field.spec.hint, MedicalTheme::text_muted())
        } else {
            Span::styled(field.value.as_str(), MedicalTheme::text())
        };
        let cursor = if is_selected {
            Span::styled("▌", MedicalTheme::cursor())
        } else {
            Span::raw("")
        };

        if boxed {
            let block = Block::default()
                .title(Span::styled(format!(" {} ", field.spec.label), title_style))
                .borders(Borders::ALL)
                .border_style(if is_selected {
                    MedicalTheme::border_focused()
                } else {
                    MedicalTheme::border()
                });
            let content = Paragraph::new(Line::from(vec![Span::raw(" "), value, cursor]))
                .block(block);
            f.render_widget(content, chunks[i]);
        } else {
            let line = Line::from(vec![
                Span::styled(format!(" {:<18}", field.spec.label), title_style),
                value,
                cursor,
            ]);
            f.render_widget(Paragraph::new(line), chunks[i]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_follow_model_schema() {
        for model in DiseaseModel::ALL {
            let state = ClinicalFormState::new(model);
            assert_eq!(state.fields.len(), model.feature_count());
        }
    }

    #[test]
    fn test_sample_data_is_valid() {
        for model in DiseaseModel::ALL {
            let mut state = ClinicalFormState::new(model);
            state.load_sample_data();
            let input = state.to_input().expect("Sample should parse");
            assert_eq!(input.model(), model);
            assert!(input.validate().is_ok(), "{model} sample out of bounds");
            assert!(!input.uses_placeholders());
        }
    }

    #[test]
    fn test_required_and_invalid_fields() {
        let mut state = ClinicalFormState::new(DiseaseModel::Diabetes);
        assert_eq!(state.to_input().expect_err("blank"), "Pregnancies: Required");

        state.load_sample_data();
        state.fields[1].value = "1.2.3".into();
        assert_eq!(state.to_input().expect_err("bad"), "Glucose: Invalid number");
    }

    #[test]
    fn test_blank_optional_parkinsons_fields() {
        let mut state = ClinicalFormState::new(DiseaseModel::Parkinsons);
        state.load_sample_data();
        state.fields[16].value.clear();
        state.fields[17].value.clear();

        let input = state.to_input().expect("Should parse");
        assert!(input.uses_placeholders());
    }

    #[test]
    fn test_input_filter_and_clear() {
        let mut state = ClinicalFormState::new(DiseaseModel::HeartDisease);
        for c in "6a3".chars() {
            state.input_char(c);
        }
        assert_eq!(state.fields[0].value, "63");

        state.prev_field();
        assert_eq!(state.selected_field, 12);

        state.clear_sensitive();
        assert!(state.fields.iter().all(|f| f.value.is_empty()));
        assert_eq!(state.selected_field, 0);
    }
}

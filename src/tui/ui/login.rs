//! Login and account creation tabs.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};
use zeroize::Zeroize;

use crate::tui::styles::{MedicalTheme, LOGO};

use super::render_footer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthTab {
    #[default]
    Login,
    SignUp,
}

impl AuthTab {
    fn index(self) -> usize {
        match self {
            Self::Login => 0,
            Self::SignUp => 1,
        }
    }
}

/// Feedback shown under the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Warning(String),
    Error(String),
}

/// Single-line text input.
#[derive(Debug, Clone)]
pub struct TextField {
    pub label: &'static str,
    pub value: String,
    pub masked: bool,
}

impl TextField {
    fn plain(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            masked: false,
        }
    }

    fn secret(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            masked: true,
        }
    }

    /// What the user sees: stars for password fields.
    #[must_use]
    pub fn display(&self) -> String {
        if self.masked {
            "*".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}

pub struct LoginState {
    pub tab: AuthTab,
    pub fields: Vec<TextField>,
    pub selected_field: usize,
    pub notice: Option<Notice>,
}

impl Default for LoginState {
    fn default() -> Self {
        Self::for_tab(AuthTab::Login)
    }
}

impl LoginState {
    fn for_tab(tab: AuthTab) -> Self {
        let fields = match tab {
            AuthTab::Login => vec![TextField::plain("Username"), TextField::secret("Password")],
            AuthTab::SignUp => vec![
                TextField::plain("Full Name"),
                TextField::plain("Choose a Username"),
                TextField::secret("Choose a Password"),
                TextField::secret("Confirm Password"),
            ],
        };
        Self {
            tab,
            fields,
            selected_field: 0,
            notice: None,
        }
    }

    /// Flip between the two tabs. Typed passwords are wiped; the notice is kept
    /// so "Account created" stays visible on the login tab.
    pub fn switch_tab(&mut self) {
        let next = match self.tab {
            AuthTab::Login => AuthTab::SignUp,
            AuthTab::SignUp => AuthTab::Login,
        };
        self.clear_sensitive();
        let notice = self.notice.take();
        *self = Self::for_tab(next);
        self.notice = notice;
    }

    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    pub fn prev_field(&mut self) {
        self.selected_field = self
            .selected_field
            .checked_sub(1)
            .unwrap_or(self.fields.len() - 1);
    }

    pub fn input_char(&mut self, c: char) {
        if !c.is_control() {
            self.fields[self.selected_field].value.push(c);
        }
    }

    pub fn delete_char(&mut self) {
        self.fields[self.selected_field].value.pop();
    }

    #[must_use]
    pub fn value(&self, index: usize) -> &str {
        self.fields.get(index).map_or("", |f| f.value.as_str())
    }

    /// Zero and clear every password field.
    pub fn clear_sensitive(&mut self) {
        for field in self.fields.iter_mut().filter(|f| f.masked) {
            field.value.zeroize();
        }
    }
}

pub fn render_login(f: &mut Frame, area: Rect, state: &LoginState) {
    let outer = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(50),
            Constraint::Percentage(25),
        ])
        .split(area);

    let field_rows = state.fields.len() as u16 * 3;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),          // Logo
            Constraint::Length(2),          // Subtitle
            Constraint::Length(3),          // Tabs
            Constraint::Length(field_rows), // Fields
            Constraint::Length(2),          // Notice
            Constraint::Min(0),
            Constraint::Length(3), // Footer
        ])
        .split(outer[1]);

    let logo = Paragraph::new(LOGO.trim_matches('\n'))
        .style(MedicalTheme::subtitle())
        .alignment(Alignment::Center);
    f.render_widget(logo, chunks[0]);

    let subtitle = Paragraph::new(Line::from(Span::styled(
        "Secure Access Portal",
        MedicalTheme::text_secondary(),
    )))
    .alignment(Alignment::Center);
    f.render_widget(subtitle, chunks[1]);

    let tabs = Tabs::new(vec!["Login", "Create Account"])
        .select(state.tab.index())
        .style(MedicalTheme::text_secondary())
        .highlight_style(MedicalTheme::selected())
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(MedicalTheme::border()),
        );
    f.render_widget(tabs, chunks[2]);

    render_fields(f, chunks[3], state);

    if let Some(notice) = &state.notice {
        let (text, style) = match notice {
            Notice::Success(t) => (t, MedicalTheme::success()),
            Notice::Warning(t) => (t, MedicalTheme::warning()),
            Notice::Error(t) => (t, MedicalTheme::danger()),
        };
        let p = Paragraph::new(Line::from(Span::styled(text.clone(), style)))
            .alignment(Alignment::Center);
        f.render_widget(p, chunks[4]);
    }

    let submit = match state.tab {
        AuthTab::Login => "Log In",
        AuthTab::SignUp => "Create Account",
    };
    render_footer(
        f,
        chunks[6],
        &[
            ("←→", "Switch Tab"),
            ("↑↓/Tab", "Field"),
            ("Enter", submit),
            ("Ctrl+Q", "Quit"),
        ],
        None,
    );
}

fn render_fields(f: &mut Frame, area: Rect, state: &LoginState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(state.fields.iter().map(|_| Constraint::Length(3)))
        .split(area);

    for (i, field) in state.fields.iter().enumerate() {
        let is_selected = i == state.selected_field;
        let (border_style, title_style) = if is_selected {
            (MedicalTheme::border_focused(), MedicalTheme::focused())
        } else {
            (MedicalTheme::border(), MedicalTheme::text_secondary())
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.label), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let mut spans = vec![Span::raw(" "), Span::styled(field.display(), MedicalTheme::text())];
        if is_selected {
            spans.push(Span::styled("▌", MedicalTheme::cursor()));
        }

        f.render_widget(Paragraph::new(Line::from(spans)).block(block), rows[i]);
    }
}

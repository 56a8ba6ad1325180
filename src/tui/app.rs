//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation, gated on an authenticated session
//! - Input event handling
//! - Service integration
//! - Predictions via a background worker

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::linear_model::ModelLoader;
use crate::adapters::AnyCredentialStore;
use crate::application::{AuthError, AuthService, PredictionService, TriageService};
use crate::config::AppConfig;
use crate::domain::faq::QUICK_QUESTIONS;
use crate::domain::{DiseaseModel, Session};

use super::ui::{
    assistant::{render_assistant, AssistantState},
    dashboard::{render_dashboard, DashboardState, MenuItem, MENU},
    form::{render_clinical_form, ClinicalFormState},
    login::{render_login, AuthTab, LoginState, Notice},
    render_disclaimer,
    result::{render_prediction, PredictionState},
    symptoms::{render_symptom_checker, SymptomState},
};
use super::worker::{PredictionProgress, PredictionWorker, PredictionWorkerHandle};

/// Current screen/view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Dashboard,
    SymptomChecker,
    ClinicalForm,
    Prediction,
    Assistant,
}

/// Main application state
pub struct App {
    screen: Screen,
    should_quit: bool,

    /// Authentication state and chat transcript of the current user
    session: Session,

    auth: AuthService<AnyCredentialStore>,
    triage: TriageService,
    predictions: Arc<PredictionService>,

    /// Delay the worker adds around each prediction
    pacing: Duration,

    login_state: LoginState,
    dashboard_state: DashboardState,
    symptom_state: SymptomState,
    form_state: ClinicalFormState,
    prediction_state: PredictionState,
    assistant_state: AssistantState,

    pending_worker: Option<PredictionWorkerHandle>,

    /// When the current prediction phase started (for the progress bar)
    phase_started_at: Option<Instant>,
}

impl App {
    /// Build the application from configuration: opens the credential store and
    /// loads whatever models the model directory provides.
    ///
    /// # Errors
    /// Returns error if the credential store cannot be opened. Missing models
    /// only disable their tool.
    pub fn new(config: &AppConfig) -> crate::Result<Self> {
        let store = Arc::new(AnyCredentialStore::open(&config.user_db)?);

        let loader = ModelLoader::new(&config.model_dir, config.require_signed_models)
            .with_pubkey_file(config.signing_pubkey_file.clone());
        let predictions = Arc::new(PredictionService::from_loader(&loader));

        Ok(Self::with_dependencies(
            AuthService::new(store),
            TriageService::new(),
            predictions,
            config.pacing,
        ))
    }

    /// Create the application from prebuilt services.
    #[must_use]
    pub fn with_dependencies(
        auth: AuthService<AnyCredentialStore>,
        triage: TriageService,
        predictions: Arc<PredictionService>,
        pacing: Duration,
    ) -> Self {
        let symptom_state = SymptomState::new(triage.all_symptoms());
        Self {
            screen: Screen::Login,
            should_quit: false,
            session: Session::new(),
            auth,
            triage,
            predictions,
            pacing,
            login_state: LoginState::default(),
            dashboard_state: DashboardState::default(),
            symptom_state,
            form_state: ClinicalFormState::new(DiseaseModel::Diabetes),
            prediction_state: PredictionState::default(),
            assistant_state: AssistantState::default(),
            pending_worker: None,
            phase_started_at: None,
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            self.poll_worker();
            self.tick_progress();

            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(f.area());

                let content_area = chunks[0];
                let user = self.session.display_name();

                match self.screen {
                    Screen::Login => render_login(f, content_area, &self.login_state),
                    Screen::Dashboard => {
                        render_dashboard(f, content_area, &self.dashboard_state, user);
                    }
                    Screen::SymptomChecker => {
                        render_symptom_checker(f, content_area, &self.symptom_state, user);
                    }
                    Screen::ClinicalForm => {
                        render_clinical_form(f, content_area, &self.form_state, user);
                    }
                    Screen::Prediction => {
                        render_prediction(f, content_area, &self.prediction_state, user);
                    }
                    Screen::Assistant => render_assistant(
                        f,
                        content_area,
                        &self.assistant_state,
                        self.session.transcript(),
                        user,
                    ),
                }

                render_disclaimer(f, chunks[1]);
            })?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Drain progress messages from the background worker.
    fn poll_worker(&mut self) {
        while let Some(progress) = self.pending_worker.as_ref().and_then(|w| w.try_recv()) {
            let Some(model) = self.prediction_state.model() else {
                break;
            };
            let current = self.prediction_state.progress().unwrap_or(0.0);

            match progress {
                PredictionProgress::Validating => {
                    self.prediction_state = PredictionState::Validating {
                        model,
                        progress: current,
                    };
                }
                PredictionProgress::Running => {
                    self.prediction_state = PredictionState::Running {
                        model,
                        progress: current.max(0.4),
                    };
                    self.phase_started_at = Some(Instant::now());
                }
                PredictionProgress::Complete(prediction, used_placeholders) => {
                    self.prediction_state = PredictionState::Complete {
                        prediction,
                        used_placeholders,
                    };
                    self.finish_worker();
                    break;
                }
                PredictionProgress::Error(message) => {
                    self.prediction_state = PredictionState::Error { model, message };
                    self.finish_worker();
                    break;
                }
            }
        }
    }

    fn finish_worker(&mut self) {
        self.pending_worker = None;
        self.phase_started_at = None;
    }

    /// Move the progress bar toward the current phase's ceiling.
    fn tick_progress(&mut self) {
        if self.prediction_state.is_finished() {
            self.phase_started_at = None;
        }
        let Some(started_at) = self.phase_started_at else {
            return;
        };
        let elapsed = started_at.elapsed().as_secs_f64();

        // Time constant follows the configured pacing so the bar fills
        // at roughly the rate the worker finishes.
        let tau = self.pacing.as_secs_f64().max(0.2) / 2.0;
        let k = 1.0 - (-elapsed / tau).exp();

        self.prediction_state = match self.prediction_state.clone() {
            PredictionState::Validating { model, progress } => PredictionState::Validating {
                model,
                progress: progress.max(0.4 * k),
            },
            PredictionState::Running { model, progress } => PredictionState::Running {
                model,
                progress: progress.max(0.4 + 0.55 * k),
            },
            other => other,
        };
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.screen != Screen::Login && !self.session.is_authenticated() {
            self.screen = Screen::Login;
        }

        match self.screen {
            Screen::Login => self.handle_login_key(key),
            Screen::Dashboard => self.handle_dashboard_key(key),
            Screen::SymptomChecker => self.handle_symptom_key(key),
            Screen::ClinicalForm => self.handle_form_key(key),
            Screen::Prediction => self.handle_prediction_key(key),
            Screen::Assistant => self.handle_assistant_key(key, modifiers),
        }
    }

    fn handle_login_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Left | KeyCode::Right => self.login_state.switch_tab(),
            KeyCode::Down | KeyCode::Tab => self.login_state.next_field(),
            KeyCode::Up | KeyCode::BackTab => self.login_state.prev_field(),
            KeyCode::Backspace => self.login_state.delete_char(),
            KeyCode::Enter => match self.login_state.tab {
                AuthTab::Login => self.submit_login(),
                AuthTab::SignUp => self.submit_signup(),
            },
            KeyCode::Char(c) => self.login_state.input_char(c),
            _ => {}
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyCode) {
        self.dashboard_state.notice = None;
        match key {
            KeyCode::Up => self.dashboard_state.prev(),
            KeyCode::Down | KeyCode::Tab => self.dashboard_state.next(),
            KeyCode::Enter => self.open_menu_item(self.dashboard_state.current()),
            KeyCode::Char(c @ '1'..='6') => {
                let index = (c as usize) - ('1' as usize);
                self.dashboard_state.selected = index;
                self.open_menu_item(MENU[index]);
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_symptom_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                if self.symptom_state.filter.is_empty() {
                    self.go_to_dashboard();
                } else {
                    self.symptom_state.filter.clear();
                    self.symptom_state.cursor = 0;
                }
            }
            KeyCode::Up => self.symptom_state.prev(),
            KeyCode::Down => self.symptom_state.next(),
            KeyCode::Insert => self.symptom_state.toggle(),
            KeyCode::Char(' ') if self.symptom_state.filter.is_empty() => {
                self.symptom_state.toggle();
            }
            KeyCode::Char(c) => self.symptom_state.push_filter(c),
            KeyCode::Backspace => self.symptom_state.pop_filter(),
            KeyCode::Delete => self.symptom_state.clear(),
            KeyCode::Enter => self.analyze_symptoms(),
            KeyCode::Tab => {
                if let Some(model) = self.symptom_state.related {
                    self.open_form(model);
                }
            }
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.go_to_dashboard(),
            KeyCode::Up | KeyCode::BackTab => self.form_state.prev_field(),
            KeyCode::Down | KeyCode::Tab => self.form_state.next_field(),
            KeyCode::Char('s') | KeyCode::Char('S') => self.form_state.load_sample_data(),
            KeyCode::Char(c) => self.form_state.input_char(c),
            KeyCode::Backspace => self.form_state.delete_char(),
            KeyCode::Delete => self.form_state.clear_field(),
            KeyCode::Enter => self.submit_form(),
            _ => {}
        }
    }

    fn handle_prediction_key(&mut self, key: KeyCode) {
        match &self.prediction_state {
            PredictionState::Complete { prediction, .. } => match key {
                KeyCode::Enter | KeyCode::Esc => self.go_to_dashboard(),
                KeyCode::Char('n') | KeyCode::Char('N') => self.open_form(prediction.model),
                _ => {}
            },
            PredictionState::Error { .. } => match key {
                KeyCode::Enter => self.screen = Screen::ClinicalForm,
                KeyCode::Esc => self.go_to_dashboard(),
                _ => {}
            },
            _ => {}
        }
    }

    fn handle_assistant_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        match key {
            KeyCode::Esc => self.go_to_dashboard(),
            KeyCode::Char('l') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.session.clear_transcript();
            }
            KeyCode::F(n @ 1..=4) => {
                let (_, question) = QUICK_QUESTIONS[usize::from(n - 1)];
                self.session.ask(question);
            }
            KeyCode::Enter => {
                let question = self.assistant_state.take_input();
                self.session.ask(&question);
            }
            KeyCode::Backspace => self.assistant_state.delete_char(),
            KeyCode::Char(c) => self.assistant_state.input_char(c),
            _ => {}
        }
    }

    fn submit_login(&mut self) {
        let result = self.auth.login(
            &mut self.session,
            self.login_state.value(0),
            self.login_state.value(1),
        );
        match result {
            Ok(_) => {
                self.login_state.clear_sensitive();
                self.login_state = LoginState::default();
                self.go_to_dashboard();
            }
            Err(e) => {
                self.login_state.clear_sensitive();
                self.login_state.notice = Some(Notice::Error(e.to_string()));
            }
        }
    }

    fn submit_signup(&mut self) {
        let result = self.auth.register(
            self.login_state.value(1),
            self.login_state.value(0),
            self.login_state.value(2),
            self.login_state.value(3),
        );
        match result {
            Ok(()) => {
                self.login_state.notice = Some(Notice::Success(
                    "Account created successfully! You can now Login.".to_string(),
                ));
                self.login_state.switch_tab();
            }
            Err(
                e @ (AuthError::DuplicateUser | AuthError::PasswordMismatch | AuthError::MissingField),
            ) => {
                self.login_state.notice = Some(Notice::Warning(e.to_string()));
            }
            Err(e) => {
                tracing::error!("Signup failed: {}", e);
                self.login_state.notice = Some(Notice::Error(e.to_string()));
            }
        }
    }

    fn open_menu_item(&mut self, item: MenuItem) {
        match item {
            MenuItem::SymptomChecker => {
                self.symptom_state = SymptomState::new(self.triage.all_symptoms());
                self.screen = Screen::SymptomChecker;
            }
            MenuItem::Predict(model) => self.open_form(model),
            MenuItem::Assistant => self.screen = Screen::Assistant,
            MenuItem::Logout => self.logout(),
        }
    }

    /// Open a clinical form, or explain on the dashboard why it is disabled.
    fn open_form(&mut self, model: DiseaseModel) {
        if !self.predictions.is_available(model) {
            let reason = self
                .predictions
                .status()
                .into_iter()
                .find(|(m, _)| *m == model)
                .map(|(_, status)| status);
            self.go_to_dashboard();
            self.dashboard_state.notice = Some(match reason {
                Some(crate::application::ModelStatus::Unavailable(why)) => {
                    format!("{} model unavailable: {why}", model.title())
                }
                _ => format!("{} model unavailable", model.title()),
            });
            return;
        }
        self.form_state = ClinicalFormState::new(model);
        self.screen = Screen::ClinicalForm;
    }

    fn analyze_symptoms(&mut self) {
        match self.triage.analyze(&self.symptom_state.chosen) {
            Ok(report) => {
                self.symptom_state.related = self.triage.related_model(&report);
                self.symptom_state.report = Some(report);
                self.symptom_state.warning = None;
            }
            Err(e) => {
                self.symptom_state.report = None;
                self.symptom_state.related = None;
                self.symptom_state.warning = Some(e.to_string());
            }
        }
    }

    fn submit_form(&mut self) {
        let input = match self.form_state.to_input() {
            Ok(input) => input,
            Err(e) => {
                self.form_state.error_message = Some(e);
                return;
            }
        };
        if let Err(errors) = input.validate() {
            self.form_state.error_message = Some(errors.join("; "));
            return;
        }

        self.prediction_state = PredictionState::Validating {
            model: input.model(),
            progress: 0.0,
        };
        self.phase_started_at = Some(Instant::now());
        self.screen = Screen::Prediction;

        let worker = PredictionWorker::spawn(self.predictions.clone(), input, self.pacing);
        self.pending_worker = Some(worker);

        self.form_state.clear_sensitive();
    }

    fn go_to_dashboard(&mut self) {
        self.dashboard_state.models = self.predictions.status();
        self.screen = Screen::Dashboard;
    }

    /// End the session and wipe every per-user screen.
    fn logout(&mut self) {
        self.auth.logout(&mut self.session);
        self.form_state.clear_sensitive();
        self.symptom_state = SymptomState::new(self.triage.all_symptoms());
        self.prediction_state = PredictionState::default();
        self.assistant_state = AssistantState::default();
        self.dashboard_state = DashboardState::default();
        self.finish_worker();
        self.login_state = LoginState::default();
        self.screen = Screen::Login;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::service_with_all;
    use crate::domain::Role;

    fn app_in(dir: &tempfile::TempDir, predictions: PredictionService) -> App {
        let store = AnyCredentialStore::open(dir.path().join("user_db.json"))
            .expect("Should open store");
        App::with_dependencies(
            AuthService::new(Arc::new(store)),
            TriageService::new(),
            Arc::new(predictions),
            Duration::ZERO,
        )
    }

    fn press(app: &mut App, key: KeyCode) {
        app.handle_key(key, KeyModifiers::NONE);
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn sign_up_and_login(app: &mut App) {
        press(app, KeyCode::Right);
        type_str(app, "Ishita");
        press(app, KeyCode::Tab);
        type_str(app, "ishita");
        press(app, KeyCode::Tab);
        type_str(app, "pa55word");
        press(app, KeyCode::Tab);
        type_str(app, "pa55word");
        press(app, KeyCode::Enter);
        assert_eq!(app.login_state.tab, AuthTab::Login);

        type_str(app, "ishita");
        press(app, KeyCode::Tab);
        type_str(app, "pa55word");
        press(app, KeyCode::Enter);
    }

    fn wait_for_prediction(app: &mut App) {
        for _ in 0..200 {
            app.poll_worker();
            if app.prediction_state.is_finished() {
                return;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        panic!("Prediction did not finish");
    }

    #[test]
    fn test_starts_at_login() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(&dir, service_with_all(1));
        assert_eq!(app.screen, Screen::Login);

        app.screen = Screen::Dashboard;
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.screen, Screen::Login);
    }

    #[test]
    fn test_signup_then_login() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(&dir, service_with_all(1));

        sign_up_and_login(&mut app);

        assert_eq!(app.screen, Screen::Dashboard);
        assert!(app.session.is_authenticated());
        assert_eq!(app.session.display_name(), "Ishita");
        assert_eq!(app.dashboard_state.models.len(), 3);
    }

    #[test]
    fn test_unknown_user_and_mismatch() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(&dir, service_with_all(1));

        type_str(&mut app, "nobody");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "x");
        press(&mut app, KeyCode::Enter);
        assert_eq!(
            app.login_state.notice,
            Some(Notice::Error("Username not found".into()))
        );
        assert_eq!(app.login_state.value(1), "");

        press(&mut app, KeyCode::Right);
        type_str(&mut app, "A");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "a");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "one");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "two");
        press(&mut app, KeyCode::Enter);
        assert_eq!(
            app.login_state.notice,
            Some(Notice::Warning("Passwords do not match.".into()))
        );
        assert_eq!(app.screen, Screen::Login);
    }

    #[test]
    fn test_symptom_checker_links_to_tool() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(&dir, service_with_all(1));
        sign_up_and_login(&mut app);

        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.screen, Screen::SymptomChecker);

        press(&mut app, KeyCode::Enter);
        assert_eq!(
            app.symptom_state.warning.as_deref(),
            Some("Please select at least one symptom")
        );

        type_str(&mut app, "shak");
        press(&mut app, KeyCode::Insert);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen, Screen::SymptomChecker);
        press(&mut app, KeyCode::Enter);

        let report = app.symptom_state.report.as_ref().expect("Should analyze");
        assert_eq!(
            report.top().map(|t| t.condition),
            Some("Parkinson's Disease")
        );
        assert_eq!(app.symptom_state.related, Some(DiseaseModel::Parkinsons));

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.screen, Screen::ClinicalForm);
        assert_eq!(app.form_state.model, DiseaseModel::Parkinsons);
    }

    #[test]
    fn test_symptom_filter_accepts_spaces() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(&dir, service_with_all(1));
        sign_up_and_login(&mut app);
        press(&mut app, KeyCode::Char('1'));

        type_str(&mut app, "chest pain");
        assert_eq!(app.symptom_state.filter, "chest pain");
        assert!(app.symptom_state.chosen.is_empty());
        assert!(app
            .symptom_state
            .visible()
            .iter()
            .all(|s| s.to_lowercase().contains("chest pain")));

        press(&mut app, KeyCode::Insert);
        assert_eq!(app.symptom_state.chosen.len(), 1);

        // With an empty filter Space still toggles
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.symptom_state.chosen.len(), 2);
    }

    #[test]
    fn test_prediction_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(&dir, service_with_all(1));
        sign_up_and_login(&mut app);

        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.screen, Screen::ClinicalForm);

        press(&mut app, KeyCode::Enter);
        assert_eq!(
            app.form_state.error_message.as_deref(),
            Some("Pregnancies: Required")
        );

        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, Screen::Prediction);
        assert!(app.form_state.fields.iter().all(|f| f.value.is_empty()));

        wait_for_prediction(&mut app);
        match &app.prediction_state {
            PredictionState::Complete { prediction, .. } => {
                assert_eq!(prediction.model, DiseaseModel::Diabetes);
                assert!(prediction.is_positive());
            }
            other => panic!("Expected a result, got {other:?}"),
        }

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.screen, Screen::ClinicalForm);
        assert_eq!(app.form_state.model, DiseaseModel::Diabetes);
    }

    #[test]
    fn test_finished_prediction_stops_progress_clock() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(&dir, service_with_all(1));
        app.prediction_state = PredictionState::Complete {
            prediction: crate::domain::Prediction::new(DiseaseModel::Diabetes, 0),
            used_placeholders: false,
        };
        app.phase_started_at = Some(Instant::now());

        app.tick_progress();
        assert!(app.phase_started_at.is_none());
    }

    #[test]
    fn test_out_of_range_input_stays_on_form() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(&dir, service_with_all(0));
        sign_up_and_login(&mut app);

        press(&mut app, KeyCode::Char('3'));
        press(&mut app, KeyCode::Char('s'));
        app.form_state.fields[12].value = "7".into();
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen, Screen::ClinicalForm);
        let message = app.form_state.error_message.as_deref().expect("Should reject");
        assert!(message.starts_with("Thal"));
    }

    #[test]
    fn test_unavailable_model_stays_on_dashboard() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut predictions = service_with_all(1);
        predictions.mark_unavailable(DiseaseModel::HeartDisease, "heart_disease_model.json not found");
        let mut app = app_in(&dir, predictions);
        sign_up_and_login(&mut app);

        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.screen, Screen::Dashboard);
        let notice = app.dashboard_state.notice.as_deref().expect("Should explain");
        assert!(notice.contains("not found"));
        assert!(app.dashboard_state.models_missing());
    }

    #[test]
    fn test_assistant_and_logout() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(&dir, service_with_all(1));
        sign_up_and_login(&mut app);

        press(&mut app, KeyCode::Char('5'));
        assert_eq!(app.screen, Screen::Assistant);

        press(&mut app, KeyCode::F(2));
        type_str(&mut app, "what is bmi");
        press(&mut app, KeyCode::Enter);
        let transcript = app.session.transcript();
        assert_eq!(transcript.len(), 5);
        assert_eq!(transcript[1].content, "Explain Glucose");
        assert_eq!(transcript[3].role, Role::User);
        assert!(transcript[4].content.starts_with("BMI"));

        app.handle_key(KeyCode::Char('l'), KeyModifiers::CONTROL);
        assert!(app.session.transcript().is_empty());

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('6'));
        assert_eq!(app.screen, Screen::Login);
        assert!(!app.session.is_authenticated());
        assert_eq!(app.session.transcript().len(), 1);
    }
}

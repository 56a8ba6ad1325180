//! TUI module: Terminal User Interface using Ratatui.
//!
//! Screens:
//! - Login and account creation
//! - Dashboard with model status
//! - Symptom checker with emergency triage
//! - Clinical forms for the three prediction models
//! - Health assistant chat

mod app;
mod styles;
mod ui;
mod worker;

pub use app::{App, Screen};
pub use styles::MedicalTheme;
pub use worker::{PredictionProgress, PredictionWorker, PredictionWorkerHandle};

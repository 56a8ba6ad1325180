//! Color palette and preset styles for the terminal UI.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::Severity;

/// Medical theme color palette.
pub struct MedicalTheme;

impl MedicalTheme {
    /// Deep teal (#0D9488)
    pub const PRIMARY: Color = Color::Rgb(13, 148, 136);
    /// Light teal (#2DD4BF)
    pub const PRIMARY_LIGHT: Color = Color::Rgb(45, 212, 191);
    /// Dark teal (#0F766E)
    pub const PRIMARY_DARK: Color = Color::Rgb(15, 118, 110);

    pub const SUCCESS: Color = Color::Rgb(16, 185, 129);
    pub const WARNING: Color = Color::Rgb(251, 191, 36);
    pub const DANGER: Color = Color::Rgb(244, 63, 94);
    pub const INFO: Color = Color::Rgb(59, 130, 246);

    pub const BG_DARK: Color = Color::Rgb(15, 23, 42);

    pub const TEXT_PRIMARY: Color = Color::Rgb(248, 250, 252);
    pub const TEXT_SECONDARY: Color = Color::Rgb(148, 163, 184);
    pub const TEXT_MUTED: Color = Color::Rgb(100, 116, 139);

    #[must_use]
    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn subtitle() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    #[must_use]
    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    #[must_use]
    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    #[must_use]
    pub fn danger() -> Style {
        Style::default().fg(Self::DANGER)
    }

    #[must_use]
    pub fn info() -> Style {
        Style::default().fg(Self::INFO)
    }

    /// Highlighted list row or active tab
    #[must_use]
    pub fn selected() -> Style {
        Style::default()
            .fg(Self::BG_DARK)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn cursor() -> Style {
        Style::default().fg(Self::PRIMARY_LIGHT)
    }

    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Emphasis for a triage severity, bold from High upwards.
    #[must_use]
    pub fn severity(severity: Severity) -> Style {
        let (r, g, b) = severity.color();
        let style = Style::default().fg(Color::Rgb(r, g, b));
        if severity >= Severity::High {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }

    /// Headline style for a classifier result.
    #[must_use]
    pub fn prediction(positive: bool) -> Style {
        let base = if positive {
            Self::danger()
        } else {
            Self::success()
        };
        base.add_modifier(Modifier::BOLD)
    }

    /// Gauge color for a triage confidence in `[0, 1]`.
    #[must_use]
    pub fn confidence(ratio: f64) -> Style {
        if ratio >= 0.75 {
            Self::focused()
        } else if ratio >= 0.5 {
            Self::info()
        } else {
            Self::text_secondary()
        }
    }
}

/// Banner shown above the login form.
pub const LOGO: &str = r"
╔╦╗┌─┐┌┬┐┬╔═╗┬─┐┌─┐┌┬┐┬┌─┐┌┬┐
║║║├┤  │││╠═╝├┬┘├┤  ││││   │
╩ ╩└─┘─┴┘┴╩  ┴└─└─┘─┴┘┴└─┘ ┴
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_colors_follow_domain() {
        assert_eq!(
            MedicalTheme::severity(Severity::Low).fg,
            Some(Color::Rgb(16, 185, 129))
        );
        assert!(MedicalTheme::severity(Severity::Critical)
            .add_modifier
            .contains(Modifier::BOLD));
        assert!(!MedicalTheme::severity(Severity::Medium)
            .add_modifier
            .contains(Modifier::BOLD));
    }

    #[test]
    fn test_prediction_style() {
        assert_eq!(MedicalTheme::prediction(true).fg, Some(MedicalTheme::DANGER));
        assert_eq!(MedicalTheme::prediction(false).fg, Some(MedicalTheme::SUCCESS));
    }
}

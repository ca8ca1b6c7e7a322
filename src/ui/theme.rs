//! Light/dark palette behind global accessor functions
//!
//! The active mode lives in a process-wide cell so widgets can color
//! themselves without threading a theme handle through every render
//! call. The choice is persisted in the preference store under the
//! `theme` key.

use std::sync::RwLock;

use ratatui::style::Color;

use crate::report::{ReportStatus, Severity};
use crate::store::{PreferenceStore, THEME_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    Light,
    #[default]
    Dark,
}

impl ThemeMode {
    pub fn name(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "light" => Some(ThemeMode::Light),
            "dark" => Some(ThemeMode::Dark),
            _ => None,
        }
    }
}

static CURRENT: RwLock<ThemeMode> = RwLock::new(ThemeMode::Dark);

pub fn current_theme() -> ThemeMode {
    CURRENT.read().map(|mode| *mode).unwrap_or_default()
}

pub fn set_theme(mode: ThemeMode) {
    if let Ok(mut current) = CURRENT.write() {
        *current = mode;
    }
}

/// Flip between light and dark; returns the new mode
pub fn toggle_theme() -> ThemeMode {
    let next = match current_theme() {
        ThemeMode::Light => ThemeMode::Dark,
        ThemeMode::Dark => ThemeMode::Light,
    };
    set_theme(next);
    next
}

/// Restore the persisted mode, if any
pub fn init_theme(prefs: &PreferenceStore) {
    match prefs.get(THEME_KEY) {
        Ok(Some(name)) => {
            if let Some(mode) = ThemeMode::from_name(&name) {
                set_theme(mode);
            }
        }
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "Could not load theme preference"),
    }
}

/// Persist the current mode; failure only logs
pub fn persist_theme(prefs: &PreferenceStore) {
    let mode = current_theme();
    if let Err(e) = prefs.set(THEME_KEY, mode.name()) {
        tracing::warn!(error = %e, "Could not persist theme preference");
    }
}

fn dark() -> bool {
    current_theme() == ThemeMode::Dark
}

// --- Palette accessors ---

pub fn bg_base() -> Color {
    if dark() {
        Color::Rgb(0x0F, 0x17, 0x2A)
    } else {
        Color::Rgb(0xF8, 0xFA, 0xFC)
    }
}

pub fn bg_surface() -> Color {
    if dark() {
        Color::Rgb(0x1E, 0x29, 0x3B)
    } else {
        Color::Rgb(0xE2, 0xE8, 0xF0)
    }
}

pub fn text_primary() -> Color {
    if dark() {
        Color::Rgb(0xE2, 0xE8, 0xF0)
    } else {
        Color::Rgb(0x1E, 0x29, 0x3B)
    }
}

pub fn text_muted() -> Color {
    Color::Rgb(0x94, 0xA3, 0xB8)
}

pub fn accent_primary() -> Color {
    if dark() {
        Color::Rgb(0x38, 0xBD, 0xF8)
    } else {
        Color::Rgb(0x02, 0x84, 0xC7)
    }
}

pub fn accent_success() -> Color {
    Color::Rgb(0x22, 0xC5, 0x5E)
}

pub fn accent_warning() -> Color {
    Color::Rgb(0xEA, 0xB3, 0x08)
}

pub fn accent_error() -> Color {
    Color::Rgb(0xEF, 0x44, 0x44)
}

pub fn border_default() -> Color {
    if dark() {
        Color::Rgb(0x33, 0x41, 0x55)
    } else {
        Color::Rgb(0xCB, 0xD5, 0xE1)
    }
}

pub fn border_focused() -> Color {
    accent_primary()
}

pub fn selected_bg() -> Color {
    if dark() {
        Color::Rgb(0x33, 0x41, 0x55)
    } else {
        Color::Rgb(0xCB, 0xD5, 0xE1)
    }
}

pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Low => accent_success(),
        Severity::Medium => accent_warning(),
        Severity::Severe => accent_error(),
    }
}

pub fn status_color(status: ReportStatus) -> Color {
    match status {
        ReportStatus::Draft => accent_warning(),
        ReportStatus::Submitted => accent_success(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_flips_both_ways() {
        set_theme(ThemeMode::Dark);
        assert_eq!(toggle_theme(), ThemeMode::Light);
        assert_eq!(toggle_theme(), ThemeMode::Dark);
    }

    #[test]
    fn test_mode_names_round_trip() {
        for mode in [ThemeMode::Light, ThemeMode::Dark] {
            assert_eq!(ThemeMode::from_name(mode.name()), Some(mode));
        }
        assert_eq!(ThemeMode::from_name("sepia"), None);
    }
}

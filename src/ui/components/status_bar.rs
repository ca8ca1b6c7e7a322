//! One-line status bar: step breadcrumb left, transient note right

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::report::WizardStep;
use crate::ui::theme;

pub fn step_label(step: WizardStep) -> &'static str {
    match step {
        WizardStep::Dashboard => "Dashboard",
        WizardStep::ScanDocument => "Lieferschein",
        WizardStep::DamageLog => "Schäden",
        WizardStep::DriverSignature => "Fahrer",
        WizardStep::Summary => "Zusammenfassung",
        WizardStep::ViewReport => "Bericht",
    }
}

const WIZARD_TRAIL: &[WizardStep] = &[
    WizardStep::ScanDocument,
    WizardStep::DamageLog,
    WizardStep::DriverSignature,
    WizardStep::Summary,
];

pub struct StatusBar<'a> {
    step: WizardStep,
    note: Option<&'a str>,
}

impl<'a> StatusBar<'a> {
    pub fn new(step: WizardStep, note: Option<&'a str>) -> Self {
        Self { step, note }
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Style::default().bg(theme::bg_surface()));

        let mut spans = vec![Span::raw(" ")];
        if self.step == WizardStep::Dashboard || self.step == WizardStep::ViewReport {
            spans.push(Span::styled(
                step_label(self.step),
                Style::default()
                    .fg(theme::accent_primary())
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            for (index, step) in WIZARD_TRAIL.iter().enumerate() {
                if index > 0 {
                    spans.push(Span::styled(" › ", Style::default().fg(theme::text_muted())));
                }
                let style = if *step == self.step {
                    Style::default()
                        .fg(theme::accent_primary())
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme::text_muted())
                };
                spans.push(Span::styled(step_label(*step), style));
            }
        }

        let left = Line::from(spans);
        buf.set_line(area.x, area.y, &left, area.width);

        if let Some(note) = self.note {
            let width = note.chars().count() as u16 + 1;
            if width < area.width {
                let right = Line::styled(
                    note.to_string(),
                    Style::default().fg(theme::text_muted()),
                );
                buf.set_line(area.x + area.width - width, area.y, &right, width);
            }
        }
    }
}

/// Bottom hint line, e.g. "[n] Neu  [Enter] Öffnen"
pub fn render_key_hints(area: Rect, buf: &mut Buffer, hints: &[(&str, &str)]) {
    let mut spans = vec![Span::raw(" ")];
    for (key, label) in hints {
        spans.push(Span::styled(
            format!("[{key}]"),
            Style::default()
                .fg(theme::accent_primary())
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!(" {label}  "),
            Style::default().fg(theme::text_muted()),
        ));
    }
    buf.set_line(area.x, area.y, &Line::from(spans), area.width);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_step_has_a_label() {
        for step in [
            WizardStep::Dashboard,
            WizardStep::ScanDocument,
            WizardStep::DamageLog,
            WizardStep::DriverSignature,
            WizardStep::Summary,
            WizardStep::ViewReport,
        ] {
            assert!(!step_label(step).is_empty());
        }
    }
}

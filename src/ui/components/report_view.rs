//! Scrollable read-only rendering of a full report
//!
//! Shared by the summary step (pre-submit check) and the archive view.

use chrono::{DateTime, Local, Utc};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use crate::report::InspectionReport;
use crate::ui::theme;

#[derive(Default)]
pub struct ReportViewState {
    pub scroll: u16,
}

impl ReportViewState {
    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines);
    }

    pub fn reset(&mut self) {
        self.scroll = 0;
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, report: &InspectionReport) {
        let muted = Style::default().fg(theme::text_muted());
        let text = Style::default().fg(theme::text_primary());
        let heading = Style::default()
            .fg(theme::accent_primary())
            .add_modifier(Modifier::BOLD);

        let mut lines = Vec::new();

        lines.push(Line::styled(" TRANSPORTPROTOKOLL", heading));
        lines.push(Line::from(vec![
            Span::styled(" Bericht-ID: ", muted),
            Span::styled(report.id.clone(), text),
        ]));
        lines.push(Line::from(vec![
            Span::styled(" Erstellt:   ", muted),
            Span::styled(format_created(report.created_at), text),
        ]));
        lines.push(Line::from(vec![
            Span::styled(" Status:     ", muted),
            Span::styled(
                report.status.label(),
                Style::default().fg(theme::status_color(report.status)),
            ),
        ]));
        lines.push(Line::raw(""));

        if report.driver.as_ref().is_some_and(|d| d.under_reserve) {
            lines.push(Line::styled(
                " ⚠ Vermerk: Annahme unter Vorbehalt",
                Style::default()
                    .fg(theme::accent_warning())
                    .add_modifier(Modifier::BOLD),
            ));
            lines.push(Line::raw(""));
        }

        lines.push(Line::styled(" LIEFERSCHEIN", heading));
        match &report.document {
            Some(doc) => {
                lines.push(field(" Nummer:    ", &doc.delivery_number, muted, text));
                lines.push(field(" Datum:     ", &doc.date, muted, text));
                lines.push(field(" Absender:  ", &doc.sender, muted, text));
                lines.push(field(" Empfänger: ", &doc.recipient, muted, text));
            }
            None => lines.push(Line::styled(" Kein Lieferschein erfasst", muted)),
        }
        lines.push(Line::raw(""));

        lines.push(Line::styled(
            format!(" SCHÄDEN ({})", report.damages.len()),
            heading,
        ));
        if report.damages.is_empty() {
            lines.push(Line::styled(" Keine Schäden verzeichnet.", muted));
        }
        for (index, damage) in report.damages.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(format!(" Schaden #{}: ", index + 1), text),
                Span::styled(
                    damage.severity.label(),
                    Style::default().fg(theme::severity_color(damage.severity)),
                ),
                Span::styled(format!("  {} Foto(s)", damage.image_urls.len()), muted),
            ]));
            if !damage.categories.is_empty() {
                lines.push(field(
                    "   Kategorien: ",
                    &damage.categories.join(", "),
                    muted,
                    text,
                ));
            }
            if !damage.description.is_empty() {
                lines.push(field("   Notiz: ", &damage.description, muted, text));
            }
        }
        lines.push(Line::raw(""));

        lines.push(Line::styled(" FAHRER", heading));
        match &report.driver {
            Some(driver) => {
                lines.push(field(" Name:        ", &driver.name, muted, text));
                lines.push(field(" Kennzeichen: ", &driver.license_plate, muted, text));
                lines.push(field(" Firma:       ", &driver.company, muted, text));
                let signed = if driver.signature_data_url.is_empty() {
                    Line::styled(" Unterschrift: fehlt", Style::default().fg(theme::accent_error()))
                } else {
                    Line::styled(
                        " Unterschrift: vorhanden ✓",
                        Style::default().fg(theme::accent_success()),
                    )
                };
                lines.push(signed);
            }
            None => lines.push(Line::styled(" Keine Fahrerdaten", muted)),
        }
        lines.push(Line::raw(""));

        lines.push(Line::styled(" INTERNER PRÜFER", heading));
        lines.push(field(" Mitarbeiter: ", &report.employee_name, muted, text));

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .render(area, buf);
    }
}

fn field(label: &str, value: &str, muted: Style, text: Style) -> Line<'static> {
    let value = if value.is_empty() { "-" } else { value };
    Line::from(vec![
        Span::styled(label.to_string(), muted),
        Span::styled(value.to_string(), text),
    ])
}

fn format_created(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .unwrap_or_default()
        .with_timezone(&Local)
        .format("%d.%m.%Y, %H:%M:%S")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_saturates_at_zero() {
        let mut view = ReportViewState::default();
        view.scroll_up(5);
        assert_eq!(view.scroll, 0);

        view.scroll_down(3);
        view.scroll_up(1);
        assert_eq!(view.scroll, 2);

        view.reset();
        assert_eq!(view.scroll, 0);
    }
}

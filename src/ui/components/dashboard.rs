//! Report archive list, the wizard's home screen

use chrono::{DateTime, Local, Utc};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::report::InspectionReport;
use crate::ui::theme;

#[derive(Default)]
pub struct DashboardState {
    pub reports: Vec<InspectionReport>,
    pub selected: usize,
    pub loading: bool,
}

impl DashboardState {
    pub fn set_reports(&mut self, reports: Vec<InspectionReport>) {
        self.reports = reports;
        self.loading = false;
        self.clamp_selection();
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.reports.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_report(&self) -> Option<&InspectionReport> {
        self.reports.get(self.selected)
    }

    pub fn remove(&mut self, report_id: &str) {
        self.reports.retain(|r| r.id != report_id);
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        if self.selected >= self.reports.len() {
            self.selected = self.reports.len().saturating_sub(1);
        }
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let mut lines = Vec::new();

        lines.push(Line::from(vec![Span::styled(
            "  CargoGuard – Transportschaden-Dokumentation",
            Style::default()
                .fg(theme::accent_primary())
                .add_modifier(Modifier::BOLD),
        )]));
        lines.push(Line::raw(""));

        if self.loading {
            lines.push(Line::styled(
                "  Berichte werden geladen...",
                Style::default().fg(theme::text_muted()),
            ));
        } else if self.reports.is_empty() {
            lines.push(Line::styled(
                "  Keine Berichte vorhanden. [n] startet einen neuen Bericht.",
                Style::default().fg(theme::text_muted()),
            ));
        } else {
            lines.push(Line::styled(
                format!(
                    "  {:<12} {:<18} {:<14} {:>8}  {}",
                    "ID", "Erstellt", "Status", "Schäden", "Prüfer"
                ),
                Style::default().fg(theme::text_muted()),
            ));
            for (index, report) in self.reports.iter().enumerate() {
                let row = format!(
                    "  {:<12} {:<18} {:<14} {:>8}  {}",
                    report.id,
                    format_created(report.created_at),
                    report.status.label(),
                    report.damages.len(),
                    report.employee_name,
                );
                let mut style = Style::default().fg(theme::text_primary());
                if index == self.selected {
                    style = style.bg(theme::selected_bg()).add_modifier(Modifier::BOLD);
                }
                let status_style = style.fg(theme::status_color(report.status));
                let prefix_len = 2 + 12 + 1 + 18 + 1;
                let (prefix, rest) = row.split_at(prefix_len.min(row.len()));
                let (status_part, tail) = rest.split_at(14.min(rest.len()));
                lines.push(Line::from(vec![
                    Span::styled(prefix.to_string(), style),
                    Span::styled(status_part.to_string(), status_style),
                    Span::styled(tail.to_string(), style),
                ]));
            }
        }

        Paragraph::new(lines).render(area, buf);
    }
}

fn format_created(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .unwrap_or_default()
        .with_timezone(&Local)
        .format("%d.%m.%Y %H:%M")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(id: &str) -> InspectionReport {
        let mut r = InspectionReport::new_session();
        r.id = id.to_string();
        r
    }

    #[test]
    fn test_selection_stays_in_bounds() {
        let mut dashboard = DashboardState::default();
        dashboard.set_reports(vec![report("a"), report("b")]);

        dashboard.select_prev();
        assert_eq!(dashboard.selected, 0);

        dashboard.select_next();
        dashboard.select_next();
        assert_eq!(dashboard.selected, 1);
    }

    #[test]
    fn test_remove_clamps_selection() {
        let mut dashboard = DashboardState::default();
        dashboard.set_reports(vec![report("a"), report("b")]);
        dashboard.select_next();

        dashboard.remove("b");
        assert_eq!(dashboard.selected, 0);
        assert_eq!(dashboard.selected_report().map(|r| r.id.as_str()), Some("a"));
    }

    #[test]
    fn test_reload_keeps_valid_selection() {
        let mut dashboard = DashboardState::default();
        dashboard.set_reports(vec![report("a"), report("b"), report("c")]);
        dashboard.selected = 2;

        dashboard.set_reports(vec![report("a")]);
        assert_eq!(dashboard.selected, 0);
    }
}

//! Damage list screen: photo galleries, severity, categories, notes

use std::path::{Path, PathBuf};

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
    Frame,
};

use crate::report::{DamageRecord, InspectionReport, DAMAGE_TYPES};
use crate::ui::components::{centered_rect, TextInputState};
use crate::ui::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DamageFocus {
    #[default]
    List,
    Categories,
    Description,
}

/// Where a picked photo should go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoTarget {
    NewDamage,
    ExistingDamage(String),
}

#[derive(Default)]
pub struct DamageLogState {
    pub focus: DamageFocus,
    pub selected: usize,
    pub category_index: usize,
    pub description: TextInputState,
    /// Photo picker overlay
    pub picker_open: bool,
    pub picker_target: Option<PhotoTarget>,
    pub picker_files: Vec<PathBuf>,
    pub picker_selected: usize,
}

impl DamageLogState {
    pub fn clamp(&mut self, report: &InspectionReport) {
        if self.selected >= report.damages.len() {
            self.selected = report.damages.len().saturating_sub(1);
        }
    }

    pub fn selected_damage<'a>(&self, report: &'a InspectionReport) -> Option<&'a DamageRecord> {
        report.damages.get(self.selected)
    }

    pub fn select_next(&mut self, report: &InspectionReport) {
        if self.selected + 1 < report.damages.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn category_next(&mut self) {
        self.category_index = (self.category_index + 1) % DAMAGE_TYPES.len();
    }

    pub fn category_prev(&mut self) {
        self.category_index = self
            .category_index
            .checked_sub(1)
            .unwrap_or(DAMAGE_TYPES.len() - 1);
    }

    /// Load the selected damage's description into the edit buffer
    pub fn sync_description(&mut self, report: &InspectionReport) {
        match self.selected_damage(report) {
            Some(damage) => self.description.set(&damage.description),
            None => self.description.clear(),
        }
    }

    pub fn open_picker(&mut self, target: PhotoTarget, files: Vec<PathBuf>) {
        self.picker_open = true;
        self.picker_target = Some(target);
        self.picker_files = files;
        self.picker_selected = 0;
    }

    pub fn close_picker(&mut self) {
        self.picker_open = false;
        self.picker_target = None;
        self.picker_files.clear();
    }

    pub fn picker_next(&mut self) {
        if self.picker_selected + 1 < self.picker_files.len() {
            self.picker_selected += 1;
        }
    }

    pub fn picker_prev(&mut self) {
        self.picker_selected = self.picker_selected.saturating_sub(1);
    }

    pub fn picked_file(&self) -> Option<&Path> {
        self.picker_files.get(self.picker_selected).map(|p| p.as_path())
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, report: &InspectionReport) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);

        self.render_list(columns[0], buf, report);
        self.render_detail(columns[1], buf, report);
    }

    fn render_list(&self, area: Rect, buf: &mut Buffer, report: &InspectionReport) {
        let border_color = if self.focus == DamageFocus::List {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let block = Block::default()
            .title(format!(" Schäden ({}) ", report.damages.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = Vec::new();
        if report.damages.is_empty() {
            lines.push(Line::styled(
                " Keine Schäden verzeichnet. [a] fügt einen hinzu.",
                Style::default().fg(theme::text_muted()),
            ));
        }
        for (index, damage) in report.damages.iter().enumerate() {
            let mut style = Style::default().fg(theme::text_primary());
            if self.focus == DamageFocus::List && index == self.selected {
                style = style.bg(theme::selected_bg()).add_modifier(Modifier::BOLD);
            }
            lines.push(Line::from(vec![
                Span::styled(format!(" Schaden #{} ", index + 1), style),
                Span::styled(
                    damage.severity.label().to_string(),
                    style.fg(theme::severity_color(damage.severity)),
                ),
                Span::styled(format!("  {} Foto(s)", damage.image_urls.len()), style),
            ]));
        }

        Paragraph::new(lines).render(inner, buf);
    }

    fn render_detail(&self, area: Rect, buf: &mut Buffer, report: &InspectionReport) {
        let block = Block::default()
            .title(" Details ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::border_default()));
        let inner = block.inner(area);
        block.render(area, buf);

        let Some(damage) = self.selected_damage(report) else {
            return;
        };

        let mut lines = Vec::new();
        lines.push(Line::from(vec![
            Span::styled(" Schweregrad: ", Style::default().fg(theme::text_muted())),
            Span::styled(
                damage.severity.label(),
                Style::default()
                    .fg(theme::severity_color(damage.severity))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  [s] wechseln", Style::default().fg(theme::text_muted())),
        ]));
        lines.push(Line::raw(""));

        lines.push(Line::styled(
            " Kategorien:",
            Style::default().fg(theme::text_muted()),
        ));
        for (index, category) in DAMAGE_TYPES.iter().enumerate() {
            let marked = damage.categories.iter().any(|c| c == category);
            let marker = if marked { "[x]" } else { "[ ]" };
            let mut style = Style::default().fg(theme::text_primary());
            if self.focus == DamageFocus::Categories && index == self.category_index {
                style = style.bg(theme::selected_bg()).add_modifier(Modifier::BOLD);
            }
            lines.push(Line::styled(format!("  {marker} {category}"), style));
        }
        lines.push(Line::raw(""));

        if self.focus == DamageFocus::Description {
            lines.push(Line::from(vec![
                Span::styled(
                    " Beschreibung: ",
                    Style::default().fg(theme::border_focused()),
                ),
                Span::styled(
                    format!("{}▏", self.description.value()),
                    Style::default().fg(theme::text_primary()),
                ),
            ]));
        } else {
            let text = if damage.description.is_empty() {
                "– [e] bearbeiten"
            } else {
                &damage.description
            };
            lines.push(Line::from(vec![
                Span::styled(" Beschreibung: ", Style::default().fg(theme::text_muted())),
                Span::styled(
                    text.to_string(),
                    Style::default().fg(theme::text_primary()),
                ),
            ]));
        }

        Paragraph::new(lines).render(inner, buf);
    }

    /// Photo picker drawn over the screen while open
    pub fn render_picker(&self, f: &mut Frame, area: Rect) {
        let dialog = centered_rect(48, 14, area);
        f.render_widget(Clear, dialog);

        let block = Block::default()
            .title(" Foto auswählen ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::border_focused()))
            .style(Style::default().bg(theme::bg_surface()));
        let inner = block.inner(dialog);
        f.render_widget(block, dialog);

        let mut lines = Vec::new();
        if self.picker_files.is_empty() {
            lines.push(Line::styled(
                " Keine Bilddateien im Aufnahmeordner",
                Style::default().fg(theme::text_muted()),
            ));
        }
        for (index, file) in self.picker_files.iter().enumerate() {
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let mut style = Style::default().fg(theme::text_primary());
            if index == self.picker_selected {
                style = style.bg(theme::selected_bg()).add_modifier(Modifier::BOLD);
            }
            lines.push(Line::styled(format!(" {name}"), style));
        }
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            " [Enter] übernehmen  [Esc] abbrechen",
            Style::default().fg(theme::text_muted()),
        ));

        f.render_widget(Paragraph::new(lines), inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_with_damages(n: usize) -> InspectionReport {
        let mut report = InspectionReport::new_session();
        for i in 0..n {
            report
                .damages
                .push(DamageRecord::from_capture(format!("img-{i}")));
        }
        report
    }

    #[test]
    fn test_selection_follows_report() {
        let mut state = DamageLogState::default();
        let report = report_with_damages(3);

        state.select_next(&report);
        state.select_next(&report);
        state.select_next(&report);
        assert_eq!(state.selected, 2);

        let shorter = report_with_damages(1);
        state.clamp(&shorter);
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn test_category_navigation_wraps() {
        let mut state = DamageLogState::default();
        state.category_prev();
        assert_eq!(state.category_index, DAMAGE_TYPES.len() - 1);

        state.category_next();
        assert_eq!(state.category_index, 0);
    }

    #[test]
    fn test_picker_lifecycle() {
        let mut state = DamageLogState::default();
        state.open_picker(PhotoTarget::NewDamage, vec![PathBuf::from("a.png")]);
        assert!(state.picker_open);
        assert_eq!(state.picked_file(), Some(Path::new("a.png")));

        state.close_picker();
        assert!(!state.picker_open);
        assert!(state.picker_files.is_empty());
    }
}

//! Modal confirm and error dialogs drawn over the active screen

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::ui::theme;

/// Center a fixed-size rectangle inside `area`
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// What a confirmation is about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmContext {
    DeleteReport(String),
}

#[derive(Debug, Default)]
pub struct ConfirmDialogState {
    pub visible: bool,
    title: String,
    message: String,
    context: Option<ConfirmContext>,
    /// 0 = cancel, 1 = confirm
    selected: usize,
}

impl ConfirmDialogState {
    pub fn show_delete(&mut self, report_id: &str) {
        self.visible = true;
        self.title = "Bericht löschen".to_string();
        self.message = format!("Bericht {report_id} endgültig löschen?");
        self.context = Some(ConfirmContext::DeleteReport(report_id.to_string()));
        // Cancel is the safe default
        self.selected = 0;
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.context = None;
    }

    pub fn toggle_selection(&mut self) {
        self.selected = 1 - self.selected;
    }

    /// Enter pressed: the context if the confirm button was selected
    pub fn take_confirmed(&mut self) -> Option<ConfirmContext> {
        let confirmed = self.selected == 1;
        let context = self.context.take();
        self.hide();
        if confirmed {
            context
        } else {
            None
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let dialog = centered_rect(50, 7, area);
        f.render_widget(Clear, dialog);

        let block = Block::default()
            .title(format!(" {} ", self.title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::accent_error()))
            .style(Style::default().bg(theme::bg_surface()));
        let inner = block.inner(dialog);
        f.render_widget(block, dialog);

        let button = |label: &str, active: bool| {
            let style = if active {
                Style::default()
                    .fg(theme::text_primary())
                    .bg(theme::selected_bg())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme::text_muted())
            };
            Span::styled(format!(" {label} "), style)
        };

        let lines = vec![
            Line::raw(""),
            Line::styled(
                self.message.clone(),
                Style::default().fg(theme::text_primary()),
            ),
            Line::raw(""),
            Line::from(vec![
                button("Abbrechen", self.selected == 0),
                Span::raw("   "),
                button("Löschen", self.selected == 1),
            ]),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, inner);
    }
}

#[derive(Debug, Default)]
pub struct ErrorDialogState {
    pub visible: bool,
    title: String,
    message: String,
}

impl ErrorDialogState {
    pub fn show(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.visible = true;
        self.title = title.into();
        self.message = message.into();
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let dialog = centered_rect(56, 8, area);
        f.render_widget(Clear, dialog);

        let block = Block::default()
            .title(format!(" {} ", self.title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::accent_error()))
            .style(Style::default().bg(theme::bg_surface()));
        let inner = block.inner(dialog);
        f.render_widget(block, dialog);

        let lines = vec![
            Line::raw(""),
            Line::styled(
                self.message.clone(),
                Style::default().fg(theme::text_primary()),
            ),
            Line::raw(""),
            Line::styled(
                "[Enter] Schließen",
                Style::default().fg(theme::text_muted()),
            ),
        ];
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_defaults_to_cancel() {
        let mut dialog = ConfirmDialogState::default();
        dialog.show_delete("REP-1");
        assert!(dialog.visible);

        assert_eq!(dialog.take_confirmed(), None);
        assert!(!dialog.visible);
    }

    #[test]
    fn test_confirm_after_toggle() {
        let mut dialog = ConfirmDialogState::default();
        dialog.show_delete("REP-1");
        dialog.toggle_selection();

        assert_eq!(
            dialog.take_confirmed(),
            Some(ConfirmContext::DeleteReport("REP-1".to_string()))
        );
    }

    #[test]
    fn test_centered_rect_clamps_to_area() {
        let area = Rect::new(0, 0, 20, 5);
        let rect = centered_rect(50, 10, area);
        assert!(rect.width <= area.width);
        assert!(rect.height <= area.height);
    }
}

//! Delivery-document capture screen: file picker plus detail fields

use std::path::{Path, PathBuf};

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::capture::CameraCapture;
use crate::report::DocumentData;
use crate::ui::components::TextInputState;
use crate::ui::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanFocus {
    #[default]
    Files,
    DeliveryNumber,
    Date,
    Sender,
    Recipient,
}

#[derive(Default)]
pub struct ScanDocumentState {
    pub focus: ScanFocus,
    pub files: Vec<PathBuf>,
    pub selected_file: usize,
    pub delivery_number: TextInputState,
    pub date: TextInputState,
    pub sender: TextInputState,
    pub recipient: TextInputState,
}

impl ScanDocumentState {
    /// Re-scan the captures directory
    pub fn refresh_files(&mut self, camera: &CameraCapture) {
        self.files = camera.list_files();
        if self.selected_file >= self.files.len() {
            self.selected_file = self.files.len().saturating_sub(1);
        }
    }

    pub fn selected_file(&self) -> Option<&Path> {
        self.files.get(self.selected_file).map(|p| p.as_path())
    }

    pub fn select_next_file(&mut self) {
        if self.selected_file + 1 < self.files.len() {
            self.selected_file += 1;
        }
    }

    pub fn select_prev_file(&mut self) {
        self.selected_file = self.selected_file.saturating_sub(1);
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            ScanFocus::Files => ScanFocus::DeliveryNumber,
            ScanFocus::DeliveryNumber => ScanFocus::Date,
            ScanFocus::Date => ScanFocus::Sender,
            ScanFocus::Sender => ScanFocus::Recipient,
            ScanFocus::Recipient => ScanFocus::Files,
        };
    }

    pub fn focus_prev(&mut self) {
        self.focus = match self.focus {
            ScanFocus::Files => ScanFocus::Recipient,
            ScanFocus::DeliveryNumber => ScanFocus::Files,
            ScanFocus::Date => ScanFocus::DeliveryNumber,
            ScanFocus::Sender => ScanFocus::Date,
            ScanFocus::Recipient => ScanFocus::Sender,
        };
    }

    /// The input that currently has keyboard focus, if any
    pub fn active_input_mut(&mut self) -> Option<&mut TextInputState> {
        match self.focus {
            ScanFocus::Files => None,
            ScanFocus::DeliveryNumber => Some(&mut self.delivery_number),
            ScanFocus::Date => Some(&mut self.date),
            ScanFocus::Sender => Some(&mut self.sender),
            ScanFocus::Recipient => Some(&mut self.recipient),
        }
    }

    /// Fill the inputs from the working report's document
    pub fn sync_from(&mut self, document: Option<&DocumentData>) {
        match document {
            Some(doc) => {
                self.delivery_number.set(&doc.delivery_number);
                self.date.set(&doc.date);
                self.sender.set(&doc.sender);
                self.recipient.set(&doc.recipient);
            }
            None => {
                self.delivery_number.clear();
                self.date.clear();
                self.sender.clear();
                self.recipient.clear();
            }
        }
    }

    /// Copy the current input values into the document
    pub fn write_back(&self, document: &mut DocumentData) {
        document.delivery_number = self.delivery_number.value().to_string();
        document.date = self.date.value().to_string();
        document.sender = self.sender.value().to_string();
        document.recipient = self.recipient.value().to_string();
    }

    pub fn render(
        &self,
        area: Rect,
        buf: &mut Buffer,
        document: Option<&DocumentData>,
        device_hint: Option<&str>,
    ) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(area);

        self.render_file_list(columns[0], buf, document.is_some(), device_hint);
        self.render_fields(columns[1], buf, document.is_some());
    }

    fn render_file_list(
        &self,
        area: Rect,
        buf: &mut Buffer,
        captured: bool,
        device_hint: Option<&str>,
    ) {
        let border_color = if self.focus == ScanFocus::Files {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let block = Block::default()
            .title(" Aufnahmen ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = Vec::new();
        if captured {
            lines.push(Line::styled(
                " Lieferschein erfasst",
                Style::default().fg(theme::accent_success()),
            ));
        }
        if let Some(hint) = device_hint {
            lines.push(Line::styled(
                format!(" {hint}"),
                Style::default().fg(theme::accent_warning()),
            ));
        }
        if self.files.is_empty() {
            lines.push(Line::styled(
                " Keine Bilddateien im Aufnahmeordner",
                Style::default().fg(theme::text_muted()),
            ));
        }
        for (index, file) in self.files.iter().enumerate() {
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let mut style = Style::default().fg(theme::text_primary());
            if self.focus == ScanFocus::Files && index == self.selected_file {
                style = style.bg(theme::selected_bg()).add_modifier(Modifier::BOLD);
            }
            lines.push(Line::styled(format!(" {name}"), style));
        }

        Paragraph::new(lines).render(inner, buf);
    }

    fn render_fields(&self, area: Rect, buf: &mut Buffer, captured: bool) {
        let block = Block::default()
            .title(" Lieferschein ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::border_default()));
        let inner = block.inner(area);
        block.render(area, buf);

        if !captured {
            Paragraph::new(Line::styled(
                " Zuerst mit [Enter] eine Aufnahme auswählen",
                Style::default().fg(theme::text_muted()),
            ))
            .render(inner, buf);
            return;
        }

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        self.delivery_number.render_field(
            rows[0],
            buf,
            " Nummer:    ",
            "LS-…",
            self.focus == ScanFocus::DeliveryNumber,
        );
        self.date.render_field(
            rows[1],
            buf,
            " Datum:     ",
            "JJJJ-MM-TT",
            self.focus == ScanFocus::Date,
        );
        self.sender.render_field(
            rows[2],
            buf,
            " Absender:  ",
            "",
            self.focus == ScanFocus::Sender,
        );
        self.recipient.render_field(
            rows[3],
            buf,
            " Empfänger: ",
            "",
            self.focus == ScanFocus::Recipient,
        );
        Paragraph::new(Line::styled(
            " [Entf] Aufnahme verwerfen und neu fotografieren",
            Style::default().fg(theme::text_muted()),
        ))
        .render(rows[5], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_cycles_through_all_fields() {
        let mut state = ScanDocumentState::default();
        let start = state.focus;
        for _ in 0..5 {
            state.focus_next();
        }
        assert_eq!(state.focus, start);

        for _ in 0..5 {
            state.focus_prev();
        }
        assert_eq!(state.focus, start);
    }

    #[test]
    fn test_write_back_round_trip() {
        let mut state = ScanDocumentState::default();
        let mut doc = DocumentData::from_capture("data:image/png;base64,AA==");
        doc.delivery_number = "LS-1001".to_string();
        doc.sender = "AvoParts GmbH".to_string();

        state.sync_from(Some(&doc));
        state.delivery_number.set("LS-2002");

        state.write_back(&mut doc);
        assert_eq!(doc.delivery_number, "LS-2002");
        assert_eq!(doc.sender, "AvoParts GmbH");
    }

    #[test]
    fn test_file_selection_clamps() {
        let mut state = ScanDocumentState {
            files: vec![PathBuf::from("a.png"), PathBuf::from("b.png")],
            selected_file: 1,
            ..Default::default()
        };
        state.select_next_file();
        assert_eq!(state.selected_file, 1);

        state.files = vec![PathBuf::from("a.png")];
        state.selected_file = 5;
        let camera = CameraCapture::new(PathBuf::from("/nonexistent"));
        state.refresh_files(&camera);
        assert_eq!(state.selected_file, 0);
    }
}

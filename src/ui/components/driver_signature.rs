//! Driver data and signature screen
//!
//! Text fields for driver and reviewer, a checkbox for acceptance under
//! reserve, and a mouse-driven signature canvas. Terminal cells map onto
//! the high-resolution signature surface; the preview is drawn from the
//! recorded stroke trail.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    symbols,
    text::Line,
    widgets::{
        canvas::{Canvas, Points},
        Block, Borders, Paragraph, Widget,
    },
};

use crate::capture::{CaptureError, SignaturePad, SIGNATURE_HEIGHT, SIGNATURE_WIDTH};
use crate::report::InspectionReport;
use crate::ui::components::TextInputState;
use crate::ui::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriverFocus {
    #[default]
    Name,
    Plate,
    Company,
    Employee,
}

#[derive(Default)]
pub struct DriverSignatureState {
    pub focus: DriverFocus,
    pub name: TextInputState,
    pub plate: TextInputState,
    pub company: TextInputState,
    pub employee: TextInputState,
    pad: SignaturePad,
    /// Stroke points in pad coordinates, for the canvas preview
    trail: Vec<(f64, f64)>,
    /// Canvas screen area from the last render, for mouse mapping
    signature_area: Option<Rect>,
    drawing: bool,
}

impl DriverSignatureState {
    pub fn sync_from(&mut self, report: &InspectionReport) {
        if let Some(driver) = &report.driver {
            self.name.set(&driver.name);
            self.plate.set(&driver.license_plate);
            self.company.set(&driver.company);
        } else {
            self.name.clear();
            self.plate.clear();
            self.company.clear();
        }
        self.employee.set(&report.employee_name);
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            DriverFocus::Name => DriverFocus::Plate,
            DriverFocus::Plate => DriverFocus::Company,
            DriverFocus::Company => DriverFocus::Employee,
            DriverFocus::Employee => DriverFocus::Name,
        };
    }

    pub fn focus_prev(&mut self) {
        self.focus = match self.focus {
            DriverFocus::Name => DriverFocus::Employee,
            DriverFocus::Plate => DriverFocus::Name,
            DriverFocus::Company => DriverFocus::Plate,
            DriverFocus::Employee => DriverFocus::Company,
        };
    }

    pub fn active_input_mut(&mut self) -> &mut TextInputState {
        match self.focus {
            DriverFocus::Name => &mut self.name,
            DriverFocus::Plate => &mut self.plate,
            DriverFocus::Company => &mut self.company,
            DriverFocus::Employee => &mut self.employee,
        }
    }

    pub fn has_strokes(&self) -> bool {
        !self.pad.is_empty()
    }

    /// Map a terminal cell onto the signature surface
    fn pad_coords(&self, column: u16, row: u16) -> Option<(f32, f32)> {
        let area = self.signature_area?;
        if column < area.x
            || row < area.y
            || column >= area.x + area.width
            || row >= area.y + area.height
        {
            return None;
        }
        let x = (column - area.x) as f32 / area.width.max(1) as f32 * SIGNATURE_WIDTH as f32;
        let y = (row - area.y) as f32 / area.height.max(1) as f32 * SIGNATURE_HEIGHT as f32;
        Some((x, y))
    }

    /// Mouse button pressed; begins a stroke when inside the canvas
    pub fn mouse_down(&mut self, column: u16, row: u16) {
        if let Some((x, y)) = self.pad_coords(column, row) {
            self.pad.pointer_down(x, y);
            self.push_trail(x, y);
            self.drawing = true;
        }
    }

    /// Mouse dragged with the button held
    pub fn mouse_drag(&mut self, column: u16, row: u16) {
        if !self.drawing {
            return;
        }
        if let Some((x, y)) = self.pad_coords(column, row) {
            self.pad.pointer_move(x, y);
            self.push_trail(x, y);
        }
    }

    /// Mouse released: ends the stroke and exports the surface
    pub fn mouse_up(&mut self) -> Result<Option<String>, CaptureError> {
        self.drawing = false;
        self.pad.pointer_up()
    }

    pub fn clear_signature(&mut self) {
        self.pad.clear();
        self.trail.clear();
        self.drawing = false;
    }

    fn push_trail(&mut self, x: f32, y: f32) {
        // Canvas origin is bottom-left; the pad's is top-left
        self.trail
            .push((x as f64, (SIGNATURE_HEIGHT as f32 - y) as f64));
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer, report: &InspectionReport) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(area);

        self.render_fields(columns[0], buf, report);
        self.render_canvas(columns[1], buf, report);
    }

    fn render_fields(&self, area: Rect, buf: &mut Buffer, report: &InspectionReport) {
        let block = Block::default()
            .title(" Fahrer ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::border_default()));
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        self.name.render_field(
            rows[0],
            buf,
            " Name:        ",
            "",
            self.focus == DriverFocus::Name,
        );
        self.plate.render_field(
            rows[1],
            buf,
            " Kennzeichen: ",
            "",
            self.focus == DriverFocus::Plate,
        );
        self.company.render_field(
            rows[2],
            buf,
            " Firma:       ",
            "",
            self.focus == DriverFocus::Company,
        );
        self.employee.render_field(
            rows[3],
            buf,
            " Prüfer:      ",
            "",
            self.focus == DriverFocus::Employee,
        );

        let under_reserve = report.driver.as_ref().is_some_and(|d| d.under_reserve);
        let marker = if under_reserve { "[x]" } else { "[ ]" };
        Paragraph::new(Line::styled(
            format!(" {marker} Annahme unter Vorbehalt  [Strg+R]"),
            Style::default().fg(if under_reserve {
                theme::accent_warning()
            } else {
                theme::text_primary()
            }),
        ))
        .render(rows[5], buf);
    }

    fn render_canvas(&mut self, area: Rect, buf: &mut Buffer, report: &InspectionReport) {
        let signed = report
            .driver
            .as_ref()
            .is_some_and(|d| !d.signature_data_url.is_empty());
        let title = if signed {
            " Unterschrift ✓ "
        } else {
            " Unterschrift (Maus) "
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if signed {
                theme::accent_success()
            } else {
                theme::border_default()
            }));
        let inner = block.inner(area);
        block.render(area, buf);
        self.signature_area = Some(inner);

        if self.trail.is_empty() {
            let hint = if signed {
                " Unterschrift gespeichert, [Strg+L] löscht sie"
            } else {
                " Mit gedrückter Maustaste unterschreiben"
            };
            Paragraph::new(Line::styled(
                hint,
                Style::default().fg(theme::text_muted()),
            ))
            .render(inner, buf);
            return;
        }

        let canvas = Canvas::default()
            .marker(symbols::Marker::Braille)
            .x_bounds([0.0, SIGNATURE_WIDTH as f64])
            .y_bounds([0.0, SIGNATURE_HEIGHT as f64])
            .paint(|ctx| {
                ctx.draw(&Points {
                    coords: &self.trail,
                    color: theme::accent_primary(),
                });
            });
        canvas.render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_area() -> DriverSignatureState {
        let mut state = DriverSignatureState::default();
        state.signature_area = Some(Rect::new(10, 5, 40, 10));
        state
    }

    #[test]
    fn test_mouse_outside_canvas_is_ignored() {
        let mut state = state_with_area();
        state.mouse_down(0, 0);
        assert!(!state.has_strokes());
        assert!(state.mouse_up().unwrap().is_none());
    }

    #[test]
    fn test_stroke_inside_canvas_exports() {
        let mut state = state_with_area();
        state.mouse_down(12, 6);
        state.mouse_drag(20, 8);
        let url = state.mouse_up().unwrap();
        assert!(url.is_some_and(|u| u.starts_with("data:image/png;base64,")));
        assert!(state.has_strokes());
    }

    #[test]
    fn test_clear_resets_trail() {
        let mut state = state_with_area();
        state.mouse_down(12, 6);
        state.mouse_up().unwrap();

        state.clear_signature();
        assert!(!state.has_strokes());
    }

    #[test]
    fn test_drag_without_down_is_ignored() {
        let mut state = state_with_area();
        state.mouse_drag(12, 6);
        assert!(!state.has_strokes());
    }

    #[test]
    fn test_focus_cycle() {
        let mut state = DriverSignatureState::default();
        for _ in 0..4 {
            state.focus_next();
        }
        assert_eq!(state.focus, DriverFocus::Name);
    }
}

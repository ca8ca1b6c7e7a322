//! Printable inspection report: A4 portrait, German labels
//!
//! The whole document is assembled in memory before anything touches
//! the filesystem, so a failed layout never leaves a partial file.

mod images;
mod layout;

pub use images::{embed_data_url, fit, EmbeddedImage, PX_TO_MM};
pub use layout::{Composer, FontStyle};

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use thiserror::Error;

use crate::capture::CaptureError;
use crate::report::{InspectionReport, ReportStatus};
use layout::{text_width, CONTENT_WIDTH, MARGIN, PAGE_HEIGHT, PAGE_WIDTH};

const BLACK: (f32, f32, f32) = (0.0, 0.0, 0.0);
/// Muted slate used for hints and the footer
const MUTED: (f32, f32, f32) = (0.58, 0.64, 0.72);

const FOOTER_TEXT: &str = "Generiert mit CargoGuard Transportschaden-Dokumentation";

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("Fehler beim Erstellen des PDFs: {0}")]
    Image(#[from] image::ImageError),
    #[error("Fehler beim Erstellen des PDFs: {0}")]
    Capture(#[from] CaptureError),
    #[error("Fehler beim Erstellen des PDFs: {0}")]
    Document(#[from] lopdf::Error),
    #[error("Fehler beim Erstellen des PDFs: {0}")]
    Io(#[from] std::io::Error),
}

/// Render the report and write `Bericht_<id>_<dd-mm-yyyy>.pdf` into
/// `output_dir`. Returns the path of the written file.
pub fn generate_report_pdf(
    report: &InspectionReport,
    output_dir: &Path,
) -> Result<PathBuf, PdfError> {
    let mut doc = render(report)?;
    doc.compress();

    let date = created_at_local(report.created_at).format("%d-%m-%Y");
    let path = output_dir.join(format!("Bericht_{}_{}.pdf", report.id, date));
    doc.save(&path)?;
    tracing::info!(path = %path.display(), "PDF exported");
    Ok(path)
}

/// Lay out the full document in memory
fn render(report: &InspectionReport) -> Result<lopdf::Document, PdfError> {
    let mut c = Composer::new();

    header(&mut c, report);
    if report.driver.as_ref().is_some_and(|d| d.under_reserve) {
        reservation_banner(&mut c);
    }
    delivery_section(&mut c, report)?;
    damages_section(&mut c, report)?;
    driver_section(&mut c, report)?;
    reviewer_section(&mut c, report);
    footer(&mut c);

    Ok(c.finish()?)
}

fn header(c: &mut Composer, report: &InspectionReport) {
    c.rule(BLACK);
    c.advance(5.0);
    c.text(MARGIN, 20.0, FontStyle::Bold, BLACK, "TRANSPORTPROTOKOLL");
    c.advance(8.0);

    c.text(
        MARGIN,
        9.0,
        FontStyle::Regular,
        BLACK,
        &format!("Bericht-ID: {}", report.id),
    );
    c.advance(5.0);
    c.text(
        MARGIN,
        9.0,
        FontStyle::Regular,
        BLACK,
        &format!(
            "Erstellt: {}",
            created_at_local(report.created_at).format("%d.%m.%Y, %H:%M:%S")
        ),
    );
    c.advance(3.0);
    let status = match report.status {
        ReportStatus::Submitted => "ABGESCHLOSSEN",
        ReportStatus::Draft => "ENTWURF",
    };
    c.text(
        MARGIN,
        9.0,
        FontStyle::Regular,
        BLACK,
        &format!("Status: {status}"),
    );
    c.advance(5.0);
    c.rule(BLACK);
    c.advance(10.0);
}

/// Framed "Annahme unter Vorbehalt" notice, only when the driver
/// accepted under reserve.
fn reservation_banner(c: &mut Composer) {
    c.ensure_space(15.0);
    c.rule(BLACK);
    c.advance(5.0);
    c.text(
        MARGIN,
        10.0,
        FontStyle::Bold,
        BLACK,
        "Vermerk: Annahme unter Vorbehalt",
    );
    c.advance(5.0);
    c.rule(BLACK);
    c.advance(10.0);
}

fn delivery_section(c: &mut Composer, report: &InspectionReport) -> Result<(), PdfError> {
    c.ensure_space(60.0);
    c.text(MARGIN, 14.0, FontStyle::Bold, BLACK, "LIEFERSCHEIN");
    c.advance(8.0);

    let Some(document) = &report.document else {
        return Ok(());
    };

    if !document.image_url.is_empty() {
        c.ensure_space(80.0);
        let img = embed_data_url(c.document_mut(), &document.image_url)?;
        let (w, h) = img.fit(CONTENT_WIDTH, 70.0);
        c.image(&img, MARGIN, w, h);
        c.advance(h + 5.0);
    }

    c.ensure_space(30.0);
    field_row(c, "Nummer:", &document.delivery_number, 25.0);
    field_row(c, "Datum:", &document.date, 25.0);
    field_row(c, "Absender:", &document.sender, 25.0);
    field_row(c, "Empfänger:", &document.recipient, 25.0);
    c.advance(5.0);
    Ok(())
}

fn damages_section(c: &mut Composer, report: &InspectionReport) -> Result<(), PdfError> {
    c.ensure_space(20.0);
    c.text(
        MARGIN,
        14.0,
        FontStyle::Bold,
        BLACK,
        &format!("SCHAEDEN ({})", report.damages.len()),
    );
    c.advance(8.0);

    if report.damages.is_empty() {
        c.text(
            MARGIN,
            10.0,
            FontStyle::Oblique,
            MUTED,
            "Keine Schaeden verzeichnet.",
        );
        c.advance(10.0);
        return Ok(());
    }

    for (index, damage) in report.damages.iter().enumerate() {
        c.ensure_space(100.0);
        c.text(
            MARGIN,
            12.0,
            FontStyle::Bold,
            BLACK,
            &format!("Schaden #{}", index + 1),
        );
        c.advance(7.0);

        if !damage.image_urls.is_empty() {
            let per_row = 3usize;
            let slot_width = (CONTENT_WIDTH - 10.0) / per_row as f32;
            for (img_idx, url) in damage.image_urls.iter().enumerate() {
                if img_idx % per_row == 0 && img_idx > 0 {
                    c.advance(45.0);
                    c.ensure_space(45.0);
                }
                let x = MARGIN + (img_idx % per_row) as f32 * (slot_width + 2.0);
                let img = embed_data_url(c.document_mut(), url)?;
                let (w, h) = img.fit(slot_width - 2.0, 40.0);
                c.ensure_space(h + 5.0);
                c.image(&img, x, w, h);
            }
            c.advance(45.0);
        }

        c.ensure_space(15.0);
        c.text(
            MARGIN,
            9.0,
            FontStyle::Bold,
            BLACK,
            &format!("Schweregrad: {}", damage.severity.label()),
        );
        c.advance(5.0);

        if !damage.categories.is_empty() {
            c.text(
                MARGIN,
                9.0,
                FontStyle::Regular,
                BLACK,
                &format!("Kategorien: {}", damage.categories.join(", ")),
            );
            c.advance(5.0);
        }

        if !damage.description.is_empty() {
            c.ensure_space(15.0);
            for line in Composer::wrap(&damage.description, CONTENT_WIDTH - 10.0, 9.0) {
                c.text(MARGIN, 9.0, FontStyle::Regular, BLACK, &line);
                c.advance(5.0);
            }
        }
        c.advance(5.0);
    }
    Ok(())
}

fn driver_section(c: &mut Composer, report: &InspectionReport) -> Result<(), PdfError> {
    c.ensure_space(60.0);
    c.text(MARGIN, 14.0, FontStyle::Bold, BLACK, "FAHRER");
    c.advance(8.0);

    let Some(driver) = &report.driver else {
        return Ok(());
    };

    field_row(c, "Name:", &driver.name, 30.0);
    field_row(c, "Kennzeichen:", &driver.license_plate, 30.0);
    field_row(c, "Firma:", &driver.company, 30.0);
    c.advance(5.0);

    if !driver.signature_data_url.is_empty() {
        c.ensure_space(50.0);
        c.text(MARGIN, 10.0, FontStyle::Bold, BLACK, "Unterschrift:");
        c.advance(5.0);

        let img = embed_data_url(c.document_mut(), &driver.signature_data_url)?;
        let (w, h) = img.fit(60.0, 30.0);
        c.image(&img, MARGIN, w, h);
        c.advance(h + 5.0);
    }
    Ok(())
}

fn reviewer_section(c: &mut Composer, report: &InspectionReport) {
    c.ensure_space(15.0);
    c.text(MARGIN, 14.0, FontStyle::Bold, BLACK, "INTERNER PRUEFER");
    c.advance(8.0);
    field_row(c, "Mitarbeiter:", &report.employee_name, 30.0);
    c.advance(5.0);
}

/// Centered italic line in the footer strip of the last page
fn footer(c: &mut Composer) {
    let width = text_width(FOOTER_TEXT, 8.0);
    c.text_at(
        (PAGE_WIDTH - width) / 2.0,
        PAGE_HEIGHT - 10.0,
        8.0,
        FontStyle::Oblique,
        MUTED,
        FOOTER_TEXT,
    );
}

/// Bold label, regular value (or "-" placeholder), 5 mm row height
fn field_row(c: &mut Composer, label: &str, value: &str, value_offset: f32) {
    c.text(MARGIN, 9.0, FontStyle::Bold, BLACK, label);
    let value = if value.is_empty() { "-" } else { value };
    c.text(MARGIN + value_offset, 9.0, FontStyle::Regular, BLACK, value);
    c.advance(5.0);
}

fn created_at_local(millis: i64) -> DateTime<Local> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .unwrap_or_default()
        .with_timezone(&Local)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{DamageRecord, DocumentData, Severity};
    use tempfile::tempdir;

    fn sample_report() -> InspectionReport {
        let mut report = InspectionReport::blank();
        report.id = "REP-42".to_string();
        report.created_at = 1_700_000_000_000;
        report.employee_name = "Erika Muster".to_string();
        report.document = Some(DocumentData {
            delivery_number: "LS-1001".to_string(),
            ..DocumentData::from_capture("")
        });
        let mut damage = DamageRecord::from_capture(signature_url());
        damage.severity = Severity::Severe;
        damage.description = "Karton an der Ecke eingedrückt, Inhalt sichtbar.".to_string();
        damage.categories = vec!["Kratzer".to_string()];
        report.damages.push(damage);
        let driver = report.driver_mut();
        driver.name = "Max Muster".to_string();
        driver.license_plate = "K-ZZ 123".to_string();
        driver.signature_data_url = signature_url();
        driver.under_reserve = true;
        report
    }

    fn signature_url() -> String {
        use crate::capture::SignaturePad;
        let mut pad = SignaturePad::new();
        pad.pointer_down(10.0, 10.0);
        pad.pointer_move(200.0, 80.0);
        pad.pointer_up().unwrap().unwrap()
    }

    #[test]
    fn test_generate_writes_named_file() {
        let dir = tempdir().unwrap();
        let path = generate_report_pdf(&sample_report(), dir.path()).unwrap();

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("Bericht_REP-42_"));
        assert!(name.ends_with(".pdf"));

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..5], b"%PDF-");
    }

    #[test]
    fn test_render_empty_report_is_single_page() {
        let report = InspectionReport::blank();
        let doc = render(&report).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_render_many_damages_paginates() {
        let mut report = sample_report();
        for _ in 0..8 {
            let mut damage = DamageRecord::from_capture(signature_url());
            damage.description = "Weitere Beschädigung".to_string();
            report.damages.push(damage);
        }
        let doc = render(&report).unwrap();
        assert!(doc.get_pages().len() > 1);
    }

    #[test]
    fn test_broken_data_url_aborts_generation() {
        let dir = tempdir().unwrap();
        let mut report = sample_report();
        report.damages[0].image_urls = vec!["data:image/png;base64,!!!".to_string()];

        assert!(generate_report_pdf(&report, dir.path()).is_err());
        // No partial file left behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}

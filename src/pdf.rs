//! PDF rendering for the three report types via `printpdf`. Built-in
//! fonts only; rows are laid out as fixed-width text lines.

use crate::errors::AppError;
use crate::models::{DoseStatus, FinancialReport, MedicationReportRow, QualityReport};
use crate::reports::ReportKind;
use chrono::NaiveDate;
use printpdf::*;
use std::io::BufWriter;

pub fn report_filename(kind: ReportKind, date: NaiveDate) -> String {
    format!("report-{kind}-{date}.pdf")
}

struct ReportPage {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    mono: IndirectFontRef,
    y: Mm,
}

impl ReportPage {
    fn new(title: &str, start: NaiveDate, end: NaiveDate, generated_at: &str) -> Result<Self, AppError> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(210.0), Mm(297.0), "Layer 1");
        let layer = doc.get_page(page).get_layer(layer);
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(AppError::internal)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(AppError::internal)?;
        let mono = doc
            .add_builtin_font(BuiltinFont::Courier)
            .map_err(AppError::internal)?;

        let mut page = Self {
            doc,
            layer,
            regular,
            bold,
            mono,
            y: Mm(280.0),
        };

        page.layer.use_text(title, 18.0, Mm(14.0), page.y, &page.bold);
        page.y -= Mm(10.0);
        page.text(&format!(
            "Period: {} to {}",
            start.format("%d/%m/%Y"),
            end.format("%d/%m/%Y")
        ));
        page.text(&format!("Generated at: {generated_at}"));
        page.y -= Mm(4.0);
        Ok(page)
    }

    fn ensure_room(&mut self) {
        if self.y < Mm(15.0) {
            let (page, layer) = self.doc.add_page(Mm(210.0), Mm(297.0), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = Mm(280.0);
        }
    }

    fn heading(&mut self, text: &str) {
        self.ensure_room();
        self.layer.use_text(text, 12.0, Mm(14.0), self.y, &self.bold);
        self.y -= Mm(7.0);
    }

    fn text(&mut self, text: &str) {
        self.ensure_room();
        self.layer.use_text(text, 10.0, Mm(14.0), self.y, &self.regular);
        self.y -= Mm(5.5);
    }

    fn row(&mut self, text: &str) {
        self.ensure_room();
        self.layer.use_text(text, 8.0, Mm(14.0), self.y, &self.mono);
        self.y -= Mm(4.0);
    }

    fn gap(&mut self) {
        self.y -= Mm(4.0);
    }

    fn finish(self) -> Result<Vec<u8>, AppError> {
        let mut buf = BufWriter::new(Vec::new());
        self.doc.save(&mut buf).map_err(AppError::internal)?;
        buf.into_inner().map_err(AppError::internal)
    }
}

pub fn medication_report_pdf(
    rows: &[MedicationReportRow],
    start: NaiveDate,
    end: NaiveDate,
    generated_at: &str,
) -> Result<Vec<u8>, AppError> {
    let mut page = ReportPage::new("Medication Report", start, end, generated_at)?;

    page.heading("Missed medications");
    page.row(&format!(
        "{:<22} {:<10} {:<12} {:<7} {}",
        "Medication", "Dosage", "Date", "Time", "Reason"
    ));
    for row in rows.iter().filter(|row| row.status == DoseStatus::Missed) {
        page.row(&format!(
            "{:<22} {:<10} {:<12} {:<7} {}",
            row.name,
            row.dosage,
            row.date.format("%d/%m/%Y").to_string(),
            row.time,
            row.reason.as_deref().unwrap_or("not informed"),
        ));
    }

    page.gap();
    page.heading("All medications");
    page.row(&format!(
        "{:<22} {:<10} {:<12} {:<7} {}",
        "Medication", "Dosage", "Date", "Time", "Status"
    ));
    for row in rows {
        page.row(&format!(
            "{:<22} {:<10} {:<12} {:<7} {}",
            row.name,
            row.dosage,
            row.date.format("%d/%m/%Y").to_string(),
            row.time,
            row.status,
        ));
    }

    page.finish()
}

pub fn financial_report_pdf(
    report: &FinancialReport,
    start: NaiveDate,
    end: NaiveDate,
    generated_at: &str,
) -> Result<Vec<u8>, AppError> {
    let mut page = ReportPage::new("Financial Report", start, end, generated_at)?;

    page.heading("Purchases");
    page.row(&format!(
        "{:<22} {:>10} {:<22} {:<12} {:>5} {:>10}",
        "Medication", "Unit", "Pharmacy", "Date", "Qty", "Total"
    ));
    for row in &report.rows {
        page.row(&format!(
            "{:<22} {:>10} {:<22} {:<12} {:>5} {:>10}",
            row.medication_name,
            row.unit_price,
            row.pharmacy,
            row.date.format("%d/%m/%Y").to_string(),
            row.quantity,
            row.total,
        ));
    }

    page.gap();
    page.text(&format!("Total spent in the period: {}", report.grand_total));
    page.finish()
}

pub fn quality_report_pdf(
    report: &QualityReport,
    start: NaiveDate,
    end: NaiveDate,
    generated_at: &str,
) -> Result<Vec<u8>, AppError> {
    let mut page = ReportPage::new("Quality Report", start, end, generated_at)?;

    page.heading("Adherence by medication");
    page.row(&format!(
        "{:<22} {:>12} {:>12} {:>12} {:>10}",
        "Medication", "Total doses", "Taken", "Missed", "Adherence"
    ));
    for row in &report.rows {
        page.row(&format!(
            "{:<22} {:>12} {:>12} {:>12} {:>9.0}%",
            row.medication_name,
            row.total_doses,
            row.taken_doses,
            row.missed_doses,
            row.adherence_rate,
        ));
    }

    page.gap();
    page.heading("Treatment quality summary");
    page.text(&format!(
        "Average adherence rate: {:.0}%",
        report.average_adherence
    ));
    page.text(&format!("Total doses taken: {}", report.total_taken));
    page.text(&format!("Total doses missed: {}", report.total_missed));
    page.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppData;
    use crate::reports::{build_financial_report, build_medication_report, build_quality_report};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    #[test]
    fn reports_render_to_pdf_bytes() {
        let mut data = AppData::seeded(day());
        crate::schedule::apply_status(&mut data, 1, crate::models::ScheduleStatus::Completed, None)
            .unwrap();
        let start = day() - chrono::Duration::days(7);

        let medication = medication_report_pdf(
            &build_medication_report(&data, start, day()),
            start,
            day(),
            "10/03/2026 08:00",
        )
        .unwrap();
        let financial = financial_report_pdf(
            &build_financial_report(&data, start, day()).unwrap(),
            start,
            day(),
            "10/03/2026 08:00",
        )
        .unwrap();
        let quality = quality_report_pdf(
            &build_quality_report(&data, start, day()),
            start,
            day(),
            "10/03/2026 08:00",
        )
        .unwrap();

        for bytes in [medication, financial, quality] {
            assert!(bytes.starts_with(b"%PDF"));
            assert!(bytes.len() > 500);
        }
    }

    #[test]
    fn filenames_carry_kind_and_date() {
        assert_eq!(
            report_filename(ReportKind::Quality, day()),
            "report-quality-2026-03-10.pdf"
        );
    }
}

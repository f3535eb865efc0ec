//! Receipt and report export for patient visits.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::layout::{DocumentLayout, LayoutBuilder, PageSetup, TableColumns, TextStyle};
use super::pdf::render_pdf;
use super::{ExportError, ExportResult};
use crate::db::Database;
use crate::models::{AppointmentRecord, Clinic};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Number of fingerprint hex digits printed on the document.
const REFERENCE_LEN: usize = 12;

/// Fixed block printed at the top of every receipt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClinicHeader {
    pub name: String,
    pub address: String,
    pub contact: String,
}

impl Default for ClinicHeader {
    fn default() -> Self {
        Self {
            name: "Terra Natural Herbs".into(),
            address: "P.O.BOX 222, Arusha, Arusha".into(),
            contact: "Phone: (123) 456-7890 | www.terranaturalherbs.co.tz".into(),
        }
    }
}

impl From<&Clinic> for ClinicHeader {
    fn from(clinic: &Clinic) -> Self {
        Self {
            name: clinic.name.clone(),
            address: clinic.address.clone(),
            contact: clinic.contact_line(),
        }
    }
}

/// Which document to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReceiptKind {
    /// Full visit with charges and payment footer.
    PaymentReceipt,
    /// Clinical sections only.
    Appointment,
    /// Patient details and lab results.
    LabReport,
}

impl ReceiptKind {
    pub const ALL: [ReceiptKind; 3] = [
        ReceiptKind::PaymentReceipt,
        ReceiptKind::Appointment,
        ReceiptKind::LabReport,
    ];

    /// Filename prefix and URL segment.
    pub fn slug(&self) -> &'static str {
        match self {
            ReceiptKind::PaymentReceipt => "payment-receipt",
            ReceiptKind::Appointment => "appointment",
            ReceiptKind::LabReport => "lab-report",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReceiptKind::PaymentReceipt => "Payment Receipt",
            ReceiptKind::Appointment => "Appointment Summary",
            ReceiptKind::LabReport => "Lab Report",
        }
    }

    fn includes_treatment(&self) -> bool {
        !matches!(self, ReceiptKind::LabReport)
    }

    fn includes_charges(&self) -> bool {
        matches!(self, ReceiptKind::PaymentReceipt)
    }

    fn footer(&self) -> &'static [&'static str] {
        match self {
            ReceiptKind::PaymentReceipt => &[
                "Thank you for your payment!",
                "Please keep this receipt for your records.",
                "For any questions, please contact our billing department.",
            ],
            ReceiptKind::Appointment | ReceiptKind::LabReport => &[
                "Please keep this document for your records.",
                "For any questions, please contact the clinic.",
            ],
        }
    }
}

impl fmt::Display for ReceiptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ReceiptKind {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.slug() == s)
            .ok_or_else(|| ExportError::UnknownKind(s.to_string()))
    }
}

/// One titled two-column table.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub heading: &'static str,
    pub rows: Vec<(String, String)>,
}

/// A rendered document plus the metadata needed to serve it.
#[derive(Debug, Clone, Serialize)]
pub struct ReceiptDocument {
    pub kind: ReceiptKind,
    pub filename: String,
    pub content_type: &'static str,
    pub fingerprint: String,
    pub page_count: usize,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl ReceiptDocument {
    /// Header value for serving the PDF inline under its generated filename.
    pub fn content_disposition(&self) -> String {
        format!("inline; filename=\"{}\"", self.filename)
    }
}

/// `<kind>-<first>_<last>-<YYYY-MM-DD>.pdf`
pub fn receipt_filename(
    kind: ReceiptKind,
    first_name: &str,
    last_name: &str,
    date: NaiveDate,
) -> String {
    format!(
        "{}-{}_{}-{}.pdf",
        kind.slug(),
        filename_component(first_name),
        filename_component(last_name),
        date.format("%Y-%m-%d")
    )
}

/// [`receipt_filename`] dated with the local calendar day.
pub fn receipt_filename_today(kind: ReceiptKind, first_name: &str, last_name: &str) -> String {
    receipt_filename(kind, first_name, last_name, chrono::Local::now().date_naive())
}

/// Keep names header- and path-safe: ASCII alphanumerics and '-' pass, anything else becomes '_'.
fn filename_component(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

/// Hex SHA-256 over the canonical JSON of everything that shapes the document.
pub fn fingerprint(
    record: &AppointmentRecord,
    kind: ReceiptKind,
    header: &ClinicHeader,
) -> ExportResult<String> {
    let canonical = serde_json::to_vec(&(kind, header, record))?;
    let mut hasher = Sha256::new();
    hasher.update(&canonical);
    Ok(hex::encode(hasher.finalize()))
}

/// Reject records the document cannot be built from.
pub fn validate(record: &AppointmentRecord) -> ExportResult<()> {
    let patient = &record.patient;
    if patient.first_name.trim().is_empty() || patient.last_name.trim().is_empty() {
        return Err(ExportError::InvalidRecord(format!(
            "patient {} is missing a first or last name",
            patient.patient_id
        )));
    }

    let foreign = record
        .diagnosis
        .iter()
        .map(|d| d.patient_id.as_str())
        .chain(record.prescription.iter().map(|p| p.patient_id.as_str()))
        .chain(record.lab_analyses.iter().map(|l| l.patient_id.as_str()))
        .find(|id| *id != patient.patient_id);
    if let Some(other) = foreign {
        return Err(ExportError::InvalidRecord(format!(
            "record for patient {other} attached to patient {}",
            patient.patient_id
        )));
    }
    Ok(())
}

/// Content of the document, section by section.
///
/// Fails with [`ExportError::InvalidRecord`] when a charge does not fit in an `i64`.
pub fn build_sections(record: &AppointmentRecord, kind: ReceiptKind) -> ExportResult<Vec<Section>> {
    let patient = &record.patient;
    let mut sections = vec![Section {
        heading: "PATIENT INFORMATION",
        rows: vec![
            ("Patient Name:".into(), patient.full_name()),
            ("Patient ID:".into(), patient.patient_id.clone()),
            ("Age:".into(), patient.age.to_string()),
            ("Gender:".into(), patient.display_gender()),
            ("Phone:".into(), patient.phone_number.clone()),
        ],
    }];

    sections.push(Section {
        heading: "LAB ANALYSIS",
        rows: record
            .lab_analyses
            .iter()
            .map(|lab| (lab.test_name.clone(), lab.result.clone()))
            .collect(),
    });

    if !kind.includes_treatment() {
        return Ok(sections);
    }

    if let Some(diagnosis) = &record.diagnosis {
        sections.push(Section {
            heading: "DIAGNOSIS",
            rows: vec![
                ("Diagnosed with".into(), diagnosis.details()),
                ("Diagnosis Note".into(), diagnosis.note.clone()),
            ],
        });
    }

    if let Some(prescription) = &record.prescription {
        let mut rows: Vec<(String, String)> = prescription
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let label = if i == 0 { "Prescribed Medication" } else { "" };
                (label.to_string(), item.describe())
            })
            .collect();
        if rows.is_empty() {
            rows.push(("Prescribed Medication".into(), String::new()));
        }
        rows.push(("Doctor's Note".into(), prescription.note.clone()));
        sections.push(Section {
            heading: "PRESCRIPTION",
            rows,
        });

        if kind.includes_charges() {
            let overflow = || {
                ExportError::InvalidRecord(format!(
                    "charges on prescription {} overflow",
                    prescription.prescription_id
                ))
            };
            let mut rows = prescription
                .items
                .iter()
                .map(|item| -> ExportResult<(String, String)> {
                    let subtotal = item.subtotal().ok_or_else(overflow)?;
                    Ok((
                        item.medicine_name.clone(),
                        format!(
                            "{} x {} = {}",
                            item.quantity,
                            format_amount(item.unit_price),
                            format_amount(subtotal)
                        ),
                    ))
                })
                .collect::<ExportResult<Vec<_>>>()?;
            let total = prescription.total().ok_or_else(overflow)?;
            rows.push(("Total".into(), format_amount(total)));
            sections.push(Section {
                heading: "CHARGES",
                rows,
            });
        }
    }

    Ok(sections)
}

/// A laid-out receipt and the fingerprint printed on it.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptLayout {
    pub document: DocumentLayout,
    pub fingerprint: String,
}

/// Lay out a receipt. Pure: identical inputs give identical layouts.
pub fn layout_receipt(
    record: &AppointmentRecord,
    kind: ReceiptKind,
    header: &ClinicHeader,
    setup: PageSetup,
) -> ExportResult<ReceiptLayout> {
    validate(record)?;
    let reference = fingerprint(record, kind, header)?;

    let title = format!("{} - {}", kind.title(), record.patient.full_name());
    let mut builder = LayoutBuilder::new(title, setup);

    builder
        .centered(&header.name, TextStyle::TITLE)
        .centered(&header.address, TextStyle::TITLE)
        .centered(&header.contact, TextStyle::TITLE)
        .spacer(30.0);

    for section in build_sections(record, kind)? {
        builder
            .paragraph(section.heading, TextStyle::HEADING)
            .table(&section.rows, TableColumns::default(), TextStyle::BODY)
            .spacer(30.0);
    }

    let mut footer = kind.footer().iter();
    if let Some(first) = footer.next() {
        builder.paragraph(first, TextStyle::BODY).spacer(10.0);
    }
    for line in footer {
        builder.paragraph(line, TextStyle::BODY);
    }
    builder
        .spacer(10.0)
        .paragraph(&format!("Reference: {}", &reference[..REFERENCE_LEN]), TextStyle::BODY);

    Ok(ReceiptLayout {
        document: builder.finish(),
        fingerprint: reference,
    })
}

/// Whole-unit amount with thousands separators, e.g. `12,500`.
pub fn format_amount(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Receipt exporter.
pub struct ReceiptExporter {
    header: ClinicHeader,
    setup: PageSetup,
}

impl ReceiptExporter {
    /// Create an exporter printing the given clinic header.
    pub fn new(header: ClinicHeader) -> Self {
        Self {
            header,
            setup: PageSetup::letter(),
        }
    }

    /// Render a receipt dated today.
    pub fn export(
        &self,
        record: &AppointmentRecord,
        kind: ReceiptKind,
    ) -> ExportResult<ReceiptDocument> {
        self.export_on(record, kind, chrono::Local::now().date_naive())
    }

    /// Render a receipt whose filename carries `date`.
    pub fn export_on(
        &self,
        record: &AppointmentRecord,
        kind: ReceiptKind,
        date: NaiveDate,
    ) -> ExportResult<ReceiptDocument> {
        let layout = layout_receipt(record, kind, &self.header, self.setup)?;
        let bytes = render_pdf(&layout.document)?;
        let patient = &record.patient;

        let document = ReceiptDocument {
            kind,
            filename: receipt_filename(kind, &patient.first_name, &patient.last_name, date),
            content_type: PDF_CONTENT_TYPE,
            fingerprint: layout.fingerprint,
            page_count: layout.document.page_count(),
            bytes,
        };

        tracing::info!(
            kind = %kind,
            patient_id = %patient.patient_id,
            pages = document.page_count,
            bytes = document.bytes.len(),
            "Receipt exported"
        );
        Ok(document)
    }

    /// Load a patient's visit from the database and render it.
    pub fn export_patient(
        &self,
        db: &Database,
        patient_id: &str,
        kind: ReceiptKind,
    ) -> ExportResult<ReceiptDocument> {
        let record = db.load_appointment_record(patient_id)?;
        self.export(&record, kind)
    }
}

impl Default for ReceiptExporter {
    fn default() -> Self {
        Self::new(ClinicHeader::default())
    }
}

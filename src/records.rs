//! Bills, claims, prescriptions and lab reports.
//!
//! Each record carries a status that maps to a display badge. Lists are
//! filtered by status and shown newest first.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Largest claim attachment accepted, in bytes (5 MiB).
pub const MAX_ATTACHMENT_BYTES: u64 = 5 * 1024 * 1024;

/// Attachment extensions accepted by the claim form.
pub const ALLOWED_ATTACHMENT_EXTENSIONS: [&str; 4] = ["pdf", "jpg", "jpeg", "png"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Success,
    Warning,
    Danger,
    Info,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub label: &'static str,
    pub tone: BadgeTone,
}

impl Badge {
    const fn new(label: &'static str, tone: BadgeTone) -> Self {
        Badge { label, tone }
    }
}

/// Anything rendered with a status badge.
pub trait StatusBadge {
    fn badge(&self) -> Badge;
}

/// A dated record that can be filtered by its status.
pub trait Record {
    type Status: Copy + PartialEq;

    fn status(&self) -> Self::Status;
    fn date(&self) -> NaiveDate;
}

/// Filter by status (or keep all) and sort newest first.
pub fn filter_by_status<R: Record>(records: &[R], status: Option<R::Status>) -> Vec<&R> {
    let mut found: Vec<&R> = records
        .iter()
        .filter(|r| status.map_or(true, |s| r.status() == s))
        .collect();
    found.sort_by(|a, b| b.date().cmp(&a.date()));
    found
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    Paid,
    Pending,
    Overdue,
}

impl StatusBadge for BillStatus {
    fn badge(&self) -> Badge {
        match self {
            BillStatus::Paid => Badge::new("Paid", BadgeTone::Success),
            BillStatus::Pending => Badge::new("Pending", BadgeTone::Warning),
            BillStatus::Overdue => Badge::new("Overdue", BadgeTone::Danger),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: String,
    pub description: String,
    pub amount_cents: u64,
    pub due_date: NaiveDate,
    pub status: BillStatus,
}

impl Record for Bill {
    type Status = BillStatus;

    fn status(&self) -> BillStatus {
        self.status
    }

    fn date(&self) -> NaiveDate {
        self.due_date
    }
}

/// Sum of every bill that is not yet paid.
pub fn outstanding_total(bills: &[Bill]) -> u64 {
    bills
        .iter()
        .filter(|b| b.status != BillStatus::Paid)
        .map(|b| b.amount_cents)
        .sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClaimStatus {
    Approved,
    Pending,
    UnderReview,
    Rejected,
}

impl StatusBadge for ClaimStatus {
    fn badge(&self) -> Badge {
        match self {
            ClaimStatus::Approved => Badge::new("Approved", BadgeTone::Success),
            ClaimStatus::Pending => Badge::new("Pending", BadgeTone::Warning),
            ClaimStatus::UnderReview => Badge::new("Under Review", BadgeTone::Info),
            ClaimStatus::Rejected => Badge::new("Rejected", BadgeTone::Danger),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub id: String,
    pub provider: String,
    pub amount_cents: u64,
    pub submitted_on: NaiveDate,
    pub status: ClaimStatus,
}

impl Record for Claim {
    type Status = ClaimStatus;

    fn status(&self) -> ClaimStatus {
        self.status
    }

    fn date(&self) -> NaiveDate {
        self.submitted_on
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrescriptionStatus {
    Active,
    Completed,
    Expired,
}

impl StatusBadge for PrescriptionStatus {
    fn badge(&self) -> Badge {
        match self {
            PrescriptionStatus::Active => Badge::new("Active", BadgeTone::Success),
            PrescriptionStatus::Completed => Badge::new("Completed", BadgeTone::Neutral),
            PrescriptionStatus::Expired => Badge::new("Expired", BadgeTone::Danger),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    pub id: String,
    pub medication: String,
    pub dosage: String,
    pub prescribed_by: String,
    pub issued_on: NaiveDate,
    pub status: PrescriptionStatus,
}

impl Record for Prescription {
    type Status = PrescriptionStatus;

    fn status(&self) -> PrescriptionStatus {
        self.status
    }

    fn date(&self) -> NaiveDate {
        self.issued_on
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Normal,
    Abnormal,
    Pending,
}

impl StatusBadge for ReportStatus {
    fn badge(&self) -> Badge {
        match self {
            ReportStatus::Normal => Badge::new("Normal", BadgeTone::Success),
            ReportStatus::Abnormal => Badge::new("Abnormal", BadgeTone::Danger),
            ReportStatus::Pending => Badge::new("Pending", BadgeTone::Warning),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub title: String,
    pub doctor_name: String,
    pub date: NaiveDate,
    pub status: ReportStatus,
}

impl Record for Report {
    type Status = ReportStatus;

    fn status(&self) -> ReportStatus {
        self.status
    }

    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Inline validation failures for a claim attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentError {
    Empty,
    UnsupportedType(String),
    TooLarge(u64),
}

impl std::fmt::Display for AttachmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttachmentError::Empty => write!(f, "File is empty"),
            AttachmentError::UnsupportedType(ext) => write!(
                f,
                "Unsupported file type '{}'. Allowed: PDF, JPG, PNG",
                ext
            ),
            AttachmentError::TooLarge(size) => write!(
                f,
                "File is {:.1} MB; the limit is 5 MB",
                *size as f64 / (1024.0 * 1024.0)
            ),
        }
    }
}

/// Check a claim attachment's name and size before upload.
pub fn validate_attachment(file_name: &str, size_bytes: u64) -> Result<(), AttachmentError> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    if !ALLOWED_ATTACHMENT_EXTENSIONS.contains(&extension.as_str()) {
        return Err(AttachmentError::UnsupportedType(extension));
    }
    if size_bytes == 0 {
        return Err(AttachmentError::Empty);
    }
    if size_bytes > MAX_ATTACHMENT_BYTES {
        return Err(AttachmentError::TooLarge(size_bytes));
    }
    Ok(())
}

/// Format cents as a dollar amount.
pub fn format_amount(cents: u64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

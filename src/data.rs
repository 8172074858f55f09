//! Built-in mock data.
//!
//! All records are fictional and embedded at compile time. They are
//! parsed and checked once at startup; nothing downstream re-validates.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

use crate::error::PortalError;
use crate::models::Doctor;
use crate::records::{Bill, Claim, Prescription, Report};

const DOCTORS_JSON: &str = include_str!("../data/doctors.json");
const RECORDS_JSON: &str = include_str!("../data/records.json");

/// The patient's bills, claims, prescriptions and reports.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MedicalRecords {
    pub bills: Vec<Bill>,
    pub claims: Vec<Claim>,
    pub prescriptions: Vec<Prescription>,
    pub reports: Vec<Report>,
}

/// Parse and validate a doctor list.
pub fn parse_doctors(json: &str) -> Result<Vec<Doctor>, PortalError> {
    let doctors: Vec<Doctor> = serde_json::from_str(json)?;
    validate_doctors(&doctors)?;
    Ok(doctors)
}

fn validate_doctors(doctors: &[Doctor]) -> Result<(), PortalError> {
    let mut ids = HashSet::new();
    let mut names = HashSet::new();
    for doctor in doctors {
        if doctor.id.trim().is_empty() || doctor.name.trim().is_empty() {
            return Err(PortalError::InvalidData(
                "Doctor id and name cannot be empty".to_string(),
            ));
        }
        if !ids.insert(doctor.id.as_str()) {
            return Err(PortalError::InvalidData(format!(
                "Duplicate doctor id: {}",
                doctor.id
            )));
        }
        if !names.insert(doctor.name.trim()) {
            return Err(PortalError::InvalidData(format!(
                "Duplicate doctor name: {}",
                doctor.name
            )));
        }
        if !(0.0..=5.0).contains(&doctor.rating) {
            return Err(PortalError::InvalidData(format!(
                "Rating for {} must be between 0 and 5, got {}",
                doctor.name, doctor.rating
            )));
        }
        if doctor.languages.is_empty() {
            return Err(PortalError::InvalidData(format!(
                "{} must list at least one language",
                doctor.name
            )));
        }
    }
    Ok(())
}

pub fn builtin_doctors() -> Result<Vec<Doctor>, PortalError> {
    parse_doctors(DOCTORS_JSON)
}

/// Load doctors from `path`, replacing the built-in list.
pub fn load_doctors_file(path: &Path) -> Result<Vec<Doctor>, PortalError> {
    let text = std::fs::read_to_string(path)?;
    let doctors = parse_doctors(&text)?;
    info!(path = %path.display(), count = doctors.len(), "Loaded doctors");
    Ok(doctors)
}

pub fn parse_records(json: &str) -> Result<MedicalRecords, PortalError> {
    let records: MedicalRecords = serde_json::from_str(json)?;

    let ids = records
        .bills
        .iter()
        .map(|r| r.id.as_str())
        .chain(records.claims.iter().map(|r| r.id.as_str()))
        .chain(records.prescriptions.iter().map(|r| r.id.as_str()))
        .chain(records.reports.iter().map(|r| r.id.as_str()));
    let mut seen = HashSet::new();
    for id in ids {
        if id.trim().is_empty() || !seen.insert(id) {
            return Err(PortalError::InvalidData(format!(
                "Record ids must be unique and non-empty: '{}'",
                id
            )));
        }
    }

    Ok(records)
}

pub fn builtin_records() -> Result<MedicalRecords, PortalError> {
    parse_records(RECORDS_JSON)
}

//! Error types for the portal core.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortalError {
    #[error("{doctor_name} already has an appointment on {date} at {time}")]
    DuplicateAppointment {
        doctor_name: String,
        date: NaiveDate,
        time: String,
    },

    #[error("Appointment not found: {0}")]
    AppointmentNotFound(String),

    #[error("Invalid time slot: '{0}'. Must be one of the half-hour slots 09:00-11:30 or 14:00-16:30")]
    InvalidSlot(String),

    #[error("Invalid appointment type: '{0}'")]
    InvalidAppointmentType(String),

    #[error("Invalid date: '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PortalError {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, PortalError::DuplicateAppointment { .. })
    }
}

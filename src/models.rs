//! Data models for the patient portal.
//!
//! This module defines the core records shared by every page:
//! - AppointmentType: The kind of visit being booked
//! - TimeSlot: One of the fixed half-hour booking labels
//! - Appointment: A confirmed booking held by the store
//! - NewAppointment: A candidate booking before it is stored
//! - Doctor: Read-only directory entry
//! - Notification: Short-lived user-facing message

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::PortalError;

/// Start times of the bookable slots, morning then afternoon session.
const SLOT_TIMES: [(u32, u32); 12] = [
    (9, 0),
    (9, 30),
    (10, 0),
    (10, 30),
    (11, 0),
    (11, 30),
    (14, 0),
    (14, 30),
    (15, 0),
    (15, 30),
    (16, 0),
    (16, 30),
];

/// The kind of visit an appointment is booked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentType {
    #[serde(rename = "Regular Checkup")]
    RegularCheckup,
    #[serde(rename = "Follow-up")]
    FollowUp,
    Consultation,
    Emergency,
}

impl AppointmentType {
    pub const ALL: [AppointmentType; 4] = [
        AppointmentType::RegularCheckup,
        AppointmentType::FollowUp,
        AppointmentType::Consultation,
        AppointmentType::Emergency,
    ];

    /// Convert a form value to an AppointmentType.
    ///
    /// Accepts the display label in any case, with or without the hyphen.
    pub fn from_string(value: &str) -> Result<Self, PortalError> {
        let normalized = value.trim().to_lowercase().replace('-', " ");
        match normalized.as_str() {
            "regular checkup" | "checkup" => Ok(AppointmentType::RegularCheckup),
            "follow up" | "followup" => Ok(AppointmentType::FollowUp),
            "consultation" => Ok(AppointmentType::Consultation),
            "emergency" => Ok(AppointmentType::Emergency),
            _ => Err(PortalError::InvalidAppointmentType(value.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AppointmentType::RegularCheckup => "Regular Checkup",
            AppointmentType::FollowUp => "Follow-up",
            AppointmentType::Consultation => "Consultation",
            AppointmentType::Emergency => "Emergency",
        }
    }
}

impl fmt::Display for AppointmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which half of the clinic day a slot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Session {
    Morning,
    Afternoon,
}

/// One of the fixed half-hour booking labels.
///
/// The set is the same for every doctor and is not derived from any
/// schedule. Values can only be built from that set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeSlot(NaiveTime);

impl TimeSlot {
    /// All slots in chronological order.
    pub fn all() -> Vec<TimeSlot> {
        SLOT_TIMES
            .iter()
            .filter_map(|&(h, m)| NaiveTime::from_hms_opt(h, m, 0))
            .map(TimeSlot)
            .collect()
    }

    /// Parse an `HH:MM` label, rejecting anything outside the fixed set.
    pub fn parse(label: &str) -> Result<Self, PortalError> {
        let time = NaiveTime::parse_from_str(label.trim(), "%H:%M")
            .map_err(|_| PortalError::InvalidSlot(label.to_string()))?;
        Self::from_time(time).ok_or_else(|| PortalError::InvalidSlot(label.to_string()))
    }

    pub fn from_time(time: NaiveTime) -> Option<Self> {
        Self::all().into_iter().find(|slot| slot.0 == time)
    }

    pub fn start_time(&self) -> NaiveTime {
        self.0
    }

    pub fn label(&self) -> String {
        self.0.format("%H:%M").to_string()
    }

    pub fn session(&self) -> Session {
        if self.0 < NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(self.0) {
            Session::Morning
        } else {
            Session::Afternoon
        }
    }

    /// Combine with a date into a naive timestamp.
    pub fn on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.0)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl TryFrom<String> for TimeSlot {
    type Error = PortalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TimeSlot::parse(&value)
    }
}

impl From<TimeSlot> for String {
    fn from(slot: TimeSlot) -> Self {
        slot.label()
    }
}

/// Parse an ISO `YYYY-MM-DD` date as sent by the booking form.
pub fn parse_date(value: &str) -> Result<NaiveDate, PortalError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| PortalError::InvalidDate(value.to_string()))
}

/// A candidate booking, validated but not yet stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub doctor_name: String,
    pub date: NaiveDate,
    pub time: TimeSlot,
    pub appointment_type: AppointmentType,
    pub notes: String,
}

impl NewAppointment {
    /// Create a new candidate with validation.
    pub fn new(
        doctor_name: String,
        date: NaiveDate,
        time: TimeSlot,
        appointment_type: AppointmentType,
        notes: String,
    ) -> Result<Self, PortalError> {
        let doctor_name = doctor_name.trim().to_string();
        if doctor_name.is_empty() {
            return Err(PortalError::InvalidData(
                "Doctor name cannot be empty".to_string(),
            ));
        }

        Ok(NewAppointment {
            doctor_name,
            date,
            time,
            appointment_type,
            notes,
        })
    }

    /// Build a candidate from raw form strings.
    pub fn parse(
        doctor_name: &str,
        date: &str,
        time: &str,
        appointment_type: &str,
        notes: &str,
    ) -> Result<Self, PortalError> {
        NewAppointment::new(
            doctor_name.to_string(),
            parse_date(date)?,
            TimeSlot::parse(time)?,
            AppointmentType::from_string(appointment_type)?,
            notes.to_string(),
        )
    }
}

/// A confirmed appointment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub doctor_name: String,
    pub date: NaiveDate,
    pub time: TimeSlot,
    #[serde(rename = "type")]
    pub appointment_type: AppointmentType,
    pub notes: String,
    pub created_at: DateTime<Local>,
}

impl Appointment {
    /// Assign identity to a candidate. Ids are time-ordered UUIDv7 values.
    pub fn from_candidate(candidate: NewAppointment, created_at: DateTime<Local>) -> Self {
        Appointment {
            id: Uuid::now_v7(),
            doctor_name: candidate.doctor_name,
            date: candidate.date,
            time: candidate.time,
            appointment_type: candidate.appointment_type,
            notes: candidate.notes,
            created_at,
        }
    }

    /// Check whether this appointment occupies the given (doctor, date, time).
    pub fn occupies(&self, doctor_name: &str, date: NaiveDate, time: TimeSlot) -> bool {
        self.doctor_name == doctor_name && self.date == date && self.time == time
    }

    pub fn starts_at(&self) -> NaiveDateTime {
        self.time.on(self.date)
    }
}

/// Read-only doctor directory entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub specialty: String,
    #[serde(default)]
    pub subspecialty: String,
    pub rating: f32,
    #[serde(rename = "availability")]
    pub available: bool,
    pub experience: String,
    #[serde(default)]
    pub qualifications: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub schedule: String,
    #[serde(default)]
    pub specializations: Vec<String>,
}

impl Doctor {
    /// Years of experience, read from the leading integer of strings
    /// such as "10 years". Missing digits count as zero.
    pub fn experience_years(&self) -> u32 {
        let digits: String = self
            .experience
            .trim_start()
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse().unwrap_or(0)
    }

    pub fn speaks(&self, language: &str) -> bool {
        self.languages.iter().any(|l| l == language)
    }
}

/// Severity of a notification, which drives its styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

/// A short-lived message shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub created_at: DateTime<Local>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_set_has_two_sessions_of_six() {
        let slots = TimeSlot::all();
        assert_eq!(slots.len(), 12);
        assert_eq!(slots[0].label(), "09:00");
        assert_eq!(slots[5].label(), "11:30");
        assert_eq!(slots[6].label(), "14:00");
        assert_eq!(slots[11].label(), "16:30");
        assert_eq!(
            slots.iter().filter(|s| s.session() == Session::Morning).count(),
            6
        );
    }

    #[test]
    fn slot_parse_rejects_off_grid_times() {
        assert!(TimeSlot::parse("09:30").is_ok());
        assert!(matches!(
            TimeSlot::parse("12:00"),
            Err(PortalError::InvalidSlot(_))
        ));
        assert!(TimeSlot::parse("09:15").is_err());
        assert!(TimeSlot::parse("nine").is_err());
    }

    #[test]
    fn slot_serializes_as_label() {
        let slot = TimeSlot::parse("14:30").unwrap();
        let json = serde_json::to_string(&slot).unwrap();
        assert_eq!(json, "\"14:30\"");
        let back: TimeSlot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, slot);
        assert!(serde_json::from_str::<TimeSlot>("\"13:00\"").is_err());
    }

    #[test]
    fn appointment_type_accepts_labels() {
        assert_eq!(
            AppointmentType::from_string("Follow-up").unwrap(),
            AppointmentType::FollowUp
        );
        assert_eq!(
            AppointmentType::from_string("regular checkup").unwrap(),
            AppointmentType::RegularCheckup
        );
        assert!(AppointmentType::from_string("surgery").is_err());
    }

    #[test]
    fn candidate_requires_doctor_name() {
        let err = NewAppointment::parse("  ", "2025-05-01", "09:00", "Consultation", "")
            .unwrap_err();
        assert!(matches!(err, PortalError::InvalidData(_)));
    }

    #[test]
    fn candidate_rejects_bad_date() {
        let err = NewAppointment::parse("Dr. Lee", "05/01/2025", "09:00", "Consultation", "")
            .unwrap_err();
        assert!(matches!(err, PortalError::InvalidDate(_)));
    }

    #[test]
    fn experience_reads_leading_integer() {
        let mut doctor = sample_doctor();
        doctor.experience = "15 years".to_string();
        assert_eq!(doctor.experience_years(), 15);
        doctor.experience = "over a decade".to_string();
        assert_eq!(doctor.experience_years(), 0);
    }

    fn sample_doctor() -> Doctor {
        Doctor {
            id: "d1".to_string(),
            name: "Dr. Lee".to_string(),
            specialty: "Cardiology".to_string(),
            subspecialty: "Interventional".to_string(),
            rating: 4.5,
            available: true,
            experience: "10 years".to_string(),
            qualifications: vec![],
            languages: vec!["English".to_string()],
            schedule: String::new(),
            specializations: vec![],
        }
    }
}

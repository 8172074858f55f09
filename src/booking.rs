//! Appointment booking form.
//!
//! This module turns the raw values typed into the booking form into a
//! validated candidate and hands it to the store. Field problems are
//! reported inline; a duplicate booking is reported as its own outcome.

use crate::calendar::{CalendarView, SlotStatus};
use crate::directory::DoctorDirectory;
use crate::error::PortalError;
use crate::models::{parse_date, Appointment, AppointmentType, NewAppointment, NotificationKind, TimeSlot};
use crate::notifications::NotificationCenter;
use crate::store::AppointmentStore;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Doctor,
    Date,
    Time,
    AppointmentType,
}

/// Inline error text for one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    fn new(field: Field, message: impl Into<String>) -> Self {
        FieldError {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BookingOutcome {
    Booked(Appointment),
    Duplicate(String),
    Invalid(Vec<FieldError>),
}

/// Raw values as entered by the patient.
#[derive(Debug, Clone, Default)]
pub struct BookingForm {
    pub doctor_name: String,
    pub date: String,
    pub time: String,
    pub appointment_type: String,
    pub notes: String,
}

impl BookingForm {
    /// Check every field and build a candidate, or collect all field errors.
    pub fn validate(
        &self,
        directory: &DoctorDirectory,
        calendar: &CalendarView<'_>,
    ) -> Result<NewAppointment, Vec<FieldError>> {
        let mut errors = Vec::new();

        let doctor_name = self.doctor_name.trim();
        if doctor_name.is_empty() {
            errors.push(FieldError::new(Field::Doctor, "Please select a doctor"));
        } else {
            match directory.find_by_name(doctor_name) {
                None => errors.push(FieldError::new(Field::Doctor, "Unknown doctor")),
                Some(doctor) if !doctor.available => errors.push(FieldError::new(
                    Field::Doctor,
                    format!("{} is not accepting appointments", doctor.name),
                )),
                Some(_) => {}
            }
        }

        let date = match parse_date(&self.date) {
            Ok(date) if date < calendar.today() => {
                errors.push(FieldError::new(Field::Date, "Date is in the past"));
                None
            }
            Ok(date) if !calendar.is_date_selectable(date) => {
                errors.push(FieldError::new(
                    Field::Date,
                    format!("Bookings are open until {}", calendar.horizon_end()),
                ));
                None
            }
            Ok(date) => Some(date),
            Err(_) => {
                errors.push(FieldError::new(Field::Date, "Please choose a valid date"));
                None
            }
        };

        let time = match TimeSlot::parse(&self.time) {
            Ok(slot) => Some(slot),
            Err(e) => {
                errors.push(FieldError::new(Field::Time, e.to_string()));
                None
            }
        };

        if let (Some(date), Some(slot)) = (date, time) {
            let past = calendar
                .slot_availability(date, None)
                .iter()
                .any(|a| a.slot == slot && a.status == SlotStatus::Past);
            if past {
                errors.push(FieldError::new(Field::Time, "This time has already passed"));
            }
        }

        let appointment_type = match AppointmentType::from_string(&self.appointment_type) {
            Ok(kind) => Some(kind),
            Err(_) => {
                errors.push(FieldError::new(
                    Field::AppointmentType,
                    "Please choose an appointment type",
                ));
                None
            }
        };

        match (date, time, appointment_type) {
            (Some(date), Some(time), Some(kind)) if errors.is_empty() => NewAppointment::new(
                doctor_name.to_string(),
                date,
                time,
                kind,
                self.notes.trim().to_string(),
            )
            .map_err(|e| vec![FieldError::new(Field::Doctor, e.to_string())]),
            _ => Err(errors),
        }
    }

    /// Validate, add to the store and report the result as a notification.
    pub fn submit(
        &self,
        directory: &DoctorDirectory,
        store: &mut AppointmentStore,
        notifications: &mut NotificationCenter,
        now: chrono::NaiveDateTime,
        horizon_months: u32,
    ) -> Result<BookingOutcome, PortalError> {
        let candidate = {
            let calendar = CalendarView::new(store.appointments(), now, horizon_months);
            match self.validate(directory, &calendar) {
                Ok(candidate) => candidate,
                Err(errors) => return Ok(BookingOutcome::Invalid(errors)),
            }
        };

        match store.add_appointment(candidate) {
            Ok(appointment) => {
                notifications.notify(
                    format!(
                        "Appointment booked with {} on {} at {}",
                        appointment.doctor_name, appointment.date, appointment.time
                    ),
                    NotificationKind::Success,
                );
                Ok(BookingOutcome::Booked(appointment))
            }
            Err(e) if e.is_duplicate() => {
                let message = format!("You already have this appointment. {}", e);
                notifications.notify(message.clone(), NotificationKind::Error);
                Ok(BookingOutcome::Duplicate(message))
            }
            Err(e) => Err(e),
        }
    }
}

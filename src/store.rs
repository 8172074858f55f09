//! Appointment store for the current patient.
//!
//! This module provides the AppointmentStore which owns the patient's
//! booked appointments and enforces that no two of them share the same
//! doctor, date and time slot.

use crate::error::PortalError;
use crate::models::{Appointment, NewAppointment, TimeSlot};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct AppointmentStore {
    appointments: Vec<Appointment>,
}

impl AppointmentStore {
    pub fn new() -> Self {
        AppointmentStore::default()
    }

    /// All appointments in insertion order.
    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn len(&self) -> usize {
        self.appointments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }

    /// Add an appointment stamped with the current local time.
    pub fn add_appointment(&mut self, candidate: NewAppointment) -> Result<Appointment, PortalError> {
        self.add_appointment_at(candidate, Local::now())
    }

    /// Add an appointment, failing if the doctor already has one at the
    /// same date and time.
    pub fn add_appointment_at(
        &mut self,
        candidate: NewAppointment,
        created_at: DateTime<Local>,
    ) -> Result<Appointment, PortalError> {
        self.ensure_free(&candidate.doctor_name, candidate.date, candidate.time, None)?;

        let appointment = Appointment::from_candidate(candidate, created_at);
        info!(
            id = %appointment.id,
            doctor = %appointment.doctor_name,
            date = %appointment.date,
            time = %appointment.time,
            "Appointment booked"
        );
        self.appointments.push(appointment.clone());
        Ok(appointment)
    }

    /// Find an appointment held by `doctor_name` at (date, time), ignoring
    /// the appointment with id `exclude` if given.
    pub fn find_conflict(
        &self,
        doctor_name: &str,
        date: NaiveDate,
        time: TimeSlot,
        exclude: Option<Uuid>,
    ) -> Option<&Appointment> {
        self.appointments
            .iter()
            .filter(|apt| Some(apt.id) != exclude)
            .find(|apt| apt.occupies(doctor_name, date, time))
    }

    fn ensure_free(
        &self,
        doctor_name: &str,
        date: NaiveDate,
        time: TimeSlot,
        exclude: Option<Uuid>,
    ) -> Result<(), PortalError> {
        if self.find_conflict(doctor_name, date, time, exclude).is_some() {
            warn!(doctor = %doctor_name, %date, %time, "Duplicate appointment rejected");
            return Err(PortalError::DuplicateAppointment {
                doctor_name: doctor_name.to_string(),
                date,
                time: time.label(),
            });
        }
        Ok(())
    }

    /// Get an appointment by its ID.
    pub fn get(&self, id: Uuid) -> Option<&Appointment> {
        self.appointments.iter().find(|apt| apt.id == id)
    }

    /// Get all appointments sorted by date, then time.
    pub fn sorted_by_date(&self) -> Vec<&Appointment> {
        let mut sorted: Vec<&Appointment> = self.appointments.iter().collect();
        sorted.sort_by_key(|apt| apt.starts_at());
        sorted
    }

    /// Get all appointments on a specific date, ordered by time.
    pub fn appointments_on(&self, date: NaiveDate) -> Vec<&Appointment> {
        let mut on_date: Vec<&Appointment> = self
            .appointments
            .iter()
            .filter(|apt| apt.date == date)
            .collect();
        on_date.sort_by_key(|apt| apt.time);
        on_date
    }

    pub fn has_appointments_on(&self, date: NaiveDate) -> bool {
        self.appointments.iter().any(|apt| apt.date == date)
    }

    /// Appointments starting at or after `now`, soonest first.
    pub fn upcoming(&self, now: NaiveDateTime, limit: usize) -> Vec<&Appointment> {
        self.sorted_by_date()
            .into_iter()
            .filter(|apt| apt.starts_at() >= now)
            .take(limit)
            .collect()
    }

    /// Cancel an appointment and return it.
    pub fn cancel_appointment(&mut self, id: Uuid) -> Result<Appointment, PortalError> {
        let index = self
            .appointments
            .iter()
            .position(|apt| apt.id == id)
            .ok_or_else(|| PortalError::AppointmentNotFound(id.to_string()))?;

        let removed = self.appointments.remove(index);
        info!(id = %removed.id, doctor = %removed.doctor_name, "Appointment cancelled");
        Ok(removed)
    }

    /// Move an appointment to a new date and slot with the same doctor.
    ///
    /// The appointment keeps its id and its position in the list.
    pub fn reschedule_appointment(
        &mut self,
        id: Uuid,
        date: NaiveDate,
        time: TimeSlot,
    ) -> Result<Appointment, PortalError> {
        let doctor_name = self
            .get(id)
            .map(|apt| apt.doctor_name.clone())
            .ok_or_else(|| PortalError::AppointmentNotFound(id.to_string()))?;

        self.ensure_free(&doctor_name, date, time, Some(id))?;

        let appointment = self
            .appointments
            .iter_mut()
            .find(|apt| apt.id == id)
            .ok_or_else(|| PortalError::AppointmentNotFound(id.to_string()))?;

        appointment.date = date;
        appointment.time = time;
        info!(id = %id, %date, %time, "Appointment rescheduled");
        Ok(appointment.clone())
    }
}

impl std::fmt::Display for AppointmentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AppointmentStore(appointments={})", self.appointments.len())
    }
}

//! Application state for the portal.
//!
//! The Portal owns everything a page can read or change. Front ends hold
//! it and pass it by reference; there is no global state.

use crate::booking::{BookingForm, BookingOutcome};
use crate::calendar::{CalendarView, SlotStatus};
use crate::config::PortalConfig;
use crate::data::{builtin_doctors, builtin_records, load_doctors_file, MedicalRecords};
use crate::directory::DoctorDirectory;
use crate::error::PortalError;
use crate::models::{Appointment, NotificationKind, TimeSlot};
use crate::notifications::NotificationCenter;
use crate::records::{outstanding_total, ClaimStatus, PrescriptionStatus};
use crate::store::AppointmentStore;
use chrono::{NaiveDate, NaiveDateTime};
use tracing::info;
use uuid::Uuid;

/// Figures shown on the dashboard cards.
#[derive(Debug, Clone)]
pub struct DashboardSummary {
    pub upcoming: Vec<Appointment>,
    pub total_appointments: usize,
    pub outstanding_cents: u64,
    pub active_prescriptions: usize,
    pub open_claims: usize,
}

pub struct Portal {
    pub config: PortalConfig,
    pub directory: DoctorDirectory,
    pub store: AppointmentStore,
    pub notifications: NotificationCenter,
    pub records: MedicalRecords,
}

impl Portal {
    /// Load mock data and open the notification file named by `config`.
    pub fn new(config: PortalConfig) -> Result<Self, PortalError> {
        let doctors = match &config.doctors_path {
            Some(path) => load_doctors_file(path)?,
            None => builtin_doctors()?,
        };
        let notifications =
            NotificationCenter::open(&config.notifications_path, config.notification_ttl()?)?;
        let records = builtin_records()?;

        info!(
            doctors = doctors.len(),
            notifications = notifications.len(),
            "Portal ready"
        );
        Ok(Portal {
            directory: DoctorDirectory::new(doctors),
            store: AppointmentStore::new(),
            notifications,
            records,
            config,
        })
    }

    /// Portal on built-in data with nothing written to disk.
    pub fn in_memory() -> Result<Self, PortalError> {
        let config = PortalConfig::default();
        Ok(Portal {
            directory: DoctorDirectory::new(builtin_doctors()?),
            store: AppointmentStore::new(),
            notifications: NotificationCenter::in_memory(config.notification_ttl()?),
            records: builtin_records()?,
            config,
        })
    }

    pub fn calendar(&self, now: NaiveDateTime) -> CalendarView<'_> {
        CalendarView::new(self.store.appointments(), now, self.config.booking_horizon_months)
    }

    pub fn book(&mut self, form: &BookingForm, now: NaiveDateTime) -> Result<BookingOutcome, PortalError> {
        form.submit(
            &self.directory,
            &mut self.store,
            &mut self.notifications,
            now,
            self.config.booking_horizon_months,
        )
    }

    pub fn cancel(&mut self, id: Uuid) -> Result<Appointment, PortalError> {
        let cancelled = self.store.cancel_appointment(id)?;
        self.notifications.notify(
            format!(
                "Appointment with {} on {} at {} cancelled",
                cancelled.doctor_name, cancelled.date, cancelled.time
            ),
            NotificationKind::Info,
        );
        Ok(cancelled)
    }

    /// Move an appointment, applying the same date and slot rules as booking.
    pub fn reschedule(
        &mut self,
        id: Uuid,
        date: NaiveDate,
        time: TimeSlot,
        now: NaiveDateTime,
    ) -> Result<Appointment, PortalError> {
        {
            let calendar = self.calendar(now);
            if !calendar.is_date_selectable(date) {
                return Err(PortalError::InvalidDate(date.to_string()));
            }
            let past = calendar
                .slot_availability(date, None)
                .iter()
                .any(|a| a.slot == time && a.status == SlotStatus::Past);
            if past {
                return Err(PortalError::InvalidSlot(time.label()));
            }
        }

        let moved = self.store.reschedule_appointment(id, date, time)?;
        self.notifications.notify(
            format!(
                "Appointment with {} moved to {} at {}",
                moved.doctor_name, moved.date, moved.time
            ),
            NotificationKind::Success,
        );
        Ok(moved)
    }

    pub fn dashboard(&self, now: NaiveDateTime, limit: usize) -> DashboardSummary {
        DashboardSummary {
            upcoming: self.store.upcoming(now, limit).into_iter().cloned().collect(),
            total_appointments: self.store.len(),
            outstanding_cents: outstanding_total(&self.records.bills),
            active_prescriptions: self
                .records
                .prescriptions
                .iter()
                .filter(|p| p.status == PrescriptionStatus::Active)
                .count(),
            open_claims: self
                .records
                .claims
                .iter()
                .filter(|c| matches!(c.status, ClaimStatus::Pending | ClaimStatus::UnderReview))
                .count(),
        }
    }
}

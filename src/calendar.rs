//! Calendar and slot availability for the booking pages.
//!
//! This module provides the CalendarView which paints a month grid and
//! computes which of the fixed time slots can still be booked on a day.
//! It reads the store's appointments and never owns or changes them.

use crate::error::PortalError;
use crate::models::{Appointment, TimeSlot};
use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};
use std::fmt;

/// Why a slot can or cannot be picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    Available,
    /// The slot starts earlier than the current time today.
    Past,
    /// An appointment already holds the slot.
    Booked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotAvailability {
    pub slot: TimeSlot,
    pub status: SlotStatus,
}

impl SlotAvailability {
    pub fn is_available(&self) -> bool {
        self.status == SlotStatus::Available
    }
}

/// One cell of the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub is_today: bool,
    pub disabled: bool,
    pub has_appointments: bool,
}

/// A month laid out in Sunday-first weeks. Cells outside the month are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<[Option<CalendarDay>; 7]>,
}

impl MonthGrid {
    /// All in-month days in order.
    pub fn days(&self) -> impl Iterator<Item = &CalendarDay> {
        self.weeks.iter().flat_map(|week| week.iter().flatten())
    }

    pub fn day(&self, day: u32) -> Option<&CalendarDay> {
        self.days().find(|d| d.date.day() == day)
    }
}

impl fmt::Display for MonthGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_default();
        writeln!(f, "{:^28}", title)?;
        writeln!(f, " Su  Mo  Tu  We  Th  Fr  Sa")?;
        for week in &self.weeks {
            for cell in week {
                match cell {
                    Some(day) => {
                        let marker = if day.has_appointments {
                            '*'
                        } else if day.disabled {
                            '-'
                        } else if day.is_today {
                            '<'
                        } else {
                            ' '
                        };
                        write!(f, " {:>2}{}", day.date.day(), marker)?;
                    }
                    None => write!(f, "    ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Read-only view over the patient's appointments at a fixed "now".
pub struct CalendarView<'a> {
    appointments: &'a [Appointment],
    now: NaiveDateTime,
    horizon_months: u32,
}

impl<'a> CalendarView<'a> {
    pub fn new(appointments: &'a [Appointment], now: NaiveDateTime, horizon_months: u32) -> Self {
        CalendarView {
            appointments,
            now,
            horizon_months,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date()
    }

    /// Last date that can still be booked.
    pub fn horizon_end(&self) -> NaiveDate {
        self.today()
            .checked_add_months(Months::new(self.horizon_months))
            .unwrap_or(NaiveDate::MAX)
    }

    /// A date can be picked when it is neither in the past nor beyond the horizon.
    pub fn is_date_selectable(&self, date: NaiveDate) -> bool {
        date >= self.today() && date <= self.horizon_end()
    }

    fn is_booked(&self, date: NaiveDate, slot: TimeSlot, doctor_name: Option<&str>) -> bool {
        self.appointments.iter().any(|apt| {
            apt.date == date
                && apt.time == slot
                && doctor_name.map_or(true, |name| apt.doctor_name == name)
        })
    }

    /// Status of every slot on `date`.
    ///
    /// With a doctor, only that doctor's appointments block a slot. Without
    /// one, any appointment at the same date and time does.
    pub fn slot_availability(&self, date: NaiveDate, doctor_name: Option<&str>) -> Vec<SlotAvailability> {
        let is_today = date == self.today();
        let current_time = self.now.time();

        TimeSlot::all()
            .into_iter()
            .map(|slot| {
                let status = if is_today && slot.start_time() < current_time {
                    SlotStatus::Past
                } else if self.is_booked(date, slot, doctor_name) {
                    SlotStatus::Booked
                } else {
                    SlotStatus::Available
                };
                SlotAvailability { slot, status }
            })
            .collect()
    }

    /// Slots that can still be booked on `date`.
    pub fn available_slots(&self, date: NaiveDate, doctor_name: Option<&str>) -> Vec<TimeSlot> {
        self.slot_availability(date, doctor_name)
            .into_iter()
            .filter(SlotAvailability::is_available)
            .map(|a| a.slot)
            .collect()
    }

    /// Lay out a month with disabled and marked days.
    pub fn month(&self, year: i32, month: u32) -> Result<MonthGrid, PortalError> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| PortalError::InvalidDate(format!("{:04}-{:02}", year, month)))?;
        let next_first = first
            .checked_add_months(Months::new(1))
            .ok_or_else(|| PortalError::InvalidDate(format!("{:04}-{:02}", year, month)))?;

        let leading = first.weekday().num_days_from_sunday() as usize;
        let mut cells: Vec<Option<CalendarDay>> = vec![None; leading];

        for date in first.iter_days().take_while(|d| *d < next_first) {
            cells.push(Some(CalendarDay {
                date,
                is_today: date == self.today(),
                disabled: !self.is_date_selectable(date),
                has_appointments: self.appointments.iter().any(|apt| apt.date == date),
            }));
        }
        while cells.len() % 7 != 0 {
            cells.push(None);
        }

        let weeks = cells
            .chunks(7)
            .map(|chunk| {
                let mut week = [None; 7];
                week.copy_from_slice(chunk);
                week
            })
            .collect();

        Ok(MonthGrid { year, month, weeks })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewAppointment;
    use crate::store::AppointmentStore;

    fn at(date: &str, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    fn slot(value: &str) -> TimeSlot {
        TimeSlot::parse(value).unwrap()
    }

    fn status_of(list: &[SlotAvailability], label: &str) -> SlotStatus {
        list.iter().find(|a| a.slot == slot(label)).unwrap().status
    }

    #[test]
    fn today_afternoon_disables_earlier_slots_only() {
        let view = CalendarView::new(&[], at("2025-05-01", 15, 0), 3);
        let slots = view.slot_availability(date("2025-05-01"), None);

        assert_eq!(status_of(&slots, "14:00"), SlotStatus::Past);
        assert_eq!(status_of(&slots, "14:30"), SlotStatus::Past);
        assert_eq!(status_of(&slots, "15:00"), SlotStatus::Available);
        assert_eq!(status_of(&slots, "15:30"), SlotStatus::Available);
        assert_eq!(status_of(&slots, "09:00"), SlotStatus::Past);
    }

    #[test]
    fn future_day_ignores_time_of_day() {
        let view = CalendarView::new(&[], at("2025-05-01", 23, 0), 3);
        assert_eq!(view.available_slots(date("2025-05-02"), None).len(), 12);
    }

    #[test]
    fn booked_slot_scoped_by_doctor_when_given() {
        let mut store = AppointmentStore::new();
        store
            .add_appointment(NewAppointment::parse("Dr. Lee", "2025-05-02", "10:00", "Consultation", "").unwrap())
            .unwrap();
        let view = CalendarView::new(store.appointments(), at("2025-05-01", 8, 0), 3);

        let overall = view.slot_availability(date("2025-05-02"), None);
        assert_eq!(status_of(&overall, "10:00"), SlotStatus::Booked);

        let for_lee = view.slot_availability(date("2025-05-02"), Some("Dr. Lee"));
        assert_eq!(status_of(&for_lee, "10:00"), SlotStatus::Booked);

        let for_patel = view.slot_availability(date("2025-05-02"), Some("Dr. Patel"));
        assert_eq!(status_of(&for_patel, "10:00"), SlotStatus::Available);
    }

    #[test]
    fn past_takes_precedence_over_booked() {
        let mut store = AppointmentStore::new();
        store
            .add_appointment(NewAppointment::parse("Dr. Lee", "2025-05-01", "09:00", "Consultation", "").unwrap())
            .unwrap();
        let view = CalendarView::new(store.appointments(), at("2025-05-01", 10, 0), 3);
        let slots = view.slot_availability(date("2025-05-01"), None);
        assert_eq!(status_of(&slots, "09:00"), SlotStatus::Past);
    }

    #[test]
    fn dates_outside_window_are_not_selectable() {
        let view = CalendarView::new(&[], at("2025-05-15", 9, 0), 3);
        assert!(!view.is_date_selectable(date("2025-05-14")));
        assert!(view.is_date_selectable(date("2025-05-15")));
        assert!(view.is_date_selectable(date("2025-08-15")));
        assert!(!view.is_date_selectable(date("2025-08-16")));
    }

    #[test]
    fn horizon_clamps_to_month_end() {
        let view = CalendarView::new(&[], at("2025-11-30", 9, 0), 3);
        assert_eq!(view.horizon_end(), date("2026-02-28"));
    }

    #[test]
    fn month_grid_layout_and_markers() {
        let mut store = AppointmentStore::new();
        store
            .add_appointment(NewAppointment::parse("Dr. Lee", "2025-05-20", "09:00", "Follow-up", "").unwrap())
            .unwrap();
        let view = CalendarView::new(store.appointments(), at("2025-05-10", 9, 0), 3);
        let grid = view.month(2025, 5).unwrap();

        // May 1st 2025 is a Thursday.
        assert!(grid.weeks[0][3].is_none());
        assert_eq!(grid.weeks[0][4].unwrap().date, date("2025-05-01"));
        assert_eq!(grid.days().count(), 31);
        assert_eq!(grid.weeks.len(), 5);

        assert!(grid.day(9).unwrap().disabled);
        assert!(!grid.day(10).unwrap().disabled);
        assert!(grid.day(10).unwrap().is_today);
        assert!(grid.day(20).unwrap().has_appointments);
        assert!(!grid.day(21).unwrap().has_appointments);
    }

    #[test]
    fn month_grid_rejects_bad_month() {
        let view = CalendarView::new(&[], at("2025-05-10", 9, 0), 3);
        assert!(matches!(view.month(2025, 13), Err(PortalError::InvalidDate(_))));
    }

    #[test]
    fn month_grid_renders() {
        let view = CalendarView::new(&[], at("2025-05-10", 9, 0), 3);
        let text = view.month(2025, 5).unwrap().to_string();
        assert!(text.contains("May 2025"));
        assert!(text.contains(" Su  Mo"));
    }
}

use carebook::booking::{BookingForm, BookingOutcome};
use carebook::calendar::{CalendarView, SlotStatus};
use carebook::data::builtin_doctors;
use carebook::directory::{DoctorDirectory, DoctorFilter, SortKey};
use carebook::models::{NewAppointment, TimeSlot};
use carebook::store::AppointmentStore;
use carebook::Portal;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashSet;

fn at(date: &str, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

#[test]
fn same_triple_fails_and_next_slot_succeeds() {
    let mut store = AppointmentStore::new();
    store
        .add_appointment(NewAppointment::parse("Dr. Lee", "2025-05-01", "09:00", "Regular Checkup", "").unwrap())
        .unwrap();

    let duplicate = store
        .add_appointment(NewAppointment::parse("Dr. Lee", "2025-05-01", "09:00", "Regular Checkup", "").unwrap());
    assert!(duplicate.unwrap_err().is_duplicate());

    store
        .add_appointment(NewAppointment::parse("Dr. Lee", "2025-05-01", "09:30", "Regular Checkup", "").unwrap())
        .unwrap();
    assert_eq!(store.len(), 2);
}

#[test]
fn store_never_holds_two_appointments_with_same_key() {
    let mut store = AppointmentStore::new();
    let doctors = ["Dr. Lee", "Dr. Patel"];
    let dates = ["2025-05-01", "2025-05-02"];
    let slots = TimeSlot::all();

    // Every combination twice; the second pass must be fully rejected.
    for _ in 0..2 {
        for doctor in doctors {
            for date in dates {
                for slot in &slots {
                    let candidate =
                        NewAppointment::parse(doctor, date, &slot.label(), "Consultation", "").unwrap();
                    let _ = store.add_appointment(candidate);
                }
            }
        }
    }

    assert_eq!(store.len(), doctors.len() * dates.len() * slots.len());
    let keys: HashSet<(String, NaiveDate, TimeSlot)> = store
        .appointments()
        .iter()
        .map(|a| (a.doctor_name.clone(), a.date, a.time))
        .collect();
    assert_eq!(keys.len(), store.len());
}

#[test]
fn today_at_three_pm_disables_two_pm_keeps_half_past_three() {
    let view = CalendarView::new(&[], at("2025-05-01", 15, 0), 3);
    let slots = view.slot_availability(at("2025-05-01", 0, 0).date(), None);

    let status = |label: &str| {
        slots
            .iter()
            .find(|a| a.slot == TimeSlot::parse(label).unwrap())
            .unwrap()
            .status
    };
    assert_eq!(status("14:00"), SlotStatus::Past);
    assert_eq!(status("15:30"), SlotStatus::Available);
}

#[test]
fn directory_properties_hold_for_builtin_doctors() {
    let directory = DoctorDirectory::new(builtin_doctors().unwrap());

    let available = directory.search(&DoctorFilter {
        available_only: true,
        ..Default::default()
    });
    assert!(!available.is_empty());
    assert!(available.iter().all(|d| d.available));

    let by_rating = directory.search(&DoctorFilter {
        sort: SortKey::Rating,
        ..Default::default()
    });
    assert!(by_rating.windows(2).all(|w| w[0].rating >= w[1].rating));
}

#[test]
fn portal_booking_flow_end_to_end() {
    let mut portal = Portal::in_memory().unwrap();
    let now = at("2025-05-01", 15, 0);

    let form = BookingForm {
        doctor_name: "Dr. Maria Garcia".to_string(),
        date: "2025-05-01".to_string(),
        time: "15:30".to_string(),
        appointment_type: "Consultation".to_string(),
        notes: String::new(),
    };

    let booked = match portal.book(&form, now).unwrap() {
        BookingOutcome::Booked(apt) => apt,
        other => panic!("expected booking, got {:?}", other),
    };

    let calendar = portal.calendar(now);
    let grid = calendar.month(2025, 5).unwrap();
    assert!(grid.day(1).unwrap().has_appointments);
    assert!(!calendar
        .available_slots(booked.date, Some("Dr. Maria Garcia"))
        .contains(&booked.time));
    assert!(calendar
        .available_slots(booked.date, Some("Dr. Sarah Lee"))
        .contains(&booked.time));

    assert!(matches!(
        portal.book(&form, now).unwrap(),
        BookingOutcome::Duplicate(_)
    ));
    assert_eq!(portal.store.len(), 1);
}

//! Command-line front end for the patient portal.
//!
//! This module provides an interactive menu for finding doctors, booking
//! and managing appointments, and browsing medical records.

use carebook::booking::{BookingForm, BookingOutcome};
use carebook::config::{self, PortalConfig};
use carebook::directory::{DoctorFilter, SortKey};
use carebook::models::{parse_date, AppointmentType, TimeSlot};
use carebook::records::{filter_by_status, format_amount, validate_attachment, StatusBadge};
use carebook::routes::Page;
use carebook::Portal;
use chrono::{Datelike, Duration, Local, NaiveDateTime};
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

struct PortalCLI {
    portal: Portal,
    running: bool,
}

impl PortalCLI {
    fn new(portal: Portal) -> Self {
        PortalCLI {
            portal,
            running: true,
        }
    }

    fn now() -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn print_header(&self) {
        println!("\n{}", "=".repeat(60));
        println!("       {} PATIENT PORTAL v{}", config::APP_NAME.to_uppercase(), config::APP_VERSION);
        println!("{}", "=".repeat(60));
    }

    fn print_menu(&self) {
        println!("\n--- Main Menu ---");
        println!("1. Find a doctor");
        println!("2. View available slots");
        println!("3. Book appointment");
        println!("4. View my appointments");
        println!("5. Cancel appointment");
        println!("6. Reschedule appointment");
        println!("7. Calendar");
        println!("8. Medical records");
        println!("9. Notifications");
        println!("10. Go to page");
        println!("11. Run demo");
        println!("0. Exit");
        println!("{}", "-".repeat(20));
    }

    fn get_input(&mut self, prompt: &str, default: Option<&str>) -> String {
        if let Some(def) = default {
            print!("{} [{}]: ", prompt, def);
        } else {
            print!("{}: ", prompt);
        }
        let _ = io::stdout().flush();

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) | Err(_) => {
                self.running = false;
                return default.unwrap_or("").to_string();
            }
            Ok(_) => {}
        }
        let input = input.trim();

        if input.is_empty() {
            default.unwrap_or("").to_string()
        } else {
            input.to_string()
        }
    }

    fn get_int_input(&mut self, prompt: &str, default: Option<i32>) -> i32 {
        loop {
            let default_str = default.map(|d| d.to_string());
            let input = self.get_input(prompt, default_str.as_deref());

            if let Ok(value) = input.parse::<i32>() {
                return value;
            }
            if !self.running {
                return default.unwrap_or(0);
            }
            println!("Please enter a valid number");
        }
    }

    fn find_doctor(&mut self) {
        println!("\n--- Find a Doctor ---");

        let search = self.get_input("Search name or specialty", Some(""));
        let specialties = self.portal.directory.specialties().join(", ");
        println!("Specialties: {}", specialties);
        let specialty = self.get_input("Specialty", Some("all"));
        let language = self.get_input("Language", Some("all"));
        let available_only = self.get_input("Available only? (y/n)", Some("n"));
        let sort = self.get_input("Sort by (rating/experience/name)", Some("rating"));

        let to_filter = |value: String| if value.eq_ignore_ascii_case("all") { None } else { Some(value) };
        let filter = DoctorFilter {
            search,
            specialty: to_filter(specialty),
            language: to_filter(language),
            available_only: available_only.eq_ignore_ascii_case("y"),
            sort: SortKey::from_string(&sort).unwrap_or_default(),
        };

        let found = self.portal.directory.search(&filter);
        if found.is_empty() {
            println!("\nNo doctors match your search");
            return;
        }

        println!("\n--- {} doctor(s) ---", found.len());
        for doctor in found {
            println!(
                "\n  {} ({}{})",
                doctor.name,
                doctor.specialty,
                if doctor.subspecialty.is_empty() {
                    String::new()
                } else {
                    format!(" - {}", doctor.subspecialty)
                }
            );
            println!(
                "    Rating: {:.1}  Experience: {}  {}",
                doctor.rating,
                doctor.experience,
                if doctor.available { "Available" } else { "Unavailable" }
            );
            println!("    Languages: {}", doctor.languages.join(", "));
            if !doctor.schedule.is_empty() {
                println!("    Schedule: {}", doctor.schedule);
            }
        }
    }

    fn view_available_slots(&mut self) {
        println!("\n--- Available Slots ---");

        let tomorrow = (Self::now() + Duration::days(1)).date().to_string();
        let date_input = self.get_input("Date (YYYY-MM-DD)", Some(&tomorrow));
        let doctor = self.get_input("Doctor (blank for any)", Some(""));

        let date = match parse_date(&date_input) {
            Ok(date) => date,
            Err(e) => {
                println!("\n{}", e);
                return;
            }
        };

        let calendar = self.portal.calendar(Self::now());
        if !calendar.is_date_selectable(date) {
            println!(
                "\n{} cannot be booked (open {} to {})",
                date,
                calendar.today(),
                calendar.horizon_end()
            );
            return;
        }

        let doctor = if doctor.is_empty() { None } else { Some(doctor.as_str()) };
        println!("\n{}:", date.format("%A, %Y-%m-%d"));
        for availability in calendar.slot_availability(date, doctor) {
            println!("  {} - {:?}", availability.slot, availability.status);
        }
    }

    fn book_appointment(&mut self) {
        println!("\n--- Book Appointment ---");

        let doctor_name = self.get_input("Doctor name", Some("Dr. Sarah Lee"));
        let tomorrow = (Self::now() + Duration::days(1)).date().to_string();
        let date = self.get_input("Date (YYYY-MM-DD)", Some(&tomorrow));

        let slots: Vec<String> = TimeSlot::all().iter().map(TimeSlot::label).collect();
        println!("Slots: {}", slots.join(" "));
        let time = self.get_input("Time", Some("09:00"));

        println!("\nAppointment types:");
        for (i, kind) in AppointmentType::ALL.iter().enumerate() {
            println!("  {}. {}", i + 1, kind);
        }
        let choice = self.get_int_input("Select type", Some(1));
        let appointment_type = AppointmentType::ALL
            .get((choice.max(1) - 1) as usize)
            .copied()
            .unwrap_or(AppointmentType::RegularCheckup);
        let notes = self.get_input("Notes", Some(""));

        let form = BookingForm {
            doctor_name,
            date,
            time,
            appointment_type: appointment_type.name().to_string(),
            notes,
        };

        match self.portal.book(&form, Self::now()) {
            Ok(BookingOutcome::Booked(apt)) => {
                println!(
                    "\nBooked {} with {} on {} at {}",
                    apt.appointment_type, apt.doctor_name, apt.date, apt.time
                );
            }
            Ok(BookingOutcome::Duplicate(message)) => println!("\n{}", message),
            Ok(BookingOutcome::Invalid(errors)) => {
                println!("\nPlease fix the following:");
                for error in errors {
                    println!("  - {}", error);
                }
            }
            Err(e) => println!("\nError booking appointment: {}", e),
        }
    }

    fn view_appointments(&self) {
        let appointments = self.portal.store.sorted_by_date();

        if appointments.is_empty() {
            println!("\nNo appointments booked");
            return;
        }

        println!("\n--- My Appointments ({}) ---", appointments.len());

        let mut current_date = None;
        for apt in appointments {
            if Some(apt.date) != current_date {
                current_date = Some(apt.date);
                println!("\n{}:", apt.date.format("%A, %Y-%m-%d"));
            }

            println!(
                "  {} - {} ({}){}",
                apt.time,
                apt.doctor_name,
                apt.appointment_type,
                if apt.notes.is_empty() {
                    String::new()
                } else {
                    format!(" - {}", apt.notes)
                }
            );
        }
    }

    /// List appointments and let the user pick one by number.
    fn pick_appointment(&mut self, prompt: &str) -> Option<uuid::Uuid> {
        let appointments: Vec<(uuid::Uuid, String)> = self
            .portal
            .store
            .sorted_by_date()
            .iter()
            .map(|apt| {
                (
                    apt.id,
                    format!("{} - {} {}", apt.doctor_name, apt.date, apt.time),
                )
            })
            .collect();

        if appointments.is_empty() {
            println!("\nNo appointments booked");
            return None;
        }

        println!("\nCurrent appointments:");
        for (i, (_, label)) in appointments.iter().enumerate() {
            println!("  {}. {}", i + 1, label);
        }

        let choice = self.get_int_input(prompt, Some(0));
        if choice <= 0 || choice as usize > appointments.len() {
            return None;
        }
        Some(appointments[choice as usize - 1].0)
    }

    fn cancel_appointment(&mut self) {
        println!("\n--- Cancel Appointment ---");

        let Some(id) = self.pick_appointment("Select appointment to cancel (0 to go back)") else {
            return;
        };

        match self.portal.cancel(id) {
            Ok(apt) => {
                println!("\nAppointment with {} cancelled", apt.doctor_name);
                println!("Time slot is now available again");
            }
            Err(e) => println!("\nFailed to cancel appointment: {}", e),
        }
    }

    fn reschedule_appointment(&mut self) {
        println!("\n--- Reschedule Appointment ---");

        let Some(id) = self.pick_appointment("Select appointment to move (0 to go back)") else {
            return;
        };

        let tomorrow = (Self::now() + Duration::days(1)).date().to_string();
        let date = self.get_input("New date (YYYY-MM-DD)", Some(&tomorrow));
        let time = self.get_input("New time", Some("09:00"));

        let parsed = parse_date(&date).and_then(|d| TimeSlot::parse(&time).map(|t| (d, t)));
        let result = parsed.and_then(|(date, time)| self.portal.reschedule(id, date, time, Self::now()));

        match result {
            Ok(apt) => println!("\nMoved to {} at {}", apt.date, apt.time),
            Err(e) => println!("\nFailed to reschedule: {}", e),
        }
    }

    fn view_calendar(&mut self) {
        let now = Self::now();
        let year = self.get_int_input("Year", Some(now.year()));
        let month = self.get_int_input("Month", Some(now.month() as i32));

        match self.portal.calendar(now).month(year, month.max(0) as u32) {
            Ok(grid) => {
                println!();
                print!("{}", grid);
                println!("\n* booked   - unavailable   < today");
            }
            Err(e) => println!("\n{}", e),
        }
    }

    fn view_records(&mut self) {
        println!("\n--- Medical Records ---");
        println!("  1. Bills");
        println!("  2. Insurance claims");
        println!("  3. Prescriptions");
        println!("  4. Lab reports");
        println!("  5. Check a claim attachment");
        let choice = self.get_int_input("Select", Some(1));
        let records = &self.portal.records;

        match choice {
            1 => {
                for bill in filter_by_status(&records.bills, None) {
                    println!(
                        "  {} {:<28} {:>10}  due {}  [{}]",
                        bill.id,
                        bill.description,
                        format_amount(bill.amount_cents),
                        bill.due_date,
                        bill.status.badge().label
                    );
                }
                println!(
                    "\n  Outstanding: {}",
                    format_amount(carebook::records::outstanding_total(&records.bills))
                );
            }
            2 => {
                for claim in filter_by_status(&records.claims, None) {
                    println!(
                        "  {} {:<24} {:>10}  {}  [{}]",
                        claim.id,
                        claim.provider,
                        format_amount(claim.amount_cents),
                        claim.submitted_on,
                        claim.status.badge().label
                    );
                }
            }
            3 => {
                for rx in filter_by_status(&records.prescriptions, None) {
                    println!(
                        "  {} {:<14} {:<26} {}  [{}]",
                        rx.id,
                        rx.medication,
                        rx.dosage,
                        rx.prescribed_by,
                        rx.status.badge().label
                    );
                }
            }
            4 => {
                for report in filter_by_status(&records.reports, None) {
                    println!(
                        "  {} {:<22} {:<18} {}  [{}]",
                        report.id,
                        report.title,
                        report.doctor_name,
                        report.date,
                        report.status.badge().label
                    );
                }
            }
            5 => {
                let name = self.get_input("File name", Some("receipt.pdf"));
                let size = self.get_int_input("Size in KB", Some(200));
                match validate_attachment(&name, size.max(0) as u64 * 1024) {
                    Ok(()) => println!("\nAttachment accepted"),
                    Err(e) => println!("\n{}", e),
                }
            }
            _ => println!("Invalid choice"),
        }
    }

    fn view_notifications(&mut self) {
        if let Err(e) = self.portal.notifications.expire(Local::now()) {
            println!("\nCould not update notifications: {}", e);
        }

        let items = self.portal.notifications.items();
        if items.is_empty() {
            println!("\nNo notifications");
            return;
        }

        println!("\n--- Notifications ({}) ---", items.len());
        for n in items {
            println!("  [{:?}] {}", n.kind, n.message);
        }
    }

    fn go_to_page(&mut self) {
        let path = self.get_input("Path", Some("/client/dashboard"));
        let page = Page::resolve(&path);
        println!("\n=== {} ===", page.title());

        match page {
            Page::Dashboard => {
                let summary = self.portal.dashboard(Self::now(), 3);
                println!("  Appointments booked: {}", summary.total_appointments);
                println!("  Outstanding bills: {}", format_amount(summary.outstanding_cents));
                println!("  Active prescriptions: {}", summary.active_prescriptions);
                println!("  Open claims: {}", summary.open_claims);
                for apt in summary.upcoming {
                    println!("  Next: {} {} with {}", apt.date, apt.time, apt.doctor_name);
                }
            }
            Page::FindDoctor => self.find_doctor(),
            Page::Appointments => self.view_appointments(),
            Page::BookAppointment => self.book_appointment(),
            Page::Calendar => self.view_calendar(),
            Page::Bills | Page::Claims | Page::Prescriptions | Page::Reports => self.view_records(),
            Page::Support => println!("  Contact support at the front desk."),
            Page::NotFound => {
                println!("  Nothing lives at '{}'. Pages:", path);
                for page in Page::navigation() {
                    println!("    {} -> {}", page.path().unwrap_or_default(), page.title());
                }
            }
        }
    }

    fn run_demo(&mut self) {
        println!("\n--- Running Demo ---");

        let now = Self::now();
        let tomorrow = (now + Duration::days(1)).date().to_string();
        let forms = [
            ("Dr. Sarah Lee", "09:00", "Regular Checkup"),
            ("Dr. Sarah Lee", "09:00", "Follow-up"),
            ("Dr. Maria Garcia", "09:00", "Consultation"),
            ("Dr. Amit Patel", "10:00", "Consultation"),
        ];

        for (doctor, time, kind) in forms {
            let form = BookingForm {
                doctor_name: doctor.to_string(),
                date: tomorrow.clone(),
                time: time.to_string(),
                appointment_type: kind.to_string(),
                notes: String::new(),
            };
            print!("  {:<18} {} {:<16} -> ", doctor, time, kind);
            match self.portal.book(&form, now) {
                Ok(BookingOutcome::Booked(_)) => println!("booked"),
                Ok(BookingOutcome::Duplicate(_)) => println!("duplicate rejected"),
                Ok(BookingOutcome::Invalid(errors)) => println!(
                    "invalid ({})",
                    errors.iter().map(|e| e.message.as_str()).collect::<Vec<_>>().join("; ")
                ),
                Err(e) => println!("error: {}", e),
            }
        }

        println!("\nNote: the second booking for Dr. Sarah Lee at 09:00 was rejected,");
        println!("while Dr. Maria Garcia could still take the same time.");
    }

    fn run(&mut self) {
        self.print_header();

        while self.running {
            self.print_menu();

            let choice = self.get_int_input("Enter choice", Some(11));
            if !self.running {
                break;
            }

            match choice {
                1 => self.find_doctor(),
                2 => self.view_available_slots(),
                3 => self.book_appointment(),
                4 => self.view_appointments(),
                5 => self.cancel_appointment(),
                6 => self.reschedule_appointment(),
                7 => self.view_calendar(),
                8 => self.view_records(),
                9 => self.view_notifications(),
                10 => self.go_to_page(),
                11 => self.run_demo(),
                0 => {
                    self.running = false;
                    println!("\nGoodbye!");
                }
                _ => println!("Invalid choice"),
            }
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(io::stderr)
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let portal = match PortalConfig::load().and_then(Portal::new) {
        Ok(portal) => portal,
        Err(e) => {
            eprintln!("Failed to start portal: {}", e);
            std::process::exit(1);
        }
    };

    let mut cli = PortalCLI::new(portal);
    cli.run();
}

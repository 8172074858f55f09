//! Patient portal core.
//!
//! Appointment booking with duplicate detection, slot availability, a
//! doctor directory, medical records with status badges and a
//! notification center. All data is local mock data.

pub mod app;
pub mod booking;
pub mod calendar;
pub mod config;
pub mod data;
pub mod directory;
pub mod error;
pub mod models;
pub mod notifications;
pub mod records;
pub mod routes;
pub mod store;

pub use app::Portal;
pub use error::PortalError;

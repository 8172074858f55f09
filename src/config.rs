use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::PortalError;

/// Application-level constants
pub const APP_NAME: &str = "CareBook";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV: &str = "CAREBOOK_CONFIG";

/// Log filter used when RUST_LOG is unset.
pub fn default_log_filter() -> &'static str {
    "carebook=info"
}

/// Get the application data directory (~/.carebook/).
/// Falls back to the working directory when no home is known.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".carebook")
}

/// File holding the persisted notification list.
pub fn notifications_file() -> PathBuf {
    app_data_dir().join("notifications.json")
}

/// Runtime settings. Every field has a default, so a config file only
/// needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PortalConfig {
    /// How far ahead the calendar allows bookings.
    pub booking_horizon_months: u32,
    /// Seconds before a notification is dismissed automatically.
    pub notification_ttl_secs: i64,
    pub notifications_path: PathBuf,
    /// Replaces the built-in doctor list when set.
    pub doctors_path: Option<PathBuf>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        PortalConfig {
            booking_horizon_months: 3,
            notification_ttl_secs: 5,
            notifications_path: notifications_file(),
            doctors_path: None,
        }
    }
}

impl PortalConfig {
    pub fn from_file(path: &Path) -> Result<Self, PortalError> {
        let text = std::fs::read_to_string(path)?;
        let config: PortalConfig = serde_json::from_str(&text)?;
        config.notification_ttl()?;
        Ok(config)
    }

    /// Notification lifetime, rejecting values that are not positive or
    /// do not fit a `Duration`.
    pub fn notification_ttl(&self) -> Result<Duration, PortalError> {
        Duration::try_seconds(self.notification_ttl_secs)
            .filter(|ttl| *ttl > Duration::zero())
            .ok_or_else(|| {
                PortalError::InvalidData(format!(
                    "notificationTtlSecs must be a positive number of seconds, got {}",
                    self.notification_ttl_secs
                ))
            })
    }

    /// Load from the file named by `CAREBOOK_CONFIG`, or use defaults.
    pub fn load() -> Result<Self, PortalError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => {
                tracing::info!(path = ?path, "Loading config");
                Self::from_file(Path::new(&path))
            }
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn notifications_file_under_app_data() {
        let file = notifications_file();
        assert!(file.starts_with(app_data_dir()));
        assert!(file.ends_with("notifications.json"));
    }

    #[test]
    fn defaults() {
        let config = PortalConfig::default();
        assert_eq!(config.booking_horizon_months, 3);
        assert_eq!(config.notification_ttl_secs, 5);
        assert!(config.doctors_path.is_none());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"bookingHorizonMonths": 6}}"#).unwrap();

        let config = PortalConfig::from_file(file.path()).unwrap();
        assert_eq!(config.booking_horizon_months, 6);
        assert_eq!(config.notification_ttl_secs, 5);
    }

    #[test]
    fn non_positive_ttl_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"notificationTtlSecs": 0}}"#).unwrap();
        assert!(matches!(
            PortalConfig::from_file(file.path()),
            Err(PortalError::InvalidData(_))
        ));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }

    #[test]
    fn oversized_ttl_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"notificationTtlSecs": {}}}"#, i64::MAX).unwrap();
        assert!(matches!(
            PortalConfig::from_file(file.path()),
            Err(PortalError::InvalidData(_))
        ));

        let config = PortalConfig {
            notification_ttl_secs: i64::MAX,
            ..PortalConfig::default()
        };
        assert!(config.notification_ttl().is_err());
        assert_eq!(
            PortalConfig::default().notification_ttl().unwrap(),
            Duration::seconds(5)
        );
    }

    #[test]
    fn load_reads_file_named_by_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("carebook.json");
        std::fs::write(
            &path,
            r#"{"bookingHorizonMonths": 2, "doctorsPath": "/srv/doctors.json"}"#,
        )
        .unwrap();

        std::env::set_var(CONFIG_ENV, &path);
        let loaded = PortalConfig::load();
        std::env::remove_var(CONFIG_ENV);

        let config = loaded.unwrap();
        assert_eq!(config.booking_horizon_months, 2);
        assert_eq!(config.doctors_path, Some(PathBuf::from("/srv/doctors.json")));
        assert_eq!(PortalConfig::load().unwrap(), PortalConfig::default());
    }
}

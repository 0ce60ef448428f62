//! Configuration for the college portal server.
//!
//! The server runs with zero configuration: every field has a default that
//! matches the demo college. A YAML file can override any subset of fields,
//! and a few environment variables override the file for container use.
//!
//! Load order:
//! 1. file named by `COLLEGE_PORTAL_CONFIG`, else `portal.yaml` in the working
//!    directory if it exists, else built-in defaults
//! 2. `COLLEGE_PORTAL_HOST`, `COLLEGE_PORTAL_PORT`, `COLLEGE_PORTAL_UPLOAD_DIR`

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::backend::domain::models::academics::{CalendarEvent, Timetable, TimetableSlot};
use crate::backend::domain::report_formatter::LineEnding;

pub const CONFIG_PATH_VAR: &str = "COLLEGE_PORTAL_CONFIG";
pub const HOST_VAR: &str = "COLLEGE_PORTAL_HOST";
pub const PORT_VAR: &str = "COLLEGE_PORTAL_PORT";
pub const UPLOAD_DIR_VAR: &str = "COLLEGE_PORTAL_UPLOAD_DIR";
pub const DEFAULT_CONFIG_FILE: &str = "portal.yaml";

/// Complete configuration for a portal run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub ids: IdConfig,
    pub reports: ReportConfig,
    pub college: CollegeConfig,
    pub academics: AcademicsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origin allowed by CORS; `None` allows any origin
    pub allowed_origin: Option<String>,
    /// Directory of a built web frontend served for non-API paths
    pub static_dir: Option<PathBuf>,
    /// Largest accepted request body, uploads included
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            allowed_origin: Some("http://localhost:8080".to_string()),
            static_dir: None,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root of the per-student upload directories
    pub upload_root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_root: std::env::temp_dir().join("college_portal_files"),
        }
    }
}

/// Identifier lengths in hex characters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdConfig {
    pub student_length: usize,
    /// Uploads, transactions and service requests
    pub record_length: usize,
}

impl Default for IdConfig {
    fn default() -> Self {
        Self {
            student_length: 8,
            record_length: 10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub line_ending: LineEnding,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollegeConfig {
    pub name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub admission_updates: Vec<String>,
}

impl Default for CollegeConfig {
    fn default() -> Self {
        Self {
            name: "College Portal".to_string(),
            contact_email: "studentservices@college.edu".to_string(),
            contact_phone: "0123-456789".to_string(),
            admission_updates: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcademicsConfig {
    pub calendar: Vec<CalendarEvent>,
    pub timetable: Timetable,
}

impl Default for AcademicsConfig {
    fn default() -> Self {
        let event = |y, m, d, name: &str| CalendarEvent {
            // Fixed dates, always valid
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
            event: name.to_string(),
        };
        let slot = |time: &str, monday: &str, tuesday: &str| TimetableSlot {
            time: time.to_string(),
            subjects: vec![monday.to_string(), tuesday.to_string()],
        };

        Self {
            calendar: vec![
                event(2025, 8, 1, "Semester begins"),
                event(2025, 10, 15, "Midterm Exams"),
                event(2025, 12, 20, "Semester ends"),
            ],
            timetable: Timetable {
                days: vec!["Monday".to_string(), "Tuesday".to_string()],
                slots: vec![
                    slot("09:00-10:00", "Math", "English"),
                    slot("10:00-11:00", "Physics", "Chemistry"),
                    slot("11:00-12:00", "Free", "Lab"),
                ],
            },
        }
    }
}

impl PortalConfig {
    /// Load from the configured file (if any) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let explicit = std::env::var(CONFIG_PATH_VAR).ok().map(PathBuf::from);
        let mut config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE)?,
            None => {
                info!("No config file found, using defaults");
                Self::default()
            }
        };

        config.apply_env_overrides_from(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading config from {:?}", path);
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        Self::from_yaml_str(&text).with_context(|| format!("Invalid config file {:?}", path))
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        // An empty document means "all defaults"
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).context("Failed to parse YAML config")
    }

    /// Apply `COLLEGE_PORTAL_*` overrides looked up through `lookup`.
    pub fn apply_env_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(host) = lookup(HOST_VAR) {
            self.server.host = host;
        }
        if let Some(port) = lookup(PORT_VAR) {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("{} must be a port number, got '{}'", PORT_VAR, port))?;
        }
        if let Some(dir) = lookup(UPLOAD_DIR_VAR) {
            self.storage.upload_root = PathBuf::from(dir);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            bail!("server.host cannot be empty");
        }
        if self.server.max_upload_bytes == 0 {
            bail!("server.max_upload_bytes must be greater than zero");
        }
        if self.storage.upload_root.as_os_str().is_empty() {
            bail!("storage.upload_root cannot be empty");
        }
        for (name, length) in [
            ("ids.student_length", self.ids.student_length),
            ("ids.record_length", self.ids.record_length),
        ] {
            if !(4..=32).contains(&length) {
                bail!("{} must be between 4 and 32, got {}", name, length);
            }
        }
        let days = self.academics.timetable.days.len();
        for slot in &self.academics.timetable.slots {
            if slot.subjects.len() != days {
                bail!(
                    "timetable slot {} lists {} subjects for {} days",
                    slot.time,
                    slot.subjects.len(),
                    days
                );
            }
        }
        Ok(())
    }

    /// `host:port` for binding the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

//! Support for configuration options

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::storage::DEFAULT_STORAGE_KEY;
use crate::timer::DEFAULT_REFRESH_PERIOD;

/// The product name, displayed as the dashboard title.
/// Feel free to override it when initing this library.
pub static PRODUCT_NAME: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("Live Meeting Alert".to_string())));

/// The current product name
pub fn product_name() -> String {
    match PRODUCT_NAME.lock() {
        Ok(name) => name.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}


/// Settings of the dashboard host. Every field has a default, so that a partial (or empty) file is valid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where the key-value store keeps its files
    pub storage_folder: PathBuf,
    /// The slot the meeting list is stored in
    pub storage_key: String,
    /// Where the dashboard page is written
    pub output_page: PathBuf,
    /// How often the dashboard is redrawn
    pub refresh_seconds: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_folder: PathBuf::from("meeting_alert_data"),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            output_page: PathBuf::from("meetings.html"),
            refresh_seconds: DEFAULT_REFRESH_PERIOD.as_secs(),
        }
    }
}

impl Settings {
    /// Read settings from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Err(err) => {
                return Err(Error::Config(format!("Unable to open file {:?}: {}", path, err)));
            },
            Ok(content) => content,
        };
        let settings: Settings = serde_json::from_str(&content)
            .map_err(|err| Error::Config(format!("Invalid settings in {:?}: {}", path, err)))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.storage_key.trim().is_empty() {
            return Err(Error::Config("storage_key must not be empty".to_string()));
        }
        if self.refresh_seconds == 0 {
            return Err(Error::Config("refresh_seconds must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn refresh_period(&self) -> Duration {
        Duration::from_secs(self.refresh_seconds)
    }
}

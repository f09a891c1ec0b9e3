//! The seams between this crate and its host: where data is stored, how the user is asked, where the
//! dashboard is drawn, and what time it is.

use chrono::{DateTime, Utc};

use crate::error::Result;

/// A local key-value store that holds text values
pub trait KeyValueStore {
    /// Returns the value stored under `key`, or `None` if nothing has been stored there yet
    fn get(&self, key: &str) -> Result<Option<String>>;
    /// Store `value` under `key`, replacing any previous value entirely
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Asks the user to confirm a destructive action
pub trait Confirm {
    /// Returns `true` if the user accepted
    fn confirm(&mut self, message: &str) -> bool;
}

/// Receives the dashboard markup every time it is redrawn
pub trait RenderTarget {
    fn draw(&mut self, page: &str);
}

/// A source for the current time
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

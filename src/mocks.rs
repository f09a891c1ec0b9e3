//! This module provides stand-ins for the host side of the dashboard (clock, confirmation prompt,
//! display), so that tests can drive a [`Controller`](crate::controller::Controller) and observe what it draws.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::{DateTime, Duration, Utc};

use crate::traits::{Clock, Confirm, RenderTarget};

/// A clock that only moves when it is told to.
///
/// Clones share the same time, so that a test can keep a handle on a clock it has given away.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: Rc::new(Cell::new(now)) }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}


/// Keeps every page it has been asked to draw
#[derive(Clone, Debug, Default)]
pub struct RecordingTarget {
    pages: Rc<RefCell<Vec<String>>>,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times the dashboard has been drawn
    pub fn draw_count(&self) -> usize {
        self.pages.borrow().len()
    }

    /// The last drawn page, or an empty string if nothing has been drawn yet
    pub fn last_page(&self) -> String {
        self.pages.borrow().last().cloned().unwrap_or_default()
    }
}

impl RenderTarget for RecordingTarget {
    fn draw(&mut self, page: &str) {
        self.pages.borrow_mut().push(page.to_string());
    }
}


/// A prompt that always gives the same answer
impl Confirm for bool {
    fn confirm(&mut self, message: &str) -> bool {
        log::debug!("Mock confirmation: answering {} to {:?}", self, message);
        *self
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_manual_clock() {
        let start = Utc::now();
        let clock = ManualClock::new(start);
        let handle = clock.clone();

        handle.advance(Duration::minutes(5));
        assert_eq!(clock.now(), start + Duration::minutes(5));

        handle.set(start);
        assert_eq!(clock.now(), start);
    }

    #[test]
    fn test_recording_target() {
        let target = RecordingTarget::new();
        let mut drawn_into = target.clone();
        assert_eq!(target.draw_count(), 0);
        assert_eq!(target.last_page(), "");

        drawn_into.draw("<p>first</p>");
        drawn_into.draw("<p>second</p>");
        assert_eq!(target.draw_count(), 2);
        assert_eq!(target.last_page(), "<p>second</p>");
    }
}

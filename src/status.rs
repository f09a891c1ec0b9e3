//! Whether a meeting is live, upcoming or over

use std::fmt::{Display, Formatter};

use chrono::{DateTime, Datelike, TimeZone, Utc};

use crate::meeting::parse_meeting_time;

/// How long a meeting stays live after its start time. Meetings have no end time.
pub const LIVE_WINDOW_MINUTES: i64 = 60;

/// Where a meeting stands, relative to the current time
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    /// Started less than an hour ago
    Live,
    /// Starts now or later
    Upcoming,
    Past,
}

impl Status {
    /// The label displayed on meeting cards
    pub fn label(&self) -> &'static str {
        match self {
            Status::Live => "LIVE",
            Status::Upcoming => "UPCOMING",
            Status::Past => "PAST",
        }
    }

    pub fn is_live(&self) -> bool {
        *self == Status::Live
    }

    pub fn is_past(&self) -> bool {
        *self == Status::Past
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Classify a meeting that starts at `meeting_time`.
///
/// The distance to `now` is counted in whole minutes, rounded down. A meeting is live while this
/// count lies in `-59..=-1`, upcoming from `0` on, and past otherwise.
pub fn classify(meeting_time: DateTime<Utc>, now: DateTime<Utc>) -> Status {
    let diff_ms = meeting_time.timestamp_millis() - now.timestamp_millis();
    let diff_minutes = diff_ms.div_euclid(60_000);

    if diff_minutes < 0 && diff_minutes > -LIVE_WINDOW_MINUTES {
        Status::Live
    } else if diff_minutes >= 0 {
        Status::Upcoming
    } else {
        Status::Past
    }
}

/// Classify a meeting from its raw time. Times that cannot be parsed are [`Status::Past`].
pub fn classify_str<Tz: TimeZone>(meeting_time: &str, now: DateTime<Utc>, tz: &Tz) -> Status {
    match parse_meeting_time(meeting_time, tz) {
        Some(start) => classify(start, now),
        None => Status::Past,
    }
}

/// Whether both instants fall on the same day, month and year in the time zone `tz`
pub fn is_same_calendar_day<Tz: TimeZone>(meeting_time: DateTime<Utc>, now: DateTime<Utc>, tz: &Tz) -> bool {
    let meeting_day = meeting_time.with_timezone(tz).date_naive();
    let today = now.with_timezone(tz).date_naive();

    meeting_day.year() == today.year()
        && meeting_day.month() == today.month()
        && meeting_day.day() == today.day()
}

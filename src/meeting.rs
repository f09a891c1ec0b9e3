//! Meetings, and the forms they are created from

use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::ValidationFailure;

/// Layouts accepted for a time that carries no offset. These are read in the local time zone.
const NAIVE_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];


/// The identifier of a meeting.
///
/// It is derived from the creation time (milliseconds since the Unix epoch), which also makes it
/// compatible with lists saved by earlier versions of the dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeetingId(i64);

impl MeetingId {
    /// Pick the id of a meeting created at `now`.
    ///
    /// Ids are monotonic: if the clock did not move past the highest id in `existing`, the next
    /// integer is used instead. When the highest id is `i64::MAX`, the smallest free id is used.
    pub fn next<I>(now: DateTime<Utc>, existing: I) -> Self
    where
        I: IntoIterator<Item = MeetingId>,
    {
        let candidate = now.timestamp_millis();
        let used: HashSet<i64> = existing.into_iter().map(|id| id.0).collect();
        match used.iter().max() {
            Some(&highest) if highest >= candidate => match highest.checked_add(1) {
                Some(next) => MeetingId(next),
                None => {
                    let free = (i64::MIN..=i64::MAX).find(|id| used.contains(id) == false);
                    MeetingId(free.unwrap_or(candidate))
                },
            },
            _ => MeetingId(candidate),
        }
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl From<i64> for MeetingId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl FromStr for MeetingId {
    type Err = std::num::ParseIntError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

impl Display for MeetingId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.0)
    }
}



/// A scheduled meeting
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    id: MeetingId,
    /// The display name. This is user input, and must be escaped before it is displayed
    name: String,
    /// The start time, as typed by the user (see [`parse_meeting_time`])
    time: String,
    /// Where to join the meeting
    link: String,
}

impl Meeting {
    pub fn new(id: MeetingId, name: String, time: String, link: String) -> Self {
        Self { id, name, time, link }
    }

    /// Create a meeting from a form that has passed validation
    pub fn from_form(id: MeetingId, form: MeetingForm) -> Self {
        Self::new(id, form.name, form.time, form.link)
    }

    pub fn id(&self) -> MeetingId { self.id    }
    pub fn name(&self) -> &str    { &self.name }
    pub fn time(&self) -> &str    { &self.time }
    pub fn link(&self) -> &str    { &self.link }

    /// The start time of this meeting, or `None` if it cannot be understood
    pub fn start<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Utc>> {
        parse_meeting_time(&self.time, tz)
    }

    /// Overwrite the name, time and link. The id never changes.
    pub fn overwrite(&mut self, form: MeetingForm) {
        self.name = form.name;
        self.time = form.time;
        self.link = form.link;
    }

    /// The current values of this meeting, e.g. to pre-fill an edit form
    pub fn to_form(&self) -> MeetingForm {
        MeetingForm {
            name: self.name.clone(),
            time: self.time.clone(),
            link: self.link.clone(),
        }
    }
}



/// The raw fields of the create form or the edit form
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MeetingForm {
    pub name: String,
    pub time: String,
    pub link: String,
}

impl MeetingForm {
    pub fn new<N, T, L>(name: N, time: T, link: L) -> Self
    where
        N: Into<String>,
        T: Into<String>,
        L: Into<String>,
    {
        Self { name: name.into(), time: time.into(), link: link.into() }
    }

    /// Check every field is present, and that the time can be understood
    pub fn validate<Tz: TimeZone>(&self, tz: &Tz) -> Result<(), ValidationFailure> {
        if self.name.trim().is_empty() {
            return Err(ValidationFailure::MissingName);
        }
        if self.time.trim().is_empty() {
            return Err(ValidationFailure::MissingTime);
        }
        if parse_meeting_time(&self.time, tz).is_none() {
            return Err(ValidationFailure::MalformedTime(self.time.clone()));
        }
        if self.link.trim().is_empty() {
            return Err(ValidationFailure::MissingLink);
        }
        Ok(())
    }

    /// Empty every field
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}



/// Parse the start time of a meeting.
///
/// * A timestamp with an offset (`2024-05-01T10:30:00+02:00`, `2024-05-01T10:30Z`) is used as is.
/// * A timestamp without an offset (what a date/time picker produces, e.g. `2024-05-01T10:30`) is local time in `tz`.
/// * A bare date (`2024-05-01`) is midnight UTC.
pub fn parse_meeting_time<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M%#z") {
        return Some(dt.with_timezone(&Utc));
    }

    for layout in NAIVE_LAYOUTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, layout) {
            return local_to_utc(&naive, tz);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn local_to_utc<Tz: TimeZone>(naive: &NaiveDateTime, tz: &Tz) -> Option<DateTime<Utc>> {
    // Ambiguous local times (when clocks go back) resolve to the earliest instant.
    // Local times that do not exist (when clocks go forward) are pushed past the gap.
    tz.from_local_datetime(naive)
        .earliest()
        .or_else(|| {
            naive.checked_add_signed(Duration::hours(1))
                .and_then(|shifted| tz.from_local_datetime(&shifted).earliest())
        })
        .map(|dt| dt.with_timezone(&Utc))
}



#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn ids_follow_the_clock() {
        let now = utc("2024-05-01T10:00:00Z");
        let id = MeetingId::next(now, vec![MeetingId::from(12), MeetingId::from(42)]);
        assert_eq!(id.as_i64(), now.timestamp_millis());
    }

    #[test]
    fn ids_stay_unique_within_a_millisecond() {
        let now = utc("2024-05-01T10:00:00Z");
        let first = MeetingId::next(now, Vec::new());
        let second = MeetingId::next(now, vec![first]);
        let third = MeetingId::next(now, vec![first, second]);
        assert_eq!(second.as_i64(), first.as_i64() + 1);
        assert_eq!(third.as_i64(), first.as_i64() + 2);
    }

    #[test]
    fn ids_do_not_overflow() {
        let now = utc("2024-05-01T10:00:00Z");
        let id = MeetingId::next(now, vec![MeetingId::from(i64::MAX)]);
        assert_eq!(id, MeetingId::from(i64::MIN));

        let id = MeetingId::next(now, vec![MeetingId::from(i64::MAX), MeetingId::from(i64::MIN)]);
        assert_eq!(id, MeetingId::from(i64::MIN + 1));
    }

    #[test]
    fn serde_legacy_format() {
        let stored = r#"[{"id":1714557600000,"name":"Standup","time":"2024-05-01T10:30","link":"https://meet.example.com/abc"}]"#;
        let meetings: Vec<Meeting> = serde_json::from_str(stored).unwrap();
        assert_eq!(meetings.len(), 1);
        assert_eq!(meetings[0].id(), MeetingId::from(1714557600000));
        assert_eq!(meetings[0].name(), "Standup");
        assert_eq!(meetings[0].time(), "2024-05-01T10:30");

        let saved = serde_json::to_string(&meetings).unwrap();
        assert_eq!(saved, stored);
    }

    #[test]
    fn naive_times_are_local() {
        let paris = FixedOffset::east_opt(2 * 3600).unwrap();
        let parsed = parse_meeting_time("2024-05-01T10:30", &paris).unwrap();
        assert_eq!(parsed, utc("2024-05-01T08:30:00Z"));

        let with_seconds = parse_meeting_time("2024-05-01T10:30:15.250", &paris).unwrap();
        assert_eq!(with_seconds, utc("2024-05-01T08:30:15.250Z"));
    }

    #[test]
    fn explicit_offsets_win_over_the_local_zone() {
        let paris = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(parse_meeting_time("2024-05-01T10:30:00-05:00", &paris), Some(utc("2024-05-01T15:30:00Z")));
        assert_eq!(parse_meeting_time("2024-05-01T10:30Z", &paris), Some(utc("2024-05-01T10:30:00Z")));
        assert_eq!(parse_meeting_time("2024-05-01", &paris), Some(utc("2024-05-01T00:00:00Z")));
    }

    #[test]
    fn garbage_times_do_not_parse() {
        assert_eq!(parse_meeting_time("tomorrow-ish", &Utc), None);
        assert_eq!(parse_meeting_time("", &Utc), None);
        assert_eq!(parse_meeting_time("2024-13-45T10:30", &Utc), None);
    }

    #[test]
    fn times_at_the_end_of_the_calendar() {
        let new_york = FixedOffset::west_opt(5 * 3600).unwrap();
        let last_day = "+262142-12-31T23:30";
        assert_eq!(parse_meeting_time(last_day, &new_york), None);

        let form = MeetingForm::new("Far away", last_day, "https://x");
        assert_eq!(form.validate(&new_york), Err(ValidationFailure::MalformedTime(last_day.to_string())));

        // Still representable in UTC
        assert!(parse_meeting_time(last_day, &Utc).is_some());
    }

    #[test]
    fn validation() {
        let ok = MeetingForm::new("Standup", "2024-05-01T10:30", "https://x");
        assert_eq!(ok.validate(&Utc), Ok(()));

        let unnamed = MeetingForm::new("   ", "2024-05-01T10:30", "https://x");
        assert_eq!(unnamed.validate(&Utc), Err(ValidationFailure::MissingName));

        let untimed = MeetingForm::new("Standup", "", "https://x");
        assert_eq!(untimed.validate(&Utc), Err(ValidationFailure::MissingTime));

        let bad_time = MeetingForm::new("Standup", "soon", "https://x");
        assert_eq!(bad_time.validate(&Utc), Err(ValidationFailure::MalformedTime("soon".to_string())));

        let unlinked = MeetingForm::new("Standup", "2024-05-01T10:30", "");
        assert_eq!(unlinked.validate(&Utc), Err(ValidationFailure::MissingLink));
    }

    #[test]
    fn overwrite_keeps_the_id() {
        let mut meeting = Meeting::new(MeetingId::from(7), "Old".into(), "2024-05-01T10:30".into(), "https://old".into());
        meeting.overwrite(MeetingForm::new("New", "2024-05-02T11:00", "https://new"));
        assert_eq!(meeting.id(), MeetingId::from(7));
        assert_eq!(meeting.name(), "New");
        assert_eq!(meeting.time(), "2024-05-02T11:00");
        assert_eq!(meeting.link(), "https://new");
    }
}

//! Some utility functions

use chrono::{DateTime, TimeZone, Utc};

use crate::meeting::Meeting;
use crate::render::Renderer;
use crate::status::classify_str;

/// A debug utility that pretty-prints meetings, one per line
pub fn print_meeting_list<Tz: TimeZone>(meetings: &[Meeting], now: DateTime<Utc>, renderer: &Renderer<Tz>) {
    if meetings.is_empty() {
        println!("    (no meetings)");
    }
    for meeting in meetings {
        println!("    {}", meeting_line(meeting, now, renderer));
    }
}

/// A one-line summary of a meeting
pub fn meeting_line<Tz: TimeZone>(meeting: &Meeting, now: DateTime<Utc>, renderer: &Renderer<Tz>) -> String {
    let status = classify_str(meeting.time(), now, renderer.time_zone());
    format!("{:<8} {}\t{}\t{}\t{}",
        status.label(),
        meeting.id(),
        renderer.format_time(meeting),
        meeting.name(),
        meeting.link(),
    )
}

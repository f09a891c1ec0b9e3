//! This module turns the meeting list into the dashboard markup
//!
//! The dashboard shows three views of the same list. They are pure filters: meetings keep the order
//! they have in the list, and a meeting may show up in several views at once.
//!
//! All user input goes through [`askama`] escaping before it lands in the markup.

use askama::Template;
use chrono::{DateTime, TimeZone, Utc};

use crate::controller::{AppState, EditSurface};
use crate::error::Result;
use crate::meeting::{Meeting, MeetingForm, MeetingId};
use crate::status::{classify, is_same_calendar_day, Status};

/// How meeting start times are displayed, e.g. `May 1, 09:30 AM`
const TIME_FORMAT: &str = "%b %-d, %I:%M %p";
/// Displayed in place of a start time that cannot be parsed
const INVALID_TIME: &str = "Invalid Date";


/// The three views of the dashboard
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewKind {
    /// Meetings that are live right now
    Live,
    /// Meetings of the day that are not over
    Today,
    /// Every meeting that is not over
    All,
}

impl ViewKind {
    /// What is displayed when a view has no meeting
    pub fn placeholder(&self) -> Placeholder {
        match self {
            ViewKind::Live => Placeholder {
                icon: r#"<path stroke-linecap="round" stroke-linejoin="round" stroke-width="1.5" d="M12 8v4l3 3m6-3a9 9 0 11-18 0 9 9 0 0118 0z"/>"#,
                title: "No live meetings right now",
                subtitle: "Meetings will appear here when they go live",
            },
            ViewKind::Today => Placeholder {
                icon: r#"<path stroke-linecap="round" stroke-linejoin="round" stroke-width="1.5" d="M8 7V3m8 4V3m-9 8h10M5 21h14a2 2 0 002-2V7a2 2 0 00-2-2H5a2 2 0 00-2 2v12a2 2 0 002 2z"/>"#,
                title: "No meetings scheduled for today",
                subtitle: "Add a meeting above to get started",
            },
            ViewKind::All => Placeholder {
                icon: r#"<path stroke-linecap="round" stroke-linejoin="round" stroke-width="1.5" d="M9 12l2 2 4-4m6 2a9 9 0 11-18 0 9 9 0 0118 0z"/>"#,
                title: "No meetings added yet",
                subtitle: "Schedule your first meeting to see it here",
            },
        }
    }
}

/// An icon, a title and a subtitle, shown in an empty view
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placeholder {
    /// SVG markup. This is a constant of this crate, and is inserted without escaping
    pub icon: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
}



/// The meetings of each view, in list order
#[derive(Debug, Default, PartialEq)]
pub struct Views<'a> {
    pub live: Vec<&'a Meeting>,
    pub today: Vec<&'a Meeting>,
    pub all: Vec<&'a Meeting>,
}

impl<'a> Views<'a> {
    /// Sort `meetings` into views, as seen at time `now`
    pub fn project<Tz: TimeZone>(meetings: &'a [Meeting], now: DateTime<Utc>, tz: &Tz) -> Self {
        let mut views = Views::default();

        for meeting in meetings {
            // Meetings with a time that cannot be parsed are past, and belong nowhere
            let start = match meeting.start(tz) {
                Some(start) => start,
                None => continue,
            };
            let status = classify(start, now);
            if status.is_past() {
                continue;
            }

            if status.is_live() {
                views.live.push(meeting);
            }
            if is_same_calendar_day(start, now, tz) {
                views.today.push(meeting);
            }
            views.all.push(meeting);
        }

        views
    }

    pub fn get(&self, kind: ViewKind) -> &[&'a Meeting] {
        match kind {
            ViewKind::Live => &self.live,
            ViewKind::Today => &self.today,
            ViewKind::All => &self.all,
        }
    }
}



/// What a meeting card needs to know
#[derive(Debug)]
pub struct Card<'a> {
    pub id: MeetingId,
    pub name: &'a str,
    pub link: &'a str,
    pub when: String,
    pub status: Status,
}

impl<'a> Card<'a> {
    /// The style of the status tag
    pub fn tag_classes(&self) -> &'static str {
        match self.status {
            Status::Live => "bg-red-500/20 text-red-300 border border-red-500/40 shadow-[0_0_15px_rgba(239,68,68,0.3)]",
            Status::Upcoming => "bg-amber-500/20 text-amber-300 border border-amber-500/40",
            Status::Past => "bg-white/5 text-white/50 border border-white/10",
        }
    }
}

#[derive(Template)]
#[template(path = "section.html")]
struct SectionTemplate<'a> {
    cards: Vec<Card<'a>>,
    placeholder: Placeholder,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate<'a> {
    title: &'a str,
    refresh_seconds: u64,
    create_form: &'a MeetingForm,
    edit: Option<&'a EditSurface>,
    live: String,
    today: String,
    all: String,
    today_count: usize,
    all_count: usize,
}



/// Renders meetings, with times displayed in the time zone `Tz`
#[derive(Clone, Debug)]
pub struct Renderer<Tz: TimeZone> {
    tz: Tz,
    title: String,
    refresh_seconds: u64,
}

impl<Tz: TimeZone> Renderer<Tz> {
    pub fn new(tz: Tz, title: &str, refresh_seconds: u64) -> Self {
        Self { tz, title: title.to_string(), refresh_seconds }
    }

    /// The time zone "today" and displayed times refer to
    pub fn time_zone(&self) -> &Tz {
        &self.tz
    }

    pub fn views<'a>(&self, meetings: &'a [Meeting], now: DateTime<Utc>) -> Views<'a> {
        Views::project(meetings, now, &self.tz)
    }

    /// Format a meeting time for display
    pub fn format_time(&self, meeting: &Meeting) -> String {
        match meeting.start(&self.tz) {
            Some(start) => start.with_timezone(&self.tz).naive_local().format(TIME_FORMAT).to_string(),
            None => INVALID_TIME.to_string(),
        }
    }

    fn card<'a>(&self, meeting: &'a Meeting, now: DateTime<Utc>) -> Card<'a> {
        let status = match meeting.start(&self.tz) {
            Some(start) => classify(start, now),
            None => Status::Past,
        };
        Card {
            id: meeting.id(),
            name: meeting.name(),
            link: meeting.link(),
            when: self.format_time(meeting),
            status,
        }
    }

    /// The markup of one view: a card per meeting, or the view placeholder
    pub fn render_section(&self, kind: ViewKind, meetings: &[&Meeting], now: DateTime<Utc>) -> Result<String> {
        let template = SectionTemplate {
            cards: meetings.iter().map(|m| self.card(m, now)).collect(),
            placeholder: kind.placeholder(),
        };
        Ok(template.render()?)
    }

    /// The full dashboard page for `state`, as seen at time `now`
    pub fn render_dashboard(&self, state: &AppState, now: DateTime<Utc>) -> Result<String> {
        let views = self.views(state.meetings(), now);

        let template = DashboardTemplate {
            title: &self.title,
            refresh_seconds: self.refresh_seconds,
            create_form: state.create_form(),
            edit: state.edit_surface(),
            live: self.render_section(ViewKind::Live, &views.live, now)?,
            today: self.render_section(ViewKind::Today, &views.today, now)?,
            all: self.render_section(ViewKind::All, &views.all, now)?,
            today_count: views.today.len(),
            all_count: views.all.len(),
        };
        Ok(template.render()?)
    }
}

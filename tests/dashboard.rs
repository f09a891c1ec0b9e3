//! What the dashboard shows, as time goes by

use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};

use live_meeting_alert::dispatch::{Action, Dispatcher, Outcome, UiEvent};
use live_meeting_alert::mocks::{ManualClock, RecordingTarget};
use live_meeting_alert::render::{Renderer, ViewKind, Views};
use live_meeting_alert::storage::MeetingStore;
use live_meeting_alert::timer::{run, shutdown_channel, RefreshTimer};
use live_meeting_alert::{Controller, Meeting, MeetingForm, MeetingId};

fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z").unwrap().with_timezone(&Utc)
}

fn dashboard<Tz: TimeZone>(tz: Tz) -> (Controller<Tz>, ManualClock, RecordingTarget) {
    let clock = ManualClock::new(now());
    let target = RecordingTarget::new();
    let controller = Controller::new(
        MeetingStore::in_memory(),
        Renderer::new(tz, "Meetings", 60),
        Box::new(clock.clone()),
        Box::new(target.clone()),
    );
    (controller, clock, target)
}

fn section<'a>(page: &'a str, dom_id: &str) -> &'a str {
    let start = page.find(&format!("id=\"{}\"", dom_id)).unwrap();
    let end = page[start..].find("</section>").unwrap();
    &page[start..start + end]
}

#[test]
fn standup_in_ten_minutes() {
    let (mut controller, _clock, target) = dashboard(Utc);
    let in_ten = (now() + Duration::minutes(10)).to_rfc3339();
    controller.create(MeetingForm::new("Standup", in_ten, "https://x")).unwrap();

    let page = target.last_page();
    assert!(section(&page, "liveNow").contains("No live meetings right now"));
    assert!(section(&page, "todayMeetings").contains("Standup"));
    assert!(section(&page, "allMeetings").contains("Standup"));
    assert!(page.contains(r#"<span id="todayCount">1</span>"#));
    assert!(page.contains(r#"<span id="allCount">1</span>"#));
}

#[test]
fn three_hours_ago_is_nowhere() {
    let meetings = vec![Meeting::new(
        MeetingId::from(1),
        "Old".to_string(),
        (now() - Duration::hours(3)).to_rfc3339(),
        "https://x".to_string(),
    )];
    let views = Views::project(&meetings, now(), &Utc);
    for kind in &[ViewKind::Live, ViewKind::Today, ViewKind::All] {
        assert!(views.get(*kind).is_empty());
    }
}

#[test]
fn tomorrow_is_not_today() {
    let (mut controller, _clock, target) = dashboard(Utc);
    controller.create(MeetingForm::new("Tomorrow", "2024-05-02T09:00", "https://x")).unwrap();

    let page = target.last_page();
    assert!(section(&page, "todayMeetings").contains("No meetings scheduled for today"));
    assert!(section(&page, "allMeetings").contains("Tomorrow"));
}

#[test]
fn today_is_local() {
    // At 12:00 UTC on May 1st, it is already May 2nd in UTC+14
    let kiribati = FixedOffset::east_opt(14 * 3600).unwrap();
    let (mut controller, _clock, target) = dashboard(kiribati);
    controller.create(MeetingForm::new("Early", "2024-05-02T03:00", "https://x")).unwrap();
    assert!(section(&target.last_page(), "todayMeetings").contains("Early"));
}

#[test]
fn markup_injection_is_displayed_as_text() {
    let (mut controller, _clock, target) = dashboard(Utc);
    controller.create(MeetingForm::new("<img src=x onerror=alert(1)>", "2024-05-01T12:30", "javascript:alert(1)")).unwrap();

    let page = target.last_page();
    assert!(!page.contains("<img"));
    assert!(page.contains("img src=x onerror=alert(1)"));
}

#[test]
fn edit_overlay_is_prefilled() {
    let (mut controller, _clock, target) = dashboard(Utc);
    let dispatcher = Dispatcher::new();
    let id = controller.create(MeetingForm::new("Standup", "2024-05-01T12:30", "https://x")).unwrap();
    assert!(target.last_page().contains("flex items-center justify-center hidden"));

    let event = UiEvent::Action { action: Action::OpenEdit, id };
    assert_eq!(dispatcher.dispatch(&mut controller, event, &mut false), Outcome::Done);
    let page = target.last_page();
    assert!(page.contains(&format!("data-editing-id=\"{}\"", id)));
    assert!(page.contains(r#"id="editName" name="name" type="text" required value="Standup""#));

    dispatcher.dispatch(&mut controller, UiEvent::KeyPress("escape".into()), &mut false);
    assert!(target.last_page().contains("flex items-center justify-center hidden"));
}

#[test]
fn statuses_drift_with_the_clock() {
    let (mut controller, clock, target) = dashboard(Utc);
    controller.create(MeetingForm::new("Standup", "2024-05-01T12:30", "https://x")).unwrap();

    let checkpoints = vec![
        (Duration::minutes(29), "UPCOMING"),
        (Duration::minutes(2), "LIVE"),
        (Duration::minutes(58), "LIVE"),
        (Duration::minutes(1), "No meetings added yet"),
    ];
    for (elapsed, expected) in checkpoints {
        clock.advance(elapsed);
        controller.refresh();
        assert!(target.last_page().contains(expected), "expected {:?} at {}", expected, controller.now());
    }
}

#[tokio::test(start_paused = true)]
async fn the_refresh_timer_redraws() {
    let (mut controller, clock, target) = dashboard(Utc);
    controller.create(MeetingForm::new("Standup", "2024-05-01T12:05", "https://x")).unwrap();
    let draws_before = target.draw_count();

    let (stop, shutdown) = shutdown_channel();
    let timer = RefreshTimer::new(StdDuration::from_secs(60));
    let runner = run(timer, || {
        clock.advance(Duration::minutes(1));
        controller.refresh();
    }, shutdown);
    let stopper = async {
        tokio::time::sleep(StdDuration::from_secs(6 * 60 + 30)).await;
        stop.send(true).unwrap();
    };
    let (ticks, _) = tokio::join!(runner, stopper);

    assert_eq!(ticks, 6);
    assert_eq!(target.draw_count(), draws_before + 6);
    assert!(section(&target.last_page(), "liveNow").contains("Standup"));
}

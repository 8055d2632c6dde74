//! ICS export of a composed day.
//!
//! Times are floating local times (no TZID): the schedule has no time zone
//! and the importing calendar places them in its own.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use dayline_core::{DayTimeline, Minute, Segment, SegmentKind};

use crate::render::segment_detail;

pub struct CalendarEvent {
    pub uid: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub summary: String,
    pub description: String,
}

fn at_minute(date: NaiveDate, minute: Minute) -> NaiveDateTime {
    date.and_hms_opt(0, 0, 0).unwrap_or_default() + Duration::minutes(minute.into())
}

/// One event per covered segment; available time is left out.
pub fn timeline_to_events(staff_id: &str, date: NaiveDate, timeline: &DayTimeline) -> Vec<CalendarEvent> {
    timeline
        .segments
        .iter()
        .filter(|s| s.kind != SegmentKind::Available)
        .map(|seg| segment_event(staff_id, date, seg))
        .collect()
}

fn segment_event(staff_id: &str, date: NaiveDate, seg: &Segment) -> CalendarEvent {
    let day = date.format("%Y%m%d");
    let uid = match &seg.reference {
        Some(r) => format!("{}-{day}@dayline", r.id()),
        None => format!("{}-{staff_id}-{day}-{}@dayline", seg.kind.label(), seg.start),
    };

    let detail = segment_detail(seg).unwrap_or_default();
    let summary = match seg.kind {
        SegmentKind::Break => "Break".to_string(),
        _ => format!("{}: {detail}", capitalize(seg.kind.label())),
    };

    CalendarEvent {
        uid,
        start: at_minute(date, seg.start),
        end: at_minute(date, seg.end),
        summary,
        description: format!("Staff: {staff_id}\nKind: {}\n{detail}", seg.kind.label()),
    }
}

fn capitalize(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        Some(first) => first.to_uppercase().chain(c).collect(),
        None => String::new(),
    }
}

/// Emit a minimal ICS calendar containing VEVENT blocks.
pub fn events_to_ics(events: &[CalendarEvent]) -> String {
    let mut s = String::new();
    s.push_str("BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//Dayline//EN\r\n");

    for e in events {
        s.push_str("BEGIN:VEVENT\r\n");
        s.push_str(&format!("UID:{}\r\n", e.uid));
        s.push_str(&format!("DTSTART:{}\r\n", e.start.format("%Y%m%dT%H%M%S")));
        s.push_str(&format!("DTEND:{}\r\n", e.end.format("%Y%m%dT%H%M%S")));
        s.push_str(&format!("SUMMARY:{}\r\n", escape_ics(&e.summary)));
        s.push_str(&format!("DESCRIPTION:{}\r\n", escape_ics(&e.description)));
        s.push_str("END:VEVENT\r\n");
    }

    s.push_str("END:VCALENDAR\r\n");
    s
}

fn escape_ics(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace(',', "\\,")
        .replace(';', "\\;")
}

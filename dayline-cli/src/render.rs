//! Plain-text and JSON rendering of a day view.

use chrono::NaiveDate;
use dayline_core::{
    format_hhmm, DayTimeline, DayView, Minute, Segment, SegmentKind, SegmentRef, TimelineSummary,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DayOutput<'a> {
    pub staff_id: &'a str,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub view: &'a DayView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<TimelineSummary>,
}

impl<'a> DayOutput<'a> {
    pub fn new(staff_id: &'a str, date: NaiveDate, view: &'a DayView) -> Self {
        Self {
            staff_id,
            date,
            view,
            summary: view.timeline().map(DayTimeline::summary),
        }
    }
}

pub fn render_json(out: &DayOutput<'_>) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(out)?)
}

pub fn render_text(staff_id: &str, date: NaiveDate, view: &DayView) -> String {
    let mut s = format!("# {staff_id} · {}\n\n", date.format("%a %Y-%m-%d"));

    let t = match view {
        DayView::NoShift => {
            s.push_str("No shift configured\n");
            return s;
        }
        DayView::DayOff => {
            s.push_str("Day off\n");
            return s;
        }
        DayView::Working(t) => t,
    };

    for seg in &t.segments {
        s.push_str(&segment_row(seg));
        s.push('\n');
    }

    if t.has_overlaps() {
        s.push_str("\n! Overlapping (hidden) intervals:\n");
        for seg in &t.overlaps {
            s.push_str("  ");
            s.push_str(&segment_row(seg));
            s.push('\n');
        }
    }

    s.push('\n');
    s.push_str(&summary_line(&t.summary()));
    s.push('\n');
    s
}

pub fn render_slots(view: &DayView, min_minutes: Minute) -> String {
    let Some(t) = view.timeline() else {
        return "No working hours\n".to_string();
    };

    let slots = t.available_slots(min_minutes);
    if slots.is_empty() {
        return format!("No free slots of {} or more\n", format_duration(min_minutes));
    }

    slots
        .iter()
        .map(|seg| {
            format!(
                "{}-{}  {}\n",
                format_hhmm(seg.start),
                format_hhmm(seg.end),
                format_duration(seg.duration())
            )
        })
        .collect()
}

pub fn segment_row(seg: &Segment) -> String {
    let mut row = format!(
        "{}-{}  {:<11}",
        format_hhmm(seg.start),
        format_hhmm(seg.end),
        seg.kind.label()
    );
    if let Some(detail) = segment_detail(seg) {
        row.push_str("  ");
        row.push_str(&detail);
    }
    row.trim_end().to_string()
}

/// Human label for a covered segment; `None` for available time.
pub fn segment_detail(seg: &Segment) -> Option<String> {
    match (&seg.kind, &seg.reference) {
        (SegmentKind::Break, _) => Some("Break".to_string()),
        (_, Some(SegmentRef::Appointment { id, payload })) => {
            let parts: Vec<&str> = [payload.client_name.as_deref(), payload.service_name.as_deref()]
                .into_iter()
                .flatten()
                .collect();
            if parts.is_empty() {
                Some(format!("[{id}]"))
            } else {
                Some(format!("{} [{id}]", parts.join(" · ")))
            }
        }
        (_, Some(SegmentRef::Block { id, reason })) => Some(format!("{reason} [{id}]")),
        _ => None,
    }
}

pub fn summary_line(s: &TimelineSummary) -> String {
    format!(
        "available {} · appointments {} ({}) · blocked {} ({}) · break {}",
        format_duration(s.available_minutes),
        format_duration(s.appointment_minutes),
        s.appointment_count,
        format_duration(s.block_minutes),
        s.block_count,
        format_duration(s.break_minutes),
    )
}

pub fn format_duration(minutes: Minute) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h{m:02}m"),
    }
}

//! Day timeline compositor.
//!
//! Turns a working window plus break, appointments and blocks into one ordered
//! sequence of segments that tiles the window with no gaps and no overlaps.
//!
//! Stages, each a pure function over the previous stage's output:
//! 1. clamp every interval to the window, dropping empty results
//! 2. sweep the distinct boundary points
//! 3. extract free spans (uncovered elementary spans, touching ones merged)
//! 4. order covered intervals (start asc, longer first, then source order)
//! 5. two-cursor merge of free spans and covered intervals into segments

use std::cmp::{Ordering, Reverse};
use std::collections::BTreeSet;

use tracing::{debug, trace};

use crate::segment::{DayTimeline, Segment, SegmentKind, SegmentRef};
use crate::shift::{AppointmentInterval, BlockInterval, WorkingWindow};
use crate::time::Minute;

/// A raw interval intersected with the working window.
///
/// `id` is assigned in clamping order (break, appointments, blocks) and is the
/// final tie-breaker when ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClampedEvent {
    pub id: usize,
    pub start: Minute,
    pub end: Minute,
    pub kind: SegmentKind,
    pub reference: Option<SegmentRef>,
}

impl ClampedEvent {
    pub fn duration(&self) -> Minute {
        self.end - self.start
    }

    fn to_segment(&self, start: Minute, end: Minute) -> Segment {
        Segment {
            start,
            end,
            kind: self.kind,
            reference: self.reference.clone(),
        }
    }
}

/// Half-open uncovered span [start, end).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: Minute,
    pub end: Minute,
}

/// Seam for anything that can compose a working day.
pub trait Compositor {
    fn compose(
        &self,
        window: &WorkingWindow,
        appointments: &[AppointmentInterval],
        blocks: &[BlockInterval],
    ) -> DayTimeline;
}

/// The boundary-sweep compositor.
#[derive(Debug, Clone, Copy, Default)]
pub struct SweepCompositor;

impl Compositor for SweepCompositor {
    fn compose(
        &self,
        window: &WorkingWindow,
        appointments: &[AppointmentInterval],
        blocks: &[BlockInterval],
    ) -> DayTimeline {
        compose(window, appointments, blocks)
    }
}

/// Compose one working day. Total: every valid window yields a tiling.
pub fn compose(
    window: &WorkingWindow,
    appointments: &[AppointmentInterval],
    blocks: &[BlockInterval],
) -> DayTimeline {
    let events = clamp_events(window, appointments, blocks);
    let free = free_spans(window, &events);
    let ordered = order_events(events);
    let (segments, overlaps) = merge_segments(&free, &ordered);

    debug!(
        window_start = window.start(),
        window_end = window.end(),
        appointments = appointments.len(),
        blocks = blocks.len(),
        covered = ordered.len(),
        free = free.len(),
        segments = segments.len(),
        overlaps = overlaps.len(),
        "day_composed"
    );

    DayTimeline {
        window: *window,
        segments,
        overlaps,
    }
}

/// Intersect [start, end) with the window; `None` when nothing positive remains.
pub fn clamp(start: Minute, end: Minute, window: &WorkingWindow) -> Option<(Minute, Minute)> {
    let s = start.max(window.start());
    let e = end.min(window.end());
    (s < e).then_some((s, e))
}

/// Stage 1: break, then appointments, then blocks, each clamped to the window.
pub fn clamp_events(
    window: &WorkingWindow,
    appointments: &[AppointmentInterval],
    blocks: &[BlockInterval],
) -> Vec<ClampedEvent> {
    let mut raw: Vec<(Minute, Minute, SegmentKind, Option<SegmentRef>)> =
        Vec::with_capacity(1 + appointments.len() + blocks.len());

    if let Some((bs, be)) = window.break_window() {
        raw.push((bs, be, SegmentKind::Break, None));
    }
    for a in appointments {
        raw.push((
            a.start,
            a.end(),
            SegmentKind::Appointment,
            Some(SegmentRef::Appointment {
                id: a.id.clone(),
                payload: a.payload.clone(),
            }),
        ));
    }
    for b in blocks {
        raw.push((
            b.start,
            b.end,
            SegmentKind::Block,
            Some(SegmentRef::Block {
                id: b.id.clone(),
                reason: b.reason.clone(),
            }),
        ));
    }

    let mut out = Vec::with_capacity(raw.len());
    for (start, end, kind, reference) in raw {
        match clamp(start, end, window) {
            Some((s, e)) => out.push(ClampedEvent {
                id: out.len(),
                start: s,
                end: e,
                kind,
                reference,
            }),
            None => {
                trace!(start, end, kind = kind.label(), "interval_outside_window_dropped");
            }
        }
    }

    out
}

/// Stage 2: sorted distinct boundaries, window edges included.
pub fn boundary_points(window: &WorkingWindow, events: &[ClampedEvent]) -> Vec<Minute> {
    let mut points = BTreeSet::new();
    points.insert(window.start());
    points.insert(window.end());
    for e in events {
        points.insert(e.start);
        points.insert(e.end);
    }
    points
        .into_iter()
        .filter(|p| (window.start()..=window.end()).contains(p))
        .collect()
}

/// Stage 3: uncovered elementary spans, with touching spans merged.
///
/// A span [a, b) is covered when some event has start <= a < end.
pub fn free_spans(window: &WorkingWindow, events: &[ClampedEvent]) -> Vec<Span> {
    let points = boundary_points(window, events);

    let mut by_start: Vec<&ClampedEvent> = events.iter().collect();
    by_start.sort_by_key(|e| e.start);

    let mut out: Vec<Span> = Vec::new();
    let mut next = 0;
    let mut reach = Minute::MIN;

    for pair in points.windows(2) {
        let (span_start, span_end) = (pair[0], pair[1]);

        while next < by_start.len() && by_start[next].start <= span_start {
            reach = reach.max(by_start[next].end);
            next += 1;
        }
        if reach > span_start {
            continue;
        }

        match out.last_mut() {
            Some(last) if last.end == span_start => last.end = span_end,
            _ => out.push(Span {
                start: span_start,
                end: span_end,
            }),
        }
    }

    out
}

fn event_order(a: &ClampedEvent, b: &ClampedEvent) -> Ordering {
    a.start
        .cmp(&b.start)
        .then_with(|| Reverse(a.duration()).cmp(&Reverse(b.duration())))
        .then_with(|| a.id.cmp(&b.id))
}

/// Stage 4: start ascending; on equal start the longer first; then source order.
pub fn order_events(mut events: Vec<ClampedEvent>) -> Vec<ClampedEvent> {
    events.sort_by(event_order);
    events
}

/// Stage 5: two-cursor merge. Returns (segments, hidden overlaps).
///
/// Both inputs must be ordered: `free` by start, `ordered` by `order_events`.
/// A covered interval starting before the end of what is already emitted is
/// trimmed to start there; whatever it loses goes into the overlap list.
pub fn merge_segments(free: &[Span], ordered: &[ClampedEvent]) -> (Vec<Segment>, Vec<Segment>) {
    debug_assert!(free.is_sorted_by_key(|s| s.start));
    debug_assert!(ordered.is_sorted_by(|a, b| event_order(a, b) != Ordering::Greater));

    let mut segments = Vec::with_capacity(free.len() + ordered.len());
    let mut overlaps = Vec::new();
    let mut cursor = Minute::MIN;
    let (mut i, mut j) = (0, 0);

    loop {
        let take_free = match (free.get(i), ordered.get(j)) {
            (Some(f), Some(e)) => f.start < e.start,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };

        if take_free {
            let f = free[i];
            segments.push(Segment::available(f.start, f.end));
            cursor = f.end;
            i += 1;
            continue;
        }

        let e = &ordered[j];
        j += 1;

        let start = e.start.max(cursor);
        if start > e.start {
            overlaps.push(e.to_segment(e.start, start.min(e.end)));
        }
        if start < e.end {
            segments.push(e.to_segment(start, e.end));
            cursor = e.end;
        }
    }

    (segments, overlaps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shift::ShiftWindow;

    fn window(start: Minute, end: Minute) -> WorkingWindow {
        ShiftWindow::new(start, end).working_window().unwrap()
    }

    fn kinds(t: &DayTimeline) -> Vec<(SegmentKind, Minute, Minute)> {
        t.segments.iter().map(|s| (s.kind, s.start, s.end)).collect()
    }

    #[test]
    fn no_intervals_is_one_available_segment() {
        let w = window(540, 1020);
        let t = compose(&w, &[], &[]);
        assert_eq!(t.segments, vec![Segment::available(540, 1020)]);
        assert!(t.overlaps.is_empty());
    }

    #[test]
    fn break_splits_the_day() {
        let w = ShiftWindow::new(540, 1020).with_break(780, 840).working_window().unwrap();
        let t = compose(&w, &[], &[]);
        assert_eq!(
            kinds(&t),
            vec![
                (SegmentKind::Available, 540, 780),
                (SegmentKind::Break, 780, 840),
                (SegmentKind::Available, 840, 1020),
            ]
        );
        assert_eq!(t.segments[1].reference, None);
    }

    #[test]
    fn appointment_outside_window_contributes_nothing() {
        let w = window(540, 1020);
        let appts = vec![
            AppointmentInterval::new("early", 420, 60),
            AppointmentInterval::new("late", 1020, 30),
        ];
        let t = compose(&w, &appts, &[]);
        assert_eq!(t.segments, vec![Segment::available(540, 1020)]);
    }

    #[test]
    fn appointment_straddling_start_is_clamped() {
        let w = window(540, 1020);
        let appts = vec![AppointmentInterval::new("a1", 510, 60).with_client("Ada")];
        let t = compose(&w, &appts, &[]);
        assert_eq!(
            kinds(&t),
            vec![
                (SegmentKind::Appointment, 540, 570),
                (SegmentKind::Available, 570, 1020),
            ]
        );
        match &t.segments[0].reference {
            Some(SegmentRef::Appointment { id, payload }) => {
                assert_eq!(id, "a1");
                assert_eq!(payload.client_name.as_deref(), Some("Ada"));
            }
            other => panic!("unexpected ref: {other:?}"),
        }
    }

    #[test]
    fn appointment_straddling_end_is_clamped() {
        let w = window(540, 1020);
        let blocks = vec![BlockInterval::new("b1", 1000, 1100, "close-out")];
        let t = compose(&w, &[], &blocks);
        assert_eq!(
            kinds(&t),
            vec![(SegmentKind::Available, 540, 1000), (SegmentKind::Block, 1000, 1020)]
        );
    }

    #[test]
    fn degenerate_intervals_are_dropped() {
        let w = window(540, 1020);
        let appts = vec![AppointmentInterval::new("zero", 600, 0), AppointmentInterval::new("neg", 600, -15)];
        let blocks = vec![BlockInterval::new("inv", 700, 650, "typo")];
        let events = clamp_events(&w, &appts, &blocks);
        assert!(events.is_empty());
        assert_eq!(compose(&w, &appts, &blocks).segments.len(), 1);
    }

    #[test]
    fn clamp_assigns_ids_in_source_order() {
        let w = ShiftWindow::new(540, 1020).with_break(780, 840).working_window().unwrap();
        let appts = vec![AppointmentInterval::new("a1", 600, 30), AppointmentInterval::new("gone", 0, 10)];
        let blocks = vec![BlockInterval::new("b1", 900, 930, "x")];
        let events = clamp_events(&w, &appts, &blocks);
        let summary: Vec<(usize, SegmentKind)> = events.iter().map(|e| (e.id, e.kind)).collect();
        assert_eq!(
            summary,
            vec![
                (0, SegmentKind::Break),
                (1, SegmentKind::Appointment),
                (2, SegmentKind::Block)
            ]
        );
    }

    #[test]
    fn boundary_points_are_sorted_and_distinct() {
        let w = window(540, 1020);
        let appts = vec![AppointmentInterval::new("a1", 600, 60), AppointmentInterval::new("a2", 600, 30)];
        let events = clamp_events(&w, &appts, &[]);
        assert_eq!(boundary_points(&w, &events), vec![540, 600, 630, 660, 1020]);
    }

    #[test]
    fn full_coverage_has_no_free_spans() {
        let w = window(540, 600);
        let blocks = vec![BlockInterval::new("b1", 500, 700, "offsite")];
        let events = clamp_events(&w, &[], &blocks);
        assert!(free_spans(&w, &events).is_empty());
        let t = compose(&w, &[], &blocks);
        assert_eq!(kinds(&t), vec![(SegmentKind::Block, 540, 600)]);
    }

    #[test]
    fn free_spans_skip_covered_elementary_spans() {
        let w = window(540, 1020);
        let events = vec![ClampedEvent {
            id: 0,
            start: 600,
            end: 630,
            kind: SegmentKind::Block,
            reference: None,
        }];
        let spans = free_spans(&w, &events);
        assert_eq!(
            spans,
            vec![Span { start: 540, end: 600 }, Span { start: 630, end: 1020 }]
        );
    }

    #[test]
    fn back_to_back_intervals_leave_no_available_sliver() {
        let w = window(540, 1020);
        let appts = vec![AppointmentInterval::new("a1", 540, 60), AppointmentInterval::new("a2", 600, 60)];
        let t = compose(&w, &appts, &[]);
        assert_eq!(
            kinds(&t),
            vec![
                (SegmentKind::Appointment, 540, 600),
                (SegmentKind::Appointment, 600, 660),
                (SegmentKind::Available, 660, 1020),
            ]
        );
    }

    #[test]
    fn tie_break_longer_first() {
        let w = window(540, 1020);
        let appts = vec![AppointmentInterval::new("a1", 600, 30)];
        let blocks = vec![BlockInterval::new("b1", 600, 660, "meeting")];
        let t = compose(&w, &appts, &blocks);
        assert_eq!(t.segments[1].kind, SegmentKind::Block);
        assert_eq!((t.segments[1].start, t.segments[1].end), (600, 660));
        assert_eq!(t.overlaps.len(), 1);
        assert_eq!(t.overlaps[0].kind, SegmentKind::Appointment);
        assert_eq!((t.overlaps[0].start, t.overlaps[0].end), (600, 630));

        // swap lengths, swap winners
        let appts = vec![AppointmentInterval::new("a1", 600, 60)];
        let blocks = vec![BlockInterval::new("b1", 600, 630, "meeting")];
        let t = compose(&w, &appts, &blocks);
        assert_eq!(t.segments[1].kind, SegmentKind::Appointment);
        assert_eq!(t.overlaps[0].kind, SegmentKind::Block);
        assert_eq!((t.overlaps[0].start, t.overlaps[0].end), (600, 630));
    }

    #[test]
    fn oversized_duration_runs_to_shift_end() {
        let w = window(540, 1020);
        let appts = vec![AppointmentInterval::new("a1", 600, i32::MAX)];
        let t = compose(&w, &appts, &[]);
        assert_eq!(t.segments.len(), 2);
        assert_eq!(t.segments[1].kind, SegmentKind::Appointment);
        assert_eq!((t.segments[1].start, t.segments[1].end), (600, 1020));
    }

    #[test]
    fn tie_break_equal_duration_keeps_source_order() {
        let w = ShiftWindow::new(540, 1020).with_break(600, 630).working_window().unwrap();
        let appts = vec![AppointmentInterval::new("a1", 600, 30), AppointmentInterval::new("a2", 600, 30)];
        let blocks = vec![BlockInterval::new("b1", 600, 630, "x")];
        let ordered = order_events(clamp_events(&w, &appts, &blocks));
        let ids: Vec<usize> = ordered.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);

        let t = compose(&w, &appts, &blocks);
        assert_eq!(t.segments[1].kind, SegmentKind::Break);
        assert_eq!(t.overlaps.len(), 3);
    }

    #[test]
    fn partial_overlap_is_trimmed_and_reported() {
        let w = window(540, 1020);
        let appts = vec![AppointmentInterval::new("a1", 600, 60)];
        let blocks = vec![BlockInterval::new("b1", 630, 690, "training")];
        let t = compose(&w, &appts, &blocks);
        assert_eq!(
            kinds(&t),
            vec![
                (SegmentKind::Available, 540, 600),
                (SegmentKind::Appointment, 600, 660),
                (SegmentKind::Block, 660, 690),
                (SegmentKind::Available, 690, 1020),
            ]
        );
        assert_eq!((t.overlaps[0].start, t.overlaps[0].end), (630, 660));
        assert_eq!(t.overlaps[0].reference.as_ref().map(|r| r.id()), Some("b1"));
    }

    #[test]
    fn compose_is_idempotent() {
        let w = ShiftWindow::new(540, 1020).with_break(780, 840).working_window().unwrap();
        let appts = vec![AppointmentInterval::new("a1", 600, 45), AppointmentInterval::new("a2", 800, 60)];
        let blocks = vec![BlockInterval::new("b1", 950, 1100, "x")];
        assert_eq!(compose(&w, &appts, &blocks), compose(&w, &appts, &blocks));
    }

    #[test]
    fn sweep_compositor_matches_free_function() {
        let w = window(540, 1020);
        let appts = vec![AppointmentInterval::new("a1", 600, 45)];
        assert_eq!(SweepCompositor.compose(&w, &appts, &[]), compose(&w, &appts, &[]));
    }
}

//! Output types: the composed, gap-free timeline of one working day.

use serde::{Deserialize, Serialize};

use crate::shift::{AppointmentPayload, WorkingWindow};
use crate::time::Minute;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Available,
    Appointment,
    Block,
    Break,
}

impl SegmentKind {
    pub fn label(&self) -> &'static str {
        match self {
            SegmentKind::Available => "available",
            SegmentKind::Appointment => "appointment",
            SegmentKind::Block => "block",
            SegmentKind::Break => "break",
        }
    }
}

/// What a covered segment points back to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SegmentRef {
    Appointment {
        id: String,
        #[serde(flatten)]
        payload: AppointmentPayload,
    },
    Block {
        id: String,
        reason: String,
    },
}

impl SegmentRef {
    pub fn id(&self) -> &str {
        match self {
            SegmentRef::Appointment { id, .. } | SegmentRef::Block { id, .. } => id,
        }
    }
}

/// One span of the timeline, half-open: [start, end).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Minute,
    pub end: Minute,
    pub kind: SegmentKind,
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<SegmentRef>,
}

impl Segment {
    pub fn available(start: Minute, end: Minute) -> Self {
        Self {
            start,
            end,
            kind: SegmentKind::Available,
            reference: None,
        }
    }

    pub fn duration(&self) -> Minute {
        self.end - self.start
    }
}

/// Result of composing one working day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayTimeline {
    pub window: WorkingWindow,
    /// Ordered, contiguous, non-overlapping; tiles the shift window exactly.
    pub segments: Vec<Segment>,
    /// Portions of covered intervals hidden behind an earlier-ordered one
    /// (double bookings, blocks over appointments, ...). Not part of the tiling.
    pub overlaps: Vec<Segment>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineSummary {
    pub available_minutes: Minute,
    pub appointment_minutes: Minute,
    pub block_minutes: Minute,
    pub break_minutes: Minute,
    pub appointment_count: usize,
    pub block_count: usize,
    pub overlap_count: usize,
}

impl TimelineSummary {
    pub fn booked_minutes(&self) -> Minute {
        self.appointment_minutes + self.block_minutes + self.break_minutes
    }
}

impl DayTimeline {
    pub fn summary(&self) -> TimelineSummary {
        let mut s = TimelineSummary {
            overlap_count: self.overlaps.len(),
            ..TimelineSummary::default()
        };

        for seg in &self.segments {
            let d = seg.duration();
            match seg.kind {
                SegmentKind::Available => s.available_minutes += d,
                SegmentKind::Appointment => {
                    s.appointment_minutes += d;
                    s.appointment_count += 1;
                }
                SegmentKind::Block => {
                    s.block_minutes += d;
                    s.block_count += 1;
                }
                SegmentKind::Break => s.break_minutes += d,
            }
        }

        s
    }

    /// Free segments long enough to hold `min_minutes`.
    pub fn available_slots(&self, min_minutes: Minute) -> Vec<&Segment> {
        self.segments
            .iter()
            .filter(|s| s.kind == SegmentKind::Available && s.duration() >= min_minutes)
            .collect()
    }

    pub fn has_overlaps(&self) -> bool {
        !self.overlaps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_json_uses_lowercase_kind_and_ref_key() {
        let seg = Segment {
            start: 600,
            end: 630,
            kind: SegmentKind::Block,
            reference: Some(SegmentRef::Block {
                id: "blk_1".into(),
                reason: "Training".into(),
            }),
        };

        let json = serde_json::to_string(&seg).unwrap();
        assert!(json.contains("\"kind\":\"block\""));
        assert!(json.contains("\"ref\":{\"type\":\"block\""));
        assert!(json.contains("\"reason\":\"Training\""));

        let back: Segment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, seg);
    }

    #[test]
    fn available_segment_omits_ref() {
        let json = serde_json::to_string(&Segment::available(540, 600)).unwrap();
        assert!(!json.contains("\"ref\""));
    }

    #[test]
    fn appointment_ref_flattens_payload() {
        let r = SegmentRef::Appointment {
            id: "apt_1".into(),
            payload: AppointmentPayload {
                client_name: Some("Ada".into()),
                ..AppointmentPayload::default()
            },
        };
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"type\":\"appointment\""));
        assert!(json.contains("\"client_name\":\"Ada\""));
        assert_eq!(r.id(), "apt_1");
    }
}

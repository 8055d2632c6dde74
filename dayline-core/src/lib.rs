//! dayline-core: day timeline types and the compositor that tiles a staff
//! member's shift with breaks, appointments, blocks and free time.

pub mod compositor;
pub mod day_view;
pub mod segment;
pub mod shift;
pub mod time;

pub use compositor::{compose, ClampedEvent, Compositor, Span, SweepCompositor};
pub use day_view::{DayView, DayViewBuilder};
pub use segment::{DayTimeline, Segment, SegmentKind, SegmentRef, TimelineSummary};
pub use shift::{
    AppointmentInterval, AppointmentPayload, BlockInterval, ShiftError, ShiftWindow, WorkingWindow,
};
pub use time::{format_hhmm, parse_hhmm_lenient, parse_hhmm_strict, Minute, TimeParseError, MINUTES_PER_DAY};

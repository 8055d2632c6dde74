//! Day view: what the presentation layer renders for one staff member and day.
//!
//! Owns the "no shift" / "day off" short-circuit so the compositor is only
//! ever handed a working window.

use serde::Serialize;

use crate::compositor::{Compositor, SweepCompositor};
use crate::segment::DayTimeline;
use crate::shift::{AppointmentInterval, BlockInterval, ShiftError, ShiftWindow};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DayView {
    /// No shift record exists for the day.
    NoShift,
    /// A shift exists but is marked not working.
    DayOff,
    Working(DayTimeline),
}

impl DayView {
    pub fn timeline(&self) -> Option<&DayTimeline> {
        match self {
            DayView::Working(t) => Some(t),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DayViewBuilder<C: Compositor = SweepCompositor> {
    compositor: C,
}

impl DayViewBuilder<SweepCompositor> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Compositor> DayViewBuilder<C> {
    pub fn with_compositor(compositor: C) -> Self {
        Self { compositor }
    }

    /// Build the view for one day.
    ///
    /// Errors only for a working shift whose window is empty or inverted.
    pub fn build(
        &self,
        shift: Option<&ShiftWindow>,
        appointments: &[AppointmentInterval],
        blocks: &[BlockInterval],
    ) -> Result<DayView, ShiftError> {
        let Some(shift) = shift else {
            return Ok(DayView::NoShift);
        };

        match shift.working_window() {
            Ok(window) => Ok(DayView::Working(
                self.compositor.compose(&window, appointments, blocks),
            )),
            Err(ShiftError::NotWorking) => Ok(DayView::DayOff),
            Err(e) => Err(e),
        }
    }
}

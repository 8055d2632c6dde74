//! Input records for one staff member's day: shift window, appointments, blocks.
//!
//! These are already normalized to minute offsets; see `dayline-ingest` for the
//! wire shapes they come from.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::time::{format_hhmm, Minute};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShiftError {
    #[error("shift is marked as not working")]
    NotWorking,
    #[error("shift window {} is empty or inverted", fmt_range(.start, .end))]
    InvalidWindow { start: Minute, end: Minute },
}

fn fmt_range(start: &Minute, end: &Minute) -> String {
    format!("{}-{}", format_hhmm(*start), format_hhmm(*end))
}

/// Configured working hours for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftWindow {
    pub is_working: bool,
    pub start: Minute,
    pub end: Minute,
    pub break_start: Option<Minute>,
    pub break_end: Option<Minute>,
}

impl ShiftWindow {
    pub fn new(start: Minute, end: Minute) -> Self {
        Self {
            is_working: true,
            start,
            end,
            break_start: None,
            break_end: None,
        }
    }

    pub fn day_off() -> Self {
        Self {
            is_working: false,
            start: 0,
            end: 0,
            break_start: None,
            break_end: None,
        }
    }

    pub fn with_break(mut self, start: Minute, end: Minute) -> Self {
        self.break_start = Some(start);
        self.break_end = Some(end);
        self
    }

    /// The only way to get something the compositor accepts.
    ///
    /// Fails with `NotWorking` for a day off and `InvalidWindow` when start >= end.
    pub fn working_window(&self) -> Result<WorkingWindow, ShiftError> {
        if !self.is_working {
            return Err(ShiftError::NotWorking);
        }
        if self.start >= self.end {
            return Err(ShiftError::InvalidWindow {
                start: self.start,
                end: self.end,
            });
        }

        let break_window = match (self.break_start, self.break_end) {
            (Some(s), Some(e)) => Some((s, e)),
            _ => None,
        };

        Ok(WorkingWindow {
            start: self.start,
            end: self.end,
            break_window,
        })
    }
}

/// A shift known to be working with start < end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkingWindow {
    start: Minute,
    end: Minute,
    break_window: Option<(Minute, Minute)>,
}

impl WorkingWindow {
    pub fn start(&self) -> Minute {
        self.start
    }

    pub fn end(&self) -> Minute {
        self.end
    }

    pub fn break_window(&self) -> Option<(Minute, Minute)> {
        self.break_window
    }

    pub fn duration(&self) -> Minute {
        self.end - self.start
    }
}

/// Opaque booking details carried through to the appointment segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentPayload {
    pub client_name: Option<String>,
    pub service_name: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// An externally booked appointment. End is derived from the duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentInterval {
    pub id: String,
    pub start: Minute,
    pub duration_minutes: Minute,
    pub payload: AppointmentPayload,
}

impl AppointmentInterval {
    pub fn new(id: impl Into<String>, start: Minute, duration_minutes: Minute) -> Self {
        Self {
            id: id.into(),
            start,
            duration_minutes,
            payload: AppointmentPayload::default(),
        }
    }

    pub fn with_client(mut self, client: impl Into<String>) -> Self {
        self.payload.client_name = Some(client.into());
        self
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.payload.service_name = Some(service.into());
        self
    }

    pub fn end(&self) -> Minute {
        self.start.saturating_add(self.duration_minutes)
    }
}

/// A manually blocked interval (training, admin time, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInterval {
    pub id: String,
    pub start: Minute,
    pub end: Minute,
    pub reason: String,
}

impl BlockInterval {
    pub fn new(id: impl Into<String>, start: Minute, end: Minute, reason: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            start,
            end,
            reason: reason.into(),
        }
    }
}

//! Map loosely-shaped day records onto the compositor's input types.

use chrono::NaiveDate;
use dayline_core::{
    parse_hhmm_lenient, parse_hhmm_strict, AppointmentInterval, AppointmentPayload, BlockInterval,
    DayView, DayViewBuilder, Minute, ShiftError, ShiftWindow,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::types::{DayRecord, RawAppointment, RawBlock, RawShift};

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("{field}: malformed time '{value}' (expected HH:MM)")]
    MalformedTime { field: String, value: String },
    #[error("invalid day record JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// How to treat time strings that are not clean "HH:MM".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeMode {
    /// Missing/unreadable components become 0 (logged).
    #[default]
    Lenient,
    /// Malformed strings are an error.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub time_mode: TimeMode,
    /// Drop appointments whose status is cancelled / no-show.
    pub skip_cancelled: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            time_mode: TimeMode::Lenient,
            skip_cancelled: true,
        }
    }
}

/// Compositor-ready inputs for one staff member and date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDay {
    pub staff_id: String,
    pub date: NaiveDate,
    pub shift: Option<ShiftWindow>,
    pub appointments: Vec<AppointmentInterval>,
    pub blocks: Vec<BlockInterval>,
}

impl NormalizedDay {
    pub fn view(&self) -> Result<DayView, ShiftError> {
        DayViewBuilder::new().build(self.shift.as_ref(), &self.appointments, &self.blocks)
    }
}

pub fn parse_day_record(json: &str) -> Result<DayRecord, NormalizeError> {
    Ok(serde_json::from_str(json)?)
}

pub fn normalize_day(record: &DayRecord, opts: NormalizeOptions) -> Result<NormalizedDay, NormalizeError> {
    let shift = record
        .shift
        .as_ref()
        .map(|s| normalize_shift(s, opts.time_mode))
        .transpose()?;

    let mut appointments = Vec::with_capacity(record.appointments.len());
    for (i, a) in record.appointments.iter().enumerate() {
        if opts.skip_cancelled && is_cancelled(a.status.as_deref()) {
            debug!(id = %a.id, status = ?a.status, "appointment_skipped_cancelled");
            continue;
        }
        appointments.push(normalize_appointment(i, a, opts.time_mode)?);
    }

    let blocks = record
        .blocks
        .iter()
        .enumerate()
        .map(|(i, b)| normalize_block(i, b, opts.time_mode))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(NormalizedDay {
        staff_id: record.staff_id.clone(),
        date: record.date,
        shift,
        appointments,
        blocks,
    })
}

/// Parse one time field under the given mode.
pub fn parse_time(field: &str, value: &str, mode: TimeMode) -> Result<Minute, NormalizeError> {
    match mode {
        TimeMode::Lenient => Ok(parse_hhmm_lenient(value)),
        TimeMode::Strict => parse_hhmm_strict(value).map_err(|_| NormalizeError::MalformedTime {
            field: field.to_string(),
            value: value.to_string(),
        }),
    }
}

fn normalize_shift(raw: &RawShift, mode: TimeMode) -> Result<ShiftWindow, NormalizeError> {
    // Times on a day off are meaningless; don't parse (or warn about) them.
    if !raw.is_working {
        return Ok(ShiftWindow::day_off());
    }

    let start = parse_time("shift.start_time", &raw.start_time, mode)?;
    let end = parse_time("shift.end_time", &raw.end_time, mode)?;
    let mut shift = ShiftWindow::new(start, end);

    let break_start = non_blank(raw.break_start.as_deref());
    let break_end = non_blank(raw.break_end.as_deref());
    if let (Some(bs), Some(be)) = (break_start, break_end) {
        shift = shift.with_break(
            parse_time("shift.break_start", bs, mode)?,
            parse_time("shift.break_end", be, mode)?,
        );
    }

    Ok(shift)
}

fn normalize_appointment(
    idx: usize,
    raw: &RawAppointment,
    mode: TimeMode,
) -> Result<AppointmentInterval, NormalizeError> {
    let start = parse_time(&format!("appointments[{idx}].start_time"), &raw.start_time, mode)?;
    Ok(AppointmentInterval {
        id: raw.id.clone(),
        start,
        duration_minutes: raw.duration,
        payload: AppointmentPayload {
            client_name: raw.client_name.clone(),
            service_name: raw.service_name.clone(),
            status: raw.status.clone(),
            notes: raw.notes.clone(),
        },
    })
}

fn normalize_block(idx: usize, raw: &RawBlock, mode: TimeMode) -> Result<BlockInterval, NormalizeError> {
    let start = parse_time(&format!("blocks[{idx}].start_time"), &raw.start_time, mode)?;
    let end = parse_time(&format!("blocks[{idx}].end_time"), &raw.end_time, mode)?;
    Ok(BlockInterval::new(raw.id.clone(), start, end, raw.reason.clone()))
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn is_cancelled(status: Option<&str>) -> bool {
    matches!(
        status.map(|s| s.trim().to_lowercase()).as_deref(),
        Some("cancelled" | "canceled" | "no_show" | "no-show")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use dayline_core::SegmentKind;

    const DAY: &str = r#"
{
  "staff_id": "stf_1",
  "date": "2026-10-19",
  "shift": {"is_working": true, "start_time": "09:00", "end_time": "17:00",
            "break_start": "13:00", "break_end": "14:00"},
  "appointments": [
    {"id": "apt_1", "start_time": "10:00", "duration": 45, "client_name": "Ada", "status": "confirmed"},
    {"id": "apt_2", "start_time": "11:00", "duration": 30, "status": "cancelled"}
  ],
  "blocks": [{"id": "blk_1", "start_time": "15:00", "end_time": "15:30", "reason": "Training"}]
}"#;

    #[test]
    fn test_normalize_full_day() {
        let record = parse_day_record(DAY).unwrap();
        let day = normalize_day(&record, NormalizeOptions::default()).unwrap();

        assert_eq!(day.shift, Some(ShiftWindow::new(540, 1020).with_break(780, 840)));
        assert_eq!(day.appointments.len(), 1);
        assert_eq!(day.appointments[0].start, 600);
        assert_eq!(day.appointments[0].payload.client_name.as_deref(), Some("Ada"));
        assert_eq!(day.blocks, vec![BlockInterval::new("blk_1", 900, 930, "Training")]);
    }

    #[test]
    fn test_cancelled_kept_when_asked() {
        let record = parse_day_record(DAY).unwrap();
        let opts = NormalizeOptions {
            skip_cancelled: false,
            ..NormalizeOptions::default()
        };
        let day = normalize_day(&record, opts).unwrap();
        assert_eq!(day.appointments.len(), 2);
    }

    #[test]
    fn test_camel_case_aliases_and_missing_lists() {
        let json = r#"{"staffId": "s", "date": "2026-10-19",
            "shift": {"isWorking": true, "startTime": "08:30", "endTime": "12:00"}}"#;
        let day = normalize_day(&parse_day_record(json).unwrap(), NormalizeOptions::default()).unwrap();
        assert_eq!(day.shift, Some(ShiftWindow::new(510, 720)));
        assert!(day.appointments.is_empty());
        assert!(day.blocks.is_empty());
    }

    #[test]
    fn test_null_shift_is_no_shift() {
        let json = r#"{"staff_id": "s", "date": "2026-10-19", "shift": null}"#;
        let day = normalize_day(&parse_day_record(json).unwrap(), NormalizeOptions::default()).unwrap();
        assert_eq!(day.shift, None);
        assert_eq!(day.view().unwrap(), DayView::NoShift);
    }

    #[test]
    fn test_day_off_skips_time_parsing() {
        let json = r#"{"staff_id": "s", "date": "2026-10-19",
            "shift": {"is_working": false, "start_time": "", "end_time": ""}}"#;
        let record = parse_day_record(json).unwrap();
        let opts = NormalizeOptions {
            time_mode: TimeMode::Strict,
            ..NormalizeOptions::default()
        };
        let day = normalize_day(&record, opts).unwrap();
        assert_eq!(day.view().unwrap(), DayView::DayOff);
    }

    #[test]
    fn test_lenient_defaults_missing_minutes() {
        let json = r#"{"staff_id": "s", "date": "2026-10-19",
            "shift": {"start_time": "9", "end_time": "17:"}}"#;
        let day = normalize_day(&parse_day_record(json).unwrap(), NormalizeOptions::default()).unwrap();
        assert_eq!(day.shift, Some(ShiftWindow::new(540, 1020)));
    }

    #[test]
    fn test_strict_rejects_missing_minutes() {
        let json = r#"{"staff_id": "s", "date": "2026-10-19",
            "shift": {"start_time": "9", "end_time": "17:00"}}"#;
        let opts = NormalizeOptions {
            time_mode: TimeMode::Strict,
            ..NormalizeOptions::default()
        };
        let err = normalize_day(&parse_day_record(json).unwrap(), opts).unwrap_err();
        assert!(err.to_string().contains("shift.start_time"));
    }

    #[test]
    fn test_blank_break_is_no_break() {
        let json = r#"{"staff_id": "s", "date": "2026-10-19",
            "shift": {"start_time": "09:00", "end_time": "17:00", "break_start": "", "break_end": "14:00"}}"#;
        let day = normalize_day(&parse_day_record(json).unwrap(), NormalizeOptions::default()).unwrap();
        assert_eq!(day.shift.and_then(|s| s.break_start), None);
    }

    #[test]
    fn test_view_composes_working_day() {
        let record = parse_day_record(DAY).unwrap();
        let day = normalize_day(&record, NormalizeOptions::default()).unwrap();
        let view = day.view().unwrap();
        let kinds: Vec<SegmentKind> = view.timeline().unwrap().segments.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SegmentKind::Available,
                SegmentKind::Appointment,
                SegmentKind::Available,
                SegmentKind::Break,
                SegmentKind::Available,
                SegmentKind::Block,
                SegmentKind::Available,
            ]
        );
    }

    #[test]
    fn test_huge_duration_runs_to_shift_end() {
        let json = r#"{"staff_id": "s", "date": "2026-10-19",
            "shift": {"start_time": "09:00", "end_time": "17:00"},
            "appointments": [{"id": "apt_1", "start_time": "10:00", "duration": 2147483647}]}"#;
        let day = normalize_day(&parse_day_record(json).unwrap(), NormalizeOptions::default()).unwrap();
        let view = day.view().unwrap();
        let last = view.timeline().unwrap().segments.last().unwrap().clone();
        assert_eq!(last.kind, SegmentKind::Appointment);
        assert_eq!((last.start, last.end), (600, 1020));
    }

    #[test]
    fn test_bad_json_is_error() {
        assert!(matches!(parse_day_record("{"), Err(NormalizeError::Json(_))));
    }
}
